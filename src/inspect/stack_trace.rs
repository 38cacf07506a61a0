use super::Inspection;
use crate::{
    graph::{GraphModel, ItemKind, ItemRef},
    remote::SuspendedLocation,
    requests::StackTraceArguments,
    responses::StackTraceResponse,
    types::{Source, StackFrame, StackFramePresentationhint, END_OF_FILE_COLUMN},
};
use std::{path::Path, sync::Arc};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Column {
    At(usize),
    EndOfFile,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameLocation {
    pub file: String,
    pub line: usize,
    pub column: Column,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    pub item: ItemRef,
    pub name: String,
    pub location: Option<FrameLocation>,
}

/// Reconstructs the stack of the suspended `location`, innermost frame first.
///
/// The walk goes from an edge to its source vertex, from a vertex to its subgraph and from there
/// up the chain of enclosing subgraphs. Items missing from the graph end the walk early. The last
/// frame always stands for the whole workunit and points at `program`.
pub fn build(model: &GraphModel, location: &SuspendedLocation, program: &str) -> Vec<Frame> {
    enum Cursor {
        Edge(String),
        Vertex(String),
        Subgraph(String),
        Root,
    }

    let finished = location.state == "finished";
    let at_end = finished || location.state == "graph end";
    let push = |frames: &mut Vec<Frame>, item: ItemRef, at_end: bool| {
        let location = model
            .nearest_definition(&item, at_end)
            .map(|definition| FrameLocation {
                file: definition.file,
                line: definition.line,
                column: Column::At(definition.column),
            });
        frames.push(Frame {
            name: item.id.clone(),
            item,
            location,
        });
    };

    let mut cursor = if let Some(id) = &location.edge_id {
        Cursor::Edge(id.clone())
    } else if let Some(id) = &location.vertex_id {
        Cursor::Vertex(id.clone())
    } else if let Some(id) = &location.subgraph_id {
        Cursor::Subgraph(id.clone())
    } else {
        Cursor::Root
    };

    let mut frames = vec![];
    // An edge and a vertex, then at most every subgraph once.
    for _ in 0..model.subgraph_count() + 2 {
        cursor = match cursor {
            Cursor::Edge(id) => match model.edge(&id) {
                Some(edge) => {
                    push(&mut frames, ItemRef::new(ItemKind::Edge, id), false);
                    Cursor::Vertex(edge.source.clone())
                }
                None => Cursor::Root,
            },
            Cursor::Vertex(id) => match model.vertex(&id) {
                Some(vertex) => {
                    push(&mut frames, ItemRef::new(ItemKind::Vertex, id), false);
                    vertex.parent.clone().map_or(Cursor::Root, Cursor::Subgraph)
                }
                None => Cursor::Root,
            },
            Cursor::Subgraph(id) => match model.subgraph(&id) {
                Some(subgraph) => {
                    push(&mut frames, ItemRef::new(ItemKind::Subgraph, id), at_end);
                    subgraph.parent.clone().map_or(Cursor::Root, Cursor::Subgraph)
                }
                None => Cursor::Root,
            },
            Cursor::Root => break,
        };
    }

    frames.push(Frame {
        item: ItemRef::new(ItemKind::Root, model.root.id.clone()),
        name: model.root.id.clone(),
        location: Some(FrameLocation {
            file: program.to_string(),
            line: 0,
            column: if finished {
                Column::EndOfFile
            } else {
                Column::At(0)
            },
        }),
    });
    frames
}

impl Inspection {
    /// Builds the stack of `location` and hands out fresh frame handles for it.
    pub fn stack_trace(
        &mut self,
        model: Arc<GraphModel>,
        location: &SuspendedLocation,
        program: &str,
        args: &StackTraceArguments,
    ) -> StackTraceResponse {
        self.reset();

        let frames = build(&model, location, program);
        let total_frames = frames.len();
        let start_frame = args.start_frame.unwrap_or_default();
        let levels = args
            .levels
            .and_then(|it| if it == 0 { None } else { Some(it) })
            .unwrap_or(usize::MAX);

        let stack_frames = frames
            .into_iter()
            .skip(start_frame)
            .take(levels)
            .map(|frame| {
                let (source, line, column) = match frame.location {
                    Some(location) => {
                        let name = Path::new(&location.file)
                            .file_name()
                            .map(|it| it.to_string_lossy().to_string());
                        let column = match location.column {
                            Column::At(column) => column,
                            Column::EndOfFile => END_OF_FILE_COLUMN,
                        };
                        let source = Source {
                            name,
                            path: Some(location.file),
                            ..Default::default()
                        };
                        (Some(source), location.line, column)
                    }
                    None => (None, 0, 0),
                };
                StackFrame {
                    id: self
                        .stack_frame_ids
                        .create(FrameTarget {
                            model: model.clone(),
                            item: frame.item,
                        })
                        .get(),
                    name: frame.name,
                    source,
                    line,
                    column,
                    can_restart: Some(false),
                    presentation_hint: Some(StackFramePresentationhint::Normal),
                }
            })
            .collect();

        StackTraceResponse {
            stack_frames,
            total_frames: Some(total_frames),
        }
    }
}

/// What a stack frame handle resolves to: an item of the graph the frame was built from.
#[derive(Clone, Debug)]
pub struct FrameTarget {
    pub model: Arc<GraphModel>,
    pub item: ItemRef,
}
