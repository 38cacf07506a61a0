use super::{variable::VariablesKey, HandleError, Inspection};
use crate::{
    graph::ItemKind,
    requests::ScopesArguments,
    responses::ScopesResponse,
    types::{Scope, ScopePresentationhint},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScopeKind {
    /// The attributes of the item itself.
    Local,
    OutEdges,
    Subgraphs,
    Vertices,
    /// A preview of the rows that passed an edge.
    Results,
    Breakpoints,
    /// The properties of the workunit.
    WorkunitRoot,
    RowDetail,
}

impl ScopeKind {
    /// The scopes shown for a frame of the given kind, with their display name and whether they
    /// are expensive to load.
    pub fn for_item(kind: ItemKind) -> &'static [(ScopeKind, &'static str, bool)] {
        match kind {
            ItemKind::Edge => &[
                (ScopeKind::Results, "Results", false),
                (ScopeKind::Local, "Local", false),
            ],
            ItemKind::Vertex => &[
                (ScopeKind::Local, "Local", false),
                (ScopeKind::OutEdges, "Out Edges", false),
            ],
            ItemKind::Subgraph => &[
                (ScopeKind::Local, "Local", false),
                (ScopeKind::Subgraphs, "Subgraphs", false),
                (ScopeKind::Vertices, "Vertices", false),
            ],
            ItemKind::Root => &[
                (ScopeKind::WorkunitRoot, "Local", false),
                (ScopeKind::Subgraphs, "Graphs", false),
                (ScopeKind::Breakpoints, "Debug", true),
            ],
        }
    }
}

impl Inspection {
    pub fn scopes(&mut self, args: &ScopesArguments) -> Result<ScopesResponse, HandleError> {
        let frame = self.stack_frame_ids.get(args.frame_id)?.clone();

        let scopes = ScopeKind::for_item(frame.item.kind)
            .iter()
            .map(|&(kind, name, expensive)| Scope {
                name: name.to_string(),
                presentation_hint: match kind {
                    ScopeKind::Local | ScopeKind::WorkunitRoot => {
                        Some(ScopePresentationhint::Locals)
                    }
                    _ => None,
                },
                variables_reference: self.variables_ids.create(VariablesKey::Scope {
                    frame: frame.clone(),
                    kind,
                }),
                named_variables: None,
                expensive,
            })
            .collect();
        Ok(ScopesResponse { scopes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::tests::nested_graph, remote::SuspendedLocation, requests::StackTraceArguments};
    use std::sync::Arc;

    fn trace(inspection: &mut Inspection) -> Vec<usize> {
        let location = SuspendedLocation {
            edge_id: Some("D".to_string()),
            state: "edge".to_string(),
            ..Default::default()
        };
        let args = StackTraceArguments {
            thread_id: 0,
            start_frame: None,
            levels: None,
        };
        inspection
            .stack_trace(Arc::new(nested_graph()), &location, "p.ecl", &args)
            .stack_frames
            .iter()
            .map(|it| it.id)
            .collect()
    }

    fn scope_names(inspection: &mut Inspection, frame_id: usize) -> Vec<(String, bool)> {
        inspection
            .scopes(&ScopesArguments { frame_id })
            .unwrap()
            .scopes
            .into_iter()
            .map(|it| (it.name, it.expensive))
            .collect()
    }

    #[test]
    fn scopes_depend_on_the_frame_kind() {
        let mut inspection = Inspection::default();
        let frames = trace(&mut inspection);
        let names = |inspection: &mut Inspection, index: usize| -> Vec<String> {
            scope_names(inspection, frames[index])
                .into_iter()
                .map(|(name, _)| name)
                .collect()
        };

        assert_eq!(names(&mut inspection, 0), vec!["Results", "Local"]);
        assert_eq!(names(&mut inspection, 1), vec!["Local", "Out Edges"]);
        assert_eq!(names(&mut inspection, 2), vec!["Local", "Subgraphs", "Vertices"]);
        assert_eq!(
            scope_names(&mut inspection, frames[3]),
            vec![
                ("Local".to_string(), false),
                ("Graphs".to_string(), false),
                ("Debug".to_string(), true),
            ],
        );
    }

    #[test]
    fn frames_of_a_discarded_trace_are_rejected() {
        let mut inspection = Inspection::default();
        let old = trace(&mut inspection);
        let new = trace(&mut inspection);

        assert_eq!(
            inspection.scopes(&ScopesArguments { frame_id: old[0] }).unwrap_err(),
            HandleError::Stale(old[0]),
        );
        assert!(inspection.scopes(&ScopesArguments { frame_id: new[0] }).is_ok());
        assert_eq!(
            inspection.scopes(&ScopesArguments { frame_id: 999 }).unwrap_err(),
            HandleError::Unknown(999),
        );
    }
}
