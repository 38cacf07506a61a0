//! A snapshot of the execution graph of a workunit.
//!
//! Subgraphs nest, vertices live in subgraphs and edges connect vertices. The graph is read-only
//! once built and a fresh one is fetched for every stack trace.

use linked_hash_map::LinkedHashMap;
use std::fmt::{self, Display, Formatter};

pub type Attributes = LinkedHashMap<String, String>;

/// The attribute holding an item's source location, e.g. `/src/hello.ecl(12,5)`.
pub const DEFINITION_ATTRIBUTE: &str = "definition";
pub const LABEL_ATTRIBUTE: &str = "label";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ItemKind {
    Edge,
    Vertex,
    Subgraph,
    /// The graph itself, standing for the whole job.
    Root,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: String,
}
impl ItemRef {
    pub fn new(kind: ItemKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SourceDefinition {
    pub file: String,
    pub line: usize,
    pub column: usize,
}
impl SourceDefinition {
    /// Parses `<file>(<line>,<column>)`. The file itself may contain parentheses.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().strip_suffix(')')?;
        let open = text.rfind('(')?;
        let (line, column) = text[open + 1..].split_once(',')?;
        let file = text[..open].trim();
        if file.is_empty() {
            return None;
        }
        Some(Self {
            file: file.to_string(),
            line: line.trim().parse().ok()?,
            column: column.trim().parse().ok()?,
        })
    }
}
impl Display for SourceDefinition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}({},{})", self.file, self.line, self.column)
    }
}

#[derive(Clone, Debug)]
pub struct GraphItem {
    pub id: String,
    pub kind: ItemKind,
    pub attributes: Attributes,
    /// The containing subgraph, `None` for top-level items.
    pub parent: Option<String>,
}
impl GraphItem {
    pub fn definition(&self) -> Option<SourceDefinition> {
        self.attributes
            .get(DEFINITION_ATTRIBUTE)
            .and_then(|it| SourceDefinition::parse(it))
    }
    pub fn label(&self) -> &str {
        self.attributes
            .get(LABEL_ATTRIBUTE)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub item: GraphItem,
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug)]
pub struct GraphModel {
    pub root: GraphItem,
    subgraphs: LinkedHashMap<String, GraphItem>,
    vertices: LinkedHashMap<String, GraphItem>,
    edges: LinkedHashMap<String, Edge>,
}

impl GraphModel {
    pub fn new(id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            root: GraphItem {
                id: id.into(),
                kind: ItemKind::Root,
                attributes,
                parent: None,
            },
            subgraphs: LinkedHashMap::new(),
            vertices: LinkedHashMap::new(),
            edges: LinkedHashMap::new(),
        }
    }

    pub fn add_subgraph(
        &mut self,
        id: impl Into<String>,
        parent: Option<&str>,
        attributes: Attributes,
    ) -> &mut Self {
        let id = id.into();
        self.subgraphs.insert(
            id.clone(),
            GraphItem {
                id,
                kind: ItemKind::Subgraph,
                attributes,
                parent: parent.map(str::to_string),
            },
        );
        self
    }
    pub fn add_vertex(
        &mut self,
        id: impl Into<String>,
        parent: Option<&str>,
        attributes: Attributes,
    ) -> &mut Self {
        let id = id.into();
        self.vertices.insert(
            id.clone(),
            GraphItem {
                id,
                kind: ItemKind::Vertex,
                attributes,
                parent: parent.map(str::to_string),
            },
        );
        self
    }
    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        parent: Option<&str>,
        attributes: Attributes,
    ) -> &mut Self {
        let id = id.into();
        self.edges.insert(
            id.clone(),
            Edge {
                item: GraphItem {
                    id,
                    kind: ItemKind::Edge,
                    attributes,
                    parent: parent.map(str::to_string),
                },
                source: source.into(),
                target: target.into(),
            },
        );
        self
    }

    pub fn subgraph(&self, id: &str) -> Option<&GraphItem> {
        self.subgraphs.get(id)
    }
    pub fn vertex(&self, id: &str) -> Option<&GraphItem> {
        self.vertices.get(id)
    }
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }
    pub fn subgraph_count(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn item(&self, item: &ItemRef) -> Option<&GraphItem> {
        match item.kind {
            ItemKind::Edge => self.edge(&item.id).map(|it| &it.item),
            ItemKind::Vertex => self.vertex(&item.id),
            ItemKind::Subgraph => self.subgraph(&item.id),
            ItemKind::Root => Some(&self.root),
        }
    }

    /// Subgraphs directly inside `parent`, or the top-level ones for `None`.
    pub fn subgraphs_of<'a>(
        &'a self,
        parent: Option<&'a str>,
    ) -> impl Iterator<Item = &'a GraphItem> + 'a {
        self.subgraphs
            .values()
            .filter(move |it| it.parent.as_deref() == parent)
    }
    pub fn vertices_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a GraphItem> + 'a {
        self.vertices
            .values()
            .filter(move |it| it.parent.as_deref() == Some(parent))
    }
    pub fn out_edges_of<'a>(&'a self, vertex: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |it| it.source == vertex)
    }

    /// The closest known source location of an item.
    ///
    /// Items without a `definition` of their own borrow one: edges from their source vertex,
    /// subgraphs from the first of their vertices (or the last one with `at_end`), and everything
    /// else from the enclosing subgraphs.
    pub fn nearest_definition(&self, item: &ItemRef, at_end: bool) -> Option<SourceDefinition> {
        let mut parent = match item.kind {
            ItemKind::Root => return self.root.definition(),
            ItemKind::Edge => {
                let edge = self.edge(&item.id)?;
                if let Some(definition) = edge.item.definition() {
                    return Some(definition);
                }
                match self.vertex(&edge.source) {
                    Some(vertex) => {
                        if let Some(definition) = vertex.definition() {
                            return Some(definition);
                        }
                        vertex.parent.clone()
                    }
                    None => edge.item.parent.clone(),
                }
            }
            ItemKind::Vertex => {
                let vertex = self.vertex(&item.id)?;
                if let Some(definition) = vertex.definition() {
                    return Some(definition);
                }
                vertex.parent.clone()
            }
            ItemKind::Subgraph => Some(item.id.clone()),
        };

        // Parent links form a tree, the bound only guards against malformed input.
        for _ in 0..=self.subgraph_count() {
            let subgraph = self.subgraph(parent.as_deref()?)?;
            if let Some(definition) = self.subgraph_definition(subgraph, at_end) {
                return Some(definition);
            }
            parent = subgraph.parent.clone();
        }
        None
    }

    fn subgraph_definition(&self, subgraph: &GraphItem, at_end: bool) -> Option<SourceDefinition> {
        if let Some(definition) = subgraph.definition() {
            return Some(definition);
        }
        let mut definitions = self.vertices_of(&subgraph.id).filter_map(GraphItem::definition);
        if at_end {
            definitions.last()
        } else {
            definitions.next()
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn attributes(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// `A(root) ⊃ B(subgraph) ⊃ C(vertex) ⊃ D(edge from C)`
    pub fn nested_graph() -> GraphModel {
        let mut graph = GraphModel::new("A", attributes(&[("label", "W1")]));
        graph
            .add_subgraph("B", None, attributes(&[("label", "graph1")]))
            .add_vertex(
                "C",
                Some("B"),
                attributes(&[("label", "Disk Read"), ("definition", "/src/hello.ecl(3,1)")]),
            )
            .add_vertex(
                "E",
                Some("B"),
                attributes(&[("label", "Output"), ("definition", "/src/hello.ecl(9,1)")]),
            )
            .add_edge("D", "C", "E", Some("B"), attributes(&[("count", "42")]));
        graph
    }

    #[test]
    fn parses_definitions() {
        assert_eq!(
            SourceDefinition::parse("C:\\work (old)\\hello.ecl(12,5)"),
            Some(SourceDefinition {
                file: "C:\\work (old)\\hello.ecl".to_string(),
                line: 12,
                column: 5,
            }),
        );
        assert_eq!(SourceDefinition::parse("hello.ecl"), None);
        assert_eq!(SourceDefinition::parse("(1,2)"), None);
        assert_eq!(SourceDefinition::parse("hello.ecl(x,2)"), None);
    }

    #[test]
    fn edges_borrow_the_definition_of_their_source() {
        let graph = nested_graph();
        let definition = graph
            .nearest_definition(&ItemRef::new(ItemKind::Edge, "D"), false)
            .unwrap();
        assert_eq!(definition.to_string(), "/src/hello.ecl(3,1)");
    }

    #[test]
    fn subgraphs_use_their_first_or_last_vertex() {
        let graph = nested_graph();
        let subgraph = ItemRef::new(ItemKind::Subgraph, "B");
        assert_eq!(graph.nearest_definition(&subgraph, false).unwrap().line, 3);
        assert_eq!(graph.nearest_definition(&subgraph, true).unwrap().line, 9);
    }

    #[test]
    fn lists_children() {
        let graph = nested_graph();
        let subgraphs: Vec<_> = graph.subgraphs_of(None).map(|it| it.id.as_str()).collect();
        assert_eq!(subgraphs, vec!["B"]);
        let vertices: Vec<_> = graph.vertices_of("B").map(|it| it.label()).collect();
        assert_eq!(vertices, vec!["Disk Read", "Output"]);
        let edges: Vec<_> = graph.out_edges_of("C").map(|it| it.item.id.as_str()).collect();
        assert_eq!(edges, vec!["D"]);
        assert_eq!(graph.out_edges_of("E").count(), 0);
    }

    #[test]
    fn cyclic_parents_do_not_hang() {
        let mut graph = GraphModel::new("A", Attributes::new());
        graph
            .add_subgraph("X", Some("Y"), Attributes::new())
            .add_subgraph("Y", Some("X"), Attributes::new());
        assert_eq!(
            graph.nearest_definition(&ItemRef::new(ItemKind::Subgraph, "X"), false),
            None,
        );
    }
}
