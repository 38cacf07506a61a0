use crate::remote::{StepGranularity, SuspendedLocation};

/// The level at which the engine is currently halted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Granularity {
    Edge,
    Vertex,
    Subgraph,
    Top,
}

impl Granularity {
    pub fn of(location: &SuspendedLocation) -> Self {
        if location.edge_id.is_some() {
            Granularity::Edge
        } else if location.vertex_id.is_some() {
            Granularity::Vertex
        } else if location.subgraph_id.is_some() {
            Granularity::Subgraph
        } else {
            Granularity::Top
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepRequest {
    Next,
    StepIn,
    StepOut,
    Continue,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RemoteCommand {
    Step(StepGranularity),
    Resume,
}

impl StepRequest {
    /// What to send to the engine for this request while halted at `granularity`.
    ///
    /// `next` and `stepIn` only differ at the top level, where `next` resumes and `stepIn` steps
    /// into the first graph.
    pub fn command(self, granularity: Granularity) -> RemoteCommand {
        use Granularity::{Edge, Subgraph, Top, Vertex};
        use StepRequest::{Continue, Next, StepIn, StepOut};

        match (self, granularity) {
            (Continue, _) => RemoteCommand::Resume,
            (Next | StepIn, Edge | Vertex) => RemoteCommand::Step(StepGranularity::Edge),
            (Next | StepIn, Subgraph) => RemoteCommand::Step(StepGranularity::Graph),
            (Next, Top) => RemoteCommand::Resume,
            (StepIn, Top) => RemoteCommand::Step(StepGranularity::Graph),
            (StepOut, Edge | Vertex | Subgraph) => RemoteCommand::Step(StepGranularity::Graph),
            (StepOut, Top) => RemoteCommand::Resume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(edge: Option<&str>, vertex: Option<&str>, subgraph: Option<&str>) -> SuspendedLocation {
        SuspendedLocation {
            edge_id: edge.map(str::to_string),
            vertex_id: vertex.map(str::to_string),
            subgraph_id: subgraph.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn granularity_prefers_the_most_specific_id() {
        assert_eq!(Granularity::of(&location(Some("e"), Some("v"), Some("s"))), Granularity::Edge);
        assert_eq!(Granularity::of(&location(None, Some("v"), Some("s"))), Granularity::Vertex);
        assert_eq!(Granularity::of(&location(None, None, Some("s"))), Granularity::Subgraph);
        assert_eq!(Granularity::of(&SuspendedLocation::default()), Granularity::Top);
    }

    #[test]
    fn step_out_of_an_edge_steps_a_graph() {
        let granularity = Granularity::of(&location(Some("X"), None, None));
        assert_eq!(
            StepRequest::StepOut.command(granularity),
            RemoteCommand::Step(StepGranularity::Graph),
        );
        assert_eq!(
            StepRequest::Next.command(granularity),
            RemoteCommand::Step(StepGranularity::Edge),
        );
    }

    #[test]
    fn top_level_next_resumes_but_step_in_steps() {
        let top = Granularity::Top;
        assert_eq!(StepRequest::Continue.command(top), RemoteCommand::Resume);
        assert_eq!(StepRequest::Next.command(top), RemoteCommand::Resume);
        assert_eq!(StepRequest::StepOut.command(top), RemoteCommand::Resume);
        assert_eq!(
            StepRequest::StepIn.command(top),
            RemoteCommand::Step(StepGranularity::Graph),
        );
    }

    #[test]
    fn next_and_step_in_agree_below_the_top() {
        for granularity in [Granularity::Edge, Granularity::Vertex, Granularity::Subgraph] {
            assert_eq!(
                StepRequest::Next.command(granularity),
                StepRequest::StepIn.command(granularity),
            );
        }
        assert_eq!(
            StepRequest::Next.command(Granularity::Subgraph),
            RemoteCommand::Step(StepGranularity::Graph),
        );
        assert_eq!(
            StepRequest::Continue.command(Granularity::Edge),
            RemoteCommand::Resume,
        );
    }
}
