//! The contract of the remote execution service the adapter drives.
//!
//! The adapter never talks HTTP itself; a [`RemoteService`] hands out [`Workunit`]s and everything
//! the debugger needs goes through them.

use async_trait::async_trait;
use linked_hash_map::LinkedHashMap;
use serde_json::Value;
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    config::{LaunchConfig, WorkunitAction},
    graph::GraphModel,
};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("`{call}` failed: {reason}")]
    Call { call: &'static str, reason: String },
}

/// Where the remote engine is currently halted.
///
/// At most one of the ids is set in practice. If several are, the edge wins over the vertex,
/// which wins over the subgraph.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SuspendedLocation {
    pub edge_id: Option<String>,
    pub vertex_id: Option<String>,
    pub subgraph_id: Option<String>,
    /// The engine's free-form state label, e.g. `graph start` or `debug_running`.
    pub state: String,
    /// Changes whenever the engine moves. Only compared for equality.
    pub sequence: String,
}

impl SuspendedLocation {
    /// The most specific id of the location.
    pub fn id(&self) -> Option<&str> {
        self.edge_id
            .as_deref()
            .or(self.vertex_id.as_deref())
            .or(self.subgraph_id.as_deref())
    }
}

/// A snapshot of the job record.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JobStatus {
    pub wuid: String,
    /// Human readable job state, e.g. `running` or `completed`.
    pub state: String,
    pub complete: bool,
    pub debugging: bool,
    pub debug: SuspendedLocation,
}

/// A location the engine accepts breakpoints at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BreakpointCandidate {
    pub id: String,
    pub line: usize,
}

/// A breakpoint currently armed in the engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveBreakpoint {
    pub id: String,
    pub action: String,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BreakpointMode {
    Edge,
}
impl BreakpointMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakpointMode::Edge => "edge",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BreakpointAction {
    Break,
}
impl BreakpointAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakpointAction::Break => "break",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepGranularity {
    Edge,
    Graph,
}

/// One previewed row of an edge's data, fields in column order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row(pub Vec<(String, Value)>);

impl Row {
    /// The row's values without their names, as shown in a one-line summary.
    pub fn summary(&self) -> String {
        Value::Array(self.0.iter().map(|(_, value)| value.clone()).collect()).to_string()
    }
}

/// Everything written into a fresh job record before it is submitted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkunitUpdate {
    pub job_name: String,
    pub query_text: String,
    pub file_path: String,
}

/// Status updates of a watched workunit. Dropping it ends the subscription.
pub type Subscription = mpsc::UnboundedReceiver<JobStatus>;

#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Finds the compiler matching the configuration and returns its path.
    async fn locate_client_tools(&self, config: &LaunchConfig) -> Result<PathBuf, RemoteError>;
    /// Compiles the program into an archive and returns the archive's text.
    async fn create_archive(
        &self,
        config: &LaunchConfig,
        compiler: PathBuf,
    ) -> Result<String, RemoteError>;
    async fn create_workunit(&self, config: &LaunchConfig)
        -> Result<Arc<dyn Workunit>, RemoteError>;
}

#[async_trait]
pub trait Workunit: Send + Sync {
    fn wuid(&self) -> String;
    /// The status as of the last refresh or watch notification.
    fn status(&self) -> JobStatus;
    /// The job's property bag as of the last refresh, in the order the service reported it.
    fn properties(&self) -> LinkedHashMap<String, String>;

    async fn update(&self, update: WorkunitUpdate) -> Result<(), RemoteError>;
    async fn submit(
        &self,
        cluster: &str,
        action: WorkunitAction,
        result_limit: usize,
    ) -> Result<(), RemoteError>;
    async fn wait_until_running(&self) -> Result<(), RemoteError>;
    async fn refresh(&self) -> Result<(), RemoteError>;
    /// Subscribes to status changes. The current status is delivered right away.
    async fn watch(&self) -> Result<Subscription, RemoteError>;

    async fn debug_graph(&self) -> Result<GraphModel, RemoteError>;
    async fn breakpoints_clear(&self) -> Result<(), RemoteError>;
    async fn breakpoints_valid(&self, path: &str) -> Result<Vec<BreakpointCandidate>, RemoteError>;
    async fn breakpoint_add(
        &self,
        location: &str,
        mode: BreakpointMode,
        action: BreakpointAction,
    ) -> Result<(), RemoteError>;
    async fn breakpoints_list(&self) -> Result<Vec<ActiveBreakpoint>, RemoteError>;
    async fn step(&self, granularity: StepGranularity) -> Result<(), RemoteError>;
    async fn resume(&self) -> Result<(), RemoteError>;
    async fn pause(&self) -> Result<(), RemoteError>;
    async fn print_rows(
        &self,
        edge_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Row>, RemoteError>;
    async fn quit(&self) -> Result<(), RemoteError>;
    async fn abort(&self) -> Result<(), RemoteError>;
}
