//! Everything the client can look at while the workunit is suspended.
//!
//! Stack frames and variable scopes are handed to the client as small integer handles. Both tables
//! start a new epoch with every stack trace, so handles of an older trace are rejected instead of
//! resolving against a graph that no longer describes the workunit.

use self::{handles::HandleTable, stack_trace::FrameTarget, variable::VariablesKey};

pub mod handles;
pub mod scope;
pub mod stack_trace;
pub mod variable;

pub use self::handles::HandleError;

/// Number of rows previewed for an edge's results.
pub const RESULT_PREVIEW_ROWS: usize = 10;

#[derive(Default)]
pub struct Inspection {
    stack_frame_ids: HandleTable<FrameTarget>,
    variables_ids: HandleTable<VariablesKey>,
}

impl Inspection {
    /// Invalidates all handles, e.g. because the workunit moved on.
    pub fn reset(&mut self) {
        self.stack_frame_ids.reset();
        self.variables_ids.reset();
    }
}
