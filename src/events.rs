use serde::Serialize;
use serde_json::Value;

use crate::types::{OutputEventCategory, StoppedEventReason, ThreadEventReason};

/// Arguments for a Continued event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContinuedEventBody {
    /// The thread which was continued.
    pub thread_id: usize,
    /// If `allThreadsContinued` is true, a debug adapter can announce that all threads have
    /// continued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_threads_continued: Option<bool>,
}

/// Arguments for an Output event.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutputEventBody {
    /// The output category. If not specified or if the category is not
    /// understood by the client, `console` is assumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<OutputEventCategory>,
    /// The output to report.
    pub output: String,
    /// Additional data to report. For the `telemetry` category the data is
    /// sent to telemetry, for the other categories the data is shown in JSON
    /// format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Arguments for a Stopped event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StoppedEventBody {
    /// The reason for the event.
    /// For backward compatibility this String is shown in the UI if the
    /// `description` attribute is missing (but it must not be translated).
    pub reason: StoppedEventReason,
    /// The full reason for the event, e.g. 'Paused on exception'. This String is
    /// shown in the UI as is and can be translated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The thread which was stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<usize>,
    /// If `allThreadsStopped` is true, a debug adapter can announce that all
    /// threads have stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_threads_stopped: Option<bool>,
}

/// Arguments for a Terminated event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TerminatedEventBody {
    /// A debug adapter may set `restart` to true (or to an arbitrary object) to
    /// request that the client restarts the session.
    pub restart: Option<Value>,
}

/// Arguments for a Thread event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ThreadEventBody {
    /// The reason for the event.
    pub reason: ThreadEventReason,
    /// The identifier of the thread.
    pub thread_id: usize,
}

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "event", content = "body", rename_all = "camelCase")]
pub enum EventBody {
    /// The event indicates that the execution of the debuggee has continued.
    ///
    /// Specification: [Continued event](https://microsoft.github.io/debug-adapter-protocol/specification#Events_Continued)
    Continued(ContinuedEventBody),
    /// This event indicates that the debug adapter is ready to accept configuration requests
    /// (e.g. `setBreakpoints`, `setExceptionBreakpoints`).
    ///
    /// Specification: [Initialized event](https://microsoft.github.io/debug-adapter-protocol/specification#Events_Initialized)
    Initialized,
    /// The event indicates that the target has produced some output.
    ///
    /// Specification: [Output event](https://microsoft.github.io/debug-adapter-protocol/specification#Events_Output)
    Output(OutputEventBody),
    /// The event indicates that the execution of the debuggee has stopped due to some condition.
    ///
    /// Specification: [Stopped event](https://microsoft.github.io/debug-adapter-protocol/specification#Events_Stopped)
    Stopped(StoppedEventBody),
    /// The event indicates that debugging of the debuggee has terminated. This does not mean that
    /// the debuggee itself has exited.
    ///
    /// Specification: [Terminated event](https://microsoft.github.io/debug-adapter-protocol/specification#Events_Terminated)
    Terminated(Option<TerminatedEventBody>),
    /// The event indicates that a thread has started or exited.
    ///
    /// Specification: [Thread event](https://microsoft.github.io/debug-adapter-protocol/specification#Events_Thread)
    Thread(ThreadEventBody),
    /// Announces the identity of a freshly created workunit. The body is the workunit's
    /// property bag as reported by the remote service.
    #[serde(rename = "WUCreated")]
    WorkunitCreated(Value),
}

/// Represents an event message.
///
/// The sequence number is assigned when the event is written to the client.
#[derive(Serialize, Debug, Clone)]
pub struct Event {
    /// "event"
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Type of event.
    #[serde(flatten)]
    pub body: EventBody,
}

impl Event {
    pub fn make_event(body: EventBody) -> Self {
        Self { kind: "event", body }
    }
}
