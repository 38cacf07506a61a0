use serde::Deserialize;
use serde_json::Value;

use crate::types::{Source, SourceBreakpoint, SteppingGranularity};

/// Arguments for an Initialize request.
/// In specification: [Initialize](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Initialize)
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InitializeArguments {
    /// The ID of the client using this adapter.
    #[serde(rename = "clientID")]
    pub client_id: Option<String>,
    /// The human-readable name of the client using this adapter.
    pub client_name: Option<String>,
    /// The ID of the debug adapter.
    #[serde(rename = "adapterID")]
    pub adapter_id: String,
    /// The ISO-639 locale of the client using this adapter, e.g. en-US or de-CH.
    pub locale: Option<String>,
    /// If true all line numbers are 1-based (default).
    pub lines_start_at1: Option<bool>,
    /// If true all column numbers are 1-based (default).
    pub columns_start_at1: Option<bool>,
    /// Client supports the `type` attribute for variables.
    pub supports_variable_type: Option<bool>,
    /// Client supports the paging of variables.
    pub supports_variable_paging: Option<bool>,
}

/// Arguments for an SetBreakpoints request.
/// In specification: [SetBreakpoints](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_SetBreakpoints)
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetBreakpointsArguments {
    /// The source location of the breakpoints, either `source.path` or
    /// `source.sourceReference` must be specified.
    pub source: Source,
    /// The code locations of the breakpoints.
    pub breakpoints: Option<Vec<SourceBreakpoint>>,
    /// Deprecated: The code locations of the breakpoints.
    pub lines: Option<Vec<usize>>,
    /// A value of true indicates that the underlying source has been modified
    /// which results in new breakpoint locations.
    pub source_modified: Option<bool>,
}

impl SetBreakpointsArguments {
    /// The requested lines, preferring `breakpoints` over the deprecated `lines`.
    pub fn requested_lines(&self) -> Vec<usize> {
        match (&self.breakpoints, &self.lines) {
            (Some(breakpoints), _) => breakpoints.iter().map(|it| it.line).collect(),
            (None, Some(lines)) => lines.clone(),
            (None, None) => vec![],
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetExceptionBreakpointsArguments {
    /// Set of exception filters specified by their ID.
    pub filters: Vec<String>,
}

/// Arguments for a Continue request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContinueArguments {
    /// Specifies the active thread.
    pub thread_id: usize,
    /// If this flag is true, execution is resumed only for the thread with given
    /// `threadId`.
    pub single_thread: Option<bool>,
}

/// Arguments for a Disconnect request.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectArguments {
    /// A value of true indicates that this `disconnect` request is part of a
    /// restart sequence.
    pub restart: Option<bool>,
    /// Indicates whether the debuggee should be terminated when the debugger is
    /// disconnected.
    pub terminate_debuggee: Option<bool>,
    /// Indicates whether the debuggee should stay suspended when the debugger is
    /// disconnected.
    pub suspend_debuggee: Option<bool>,
}

/// Arguments for an Evaluate request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateArguments {
    /// The expression to evaluate.
    pub expression: String,
    /// Evaluate the expression in the scope of this stack frame. If not specified,
    /// the expression is evaluated in the global scope.
    pub frame_id: Option<usize>,
    /// The context in which the evaluate request is used.
    pub context: Option<String>,
}

/// Arguments for a Next request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NextArguments {
    /// Specifies the thread for which to resume execution for one step (of the
    /// given granularity).
    pub thread_id: usize,
    /// If this flag is true, all other suspended threads are not resumed.
    pub single_thread: Option<bool>,
    /// Stepping granularity. If no granularity is specified, a granularity of
    /// `statement` is assumed.
    pub granularity: Option<SteppingGranularity>,
}

/// Arguments for a Pause request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PauseArguments {
    /// Pause execution for this thread.
    pub thread_id: usize,
}

/// Arguments for a Scopes request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScopesArguments {
    /// Retrieve the scopes for this stackframe.
    pub frame_id: usize,
}

/// Arguments for a StackTrace request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StackTraceArguments {
    /// Retrieve the stacktrace for this thread.
    pub thread_id: usize,
    /// The index of the first frame to return, if omitted frames start at 0.
    pub start_frame: Option<usize>,
    /// The maximum number of frames to return. If levels is not specified or 0,
    /// all frames are returned.
    pub levels: Option<usize>,
}

/// Arguments for a StepIn request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StepInArguments {
    /// Specifies the thread for which to resume execution for one step-into (of
    /// the given granularity).
    pub thread_id: usize,
    /// If this flag is true, all other suspended threads are not resumed.
    pub single_thread: Option<bool>,
    /// Id of the target to step into.
    pub target_id: Option<usize>,
    /// Stepping granularity. If no granularity is specified, a granularity of
    /// `statement` is assumed.
    pub granularity: Option<SteppingGranularity>,
}

/// Arguments for a StepOut request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StepOutArguments {
    /// Specifies the thread for which to resume execution for one step-out (of the
    /// given granularity).
    pub thread_id: usize,
    /// If this flag is true, all other suspended threads are not resumed.
    pub single_thread: Option<bool>,
    /// Stepping granularity. If no granularity is specified, a granularity of
    /// `statement` is assumed.
    pub granularity: Option<SteppingGranularity>,
}

/// Arguments for a Variables request.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VariablesArguments {
    /// The Variable reference.
    pub variables_reference: usize,
    /// The index of the first variable to return, if omitted children start at 0.
    pub start: Option<usize>,
    /// The number of variables to return. If count is missing or 0, all variables
    /// are returned.
    pub count: Option<usize>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "command", content = "arguments", rename_all = "camelCase")]
pub enum Command {
    /// This request indicates that the client has finished initialization of the debug adapter.
    ///
    /// Specification: [ConfigurationDone](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_ConfigurationDone)
    ConfigurationDone(Option<Value>),
    /// The request resumes execution of all threads.
    ///
    /// Specification: [Continue request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Continue)
    Continue(ContinueArguments),
    /// The `disconnect` request asks the debug adapter to disconnect from the debuggee (thus ending
    /// the debug session) and then to shut down itself (the debug adapter).
    ///
    /// Specification: [Disconnect request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Disconnect)
    Disconnect(Option<DisconnectArguments>),
    /// Evaluates the given expression in the context of the topmost stack frame.
    ///
    /// Specification: [Evaluate request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Evaluate)
    Evaluate(EvaluateArguments),
    /// The initialize request is sent as the first request from the client to the debug adapter in
    /// order to configure it with client capabilities and to retrieve capabilities from the debug
    /// adapter.
    ///
    /// Specification: [Initialize request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Initialize)
    Initialize(InitializeArguments),
    /// This launch request is sent from the client to the debug adapter to start the debuggee.
    /// The arguments are adapter specific and are parsed into a
    /// [`LaunchConfig`](crate::config::LaunchConfig) by the session.
    ///
    /// Specification: [Launch request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Launch)
    Launch(Value),
    /// The request executes one step (in the given granularity) for the specified thread and allows
    /// all other threads to run freely by resuming them.
    ///
    /// Specification: [Next request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Next)
    Next(NextArguments),
    /// The request suspends the debuggee.
    ///
    /// Specification: [Pause request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Pause)
    Pause(PauseArguments),
    /// The request returns the variable scopes for a given stackframe ID.
    ///
    /// Specification: [Scopes request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Scopes)
    Scopes(ScopesArguments),
    /// Sets multiple breakpoints for a single source and clears all previous breakpoints in that
    /// source.
    ///
    /// Specification: [SetBreakpoints request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_SetBreakpoints)
    SetBreakpoints(SetBreakpointsArguments),
    /// The request configures the debugger's response to thrown exceptions.
    ///
    /// Specification: [SetExceptionBreakpoints](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_SetExceptionBreakpoints)
    SetExceptionBreakpoints(SetExceptionBreakpointsArguments),
    /// The request returns a stacktrace from the current execution state of a given thread.
    ///
    /// Specification: [StackTrace request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_StackTrace)
    StackTrace(StackTraceArguments),
    /// The request resumes the given thread to step into a function/method and allows all other
    /// threads to run freely by resuming them.
    ///
    /// Specification: [StepIn request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_StepIn)
    StepIn(StepInArguments),
    /// The request resumes the given thread to step out (return) from a function/method and allows
    /// all other threads to run freely by resuming them.
    ///
    /// Specification: [StepOut request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_StepOut)
    StepOut(StepOutArguments),
    /// The request retrieves a list of all threads.
    ///
    /// Specification: [Threads request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Threads)
    Threads,
    /// Retrieves all child variables for the given variable reference.
    ///
    /// Specification: [Variables request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Variables)
    Variables(VariablesArguments),
}

impl Command {
    /// The wire name of the command, as used in the `command` field of requests and responses.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ConfigurationDone(_) => "configurationDone",
            Command::Continue(_) => "continue",
            Command::Disconnect(_) => "disconnect",
            Command::Evaluate(_) => "evaluate",
            Command::Initialize(_) => "initialize",
            Command::Launch(_) => "launch",
            Command::Next(_) => "next",
            Command::Pause(_) => "pause",
            Command::Scopes(_) => "scopes",
            Command::SetBreakpoints(_) => "setBreakpoints",
            Command::SetExceptionBreakpoints(_) => "setExceptionBreakpoints",
            Command::StackTrace(_) => "stackTrace",
            Command::StepIn(_) => "stepIn",
            Command::StepOut(_) => "stepOut",
            Command::Threads => "threads",
            Command::Variables(_) => "variables",
        }
    }
}

/// Represents a request from a client.
///
/// Note that unlike the specification, this implementation does not define a ProtocolMessage base
/// interface. Instead, the only common part (the sequence number) is repeated in the struct.
///
/// Specification: [Request](https://microsoft.github.io/debug-adapter-protocol/specification#Base_Protocol_Request)
#[derive(Deserialize, Debug, Clone)]
pub struct Request {
    /// Sequence number for the Request.
    pub seq: i64,
    /// The command to execute.
    ///
    /// This is stringly typed in the specification, but represented as an enum for better
    /// ergonomics in Rust code, along with the arguments when present.
    #[serde(flatten)]
    pub command: Command,
}

/// The part of a request every message carries, used to answer requests whose command could not
/// be parsed.
#[derive(Deserialize, Debug, Clone)]
pub struct RequestHeader {
    pub seq: i64,
    pub command: String,
}

impl RequestHeader {
    const KNOWN_COMMANDS: [&'static str; 16] = [
        "configurationDone",
        "continue",
        "disconnect",
        "evaluate",
        "initialize",
        "launch",
        "next",
        "pause",
        "scopes",
        "setBreakpoints",
        "setExceptionBreakpoints",
        "stackTrace",
        "stepIn",
        "stepOut",
        "threads",
        "variables",
    ];

    /// Whether the command is one [`Command`] can represent, i.e. a parse failure is caused by
    /// malformed arguments rather than an unsupported command.
    pub fn is_known(&self) -> bool {
        Self::KNOWN_COMMANDS.contains(&self.command.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_breakpoints() {
        let request: Request = serde_json::from_str(
            r#"{"seq":3,"type":"request","command":"setBreakpoints","arguments":{"source":{"name":"hello.ecl","path":"/src/hello.ecl"},"lines":[4,9],"breakpoints":[{"line":4},{"line":9}],"sourceModified":false}}"#,
        )
        .unwrap();
        assert_eq!(request.seq, 3);
        let Command::SetBreakpoints(args) = request.command else {
            panic!("wrong command: {:?}", request.command);
        };
        assert_eq!(args.source.path.as_deref(), Some("/src/hello.ecl"));
        assert_eq!(args.requested_lines(), vec![4, 9]);
    }

    #[test]
    fn parses_commands_without_arguments() {
        let request: Request =
            serde_json::from_str(r#"{"seq":7,"type":"request","command":"threads"}"#).unwrap();
        assert!(matches!(request.command, Command::Threads));

        let request: Request = serde_json::from_str(
            r#"{"seq":8,"type":"request","command":"configurationDone"}"#,
        )
        .unwrap();
        assert_eq!(request.command.name(), "configurationDone");
    }

    #[test]
    fn unknown_commands_still_expose_their_header() {
        let raw = r#"{"seq":11,"type":"request","command":"readMemory","arguments":{"memoryReference":"0x0","count":4}}"#;
        assert!(serde_json::from_str::<Request>(raw).is_err());
        let header: RequestHeader = serde_json::from_str(raw).unwrap();
        assert_eq!(header.seq, 11);
        assert_eq!(header.command, "readMemory");
        assert!(!header.is_known());
    }
}
