#![allow(clippy::to_string_trait_impl)]

use serde::Serialize;

use crate::{
    requests::{Command, Request},
    tostr_ser,
    types::{Breakpoint, Capabilities, Scope, StackFrame, Thread, Variable},
};

/// The short error string of a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMessage {
    /// Contains the raw error in short form if [`Response::success`](Response::success) is false.
    /// This raw error might be interpreted by the client and is not shown in the UI.
    Error(String),
}

impl ResponseMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ResponseMessage::Error(message.into())
    }
}

impl ToString for ResponseMessage {
    fn to_string(&self) -> String {
        match self {
            ResponseMessage::Error(message) => message.clone(),
        }
    }
}

tostr_ser! { ResponseMessage }

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContinueResponse {
    /// The value true (or a missing property) signals to the client that all
    /// threads have been resumed. The value false indicates that not all threads
    /// were resumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_threads_continued: Option<bool>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    /// The result of the evaluate request.
    pub result: String,
    /// If `variablesReference` is > 0, the evaluate result is structured and its
    /// children can be retrieved by passing `variablesReference` to the
    /// `variables` request.
    pub variables_reference: usize,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScopesResponse {
    /// The scopes of the stackframe. If the array has length zero, there are no
    /// scopes available.
    pub scopes: Vec<Scope>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetBreakpointsResponse {
    /// Information about the breakpoints.
    /// The array elements are in the same order as the elements of the
    /// `breakpoints` (or the deprecated `lines`) array in the arguments.
    pub breakpoints: Vec<Breakpoint>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetExceptionBreakpointsResponse {
    /// Information about the exception breakpoints or filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<Breakpoint>>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StackTraceResponse {
    /// The frames of the stackframe. If the array has length zero, there are no
    /// stackframes available.
    /// This means that there is no location information available.
    pub stack_frames: Vec<StackFrame>,
    /// The total number of frames available in the stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_frames: Option<usize>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ThreadsResponse {
    /// All threads.
    pub threads: Vec<Thread>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VariablesResponse {
    /// All (or a range) of variables for the given variable reference.
    pub variables: Vec<Variable>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "command", content = "body", rename_all = "camelCase")]
pub enum ResponseBody {
    /// Response to `configurationDone` request. This is just an acknowledgement, so no body field
    /// is required.
    ///
    /// Specification: [ConfigurationDone request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_ConfigurationDone)
    ConfigurationDone,
    /// Response to `continue` request.
    ///
    /// Specification: [Continue request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Continue)
    Continue(ContinueResponse),
    /// Response to `disconnect` request. This is just an acknowledgement, so no body field is
    /// required.
    ///
    /// Specification: [Disconnect request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Disconnect)
    Disconnect,
    /// Response to `evaluate` request.
    ///
    /// Specification: [Evaluate request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Evaluate)
    Evaluate(EvaluateResponse),
    /// Response to `initialize` request.
    ///
    /// Specification: [Initialize request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Initialize)
    Initialize(Capabilities),
    /// Response to `launch` request. This is just an acknowledgement, so no body field is
    /// required.
    ///
    /// Specification: [Launch request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Launch)
    Launch,
    /// Response to `next` request. This is just an acknowledgement, so no body field is required.
    ///
    /// Specification: [Next request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Next)
    Next,
    /// Response to `pause` request. This is just an acknowledgement, so no body field is required.
    ///
    /// Specification: [Pause request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Pause)
    Pause,
    /// Response to `scopes` request.
    ///
    /// Specification: [Scopes request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Scopes)
    Scopes(ScopesResponse),
    /// Response to `setBreakpoints` request.
    /// Returned is information about each breakpoint created by this request.
    ///
    /// Specification: [SetBreakpoints request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_SetBreakpoints)
    SetBreakpoints(SetBreakpointsResponse),
    /// Response to `setExceptionBreakpoints` request.
    ///
    /// Specification: [SetExceptionBreakpoints request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_SetExceptionBreakpoints)
    SetExceptionBreakpoints(SetExceptionBreakpointsResponse),
    /// Response to `stackTrace` request.
    ///
    /// Specification: [StackTrace request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_StackTrace)
    StackTrace(StackTraceResponse),
    /// Response to `stepIn` request. This is just an acknowledgement, so no body field is
    /// required.
    ///
    /// Specification: [StepIn request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_StepIn)
    StepIn,
    /// Response to `stepOut` request. This is just an acknowledgement, so no body field is
    /// required.
    ///
    /// Specification: [StepOut request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_StepOut)
    StepOut,
    /// Response to `threads` request.
    ///
    /// Specification: [Threads request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Threads)
    Threads(ThreadsResponse),
    /// Response to `variables` request.
    ///
    /// Specification: [Variables request](https://microsoft.github.io/debug-adapter-protocol/specification#Requests_Variables)
    Variables(VariablesResponse),
}

/// Represents a response message.
///
/// The sequence number of the message itself is assigned when it is written to the client.
#[derive(Serialize, Debug, Clone)]
pub struct Response {
    /// "response"
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Sequence number of the corresponding request.
    pub request_seq: i64,
    /// Outcome of the request.
    /// If true, the request was successful and the `body` attribute may contain
    /// the result of the request.
    /// If the value is false, the attribute `message` contains the error in short
    /// form and the `body` may contain additional information.
    pub success: bool,
    /// Contains the raw error in short form if `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<ResponseMessage>,
    /// The command of the request, for responses without a body. Responses with a body carry the
    /// command in the body's tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Contains request result if success is true and error details if success is false.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub body: Option<ResponseBody>,
}

impl Response {
    /// Create a successful response for a given request. The sequence number will be copied
    /// from `request`, `message` will be `None` (as its neither cancelled nor an error).
    /// The `body` argument contains the response itself.
    pub fn make_success(request: &Request, body: ResponseBody) -> Self {
        Self {
            kind: "response",
            request_seq: request.seq,
            success: true,
            message: None,
            command: None,
            body: Some(body),
        }
    }

    /// Create an error response for a given request. The sequence number will be copied
    /// from the request, `body` will be `None`.
    pub fn make_error(request: &Request, message: ResponseMessage) -> Self {
        Self::make_command_error(request.seq, request.command.name(), message)
    }

    /// Create an error response for a request whose command is only known by name, e.g. because
    /// this adapter does not implement it.
    pub fn make_command_error(seq: i64, command: &str, message: ResponseMessage) -> Self {
        Self {
            kind: "response",
            request_seq: seq,
            success: false,
            message: Some(message),
            command: Some(command.to_string()),
            body: None,
        }
    }

    /// Create an acknowledgement response. This is a shorthand for responding to requests
    /// where the response does not require a body.
    pub fn make_ack(request: &Request) -> Option<Self> {
        let body = match request.command {
            Command::ConfigurationDone(_) => ResponseBody::ConfigurationDone,
            Command::Disconnect(_) => ResponseBody::Disconnect,
            Command::Launch(_) => ResponseBody::Launch,
            Command::Next(_) => ResponseBody::Next,
            Command::Pause(_) => ResponseBody::Pause,
            Command::StepIn(_) => ResponseBody::StepIn,
            Command::StepOut(_) => ResponseBody::StepOut,
            _ => return None,
        };
        Some(Self::make_success(request, body))
    }
}
