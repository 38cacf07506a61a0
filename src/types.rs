#![allow(clippy::to_string_trait_impl)]

use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::errors::DeserializationError;
use crate::{fromstr_deser, tostr_ser};
use std::num::NonZeroUsize;

/// Column reported for a frame that sits at the very end of its source. Clients are written in
/// JavaScript, so this is the largest integer they can represent exactly.
pub const END_OF_FILE_COLUMN: usize = (1 << 53) - 1;

/// Information about the capabilities of a debug adapter.
///
/// Only the capabilities this adapter has an opinion about are listed. Everything omitted is
/// treated as unsupported by clients.
///
/// Specification: [Capabilities](https://microsoft.github.io/debug-adapter-protocol/specification#Types_Capabilities)
#[derive(Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// The debug adapter supports the `configurationDone` request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_configuration_done_request: Option<bool>,
    /// The debug adapter supports function breakpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_function_breakpoints: Option<bool>,
    /// The debug adapter supports conditional breakpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_conditional_breakpoints: Option<bool>,
    /// The debug adapter supports breakpoints that break execution after a
    /// specified number of hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_hit_conditional_breakpoints: Option<bool>,
    /// The debug adapter supports a (side effect free) `evaluate` request for data
    /// hovers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_evaluate_for_hovers: Option<bool>,
    /// The debug adapter supports stepping back via the `stepBack` and
    /// `reverseContinue` requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_step_back: Option<bool>,
    /// The debug adapter supports setting a variable to a value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_set_variable: Option<bool>,
    /// The debug adapter supports restarting a frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_restart_frame: Option<bool>,
    /// The debug adapter supports the `gotoTargets` request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_goto_targets_request: Option<bool>,
    /// The debug adapter supports the `stepInTargets` request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_step_in_targets_request: Option<bool>,
    /// The debug adapter supports the `completions` request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_completions_request: Option<bool>,
    /// The debug adapter supports the delayed loading of parts of the stack, which
    /// requires that both the `startFrame` and `levels` arguments and the
    /// `totalFrames` result of the `stackTrace` request are supported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_delayed_stack_trace_loading: Option<bool>,
    /// The debug adapter supports the `terminate` request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_terminate_request: Option<bool>,
}

/// A Source is a descriptor for source code.
///
/// It is returned from the debug adapter as part of a StackFrame and it is used by clients when
/// specifying breakpoints.
///
/// Specification: [Source](https://microsoft.github.io/debug-adapter-protocol/specification#Types_Source)
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// The short name of the source. Every source returned from the debug adapter
    /// has a name.
    /// When sending a source to the debug adapter this name is optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The path of the source to be shown in the UI.
    /// It is only used to locate and load the content of the source if no
    /// `sourceReference` is specified (or its value is 0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// If the value > 0 the contents of the source must be retrieved through the
    /// `source` request (even if a path is specified).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<i32>,
    /// A hint for how to present the source in the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_hint: Option<PresentationHint>,
    /// The origin of this source. For example, 'internal module', 'inlined content
    /// from source map', etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SourceBreakpoint {
    /// The source line of the breakpoint or logpoint.
    pub line: usize,
    /// Start position within source line of the breakpoint or logpoint.
    pub column: Option<usize>,
    /// The expression for conditional breakpoints.
    /// It is only honored by a debug adapter if the corresponding capability
    /// `supportsConditionalBreakpoints` is true.
    pub condition: Option<String>,
    /// The expression that controls how many hits of the breakpoint are ignored.
    pub hit_condition: Option<String>,
    /// If this attribute exists and is non-empty, the debug adapter must not
    /// 'break' (stop) but log the message instead.
    pub log_message: Option<String>,
}

/// Information about a breakpoint created in a setBreakpoints request.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    /// The identifier for the breakpoint. It is needed if breakpoint events are
    /// used to update or remove breakpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    /// If true, the breakpoint could be set (but not necessarily at the desired
    /// location).
    pub verified: bool,
    /// A message about the state of the breakpoint.
    /// This is shown to the user and can be used to explain why a breakpoint could
    /// not be verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The source where the breakpoint is located.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// The start line of the actual range covered by the breakpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Start position of the source range covered by the breakpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

#[derive(Serialize, Debug, Clone)]
pub enum PresentationHint {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "emphasize")]
    Emphasize,
    #[serde(rename = "deemphasize")]
    DeEmphasize,
}

impl FromStr for PresentationHint {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(PresentationHint::Normal),
            "emphasize" => Ok(PresentationHint::Emphasize),
            "deemphasize" => Ok(PresentationHint::DeEmphasize),
            other => Err(DeserializationError::StringToEnumParseError {
                enum_name: "PresentationHint".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

fromstr_deser! {PresentationHint}

#[derive(Debug, Clone)]
pub enum OutputEventCategory {
    Console,
    Important,
    Stdout,
    Stderr,
    Telemetry,
    String(String),
}

impl FromStr for OutputEventCategory {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(OutputEventCategory::Console),
            "important" => Ok(OutputEventCategory::Important),
            "stdout" => Ok(OutputEventCategory::Stdout),
            "stderr" => Ok(OutputEventCategory::Stderr),
            "telemetry" => Ok(OutputEventCategory::Telemetry),
            other => Ok(OutputEventCategory::String(other.to_string())),
        }
    }
}

impl ToString for OutputEventCategory {
    fn to_string(&self) -> String {
        match &self {
            OutputEventCategory::Console => "console",
            OutputEventCategory::Important => "important",
            OutputEventCategory::Stdout => "stdout",
            OutputEventCategory::Stderr => "stderr",
            OutputEventCategory::Telemetry => "telemetry",
            OutputEventCategory::String(other) => other,
        }
        .to_string()
    }
}

fromstr_deser! { OutputEventCategory }
tostr_ser! { OutputEventCategory }

/// The reason a `stopped` event is sent.
///
/// The remote engine reports its own halt labels (`graph start`, `edge`, ...), those end up in
/// the `String` variant and are shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoppedEventReason {
    Step,
    Breakpoint,
    Exception,
    Pause,
    Entry,
    Goto,
    Function,
    Data,
    Instruction,
    String(String),
}

impl FromStr for StoppedEventReason {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "step" => Ok(StoppedEventReason::Step),
            "breakpoint" => Ok(StoppedEventReason::Breakpoint),
            "exception" => Ok(StoppedEventReason::Exception),
            "pause" => Ok(StoppedEventReason::Pause),
            "entry" => Ok(StoppedEventReason::Entry),
            "goto" => Ok(StoppedEventReason::Goto),
            "function" => Ok(StoppedEventReason::Function),
            "data" => Ok(StoppedEventReason::Data),
            "instruction" => Ok(StoppedEventReason::Instruction),
            other => Ok(StoppedEventReason::String(other.to_string())),
        }
    }
}

impl ToString for StoppedEventReason {
    fn to_string(&self) -> String {
        match &self {
            StoppedEventReason::Step => "step",
            StoppedEventReason::Breakpoint => "breakpoint",
            StoppedEventReason::Exception => "exception",
            StoppedEventReason::Pause => "pause",
            StoppedEventReason::Entry => "entry",
            StoppedEventReason::Goto => "goto",
            StoppedEventReason::Function => "function",
            StoppedEventReason::Data => "data",
            StoppedEventReason::Instruction => "instruction",
            StoppedEventReason::String(other) => other,
        }
        .to_string()
    }
}

fromstr_deser! { StoppedEventReason }
tostr_ser! { StoppedEventReason }

#[derive(Debug, Clone)]
pub enum ThreadEventReason {
    Started,
    Exited,
    String(String),
}

impl FromStr for ThreadEventReason {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(ThreadEventReason::Started),
            "exited" => Ok(ThreadEventReason::Exited),
            other => Ok(ThreadEventReason::String(other.to_string())),
        }
    }
}

impl ToString for ThreadEventReason {
    fn to_string(&self) -> String {
        match &self {
            ThreadEventReason::Started => "started",
            ThreadEventReason::Exited => "exited",
            ThreadEventReason::String(other) => other,
        }
        .to_string()
    }
}

fromstr_deser! { ThreadEventReason }
tostr_ser! { ThreadEventReason }

/// The granularity of one 'step' in the stepping requests `next`, `stepIn`, `stepOut`, and
/// `stepBack`.
///
/// The remote engine picks its own granularity, so this is accepted but ignored.
#[derive(Debug, Clone)]
pub enum SteppingGranularity {
    Statement,
    Line,
    Instruction,
}

impl FromStr for SteppingGranularity {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "statement" => Ok(SteppingGranularity::Statement),
            "line" => Ok(SteppingGranularity::Line),
            "instruction" => Ok(SteppingGranularity::Instruction),
            other => Err(DeserializationError::StringToEnumParseError {
                enum_name: "SteppingGranularity".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

fromstr_deser! { SteppingGranularity }

/// Specification: [Scope](https://microsoft.github.io/debug-adapter-protocol/specification#Types_Scope)
#[derive(Debug, Clone)]
pub enum ScopePresentationhint {
    /// Scope contains method arguments.
    Arguments,
    /// Scope contains local variables.
    Locals,
    /// Scope contains registers. Only a single `registers` scope
    /// should be returned from a `scopes` request.
    Registers,
    String(String),
}

impl FromStr for ScopePresentationhint {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arguments" => Ok(ScopePresentationhint::Arguments),
            "locals" => Ok(ScopePresentationhint::Locals),
            "registers" => Ok(ScopePresentationhint::Registers),
            other => Ok(ScopePresentationhint::String(other.to_string())),
        }
    }
}

impl ToString for ScopePresentationhint {
    fn to_string(&self) -> String {
        match &self {
            ScopePresentationhint::Arguments => "arguments",
            ScopePresentationhint::Locals => "locals",
            ScopePresentationhint::Registers => "registers",
            ScopePresentationhint::String(other) => other,
        }
        .to_string()
    }
}

fromstr_deser! { ScopePresentationhint }
tostr_ser! { ScopePresentationhint }

/// A Scope is a named container for variables. Optionally a scope can map to a source or a range
/// within a source.
///
/// Specification: [Scope](https://microsoft.github.io/debug-adapter-protocol/specification#Types_Scope)
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    /// Name of the scope such as 'Arguments', 'Locals', or 'Registers'. This
    /// String is shown in the UI as is and can be translated.
    pub name: String,
    /// A hint for how to present this scope in the UI. If this attribute is
    /// missing, the scope is shown with a generic UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_hint: Option<ScopePresentationhint>,
    /// The variables of this scope can be retrieved by passing the value of
    /// `variablesReference` to the `variables` request.
    pub variables_reference: NonZeroUsize,
    /// The number of named variables in this scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_variables: Option<usize>,
    /// If true, the number of variables in this scope is large or expensive to
    /// retrieve.
    pub expensive: bool,
}

#[derive(Debug, Clone)]
pub enum StackFramePresentationhint {
    Normal,
    Label,
    Subtle,
}

impl FromStr for StackFramePresentationhint {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(StackFramePresentationhint::Normal),
            "label" => Ok(StackFramePresentationhint::Label),
            "subtle" => Ok(StackFramePresentationhint::Subtle),
            other => Err(DeserializationError::StringToEnumParseError {
                enum_name: "StackFramePresentationhint".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl ToString for StackFramePresentationhint {
    fn to_string(&self) -> String {
        match &self {
            StackFramePresentationhint::Normal => "normal",
            StackFramePresentationhint::Label => "label",
            StackFramePresentationhint::Subtle => "subtle",
        }
        .to_string()
    }
}

fromstr_deser! { StackFramePresentationhint }
tostr_ser! { StackFramePresentationhint }

/// A Stackframe contains the source location.
///
/// Specification: [StackFrame](https://microsoft.github.io/debug-adapter-protocol/specification#Types_StackFrame)
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    /// An identifier for the stack frame. It must be unique across all threads.
    /// This id can be used to retrieve the scopes of the frame with the `scopes`
    /// request.
    pub id: usize,
    /// The name of the stack frame, typically a method name.
    pub name: String,
    /// The source of the frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// The line within the source of the frame. If the source attribute is missing
    /// or doesn't exist, `line` is 0 and should be ignored by the client.
    pub line: usize,
    /// Start position of the range covered by the stack frame. If attribute
    /// `source` is missing or doesn't exist, `column` is 0 and should be ignored by
    /// the client.
    pub column: usize,
    /// Indicates whether this frame can be restarted with the `restart` request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_restart: Option<bool>,
    /// A hint for how to present this frame in the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_hint: Option<StackFramePresentationhint>,
}

/// A thread.
///
/// Specification: [Thread](https://microsoft.github.io/debug-adapter-protocol/specification#Types_Thread)
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// Unique identifier for the thread.
    pub id: usize,
    /// The name of the thread.
    pub name: String,
}

#[derive(Debug, Clone)]
pub enum VariablePresentationHintKind {
    Property,
    Data,
    Class,
    String(String),
}

impl FromStr for VariablePresentationHintKind {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "property" => Ok(VariablePresentationHintKind::Property),
            "data" => Ok(VariablePresentationHintKind::Data),
            "class" => Ok(VariablePresentationHintKind::Class),
            other => Ok(VariablePresentationHintKind::String(other.to_string())),
        }
    }
}

impl ToString for VariablePresentationHintKind {
    fn to_string(&self) -> String {
        match &self {
            VariablePresentationHintKind::Property => "property",
            VariablePresentationHintKind::Data => "data",
            VariablePresentationHintKind::Class => "class",
            VariablePresentationHintKind::String(other) => other,
        }
        .to_string()
    }
}

fromstr_deser! { VariablePresentationHintKind }
tostr_ser! { VariablePresentationHintKind }

#[derive(Debug, Clone)]
pub enum VariablePresentationHintAttributes {
    Static,
    Constant,
    ReadOnly,
    RawString,
    String(String),
}

impl FromStr for VariablePresentationHintAttributes {
    type Err = DeserializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(VariablePresentationHintAttributes::Static),
            "constant" => Ok(VariablePresentationHintAttributes::Constant),
            "readOnly" => Ok(VariablePresentationHintAttributes::ReadOnly),
            "rawString" => Ok(VariablePresentationHintAttributes::RawString),
            other => Ok(VariablePresentationHintAttributes::String(
                other.to_string(),
            )),
        }
    }
}

impl ToString for VariablePresentationHintAttributes {
    fn to_string(&self) -> String {
        match &self {
            VariablePresentationHintAttributes::Static => "static",
            VariablePresentationHintAttributes::Constant => "constant",
            VariablePresentationHintAttributes::ReadOnly => "readOnly",
            VariablePresentationHintAttributes::RawString => "rawString",
            VariablePresentationHintAttributes::String(other) => other,
        }
        .to_string()
    }
}

fromstr_deser! { VariablePresentationHintAttributes }
tostr_ser! { VariablePresentationHintAttributes }

/// Properties of a variable that can be used to determine how to render the variable in the UI.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VariablePresentationHint {
    /// The kind of variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<VariablePresentationHintKind>,
    /// Set of attributes represented as an array of Strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<VariablePresentationHintAttributes>>,
    /// If true, clients can present the variable with a UI that supports a
    /// specific gesture to trigger its evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,
}

/// A Variable is a name/value pair.
///
/// If the value is structured (has children), a handle is provided to retrieve the children with
/// the `variables` request.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// The variable's name.
    pub name: String,
    /// The variable's value.
    /// For structured variables (which do not have a simple value), it is
    /// recommended to provide a one-line representation of the structured object.
    pub value: String,
    /// The type of the variable's value. Typically shown in the UI when hovering
    /// over the value.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,
    /// Properties of a variable that can be used to determine how to render the
    /// variable in the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation_hint: Option<VariablePresentationHint>,
    /// If `variablesReference` is > 0, the variable is structured and its children
    /// can be retrieved by passing `variablesReference` to the `variables`
    /// request.
    pub variables_reference: usize,
    /// The number of named child variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_variables: Option<usize>,
}
