use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

use crate::responses::ResponseMessage;

/// What the remote service should do with a submitted workunit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WorkunitAction {
    Run,
    Compile,
    Debug,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LaunchMode {
    #[default]
    Debug,
    Submit,
    Compile,
}

/// The adapter specific arguments of a `launch` request.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfig {
    pub program: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eclcc_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_include_folders")]
    pub include_folders: Vec<String>,
    #[serde(default)]
    pub legacy_mode: bool,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_server_address")]
    pub server_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub reject_unauthorized: bool,
    #[serde(default = "default_target_cluster")]
    pub target_cluster: String,
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub mode: LaunchMode,
    #[serde(default)]
    pub no_debug: bool,
}

fn default_protocol() -> String {
    "http".to_string()
}
fn default_server_address() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    8010
}
fn default_target_cluster() -> String {
    "hthor".to_string()
}
fn default_result_limit() -> usize {
    100
}

/// Include folders may be given as a list or as a single comma-separated string.
fn deserialize_include_folders<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Folders {
        Joined(String),
        List(Vec<String>),
    }

    let folders = match Option::<Folders>::deserialize(deserializer)? {
        None => vec![],
        Some(Folders::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
        Some(Folders::List(list)) => list,
    };
    Ok(folders
        .into_iter()
        .map(|it| it.trim().to_string())
        .filter(|it| !it.is_empty())
        .collect())
}

#[derive(Debug, Error)]
pub enum LaunchConfigError {
    #[error("The launch configuration has no program.")]
    ProgramMissing,
    #[error("Invalid launch configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl From<LaunchConfigError> for ResponseMessage {
    fn from(error: LaunchConfigError) -> Self {
        match error {
            LaunchConfigError::ProgramMissing => ResponseMessage::error("program-missing"),
            LaunchConfigError::Invalid(_) => ResponseMessage::error("launch-config-invalid"),
        }
    }
}

impl LaunchConfig {
    pub fn from_arguments(arguments: Value) -> Result<Self, LaunchConfigError> {
        let has_program = arguments
            .get("program")
            .and_then(Value::as_str)
            .is_some_and(|it| !it.trim().is_empty());
        if !has_program {
            return Err(LaunchConfigError::ProgramMissing);
        }
        Ok(serde_json::from_value(arguments)?)
    }

    pub fn action(&self) -> WorkunitAction {
        if self.no_debug {
            return WorkunitAction::Run;
        }
        match self.mode {
            LaunchMode::Debug => WorkunitAction::Debug,
            LaunchMode::Compile => WorkunitAction::Compile,
            LaunchMode::Submit => WorkunitAction::Run,
        }
    }

    pub fn include_folders(&self) -> &[String] {
        &self.include_folders
    }

    /// The job name shown by the remote service: the program's file name without extension.
    pub fn job_name(&self) -> String {
        Path::new(&self.program)
            .file_stem()
            .map(|it| it.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.clone())
    }

    /// The body of the `WUCreated` event: this configuration plus the id of the new job.
    pub fn created_event_body(&self, wuid: &str) -> Value {
        let mut body = serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()));
        if let Value::Object(fields) = &mut body {
            fields.insert("wuid".to_string(), Value::String(wuid.to_string()));
        }
        body
    }

    pub fn wu_details_url(&self, wuid: &str) -> String {
        format!(
            "{}://{}:{}/?Wuid={wuid}&Widget=WUDetailsWidget",
            self.protocol, self.server_address, self.port,
        )
    }
}
