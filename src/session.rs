//! The debug session: answers the IDE's requests by driving one remote workunit.

use async_trait::async_trait;
use serde_json::Value;
use std::{fmt::Display, sync::Arc};
use tokio::{
    io::{AsyncBufRead, AsyncWrite},
    select,
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Level};

use crate::{
    adapter::Adapter,
    breakpoints::BreakpointManager,
    client::{ClientSender, MessageWriter},
    config::LaunchConfig,
    errors::ServerError,
    events::{ContinuedEventBody, EventBody, ThreadEventBody},
    inspect::{HandleError, Inspection},
    line_reader::BufLineReader,
    logger,
    remote::{RemoteError, RemoteService, StepGranularity, Workunit, WorkunitUpdate},
    requests::{Command, Request},
    responses::{
        ContinueResponse, EvaluateResponse, Response, ResponseBody, ResponseMessage,
        SetBreakpointsResponse, SetExceptionBreakpointsResponse, StackTraceResponse,
        ThreadsResponse,
    },
    server::serve,
    stepping::{Granularity, RemoteCommand, StepRequest},
    types::{Capabilities, Thread, ThreadEventReason},
    watcher::{self, StateWatcher, WatcherCommand},
};

/// Serves one debug session over `input` and `output` until the IDE disconnects.
///
/// Log records at or above `level` are mirrored into the IDE's debug console.
pub async fn run(
    service: Arc<dyn RemoteService>,
    input: impl AsyncBufRead + Unpin + Send,
    output: impl AsyncWrite + Unpin,
    level: Level,
) -> Result<(), ServerError> {
    let (client, mut messages) = ClientSender::channel();
    logger::init(client.clone(), level);
    let mut writer = MessageWriter::new(output);
    let mut reader = BufLineReader::new(input);
    let mut session = DebugSession::new(service);

    let result = {
        let serving = serve(&mut session, &mut reader, &client);
        tokio::pin!(serving);
        loop {
            select! {
                result = &mut serving => break result,
                Some(message) = messages.recv() => writer.write(&message).await?,
            }
        }
    };
    session.shutdown();
    writer.drain(&mut messages).await?;
    result
}

/// The single thread the IDE sees. The remote engine has no notion of threads.
const THREAD_ID: usize = 0;

pub struct DebugSession {
    service: Arc<dyn RemoteService>,
    config: Option<LaunchConfig>,
    workunit: Option<Arc<dyn Workunit>>,
    /// Set once the watcher task runs.
    watcher_commands: Option<mpsc::UnboundedSender<WatcherCommand>>,
    breakpoints: BreakpointManager,
    inspection: Inspection,
    cancel: CancellationToken,
}

#[async_trait]
impl Adapter for DebugSession {
    async fn handle_request(&mut self, request: Request, client: &ClientSender) -> Response {
        let response = match self.handle(&request, client).await {
            Ok(body) => Response::make_success(&request, body),
            Err(message) => Response::make_error(&request, message),
        };
        debug!(
            "Answering `{}` request {} (success: {}).",
            request.command.name(),
            request.seq,
            response.success,
        );
        response
    }
}

impl DebugSession {
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self {
            service,
            config: None,
            workunit: None,
            watcher_commands: None,
            breakpoints: BreakpointManager::default(),
            inspection: Inspection::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Stops the watcher and makes pending remote calls drop their results.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        self.watcher_commands = None;
        self.inspection.reset();
    }

    async fn handle(
        &mut self,
        request: &Request,
        client: &ClientSender,
    ) -> Result<ResponseBody, ResponseMessage> {
        match &request.command {
            Command::Initialize(_) => Ok(ResponseBody::Initialize(capabilities())),
            Command::Launch(arguments) => self.launch(arguments.clone(), client).await,
            Command::ConfigurationDone(_) => {
                self.start_watcher(client).await;
                Ok(ResponseBody::ConfigurationDone)
            }
            Command::SetBreakpoints(args) => {
                let breakpoints = match (&self.workunit, &args.source.path) {
                    (Some(workunit), Some(path)) => match self
                        .breakpoints
                        .set_breakpoints(workunit.as_ref(), path, &args.requested_lines())
                        .await
                    {
                        Ok(records) => records.iter().map(|it| it.to_breakpoint(path)).collect(),
                        Err(error) => {
                            error!("Failed to set the breakpoints of `{path}`: {error}");
                            vec![]
                        }
                    },
                    // Sources without a path are left alone.
                    _ => vec![],
                };
                Ok(ResponseBody::SetBreakpoints(SetBreakpointsResponse {
                    breakpoints,
                }))
            }
            Command::SetExceptionBreakpoints(_) => Ok(ResponseBody::SetExceptionBreakpoints(
                SetExceptionBreakpointsResponse {
                    breakpoints: Some(vec![]),
                },
            )),
            Command::Threads => Ok(ResponseBody::Threads(ThreadsResponse {
                threads: vec![Thread {
                    id: THREAD_ID,
                    name: "main".to_string(),
                }],
            })),
            Command::StackTrace(args) => {
                let empty = StackTraceResponse {
                    stack_frames: vec![],
                    total_frames: Some(0),
                };
                let (Some(workunit), Some(config)) = (&self.workunit, &self.config) else {
                    return Ok(ResponseBody::StackTrace(empty));
                };
                let status = workunit.status();
                if !status.debugging {
                    return Ok(ResponseBody::StackTrace(empty));
                }
                match workunit.debug_graph().await {
                    Ok(model) => Ok(ResponseBody::StackTrace(self.inspection.stack_trace(
                        Arc::new(model),
                        &status.debug,
                        &config.program,
                        args,
                    ))),
                    Err(error) => {
                        error!("Failed to fetch the graph of `{}`: {error}", status.wuid);
                        self.inspection.reset();
                        Ok(ResponseBody::StackTrace(empty))
                    }
                }
            }
            Command::Scopes(args) => self
                .inspection
                .scopes(args)
                .map(ResponseBody::Scopes)
                .map_err(rejected_handle),
            Command::Variables(args) => {
                let workunit = self.workunit()?;
                self.inspection
                    .variables(args, workunit.as_ref())
                    .await
                    .map(ResponseBody::Variables)
                    .map_err(rejected_handle)
            }
            Command::Continue(_) => {
                self.step(StepRequest::Continue)?;
                client.send_event(EventBody::Continued(ContinuedEventBody {
                    thread_id: THREAD_ID,
                    all_threads_continued: Some(true),
                }));
                Ok(ResponseBody::Continue(ContinueResponse {
                    all_threads_continued: Some(true),
                }))
            }
            Command::Next(_) => {
                self.step(StepRequest::Next)?;
                Ok(ResponseBody::Next)
            }
            Command::StepIn(_) => {
                self.step(StepRequest::StepIn)?;
                Ok(ResponseBody::StepIn)
            }
            Command::StepOut(_) => {
                self.step(StepRequest::StepOut)?;
                Ok(ResponseBody::StepOut)
            }
            Command::Pause(_) => {
                let workunit = self.workunit()?;
                if let Some(commands) = &self.watcher_commands {
                    if commands.send(WatcherCommand::ExpectPause).is_err() {
                        debug!("The watcher already stopped.");
                    }
                }
                self.control(workunit, Control::Pause);
                Ok(ResponseBody::Pause)
            }
            Command::Evaluate(_) => Ok(ResponseBody::Evaluate(EvaluateResponse {
                result: String::new(),
                variables_reference: 0,
            })),
            Command::Disconnect(_) => {
                self.disconnect(client).await;
                client.request_exit();
                Ok(ResponseBody::Disconnect)
            }
        }
    }

    fn workunit(&self) -> Result<Arc<dyn Workunit>, ResponseMessage> {
        self.workunit
            .clone()
            .ok_or_else(|| ResponseMessage::error("not-launched"))
    }

    async fn launch(
        &mut self,
        arguments: Value,
        client: &ClientSender,
    ) -> Result<ResponseBody, ResponseMessage> {
        debug!("Launch arguments: {arguments}");
        let config = match LaunchConfig::from_arguments(arguments) {
            Ok(config) => config,
            Err(error) => {
                launch_failed(client, &error);
                return Err(error.into());
            }
        };

        match self.submit(&config, client).await {
            Ok(workunit) => {
                self.workunit = Some(workunit.clone());
                self.announce_when_running(workunit, client.clone());
            }
            Err(error) => launch_failed(client, &error),
        }
        self.config = Some(config);
        Ok(ResponseBody::Launch)
    }

    async fn submit(
        &self,
        config: &LaunchConfig,
        client: &ClientSender,
    ) -> Result<Arc<dyn Workunit>, RemoteError> {
        client.output("Locating Client Tools.");
        let compiler = self.service.locate_client_tools(config).await?;
        client.output(format!("Client Tools:  {}", compiler.display()));
        client.output("Generating archive.");
        let archive = self.service.create_archive(config, compiler).await?;

        client.output("Creating workunit.");
        let workunit = self.service.create_workunit(config).await?;
        let wuid = workunit.wuid();
        client.send_event(EventBody::WorkunitCreated(
            config.created_event_body(&wuid),
        ));
        workunit
            .update(WorkunitUpdate {
                job_name: config.job_name(),
                query_text: archive,
                file_path: config.program.clone(),
            })
            .await?;

        client.output(format!("Submitting workunit:  {wuid}"));
        workunit
            .submit(&config.target_cluster, config.action(), config.result_limit)
            .await?;
        client.output(format!("Submitted:  {}", config.wu_details_url(&wuid)));
        Ok(workunit)
    }

    /// Tells the IDE it may configure the session once the workunit runs.
    fn announce_when_running(&self, workunit: Arc<dyn Workunit>, client: ClientSender) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let result = workunit.wait_until_running().await;
            if cancel.is_cancelled() {
                return;
            }
            match result {
                Ok(()) => {
                    client.send_event(EventBody::Initialized);
                    client.send_event(EventBody::Thread(ThreadEventBody {
                        reason: ThreadEventReason::Started,
                        thread_id: THREAD_ID,
                    }));
                }
                Err(error) => error!("`{}` never started running: {error}", workunit.wuid()),
            }
        });
    }

    async fn start_watcher(&mut self, client: &ClientSender) {
        if self.watcher_commands.is_some() {
            debug!("The watcher is already running.");
            return;
        }
        let Some(workunit) = self.workunit.clone() else {
            warn!("There is no workunit to monitor.");
            return;
        };

        let wuid = workunit.wuid();
        client.output(format!("Monitoring:  {wuid}."));
        match workunit.watch().await {
            Ok(subscription) => {
                let (commands_sender, commands) = mpsc::unbounded_channel();
                self.watcher_commands = Some(commands_sender);
                tokio::spawn(watcher::run(
                    StateWatcher::default(),
                    subscription,
                    commands,
                    client.clone(),
                    self.cancel.child_token(),
                ));
            }
            Err(error) => error!("Failed to monitor `{wuid}`: {error}"),
        }
    }

    fn step(&self, request: StepRequest) -> Result<(), ResponseMessage> {
        let workunit = self.workunit()?;
        let granularity = Granularity::of(&workunit.status().debug);
        let command = request.command(granularity);
        debug!("{request:?} at {granularity:?} granularity: {command:?}");
        self.control(workunit, command.into());
        Ok(())
    }

    /// Sends `control` to the engine in the background and refreshes the status afterwards. The
    /// watcher reports where the engine ends up.
    fn control(&self, workunit: Arc<dyn Workunit>, control: Control) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let result = match control {
                Control::Step(granularity) => workunit.step(granularity).await,
                Control::Resume => workunit.resume().await,
                Control::Pause => workunit.pause().await,
            };
            if cancel.is_cancelled() {
                return;
            }
            if let Err(error) = result {
                error!("{control:?} failed: {error}");
            }
            if let Err(error) = workunit.refresh().await {
                error!("Failed to refresh `{}`: {error}", workunit.wuid());
            }
        });
    }

    async fn disconnect(&mut self, client: &ClientSender) {
        if let Some(workunit) = self.workunit.clone() {
            let wuid = workunit.wuid();
            let status = workunit.status();
            if !status.complete && status.debugging {
                client.output(format!("Aborting debug session:  {wuid}"));
                if let Err(error) = abort(workunit.as_ref()).await {
                    error!("Failed to abort `{wuid}`: {error}");
                }
            }
            self.shutdown();
            client.output(format!("Monitoring end:  {wuid}"));
        } else {
            self.shutdown();
        }
        info!("The debug session ended.");
    }
}

async fn abort(workunit: &dyn Workunit) -> Result<(), RemoteError> {
    workunit.quit().await?;
    workunit.abort().await?;
    workunit.refresh().await
}

#[derive(Clone, Copy, Debug)]
enum Control {
    Step(StepGranularity),
    Resume,
    Pause,
}
impl From<RemoteCommand> for Control {
    fn from(command: RemoteCommand) -> Self {
        match command {
            RemoteCommand::Step(granularity) => Control::Step(granularity),
            RemoteCommand::Resume => Control::Resume,
        }
    }
}

fn launch_failed(client: &ClientSender, error: &impl Display) {
    client.output(format!("Launch failed - {error}"));
    client.send_event(EventBody::Terminated(None));
}

fn rejected_handle(error: HandleError) -> ResponseMessage {
    warn!("Rejecting a request: {error}");
    ResponseMessage::error(error.code())
}

fn capabilities() -> Capabilities {
    Capabilities {
        supports_configuration_done_request: Some(true),
        supports_function_breakpoints: Some(false),
        supports_conditional_breakpoints: Some(false),
        supports_hit_conditional_breakpoints: Some(false),
        supports_evaluate_for_hovers: Some(false),
        supports_step_back: Some(false),
        supports_set_variable: Some(false),
        supports_restart_frame: Some(false),
        supports_goto_targets_request: Some(false),
        supports_step_in_targets_request: Some(false),
        supports_completions_request: Some(false),
        supports_delayed_stack_trace_loading: Some(true),
        supports_terminate_request: Some(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::Sendable,
        graph::tests::nested_graph,
        remote::{fake::FakeWorkunit, BreakpointCandidate, JobStatus, SuspendedLocation},
    };
    use serde_json::json;
    use std::path::PathBuf;

    struct FakeService {
        workunit: Arc<FakeWorkunit>,
        archive_fails: bool,
    }

    #[async_trait]
    impl RemoteService for FakeService {
        async fn locate_client_tools(&self, _config: &LaunchConfig) -> Result<PathBuf, RemoteError> {
            Ok(PathBuf::from("/opt/client/bin/eclcc"))
        }
        async fn create_archive(
            &self,
            _config: &LaunchConfig,
            _compiler: PathBuf,
        ) -> Result<String, RemoteError> {
            if self.archive_fails {
                return Err(RemoteError::Call {
                    call: "create_archive",
                    reason: "syntax error".to_string(),
                });
            }
            Ok("<Archive/>".to_string())
        }
        async fn create_workunit(
            &self,
            _config: &LaunchConfig,
        ) -> Result<Arc<dyn Workunit>, RemoteError> {
            Ok(self.workunit.clone())
        }
    }

    struct Harness {
        session: DebugSession,
        client: ClientSender,
        messages: mpsc::UnboundedReceiver<Sendable>,
        workunit: Arc<FakeWorkunit>,
        seq: i64,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_service(false)
        }

        fn with_service(archive_fails: bool) -> Self {
            let workunit = FakeWorkunit::debugging("W1");
            let service = FakeService {
                workunit: workunit.clone(),
                archive_fails,
            };
            let (client, messages) = ClientSender::channel();
            Self {
                session: DebugSession::new(Arc::new(service)),
                client,
                messages,
                workunit,
                seq: 0,
            }
        }

        async fn request(&mut self, command: &str, arguments: Value) -> Value {
            self.seq += 1;
            let mut raw = json!({ "seq": self.seq, "type": "request", "command": command });
            if !arguments.is_null() {
                raw["arguments"] = arguments;
            }
            let request: Request = serde_json::from_value(raw).unwrap();
            let response = self.session.handle_request(request, &self.client).await;
            serde_json::to_value(&response).unwrap()
        }

        async fn launch(&mut self) {
            let response = self
                .request("launch", json!({ "program": "/src/hello.ecl" }))
                .await;
            assert_eq!(response["success"], true);
            settle().await;
            self.workunit.state.lock().unwrap().calls.clear();
        }

        /// Everything sent to the client so far.
        fn sent(&mut self) -> Vec<Value> {
            let mut sent = vec![];
            while let Ok(message) = self.messages.try_recv() {
                sent.push(serde_json::to_value(&message).unwrap());
            }
            sent
        }

        fn sent_events(&mut self) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter_map(|it| {
                    let event = it["event"].as_str()?.to_string();
                    Some(match it["body"]["output"].as_str() {
                        Some(output) => output.trim_end().to_string(),
                        None => event,
                    })
                })
                .collect()
        }
    }

    /// Lets spawned tasks run until they block.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn initialize_declares_capabilities() {
        let mut harness = Harness::new();
        let response = harness.request("initialize", json!({ "adapterID": "ecl" })).await;
        assert_eq!(response["success"], true);
        assert_eq!(response["command"], "initialize");
        assert_eq!(response["body"]["supportsConfigurationDoneRequest"], true);
        assert_eq!(response["body"]["supportsConditionalBreakpoints"], false);
        assert_eq!(response["body"]["supportsStepBack"], false);
        assert!(harness.sent().is_empty());
    }

    #[tokio::test]
    async fn launch_submits_and_announces_the_workunit() {
        let mut harness = Harness::new();
        let response = harness
            .request("launch", json!({ "program": "/src/hello.ecl", "mode": "debug" }))
            .await;
        assert_eq!(response["success"], true);
        settle().await;

        assert_eq!(
            harness.workunit.calls(),
            vec!["update(hello)", "submit(hthor, Debug, 100)", "wait_until_running"],
        );
        let sent = harness.sent();
        let created = sent.iter().find(|it| it["event"] == "WUCreated").unwrap();
        assert_eq!(created["body"]["wuid"], "W1");
        assert_eq!(created["body"]["program"], "/src/hello.ecl");

        let events: Vec<String> = sent
            .iter()
            .filter_map(|it| {
                let event = it["event"].as_str()?;
                Some(match it["body"]["output"].as_str() {
                    Some(output) => output.trim_end().to_string(),
                    None => event.to_string(),
                })
            })
            .collect();
        assert_eq!(
            events,
            vec![
                "Locating Client Tools.",
                "Client Tools:  /opt/client/bin/eclcc",
                "Generating archive.",
                "Creating workunit.",
                "WUCreated",
                "Submitting workunit:  W1",
                "Submitted:  http://localhost:8010/?Wuid=W1&Widget=WUDetailsWidget",
                "initialized",
                "thread",
            ],
        );
    }

    #[tokio::test]
    async fn launch_without_program_is_rejected() {
        let mut harness = Harness::new();
        let response = harness.request("launch", json!({ "program": "" })).await;
        assert_eq!(response["success"], false);
        assert_eq!(response["message"], "program-missing");
        let events = harness.sent_events();
        assert_eq!(events.last().map(String::as_str), Some("terminated"));
        assert!(harness.workunit.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_builds_terminate_the_session() {
        let mut harness = Harness::with_service(true);
        let response = harness
            .request("launch", json!({ "program": "/src/hello.ecl" }))
            .await;
        assert_eq!(response["success"], true);
        assert_eq!(
            harness.sent_events(),
            vec![
                "Locating Client Tools.",
                "Client Tools:  /opt/client/bin/eclcc",
                "Generating archive.",
                "Launch failed - `create_archive` failed: syntax error",
                "terminated",
            ],
        );
        assert_eq!(harness.request("next", json!({ "threadId": 0 })).await["message"], "not-launched");
    }

    #[tokio::test]
    async fn threads_and_evaluate_are_static() {
        let mut harness = Harness::new();
        let threads = harness.request("threads", Value::Null).await;
        assert_eq!(threads["body"]["threads"], json!([{ "id": 0, "name": "main" }]));

        let evaluate = harness.request("evaluate", json!({ "expression": "x" })).await;
        assert_eq!(evaluate["body"]["result"], "");
    }

    #[tokio::test]
    async fn stack_traces_follow_the_suspended_location() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.workunit.state.lock().unwrap().graph = Some(nested_graph());
        harness.workunit.set_location(SuspendedLocation {
            edge_id: Some("D".to_string()),
            state: "edge".to_string(),
            sequence: "4".to_string(),
            ..Default::default()
        });

        let trace = harness.request("stackTrace", json!({ "threadId": 0 })).await;
        let frames = trace["body"]["stackFrames"].as_array().unwrap().clone();
        let names: Vec<_> = frames.iter().map(|it| it["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["D", "C", "B", "A"]);
        assert_eq!(frames[3]["source"]["path"], "/src/hello.ecl");
        let old_frame = frames[0]["id"].clone();

        let scopes = harness.request("scopes", json!({ "frameId": old_frame })).await;
        assert_eq!(scopes["body"]["scopes"][0]["name"], "Results");

        harness.request("stackTrace", json!({ "threadId": 0 })).await;
        let stale = harness.request("scopes", json!({ "frameId": old_frame })).await;
        assert_eq!(stale["success"], false);
        assert_eq!(stale["message"], "stale-handle");
    }

    #[tokio::test]
    async fn failed_graph_fetches_give_empty_traces() {
        let mut harness = Harness::new();
        harness.launch().await;
        let trace = harness.request("stackTrace", json!({ "threadId": 0 })).await;
        assert_eq!(trace["success"], true);
        assert_eq!(trace["body"]["stackFrames"], json!([]));
    }

    #[tokio::test]
    async fn breakpoints_are_verified_against_candidates() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.workunit.state.lock().unwrap().candidates = vec![
            BreakpointCandidate {
                id: "7".to_string(),
                line: 12,
            },
        ];

        let response = harness
            .request(
                "setBreakpoints",
                json!({
                    "source": { "path": "/src/hello.ecl" },
                    "breakpoints": [{ "line": 10 }, { "line": 30 }],
                }),
            )
            .await;
        let breakpoints = response["body"]["breakpoints"].as_array().unwrap();
        assert_eq!(breakpoints.len(), 1);
        assert_eq!(breakpoints[0]["id"], 1000);
        assert_eq!(breakpoints[0]["verified"], true);
        assert_eq!(breakpoints[0]["line"], 12);
        assert_eq!(harness.workunit.state.lock().unwrap().armed, vec!["7_0"]);
    }

    #[tokio::test]
    async fn sources_without_a_path_keep_armed_breakpoints() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.workunit.state.lock().unwrap().armed = vec!["9_0".to_string()];

        let response = harness
            .request(
                "setBreakpoints",
                json!({
                    "source": { "name": "untitled" },
                    "breakpoints": [{ "line": 3 }],
                }),
            )
            .await;
        assert_eq!(response["success"], true);
        assert_eq!(response["body"]["breakpoints"], json!([]));
        assert!(harness.workunit.calls().is_empty());
        assert_eq!(harness.workunit.state.lock().unwrap().armed, vec!["9_0"]);
    }

    #[tokio::test]
    async fn stepping_depends_on_the_granularity() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.workunit.set_location(SuspendedLocation {
            edge_id: Some("X".to_string()),
            ..Default::default()
        });
        harness.request("stepOut", json!({ "threadId": 0 })).await;
        settle().await;
        assert_eq!(harness.workunit.calls(), vec!["step(Graph)", "refresh"]);

        harness.workunit.state.lock().unwrap().calls.clear();
        harness.workunit.set_location(SuspendedLocation::default());
        harness.request("next", json!({ "threadId": 0 })).await;
        settle().await;
        harness.request("stepIn", json!({ "threadId": 0 })).await;
        settle().await;
        assert_eq!(
            harness.workunit.calls(),
            vec!["resume", "refresh", "step(Graph)", "refresh"],
        );
    }

    #[tokio::test]
    async fn continue_reports_continued_right_away() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.sent();

        let response = harness.request("continue", json!({ "threadId": 0 })).await;
        assert_eq!(response["body"]["allThreadsContinued"], true);
        assert_eq!(harness.sent_events(), vec!["continued"]);
        settle().await;
        assert_eq!(harness.workunit.calls(), vec!["resume", "refresh"]);
    }

    #[tokio::test]
    async fn watcher_reports_stops_after_configuration() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.sent();

        harness.request("configurationDone", Value::Null).await;
        harness.request("configurationDone", Value::Null).await;
        settle().await;
        assert_eq!(harness.workunit.calls(), vec!["watch"]);

        harness.workunit.notify(JobStatus {
            wuid: "W1".to_string(),
            state: "running".to_string(),
            complete: false,
            debugging: true,
            debug: SuspendedLocation {
                edge_id: Some("D".to_string()),
                state: "edge".to_string(),
                sequence: "2".to_string(),
                ..Default::default()
            },
        });
        settle().await;
        let events = harness.sent_events();
        assert_eq!(events[0], "Monitoring:  W1.");
        assert_eq!(events.last().map(String::as_str), Some("stopped"));
    }

    #[tokio::test]
    async fn pause_marks_the_next_stop_as_paused() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.request("configurationDone", Value::Null).await;
        settle().await;
        harness.sent();

        harness.request("pause", json!({ "threadId": 0 })).await;
        settle().await;
        let mut status = harness.workunit.status();
        status.debug.state = "edge".to_string();
        status.debug.sequence = "7".to_string();
        harness.workunit.notify(status);
        settle().await;

        let stopped = harness
            .sent()
            .into_iter()
            .find(|it| it["event"] == "stopped")
            .unwrap();
        assert_eq!(stopped["body"]["reason"], "pause");
        assert_eq!(stopped["body"]["description"], "edge");
    }

    #[tokio::test]
    async fn disconnect_aborts_a_running_debug_session() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.sent();

        let response = harness.request("disconnect", Value::Null).await;
        assert_eq!(response["success"], true);
        assert!(harness.client.get_exit_state());
        assert_eq!(harness.workunit.calls(), vec!["quit", "abort", "refresh"]);
        assert_eq!(
            harness.sent_events(),
            vec!["Aborting debug session:  W1", "Monitoring end:  W1"],
        );
    }

    #[tokio::test]
    async fn disconnect_leaves_finished_workunits_alone() {
        let mut harness = Harness::new();
        harness.launch().await;
        harness.workunit.state.lock().unwrap().status.complete = true;

        harness.request("disconnect", Value::Null).await;
        assert!(harness.workunit.calls().is_empty());
    }

    #[tokio::test]
    async fn run_serves_until_disconnect() {
        let workunit = FakeWorkunit::debugging("W1");
        let service = Arc::new(FakeService {
            workunit,
            archive_fails: false,
        });
        let frame = |json: &str| format!("Content-Length: {}\r\n\r\n{json}", json.len());
        let input = [
            frame(r#"{"seq":1,"type":"request","command":"threads"}"#),
            frame(r#"{"seq":2,"type":"request","command":"disconnect"}"#),
            frame(r#"{"seq":3,"type":"request","command":"threads"}"#),
        ]
        .concat();

        let mut output = vec![];
        run(service, input.as_bytes(), &mut output, Level::ERROR).await.unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(r#""request_seq":1"#), "{output}");
        assert!(output.contains(r#""request_seq":2"#), "{output}");
        assert!(!output.contains(r#""request_seq":3"#), "{output}");
    }
}
