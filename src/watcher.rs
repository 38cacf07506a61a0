//! Turns the status stream of a workunit into `stopped` and `terminated` events.

use std::str::FromStr;
use tokio::{select, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    client::ClientSender,
    events::{EventBody, StoppedEventBody},
    remote::{JobStatus, Subscription},
    types::StoppedEventReason,
};

/// How the engine's debug state labels are treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateClass {
    /// The engine halted and waits for a command.
    Halt,
    /// The engine is running between halts.
    Transient,
    Unknown,
}

impl StateClass {
    pub fn of(label: &str) -> Self {
        match label {
            "created" | "finished" | "graph start" | "graph end" | "edge" | "node"
            | "exception" => StateClass::Halt,
            "debug_running" => StateClass::Transient,
            _ => StateClass::Unknown,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WatchEvent {
    Stopped {
        /// The engine's state label.
        reason: String,
        /// The halt follows a pause request of the client.
        paused: bool,
    },
    Terminated,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WatchOutput {
    /// A new status line for the debug console.
    pub status_line: Option<String>,
    pub event: Option<WatchEvent>,
}

#[derive(Debug, Default)]
pub struct StateWatcher {
    last_sequence: Option<String>,
    last_status_line: Option<String>,
    pause_requested: bool,
    terminated: bool,
}

impl StateWatcher {
    /// Makes the next notification count even if it repeats the last sequence number.
    pub fn expect_pause(&mut self) {
        self.pause_requested = true;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn on_notification(&mut self, status: &JobStatus) -> WatchOutput {
        let mut output = WatchOutput::default();
        if self.terminated {
            return output;
        }

        let status_line = status_line(status);
        if self.last_status_line.as_ref() != Some(&status_line) {
            self.last_status_line = Some(status_line.clone());
            output.status_line = Some(status_line);
        }

        if status.complete {
            self.terminated = true;
            output.event = Some(WatchEvent::Terminated);
            return output;
        }

        let location = &status.debug;
        if !self.pause_requested && self.last_sequence.as_ref() == Some(&location.sequence) {
            return output;
        }
        let paused = std::mem::take(&mut self.pause_requested);
        self.last_sequence = Some(location.sequence.clone());

        match StateClass::of(&location.state) {
            StateClass::Halt => {
                output.event = Some(WatchEvent::Stopped {
                    reason: location.state.clone(),
                    paused,
                })
            }
            StateClass::Transient => {}
            StateClass::Unknown => debug!("Ignoring the unknown debug state `{}`.", location.state),
        }
        output
    }
}

/// `<wuid>:  <state>` plus, while debugging, `(<sequence>) - <debug state>(<location>)`.
fn status_line(status: &JobStatus) -> String {
    let debug_message = if status.debugging {
        let location = status
            .debug
            .id()
            .map(|id| format!("({id})"))
            .unwrap_or_default();
        format!(
            "({}) - {}{location}",
            status.debug.sequence, status.debug.state,
        )
    } else {
        String::new()
    };
    format!("{}:  {}{debug_message}", status.wuid, status.state)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WatcherCommand {
    ExpectPause,
}

/// Feeds `subscription` through `watcher` and reports the results to the client, until the
/// workunit terminates, the subscription ends, or `cancel` fires.
pub async fn run(
    mut watcher: StateWatcher,
    mut subscription: Subscription,
    mut commands: mpsc::UnboundedReceiver<WatcherCommand>,
    client: ClientSender,
    cancel: CancellationToken,
) {
    loop {
        select! {
            biased;
            _ = cancel.cancelled() => break,
            Some(command) = commands.recv() => match command {
                WatcherCommand::ExpectPause => watcher.expect_pause(),
            },
            status = subscription.recv() => {
                let Some(status) = status else {
                    debug!("The status subscription ended.");
                    break;
                };
                debug!("Debug state: {:?}", status.debug);
                let output = watcher.on_notification(&status);
                if cancel.is_cancelled() {
                    break;
                }
                if let Some(status_line) = output.status_line {
                    client.output(status_line);
                }
                match output.event {
                    Some(WatchEvent::Stopped { reason, paused }) => {
                        let (reason, description) = if paused {
                            (StoppedEventReason::Pause, Some(reason))
                        } else {
                            let label = StoppedEventReason::from_str(&reason)
                                .unwrap_or(StoppedEventReason::String(reason));
                            (label, None)
                        };
                        client.send_event(EventBody::Stopped(StoppedEventBody {
                            reason,
                            description,
                            thread_id: Some(0),
                            all_threads_stopped: None,
                        }));
                    }
                    Some(WatchEvent::Terminated) => {
                        client.send_event(EventBody::Terminated(None));
                        break;
                    }
                    None => {}
                }
            },
        }
    }
    debug!("The watcher stopped.");
}
