//! Forwards log records to the debug console of the IDE.

use chrono::Local;
use std::fmt::{self, Write};
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{layer::Context, prelude::*, Layer};

use crate::client::ClientSender;

pub struct ClientLogLayer {
    client: ClientSender,
    level: Level,
}

impl ClientLogLayer {
    pub fn new(client: ClientSender, level: Level) -> Self {
        Self { client, level }
    }
}

impl<S: Subscriber> Layer<S> for ClientLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Records about the client connection itself would loop back into it.
        if metadata.level() > &self.level || metadata.target().ends_with("::client") {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        self.client.output(format_line(
            &timestamp,
            *metadata.level(),
            metadata.target(),
            &visitor.message,
        ));
    }
}

fn format_line(timestamp: &str, level: Level, target: &str, message: &str) -> String {
    format!("[{timestamp}] {level} {target}:  {message}")
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}
impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let _ = if field.name() == "message" {
            write!(self.message, "{value:?}")
        } else {
            write!(self.message, " {}={value:?}", field.name())
        };
    }
}

/// Logs compactly to stderr and forwards records at or above `level` to the client.
///
/// Stdout is left alone because it may carry the protocol.
pub fn init(client: ClientSender, level: Level) {
    let console_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);
    let client_log = ClientLogLayer::new(client, level);
    if tracing_subscriber::registry()
        .with(console_log)
        .with(client_log)
        .try_init()
        .is_err()
    {
        tracing::debug!("A global subscriber is already installed.");
    }
}
