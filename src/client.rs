use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};
use tracing::warn;

use crate::{
    errors::{DeserializationError, ServerError},
    events::{Event, EventBody, OutputEventBody},
    responses::Response,
    types::OutputEventCategory,
};

/// A handle for sending replies and events back to the IDE.
///
/// Messages are queued and written by a [`MessageWriter`], so the handle can be cloned into the
/// watcher task and the logging layer.
#[derive(Clone, Debug)]
pub struct ClientSender {
    sender: mpsc::UnboundedSender<Sendable>,
    should_exit: Arc<AtomicBool>,
}

impl ClientSender {
    pub fn new(sender: mpsc::UnboundedSender<Sendable>) -> Self {
        Self {
            sender,
            should_exit: Arc::default(),
        }
    }

    /// Creates a sender together with the receiving end a [`MessageWriter`] drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Sendable>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Sends an event to the IDE.
    pub fn send_event(&self, body: EventBody) {
        self.write(Sendable::Event(Event::make_event(body)));
    }

    /// Sends a response to the IDE.
    pub fn send_response(&self, response: Response) {
        self.write(Sendable::Response(response));
    }

    /// Shows a line of text in the debug console.
    pub fn output(&self, text: impl Into<String>) {
        self.send_event(EventBody::Output(OutputEventBody {
            category: Some(OutputEventCategory::Console),
            output: format!("{}\n", text.into()),
            data: None,
        }));
    }

    /// Notifies the server that it should gracefully exit after the current request has been
    /// answered.
    ///
    /// It is recommended to send a `Terminated` event to the client first.
    pub fn request_exit(&self) {
        self.should_exit.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if the exiting was requested.
    pub fn get_exit_state(&self) -> bool {
        self.should_exit.load(Ordering::SeqCst)
    }

    fn write(&self, message: Sendable) {
        if self.sender.send(message).is_err() {
            // The writer is gone, so is the client.
            warn!("Dropping a message, the client connection is closed.");
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum Sendable {
    Response(Response),
    Event(Event),
}

#[derive(Serialize)]
struct Sequenced<'a> {
    seq: i64,
    #[serde(flatten)]
    message: &'a Sendable,
}

/// Frames outgoing messages onto the client connection.
///
/// Each message gets the next outgoing sequence number and is framed with a `Content-Length`
/// header that covers exactly the JSON payload.
pub struct MessageWriter<W> {
    output: W,
    seq: i64,
}

impl<W: AsyncWrite + Unpin> MessageWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output, seq: 0 }
    }

    pub async fn write(&mut self, message: &Sendable) -> Result<(), ServerError> {
        self.seq += 1;
        let json = serde_json::to_string(&Sequenced {
            seq: self.seq,
            message,
        })
        .map_err(DeserializationError::SerdeError)?;
        self.output
            .write_all(format!("Content-Length: {}\r\n\r\n{json}", json.len()).as_bytes())
            .await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Writes everything already queued in `messages` without waiting for more.
    pub async fn drain(
        &mut self,
        messages: &mut mpsc::UnboundedReceiver<Sendable>,
    ) -> Result<(), ServerError> {
        while let Ok(message) = messages.try_recv() {
            self.write(&message).await?;
        }
        Ok(())
    }
}
