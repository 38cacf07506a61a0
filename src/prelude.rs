#[doc(hidden)]
pub use crate::{
    adapter::Adapter,
    client::{ClientSender, MessageWriter},
    config::LaunchConfig,
    events::{self, Event, EventBody},
    line_reader::{BufLineReader, LineReader},
    remote::{RemoteService, Workunit},
    requests::{self, Command, Request},
    responses::{self, Response, ResponseBody},
    server::{serve, Server},
    session::DebugSession,
    types,
};
