//! A debug adapter that lets an IDE step through workunits running on a remote dataflow engine.
//!
//! The protocol plumbing (`server`, `client`, `requests`, ...) speaks the Debug Adapter Protocol.
//! [`session::DebugSession`] maps it onto a [`remote::Workunit`], whose execution graph is shown
//! as a call stack: the halted edge, its source vertex, the enclosing subgraphs and the workunit
//! itself.

pub mod adapter;
pub mod breakpoints;
pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod graph;
pub mod inspect;
pub mod line_reader;
pub mod logger;

#[doc(hidden)]
mod macros;
pub mod prelude;
pub mod remote;
pub mod requests;
pub mod responses;
pub mod server;
pub mod session;
pub mod stepping;
pub mod types;
pub mod watcher;
