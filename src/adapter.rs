use crate::{client::ClientSender, requests::Request, responses::Response};
use async_trait::async_trait;

/// Trait for a debug adapter.
///
/// Adapters are the main backbone of a debug server. They get a `handle_request` call for each
/// incoming request. Responses are the return values of these calls.
#[async_trait]
pub trait Adapter {
    /// Accept (and take ownership) of an incoming request.
    ///
    /// The `client` reference can be used to send events to the client, also from tasks that
    /// outlive this call.
    ///
    /// # Error handling
    ///
    /// This function always returns a valid `Response` object, however, that response itself may
    /// be an error response. Implementors should map their errors to an error response so the
    /// client can show them.
    async fn handle_request(&mut self, request: Request, client: &ClientSender) -> Response;
}
