use crate::adapter::Adapter;
use crate::client::ClientSender;
use crate::errors::{DeserializationError, ServerError};
use crate::line_reader::LineReader;
use crate::requests::{Request, RequestHeader};
use crate::responses::{Response, ResponseMessage};
use std::io::{Error as StdIoError, ErrorKind as StdIoErrorKind};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
enum ServerState {
    /// Expecting a header
    Header,
    /// Expecting a separator between header and content, i.e. "\r\n"
    Sep,
    /// Expecting content
    Content,
}

/// The `Server` is responsible for reading the incoming bytestream and constructing deserialized
/// requests from it. The main method of the `Server` is the `accept_request`
#[derive(Default)]
pub struct Server {}

fn escape_crlf(instr: &str) -> String {
    instr.replace('\n', "\\n").replace('\r', "\\r")
}

impl Server {
    /// Accept a single request from the `input` stream, convert it into `Request` and return it to the caller
    pub async fn accept_request(
        &mut self,
        input: &mut impl LineReader,
    ) -> Result<Request, ServerError> {
        let mut state = ServerState::Header;
        let mut content_length: usize = 0;

        loop {
            match state {
                ServerState::Header => {
                    let buffer = input.read_line().await?;

                    tracing::trace!("HEADER: read line: {}", escape_crlf(&buffer));
                    if buffer.is_empty() {
                        return Err(ServerError::IoError(StdIoError::new(
                            StdIoErrorKind::BrokenPipe,
                            "read an empty buffer",
                        )));
                    }

                    let parts: Vec<&str> = buffer.trim_end().split(':').collect();
                    if parts.len() == 2 {
                        match parts[0] {
                            "Content-Length" => {
                                content_length = match parts[1].trim().parse() {
                                    Ok(val) => val,
                                    Err(_) => {
                                        return Err(ServerError::HeaderParseError { line: buffer })
                                    }
                                };
                                state = ServerState::Sep;
                            }
                            other => {
                                return Err(ServerError::UnknownHeader {
                                    header: other.to_string(),
                                })
                            }
                        }
                    } else if buffer.eq("\r\n") || buffer.eq("\n") {
                        tracing::trace!("HEADER: skipping empty line");
                        continue;
                    } else {
                        return Err(ServerError::HeaderParseError { line: buffer });
                    }
                }
                ServerState::Sep => {
                    let buffer = input.read_line().await?;

                    tracing::trace!("SEP: read line: {}", escape_crlf(&buffer));
                    if buffer == "\r\n" || buffer == "\n" {
                        state = ServerState::Content;
                    } else {
                        // expecting separator
                        return Err(ServerError::ProtocolError {
                            reason: "failed to read separator".to_string(),
                        });
                    }
                }
                ServerState::Content => {
                    // read the payload
                    let mut payload = bytes::BytesMut::with_capacity(content_length);
                    let _ = input.read_n_bytes(&mut payload, content_length).await?;

                    let payload = String::from_utf8_lossy(&payload).to_string();
                    tracing::trace!("CONTENT: read content: {}", escape_crlf(&payload));
                    return match serde_json::from_str::<Request>(&payload) {
                        Ok(request) => Ok(request),
                        Err(error) => match serde_json::from_str::<RequestHeader>(&payload) {
                            // Well-formed, but not a command we know.
                            Ok(header) if !header.is_known() => {
                                Err(ServerError::UnsupportedCommand {
                                    seq: header.seq,
                                    command: header.command,
                                })
                            }
                            _ => Err(ServerError::ParseError(DeserializationError::SerdeError(
                                error,
                            ))),
                        },
                    };
                }
            }
        }
    }
}

/// Reads requests from `input` and hands them to `adapter` until the input ends or the adapter
/// requests an exit.
///
/// Requests with commands this server does not know are answered with an error response. Any
/// other framing or parse error ends the loop.
pub async fn serve(
    adapter: &mut impl Adapter,
    input: &mut impl LineReader,
    client: &ClientSender,
) -> Result<(), ServerError> {
    let mut server = Server::default();
    loop {
        let request = match server.accept_request(input).await {
            Ok(request) => request,
            Err(ServerError::UnsupportedCommand { seq, command }) => {
                warn!("Received the unsupported command `{command}`.");
                client.send_response(Response::make_command_error(
                    seq,
                    &command,
                    ResponseMessage::error("unsupported-command"),
                ));
                continue;
            }
            Err(ServerError::IoError(error))
                if matches!(
                    error.kind(),
                    StdIoErrorKind::BrokenPipe | StdIoErrorKind::UnexpectedEof,
                ) =>
            {
                info!("The client closed the connection.");
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        debug!("Handling `{}` request {}.", request.command.name(), request.seq);
        let response = adapter.handle_request(request, client).await;
        client.send_response(response);

        if client.get_exit_state() {
            info!("Exit requested, stopping the server.");
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::Sendable,
        line_reader::BufLineReader,
        requests::Command,
        responses::{ResponseBody, ThreadsResponse},
        types::Thread,
    };
    use async_trait::async_trait;

    fn frame(json: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{json}", json.len())
    }

    #[derive(Default)]
    struct ThreadsOnly {
        handled: Vec<i64>,
    }
    #[async_trait]
    impl Adapter for ThreadsOnly {
        async fn handle_request(&mut self, request: Request, client: &ClientSender) -> Response {
            self.handled.push(request.seq);
            match &request.command {
                Command::Threads => Response::make_success(
                    &request,
                    ResponseBody::Threads(ThreadsResponse {
                        threads: vec![Thread {
                            id: 0,
                            name: "main".to_string(),
                        }],
                    }),
                ),
                Command::Disconnect(_) => {
                    client.request_exit();
                    Response::make_ack(&request).unwrap()
                }
                _ => Response::make_error(&request, ResponseMessage::error("unexpected")),
            }
        }
    }

    #[tokio::test]
    async fn accepts_a_framed_request() {
        let input = frame(r#"{"seq":1,"type":"request","command":"threads"}"#);
        let mut reader = BufLineReader::new(input.as_bytes());
        let request = Server::default().accept_request(&mut reader).await.unwrap();
        assert_eq!(request.seq, 1);
        assert!(matches!(request.command, Command::Threads));
    }

    #[tokio::test]
    async fn rejects_unknown_headers() {
        let mut reader = BufLineReader::new("X-Custom: 1\r\n\r\n".as_bytes());
        let result = Server::default().accept_request(&mut reader).await;
        assert!(matches!(result, Err(ServerError::UnknownHeader { .. })));
    }

    #[tokio::test]
    async fn answers_unknown_commands_and_keeps_serving() {
        let input = [
            frame(r#"{"seq":1,"type":"request","command":"goto","arguments":{"threadId":0,"targetId":1}}"#),
            frame(r#"{"seq":2,"type":"request","command":"threads"}"#),
            frame(r#"{"seq":3,"type":"request","command":"disconnect"}"#),
            frame(r#"{"seq":4,"type":"request","command":"threads"}"#),
        ]
        .concat();
        let mut reader = BufLineReader::new(input.as_bytes());
        let (client, mut receiver) = ClientSender::channel();
        let mut adapter = ThreadsOnly::default();

        serve(&mut adapter, &mut reader, &client).await.unwrap();

        assert_eq!(adapter.handled, vec![2, 3]);
        let Ok(Sendable::Response(first)) = receiver.try_recv() else {
            panic!("Expected a response.");
        };
        assert_eq!(first.request_seq, 1);
        assert!(!first.success);
        assert_eq!(first.command.as_deref(), Some("goto"));
    }

    #[tokio::test]
    async fn end_of_input_is_a_clean_shutdown() {
        let input = frame(r#"{"seq":1,"type":"request","command":"threads"}"#);
        let mut reader = BufLineReader::new(input.as_bytes());
        let (client, _receiver) = ClientSender::channel();
        let mut adapter = ThreadsOnly::default();
        serve(&mut adapter, &mut reader, &client).await.unwrap();
        assert_eq!(adapter.handled, vec![1]);
    }
}
