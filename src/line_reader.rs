use async_trait::async_trait;
use bytes::BytesMut;
use std::io::Error as IoError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

#[async_trait]
pub trait LineReader {
    /// Read a single line and return it (terminator included). An empty string signals the end
    /// of the input.
    async fn read_line(&mut self) -> Result<String, IoError>;

    /// Read exactly `n` bytes and append them into `buffer`
    async fn read_n_bytes(&mut self, buffer: &mut BytesMut, n: usize) -> Result<usize, IoError>;
}

/// Reads DAP traffic from any buffered async source, usually stdin.
pub struct BufLineReader<R> {
    pub input: R,
}

impl<R: AsyncBufRead + Unpin + Send> BufLineReader<R> {
    pub fn new(input: R) -> Self {
        BufLineReader { input }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> LineReader for BufLineReader<R> {
    async fn read_n_bytes(&mut self, buffer: &mut BytesMut, n: usize) -> Result<usize, IoError> {
        let mut buf = vec![0; n];
        self.input.read_exact(&mut buf).await?;
        buffer.extend_from_slice(&buf);
        Ok(n)
    }

    async fn read_line(&mut self) -> Result<String, IoError> {
        let mut line = Vec::with_capacity(128);
        self.input.read_until(b'\n', &mut line).await?;
        Ok(String::from_utf8_lossy(&line).to_string())
    }
}

#[cfg(test)]
mod tests {
    const DAP_LAUNCH_REQUEST: &str = "Content-Length: 86\r\n\r\n{\"seq\":2,\"type\":\"request\",\"command\":\"launch\",\"arguments\":{\"program\":\"/src/hello.ecl\"}}";

    use super::*;

    #[tokio::test]
    async fn test_buf_reader() -> Result<(), IoError> {
        let mut reader = BufLineReader::new(DAP_LAUNCH_REQUEST.as_bytes());
        {
            let line = reader.read_line().await?;
            assert_eq!(line, "Content-Length: 86\r\n");
        }
        {
            let line = reader.read_line().await?;
            assert_eq!(line, "\r\n");
        }
        {
            // read by length
            let mut buffer = BytesMut::with_capacity(86);
            reader.read_n_bytes(&mut buffer, 86).await?;
            assert_eq!(buffer.len(), 86);
            assert!(buffer.ends_with(b"}}"));
        }
        {
            let line = reader.read_line().await?;
            assert_eq!(line, "");
        }
        Ok(())
    }
}
