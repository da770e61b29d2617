//! Buffered line transport over an established control connection.

use log::warn;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf,
    WriteHalf,
};

use crate::error_handling::types::ControlError;

/// Longest line kept, terminator included. Longer lines are skipped whole.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Reading half of a control connection.
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            buf: Vec::with_capacity(256),
        }
    }

    /// Reads the next line without its line terminator.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Lines longer than
    /// [`MAX_LINE_LEN`] are dropped. End of stream is reported as
    /// [`ControlError::Closed`].
    pub async fn read_line(&mut self) -> Result<String, ControlError> {
        loop {
            self.buf.clear();
            let n = (&mut self.inner)
                .take(MAX_LINE_LEN as u64)
                .read_until(b'\n', &mut self.buf)
                .await?;
            if n == 0 {
                return Err(ControlError::Closed);
            }
            if n < MAX_LINE_LEN || self.buf.ends_with(b"\n") {
                let line = String::from_utf8_lossy(&self.buf);
                return Ok(line.trim_end_matches(['\r', '\n']).to_string());
            }

            let skipped = self.skip_rest_of_line().await?;
            warn!(
                "Dropping control line of more than {} bytes",
                MAX_LINE_LEN + skipped
            );
        }
    }

    async fn skip_rest_of_line(&mut self) -> Result<usize, ControlError> {
        let mut skipped = 0;
        loop {
            let (consumed, done) = {
                let available = self.inner.fill_buf().await?;
                match available.iter().position(|b| *b == b'\n') {
                    Some(pos) => (pos + 1, true),
                    None => (available.len(), available.is_empty()),
                }
            };
            self.inner.consume(consumed);
            skipped += consumed;
            if done {
                return Ok(skipped);
            }
        }
    }
}

/// Bidirectional line transport: CRLF-terminated commands out, lines in.
pub struct LineTransport<S> {
    reader: LineReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
}

impl<S: AsyncRead + AsyncWrite> LineTransport<S> {
    pub fn new(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: LineReader::new(reader),
            writer,
        }
    }

    pub async fn write_line(&mut self, line: &str) -> Result<(), ControlError> {
        let framed = format!("{}\r\n", line);
        self.writer.write_all(framed.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn read_line(&mut self) -> Result<String, ControlError> {
        self.reader.read_line().await
    }

    /// Gives up the write half; after setup the monitor only reads.
    pub fn into_reader(self) -> LineReader<ReadHalf<S>> {
        self.reader
    }
}
