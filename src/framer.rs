//! Newline-delimited JSON framing over byte streams.
//!
//! One JSON value per line in each direction. The reader never answers
//! anything itself; it only tells the caller what arrived.

use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// One inbound line, classified.
#[derive(Debug)]
pub enum Frame {
    /// A line that parsed as a JSON value.
    Message(JsonValue),
    /// A line that did not parse. Carries the parser's complaint.
    Malformed(String),
}

/// Reads JSON values from a line-oriented stream.
pub struct MessageReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> MessageReader<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Read the next non-blank line.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            self.buf.clear();
            let read = self.reader.read_until(b'\n', &mut self.buf).await?;
            if read == 0 {
                return Ok(None);
            }

            let line = trim_ascii(&self.buf);
            if line.is_empty() {
                continue;
            }

            return Ok(Some(match serde_json::from_slice::<JsonValue>(line) {
                Ok(value) => Frame::Message(value),
                Err(e) => Frame::Malformed(e.to_string()),
            }));
        }
    }
}

/// Writes JSON values as single lines, flushing after each.
pub struct MessageWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> MessageWriter<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Serialize `message` onto one line and flush it.
    pub async fn write_message<T: Serialize>(&mut self, message: &T) -> Result<()> {
        // serde_json escapes control characters inside strings, so the only
        // raw newline in `line` is the terminator we append.
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Recover the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
