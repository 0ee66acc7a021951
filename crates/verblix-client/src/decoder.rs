//! Incremental decoding of the relay's frame stream.

use verblix_core::models::frame::{FRAME_DELIMITER, StreamFrame};

/// Turns arbitrary byte chunks into complete frames.
///
/// Chunks may split a frame, a line, or a multi-byte character anywhere;
/// incomplete input is carried over to the next [`push`](Self::push).
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence.
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every frame it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamFrame> {
        self.pending.extend_from_slice(chunk);
        self.decode_pending();
        self.drain_units()
    }

    /// The body closed: decode whatever complete frame is left.
    pub fn finish(&mut self) -> Vec<StreamFrame> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.buffer.push_str(&String::from_utf8_lossy(&rest));
        }
        let mut frames = self.drain_units();
        let rest = std::mem::take(&mut self.buffer);
        if !rest.trim().is_empty() {
            frames.extend(StreamFrame::parse(&rest));
        }
        frames
    }

    fn decode_pending(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    push_normalized(&mut self.buffer, text);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                    push_normalized(&mut self.buffer, &text);
                    match e.error_len() {
                        // Incomplete sequence at the end: wait for more bytes.
                        None => {
                            self.pending.drain(..valid);
                            return;
                        }
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                    }
                }
            }
        }
    }

    fn drain_units(&mut self) -> Vec<StreamFrame> {
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find(FRAME_DELIMITER) {
            let unit: String = self.buffer.drain(..pos + FRAME_DELIMITER.len()).collect();
            match StreamFrame::parse(&unit[..pos]) {
                Some(frame) => frames.push(frame),
                None => tracing::debug!(unit = %unit.trim_end(), "discarding unrecognized frame"),
            }
        }
        frames
    }
}

/// Append `text` with CRLF line endings folded to LF, including a CR left
/// at the end of the buffer by the previous chunk.
fn push_normalized(buffer: &mut String, text: &str) {
    if text.starts_with('\n') && buffer.ends_with('\r') {
        buffer.pop();
    }
    buffer.push_str(&text.replace("\r\n", "\n"));
}
