//! Assembly of one streamed response.

use verblix_core::models::frame::StreamFrame;

use crate::markup::Rendered;
use crate::view::RenderTarget;

/// Marker appended to the accumulated text for each in-stream error.
pub const ERROR_MARKER: &str = "\nERROR: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    /// An `end` frame arrived; the caller should finalize.
    Ended,
}

/// Accumulates a response's text and mirrors it onto a render target.
#[derive(Debug, Default)]
pub struct ResponseAssembler {
    full_text: String,
    received_text: bool,
}

impl ResponseAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Apply one frame. Error frames don't end the response.
    pub fn apply(&mut self, frame: StreamFrame, target: &mut impl RenderTarget) -> Progress {
        match frame {
            StreamFrame::Fragment { text, .. } => {
                if !text.is_empty() {
                    self.received_text = true;
                    target.append_fragment(&text);
                    self.full_text.push_str(&text);
                }
                Progress::Continue
            }
            StreamFrame::Error { text } => {
                target.append_error(&text);
                self.full_text.push_str(ERROR_MARKER);
                self.full_text.push_str(&text);
                Progress::Continue
            }
            StreamFrame::End => Progress::Ended,
        }
    }

    /// Render the complete text once and hand it to the target.
    pub fn finalize(self, target: &mut impl RenderTarget) -> Assembled {
        let rendered = Rendered::parse(&self.full_text);
        target.finalize(&rendered);
        Assembled {
            rendered,
            turn_text: self.received_text.then_some(self.full_text),
        }
    }
}

/// A finished response.
#[derive(Debug)]
pub struct Assembled {
    pub rendered: Rendered,
    /// Text to persist as the model turn; `None` unless some fragment
    /// carried text.
    pub turn_text: Option<String>,
}
