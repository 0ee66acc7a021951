//! Turns replies into the framed event stream sent to the client.

use std::convert::Infallible;

use axum::http::HeaderValue;
use axum::http::header::{CACHE_CONTROL, CONNECTION};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, BoxStream, Stream, StreamExt};

use verblix_core::models::frame::{ResponseKind, StreamFrame};
use verblix_model::stream::FragmentStream;

use crate::canned::CannedReply;

pub const STREAM_FAILED_PREFIX: &str = "Stream generation failed: ";

/// A canned answer: one fragment, then `end`.
pub fn canned_frames(reply: CannedReply) -> BoxStream<'static, StreamFrame> {
    stream::iter([StreamFrame::fragment(reply.kind, reply.text), StreamFrame::End]).boxed()
}

/// Relay a model reply, one `ai` fragment frame per upstream fragment.
///
/// Upstream is only polled when the response body wants the next frame, so
/// a closed connection stops the upstream reads. A failure produces a single
/// `error` frame and no `end`.
pub fn model_frames(upstream: FragmentStream) -> BoxStream<'static, StreamFrame> {
    let relay = Relay {
        upstream,
        guard: StreamGuard::default(),
    };

    stream::unfold(Some(relay), |state| async move {
        let mut relay = state?;
        match relay.upstream.next().await {
            Some(Ok(text)) => {
                relay.guard.fragments += 1;
                Some((StreamFrame::fragment(ResponseKind::Ai, text), Some(relay)))
            }
            Some(Err(e)) => {
                relay.guard.finish();
                tracing::warn!(error = %e, fragments = relay.guard.fragments, "model stream failed");
                Some((
                    StreamFrame::error(format!("{STREAM_FAILED_PREFIX}{e}")),
                    None,
                ))
            }
            None => {
                relay.guard.finish();
                tracing::info!(fragments = relay.guard.fragments, "model stream completed");
                Some((StreamFrame::End, None))
            }
        }
    })
    .boxed()
}

/// Wrap frames in an event-stream response.
pub fn into_response(frames: impl Stream<Item = StreamFrame> + Send + 'static) -> Response {
    let events = frames.map(|frame| {
        Ok::<_, Infallible>(
            Event::default()
                .event(frame.event_name())
                .data(frame.data()),
        )
    });

    let mut response = Sse::new(events).into_response();
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    response
}

struct Relay {
    upstream: FragmentStream,
    guard: StreamGuard,
}

/// Notices when the body is dropped before the stream reached a terminal
/// frame, which is how a client disconnect shows up.
#[derive(Default)]
struct StreamGuard {
    fragments: usize,
    finished: bool,
}

impl StreamGuard {
    fn finish(&mut self) {
        self.finished = true;
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::info!(
                fragments = self.fragments,
                "client disconnected from chat stream"
            );
        }
    }
}
