use futures::stream::BoxStream;
use verblix_core::models::turn::Turn;

use crate::error::ModelError;

/// Lazy, finite, non-restartable sequence of reply fragments.
///
/// Ends after the first `Err`; consumers must treat it as terminal.
pub type FragmentStream = BoxStream<'static, Result<String, ModelError>>;

/// A generative model that can stream a reply.
///
/// `history` is the conversation as the client sent it, which still ends
/// with the turn carrying `prompt`. Implementations trim it with
/// [`crate::history::prepare_history`] before calling upstream.
///
/// No upstream work happens until the returned stream is first polled, and
/// dropping the stream abandons the upstream call.
pub trait ModelStream: Send + Sync {
    fn stream_reply(&self, prompt: String, history: Vec<Turn>) -> FragmentStream;
}
