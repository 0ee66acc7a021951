//! Canned responders: messages the relay answers without the model.

pub mod calc;
pub mod dataset;
pub mod intent;

use rand::Rng;
use rand::seq::SliceRandom;
use verblix_core::models::frame::ResponseKind;

use self::calc::CalcError;
use self::intent::{FactTopic, Intent, JokeTopic};

pub const CALCULATION_PREFIX: &str = "The result is: ";
pub const INVALID_EXPRESSION: &str =
    "Invalid expression. Please use only numbers and basic operators (+, -, *, /).";
pub const CALCULATION_FAILED: &str =
    "Sorry, I couldn't calculate that. Please check your expression.";

/// A complete canned answer, sent as a single fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedReply {
    pub kind: ResponseKind,
    pub text: String,
}

/// Answer `message` directly if it is a canned intent.
pub fn respond(message: &str) -> Option<CannedReply> {
    respond_with(message, &mut rand::thread_rng())
}

/// [`respond`] with a caller-provided source of randomness.
pub fn respond_with<R: Rng + ?Sized>(message: &str, rng: &mut R) -> Option<CannedReply> {
    let intent = intent::classify(message)?;
    tracing::debug!(?intent, "canned intent matched");
    Some(answer(intent, rng))
}

fn answer<R: Rng + ?Sized>(intent: Intent, rng: &mut R) -> CannedReply {
    match intent {
        Intent::Greeting => reply(ResponseKind::Greeting, dataset::GREETING_REPLY),
        Intent::Help => reply(ResponseKind::Help, dataset::HELP_REPLY),
        Intent::Calculation { expression } => {
            let result = match calc::evaluate(&expression) {
                Ok(value) => calc::format_number(value),
                Err(CalcError::Empty) => INVALID_EXPRESSION.to_string(),
                Err(e) => {
                    tracing::debug!(expression, error = %e, "calculation failed");
                    CALCULATION_FAILED.to_string()
                }
            };
            reply(ResponseKind::Calculation, format!("{CALCULATION_PREFIX}{result}"))
        }
        Intent::Fact(FactTopic::Space) => {
            let (title, explanation) = dataset::SPACE_FACT;
            reply(
                ResponseKind::Fact,
                format!("Here's a space fact from NASA: {title}\n{explanation}"),
            )
        }
        Intent::Fact(FactTopic::Movie) => {
            let (title, released, overview) = dataset::MOVIE_FACT;
            reply(
                ResponseKind::Fact,
                format!("Movie Fact:\n{title} ({released})\n{overview}"),
            )
        }
        Intent::Fact(FactTopic::General) => {
            let topics = [dataset::SCIENCE_FACTS, dataset::HISTORY_FACTS];
            let facts: &[&str] = *pick(&topics, rng);
            reply(ResponseKind::Fact, *pick(facts, rng))
        }
        Intent::Joke(JokeTopic::Science) => {
            reply(ResponseKind::Joke, *pick(dataset::SCIENCE_JOKES, rng))
        }
        Intent::Joke(JokeTopic::Programming) => {
            reply(ResponseKind::Joke, *pick(dataset::PROGRAMMING_JOKES, rng))
        }
        Intent::Quote => {
            let quote = pick(dataset::QUOTES, rng);
            reply(
                ResponseKind::Quote,
                format!("\"{}\" - {}", quote.content, quote.author),
            )
        }
        Intent::Riddle => {
            let riddle = pick(dataset::RIDDLES, rng);
            reply(
                ResponseKind::Riddle,
                format!("{}\nAnswer: {}", riddle.question, riddle.answer),
            )
        }
    }
}

fn reply(kind: ResponseKind, text: impl Into<String>) -> CannedReply {
    CannedReply {
        kind,
        text: text.into(),
    }
}

/// Pick one item from a non-empty static table.
fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> &'a T {
    items.choose(rng).unwrap_or(&items[0])
}
