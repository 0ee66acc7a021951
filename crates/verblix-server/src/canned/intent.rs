//! Canned intent classification.

use std::sync::LazyLock;

use regex::Regex;

const GREETINGS: &[&str] = &["hi", "hello", "hey", "good morning", "good afternoon"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactTopic {
    Space,
    Movie,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokeTopic {
    Science,
    Programming,
}

/// A message the relay answers itself instead of calling the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Help,
    /// Arithmetic over the characters extracted from the message.
    Calculation { expression: String },
    Fact(FactTopic),
    Joke(JokeTopic),
    Quote,
    Riddle,
}

static CALCULATE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcalculate\b").expect("valid calculate regex"));

static ARITHMETIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d[\d\s().]*[+\-*/][\d\s().]*\d").expect("valid arithmetic regex")
});

static KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(facts?|jokes?|quotes?|riddles?)\b").expect("valid keyword regex")
});

/// Classify a relay message. `None` means the model should answer it.
///
/// Greetings and `help` only match the whole message. An explicit
/// `calculate` wins over topic keywords; a bare arithmetic expression only
/// counts when no topic keyword is present.
pub fn classify(message: &str) -> Option<Intent> {
    let lowered = message.trim().to_lowercase();
    let bare = lowered.trim_end_matches(['!', '.', '?']).trim_end();

    if GREETINGS.contains(&bare) {
        return Some(Intent::Greeting);
    }
    if bare == "help" {
        return Some(Intent::Help);
    }
    if CALCULATE_WORD.is_match(&lowered) {
        return Some(calculation(&lowered));
    }

    if let Some(found) = KEYWORD.captures(&lowered) {
        let keyword = found[1].trim_end_matches('s');
        let has_word = |word: &str| {
            lowered
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == word)
        };
        return Some(match keyword {
            "fact" if has_word("space") => Intent::Fact(FactTopic::Space),
            "fact" if has_word("movie") || has_word("movies") => Intent::Fact(FactTopic::Movie),
            "fact" => Intent::Fact(FactTopic::General),
            "joke" if has_word("science") => Intent::Joke(JokeTopic::Science),
            "joke" => Intent::Joke(JokeTopic::Programming),
            "quote" => Intent::Quote,
            _ => Intent::Riddle,
        });
    }

    if ARITHMETIC.is_match(&lowered) {
        return Some(calculation(&lowered));
    }
    None
}

fn calculation(lowered: &str) -> Intent {
    let expression = lowered
        .chars()
        .filter(|c| c.is_ascii_digit() || "+-*/(). ".contains(*c))
        .collect::<String>();
    Intent::Calculation {
        expression: expression.trim().to_string(),
    }
}
