use rand::SeedableRng;
use rand::rngs::StdRng;

use verblix_core::models::frame::ResponseKind;
use verblix_server::canned::calc::{self, CalcError};
use verblix_server::canned::intent::{FactTopic, Intent, JokeTopic, classify};
use verblix_server::canned::{self, dataset};

#[test]
fn greetings_match_the_whole_message_only() {
    for message in ["hi", "Hello!", "  hey ", "Good morning.", "good afternoon?"] {
        assert_eq!(classify(message), Some(Intent::Greeting), "{message}");
    }
    assert_eq!(classify("hi, can you explain ownership?"), None);
    assert_eq!(classify("say hello to the borrow checker"), None);
}

#[test]
fn help_is_an_exact_match() {
    assert_eq!(classify("help"), Some(Intent::Help));
    assert_eq!(classify("Help!"), Some(Intent::Help));
    assert_eq!(classify("can you help me write a parser"), None);
}

#[test]
fn topic_keywords_are_whole_words() {
    assert_eq!(classify("tell me a joke"), Some(Intent::Joke(JokeTopic::Programming)));
    assert_eq!(classify("any science jokes?"), Some(Intent::Joke(JokeTopic::Science)));
    assert_eq!(classify("give me a space fact"), Some(Intent::Fact(FactTopic::Space)));
    assert_eq!(classify("a movie fact please"), Some(Intent::Fact(FactTopic::Movie)));
    assert_eq!(classify("random facts"), Some(Intent::Fact(FactTopic::General)));
    assert_eq!(classify("inspire me with a quote"), Some(Intent::Quote));
    assert_eq!(classify("got a riddle?"), Some(Intent::Riddle));

    assert_eq!(classify("how does a factory pattern work"), None);
    assert_eq!(classify("is this a jokester"), None);
}

#[test]
fn calculation_triggers() {
    assert_eq!(
        classify("calculate 2+2"),
        Some(Intent::Calculation {
            expression: "2+2".to_string()
        })
    );
    assert_eq!(
        classify("what is (3 + 4) * 2"),
        Some(Intent::Calculation {
            expression: "(3 + 4) * 2".to_string()
        })
    );
    assert_eq!(classify("explain C++ templates"), None);
    assert_eq!(classify("what happened in 1969"), None);
}

#[test]
fn evaluator_handles_precedence_and_parentheses() {
    assert_eq!(calc::evaluate("2+2"), Ok(4.0));
    assert_eq!(calc::evaluate("2 + 3 * 4"), Ok(14.0));
    assert_eq!(calc::evaluate("(2 + 3) * 4"), Ok(20.0));
    assert_eq!(calc::evaluate("10 / 4"), Ok(2.5));
    assert_eq!(calc::evaluate("-3 + 5"), Ok(2.0));
    assert_eq!(calc::evaluate("2 * -(1 + 1)"), Ok(-4.0));
    assert_eq!(calc::evaluate("0.5 + .25"), Ok(0.75));
}

#[test]
fn evaluator_errors() {
    assert_eq!(calc::evaluate("  "), Err(CalcError::Empty));
    assert_eq!(calc::evaluate("1 / 0"), Err(CalcError::DivisionByZero));
    assert_eq!(calc::evaluate("(1 + 2"), Err(CalcError::UnexpectedEnd));
    assert_eq!(calc::evaluate("1 +"), Err(CalcError::UnexpectedEnd));
    assert!(matches!(calc::evaluate("1.2.3"), Err(CalcError::Number(_))));
    assert_eq!(calc::evaluate("2)"), Err(CalcError::Unexpected(')')));
}

#[test]
fn nesting_is_bounded() {
    let shallow = format!("{}1{}", "(".repeat(calc::MAX_DEPTH - 1), ")".repeat(calc::MAX_DEPTH - 1));
    assert_eq!(calc::evaluate(&shallow), Ok(1.0));

    let deep = format!("{}1{}", "(".repeat(calc::MAX_DEPTH), ")".repeat(calc::MAX_DEPTH));
    assert_eq!(calc::evaluate(&deep), Err(CalcError::TooDeep));
    assert_eq!(calc::evaluate(&"-".repeat(10_000)), Err(CalcError::TooDeep));
}

#[test]
fn huge_nested_calculation_is_answered() {
    let reply = canned::respond(&format!("calculate {}1", "(".repeat(200_000))).unwrap();
    assert_eq!(reply.kind, ResponseKind::Calculation);
    assert_eq!(reply.text, format!("The result is: {}", canned::CALCULATION_FAILED));
}

#[test]
fn numbers_are_formatted_without_trailing_zero() {
    assert_eq!(calc::format_number(4.0), "4");
    assert_eq!(calc::format_number(2.5), "2.5");
    assert_eq!(calc::format_number(-0.0), "0");
}

#[test]
fn calculation_replies() {
    let reply = canned::respond("calculate 2+2").unwrap();
    assert_eq!(reply.kind, ResponseKind::Calculation);
    assert_eq!(reply.text, "The result is: 4");

    let reply = canned::respond("calculate the answer").unwrap();
    assert_eq!(reply.text, format!("The result is: {}", canned::INVALID_EXPRESSION));

    let reply = canned::respond("calculate 5 / 0").unwrap();
    assert_eq!(reply.text, format!("The result is: {}", canned::CALCULATION_FAILED));
}

#[test]
fn topic_replies_come_from_the_dataset() {
    let mut rng = StdRng::seed_from_u64(7);

    let reply = canned::respond_with("tell me a science joke", &mut rng).unwrap();
    assert_eq!(reply.kind, ResponseKind::Joke);
    assert!(dataset::SCIENCE_JOKES.contains(&reply.text.as_str()));

    let reply = canned::respond_with("space fact", &mut rng).unwrap();
    assert_eq!(
        reply.text,
        "Here's a space fact from NASA: NASA Mars Rover\nMars rover has found signs of water."
    );

    let reply = canned::respond_with("movie fact", &mut rng).unwrap();
    assert_eq!(
        reply.text,
        "Movie Fact:\nInception (2010-07-16)\nA mind-bending thriller."
    );

    let reply = canned::respond_with("a fact", &mut rng).unwrap();
    assert!(
        dataset::SCIENCE_FACTS.contains(&reply.text.as_str())
            || dataset::HISTORY_FACTS.contains(&reply.text.as_str())
    );

    let reply = canned::respond_with("quote", &mut rng).unwrap();
    assert_eq!(reply.kind, ResponseKind::Quote);
    assert!(
        dataset::QUOTES
            .iter()
            .any(|q| reply.text == format!("\"{}\" - {}", q.content, q.author))
    );

    let reply = canned::respond_with("riddle me this: a riddle", &mut rng).unwrap();
    assert_eq!(reply.kind, ResponseKind::Riddle);
    assert!(reply.text.contains("\nAnswer: "));
}

#[test]
fn other_messages_go_to_the_model() {
    assert!(canned::respond("Explain lifetimes in Rust").is_none());
}
