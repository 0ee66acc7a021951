//! Static answers for the canned responders.

pub const GREETING_REPLY: &str = "Hello! How can I assist you today?";

pub const HELP_REPLY: &str = "I'm Verblix Assistant. Besides answering questions, I can:\n\
- tell a joke (try \"tell me a science joke\")\n\
- share a fact (general, \"space fact\" or \"movie fact\")\n\
- give you an inspirational quote\n\
- pose a riddle\n\
- calculate simple arithmetic such as \"calculate (2 + 3) * 4\"";

pub const SCIENCE_FACTS: &[&str] = &[
    "The Earth revolves around the Sun.",
    "Water boils at 100 degrees Celsius at sea level.",
    "The speed of light is approximately 299,792 kilometers per second.",
];

pub const HISTORY_FACTS: &[&str] = &[
    "The Great Wall of China is the longest wall in the world.",
    "World War II ended in 1945.",
    "The first moon landing was in 1969.",
];

pub const SPACE_FACT: (&str, &str) = ("NASA Mars Rover", "Mars rover has found signs of water.");

/// Title, release date, overview.
pub const MOVIE_FACT: (&str, &str, &str) =
    ("Inception", "2010-07-16", "A mind-bending thriller.");

pub const PROGRAMMING_JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 types of people in the world: those who understand binary, and those who don't.",
    "Why did the web developer break up with the graphic designer? They didn't see eye to eye on the interface.",
];

pub const SCIENCE_JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything!",
    "What do you call a lazy kangaroo? Pouch potato!",
    "Why did the biologist break up with the physicist? They had no chemistry.",
];

pub struct Quote {
    pub content: &'static str,
    pub author: &'static str,
}

pub const QUOTES: &[Quote] = &[
    Quote {
        content: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    Quote {
        content: "Strive not to be a success, but rather to be of value.",
        author: "Albert Einstein",
    },
    Quote {
        content: "The mind is everything. What you think you become.",
        author: "Buddha",
    },
];

pub struct Riddle {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const RIDDLES: &[Riddle] = &[
    Riddle {
        question: "I speak without a mouth and hear without ears. I have no body, but I come alive with wind. What am I?",
        answer: "An echo",
    },
    Riddle {
        question: "What has an eye, but cannot see?",
        answer: "A needle",
    },
    Riddle {
        question: "What is full of holes but still holds water?",
        answer: "A sponge",
    },
];
