//! Structured rendering of a finished response.
//!
//! Markup is only resolved once the whole text is known, since a code fence
//! opened in one fragment usually closes several fragments later.

/// One structural piece of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Prose(String),
    Code {
        language: Option<String>,
        code: String,
    },
}

/// An action offered on a finalized response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    CopyAll,
    /// Copy the code block with this 1-based number.
    CopyCode(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rendered {
    pub text: String,
    pub blocks: Vec<Block>,
    pub affordances: Vec<Affordance>,
}

impl Rendered {
    /// Parse a complete response into prose and fenced code blocks.
    ///
    /// Fences are ```` ``` ```` or `~~~` with an optional language tag. A
    /// fence left open runs to the end of the text.
    pub fn parse(text: &str) -> Self {
        let mut blocks = Vec::new();
        let mut prose: Vec<&str> = Vec::new();
        let mut fence: Option<(&str, Option<String>, Vec<&str>)> = None;

        for line in text.split('\n') {
            match fence.take() {
                Some((marker, language, mut code)) => {
                    let closing = line.trim();
                    if closing.starts_with(marker) && closing.trim_start_matches(marker).is_empty() {
                        blocks.push(Block::Code {
                            language,
                            code: code.join("\n"),
                        });
                    } else {
                        code.push(line);
                        fence = Some((marker, language, code));
                    }
                }
                None => match opening_fence(line) {
                    Some((marker, language)) => {
                        flush_prose(&mut prose, &mut blocks);
                        fence = Some((marker, language, Vec::new()));
                    }
                    None => prose.push(line),
                },
            }
        }

        if let Some((_, language, code)) = fence {
            blocks.push(Block::Code {
                language,
                code: code.join("\n"),
            });
        }
        flush_prose(&mut prose, &mut blocks);

        let code_blocks = blocks
            .iter()
            .filter(|block| matches!(block, Block::Code { .. }))
            .count();
        let mut affordances = vec![Affordance::CopyAll];
        affordances.extend((1..=code_blocks).map(Affordance::CopyCode));

        Self {
            text: text.to_string(),
            blocks,
            affordances,
        }
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Code { code, .. } => Some(code.as_str()),
            Block::Prose(_) => None,
        })
    }

    /// Text an affordance copies, if it exists on this response.
    pub fn copy_text(&self, affordance: Affordance) -> Option<&str> {
        match affordance {
            Affordance::CopyAll => Some(&self.text),
            Affordance::CopyCode(n) => self.code_blocks().nth(n.checked_sub(1)?),
        }
    }
}

fn opening_fence(line: &str) -> Option<(&'static str, Option<String>)> {
    let trimmed = line.trim_start();
    let marker = ["```", "~~~"]
        .into_iter()
        .find(|marker| trimmed.starts_with(marker))?;
    let language = trimmed[marker.len()..].trim();
    let language = (!language.is_empty()).then(|| language.to_string());
    Some((marker, language))
}

fn flush_prose(prose: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    let text = prose.join("\n");
    prose.clear();
    let text = text.trim_matches('\n');
    if !text.trim().is_empty() {
        blocks.push(Block::Prose(text.to_string()));
    }
}
