//! Terminal front-end: colored output and line input.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use colored::Colorize;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use verblix_core::models::conversation::ConversationId;
use verblix_core::models::turn::{Role, Turn};

use crate::markup::{Affordance, Block, Rendered};
use crate::store::ConversationSummary;
use crate::view::{ChatView, RenderTarget};

/// Lines typed at the prompt.
pub struct LineInput {
    lines: UnboundedReceiver<String>,
}

impl LineInput {
    /// Next line, or `None` once stdin is closed.
    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }
}

/// Answers to confirmation prompts, read while the event loop is blocked
/// on the prompt.
pub struct Confirmations {
    confirming: Arc<AtomicBool>,
    answers: mpsc::Receiver<String>,
}

/// Read stdin on a dedicated thread. While a confirmation is pending the
/// next line goes to [`Confirmations`] instead of [`LineInput`].
pub fn spawn_stdin() -> (LineInput, Confirmations) {
    let (line_tx, lines) = unbounded_channel();
    let (answer_tx, answers) = mpsc::channel();
    let confirming = Arc::new(AtomicBool::new(false));
    let routing = confirming.clone();

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let sent = if routing.load(Ordering::SeqCst) {
                answer_tx.send(line).is_ok()
            } else {
                line_tx.send(line).is_ok()
            };
            if !sent {
                break;
            }
        }
    });

    (LineInput { lines }, Confirmations { confirming, answers })
}

pub struct TerminalView {
    confirmations: Confirmations,
}

impl TerminalView {
    pub fn new(confirmations: Confirmations) -> Self {
        Self { confirmations }
    }

    fn print_rendered(&self, rendered: &Rendered) {
        let mut number = 0;
        for block in &rendered.blocks {
            match block {
                Block::Prose(text) => println!("{text}"),
                Block::Code { language, code } => {
                    number += 1;
                    print!("{}", code_block(number, language.as_deref(), code));
                }
            }
        }
    }
}

/// The code blocks of a finished response, numbered as `/copy N` expects.
/// Empty when the response has none.
pub fn code_section(rendered: &Rendered) -> String {
    rendered
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Code { language, code } => Some((language.as_deref(), code.as_str())),
            Block::Prose(_) => None,
        })
        .enumerate()
        .map(|(i, (language, code))| code_block(i + 1, language, code))
        .collect()
}

fn code_block(number: usize, language: Option<&str>, code: &str) -> String {
    let label = language.unwrap_or("code");
    let mut out = format!("{}\n", format!("┌─ [{number}] {label}").dimmed());
    for line in code.lines() {
        out.push_str(&format!("{} {}\n", "│".dimmed(), line.yellow()));
    }
    out.push_str(&format!("{}\n", "└─".dimmed()));
    out
}

fn flush() {
    let _ = std::io::stdout().flush();
}

impl RenderTarget for TerminalView {
    fn begin_response(&mut self) {
        print!("{} ", "verblix ›".cyan().bold());
        flush();
    }

    fn append_fragment(&mut self, text: &str) {
        print!("{text}");
        flush();
    }

    fn append_error(&mut self, text: &str) {
        print!("\n{}", format!("⚠ {text}").red());
        flush();
    }

    fn finalize(&mut self, rendered: &Rendered) {
        println!();
        print!("{}", code_section(rendered));
        let code_blocks = rendered
            .affordances
            .iter()
            .filter(|affordance| matches!(affordance, Affordance::CopyCode(_)))
            .count();
        let hint = match code_blocks {
            0 => "/copy to copy this response".to_string(),
            1 => "/copy to copy this response, /copy 1 for its code block".to_string(),
            n => format!("/copy to copy this response, /copy 1..{n} for its code blocks"),
        };
        println!("{}", hint.dimmed());
    }
}

impl ChatView for TerminalView {
    fn show_conversations(&mut self, conversations: &[ConversationSummary], active: &ConversationId) {
        println!("{}", "Conversations".bold());
        for (i, summary) in conversations.iter().enumerate() {
            let marker = if summary.id == *active { "*" } else { " " };
            let line = format!("{marker} {:>2}. {} ({} turns)", i + 1, summary.title, summary.turns);
            if summary.id == *active {
                println!("{}", line.green());
            } else {
                println!("{line}");
            }
        }
    }

    fn show_title(&mut self, title: &str) {
        println!("{}", format!("── {title} ──").bold());
    }

    fn reload(&mut self, turns: &[Turn]) {
        for turn in turns {
            match turn.role {
                Role::User => println!("{} {}", "you ›".green().bold(), turn.content),
                Role::Model => {
                    println!("{}", "verblix ›".cyan().bold());
                    self.print_rendered(&Rendered::parse(&turn.content));
                }
            }
        }
    }

    fn show_user_turn(&mut self, _text: &str) {
        // Already on screen as typed.
    }

    fn show_notice(&mut self, text: &str) {
        println!("{}", format!("⚠ {text}").yellow());
    }

    fn show_info(&mut self, text: &str) {
        println!("{text}");
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.confirmations.confirming.store(true, Ordering::SeqCst);
        print!("{} [y/N] ", prompt.bold());
        flush();
        let answer = self.confirmations.answers.recv();
        self.confirmations.confirming.store(false, Ordering::SeqCst);
        matches!(answer.as_deref().map(str::trim), Ok("y" | "Y" | "yes"))
    }

    fn session_expired(&mut self) {
        println!(
            "{}",
            "Session expired. Please log in again with /login USER PASS.".red().bold()
        );
    }

    fn show_identity(&mut self, username: Option<&str>) {
        match username {
            Some(username) => println!("Logged in as {}", username.bold()),
            None => println!("{}", "Not logged in. Use /login or /register.".dimmed()),
        }
    }
}
