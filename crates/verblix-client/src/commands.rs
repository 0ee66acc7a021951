//! Input lines of the terminal front-end.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    New,
    List,
    /// 1-based position in the conversation list.
    Switch(usize),
    Delete(Option<usize>),
    Clear,
    DeleteAll,
    Stop,
    Copy(Option<usize>),
    Register { username: String, password: String },
    Login { username: String, password: String },
    Logout,
    WhoAmI,
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "Type a message to chat. Commands:
  /new                  start a new conversation
  /list                 list conversations
  /switch N             switch to conversation N
  /delete [N]           delete conversation N (default: the active one)
  /clear                clear the active conversation's history
  /delete-all           delete every conversation
  /stop                 stop the response being streamed
  /copy [N]             print the last response, or its N-th code block
  /register USER PASS   create an account and log in
  /login USER PASS      log in
  /logout               log out
  /whoami               show who is logged in
  /quit                 exit";

impl Command {
    /// Parse one input line. Lines not starting with `/` are messages; a
    /// leading `//` sends a message that starts with `/`.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some(escaped) = line.strip_prefix("//") {
            return Some(Command::Send(format!("/{escaped}")));
        }
        let Some(command) = line.strip_prefix('/') else {
            return Some(Command::Send(line.to_string()));
        };

        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let parsed = match (name, args.as_slice()) {
            ("new", []) => Command::New,
            ("list", []) => Command::List,
            ("switch", [n]) => match position(n) {
                Some(n) => Command::Switch(n),
                None => invalid("usage: /switch N"),
            },
            ("delete", []) => Command::Delete(None),
            ("delete", [n]) => match position(n) {
                Some(n) => Command::Delete(Some(n)),
                None => invalid("usage: /delete [N]"),
            },
            ("clear", []) => Command::Clear,
            ("delete-all", []) => Command::DeleteAll,
            ("stop", []) => Command::Stop,
            ("copy", []) => Command::Copy(None),
            ("copy", [n]) => match position(n) {
                Some(n) => Command::Copy(Some(n)),
                None => invalid("usage: /copy [N]"),
            },
            ("register", [username, password]) => Command::Register {
                username: username.to_string(),
                password: password.to_string(),
            },
            ("login", [username, password]) => Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            },
            ("register", _) => invalid("usage: /register USER PASS"),
            ("login", _) => invalid("usage: /login USER PASS"),
            ("logout", []) => Command::Logout,
            ("whoami", []) => Command::WhoAmI,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => invalid(&format!("unknown command /{name}, try /help")),
        };
        Some(parsed)
    }
}

fn position(arg: &str) -> Option<usize> {
    arg.parse().ok().filter(|n| *n > 0)
}

fn invalid(reason: &str) -> Command {
    Command::Invalid(reason.to_string())
}
