use research_core::QUIZ_OPTION_COUNT;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetKey(String),
    Search(String),
    History,
    /// 1-based history position.
    Show(usize),
    Quiz(usize),
    Answer { position: usize, option: usize },
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0:?} is not a history number")]
    BadPosition(String),
    #[error("{0:?} is not an option number (1-4)")]
    BadOption(String),
}

pub const HELP: &str = "\
Commands:
  key <api-key>         set the generative-text API key
  search <query>        search the web and summarize (bare text works too)
  history               list past searches, newest first
  show <n>              show summary and sources of history entry n
  quiz <n>              generate a quiz for history entry n
  answer <n> <1-4>      answer the quiz of history entry n
  help                  show this help
  quit                  leave";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "key" => {
            if rest.is_empty() {
                Err(CommandError::Usage("key <api-key>"))
            } else {
                Ok(Command::SetKey(rest.to_string()))
            }
        }
        // An empty query is left for the session to reject.
        "search" => Ok(Command::Search(rest.to_string())),
        "history" => Ok(Command::History),
        "show" => Ok(Command::Show(position(rest, "show <n>")?)),
        "quiz" => Ok(Command::Quiz(position(rest, "quiz <n>")?)),
        "answer" => {
            let mut parts = rest.split_whitespace();
            let (Some(position_arg), Some(option_arg), None) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(CommandError::Usage("answer <n> <1-4>"));
            };
            let position = position(position_arg, "answer <n> <1-4>")?;
            let option = match option_arg.parse::<usize>() {
                Ok(n) if (1..=QUIZ_OPTION_COUNT).contains(&n) => n,
                _ => return Err(CommandError::BadOption(option_arg.to_string())),
            };
            Ok(Command::Answer { position, option })
        }
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Ok(Command::Search(line.to_string())),
    }
}

fn position(arg: &str, usage: &'static str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadPosition(arg.to_string())),
    }
}
