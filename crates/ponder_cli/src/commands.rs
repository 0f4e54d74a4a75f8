//! Slash-command parsing for the interactive prompt.

pub const HELP: &str = "\
Available commands:
  /help            Show this message
  /model           Show the current model
  /model <name>    Switch to another model for the next queries
  /steps           Show the step ceiling
  /steps <n>       Change the step ceiling
  /clear           Clear the screen
  /quit, /exit     Leave
Anything else is sent to the model as a question.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Help,
    ShowModel,
    SetModel(String),
    ShowSteps,
    SetSteps(u32),
    Clear,
    Quit,
    Empty,
    /// A known command with bad arguments; carries the message to show.
    Invalid(String),
    Unknown(String),
}

pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if !trimmed.starts_with('/') {
        return Command::Query(trimmed.to_string());
    }

    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (cmd, args.as_slice()) {
        ("/help", _) => Command::Help,
        ("/quit" | "/exit", _) => Command::Quit,
        ("/clear", _) => Command::Clear,
        ("/model", []) => Command::ShowModel,
        ("/model", [name]) => Command::SetModel(name.to_string()),
        ("/model", _) => Command::Invalid("Usage: /model <name>".into()),
        ("/steps", []) => Command::ShowSteps,
        ("/steps", [n]) => match n.parse() {
            Ok(n) => Command::SetSteps(n),
            Err(_) => Command::Invalid(format!("Not a step count: {}", n)),
        },
        ("/steps", _) => Command::Invalid("Usage: /steps <n>".into()),
        _ => Command::Unknown(cmd.to_string()),
    }
}
