//! Line-oriented console front end

use mentor_skills::SkillLevel;
use mentor_types::{SkillAction, UserSkillContext};
use std::fmt::Write as _;
use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;

pub const HELP: &str = "Commands:
  /skills     show the tracked skills
  /stats      show progress statistics
  /good       mark the last reply as understood
  /bad        mark the last reply as confusing
  /struggle   mark the last reply as a struggle
  /help       show this help
  /quit       exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Skills,
    Stats,
    Feedback(SkillAction),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Chat(line.to_string());
        };

        match command.split_whitespace().next().unwrap_or_default() {
            "skills" => Self::Skills,
            "stats" => Self::Stats,
            "good" => Self::Feedback(SkillAction::Correct),
            "bad" => Self::Feedback(SkillAction::Confusion),
            "struggle" => Self::Feedback(SkillAction::Struggle),
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Read lines on a dedicated OS thread and forward them over a channel.
///
/// Reads block and cannot be cancelled, so they stay off the runtime and the
/// thread is left behind at shutdown. The channel closes at EOF or on a read error.
pub fn spawn_line_reader<R>(mut reader: R) -> std::io::Result<mpsc::Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let line = line.trim_end_matches(['\r', '\n']).to_string();
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

/// One line per skill, in id order
pub fn render_skills(context: &UserSkillContext) -> String {
    let mut out = String::new();
    for node in context.skills.values() {
        let _ = writeln!(
            out,
            "{} [{}]: {} (mastery {:.2}, confidence {:.2}, {} updates)",
            node.name,
            node.category,
            SkillLevel::from_mastery(node.mastery_probability),
            node.mastery_probability,
            node.confidence,
            node.history.len()
        );
    }
    if out.is_empty() {
        out.push_str("No skills tracked yet.\n");
    }
    out
}
