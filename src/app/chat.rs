//! Interactive chat adapter.
//!
//! Each input line is converted and both sides are appended to the
//! [`ChatSession`]. Lines starting with `/` are session commands:
//!
//! | Command        | Effect                                        |
//! |----------------|-----------------------------------------------|
//! | `/clear`       | reset the history                             |
//! | `/history`     | print the history                             |
//! | `/save <path>` | export the history as JSON                    |
//! | `/kb`          | show the active knowledgebase                 |
//! | `/kb <path>`   | switch knowledgebase (`/kb off` disables it)  |
//! | `/help`        | list commands                                 |
//! | `/quit`        | leave the session                             |

use std::path::PathBuf;

use anyhow::Result;
use rustyline::error::ReadlineError;

use super::AppContext;
use crate::convert::ConvertError;
use crate::llm::ModelClient;
use crate::session::ChatSession;

const HELP: &str = "\
Type Turkish text to convert it. Commands:
  /clear          reset the conversation
  /history        show the conversation
  /save <path>    export the conversation as JSON
  /kb [path|off]  show, switch or disable the knowledgebase
  /help           show this help
  /quit           leave";

// ---------------------------------------------------------------------------
// ChatCommand
// ---------------------------------------------------------------------------

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    Convert(String),
    Clear,
    History,
    Save(PathBuf),
    ShowKb,
    SetKb(PathBuf),
    DisableKb,
    Help,
    Quit,
    /// Unknown command or missing argument; carries the message to show.
    Invalid(String),
    Empty,
}

/// Parse a line typed at the chat prompt.
pub fn parse_line(line: &str) -> ChatCommand {
    let line = line.trim();
    if line.is_empty() {
        return ChatCommand::Empty;
    }
    if !line.starts_with('/') {
        return ChatCommand::Convert(line.to_string());
    }

    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };

    match (name, arg) {
        ("/clear", _) => ChatCommand::Clear,
        ("/history", _) => ChatCommand::History,
        ("/save", "") => ChatCommand::Invalid("usage: /save <path>".into()),
        ("/save", path) => ChatCommand::Save(PathBuf::from(path)),
        ("/kb", "") => ChatCommand::ShowKb,
        ("/kb", "off") => ChatCommand::DisableKb,
        ("/kb", path) => ChatCommand::SetKb(PathBuf::from(path)),
        ("/help", _) => ChatCommand::Help,
        ("/quit" | "/exit", _) => ChatCommand::Quit,
        (other, _) => ChatCommand::Invalid(format!("unknown command {other}; try /help")),
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// What the loop should show after handling a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Converted(String),
    Info(String),
    Error(String),
    Quit,
    Nothing,
}

// ---------------------------------------------------------------------------
// ChatState
// ---------------------------------------------------------------------------

/// A running chat: conversion context plus the session history.
pub struct ChatState<C: ModelClient> {
    ctx: AppContext<C>,
    session: ChatSession,
}

impl<C: ModelClient> ChatState<C> {
    pub fn new(ctx: AppContext<C>) -> Self {
        Self {
            ctx,
            session: ChatSession::new(),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub async fn handle(&mut self, command: ChatCommand) -> Reply {
        match command {
            ChatCommand::Convert(text) => self.convert(text).await,
            ChatCommand::Clear => {
                self.session.clear();
                Reply::Info("conversation cleared".into())
            }
            ChatCommand::History if self.session.is_empty() => {
                Reply::Info("(no messages yet)".into())
            }
            ChatCommand::History => Reply::Info(self.session.transcript()),
            ChatCommand::Save(path) => match self.session.save_to(&path) {
                Ok(()) => Reply::Info(format!(
                    "saved {} messages to {}",
                    self.session.len(),
                    path.display()
                )),
                Err(e) => Reply::Error(format!("cannot save conversation: {e:#}")),
            },
            ChatCommand::ShowKb => Reply::Info(match self.ctx.kb_path() {
                Some(path) => format!("knowledgebase: {}", path.display()),
                None => "no knowledgebase".into(),
            }),
            ChatCommand::SetKb(path) if path.is_file() => {
                let message = format!("knowledgebase: {}", path.display());
                self.ctx.set_kb_path(Some(path));
                Reply::Info(message)
            }
            ChatCommand::SetKb(path) => {
                Reply::Error(format!("knowledgebase file not found: {}", path.display()))
            }
            ChatCommand::DisableKb => {
                self.ctx.set_kb_path(None);
                Reply::Info("knowledgebase disabled".into())
            }
            ChatCommand::Help => Reply::Info(HELP.into()),
            ChatCommand::Quit => Reply::Quit,
            ChatCommand::Invalid(message) => Reply::Error(message),
            ChatCommand::Empty => Reply::Nothing,
        }
    }

    /// A refused request (no key, blank text) leaves the history untouched;
    /// a failed model call keeps the user's line but records no answer.
    async fn convert(&mut self, text: String) -> Reply {
        match self.ctx.convert(&text).await {
            Ok(output) => {
                self.session.push_user(text);
                self.session.push_assistant(output.clone());
                Reply::Converted(output)
            }
            Err(e @ (ConvertError::Configuration | ConvertError::Input)) => {
                Reply::Error(e.to_string())
            }
            Err(e @ ConvertError::ExternalService(_)) => {
                self.session.push_user(text);
                Reply::Error(e.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Read lines until `/quit`, Ctrl-C or Ctrl-D.
pub async fn run<C: ModelClient>(mut state: ChatState<C>) -> Result<()> {
    let mut editor = rustyline::DefaultEditor::new()?;

    println!("Ottoman converter. Type Turkish text, or /help.");
    if !state.ctx.has_api_key() {
        eprintln!("warning: no API key configured; conversions will fail until one is set");
    }
    if let Some(path) = state.ctx.kb_path() {
        println!("knowledgebase: {}", path.display());
    }

    loop {
        let line = match editor.readline("› ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        match state.handle(parse_line(&line)).await {
            Reply::Converted(text) => println!("{text}"),
            Reply::Info(text) => println!("{text}"),
            Reply::Error(text) => eprintln!("error: {text}"),
            Reply::Quit => break,
            Reply::Nothing => {}
        }
    }

    log::debug!("chat: session ended with {} messages", state.session.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
