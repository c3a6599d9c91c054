//! Line-oriented editor scripts replayed against an `EditorSurface`.
//!
//! One command per line; `#` starts a comment. Text arguments accept
//! `\n`, `\t` and `\\` escapes.

use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use caret_trail_config::TrailConfig;
use caret_trail_core::{
    EditorSurface, HistoryConfig, Position, SoftUndo, SoftUndoCommand, StateSnapshot,
};

/// A single script instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// `open NAME [TEXT]`
    Open { name: String, text: String },
    /// `close`
    Close,
    /// `select RANGE[, RANGE...]`
    Select(StateSnapshot),
    /// `move LINE:COL`
    Move(Position),
    /// `type TEXT`
    Type(String),
    /// `undo` / `redo`
    Soft(SoftUndoCommand),
    /// `print`
    Print,
    /// `history`
    History,
}

/// Parses one line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>> {
    let line = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let command = match keyword {
        "open" => {
            let (name, text) = match rest.split_once(char::is_whitespace) {
                Some((name, text)) => (name, unescape(text.trim())),
                None => (rest, String::new()),
            };
            if name.is_empty() {
                anyhow::bail!("`open` needs a document name");
            }
            ScriptCommand::Open {
                name: name.to_string(),
                text,
            }
        }
        "close" => ScriptCommand::Close,
        "select" => {
            let snapshot: StateSnapshot = rest.parse()?;
            if snapshot.is_empty() {
                anyhow::bail!("`select` needs at least one range");
            }
            ScriptCommand::Select(snapshot)
        }
        "move" => ScriptCommand::Move(rest.parse()?),
        "type" => ScriptCommand::Type(unescape(rest)),
        "undo" => ScriptCommand::Soft(SoftUndoCommand::Undo),
        "redo" => ScriptCommand::Soft(SoftUndoCommand::Redo),
        "print" => ScriptCommand::Print,
        "history" => ScriptCommand::History,
        other => anyhow::bail!("unknown command `{other}`"),
    };
    Ok(Some(command))
}

/// Parses a whole script, tagging each command with its 1-based line number.
pub fn parse_script(source: &str) -> Result<Vec<(usize, ScriptCommand)>> {
    let mut commands = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        if let Some(cmd) = parse_line(line).with_context(|| format!("line {line_no}"))? {
            commands.push((line_no, cmd));
        }
    }
    Ok(commands)
}

/// Reads a script from `path`, or from stdin when `path` is `None`.
pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read script from stdin"),
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A surface with soft undo attached, driven by script commands.
pub struct Session {
    surface: Rc<EditorSurface>,
    soft_undo: SoftUndo<EditorSurface>,
    json: bool,
}

impl Session {
    pub fn new(config: &TrailConfig, json: bool) -> Self {
        let surface = Rc::new(EditorSurface::new());
        let soft_undo = SoftUndo::attach(
            &surface,
            &HistoryConfig::from(config),
            config.reveal_on_restore,
        );
        Self {
            surface,
            soft_undo,
            json,
        }
    }

    pub fn surface(&self) -> &EditorSurface {
        &self.surface
    }

    /// Runs every command, stopping at the first failure.
    pub fn run_script(&self, source: &str, out: &mut impl Write) -> Result<()> {
        for (line_no, command) in parse_script(source)? {
            self.run(&command, out)
                .with_context(|| format!("line {line_no}"))?;
        }
        Ok(())
    }

    pub fn run(&self, command: &ScriptCommand, out: &mut impl Write) -> Result<()> {
        match command {
            ScriptCommand::Open { name, text } => {
                self.surface.open_document(name.as_str(), text);
            }
            ScriptCommand::Close => self.surface.close_document(),
            ScriptCommand::Select(snapshot) => {
                self.surface.set_selections(snapshot.ranges().to_vec())?
            }
            ScriptCommand::Move(pos) => self.surface.move_caret(*pos)?,
            ScriptCommand::Type(text) => self.surface.insert_text(text)?,
            ScriptCommand::Soft(cmd) => self.soft_undo.execute(*cmd),
            ScriptCommand::Print => self.print(out)?,
            ScriptCommand::History => self.print_history(out)?,
        }
        Ok(())
    }

    fn print(&self, out: &mut impl Write) -> Result<()> {
        let snapshot = StateSnapshot::new(self.surface.selections());
        if self.json {
            serde_json::to_writer(&mut *out, &snapshot)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{snapshot}")?;
        }
        Ok(())
    }

    fn print_history(&self, out: &mut impl Write) -> Result<()> {
        let controller = self.soft_undo.controller();
        let entries = controller.history_entries();
        let position = controller.history_position();
        if self.json {
            let value = serde_json::json!({
                "position": position,
                "entries": entries,
            });
            serde_json::to_writer(&mut *out, &value)?;
            writeln!(out)?;
        } else {
            for (idx, entry) in entries.iter().enumerate() {
                let marker = if idx == position { '>' } else { ' ' };
                writeln!(out, "{marker} {idx:>3}  {entry}")?;
            }
        }
        Ok(())
    }
}
