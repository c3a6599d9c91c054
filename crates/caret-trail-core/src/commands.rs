/// Commands exposed to the host's command layer.
use std::fmt;
use std::str::FromStr;

/// A soft undo/redo command with a stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoftUndoCommand {
    Undo,
    Redo,
}

impl SoftUndoCommand {
    pub const ALL: [SoftUndoCommand; 2] = [SoftUndoCommand::Undo, SoftUndoCommand::Redo];

    /// Identifier used when registering the command with a host.
    pub fn id(self) -> &'static str {
        match self {
            SoftUndoCommand::Undo => "caretTrail.undo",
            SoftUndoCommand::Redo => "caretTrail.redo",
        }
    }
}

impl fmt::Display for SoftUndoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SoftUndoCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.id() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown command `{s}`"))
    }
}
