use clap::{Parser, Subcommand};
use clip_tui::history::Entry;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "cliptui", version)]
#[command(about = "A terminal clipboard history browser", long_about = None)]
pub struct Cli {
    /// Override the history snapshot location
    #[arg(long, global = true)]
    pub history_file: Option<PathBuf>,

    /// Maximum number of entries to keep
    #[arg(long, global = true)]
    pub max_items: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print history entries, newest first
    List {
        /// Only show entries containing this text (case-insensitive)
        query: Option<String>,

        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy an entry back to the clipboard
    Copy {
        /// Position from `list` (1 = newest) or entry id
        target: Target,
    },
    /// Delete an entry from the history
    Delete {
        /// Position from `list` (1 = newest) or entry id
        target: Target,
    },
    /// Delete every entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show where history and config are stored
    Path,
}

/// An entry picked on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Position(usize),
    Id(Uuid),
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(Target::Id(id));
        }
        match s.parse::<usize>() {
            Ok(0) => Err("positions start at 1".to_string()),
            Ok(position) => Ok(Target::Position(position)),
            Err(_) => Err(format!("'{s}' is neither a list position nor an entry id")),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Position(position) => write!(f, "position {position}"),
            Target::Id(id) => write!(f, "id {id}"),
        }
    }
}

impl Target {
    /// Resolve against the full history, newest first.
    pub fn resolve(&self, entries: &[&Entry]) -> Option<Uuid> {
        match self {
            Target::Position(position) => position
                .checked_sub(1)
                .and_then(|index| entries.get(index))
                .map(|entry| entry.id()),
            Target::Id(id) => entries
                .iter()
                .find(|entry| entry.id() == *id)
                .map(|entry| entry.id()),
        }
    }
}
