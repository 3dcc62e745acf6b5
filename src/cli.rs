//! Command-line argument parsing for the `tint` tool
//!
//! Supports:
//! - Painting and clearing ranges of a file
//! - Editing a file while its highlights follow the edit
//! - Listing stored highlights
//!
//! Positions are written `LINE:COLUMN`, 1-indexed, and converted to
//! 0-indexed positions here.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::highlight::TextChange;
use crate::model::{Position, Range, Selection};

/// Colored highlights that follow your edits
#[derive(Parser, Debug)]
#[command(name = "tint", version, about = "Colored highlights that follow your edits")]
pub struct CliArgs {
    /// Config file to use instead of ~/.config/tint/config.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding stored highlights (default ~/.config/tint/state)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Paint a range with configured color N
    Paint {
        file: PathBuf,
        #[arg(long, value_parser = parse_position)]
        from: Position,
        #[arg(long, value_parser = parse_position)]
        to: Position,
        /// 1-based color index
        #[arg(long, value_name = "N")]
        color: usize,
    },
    /// Remove coloring under a range
    Clear {
        file: PathBuf,
        #[arg(long, value_parser = parse_position)]
        from: Position,
        #[arg(long, value_parser = parse_position)]
        to: Position,
    },
    /// Remove every highlight of a file
    ClearAll { file: PathBuf },
    /// Replace a range of the file with TEXT, moving highlights along
    Edit {
        file: PathBuf,
        #[arg(long, value_parser = parse_position)]
        from: Position,
        #[arg(long, value_parser = parse_position)]
        to: Position,
        /// Replacement text (empty deletes the range)
        #[arg(long, default_value = "")]
        text: String,
    },
    /// Print the highlights of a file
    List { file: PathBuf },
}

impl CliCommand {
    /// The file every subcommand works on
    pub fn file(&self) -> &Path {
        match self {
            CliCommand::Paint { file, .. }
            | CliCommand::Clear { file, .. }
            | CliCommand::ClearAll { file }
            | CliCommand::Edit { file, .. }
            | CliCommand::List { file } => file,
        }
    }

    /// Selection the command acts on, for paint and clear
    pub fn selection(&self) -> Option<Selection> {
        match self {
            CliCommand::Paint { from, to, .. } | CliCommand::Clear { from, to, .. } => {
                Some(Selection::new(*from, *to))
            }
            _ => None,
        }
    }

    /// The text change an `edit` describes
    pub fn text_change(&self) -> Option<TextChange> {
        match self {
            CliCommand::Edit { from, to, text, .. } => {
                Some(TextChange::new(Range::new(*from, *to), text.as_str()))
            }
            _ => None,
        }
    }
}

/// Parse a 1-indexed `LINE:COLUMN` into a 0-indexed position
pub fn parse_position(s: &str) -> Result<Position, String> {
    let (line, column) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got '{}'", s))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line '{}'", line))?;
    let column: usize = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{}'", column))?;
    if line == 0 || column == 0 {
        return Err("line and column start at 1".to_string());
    }
    // Convert from 1-indexed (user input) to 0-indexed (internal)
    Ok(Position::new(line - 1, column - 1))
}

/// Format a 0-indexed position the way users write it
pub fn format_position(pos: Position) -> String {
    format!("{}:{}", pos.line + 1, pos.column + 1)
}
