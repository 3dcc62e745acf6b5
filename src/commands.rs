//! Command types for the Elm-style architecture
//!
//! Commands represent host-side effects to perform after an update.
//! Rendering and persistence already happened synchronously inside the
//! update; what remains is user-facing UI.

use crate::config::HighlighterConfig;
use crate::error::HighlightError;
use crate::messages::{HighlightMsg, Msg};
use crate::model::Color;
use crate::session::PickToken;

// ============================================================================
// Command Registry
// ============================================================================

/// Prefix shared by every registered command name
pub const COMMAND_PREFIX: &str = "tint";

/// Identifies a command the host registers and binds to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// `tint.highlightN`
    ApplyColor(usize),
    PickColor,
    ClearSelection,
    ClearAll,
}

impl CommandId {
    /// Registered command name, e.g. `tint.highlight3`
    pub fn name(&self) -> String {
        match self {
            CommandId::ApplyColor(n) => format!("{}.highlight{}", COMMAND_PREFIX, n),
            CommandId::PickColor => format!("{}.pickColor", COMMAND_PREFIX),
            CommandId::ClearSelection => format!("{}.clearHighlightAtSelection", COMMAND_PREFIX),
            CommandId::ClearAll => format!("{}.clearHighlights", COMMAND_PREFIX),
        }
    }

    /// Human-readable label for menus and palettes
    pub fn label(&self) -> String {
        match self {
            CommandId::ApplyColor(n) => format!("Highlight with Color {}", n),
            CommandId::PickColor => "Highlight with Color...".to_string(),
            CommandId::ClearSelection => "Clear Highlight at Selection".to_string(),
            CommandId::ClearAll => "Clear All Highlights".to_string(),
        }
    }

    /// Look a command up by its registered name
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(COMMAND_PREFIX)?.strip_prefix('.')?;
        match rest {
            "pickColor" => Some(CommandId::PickColor),
            "clearHighlightAtSelection" => Some(CommandId::ClearSelection),
            "clearHighlights" => Some(CommandId::ClearAll),
            _ => rest
                .strip_prefix("highlight")?
                .parse()
                .ok()
                .map(CommandId::ApplyColor),
        }
    }

    pub fn to_msg(self) -> Msg {
        Msg::Highlight(match self {
            CommandId::ApplyColor(n) => HighlightMsg::ApplyColor(n),
            CommandId::PickColor => HighlightMsg::PickColor,
            CommandId::ClearSelection => HighlightMsg::ClearSelection,
            CommandId::ClearAll => HighlightMsg::ClearAll,
        })
    }
}

/// Every command the host should register for `config`
pub fn registered_commands(config: &HighlighterConfig) -> Vec<CommandId> {
    let mut commands: Vec<CommandId> = (1..=config.color_command_count())
        .map(CommandId::ApplyColor)
        .collect();
    commands.extend([
        CommandId::PickColor,
        CommandId::ClearSelection,
        CommandId::ClearAll,
    ]);
    commands
}

// ============================================================================
// Commands
// ============================================================================

/// One entry offered by the color picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorChoice {
    /// 1-based index to answer with
    pub index: usize,
    pub label: String,
    pub color: Color,
}

impl ColorChoice {
    pub fn from_config(config: &HighlighterConfig) -> Vec<ColorChoice> {
        config
            .colors
            .iter()
            .enumerate()
            .map(|(i, token)| ColorChoice {
                index: i + 1,
                label: format!("Color {}", i + 1),
                color: Color::new(token.as_str()),
            })
            .collect()
    }
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Show a warning to the user
    ShowWarning(String),
    /// Offer `choices`; answer with `PickerMsg::Chosen` or
    /// `PickerMsg::Cancelled`, or send `PickerMsg::TimedOut` after
    /// `timeout_ms`
    ShowColorPicker {
        token: PickToken,
        choices: Vec<ColorChoice>,
        timeout_ms: u64,
    },
    /// Take down the picker for `token`
    HideColorPicker(PickToken),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    pub fn warning(error: &HighlightError) -> Self {
        Cmd::ShowWarning(error.to_string())
    }

    /// Every warning message in this command, batches flattened
    pub fn warnings(&self) -> Vec<&str> {
        match self {
            Cmd::ShowWarning(message) => vec![message.as_str()],
            Cmd::Batch(cmds) => cmds.iter().flat_map(Cmd::warnings).collect(),
            _ => Vec::new(),
        }
    }
}
