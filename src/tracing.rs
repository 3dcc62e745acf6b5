//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! highlight movement and session state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=highlights=debug,message=debug` - scoped filtering
//! - `RUST_LOG=tint::session=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/tint/logs/tint.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{DocumentKey, Highlight};
use crate::persistence::Storage;
use crate::render::Renderer;
use crate::session::Session;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`.
/// File logging writes to `~/.config/tint/logs/tint.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr so `tint list` output stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "tint.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        tracing::debug!("Tracing already initialized, keeping it: {}", e);
    }
}

/// Lightweight snapshot of the active document's highlights for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSnapshot {
    pub key: Option<DocumentKey>,
    pub highlights: Vec<Highlight>,
}

impl HighlightSnapshot {
    pub fn from_session<R: Renderer, S: Storage>(session: &Session<R, S>) -> Self {
        let key = session.active().map(|a| a.key.clone());
        let highlights = key
            .as_ref()
            .map(|k| session.highlights(k))
            .unwrap_or_default();
        Self { key, highlights }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &HighlightSnapshot) -> Option<String> {
        if self.key != other.key {
            let name = |k: &Option<DocumentKey>| {
                k.as_ref()
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| "-".to_string())
            };
            return Some(format!(
                "active: {} → {}",
                name(&self.key),
                name(&other.key)
            ));
        }

        let removed: Vec<String> = self
            .highlights
            .iter()
            .filter(|h| !other.highlights.contains(h))
            .map(|h| h.to_string())
            .collect();
        let added: Vec<String> = other
            .highlights
            .iter()
            .filter(|h| !self.highlights.contains(h))
            .map(|h| h.to_string())
            .collect();

        let mut changes = Vec::new();
        if !removed.is_empty() {
            changes.push(format!("-[{}]", removed.join(", ")));
        }
        if !added.is_empty() {
            changes.push(format!("+[{}]", added.join(", ")));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Range;

    fn snapshot(highlights: Vec<Highlight>) -> HighlightSnapshot {
        HighlightSnapshot {
            key: Some(DocumentKey::new("doc")),
            highlights,
        }
    }

    #[test]
    fn test_diff_none_when_unchanged() {
        let h = Highlight::new(Range::from_coords(0, 0, 0, 4), "#ff0000");
        let a = snapshot(vec![h.clone()]);
        assert_eq!(a.diff(&snapshot(vec![h])), None);
    }

    #[test]
    fn test_diff_reports_added_and_removed() {
        let before = snapshot(vec![Highlight::new(Range::from_coords(0, 0, 0, 4), "a")]);
        let after = snapshot(vec![Highlight::new(Range::from_coords(0, 1, 0, 4), "a")]);
        let diff = before.diff(&after).unwrap();
        assert!(diff.starts_with("-["));
        assert!(diff.contains("+["));
    }

    #[test]
    fn test_diff_reports_focus_change() {
        let before = HighlightSnapshot {
            key: None,
            highlights: Vec::new(),
        };
        let diff = before.diff(&snapshot(Vec::new())).unwrap();
        assert_eq!(diff, "active: - → doc");
    }
}
