//! `tint` - colored highlights over text files from the command line
//!
//! Each invocation acts as a short-lived host: it opens one file, reports
//! it as the active editor, sends one command through the update loop and
//! disposes the session. Highlights persist between invocations.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ropey::Rope;

use tint::cli::{format_position, CliArgs, CliCommand};
use tint::commands::Cmd;
use tint::config::HighlighterConfig;
use tint::messages::{DocumentMsg, EditBatch, EditorMsg, HighlightMsg, Msg};
use tint::model::document::{apply_change, char_index};
use tint::model::{DocumentKey, Highlight};
use tint::persistence::{JsonFileStorage, Storage};
use tint::render::{DecorationTable, Renderer};
use tint::session::Session;
use tint::update::update;

fn main() -> ExitCode {
    tint::tracing::init();

    let args = CliArgs::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the command was refused with a warning
fn run(args: CliArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => HighlighterConfig::load_from(path),
        None => HighlighterConfig::load(),
    };
    let storage = match &args.state_dir {
        Some(dir) => JsonFileStorage::new(dir),
        None => JsonFileStorage::in_config_dir()?,
    };

    let path = args.command.file().to_path_buf();
    let mut text = Rope::from_reader(BufReader::new(
        File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?,
    ))
    .with_context(|| format!("Failed to read {}", path.display()))?;
    let key = DocumentKey::from_path(&path);

    let mut session = Session::new(config, DecorationTable::new(), storage);

    // Load-time warnings are informational; the command still runs
    let activated = Msg::Editor(EditorMsg::Activated {
        key: key.clone(),
        text: text.clone(),
    });
    report(update(&mut session, activated));

    let ok = match &args.command {
        CliCommand::Paint { color, .. } => {
            select(&mut session, &args.command, &text)?;
            report(update(
                &mut session,
                Msg::Highlight(HighlightMsg::ApplyColor(*color)),
            ))
        }
        CliCommand::Clear { .. } => {
            select(&mut session, &args.command, &text)?;
            report(update(
                &mut session,
                Msg::Highlight(HighlightMsg::ClearSelection),
            ))
        }
        CliCommand::ClearAll { .. } => report(update(
            &mut session,
            Msg::Highlight(HighlightMsg::ClearAll),
        )),
        CliCommand::Edit { .. } => {
            let change = args
                .command
                .text_change()
                .context("edit without a text change")?;
            apply_change(&mut text, &change)?;
            let writer = BufWriter::new(
                File::create(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
            );
            text.write_to(writer)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let batch = EditBatch::single(key.clone(), change);
            report(update(&mut session, Msg::Document(DocumentMsg::Changed(batch))))
        }
        CliCommand::List { .. } => {
            for highlight in session.highlights(&key) {
                println!("{}", describe(&highlight, &text));
            }
            true
        }
    };

    session.dispose();
    Ok(ok)
}

/// Report the selection to the session after checking it fits the file
fn select<R: Renderer, S: Storage>(
    session: &mut Session<R, S>,
    command: &CliCommand,
    text: &Rope,
) -> Result<()> {
    if let Some(selection) = command.selection() {
        char_index(text, selection.start())?;
        char_index(text, selection.end())?;
        update(session, Msg::Editor(EditorMsg::SelectionChanged(selection)));
    }
    Ok(())
}

/// Print any warnings; returns whether there were none
fn report(cmd: Option<Cmd>) -> bool {
    let Some(cmd) = cmd else {
        return true;
    };
    let warnings = cmd.warnings();
    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }
    warnings.is_empty()
}

fn describe(highlight: &Highlight, text: &Rope) -> String {
    let range = highlight.range;
    let covered = match (char_index(text, range.start()), char_index(text, range.end())) {
        (Ok(start), Ok(end)) => text.slice(start..end).to_string(),
        _ => String::new(),
    };
    format!(
        "{}-{}\t{}\t{:?}",
        format_position(range.start()),
        format_position(range.end()),
        highlight.color,
        covered
    )
}
