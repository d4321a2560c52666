//! `geeps` — interactive terminal client for the Geeps text-generation
//! service.
//!
//! The loop plays the role the single-page form plays in a browser: capture
//! a question with its sampling parameters, send it, show the answer, and
//! offer keep / clear / delete / export on the accumulated keepers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use geeps_keeper::{FormInput, HttpGenerationClient, KeeperConfig, Session};

#[derive(Parser, Debug)]
#[command(author, version, about = "Ask Geeps, keep the good answers, export them as a PDF", long_about = None)]
struct Args {
    /// Base URL of the generation service (overrides GEEPS_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory the exported PDF is written to (overrides GEEPS_EXPORT_DIR)
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = KeeperConfig::default();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(export_dir) = args.export_dir {
        config.export_dir = export_dir;
    }

    info!(base_url = %config.base_url, "geeps starting");

    let backend = Arc::new(HttpGenerationClient::new(config.base_url.clone()));
    let mut session = Session::new(backend);
    let mut form = FormInput::default();
    let mut editor = DefaultEditor::new().context("could not initialize the line editor")?;

    println!("The Super Knowledge Machine");
    println!("Type your question at the prompt, or a command:");
    print_help();

    loop {
        let line = match read_line(&mut editor, "geeps> ") {
            Some(line) => line,
            None => break,
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&line);

        match line.as_str() {
            "quit" | "exit" => break,
            "help" => print_help(),
            "keep" => keep(&mut session),
            "clear" => {
                session.clear_entry(&mut form);
                println!("Entry cleared.");
            }
            "list" => list(&session),
            "export" => export(&session, &config.export_dir),
            other if other.starts_with("delete") => delete(&mut session, other),
            question => ask(&mut session, &mut form, &mut editor, question).await,
        }
    }

    Ok(())
}

fn print_help() {
    println!("  keep        keep the last answer");
    println!("  clear       discard the last answer and reset the form");
    println!("  list        show all the keepers");
    println!("  delete <n>  remove keeper number <n>");
    println!("  export      write the keepers to {}", geeps_keeper::EXPORT_FILE_NAME);
    println!("  quit        leave");
}

/// Capture the remaining form fields, validate, and submit one request.
async fn ask(session: &mut Session, form: &mut FormInput, editor: &mut DefaultEditor, question: &str) {
    form.user_request = question.to_string();
    form.temperature = match read_line(editor, "temperature (0 to 1, closer to 1 takes more chances)> ") {
        Some(value) => value,
        None => return,
    };
    form.max_tokens = match read_line(editor, "max tokens (100 to 500, default is 200)> ") {
        Some(value) => value,
        None => return,
    };

    let request = match form.validate() {
        Ok(request) => request,
        Err(err) => {
            println!("{err}");
            return;
        }
    };

    println!("Asking Geeps...");
    let generated = session.submit(request).await;

    for notice in session.drain_notices() {
        println!("{}", notice.message);
    }

    if generated {
        if let Some(pending) = session.pending() {
            println!();
            println!("{}", pending.text);
            println!();
            println!("keep it ('keep') or discard it ('clear')?");
        }
    }
}

fn keep(session: &mut Session) {
    if session.keep().is_some() {
        println!("Keeper! {} kept so far.", session.ledger().len());
    } else {
        println!("Nothing to keep yet — ask something first.");
    }
}

fn list(session: &Session) {
    let entries = session.ledger().entries();
    if entries.is_empty() {
        println!("No keepers yet.");
        return;
    }
    println!("All the Keepers:");
    for (index, entry) in entries.iter().enumerate() {
        println!("  {}. {}", index + 1, entry.text);
    }
}

fn delete(session: &mut Session, line: &str) {
    let index: Option<usize> = line
        .strip_prefix("delete")
        .map(str::trim)
        .and_then(|rest| rest.parse().ok());

    let entries = session.ledger().entries();
    match index {
        Some(n) if n >= 1 && n <= entries.len() => {
            let id = entries[n - 1].id;
            session.delete(id);
            println!("Removed keeper {n}.");
        }
        _ => println!("Usage: delete <n> (1 to {})", entries.len()),
    }
}

fn export(session: &Session, export_dir: &std::path::Path) {
    if !session.can_export() {
        println!("Nothing to export yet — keep something first.");
        return;
    }
    match session.export_pdf(export_dir) {
        Ok(path) => println!("Wrote {}", path.display()),
        Err(err) => println!("Export failed: {err}"),
    }
}

/// Read one line, treating Ctrl-C / Ctrl-D as "stop here".
fn read_line(editor: &mut DefaultEditor, prompt: &str) -> Option<String> {
    match editor.readline(prompt) {
        Ok(line) => Some(line),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
        Err(err) => {
            println!("Input error: {err}");
            None
        }
    }
}
