use anyhow::{Context, Result};
use chatsync::channel::{EventChannel, LocalEventChannel};
use chatsync::cli::Args;
use chatsync::config::Config;
use chatsync::history::{FilesystemHistoryStore, HistoryStore};
use chatsync::listeners::EventListeners;
use chatsync::models::HistoryRecord;
use chatsync::replay::pump_events;
use chatsync::session::{self, SessionContext};
use chatsync::ui::{display_groups, display_summary};
use clap::Parser;
use colored::*;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    };

    init_tracing(&config);

    let store = FilesystemHistoryStore::new(&config.history_dir);

    // Handle --clear / --clear-all
    if args.clear_all {
        let removed = store.clear_all().await?;
        println!("{}", format!("Cleared {} stored histories.", removed).green());
        return Ok(());
    }
    if let Some(character_id) = &args.clear {
        store.clear_history(character_id).await?;
        println!("{}", format!("Cleared history for {}.", character_id).green());
        return Ok(());
    }

    let Some(events_path) = args.events.as_deref() else {
        print_usage();
        process::exit(1);
    };

    let context = session::shared(SessionContext::new());
    if let Some(session_id) = &args.session {
        session::lock_context(&context).switch_session(session_id);
    }

    let channel = Arc::new(LocalEventChannel::new());
    let mut listeners = EventListeners::new(
        Arc::clone(&channel) as Arc<dyn EventChannel>,
        Arc::clone(&context),
    );
    listeners.setup().await?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = if events_path == "-" {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(events_path)
            .await
            .with_context(|| format!("Failed to open event log: {}", events_path))?;
        Box::new(BufReader::new(file))
    };

    let stats = pump_events(reader, &channel).await?;
    listeners.cleanup();
    tracing::info!(emitted = stats.emitted, skipped = stats.skipped, "replay finished");

    let (groups, state, records) = {
        let ctx = session::lock_context(&context);
        let records: Vec<HistoryRecord> = ctx
            .transcript
            .messages()
            .iter()
            .map(|m| m.to_record())
            .collect();
        (ctx.groups(), ctx.state.clone(), records)
    };

    if config.persist {
        match state.session_id.as_deref() {
            Some(session_id) => {
                store.replace_history(session_id, &records).await?;
                tracing::info!(session = session_id, count = records.len(), "history saved");
            }
            None => eprintln!("{}", "No active session; nothing persisted.".yellow()),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        display_groups(&groups);
    }

    if config.verbose || stats.skipped > 0 {
        display_summary(&state, records.len(), groups.len());
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("{}", "Usage: chatsync [OPTIONS] <EVENTS_FILE|->".yellow());
    eprintln!();
    eprintln!("Replays a JSON-lines backend event log and prints the grouped transcript.");
    eprintln!("Each line: {{\"event\": \"message-received\", \"payload\": {{...}}}}");
    eprintln!();
    eprintln!("Run with --help for all options.");
}
