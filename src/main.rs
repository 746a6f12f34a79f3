use anyhow::{Context, Result};
use clap::Parser;
use dictation_bridge::{
    DictationSession, JsonSettingsStore, SettingsStore, SingleDocumentWorkspace, StatusLine,
    TextBuffer, WebSocketTransport,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

type Session = DictationSession<WebSocketTransport, SingleDocumentWorkspace, StatusLine>;

/// Headless host: streams transcriptions from a dictation server into an
/// in-memory document, driven by commands on stdin
#[derive(Debug, Parser)]
#[command(name = "dictation-bridge", version)]
struct Args {
    /// Settings file
    #[arg(long, default_value = "dictation-bridge.json")]
    settings: String,

    /// Dictation server address (saved to the settings file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Connect immediately
    #[arg(long)]
    connect: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let store = JsonSettingsStore::new(shellexpand::tilde(&args.settings).into_owned());
    let mut settings = store.load()?;
    if let Some(endpoint) = args.endpoint {
        settings.endpoint_address = endpoint;
        store.save(&settings)?;
    }

    info!("Dictation bridge v{}", env!("CARGO_PKG_VERSION"));
    info!("Dictation server: {}", settings.endpoint_address);

    let (mut session, mut events) = DictationSession::new(
        settings.endpoint_address.clone(),
        WebSocketTransport::new(),
        SingleDocumentWorkspace::new(TextBuffer::new()),
        StatusLine::new(),
    );

    if args.connect {
        session.toggle();
    }

    println!("commands: toggle (or empty line), focus, blur, show, stats, set <url>, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line.context("Failed to read stdin")?;
                let Some(line) = line else { break };
                if !run_command(line.trim(), &mut session, &store)? {
                    break;
                }
            }
            Some(event) = events.recv() => {
                let inserted = session.stats().transcripts_inserted;
                session.handle_event(event);
                if session.stats().transcripts_inserted > inserted {
                    print!("{}", last_line(session.workspace().document().text()));
                }
            }
        }
    }

    session.shutdown();
    Ok(())
}

/// Returns `false` when the host should exit
fn run_command(command: &str, session: &mut Session, store: &JsonSettingsStore) -> Result<bool> {
    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));

    match name {
        "" | "toggle" => session.toggle(),
        "focus" => session.workspace_mut().set_focused(true),
        "blur" => session.workspace_mut().set_focused(false),
        "show" => println!("{}", session.workspace().document().text()),
        "stats" => println!("{}", serde_json::to_string_pretty(&session.stats())?),
        "set" if !rest.trim().is_empty() => {
            let endpoint = rest.trim().to_string();
            let mut settings = store.load()?;
            settings.endpoint_address = endpoint.clone();
            store.save(&settings)?;
            session.set_endpoint_address(endpoint);
        }
        "quit" | "exit" => return Ok(false),
        other => warn!("Unknown command: {}", other),
    }

    println!("[{}] {}", session.state(), session.status().text());
    Ok(true)
}

/// Last complete line of `text`, including its newline
fn last_line(text: &str) -> &str {
    let body = text.strip_suffix('\n').unwrap_or(text);
    match body.rfind('\n') {
        Some(index) => &text[index + 1..],
        None => text,
    }
}
