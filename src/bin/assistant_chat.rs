//! assistant-chat — terminal front end for an assistants chat session
//!
//! Usage:
//!   assistant-chat            Read the key from OPENAI_API_KEY (or prompt), then chat
//!   assistant-chat --help     Show usage
//!
//! Ctrl-C while a reply is pending cancels that run; at the prompt it exits.
//! Ctrl-D exits.

use anyhow::Context;
use assistants_chat::{MessageRole, SessionConfig, SessionController};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if let Some(arg) = args.get(1) {
        match arg.as_str() {
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "version" | "--version" | "-V" => {
                println!("assistant-chat {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            prompt("API key: ").await?;
            lines
                .next_line()
                .await?
                .context("no API key supplied")?
        }
    };

    let mut session = SessionController::new(SessionConfig::from_env());
    session.set_api_key(api_key);

    println!("Creating assistant...");
    if session.create_assistant().await.is_err() {
        if let Some(err) = &session.state().error {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
    println!("Ready. Ask a math question.");

    let cancel = session.cancel_handle();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !cancel.cancel() {
                println!();
                std::process::exit(130);
            }
        }
    });

    loop {
        prompt("> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        session.set_input(line);
        if !session.state().can_send() {
            continue;
        }

        match session.submit_input().await {
            Ok(()) => render(&session),
            Err(_) => {
                if let Some(err) = &session.state().error {
                    eprintln!("{err}");
                }
            }
        }
    }

    Ok(())
}

fn render(session: &SessionController) {
    println!();
    for msg in &session.state().messages {
        let who = match msg.role {
            MessageRole::User => "you",
            MessageRole::Assistant => "assistant",
        };
        println!("[{who}] {}", msg.content);
    }
    println!();
}

async fn prompt(text: &str) -> anyhow::Result<()> {
    let mut out = tokio::io::stdout();
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

fn print_usage() {
    println!(
        r#"assistant-chat — chat with a hosted assistant from the terminal

USAGE:
    assistant-chat [--help | --version]

ENVIRONMENT:
    OPENAI_API_KEY                  API key (prompted for when unset)
    ASSISTANTS_BASE_URL             API base URL (default https://api.openai.com/v1)
    ASSISTANTS_MODEL                Assistant model (default gpt-4o)
    ASSISTANTS_HTTP_TIMEOUT_SECS    Per-request timeout (default none)
    ASSISTANTS_POLL_INTERVAL_MS     Delay between run status checks (default 1000)
    ASSISTANTS_MAX_POLL_ATTEMPTS    Status checks before giving up (default 300)
    ASSISTANTS_POLL_DEADLINE_SECS   Wall-clock bound on one run (default none)
    RUST_LOG                        Log filter (default warn)"#
    );
}
