#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Move bounce notifications out of an IMAP inbox

use bounceback::{BOUNCEBACK_FOLDER, Failed, ImapConfig, RunReport, Stage};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bounceback", version)]
#[command(
    about = "Move bounce notifications from INBOX into a 'bounceback' folder"
)]
struct Args {
    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(report) => {
            if args.json {
                print_json(&serde_json::json!({ "ok": true, "report": report }));
            } else {
                print_summary(&report);
            }
            ExitCode::SUCCESS
        }
        Err(failed) => {
            if args.json {
                print_json(&serde_json::json!({
                    "ok": false,
                    "stage": failed.stage,
                    "error": failed.error.to_string(),
                    "moved": failed.moved,
                }));
            } else {
                report_failure(&failed);
            }
            ExitCode::from(failed.exit_code())
        }
    }
}

async fn run(args: &Args) -> Result<RunReport, Failed> {
    let config = ImapConfig::from_env().map_err(|e| Failed {
        stage: Stage::Disconnected,
        error: e,
        moved: 0,
    })?;

    let connected = bounceback::connect(&config).await?;
    if !args.json {
        println!("Connected to {}:{}.", config.host, config.port);
    }

    let ready = connected.ensure_folder(BOUNCEBACK_FOLDER).await?;
    if !args.json {
        if ready.created() {
            println!("Created '{}' folder.", ready.folder());
        } else {
            println!("'{}' folder already exists.", ready.folder());
        }
    }

    let (store, report) = ready.scan().await?.into_parts();
    store.logout().await;
    Ok(report)
}

fn print_summary(report: &RunReport) {
    let scan = &report.scan;
    println!(
        "Moved {} bounceback email(s) to the '{}' folder.",
        scan.moved, report.folder
    );

    if !scan.failures.is_empty() {
        println!("\n{} message(s) could not be moved:", scan.failures.len());
        for failure in &scan.failures {
            println!(
                "  UID {:<8} {}  ({})",
                failure.uid,
                truncate(&failure.subject, 50),
                failure.reason
            );
        }
    }

    if !scan.unreadable.is_empty() {
        println!(
            "\n{} message(s) could not be checked and were left in place:",
            scan.unreadable.len()
        );
        for entry in &scan.unreadable {
            println!("  UID {:<8} {}", entry.uid, entry.reason);
        }
    }
}

fn report_failure(failed: &Failed) {
    match failed.stage {
        Stage::Disconnected => eprintln!("Error connecting to mail server: {}", failed.error),
        Stage::Connected => {
            eprintln!("Error preparing '{BOUNCEBACK_FOLDER}' folder: {}", failed.error);
        }
        Stage::Scanning => {
            eprintln!("Error moving bounceback emails: {}", failed.error);
            eprintln!("Moved {} email(s) before stopping.", failed.moved);
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Error encoding report: {e}"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String =
            s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
