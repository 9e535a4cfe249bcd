//! upwatch: upload files to a progress-reporting upload page and follow
//! each file's progress from the server's push channel.

mod config;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use upwatch_client::{
    FormField, HttpUploader, SessionConfig, SessionEvent, UploadController, UploadSession,
    WsConnector, pick_paths,
};
use upwatch_protocol::{ChannelKind, parse_page_url};

use crate::config::CliConfig;
use crate::terminal::TerminalDisplay;

#[derive(Parser)]
#[command(name = "upwatch")]
#[command(about = "Upload files and watch per-file progress", long_about = None)]
struct Cli {
    /// Files or directories to upload
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Upload page location (overrides the configured page_url)
    #[arg(long, value_name = "URL")]
    page: Option<String>,

    /// Session identifier (random if omitted)
    #[arg(long)]
    session_id: Option<String>,

    /// Extra form field, repeatable
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Form field the files are posted under
    #[arg(long)]
    file_field: Option<String>,

    /// Configuration file (defaults to the platform config path)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CliConfig::load().unwrap_or_else(|e| {
            eprintln!("failed to load config, using defaults: {e}");
            CliConfig::default()
        }),
    };

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting upwatch");

    if config.channel_kind != ChannelKind::WebSocket {
        bail!("channel kind {:?} is not supported by this client", config.channel_kind);
    }

    let page_url = cli.page.as_deref().unwrap_or(&config.page_url);
    let page = parse_page_url(page_url).with_context(|| format!("invalid page URL {page_url}"))?;
    let session_id = cli
        .session_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
    let file_field = cli.file_field.clone().unwrap_or(config.file_field.clone());

    let files = pick_paths(&cli.paths).context("reading selected files")?;

    let mut fields: Vec<FormField> = config
        .extra_fields
        .iter()
        .map(|(name, value)| FormField::text(name, value))
        .collect();
    fields.extend(cli.fields.iter().map(|(name, value)| FormField::text(name, value)));

    let display = TerminalDisplay::new(std::io::stdout());
    let controller = UploadController::new(page, session_id, display)
        .with_channel_kind(config.channel_kind)
        .with_file_field(file_field);
    let mut session = UploadSession::new(
        controller,
        Arc::new(HttpUploader::new()),
        Arc::new(WsConnector),
        SessionConfig {
            drain_timeout: config.drain_timeout(),
            ..SessionConfig::default()
        },
    );

    let events = session.sender();
    for event in [SessionEvent::Select(files), SessionEvent::Submit(fields)] {
        if events.send(event).await.is_err() {
            bail!("upload session stopped before the upload was submitted");
        }
    }

    let summary = session.run().await;
    if let Some(status) = summary.upload_status {
        tracing::info!(status, "upload accepted");
    }
    if !summary.completed() {
        bail!(
            "upload incomplete: {} of {} files reported finished",
            summary.finished,
            summary.files
        );
    }

    println!("All {} files uploaded.", summary.files);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_field("empty=").unwrap(), ("empty".to_string(), String::new()));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn cli_parses_arguments() {
        let cli = Cli::try_parse_from([
            "upwatch",
            "--page",
            "http://h:8080/",
            "--field",
            "album=trip",
            "a.txt",
            "photos",
        ])
        .unwrap();
        assert_eq!(cli.paths, vec![PathBuf::from("a.txt"), PathBuf::from("photos")]);
        assert_eq!(cli.page.as_deref(), Some("http://h:8080/"));
        assert_eq!(cli.fields, vec![("album".to_string(), "trip".to_string())]);
    }

    #[test]
    fn cli_requires_paths() {
        assert!(Cli::try_parse_from(["upwatch"]).is_err());
    }
}
