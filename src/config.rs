use clap::Parser;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DOCUMENT_ROOT: &str = "./public";

/// Command-line overrides. Anything left unset keeps its environment value.
#[derive(Debug, Default, Parser)]
#[command(name = "chatrelay", version, about = "Real-time group chat relay")]
pub struct Cli {
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,
    /// Directory static assets are served from
    #[arg(long)]
    pub document_root: Option<PathBuf>,
    /// JSON file of [pattern, replacement] pairs replacing the built-in filter
    #[arg(long = "filter")]
    pub filter_path: Option<PathBuf>,
}

pub struct Config {
    pub port: u16,
    pub secret: String,
    /// True when no secret was supplied and one was generated for this run.
    pub secret_is_ephemeral: bool,
    pub document_root: PathBuf,
    pub filter_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let (secret, secret_is_ephemeral) = match std::env::var("CHATRELAY_SECRET") {
            Ok(secret) if !secret.is_empty() => (secret, false),
            _ => (generate_secret(), true),
        };

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            secret,
            secret_is_ephemeral,
            document_root: std::env::var("CHATRELAY_DOCUMENT_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOCUMENT_ROOT)),
            filter_path: std::env::var("CHATRELAY_FILTER_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn apply_cli(&mut self, cli: Cli) {
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(root) = cli.document_root {
            self.document_root = root;
        }
        if cli.filter_path.is_some() {
            self.filter_path = cli.filter_path;
        }
    }
}

fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
