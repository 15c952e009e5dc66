use clap::Parser;
use tokio::net::TcpListener;

use chatrelay::config::{Cli, Config};
use chatrelay::filter::ContentFilter;
use chatrelay::routes::assets::DocumentRoot;
use chatrelay::state::AppState;
use chatrelay::token::TokenAuthority;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatrelay=debug,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    config.apply_cli(cli);
    print_banner(&config);

    if config.secret_is_ephemeral {
        tracing::warn!("CHATRELAY_SECRET is not set; using a random secret for this run");
    }

    let filter = match &config.filter_path {
        Some(path) => ContentFilter::load(path)
            .unwrap_or_else(|e| panic!("failed to load content filter {:?}: {e}", path)),
        None => ContentFilter::builtin(),
    };
    tracing::info!("content filter loaded with {} rule(s)", filter.rule_count());

    let assets = DocumentRoot::new(&config.document_root);
    tracing::info!("serving assets from {}", assets.path().display());

    let state = AppState::new(TokenAuthority::new(config.secret.clone()), filter, assets);

    let app = chatrelay::routes::router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("failed to bind");

    let actual_port = listener
        .local_addr()
        .expect("failed to get local address")
        .port();
    eprintln!("  \x1b[32m→ listening on 0.0.0.0:{actual_port}\x1b[0m");
    eprintln!();

    axum::serve(listener, app).await.expect("server error");
}

fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    let filter = match &config.filter_path {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    };

    eprintln!();
    eprintln!("  \x1b[1;36mchatrelay\x1b[0m \x1b[2mv{version}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mport\x1b[0m         {}", config.port);
    eprintln!("  \x1b[2mdocuments\x1b[0m    {}", config.document_root.display());
    eprintln!("  \x1b[2mfilter\x1b[0m       {filter}");

    if config.secret_is_ephemeral {
        eprintln!();
        eprintln!("  \x1b[33m! ephemeral token secret\x1b[0m");
    }

    eprintln!();
}
