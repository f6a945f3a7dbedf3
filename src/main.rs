use std::net::IpAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sitemap_relay::{
    api::routes::create_router,
    client::Endpoint,
    clipboard::{copy_urls, SystemClipboard},
    composer::FormFields,
    config::{parse_backend_url, Config},
    session::{Delivery, Session, Surface},
    AppState,
};

/// Collects sitemap filters, forwards them to the sitemap backend and shows the URLs it finds
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Raise log verbosity (-v info, -vv debug, -vvv trace)", global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Send one sitemap request and print the result
    Fetch {
        /// The sitemap URL to look up
        sitemap_url: String,
        /// Only keep entries modified on or after this date (YYYY-MM-DD)
        #[arg(long, short, default_value = "")]
        start_date: String,
        /// Only keep entries modified on or before this date (YYYY-MM-DD)
        #[arg(long, short, default_value = "")]
        end_date: String,
        /// Opaque filter passed through to the backend
        #[arg(long, short, default_value = "")]
        content_filter: String,
        /// Which front end to behave like: "popup" (default), "index" or "page"
        #[arg(long, default_value = "popup")]
        surface: Surface,
        /// Backend base URL, overrides SITEMAP_BACKEND_URL. The page surface posts to
        /// `/crawl`, which only the relay serves, so it defaults to the relay's HOST/PORT
        #[arg(long)]
        backend: Option<String>,
        /// Copy the listed URLs to the clipboard afterwards
        #[arg(long)]
        copy: bool,
    },
    /// Serve the sitemap page and the JSON relays
    Serve {
        /// Address to bind, overrides HOST
        #[arg(long)]
        host: Option<IpAddr>,
        /// Port to bind, overrides PORT
        #[arg(long, short)]
        port: Option<u16>,
        /// Backend base URL, overrides SITEMAP_BACKEND_URL
        #[arg(long)]
        backend: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let serving = matches!(cli.command, Command::Serve { .. });
    init_tracing(cli.verbose.saturating_add(u8::from(serving)));

    // Load configuration
    let mut config = Config::load()?;

    match cli.command {
        Command::Fetch {
            sitemap_url,
            start_date,
            end_date,
            content_filter,
            surface,
            backend,
            copy,
        } => {
            if let Some(backend) = backend {
                config.backend_url = parse_backend_url(&backend)?;
            } else if surface.endpoint == Endpoint::Crawl {
                config.backend_url = config.relay_url()?;
            }
            let fields = FormFields {
                sitemap_url,
                start_date,
                end_date,
                content_filter,
            };
            run_fetch(config, surface, fields, copy).await
        }
        Command::Serve { host, port, backend } => {
            if let Some(host) = host {
                config.server_addr.set_ip(host);
            }
            if let Some(port) = port {
                config.server_addr.set_port(port);
            }
            if let Some(backend) = backend {
                config.backend_url = parse_backend_url(&backend)?;
            }
            run_server(config).await
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitemap_relay={level},tower_http={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_fetch(
    config: Config,
    surface: Surface,
    fields: FormFields,
    copy: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::from_config(surface, &config)?;

    match session.submit(&fields).await {
        Ok(Delivery::Applied) => {
            let pane = session.pane();
            println!("{}", pane);

            if copy {
                if pane.copy_visible() {
                    eprintln!("{}", copy_urls(&pane, &mut SystemClipboard::default()));
                } else {
                    warn!("Nothing to copy: no URL list was rendered");
                }
            }
            Ok(())
        }
        Ok(Delivery::Superseded) => Ok(()),
        Err(err) => {
            if let Some(alert) = session.report(&err) {
                eprintln!("{}", alert);
            }
            Err(err.into())
        }
    }
}

async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let server_addr = config.server_addr;
    info!(%server_addr, backend = %config.backend_url, "Starting server");

    // Create application state
    let app_state = AppState::new(config)?;

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    info!("Sitemap relay ready");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
