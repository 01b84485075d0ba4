//! Faleproxy CLI - run the relay server or rewrite a single page

use clap::{Parser, Subcommand, ValueEnum};
use faleproxy::{Relay, RelayBuilder, RelayResponse, ServerConfig, DEFAULT_PORT};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Output format for fetch subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Rewritten HTML only
    #[default]
    Html,
    /// JSON payload, as returned by the server
    Json,
    /// Metadata summary without the document
    Summary,
}

/// Faleproxy - fetch web pages and rewrite their visible text
#[derive(Parser, Debug)]
#[command(name = "faleproxy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP relay server
    Serve {
        /// Interface to bind
        #[arg(long, default_value = faleproxy::server::DEFAULT_HOST)]
        host: String,

        /// Port to listen on
        #[arg(long, short, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory with the front page and static assets
        #[arg(long, default_value = "public")]
        public_dir: PathBuf,

        /// Do not serve static files
        #[arg(long)]
        no_static: bool,

        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Fetch a URL and print the rewritten page
    Fetch {
        /// URL to fetch
        url: String,

        /// Output format
        #[arg(long, short, default_value = "html")]
        output: OutputFormat,

        #[command(flatten)]
        fetch: FetchArgs,
    },
}

/// Upstream fetch settings shared by all subcommands
#[derive(clap::Args, Debug)]
struct FetchArgs {
    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Only fetch URLs starting with this prefix (repeatable)
    #[arg(long)]
    allow_prefix: Vec<String>,

    /// Never fetch URLs starting with this prefix (repeatable)
    #[arg(long)]
    block_prefix: Vec<String>,
}

impl FetchArgs {
    fn relay(self) -> Relay {
        let mut builder = RelayBuilder::new().timeout(Duration::from_secs(self.timeout_secs));

        if let Some(ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        for prefix in self.allow_prefix {
            builder = builder.allow_prefix(prefix);
        }
        for prefix in self.block_prefix {
            builder = builder.block_prefix(prefix);
        }

        builder.build()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faleproxy=info,tower_http=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            public_dir,
            no_static,
            fetch,
        } => {
            let config = ServerConfig {
                host,
                port,
                public_dir: if no_static { None } else { Some(public_dir) },
            };
            run_server(config, fetch.relay()).await;
        }
        Commands::Fetch { url, output, fetch } => {
            run_fetch(&url, output, fetch.relay()).await;
        }
    }
}

async fn run_server(config: ServerConfig, relay: Relay) {
    tracing::info!(
        bind_address = %config.bind_address(),
        public_dir = ?config.public_dir,
        "Configuration loaded"
    );

    if let Err(e) = faleproxy::server::run(config, relay).await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run_fetch(url: &str, output: OutputFormat, relay: Relay) {
    match relay.execute(url).await {
        Ok(response) => match output {
            OutputFormat::Html => writeln_safe(&response.content),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
                    eprintln!("Error serializing response: {}", e);
                    std::process::exit(1);
                });
                writeln_safe(&json);
            }
            OutputFormat::Summary => writeln_safe(&format_summary(&response)),
        },
        Err(e) => {
            eprintln!("Failed to fetch content: {}", e);
            std::process::exit(1);
        }
    }
}

/// Format response metadata as YAML-style key/value lines
fn format_summary(response: &RelayResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!("original_url: {}\n", response.original_url));
    if !response.title.is_empty() {
        output.push_str(&format!("title: {}\n", response.title));
    }
    output.push_str(&format!(
        "replacement_count: {}\n",
        response.replacement_count
    ));
    output.push_str(&format!("content_size: {}", response.content.len()));

    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
