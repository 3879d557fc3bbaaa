//! MvnKit CLI - Maven artifact lookups from the command line or over MCP

mod mcp;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mvnkit::tool::{
    render_error, render_latest, render_manifest, render_search, render_snippets, render_versions,
};
use mvnkit::{
    ClientConfig, Coordinates, FetchError, MvnClient, DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS,
    DEFAULT_REPOSITORY_URL, TOOL_LLMTXT,
};
use serde::Serialize;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Output format for lookup subcommands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable text, as returned to MCP clients
    #[default]
    Text,
    /// JSON record
    Json,
}

/// MvnKit - Maven artifact search, versions, POMs and dependency snippets
#[derive(Parser, Debug)]
#[command(name = "mvnkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    hosts: HostArgs,

    /// Print full tool documentation (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

#[derive(Args, Debug)]
struct HostArgs {
    /// Package index to scrape
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Artifact repository serving POMs
    #[arg(long, global = true, default_value = DEFAULT_REPOSITORY_URL)]
    repository_url: String,

    /// Custom User-Agent
    #[arg(long, global = true)]
    user_agent: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Search artifacts
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(long, short = 'n', default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
    /// List versions of an artifact
    Versions {
        group_id: String,
        artifact_id: String,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
    /// Print the POM of an artifact version
    Pom {
        group_id: String,
        artifact_id: String,
        version: String,
    },
    /// Print dependency snippets for an artifact version
    Snippets {
        group_id: String,
        artifact_id: String,
        version: String,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
    /// Print the first listed version of an artifact
    Latest {
        group_id: String,
        artifact_id: String,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    init_tracing();

    let client = match build_client(&cli.hosts) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let Some(command) = cli.command else {
        eprintln!("Usage: mvnkit search <QUERY>");
        eprintln!("   or: mvnkit mcp");
        eprintln!("   or: mvnkit --help");
        std::process::exit(1);
    };

    match command {
        Commands::Mcp => mcp::run_server(client).await,
        Commands::Search {
            query,
            max_results,
            output,
        } => {
            let outcome = exit_on_error(client.search_artifacts(&query, max_results).await);
            print_output(output, &outcome, render_search(&outcome));
        }
        Commands::Versions {
            group_id,
            artifact_id,
            output,
        } => {
            let listing = exit_on_error(client.artifact_versions(&group_id, &artifact_id).await);
            print_output(output, &listing, render_versions(&listing));
        }
        Commands::Pom {
            group_id,
            artifact_id,
            version,
        } => {
            let pom = exit_on_error(client.manifest(&group_id, &artifact_id, &version).await);
            let coords = Coordinates::new(group_id, artifact_id, version);
            writeln_safe(&render_manifest(&coords, &pom));
        }
        Commands::Snippets {
            group_id,
            artifact_id,
            version,
            output,
        } => {
            let snippets = exit_on_error(
                client
                    .dependency_snippets(&group_id, &artifact_id, &version)
                    .await,
            );
            let coords = Coordinates::new(group_id, artifact_id, version);
            print_output(output, &snippets, render_snippets(&coords, &snippets));
        }
        Commands::Latest {
            group_id,
            artifact_id,
            output,
        } => {
            let latest = exit_on_error(client.latest_artifact(&group_id, &artifact_id).await);
            let text = render_latest(&group_id, &artifact_id, latest.as_ref());
            print_output(output, &latest, text);
        }
    }
}

/// Log to stderr; stdout carries results and MCP messages
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_client(hosts: &HostArgs) -> Result<MvnClient, FetchError> {
    let mut builder = ClientConfig::builder()
        .base_url(hosts.base_url.as_str())
        .repository_url(hosts.repository_url.as_str());

    if let Some(ref ua) = hosts.user_agent {
        builder = builder.user_agent(ua.as_str());
    }

    MvnClient::with_config(builder.build())
}

fn exit_on_error<T>(result: Result<T, FetchError>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("{}", render_error(&e));
        std::process::exit(1);
    })
}

fn print_output<T: Serialize>(output: OutputFormat, record: &T, text: String) {
    match output {
        OutputFormat::Text => writeln_safe(&text),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(record).unwrap_or_else(|e| {
                eprintln!("Error serializing response: {}", e);
                std::process::exit(1);
            });
            writeln_safe(&json);
        }
    }
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
