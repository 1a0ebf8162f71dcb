//! CLI entry point for inkwell

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inkwell")]
#[command(version)]
#[command(about = "A small read-only blog server", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the blog over HTTP
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port in _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in _config.yml)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// List posts by recency
    List {
        /// Which listing to show (all, latest)
        #[arg(default_value = "all")]
        kind: String,

        /// Number of posts for the latest listing
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Render a post's content to stdout
    Show {
        /// Post slug, as used in /blogs/<slug>
        slug: String,
    },

    /// Validate the post corpus and content directory
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkwell=debug,info"
    } else {
        "inkwell=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let blog = inkwell::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            inkwell::server::start(&blog, &ip, port).await?;
        }

        Commands::List { kind, count } => {
            let blog = inkwell::Blog::new(&base_dir)?;
            inkwell::commands::list::run(&blog, &kind, count)?;
        }

        Commands::Show { slug } => {
            let blog = inkwell::Blog::new(&base_dir)?;
            inkwell::commands::show::run(&blog, &slug).await?;
        }

        Commands::Check => {
            let blog = inkwell::Blog::new(&base_dir)?;
            let problems = inkwell::commands::check::run(&blog)?;
            if !problems.is_empty() {
                anyhow::bail!("{} problem(s) found", problems.len());
            }
        }

        Commands::Version => {
            println!("inkwell version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
