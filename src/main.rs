//! CLI entry point for mdx-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdx-blog")]
#[command(version)]
#[command(about = "A multilingual blog built from MDX article folders", long_about = None)]
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
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Locale of the post (defaults to the default locale)
        #[arg(short, long)]
        locale: Option<String>,

        /// Article folder, to add a translation to an existing article
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Generate, then start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, tag, locale)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only include posts of this locale
        #[arg(short, long)]
        locale: Option<String>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Load every content file and report the ones that fail
    Check {
        /// Print failures as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdx_blog=debug,info"
    } else {
        "mdx_blog=info"
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
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            mdx_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            locale,
            folder,
        } => {
            let site = mdx_blog::Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            mdx_blog::commands::new::run(&site, &title, locale.as_deref(), folder.as_deref())?;
        }

        Commands::Generate => {
            let site = mdx_blog::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let site = mdx_blog::Site::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            site.generate().await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            mdx_blog::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = mdx_blog::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List {
            r#type,
            locale,
            json,
        } => {
            let site = mdx_blog::Site::new(&base_dir)?;
            mdx_blog::commands::list::run(&site, &r#type, locale.as_deref(), json).await?;
        }

        Commands::Check { json } => {
            let site = mdx_blog::Site::new(&base_dir)?;
            mdx_blog::commands::check::run(&site, json).await?;
        }

        Commands::Version => {
            println!("mdx-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
