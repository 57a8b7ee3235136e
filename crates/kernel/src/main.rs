//! Inkpress CLI
//!
//! Renders CMS blog records from files or stdin.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use inkpress_kernel::config::Config;
use inkpress_kernel::content::{Profile, render_html, resolve_kind, sanitize};
use inkpress_kernel::{AppResult, BlogRecord, render_blog, render_blog_page};

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(version, about = "Render CMS blog content into sanitized blocks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the body of a blog record
    Render {
        /// Blog record JSON file ("-" for stdin)
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = RenderFormat::Json)]
        format: RenderFormat,
    },

    /// Render a blog record into a full page model (JSON)
    Page {
        /// Blog record JSON file ("-" for stdin)
        input: Option<PathBuf>,
    },

    /// Sanitize an HTML fragment
    Sanitize {
        /// HTML file ("-" for stdin)
        input: Option<PathBuf>,

        /// Sanitization profile
        #[arg(short, long, value_enum, default_value_t = ProfileArg::Rich)]
        profile: ProfileArg,
    },

    /// Print the inferred content kind of a raw body
    Classify {
        /// Raw content file ("-" for stdin)
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RenderFormat {
    Json,
    Html,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    Rich,
    Plain,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Rich => Profile::Rich,
            ProfileArg::Plain => Profile::PlainText,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let options = config.render_options();

    let output = match cli.command {
        Commands::Render { input, format } => {
            let record = read_record(input.as_ref())?;
            let blocks = render_blog(&record, &options);
            info!(blocks = blocks.len(), "rendered blog record");
            match format {
                RenderFormat::Json => {
                    serde_json::to_string_pretty(&blocks).context("failed to encode blocks")?
                }
                RenderFormat::Html => render_html(&blocks, options.highlight_code),
            }
        }
        Commands::Page { input } => {
            let record = read_record(input.as_ref())?;
            let page = render_blog_page(&record, &options);
            serde_json::to_string_pretty(&page).context("failed to encode page")?
        }
        Commands::Sanitize { input, profile } => {
            let html = read_input(input.as_ref()).context("failed to read input")?;
            sanitize(&html, profile.into()).into_string()
        }
        Commands::Classify { input } => {
            let raw = read_input(input.as_ref()).context("failed to read input")?;
            resolve_kind(None, &raw, options.classifier).to_string()
        }
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").context("failed to write output")?;
    Ok(())
}

fn read_record(input: Option<&PathBuf>) -> Result<BlogRecord> {
    let json = read_input(input).context("failed to read blog record")?;
    BlogRecord::from_json(&json).context("failed to parse blog record")
}

/// Read a file, or stdin when no path or `-` is given.
fn read_input(input: Option<&PathBuf>) -> AppResult<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so stdout stays machine readable.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
