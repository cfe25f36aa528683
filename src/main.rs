//! web_drive CLI - Drive page session against a running web front end.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use web_drive::{Browser, DriveClient, Fetcher, RefreshOutcome, UploadBlob};

/// Headless client for the web drive page.
#[derive(Parser)]
#[command(name = "web_drive")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Origin the web front end is served from.
    #[arg(long, env = "WEBDRIVE_ORIGIN", default_value = "http://localhost:8080")]
    origin: String,

    /// Session token sent as the `access_token` cookie.
    #[arg(long, env = "WEBDRIVE_ACCESS_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the listing and usage, and print the rendered page.
    Refresh,

    /// List files a page at a time.
    List {
        /// Only files in this folder.
        #[arg(long)]
        folder: Option<String>,

        /// Page size.
        #[arg(long, default_value_t = 50)]
        limit: u32,

        /// Entries to skip.
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// List folders.
    Folders,

    /// Upload a file, then refresh.
    Upload {
        /// Local file to upload.
        path: PathBuf,

        /// Destination folder id.
        #[arg(long)]
        folder: Option<String>,
    },

    /// Open a file's download link in the system browser.
    Download {
        /// File id.
        id: String,
    },

    /// Delete a file, then refresh.
    Delete {
        /// File id.
        id: String,
    },
}

/// Browser effects for a terminal session.
struct TerminalBrowser;

impl Browser for TerminalBrowser {
    fn navigate(&mut self, url: &str) {
        eprintln!("Not signed in. Log in at {}", url);
    }

    fn open_tab(&mut self, url: &str) {
        if let Err(e) = webbrowser::open(url) {
            warn!(error = %e, "could not launch a browser");
            println!("{}", url);
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn open_file_picker(&mut self) {
        println!("Choose a file with: web_drive upload <PATH>");
    }
}

fn print_page(client: &DriveClient<TerminalBrowser>) {
    println!("{}", client.page().usage().inner_html());
    println!("{}", client.page().files_grid().inner_html());
}

fn check_refresh(outcome: RefreshOutcome) -> Result<()> {
    match outcome {
        RefreshOutcome::Rendered => Ok(()),
        RefreshOutcome::ListingFailed => anyhow::bail!("Failed to load the drive listing"),
        RefreshOutcome::Redirected => anyhow::bail!("Session expired"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut fetcher = Fetcher::new(&cli.origin)
        .with_context(|| format!("Invalid origin: {}", cli.origin))?;
    if let Some(token) = cli.token {
        fetcher = fetcher.with_session(token);
    }

    let mut client = DriveClient::new(fetcher, TerminalBrowser);

    match cli.command {
        Commands::Refresh => {
            let outcome = client.on_page_ready().await;
            print_page(&client);
            check_refresh(outcome)?;
        }

        Commands::List {
            folder,
            limit,
            offset,
        } => {
            let files = client
                .fetcher()
                .list_files(limit, offset, folder.as_deref())
                .await
                .context("Failed to list files")?;

            if files.is_empty() {
                println!("No files found.");
            } else {
                println!("ID\tSize\tName");
                for file in &files {
                    println!("{}", file);
                }
            }
        }

        Commands::Folders => {
            let listing = client
                .fetcher()
                .fetch_drive_listing()
                .await
                .context("Failed to fetch drive listing")?;

            if listing.folders.is_empty() {
                println!("No folders found.");
            } else {
                println!("ID\tName");
                for folder in &listing.folders {
                    println!("{}\t{}", folder.id, folder.name);
                }
            }
        }

        Commands::Upload { path, folder } => {
            let blob = UploadBlob::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {:?}", path))?;

            let Some(outcome) = client.upload_then_refresh(&blob, folder.as_deref()).await else {
                anyhow::bail!("Upload of {:?} was rejected", path);
            };
            print_page(&client);
            check_refresh(outcome)?;
        }

        Commands::Download { id } => {
            if !client.download(&id) {
                anyhow::bail!("Cannot open download for file {}", id);
            }
        }

        Commands::Delete { id } => {
            let outcome = client
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete file: {}", id))?;
            print_page(&client);
            check_refresh(outcome)?;
        }
    }

    Ok(())
}
