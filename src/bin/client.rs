//! Command-line client for the URL shortener gRPC API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin urlshort-client -- create https://example.com
//!
//! # Resolve a short id
//! cargo run --bin urlshort-client -- get Xk3_a9Qz
//!
//! # Show the redirect count
//! cargo run --bin urlshort-client -- count Xk3_a9Qz
//!
//! # Delete without prompting
//! cargo run --bin urlshort-client -- delete Xk3_a9Qz --yes
//! ```
//!
//! # Environment Variables
//!
//! - `URLSHORT_GRPC_ADDR`: server address (default: `http://127.0.0.1:50051`)

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use urlshort::rpc::{ClientError, UrlClient};

/// CLI client for the URL shortener.
#[derive(Parser)]
#[command(name = "urlshort-client")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// gRPC server address
    #[arg(
        long,
        env = "URLSHORT_GRPC_ADDR",
        default_value = "http://127.0.0.1:50051",
        global = true
    )]
    addr: String,

    /// Per-call deadline in seconds
    #[arg(long, default_value_t = 10, global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Create {
        /// The long URL
        url: String,
    },

    /// Show the long URL behind a short id
    Get { id: String },

    /// Delete a short id
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show how many times a short id was followed
    Count { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = UrlClient::connect(cli.addr.clone())
        .await
        .with_context(|| format!("Failed to connect to {}", cli.addr))?
        .with_timeout(Duration::from_secs(cli.timeout));

    let result = match cli.command {
        Commands::Create { url } => create(&mut client, &url).await,
        Commands::Get { id } => get(&mut client, &id).await,
        Commands::Delete { id, yes } => delete(&mut client, &id, yes).await,
        Commands::Count { id } => count(&mut client, &id).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "❌".red(), describe(&e).red());
        std::process::exit(1);
    }

    Ok(())
}

async fn create(client: &mut UrlClient, url: &str) -> Result<(), ClientError> {
    let (url, short_url) = client.create_url(url).await?;

    println!("{}", "✅ URL shortened".green().bold());
    println!("  URL:       {}", url.cyan());
    println!("  Short URL: {}", short_url.bright_yellow().bold());

    Ok(())
}

async fn get(client: &mut UrlClient, id: &str) -> Result<(), ClientError> {
    let (url, short_url) = client.get_url(id).await?;

    println!("  URL:       {}", url.cyan());
    println!("  Short URL: {}", short_url.bright_yellow());

    Ok(())
}

async fn delete(client: &mut UrlClient, id: &str, skip_confirm: bool) -> Result<(), ClientError> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {id}?"))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    client.delete_url(id).await?;

    println!("{} {}", "✅ Deleted".green().bold(), id.cyan());

    Ok(())
}

async fn count(client: &mut UrlClient, id: &str) -> Result<(), ClientError> {
    let count = client.get_redirection_count(id).await?;

    println!(
        "  {} redirected {} times",
        id.cyan(),
        count.to_string().bright_white().bold()
    );

    Ok(())
}

/// Turns a client error into a one-line message for the terminal.
fn describe(error: &ClientError) -> String {
    match error {
        ClientError::Status(status) => match status.code() {
            tonic::Code::InvalidArgument => format!("Invalid URL: {}", status.message()),
            tonic::Code::NotFound => "No such short id".to_string(),
            tonic::Code::DeadlineExceeded => "Server did not answer in time".to_string(),
            _ => format!("Server error: {}", status.message()),
        },
        other => other.to_string(),
    }
}
