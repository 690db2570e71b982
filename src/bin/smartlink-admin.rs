use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smartlink::app::open_storage;
use smartlink::config::Config;
use smartlink::links::{LinkService, StatsReporter};

#[derive(Parser)]
#[command(name = "smartlink-admin")]
#[command(about = "smartlink link management CLI", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Create {
        /// Destination URL
        url: String,
        /// Playback timestamp appended as `t` (e.g. 3m20s or 90)
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Show click statistics for a short link
    Stats {
        /// Slug of the short link
        slug: String,
    },
    /// List links, newest first
    List {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

fn format_time(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Ensure database is initialized
    let storage = open_storage(&config.database).await?;

    match cli.command {
        Commands::Create { url, timestamp } => {
            let service = LinkService::new(storage, config.links.clone());
            let link = service
                .create(&url, timestamp.as_deref(), chrono::Utc::now().timestamp())
                .await
                .context("failed to create link")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&link)?);
                return Ok(());
            }
            println!("✓ /go/{} -> {}", link.slug, link.destination_url);
            if let Some(expires_at) = link.expires_at {
                println!("  expires {}", format_time(expires_at));
            }
        }
        Commands::Stats { slug } => {
            let reporter = StatsReporter::new(storage);
            match reporter.report(&slug).await? {
                Some(report) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                Some(report) => {
                    println!("Destination:  {}", report.link.destination_url);
                    println!("Created:      {}", format_time(report.link.created_at));
                    println!("Total clicks: {}", report.total_clicks);
                    if !report.recent_clicks.is_empty() {
                        println!();
                        println!("{:<20} {:<40} {}", "Time", "Address", "Client");
                        println!("{}", "-".repeat(100));
                        for click in report.recent_clicks {
                            println!(
                                "{:<20} {:<40} {}",
                                format_time(click.timestamp),
                                click.client_address.unwrap_or_default(),
                                click.client_identity.unwrap_or_default()
                            );
                        }
                    }
                }
                None => println!("⚠ Link '{}' not found", slug),
            }
        }
        Commands::List { limit, offset } => {
            let links = storage.list_links(limit, offset).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&links)?);
            } else if links.is_empty() {
                println!("No links found.");
            } else {
                println!("{:<12} {:<20} {}", "Slug", "Created", "Destination");
                println!("{}", "-".repeat(80));
                for link in links {
                    println!(
                        "{:<12} {:<20} {}",
                        link.slug,
                        format_time(link.created_at),
                        link.destination_url
                    );
                }
            }
        }
    }

    Ok(())
}
