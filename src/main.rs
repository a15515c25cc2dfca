use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use discogs_sync::aggregate::group_by_bucket;
use discogs_sync::config::{self, FileConfig, Overrides};
use discogs_sync::constants::DEFAULT_OUTPUT;
use discogs_sync::error::Result;
use discogs_sync::fetcher::{fetch_collection_releases, DiscogsClient};
use discogs_sync::input::load_releases_from_json;
use discogs_sync::logging;
use discogs_sync::normalize::normalize_release;
use discogs_sync::render::render_html;
use discogs_sync::types::RawRelease;
use discogs_sync::upload::upload_html;

#[derive(Parser)]
#[command(name = "discogs-sync")]
#[command(about = "Sync a Discogs collection into a static HTML record list")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the collection from the Discogs API and render it
    Sync {
        /// Discogs username
        #[arg(long)]
        username: Option<String>,
        /// Discogs collection folder id (0 is the All folder)
        #[arg(long)]
        folder_id: Option<u32>,
        /// Discogs personal access token
        #[arg(long)]
        token: Option<String>,
        /// User-Agent header for Discogs API requests
        #[arg(long)]
        user_agent: Option<String>,
        /// Items to fetch per page from the Discogs API
        #[arg(long)]
        per_page: Option<u32>,
        /// Delay in seconds between paginated API calls
        #[arg(long)]
        sleep_seconds: Option<f64>,
        /// Output HTML path
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Also upload the rendered page to object storage
        #[arg(long)]
        upload: bool,
    },
    /// Render a record list from a local JSON file instead of the API
    Render {
        /// Local JSON: a Discogs page payload with 'releases' or a raw release list
        #[arg(long)]
        input_json: PathBuf,
        /// Username shown in the page header
        #[arg(long, default_value = "discogs-user")]
        username: String,
        /// Discogs collection folder id
        #[arg(long, default_value_t = 0)]
        folder_id: u32,
        /// Output HTML path
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

fn build_page(username: &str, folder_id: u32, releases: &[RawRelease]) -> Result<String> {
    let items: Vec<_> = releases.iter().map(normalize_release).collect();
    let groups = group_by_bucket(items);
    render_html(username, folder_id, &groups, Local::now())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            username,
            folder_id,
            token,
            user_agent,
            per_page,
            sleep_seconds,
            output,
            upload,
        } => {
            let file = FileConfig::load(Path::new("config.toml"))?;
            let settings = config::resolve(
                Overrides {
                    username,
                    folder_id,
                    token,
                    user_agent,
                    per_page,
                    sleep_seconds,
                },
                file,
            )?;

            println!("🔄 Syncing Discogs collection for {}...", settings.username);
            info!(username = %settings.username, folder_id = settings.folder_id, "starting sync");

            let client = DiscogsClient::new(
                settings.username.clone(),
                settings.folder_id,
                settings.token.clone(),
                settings.user_agent.clone(),
                settings.per_page,
            )?;
            let releases = fetch_collection_releases(
                &client,
                Duration::from_secs_f64(settings.sleep_seconds),
            )
            .await?;

            let page = build_page(&settings.username, settings.folder_id, &releases)?;
            fs::write(&output, &page)?;
            println!(
                "✅ Wrote {} with {} release(s)",
                output.display(),
                releases.len()
            );

            if upload {
                let object_key = upload_html(&page).await?;
                println!("✅ Uploaded record list as {object_key}");
            }
        }
        Commands::Render {
            input_json,
            username,
            folder_id,
            output,
        } => {
            let releases = load_releases_from_json(&input_json)?;
            let page = build_page(&username, folder_id, &releases)?;
            fs::write(&output, &page)?;
            println!(
                "✅ Wrote {} with {} release(s)",
                output.display(),
                releases.len()
            );
        }
    }

    Ok(())
}
