use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

use case_timeline::config::{Config, StorageConfig};
use case_timeline::dashboard::TimelineListState;
use case_timeline::db;
use case_timeline::models::AreaOfLaw;
use case_timeline::routes::create_routes;
use case_timeline::services::s3::S3Storage;
use case_timeline::services::timelines::TimelineService;
use case_timeline::state::AppState;
use case_timeline::utils::format_file_size;
use case_timeline::wizard::{LocalFile, StatusKind, Step, UploadWizard};

#[derive(Parser)]
#[command(name = "case-timeline")]
#[command(about = "Case timelines with their uploaded files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve,

    #[command(about = "Apply database migrations")]
    Migrate {
        #[arg(long, help = "Drop every table and re-create the schema")]
        fresh: bool,
    },

    #[command(about = "Print all timelines, newest first")]
    List {
        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },

    #[command(about = "Create a timeline from local files")]
    New {
        #[arg(long)]
        case_name: String,

        #[arg(long, help = "criminal, civil, corporate, family or intellectual")]
        area_of_law: String,

        #[arg(long, help = "Leave out files that still fail after one retry")]
        drop_failed: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("case_timeline=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve => serve().await,
        Commands::Migrate { fresh } => migrate(fresh).await,
        Commands::List { json } => list(json).await,
        Commands::New {
            case_name,
            area_of_law,
            drop_failed,
            files,
        } => new_timeline(case_name, area_of_law, drop_failed, files).await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let db = db::connect_and_migrate(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    let storage = S3Storage::new(&config.storage)?;
    storage
        .connect()
        .await
        .context("failed to reach object storage")?;

    let state = AppState::new(db, Arc::new(storage), config.upload_max_bytes);
    let app = create_routes(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn migrate(fresh: bool) -> anyhow::Result<()> {
    let database_url = Config::database_url_from_env()?;
    let db = db::connect(&database_url).await?;

    if fresh {
        Migrator::fresh(&db).await?;
        tracing::info!("schema re-created");
    } else {
        Migrator::up(&db, None).await?;
        tracing::info!("migrations applied");
    }
    Ok(())
}

async fn list(json: bool) -> anyhow::Result<()> {
    let database_url = Config::database_url_from_env()?;
    let db = db::connect_and_migrate(&database_url).await?;
    let result = TimelineService::new(db).list_timelines().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result?)?);
        return Ok(());
    }

    if let Err(e) = &result {
        tracing::error!(error = %e, "listing timelines failed");
    }
    println!("{}", TimelineListState::from_query(Some(result)).render_text());
    Ok(())
}

async fn new_timeline(
    case_name: String,
    area_of_law: String,
    drop_failed: bool,
    paths: Vec<PathBuf>,
) -> anyhow::Result<()> {
    if area_of_law.parse::<AreaOfLaw>().is_err() {
        tracing::warn!(%area_of_law, "area of law is not one of the standard options");
    }

    let database_url = Config::database_url_from_env()?;
    let db = db::connect_and_migrate(&database_url).await?;
    let storage = S3Storage::new(&StorageConfig::from_env()?)?;
    storage.connect().await?;

    let mut wizard = UploadWizard::new(Arc::new(storage), Arc::new(TimelineService::new(db)));

    wizard.set_case_name(case_name);
    wizard.set_area_of_law(area_of_law);
    wizard.next()?;
    if wizard.step() != Step::Upload {
        bail!("{}", status_message(&wizard));
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        files.push(read_local_file(path).await?);
    }
    wizard.stage_files(files)?;
    if let Some(status) = wizard.status() {
        println!("{}", status.message);
    }

    wizard.upload_files().await?;
    if wizard.step() != Step::Review {
        bail!("{}", status_message(&wizard));
    }
    println!("{}", status_message(&wizard));

    let failed: Vec<usize> = (0..wizard.uploaded().len())
        .filter(|&i| wizard.uploaded()[i].is_failed())
        .collect();
    for index in failed {
        wizard.retry_upload(index).await?;
        println!("{}", status_message(&wizard));
    }

    print_review(&wizard);
    let notice = wizard.review_notice();
    if let Some(notice) = notice.as_ref().filter(|n| n.kind == StatusKind::Success) {
        println!("{}", notice.message);
    }
    if let Some(notice) = notice.filter(|n| n.kind == StatusKind::Error) {
        if !drop_failed {
            let urls = wizard.stored_urls();
            if !urls.is_empty() {
                tracing::warn!(urls = ?urls, "stored objects left without a timeline");
            }
            bail!(
                "{} Nothing was created; rerun, or pass --drop-failed.",
                notice.message
            );
        }
        while let Some(index) = wizard.uploaded().iter().position(|f| f.is_failed()) {
            wizard.remove_uploaded(index)?;
        }
    }

    if !wizard.can_submit() {
        bail!("no files left to submit");
    }
    let timeline_id = wizard.submit().await?;
    println!("Timeline created successfully! id={timeline_id}");
    Ok(())
}

async fn read_local_file(path: &Path) -> anyhow::Result<LocalFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;
    Ok(LocalFile::new(name, data))
}

fn status_message(wizard: &UploadWizard) -> String {
    wizard
        .status()
        .map(|s| s.message.clone())
        .unwrap_or_default()
}

fn print_review(wizard: &UploadWizard) {
    for file in wizard.uploaded() {
        let outcome = if file.is_failed() { "FAILED" } else { file.url.as_str() };
        println!(
            "  {} ({}) {}",
            file.file_name,
            format_file_size(file.size),
            outcome
        );
    }
}
