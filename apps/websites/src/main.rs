use std::time::Duration;

use clap::Parser;
use db_infra::{sanitize_db_url, DbSettings};
use tracing::{info, warn};
use websites::{repo_builder, run_demo, BackendKind, OpContext};

mod telemetry;

#[derive(Parser)]
#[command(name = "websites")]
#[command(about = "Run the websites repository demo against the chosen backend")]
struct Args {
    /// Storage backend serving the repository
    #[arg(long, value_enum, env = "WEBSITES_BACKEND", default_value_t = BackendKind::Orm)]
    backend: BackendKind,

    /// Connection URL; when absent it is assembled from the POSTGRES_* variables
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Deadline for the whole demo, in seconds
    #[arg(long, env = "WEBSITES_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    let args = Args::parse();

    let mut settings = match DbSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Invalid database configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(url) = args.database_url {
        settings.url = url;
    }

    println!(
        "🚀 Running websites demo with the {} backend on {}",
        args.backend,
        sanitize_db_url(&settings.url)
    );

    let repo = match repo_builder()
        .with_backend(args.backend)
        .with_settings(settings)
        .build()
        .await
    {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("❌ Failed to build the {} repository: {e}", args.backend);
            std::process::exit(1);
        }
    };

    let ctx = OpContext::background().with_timeout(Duration::from_secs(args.timeout_secs));
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling in-flight operation");
            interrupt.cancel();
        }
    });

    match run_demo(&ctx, repo.as_ref()).await {
        Ok(report) => {
            info!(
                remaining = report.listed_after_delete.len(),
                "demo finished"
            );
            println!("✅ Demo finished");
        }
        Err(e) if e.is_cancelled() => {
            eprintln!("❌ Demo interrupted: {e}");
            std::process::exit(130);
        }
        Err(e) => {
            eprintln!("❌ Demo stopped: {e}");
            std::process::exit(1);
        }
    }
}
