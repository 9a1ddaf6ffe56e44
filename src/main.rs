use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use lambda_runtime::{LambdaEvent, service_fn};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use text_to_audio::{AppConfig, AuthorizerState, S3Event, routes, state::build_pipeline};

/// Text-to-Audio - document to speech conversion functions
#[derive(Parser, Debug)]
#[command(name = "text-to-audio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long = "json-logs", global = true)]
    json_logs: bool,

    /// Function to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the upload authorizer on the Lambda HTTP runtime
    UploadUrl,

    /// Run the conversion pipeline on the Lambda event runtime
    Convert,

    /// Serve the upload authorizer over a local HTTP listener
    Serve,

    /// Run one upload notification batch from a JSON file
    Process {
        /// Path to the notification event (JSON)
        #[arg(short = 'e', long = "event", value_name = "FILE")]
        event: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = json
        || std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.json_logs);

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    // Load configuration from file or environment
    let config = match cli.config {
        Some(ref config_path) => {
            info!(path = %config_path.display(), "Loading configuration");
            AppConfig::from_file(config_path)?
        }
        None => AppConfig::from_env()?,
    };

    match cli.command {
        Commands::UploadUrl => run_upload_url(&config).await,
        Commands::Convert => run_convert(&config).await,
        Commands::Serve => serve(&config).await,
        Commands::Process { event } => process_file(&config, &event).await,
    }
}

async fn run_upload_url(config: &AppConfig) -> anyhow::Result<()> {
    let state = AuthorizerState::from_config(config)?;
    let app = routes::api::create_upload_router(state);

    info!("Starting upload authorizer on the Lambda HTTP runtime");
    lambda_http::run(app)
        .await
        .map_err(|e| anyhow!("Lambda HTTP runtime error: {e}"))
}

async fn run_convert(config: &AppConfig) -> anyhow::Result<()> {
    let pipeline = Arc::new(build_pipeline(config).await?);

    info!("Starting conversion pipeline on the Lambda event runtime");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| {
        let pipeline = Arc::clone(&pipeline);
        async move {
            info!(
                request_id = %event.context.request_id,
                records = event.payload.records.len(),
                "Received upload notification"
            );
            Ok::<_, lambda_runtime::Error>(pipeline.handle(&event.payload).await)
        }
    }))
    .await
    .map_err(|e| anyhow!("Lambda runtime error: {e}"))
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let state = AuthorizerState::from_config(config)?;
    let app = routes::api::create_upload_router(state);

    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow!("Failed to bind {address}: {e}"))?;

    info!(address = %address, "Upload authorizer listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Server error: {e}"))
}

async fn process_file(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("Failed to read event file {}: {e}", path.display()))?;
    let event: S3Event = serde_json::from_str(&contents)
        .map_err(|e| anyhow!("Failed to parse event file {}: {e}", path.display()))?;

    let pipeline = build_pipeline(config).await?;
    let response = pipeline.handle(&event).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
