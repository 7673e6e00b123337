use anyhow::{Context, Result};
use bucket_gallery::{
    app::{AppBuilder, AppConfig, AppError, StorageBackend, DEFAULT_MAX_UPLOAD_BYTES},
    adapters::outbound::storage::S3Config,
    domain::value_objects::BucketName,
};
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bucket-gallery")]
#[command(about = "A web gallery over a single S3-compatible bucket", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Storage backend type (`s3` or `memory`)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "s3")]
    storage_backend: String,

    /// MinIO / S3 host name
    #[arg(long, env = "MINIO_ENDPOINT")]
    minio_endpoint: Option<String>,

    /// MinIO / S3 port
    #[arg(long, env = "MINIO_PORT")]
    minio_port: Option<u16>,

    /// Use TLS for the MinIO connection
    #[arg(long, env = "MINIO_USE_SSL", default_value = "false")]
    minio_use_ssl: bool,

    /// MinIO access key
    #[arg(long, env = "MINIO_ACCESS_KEY")]
    minio_access_key: Option<String>,

    /// MinIO secret key
    #[arg(long, env = "MINIO_SECRET_KEY")]
    minio_secret_key: Option<String>,

    /// Bucket holding the gallery
    #[arg(long, env = "MINIO_BUCKET")]
    minio_bucket: Option<String>,

    /// Region used to sign requests and create the bucket
    #[arg(long, env = "MINIO_REGION", default_value = "us-east-1")]
    region: String,

    /// Largest accepted upload request body, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Log level, overridden by RUST_LOG when set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let bucket_name = self
            .minio_bucket
            .clone()
            .context("MINIO_BUCKET is required")?;
        let bucket = BucketName::new(bucket_name).map_err(|e| AppError::Configuration {
            message: format!("invalid MINIO_BUCKET: {}", e),
        })?;

        let storage_backend = match self.storage_backend.as_str() {
            "memory" => StorageBackend::InMemory,
            "s3" | "minio" => {
                let endpoint = self
                    .minio_endpoint
                    .clone()
                    .context("MINIO_ENDPOINT is required for S3 backend")?;
                let port = self
                    .minio_port
                    .context("MINIO_PORT is required for S3 backend")?;
                let access_key = self
                    .minio_access_key
                    .clone()
                    .context("MINIO_ACCESS_KEY is required for S3 backend")?;
                let secret_key = self
                    .minio_secret_key
                    .clone()
                    .context("MINIO_SECRET_KEY is required for S3 backend")?;

                StorageBackend::S3(S3Config {
                    endpoint,
                    port,
                    use_ssl: self.minio_use_ssl,
                    access_key,
                    secret_key,
                    region: self.region.clone(),
                })
            }
            _ => anyhow::bail!("Unknown storage backend: {}", self.storage_backend),
        };

        Ok(AppConfig {
            bucket,
            storage_backend,
            max_upload_bytes: self.max_upload_bytes,
        })
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }

    fn init_logging(&self) {
        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging();

    info!("Starting bucket gallery");
    info!("Storage backend: {}", cli.storage_backend);

    let config = cli.to_app_config()?;
    let app = AppBuilder::new(config.bucket.clone())
        .with_config(config)
        .build()
        .context("Failed to build application")?;

    // The bucket must exist before the first request is served
    let status = app
        .bootstrap()
        .await
        .with_context(|| format!("Failed to bootstrap bucket {}", app.bucket))?;
    info!(bucket = %app.bucket, ?status, "bucket ready");

    let router = app.router().context("Failed to build router")?;

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}
