//! Image Classifier - HTTP image recognition service.
//!
//! This binary loads the model once and then serves classification requests,
//! or classifies a single local file.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_classifier::{
    config::{ClassifyConfig, Cli, Command, ModelConfig, ServeConfig},
    create_router, extension_of, ClassificationEngine, ClassifyResponse, EngineError, ImageType,
    RouterConfig, TensorFlowEngine,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Classify(config) => run_classify(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Model graph: {}", config.model.model_graph.display());
    info!("  Model labels: {}", config.model.model_labels.display());
    info!("  Top labels: {}", config.model.top_k);

    match config.max_upload_bytes {
        Some(limit) => info!("  Upload limit: {} bytes", limit),
        None => warn!("  Upload limit: NONE - uploads are buffered in memory without a cap"),
    }
    match config.inference_timeout() {
        Some(timeout) => info!("  Inference timeout: {}s", timeout.as_secs()),
        None => warn!("  Inference timeout: NONE - a hung model blocks its request"),
    }

    info!("Loading model for image recognition");
    let engine = match load_engine(&config.model) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let router = create_router(Arc::new(engine), build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting webserver on http://{}", addr);
    info!("  curl -F image=@cat.jpg http://{}/recognize", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::default()
        .with_max_upload_bytes(config.max_upload_bytes)
        .with_inference_timeout(config.inference_timeout())
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

// =============================================================================
// Classify Command
// =============================================================================

fn run_classify(config: ClassifyConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.model.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let filename = config
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image_type = match resolve_file_type(&filename) {
        Ok(image_type) => image_type,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let data = match std::fs::read(&config.file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: could not read {}: {}", config.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let engine = match load_engine(&config.model) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let labels = match engine.classify(&data, image_type) {
        Ok(labels) => labels,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let response = ClassifyResponse { filename, labels };
    match serde_json::to_string_pretty(&response) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve a local file's type from its extension, as the upload handler does.
fn resolve_file_type(filename: &str) -> Result<ImageType, String> {
    let extension = extension_of(filename)
        .ok_or_else(|| format!("file name has no extension: {}", filename))?;
    ImageType::from_name(extension).map_err(|e| e.to_string())
}

// =============================================================================
// Shared
// =============================================================================

fn load_engine(model: &ModelConfig) -> Result<TensorFlowEngine, EngineError> {
    check_exists(&model.model_graph)?;
    check_exists(&model.model_labels)?;

    let engine = TensorFlowEngine::load(&model.model_graph, &model.model_labels)?;
    Ok(engine.with_top_k(model.top_k))
}

fn check_exists(path: &Path) -> Result<(), EngineError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EngineError::Load(format!(
            "{}: file not found",
            path.display()
        )))
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_classifier=debug,tower_http=debug"
    } else {
        "image_classifier=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
