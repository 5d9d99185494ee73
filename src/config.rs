//! Configuration management for the image classifier.
//!
//! This module provides the CLI and configuration types:
//! - Command-line arguments via clap
//! - Environment variables with `CLASSIFIER_` prefix
//! - Defaults matching the original deployment layout
//!
//! # Commands
//!
//! - `serve` (default) - Load the model and serve `POST /recognize`
//! - `classify <FILE>` - Load the model and classify one local image
//!
//! # Environment Variables
//!
//! - `CLASSIFIER_HOST` - Server bind address (default: 0.0.0.0)
//! - `CLASSIFIER_PORT` - Server port (default: 8080)
//! - `CLASSIFIER_MODEL_GRAPH` - Frozen TensorFlow graph
//! - `CLASSIFIER_MODEL_LABELS` - Label vocabulary, one per line
//! - `CLASSIFIER_TOP_K` - Labels returned per image (default: 5)
//! - `CLASSIFIER_MAX_UPLOAD_BYTES` - Request body cap (default: unlimited)
//! - `CLASSIFIER_INFERENCE_TIMEOUT_SECS` - Inference deadline (default: none)
//! - `CLASSIFIER_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::engine::DEFAULT_TOP_K;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default location of the frozen model graph.
pub const DEFAULT_MODEL_GRAPH: &str = "/model/tensorflow_inception_graph.pb";

/// Default location of the label vocabulary.
pub const DEFAULT_MODEL_LABELS: &str = "/model/imagenet_comp_graph_label_strings.txt";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Classifier - classify uploaded images with a pre-trained model.
///
/// Runs the HTTP server when no subcommand is given.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-classifier")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeConfig,
}

impl Cli {
    /// Resolve the command to run, defaulting to `serve`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(self.serve))
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP server.
    Serve(ServeConfig),

    /// Classify a local image file and print the result as JSON.
    Classify(ClassifyConfig),
}

/// Model artifact locations shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ModelConfig {
    /// Frozen TensorFlow graph (.pb).
    #[arg(long, default_value = DEFAULT_MODEL_GRAPH, env = "CLASSIFIER_MODEL_GRAPH")]
    pub model_graph: PathBuf,

    /// Label vocabulary, one label per line.
    #[arg(long, default_value = DEFAULT_MODEL_LABELS, env = "CLASSIFIER_MODEL_LABELS")]
    pub model_labels: PathBuf,

    /// Number of labels returned per image.
    #[arg(long, default_value_t = DEFAULT_TOP_K, env = "CLASSIFIER_TOP_K")]
    pub top_k: usize,
}

impl ModelConfig {
    /// Validate the model settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "CLASSIFIER_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "CLASSIFIER_PORT")]
    pub port: u16,

    #[command(flatten)]
    pub model: ModelConfig,

    // =========================================================================
    // Request Limits
    // =========================================================================
    /// Maximum request body size in bytes.
    ///
    /// Uploads are buffered fully in memory; without this cap a single request
    /// can grow without bound.
    #[arg(long, env = "CLASSIFIER_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Deadline in seconds for a single inference call.
    ///
    /// Without it a hung model blocks its request indefinitely.
    #[arg(long, env = "CLASSIFIER_INFERENCE_TIMEOUT_SECS")]
    pub inference_timeout_secs: Option<u64>,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CLASSIFIER_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.model.validate()?;

        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }
        if self.max_upload_bytes == Some(0) {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }
        if self.inference_timeout_secs == Some(0) {
            return Err("inference_timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Inference deadline, if configured.
    pub fn inference_timeout(&self) -> Option<Duration> {
        self.inference_timeout_secs.map(Duration::from_secs)
    }
}

/// Configuration for the `classify` command.
#[derive(Args, Debug, Clone)]
pub struct ClassifyConfig {
    /// Image file to classify (.png, .jpg or .jpeg).
    pub file: PathBuf,

    #[command(flatten)]
    pub model: ModelConfig,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
