use super::*;
use crate::core::endpoints::ApiEndpoints;
use crate::domain::model::OutputMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "blend-client")]
#[command(about = "Upload result files to a blend service and save the blended spreadsheet")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_SCHEME)]
    pub scheme: String,

    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, default_value = DEFAULT_API_PREFIX)]
    pub api_prefix: String,

    /// API namespace, e.g. `blend` or `todos`
    #[arg(long, default_value = DEFAULT_RESOURCE)]
    pub resource: String,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_API_KEY_HEADER)]
    pub api_key_header: String,

    #[arg(long, help = "Accept invalid TLS certificates")]
    pub insecure_skip_verify: bool,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_UPLOAD_FIELD)]
    pub upload_field: String,

    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, value_enum, default_value_t = OutputMode::Binary)]
    pub output_mode: OutputMode,

    /// Files to upload, in order
    #[arg(required = true)]
    pub input_files: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Print the run report as JSON")]
    pub summary_json: bool,
}

impl ConfigProvider for CliConfig {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    fn resource(&self) -> &str {
        &self.resource
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    fn api_key_header(&self) -> &str {
        &self.api_key_header
    }

    fn insecure_skip_verify(&self) -> bool {
        self.insecure_skip_verify
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn input_files(&self) -> &[String] {
        &self.input_files
    }

    fn upload_field(&self) -> &str {
        &self.upload_field
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_mode(&self) -> OutputMode {
        self.output_mode
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_scheme("scheme", &self.scheme)?;
        validation::validate_non_empty_string("host", &self.host)?;
        validation::validate_range("port", self.port, 1, u16::MAX)?;
        validation::validate_non_empty_string("resource", &self.resource)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;
        validation::validate_non_empty_string("upload_field", &self.upload_field)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_input_files("input_files", &self.input_files)?;

        let endpoints = ApiEndpoints::from_config(self)?;
        validation::validate_url("resource", endpoints.list().as_str())
    }
}
