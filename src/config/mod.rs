#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 44001;
pub const DEFAULT_API_PREFIX: &str = "api/v1";
pub const DEFAULT_RESOURCE: &str = "blend";
pub const DEFAULT_API_KEY_HEADER: &str = "theapikey";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_UPLOAD_FIELD: &str = "upload_file";
pub const DEFAULT_OUTPUT_PATH: &str = "out.ods";

pub const MAX_TIMEOUT_SECONDS: u64 = 3600;
