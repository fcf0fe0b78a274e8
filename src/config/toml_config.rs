use super::*;
use crate::core::endpoints::ApiEndpoints;
use crate::domain::model::OutputMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BlendError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub upload: UploadConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_prefix: Option<String>,
    pub resource: Option<String>,
    pub api_key: Option<String>,
    pub api_key_header: Option<String>,
    pub insecure_skip_verify: Option<bool>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub files: Vec<String>,
    pub field_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub mode: Option<OutputMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|source| BlendError::InputFile {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BlendError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BLEND_API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BlendError::ConfigParse {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_scheme("server.scheme", self.scheme())?;
        validation::validate_non_empty_string("server.host", self.host())?;
        validation::validate_range("server.port", self.port(), 1, u16::MAX)?;
        validation::validate_non_empty_string("server.resource", self.resource())?;
        validation::validate_non_empty_string("server.api_key_header", self.api_key_header())?;
        if let Some(api_key) = self.api_key() {
            validation::validate_resolved("server.api_key", api_key)?;
        }
        validation::validate_range(
            "server.timeout_seconds",
            self.timeout_seconds(),
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        validation::validate_input_files("upload.files", &self.upload.files)?;
        validation::validate_non_empty_string("upload.field_name", self.upload_field())?;
        validation::validate_path("output.path", self.output_path())?;

        let endpoints = ApiEndpoints::from_config(self)?;
        validation::validate_url("server", endpoints.list().as_str())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn scheme(&self) -> &str {
        self.server.scheme.as_deref().unwrap_or(DEFAULT_SCHEME)
    }

    fn host(&self) -> &str {
        self.server.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    fn port(&self) -> u16 {
        self.server.port.unwrap_or(DEFAULT_PORT)
    }

    fn api_prefix(&self) -> &str {
        self.server.api_prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX)
    }

    fn resource(&self) -> &str {
        self.server.resource.as_deref().unwrap_or(DEFAULT_RESOURCE)
    }

    fn api_key(&self) -> Option<&str> {
        self.server.api_key.as_deref().filter(|key| !key.is_empty())
    }

    fn api_key_header(&self) -> &str {
        self.server
            .api_key_header
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_HEADER)
    }

    fn insecure_skip_verify(&self) -> bool {
        self.server.insecure_skip_verify.unwrap_or(false)
    }

    fn timeout_seconds(&self) -> u64 {
        self.server.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn input_files(&self) -> &[String] {
        &self.upload.files
    }

    fn upload_field(&self) -> &str {
        self.upload.field_name.as_deref().unwrap_or(DEFAULT_UPLOAD_FIELD)
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_mode(&self) -> OutputMode {
        self.output.mode.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
scheme = "https"
host = "blend.example.com"
port = 44001
resource = "todos"
api_key = "rocks"
insecure_skip_verify = true
timeout_seconds = 10

[upload]
files = ["../BlendResult/robot/results/output_a.xml", "output_b.xml"]

[output]
path = "reports/out.ods"
mode = "text"

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.host(), "blend.example.com");
        assert_eq!(config.resource(), "todos");
        assert_eq!(config.api_key(), Some("rocks"));
        assert!(config.insecure_skip_verify());
        assert_eq!(config.timeout_seconds(), 10);
        assert_eq!(config.input_files().len(), 2);
        assert_eq!(config.output_path(), "reports/out.ods");
        assert_eq!(config.output_mode(), OutputMode::Text);
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[upload]
files = ["a.xml"]
"#,
        )
        .unwrap();

        assert_eq!(config.scheme(), "https");
        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), 44001);
        assert_eq!(config.api_prefix(), "api/v1");
        assert_eq!(config.resource(), "blend");
        assert_eq!(config.api_key(), None);
        assert_eq!(config.api_key_header(), "theapikey");
        assert!(!config.insecure_skip_verify());
        assert_eq!(config.timeout_seconds(), 30);
        assert_eq!(config.upload_field(), "upload_file");
        assert_eq!(config.output_path(), "out.ods");
        assert_eq!(config.output_mode(), OutputMode::Binary);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BLEND_CLIENT_TEST_API_KEY", "from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[server]
api_key = "${BLEND_CLIENT_TEST_API_KEY}"

[upload]
files = ["a.xml"]
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("BLEND_CLIENT_TEST_API_KEY");
    }

    #[test]
    fn test_unresolved_api_key_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[server]
api_key = "${BLEND_CLIENT_TEST_UNSET_VARIABLE}"

[upload]
files = ["a.xml"]
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("${BLEND_CLIENT_TEST_UNSET_VARIABLE}"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let bad_scheme = TomlConfig::from_toml_str(
            r#"
[server]
scheme = "ftp"

[upload]
files = ["a.xml"]
"#,
        )
        .unwrap();
        assert!(bad_scheme.validate().is_err());

        let no_files = TomlConfig::from_toml_str(
            r#"
[upload]
files = []
"#,
        )
        .unwrap();
        assert!(matches!(
            no_files.validate(),
            Err(BlendError::MissingConfig { .. })
        ));

        let long_timeout = TomlConfig::from_toml_str(
            r#"
[server]
timeout_seconds = 7200

[upload]
files = ["a.xml"]
"#,
        )
        .unwrap();
        assert!(long_timeout.validate().is_err());
    }

    #[test]
    fn test_missing_upload_section_is_a_parse_error() {
        let err = TomlConfig::from_toml_str("[server]\nhost = \"localhost\"\n").unwrap_err();
        assert!(matches!(err, BlendError::ConfigParse { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[upload]\nfiles = [\"output_a.xml\"]\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.input_files(), ["output_a.xml".to_string()]);
    }
}
