use std::fmt;
use thiserror::Error;

/// Which request of a run produced an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    List,
    Blend,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Upload => "upload",
            Step::List => "list",
            Step::Blend => "blend",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum BlendError {
    #[error("Cannot read input file '{path}': {source}")]
    InputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write output file '{path}': {source}")]
    OutputFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Input path '{path}' has no file name")]
    InvalidInputPath { path: String },

    #[error("{step} request to {url} failed with status {status}: {body}")]
    Status {
        step: Step,
        url: String,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid value for '{field}' ('{value}'): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("Archive inspection failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Api,
    Network,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used by the binaries. `Low` does not fail the process.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl BlendError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BlendError::InputFile { .. } | BlendError::OutputFile { .. } => ErrorCategory::Io,
            BlendError::Status { .. } => ErrorCategory::Api,
            BlendError::Http(_) => ErrorCategory::Network,
            BlendError::InvalidInputPath { .. }
            | BlendError::Url(_)
            | BlendError::InvalidConfigValue { .. }
            | BlendError::MissingConfig { .. }
            | BlendError::ConfigParse { .. } => ErrorCategory::Configuration,
            BlendError::Archive(_) | BlendError::Serialization(_) => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Api | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::Low,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BlendError::InputFile { path, .. } => {
                format!("Check that '{}' exists and is readable", path)
            }
            BlendError::OutputFile { path, .. } => {
                format!("Check write permissions for '{}' and its directory", path)
            }
            BlendError::InvalidInputPath { .. } => {
                "Point each input at a file, not a directory or '..'".to_string()
            }
            BlendError::Status { status, .. } if *status == 401 || *status == 403 => {
                "Check the API key and the API key header name".to_string()
            }
            BlendError::Status { status, .. } if *status == 404 => {
                "Check the resource name and API prefix".to_string()
            }
            BlendError::Status { .. } => "Inspect the server logs for the failed request".to_string(),
            BlendError::Http(e) if e.is_timeout() => {
                "The server did not answer in time; raise timeout_seconds".to_string()
            }
            BlendError::Http(e) if e.is_connect() => {
                "Check host, port and scheme; for self-signed certificates consider insecure_skip_verify"
                    .to_string()
            }
            BlendError::Http(_) => "Check network connectivity to the server".to_string(),
            BlendError::Url(_) => "Check scheme, host, port and API prefix".to_string(),
            BlendError::InvalidConfigValue { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
            BlendError::MissingConfig { field } => format!("Provide a value for '{}'", field),
            BlendError::ConfigParse { .. } => "Check the TOML syntax of the config file".to_string(),
            BlendError::Archive(_) | BlendError::Serialization(_) => {
                "This is reported for information only".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BlendError::InputFile { path, .. } => format!("Input file not available: {}", path),
            BlendError::OutputFile { path, .. } => format!("Could not save output to {}", path),
            BlendError::Status { step, status, .. } => {
                format!("The server rejected the {} request (HTTP {})", step, status)
            }
            BlendError::Http(_) => "Could not reach the blend server".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BlendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_medium_api_error() {
        let err = BlendError::Status {
            step: Step::Upload,
            url: "http://localhost/api/v1/blend/upload/a.xml".to_string(),
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Api);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.severity().exit_code(), 2);
        assert!(err.to_string().contains("upload request"));
        assert!(err.user_friendly_message().contains("HTTP 500"));
    }

    #[test]
    fn test_unauthorized_suggests_api_key() {
        let err = BlendError::Status {
            step: Step::List,
            url: "http://localhost/api/v1/blend/list".to_string(),
            status: 401,
            body: String::new(),
        };
        assert!(err.recovery_suggestion().contains("API key"));
    }

    #[test]
    fn test_input_file_error_is_high_severity() {
        let err = BlendError::InputFile {
            path: "missing.xml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.recovery_suggestion().contains("missing.xml"));
    }
}
