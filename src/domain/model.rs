use chrono::{DateTime, Utc};
use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the blend payload is written to the output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Response bytes, verbatim.
    #[default]
    Binary,
    /// Response decoded with its declared charset (UTF-8 when none), written as UTF-8.
    Text,
}

/// `charset` parameter of a Content-Type value, e.g. `text/plain; charset=iso-8859-1`.
fn charset_of(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

impl OutputMode {
    pub fn render(self, bytes: Vec<u8>, content_type: Option<&str>) -> Vec<u8> {
        match self {
            OutputMode::Binary => bytes,
            OutputMode::Text => {
                let encoding = content_type
                    .and_then(charset_of)
                    .and_then(|label| Encoding::for_label(label.as_bytes()))
                    .unwrap_or(UTF_8);
                let (text, _, had_errors) = encoding.decode(&bytes);
                if had_errors {
                    tracing::warn!(
                        "Blend payload is not valid {}; invalid sequences were replaced",
                        encoding.name()
                    );
                }
                text.into_owned().into_bytes()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlendPayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadKind {
    OpenDocument { mimetype: String },
    ZipArchive { entries: usize },
    NotArchive,
}

impl PayloadKind {
    pub fn is_archive(&self) -> bool {
        !matches!(self, PayloadKind::NotArchive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
}

/// Outcome of one successful upload, list and blend run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub resource: String,
    pub started_at: DateTime<Utc>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
    pub uploaded: Vec<UploadedFile>,
    pub listing: String,
    pub output_path: String,
    pub output_bytes: u64,
    pub payload_kind: PayloadKind,
}

impl RunReport {
    pub fn to_json(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
