use crate::core::engine::base_file_name;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BlendError, Result};
use std::fmt;
use url::Url;

/// URLs of one resource on the blend service:
/// `<scheme>://<host>:<port>/<api_prefix>/<resource>/{upload/<name>,list,blend}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: Url,
    segments: Vec<String>,
}

impl ApiEndpoints {
    pub fn new(scheme: &str, host: &str, port: u16, api_prefix: &str, resource: &str) -> Result<Self> {
        let base = Url::parse(&format!("{}://{}:{}/", scheme, host, port))?;
        if base.cannot_be_a_base() {
            return Err(BlendError::InvalidConfigValue {
                field: "host".to_string(),
                value: host.to_string(),
                reason: "Cannot be used as a base URL".to_string(),
            });
        }

        let segments: Vec<String> = api_prefix
            .split('/')
            .chain(std::iter::once(resource))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { base, segments })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.scheme(),
            config.host(),
            config.port(),
            config.api_prefix(),
            config.resource(),
        )
    }

    fn build(&self, tail: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear();
            path.extend(self.segments.iter().map(String::as_str));
            path.extend(tail);
        }
        url
    }

    /// The file name is pushed as a single, percent-encoded segment.
    pub fn upload(&self, file_name: &str) -> Url {
        self.build(&["upload", file_name])
    }

    pub fn list(&self) -> Url {
        self.build(&["list"])
    }

    pub fn blend(&self) -> Url {
        self.build(&["blend"])
    }
}

/// One request a run would send, as shown by a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRequest {
    pub method: &'static str,
    pub url: Url,
    pub note: String,
}

impl fmt::Display for PlannedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<4} {}", self.method, self.url)?;
        if !self.note.is_empty() {
            write!(f, "  {}", self.note)?;
        }
        Ok(())
    }
}

/// The requests of one run, in order, without sending any of them.
pub fn plan<C: ConfigProvider + ?Sized>(config: &C) -> Result<Vec<PlannedRequest>> {
    let endpoints = ApiEndpoints::from_config(config)?;
    let mut requests = Vec::with_capacity(config.input_files().len() + 2);

    for path in config.input_files() {
        let name = base_file_name(path)?;
        let size = match std::fs::metadata(path) {
            Ok(meta) => format!("{} bytes", meta.len()),
            Err(e) => format!("unreadable: {}", e),
        };
        requests.push(PlannedRequest {
            method: "POST",
            url: endpoints.upload(&name),
            note: format!("<- {} ({})", path, size),
        });
    }

    requests.push(PlannedRequest {
        method: "GET",
        url: endpoints.list(),
        note: String::new(),
    });
    requests.push(PlannedRequest {
        method: "GET",
        url: endpoints.blend(),
        note: format!("-> {}", config.output_path()),
    });

    Ok(requests)
}
