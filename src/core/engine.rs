use crate::core::inspect::{expects_opendocument, inspect_payload};
use crate::domain::model::{OutputMode, PayloadKind, RunReport, UploadedFile};
use crate::domain::ports::{BlendApi, ConfigProvider, Storage};
use crate::utils::error::{BlendError, Result};
use crate::utils::monitor::RunMonitor;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;

/// What one run uploads and where the blend result goes.
#[derive(Debug, Clone)]
pub struct BlendJob {
    pub resource: String,
    pub input_files: Vec<String>,
    pub output_path: String,
    pub output_mode: OutputMode,
}

impl BlendJob {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            resource: config.resource().to_string(),
            input_files: config.input_files().to_vec(),
            output_path: config.output_path().to_string(),
            output_mode: config.output_mode(),
        }
    }
}

pub fn base_file_name(path: &str) -> Result<String> {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| BlendError::InvalidInputPath {
            path: path.to_string(),
        })
}

/// Runs upload, list and blend once, in that order. The first failure ends the run.
pub struct BlendEngine<A: BlendApi, S: Storage> {
    api: A,
    storage: S,
    job: BlendJob,
    monitor: RunMonitor,
}

impl<A: BlendApi, S: Storage> BlendEngine<A, S> {
    pub fn new(api: A, storage: S, job: BlendJob) -> Self {
        Self::new_with_monitoring(api, storage, job, false)
    }

    pub fn new_with_monitoring(api: A, storage: S, job: BlendJob, monitor_enabled: bool) -> Self {
        Self {
            api,
            storage,
            job,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    pub fn job(&self) -> &BlendJob {
        &self.job
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        tracing::info!(
            "Starting blend run for resource '{}' with {} file(s)",
            self.job.resource,
            self.job.input_files.len()
        );

        let uploaded = self.upload_all().await?;
        self.monitor.log_phase("upload");

        let listing = self.list().await?;
        self.monitor.log_phase("list");

        let (output_bytes, payload_kind) = self.blend().await?;
        self.monitor.log_phase("blend");
        self.monitor.log_final_stats();

        Ok(RunReport {
            resource: self.job.resource.clone(),
            started_at,
            elapsed: start.elapsed(),
            uploaded,
            listing,
            output_path: self.job.output_path.clone(),
            output_bytes,
            payload_kind,
        })
    }

    pub async fn upload_all(&self) -> Result<Vec<UploadedFile>> {
        let mut uploaded = Vec::with_capacity(self.job.input_files.len());

        for path in &self.job.input_files {
            let name = base_file_name(path)?;
            let content = self.storage.read_file(path).await?;
            let size_bytes = content.len() as u64;

            tracing::info!("⬆️  Uploading {} ({} bytes)", name, size_bytes);
            self.api.upload(&name, content).await?;
            tracing::debug!("Upload of {} accepted", name);

            uploaded.push(UploadedFile {
                name,
                path: path.clone(),
                size_bytes,
            });
        }

        Ok(uploaded)
    }

    /// Prints the listing verbatim.
    pub async fn list(&self) -> Result<String> {
        tracing::info!("📋 Requesting listing of uploaded files");
        let listing = self.api.list().await?;
        println!("{}", listing);
        Ok(listing)
    }

    pub async fn blend(&self) -> Result<(u64, PayloadKind)> {
        tracing::info!("🔀 Requesting blend");
        let payload = self.api.blend().await?;
        tracing::debug!(
            "Blend returned {} bytes (content type: {})",
            payload.bytes.len(),
            payload.content_type.as_deref().unwrap_or("unknown")
        );

        let payload_kind = inspect_payload(&payload.bytes);
        self.warn_on_mismatch(&payload_kind);

        let data = self
            .job
            .output_mode
            .render(payload.bytes, payload.content_type.as_deref());
        self.storage.write_file(&self.job.output_path, &data).await?;
        tracing::info!("📁 Output saved to: {} ({} bytes)", self.job.output_path, data.len());

        Ok((data.len() as u64, payload_kind))
    }

    fn warn_on_mismatch(&self, kind: &PayloadKind) {
        match self.job.output_mode {
            OutputMode::Binary => {
                if expects_opendocument(&self.job.output_path)
                    && !matches!(kind, PayloadKind::OpenDocument { .. })
                {
                    tracing::warn!(
                        "Blend payload is not an OpenDocument archive ({:?}); {} may not open",
                        kind,
                        self.job.output_path
                    );
                }
            }
            OutputMode::Text => {
                if kind.is_archive() {
                    tracing::warn!(
                        "Blend payload is a zip archive but output mode is text; the written file will be corrupted"
                    );
                }
            }
        }
    }
}
