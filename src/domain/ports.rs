use crate::domain::model::{BlendPayload, OutputMode};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn scheme(&self) -> &str;
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn api_prefix(&self) -> &str;
    fn resource(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn api_key_header(&self) -> &str;
    fn insecure_skip_verify(&self) -> bool;
    fn timeout_seconds(&self) -> u64;
    fn input_files(&self) -> &[String];
    fn upload_field(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_mode(&self) -> OutputMode;
}

/// The three calls the remote blend service offers for one resource.
#[async_trait]
pub trait BlendApi: Send + Sync {
    async fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<()>;
    async fn list(&self) -> Result<String>;
    async fn blend(&self) -> Result<BlendPayload>;
}
