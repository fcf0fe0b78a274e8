use crate::core::endpoints::ApiEndpoints;
use crate::domain::model::BlendPayload;
use crate::domain::ports::{BlendApi, ConfigProvider};
use crate::utils::error::{BlendError, Result, Step};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// `BlendApi` over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpBlendApi {
    client: Client,
    endpoints: ApiEndpoints,
    upload_field: String,
}

impl HttpBlendApi {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let endpoints = ApiEndpoints::from_config(config)?;
        let headers = api_key_headers(config.api_key_header(), config.api_key())?;

        if config.insecure_skip_verify() {
            tracing::warn!("⚠️  TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .danger_accept_invalid_certs(config.insecure_skip_verify())
            .build()?;

        Ok(Self {
            client,
            endpoints,
            upload_field: config.upload_field().to_string(),
        })
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }
}

fn api_key_headers(header_name: &str, api_key: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let Some(key) = api_key else {
        return Ok(headers);
    };

    let name = HeaderName::from_bytes(header_name.as_bytes()).map_err(|e| {
        BlendError::InvalidConfigValue {
            field: "api_key_header".to_string(),
            value: header_name.to_string(),
            reason: e.to_string(),
        }
    })?;
    let mut value = HeaderValue::from_str(key).map_err(|e| BlendError::InvalidConfigValue {
        field: "api_key".to_string(),
        value: "<redacted>".to_string(),
        reason: e.to_string(),
    })?;
    value.set_sensitive(true);

    headers.insert(name, value);
    Ok(headers)
}

/// Anything outside 2xx is an error; the body is kept for diagnosis.
async fn ensure_success(step: Step, url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("{} {} -> {}", step, url, status);
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BlendError::Status {
        step,
        url: url.to_string(),
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

#[async_trait::async_trait]
impl BlendApi for HttpBlendApi {
    async fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<()> {
        let url = self.endpoints.upload(file_name);
        let part = Part::bytes(content).file_name(file_name.to_string());
        let form = Form::new().part(self.upload_field.clone(), part);

        let response = self.client.post(url.clone()).multipart(form).send().await?;
        ensure_success(Step::Upload, &url, response).await?;
        Ok(())
    }

    async fn list(&self) -> Result<String> {
        let url = self.endpoints.list();
        let response = self.client.get(url.clone()).send().await?;
        let response = ensure_success(Step::List, &url, response).await?;
        Ok(response.text().await?)
    }

    async fn blend(&self) -> Result<BlendPayload> {
        let url = self.endpoints.blend();
        let response = self.client.get(url.clone()).send().await?;
        let response = ensure_success(Step::Blend, &url, response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(BlendPayload {
            bytes,
            content_type,
        })
    }
}
