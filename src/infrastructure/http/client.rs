use mime::Mime;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info};
use url::Url;

use crate::common::error::{ConfigError, ServiceError};
use crate::config::settings::AppConfig;
use crate::modules::credentials::dto::ValidateKeysRequest;
use crate::modules::credentials::model::CredentialStatus;
use crate::modules::render::model::RenderedVideo;
use crate::modules::status::model::SystemSnapshot;
use crate::modules::submission::{FieldValue, FormField, RenderSubmission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SystemStatus,
    ValidateKeys,
    GenerateVideo,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::SystemStatus => "/system-status",
            Endpoint::ValidateKeys => "/validate-keys",
            Endpoint::GenerateVideo => "/generate-video",
        }
    }
}

/// Thin wrapper over the rendering service's HTTP surface. Cheap to clone;
/// every clone shares one connection pool.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    http: Client,
    base: Url,
}

impl ServiceClient {
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        info!("Rendering service at {}", config.service_url);
        Ok(Self {
            http,
            base: config.service_url.clone(),
        })
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, ServiceError> {
        Ok(self.base.join(endpoint.as_str().trim_start_matches('/'))?)
    }

    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request.send().await.map_err(|source| ServiceError::Transport {
            endpoint: endpoint.as_str(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                endpoint: endpoint.as_str(),
                status,
            });
        }

        debug!("{} -> {}", endpoint.as_str(), status);
        Ok(response)
    }

    pub async fn system_status(&self) -> Result<SystemSnapshot, ServiceError> {
        let endpoint = Endpoint::SystemStatus;
        let url = self.endpoint_url(endpoint)?;
        let response = self.send(endpoint, self.http.get(url)).await?;

        response.json::<SystemSnapshot>().await.map_err(|source| ServiceError::Decode {
            endpoint: endpoint.as_str(),
            source,
        })
    }

    pub async fn validate_keys(&self, request: &ValidateKeysRequest) -> Result<CredentialStatus, ServiceError> {
        let endpoint = Endpoint::ValidateKeys;
        let url = self.endpoint_url(endpoint)?;

        let form = request
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| form.text(*name, value.clone()));

        let response = self.send(endpoint, self.http.post(url).multipart(form)).await?;

        response.json::<CredentialStatus>().await.map_err(|source| ServiceError::Decode {
            endpoint: endpoint.as_str(),
            source,
        })
    }

    pub async fn generate_video(&self, submission: RenderSubmission) -> Result<RenderedVideo, ServiceError> {
        let endpoint = Endpoint::GenerateVideo;
        let url = self.endpoint_url(endpoint)?;
        let form = render_form(submission)?;

        let response = self.send(endpoint, self.http.post(url).multipart(form)).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Mime>().ok());

        let data = response.bytes().await.map_err(|source| ServiceError::Decode {
            endpoint: endpoint.as_str(),
            source,
        })?;

        info!("Received rendered video ({} bytes)", data.len());
        Ok(RenderedVideo { data, content_type })
    }
}

fn render_form(submission: RenderSubmission) -> Result<Form, ServiceError> {
    let mut form = Form::new();

    for FormField { name, value } in submission.into_fields() {
        form = match value {
            FieldValue::Text(text) => form.text(name, text),
            FieldValue::File(file) => {
                let part = Part::bytes(file.data.to_vec())
                    .file_name(file.file_name)
                    .mime_str(file.content_type.as_ref())
                    .map_err(|source| ServiceError::Encode {
                        endpoint: Endpoint::GenerateVideo.as_str(),
                        field: name,
                        source,
                    })?;
                form.part(name, part)
            }
        };
    }

    Ok(form)
}
