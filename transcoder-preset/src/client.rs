//! # Elastic Transcoder client (CLI <-> Core)
//!
//! This module wires the [`PresetClient`] trait from
//! [`transcoder_preset_core::contract`] to the real service. Requests go out
//! with `reqwest` and are signed with AWS Signature Version 4.
//!
//! ## Client Usage
//!
//! - Construct [`ElasticTranscoderClient`] from explicit [`ClientSettings`] or
//!   with [`ElasticTranscoderClient::new_from_env`] (`AWS_ACCESS_KEY_ID`,
//!   `AWS_SECRET_ACCESS_KEY`, optional `AWS_SESSION_TOKEN`, `AWS_REGION`).
//! - `ELASTIC_TRANSCODER_ENDPOINT` points the client at an emulator or proxy.
//!
//! No retries or backoff happen here; every failed call is returned as is.

use std::env;
use std::fmt;
use std::time::SystemTime;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use transcoder_preset_core::contract::{
    ClientError, CreatePresetRequest, CreatedPreset, PresetPage, PresetSummary,
};
use transcoder_preset_core::contract::PresetClient;

/// Path of the preset collection in the 2012-09-25 API.
pub const PRESETS_PATH: &str = "/2012-09-25/presets";
const SIGNING_NAME: &str = "elastictranscoder";

/// Static access keys used to sign requests.
#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub region: String,
    /// Overrides `https://elastictranscoder.{region}.amazonaws.com`.
    pub endpoint: Option<String>,
    pub credentials: StaticCredentials,
}

pub struct ElasticTranscoderClient {
    http: reqwest::Client,
    endpoint: Url,
    region: String,
    credentials: Credentials,
}

impl ElasticTranscoderClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let endpoint_raw = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://elastictranscoder.{}.amazonaws.com", settings.region));
        let endpoint = Url::parse(&endpoint_raw).map_err(|e| {
            tracing::error!(error = ?e, endpoint = %endpoint_raw, "Invalid Elastic Transcoder endpoint");
            format!("Invalid endpoint {endpoint_raw}: {e}")
        })?;

        let credentials = Credentials::new(
            settings.credentials.access_key_id,
            settings.credentials.secret_access_key,
            settings.credentials.session_token,
            None,
            "transcoder-preset",
        );

        tracing::info!(
            region = %settings.region,
            endpoint = %endpoint,
            "Initialized ElasticTranscoderClient"
        );
        Ok(ElasticTranscoderClient {
            http: reqwest::Client::new(),
            endpoint,
            region: settings.region,
            credentials,
        })
    }

    /// Build a client from the environment. `region` and `endpoint` take
    /// precedence over the corresponding environment variables.
    pub fn new_from_env(
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Result<Self, ClientError> {
        dotenvy::dotenv().ok(); // loads environment variables from .env if present

        let region = match region
            .or_else(|| env::var("AWS_REGION").ok())
            .or_else(|| env::var("AWS_DEFAULT_REGION").ok())
        {
            Some(region) => region,
            None => {
                tracing::error!("No region given and AWS_REGION/AWS_DEFAULT_REGION not set");
                return Err("No region given and AWS_REGION/AWS_DEFAULT_REGION not set".into());
            }
        };
        let endpoint = endpoint.or_else(|| env::var("ELASTIC_TRANSCODER_ENDPOINT").ok());

        match (env::var("AWS_ACCESS_KEY_ID"), env::var("AWS_SECRET_ACCESS_KEY")) {
            (Ok(access_key_id), Ok(secret_access_key)) => {
                let session_token = env::var("AWS_SESSION_TOKEN").ok();
                tracing::info!(
                    session_token_set = session_token.is_some(),
                    %region,
                    "Loaded AWS credentials from environment"
                );
                ElasticTranscoderClient::new(ClientSettings {
                    region,
                    endpoint,
                    credentials: StaticCredentials {
                        access_key_id,
                        secret_access_key,
                        session_token,
                    },
                })
            }
            (Err(e), _) => {
                tracing::error!(error = ?e, "AWS_ACCESS_KEY_ID missing in environment");
                Err(format!("AWS_ACCESS_KEY_ID: {e}").into())
            }
            (_, Err(e)) => {
                tracing::error!(error = ?e, "AWS_SECRET_ACCESS_KEY missing in environment");
                Err(format!("AWS_SECRET_ACCESS_KEY: {e}").into())
            }
        }
    }

    fn presets_url(&self) -> Result<Url, ClientError> {
        Ok(self.endpoint.join(PRESETS_PATH)?)
    }

    /// Sign and send one request, returning the parsed JSON body.
    async fn send(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Value, ClientError> {
        let body = body.unwrap_or_default();
        let mut headers: Vec<(&str, &str)> = vec![("accept", "application/json")];
        if !body.is_empty() {
            headers.push(("content-type", "application/json"));
        }

        let identity: Identity = self.credentials.clone().into();
        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()?
            .into();
        let signable = SignableRequest::new(
            method.as_str(),
            url.as_str(),
            headers.iter().copied(),
            SignableBody::Bytes(&body),
        )?;
        let (instructions, _signature) = sign(signable, &signing_params)?.into_parts();

        let mut request = self.http.request(method.clone(), url.clone());
        for (name, value) in &headers {
            request = request.header(*name, *value);
        }
        for (name, value) in instructions.headers() {
            request = request.header(name, value);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        tracing::debug!(%method, %url, "Sending Elastic Transcoder request");
        let response = request.send().await?;
        let status = response.status();
        let error_type = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(':').next().unwrap_or(v).to_string());
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ServiceErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(text);
            let code = error_type.unwrap_or_else(|| "UnknownError".to_string());
            tracing::error!(%status, %code, %message, %url, "Elastic Transcoder rejected request");
            return Err(format!("{code} ({}): {message}", status.as_u16()).into());
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    #[serde(alias = "Message")]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ApiPreset {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Arn")]
    arn: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Container", default)]
    container: Option<String>,
}

impl From<ApiPreset> for PresetSummary {
    fn from(p: ApiPreset) -> Self {
        PresetSummary {
            id: p.id,
            arn: p.arn,
            name: p.name,
            container: p.container,
        }
    }
}

#[derive(Deserialize)]
struct ListPresetsResponse {
    #[serde(rename = "Presets", default)]
    presets: Vec<ApiPreset>,
    #[serde(rename = "NextPageToken", default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct CreatePresetResponse {
    #[serde(rename = "Preset")]
    preset: ApiPreset,
    #[serde(rename = "Warning", default)]
    warning: Option<String>,
}

#[derive(Serialize)]
struct CreatePresetBody<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "Container")]
    container: &'a str,
    #[serde(rename = "Video", skip_serializing_if = "Option::is_none")]
    video: Option<&'a Value>,
    #[serde(rename = "Audio", skip_serializing_if = "Option::is_none")]
    audio: Option<&'a Value>,
    #[serde(rename = "Thumbnails", skip_serializing_if = "Option::is_none")]
    thumbnails: Option<&'a Value>,
}

#[async_trait]
impl PresetClient for ElasticTranscoderClient {
    async fn list_presets(&self, page_token: Option<String>) -> Result<PresetPage, ClientError> {
        let mut url = self.presets_url()?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("Ascending", "true");
            if let Some(token) = &page_token {
                query.append_pair("PageToken", token);
            }
        }
        tracing::debug!(has_token = page_token.is_some(), "Listing presets");

        let body = self.send(Method::GET, url, None).await?;
        let page: ListPresetsResponse = serde_json::from_value(body)?;
        tracing::debug!(count = page.presets.len(), "Fetched presets page");
        Ok(PresetPage {
            presets: page.presets.into_iter().map(PresetSummary::from).collect(),
            next_page_token: page.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn create_preset(&self, req: CreatePresetRequest) -> Result<CreatedPreset, ClientError> {
        tracing::info!(
            preset_name = %req.name,
            container = %req.container,
            "Creating preset"
        );
        let body = CreatePresetBody {
            name: &req.name,
            description: req.description.as_deref(),
            container: &req.container,
            video: req.video.as_ref(),
            audio: req.audio.as_ref(),
            thumbnails: req.thumbnails.as_ref(),
        };
        let payload = serde_json::to_vec(&body)?;

        let response = self
            .send(Method::POST, self.presets_url()?, Some(payload))
            .await?;
        let created: CreatePresetResponse = serde_json::from_value(response)?;
        tracing::info!(preset_id = %created.preset.id, "Successfully created preset");
        Ok(CreatedPreset {
            preset: created.preset.into(),
            warning: created.warning.filter(|w| !w.is_empty()),
        })
    }

    async fn delete_preset(&self, id: String) -> Result<(), ClientError> {
        tracing::info!(preset_id = %id, "Deleting preset");
        let mut url = self.presets_url()?;
        url.path_segments_mut()
            .map_err(|_| format!("Endpoint {} cannot carry a path", self.endpoint))?
            .push(&id);

        self.send(Method::DELETE, url, None).await?;
        tracing::info!(preset_id = %id, "Successfully deleted preset");
        Ok(())
    }
}
