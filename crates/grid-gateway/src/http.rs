//! HTTP gateway over the REST CRUD surface
//!
//! | call     | request                         | success            |
//! |----------|---------------------------------|--------------------|
//! | `list`   | `GET {base}/{prefix}/{resource}`      | `200` + array |
//! | `get`    | `GET {base}/{prefix}/{resource}/{id}` | `200` + object |
//! | create   | `POST {base}/{prefix}/{resource}`     | `201` + object |
//! | replace  | `PUT {base}/{prefix}/{resource}`      | `204` or `200` + object |
//! | `delete` | `DELETE {base}/{prefix}/{resource}/{id}` | `204` |

use crate::auth::AuthProvider;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::{is_new_key, Gateway};
use grid_spec::{value_text, ModelSpec, RowRecord};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Gateway backed by a remote REST API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base: Url,
    config: GatewayConfig,
    auth: Arc<dyn AuthProvider>,
}

impl HttpGateway {
    /// Create gateway
    ///
    /// # Errors
    /// - `Config` if the base URL cannot be parsed or cannot carry a path
    /// - `Transport` if the HTTP client cannot be built
    pub fn new(config: GatewayConfig, auth: Arc<dyn AuthProvider>) -> Result<Self, GatewayError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Config(format!("base url '{}': {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::Config(format!(
                "base url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        tracing::info!("HTTP gateway targeting {}", config.base_url);
        Ok(Self {
            client,
            base,
            config,
            auth,
        })
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Resource URL, with the key as last segment when given
    fn url(&self, resource: &str, key: Option<&Value>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(self.config.api_prefix.split('/').filter(|s| !s.is_empty()));
            segments.push(resource);
            if let Some(key) = key {
                segments.push(&value_text(key));
            }
        }
        url
    }

    /// Build an authorized request; fails before anything is sent when no
    /// credential is available
    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, GatewayError> {
        let token = self
            .auth
            .token()
            .filter(|t| !t.trim().is_empty())
            .ok_or(GatewayError::Unauthenticated)?;
        tracing::debug!(%method, %url, "gateway request");
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), path, "gateway call rejected");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn require_key(model: &ModelSpec, record: RowRecord) -> Result<RowRecord, GatewayError> {
    if record.key(model).is_none() {
        return Err(GatewayError::MissingKey {
            resource: model.resource().to_string(),
            data_key: model.data_key().to_string(),
        });
    }
    Ok(record)
}

#[async_trait::async_trait]
impl Gateway for HttpGateway {
    fn is_available(&self) -> bool {
        self.auth.is_authenticated()
    }

    async fn list(&self, model: &ModelSpec) -> Result<Vec<RowRecord>, GatewayError> {
        let request = self.request(Method::GET, self.url(model.resource(), None))?;
        let response = self.send(request, model.resource()).await?;
        let records: Vec<RowRecord> = Self::decode(response).await?;
        tracing::debug!(resource = model.resource(), count = records.len(), "records listed");
        Ok(records)
    }

    async fn get(&self, model: &ModelSpec, key: &Value) -> Result<RowRecord, GatewayError> {
        let path = format!("{}/{}", model.resource(), value_text(key));
        let request = self.request(Method::GET, self.url(model.resource(), Some(key)))?;
        let response = self.send(request, &path).await?;
        Self::decode(response).await
    }

    async fn update(
        &self,
        model: &ModelSpec,
        key: Option<Value>,
        record: &RowRecord,
    ) -> Result<RowRecord, GatewayError> {
        let creating = is_new_key(key.as_ref());
        let method = if creating { Method::POST } else { Method::PUT };
        let request = self
            .request(method, self.url(model.resource(), None))?
            .json(record);
        let response = self.send(request, model.resource()).await?;

        if response.status() == StatusCode::NO_CONTENT {
            if creating {
                return Err(GatewayError::MissingKey {
                    resource: model.resource().to_string(),
                    data_key: model.data_key().to_string(),
                });
            }
            return Ok(record.clone());
        }
        require_key(model, Self::decode(response).await?)
    }

    async fn delete(&self, model: &ModelSpec, key: &Value) -> Result<(), GatewayError> {
        let path = format!("{}/{}", model.resource(), value_text(key));
        let request = self.request(Method::DELETE, self.url(model.resource(), Some(key)))?;
        self.send(request, &path).await?;
        Ok(())
    }
}
