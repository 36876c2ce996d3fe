// SPDX-License-Identifier: MPL-2.0
//! Delivery of contact messages through the EmailJS REST API.

use super::form::TemplateParams;
use crate::config::ContactConfig;
use crate::error::{Error, Result, TransportError};
use futures_util::future::{BoxFuture, FutureExt};
use serde::Serialize;

/// Sends a rendered contact message somewhere.
pub trait EmailTransport: Send + Sync + 'static {
    fn send(&self, params: TemplateParams) -> BoxFuture<'static, Result<()>>;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams,
}

/// Posts messages to the configured EmailJS endpoint. A single attempt is
/// made per message.
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    client: reqwest::Client,
    config: ContactConfig,
}

impl EmailJsClient {
    pub fn new(config: ContactConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("Folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::from)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    async fn post(client: reqwest::Client, config: ContactConfig, params: TemplateParams) -> Result<()> {
        let url = reqwest::Url::parse(&config.endpoint)
            .map_err(|_| TransportError::InvalidUrl(config.endpoint.clone()))?;
        let body = SendRequest {
            service_id: &config.service_id,
            template_id: &config.template_id,
            user_id: &config.public_key,
            template_params: params,
        };

        let response = client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                code: status.as_u16(),
                body,
            }
            .into());
        }

        tracing::debug!(service_id = %config.service_id, "contact message accepted");
        Ok(())
    }
}

impl EmailTransport for EmailJsClient {
    fn send(&self, params: TemplateParams) -> BoxFuture<'static, Result<()>> {
        Self::post(self.client.clone(), self.config.clone(), params).boxed()
    }
}
