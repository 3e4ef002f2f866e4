use super::wire::{CommandEnvelope, RelayAck};
use crate::config::RelaySettings;
use crate::error::DispatchError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, warn};

/// Delivers a command envelope to the relay for one robot serial.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn post_command(
        &self,
        serial: &str,
        envelope: &CommandEnvelope<'_>,
    ) -> Result<RelayAck, DispatchError>;
}

/// The HTTP relay: `POST {base_url}/command/{serial}`.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: Client,
    base_url: Url,
}

impl HttpRelay {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let base_url = Url::parse(base_url).map_err(|e| DispatchError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &RelaySettings) -> Result<Self, DispatchError> {
        Self::new(&settings.base_url, Duration::from_secs(settings.timeout_secs))
    }

    /// The command URL for `serial`, with the serial percent-encoded as a
    /// single path segment.
    pub fn command_url(&self, serial: &str) -> Result<Url, DispatchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DispatchError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push("command")
            .push(serial);
        Ok(url)
    }
}

#[async_trait]
impl RelayTransport for HttpRelay {
    async fn post_command(
        &self,
        serial: &str,
        envelope: &CommandEnvelope<'_>,
    ) -> Result<RelayAck, DispatchError> {
        let url = self.command_url(serial)?;
        debug!(%url, "posting command to relay");

        let response = self.client.post(url).json(envelope).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!(error = %e, "relay acknowledgement is not valid JSON");
            RelayAck::default()
        }))
    }
}
