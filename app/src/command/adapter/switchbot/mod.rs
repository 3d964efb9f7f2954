mod sign;

use anyhow::Context as _;
use infrastructure::HttpClientConfig;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde_json::json;

use super::{ActuatorTransport, TransportResponse};
use crate::core::time::Duration;

const SUCCESS_STATUS_CODE: i64 = 100;

/// SwitchBot cloud API v1.1 client for infrared-relayed air conditioners.
#[derive(Debug, Clone)]
pub struct SwitchBotClient {
    client: ClientWithMiddleware,
    base_url: String,
    token: String,
    secret: String,
}

impl SwitchBotClient {
    pub fn new(url: &str, token: &str, secret: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = HttpClientConfig::new(None)
            .with_timeout(timeout.into())
            .new_tracing_client()
            .context("Error initializing SwitchBot client")?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            secret: secret.to_owned(),
        })
    }

    fn command_request(&self, device_id: &str, encoded_parameter: &str) -> anyhow::Result<RequestBuilder> {
        let url = format!("{}/v1.1/devices/{}/commands", self.base_url, device_id);
        let payload = json!({
            "command": "setAll",
            "parameter": encoded_parameter,
            "commandType": "command",
        });

        self.signed(self.client.post(url).json(&payload))
    }

    fn status_request(&self, device_id: &str) -> anyhow::Result<RequestBuilder> {
        let url = format!("{}/v1.1/devices/{}/status", self.base_url, device_id);
        self.signed(self.client.get(url))
    }

    fn signed(&self, request: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        let nonce = uuid::Uuid::new_v4().to_string();
        let t_millis = chrono::Utc::now().timestamp_millis();
        let signature = sign::sign_request(&self.token, &self.secret, t_millis, &nonce)?;

        let mut authorization = HeaderValue::from_str(&self.token).context("SwitchBot token is not a valid header")?;
        authorization.set_sensitive(true);

        Ok(request
            .header(AUTHORIZATION, authorization)
            .header("sign", signature.sign)
            .header("t", signature.t)
            .header("nonce", signature.nonce))
    }

    async fn into_transport_response(response: reqwest::Response) -> anyhow::Result<TransportResponse> {
        let status = response.status();
        let text = response.text().await.context("Error reading SwitchBot response body")?;
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        Ok(TransportResponse {
            ok: status.is_success(),
            status_code: status.as_u16(),
            body,
        })
    }
}

impl ActuatorTransport for SwitchBotClient {
    #[tracing::instrument(name = "send_command SWITCHBOT", skip(self))]
    async fn send_command(&self, device_id: &str, encoded_parameter: &str) -> anyhow::Result<TransportResponse> {
        tracing::info!("Sending SwitchBot command to {}: {}", device_id, encoded_parameter);

        let request = self.command_request(device_id, encoded_parameter)?;
        let response = request.send().await.context("Error sending SwitchBot command")?;
        let response = Self::into_transport_response(response).await?;

        let vendor_status = response.body.get("statusCode").and_then(|c| c.as_i64());
        if response.ok && vendor_status.is_some_and(|code| code != SUCCESS_STATUS_CODE) {
            tracing::warn!(
                "SwitchBot accepted command with vendor status {:?}: {}",
                vendor_status,
                response.vendor_message()
            );
        }

        tracing::info!("Response: {} - {}", response.status_code, response.body);
        Ok(response)
    }

    #[tracing::instrument(name = "read_status SWITCHBOT", skip(self))]
    async fn read_status(&self, device_id: &str) -> anyhow::Result<TransportResponse> {
        let request = self.status_request(device_id)?;
        let response = request.send().await.context("Error reading SwitchBot status")?;
        let response = Self::into_transport_response(response).await?;

        tracing::debug!("Status response: {} - {}", response.status_code, response.body);
        Ok(response)
    }
}
