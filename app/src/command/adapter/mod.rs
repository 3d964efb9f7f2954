mod switchbot;

#[cfg(test)]
pub mod fake;

pub use switchbot::SwitchBotClient;

use crate::device_state::PowerState;

/// Raw answer of the vendor API. `ok` reflects the HTTP status class only.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub ok: bool,
    pub status_code: u16,
    pub body: serde_json::Value,
}

impl TransportResponse {
    pub fn vendor_message(&self) -> String {
        match self.body.get("message").and_then(|m| m.as_str()) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ if self.body.is_null() => format!("HTTP {}", self.status_code),
            _ => self.body.to_string(),
        }
    }

    /// Interprets a status read. Infrared devices mostly answer without a usable power field,
    /// which yields [`PowerState::Unknown`].
    pub fn reported_power(&self) -> PowerState {
        if !self.ok {
            return PowerState::Unknown;
        }

        let power = self
            .body
            .get("body")
            .and_then(|body| body.get("power"))
            .and_then(|power| power.as_str());

        match power.map(|p| p.to_ascii_lowercase()).as_deref() {
            Some("on") => PowerState::On,
            Some("off") => PowerState::Off,
            _ => PowerState::Unknown,
        }
    }
}

/// Signed access to the actuator vendor. `Err` means no HTTP answer was received at all.
pub trait ActuatorTransport: Send + Sync + 'static {
    fn send_command(
        &self,
        device_id: &str,
        encoded_parameter: &str,
    ) -> impl Future<Output = anyhow::Result<TransportResponse>> + Send;

    fn read_status(&self, device_id: &str) -> impl Future<Output = anyhow::Result<TransportResponse>> + Send;
}
