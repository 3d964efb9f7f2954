use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;

use super::{ActuatorTransport, TransportResponse};

pub enum Scripted {
    Respond(TransportResponse),
    NetworkError(&'static str),
    Hang(Duration),
}

/// Transport replaying scripted answers and recording every call.
#[derive(Default)]
pub struct FakeTransport {
    commands: Mutex<VecDeque<Scripted>>,
    statuses: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<(String, String)>>,
    status_reads: Mutex<usize>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepting() -> Self {
        let fake = Self::new();
        fake.push_command(Scripted::Respond(success()));
        fake
    }

    pub fn push_command(&self, scripted: Scripted) {
        self.commands.lock().unwrap().push_back(scripted);
    }

    pub fn push_status(&self, scripted: Scripted) {
        self.statuses.lock().unwrap().push_back(scripted);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn status_reads(&self) -> usize {
        *self.status_reads.lock().unwrap()
    }

    async fn play(next: Option<Scripted>) -> anyhow::Result<TransportResponse> {
        match next.unwrap_or_else(|| Scripted::Respond(success())) {
            Scripted::Respond(response) => Ok(response),
            Scripted::NetworkError(message) => Err(anyhow::anyhow!(message)),
            Scripted::Hang(duration) => {
                tokio::time::sleep(duration).await;
                Ok(success())
            }
        }
    }
}

pub fn success() -> TransportResponse {
    TransportResponse {
        ok: true,
        status_code: 200,
        body: json!({"statusCode": 100, "body": {}, "message": "success"}),
    }
}

pub fn http_error(status_code: u16, message: &str) -> TransportResponse {
    TransportResponse {
        ok: false,
        status_code,
        body: json!({ "message": message }),
    }
}

pub fn status_power(power: &str) -> TransportResponse {
    TransportResponse {
        ok: true,
        status_code: 200,
        body: json!({"statusCode": 100, "body": {"power": power}, "message": "success"}),
    }
}

impl ActuatorTransport for FakeTransport {
    async fn send_command(&self, device_id: &str, encoded_parameter: &str) -> anyhow::Result<TransportResponse> {
        self.sent
            .lock()
            .unwrap()
            .push((device_id.to_string(), encoded_parameter.to_string()));
        let next = self.commands.lock().unwrap().pop_front();
        Self::play(next).await
    }

    async fn read_status(&self, _device_id: &str) -> anyhow::Result<TransportResponse> {
        *self.status_reads.lock().unwrap() += 1;
        let next = self.statuses.lock().unwrap().pop_front();
        Self::play(next).await
    }
}
