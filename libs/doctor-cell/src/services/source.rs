// libs/doctor-cell/src/services/source.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{DoctorError, DoctorRecord};

/// Provider of the raw doctor list.
#[async_trait]
pub trait DoctorSource: Send + Sync {
    async fn fetch_doctors(&self) -> Result<Vec<DoctorRecord>, DoctorError>;
}

/// Fetches the static JSON document named by `DOCTORS_SOURCE_URL`.
pub struct HttpDoctorSource {
    client: Client,
    url: String,
}

impl HttpDoctorSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.doctors_source_url.clone(),
        }
    }
}

#[async_trait]
impl DoctorSource for HttpDoctorSource {
    async fn fetch_doctors(&self) -> Result<Vec<DoctorRecord>, DoctorError> {
        debug!("Fetching doctor list from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Doctor source error ({}): {}", status, body);
            return Err(DoctorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let records = response.json::<Vec<DoctorRecord>>().await?;
        debug!("Fetched {} doctor records", records.len());

        Ok(records)
    }
}

/// In-memory source, used for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticDoctorSource {
    outcome: Result<Vec<DoctorRecord>, String>,
    delay: Option<Duration>,
}

impl StaticDoctorSource {
    pub fn new(records: Vec<DoctorRecord>) -> Self {
        Self {
            outcome: Ok(records),
            delay: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl DoctorSource for StaticDoctorSource {
    async fn fetch_doctors(&self) -> Result<Vec<DoctorRecord>, DoctorError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.outcome.clone().map_err(DoctorError::Fetch)
    }
}

/// Pick one doctor out of a fetched list.
pub fn find_doctor(records: Vec<DoctorRecord>, id: u64) -> Result<DoctorRecord, DoctorError> {
    records
        .into_iter()
        .find(|record| record.id == id)
        .ok_or_else(|| DoctorError::NotFound(id.to_string()))
}
