// Copyright (c) 2025 - Cowboy AI, Inc.
//! HTTP lock service client
//!
//! Speaks the hardware state manager's service-reservation API:
//!
//! ```text
//! create  = POST {base}{path}
//! renew   = POST {base}{path}/renew
//! release = POST {base}{path}/release
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{
    GrantOutcome, KeyOutcome, Lease, ProcessingModel, ReservationConfig, ReservationError,
    ReservationFailure, ReservationKey, ReservationService,
};

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    #[serde(rename = "ComponentIDs")]
    ids: &'a [String],
    #[serde(rename = "ProcessingModel")]
    model: ProcessingModel,
    #[serde(rename = "ReservationDuration")]
    duration_minutes: u64,
}

#[derive(Debug, Default, Deserialize)]
struct CreateResponse {
    #[serde(rename = "Success", default)]
    success: Vec<Lease>,
    #[serde(rename = "Failure", default)]
    failure: Vec<ReservationFailure>,
}

#[derive(Debug, Serialize)]
struct KeyRequest<'a> {
    #[serde(rename = "ReservationKeys")]
    keys: &'a [ReservationKey],
    #[serde(rename = "ProcessingModel")]
    model: ProcessingModel,
    #[serde(rename = "ReservationDuration", skip_serializing_if = "Option::is_none")]
    duration_minutes: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct Counts {
    #[serde(rename = "Total", default)]
    total: usize,
    #[serde(rename = "Success", default)]
    success: usize,
    #[serde(rename = "Failure", default)]
    failure: usize,
}

#[derive(Debug, Default, Deserialize)]
struct ComponentIds {
    #[serde(rename = "ComponentIDs", default)]
    ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KeyResponse {
    #[serde(rename = "Counts", default)]
    counts: Counts,
    #[serde(rename = "Success", default)]
    success: ComponentIds,
    #[serde(rename = "Failure", default)]
    failure: Vec<ReservationFailure>,
}

impl From<KeyResponse> for KeyOutcome {
    fn from(response: KeyResponse) -> Self {
        Self {
            succeeded: response.success.ids,
            failed: response.failure,
        }
    }
}

/// Lease lengths go over the wire in whole minutes, at least one
fn duration_minutes(duration: Duration) -> u64 {
    duration.as_secs().div_ceil(60).max(1)
}

/// [`ReservationService`] backed by the HSM lock API
#[derive(Debug, Clone)]
pub struct HsmReservationService {
    client: Client,
    endpoint: String,
}

impl HsmReservationService {
    pub fn new(config: &ReservationConfig) -> Result<Self, ReservationError> {
        info!("Using reservation service at {}", config.endpoint());

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.service_name.clone())
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    "Content-Type",
                    "application/json".parse().map_err(|e| {
                        ReservationError::Service(format!("Invalid header: {}", e))
                    })?,
                );
                headers
            })
            .build()
            .map_err(|e| ReservationError::Service(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, ReservationError>
    where
        B: Serialize + ?Sized + Sync,
        R: for<'de> Deserialize<'de> + Send,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ReservationError::Service(format!("POST {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReservationError::Service(format!(
                "POST {} returned {}: {}",
                url, status, body
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ReservationError::Service(format!("Invalid response from {}: {}", url, e)))
    }
}

#[async_trait]
impl ReservationService for HsmReservationService {
    async fn create(
        &self,
        ids: &[String],
        model: ProcessingModel,
        duration: Duration,
    ) -> Result<GrantOutcome, ReservationError> {
        let request = CreateRequest {
            ids,
            model,
            duration_minutes: duration_minutes(duration),
        };
        let response: CreateResponse = self.post(&self.endpoint, &request).await?;
        debug!(
            granted = response.success.len(),
            failed = response.failure.len(),
            "Reservation create response"
        );
        Ok(GrantOutcome {
            granted: response.success,
            failed: response.failure,
        })
    }

    async fn renew(
        &self,
        keys: &[ReservationKey],
        model: ProcessingModel,
        duration: Duration,
    ) -> Result<KeyOutcome, ReservationError> {
        let request = KeyRequest {
            keys,
            model,
            duration_minutes: Some(duration_minutes(duration)),
        };
        let url = format!("{}/renew", self.endpoint);
        let response: KeyResponse = self.post(&url, &request).await?;
        debug!(
            total = response.counts.total,
            success = response.counts.success,
            failure = response.counts.failure,
            "Reservation renew response"
        );
        Ok(response.into())
    }

    async fn release(
        &self,
        keys: &[ReservationKey],
        model: ProcessingModel,
    ) -> Result<KeyOutcome, ReservationError> {
        let request = KeyRequest {
            keys,
            model,
            duration_minutes: None,
        };
        let url = format!("{}/release", self.endpoint);
        let response: KeyResponse = self.post(&url, &request).await?;
        debug!(
            total = response.counts.total,
            success = response.counts.success,
            failure = response.counts.failure,
            "Reservation release response"
        );
        Ok(response.into())
    }
}
