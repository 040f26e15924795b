// Copyright (c) 2025 - Cowboy AI, Inc.
//! Process-local lock service
//!
//! Holds locks in memory with expiry measured on the tokio clock, so tests
//! running with a paused clock see leases lapse deterministically.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::{
    GrantOutcome, KeyOutcome, Lease, ProcessingModel, ReservationError, ReservationFailure,
    ReservationKey, ReservationService,
};

#[derive(Debug, Clone)]
struct Lock {
    reservation_key: String,
    deadline: Instant,
}

/// In-memory [`ReservationService`]
#[derive(Debug, Default)]
pub struct InMemoryReservationService {
    locks: Mutex<HashMap<String, Lock>>,
}

impl InMemoryReservationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Administratively break a lock; returns whether one was held
    pub async fn revoke(&self, id: &str) -> bool {
        self.locks.lock().await.remove(id).is_some()
    }

    /// Whether `id` is currently locked by anyone
    pub async fn is_locked(&self, id: &str) -> bool {
        let now = Instant::now();
        self.locks
            .lock()
            .await
            .get(id)
            .map(|lock| lock.deadline > now)
            .unwrap_or(false)
    }

    fn expiration(duration: Duration) -> chrono::DateTime<Utc> {
        Utc::now() + chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero())
    }

    /// Why `key` does not name a live lock, if it does not
    fn check_key(locks: &HashMap<String, Lock>, key: &ReservationKey, now: Instant) -> Option<ReservationFailure> {
        match locks.get(&key.id) {
            Some(lock) if lock.deadline <= now => Some(ReservationFailure::new(&key.id, "Reservation expired")),
            Some(lock) if lock.reservation_key != key.key => {
                Some(ReservationFailure::new(&key.id, "Reservation key mismatch"))
            }
            Some(_) => None,
            None => Some(ReservationFailure::new(&key.id, "Reservation not found")),
        }
    }
}

#[async_trait]
impl ReservationService for InMemoryReservationService {
    async fn create(
        &self,
        ids: &[String],
        model: ProcessingModel,
        duration: Duration,
    ) -> Result<GrantOutcome, ReservationError> {
        let mut locks = self.locks.lock().await;
        let now = Instant::now();
        locks.retain(|_, lock| lock.deadline > now);

        let failed: Vec<ReservationFailure> = ids
            .iter()
            .filter(|id| locks.contains_key(*id))
            .map(|id| ReservationFailure::new(id, "Component is locked"))
            .collect();
        if model == ProcessingModel::Rigid && !failed.is_empty() {
            return Ok(GrantOutcome {
                granted: Vec::new(),
                failed,
            });
        }

        let expiration = Self::expiration(duration);
        let mut granted = Vec::new();
        for id in ids {
            if locks.contains_key(id) {
                continue;
            }
            let lease = Lease {
                id: id.clone(),
                reservation_key: format!("{}:rk:{}", id, Uuid::now_v7()),
                deputy_key: Some(format!("{}:dk:{}", id, Uuid::now_v7())),
                expiration,
            };
            locks.insert(
                id.clone(),
                Lock {
                    reservation_key: lease.reservation_key.clone(),
                    deadline: now + duration,
                },
            );
            granted.push(lease);
        }

        debug!(granted = granted.len(), failed = failed.len(), "Created reservations");
        Ok(GrantOutcome { granted, failed })
    }

    async fn renew(
        &self,
        keys: &[ReservationKey],
        model: ProcessingModel,
        duration: Duration,
    ) -> Result<KeyOutcome, ReservationError> {
        let mut locks = self.locks.lock().await;
        let now = Instant::now();

        let failed: Vec<ReservationFailure> = keys
            .iter()
            .filter_map(|key| Self::check_key(&locks, key, now))
            .collect();
        if model == ProcessingModel::Rigid && !failed.is_empty() {
            return Ok(KeyOutcome {
                succeeded: Vec::new(),
                failed,
            });
        }

        let mut succeeded = Vec::new();
        for key in keys {
            if Self::check_key(&locks, key, now).is_some() {
                continue;
            }
            if let Some(lock) = locks.get_mut(&key.id) {
                lock.deadline = now + duration;
                succeeded.push(key.id.clone());
            }
        }
        Ok(KeyOutcome { succeeded, failed })
    }

    async fn release(
        &self,
        keys: &[ReservationKey],
        model: ProcessingModel,
    ) -> Result<KeyOutcome, ReservationError> {
        let mut locks = self.locks.lock().await;
        let now = Instant::now();

        let failed: Vec<ReservationFailure> = keys
            .iter()
            .filter_map(|key| Self::check_key(&locks, key, now))
            .collect();
        if model == ProcessingModel::Rigid && !failed.is_empty() {
            return Ok(KeyOutcome {
                succeeded: Vec::new(),
                failed,
            });
        }

        let mut succeeded = Vec::new();
        for key in keys {
            if Self::check_key(&locks, key, now).is_none() {
                locks.remove(&key.id);
                succeeded.push(key.id.clone());
            }
        }
        Ok(KeyOutcome { succeeded, failed })
    }
}
