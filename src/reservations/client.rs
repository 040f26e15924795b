// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reservation client with background lease renewal

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{
    GrantOutcome, KeyOutcome, Lease, ProcessingModel, ReservationConfig, ReservationError,
    ReservationFailure, ReservationKey, ReservationService,
};

#[derive(Debug, Clone)]
struct HeldLease {
    lease: Lease,
    deadline: Instant,
}

type LeaseMap = Arc<RwLock<HashMap<String, HeldLease>>>;

/// Which of the requested components this client currently holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub held: Vec<Lease>,
    pub missing: Vec<String>,
}

/// Client-side view of the reservations this process holds
///
/// Leases live in a shared map that the renewal task and callers both
/// touch. The task stops on [`ReservationClient::shutdown`] or when the
/// client is dropped. Acquires on one client are serialized so that the
/// loser of two overlapping requests for the same id sees `AlreadyHeld`.
pub struct ReservationClient {
    service: Arc<dyn ReservationService>,
    config: ReservationConfig,
    leases: LeaseMap,
    acquiring: Mutex<()>,
    stop: watch::Sender<bool>,
    renewal: Option<JoinHandle<()>>,
}

impl ReservationClient {
    /// Create a client and start its renewal task
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(service: Arc<dyn ReservationService>, config: ReservationConfig) -> Self {
        let leases: LeaseMap = Arc::new(RwLock::new(HashMap::new()));
        let (stop, stopped) = watch::channel(false);

        let renewal = tokio::spawn(renewal_loop(
            Arc::clone(&service),
            Arc::clone(&leases),
            config.clone(),
            stopped,
        ));

        info!(
            service = %config.service_name,
            renew_interval_secs = config.renew_interval().as_secs(),
            "Reservation client started"
        );

        Self {
            service,
            config,
            leases,
            acquiring: Mutex::new(()),
            stop,
            renewal: Some(renewal),
        }
    }

    pub fn config(&self) -> &ReservationConfig {
        &self.config
    }

    /// Reserve every id or none of them
    pub async fn acquire<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Lease>, ReservationError> {
        let ids = owned(ids);
        let _guard = self.acquiring.lock().await;
        let held = self.held_among(&ids).await;
        if !held.is_empty() {
            return Err(ReservationError::AlreadyHeld(held));
        }

        let outcome = self
            .service
            .create(&ids, ProcessingModel::Rigid, self.config.lease_duration())
            .await?;

        if !outcome.failed.is_empty() {
            if !outcome.granted.is_empty() {
                self.return_leases(&outcome.granted).await;
            }
            warn!(failed = outcome.failed.len(), "Reservation refused");
            return Err(ReservationError::Rejected(outcome.failed));
        }

        self.record(&outcome.granted).await;
        info!(count = outcome.granted.len(), "Acquired reservations");
        Ok(outcome.granted)
    }

    /// Reserve whatever can be reserved
    ///
    /// Ids this client already holds are reported as failures and left alone.
    pub async fn flex_acquire<S: AsRef<str>>(&self, ids: &[S]) -> Result<GrantOutcome, ReservationError> {
        let ids = owned(ids);
        let _guard = self.acquiring.lock().await;
        let held = self.held_among(&ids).await;
        let wanted: Vec<String> = ids.into_iter().filter(|id| !held.contains(id)).collect();

        let mut outcome = if wanted.is_empty() {
            GrantOutcome::default()
        } else {
            self.service
                .create(&wanted, ProcessingModel::Flexible, self.config.lease_duration())
                .await?
        };

        self.record(&outcome.granted).await;
        outcome
            .failed
            .extend(held.into_iter().map(|id| ReservationFailure::new(id, "Already held by this client")));

        info!(
            granted = outcome.granted.len(),
            failed = outcome.failed.len(),
            "Acquired reservations (flexible)"
        );
        Ok(outcome)
    }

    /// Release every id, or nothing if any of them is not held here
    pub async fn release<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), ReservationError> {
        let ids = owned(ids);
        let check = self.flex_check(ids.as_slice()).await;
        if !check.missing.is_empty() {
            return Err(ReservationError::AlreadyReleased(check.missing));
        }

        let keys: Vec<ReservationKey> = check.held.iter().map(ReservationKey::from).collect();
        let outcome = self.service.release(&keys, ProcessingModel::Rigid).await?;
        self.forget(&ids).await;

        if !outcome.failed.is_empty() {
            warn!(failed = outcome.failed.len(), "Service did not recognize released reservations");
            return Err(ReservationError::Rejected(outcome.failed));
        }

        info!(count = ids.len(), "Released reservations");
        Ok(())
    }

    /// Release whatever of `ids` is held here
    pub async fn flex_release<S: AsRef<str>>(&self, ids: &[S]) -> Result<KeyOutcome, ReservationError> {
        let ids = owned(ids);
        let check = self.flex_check(ids.as_slice()).await;

        let mut outcome = if check.held.is_empty() {
            KeyOutcome::default()
        } else {
            let keys: Vec<ReservationKey> = check.held.iter().map(ReservationKey::from).collect();
            let outcome = self.service.release(&keys, ProcessingModel::Flexible).await?;
            let attempted: Vec<String> = check.held.iter().map(|lease| lease.id.clone()).collect();
            self.forget(&attempted).await;
            outcome
        };

        outcome.failed.extend(
            check
                .missing
                .into_iter()
                .map(|id| ReservationFailure::new(id, "Not held by this client")),
        );

        info!(
            released = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Released reservations (flexible)"
        );
        Ok(outcome)
    }

    /// Whether every id is held here and unexpired
    pub async fn check<S: AsRef<str>>(&self, ids: &[S]) -> bool {
        let now = Instant::now();
        let leases = self.leases.read().await;
        ids.iter().all(|id| {
            leases
                .get(id.as_ref())
                .map(|held| held.deadline > now)
                .unwrap_or(false)
        })
    }

    /// Split `ids` into leases held here and ids that are not
    pub async fn flex_check<S: AsRef<str>>(&self, ids: &[S]) -> CheckOutcome {
        let now = Instant::now();
        let leases = self.leases.read().await;
        let mut outcome = CheckOutcome::default();
        for id in ids {
            match leases.get(id.as_ref()) {
                Some(held) if held.deadline > now => outcome.held.push(held.lease.clone()),
                _ => outcome.missing.push(id.as_ref().to_string()),
            }
        }
        outcome
    }

    /// Adopt leases obtained elsewhere, e.g. by a previous run of this process
    ///
    /// The service must still recognize each key. With `rigid` set, one
    /// unrecognized key means nothing is adopted.
    pub async fn reacquire(&self, leases: &[Lease], rigid: bool) -> Result<KeyOutcome, ReservationError> {
        let model = if rigid {
            ProcessingModel::Rigid
        } else {
            ProcessingModel::Flexible
        };
        let keys: Vec<ReservationKey> = leases.iter().map(ReservationKey::from).collect();
        let outcome = self
            .service
            .renew(&keys, model, self.config.lease_duration())
            .await?;

        let adopted: Vec<Lease> = leases
            .iter()
            .filter(|lease| outcome.succeeded.contains(&lease.id))
            .cloned()
            .collect();
        self.record(&adopted).await;

        info!(
            adopted = adopted.len(),
            failed = outcome.failed.len(),
            "Reacquired reservations"
        );
        Ok(outcome)
    }

    /// Reservation key of every lease currently held
    pub async fn status(&self) -> HashMap<String, String> {
        let now = Instant::now();
        self.leases
            .read()
            .await
            .iter()
            .filter(|(_, held)| held.deadline > now)
            .map(|(id, held)| (id.clone(), held.lease.reservation_key.clone()))
            .collect()
    }

    /// Stop the renewal task and wait for it to finish
    ///
    /// Leases are not released; they lapse at the service unless released
    /// first.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        if let Some(renewal) = self.renewal.take() {
            if let Err(e) = renewal.await {
                warn!(error = %e, "Renewal task ended abnormally");
            }
        }
        info!("Reservation client stopped");
    }

    async fn held_among(&self, ids: &[String]) -> Vec<String> {
        let now = Instant::now();
        let leases = self.leases.read().await;
        ids.iter()
            .filter(|id| leases.get(*id).map(|held| held.deadline > now).unwrap_or(false))
            .cloned()
            .collect()
    }

    async fn record(&self, granted: &[Lease]) {
        if granted.is_empty() {
            return;
        }
        let deadline = Instant::now() + self.config.lease_duration();
        let mut leases = self.leases.write().await;
        for lease in granted {
            leases.insert(
                lease.id.clone(),
                HeldLease {
                    lease: lease.clone(),
                    deadline,
                },
            );
        }
    }

    async fn forget(&self, ids: &[String]) {
        let mut leases = self.leases.write().await;
        for id in ids {
            leases.remove(id);
        }
    }

    /// Undo a partial rigid grant
    async fn return_leases(&self, granted: &[Lease]) {
        let keys: Vec<ReservationKey> = granted.iter().map(ReservationKey::from).collect();
        if let Err(e) = self.service.release(&keys, ProcessingModel::Flexible).await {
            warn!(error = %e, "Failed to return partially granted reservations");
        }
    }
}

impl Drop for ReservationClient {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
    }
}

fn owned<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    ids.iter().map(|id| id.as_ref().to_string()).collect()
}

async fn renewal_loop(
    service: Arc<dyn ReservationService>,
    leases: LeaseMap,
    config: ReservationConfig,
    mut stopped: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(config.renew_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => renew_due(service.as_ref(), &leases, &config).await,
            changed = stopped.changed() => {
                if changed.is_err() || *stopped.borrow() {
                    break;
                }
            }
        }
    }
    debug!("Renewal task exiting");
}

/// Renew leases within the renewal margin; drop the ones the service refuses
///
/// Results only touch a lease whose key is still the one that was sent, so a
/// lease released and reacquired while the request was in flight survives.
async fn renew_due(service: &dyn ReservationService, leases: &LeaseMap, config: &ReservationConfig) {
    let now = Instant::now();
    let due: Vec<ReservationKey> = leases
        .read()
        .await
        .values()
        .filter(|held| held.deadline.saturating_duration_since(now) <= config.renew_margin())
        .map(|held| ReservationKey::from(&held.lease))
        .collect();
    if due.is_empty() {
        return;
    }

    let outcome = match service
        .renew(&due, ProcessingModel::Flexible, config.lease_duration())
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, count = due.len(), "Reservation renewal failed");
            let now = Instant::now();
            leases.write().await.retain(|_, held| held.deadline > now);
            return;
        }
    };

    let renewed_at = Instant::now();
    let expiration = Utc::now()
        + chrono::Duration::from_std(config.lease_duration()).unwrap_or_else(|_| chrono::Duration::zero());
    let sent: HashMap<&str, &str> = due.iter().map(|k| (k.id.as_str(), k.key.as_str())).collect();
    let mut leases = leases.write().await;
    for id in &outcome.succeeded {
        if let Some(held) = leases.get_mut(id) {
            if sent.get(id.as_str()) == Some(&held.lease.reservation_key.as_str()) {
                held.deadline = renewed_at + config.lease_duration();
                held.lease.expiration = expiration;
            }
        }
    }
    for failure in &outcome.failed {
        let current = leases
            .get(&failure.id)
            .map(|held| sent.get(failure.id.as_str()) == Some(&held.lease.reservation_key.as_str()))
            .unwrap_or(false);
        if current {
            warn!(id = %failure.id, reason = %failure.reason, "Reservation lost; dropping lease");
            leases.remove(&failure.id);
        } else {
            debug!(id = %failure.id, "Ignoring renewal result for a replaced lease");
        }
    }
    debug!(renewed = outcome.succeeded.len(), "Renewed reservations");
}
