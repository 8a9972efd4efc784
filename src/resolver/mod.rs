//! Query orchestration
//!
//! The [`Resolver`] is the long-lived entry point: it owns the upstream
//! address, the deadline policy, the answer cache, and an admission
//! semaphore bounding how many query sessions are open at once. Each
//! lookup runs as its own spawned task wrapping a [`QuerySession`], so
//! callers can fan out many hostnames concurrently and await or cancel
//! them independently.

pub mod session;

pub use session::{QuerySession, SessionState};

use crate::cache::Cache;
use crate::config::Config;
use crate::dns::{is_valid_hostname, DnsResponse, RecordType};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Semaphore};
use tracing::{debug, info};

/// Identifier for one in-flight lookup, usable to cancel it
pub type SessionId = u64;

/// Handle to a lookup running in its own task
///
/// Await [`QueryHandle::outcome`] for the result. Dropping the handle
/// does not cancel the lookup; use [`Resolver::cancel`] for that.
pub struct QueryHandle {
    id: SessionId,
    rx: oneshot::Receiver<Result<DnsResponse>>,
}

impl QueryHandle {
    /// Session id of the underlying lookup
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Wait for the lookup to finish
    ///
    /// Returns [`Error::Cancelled`] if the lookup was cancelled before
    /// producing a result.
    pub async fn outcome(self) -> Result<DnsResponse> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(Error::Cancelled),
        }
    }
}

/// Stub resolver querying a single upstream server over UDP
pub struct Resolver {
    config: Config,
    cache: Option<Cache>,
    admission: Semaphore,
    next_id: AtomicU64,
    cancels: Mutex<HashMap<SessionId, oneshot::Sender<()>>>,
}

impl Resolver {
    /// Create a resolver from validated configuration
    pub fn new(config: Config) -> Result<Arc<Self>> {
        config.validate()?;
        let cache = config.cache_enabled.then(|| Cache::new(config.max_cache_ttl()));
        info!(
            server = %config.server,
            timeout_ms = config.timeout_ms,
            max_in_flight = config.max_in_flight,
            cache = config.cache_enabled,
            "resolver ready"
        );
        Ok(Arc::new(Self {
            admission: Semaphore::new(config.max_in_flight),
            cache,
            next_id: AtomicU64::new(1),
            cancels: Mutex::new(HashMap::new()),
            config,
        }))
    }

    /// Upstream server this resolver queries
    pub fn server(&self) -> std::net::SocketAddr {
        self.config.server
    }

    /// Resolve one hostname, waiting for the outcome
    pub async fn resolve(
        self: &Arc<Self>,
        hostname: &str,
        qtype: RecordType,
    ) -> Result<DnsResponse> {
        self.spawn(hostname, qtype).outcome().await
    }

    /// Start a lookup in its own task and return a handle to it
    ///
    /// The session is admitted once a slot is free under the configured
    /// in-flight limit; until then it waits without holding a socket.
    pub fn spawn(self: &Arc<Self>, hostname: &str, qtype: RecordType) -> QueryHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.cancels.lock().unwrap().insert(id, cancel_tx);

        let resolver = Arc::clone(self);
        let hostname = hostname.to_string();
        tokio::spawn(async move {
            let result = resolver.run_session(id, &hostname, qtype, cancel_rx).await;
            resolver.cancels.lock().unwrap().remove(&id);
            // The caller may have dropped the handle; that is fine.
            let _ = tx.send(result);
        });

        QueryHandle { id, rx }
    }

    /// Cancel an in-flight lookup
    ///
    /// Returns `true` if the session was still running and has now been
    /// told to stop, `false` if it already finished or never existed.
    pub fn cancel(&self, id: SessionId) -> bool {
        match self.cancels.lock().unwrap().remove(&id) {
            Some(cancel_tx) => {
                debug!(session = id, "cancelling session");
                cancel_tx.send(()).is_ok()
            }
            None => false,
        }
    }

    /// Number of lookups currently admitted or waiting for admission
    pub fn in_flight(&self) -> usize {
        self.cancels.lock().unwrap().len()
    }

    async fn run_session(
        &self,
        id: SessionId,
        hostname: &str,
        qtype: RecordType,
        mut cancel_rx: oneshot::Receiver<()>,
    ) -> Result<DnsResponse> {
        if !is_valid_hostname(hostname) {
            return Err(Error::invalid_hostname(hostname));
        }

        if let Some(cache) = &self.cache {
            if let Some(response) = cache.get(hostname, qtype) {
                debug!(session = id, hostname, %qtype, "answered from cache");
                return Ok(response);
            }
        }

        // Wait for an admission slot, unless cancelled first.
        let _permit = tokio::select! {
            permit = self.admission.acquire() => {
                permit.map_err(|_| Error::Cancelled)?
            }
            _ = &mut cancel_rx => return Err(Error::Cancelled),
        };

        let session = QuerySession::new(
            id,
            hostname,
            qtype,
            self.config.server,
            self.config.timeout(),
        );
        // Dropping the session future closes its socket, so cancellation
        // releases the port immediately.
        let result = tokio::select! {
            result = session.run() => result,
            _ = &mut cancel_rx => return Err(Error::Cancelled),
        };

        if let (Some(cache), Ok(response)) = (&self.cache, &result) {
            cache.insert(hostname, qtype, response);
        }
        result
    }
}
