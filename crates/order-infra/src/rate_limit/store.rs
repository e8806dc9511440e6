//! Process-wide fixed-window request counters keyed by client.
//!
//! All reads, writes and the eviction sweep go through one mutex around the
//! client map. Critical sections are a single map lookup, so a blocking
//! `parking_lot` lock is used rather than an async one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Timing knobs for the window store.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Length of one counting window.
    pub window: Duration,
    /// A client unseen for longer than this is dropped by the sweep.
    pub idle_timeout: Duration,
    /// How often the background sweep runs.
    pub sweep_interval: Duration,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(10 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// Per-client counter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientRecord {
    pub count: u32,
    pub window_reset_at: Instant,
    pub last_seen_at: Instant,
}

/// Outcome of a single `admit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub count: u32,
    /// Time left in the client's current window.
    pub retry_after: Duration,
}

struct Sweeper {
    stop: Arc<Notify>,
    handle: JoinHandle<()>,
}

/// Fixed-window counter store shared by every request worker.
pub struct ClientWindowStore {
    clients: Mutex<HashMap<String, ClientRecord>>,
    config: WindowConfig,
    sweeper: Mutex<Option<Sweeper>>,
}

impl ClientWindowStore {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            config,
            sweeper: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Count a request from `client_id` against `limit`.
    pub fn admit(&self, client_id: &str, limit: u32) -> Decision {
        self.admit_at(client_id, limit, Instant::now())
    }

    /// `admit` with an explicit clock reading.
    ///
    /// The limit is compared before the increment, so a window lets
    /// `limit + 1` requests through before the first denial.
    pub fn admit_at(&self, client_id: &str, limit: u32, now: Instant) -> Decision {
        let window = self.config.window;
        let mut clients = self.clients.lock();

        let Some(record) = clients.get_mut(client_id) else {
            clients.insert(
                client_id.to_string(),
                ClientRecord {
                    count: 1,
                    window_reset_at: now + window,
                    last_seen_at: now,
                },
            );
            return Decision {
                allowed: true,
                count: 1,
                retry_after: window,
            };
        };

        record.last_seen_at = now;

        if now >= record.window_reset_at {
            record.count = 1;
            record.window_reset_at = now + window;
            return Decision {
                allowed: true,
                count: 1,
                retry_after: window,
            };
        }

        let retry_after = record.window_reset_at - now;
        if record.count > limit {
            return Decision {
                allowed: false,
                count: record.count,
                retry_after,
            };
        }

        record.count += 1;
        Decision {
            allowed: true,
            count: record.count,
            retry_after,
        }
    }

    /// Remove clients idle for longer than the configured timeout.
    /// Returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let idle_timeout = self.config.idle_timeout;
        let mut clients = self.clients.lock();
        let before = clients.len();
        clients.retain(|_, record| now.saturating_duration_since(record.last_seen_at) <= idle_timeout);
        before - clients.len()
    }

    pub fn get(&self, client_id: &str) -> Option<ClientRecord> {
        self.clients.lock().get(client_id).copied()
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn the periodic eviction task on the current tokio runtime.
    ///
    /// Returns `false` without spawning anything when a sweep task is already
    /// running for this store. The task only holds a weak reference and ends
    /// on its own once the store is dropped.
    pub fn start_eviction(self: &Arc<Self>) -> bool {
        let mut sweeper = self.sweeper.lock();
        if sweeper.is_some() {
            return false;
        }

        let period = self.config.sweep_interval;
        let store = Arc::downgrade(self);
        let stop = Arc::new(Notify::new());
        let stop_signal = stop.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(store) = store.upgrade() else { break };
                        let removed = store.evict_idle();
                        tracing::info!(
                            removed,
                            remaining = store.len(),
                            "Rate limiter cleanup completed"
                        );
                    }
                    _ = stop_signal.notified() => break,
                }
            }
            tracing::debug!("Rate limiter cleanup task stopped");
        });

        *sweeper = Some(Sweeper { stop, handle });
        tracing::info!(interval_secs = period.as_secs(), "Rate limiter cleanup task started");
        true
    }

    /// Stop the eviction task, waiting for it to exit.
    pub async fn stop_eviction(&self) {
        let sweeper = self.sweeper.lock().take();
        let Some(sweeper) = sweeper else {
            return;
        };

        sweeper.stop.notify_one();
        if let Err(e) = sweeper.handle.await {
            tracing::warn!(error = %e, "Rate limiter cleanup task ended abnormally");
        }
    }

    pub fn is_evicting(&self) -> bool {
        self.sweeper.lock().is_some()
    }
}

impl Default for ClientWindowStore {
    fn default() -> Self {
        Self::new(WindowConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_window_admits_limit_plus_one() {
        let store = ClientWindowStore::default();
        let start = Instant::now();

        for expected in 1..=4 {
            let decision = store.admit_at("10.0.0.1", 3, start + Duration::from_secs(expected));
            assert!(decision.allowed, "request {expected} should be admitted");
            assert_eq!(decision.count, expected as u32);
        }

        let denied = store.admit_at("10.0.0.1", 3, start + Duration::from_secs(5));
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after, Duration::from_secs(56));
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let store = ClientWindowStore::default();
        let start = Instant::now();

        for _ in 0..5 {
            store.admit_at("10.0.0.1", 3, start);
        }
        assert!(!store.admit_at("10.0.0.1", 3, start).allowed);

        let decision = store.admit_at("10.0.0.1", 3, start + MINUTE);
        assert!(decision.allowed);
        assert_eq!(decision.count, 1);

        let record = store.get("10.0.0.1").unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.window_reset_at, start + MINUTE + MINUTE);
    }

    #[test]
    fn test_denied_request_still_updates_last_seen() {
        let store = ClientWindowStore::default();
        let start = Instant::now();

        store.admit_at("a", 0, start);
        store.admit_at("a", 0, start + Duration::from_secs(1));
        let later = start + Duration::from_secs(30);
        let decision = store.admit_at("a", 0, later);

        assert!(!decision.allowed);
        assert_eq!(store.get("a").unwrap().last_seen_at, later);
        assert_eq!(store.get("a").unwrap().count, 1);
    }

    #[test]
    fn test_clients_are_independent() {
        let store = ClientWindowStore::default();
        let now = Instant::now();

        store.admit_at("a", 0, now);
        assert!(!store.admit_at("a", 0, now).allowed);
        assert!(store.admit_at("b", 0, now).allowed);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_eviction_removes_only_idle_clients() {
        let store = ClientWindowStore::default();
        let now = Instant::now() + Duration::from_secs(3600);

        store.admit_at("stale", 3, now - Duration::from_secs(11 * 60));
        store.admit_at("recent", 3, now - Duration::from_secs(9 * 60));

        let removed = store.evict_idle_at(now);

        assert_eq!(removed, 1);
        assert!(store.get("stale").is_none());
        assert!(store.get("recent").is_some());
    }

    #[test]
    fn test_concurrent_admits_count_every_request_once() {
        let store = Arc::new(ClientWindowStore::default());
        let threads = 16;
        let per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..per_thread)
                        .map(|_| store.admit("shared", u32::MAX).count)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut counts: Vec<u32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        counts.sort_unstable();

        let expected: Vec<u32> = (1..=(threads * per_thread) as u32).collect();
        assert_eq!(counts, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweep_evicts_idle_clients() {
        let store = Arc::new(ClientWindowStore::default());
        store.admit("10.0.0.9", 3);

        assert!(store.start_eviction());
        assert!(!store.start_eviction());

        // Ticks at 5 and 10 minutes keep the client (idle is not over 10
        // minutes yet); the 15 minute tick removes it.
        tokio::time::sleep(Duration::from_secs(11 * 60)).await;
        assert_eq!(store.len(), 1);

        tokio::time::sleep(Duration::from_secs(5 * 60)).await;
        assert!(store.is_empty());

        store.stop_eviction().await;
        assert!(!store.is_evicting());
        assert!(store.start_eviction());
        store.stop_eviction().await;
    }
}
