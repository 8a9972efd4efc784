//! TTL-based answer cache
//!
//! Caches parsed responses by (hostname, record type) with an expiry derived
//! from the minimum answer TTL, clamped to a configured ceiling. The cache
//! is consulted before a query is issued and populated after a successful
//! response. Expired entries are dropped lazily on lookup.

use crate::dns::{DnsResponse, RecordType};
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

type CacheKey = (String, RecordType);

struct CacheEntry {
    response: DnsResponse,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at <= Instant::now()
    }
}

/// Answer cache keyed by hostname and record type
///
/// Backed by a sharded concurrent map, so lookups from parallel query
/// sessions do not serialize on one lock.
pub struct Cache {
    entries: DashMap<CacheKey, CacheEntry>,
    max_ttl: Duration,
}

impl Cache {
    /// Create a cache whose entries live at most `max_ttl`
    pub fn new(max_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_ttl,
        }
    }

    /// Look up a cached response, dropping it if expired
    pub fn get(&self, hostname: &str, rtype: RecordType) -> Option<DnsResponse> {
        let key = (hostname.to_string(), rtype);
        if let Some(entry) = self.entries.get(&key) {
            if !entry.is_expired() {
                return Some(entry.response.clone());
            }
            // Release the shard lock before removing
            drop(entry);
            self.entries.remove(&key);
        }
        None
    }

    /// Store a response under (hostname, record type)
    ///
    /// Responses without answers are not cached. The entry expires after
    /// the minimum answer TTL, clamped to the cache ceiling; a zero or
    /// negative TTL suppresses caching entirely.
    pub fn insert(&self, hostname: &str, rtype: RecordType, response: &DnsResponse) {
        let min_ttl = response
            .answers
            .iter()
            .map(|rr| rr.ttl().max(0) as u64)
            .min();
        let Some(ttl_secs) = min_ttl else {
            return;
        };
        let ttl = Duration::from_secs(ttl_secs).min(self.max_ttl);
        if ttl.is_zero() {
            return;
        }

        debug!(hostname, %rtype, ttl_secs = ttl.as_secs(), "caching answer");
        self.entries.insert(
            (hostname.to_string(), rtype),
            CacheEntry {
                response: response.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Number of entries currently held, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries whose expiry has passed
    pub fn purge_expired(&self) {
        self.entries.retain(|_, entry| !entry.is_expired());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{Question, RData, RecordClass, ResourceRecord, ResponseCode};
    use std::net::Ipv4Addr;
    use std::sync::Arc;

    fn response_with_ttl(hostname: &str, ttl: i32) -> DnsResponse {
        DnsResponse {
            id: 1,
            rcode: ResponseCode::NoError,
            hostname: hostname.to_string(),
            questions: vec![Question::new(hostname, RecordType::A, RecordClass::IN)],
            answers: vec![ResourceRecord::new(
                hostname,
                RecordType::A,
                RecordClass::IN,
                ttl,
                RData::A(Ipv4Addr::new(192, 0, 2, 1)),
            )],
        }
    }

    #[test]
    fn test_hit_before_expiry() {
        let cache = Cache::new(Duration::from_secs(300));
        let response = response_with_ttl("example.com", 60);

        cache.insert("example.com", RecordType::A, &response);
        let hit = cache.get("example.com", RecordType::A).unwrap();
        assert_eq!(hit, response);
    }

    #[test]
    fn test_keyed_by_record_type() {
        let cache = Cache::new(Duration::from_secs(300));
        let response = response_with_ttl("example.com", 60);

        cache.insert("example.com", RecordType::A, &response);
        assert!(cache.get("example.com", RecordType::AAAA).is_none());
        assert!(cache.get("other.com", RecordType::A).is_none());
    }

    #[test]
    fn test_empty_answers_not_cached() {
        let cache = Cache::new(Duration::from_secs(300));
        let mut response = response_with_ttl("example.com", 60);
        response.answers.clear();

        cache.insert("example.com", RecordType::A, &response);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_not_cached() {
        let cache = Cache::new(Duration::from_secs(300));
        let response = response_with_ttl("example.com", 0);

        cache.insert("example.com", RecordType::A, &response);
        assert!(cache.get("example.com", RecordType::A).is_none());
    }

    #[test]
    fn test_negative_ttl_not_cached() {
        let cache = Cache::new(Duration::from_secs(300));
        let response = response_with_ttl("example.com", -300);

        cache.insert("example.com", RecordType::A, &response);
        assert!(cache.get("example.com", RecordType::A).is_none());
    }

    #[test]
    fn test_ttl_clamped_to_ceiling() {
        // Ceiling of zero means nothing is ever cached.
        let cache = Cache::new(Duration::ZERO);
        let response = response_with_ttl("example.com", 86400);

        cache.insert("example.com", RecordType::A, &response);
        assert!(cache.get("example.com", RecordType::A).is_none());
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let cache = Cache::new(Duration::from_secs(300));
        cache.insert(
            "example.com",
            RecordType::A,
            &response_with_ttl("example.com", 60),
        );

        cache.purge_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let cache = Arc::new(Cache::new(Duration::from_secs(300)));

        let writers: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let hostname = format!("host{}-{}.example.com", t, i);
                        cache.insert(&hostname, RecordType::A, &response_with_ttl(&hostname, 60));
                        assert!(cache.get(&hostname, RecordType::A).is_some());
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        assert_eq!(cache.len(), 8 * 50);
    }
}
