//! Expiring Map Module
//!
//! Main container combining a live store, an expiration index and an
//! expired store, kept consistent by lazy sweeps.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{MapError, Result};
use crate::map::{Clock, Entries, ExpiryStats, Keys, MonotonicClock, Values};

// == Expiring Map ==
/// A map whose entries age out after a fixed TTL.
///
/// Aged-out entries are not dropped. The next operation that sweeps moves
/// them into the expired store, where they stay until the caller removes them
/// with [`expired_remove`](Self::expired_remove) or
/// [`expired_clear`](Self::expired_clear).
///
/// Expiry is lazy: nothing happens until an operation looks at the map.
/// Point lookups (`get`, `contains_key`) only check the key they are given;
/// every other read checks the whole expiration index first.
///
/// Not synchronized. Wrap the whole map in one lock for shared use.
#[derive(Debug)]
pub struct ExpiringMap<K, V, C = MonotonicClock> {
    /// Entries still within TTL
    live: HashMap<K, V>,
    /// Insertion instant of every live key, plus stale instants left by point sweeps
    expirations: HashMap<K, Instant>,
    /// Entries that aged out of the live store
    expired: HashMap<K, V>,
    /// Lifetime shared by all entries
    ttl: Duration,
    /// Time source for stamping and sweeping
    clock: C,
    /// Usage counters
    stats: ExpiryStats,
}

impl<K, V> ExpiringMap<K, V, MonotonicClock>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates a map backed by the monotonic system clock.
    ///
    /// # Errors
    /// Returns [`MapError::InvalidTtl`] when `ttl` is zero.
    pub fn new(ttl: Duration) -> Result<Self> {
        Self::with_clock(ttl, MonotonicClock)
    }
}

impl<K, V, C> ExpiringMap<K, V, C>
where
    K: Eq + Hash,
    C: Clock,
{
    /// Creates a map that reads time from `clock`.
    ///
    /// # Errors
    /// Returns [`MapError::InvalidTtl`] when `ttl` is zero.
    pub fn with_clock(ttl: Duration, clock: C) -> Result<Self> {
        if ttl.is_zero() {
            return Err(MapError::InvalidTtl(
                "TTL must be greater than zero".to_string(),
            ));
        }

        debug!(?ttl, "Expiring map created");

        Ok(Self {
            live: HashMap::new(),
            expirations: HashMap::new(),
            expired: HashMap::new(),
            ttl,
            clock,
            stats: ExpiryStats::new(),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // == Length ==
    /// Returns the number of live entries after sweeping.
    pub fn len(&mut self) -> usize {
        self.sweep();
        self.live.len()
    }

    // == Is Empty ==
    /// Returns true if no live entries remain after sweeping.
    pub fn is_empty(&mut self) -> bool {
        self.sweep();
        self.live.is_empty()
    }

    // == Contains Key ==
    /// Returns true if `key` is live. Only `key` itself is swept.
    pub fn contains_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.remove_if_expired(key, now);
        self.live.contains_key(key)
    }

    // == Get ==
    /// Returns the live value for `key`. Only `key` itself is swept.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.remove_if_expired(key, now);

        let value = self.live.get(key);
        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }

    // == Put ==
    /// Inserts `key -> value` and restarts its TTL.
    ///
    /// Returns the previous live value. Does not sweep and leaves any
    /// expired copy of `key` in place.
    pub fn put(&mut self, key: K, value: V) -> Option<V>
    where
        K: Clone,
    {
        let now = self.clock.now();
        self.expirations.insert(key.clone(), now);
        self.live.insert(key, value)
    }

    // == Put All ==
    /// Calls [`put`](Self::put) for each pair in iteration order.
    pub fn put_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Clone,
    {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    // == Remove ==
    /// Removes `key` from the live store without creating an expired copy.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expirations.remove(key);
        self.live.remove(key)
    }

    // == Clear ==
    /// Drops every live entry. The expired store is untouched.
    pub fn clear(&mut self) {
        self.expirations.clear();
        self.live.clear();
    }

    // == Live Views ==
    /// Sweeps, then returns a read-only view of the live keys.
    pub fn keys(&mut self) -> Keys<'_, K, V> {
        self.sweep();
        Keys::new(&self.live)
    }

    /// Sweeps, then returns a read-only view of the live values.
    pub fn values(&mut self) -> Values<'_, K, V> {
        self.sweep();
        Values::new(&self.live)
    }

    /// Sweeps, then returns a read-only view of the live entries.
    pub fn entries(&mut self) -> Entries<'_, K, V> {
        self.sweep();
        Entries::new(&self.live)
    }

    // == Expired Views ==
    /// Sweeps, then returns a read-only view of the expired keys.
    pub fn expired_keys(&mut self) -> Keys<'_, K, V> {
        self.sweep();
        Keys::new(&self.expired)
    }

    /// Sweeps, then returns a read-only view of the expired values.
    pub fn expired_values(&mut self) -> Values<'_, K, V> {
        self.sweep();
        Values::new(&self.expired)
    }

    /// Sweeps, then returns a read-only view of the expired entries.
    pub fn expired_entries(&mut self) -> Entries<'_, K, V> {
        self.sweep();
        Entries::new(&self.expired)
    }

    /// Sweeps, then returns the number of expired entries.
    pub fn expired_len(&mut self) -> usize {
        self.sweep();
        self.expired.len()
    }

    // == Expired Is Empty ==
    /// Sweeps, then returns **true when the expired store holds entries**.
    ///
    /// The name reads the other way round; `expired_len() == 0` is the
    /// conventional emptiness check.
    pub fn expired_is_empty(&mut self) -> bool {
        self.sweep();
        !self.expired.is_empty()
    }

    /// Looks up an expired entry. Does not sweep.
    pub fn expired_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expired.get(key)
    }

    /// Removes an expired entry. Does not sweep.
    pub fn expired_remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expired.remove(key)
    }

    /// Drops every expired entry. Does not sweep.
    pub fn expired_clear(&mut self) {
        self.expired.clear();
    }

    // == Stats ==
    /// Returns a snapshot of the usage counters. Does not sweep.
    pub fn stats(&self) -> ExpiryStats {
        let mut stats = self.stats.clone();
        stats.set_entry_counts(self.live.len(), self.expired.len());
        stats
    }

    #[cfg(test)]
    pub(crate) fn expiration_index_len(&self) -> usize {
        self.expirations.len()
    }

    #[cfg(test)]
    pub(crate) fn inserted_at<Q>(&self, key: &Q) -> Option<Instant>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.expirations.get(key).copied()
    }

    // == Sweeping ==
    fn sweep(&mut self) {
        let now = self.clock.now();
        self.remove_all_expired(now);
    }

    /// An entry stamped at `inserted_at` is expired once `now - inserted_at >= ttl`.
    fn has_expired(ttl: Duration, now: Instant, inserted_at: Instant) -> bool {
        now.saturating_duration_since(inserted_at) >= ttl
    }

    /// Moves every expired live entry into the expired store and prunes the
    /// expiration index. Returns the number of entries moved.
    fn remove_all_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let live = &mut self.live;
        let expired = &mut self.expired;
        let mut moved = 0;

        self.expirations.retain(|key, inserted_at| {
            if !Self::has_expired(ttl, now, *inserted_at) {
                return true;
            }
            // A stale instant left by a point sweep has no live value behind it
            if let Some((key, value)) = live.remove_entry(key) {
                expired.insert(key, value);
                moved += 1;
            }
            false
        });

        self.stats.record_full_sweep(moved);
        if moved > 0 {
            debug!(moved, remaining = self.live.len(), "Swept expired entries");
        }
        moved
    }

    /// Moves `key` into the expired store if it has aged out. The instant in
    /// the expiration index is left for the next full sweep to prune.
    fn remove_if_expired<Q>(&mut self, key: &Q, now: Instant)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = match self.expirations.get(key) {
            Some(inserted_at) => Self::has_expired(self.ttl, now, *inserted_at),
            None => false,
        };
        if !expired {
            return;
        }
        if let Some((key, value)) = self.live.remove_entry(key) {
            self.expired.insert(key, value);
            self.stats.record_expiration();
            trace!("Moved single expired entry");
        }
    }
}

impl<K, V, C> ExpiringMap<K, V, C>
where
    K: Eq + Hash,
    V: PartialEq,
    C: Clock,
{
    // == Contains Value ==
    /// Sweeps, then returns true if any live entry holds `value`.
    pub fn contains_value(&mut self, value: &V) -> bool {
        self.sweep();
        self.live.values().any(|v| v == value)
    }
}

impl<K, V, C> Extend<(K, V)> for ExpiringMap<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ManualClock;

    const TTL: Duration = Duration::from_millis(100);

    fn manual_map() -> (ExpiringMap<String, i32, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let map = ExpiringMap::with_clock(TTL, clock.clone()).unwrap();
        (map, clock)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_map_new() {
        let mut map: ExpiringMap<String, i32> = ExpiringMap::new(TTL).unwrap();
        assert_eq!(map.ttl(), TTL);
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.expired_len(), 0);
    }

    #[test]
    fn test_map_rejects_zero_ttl() {
        let result: Result<ExpiringMap<String, i32>> = ExpiringMap::new(Duration::ZERO);
        assert!(matches!(result, Err(MapError::InvalidTtl(_))));
    }

    #[test]
    fn test_put_and_get() {
        let (mut map, _clock) = manual_map();

        assert_eq!(map.put("a".to_string(), 1), None);
        assert_eq!(map.get("a"), Some(&1));
        assert!(map.contains_key("a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_put_returns_previous_value() {
        let (mut map, _clock) = manual_map();

        map.put("a".to_string(), 1);
        assert_eq!(map.put("a".to_string(), 2), Some(1));
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_ttl_boundary() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);

        clock.advance(TTL - Duration::from_nanos(1));
        assert!(map.contains_key("a"));
        assert_eq!(map.get("a"), Some(&1));

        clock.advance(Duration::from_nanos(1));
        assert!(!map.contains_key("a"));
        assert_eq!(map.get("a"), None);
        assert_eq!(map.expired_get("a"), Some(&1));
    }

    #[test]
    fn test_scenario_expiry_after_ttl() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);

        clock.advance(ms(50));
        assert_eq!(map.get("a"), Some(&1));

        clock.advance(ms(100));
        assert_eq!(map.get("a"), None);
        assert_eq!(map.expired_get("a"), Some(&1));
        assert_eq!(map.len(), 0);
        assert_eq!(map.expired_len(), 1);
    }

    #[test]
    fn test_reinsertion_resets_ttl() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);

        clock.advance(ms(80));
        map.put("a".to_string(), 2);

        clock.advance(ms(70));
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.len(), 1);

        clock.advance(ms(30));
        assert_eq!(map.get("a"), None);
        assert_eq!(map.expired_get("a"), Some(&2));
    }

    #[test]
    fn test_full_sweep_moves_entries() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        clock.advance(ms(60));
        map.put("b".to_string(), 2);
        clock.advance(ms(50));

        assert_eq!(map.len(), 1);
        assert!(!map.keys().contains("a"));
        assert!(map.keys().contains("b"));
        assert!(map.expired_keys().contains("a"));
        assert_eq!(map.get("a"), None);
        assert_eq!(map.expired_get("a"), Some(&1));
    }

    #[test]
    fn test_remove_bypasses_expired_store() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);

        assert_eq!(map.remove("a"), Some(1));
        assert_eq!(map.remove("a"), None);

        clock.advance(ms(500));
        assert_eq!(map.expired_get("a"), None);
        assert_eq!(map.expired_len(), 0);
    }

    #[test]
    fn test_clear_keeps_expired_store() {
        let (mut map, clock) = manual_map();
        map.put("old".to_string(), 1);
        clock.advance(ms(100));
        assert_eq!(map.len(), 0);

        map.put("new".to_string(), 2);
        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.expired_get("old"), Some(&1));
        clock.advance(ms(500));
        assert_eq!(map.expired_len(), 1);
    }

    #[test]
    fn test_repeated_reads_agree() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        map.put("b".to_string(), 2);
        clock.advance(ms(100));

        assert_eq!(map.len(), map.len());
        assert_eq!(map.expired_len(), 2);
        assert_eq!(map.expired_len(), 2);
        assert_eq!(map.get("a"), None);
        assert_eq!(map.get("a"), None);
        assert_eq!(map.expired_get("a"), Some(&1));
    }

    #[test]
    fn test_point_sweep_leaves_stale_index_entry() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        clock.advance(ms(100));

        assert_eq!(map.get("a"), None);
        assert_eq!(map.expirations.len(), 1);
        assert_eq!(map.expired_get("a"), Some(&1));

        // Next full sweep prunes the index without touching the expired copy
        assert_eq!(map.len(), 0);
        assert!(map.expirations.is_empty());
        assert_eq!(map.expired_get("a"), Some(&1));
    }

    #[test]
    fn test_second_sweep_does_not_revive_or_clobber() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        clock.advance(ms(100));

        assert_eq!(map.get("a"), None);
        assert_eq!(map.expired_remove("a"), Some(1));

        // The stale instant is still expired, but there is nothing left to move
        assert_eq!(map.get("a"), None);
        assert!(!map.contains_key("a"));
        assert_eq!(map.expired_get("a"), None);
        assert_eq!(map.expired_len(), 0);
    }

    #[test]
    fn test_reput_after_point_sweep_is_not_reexpired() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        clock.advance(ms(100));
        assert_eq!(map.get("a"), None);

        map.put("a".to_string(), 2);
        clock.advance(ms(10));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.expired_get("a"), Some(&1));
    }

    #[test]
    fn test_later_expiry_overwrites_expired_copy() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        clock.advance(ms(100));
        assert_eq!(map.len(), 0);

        map.put("a".to_string(), 2);
        clock.advance(ms(100));
        assert_eq!(map.expired_len(), 1);
        assert_eq!(map.expired_get("a"), Some(&2));
    }

    #[test]
    fn test_expired_is_empty_is_inverted() {
        let (mut map, clock) = manual_map();
        assert!(!map.expired_is_empty());

        map.put("a".to_string(), 1);
        assert!(!map.expired_is_empty());

        clock.advance(ms(100));
        assert!(map.expired_is_empty());

        map.expired_clear();
        assert!(!map.expired_is_empty());
    }

    #[test]
    fn test_expired_get_does_not_sweep() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        clock.advance(ms(100));

        assert_eq!(map.expired_get("a"), None);
        assert_eq!(map.expired_remove("a"), None);
        map.expired_clear();

        assert_eq!(map.expired_values().len(), 1);
        assert_eq!(map.expired_get("a"), Some(&1));
    }

    #[test]
    fn test_contains_value() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        clock.advance(ms(60));
        map.put("b".to_string(), 2);

        assert!(map.contains_value(&1));
        assert!(map.contains_value(&2));
        assert!(!map.contains_value(&3));

        clock.advance(ms(40));
        assert!(!map.contains_value(&1));
        assert!(map.contains_value(&2));
        assert!(map.expired_values().contains(&1));
    }

    #[test]
    fn test_put_all_applies_in_order() {
        let (mut map, _clock) = manual_map();
        map.put_all(vec![
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("a".to_string(), 3),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));

        map.extend([("c".to_string(), 4)]);
        assert_eq!(map.get("c"), Some(&4));
    }

    #[test]
    fn test_entry_views() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        clock.advance(ms(50));
        map.put("b".to_string(), 2);
        clock.advance(ms(50));

        let entries = map.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get("b"), Some(&2));

        let values: Vec<i32> = map.values().iter().copied().collect();
        assert_eq!(values, vec![2]);

        let expired = map.expired_entries();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired.get("a"), Some(&1));
    }

    #[test]
    fn test_stats_tracking() {
        let (mut map, clock) = manual_map();
        map.put("a".to_string(), 1);
        map.put("b".to_string(), 2);

        map.get("a");
        map.get("missing");
        clock.advance(ms(100));
        map.get("a");
        map.len();

        let stats = map.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 2);
        assert_eq!(stats.full_sweeps, 1);
        assert_eq!(stats.live_entries, 0);
        assert_eq!(stats.expired_entries, 2);
    }

    #[test]
    fn test_expiry_near_clock_ceiling() {
        let (mut map, clock) = manual_map();
        clock.advance(Duration::from_nanos(u64::MAX) - Duration::from_secs(10));
        map.put("a".to_string(), 1);
        let before = clock.now();

        clock.advance(ms(500));
        assert!(clock.now() >= before);
        assert_eq!(map.get("a"), None);
        assert_eq!(map.expired_get("a"), Some(&1));

        map.put("b".to_string(), 2);
        clock.advance(Duration::from_secs(60));
        assert!(clock.now() >= before);
        assert_eq!(map.len(), 0);
        assert_eq!(map.expired_get("b"), Some(&2));
    }

    #[test]
    fn test_has_expired_boundary() {
        let now = Instant::now();
        let inserted_at = now - TTL;
        type Map = ExpiringMap<String, i32, ManualClock>;

        assert!(Map::has_expired(TTL, now, inserted_at));
        assert!(!Map::has_expired(TTL, now - Duration::from_nanos(1), inserted_at));
        // A stamp from the future never counts as expired
        assert!(!Map::has_expired(TTL, inserted_at, now));
    }

    #[test]
    fn test_real_clock_expiry() {
        let mut map = ExpiringMap::new(ms(20)).unwrap();
        map.put("a".to_string(), 1);
        assert_eq!(map.get("a"), Some(&1));

        std::thread::sleep(ms(40));

        assert_eq!(map.get("a"), None);
        assert_eq!(map.expired_get("a"), Some(&1));
    }
}
