//! Memoization of calculator results.
//!
//! A [`Cache`] is owned by one [`crate::pipeline::Session`] and dropped with
//! it. Keys combine a function name with the canonical bytes of the
//! arguments written through [`CacheKey`], and compare by value.

use crate::Result;
use crate::models::{Algorithm, AlgorithmSelection};
use crate::quantity::Quantity;
use crate::types::{Location, SurfaceGeometry, TimeSeries};
use chrono::{DateTime, FixedOffset};
use lru::LruCache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

/// Arguments that can take part in a cache key.
///
/// Floats contribute their bit pattern, so `0.0` and `-0.0` are distinct
/// and every NaN payload is its own key.
pub trait CacheKey {
    /// Feeds a canonical representation of `self` into `state`.
    fn write_key<H: Hasher>(&self, state: &mut H);
}

impl CacheKey for f64 {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl CacheKey for bool {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl CacheKey for usize {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl CacheKey for str {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl CacheKey for DateTime<FixedOffset> {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.timestamp().hash(state);
        self.timestamp_subsec_nanos().hash(state);
        self.offset().local_minus_utc().hash(state);
    }
}

impl CacheKey for TimeSeries {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.as_slice().write_key(state);
    }
}

impl CacheKey for Location {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.longitude().write_key(state);
        self.latitude().write_key(state);
        self.elevation().write_key(state);
    }
}

impl CacheKey for SurfaceGeometry {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.orientation().write_key(state);
        self.tilt().write_key(state);
    }
}

impl CacheKey for Quantity {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl CacheKey for Algorithm {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl CacheKey for AlgorithmSelection {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl<T: CacheKey> CacheKey for [T] {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.write_key(state);
        }
    }
}

impl<T: CacheKey> CacheKey for Vec<T> {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.as_slice().write_key(state);
    }
}

impl<T: CacheKey> CacheKey for Option<T> {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        match self {
            Some(value) => {
                1u8.hash(state);
                value.write_key(state);
            }
            None => 0u8.hash(state),
        }
    }
}

impl<T: CacheKey + ?Sized> CacheKey for &T {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        (**self).write_key(state);
    }
}

macro_rules! tuple_cache_key {
    ($($name:ident),+) => {
        impl<$($name: CacheKey),+> CacheKey for ($($name,)+) {
            #[allow(non_snake_case)]
            fn write_key<H: Hasher>(&self, state: &mut H) {
                let ($($name,)+) = self;
                $($name.write_key(state);)+
            }
        }
    };
}

tuple_cache_key!(A);
tuple_cache_key!(A, B);
tuple_cache_key!(A, B, C);
tuple_cache_key!(A, B, C, D);
tuple_cache_key!(A, B, C, D, E);

/// Collects the bytes fed to a [`Hasher`] instead of mixing them.
#[derive(Debug, Default)]
struct CanonicalBytes(Vec<u8>);

impl Hasher for CanonicalBytes {
    fn write(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    fn finish(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        hasher.write(&self.0);
        hasher.finish()
    }
}

/// Key of one memoized call: function name and canonical arguments.
///
/// Equality compares the arguments byte for byte; the fingerprint only
/// selects the bucket.
#[derive(Debug, Clone)]
pub struct Key {
    function: &'static str,
    fingerprint: u64,
    arguments: Box<[u8]>,
}

impl Key {
    /// Builds the key of `function` called with `arguments`.
    #[must_use]
    pub fn new<A: CacheKey + ?Sized>(function: &'static str, arguments: &A) -> Self {
        let mut canonical = CanonicalBytes::default();
        arguments.write_key(&mut canonical);
        Self {
            function,
            fingerprint: canonical.finish(),
            arguments: canonical.0.into_boxed_slice(),
        }
    }

    /// Name of the memoized function.
    #[must_use]
    pub const fn function(&self) -> &'static str {
        self.function
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
            && self.function == other.function
            && self.arguments == other.arguments
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.function.hash(state);
        self.fingerprint.hash(state);
    }
}

/// Hit and miss counters of a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that ran the computation.
    pub misses: u64,
    /// Entries currently stored.
    pub entries: usize,
    /// Entries dropped to respect the capacity.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Memoization cache with an optional least-recently-used bound.
///
/// # Example
/// ```
/// use pvgis_core::cache::{Cache, Key};
///
/// let mut cache = Cache::bounded(2);
/// let square = |x: f64| -> pvgis_core::Result<f64> { Ok(x * x) };
/// let key = Key::new("square", &3.0);
/// assert_eq!(cache.get_or_try_insert_with(key.clone(), || square(3.0)).unwrap(), 9.0);
/// assert_eq!(cache.get_or_try_insert_with(key, || square(3.0)).unwrap(), 9.0);
/// assert_eq!(cache.stats().hits, 1);
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    // `None` when the capacity is zero
    entries: Option<LruCache<Key, V>>,
    capacity: Option<usize>,
    stats: CacheStats,
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<V> Cache<V> {
    /// Creates a cache without capacity limit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            entries: Some(LruCache::unbounded()),
            capacity: None,
            stats: CacheStats::default(),
        }
    }

    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero disables storage; every lookup is a miss.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
            capacity: Some(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Maximum number of entries, if bounded.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            ..self.stats
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is stored, without touching its recency or the counters.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.entries.as_ref().is_some_and(|entries| entries.contains(key))
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
        self.stats = CacheStats::default();
    }

    /// Stores `value` under `key`, evicting the least recently used entry
    /// when the cache is full.
    pub fn insert(&mut self, key: Key, value: V) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        if entries.contains(&key) {
            entries.put(key, value);
            return;
        }
        if let Some((evicted, _)) = entries.push(key, value) {
            self.stats.evictions += 1;
            tracing::trace!(function = evicted.function(), "evicted cache entry");
        }
    }
}

impl<V: Clone> Cache<V> {
    /// Looks up `key`, counting a hit or a miss and refreshing its recency.
    pub fn get(&mut self, key: &Key) -> Option<V> {
        let found = self
            .entries
            .as_mut()
            .and_then(|entries| entries.get(key))
            .cloned();
        if found.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        found
    }

    /// Returns the cached value for `key` or computes and stores it.
    ///
    /// # Errors
    /// Propagates the error of `compute`; nothing is stored in that case.
    pub fn get_or_try_insert_with<F>(&mut self, key: Key, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }
}

/// Wraps `function` into a closure memoized in `cache` under `name`.
///
/// # Example
/// ```
/// use pvgis_core::cache::{Cache, cached};
/// use std::cell::Cell;
///
/// let calls = Cell::new(0);
/// let mut cache = Cache::unbounded();
/// let mut double = cached(&mut cache, "double", |x: &f64| {
///     calls.set(calls.get() + 1);
///     Ok(x * 2.0)
/// });
/// assert_eq!(double(&2.0).unwrap(), 4.0);
/// assert_eq!(double(&2.0).unwrap(), 4.0);
/// assert_eq!(calls.get(), 1);
/// ```
pub fn cached<'c, A, V, F>(
    cache: &'c mut Cache<V>,
    name: &'static str,
    function: F,
) -> impl FnMut(&A) -> Result<V> + 'c
where
    A: CacheKey + ?Sized + 'c,
    V: Clone + 'c,
    F: Fn(&A) -> Result<V> + 'c,
{
    move |arguments: &A| {
        let key = Key::new(name, arguments);
        cache.get_or_try_insert_with(key, || function(arguments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::Cell;

    #[test]
    fn test_memoized_call_counter() {
        let calls = Cell::new(0);
        let mut cache = Cache::unbounded();
        {
            let mut square = cached(&mut cache, "square", |x: &f64| {
                calls.set(calls.get() + 1);
                Ok(x * x)
            });
            assert_eq!(square(&3.0).unwrap(), 9.0);
            assert_eq!(square(&3.0).unwrap(), 9.0);
            assert_eq!(square(&4.0).unwrap(), 16.0);
        }
        assert_eq!(calls.get(), 2);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 2, 2));
        assert!((stats.hit_ratio() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache: Cache<f64> = Cache::unbounded();
        let key = Key::new("fails", &1.0);
        let result = cache.get_or_try_insert_with(key.clone(), || {
            Err(Error::invalid_parameter("albedo", -1.0))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.get_or_try_insert_with(key, || Ok(2.0)).unwrap(), 2.0);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = Cache::bounded(2);
        let a = Key::new("f", &1.0);
        let b = Key::new("f", &2.0);
        let c = Key::new("f", &3.0);
        cache.insert(a.clone(), 1);
        cache.insert(b.clone(), 2);
        // touch `a` so that `b` becomes the least recently used
        assert_eq!(cache.get(&a), Some(1));
        cache.insert(c.clone(), 3);
        assert!(cache.contains(&a));
        assert!(!cache.contains(&b));
        assert!(cache.contains(&c));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = Cache::bounded(0);
        cache.insert(Key::new("f", &1.0), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_distinguish_arguments() {
        let timestamps =
            TimeSeries::new(vec!["2023-06-21T12:00:00Z".parse().unwrap()]).unwrap();
        let shifted =
            TimeSeries::new(vec!["2023-06-21T14:00:00+02:00".parse().unwrap()]).unwrap();
        let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
        assert_eq!(
            Key::new("zenith", &(&timestamps, &location)),
            Key::new("zenith", &(&timestamps, &location))
        );
        // same instant, different offset
        assert_ne!(
            Key::new("zenith", &(&timestamps, &location)),
            Key::new("zenith", &(&shifted, &location))
        );
        assert_ne!(Key::new("zenith", &0.0), Key::new("zenith", &-0.0));
        assert_ne!(Key::new("zenith", &1.0), Key::new("azimuth", &1.0));
    }

    #[test]
    fn test_equal_fingerprints_stay_distinct() {
        let colliding = |value: f64| Key {
            fingerprint: 42,
            ..Key::new("zenith", &value)
        };
        let (a, b) = (colliding(1.0), colliding(2.0));
        assert_ne!(a, b);

        let mut cache = Cache::unbounded();
        cache.insert(a.clone(), "first");
        cache.insert(b.clone(), "second");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&a), Some("first"));
        assert_eq!(cache.get(&b), Some("second"));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_replacing_a_value_is_not_an_eviction() {
        let mut cache = Cache::bounded(1);
        let key = Key::new("f", &1.0);
        cache.insert(key.clone(), 1);
        cache.insert(key.clone(), 2);
        assert_eq!(cache.get(&key), Some(2));
        assert_eq!(cache.stats().evictions, 0);
        cache.insert(Key::new("f", &2.0), 3);
        assert_eq!(cache.stats().evictions, 1);
        assert!(!cache.contains(&key));
    }
}
