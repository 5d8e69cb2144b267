//! Argument pool for reusing argument arrays across invocations.
//!
//! Every interpreted method call needs a scratch array sized to its argument
//! count. Arrays are bucketed by length; a released array keeps its capacity
//! and is handed to the next checkout of the same length.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::{EngineError, EngineResult};
use crate::vm::value::Value;

#[derive(Default)]
struct LeaseCounters {
    checked_out: AtomicUsize,
    released: AtomicUsize,
}

/// Checkout/release totals for one array length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Arrays handed out
    pub checked_out: usize,
    /// Arrays returned
    pub released: usize,
}

impl PoolStats {
    /// Arrays currently leased
    pub fn outstanding(&self) -> usize {
        self.checked_out.saturating_sub(self.released)
    }
}

/// Pool of reusable argument arrays keyed by length.
pub struct ArgumentPool {
    buckets: Mutex<FxHashMap<usize, Vec<Vec<Value>>>>,
    counters: DashMap<usize, LeaseCounters>,
    max_retained: usize,
}

impl ArgumentPool {
    /// Create a pool that keeps up to `max_retained` idle arrays per length.
    pub fn new(max_retained: usize) -> Self {
        Self {
            buckets: Mutex::new(FxHashMap::default()),
            counters: DashMap::new(),
            max_retained,
        }
    }

    /// Lease an array of `len` null values; it is released when the lease drops.
    pub fn checkout(&self, len: usize) -> ArgumentLease<'_> {
        let recycled = self.buckets.lock().get_mut(&len).and_then(Vec::pop);
        let values = recycled.unwrap_or_else(|| vec![Value::Null; len]);
        self.counters
            .entry(len)
            .or_default()
            .checked_out
            .fetch_add(1, Ordering::AcqRel);
        ArgumentLease {
            pool: self,
            values: Some(values),
        }
    }

    /// Return an array to the pool.
    ///
    /// Fails when no array of that length is outstanding.
    pub fn release(&self, mut values: Vec<Value>) -> EngineResult<()> {
        let len = values.len();
        let accepted = self.counters.get(&len).is_some_and(|counters| {
            let checked_out = counters.checked_out.load(Ordering::Acquire);
            counters
                .released
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |released| {
                    (released < checked_out).then_some(released + 1)
                })
                .is_ok()
        });
        if !accepted {
            return Err(EngineError::pool_integrity(format!(
                "released an argument array of length {} that was never checked out",
                len
            )));
        }

        values.iter_mut().for_each(|slot| *slot = Value::Null);
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(len).or_default();
        if bucket.len() < self.max_retained {
            bucket.push(values);
        }
        // else: drop, the bucket is full
        Ok(())
    }

    /// Checkout/release totals for arrays of `len`.
    pub fn stats(&self, len: usize) -> PoolStats {
        self.counters
            .get(&len)
            .map(|c| PoolStats {
                checked_out: c.checked_out.load(Ordering::Acquire),
                released: c.released.load(Ordering::Acquire),
            })
            .unwrap_or_default()
    }

    /// Arrays currently leased, across all lengths.
    pub fn outstanding(&self) -> usize {
        self.counters
            .iter()
            .map(|entry| {
                let checked_out = entry.checked_out.load(Ordering::Acquire);
                checked_out - entry.released.load(Ordering::Acquire).min(checked_out)
            })
            .sum()
    }
}

impl Default for ArgumentPool {
    fn default() -> Self {
        Self::new(16)
    }
}

/// Scoped lease of an argument array
///
/// Dropping the lease returns the array to its pool on every exit path.
pub struct ArgumentLease<'p> {
    pool: &'p ArgumentPool,
    values: Option<Vec<Value>>,
}

impl ArgumentLease<'_> {
    /// Take the array out of the lease without returning it
    ///
    /// The caller becomes responsible for calling [`ArgumentPool::release`].
    pub fn detach(mut self) -> Vec<Value> {
        self.values.take().unwrap_or_default()
    }
}

impl Deref for ArgumentLease<'_> {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        self.values.as_deref().unwrap_or(&[])
    }
}

impl DerefMut for ArgumentLease<'_> {
    fn deref_mut(&mut self) -> &mut [Value] {
        self.values.as_deref_mut().unwrap_or(&mut [])
    }
}

impl Drop for ArgumentLease<'_> {
    fn drop(&mut self) {
        if let Some(values) = self.values.take() {
            if let Err(err) = self.pool.release(values) {
                tracing::error!(%err, "argument array release failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_releases_on_drop() {
        let pool = ArgumentPool::new(4);
        {
            let mut args = pool.checkout(2);
            args[0] = Value::Int(1);
            args[1] = Value::Int(2);
            assert_eq!(pool.outstanding(), 1);
        }
        assert_eq!(pool.stats(2), PoolStats { checked_out: 1, released: 1 });
        assert_eq!(pool.outstanding(), 0);

        // Recycled arrays come back cleared
        let args = pool.checkout(2);
        assert!(args.iter().all(Value::is_null));
    }

    #[test]
    fn test_release_without_checkout_fails() {
        let pool = ArgumentPool::new(4);
        let err = pool.release(vec![Value::Null; 3]).unwrap_err();
        assert!(matches!(err, EngineError::PoolIntegrity { .. }));

        let lease = pool.checkout(3);
        let values = lease.detach();
        assert!(pool.release(values.clone()).is_ok());
        assert!(pool.release(values).is_err());
    }

    #[test]
    fn test_pool_max_retained() {
        let pool = ArgumentPool::new(1);
        let a = pool.checkout(1).detach();
        let b = pool.checkout(1).detach();
        pool.release(a).unwrap();
        pool.release(b).unwrap(); // bucket full, dropped
        assert_eq!(pool.buckets.lock()[&1].len(), 1);
    }

    #[test]
    fn test_zero_length() {
        let pool = ArgumentPool::default();
        let args = pool.checkout(0);
        assert!(args.is_empty());
        drop(args);
        assert_eq!(pool.stats(0).outstanding(), 0);
    }

    #[test]
    fn test_stats_snapshot_never_underflows() {
        // counters are loaded separately, so a snapshot can see the release first
        let stats = PoolStats {
            checked_out: 3,
            released: 4,
        };
        assert_eq!(stats.outstanding(), 0);
    }
}
