use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Integer keys that can pick a bucket by `key mod bucket_count`.
pub trait ShardKey: Ord + Copy {
    fn bucket(&self, bucket_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {
        $(impl ShardKey for $t {
            #[inline]
            fn bucket(&self, bucket_count: usize) -> usize {
                (*self as u64 % bucket_count as u64) as usize
            }
        })*
    };
}

impl_shard_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Exclusive access to one accumulated value. The owning bucket stays locked
/// until this guard is dropped.
pub type Access<'a, V> = MappedMutexGuard<'a, V>;

/// Lock-striped ordered map: `bucket_count` independent `Mutex<BTreeMap>`s.
///
/// Writers to keys in different buckets never contend. There is no global
/// lock, so [`drain_to_ordered_map`](Self::drain_to_ordered_map) sees a
/// consistent picture only once every writer has finished.
pub struct ConcurrentAccumulator<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V> ConcurrentAccumulator<K, V> {
    pub fn new(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "bucket count must be positive");
        Self { buckets: (0..bucket_count).map(|_| Mutex::new(BTreeMap::new())).collect() }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        &self.buckets[key.bucket(self.buckets.len())]
    }

    /// Lock the bucket owning `key` and hand out its value, inserting
    /// `V::default()` on first access.
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        MutexGuard::map(self.bucket_of(key).lock(), |bucket| bucket.entry(key).or_default())
    }

    /// Remove `key` under its bucket lock.
    pub fn erase(&self, key: K) -> Option<V> {
        self.bucket_of(key).lock().remove(&key)
    }

    /// Move every bucket's contents out, one bucket lock at a time.
    pub fn drain_to_ordered_map(&self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for bucket in &self.buckets {
            result.append(&mut bucket.lock());
        }
        result
    }
}
