//! Thread-safe in-memory [`TokenCache`] with lazy TTL eviction.

// self
use crate::{
	_prelude::*,
	cache::{CacheEntry, CacheFuture, TokenCache},
};

type CacheMap = Arc<RwLock<HashMap<String, CacheEntry>>>;

/// In-process TTL cache suitable for single-process deployments and tests.
///
/// Expired entries are evicted lazily: a lookup that finds a dead entry removes it
/// and reports a miss.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	fn get_now(map: CacheMap, key: String) -> Option<String> {
		let now = OffsetDateTime::now_utc();

		{
			let guard = map.read();

			match guard.get(&key) {
				Some(entry) if !entry.is_expired_at(now) => return Some(entry.value.clone()),
				None => return None,
				Some(_) => {},
			}
		}

		map.write().remove(&key);

		None
	}

	fn set_now(map: CacheMap, key: String, value: String, ttl: Duration) {
		map.write().insert(key, CacheEntry::new(value, ttl, OffsetDateTime::now_utc()));
	}

	fn delete_now(map: CacheMap, key: String) -> bool {
		let now = OffsetDateTime::now_utc();

		match map.write().remove(&key) {
			Some(entry) => !entry.is_expired_at(now),
			None => false,
		}
	}

	/// Returns the remaining lifetime of the live entry under `key`, if any.
	pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
		let now = OffsetDateTime::now_utc();

		self.0
			.read()
			.get(key)
			.filter(|entry| !entry.is_expired_at(now))
			.map(|entry| entry.expires_at - now)
	}
}
impl TokenCache for MemoryCache {
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::get_now(map, key)) })
	}

	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> CacheFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();
		let value = value.to_owned();

		Box::pin(async move {
			Self::set_now(map, key, value, ttl);

			Ok(())
		})
	}

	fn delete<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::delete_now(map, key)) })
	}
}
