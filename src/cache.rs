//! Cache contracts and built-in TTL backends for issued access tokens.

pub mod file;
pub mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

// self
use crate::_prelude::*;

/// Boxed future returned by [`TokenCache`] methods.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// TTL key-value contract implemented by token cache backends.
///
/// Expiry is best effort: backends report expired entries as absent, and the client
/// tolerates stale or missing entries by re-fetching from the token endpoint.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Fetches the live value stored under `key`, treating expired entries as absent.
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>>;

	/// Stores `value` under `key`, expiring after `ttl`.
	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> CacheFuture<'a, ()>;

	/// Removes the entry under `key`, reporting whether a live entry existed.
	fn delete<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the cache store.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Stored value plus its expiry instant, shared by the built-in backends.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct CacheEntry {
	pub(crate) value: String,
	#[serde(with = "time::serde::timestamp")]
	pub(crate) expires_at: OffsetDateTime,
}
impl CacheEntry {
	pub(crate) fn new(value: String, ttl: Duration, now: OffsetDateTime) -> Self {
		Self { value, expires_at: now + ttl }
	}

	pub(crate) fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at <= now
	}
}
