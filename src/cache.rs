//! Memoization contracts and built-in stores for decoded API responses.
//!
//! The provider enforces rate limits, so identical queries issued within a short window must
//! not count against the quota. Entries expire lazily; correctness only requires that a dead
//! entry is never returned, not that it is promptly reclaimed.

pub mod memory;
pub mod signature;

pub use memory::MemoryStore;
pub use signature::RequestSignature;

// self
use crate::{_prelude::*, obs};

/// Boxed future returned by [`CacheStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for memoized response payloads.
///
/// Backends are injected at client construction and scoped by the hosting application (an
/// in-memory map, an external cache, etc.); the crate never reaches for an ambient store.
pub trait CacheStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the entry stored under the signature (last-write-wins).
	fn save(&self, signature: RequestSignature, entry: CacheEntry) -> StoreFuture<'_, ()>;

	/// Fetches the entry stored under the signature, if present, expired or not.
	fn fetch<'a>(&'a self, signature: &'a RequestSignature) -> StoreFuture<'a, Option<CacheEntry>>;
}

/// Error type produced by [`CacheStore`] implementations.
///
/// Store failures never escalate past [`ResponseCache`]; an unavailable backend degrades to
/// always-miss.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Memoized response payload with its expiry instant.
///
/// Read-only after creation; considered logically deleted once the current instant reaches
/// `expires_at`, and physically replaced by the next write to the same signature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
	/// Raw decoded response payload.
	pub payload: Json,
	/// Instant the entry stops being served.
	pub expires_at: OffsetDateTime,
}
impl CacheEntry {
	/// Builds an entry expiring at the provided instant.
	pub fn new(payload: Json, expires_at: OffsetDateTime) -> Self {
		Self { payload, expires_at }
	}

	/// Returns `true` while the entry may still be served at the provided instant.
	pub fn is_live_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}
}

/// Expiry-aware wrapper that turns a raw [`CacheStore`] into the read path used by dispatch.
pub struct ResponseCache {
	store: Arc<dyn CacheStore>,
	ttl: Duration,
}
impl ResponseCache {
	/// TTL applied uniformly to every entry unless overridden.
	pub const DEFAULT_TTL: Duration = Duration::seconds(300);

	/// Wraps a store with the default TTL.
	pub fn new(store: Arc<dyn CacheStore>) -> Self {
		Self { store, ttl: Self::DEFAULT_TTL }
	}

	/// Overrides the uniform TTL (negative values clamp to zero).
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = if ttl.is_negative() { Duration::ZERO } else { ttl };

		self
	}

	/// Returns the uniform TTL.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Returns the live payload stored under the signature, if any.
	///
	/// Dead entries are treated as absent (lazy expiry, no background sweep) and store failures
	/// degrade to a miss.
	pub async fn lookup(
		&self,
		signature: &RequestSignature,
		now: OffsetDateTime,
	) -> Option<Json> {
		match self.store.fetch(signature).await {
			Ok(entry) => entry.filter(|entry| entry.is_live_at(now)).map(|entry| entry.payload),
			Err(error) => {
				obs::warn_best_effort("cache_fetch", &error);

				None
			},
		}
	}

	/// Stores a payload under the signature, stamped to expire one TTL from `now`.
	///
	/// Store failures are swallowed; the next identical call simply misses.
	pub async fn record(&self, signature: RequestSignature, payload: Json, now: OffsetDateTime) {
		let entry = CacheEntry::new(payload, now + self.ttl);

		if let Err(error) = self.store.save(signature, entry).await {
			obs::warn_best_effort("cache_save", &error);
		}
	}
}
impl Debug for ResponseCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResponseCache").field("ttl", &self.ttl).finish()
	}
}
