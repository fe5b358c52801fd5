//! Thread-safe in-memory [`CacheStore`] for session-scoped memoization.

// self
use crate::{
	_prelude::*,
	cache::{CacheEntry, CacheStore, RequestSignature, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<RequestSignature, CacheEntry>>>;

/// Thread-safe storage backend that keeps entries in-process for the session's lifetime.
///
/// Cloned handles share the same map, so a handle retained by the hosting application observes
/// everything the client stores.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	fn save_now(
		map: StoreMap,
		signature: RequestSignature,
		entry: CacheEntry,
	) -> Result<(), StoreError> {
		map.write().insert(signature, entry);

		Ok(())
	}

	fn fetch_now(map: StoreMap, signature: RequestSignature) -> Option<CacheEntry> {
		map.read().get(&signature).cloned()
	}

	/// Number of entries currently held, expired entries included.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no entries are held.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl CacheStore for MemoryStore {
	fn save(&self, signature: RequestSignature, entry: CacheEntry) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, signature, entry) })
	}

	fn fetch<'a>(&'a self, signature: &'a RequestSignature) -> StoreFuture<'a, Option<CacheEntry>> {
		let map = self.0.clone();
		let signature = signature.to_owned();

		Box::pin(async move { Ok(Self::fetch_now(map, signature)) })
	}
}
