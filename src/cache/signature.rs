//! Stable cache keys for logical API calls.

// std
use std::{
	cmp::Ordering,
	hash::{Hash, Hasher},
	sync::OnceLock,
};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use serde::{Deserializer, Serializer, de::Error as DeError};
use sha2::{Digest, Sha256};
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Stable key identifying a logical API call by endpoint path and canonicalized query.
///
/// Query pairs are sorted by key then value and form-encoded, so two calls carrying the same
/// parameters in any order produce the same signature. The
/// [`fingerprint`](Self::fingerprint) helper lazily caches a base64 (no padding) SHA-256 digest
/// of the canonical string and the [`Hash`] implementation reuses that cache so hashing stays
/// stable without re-serializing the pairs.
pub struct RequestSignature {
	canonical: String,
	fingerprint_cache: OnceLock<String>,
}
impl RequestSignature {
	/// Canonicalizes an endpoint path and its query parameters.
	pub fn new(path: &str, params: &[(String, String)]) -> Self {
		let mut pairs = params.to_vec();

		pairs.sort();

		let mut serializer = form_urlencoded::Serializer::new(String::new());

		for (key, value) in &pairs {
			serializer.append_pair(key, value);
		}

		let query = serializer.finish();
		let canonical =
			if query.is_empty() { path.to_owned() } else { format!("{path}?{query}") };

		Self { canonical, fingerprint_cache: OnceLock::new() }
	}

	/// Returns the canonical `path?query` form.
	pub fn canonical(&self) -> &str {
		&self.canonical
	}

	/// Stable fingerprint derived from the canonical form.
	///
	/// The fingerprint is a base64 (no padding) encoding of the SHA-256 digest for the
	/// canonical string and is cached after the first calculation.
	pub fn fingerprint(&self) -> String {
		self.fingerprint_cache.get_or_init(|| compute_fingerprint(&self.canonical)).clone()
	}
}
impl Clone for RequestSignature {
	fn clone(&self) -> Self {
		Self { canonical: self.canonical.clone(), fingerprint_cache: OnceLock::new() }
	}
}
impl PartialEq for RequestSignature {
	fn eq(&self, other: &Self) -> bool {
		self.canonical == other.canonical
	}
}
impl Eq for RequestSignature {}
impl PartialOrd for RequestSignature {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl Ord for RequestSignature {
	fn cmp(&self, other: &Self) -> Ordering {
		self.canonical.cmp(&other.canonical)
	}
}
impl Hash for RequestSignature {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.fingerprint_cache.get_or_init(|| compute_fingerprint(&self.canonical)).hash(state);
	}
}
impl Debug for RequestSignature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("RequestSignature").field(&self.canonical).finish()
	}
}
impl Serialize for RequestSignature {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.canonical)
	}
}
impl<'de> Deserialize<'de> for RequestSignature {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let canonical = String::deserialize(deserializer)?;

		if canonical.is_empty() {
			return Err(DeError::custom("request signature cannot be empty"));
		}

		Ok(Self { canonical, fingerprint_cache: OnceLock::new() })
	}
}

fn compute_fingerprint(canonical: &str) -> String {
	let digest = Sha256::digest(canonical.as_bytes());

	STANDARD_NO_PAD.encode(digest)
}
