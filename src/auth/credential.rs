//! Consumer credential modeling and Basic-Auth token derivation.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Application key/secret pair plus the Basic-Auth token derived from it.
///
/// The derived [`ConsumerToken`] is computed once at construction and never mutated; the key and
/// secret are kept only so the pair can be inspected for equality in tests and diagnostics, and
/// both are redacted from [`Debug`] output.
#[derive(Clone)]
pub struct ConsumerCredential {
	key: String,
	secret: String,
	consumer_token: ConsumerToken,
}
impl ConsumerCredential {
	/// Builds a credential pair and eagerly derives its [`ConsumerToken`].
	///
	/// Empty strings are accepted and encoded as-is; a wrong pair only surfaces later as a
	/// rejected grant.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
		let key = key.into();
		let secret = secret.into();
		let consumer_token = ConsumerToken::encode(&key, &secret);

		Self { key, secret, consumer_token }
	}

	/// Returns the derived Basic-Auth token.
	pub fn consumer_token(&self) -> &ConsumerToken {
		&self.consumer_token
	}
}
impl Debug for ConsumerCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConsumerCredential")
			.field("key", &"<redacted>")
			.field("secret", &"<redacted>")
			.finish()
	}
}
impl PartialEq for ConsumerCredential {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key && self.secret == other.secret
	}
}
impl Eq for ConsumerCredential {}

/// Basic-Auth credential presented to the token and revocation endpoints.
///
/// Derived as `base64(urlencode(key) + ":" + urlencode(secret))`, with both halves
/// percent-encoded under application/x-www-form-urlencoded rules (space becomes `+`).
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerToken(String);
impl ConsumerToken {
	/// Derives the token from a key/secret pair.
	///
	/// Pure and deterministic; there are no failure modes.
	pub fn encode(key: &str, secret: &str) -> Self {
		let encoded_key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
		let encoded_secret: String = form_urlencoded::byte_serialize(secret.as_bytes()).collect();

		Self(STANDARD.encode(format!("{encoded_key}:{encoded_secret}")))
	}

	/// Returns the raw token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the token as an `Authorization` header value.
	pub fn basic_header(&self) -> String {
		format!("Basic {}", self.0)
	}
}
impl Debug for ConsumerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ConsumerToken").field(&"<redacted>").finish()
	}
}
impl Display for ConsumerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use base64::{Engine as _, engine::general_purpose::STANDARD};
	// self
	use super::*;

	fn decoded(token: &ConsumerToken) -> String {
		let bytes =
			STANDARD.decode(token.expose()).expect("Consumer token should be valid base64.");

		String::from_utf8(bytes).expect("Decoded consumer token should be valid UTF-8.")
	}

	#[test]
	fn encode_is_deterministic() {
		let a = ConsumerToken::encode("xvz1evFS4wEEPTGEFPHBog", "L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg");
		let b = ConsumerToken::encode("xvz1evFS4wEEPTGEFPHBog", "L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg");

		assert_eq!(a, b);
		assert_eq!(
			decoded(&a),
			"xvz1evFS4wEEPTGEFPHBog:L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg",
		);
	}

	#[test]
	fn encode_percent_encodes_reserved_bytes() {
		let token = ConsumerToken::encode("key with spaces", "sec:ret@value");

		assert_eq!(decoded(&token), "key+with+spaces:sec%3Aret%40value");
	}

	#[test]
	fn encode_accepts_empty_credentials() {
		let token = ConsumerToken::encode("", "");

		assert_eq!(decoded(&token), ":");
	}

	#[test]
	fn credential_formatters_redact() {
		let credential = ConsumerCredential::new("key-material", "hunter2");

		assert!(!format!("{credential:?}").contains("hunter2"));
		assert_eq!(format!("{:?}", credential.consumer_token()), "ConsumerToken(\"<redacted>\")");
	}
}
