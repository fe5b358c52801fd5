//! Bearer token material and its redaction wrapper.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer credential issued by the client-credentials grant.
///
/// The sole live credential used for authorized reads. At most one exists per
/// [`TokenManager`](crate::auth::TokenManager) instance; it is destroyed (invalidated
/// server-side) exactly once, at teardown.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
	/// Access token secret; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Instant the grant completed, recorded from the local clock.
	pub acquired_at: OffsetDateTime,
}
impl BearerToken {
	/// Wraps an access token returned by a successful grant.
	pub fn new(value: impl Into<String>, acquired_at: OffsetDateTime) -> Self {
		Self { secret: TokenSecret::new(value), acquired_at }
	}

	/// Formats the token as an `Authorization` header value.
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerToken")
			.field("secret", &"<redacted>")
			.field("acquired_at", &self.acquired_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn bearer_formats_the_authorization_header() {
		let token = BearerToken::new("AAAA%2FAAA", macros::datetime!(2025-01-01 00:00 UTC));

		assert_eq!(token.authorization_header(), "Bearer AAAA%2FAAA");
		assert!(!format!("{token:?}").contains("AAAA"));
	}
}
