//! Provider endpoint layout for the hosted REST API family.

// self
use crate::_prelude::*;

/// Describes where the provider's token, revocation, and data endpoints live.
///
/// The grant and revocation endpoints hang directly off the origin; data endpoints are prefixed
/// with the API version segment. Local mock servers are supported by pointing the origin at a
/// plain-HTTP address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
	origin: Url,
	api_version: String,
}
impl ProviderDescriptor {
	const INVALIDATE_PATH: &'static str = "/oauth2/invalidate_token";
	const TOKEN_PATH: &'static str = "/oauth2/token";

	/// Descriptor for the hosted Twitter REST API (`https://api.twitter.com`, version `1.1`).
	pub fn twitter() -> Self {
		let origin =
			Url::parse("https://api.twitter.com").expect("Static provider origin should parse.");

		Self { origin, api_version: "1.1".into() }
	}

	/// Validates and builds a descriptor from an origin URL and version segment.
	pub fn new(
		origin: Url,
		api_version: impl Into<String>,
	) -> Result<Self, ProviderDescriptorError> {
		let api_version = api_version.into();

		if !matches!(origin.scheme(), "http" | "https") {
			return Err(ProviderDescriptorError::UnsupportedScheme {
				scheme: origin.scheme().to_owned(),
			});
		}
		if origin.host_str().is_none() {
			return Err(ProviderDescriptorError::MissingHost);
		}
		if origin.path() != "/" || origin.query().is_some() || origin.fragment().is_some() {
			return Err(ProviderDescriptorError::OriginNotBare);
		}
		if api_version.is_empty() || api_version.contains('/') {
			return Err(ProviderDescriptorError::InvalidVersion { version: api_version });
		}

		Ok(Self { origin, api_version })
	}

	/// Returns the origin the API family is served from.
	pub fn origin(&self) -> &Url {
		&self.origin
	}

	/// Returns the version segment prefixed to every data endpoint path.
	pub fn api_version(&self) -> &str {
		&self.api_version
	}

	/// URL of the client-credentials grant endpoint.
	pub fn token_endpoint(&self) -> Url {
		self.endpoint(Self::TOKEN_PATH)
	}

	/// URL of the bearer revocation endpoint.
	pub fn invalidate_endpoint(&self) -> Url {
		self.endpoint(Self::INVALIDATE_PATH)
	}

	/// URL of a versioned data endpoint; `path` must start with `/`.
	pub fn data_endpoint(&self, path: &str) -> Url {
		self.endpoint(&format!("/{}{path}", self.api_version))
	}

	fn endpoint(&self, path: &str) -> Url {
		let mut url = self.origin.clone();

		url.set_path(path);

		url
	}
}
impl Default for ProviderDescriptor {
	fn default() -> Self {
		Self::twitter()
	}
}

/// Validation failures raised while building a [`ProviderDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Origin URL uses a scheme other than http or https.
	#[error("Origin URL must use the http or https scheme, not {scheme}.")]
	UnsupportedScheme {
		/// The offending scheme.
		scheme: String,
	},
	/// Origin URL carries no host.
	#[error("Origin URL must carry a host.")]
	MissingHost,
	/// Origin URL carries a path, query, or fragment.
	#[error("Origin URL cannot carry a path, query, or fragment.")]
	OriginNotBare,
	/// Version segment is empty or contains a separator.
	#[error("API version segment is invalid: {version:?}.")]
	InvalidVersion {
		/// The offending version string.
		version: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn twitter_descriptor_builds_documented_endpoints() {
		let descriptor = ProviderDescriptor::twitter();

		assert_eq!(descriptor.token_endpoint().as_str(), "https://api.twitter.com/oauth2/token");
		assert_eq!(
			descriptor.invalidate_endpoint().as_str(),
			"https://api.twitter.com/oauth2/invalidate_token",
		);
		assert_eq!(
			descriptor.data_endpoint("/search/tweets.json").as_str(),
			"https://api.twitter.com/1.1/search/tweets.json",
		);
	}

	#[test]
	fn descriptor_rejects_invalid_origins() {
		let origin = Url::parse("ftp://example.com").expect("Fixture URL should parse.");

		assert!(matches!(
			ProviderDescriptor::new(origin, "1.1"),
			Err(ProviderDescriptorError::UnsupportedScheme { .. }),
		));

		let origin = Url::parse("https://example.com/api").expect("Fixture URL should parse.");

		assert!(matches!(
			ProviderDescriptor::new(origin, "1.1"),
			Err(ProviderDescriptorError::OriginNotBare),
		));

		let origin = Url::parse("https://example.com").expect("Fixture URL should parse.");

		assert!(matches!(
			ProviderDescriptor::new(origin, "1.1/extra"),
			Err(ProviderDescriptorError::InvalidVersion { .. }),
		));
	}

	#[test]
	fn descriptor_accepts_plain_http_for_local_mocks() {
		let origin = Url::parse("http://127.0.0.1:8080").expect("Fixture URL should parse.");
		let descriptor = ProviderDescriptor::new(origin, "1.1")
			.expect("Plain-HTTP origins should be accepted for mock servers.");

		assert_eq!(
			descriptor.data_endpoint("/users/show.json").as_str(),
			"http://127.0.0.1:8080/1.1/users/show.json",
		);
	}
}
