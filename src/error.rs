//! Client-wide error types shared across auth, caching, and dispatch.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// The taxonomy keys recoverability off the phase that failed: [`AuthError`] is raised while
/// acquiring the bearer token and leaves the client unusable, [`ApiError`] is raised by a single
/// read and leaves the client intact, [`ConfigError`] reports local misconfiguration or misuse.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Grant-time failure; the client could not be constructed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Per-call failure; the caller may retry, degrade, or surface it.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Local configuration or usage problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Failures raised while acquiring the bearer token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// No usable response was received from the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Provider answered the grant with an application-level error payload.
	#[error("Token endpoint rejected the grant: {message}.")]
	Rejected {
		/// Provider-supplied message, passed through verbatim.
		message: String,
	},
	/// Token endpoint responded with a body that could not be decoded as JSON.
	#[error("Token endpoint returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Decoded grant response carried neither an error payload nor an access token.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
}

/// Failures raised by a single authorized read.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// No usable response was received from the data endpoint.
	#[error("Network error occurred while calling the API endpoint.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Provider answered with an application-level error payload.
	#[error("API endpoint rejected the request: {message}.")]
	Rejected {
		/// Provider-supplied message from the first reported error, passed through verbatim.
		message: String,
	},
	/// Data endpoint responded with a body that could not be decoded as JSON.
	#[error("API endpoint returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Decoded payload did not carry the shape the endpoint documents.
	#[error("API response did not match the expected {expected} shape.")]
	UnexpectedShape {
		/// Human-readable label for the missing shape.
		expected: &'static str,
	},
}

/// Configuration and usage failures raised locally, without touching the network.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// A read was attempted without an active bearer token.
	#[error("Bearer token is not active.")]
	BearerUnavailable,
	/// A second grant was attempted on a manager that already left its initial state.
	#[error("Bearer token acquisition already ran for this manager.")]
	RepeatedGrant,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred during the HTTP exchange.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during the HTTP exchange.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
