//! Transport primitives for token grants and authorized reads.
//!
//! The module exposes [`ApiTransport`] alongside the structured [`ApiRequest`] builder so
//! downstream crates can integrate custom HTTP stacks. Requests are assembled as data (method,
//! URL, headers, form body) and handed to the transport whole; no request line or header string
//! is ever concatenated by hand.

// std
use std::ops::Deref;
// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::TransportError};

/// HTTP methods issued by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// `GET`, used by every data endpoint.
	Get,
	/// `POST`, used by the token and revocation endpoints.
	Post,
}
impl Method {
	/// Returns the canonical method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Structured outbound request consumed by [`ApiTransport`] implementations.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Fully resolved request URL, query included.
	pub url: Url,
	/// Ordered header name/value pairs.
	pub headers: Vec<(String, String)>,
	/// Form-encoded body, when present.
	pub body: Option<String>,
}
impl ApiRequest {
	/// Starts a `GET` request against the provided URL.
	pub fn get(url: Url) -> Self {
		Self { method: Method::Get, url, headers: Vec::new(), body: None }
	}

	/// Starts a `POST` request against the provided URL.
	pub fn post(url: Url) -> Self {
		Self { method: Method::Post, url, headers: Vec::new(), body: None }
	}

	/// Appends a header pair.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets a form-encoded body and the matching `Content-Type` header.
	pub fn form_body(mut self, pairs: &[(&str, &str)]) -> Self {
		let mut serializer = form_urlencoded::Serializer::new(String::new());

		for (key, value) in pairs {
			serializer.append_pair(key, value);
		}

		self.body = Some(serializer.finish());

		self.header("Content-Type", "application/x-www-form-urlencoded;charset=UTF-8")
	}

	/// Returns the first header value matching the name, ignoring ASCII case.
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Response surfaced back to the dispatch layer.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Decodes the body as JSON, reporting the failing path on malformed input.
	pub fn json(&self) -> Result<Json, serde_path_to_error::Error<serde_json::Error>> {
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
	}
}

/// Extracts the first provider-reported error message from a decoded payload.
///
/// The provider signals application-level failures as `{"errors": [{"message": …}, …]}` with a
/// 2xx or error status alike, so callers check the decoded body rather than the status code.
pub fn provider_error_message(payload: &Json) -> Option<String> {
	payload
		.get("errors")?
		.as_array()?
		.first()?
		.get("message")?
		.as_str()
		.map(ToOwned::to_owned)
}

/// Boxed future returned by [`ApiTransport::dispatch`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing client requests.
///
/// The trait is the crate's only dependency on an HTTP implementation. Callers provide an
/// implementation (typically behind `Arc<T>` where `T: ApiTransport`) shared by the token
/// manager and the dispatcher. Implementations must be `Send + Sync + 'static` so one transport
/// can serve both without additional wrappers, and must only fail with [`TransportError`] when
/// no usable response was received; provider-reported failures travel in the response body.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes one request and returns the raw response.
	fn dispatch(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Callers needing bounded latency configure timeouts on the [`ReqwestClient`] they inject; the
/// crate imposes no deadline of its own.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn dispatch(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = match request.method {
				Method::Get => client.get(request.url),
				Method::Post => client.post(request.url),
			};

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}


#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn form_body_encodes_pairs_and_sets_content_type() {
		let url = Url::parse("https://api.twitter.com/oauth2/token")
			.expect("Token endpoint fixture should parse.");
		let request =
			ApiRequest::post(url).form_body(&[("grant_type", "client_credentials")]);

		assert_eq!(request.body.as_deref(), Some("grant_type=client_credentials"));
		assert_eq!(
			request.header_value("content-type"),
			Some("application/x-www-form-urlencoded;charset=UTF-8"),
		);
	}

	#[test]
	fn provider_error_message_reads_the_first_entry() {
		let payload: Json = serde_json::from_str(
			"{\"errors\":[{\"message\":\"Bad Authentication data\",\"code\":215}]}",
		)
		.expect("Error payload fixture should parse.");

		assert_eq!(provider_error_message(&payload), Some("Bad Authentication data".into()));
		assert_eq!(provider_error_message(&Json::Null), None);
	}

	#[test]
	fn malformed_bodies_report_a_decode_failure() {
		let response = ApiResponse { status: 200, body: b"<html>not json</html>".to_vec() };

		assert!(response.json().is_err());
	}
}
