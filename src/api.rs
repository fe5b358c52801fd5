//! Thin endpoint wrappers over the memoized dispatch path.
//!
//! Wrappers only validate and normalize their own parameters before delegating to
//! [`Client::execute`]. The cache stores the raw decoded payload, so each wrapper performs its
//! own unwrap on every call, cache hits included.

// self
use crate::{_prelude::*, client::Client, error::ApiError, http::ApiTransport};

/// Result ordering requested from the search and timeline endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResultType {
	/// Most recent results first.
	#[default]
	Recent,
	/// Most popular results first.
	Popular,
	/// A mix of recent and popular results.
	Mixed,
}
impl ResultType {
	/// Returns the provider's parameter token.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResultType::Recent => "recent",
			ResultType::Popular => "popular",
			ResultType::Mixed => "mixed",
		}
	}
}
impl Display for ResultType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Tunable parameters shared by the search and timeline endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadOptions {
	/// Result ordering.
	pub result_type: ResultType,
	/// Maximum number of statuses returned.
	pub count: u32,
	/// Whether entity metadata is included with each status.
	pub include_entities: bool,
}
impl ReadOptions {
	/// Builds the default options: recent results, five statuses, entities included.
	pub fn new() -> Self {
		Self { result_type: ResultType::Recent, count: 5, include_entities: true }
	}

	/// Overrides the result ordering.
	pub fn with_result_type(mut self, result_type: ResultType) -> Self {
		self.result_type = result_type;

		self
	}

	/// Overrides the status count.
	pub fn with_count(mut self, count: u32) -> Self {
		self.count = count;

		self
	}

	/// Overrides whether entity metadata is included.
	pub fn with_entities(mut self, include_entities: bool) -> Self {
		self.include_entities = include_entities;

		self
	}
}
impl Default for ReadOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl<C> Client<C>
where
	C: ?Sized + ApiTransport,
{
	/// Searches tweets for a free-text term and returns the matched statuses.
	pub async fn search(&self, query: &str, options: &ReadOptions) -> Result<Vec<Json>> {
		let params = vec![
			("q".into(), query.into()),
			("result_type".into(), options.result_type.to_string()),
			("count".into(), options.count.to_string()),
			("include_entities".into(), options.include_entities.to_string()),
		];
		let payload = self.execute("/search/tweets.json", &params).await?;
		let statuses = payload
			.get("statuses")
			.and_then(Json::as_array)
			.ok_or(ApiError::UnexpectedShape { expected: "statuses array" })?;

		Ok(statuses.clone())
	}

	/// Returns the most recent statuses posted by an account.
	///
	/// A leading `@` on the screen name is stripped before the request is formed.
	pub async fn account_statuses(
		&self,
		screen_name: &str,
		options: &ReadOptions,
	) -> Result<Vec<Json>> {
		let params = vec![
			("screen_name".into(), normalize_screen_name(screen_name).into()),
			("count".into(), options.count.to_string()),
			("result_type".into(), options.result_type.to_string()),
			("include_entities".into(), options.include_entities.to_string()),
		];
		let payload = self.execute("/statuses/user_timeline.json", &params).await?;
		let statuses =
			payload.as_array().ok_or(ApiError::UnexpectedShape { expected: "status array" })?;

		Ok(statuses.clone())
	}

	/// Returns profile information (follower counts, description, ...) for an account.
	///
	/// A leading `@` on the screen name is stripped before the request is formed, so `@name`
	/// and `name` share one cache entry.
	pub async fn account_info(&self, screen_name: &str) -> Result<Json> {
		let params = vec![("screen_name".into(), normalize_screen_name(screen_name).into())];

		self.execute("/users/show.json", &params).await
	}
}

fn normalize_screen_name(screen_name: &str) -> &str {
	screen_name.trim_start_matches('@')
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		auth::ConsumerCredential,
		cache::MemoryStore,
		client::ClientConfig,
		error::Error,
		http::testing::ScriptedTransport,
	};

	const GRANT_BODY: &str = "{\"token_type\":\"bearer\",\"access_token\":\"AAAA-test-token\"}";

	async fn connect(transport: Arc<ScriptedTransport>) -> Client<ScriptedTransport> {
		transport.push_json(200, GRANT_BODY);

		Client::connect_with_transport(
			ConsumerCredential::new("test-key", "test-secret"),
			ClientConfig::new(),
			Arc::new(MemoryStore::default()),
			transport,
		)
		.await
		.expect("Scripted grant should succeed.")
	}

	fn query_pairs(transport: &ScriptedTransport, index: usize) -> Vec<(String, String)> {
		transport
			.request(index)
			.url
			.query_pairs()
			.map(|(key, value)| (key.into_owned(), value.into_owned()))
			.collect()
	}

	#[tokio::test]
	async fn search_applies_defaults_and_unwraps_statuses() {
		let transport = Arc::new(ScriptedTransport::new());
		let client = connect(transport.clone()).await;

		transport.push_json(200, "{\"statuses\":[{\"id\":1},{\"id\":2}]}");

		let statuses = client
			.search("high tech", &ReadOptions::new())
			.await
			.expect("Search should succeed.");

		assert_eq!(statuses, vec![json!({"id": 1}), json!({"id": 2})]);
		assert_eq!(
			query_pairs(&transport, 1),
			vec![
				("q".to_owned(), "high tech".to_owned()),
				("result_type".to_owned(), "recent".to_owned()),
				("count".to_owned(), "5".to_owned()),
				("include_entities".to_owned(), "true".to_owned()),
			],
		);
	}

	#[tokio::test]
	async fn search_rejects_payloads_without_statuses() {
		let transport = Arc::new(ScriptedTransport::new());
		let client = connect(transport.clone()).await;

		transport.push_json(200, "{\"unexpected\":true}");

		let error = client
			.search("rustlang", &ReadOptions::new())
			.await
			.expect_err("Statusless payloads should fail.");

		assert!(matches!(error, Error::Api(ApiError::UnexpectedShape { .. })));
	}

	#[tokio::test]
	async fn account_statuses_expects_a_top_level_array() {
		let transport = Arc::new(ScriptedTransport::new());
		let client = connect(transport.clone()).await;

		transport.push_json(200, "[{\"id\":1},{\"id\":2}]");

		let statuses = client
			.account_statuses("julienjoye", &ReadOptions::new().with_count(2))
			.await
			.expect("Timeline read should succeed.");

		assert_eq!(statuses.len(), 2);
		assert_eq!(
			query_pairs(&transport, 1),
			vec![
				("screen_name".to_owned(), "julienjoye".to_owned()),
				("count".to_owned(), "2".to_owned()),
				("result_type".to_owned(), "recent".to_owned()),
				("include_entities".to_owned(), "true".to_owned()),
			],
		);
	}

	#[tokio::test]
	async fn screen_names_normalize_to_one_signature_and_parameter() {
		let transport = Arc::new(ScriptedTransport::new());
		let client = connect(transport.clone()).await;

		transport.push_json(200, "{\"id\":42,\"screen_name\":\"julienjoye\"}");

		let with_at =
			client.account_info("@julienjoye").await.expect("Prefixed lookup should succeed.");
		let without_at =
			client.account_info("julienjoye").await.expect("Bare lookup should succeed.");

		assert_eq!(with_at, without_at);
		// One grant plus one read; the second spelling was served from cache.
		assert_eq!(transport.calls(), 2);
		assert_eq!(
			query_pairs(&transport, 1),
			vec![("screen_name".to_owned(), "julienjoye".to_owned())],
		);
	}
}
