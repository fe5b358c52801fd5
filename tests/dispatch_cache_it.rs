// crates.io
use httpmock::prelude::*;
// self
use twitter_apponly::{
	_preludet::*,
	cache::{CacheEntry, CacheStore, RequestSignature},
	error::ApiError,
};

const GRANT_BODY: &str = "{\"token_type\":\"bearer\",\"access_token\":\"AAAA-integration\"}";

fn user_params(screen_name: &str) -> Vec<(String, String)> {
	vec![("screen_name".into(), screen_name.into())]
}

async fn start_provider() -> MockServer {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(GRANT_BODY);
		})
		.await;

	server
}

#[tokio::test]
async fn identical_calls_within_the_ttl_invoke_the_transport_once() {
	let server = start_provider().await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/1.1/users/show.json")
				.query_param("screen_name", "julienjoye")
				.header("authorization", "Bearer AAAA-integration");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":42,\"screen_name\":\"julienjoye\",\"followers_count\":1337}");
		})
		.await;
	let (client, _store) = connect_test_client(&server.base_url())
		.await
		.expect("Connection against the mock provider should succeed.");
	let params = user_params("julienjoye");
	let first = client
		.execute("/users/show.json", &params)
		.await
		.expect("First call should succeed.");
	let second = client
		.execute("/users/show.json", &params)
		.await
		.expect("Cached call should succeed.");

	assert_eq!(first, second);

	user_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn expired_entries_are_refetched() {
	let server = start_provider().await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/1.1/users/show.json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":42,\"screen_name\":\"julienjoye\"}");
		})
		.await;
	let (client, store) = connect_test_client(&server.base_url())
		.await
		.expect("Connection against the mock provider should succeed.");
	let params = user_params("julienjoye");
	let payload = client
		.execute("/users/show.json", &params)
		.await
		.expect("First call should succeed.");

	// Age the stored entry past its expiry instead of waiting out the TTL.
	let signature = RequestSignature::new("/users/show.json", &params);
	let expired = CacheEntry::new(payload, OffsetDateTime::now_utc() - Duration::seconds(1));

	store.save(signature, expired).await.expect("Seeding the expired entry should succeed.");

	client
		.execute("/users/show.json", &params)
		.await
		.expect("Call after expiry should succeed.");

	user_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_responses_are_not_cached() {
	let server = start_provider().await;
	let missing_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/1.1/users/show.json")
				.query_param("screen_name", "nosuchuser");
			then.status(404)
				.header("content-type", "application/json")
				.body("{\"errors\":[{\"message\":\"Sorry, that page does not exist\",\"code\":34}]}");
		})
		.await;
	let found_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/1.1/users/show.json")
				.query_param("screen_name", "julienjoye");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":42,\"screen_name\":\"julienjoye\"}");
		})
		.await;
	let (client, store) = connect_test_client(&server.base_url())
		.await
		.expect("Connection against the mock provider should succeed.");
	let error = client
		.execute("/users/show.json", &user_params("nosuchuser"))
		.await
		.expect_err("Provider rejection should surface.");

	match error {
		Error::Api(ApiError::Rejected { message }) =>
			assert_eq!(message, "Sorry, that page does not exist"),
		other => panic!("Expected a rejected call, got {other:?}."),
	}

	// The failure must not occupy the store; the corrected call goes upstream.
	assert!(store.is_empty());

	client
		.execute("/users/show.json", &user_params("julienjoye"))
		.await
		.expect("Corrected call should succeed.");

	missing_mock.assert_calls_async(1).await;
	found_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn transport_failures_surface_without_a_cache_write() {
	let server = start_provider().await;
	let (client, store) = connect_test_client(&server.base_url())
		.await
		.expect("Connection against the mock provider should succeed.");

	// No mock is registered for the data path, so the mock server answers 404 with a
	// non-JSON body, which the dispatcher reports as a decode failure.
	let error = client
		.execute("/users/show.json", &user_params("julienjoye"))
		.await
		.expect_err("Unmatched data calls should fail.");

	assert!(matches!(error, Error::Api(ApiError::Decode { .. })));
	assert!(store.is_empty());
}
