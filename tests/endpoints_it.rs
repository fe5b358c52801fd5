// crates.io
use httpmock::prelude::*;
// self
use twitter_apponly::{_preludet::*, api::ReadOptions};

const GRANT_BODY: &str = "{\"token_type\":\"bearer\",\"access_token\":\"AAAA-integration\"}";

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
async fn search_sends_defaults_and_unwraps_statuses() {
	let server = start_provider().await;
	let search_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/1.1/search/tweets.json")
				.query_param("q", "high tech")
				.query_param("result_type", "recent")
				.query_param("count", "5")
				.query_param("include_entities", "true");
			then.status(200).header("content-type", "application/json").body(
				"{\"search_metadata\":{\"count\":2},\"statuses\":[{\"id\":1},{\"id\":2}]}",
			);
		})
		.await;
	let (client, _store) = connect_test_client(&server.base_url())
		.await
		.expect("Connection against the mock provider should succeed.");
	let statuses = client
		.search("high tech", &ReadOptions::new())
		.await
		.expect("Search should succeed.");

	assert_eq!(statuses.len(), 2);

	// The second identical search is a cache hit, unwrapped again from the raw payload.
	let cached = client
		.search("high tech", &ReadOptions::new())
		.await
		.expect("Cached search should succeed.");

	assert_eq!(statuses, cached);

	search_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn account_statuses_reads_the_user_timeline() {
	let server = start_provider().await;
	let timeline_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/1.1/statuses/user_timeline.json")
				.query_param("screen_name", "julienjoye")
				.query_param("count", "2");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":1,\"text\":\"first\"},{\"id\":2,\"text\":\"second\"}]");
		})
		.await;
	let (client, _store) = connect_test_client(&server.base_url())
		.await
		.expect("Connection against the mock provider should succeed.");
	let statuses = client
		.account_statuses("@julienjoye", &ReadOptions::new().with_count(2))
		.await
		.expect("Timeline read should succeed.");

	assert_eq!(statuses.len(), 2);
	assert_eq!(statuses[0]["text"], "first");

	timeline_mock.assert_async().await;
}

#[tokio::test]
async fn screen_name_spellings_share_one_upstream_call() {
	let server = start_provider().await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/1.1/users/show.json")
				.query_param("screen_name", "julienjoye");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":42,\"screen_name\":\"julienjoye\",\"followers_count\":1337}");
		})
		.await;
	let (client, _store) = connect_test_client(&server.base_url())
		.await
		.expect("Connection against the mock provider should succeed.");
	let with_at =
		client.account_info("@julienjoye").await.expect("Prefixed lookup should succeed.");
	let without_at =
		client.account_info("julienjoye").await.expect("Bare lookup should succeed.");

	assert_eq!(with_at, without_at);
	assert_eq!(with_at["followers_count"], 1337);

	user_mock.assert_calls_async(1).await;
}
