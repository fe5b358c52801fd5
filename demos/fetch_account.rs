//! Demonstrates connecting against a mock provider, reading account information through the
//! memoized dispatch path, and tearing the bearer token down explicitly.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use twitter_apponly::{
	client::{Client, ClientConfig},
	provider::ProviderDescriptor,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token").body("grant_type=client_credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token_type\":\"bearer\",\"access_token\":\"demo-bearer\"}");
		})
		.await;
	let account_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/1.1/users/show.json")
				.query_param("screen_name", "julienjoye");
			then.status(200).header("content-type", "application/json").body(
				"{\"name\":\"Julien Joye\",\"followers_count\":1337,\"statuses_count\":42}",
			);
		})
		.await;
	let descriptor = ProviderDescriptor::new(Url::parse(&server.base_url())?, "1.1")?;
	let config = ClientConfig::new()
		.with_descriptor(descriptor)
		.with_user_agent("twitter-apponly demo");
	let client =
		Client::connect_with_config("demo-consumer-key", "demo-consumer-secret", config).await?;
	let account = client.account_info("@julienjoye").await?;
	let cached = client.account_info("julienjoye").await?;

	assert_eq!(account, cached);

	println!(
		"{} has {} followers and tweeted {} times.",
		account["name"], account["followers_count"], account["statuses_count"],
	);

	client.close().await;

	token_mock.assert_async().await;
	// A single upstream call served both spellings; the second came from the cache.
	account_mock.assert_async().await;

	Ok(())
}
