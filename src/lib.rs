//! Application-only OAuth 2.0 client for the Twitter REST API—bearer lifecycle, memoized reads,
//! and transport-aware failure mapping in one crate built for rate-limit-friendly integrations.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ConsumerCredential,
		cache::{CacheStore, MemoryStore},
		client::{Client, ClientConfig},
		http::ReqwestTransport,
		provider::ProviderDescriptor,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestTransport>;

	/// Builds a client config whose provider descriptor points at a mock server origin.
	pub fn test_config(origin: &str) -> ClientConfig {
		let origin = Url::parse(origin).expect("Failed to parse mock provider origin.");
		let descriptor =
			ProviderDescriptor::new(origin, "1.1").expect("Mock provider descriptor should be valid.");

		ClientConfig::new().with_descriptor(descriptor).with_user_agent("twitter-apponly tests")
	}

	/// Connects a [`Client`] backed by an in-memory cache store and the default reqwest transport
	/// against a mock provider origin.
	pub async fn connect_test_client(origin: &str) -> Result<(ReqwestTestClient, Arc<MemoryStore>)> {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CacheStore> = store_backend.clone();
		let credential = ConsumerCredential::new("test-consumer-key", "test-consumer-secret");
		let client = Client::connect_with_transport(
			credential,
			test_config(origin),
			store,
			ReqwestTransport::default(),
		)
		.await?;

		Ok((client, store_backend))
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as Json;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _, twitter_apponly as _};
