//! Authenticated client construction and the memoized dispatch path.
//!
//! Construction is a fallible factory rather than a throwing constructor: the bearer grant runs
//! to completion before a [`Client`] value exists, so a partially authenticated client can never
//! leak. Teardown is an explicit [`close`](Client::close) contract; relying on nondeterministic
//! finalization to fire a network request is not supported.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredential, TokenManager},
	cache::{CacheStore, RequestSignature, ResponseCache},
	error::ApiError,
	http::{self, ApiRequest, ApiTransport},
	obs::{self, CacheLookup, CallKind, CallOutcome, CallSpan},
	provider::ProviderDescriptor,
};
#[cfg(feature = "reqwest")]
use crate::{cache::MemoryStore, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = Client<ReqwestTransport>;

/// Construction parameters for [`Client`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Provider endpoint layout.
	pub descriptor: ProviderDescriptor,
	/// `User-Agent` value sent with every request.
	pub user_agent: String,
	/// Uniform TTL applied to memoized responses.
	pub cache_ttl: Duration,
}
impl ClientConfig {
	/// `User-Agent` used when the caller does not override it.
	pub const DEFAULT_USER_AGENT: &'static str = "Twitter Application-only OAuth App v.1";

	/// Builds the default configuration: hosted Twitter API, default user agent, default TTL.
	pub fn new() -> Self {
		Self {
			descriptor: ProviderDescriptor::twitter(),
			user_agent: Self::DEFAULT_USER_AGENT.into(),
			cache_ttl: ResponseCache::DEFAULT_TTL,
		}
	}

	/// Overrides the provider descriptor.
	pub fn with_descriptor(mut self, descriptor: ProviderDescriptor) -> Self {
		self.descriptor = descriptor;

		self
	}

	/// Overrides the `User-Agent` value.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Overrides the memoization TTL.
	pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
		self.cache_ttl = ttl;

		self
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self::new()
	}
}

/// Authenticated API client composing the token manager (for auth headers) and the response
/// cache (for memoization).
///
/// The client owns the transport, token manager, cache, and per-signature singleflight guards
/// so the read path can focus on the dispatch algorithm. Every logical call blocks until it
/// resolves; concurrent identical calls piggy-back on one in-flight fetch instead of stampeding
/// the provider.
pub struct Client<C>
where
	C: ?Sized + ApiTransport,
{
	transport: Arc<C>,
	token_manager: TokenManager<C>,
	cache: ResponseCache,
	descriptor: ProviderDescriptor,
	user_agent: String,
	call_guards: Mutex<HashMap<RequestSignature, Arc<AsyncMutex<()>>>>,
}
impl<C> Client<C>
where
	C: ?Sized + ApiTransport,
{
	/// Connects over a caller-provided transport and cache backend.
	///
	/// Acquires the bearer token synchronously; the returned client is ready for reads only on
	/// success, and any grant failure surfaces here as an [`AuthError`](crate::error::AuthError).
	pub async fn connect_with_transport(
		credential: ConsumerCredential,
		config: ClientConfig,
		store: Arc<dyn CacheStore>,
		transport: impl Into<Arc<C>>,
	) -> Result<Self> {
		let transport = transport.into();
		let ClientConfig { descriptor, user_agent, cache_ttl } = config;
		let token_manager = TokenManager::new(
			transport.clone(),
			descriptor.clone(),
			credential,
			user_agent.clone(),
		);

		token_manager.acquire().await?;

		Ok(Self {
			transport,
			token_manager,
			cache: ResponseCache::new(store).with_ttl(cache_ttl),
			descriptor,
			user_agent,
			call_guards: Mutex::new(HashMap::new()),
		})
	}

	/// Executes one logical GET call with memoization.
	///
	/// Identical endpoint + parameter combinations within the TTL window are served from the
	/// cache without network access or token use. Error responses are never cached.
	pub async fn execute(&self, endpoint_path: &str, params: &[(String, String)]) -> Result<Json> {
		const KIND: CallKind = CallKind::Read;

		let span = CallSpan::new(KIND, "execute");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.execute_inner(endpoint_path, params)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn execute_inner(
		&self,
		endpoint_path: &str,
		params: &[(String, String)],
	) -> Result<Json> {
		let signature = RequestSignature::new(endpoint_path, params);
		let guard = self.call_guard(&signature);
		let _singleflight = guard.lock().await;
		let now = OffsetDateTime::now_utc();

		if let Some(payload) = self.cache.lookup(&signature, now).await {
			obs::record_cache_lookup(CacheLookup::Hit);

			return Ok(payload);
		}

		obs::record_cache_lookup(CacheLookup::Miss);

		let mut url = self.descriptor.data_endpoint(endpoint_path);

		if !params.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in params {
				pairs.append_pair(key, value);
			}
		}

		let request = ApiRequest::get(url)
			.header("Authorization", self.token_manager.authorization_header()?)
			.header("User-Agent", self.user_agent.clone());
		let response = self
			.transport
			.dispatch(request)
			.await
			.map_err(|source| ApiError::Transport { source })?;
		let payload = response
			.json()
			.map_err(|source| ApiError::Decode { source, status: Some(response.status) })?;

		if let Some(message) = http::provider_error_message(&payload) {
			// Never cached, so a corrected retry re-hits the provider.
			return Err(ApiError::Rejected { message }.into());
		}

		self.cache.record(signature, payload.clone(), now).await;

		Ok(payload)
	}

	/// Issues the best-effort bearer invalidation; idempotent and safe to call repeatedly.
	pub async fn close(&self) {
		self.token_manager.invalidate().await;
	}

	/// Returns the token manager owning the bearer lifecycle.
	pub fn token_manager(&self) -> &TokenManager<C> {
		&self.token_manager
	}

	/// Returns the response cache wrapper.
	pub fn cache(&self) -> &ResponseCache {
		&self.cache
	}

	/// Returns the provider descriptor the client was built with.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn call_guard(&self, signature: &RequestSignature) -> Arc<AsyncMutex<()>> {
		let mut guards = self.call_guards.lock();

		guards.entry(signature.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Connects with the default configuration over a crate-provisioned reqwest transport and
	/// in-memory cache store.
	pub async fn connect(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
	) -> Result<Self> {
		Self::connect_with_config(consumer_key, consumer_secret, ClientConfig::new()).await
	}

	/// Connects with the provided configuration over a crate-provisioned reqwest transport and
	/// in-memory cache store.
	pub async fn connect_with_config(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
		config: ClientConfig,
	) -> Result<Self> {
		Self::connect_with_transport(
			ConsumerCredential::new(consumer_key, consumer_secret),
			config,
			Arc::new(MemoryStore::default()),
			ReqwestTransport::default(),
		)
		.await
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("descriptor", &self.descriptor)
			.field("user_agent", &self.user_agent)
			.field("token_state", &self.token_manager.state())
			.finish()
	}
}
