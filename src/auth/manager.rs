//! Bearer-token lifecycle management for the application-only grant.
//!
//! The manager owns the single bearer slot as an explicit state machine: `Uninitialized →
//! Acquiring → Active → Invalidated`, with `Acquiring → Failed` terminal on any grant failure.
//! Acquisition is the one point of failure that gates all subsequent use; there is no partially
//! authenticated state. Invalidation is fire-and-forget so teardown can never raise.

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, ConsumerCredential},
	error::{AuthError, ConfigError},
	http::{self, ApiRequest, ApiTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
	provider::ProviderDescriptor,
};

/// Lifecycle states observable on a [`TokenManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
	/// No grant has been attempted yet.
	Uninitialized,
	/// A grant request is in flight.
	Acquiring,
	/// A bearer token is held and usable for reads.
	Active,
	/// The grant failed; the manager is terminally unusable.
	Failed,
	/// The bearer slot has been torn down.
	Invalidated,
}

enum Slot {
	Uninitialized,
	Acquiring,
	Active(BearerToken),
	Failed,
	Invalidated,
}

/// Owns the bearer-token lifecycle: acquire, hold, invalidate.
pub struct TokenManager<C>
where
	C: ?Sized + ApiTransport,
{
	transport: Arc<C>,
	descriptor: ProviderDescriptor,
	credential: ConsumerCredential,
	user_agent: String,
	slot: Mutex<Slot>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a manager in the `Uninitialized` state.
	pub fn new(
		transport: impl Into<Arc<C>>,
		descriptor: ProviderDescriptor,
		credential: ConsumerCredential,
		user_agent: impl Into<String>,
	) -> Self {
		Self {
			transport: transport.into(),
			descriptor,
			credential,
			user_agent: user_agent.into(),
			slot: Mutex::new(Slot::Uninitialized),
		}
	}

	/// Returns the currently observable lifecycle state.
	pub fn state(&self) -> TokenState {
		match &*self.slot.lock() {
			Slot::Uninitialized => TokenState::Uninitialized,
			Slot::Acquiring => TokenState::Acquiring,
			Slot::Active(_) => TokenState::Active,
			Slot::Failed => TokenState::Failed,
			Slot::Invalidated => TokenState::Invalidated,
		}
	}

	/// Performs the client-credentials grant and stores the resulting bearer token.
	///
	/// Must run exactly once, before any authorized read; a second call fails with
	/// [`ConfigError::RepeatedGrant`] without touching the network. Any grant failure leaves the
	/// manager terminally `Failed`.
	pub async fn acquire(&self) -> Result<BearerToken> {
		const KIND: CallKind = CallKind::Grant;

		let span = CallSpan::new(KIND, "acquire");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.acquire_inner()).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn acquire_inner(&self) -> Result<BearerToken> {
		{
			let mut slot = self.slot.lock();

			match *slot {
				Slot::Uninitialized => *slot = Slot::Acquiring,
				Slot::Invalidated => return Err(ConfigError::BearerUnavailable.into()),
				_ => return Err(ConfigError::RepeatedGrant.into()),
			}
		}

		let request = ApiRequest::post(self.descriptor.token_endpoint())
			.header("Authorization", self.credential.consumer_token().basic_header())
			.header("User-Agent", self.user_agent.clone())
			.form_body(&[("grant_type", "client_credentials")]);
		let outcome = self.exchange_grant(request).await;
		let mut slot = self.slot.lock();

		match outcome {
			Ok(token) if matches!(*slot, Slot::Acquiring) => {
				*slot = Slot::Active(token.clone());

				Ok(token)
			},
			// Teardown raced the grant; teardown wins and the fresh token is discarded.
			Ok(_) => Err(ConfigError::BearerUnavailable.into()),
			Err(error) => {
				if matches!(*slot, Slot::Acquiring) {
					*slot = Slot::Failed;
				}

				Err(error)
			},
		}
	}

	async fn exchange_grant(&self, request: ApiRequest) -> Result<BearerToken> {
		let response = self
			.transport
			.dispatch(request)
			.await
			.map_err(|source| AuthError::Transport { source })?;
		let payload = response
			.json()
			.map_err(|source| AuthError::Decode { source, status: Some(response.status) })?;

		if let Some(message) = http::provider_error_message(&payload) {
			return Err(AuthError::Rejected { message }.into());
		}

		let access_token = payload
			.get("access_token")
			.and_then(Json::as_str)
			.ok_or(AuthError::MissingAccessToken)?;

		Ok(BearerToken::new(access_token, OffsetDateTime::now_utc()))
	}

	/// Formats the held bearer token as an `Authorization` header value.
	///
	/// Fails with [`ConfigError::BearerUnavailable`] before the grant completes or after
	/// invalidation.
	pub fn authorization_header(&self) -> Result<String> {
		match &*self.slot.lock() {
			Slot::Active(token) => Ok(token.authorization_header()),
			_ => Err(ConfigError::BearerUnavailable.into()),
		}
	}

	/// Issues a best-effort revocation for the held bearer token.
	///
	/// Idempotent and safe under concurrent teardown: the token is extracted under the slot
	/// lock, so at most one revocation request is ever issued, and repeated calls (or calls on a
	/// manager that never acquired) return without network access. Transport and provider
	/// failures are swallowed because this runs during teardown, where escalating would abort
	/// cleanup.
	pub async fn invalidate(&self) {
		const KIND: CallKind = CallKind::Revoke;

		let token = {
			let mut slot = self.slot.lock();

			match std::mem::replace(&mut *slot, Slot::Invalidated) {
				Slot::Active(token) => token,
				_ => return,
			}
		};
		let span = CallSpan::new(KIND, "invalidate");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		match span.instrument(self.revoke(token)).await {
			Ok(()) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(error) => {
				obs::warn_best_effort("invalidate", &error);
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}
	}

	async fn revoke(&self, token: BearerToken) -> Result<()> {
		let request = ApiRequest::post(self.descriptor.invalidate_endpoint())
			.header("Authorization", self.credential.consumer_token().basic_header())
			.header("User-Agent", self.user_agent.clone())
			.header("Accept", "*/*")
			.form_body(&[("access_token", token.secret.expose())]);
		let response = self
			.transport
			.dispatch(request)
			.await
			.map_err(|source| AuthError::Transport { source })?;
		let payload = response
			.json()
			.map_err(|source| AuthError::Decode { source, status: Some(response.status) })?;

		if let Some(message) = http::provider_error_message(&payload) {
			return Err(AuthError::Rejected { message }.into());
		}

		Ok(())
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("descriptor", &self.descriptor)
			.field("user_agent", &self.user_agent)
			.field("state", &self.state())
			.finish()
	}
}
