//! Token-gated API client: token lifecycle, placeholder injection, and the
//! one-shot credential retry.

// self
use crate::{
	_prelude::*,
	cache::TokenCache,
	codec::{self, RequestBody},
	config::Config,
	error::{ConfigError, ResponseError},
	http::ApiTransport,
	obs::{self, CallKind, CallOutcome, CallSpan},
	token::Secret,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Literal placeholder the wrapped API embeds in its URL templates. Preserved
/// bit-for-bit so callers can paste endpoint templates straight from the API
/// documentation.
pub const ACCESS_TOKEN_PLACEHOLDER: &str = "ACCESS_TOKEN";

const ACCESS_TOKEN_FIELD: &str = "access_token";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Client for token-gated JSON APIs.
///
/// The client owns the validated configuration, the injected cache and transport,
/// and a mutex-guarded in-memory token slot, so the call helpers can focus on the
/// token lifecycle: resolve a token (memory, then cache, then the token endpoint),
/// substitute it into the caller's URL template, and replay a rejected call exactly
/// once with a freshly issued token. Cloning shares all state, and a singleflight
/// guard keeps concurrent cold-start callers from stampeding the token endpoint.
pub struct ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Immutable configuration validated at construction.
	pub config: Config,
	/// Cache backend that persists issued tokens across calls and processes.
	pub cache: Arc<dyn TokenCache>,
	/// HTTP transport used for every outbound request.
	pub transport: Arc<T>,
	token_slot: Arc<Mutex<Option<Secret>>>,
	fetch_guard: Arc<AsyncMutex<()>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		config: Config,
		cache: Arc<dyn TokenCache>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			config,
			cache,
			transport: transport.into(),
			token_slot: Default::default(),
			fetch_guard: Default::default(),
		}
	}

	/// Resolves the current access token, fetching and caching a fresh one when needed.
	///
	/// Resolution order: the in-memory slot (no I/O), the cache backend, and finally a
	/// GET against the token endpoint. Freshly issued tokens are written back to the
	/// cache with the configured TTL before being returned. A token endpoint body
	/// without a non-empty `access_token` field fails with
	/// [`ResponseError::MissingAccessToken`].
	pub async fn access_token(&self) -> Result<String> {
		if let Some(token) = self.memory_token() {
			return Ok(token);
		}

		let _singleflight = self.fetch_guard.lock().await;

		// A concurrent caller may have resolved the token while we waited on the guard.
		if let Some(token) = self.memory_token() {
			return Ok(token);
		}

		let key = self.config.cache_key();

		if let Some(cached) = self.cache.get(&key).await?.filter(|value| !value.is_empty()) {
			self.store_memory_token(&cached);

			return Ok(cached);
		}

		let span = CallSpan::new(CallKind::TokenFetch, "access_token");

		obs::record_call_outcome(CallKind::TokenFetch, CallOutcome::Attempt);

		let result = span.instrument(self.fetch_token(&key)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(CallKind::TokenFetch, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(CallKind::TokenFetch, CallOutcome::Failure),
		}

		result
	}

	async fn fetch_token(&self, key: &str) -> Result<String> {
		let url = self.config.token_request_url();
		let raw = self.transport.get(&url).await?;
		let body = codec::decode(&raw)?;
		let token = body
			.get(ACCESS_TOKEN_FIELD)
			.and_then(Value::as_str)
			.filter(|token| !token.is_empty())
			.ok_or(ResponseError::MissingAccessToken)?
			.to_owned();

		self.cache.set(key, &token, self.config.token_ttl()).await?;
		self.store_memory_token(&token);

		Ok(token)
	}

	/// Clears the in-memory token and deletes the cache entry for the configured app.
	///
	/// The boolean passes the cache's deletion report through: true when a live entry
	/// existed and was removed.
	pub async fn delete_access_token(&self) -> Result<bool> {
		*self.token_slot.lock() = None;

		Ok(self.cache.delete(&self.config.cache_key()).await?)
	}

	/// Performs a gated GET call against a URL template carrying the
	/// [`ACCESS_TOKEN_PLACEHOLDER`].
	pub async fn call_get_api(&self, url: &str) -> Result<Value> {
		self.dispatch(CallKind::Get, url, None).await
	}

	/// Performs a gated POST call against a URL template carrying the
	/// [`ACCESS_TOKEN_PLACEHOLDER`].
	///
	/// The payload is JSON-encoded when `encode_as_json` is true and form-encoded
	/// otherwise, matching the wrapped API's upload endpoints.
	pub async fn call_post_api(
		&self,
		url: &str,
		data: &Value,
		encode_as_json: bool,
	) -> Result<Value> {
		let body = codec::encode(data, encode_as_json)?;

		self.dispatch(CallKind::Post, url, Some(body)).await
	}

	/// Single dispatch path for both call kinds so the retry policy lives in one
	/// place.
	///
	/// Per top-level call: resolve a token, substitute the placeholder, perform the
	/// transport round trip, and decode + classify the body. A credential rejection
	/// invalidates both token copies and replays the call once; re-entering the loop
	/// forces a fresh token fetch. Any other error, or a rejection after the replay,
	/// propagates unchanged.
	async fn dispatch(&self, kind: CallKind, url: &str, body: Option<RequestBody>) -> Result<Value> {
		let span = CallSpan::new(kind, "dispatch");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut retried = false;

				loop {
					let token = self.access_token().await?;
					let resolved = resolve_url(url, &token)?;
					let raw = match &body {
						None => self.transport.get(&resolved).await,
						Some(payload) => self.transport.post(&resolved, payload.clone()).await,
					};
					let outcome = match raw {
						Ok(bytes) => codec::decode(&bytes).map_err(Error::from),
						Err(e) => Err(e.into()),
					};

					match outcome {
						Err(Error::Response(ref response))
							if response.is_credential_rejection() && !retried =>
						{
							retried = true;

							obs::record_call_outcome(kind, CallOutcome::Retry);
							self.delete_access_token().await?;
						},
						other => return other,
					}
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}

	fn memory_token(&self) -> Option<String> {
		self.token_slot
			.lock()
			.as_ref()
			.filter(|secret| !secret.is_empty())
			.map(|secret| secret.expose().to_owned())
	}

	fn store_memory_token(&self, token: &str) {
		*self.token_slot.lock() = Some(Secret::new(token));
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by the default reqwest transport.
	///
	/// Use [`ApiClient::with_transport`] to inject a custom transport or a
	/// [`ReqwestTransport`] carrying timeout configuration.
	pub fn new(config: Config, cache: Arc<dyn TokenCache>) -> Self {
		Self::with_transport(config, cache, ReqwestTransport::default())
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			cache: self.cache.clone(),
			transport: self.transport.clone(),
			token_slot: self.token_slot.clone(),
			fetch_guard: self.fetch_guard.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("token_resolved", &self.token_slot.lock().is_some())
			.finish()
	}
}

/// Substitutes the resolved token into the caller's URL template.
fn resolve_url(template: &str, token: &str) -> Result<Url> {
	let substituted = template.replace(ACCESS_TOKEN_PLACEHOLDER, token);

	Url::parse(&substituted).map_err(|source| ConfigError::InvalidCallUrl { source }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resolve_url_substitutes_the_placeholder_only() {
		let resolved = resolve_url("https://x/?access_token=ACCESS_TOKEN&lang=en", "T1")
			.expect("Template with placeholder should resolve.");

		assert_eq!(resolved.as_str(), "https://x/?access_token=T1&lang=en");
	}

	#[test]
	fn resolve_url_rejects_broken_templates() {
		let err = resolve_url("not a url ACCESS_TOKEN", "T1")
			.expect_err("Non-URL templates should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidCallUrl { .. })));
	}
}
