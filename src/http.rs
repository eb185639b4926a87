//! Transport seam between the client and its HTTP stack.
//!
//! The module exposes [`ApiTransport`] as the client's only dependency on an HTTP
//! implementation. The wrapped API reports application failures inside JSON bodies
//! (often with a 200 status line), so transports return bodies for classification
//! regardless of status and only surface connection-level problems as
//! [`TransportError`].

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
// self
use crate::{_prelude::*, codec::RequestBody, error::TransportError};

/// Boxed future returned by [`ApiTransport`] methods.
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing gated API calls.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared across
/// client clones behind `Arc<T>`, and the futures they return must be `Send` for the
/// lifetime of the in-flight request. Timeout and proxy policy belong to the
/// implementation; the client issues at most two round trips per top-level call.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Performs a GET request and returns the raw response body.
	fn get<'a>(&'a self, url: &'a Url) -> TransportFuture<'a, Vec<u8>>;

	/// Performs a POST request with the provided payload and returns the raw
	/// response body.
	fn post<'a>(&'a self, url: &'a Url, body: RequestBody) -> TransportFuture<'a, Vec<u8>>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Configure timeouts on a custom [`ReqwestClient`] and inject it through
/// [`ReqwestTransport::with_client`]; the default client applies reqwest's defaults.
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
	fn get<'a>(&'a self, url: &'a Url) -> TransportFuture<'a, Vec<u8>> {
		let client = self.0.clone();
		let url = url.clone();

		Box::pin(async move {
			let response = client.get(url).send().await.map_err(TransportError::from)?;

			Ok(response.bytes().await.map_err(TransportError::from)?.to_vec())
		})
	}

	fn post<'a>(&'a self, url: &'a Url, body: RequestBody) -> TransportFuture<'a, Vec<u8>> {
		let client = self.0.clone();
		let url = url.clone();

		Box::pin(async move {
			let request = match body {
				RequestBody::Json(payload) =>
					client.post(url).header(CONTENT_TYPE, "application/json").body(payload),
				RequestBody::Form(pairs) => client.post(url).form(&pairs),
			};
			let response = request.send().await.map_err(TransportError::from)?;

			Ok(response.bytes().await.map_err(TransportError::from)?.to_vec())
		})
	}
}
