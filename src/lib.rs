//! Token-gated JSON API client—cached access tokens, placeholder URL injection, and a
//! one-shot credential retry for WeChat-style server APIs.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod token;
#[cfg(feature = "reqwest")]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by the crate's integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		cache::{MemoryCache, TokenCache},
		client::ApiClient,
		config::Config,
		http::ReqwestTransport,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Application identifier used by test clients.
	pub const TEST_APP_ID: &str = "test-app";
	/// Application secret used by test clients.
	pub const TEST_APP_SECRET: &str = "test-secret";

	/// Builds a config whose token endpoint points at a mock server.
	pub fn test_config(token_endpoint: &str) -> Config {
		let endpoint = Url::parse(token_endpoint).expect("Mock token endpoint should parse.");

		Config::new(TEST_APP_ID, TEST_APP_SECRET)
			.expect("Test credentials should be valid.")
			.with_token_endpoint(endpoint)
	}

	/// Constructs an [`ApiClient`] backed by an in-memory cache and the default reqwest
	/// transport used across integration tests.
	pub fn build_test_client(token_endpoint: &str) -> (ReqwestTestClient, Arc<MemoryCache>) {
		let cache_backend = Arc::new(MemoryCache::default());
		let cache: Arc<dyn TokenCache> = cache_backend.clone();
		let client =
			ApiClient::with_transport(test_config(token_endpoint), cache, ReqwestTransport::default());

		(client, cache_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
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
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {httpmock as _, tokio as _};
