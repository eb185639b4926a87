//! Client configuration: application credentials, token endpoint, and cache TTL.

// self
use crate::{_prelude::*, error::ConfigError, token::Secret};

/// Token-issuing endpoint used when no override is configured.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.weixin.qq.com/cgi-bin/token";
/// Cache lifetime applied to issued tokens. Sits under the issuing server's own window
/// so cached tokens never outlive the credential they mirror.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::seconds(6_000);

/// Immutable client configuration validated at construction.
///
/// The application secret is held behind [`Secret`] so debug output and spans never
/// leak it.
#[derive(Clone, Debug)]
pub struct Config {
	app_id: String,
	app_secret: Secret,
	token_endpoint: Url,
	token_ttl: Duration,
}
impl Config {
	/// Validates and stores the application credentials.
	///
	/// Fails with [`ConfigError::MissingField`] naming the empty field.
	pub fn new(
		app_id: impl Into<String>,
		app_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let app_id = app_id.into();
		let app_secret = app_secret.into();

		if app_id.is_empty() {
			return Err(ConfigError::MissingField { field: "app_id" });
		}
		if app_secret.is_empty() {
			return Err(ConfigError::MissingField { field: "app_secret" });
		}

		let token_endpoint = Url::parse(DEFAULT_TOKEN_ENDPOINT)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self {
			app_id,
			app_secret: Secret::new(app_secret),
			token_endpoint,
			token_ttl: DEFAULT_TOKEN_TTL,
		})
	}

	/// Overrides the token-issuing endpoint.
	pub fn with_token_endpoint(mut self, endpoint: Url) -> Self {
		self.token_endpoint = endpoint;

		self
	}

	/// Overrides the cache lifetime applied to issued tokens (defaults to 6000 seconds).
	pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
		self.token_ttl = if ttl.is_negative() { Duration::ZERO } else { ttl };

		self
	}

	/// Returns the application identifier.
	pub fn app_id(&self) -> &str {
		&self.app_id
	}

	/// Returns the configured token-issuing endpoint.
	pub fn token_endpoint(&self) -> &Url {
		&self.token_endpoint
	}

	/// Returns the cache lifetime applied to issued tokens.
	pub fn token_ttl(&self) -> Duration {
		self.token_ttl
	}

	/// Cache key scoping stored tokens to this application.
	pub fn cache_key(&self) -> String {
		format!("{}_accesstoken", self.app_id)
	}

	/// Builds the token request URL.
	///
	/// Query order matches the wrapped API's documented template: `grant_type`,
	/// `appid`, `secret`.
	pub(crate) fn token_request_url(&self) -> Url {
		let mut url = self.token_endpoint.clone();

		url.query_pairs_mut()
			.append_pair("grant_type", "client_credential")
			.append_pair("appid", &self.app_id)
			.append_pair("secret", self.app_secret.expose());

		url
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn construction_names_the_missing_field() {
		let err = Config::new("", "s").expect_err("Empty app_id should be rejected.");

		assert!(matches!(err, ConfigError::MissingField { field: "app_id" }));

		let err = Config::new("a", "").expect_err("Empty app_secret should be rejected.");

		assert!(matches!(err, ConfigError::MissingField { field: "app_secret" }));
	}

	#[test]
	fn cache_key_is_scoped_to_the_app_id() {
		let config = Config::new("demo-app", "demo-secret")
			.expect("Config fixture should build successfully.");

		assert_eq!(config.cache_key(), "demo-app_accesstoken");
	}

	#[test]
	fn token_request_url_preserves_query_order() {
		let config = Config::new("demo-app", "demo-secret")
			.expect("Config fixture should build successfully.");
		let url = config.token_request_url();

		assert_eq!(
			url.query(),
			Some("grant_type=client_credential&appid=demo-app&secret=demo-secret"),
		);
	}

	#[test]
	fn negative_ttl_clamps_to_zero() {
		let config = Config::new("demo-app", "demo-secret")
			.expect("Config fixture should build successfully.")
			.with_token_ttl(Duration::seconds(-5));

		assert_eq!(config.token_ttl(), Duration::ZERO);
	}

	#[test]
	fn debug_output_redacts_the_secret() {
		let config = Config::new("demo-app", "demo-secret")
			.expect("Config fixture should build successfully.");
		let rendered = format!("{config:?}");

		assert!(!rendered.contains("demo-secret"));
		assert!(rendered.contains("demo-app"));
	}
}
