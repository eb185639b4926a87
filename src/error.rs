//! Client-level error types shared across configuration, codec, transport, and caching.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Cache-layer failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Remote service reported a failure inside the response body.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures raised at construction or call time.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration field was empty.
	#[error("Missing config field `{field}`.")]
	MissingField {
		/// Name of the empty field.
		field: &'static str,
	},
	/// Token endpoint override or default failed to parse.
	#[error("Token endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Call URL no longer parses after placeholder substitution.
	#[error("Call URL is invalid after token substitution.")]
	InvalidCallUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Form-encoded POST payloads must be JSON objects.
	#[error("Form-encoded payloads must be JSON objects.")]
	NonObjectForm,
}

/// Application-level failures the wrapped API reports inside response bodies.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Remote service rejected the call with a numeric `errcode`.
	#[error("API call failed with code {code}: {message}.")]
	Api {
		/// Application-level error code.
		code: i64,
		/// `errmsg` payload, empty when the body carried none.
		message: String,
	},
	/// Token endpoint answered without an `access_token` field.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Response body could not be parsed as JSON.
	#[error("Response body is malformed JSON.")]
	Malformed {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ResponseError {
	/// Codes the wrapped API uses to report an invalid or expired access token.
	pub const CREDENTIAL_REJECTION_CODES: [i64; 4] = [40014, 40001, 41001, 42001];

	/// Returns true when the current access token was rejected and a refreshed token
	/// may recover the call.
	pub fn is_credential_rejection(&self) -> bool {
		matches!(self, Self::Api { code, .. } if Self::CREDENTIAL_REJECTION_CODES.contains(code))
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
