//! JSON response decoding, application-level error classification, and request
//! payload encoding.
//!
//! The wrapped API reports failures inside response bodies rather than through HTTP
//! status codes: a JSON object carrying a non-zero `errcode` is an error regardless
//! of the status line, and success bodies either omit `errcode` or set it to zero.
//! [`decode`] folds that classification into the parse step so callers only ever see
//! a decoded value or a typed [`ResponseError`].

// self
use crate::{
	_prelude::*,
	error::{ConfigError, ResponseError},
};

const ERROR_CODE_FIELD: &str = "errcode";
const ERROR_MESSAGE_FIELD: &str = "errmsg";

/// Request payload encodings supported by the transport layer.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// JSON document sent with an `application/json` content type.
	Json(String),
	/// Key-value pairs sent URL-encoded, bypassing JSON encoding.
	Form(Vec<(String, String)>),
}

/// Encodes a caller payload per the wrapped API's `encode_as_json` convention.
///
/// Form mode requires a JSON object; scalar members are stringified, structured
/// members are serialized inline.
pub fn encode(data: &Value, as_json: bool) -> Result<RequestBody, ConfigError> {
	if as_json {
		return Ok(RequestBody::Json(data.to_string()));
	}

	let Value::Object(map) = data else {
		return Err(ConfigError::NonObjectForm);
	};
	let pairs = map.iter().map(|(key, value)| (key.clone(), stringify(value))).collect();

	Ok(RequestBody::Form(pairs))
}

fn stringify(value: &Value) -> String {
	match value {
		Value::String(inner) => inner.clone(),
		other => other.to_string(),
	}
}

/// Decodes a raw response body and classifies application-level failures.
pub fn decode(bytes: &[u8]) -> Result<Value, ResponseError> {
	let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
	let value: Value = serde_path_to_error::deserialize(deserializer)
		.map_err(|source| ResponseError::Malformed { source })?;

	match value.get(ERROR_CODE_FIELD).and_then(Value::as_i64) {
		Some(code) if code != 0 => Err(ResponseError::Api {
			code,
			message: value
				.get(ERROR_MESSAGE_FIELD)
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_owned(),
		}),
		_ => Ok(value),
	}
}
