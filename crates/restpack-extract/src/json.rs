//! JSON body decoding.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure to decode a request body.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body was empty or only whitespace.
    #[error("missing request body")]
    MissingBody,

    /// The body was not valid JSON for the target type.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Decodes `body` into `T`.
///
/// # Example
///
/// ```rust
/// use restpack_extract::{parse_json, ParseError};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Payload {
///     name: String,
/// }
///
/// let payload: Payload = parse_json(br#"{"name": "mug"}"#).unwrap();
/// assert_eq!(payload.name, "mug");
///
/// assert!(matches!(parse_json::<Payload>(b""), Err(ParseError::MissingBody)));
/// ```
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::MissingBody);
    }
    Ok(serde_json::from_slice(body)?)
}
