use bytes::{Buf, Bytes};

/// Decodes a JSON response body, logging the endpoint on failure.
pub fn parse_json_payload<T: serde::de::DeserializeOwned>(
	endpoint: &str,
	body: Bytes,
) -> serde_json::Result<T> {
	let reader = body.reader();
	match serde_json::from_reader(reader) {
		Ok(v) => Ok(v),
		Err(error) => {
			tracing::error!("failed to deserialise payload from '{endpoint}': {}", error);
			Err(error)
		}
	}
}
