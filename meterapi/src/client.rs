use crate::ApiError;
use bytes::Bytes;
use reqwest::{
	header::{HeaderMap, HeaderValue, ACCEPT},
	ClientBuilder, IntoUrl, RequestBuilder,
};
use url::Url;

#[derive(Clone, Debug)]
pub struct Client {
	client: reqwest::Client,
	base: Url,
}

impl Client {
	/// Creates a new data service client.
	///
	/// # Arguments
	/// * `base` - The URL under which the service's endpoints live, e.g.
	///   `http://192.168.1.10:5000/api`.
	///
	/// # Errors
	/// Returns an error if the URL is invalid or the HTTP client cannot be
	/// constructed.
	///
	pub fn new(base: impl IntoUrl) -> Result<Self, ApiError> {
		let base = base.into_url()?;
		if base.cannot_be_a_base() {
			return Err(ApiError::Url(base.to_string()));
		}

		// Create the default header set.
		//
		let mut default_headers = HeaderMap::new();
		default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		// Build the HTTP client. This will be reused for all requests.
		//
		let client = ClientBuilder::new()
			.gzip(true)
			.default_headers(default_headers)
			.build()?;

		Ok(Self { client, base })
	}

	/// Returns the base URL of the data service.
	pub fn base(&self) -> &Url {
		&self.base
	}

	/// Builds the URL of the endpoint at `segments` below the base URL.
	pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
		let mut url = self.base.clone();
		url.path_segments_mut()
			.map_err(|_| ApiError::Url(self.base.to_string()))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	pub(crate) fn http(&self) -> &reqwest::Client {
		&self.client
	}

	/// Sends the request and returns the body of a success response.
	pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Bytes, ApiError> {
		let response = match request.send().await {
			Ok(response) => response,
			Err(error) => {
				tracing::error!("error sending request to data service: {error:?}");
				return Err(error.into());
			}
		};

		let status = response.status();
		if status.is_success() {
			Ok(response.bytes().await?)
		} else {
			let body = response.text().await.unwrap_or_default();
			tracing::error!("data service response {status}: {body}");
			Err(ApiError::Status {
				status: status.as_u16(),
				body,
			})
		}
	}
}
