//! Data sources for graph payloads.

use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::mode::GraphRequest;
use super::types::GraphPayload;
use crate::error::FetchError;

/// Anything that can answer a [`GraphRequest`].
#[allow(
	async_fn_in_trait,
	reason = "fetches run on the single-threaded browser executor"
)]
pub trait GraphSource {
	async fn fetch(&self, request: &GraphRequest) -> Result<GraphPayload, FetchError>;
}

/// REST data source using the browser `fetch` API.
#[derive(Clone, Debug)]
pub struct HttpSource {
	base_url: String,
}

impl HttpSource {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	pub fn url(&self, request: &GraphRequest) -> String {
		format!("{}{}", self.base_url, request.path())
	}
}

impl GraphSource for HttpSource {
	async fn fetch(&self, request: &GraphRequest) -> Result<GraphPayload, FetchError> {
		let url = self.url(request);
		let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;

		let response = JsFuture::from(window.fetch_with_str(&url))
			.await
			.map_err(js_error)?;
		let response: Response = response.dyn_into().map_err(js_error)?;

		if !response.ok() {
			let status = response.status();
			// Error bodies usually carry `{"error": "..."}`; prefer that message.
			let body = read_text(&response).await.unwrap_or_default();
			return match GraphPayload::from_json(&body) {
				Err(FetchError::Remote(message)) => Err(FetchError::Remote(message)),
				_ => Err(FetchError::Status(status)),
			};
		}

		let body = read_text(&response).await?;
		debug!("crm-graph: GET {} returned {} bytes", url, body.len());
		GraphPayload::from_json(&body)
	}
}

async fn read_text(response: &Response) -> Result<String, FetchError> {
	let text = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?;
	text.as_string()
		.ok_or_else(|| FetchError::Network("response body is not text".into()))
}

fn js_error(value: JsValue) -> FetchError {
	let message = match value.dyn_ref::<js_sys::Error>() {
		Some(error) => String::from(error.message()),
		None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
	};
	FetchError::Network(message)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_url_joins_base_and_path() {
		let source = HttpSource::new("https://crm.example.com/api/");
		assert_eq!(
			source.url(&GraphRequest::Customer("C1".into())),
			"https://crm.example.com/api/graph/customer/C1"
		);
		assert_eq!(
			HttpSource::new("/api").url(&GraphRequest::EmployeeRoster),
			"/api/graph/employees"
		);
	}
}
