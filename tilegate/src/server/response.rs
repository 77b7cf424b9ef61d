//! The JSON envelope shared by all non-image endpoints.
//!
//! Historical wire format: most client-input failures are answered with
//! HTTP 200 and the error carried in the envelope's `code`. Existing
//! clients depend on it, so [`api_error`] preserves the quirk; endpoints
//! that never had that contract (the GEE relay) use
//! [`api_error_status`] with a real status code.

use axum::{
	Json,
	body::Body,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
	pub code: u16,
	pub message: String,
	pub data: Option<T>,
}

/// 200 envelope with payload.
pub fn api_ok<T: Serialize>(message: &str, data: T) -> Response<Body> {
	Json(ApiResponse {
		code: 200,
		message: message.to_string(),
		data: Some(data),
	})
	.into_response()
}

/// Error envelope carried in an HTTP 200 response (see module docs).
pub fn api_error(code: u16, message: String) -> Response<Body> {
	log::debug!("api error {code}: {message}");
	Json(ApiResponse::<()> {
		code,
		message,
		data: None,
	})
	.into_response()
}

/// Error envelope with a real HTTP status code.
pub fn api_error_status(status: StatusCode, message: String) -> Response<Body> {
	log::debug!("api error {status}: {message}");
	(
		status,
		Json(ApiResponse::<()> {
			code: status.as_u16(),
			message,
			data: None,
		}),
	)
		.into_response()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn api_error_keeps_http_200() {
		let response = api_error(400, "bad input".to_string());
		assert_eq!(response.status(), StatusCode::OK);
	}

	#[test]
	fn api_error_status_uses_the_real_code() {
		let response = api_error_status(StatusCode::BAD_GATEWAY, "relay failed".to_string());
		assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
	}
}
