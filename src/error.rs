//! Crate-wide error type.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum AppError {
	#[error("network error: {0}")]
	Network(#[from] gloo::net::Error),
	#[error("server returned {status}: {message}")]
	Status { status: u16, message: String },
	#[error("storage error: {0}")]
	Storage(#[from] gloo::storage::errors::StorageError),
	#[error("browser error: {0}")]
	Js(String),
	#[error("{0} is not available")]
	Unavailable(&'static str),
}

impl From<JsValue> for AppError {
	fn from(value: JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &JsValue::from_str("message"))
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{value:?}"));
		AppError::Js(message)
	}
}

impl AppError {
	/// True when the backend rejected our credentials.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, AppError::Status { status: 401 | 403, .. })
	}
}
