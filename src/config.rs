//! Build-time configuration and product constants.

/// Display name shown in headers and the document title.
pub const PRODUCT_NAME: &str = "TechWatt Circuit AI";

/// File name of the exported diagram image.
pub const EXPORT_FILE_NAME: &str = "techwatt-circuit.png";

/// Fill painted behind the diagram, on screen and in exports.
pub const CANVAS_BACKGROUND: &str = "#f9fafb";

/// Local storage key holding the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "techwatt_token";

/// Query parameter carrying a shared circuit id.
pub const SHARE_QUERY_PARAM: &str = "id";

/// Where the backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	pub base_url: String,
}

impl ApiConfig {
	/// Reads `TECHWATT_API_URL` at build time, falling back to the same-origin `/api` proxy.
	pub fn from_env() -> Self {
		Self::with_origin(option_env!("TECHWATT_API_URL"))
	}

	pub fn with_origin(origin: Option<&str>) -> Self {
		let base_url = match origin.map(str::trim).filter(|o| !o.is_empty()) {
			Some(origin) => format!("{}/api", origin.trim_end_matches('/')),
			None => "/api".to_string(),
		};
		Self { base_url }
	}
}
