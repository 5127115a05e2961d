use gloo::net::http::{Request, RequestBuilder, Response};
use log::debug;
use serde::de::DeserializeOwned;
use web_sys::{File, FormData, UrlSearchParams};

use super::types::*;
use crate::circuit::Diagram;
use crate::config::ApiConfig;
use crate::error::AppError;

/// Thin typed wrapper over the backend's JSON endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
	base_url: String,
}

fn bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
	match token {
		Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
		None => builder,
	}
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
	if !response.ok() {
		let status = response.status();
		let body = response.text().await.unwrap_or_default();
		return Err(AppError::Status {
			status,
			message: error_detail(&body),
		});
	}
	Ok(response.json::<T>().await?)
}

async fn expect_success(response: Response) -> Result<(), AppError> {
	decode::<serde_json::Value>(response).await.map(|_| ())
}

impl ApiClient {
	pub fn new(config: &ApiConfig) -> Self {
		Self {
			base_url: config.base_url.clone(),
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	async fn post_query<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<T, AppError> {
		debug!("POST {path}");
		let response = Request::post(&self.url(path))
			.json(&QueryRequest { query })?
			.send()
			.await?;
		decode(response).await
	}

	/// Wiring diagram for a natural-language description.
	pub async fn generate(&self, query: &str) -> Result<Diagram, AppError> {
		self.post_query("/generate", query).await
	}

	pub async fn generate_code(&self, query: &str) -> Result<FirmwareCode, AppError> {
		self.post_query("/generate-code", query).await
	}

	pub async fn generate_bom(&self, query: &str) -> Result<BillOfMaterials, AppError> {
		self.post_query("/generate-bom", query).await
	}

	pub async fn save(&self, request: &SaveRequest, token: Option<&str>) -> Result<String, AppError> {
		let response = bearer(Request::post(&self.url("/save")), token)
			.json(request)?
			.send()
			.await?;
		Ok(decode::<SaveResponse>(response).await?.id)
	}

	pub async fn load_circuit(&self, id: &str) -> Result<SavedCircuit, AppError> {
		let response = Request::get(&self.url(&format!("/circuit/{id}")))
			.send()
			.await?;
		decode(response).await
	}

	/// Most recently saved circuits, newest first.
	pub async fn recent(&self, token: &str) -> Result<Vec<RecentCircuit>, AppError> {
		let response = bearer(Request::get(&self.url("/recent")), Some(token))
			.send()
			.await?;
		decode(response).await
	}

	/// OAuth2 password form: the email goes in `username`.
	pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
		let form = UrlSearchParams::new()?;
		form.append("username", email);
		form.append("password", password);
		let response = Request::post(&self.url("/login"))
			.body(form)?
			.send()
			.await?;
		Ok(decode::<AccessToken>(response).await?.access_token)
	}

	pub async fn register(&self, email: &str, password: &str) -> Result<String, AppError> {
		let response = Request::post(&self.url("/register"))
			.json(&Credentials { email, password })?
			.send()
			.await?;
		Ok(decode::<AccessToken>(response).await?.access_token)
	}

	pub async fn me(&self, token: &str) -> Result<UserProfile, AppError> {
		let response = bearer(Request::get(&self.url("/me")), Some(token))
			.send()
			.await?;
		decode(response).await
	}

	pub async fn components(&self) -> Result<Vec<Component>, AppError> {
		let response = Request::get(&self.url("/components")).send().await?;
		decode(response).await
	}

	pub async fn component(&self, id: i64) -> Result<Component, AppError> {
		let response = Request::get(&self.url(&format!("/components/{id}")))
			.send()
			.await?;
		decode(response).await
	}

	pub async fn create_component(&self, draft: &ComponentDraft) -> Result<Component, AppError> {
		let response = Request::post(&self.url("/components"))
			.json(draft)?
			.send()
			.await?;
		decode(response).await
	}

	pub async fn update_component(
		&self,
		id: i64,
		draft: &ComponentDraft,
	) -> Result<Component, AppError> {
		let response = Request::put(&self.url(&format!("/components/{id}")))
			.json(draft)?
			.send()
			.await?;
		decode(response).await
	}

	pub async fn delete_component(&self, id: i64) -> Result<(), AppError> {
		let response = Request::delete(&self.url(&format!("/components/{id}")))
			.send()
			.await?;
		expect_success(response).await
	}

	/// Uploads one image and returns its public URL.
	pub async fn upload_image(&self, file: &File) -> Result<String, AppError> {
		let form = FormData::new()?;
		form.append_with_blob("file", file)?;
		let response = Request::post(&self.url("/upload")).body(form)?.send().await?;
		Ok(decode::<UploadResponse>(response).await?.url)
	}

	pub async fn generate_component_details(
		&self,
		name: &str,
		category: &str,
	) -> Result<ComponentDetails, AppError> {
		let response = Request::post(&self.url("/generate-component-details"))
			.json(&ComponentDetailsRequest { name, category })?
			.send()
			.await?;
		decode(response).await
	}

	pub async fn verify_password(&self, password: &str) -> Result<(), AppError> {
		let response = Request::post(&self.url("/verify-password"))
			.json(&PasswordCheck { password })?
			.send()
			.await?;
		expect_success(response).await
	}

	/// Course modules in curriculum order.
	pub async fn ai_courses(&self) -> Result<Vec<CourseModule>, AppError> {
		let response = Request::get(&self.url("/ai-courses")).send().await?;
		decode(response).await
	}
}
