use serde::{Deserialize, Deserializer, Serialize};

use crate::circuit::Diagram;

#[derive(Clone, Debug, Serialize)]
pub struct QueryRequest<'a> {
	pub query: &'a str,
}

/// Firmware generated for a circuit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FirmwareCode {
	pub code: String,
	#[serde(default)]
	pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
	pub component: String,
	#[serde(default)]
	pub quantity: u32,
	#[serde(default)]
	pub estimated_price: String,
	#[serde(default)]
	pub source: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
	#[serde(default)]
	pub items: Vec<BomItem>,
	#[serde(default)]
	pub total_estimated_cost: String,
	#[serde(default)]
	pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SaveRequest {
	pub query: String,
	pub diagram_data: Diagram,
	pub code: String,
	pub bom: Vec<BomItem>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SaveResponse {
	pub id: String,
}

/// A circuit loaded back by id.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SavedCircuit {
	#[serde(default)]
	pub id: Option<String>,
	pub query: String,
	pub diagram_data: Diagram,
	#[serde(default)]
	pub code: Option<String>,
	#[serde(default)]
	pub bom: Option<Vec<BomItem>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RecentCircuit {
	pub id: String,
	pub query: String,
	#[serde(default)]
	pub created_at: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccessToken {
	pub access_token: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials<'a> {
	pub email: &'a str,
	pub password: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserProfile {
	pub email: String,
	#[serde(default)]
	pub id: Option<i64>,
}

/// Image URLs of a library entry. The backend stores either nothing, one
/// URL or a list; this is always a list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageUrls(pub Vec<String>);

impl ImageUrls {
	pub fn first(&self) -> Option<&str> {
		self.0.first().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}

impl<'de> Deserialize<'de> for ImageUrls {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			One(String),
			Many(Vec<String>),
		}

		let urls = match Option::<Raw>::deserialize(deserializer)? {
			None => Vec::new(),
			Some(Raw::One(url)) => vec![url],
			Some(Raw::Many(urls)) => urls,
		};
		Ok(ImageUrls(
			urls.into_iter().filter(|u| !u.trim().is_empty()).collect(),
		))
	}
}

/// An entry of the component library.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Component {
	pub id: i64,
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub wiring_guide: Option<String>,
	#[serde(default)]
	pub image_url: ImageUrls,
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Body of a component create or update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ComponentDraft {
	pub name: String,
	pub category: String,
	pub description: String,
	pub wiring_guide: Option<String>,
	pub image_url: ImageUrls,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComponentDetailsRequest<'a> {
	pub name: &'a str,
	pub category: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ComponentDetails {
	pub description: String,
	pub wiring_guide: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PasswordCheck<'a> {
	pub password: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadResponse {
	pub url: String,
}

/// One module of the AI course curriculum.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CourseModule {
	pub id: i64,
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub week: Option<u32>,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default)]
	pub image_url: ImageUrls,
}

#[derive(Deserialize)]
struct ErrorBody {
	detail: serde_json::Value,
}

/// Human-readable message out of an error response body. FastAPI puts it
/// in `detail`, sometimes as a string and sometimes as validation objects.
pub fn error_detail(body: &str) -> String {
	match serde_json::from_str::<ErrorBody>(body) {
		Ok(ErrorBody {
			detail: serde_json::Value::String(s),
		}) => s,
		Ok(ErrorBody { detail }) => detail.to_string(),
		Err(_) if body.trim().is_empty() => "no details".to_string(),
		Err(_) => body.trim().to_string(),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn urls(json: &str) -> ImageUrls {
		#[derive(Deserialize)]
		struct Wrapper {
			#[serde(default)]
			image_url: ImageUrls,
		}
		serde_json::from_str::<Wrapper>(json).unwrap().image_url
	}

	#[test]
	fn image_url_shapes_normalize_to_a_list() {
		assert_eq!(urls("{}"), ImageUrls(vec![]));
		assert_eq!(urls(r#"{"image_url": null}"#), ImageUrls(vec![]));
		assert_eq!(urls(r#"{"image_url": ""}"#), ImageUrls(vec![]));
		assert_eq!(urls(r#"{"image_url": "a.png"}"#), ImageUrls(vec!["a.png".into()]));
		assert_eq!(
			urls(r#"{"image_url": ["a.png", "b.png"]}"#),
			ImageUrls(vec!["a.png".into(), "b.png".into()])
		);
	}

	#[test]
	fn image_urls_serialize_as_array() {
		let draft = ComponentDraft {
			name: "Servo".into(),
			image_url: ImageUrls(vec!["s.png".into()]),
			..Default::default()
		};
		let json = serde_json::to_value(&draft).unwrap();
		assert_eq!(json["image_url"], serde_json::json!(["s.png"]));
	}

	#[test]
	fn component_parses_single_image() {
		let c: Component = serde_json::from_str(
			r#"{"id": 3, "name": "HC-SR04", "description": "Ultrasonic", "category": "Sensor",
			    "wiring_guide": null, "image_url": "https://img/x.jpg", "created_at": "2026-01-02T00:00:00"}"#,
		)
		.unwrap();
		assert_eq!(c.image_url.first(), Some("https://img/x.jpg"));
		assert_eq!(c.wiring_guide, None);
	}

	#[test]
	fn bom_defaults() {
		let bom: BillOfMaterials = serde_json::from_str(
			r#"{"items": [{"component": "Arduino UNO R3", "quantity": 1, "estimated_price": "$24.95"}],
			    "total_estimated_cost": "$24.95"}"#,
		)
		.unwrap();
		assert_eq!(bom.items[0].source, "");
		assert_eq!(bom.notes, None);
	}

	#[test]
	fn error_detail_variants() {
		assert_eq!(error_detail(r#"{"detail": "Circuit not found"}"#), "Circuit not found");
		assert_eq!(error_detail(r#"{"detail": [{"loc": ["body"]}]}"#), r#"[{"loc":["body"]}]"#);
		assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
		assert_eq!(error_detail(""), "no details");
	}
}
