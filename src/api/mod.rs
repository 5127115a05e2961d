//! Backend HTTP endpoints.

mod client;
mod types;

pub use client::ApiClient;
pub use types::{
	BillOfMaterials, BomItem, Component, ComponentDetails, ComponentDraft, CourseModule,
	FirmwareCode, ImageUrls, RecentCircuit, SaveRequest, SavedCircuit, UserProfile, error_detail,
};
