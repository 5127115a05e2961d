//! Saving the canvas as a PNG download.

use log::info;
use wasm_bindgen::JsCast;
use web_sys::{HtmlAnchorElement, HtmlCanvasElement};

use crate::config::EXPORT_FILE_NAME;
use crate::error::AppError;

/// Rasterizes `canvas` (background included) and hands it to the browser as
/// a download. Nothing is downloaded when any step fails.
pub fn export_png(canvas: &HtmlCanvasElement) -> Result<(), AppError> {
	let data_url = canvas.to_data_url_with_type("image/png")?;
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or(AppError::Unavailable("document"))?;
	let link: HtmlAnchorElement = document
		.create_element("a")?
		.dyn_into()
		.map_err(|_| AppError::Js("created element is not an anchor".into()))?;
	link.set_download(EXPORT_FILE_NAME);
	link.set_href(&data_url);
	link.click();
	info!("exported diagram as {EXPORT_FILE_NAME}");
	Ok(())
}
