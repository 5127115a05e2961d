//! Markdown to HTML for library descriptions and course content.

use pulldown_cmark::{Event, Options, Parser, html};
use pulldown_cmark_escape::escape_html;

/// Renders `source` as HTML. Raw HTML in the source is shown as text, never
/// injected.
pub fn to_html(source: &str) -> String {
	let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
	let parser = Parser::new_ext(source, options).map(|event| match event {
		Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
		other => other,
	});
	let mut out = String::with_capacity(source.len() * 3 / 2);
	html::push_html(&mut out, parser);
	out
}

/// Escapes text for interpolation into HTML.
pub fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	// Writing into a String never fails.
	let _ = escape_html(&mut out, text);
	out
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn renders_common_markdown() {
		let html = to_html("## Wiring\n\n- **VCC** to `5V`\n- GND to GND\n");
		assert!(html.contains("<h2>Wiring</h2>"));
		assert!(html.contains("<li><strong>VCC</strong> to <code>5V</code></li>"));
	}

	#[test]
	fn raw_html_is_neutralized() {
		let html = to_html("hello <script>alert(1)</script>");
		assert!(!html.contains("<script>"));
		assert!(html.contains("&lt;script&gt;"));
	}

	#[test]
	fn escape_covers_markup_characters() {
		assert_eq!(escape(r#"<a href="x">Tom & Jerry's</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;");
		assert_eq!(escape("plain"), "plain");
	}
}
