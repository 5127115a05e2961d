//! Browser-only checks. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use wiring_canvas::api::UserProfile;
use wiring_canvas::error::AppError;
use wiring_canvas::session::{AuthState, BrowserTokenStore, TokenStore, resolve_whoami};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn token_survives_in_local_storage() {
	let store = BrowserTokenStore;
	store.clear();
	assert_eq!(store.load(), None);
	store.store("jwt-abc").unwrap();
	assert_eq!(store.load().as_deref(), Some("jwt-abc"));
	store.clear();
	assert_eq!(store.load(), None);
}

#[wasm_bindgen_test]
fn rejected_whoami_clears_the_stored_token() {
	let store = BrowserTokenStore;
	store.store("expired").unwrap();
	let rejected: Result<UserProfile, AppError> = Err(AppError::Status {
		status: 401,
		message: "Could not validate credentials".into(),
	});
	assert_eq!(resolve_whoami(&store, "expired".into(), rejected), AuthState::Anonymous);
	assert_eq!(store.load(), None);
}
