//! Authentication state and request bookkeeping shared across pages.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gloo::storage::{LocalStorage, Storage};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use crate::api::{ApiClient, UserProfile};
use crate::config::{ApiConfig, TOKEN_STORAGE_KEY};
use crate::error::AppError;

/// Persistent home of the bearer token.
pub trait TokenStore {
	fn load(&self) -> Option<String>;
	fn store(&self, token: &str) -> Result<(), AppError>;
	fn clear(&self);
}

/// Token kept in the browser's local storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
	fn load(&self) -> Option<String> {
		LocalStorage::get::<String>(TOKEN_STORAGE_KEY)
			.ok()
			.filter(|t| !t.is_empty())
	}

	fn store(&self, token: &str) -> Result<(), AppError> {
		LocalStorage::set(TOKEN_STORAGE_KEY, token)?;
		Ok(())
	}

	fn clear(&self) {
		LocalStorage::delete(TOKEN_STORAGE_KEY);
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum AuthState {
	/// Stored token is being checked against `/me`.
	#[default]
	Checking,
	Anonymous,
	Authenticated { token: String, user: UserProfile },
}

impl AuthState {
	pub fn token(&self) -> Option<&str> {
		match self {
			AuthState::Authenticated { token, .. } => Some(token),
			_ => None,
		}
	}

	pub fn email(&self) -> Option<&str> {
		match self {
			AuthState::Authenticated { user, .. } => Some(&user.email),
			_ => None,
		}
	}
}

/// Settles the session once `/me` has answered for `token`. A rejected or
/// failed check forgets the token.
pub fn resolve_whoami(
	store: &impl TokenStore,
	token: String,
	whoami: Result<UserProfile, AppError>,
) -> AuthState {
	match whoami {
		Ok(user) => AuthState::Authenticated { token, user },
		Err(err) => {
			warn!("stored session rejected: {err}");
			store.clear();
			AuthState::Anonymous
		}
	}
}

/// App-wide session, provided as context by the root component.
#[derive(Clone, Debug)]
pub struct Session {
	pub auth: RwSignal<AuthState>,
	pub api: ApiClient,
}

impl Session {
	pub fn new(config: &ApiConfig) -> Self {
		Self {
			auth: RwSignal::new(AuthState::Checking),
			api: ApiClient::new(config),
		}
	}

	/// Checks a previously stored token, if any.
	pub fn restore(&self) {
		let Some(token) = BrowserTokenStore.load() else {
			self.auth.set(AuthState::Anonymous);
			return;
		};
		self.verify(token);
	}

	/// Persists a freshly issued token and loads the matching profile.
	pub fn sign_in(&self, token: String) {
		if let Err(err) = BrowserTokenStore.store(&token) {
			warn!("could not persist token: {err}");
		}
		self.verify(token);
	}

	pub fn sign_out(&self) {
		BrowserTokenStore.clear();
		self.auth.set(AuthState::Anonymous);
		info!("signed out");
	}

	fn verify(&self, token: String) {
		let (api, auth) = (self.api.clone(), self.auth);
		auth.set(AuthState::Checking);
		spawn_local(async move {
			let whoami = api.me(&token).await;
			let state = resolve_whoami(&BrowserTokenStore, token, whoami);
			if let Some(email) = state.email() {
				info!("session restored for {email}");
			}
			auth.set(state);
		});
	}

	pub fn is_authenticated(&self) -> bool {
		self.auth.with(|a| a.token().is_some())
	}

	pub fn token(&self) -> Option<String> {
		self.auth.with(|a| a.token().map(str::to_owned))
	}
}

/// Session from context. Panics outside `App`.
pub fn use_session() -> Session {
	expect_context::<Session>()
}

/// Monotonic request generations. Beginning a new one supersedes every
/// ticket handed out before it.
#[derive(Clone, Debug, Default)]
pub struct GenerationEpoch(Arc<AtomicU64>);

impl GenerationEpoch {
	pub fn begin(&self) -> u64 {
		self.0.fetch_add(1, Ordering::SeqCst) + 1
	}

	pub fn is_current(&self, ticket: u64) -> bool {
		self.0.load(Ordering::SeqCst) == ticket
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use pretty_assertions::assert_eq;

	use super::*;

	#[derive(Default)]
	struct MemoryStore(RefCell<Option<String>>);

	impl TokenStore for MemoryStore {
		fn load(&self) -> Option<String> {
			self.0.borrow().clone()
		}

		fn store(&self, token: &str) -> Result<(), AppError> {
			*self.0.borrow_mut() = Some(token.to_owned());
			Ok(())
		}

		fn clear(&self) {
			*self.0.borrow_mut() = None;
		}
	}

	fn profile() -> UserProfile {
		UserProfile {
			email: "maker@example.com".into(),
			id: Some(7),
		}
	}

	#[test]
	fn accepted_token_is_kept() {
		let store = MemoryStore::default();
		store.store("abc").unwrap();
		let state = resolve_whoami(&store, "abc".into(), Ok(profile()));
		assert_eq!(
			state,
			AuthState::Authenticated {
				token: "abc".into(),
				user: profile()
			}
		);
		assert_eq!(state.token(), Some("abc"));
		assert_eq!(store.load().as_deref(), Some("abc"));
	}

	#[test]
	fn rejected_token_is_forgotten() {
		let store = MemoryStore::default();
		store.store("stale").unwrap();
		let err = AppError::Status {
			status: 401,
			message: "Could not validate credentials".into(),
		};
		assert!(err.is_unauthorized());
		let state = resolve_whoami(&store, "stale".into(), Err(err));
		assert_eq!(state, AuthState::Anonymous);
		assert_eq!(store.load(), None);
	}

	#[test]
	fn network_failure_also_signs_out() {
		let store = MemoryStore::default();
		store.store("abc").unwrap();
		let state = resolve_whoami(&store, "abc".into(), Err(AppError::Js("offline".into())));
		assert_eq!(state.email(), None);
		assert_eq!(store.load(), None);
	}

	#[test]
	fn newer_generation_supersedes_older() {
		let epoch = GenerationEpoch::default();
		let first = epoch.begin();
		assert!(epoch.is_current(first));
		let shared = epoch.clone();
		let second = shared.begin();
		assert!(!epoch.is_current(first));
		assert!(epoch.is_current(second));
	}
}
