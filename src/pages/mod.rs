pub mod admin;
pub mod home;
pub mod maker;
pub mod not_found;
pub mod study;
pub mod success;
