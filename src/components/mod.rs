//! Reusable view components.

pub mod auth_modal;
pub mod circuit_canvas;
pub mod history_drawer;
pub mod result_panels;
