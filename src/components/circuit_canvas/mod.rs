mod component;
mod export;
mod render;
mod state;

pub use component::CircuitCanvas;
pub use export::export_png;
