//! Circuit graph model and the pure placement, pin and editing logic that
//! turns it into something drawable.

pub mod block;
pub mod edges;
pub mod editor;
pub mod layout;
pub mod pins;
pub mod route;
mod types;
mod visual;

pub use types::{CircuitNode, Connection, Diagram, DiagramIssue, NodeKind, WireColor};
pub use visual::{EdgeStyle, NodeRenderData, Point, Rect, VisualEdge, VisualNode};
