pub mod config;
pub mod document;
pub mod error;
pub mod id;
pub mod model;
pub mod property;
pub mod scene;
pub mod style;

pub use config::EditorConfig;
pub use document::{LayoutDocument, now_millis};
pub use error::ModelError;
pub use id::ElementId;
pub use model::*;
pub use property::Property;
pub use scene::{CanvasSize, Scene};
pub use style::{StyleDescriptor, render_attributes_for};

// Re-export kurbo so downstream crates share one geometry type set
pub use kurbo;
