//! Photobooth Model
//!
//! Defines the core data contracts shared by capture and compositing:
//! - **Frame:** an immutable captured RGB image
//! - **Transform:** mirror flag and stylistic filter applied at capture
//! - **PhotoSet:** the fixed-size set of slots a session fills
//! - **Template:** photo count and arrangement, plus the device class
//! - **Background:** solid frame color or texture behind the photos
//! - **Geometry:** cell and crop rectangles used by the layout engine

pub mod background;
pub mod filter;
pub mod frame;
pub mod geometry;
pub mod photo_set;
pub mod template;

pub use background::*;
pub use filter::*;
pub use frame::*;
pub use geometry::*;
pub use photo_set::*;
pub use template::*;
