//! Photobooth Layout Engine
//!
//! Pure geometry for the composite image:
//! - **Layout:** template + device class → grid of photo cells
//! - **Crop:** center crop of a source photo to a cell's aspect ratio
//! - **Density:** output pixel density for sharp exports
//!
//! Everything here is deterministic and free of I/O.

pub mod crop;
pub mod density;
pub mod layout;

pub use crop::*;
pub use density::*;
pub use layout::*;
