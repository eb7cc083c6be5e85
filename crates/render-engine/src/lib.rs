//! Photobooth Render Engine
//!
//! Turns a complete photo set into the framed composite image and hands
//! it to export.
//!
//! # Pipeline
//!
//! ```text
//! PhotoSet ─────┐
//!               ├── per-slot center crop ──┐
//! LayoutSpec ───┘                          │
//!                                          ├── Composite raster (logical × density)
//! Background ── decode (texture) ──────────┘         │
//!                                                    ▼
//!                                       RenderScheduler (latest wins)
//!                                                    │
//!                                                    ▼
//!                                             photobooth.png
//! ```

pub mod compositor;
pub mod decode;
pub mod export;
pub mod scheduler;

pub use compositor::*;
pub use decode::*;
pub use export::*;
pub use scheduler::*;
