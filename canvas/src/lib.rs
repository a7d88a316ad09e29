//! Drawing canvas state for the sketch-to-image studio.
//!
//! This crate owns everything about the canvas that does not need a browser:
//! the raster surface, its snapshot history, stroke capture from pointer
//! events, and the generation request lifecycle. Hosts (the HTTP server, a
//! test, a future WASM shell) forward pointer events and settle generation
//! calls; the crate answers with [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`], the history and generation controller |
//! | [`surface`] | Raster surface, colors, PNG encode/decode |
//! | [`history`] | Snapshots and the linear undo/redo history |
//! | [`input`] | Pointer events, pen settings, stroke state |
//! | [`viewport`] | Display-to-surface coordinate mapping |
//! | [`similarity`] | Similarity level to prompt instruction mapping |
//! | [`generation`] | Request/outcome types and error-message rules |
//! | [`consts`] | Shared constants (surface size, pen limits, directives) |

pub mod consts;
pub mod engine;
pub mod generation;
pub mod history;
pub mod input;
pub mod similarity;
pub mod surface;
pub mod viewport;
