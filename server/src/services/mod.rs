//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own session bookkeeping, the generation round trip, and
//! theme persistence so route handlers can stay focused on protocol
//! translation.

pub mod generate;
pub mod session;
pub mod theme;
