//! Presentation Layer
//!
//! Session-aware decisions the views consume: which navigation pages to offer
//! and what error text to show.

pub mod feedback;
pub mod navigation;

pub use feedback::{FormError, SnackKind, SnackMessage, UNKNOWN_ERROR_MESSAGE};
pub use navigation::{HeaderBinding, HeaderModel, Page};
