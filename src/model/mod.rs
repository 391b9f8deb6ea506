//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod gallery_item;
pub mod identifiers;
pub mod key_action;

// Re-export for convenience
pub use error::{AppError, FetchError, LayoutError};
pub use gallery_item::GalleryItem;
pub use identifiers::{InvalidTabId, TabId};
pub use key_action::KeyAction;
