#![allow(clippy::should_implement_trait)]
pub mod error;
pub mod types;

pub use error::ViewError;
pub use types::{CastMember, Episode, MediaItem, MediaKind, MediaRef, Season, Trailer};
