pub mod selection;
pub mod servers;
pub mod watch;

use reelgrid_core::ViewError;
use thiserror::Error;

pub use selection::PlaybackSelection;
pub use servers::{PlaybackServer, ResolvedServer, SERVERS};
pub use watch::WatchContext;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    /// The watch page was opened without a usable `type` and `id`.
    #[error("missing or invalid media reference")]
    MissingReference,
}

impl From<WatchError> for ViewError {
    fn from(e: WatchError) -> Self {
        ViewError::ContentNotFound(e.to_string())
    }
}
