use reelgrid_core::MediaRef;
use serde::Serialize;

use crate::servers::{self, PlaybackServer};

/// What the player is currently showing. Changing any field only changes
/// the URL; no catalog data is refetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackSelection {
    media: MediaRef,
    server_index: usize,
    season: u32,
    episode: u32,
    sandbox_enabled: bool,
}

impl PlaybackSelection {
    pub fn new(media: MediaRef) -> Self {
        Self {
            media,
            server_index: 0,
            season: 1,
            episode: 1,
            sandbox_enabled: servers::server(0).sandbox_supported,
        }
    }

    pub fn media(&self) -> MediaRef {
        self.media
    }

    pub fn server_index(&self) -> usize {
        self.server_index
    }

    pub fn server(&self) -> &'static PlaybackServer {
        servers::server(self.server_index)
    }

    pub fn season(&self) -> u32 {
        self.season
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn sandbox_enabled(&self) -> bool {
        self.sandbox_enabled
    }

    /// Switch server. The sandbox toggle falls back to the new server's
    /// capability, discarding any manual override.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a registry position.
    pub fn select_server(&mut self, index: usize) {
        let server = servers::server(index);
        self.server_index = index;
        self.sandbox_enabled = server.sandbox_supported;
    }

    /// Manual override, kept until the next server change.
    pub fn set_sandbox(&mut self, enabled: bool) {
        self.sandbox_enabled = enabled;
    }

    /// A new season always starts at episode 1.
    pub fn select_season(&mut self, season: u32) {
        self.season = season;
        self.episode = 1;
    }

    pub fn select_episode(&mut self, episode: u32) {
        self.episode = episode;
    }

    pub fn current_url(&self) -> String {
        self.server().url(self.media, self.season, self.episode)
    }
}

#[cfg(test)]
mod tests {
    use reelgrid_core::MediaKind;

    use super::*;
    use crate::SERVERS;

    fn show() -> PlaybackSelection {
        PlaybackSelection::new(MediaRef::new(MediaKind::Tv, 1396))
    }

    #[test]
    fn defaults_to_first_server_s1e1() {
        let sel = show();
        assert_eq!(sel.server_index(), 0);
        assert_eq!((sel.season(), sel.episode()), (1, 1));
        assert_eq!(sel.sandbox_enabled(), SERVERS[0].sandbox_supported);
        assert_eq!(sel.current_url(), "https://vidsrc.to/embed/tv/1396/1-1");
    }

    #[test]
    fn server_change_resets_sandbox_override() {
        let mut sel = show();
        // Server 2 supports sandboxing; turn it off by hand.
        sel.select_server(1);
        assert!(sel.sandbox_enabled());
        sel.set_sandbox(false);
        assert!(!sel.sandbox_enabled());

        // Moving to another sandbox-capable server restores the default.
        sel.select_server(2);
        assert!(sel.sandbox_enabled());

        // Override on a server without support survives until the next switch.
        sel.select_server(0);
        sel.set_sandbox(true);
        sel.select_episode(3);
        assert!(sel.sandbox_enabled());
        sel.select_server(0);
        assert!(!sel.sandbox_enabled());
    }

    #[test]
    fn season_change_resets_episode() {
        let mut sel = show();
        sel.select_episode(8);
        sel.select_season(3);
        assert_eq!((sel.season(), sel.episode()), (3, 1));
        sel.select_server(4);
        sel.select_episode(2);
        assert_eq!(sel.current_url(), "https://vidlink.pro/embed/tv/1396/3/2");
    }

    #[test]
    fn sandbox_does_not_change_the_url() {
        let mut sel = show();
        sel.select_server(1);
        let before = sel.current_url();
        sel.set_sandbox(false);
        assert_eq!(sel.current_url(), before);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn selecting_unknown_server_panics() {
        show().select_server(99);
    }
}
