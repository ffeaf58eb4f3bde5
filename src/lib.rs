// exl-player library - the pieces behind the player window
// Store, cursor and playback session stay separate; the controller ties them together

pub mod audio;       // playback session, backends, volume, file scanning
pub mod config;      // settings and file locations
pub mod controller;  // keeps store, cursor and session pointing at the same song
pub mod error;       // error types per concern
pub mod library;     // durable track list
pub mod navigation;  // wrap-around cursor
#[cfg(feature = "tui")]
pub mod ui;          // terminal interface

// Export the stuff other modules actually use
pub use audio::{PlaybackBackend, PlaybackSession, PlaybackStatus, Track, Volume, VolumeFile};
pub use config::Config;
pub use controller::{Controller, PlayerEvent};
pub use error::{LoadError, StoreError};
pub use library::TrackStore;
pub use navigation::{Direction, Navigator};
