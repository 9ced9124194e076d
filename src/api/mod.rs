pub mod client;
pub mod types;

pub use client::MusicClient;
pub use types::{Album, Artist, Playlist, TimeRange, Track, UserProfile};
