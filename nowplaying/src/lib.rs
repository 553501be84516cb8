//! Typed contract for the "currently playing" response of a playback API.
//!
//! Untyped JSON goes in through [`parse`] (or a configured [`Parser`]) and a
//! [`PlaybackSnapshot`] comes out. Both the full shape (with `device`) and the
//! reduced shape (without it) are accepted.

mod error;
mod parser;

pub use error::{Error, Result};
pub use parser::{parse, Parser, VolumePolicy};

use serde::{Deserialize, Serialize};

/// One point-in-time read of playback state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub item: Track,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
}

impl PlaybackSnapshot {
    pub fn volume_percent(&self) -> Option<u8> {
        self.device.and_then(|d| d.volume_percent)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Track {
    pub name: String,
    pub album: Album,
    pub artists: Vec<Artist>,
}

impl Track {
    /// Artist names in the provider's credited order.
    pub fn artist_names(&self) -> Vec<&str> {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn credited_artists(&self) -> String {
        self.artist_names().join(", ")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Album {
    pub name: String,
    pub images: Vec<Image>,
}

impl Album {
    /// Providers list artwork largest-first, so this is the biggest variant.
    /// `None` when the album has no artwork.
    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Image {
    pub url: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_percent: Option<u8>,
}
