use crate::{Device, Error, PlaybackSnapshot, Result, Track};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

/// What to do with a `volume_percent` outside 0..=100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumePolicy {
    /// Clamp into range and log a warning.
    #[default]
    Clamp,
    /// Fail with [`Error::VolumeOutOfRange`].
    Reject,
}

impl FromStr for VolumePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("clamp") {
            Ok(VolumePolicy::Clamp)
        } else if s.eq_ignore_ascii_case("reject") {
            Ok(VolumePolicy::Reject)
        } else {
            Err(Error::UnknownPolicy(s.to_owned()))
        }
    }
}

#[derive(Deserialize)]
struct RawSnapshot {
    is_playing: bool,
    item: Track,
    #[serde(default)]
    device: Option<RawDevice>,
}

#[derive(Deserialize)]
struct RawDevice {
    #[serde(default)]
    volume_percent: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Parser {
    volume_policy: VolumePolicy,
}

/// Parses with the default [`VolumePolicy::Clamp`].
pub fn parse(raw: &Value) -> Result<PlaybackSnapshot> {
    Parser::default().parse(raw)
}

impl Parser {
    pub fn new(volume_policy: VolumePolicy) -> Parser {
        Parser { volume_policy }
    }

    pub fn volume_policy(&self) -> VolumePolicy {
        self.volume_policy
    }

    /// Builds a snapshot from decoded JSON.
    ///
    /// Extra fields are ignored. `device` may be absent or `null`, and so may
    /// `device.volume_percent`; everything under `item` is required.
    pub fn parse(&self, raw: &Value) -> Result<PlaybackSnapshot> {
        if !raw.is_object() {
            return Err(Error::ShapeMismatch(format!(
                "expected a JSON object, found {}",
                kind(raw)
            )));
        }
        require_objects(raw)?;
        let raw =
            RawSnapshot::deserialize(raw).map_err(|e| Error::ShapeMismatch(e.to_string()))?;
        if raw.item.artists.is_empty() {
            warn!(track = %raw.item.name, "track has no credited artists");
        }
        let device = match raw.device {
            Some(device) => Some(Device {
                volume_percent: device
                    .volume_percent
                    .map(|v| self.volume(v))
                    .transpose()?,
            }),
            None => None,
        };
        let snapshot = PlaybackSnapshot {
            is_playing: raw.is_playing,
            item: raw.item,
            device,
        };
        debug!(
            track = %snapshot.item.name,
            is_playing = snapshot.is_playing,
            volume_percent = ?snapshot.volume_percent(),
            "parsed playback snapshot"
        );
        Ok(snapshot)
    }

    /// Decodes JSON text, then parses it. Malformed text is [`Error::Json`].
    pub fn parse_slice(&self, bytes: &[u8]) -> Result<PlaybackSnapshot> {
        let raw: Value = serde_json::from_slice(bytes)?;
        self.parse(&raw)
    }

    pub fn parse_str(&self, s: &str) -> Result<PlaybackSnapshot> {
        self.parse_slice(s.as_bytes())
    }

    fn volume(&self, raw: f64) -> Result<u8> {
        let rounded = raw.round();
        if (0.0..=100.0).contains(&rounded) {
            return Ok(rounded as u8);
        }
        match self.volume_policy {
            VolumePolicy::Clamp => {
                let clamped = raw.clamp(0.0, 100.0) as u8;
                warn!(volume_percent = raw, clamped, "volume_percent out of range");
                Ok(clamped)
            }
            VolumePolicy::Reject => Err(Error::VolumeOutOfRange(raw)),
        }
    }
}

/// Derived struct decoding also reads JSON arrays positionally, so every node
/// the contract expects to be an object is checked before the typed decode.
/// Absent and `null` nodes are left to the decode itself.
fn require_objects(raw: &Value) -> Result<()> {
    require_object(raw.get("device"), "device")?;
    let item = raw.get("item");
    require_object(item, "item")?;
    let Some(item) = item else {
        return Ok(());
    };
    if let Some(Value::Array(artists)) = item.get("artists") {
        for (i, artist) in artists.iter().enumerate() {
            require_object(Some(artist), &format!("item.artists[{}]", i))?;
        }
    }
    let album = item.get("album");
    require_object(album, "item.album")?;
    if let Some(Value::Array(images)) = album.and_then(|a| a.get("images")) {
        for (i, image) in images.iter().enumerate() {
            require_object(Some(image), &format!("item.album.images[{}]", i))?;
        }
    }
    Ok(())
}

fn require_object(value: Option<&Value>, path: &str) -> Result<()> {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(()),
        Some(other) => Err(Error::ShapeMismatch(format!(
            "expected `{}` to be an object, found {}",
            path,
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
