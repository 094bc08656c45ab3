//! Playback state types

use crate::asset::Arch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlaybackState {
    /// No sequence loaded, or the loaded sequence was empty.
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "ready")]
    Ready,
    #[serde(rename = "playing")]
    Playing,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Ready => write!(f, "ready"),
            PlaybackState::Playing => write!(f, "playing"),
        }
    }
}

/// Which arches are shown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Visibility {
    #[serde(rename = "maxillary")]
    Maxillary,
    #[serde(rename = "mandibular")]
    Mandibular,
    #[serde(rename = "both")]
    Both,
}

impl Visibility {
    pub fn shows(&self, arch: Arch) -> bool {
        match self {
            Visibility::Both => true,
            Visibility::Maxillary => arch == Arch::Maxillary,
            Visibility::Mandibular => arch == Arch::Mandibular,
        }
    }
}

/// Point-in-time view of a controller, for a UI shell.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub index: usize,
    pub len: usize,
    pub visibility: Visibility,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_selects_arches() {
        assert!(Visibility::Both.shows(Arch::Maxillary));
        assert!(Visibility::Both.shows(Arch::Mandibular));
        assert!(Visibility::Maxillary.shows(Arch::Maxillary));
        assert!(!Visibility::Maxillary.shows(Arch::Mandibular));
        assert!(!Visibility::Mandibular.shows(Arch::Maxillary));
    }
}
