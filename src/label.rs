use core::cmp::Ordering;
use core::fmt;

use bytemuck::{Pod, Zeroable};

/// Compact Monte-Carlo truth reference: which simulated track of which
/// event from which source produced a hit.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct McLabel {
    track_id: i32,
    event_id: i32,
    source_id: i32,
}

const _LABEL_SIZE_CHECK: () = assert!(
    core::mem::size_of::<McLabel>() == 12,
    "McLabel must stay 12 bytes"
);

impl McLabel {
    /// Label that refers to nothing.
    pub const INVALID: Self = Self {
        track_id: -1,
        event_id: -1,
        source_id: -1,
    };

    const NOISE_TRACK: i32 = -2;

    /// Label pointing at one simulated track.
    #[must_use]
    pub const fn new(track_id: i32, event_id: i32, source_id: i32) -> Self {
        Self {
            track_id,
            event_id,
            source_id,
        }
    }

    /// Label for a signal not caused by any simulated track.
    #[must_use]
    pub const fn noise(event_id: i32, source_id: i32) -> Self {
        Self::new(Self::NOISE_TRACK, event_id, source_id)
    }

    /// Track number inside the event, or a negative marker.
    #[must_use]
    pub const fn track_id(&self) -> i32 {
        self.track_id
    }

    /// Event number.
    #[must_use]
    pub const fn event_id(&self) -> i32 {
        self.event_id
    }

    /// Source (input stream) number.
    #[must_use]
    pub const fn source_id(&self) -> i32 {
        self.source_id
    }

    /// True for labels made by [`noise`](Self::noise).
    #[must_use]
    pub const fn is_noise(&self) -> bool {
        self.track_id == Self::NOISE_TRACK
    }

    /// True for labels that point at a track or are explicit noise.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.track_id >= 0 || self.is_noise()
    }
}

impl Default for McLabel {
    fn default() -> Self {
        Self::INVALID
    }
}

// Source first, then event, then track.
impl Ord for McLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.source_id, self.event_id, self.track_id).cmp(&(
            other.source_id,
            other.event_id,
            other.track_id,
        ))
    }
}

impl PartialOrd for McLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(i32, i32, i32)> for McLabel {
    fn from((track_id, event_id, source_id): (i32, i32, i32)) -> Self {
        Self::new(track_id, event_id, source_id)
    }
}

impl fmt::Display for McLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noise() {
            write!(f, "[{}/{}/noise]", self.source_id, self.event_id)
        } else {
            write!(f, "[{}/{}/{}]", self.source_id, self.event_id, self.track_id)
        }
    }
}
