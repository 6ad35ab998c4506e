// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Highlight states reported by the matching runtime.

/// How the matching runtime currently sees a hook.
///
/// Any state may follow any other; the runtime is the only source of truth.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HookHighlight {
    /// Nothing grabbable is near.
    #[default]
    None,
    /// A grabbable that could attach is within range.
    InRange,
    /// A grab is in progress somewhere and this hook is a candidate.
    GrabInProgress,
    /// Something is already attached.
    Occupied,
}

impl HookHighlight {
    /// Decodes a raw wire value.
    ///
    /// Unrecognized values decode to [`HookHighlight::None`].
    ///
    /// ```
    /// use understory_hook::HookHighlight;
    ///
    /// assert_eq!(HookHighlight::from_raw(2), HookHighlight::GrabInProgress);
    /// assert_eq!(HookHighlight::from_raw(200), HookHighlight::None);
    /// ```
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::InRange,
            2 => Self::GrabInProgress,
            3 => Self::Occupied,
            _ => Self::None,
        }
    }

    /// The raw wire value.
    #[must_use]
    pub const fn to_raw(self) -> u8 {
        match self {
            Self::None => 0,
            Self::InRange => 1,
            Self::GrabInProgress => 2,
            Self::Occupied => 3,
        }
    }

    /// Returns `true` for states that show the affordance regardless of edit mode.
    #[must_use]
    pub const fn invites_attachment(self) -> bool {
        matches!(self, Self::InRange | Self::GrabInProgress)
    }
}

impl From<u8> for HookHighlight {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_decode() {
        for h in [
            HookHighlight::None,
            HookHighlight::InRange,
            HookHighlight::GrabInProgress,
            HookHighlight::Occupied,
        ] {
            assert_eq!(HookHighlight::from_raw(h.to_raw()), h);
        }
        assert_eq!(HookHighlight::from(4), HookHighlight::None);
        assert_eq!(HookHighlight::from(u8::MAX), HookHighlight::None);
    }

    #[test]
    fn only_range_and_grab_invite() {
        assert!(!HookHighlight::None.invites_attachment());
        assert!(HookHighlight::InRange.invites_attachment());
        assert!(HookHighlight::GrabInProgress.invites_attachment());
        assert!(!HookHighlight::Occupied.invites_attachment());
    }
}
