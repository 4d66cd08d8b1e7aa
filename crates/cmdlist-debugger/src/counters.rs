/// Per-frame primitive submission counters.
///
/// The frame boundary is detected from an opaque flip token supplied by the
/// host: any change of token starts a new frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FrameCounters {
    prims_this_frame: u32,
    prims_last_frame: u32,
    current_flip: Option<u32>,
}

impl FrameCounters {
    /// Creates zeroed counters with no frame observed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prims_this_frame: 0,
            prims_last_frame: 0,
            current_flip: None,
        }
    }

    /// Records the host's current flip token.
    ///
    /// Returns true when the token differs from the last one observed, in
    /// which case this frame's count is moved to the last-frame slot and
    /// restarted from zero.
    pub fn observe_flip(&mut self, flip: u32) -> bool {
        if self.current_flip == Some(flip) {
            return false;
        }
        self.prims_last_frame = self.prims_this_frame;
        self.prims_this_frame = 0;
        self.current_flip = Some(flip);
        true
    }

    /// Counts one primitive submission and returns its 1-based ordinal
    /// within the frame.
    #[allow(clippy::missing_const_for_fn)]
    pub fn count_prim(&mut self) -> u32 {
        self.prims_this_frame = self.prims_this_frame.saturating_add(1);
        self.prims_this_frame
    }

    /// Primitives submitted so far in the current frame.
    #[must_use]
    pub const fn prims_this_frame(&self) -> u32 {
        self.prims_this_frame
    }

    /// Primitives submitted in the previous frame.
    #[must_use]
    pub const fn prims_last_frame(&self) -> u32 {
        self.prims_last_frame
    }

    /// Last flip token observed, if any.
    #[must_use]
    pub const fn current_flip(&self) -> Option<u32> {
        self.current_flip
    }
}
