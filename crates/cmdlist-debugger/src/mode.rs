use std::fmt;
use std::str::FromStr;

use crate::ParseBreakModeError;

/// Pending break condition for the command stream.
///
/// Exactly one mode is active at a time; [`BreakMode::None`] runs freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BreakMode {
    /// No break pending.
    #[default]
    None,
    /// Break on the very next command.
    SingleOp,
    /// Break on the first primitive after the next flush.
    Draw,
    /// Break on the next texture state change.
    TextureChange,
    /// Break on the next non-texture state change.
    NonTextureChange,
    /// Start single-stepping at the first command of the next frame.
    Frame,
    /// Start single-stepping once the next vertical sync completes.
    VSync,
    /// Break on the next primitive submission.
    Prim,
    /// Break on the next Bezier or spline submission.
    Curve,
    /// Break when the per-frame primitive counter reaches the break target.
    Count,
}

impl BreakMode {
    /// All modes in declaration order.
    pub const ALL: [Self; 10] = [
        Self::None,
        Self::SingleOp,
        Self::Draw,
        Self::TextureChange,
        Self::NonTextureChange,
        Self::Frame,
        Self::VSync,
        Self::Prim,
        Self::Curve,
        Self::Count,
    ];

    /// Short display name, as shown by debugger front ends.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::SingleOp => "OP",
            Self::Draw => "DRAW",
            Self::TextureChange => "TEX",
            Self::NonTextureChange => "NONTEX",
            Self::Frame => "FRAME",
            Self::VSync => "VSYNC",
            Self::Prim => "PRIM",
            Self::Curve => "CURVE",
            Self::Count => "COUNT",
        }
    }

    /// Whether the interpreter must route every command through the debugger.
    ///
    /// Any pending break needs per-command notification; only `None` lets
    /// the interpreter take its fast path.
    #[must_use]
    pub const fn needs_slow_path(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for BreakMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BreakMode {
    type Err = ParseBreakModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseBreakModeError(s.to_owned()))
    }
}
