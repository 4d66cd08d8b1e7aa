//! Command-word classification for the display-list stream.
//!
//! Each command is a 32-bit word whose top byte selects the command; the low
//! 24 bits are the argument. Only the handful of kinds the debugger reacts to
//! are named, everything else is carried as [`CommandKind::Other`].

/// Direct primitive draw.
pub const CMD_PRIM: u8 = 0x04;
/// Bezier patch submission.
pub const CMD_BEZIER: u8 = 0x05;
/// Spline patch submission.
pub const CMD_SPLINE: u8 = 0x06;
/// Batched vertex-array primitive submission.
pub const CMD_VAP: u8 = 0xF0;

/// Opcodes that submit primitives and advance the per-frame prim counter.
pub const PRIM_SUBMIT_CMDS: [u8; 4] = [CMD_PRIM, CMD_BEZIER, CMD_SPLINE, CMD_VAP];

/// Opcodes that submit curved surface patches.
pub const CURVE_CMDS: [u8; 2] = [CMD_BEZIER, CMD_SPLINE];

/// Debugger-relevant classification of a command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CommandKind {
    /// Direct primitive draw (`PRIM`).
    Prim,
    /// Bezier patch (`BEZIER`).
    Bezier,
    /// Spline patch (`SPLINE`).
    Spline,
    /// Batched vertex-array primitive (`VAP`).
    VertexArrayPrim,
    /// Texture address, buffer width, size or format state.
    TextureState,
    /// Any other command, carrying its opcode.
    Other(u8),
}

impl CommandKind {
    /// Classifies a bare opcode byte.
    #[must_use]
    pub const fn from_opcode(op: u8) -> Self {
        match op {
            CMD_PRIM => Self::Prim,
            CMD_BEZIER => Self::Bezier,
            CMD_SPLINE => Self::Spline,
            CMD_VAP => Self::VertexArrayPrim,
            0xA0..=0xAF | 0xB8..=0xBF | 0xC3 => Self::TextureState,
            other => Self::Other(other),
        }
    }

    /// Classifies a full 32-bit command word.
    #[must_use]
    pub const fn from_word(word: u32) -> Self {
        Self::from_opcode(opcode_of(word))
    }

    /// Returns true for the primitive-submitting kinds counted per frame.
    #[must_use]
    pub const fn is_countable(self) -> bool {
        matches!(
            self,
            Self::Prim | Self::Bezier | Self::Spline | Self::VertexArrayPrim
        )
    }

    /// Returns true for curved surface patches.
    #[must_use]
    pub const fn is_curve(self) -> bool {
        matches!(self, Self::Bezier | Self::Spline)
    }
}

/// Extracts the opcode byte (bits 31..24) from a command word.
#[must_use]
pub const fn opcode_of(word: u32) -> u8 {
    (word >> 24) as u8
}
