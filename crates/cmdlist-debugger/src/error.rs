use thiserror::Error;

/// Reason a single restrict-rule token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TokenFault {
    /// Token was empty (for example `1,,2` or a bare `!`).
    Empty,
    /// Token was not `N` or `N1-N2` in unsigned decimal.
    InvalidNumber,
    /// A number did not fit the primitive counter width.
    Overflow,
}

impl TokenFault {
    /// Short human-readable description used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Empty => "empty token",
            Self::InvalidNumber => "expected N or N1-N2",
            Self::Overflow => "number out of range",
        }
    }
}

/// Rejection of a primitive restriction rule.
///
/// A rejected rule is never partially applied; the previously committed
/// filter stays active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("invalid restrict token `{token}`: {}", .fault.describe())]
pub struct RestrictRuleError {
    /// Offending token exactly as it appeared between separators.
    pub token: String,
    /// Why the token failed to parse.
    pub fault: TokenFault,
}

impl RestrictRuleError {
    pub(crate) fn new(token: &str, fault: TokenFault) -> Self {
        Self {
            token: token.to_owned(),
            fault,
        }
    }
}

/// Returned when a break mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown break mode `{0}`")]
pub struct ParseBreakModeError(pub String);
