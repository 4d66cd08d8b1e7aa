/// Start-up configuration for a [`crate::CommandDebugger`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DebuggerConfig {
    /// Initial primitive restriction rule. Empty means no restriction.
    pub restrict_prims: String,
    /// Break on the very first command the interpreter dispatches.
    pub break_on_start: bool,
}
