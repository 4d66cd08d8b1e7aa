//! Breakpoint and stepping control for display-list command interpreters.

/// Command-word classification tables.
pub mod command;
pub use command::{
    opcode_of, CommandKind, CMD_BEZIER, CMD_PRIM, CMD_SPLINE, CMD_VAP, CURVE_CMDS,
    PRIM_SUBMIT_CMDS,
};

/// Error types for rule and mode parsing.
pub mod error;
pub use error::{ParseBreakModeError, RestrictRuleError, TokenFault};

/// Break mode enumeration and display names.
pub mod mode;
pub use mode::BreakMode;

/// Primitive restriction rule compiler and filter.
pub mod filter;
pub use filter::{compile_rule, is_clear_rule, PrimFilter, PrimRange, MAX_PRIM_COUNT};

/// Per-frame primitive counters.
pub mod counters;
pub use counters::FrameCounters;

/// Collaborator capability traits consumed by the debugger.
pub mod host;
pub use host::{BreakpointStore, CommandHost, Stepper};

/// In-memory breakpoint store.
pub mod breakpoints;
pub use breakpoints::BreakpointSet;

/// Blocking stepping gate.
pub mod stepping;
pub use stepping::StepGate;

/// Start-up configuration.
pub mod config;
pub use config::DebuggerConfig;

/// Per-command break decision engine.
pub mod debugger;
pub use debugger::{CommandDebugger, DebuggerStatus, NotifyResult};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
