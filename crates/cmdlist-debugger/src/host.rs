//! Capability contracts the debugger consumes from its embedding.
//!
//! The debugger never owns memory, breakpoint bookkeeping, or the blocking
//! side of interactive stepping; the interpreter hands these in per call.

/// Interpreter-side state read while classifying a command.
pub trait CommandHost {
    /// Reads the 32-bit command word at `addr`.
    fn read_command(&self, addr: u32) -> u32;

    /// Opaque frame token; any change marks a new frame.
    fn flip_count(&self) -> u32;

    /// Whether an interactive session can consume a break right now.
    ///
    /// Returns false while shutting down or with no debugger attached.
    fn session_active(&self) -> bool;
}

/// Address and opcode breakpoint predicate plus its temporary entries.
pub trait BreakpointStore {
    /// Returns true when any breakpoint, temporary or permanent, is set.
    fn has_breakpoints(&self) -> bool;

    /// Returns true when the command word `op` at `addr` should break.
    fn is_breakpoint(&self, addr: u32, op: u32) -> bool;

    /// Adds a breakpoint on every command with opcode `cmd`.
    fn add_cmd_breakpoint(&mut self, cmd: u8, temporary: bool);

    /// Adds a temporary breakpoint on the next texture state change.
    fn add_texture_change_temp_breakpoint(&mut self);

    /// Removes every temporary breakpoint, leaving permanent ones.
    fn clear_temp_breakpoints(&mut self);
}

/// Non-blocking view of the interactive stepping gate.
///
/// Methods take `&self` because the control plane resumes a gate the
/// dispatch thread is blocked on.
pub trait Stepper {
    /// Returns true while the dispatch loop is parked for stepping.
    fn is_suspended(&self) -> bool;

    /// Releases a parked dispatch loop. No-op when not suspended.
    fn resume_from_suspension(&self);
}
