//! Per-command break decisions for the display-list interpreter.
//!
//! The interpreter calls [`CommandDebugger::notify_command`] once per fetched
//! command and acts on the returned [`NotifyResult`]. Lifecycle hooks
//! (`notify_flush`, `notify_display`, `notify_begin_frame`) advance the
//! multi-stage break modes. Configuration calls may come from a control
//! thread, but only while the interpreter is parked; the debugger holds no
//! locks of its own.

use crate::{
    opcode_of, BreakMode, BreakpointStore, CommandHost, CommandKind, DebuggerConfig,
    FrameCounters, PrimFilter, RestrictRuleError, Stepper, CURVE_CMDS, PRIM_SUBMIT_CMDS,
};

/// What the interpreter should do with the command it just fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum NotifyResult {
    /// Run the command normally.
    Execute,
    /// Drop the command; the primitive restriction filtered it out.
    Skip,
    /// Park the interpreter for interactive stepping before running it.
    Break,
}

impl NotifyResult {
    const fn from_process(process: bool) -> Self {
        if process {
            Self::Execute
        } else {
            Self::Skip
        }
    }
}

/// Point-in-time view of debugger state for front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DebuggerStatus {
    /// Active break mode.
    pub mode: BreakMode,
    /// Primitive count the `Count` mode breaks on, if armed.
    pub break_target: Option<u32>,
    /// Primitives submitted so far this frame.
    pub prims_this_frame: u32,
    /// Primitives submitted in the previous frame.
    pub prims_last_frame: u32,
    /// Active restrict rule text.
    pub restrict_prims: String,
    /// Address whose next breakpoint hit will be let through once.
    pub skip_once: Option<u32>,
}

/// Break state, counters, and primitive filter for one interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDebugger {
    mode: BreakMode,
    break_target: Option<u32>,
    counters: FrameCounters,
    filter: PrimFilter,
    skip_once: Option<u32>,
    prim_after_draw: bool,
}

impl CommandDebugger {
    /// Creates a debugger that runs freely with no restriction.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: BreakMode::None,
            break_target: None,
            counters: FrameCounters::new(),
            filter: PrimFilter::new(),
            skip_once: None,
            prim_after_draw: false,
        }
    }

    /// Creates a debugger from start-up configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictRuleError`] when `config.restrict_prims` is malformed.
    pub fn with_config(config: &DebuggerConfig) -> Result<Self, RestrictRuleError> {
        let mut debugger = Self::new();
        debugger.set_restrict_prims(&config.restrict_prims)?;
        if config.break_on_start {
            debugger.mode = BreakMode::SingleOp;
        }
        Ok(debugger)
    }

    /// Active break mode.
    #[must_use]
    pub const fn break_mode(&self) -> BreakMode {
        self.mode
    }

    /// Display name of the active break mode.
    #[must_use]
    pub const fn break_mode_name(&self) -> &'static str {
        self.mode.name()
    }

    /// Primitive count the `Count` mode breaks on.
    #[must_use]
    pub const fn break_target(&self) -> Option<u32> {
        self.break_target
    }

    /// Whether the interpreter must notify every command.
    #[must_use]
    pub const fn needs_slow_path(&self) -> bool {
        self.mode.needs_slow_path()
    }

    /// Arms a new break mode, replacing whatever was pending.
    ///
    /// Modes that break on command kinds install temporary breakpoints in
    /// `breakpoints`. A parked interpreter is resumed.
    ///
    /// A count target armed with [`Self::set_break_count`] survives selecting
    /// [`BreakMode::Count`]; any other mode drops it.
    pub fn set_break_next<B, S>(&mut self, mode: BreakMode, breakpoints: &mut B, stepper: &S)
    where
        B: BreakpointStore + ?Sized,
        S: Stepper + ?Sized,
    {
        log::debug!("break mode {} -> {}", self.mode, mode);
        self.mode = mode;
        if mode != BreakMode::Count {
            self.break_target = None;
        }

        match mode {
            BreakMode::TextureChange => breakpoints.add_texture_change_temp_breakpoint(),
            BreakMode::Prim | BreakMode::Count => {
                for cmd in PRIM_SUBMIT_CMDS {
                    breakpoints.add_cmd_breakpoint(cmd, true);
                }
            }
            BreakMode::Curve => {
                for cmd in CURVE_CMDS {
                    breakpoints.add_cmd_breakpoint(cmd, true);
                }
            }
            // Resolved into `Prim` by the next flush.
            BreakMode::Draw => self.prim_after_draw = true,
            BreakMode::None
            | BreakMode::SingleOp
            | BreakMode::NonTextureChange
            | BreakMode::Frame
            | BreakMode::VSync => {}
        }

        if stepper.is_suspended() {
            stepper.resume_from_suspension();
        }
    }

    /// Sets the primitive count the `Count` mode breaks on.
    ///
    /// With `relative`, the target is `value` primitives past the current
    /// frame's count.
    pub fn set_break_count(&mut self, value: u32, relative: bool) {
        let target = if relative {
            self.counters.prims_this_frame().saturating_add(value)
        } else {
            value
        };
        self.break_target = Some(target);
    }

    /// Cancels every pending break condition and resumes a parked interpreter.
    pub fn clear_break<S: Stepper + ?Sized>(&mut self, stepper: &S) {
        self.mode = BreakMode::None;
        self.break_target = None;
        self.prim_after_draw = false;
        stepper.resume_from_suspension();
    }

    /// Decides what to do with the command at `pc`.
    ///
    /// Never blocks. On [`NotifyResult::Break`] the caller parks the
    /// interpreter itself; the next notification for the same `pc` is let
    /// through once so the resumed command does not break again.
    pub fn notify_command<H, B>(&mut self, pc: u32, host: &H, breakpoints: &mut B) -> NotifyResult
    where
        H: CommandHost + ?Sized,
        B: BreakpointStore + ?Sized,
    {
        let op = host.read_command(pc);
        let kind = CommandKind::from_word(op);

        if self.counters.observe_flip(host.flip_count()) {
            log::debug!(
                "frame boundary, {} prims last frame",
                self.counters.prims_last_frame()
            );
        }

        let mut process = true;
        if kind.is_countable() {
            let ordinal = self.counters.count_prim();
            process = self.filter.passes(ordinal);
        }
        let verdict = NotifyResult::from_process(process);

        let is_breakpoint = match self.mode {
            BreakMode::SingleOp => true,
            BreakMode::Count => self.break_target == Some(self.counters.prims_this_frame()),
            _ => breakpoints.has_breakpoints() && breakpoints.is_breakpoint(pc, op),
        };

        if is_breakpoint && self.skip_once == Some(pc) {
            log::info!("Skipping break at {pc:08x} (last break was here)");
            self.skip_once = None;
            return verdict;
        }
        self.skip_once = None;

        if !is_breakpoint {
            return verdict;
        }

        breakpoints.clear_temp_breakpoints();

        if !host.session_active() {
            log::info!("Dropping break at {pc:08x}, no session to step");
            self.mode = BreakMode::None;
            return verdict;
        }

        log::info!(
            "Waiting at {pc:08x}, cmd {:02x} {op:08x} ({kind:?})",
            opcode_of(op)
        );
        self.skip_once = Some(pc);
        self.mode = BreakMode::None;
        NotifyResult::Break
    }

    /// Pipeline flush hook; turns a pending `Draw` break into `Prim`.
    pub fn notify_flush<B, S>(&mut self, breakpoints: &mut B, stepper: &S)
    where
        B: BreakpointStore + ?Sized,
        S: Stepper + ?Sized,
    {
        if self.mode != BreakMode::Draw || stepper.is_suspended() || !self.prim_after_draw {
            return;
        }
        log::info!("Flush detected, breaking at next PRIM");
        self.prim_after_draw = false;
        self.set_break_next(BreakMode::Prim, breakpoints, stepper);
    }

    /// Framebuffer display hook; `Frame` starts stepping at the new frame.
    pub fn notify_display(&mut self, _framebuf: u32, _stride: u32, _format: u32) {
        if self.mode == BreakMode::Frame {
            self.mode = BreakMode::SingleOp;
        }
    }

    /// Frame start hook; `VSync` starts stepping once vblank completes.
    pub fn notify_begin_frame(&mut self) {
        if self.mode == BreakMode::VSync {
            self.mode = BreakMode::SingleOp;
        }
    }

    /// Primitives submitted so far this frame.
    #[must_use]
    pub const fn prims_this_frame(&self) -> u32 {
        self.counters.prims_this_frame()
    }

    /// Primitives submitted in the previous frame.
    #[must_use]
    pub const fn prims_last_frame(&self) -> u32 {
        self.counters.prims_last_frame()
    }

    /// Replaces the primitive restriction rule.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictRuleError`] for a malformed token. The previous rule
    /// stays in force.
    pub fn set_restrict_prims(&mut self, rule: &str) -> Result<(), RestrictRuleError> {
        self.filter.set_rule(rule)?;
        log::info!("restrict prims set to `{}`", self.filter.rule());
        Ok(())
    }

    /// Last successfully committed restriction rule.
    #[must_use]
    pub fn restrict_prims(&self) -> &str {
        self.filter.rule()
    }

    /// Committed primitive filter.
    #[must_use]
    pub const fn filter(&self) -> &PrimFilter {
        &self.filter
    }

    /// Snapshot of the current state for display.
    #[must_use]
    pub fn status(&self) -> DebuggerStatus {
        DebuggerStatus {
            mode: self.mode,
            break_target: self.break_target,
            prims_this_frame: self.counters.prims_this_frame(),
            prims_last_frame: self.counters.prims_last_frame(),
            restrict_prims: self.filter.rule().to_owned(),
            skip_once: self.skip_once,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::{CommandDebugger, NotifyResult};
    use crate::{
        BreakMode, BreakpointSet, BreakpointStore, CommandHost, DebuggerConfig, Stepper,
        CMD_BEZIER, CMD_PRIM, CMD_SPLINE, CMD_VAP,
    };

    const PRIM_WORD: u32 = (CMD_PRIM as u32) << 24;
    const NOP_WORD: u32 = 0;

    struct Host {
        word: u32,
        flip: u32,
        active: bool,
    }

    impl Host {
        const fn prim() -> Self {
            Self {
                word: PRIM_WORD,
                flip: 0,
                active: true,
            }
        }

        const fn nop() -> Self {
            Self {
                word: NOP_WORD,
                flip: 0,
                active: true,
            }
        }
    }

    impl CommandHost for Host {
        fn read_command(&self, _addr: u32) -> u32 {
            self.word
        }

        fn flip_count(&self) -> u32 {
            self.flip
        }

        fn session_active(&self) -> bool {
            self.active
        }
    }

    #[derive(Default)]
    struct FakeStepper {
        suspended: Cell<bool>,
        resumes: Cell<u32>,
    }

    impl Stepper for FakeStepper {
        fn is_suspended(&self) -> bool {
            self.suspended.get()
        }

        fn resume_from_suspension(&self) {
            if self.suspended.replace(false) {
                self.resumes.set(self.resumes.get() + 1);
            }
        }
    }

    #[test]
    fn fresh_debugger_executes_everything() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        assert_eq!(debugger.break_mode(), BreakMode::None);
        assert!(!debugger.needs_slow_path());
        for pc in (0..64).step_by(4) {
            assert_eq!(
                debugger.notify_command(pc, &Host::prim(), &mut store),
                NotifyResult::Execute
            );
        }
        assert_eq!(debugger.prims_this_frame(), 16);
    }

    #[test]
    fn single_op_breaks_on_next_command_then_disarms() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        let stepper = FakeStepper::default();
        debugger.set_break_next(BreakMode::SingleOp, &mut store, &stepper);

        assert_eq!(
            debugger.notify_command(0x10, &Host::nop(), &mut store),
            NotifyResult::Break
        );
        assert_eq!(debugger.break_mode(), BreakMode::None);
        assert_eq!(debugger.status().skip_once, Some(0x10));
    }

    #[test]
    fn prim_mode_installs_temp_breakpoints_for_prim_submits() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        debugger.set_break_next(BreakMode::Prim, &mut store, &FakeStepper::default());
        for cmd in [CMD_PRIM, CMD_BEZIER, CMD_SPLINE, CMD_VAP] {
            assert!(store.has_cmd_breakpoint(cmd));
        }
        assert_eq!(store.temp_count(), 4);
    }

    #[test]
    fn curve_mode_installs_only_curve_breakpoints() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        debugger.set_break_next(BreakMode::Curve, &mut store, &FakeStepper::default());
        assert!(store.has_cmd_breakpoint(CMD_BEZIER));
        assert!(store.has_cmd_breakpoint(CMD_SPLINE));
        assert!(!store.has_cmd_breakpoint(CMD_PRIM));
    }

    #[test]
    fn texture_mode_arms_texture_change_breakpoint() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        debugger.set_break_next(BreakMode::TextureChange, &mut store, &FakeStepper::default());
        assert!(store.texture_change_armed());
    }

    #[test]
    fn setting_a_mode_resumes_a_parked_interpreter() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        let stepper = FakeStepper::default();
        stepper.suspended.set(true);
        debugger.set_break_next(BreakMode::SingleOp, &mut store, &stepper);
        assert!(!stepper.is_suspended());
        assert_eq!(stepper.resumes.get(), 1);
    }

    #[test]
    fn clear_break_drops_mode_and_target_and_resumes() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        let stepper = FakeStepper::default();
        debugger.set_break_count(3, false);
        debugger.set_break_next(BreakMode::Count, &mut store, &stepper);
        stepper.suspended.set(true);

        debugger.clear_break(&stepper);

        assert_eq!(debugger.break_mode(), BreakMode::None);
        assert_eq!(debugger.break_target(), None);
        assert_eq!(stepper.resumes.get(), 1);
    }

    #[test]
    fn non_count_mode_drops_count_target() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        debugger.set_break_count(3, false);
        debugger.set_break_next(BreakMode::Prim, &mut store, &FakeStepper::default());
        assert_eq!(debugger.break_target(), None);
    }

    #[test]
    fn count_target_set_after_mode_is_honoured() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        debugger.set_break_next(BreakMode::Count, &mut store, &FakeStepper::default());
        debugger.set_break_count(2, false);
        assert_eq!(
            debugger.notify_command(0x0, &Host::prim(), &mut store),
            NotifyResult::Execute
        );
        assert_eq!(
            debugger.notify_command(0x4, &Host::prim(), &mut store),
            NotifyResult::Break
        );
    }

    #[test]
    fn count_target_without_count_mode_has_no_effect() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        debugger.set_break_count(1, false);
        assert_eq!(
            debugger.notify_command(0x0, &Host::prim(), &mut store),
            NotifyResult::Execute
        );
    }

    #[test]
    fn empty_store_is_not_consulted() {
        struct PanickingStore;

        impl BreakpointStore for PanickingStore {
            fn has_breakpoints(&self) -> bool {
                false
            }

            fn is_breakpoint(&self, _addr: u32, _op: u32) -> bool {
                panic!("empty store must not be queried");
            }

            fn add_cmd_breakpoint(&mut self, _cmd: u8, _temporary: bool) {}

            fn add_texture_change_temp_breakpoint(&mut self) {}

            fn clear_temp_breakpoints(&mut self) {}
        }

        let mut debugger = CommandDebugger::new();
        assert_eq!(
            debugger.notify_command(0x0, &Host::prim(), &mut PanickingStore),
            NotifyResult::Execute
        );
    }

    #[test]
    fn break_without_session_is_dropped() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        debugger.set_break_next(BreakMode::Prim, &mut store, &FakeStepper::default());
        let host = Host {
            active: false,
            ..Host::prim()
        };

        assert_eq!(
            debugger.notify_command(0x8, &host, &mut store),
            NotifyResult::Execute
        );
        assert_eq!(debugger.break_mode(), BreakMode::None);
        assert_eq!(store.temp_count(), 0);
        assert_eq!(debugger.status().skip_once, None);
    }

    #[test]
    fn dropped_break_still_honours_filter() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        debugger.set_restrict_prims("5").expect("valid rule");
        debugger.set_break_next(BreakMode::SingleOp, &mut store, &FakeStepper::default());
        let host = Host {
            active: false,
            ..Host::prim()
        };
        assert_eq!(
            debugger.notify_command(0x8, &host, &mut store),
            NotifyResult::Skip
        );
    }

    #[test]
    fn flush_turns_draw_into_prim() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        let stepper = FakeStepper::default();
        debugger.set_break_next(BreakMode::Draw, &mut store, &stepper);
        assert_eq!(store.temp_count(), 0);

        debugger.notify_flush(&mut store, &stepper);

        assert_eq!(debugger.break_mode(), BreakMode::Prim);
        assert!(store.has_cmd_breakpoint(CMD_PRIM));
    }

    #[test]
    fn flush_while_suspended_keeps_draw_pending() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        let stepper = FakeStepper::default();
        debugger.set_break_next(BreakMode::Draw, &mut store, &stepper);
        stepper.suspended.set(true);

        debugger.notify_flush(&mut store, &stepper);

        assert_eq!(debugger.break_mode(), BreakMode::Draw);
        stepper.suspended.set(false);
        debugger.notify_flush(&mut store, &stepper);
        assert_eq!(debugger.break_mode(), BreakMode::Prim);
    }

    #[test]
    fn flush_outside_draw_mode_is_ignored() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        let stepper = FakeStepper::default();
        debugger.set_break_next(BreakMode::Frame, &mut store, &stepper);
        debugger.notify_flush(&mut store, &stepper);
        assert_eq!(debugger.break_mode(), BreakMode::Frame);
    }

    #[test]
    fn display_starts_stepping_in_frame_mode_only() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        let stepper = FakeStepper::default();

        debugger.set_break_next(BreakMode::VSync, &mut store, &stepper);
        debugger.notify_display(0x0400_0000, 512, 3);
        assert_eq!(debugger.break_mode(), BreakMode::VSync);

        debugger.set_break_next(BreakMode::Frame, &mut store, &stepper);
        debugger.notify_display(0x0400_0000, 512, 3);
        assert_eq!(debugger.break_mode(), BreakMode::SingleOp);
    }

    #[test]
    fn begin_frame_starts_stepping_in_vsync_mode_only() {
        let mut debugger = CommandDebugger::new();
        let mut store = BreakpointSet::new();
        let stepper = FakeStepper::default();

        debugger.set_break_next(BreakMode::Frame, &mut store, &stepper);
        debugger.notify_begin_frame();
        assert_eq!(debugger.break_mode(), BreakMode::Frame);

        debugger.set_break_next(BreakMode::VSync, &mut store, &stepper);
        debugger.notify_begin_frame();
        assert_eq!(debugger.break_mode(), BreakMode::SingleOp);
    }

    #[test]
    fn with_config_applies_rule_and_start_break() {
        let config = DebuggerConfig {
            restrict_prims: "1-3".to_owned(),
            break_on_start: true,
        };
        let debugger = CommandDebugger::with_config(&config).expect("valid config");
        assert_eq!(debugger.restrict_prims(), "1-3");
        assert_eq!(debugger.break_mode(), BreakMode::SingleOp);
    }

    #[test]
    fn with_config_rejects_bad_rule() {
        let config = DebuggerConfig {
            restrict_prims: "1-x".to_owned(),
            ..DebuggerConfig::default()
        };
        assert!(CommandDebugger::with_config(&config).is_err());
    }

    #[test]
    fn status_reflects_state() {
        let mut debugger = CommandDebugger::new();
        debugger.set_restrict_prims("!2").expect("valid rule");
        debugger.set_break_count(9, false);
        let status = debugger.status();
        assert_eq!(status.mode, BreakMode::None);
        assert_eq!(status.break_target, Some(9));
        assert_eq!(status.restrict_prims, "!2");
        assert_eq!(debugger.break_mode_name(), "NONE");
    }
}
