//! In-memory breakpoint store for hosts without their own bookkeeping.

use std::collections::HashSet;

use crate::{opcode_of, BreakpointStore, CommandKind};

/// Address and opcode breakpoints with separate temporary entries.
///
/// A temporary entry is only recorded when no permanent entry already covers
/// the same address or opcode, so clearing temporaries never drops a
/// breakpoint the operator set by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointSet {
    addresses: HashSet<u32>,
    temp_addresses: HashSet<u32>,
    cmds: HashSet<u8>,
    temp_cmds: HashSet<u8>,
    texture_change_temp: bool,
}

impl BreakpointSet {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a breakpoint on the command at `addr`.
    pub fn add_address_breakpoint(&mut self, addr: u32, temporary: bool) {
        if temporary {
            if !self.addresses.contains(&addr) {
                self.temp_addresses.insert(addr);
            }
        } else {
            self.temp_addresses.remove(&addr);
            self.addresses.insert(addr);
        }
    }

    /// Removes any breakpoint at `addr`. Returns true if one existed.
    pub fn remove_address_breakpoint(&mut self, addr: u32) -> bool {
        let permanent = self.addresses.remove(&addr);
        let temporary = self.temp_addresses.remove(&addr);
        permanent || temporary
    }

    /// Removes any breakpoint on opcode `cmd`. Returns true if one existed.
    pub fn remove_cmd_breakpoint(&mut self, cmd: u8) -> bool {
        let permanent = self.cmds.remove(&cmd);
        let temporary = self.temp_cmds.remove(&cmd);
        permanent || temporary
    }

    /// Returns true when `addr` has a breakpoint.
    #[must_use]
    pub fn has_address_breakpoint(&self, addr: u32) -> bool {
        self.addresses.contains(&addr) || self.temp_addresses.contains(&addr)
    }

    /// Returns true when opcode `cmd` has a breakpoint.
    #[must_use]
    pub fn has_cmd_breakpoint(&self, cmd: u8) -> bool {
        self.cmds.contains(&cmd) || self.temp_cmds.contains(&cmd)
    }

    /// Returns true while the texture-change breakpoint is armed.
    #[must_use]
    pub const fn texture_change_armed(&self) -> bool {
        self.texture_change_temp
    }

    /// Number of temporary entries currently armed.
    #[must_use]
    pub fn temp_count(&self) -> usize {
        self.temp_addresses.len() + self.temp_cmds.len() + usize::from(self.texture_change_temp)
    }
}

impl BreakpointStore for BreakpointSet {
    fn has_breakpoints(&self) -> bool {
        self.texture_change_temp
            || !self.addresses.is_empty()
            || !self.temp_addresses.is_empty()
            || !self.cmds.is_empty()
            || !self.temp_cmds.is_empty()
    }

    fn is_breakpoint(&self, addr: u32, op: u32) -> bool {
        if self.has_address_breakpoint(addr) {
            return true;
        }
        let cmd = opcode_of(op);
        if self.has_cmd_breakpoint(cmd) {
            return true;
        }
        self.texture_change_temp && CommandKind::from_opcode(cmd) == CommandKind::TextureState
    }

    fn add_cmd_breakpoint(&mut self, cmd: u8, temporary: bool) {
        if temporary {
            if !self.cmds.contains(&cmd) {
                self.temp_cmds.insert(cmd);
            }
        } else {
            self.temp_cmds.remove(&cmd);
            self.cmds.insert(cmd);
        }
    }

    fn add_texture_change_temp_breakpoint(&mut self) {
        self.texture_change_temp = true;
    }

    fn clear_temp_breakpoints(&mut self) {
        self.temp_addresses.clear();
        self.temp_cmds.clear();
        self.texture_change_temp = false;
    }
}
