use std::rc::Rc;

use log::{debug, log_enabled, trace};

use crate::cop0::{self, Cop0};
use crate::diag::Reporter;
use crate::reg::{PendingLoad, RegIndex, Registers};

/// Value the R3000A reports in PRID.
pub const PRID_VALUE: u32 = 0x0000_0002;

/// Register state of one processor. The execute loop drives it; both
/// register files report through the same sink.
#[derive(Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub cop0: Cop0,
}

impl Cpu {
    pub fn new(reporter: Rc<dyn Reporter>) -> Self {
        let mut cop0 = Cop0::new(reporter.clone());
        cop0.latch(cop0::PRID, PRID_VALUE);
        debug!("cpu reset, PRID=0x{:08x}", PRID_VALUE);
        Self { regs: Registers::new(reporter), cop0 }
    }

    pub fn pending_load(&self) -> Option<PendingLoad> {
        self.regs.pending_load()
    }

    /// Queues a load for the delay slot. A load already waiting lands first.
    pub fn delay_load(&mut self, target: RegIndex, val: u32) {
        self.regs.delay_load(target, val);
    }

    /// Lands the waiting load, if any. Called once the delay slot
    /// instruction has executed; if that instruction wrote the same
    /// register, its value is kept.
    pub fn retire_load(&mut self) {
        self.regs.retire_load();
    }

    pub fn dump(&self) {
        if !log_enabled!(log::Level::Trace) {
            return;
        }
        trace!("general purpose registers:");
        self.regs.dump();
        trace!("cop0: {:?}", self.cop0);
        if let Some(load) = self.regs.pending_load() {
            trace!("pending load: {} <- 0x{:08x}", load.target, load.val);
        }
    }
}
