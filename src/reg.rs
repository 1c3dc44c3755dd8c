use std::fmt;
use std::rc::Rc;

use log::{log_enabled, trace};

use crate::diag::Reporter;

pub const NUM_REGS: usize = 32;

/// Architectural register number as produced by the decoder.
///
/// Values outside `0..32` are representable on purpose: a bad immediate
/// must reach the register file so it can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RegIndex(pub u32);

impl RegIndex {
    pub const ZERO: RegIndex = RegIndex(0);
    pub const AT: RegIndex = RegIndex(1);
    pub const V0: RegIndex = RegIndex(2);
    pub const V1: RegIndex = RegIndex(3);
    pub const A0: RegIndex = RegIndex(4);
    pub const A1: RegIndex = RegIndex(5);
    pub const A2: RegIndex = RegIndex(6);
    pub const A3: RegIndex = RegIndex(7);
    pub const T0: RegIndex = RegIndex(8);
    pub const T1: RegIndex = RegIndex(9);
    pub const T2: RegIndex = RegIndex(10);
    pub const T3: RegIndex = RegIndex(11);
    pub const T4: RegIndex = RegIndex(12);
    pub const T5: RegIndex = RegIndex(13);
    pub const T6: RegIndex = RegIndex(14);
    pub const T7: RegIndex = RegIndex(15);
    pub const S0: RegIndex = RegIndex(16);
    pub const S1: RegIndex = RegIndex(17);
    pub const S2: RegIndex = RegIndex(18);
    pub const S3: RegIndex = RegIndex(19);
    pub const S4: RegIndex = RegIndex(20);
    pub const S5: RegIndex = RegIndex(21);
    pub const S6: RegIndex = RegIndex(22);
    pub const S7: RegIndex = RegIndex(23);
    pub const T8: RegIndex = RegIndex(24);
    pub const T9: RegIndex = RegIndex(25);
    pub const K0: RegIndex = RegIndex(26);
    pub const K1: RegIndex = RegIndex(27);
    pub const GP: RegIndex = RegIndex(28);
    pub const SP: RegIndex = RegIndex(29);
    /// Frame pointer, also usable as a ninth saved register (`s8`).
    pub const FP: RegIndex = RegIndex(30);
    pub const RA: RegIndex = RegIndex(31);

    /// Position in the backing array, `None` if out of range.
    pub fn slot(self) -> Option<usize> {
        let i = self.0 as usize;
        (i < NUM_REGS).then_some(i)
    }

    /// Conventional assembler mnemonic for this slot.
    pub fn abi_name(self) -> Option<&'static str> {
        self.slot().map(|i| ABI_NAMES[i])
    }
}

impl From<u32> for RegIndex {
    fn from(i: u32) -> Self {
        RegIndex(i)
    }
}

impl fmt::Display for RegIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.abi_name() {
            Some(name) => write!(f, "r{} ({})", self.0, name),
            None => write!(f, "r{}", self.0),
        }
    }
}

const ABI_NAMES: [&str; NUM_REGS] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", //
    "t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", //
    "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", //
    "t8", "t9", "k0", "k1", "gp", "sp", "fp", "ra",
];

/// The 32 general purpose registers. `r0` reads as zero no matter what was
/// written to it.
///
/// Also holds the load delay slot: a load lands before the delay slot
/// instruction's own write, so a write to the load's target drops the load.
pub struct Registers {
    regs: [u32; NUM_REGS],
    load: Option<PendingLoad>,
    reporter: Rc<dyn Reporter>,
}

impl Registers {
    pub fn new(reporter: Rc<dyn Reporter>) -> Self {
        Self { regs: [0; NUM_REGS], load: None, reporter }
    }

    /// Reads a register. An out of range index is reported and reads as 0.
    pub fn get(&self, index: RegIndex) -> u32 {
        match index.slot() {
            Some(i) => self.regs[i],
            None => {
                self.reporter.warn(format_args!("Unknown register index {}", index.0));
                self.regs[0]
            }
        }
    }

    /// Writes a register. Writes to `r0` are dropped; an out of range index
    /// is reported and nothing changes.
    pub fn set(&mut self, index: RegIndex, val: u32) {
        match index.slot() {
            Some(i) => {
                if self.load.is_some_and(|l| l.target == index) {
                    trace!("load delay: {} overwritten in the delay slot", index);
                    self.load = None;
                }
                self.regs[i] = val;
            }
            None => self
                .reporter
                .warn(format_args!("Unknown register index {} (write of 0x{:08x})", index.0, val)),
        }

        self.regs[0] = 0;
    }

    pub fn pending_load(&self) -> Option<PendingLoad> {
        self.load
    }

    /// Queues a load for the delay slot. A load already waiting lands first.
    pub fn delay_load(&mut self, target: RegIndex, val: u32) {
        self.retire_load();
        self.load = Some(PendingLoad { target, val });
    }

    /// Lands the waiting load, if any. Goes through `set`, so a load into
    /// `r0` is discarded.
    pub fn retire_load(&mut self) {
        if let Some(load) = self.load.take() {
            trace!("load delay: {} <- 0x{:08x}", load.target, load.val);
            self.set(load.target, load.val);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegIndex, u32)> + '_ {
        self.regs.iter().enumerate().map(|(i, &v)| (RegIndex(i as u32), v))
    }

    /// Dumps every register at trace level.
    pub fn dump(&self) {
        if !log_enabled!(log::Level::Trace) {
            return;
        }
        for (idx, val) in self.iter() {
            trace!("{:>12} = 0x{:08x}", idx.to_string(), val);
        }
    }
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registers").field("regs", &self.regs).field("load", &self.load).finish()
    }
}

/// A load waiting in the delay slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    pub target: RegIndex,
    pub val: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{CaptureReporter, Severity};

    fn setup() -> (Rc<CaptureReporter>, Registers) {
        let rep = CaptureReporter::new();
        let regs = Registers::new(rep.clone());
        (rep, regs)
    }

    // One test per architectural slot.
    macro_rules! slot_test {
        ($name:ident, $reg:expr, $num:expr, $abi:expr) => {
            #[test]
            fn $name() {
                let (rep, mut regs) = setup();
                assert_eq!($reg, RegIndex($num));
                assert_eq!($reg.abi_name(), Some($abi));

                regs.set($reg, 0xA5A5_0000 | $num);
                assert_eq!(
                    regs.get($reg),
                    0xA5A5_0000 | $num,
                    "{} should hold the written value",
                    $abi
                );
                for (idx, val) in regs.iter() {
                    if idx != $reg {
                        assert_eq!(val, 0, "write to {} leaked into {}", $abi, idx);
                    }
                }

                regs.set($reg, u32::MAX);
                assert_eq!(regs.get($reg), u32::MAX);
                regs.set($reg, 0);
                assert_eq!(regs.get($reg), 0);
                assert!(rep.records().is_empty(), "valid slot must not warn");
            }
        };
    }

    slot_test!(test_slot_at, RegIndex::AT, 1, "at");
    slot_test!(test_slot_v0, RegIndex::V0, 2, "v0");
    slot_test!(test_slot_v1, RegIndex::V1, 3, "v1");
    slot_test!(test_slot_a0, RegIndex::A0, 4, "a0");
    slot_test!(test_slot_a1, RegIndex::A1, 5, "a1");
    slot_test!(test_slot_a2, RegIndex::A2, 6, "a2");
    slot_test!(test_slot_a3, RegIndex::A3, 7, "a3");
    slot_test!(test_slot_t0, RegIndex::T0, 8, "t0");
    slot_test!(test_slot_t1, RegIndex::T1, 9, "t1");
    slot_test!(test_slot_t2, RegIndex::T2, 10, "t2");
    slot_test!(test_slot_t3, RegIndex::T3, 11, "t3");
    slot_test!(test_slot_t4, RegIndex::T4, 12, "t4");
    slot_test!(test_slot_t5, RegIndex::T5, 13, "t5");
    slot_test!(test_slot_t6, RegIndex::T6, 14, "t6");
    slot_test!(test_slot_t7, RegIndex::T7, 15, "t7");
    slot_test!(test_slot_s0, RegIndex::S0, 16, "s0");
    slot_test!(test_slot_s1, RegIndex::S1, 17, "s1");
    slot_test!(test_slot_s2, RegIndex::S2, 18, "s2");
    slot_test!(test_slot_s3, RegIndex::S3, 19, "s3");
    slot_test!(test_slot_s4, RegIndex::S4, 20, "s4");
    slot_test!(test_slot_s5, RegIndex::S5, 21, "s5");
    slot_test!(test_slot_s6, RegIndex::S6, 22, "s6");
    slot_test!(test_slot_s7, RegIndex::S7, 23, "s7");
    slot_test!(test_slot_t8, RegIndex::T8, 24, "t8");
    slot_test!(test_slot_t9, RegIndex::T9, 25, "t9");
    slot_test!(test_slot_k0, RegIndex::K0, 26, "k0");
    slot_test!(test_slot_k1, RegIndex::K1, 27, "k1");
    slot_test!(test_slot_gp, RegIndex::GP, 28, "gp");
    slot_test!(test_slot_sp, RegIndex::SP, 29, "sp");
    slot_test!(test_slot_fp, RegIndex::FP, 30, "fp");
    slot_test!(test_slot_ra, RegIndex::RA, 31, "ra");

    #[test]
    fn test_zero_is_hardwired() {
        let (rep, mut regs) = setup();
        assert_eq!(RegIndex::ZERO.abi_name(), Some("zero"));

        for v in [1, 999, 0x8000_0000, u32::MAX] {
            regs.set(RegIndex::ZERO, v);
            assert_eq!(regs.get(RegIndex::ZERO), 0, "r0 must read 0 after writing {v:#x}");
        }
        assert!(rep.records().is_empty(), "writing r0 is legal and silent");
    }

    #[test]
    fn test_a0_then_zero() {
        let (_, mut regs) = setup();
        regs.set(RegIndex(4), 100);
        assert_eq!(regs.get(RegIndex(4)), 100);

        regs.set(RegIndex(0), 999);
        assert_eq!(regs.get(RegIndex(0)), 0);
        assert_eq!(regs.get(RegIndex(4)), 100, "a0 must survive a write to r0");
    }

    #[test]
    fn test_out_of_range_write_warns_and_changes_nothing() {
        let (rep, mut regs) = setup();
        for i in 1..32 {
            regs.set(RegIndex(i), i * 3);
        }
        let before: Vec<_> = regs.iter().collect();

        regs.set(RegIndex(32), 0xDEAD_BEEF);

        assert_eq!(rep.count(Severity::Warn), 1);
        assert!(rep.records()[0].1.contains("32"));
        assert_eq!(regs.iter().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_out_of_range_read_warns_and_returns_zero() {
        let (rep, mut regs) = setup();
        regs.set(RegIndex::T0, 7);

        assert_eq!(regs.get(RegIndex(32)), 0);
        assert_eq!(regs.get(RegIndex(u32::MAX)), 0);

        assert_eq!(rep.count(Severity::Warn), 2);
        assert_eq!(rep.count(Severity::Fatal), 0);
        assert_eq!(regs.get(RegIndex::T0), 7);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RegIndex::SP.to_string(), "r29 (sp)");
        assert_eq!(RegIndex(40).to_string(), "r40");
        assert_eq!(RegIndex(40).abi_name(), None);
    }

    #[test]
    fn test_pending_load_lands_on_retire() {
        let (_, mut regs) = setup();
        regs.delay_load(RegIndex::V0, 0x1234);
        assert_eq!(regs.get(RegIndex::V0), 0, "value is not visible before retire");

        regs.retire_load();
        assert_eq!(regs.get(RegIndex::V0), 0x1234);
        assert!(regs.pending_load().is_none());
    }

    #[test]
    fn test_pending_load_into_zero_is_dropped() {
        let (rep, mut regs) = setup();
        regs.delay_load(RegIndex::ZERO, 0xFFFF_FFFF);
        regs.retire_load();
        assert_eq!(regs.get(RegIndex::ZERO), 0);
        assert!(rep.records().is_empty());
    }

    #[test]
    fn test_write_to_other_register_keeps_load() {
        let (_, mut regs) = setup();
        regs.delay_load(RegIndex::S0, 5);
        regs.set(RegIndex::S1, 6);
        assert_eq!(regs.pending_load(), Some(PendingLoad { target: RegIndex::S0, val: 5 }));

        regs.retire_load();
        assert_eq!(regs.get(RegIndex::S0), 5);
        assert_eq!(regs.get(RegIndex::S1), 6);
    }
}
