//! Coprocessor 0: the system control registers.
//!
//! Only 11 of the 32 cop0 slots exist on the R3000A. Asking for any other
//! slot means the decoder is broken, so it is treated as fatal. The bits in
//! SR, CAUSE and EPC are stored raw; the exception logic interprets them.

use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::diag::Reporter;

/// Register number in coprocessor 0's own space, as decoded from
/// `mfc0`/`mtc0`. Distinct from the GPR index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cop0Index(pub u32);

impl From<u32> for Cop0Index {
    fn from(i: u32) -> Self {
        Cop0Index(i)
    }
}

impl fmt::Display for Cop0Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match name_of(*self) {
            Some(name) => write!(f, "cop0r{} ({})", self.0, name),
            None => write!(f, "cop0r{}", self.0),
        }
    }
}

pub const BPC: Cop0Index = Cop0Index(3);
pub const BDA: Cop0Index = Cop0Index(5);
pub const JUMPDEST: Cop0Index = Cop0Index(6);
pub const DCIC: Cop0Index = Cop0Index(7);
pub const BAD_VADDR: Cop0Index = Cop0Index(8);
pub const BDAM: Cop0Index = Cop0Index(9);
pub const BPCM: Cop0Index = Cop0Index(11);
pub const SR: Cop0Index = Cop0Index(12);
pub const CAUSE: Cop0Index = Cop0Index(13);
pub const EPC: Cop0Index = Cop0Index(14);
pub const PRID: Cop0Index = Cop0Index(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    ReadWrite,
    /// Software writes are ignored; the label is what `set` returns instead.
    ReadOnly(&'static str),
}

struct Cop0Def {
    index: Cop0Index,
    name: &'static str,
    access: Access,
}

const fn rw(index: Cop0Index, name: &'static str) -> Cop0Def {
    Cop0Def { index, name, access: Access::ReadWrite }
}

const fn ro(index: Cop0Index, name: &'static str, label: &'static str) -> Cop0Def {
    Cop0Def { index, name, access: Access::ReadOnly(label) }
}

const NUM_COP0: usize = 11;

static COP0_REGS: [Cop0Def; NUM_COP0] = [
    rw(BPC, "BPC"),
    rw(BDA, "BDA"),
    rw(JUMPDEST, "JUMPDEST"),
    rw(DCIC, "DCIC"),
    ro(BAD_VADDR, "BadVaddr", "BadVaddr (READ ONLY)"),
    rw(BDAM, "BDAM"),
    rw(BPCM, "BPCM"),
    rw(SR, "SR"),
    rw(CAUSE, "CAUSE"),
    rw(EPC, "EPC"),
    ro(PRID, "PRID", "PRID (READ ONLY)"),
];

/// Storage slot and table entry for `index`, if it is a real cop0 register.
fn lookup(index: Cop0Index) -> Option<(usize, &'static Cop0Def)> {
    COP0_REGS.iter().enumerate().find(|(_, def)| def.index == index)
}

/// Canonical name of a cop0 register, `None` if it doesn't exist.
pub fn name_of(index: Cop0Index) -> Option<&'static str> {
    lookup(index).map(|(_, def)| def.name)
}

pub struct Cop0 {
    vals: [u32; NUM_COP0],
    reporter: Rc<dyn Reporter>,
}

impl Cop0 {
    pub fn new(reporter: Rc<dyn Reporter>) -> Self {
        Self { vals: [0; NUM_COP0], reporter }
    }

    fn resolve(&self, index: Cop0Index, what: fmt::Arguments<'_>) -> (usize, &'static Cop0Def) {
        match lookup(index) {
            Some(found) => found,
            None => self
                .reporter
                .fatal(format_args!("Unknown coprocessor zero register {} ({})", index.0, what)),
        }
    }

    /// Reads a register, returning its value and name.
    pub fn get(&self, index: Cop0Index) -> (u32, &'static str) {
        let (slot, def) = self.resolve(index, format_args!("read"));
        (self.vals[slot], def.name)
    }

    /// Software write. Read-only registers keep their value and the
    /// read-only label is returned in place of the name.
    pub fn set(&mut self, index: Cop0Index, val: u32) -> &'static str {
        let (slot, def) = self.resolve(index, format_args!("write of 0x{:08x}", val));
        match def.access {
            Access::ReadWrite => {
                self.vals[slot] = val;
                def.name
            }
            Access::ReadOnly(label) => {
                trace!("ignored write of 0x{:08x} to {}", val, def.name);
                label
            }
        }
    }

    /// Hardware-side write, used by exception entry to fill BadVaddr and by
    /// reset to set PRID. Ignores the software read-only policy.
    pub fn latch(&mut self, index: Cop0Index, val: u32) -> &'static str {
        let (slot, def) = self.resolve(index, format_args!("latch of 0x{:08x}", val));
        self.vals[slot] = val;
        def.name
    }

    pub fn sr(&self) -> u32 {
        self.get(SR).0
    }

    pub fn cause(&self) -> u32 {
        self.get(CAUSE).0
    }

    pub fn epc(&self) -> u32 {
        self.get(EPC).0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cop0Index, &'static str, u32)> + '_ {
        COP0_REGS.iter().zip(self.vals.iter()).map(|(def, &v)| (def.index, def.name, v))
    }
}

impl fmt::Debug for Cop0 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for (_, name, v) in self.iter() {
            m.entry(&name, &format_args!("0x{:08x}", v));
        }
        m.finish()
    }
}
