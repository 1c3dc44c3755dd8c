//! Register files and main RAM of a MIPS R3000A-class console CPU.
//!
//! The instruction pipeline, exception dispatch and DMA live elsewhere and
//! drive these types one access at a time.

pub mod cop0;
pub mod cpu;
pub mod diag;
pub mod ram;
pub mod reg;

pub use cop0::{Cop0, Cop0Index};
pub use cpu::Cpu;
pub use diag::{LogReporter, Reporter};
pub use ram::{Ram, RamError, RAM_SIZE};
pub use reg::{PendingLoad, RegIndex, Registers};
