use std::rc::Rc;

use env_logger::Env;
use log::{debug, info, log_enabled, trace};

use psx_core::{cop0, Cpu, LogReporter, Ram, RegIndex};

/// Words stored at the bottom of RAM by the smoke run.
const SMOKE_WORDS: [(u32, u32); 4] = [
    (0x0000, 0x1234_5678),
    (0x0010, 0xDEAD_BEEF),
    // unaligned
    (0x0101, 0xAABB_CCDD),
    // last word
    (0x1F_FFFC, 0xCAFE_BABE),
];

fn main() -> anyhow::Result<()> {
    // RUST_LOG=trace dumps register state and the touched RAM bytes
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting R3000A core smoke run");
    let mut cpu = Cpu::new(Rc::new(LogReporter));
    let mut ram = Ram::new();
    debug!("RAM starts with 0x{:08x}", ram.load_word(0)?);

    trace!("Writing argument and return registers");
    cpu.regs.set(RegIndex::A0, 100);
    cpu.regs.set(RegIndex::SP, 0x801F_FF00);
    cpu.regs.set(RegIndex::ZERO, 999);
    let sr = cpu.cop0.set(cop0::SR, 0x1090_0000);
    let prid = cpu.cop0.set(cop0::PRID, 0);
    debug!("cop0 writes: {}, {}", sr, prid);

    for (offset, val) in SMOKE_WORDS {
        ram.store_word(offset, val)?;
        let back = ram.load_word(offset)?;
        anyhow::ensure!(
            back == val,
            "RAM round trip at 0x{:08x}: 0x{:08x} != 0x{:08x}",
            offset,
            back,
            val
        );
    }

    cpu.delay_load(RegIndex::T0, ram.load_word(0x10)?);
    cpu.retire_load();

    anyhow::ensure!(cpu.regs.get(RegIndex::ZERO) == 0, "r0 must stay zero");
    anyhow::ensure!(cpu.regs.get(RegIndex::T0) == 0xDEAD_BEEF, "delayed load did not land");

    if log_enabled!(log::Level::Trace) {
        cpu.dump();
        for (offset, _) in SMOKE_WORDS {
            let o = offset as usize;
            trace!("RAM[0x{:06x}..] = {:02x?}", o, &ram.as_bytes()[o..o + 4]);
        }
    }

    info!("Smoke run completed successfully");
    Ok(())
}
