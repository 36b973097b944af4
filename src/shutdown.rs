//! Ending a run: Ctrl-C handling and the files a run leaves behind.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::save_state::SaveState;
use crate::sram;

static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

pub fn stop_requested() -> bool {
    STOP_REQUESTED.load(Ordering::SeqCst)
}

pub fn request_stop() {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    StepBudget,
    Interrupted,
}

/// Returns why the run loop should stop before the next instruction, if it
/// should.
pub fn check(cpu: &Cpu, budget: Option<u64>) -> Option<StopReason> {
    if stop_requested() {
        Some(StopReason::Interrupted)
    } else if budget.is_some_and(|n| cpu.instructions() >= n) {
        Some(StopReason::StepBudget)
    } else {
        None
    }
}

#[cfg(unix)]
mod signals {
    use std::os::raw::c_int;

    // SIGINT, SIGTERM
    const STOP_SIGNALS: [c_int; 2] = [2, 15];

    extern "C" {
        fn signal(signum: c_int, handler: extern "C" fn(c_int)) -> usize;
    }

    extern "C" fn on_stop_signal(_signum: c_int) {
        super::request_stop();
    }

    pub fn install() {
        for signum in STOP_SIGNALS {
            unsafe {
                signal(signum, on_stop_signal);
            }
        }
    }
}

#[cfg(not(unix))]
mod signals {
    pub fn install() {
        log::debug!("No stop signal handler on this platform; bound the run with NES_STEPS");
    }
}

/// Routes Ctrl-C and SIGTERM to `request_stop`.
pub fn install() {
    signals::install();
}

/// What to write once the CPU stops.
#[derive(Debug, Clone, Default)]
pub struct RunOutputs {
    /// ROM the `.sav` file is named after; `None` skips battery RAM.
    pub battery_rom: Option<PathBuf>,
    pub save_state: Option<PathBuf>,
}

impl RunOutputs {
    pub fn new(rom_path: &Path, battery: bool, save_state: Option<PathBuf>) -> Self {
        RunOutputs {
            battery_rom: battery.then(|| rom_path.to_path_buf()),
            save_state,
        }
    }
}

/// Flushes the trace, then writes the save state and battery RAM.
pub fn finish(
    cpu: &mut Cpu,
    bus: &Bus,
    reason: StopReason,
    outputs: &RunOutputs,
) -> Result<(), Box<dyn Error>> {
    log::info!(
        "Stopped ({:?}) at PC=${:04X} after {} instructions, {} cycles",
        reason,
        cpu.pc,
        cpu.instructions(),
        cpu.cycles()
    );

    if let Some(mut tracer) = cpu.take_tracer() {
        tracer.flush();
        log::info!("Wrote {} trace lines", tracer.lines_written());
    }

    if let Some(path) = &outputs.save_state {
        SaveState::capture(cpu, bus).save_to_file(path)?;
    }

    if let (Some(rom), Some(cart)) = (&outputs.battery_rom, bus.cartridge()) {
        sram::save_sram(rom, cart.prg_ram())?;
    }

    Ok(())
}
