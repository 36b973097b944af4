//! Cycle-counted 6502 core for the NES, with the CPU address-space
//! mediator, an iNES/NROM cartridge loader and an instruction tracer.

pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod cpu_bus;
pub mod debug_flags;
pub mod memory;
pub mod ppu;
pub mod save_state;
pub mod shutdown;
pub mod sram;
pub mod trace;

pub use bus::Bus;
pub use cartridge::{Cartridge, CartridgeError, Mirroring};
pub use cpu::{Cpu, State, StatusFlags};
pub use cpu_bus::CpuBus;
pub use save_state::SaveState;
pub use trace::Tracer;
