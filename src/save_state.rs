use std::error::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::cpu::{Cpu, State, StatusFlags};
use crate::memory::RAM_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    // CPU state
    pub cpu_a: u8,
    pub cpu_x: u8,
    pub cpu_y: u8,
    pub cpu_pc: u16,
    pub cpu_sp: u8,
    pub cpu_status: u8,
    pub cpu_cycles: u64,
    pub cpu_instructions: u64,
    pub cpu_running: bool,

    // Main RAM
    pub ram: Vec<u8>,

    // Cartridge state
    pub prg_ram: Vec<u8>,
}

impl SaveState {
    pub fn capture(cpu: &Cpu, bus: &Bus) -> Self {
        SaveState {
            cpu_a: cpu.a,
            cpu_x: cpu.x,
            cpu_y: cpu.y,
            cpu_pc: cpu.pc,
            cpu_sp: cpu.sp,
            cpu_status: cpu.status_byte(),
            cpu_cycles: cpu.cycles(),
            cpu_instructions: cpu.instructions(),
            cpu_running: cpu.state() == State::Running,
            ram: bus.memory().get_ram().to_vec(),
            prg_ram: bus
                .cartridge()
                .map(|cart| cart.prg_ram().to_vec())
                .unwrap_or_default(),
        }
    }

    /// Loads this snapshot into `cpu` and `bus`. Nothing is touched when the
    /// snapshot is malformed.
    pub fn restore(&self, cpu: &mut Cpu, bus: &mut Bus) -> Result<(), Box<dyn Error>> {
        let ram: [u8; RAM_SIZE] = self.ram.as_slice().try_into().map_err(|_| {
            format!("save state RAM is {} bytes, expected {}", self.ram.len(), RAM_SIZE)
        })?;
        if let Some(cart) = bus.cartridge() {
            if !self.prg_ram.is_empty() && self.prg_ram.len() != cart.prg_ram().len() {
                return Err(format!(
                    "save state PRG RAM is {} bytes, cartridge has {}",
                    self.prg_ram.len(),
                    cart.prg_ram().len()
                )
                .into());
            }
        }

        cpu.a = self.cpu_a;
        cpu.x = self.cpu_x;
        cpu.y = self.cpu_y;
        cpu.pc = self.cpu_pc;
        cpu.sp = self.cpu_sp;
        cpu.status = StatusFlags::from_stack(self.cpu_status);
        cpu.set_counters(self.cpu_cycles, self.cpu_instructions, self.cpu_running);

        bus.memory_mut().set_ram(ram);
        if let Some(cart) = bus.cartridge_mut() {
            if !self.prg_ram.is_empty() {
                cart.prg_ram_mut().copy_from_slice(&self.prg_ram);
            }
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let data = bincode::serialize(self)?;
        std::fs::write(path.as_ref(), data)?;
        log::info!("Save state written to: {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<SaveState, Box<dyn Error>> {
        let data = std::fs::read(path.as_ref())?;
        let save_state = bincode::deserialize(&data)?;
        log::info!("Save state loaded from: {}", path.as_ref().display());
        Ok(save_state)
    }
}
