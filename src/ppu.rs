//! Placeholder for the picture processing unit.
//!
//! The bus already decodes `$2000-$3FFF` down to the eight register slots
//! and forwards every CPU cycle here, so a real implementation can drop in
//! behind the same three methods.

/// PPU dots per CPU cycle (NTSC).
pub const DOTS_PER_CPU_CYCLE: u64 = 3;

#[derive(Debug, Default)]
pub struct Ppu {
    dots: u64,
}

impl Ppu {
    pub fn new() -> Self {
        Self::default()
    }

    /// `reg` is already reduced to `0..=7`.
    pub fn read_register(&mut self, reg: u16) -> u8 {
        log::debug!("PPU stub: read ${:04X}", 0x2000 + reg);
        0
    }

    pub fn write_register(&mut self, reg: u16, data: u8) {
        log::debug!("PPU stub: write ${:02X} to ${:04X}", data, 0x2000 + reg);
    }

    pub fn tick(&mut self) {
        self.dots += DOTS_PER_CPU_CYCLE;
    }

    pub fn dots(&self) -> u64 {
        self.dots
    }
}
