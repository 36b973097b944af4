//! Placeholder for the audio processing unit and the controller ports,
//! which share the `$4000-$401F` register window.

#[derive(Debug, Default)]
pub struct Apu {
    cycles: u64,
}

impl Apu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_register(&mut self, addr: u16) -> u8 {
        log::debug!("APU stub: read ${:04X}", addr);
        0
    }

    pub fn write_register(&mut self, addr: u16, data: u8) {
        log::debug!("APU stub: write ${:02X} to ${:04X}", data, addr);
    }

    pub fn tick(&mut self) {
        self.cycles += 1;
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
