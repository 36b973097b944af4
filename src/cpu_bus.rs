//! Trait representing the minimal bus interface required by the 6502 core.

pub trait CpuBus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);

    /// Called once per CPU cycle, after that cycle's bus access.
    fn tick(&mut self) {}
}
