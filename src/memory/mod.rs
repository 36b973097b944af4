pub const RAM_SIZE: usize = 0x0800;

/// Internal 2 KiB work RAM. Addresses are mirrored every `0x0800` bytes
/// across `0x0000-0x1FFF`; callers may pass any address in that window.
pub struct Memory {
    pub(crate) ram: [u8; RAM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        // Power-up contents are unreliable on hardware. Some games read
        // uninitialised RAM, and 0xFF matches what most of them expect.
        Memory {
            ram: [0xFF; RAM_SIZE],
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.ram[(addr as usize) & (RAM_SIZE - 1)]
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        self.ram[(addr as usize) & (RAM_SIZE - 1)] = data;
    }

    // Save state methods
    pub fn get_ram(&self) -> [u8; RAM_SIZE] {
        self.ram
    }

    pub fn set_ram(&mut self, ram: [u8; RAM_SIZE]) {
        self.ram = ram;
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_up_fill_is_ff() {
        let mem = Memory::new();
        assert!(mem.get_ram().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn mirrors_every_2k() {
        let mut mem = Memory::new();
        mem.write(0x0001, 0x42);
        assert_eq!(mem.read(0x0801), 0x42);
        assert_eq!(mem.read(0x1001), 0x42);
        assert_eq!(mem.read(0x1801), 0x42);

        mem.write(0x1FFF, 0x99);
        assert_eq!(mem.read(0x07FF), 0x99);
    }
}
