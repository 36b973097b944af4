use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::cpu_bus::CpuBus;
use crate::memory::Memory;
use crate::ppu::Ppu;

/// CPU address space mediator.
///
/// | Range           | Target                                 |
/// |-----------------|----------------------------------------|
/// | `$0000-$1FFF`   | 2 KiB RAM, mirrored every `$0800`      |
/// | `$2000-$3FFF`   | PPU registers, mirrored every 8 bytes  |
/// | `$4000-$401F`   | APU and controller registers           |
/// | `$4020-$FFFF`   | cartridge mapper                       |
pub struct Bus {
    memory: Memory,
    ppu: Ppu,
    apu: Apu,
    cartridge: Option<Cartridge>,
    cycles: u64,
}

impl Bus {
    pub fn new() -> Self {
        Bus {
            memory: Memory::new(),
            ppu: Ppu::new(),
            apu: Apu::new(),
            cartridge: None,
            cycles: 0,
        }
    }

    pub fn with_cartridge(cartridge: Cartridge) -> Self {
        let mut bus = Self::new();
        bus.load_cartridge(cartridge);
        bus
    }

    pub fn load_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn cartridge_mut(&mut self) -> Option<&mut Cartridge> {
        self.cartridge.as_mut()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn apu(&self) -> &Apu {
        &self.apu
    }

    /// CPU cycles seen by this bus since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn attached_cartridge(&mut self) -> &mut Cartridge {
        match self.cartridge.as_mut() {
            Some(cartridge) => cartridge,
            None => panic!("bus accessed before a cartridge was attached"),
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBus for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        assert!(
            self.cartridge.is_some(),
            "bus read at ${:04X} before a cartridge was attached",
            addr
        );
        match addr {
            0x0000..=0x1FFF => self.memory.read(addr),
            0x2000..=0x3FFF => self.ppu.read_register(addr & 0x0007),
            0x4000..=0x401F => self.apu.read_register(addr),
            0x4020..=0xFFFF => self.attached_cartridge().cpu_read(addr),
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        assert!(
            self.cartridge.is_some(),
            "bus write at ${:04X} before a cartridge was attached",
            addr
        );
        match addr {
            0x0000..=0x1FFF => self.memory.write(addr, data),
            0x2000..=0x3FFF => self.ppu.write_register(addr & 0x0007, data),
            0x4000..=0x401F => self.apu.write_register(addr, data),
            0x4020..=0xFFFF => self.attached_cartridge().cpu_write(addr, data),
        }
    }

    fn tick(&mut self) {
        self.cycles += 1;
        self.ppu.tick();
        self.apu.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::build_ines;

    fn nrom_bus() -> Bus {
        let cartridge = Cartridge::from_bytes(&build_ines(1, 1, 0, 0)).unwrap();
        Bus::with_cartridge(cartridge)
    }

    #[test]
    fn ram_is_mirrored() {
        let mut bus = nrom_bus();
        bus.write(0x0042, 0x99);
        assert_eq!(bus.read(0x0842), 0x99);
        assert_eq!(bus.read(0x1042), 0x99);
        assert_eq!(bus.read(0x1842), 0x99);
    }

    #[test]
    fn io_windows_are_stubbed() {
        let mut bus = nrom_bus();
        bus.write(0x2000, 0xFF);
        bus.write(0x3FFF, 0xFF);
        bus.write(0x4015, 0xFF);
        assert_eq!(bus.read(0x2002), 0);
        assert_eq!(bus.read(0x3FFA), 0);
        assert_eq!(bus.read(0x4016), 0);
    }

    #[test]
    fn cartridge_space_goes_to_mapper() {
        let mut bus = nrom_bus();
        bus.write(0x6000, 0x5A);
        assert_eq!(bus.read(0x6000), 0x5A);
        assert_eq!(bus.read(0x8000), bus.read(0xC000));
        assert_eq!(bus.read(0x4020), 0);
    }

    #[test]
    fn tick_reaches_collaborators() {
        let mut bus = nrom_bus();
        for _ in 0..10 {
            bus.tick();
        }
        assert_eq!(bus.cycles(), 10);
        assert_eq!(bus.apu().cycles(), 10);
        assert_eq!(bus.ppu().dots(), 30);
    }

    #[test]
    #[should_panic(expected = "before a cartridge was attached")]
    fn read_without_cartridge_panics() {
        let mut bus = Bus::new();
        bus.read(0x0000);
    }
}
