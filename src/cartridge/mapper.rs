use super::CartridgeError;

pub const PRG_ROM_PAGE_SIZE: usize = 0x4000;
pub const CHR_ROM_PAGE_SIZE: usize = 0x2000;
pub const PRG_RAM_SIZE: usize = 0x2000;

/// Cartridge boards the bus knows how to talk to. New boards get a new
/// variant; the bus only ever sees this enum.
pub enum Mapper {
    Nrom(Nrom),
}

impl Mapper {
    pub(crate) fn new(id: u16, prg_rom: Vec<u8>, chr_rom: Vec<u8>) -> Result<Self, CartridgeError> {
        if prg_rom.is_empty() {
            return Err(CartridgeError::EmptyPrgRom);
        }
        match id {
            0 => Ok(Mapper::Nrom(Nrom::new(prg_rom, chr_rom))),
            other => Err(CartridgeError::UnsupportedMapper(other)),
        }
    }

    pub fn id(&self) -> u16 {
        match self {
            Mapper::Nrom(_) => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mapper::Nrom(_) => "NROM",
        }
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(board) => board.cpu_read(addr),
        }
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        match self {
            Mapper::Nrom(board) => board.cpu_write(addr, data),
        }
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(board) => board.ppu_read(addr),
        }
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        match self {
            Mapper::Nrom(board) => board.ppu_write(addr, data),
        }
    }

    pub fn prg_ram(&self) -> &[u8] {
        match self {
            Mapper::Nrom(board) => &board.prg_ram[..],
        }
    }

    pub fn prg_ram_mut(&mut self) -> &mut [u8] {
        match self {
            Mapper::Nrom(board) => &mut board.prg_ram[..],
        }
    }
}

/// Fixed-bank board (mapper 0).
///
/// * `$6000-$7FFF`: 8 KiB PRG RAM
/// * `$8000-$BFFF`: first 16 KiB of PRG ROM
/// * `$C000-$FFFF`: last 16 KiB of PRG ROM, or a mirror of the first page
///   when the image only carries one
pub struct Nrom {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    prg_rom_mask: u16,
}

impl Nrom {
    // `prg_rom` must hold at least one byte; `Mapper::new` checks this
    pub(crate) fn new(prg_rom: Vec<u8>, chr_rom: Vec<u8>) -> Self {
        let prg_rom_mask = if prg_rom.len() <= PRG_ROM_PAGE_SIZE {
            0xBFFF
        } else {
            0xFFFF
        };

        // Boards without CHR ROM solder in 8 KiB of CHR RAM instead
        let (chr, chr_is_ram) = if chr_rom.is_empty() {
            (vec![0; CHR_ROM_PAGE_SIZE], true)
        } else {
            (chr_rom, false)
        };

        Nrom {
            prg_rom,
            chr,
            chr_is_ram,
            prg_ram: vec![0xFF; PRG_RAM_SIZE],
            prg_rom_mask,
        }
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize],
            0x8000..=0xFFFF => {
                let offset = ((addr & self.prg_rom_mask) - 0x8000) as usize;
                self.prg_rom[offset % self.prg_rom.len()]
            }
            // Expansion area, nothing on this board drives it
            _ => 0,
        }
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize] = data,
            0x8000..=0xFFFF => {
                log::debug!("NROM: ignored write ${:02X} to ROM at ${:04X}", data, addr);
            }
            _ => {}
        }
    }

    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.chr[(addr as usize) & (CHR_ROM_PAGE_SIZE - 1)]
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        if self.chr_is_ram {
            self.chr[(addr as usize) & (CHR_ROM_PAGE_SIZE - 1)] = data;
        }
    }
}
