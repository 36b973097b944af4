pub mod mapper;

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub use mapper::{Mapper, CHR_ROM_PAGE_SIZE, PRG_RAM_SIZE, PRG_ROM_PAGE_SIZE};

const HEADER_SIZE: usize = 16;
const MAGIC: &[u8; 4] = b"NES\x1a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

#[derive(Debug)]
pub enum CartridgeError {
    Io(std::io::Error),
    BadMagic,
    Truncated { expected: usize, actual: usize },
    EmptyPrgRom,
    Trainer,
    VsUnisystem,
    PlayChoice,
    UnsupportedMapper(u16),
}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeError::Io(err) => write!(f, "I/O error: {}", err),
            CartridgeError::BadMagic => write!(f, "Invalid NES file format (bad magic)"),
            CartridgeError::Truncated { expected, actual } => write!(
                f,
                "ROM image truncated: header declares {} bytes, file has {}",
                expected, actual
            ),
            CartridgeError::EmptyPrgRom => write!(f, "ROM image declares no PRG ROM"),
            CartridgeError::Trainer => write!(f, "Trainers are not supported"),
            CartridgeError::VsUnisystem => write!(f, "Vs. Unisystem games are not supported"),
            CartridgeError::PlayChoice => write!(f, "PlayChoice-10 games are not supported"),
            CartridgeError::UnsupportedMapper(id) => write!(f, "Mapper #{} is not supported", id),
        }
    }
}

impl std::error::Error for CartridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CartridgeError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CartridgeError {
    fn from(err: std::io::Error) -> Self {
        CartridgeError::Io(err)
    }
}

/// Decoded 16-byte iNES / NES 2.0 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub prg_rom_pages: u8,
    pub chr_rom_pages: u8,
    pub mapper_id: u16,
    pub mirroring: Mirroring,
    pub battery: bool,
    pub nes2: bool,
}

impl Header {
    pub fn parse(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_SIZE {
            return Err(if data.len() >= 4 && &data[0..4] != MAGIC {
                CartridgeError::BadMagic
            } else {
                CartridgeError::Truncated {
                    expected: HEADER_SIZE,
                    actual: data.len(),
                }
            });
        }
        if &data[0..4] != MAGIC {
            return Err(CartridgeError::BadMagic);
        }

        let prg_rom_pages = data[4];
        let chr_rom_pages = data[5];
        let flags6 = data[6];
        let flags7 = data[7];

        if flags6 & 0x04 != 0 {
            return Err(CartridgeError::Trainer);
        }
        if flags7 & 0x01 != 0 {
            return Err(CartridgeError::VsUnisystem);
        }
        if flags7 & 0x02 != 0 {
            return Err(CartridgeError::PlayChoice);
        }

        let nes2 = flags7 & 0x0C == 0x08;
        let low = (flags6 >> 4) as u16;
        let mapper_id = if nes2 {
            low | (flags7 & 0xF0) as u16 | ((data[8] & 0x0F) as u16) << 8
        } else if data[12..16].iter().any(|&b| b != 0) {
            // Old dumping tools scribbled a signature over bytes 7-15,
            // so the upper nibble can't be trusted.
            low
        } else {
            low | (flags7 & 0xF0) as u16
        };

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Ok(Header {
            prg_rom_pages,
            chr_rom_pages,
            mapper_id,
            mirroring,
            battery: flags6 & 0x02 != 0,
            nes2,
        })
    }

    pub fn prg_rom_size(&self) -> usize {
        self.prg_rom_pages as usize * PRG_ROM_PAGE_SIZE
    }

    pub fn chr_rom_size(&self) -> usize {
        self.chr_rom_pages as usize * CHR_ROM_PAGE_SIZE
    }
}

/// A loaded cartridge: header metadata plus the board that owns the ROM
/// and RAM buffers.
pub struct Cartridge {
    pub header: Header,
    mapper: Mapper,
}

impl Cartridge {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let mut file = File::open(path.as_ref())?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = Header::parse(data)?;
        if header.prg_rom_pages == 0 {
            return Err(CartridgeError::EmptyPrgRom);
        }

        let prg_rom_start = HEADER_SIZE;
        let chr_rom_start = prg_rom_start + header.prg_rom_size();
        let end = chr_rom_start + header.chr_rom_size();
        if data.len() < end {
            return Err(CartridgeError::Truncated {
                expected: end,
                actual: data.len(),
            });
        }

        let prg_rom = data[prg_rom_start..chr_rom_start].to_vec();
        let chr_rom = data[chr_rom_start..end].to_vec();
        let mapper = Mapper::new(header.mapper_id, prg_rom, chr_rom)?;

        log::info!(
            "Cartridge loaded - Mapper: {} ({}), PRG ROM: {} x 16KB, CHR ROM: {} x 8KB, Mirroring: {:?}{}",
            header.mapper_id,
            mapper.name(),
            header.prg_rom_pages,
            header.chr_rom_pages,
            header.mirroring,
            if header.battery { ", battery" } else { "" }
        );

        Ok(Cartridge { header, mapper })
    }

    pub fn cpu_read(&self, addr: u16) -> u8 {
        self.mapper.cpu_read(addr)
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        self.mapper.cpu_write(addr, data);
    }

    // Character bus, driven by the video chip once it exists
    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.mapper.ppu_read(addr)
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        self.mapper.ppu_write(addr, data);
    }

    pub fn mirroring(&self) -> Mirroring {
        self.header.mirroring
    }

    pub fn mapper_number(&self) -> u16 {
        self.mapper.id()
    }

    pub fn has_battery(&self) -> bool {
        self.header.battery
    }

    pub fn prg_ram(&self) -> &[u8] {
        self.mapper.prg_ram()
    }

    pub fn prg_ram_mut(&mut self) -> &mut [u8] {
        self.mapper.prg_ram_mut()
    }
}

/// Builds an in-memory iNES image for tests.
#[cfg(test)]
pub(crate) fn build_ines(prg_pages: u8, chr_pages: u8, flags6: u8, flags7: u8) -> Vec<u8> {
    let mut image = vec![0u8; HEADER_SIZE];
    image[0..4].copy_from_slice(MAGIC);
    image[4] = prg_pages;
    image[5] = chr_pages;
    image[6] = flags6;
    image[7] = flags7;
    for page in 0..prg_pages as usize {
        image.extend((0..PRG_ROM_PAGE_SIZE).map(|i| (i as u8) ^ (page as u8)));
    }
    image.extend(std::iter::repeat(0u8).take(chr_pages as usize * CHR_ROM_PAGE_SIZE));
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_single_page_nrom() {
        let cart = Cartridge::from_bytes(&build_ines(1, 1, 0x00, 0x00)).unwrap();
        assert_eq!(cart.mapper_number(), 0);
        assert_eq!(cart.mirroring(), Mirroring::Horizontal);
        assert_eq!(cart.cpu_read(0x8000), cart.cpu_read(0xC000));
        assert_eq!(cart.cpu_read(0x8123), cart.cpu_read(0xC123));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut image = build_ines(1, 0, 0, 0);
        image[3] = 0x00;
        assert!(matches!(
            Cartridge::from_bytes(&image),
            Err(CartridgeError::BadMagic)
        ));
    }

    #[test]
    fn rejects_trainer() {
        let image = build_ines(1, 0, 0x04, 0);
        assert!(matches!(
            Cartridge::from_bytes(&image),
            Err(CartridgeError::Trainer)
        ));
    }

    #[test]
    fn rejects_vs_and_playchoice() {
        assert!(matches!(
            Cartridge::from_bytes(&build_ines(1, 0, 0, 0x01)),
            Err(CartridgeError::VsUnisystem)
        ));
        assert!(matches!(
            Cartridge::from_bytes(&build_ines(1, 0, 0, 0x02)),
            Err(CartridgeError::PlayChoice)
        ));
    }

    #[test]
    fn rejects_unsupported_mapper() {
        // MMC1: low nibble 1 in flags6
        let image = build_ines(1, 0, 0x10, 0);
        assert!(matches!(
            Cartridge::from_bytes(&image),
            Err(CartridgeError::UnsupportedMapper(1))
        ));
    }

    #[test]
    fn rejects_truncated_image() {
        let mut image = build_ines(2, 1, 0, 0);
        image.truncate(HEADER_SIZE + PRG_ROM_PAGE_SIZE);
        assert!(matches!(
            Cartridge::from_bytes(&image),
            Err(CartridgeError::Truncated { .. })
        ));
    }

    #[test]
    fn header_mirroring_and_battery() {
        let vertical = Header::parse(&build_ines(1, 0, 0x03, 0)).unwrap();
        assert_eq!(vertical.mirroring, Mirroring::Vertical);
        assert!(vertical.battery);

        let four = Header::parse(&build_ines(1, 0, 0x09, 0)).unwrap();
        assert_eq!(four.mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn mapper_id_from_both_nibbles() {
        let ines = Header::parse(&build_ines(1, 0, 0x40, 0x10)).unwrap();
        assert!(!ines.nes2);
        assert_eq!(ines.mapper_id, 0x14);

        let mut image = build_ines(1, 0, 0x40, 0x18);
        image[8] = 0x01;
        let nes2 = Header::parse(&image).unwrap();
        assert!(nes2.nes2);
        assert_eq!(nes2.mapper_id, 0x114);
    }

    #[test]
    fn dirty_header_ignores_upper_nibble() {
        let mut image = build_ines(1, 0, 0x20, 0x40);
        image[12..16].copy_from_slice(b"Dude");
        let header = Header::parse(&image).unwrap();
        assert_eq!(header.mapper_id, 0x02);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Cartridge::load("/nonexistent/definitely-missing.nes"),
            Err(CartridgeError::Io(_))
        ));
    }
}
