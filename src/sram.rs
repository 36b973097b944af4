//! Battery-backed PRG RAM persisted as a `.sav` file next to the ROM.

use std::fs::{create_dir_all, File};
use std::io::{Read, Result, Write};
use std::path::{Path, PathBuf};

pub fn get_save_file_path<P: AsRef<Path>>(rom_path: P) -> PathBuf {
    let mut save_path = rom_path.as_ref().to_path_buf();
    save_path.set_extension("sav");
    save_path
}

pub fn load_sram<P: AsRef<Path>>(rom_path: P) -> Result<Option<Vec<u8>>> {
    let save_path = get_save_file_path(rom_path);

    if !save_path.exists() {
        log::info!("No save file found, starting with fresh PRG RAM");
        return Ok(None);
    }

    let mut file = File::open(&save_path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    log::info!("Loaded {} bytes from {}", data.len(), save_path.display());
    Ok(Some(data))
}

pub fn save_sram<P: AsRef<Path>>(rom_path: P, data: &[u8]) -> Result<()> {
    let save_path = get_save_file_path(rom_path);

    if let Some(parent) = save_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&save_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    log::info!("Saved {} bytes to {}", data.len(), save_path.display());
    Ok(())
}

/// Copies a loaded save into PRG RAM. Short files fill the front; extra
/// bytes are dropped.
pub fn apply_sram(prg_ram: &mut [u8], data: &[u8]) {
    let len = prg_ram.len().min(data.len());
    if data.len() != prg_ram.len() {
        log::warn!(
            "Save file is {} bytes, PRG RAM is {}; copying {}",
            data.len(),
            prg_ram.len(),
            len
        );
    }
    prg_ram[..len].copy_from_slice(&data[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_rom(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nes-cpu-sram-{}", std::process::id()));
        dir.join(name)
    }

    #[test]
    fn save_path_swaps_extension() {
        assert_eq!(
            get_save_file_path("roms/game.nes"),
            PathBuf::from("roms/game.sav")
        );
        assert_eq!(get_save_file_path("game"), PathBuf::from("game.sav"));
    }

    #[test]
    fn missing_save_is_none() {
        let rom = temp_rom("missing.nes");
        assert!(load_sram(&rom).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let rom = temp_rom("battery.nes");
        let data: Vec<u8> = (0..=255u8).cycle().take(0x2000).collect();
        save_sram(&rom, &data).unwrap();

        let loaded = load_sram(&rom).unwrap().unwrap();
        assert_eq!(loaded, data);

        std::fs::remove_file(get_save_file_path(&rom)).unwrap();
    }

    #[test]
    fn apply_handles_size_mismatch() {
        let mut ram = vec![0xFF; 8];
        apply_sram(&mut ram, &[1, 2, 3]);
        assert_eq!(ram, vec![1, 2, 3, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

        apply_sram(&mut ram, &[9; 16]);
        assert_eq!(ram, vec![9; 8]);
    }
}
