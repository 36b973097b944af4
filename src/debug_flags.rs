use std::path::PathBuf;
use std::sync::OnceLock;

use crate::trace::DEFAULT_LINE_LIMIT;

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

/// Accepts `C000`, `$C000` or `0xC000`.
pub fn parse_hex_u16(text: &str) -> Option<u16> {
    let digits = text
        .trim()
        .trim_start_matches('$')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    u16::from_str_radix(digits, 16).ok()
}

pub fn quiet() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| env_flag("QUIET", false))
}

// Where to write the per-instruction trace, if anywhere
pub fn trace_path() -> Option<PathBuf> {
    static PATH: OnceLock<Option<PathBuf>> = OnceLock::new();
    PATH.get_or_init(|| {
        std::env::var("NES_TRACE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
    .clone()
}

pub fn trace_limit() -> usize {
    static LIMIT: OnceLock<usize> = OnceLock::new();
    *LIMIT.get_or_init(|| env_usize("NES_TRACE_LIMIT", DEFAULT_LINE_LIMIT))
}

// Overrides PC after reset. Automated CPU test ROMs start at $C000.
pub fn start_pc() -> Option<u16> {
    static PC: OnceLock<Option<u16>> = OnceLock::new();
    *PC.get_or_init(|| {
        std::env::var("NES_START_PC")
            .ok()
            .and_then(|v| parse_hex_u16(&v))
    })
}

/// Instruction budget for the runner; `None` runs until interrupted.
pub fn steps() -> Option<u64> {
    static STEPS: OnceLock<Option<u64>> = OnceLock::new();
    *STEPS.get_or_init(|| {
        std::env::var("NES_STEPS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
    })
}

pub fn save_state_path() -> Option<PathBuf> {
    static PATH: OnceLock<Option<PathBuf>> = OnceLock::new();
    PATH.get_or_init(|| {
        std::env::var("NES_SAVE_STATE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
    .clone()
}
