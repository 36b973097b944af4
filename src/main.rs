use std::env;
use std::path::{Path, PathBuf};
use std::process;

use nes_cpu::cartridge::Cartridge;
use nes_cpu::shutdown::{self, RunOutputs};
use nes_cpu::{debug_flags, sram, Bus, Cpu, Tracer};

fn usage(program: &str) {
    eprintln!(
        "Usage: {} [--trace FILE] [--steps N] [--start-pc HEX] [--save-state FILE] <rom.nes>",
        program
    );
}

// Flags are forwarded as environment variables so `debug_flags` stays the
// single source of configuration.
fn parse_args(args: &[String]) -> PathBuf {
    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        usage(&args[0]);
        process::exit(if args.len() < 2 { 2 } else { 0 });
    }

    let mut rom_arg: Option<String> = None;
    let mut i = 1;
    while i < args.len() {
        let var = match args[i].as_str() {
            "--trace" => "NES_TRACE",
            "--steps" => "NES_STEPS",
            "--start-pc" => "NES_START_PC",
            "--save-state" => "NES_SAVE_STATE",
            s if s.starts_with('-') => {
                eprintln!("Unknown option: {}", s);
                process::exit(2);
            }
            s => {
                if rom_arg.is_some() {
                    eprintln!("Unexpected argument: {}", s);
                    process::exit(2);
                }
                rom_arg = Some(s.to_string());
                i += 1;
                continue;
            }
        };
        if i + 1 >= args.len() {
            eprintln!("{} requires a value", args[i]);
            process::exit(2);
        }
        env::set_var(var, &args[i + 1]);
        i += 2;
    }

    match rom_arg {
        Some(rom) => PathBuf::from(rom),
        None => {
            eprintln!("ROM argument missing");
            process::exit(2);
        }
    }
}

fn init_logging() {
    let default = if debug_flags::quiet() { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let rom_path = parse_args(&args);
    init_logging();

    shutdown::install();

    if let Err(e) = run(&rom_path) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn run(rom_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Loading ROM: {}", rom_path.display());
    let cartridge = Cartridge::load(rom_path)?;
    let battery = cartridge.has_battery();

    let mut bus = Bus::with_cartridge(cartridge);
    let mut cpu = Cpu::new();

    if battery {
        if let Some(data) = sram::load_sram(rom_path)? {
            if let Some(cart) = bus.cartridge_mut() {
                sram::apply_sram(cart.prg_ram_mut(), &data);
            }
        }
    }

    if let Some(path) = debug_flags::trace_path() {
        cpu.set_tracer(Tracer::to_file(&path)?.with_limit(debug_flags::trace_limit()));
    }

    // Reset sequence
    cpu.tick(&mut bus);
    if let Some(pc) = debug_flags::start_pc() {
        log::info!("Starting at PC=${:04X} instead of the reset vector", pc);
        cpu.pc = pc;
    } else if env::var("NES_START_PC").is_ok() {
        log::warn!("Ignoring NES_START_PC: expected a 16-bit hex address");
    }

    let budget = debug_flags::steps();
    match budget {
        Some(n) => log::info!("Running {} instructions", n),
        None => log::info!("Running until interrupted"),
    }

    let reason = loop {
        if let Some(reason) = shutdown::check(&cpu, budget) {
            break reason;
        }
        cpu.tick(&mut bus);
    };

    let outputs = RunOutputs::new(rom_path, battery, debug_flags::save_state_path());
    shutdown::finish(&mut cpu, &bus, reason, &outputs)?;

    Ok(())
}
