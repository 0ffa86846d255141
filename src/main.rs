use std::env;
use std::process;

use anyhow::{bail, Context, Result};
use nes_machine::{Cartridge, Nes};

const DEFAULT_STEPS: u64 = 10_000;

struct Options {
    rom: String,
    steps: u64,
    start_pc: Option<u16>,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <rom.nes> [--steps N] [--pc HEX]", program);
    eprintln!("  --steps N   instructions to run (default {})", DEFAULT_STEPS);
    eprintln!("  --pc HEX    jump here after reset, e.g. C000 for nestest automation");
    process::exit(2);
}

fn parse_args(args: &[String]) -> Options {
    let program = args.first().map(String::as_str).unwrap_or("nes-machine");
    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        usage(program);
    }

    let mut rom = None;
    let mut steps = DEFAULT_STEPS;
    let mut start_pc = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--steps" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("--steps requires a value");
                    process::exit(2);
                };
                steps = match value.parse() {
                    Ok(n) => n,
                    Err(_) => {
                        eprintln!("--steps: '{}' is not a number", value);
                        process::exit(2);
                    }
                };
                i += 2;
            }
            "--pc" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("--pc requires a value");
                    process::exit(2);
                };
                let digits = value.trim_start_matches('$').trim_start_matches("0x");
                start_pc = match u16::from_str_radix(digits, 16) {
                    Ok(pc) => Some(pc),
                    Err(_) => {
                        eprintln!("--pc: '{}' is not a 16-bit hex address", value);
                        process::exit(2);
                    }
                };
                i += 2;
            }
            s if s.starts_with('-') => {
                eprintln!("Unknown option: {}", s);
                process::exit(2);
            }
            s => {
                if rom.is_some() {
                    eprintln!("Only one ROM may be given");
                    process::exit(2);
                }
                rom = Some(s.to_string());
                i += 1;
            }
        }
    }

    match rom {
        Some(rom) => Options {
            rom,
            steps,
            start_pc,
        },
        None => {
            eprintln!("ROM argument missing");
            usage(program);
        }
    }
}

fn run(options: &Options) -> Result<()> {
    let cartridge = Cartridge::load(&options.rom)
        .with_context(|| format!("failed to load {}", options.rom))?;

    let mut nes = Nes::new();
    nes.insert(cartridge);
    nes.power_up();
    // Service the reset latch so the trace starts at the first instruction
    nes.step().context("reset failed")?;
    if let Some(pc) = options.start_pc {
        nes.cpu_mut().pc = pc;
    }

    for _ in 0..options.steps {
        println!("{}", nes.trace_line());
        if let Err(e) = nes.step() {
            bail!("stopped after {} cycles: {}", nes.cpu().cycles(), e);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    if let Err(e) = run(&options) {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}
