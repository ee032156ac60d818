//! Headless nestest conformance runner.
//!
//! Loads a nestest ROM, enters at the headless entry point ($C000),
//! prints one canonical trace line per instruction and optionally
//! compares every line against a reference log. The run ends at the
//! documented-opcode success address ($C66E), on CPU halt, or at the
//! instruction limit.
//!
//! nestest reports failure codes in zero page: $0002 for the official
//! opcode pass, $0003 for the unofficial pass. Both are printed in the
//! summary.

use std::env;
use std::fs;
use std::process;

use machine_nes::{Cartridge, Nes};
use nes_core::CpuState;

/// PC at which the documented-opcode section of nestest completes.
const SUCCESS_PC: u16 = 0xC66E;

/// Headless entry point used when the reset vector is not followed.
const HEADLESS_ENTRY: u16 = 0xC000;

struct Options {
    rom: String,
    log: Option<String>,
    entry: u16,
    follow_reset: bool,
    max_instrs: u64,
    quiet: bool,
}

fn usage() {
    eprintln!("Usage: nes-test-runner [OPTIONS] <rom.nes>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --log <file>      Compare each trace line against a reference log");
    eprintln!("  --entry <hex>     Entry point after reset (default C000)");
    eprintln!("  --follow-reset    Enter through the cartridge reset vector");
    eprintln!("  --max-instrs <n>  Stop after n instructions (default 10000)");
    eprintln!("  --quiet           Suppress trace output (comparison still runs)");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        rom: String::new(),
        log: None,
        entry: HEADLESS_ENTRY,
        follow_reset: false,
        max_instrs: 10_000,
        quiet: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--log" => {
                let value = iter.next().ok_or("--log requires a file argument")?;
                options.log = Some(value.clone());
            }
            "--entry" => {
                let value = iter.next().ok_or("--entry requires a hex address")?;
                let digits = value
                    .trim_start_matches("0x")
                    .trim_start_matches('$');
                options.entry = u16::from_str_radix(digits, 16)
                    .map_err(|e| format!("bad --entry value {value}: {e}"))?;
            }
            "--follow-reset" => options.follow_reset = true,
            "--max-instrs" => {
                let value = iter.next().ok_or("--max-instrs requires a number")?;
                options.max_instrs = value
                    .parse()
                    .map_err(|e| format!("bad --max-instrs value {value}: {e}"))?;
            }
            "--quiet" => options.quiet = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown argument: {other}"));
            }
            other => {
                if !options.rom.is_empty() {
                    return Err("more than one ROM argument".to_string());
                }
                options.rom = other.to_string();
            }
        }
    }

    if options.rom.is_empty() {
        return Err("no ROM file specified".to_string());
    }
    Ok(options)
}

/// The CYC field at the end of a trace line.
fn cyc_field(line: &str) -> Option<&str> {
    line.rfind("CYC:").map(|i| line[i + 4..].trim())
}

/// Compare our trace line against a reference line.
///
/// The instruction and register columns (through `SP:xx`, 73 columns)
/// must match exactly; the CYC fields are compared separately because
/// some reference logs carry a PPU dot/scanline column in between.
fn lines_match(ours: &str, reference: &str) -> bool {
    const PREFIX: usize = 73;
    if ours.len() < PREFIX || reference.len() < PREFIX {
        return ours == reference;
    }
    ours[..PREFIX] == reference[..PREFIX] && cyc_field(ours) == cyc_field(reference)
}

fn run(options: &Options) -> Result<bool, String> {
    let data = fs::read(&options.rom)
        .map_err(|e| format!("failed to read {}: {e}", options.rom))?;
    let cart = Cartridge::from_ines(&data)?;

    let reference: Option<Vec<String>> = match &options.log {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("failed to read {path}: {e}"))?;
            Some(text.lines().map(str::to_string).collect())
        }
        None => None,
    };

    let mut nes = Nes::new(cart);
    nes.step(); // RESET service establishes PC
    if !options.follow_reset {
        nes.cpu_mut().regs.pc = options.entry;
    }

    let mut executed: u64 = 0;
    let mut clean = true;

    loop {
        if nes.state() == CpuState::Halted {
            eprintln!(
                "CPU halted at ${:04X} after {executed} instructions",
                nes.cpu().regs.pc
            );
            clean = false;
            break;
        }
        if nes.cpu().regs.pc == SUCCESS_PC {
            break;
        }
        if executed >= options.max_instrs {
            eprintln!("instruction limit reached ({executed})");
            clean = false;
            break;
        }

        let line = nes.trace_line();
        if !options.quiet {
            println!("{line}");
        }

        if let Some(lines) = &reference {
            let index = executed as usize;
            if index >= lines.len() {
                eprintln!("ran past the end of the reference log at instruction {executed}");
                clean = false;
                break;
            }
            if !lines_match(&line, &lines[index]) {
                eprintln!("trace mismatch at instruction {executed}:");
                eprintln!("  ours: {line}");
                eprintln!("  ref:  {}", lines[index]);
                clean = false;
                break;
            }
        }

        nes.step();
        executed += 1;
    }

    let official = nes.memory().peek(0x0002);
    let unofficial = nes.memory().peek(0x0003);
    eprintln!(
        "ran {executed} instructions, {} cycles; $0002=${official:02X} $0003=${unofficial:02X}",
        nes.total_cycles()
    );

    Ok(clean && official == 0)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            usage();
            process::exit(1);
        }
    };

    match run(&options) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
