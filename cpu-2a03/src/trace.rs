//! nestest-format execution trace.
//!
//! Formats the instruction at the current PC as one canonical 80-column
//! log line:
//!
//! ```text
//! C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7
//! ```
//!
//! Memory operands carry the effective-address annotations the
//! reference log uses (`$33 = 00`, `$0300,X @ 0305 = 89`,
//! `($80,X) @ 80 = 0200 = 5A`, `($33),Y = 0400 @ 0400 = 7F`).
//!
//! Formatting reads the operand bytes and the effective address through
//! the ordinary bus read path. On RAM and ROM this is invisible; trace
//! with care around read-sensitive I/O registers.

use nes_core::Bus;

use crate::table::{AddrMode, Instr, OPCODES};
use crate::Ricoh2A03;

/// Format the instruction at PC plus the register state as a nestest
/// log line. Call before stepping the instruction.
pub fn trace_line<B: Bus>(cpu: &Ricoh2A03, bus: &mut B) -> String {
    let pc = cpu.regs.pc;
    let opcode = bus.read(pc);
    let op = &OPCODES[opcode as usize];

    let operand_len = op.mode.operand_len();
    let b1 = bus.read(pc.wrapping_add(1));
    let b2 = bus.read(pc.wrapping_add(2));

    let bytes = match operand_len {
        0 => format!("{opcode:02X}"),
        1 => format!("{opcode:02X} {b1:02X}"),
        _ => format!("{opcode:02X} {b1:02X} {b2:02X}"),
    };

    let operand = disassemble_operand(cpu, bus, op.instr, op.mode, pc, b1, b2);
    let asm = if operand.is_empty() {
        op.instr.mnemonic().to_string()
    } else {
        format!("{} {}", op.instr.mnemonic(), operand)
    };

    format!(
        "{pc:04X}  {bytes:<8}  {asm:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        cpu.regs.a, cpu.regs.x, cpu.regs.y, cpu.regs.p.0, cpu.regs.s, cpu.cycles
    )
}

fn disassemble_operand<B: Bus>(
    cpu: &Ricoh2A03,
    bus: &mut B,
    instr: Instr,
    mode: AddrMode,
    pc: u16,
    b1: u8,
    b2: u8,
) -> String {
    let word = u16::from_le_bytes([b1, b2]);
    match mode {
        AddrMode::Imm => format!("#${b1:02X}"),
        AddrMode::Zpg => {
            let value = bus.read(u16::from(b1));
            format!("${b1:02X} = {value:02X}")
        }
        AddrMode::ZpgX => {
            let addr = b1.wrapping_add(cpu.regs.x);
            let value = bus.read(u16::from(addr));
            format!("${b1:02X},X @ {addr:02X} = {value:02X}")
        }
        AddrMode::ZpgY => {
            let addr = b1.wrapping_add(cpu.regs.y);
            let value = bus.read(u16::from(addr));
            format!("${b1:02X},Y @ {addr:02X} = {value:02X}")
        }
        AddrMode::Abs => {
            // Jump targets are plain addresses, not memory operands.
            if matches!(instr, Instr::Jmp | Instr::Jsr) {
                format!("${word:04X}")
            } else {
                let value = bus.read(word);
                format!("${word:04X} = {value:02X}")
            }
        }
        AddrMode::AbsX => {
            let addr = word.wrapping_add(u16::from(cpu.regs.x));
            let value = bus.read(addr);
            format!("${word:04X},X @ {addr:04X} = {value:02X}")
        }
        AddrMode::AbsY => {
            let addr = word.wrapping_add(u16::from(cpu.regs.y));
            let value = bus.read(addr);
            format!("${word:04X},Y @ {addr:04X} = {value:02X}")
        }
        AddrMode::Ind => {
            let target = bus.read16_zpg(word);
            format!("(${word:04X}) = {target:04X}")
        }
        AddrMode::XInd => {
            let pointer = b1.wrapping_add(cpu.regs.x);
            let addr = bus.read16_zpg(u16::from(pointer));
            let value = bus.read(addr);
            format!("(${b1:02X},X) @ {pointer:02X} = {addr:04X} = {value:02X}")
        }
        AddrMode::IndY => {
            let base = bus.read16_zpg(u16::from(b1));
            let addr = base.wrapping_add(u16::from(cpu.regs.y));
            let value = bus.read(addr);
            format!("(${b1:02X}),Y = {base:04X} @ {addr:04X} = {value:02X}")
        }
        AddrMode::Rel => {
            let target = pc.wrapping_add(2).wrapping_add(b1 as i8 as u16);
            format!("${target:04X}")
        }
        AddrMode::Acc => "A".to_string(),
        AddrMode::Impl | AddrMode::Invalid => String::new(),
    }
}
