//! Addressing-mode resolution.
//!
//! Each instruction consumes 0, 1, or 2 operand bytes from the
//! instruction stream and resolves to a target: a memory address, the
//! accumulator, or nothing. Immediate and relative operands resolve to
//! the address of the operand byte itself; branches read it back as a
//! signed offset.

use nes_core::Bus;

use crate::table::{AddrMode, OpInfo};
use crate::Ricoh2A03;

/// Resolved instruction target.
///
/// Shift/rotate and load-style instructions dispatch on this tag to
/// choose between the accumulator and a memory byte; a sentinel address
/// is never used to mean A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Effective memory address (also the operand-byte address for
    /// immediate and relative modes).
    Address(u16),
    /// The instruction operates on A.
    Accumulator,
    /// No operand (implied mode, or an invalid table entry).
    None,
}

fn page_crossed(base: u16, effective: u16) -> bool {
    (base ^ effective) & 0xFF00 != 0
}

impl Ricoh2A03 {
    /// Fetch the byte at PC and advance PC.
    pub(crate) fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a 16-bit little-endian word at PC.
    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.fetch(bus);
        let high = self.fetch(bus);
        u16::from_le_bytes([low, high])
    }

    /// Resolve the operand for `op`, consuming its operand bytes and
    /// charging the page-cross penalty where the table flags it.
    pub(crate) fn resolve(&mut self, bus: &mut impl Bus, op: &OpInfo) -> Operand {
        match op.mode {
            AddrMode::Abs => Operand::Address(self.fetch_word(bus)),
            AddrMode::AbsX => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.regs.x));
                if op.page_cross && page_crossed(base, addr) {
                    self.cycles += 1;
                }
                Operand::Address(addr)
            }
            AddrMode::AbsY => {
                let base = self.fetch_word(bus);
                let addr = base.wrapping_add(u16::from(self.regs.y));
                if op.page_cross && page_crossed(base, addr) {
                    self.cycles += 1;
                }
                Operand::Address(addr)
            }
            AddrMode::Ind => {
                let pointer = self.fetch_word(bus);
                Operand::Address(bus.read16_zpg(pointer))
            }
            AddrMode::XInd => {
                let pointer = self.fetch(bus).wrapping_add(self.regs.x);
                Operand::Address(bus.read16_zpg(u16::from(pointer)))
            }
            AddrMode::IndY => {
                let pointer = self.fetch(bus);
                let base = bus.read16_zpg(u16::from(pointer));
                let addr = base.wrapping_add(u16::from(self.regs.y));
                if op.page_cross && page_crossed(base, addr) {
                    self.cycles += 1;
                }
                Operand::Address(addr)
            }
            AddrMode::Zpg => Operand::Address(u16::from(self.fetch(bus))),
            AddrMode::ZpgX => {
                let base = self.fetch(bus);
                Operand::Address(u16::from(base.wrapping_add(self.regs.x)))
            }
            AddrMode::ZpgY => {
                let base = self.fetch(bus);
                Operand::Address(u16::from(base.wrapping_add(self.regs.y)))
            }
            AddrMode::Rel | AddrMode::Imm => {
                let addr = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                Operand::Address(addr)
            }
            AddrMode::Acc => Operand::Accumulator,
            AddrMode::Impl => Operand::None,
            AddrMode::Invalid => {
                // Table-definition bug. Let execution fall through to the
                // unimplemented-instruction halt.
                log::error!(
                    "invalid addressing mode in decode table for {:?}",
                    op.instr
                );
                Operand::None
            }
        }
    }
}
