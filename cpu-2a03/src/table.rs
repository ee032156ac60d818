//! Opcode decode table.
//!
//! Maps each of the 256 opcode byte values to its instruction tag,
//! addressing mode, base cycle count, and page-cross penalty flag. The
//! 105 undefined byte values decode to [`Instr::Ill`] with an invalid
//! addressing mode; executing one halts the CPU.
//!
//! Base cycle counts are whole-instruction costs. Page-cross penalties
//! (+1 cycle when an indexed effective address lands in a different
//! 256-byte page than its base) apply only to the read-flavoured
//! absolute,X / absolute,Y / (zp),Y opcodes; stores always pay the fixed
//! worst-case count and are never flagged.

/// The 56 documented 6502 instructions, plus a tag for undefined bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
    /// Undefined opcode. Decoding one halts the CPU.
    Ill,
}

impl Instr {
    /// Assembler mnemonic, as it appears in a trace line.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Instr::Adc => "ADC", Instr::And => "AND", Instr::Asl => "ASL",
            Instr::Bcc => "BCC", Instr::Bcs => "BCS", Instr::Beq => "BEQ",
            Instr::Bit => "BIT", Instr::Bmi => "BMI", Instr::Bne => "BNE",
            Instr::Bpl => "BPL", Instr::Brk => "BRK", Instr::Bvc => "BVC",
            Instr::Bvs => "BVS", Instr::Clc => "CLC", Instr::Cld => "CLD",
            Instr::Cli => "CLI", Instr::Clv => "CLV", Instr::Cmp => "CMP",
            Instr::Cpx => "CPX", Instr::Cpy => "CPY", Instr::Dec => "DEC",
            Instr::Dex => "DEX", Instr::Dey => "DEY", Instr::Eor => "EOR",
            Instr::Inc => "INC", Instr::Inx => "INX", Instr::Iny => "INY",
            Instr::Jmp => "JMP", Instr::Jsr => "JSR", Instr::Lda => "LDA",
            Instr::Ldx => "LDX", Instr::Ldy => "LDY", Instr::Lsr => "LSR",
            Instr::Nop => "NOP", Instr::Ora => "ORA", Instr::Pha => "PHA",
            Instr::Php => "PHP", Instr::Pla => "PLA", Instr::Plp => "PLP",
            Instr::Rol => "ROL", Instr::Ror => "ROR", Instr::Rti => "RTI",
            Instr::Rts => "RTS", Instr::Sbc => "SBC", Instr::Sec => "SEC",
            Instr::Sed => "SED", Instr::Sei => "SEI", Instr::Sta => "STA",
            Instr::Stx => "STX", Instr::Sty => "STY", Instr::Tax => "TAX",
            Instr::Tay => "TAY", Instr::Tsx => "TSX", Instr::Txa => "TXA",
            Instr::Txs => "TXS", Instr::Tya => "TYA", Instr::Ill => "???",
        }
    }
}

/// The 13 addressing modes, plus the marker carried by undefined table
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// $nnnn
    Abs,
    /// $nnnn,X
    AbsX,
    /// $nnnn,Y
    AbsY,
    /// ($nnnn) - JMP only, page-wrapped high fetch
    Ind,
    /// ($nn),Y
    IndY,
    /// ($nn,X)
    XInd,
    /// $nn
    Zpg,
    /// $nn,X
    ZpgX,
    /// $nn,Y
    ZpgY,
    /// Branch offset
    Rel,
    /// #$nn
    Imm,
    /// Operates on A
    Acc,
    /// No operand
    Impl,
    /// Table entry for an undefined opcode.
    Invalid,
}

impl AddrMode {
    /// Operand bytes consumed from the instruction stream.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            AddrMode::Impl | AddrMode::Acc | AddrMode::Invalid => 0,
            AddrMode::Imm
            | AddrMode::Zpg
            | AddrMode::ZpgX
            | AddrMode::ZpgY
            | AddrMode::XInd
            | AddrMode::IndY
            | AddrMode::Rel => 1,
            AddrMode::Abs | AddrMode::AbsX | AddrMode::AbsY | AddrMode::Ind => 2,
        }
    }
}

/// One decode-table entry.
#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    pub instr: Instr,
    pub mode: AddrMode,
    /// Base cycle count, charged after execution. BRK carries 0 here;
    /// its whole cost is the 7-cycle interrupt service it triggers.
    pub cycles: u8,
    /// Charge one extra cycle when the indexed address crosses a page.
    pub page_cross: bool,
}

impl OpInfo {
    const fn new(instr: Instr, mode: AddrMode, cycles: u8, page_cross: bool) -> Self {
        Self {
            instr,
            mode,
            cycles,
            page_cross,
        }
    }

    const fn ill() -> Self {
        Self::new(Instr::Ill, AddrMode::Invalid, 0, false)
    }
}

/// The decode table, indexed by opcode byte.
pub static OPCODES: [OpInfo; 256] = {
    use AddrMode::*;
    use Instr::*;
    let mut t = [OpInfo::ill(); 256];

    // Load
    t[0xA9] = OpInfo::new(Lda, Imm, 2, false);
    t[0xA5] = OpInfo::new(Lda, Zpg, 3, false);
    t[0xB5] = OpInfo::new(Lda, ZpgX, 4, false);
    t[0xAD] = OpInfo::new(Lda, Abs, 4, false);
    t[0xBD] = OpInfo::new(Lda, AbsX, 4, true);
    t[0xB9] = OpInfo::new(Lda, AbsY, 4, true);
    t[0xA1] = OpInfo::new(Lda, XInd, 6, false);
    t[0xB1] = OpInfo::new(Lda, IndY, 5, true);
    t[0xA2] = OpInfo::new(Ldx, Imm, 2, false);
    t[0xA6] = OpInfo::new(Ldx, Zpg, 3, false);
    t[0xB6] = OpInfo::new(Ldx, ZpgY, 4, false);
    t[0xAE] = OpInfo::new(Ldx, Abs, 4, false);
    t[0xBE] = OpInfo::new(Ldx, AbsY, 4, true);
    t[0xA0] = OpInfo::new(Ldy, Imm, 2, false);
    t[0xA4] = OpInfo::new(Ldy, Zpg, 3, false);
    t[0xB4] = OpInfo::new(Ldy, ZpgX, 4, false);
    t[0xAC] = OpInfo::new(Ldy, Abs, 4, false);
    t[0xBC] = OpInfo::new(Ldy, AbsX, 4, true);

    // Store - fixed worst-case cost, never page-cross flagged
    t[0x85] = OpInfo::new(Sta, Zpg, 3, false);
    t[0x95] = OpInfo::new(Sta, ZpgX, 4, false);
    t[0x8D] = OpInfo::new(Sta, Abs, 4, false);
    t[0x9D] = OpInfo::new(Sta, AbsX, 5, false);
    t[0x99] = OpInfo::new(Sta, AbsY, 5, false);
    t[0x81] = OpInfo::new(Sta, XInd, 6, false);
    t[0x91] = OpInfo::new(Sta, IndY, 6, false);
    t[0x86] = OpInfo::new(Stx, Zpg, 3, false);
    t[0x96] = OpInfo::new(Stx, ZpgY, 4, false);
    t[0x8E] = OpInfo::new(Stx, Abs, 4, false);
    t[0x84] = OpInfo::new(Sty, Zpg, 3, false);
    t[0x94] = OpInfo::new(Sty, ZpgX, 4, false);
    t[0x8C] = OpInfo::new(Sty, Abs, 4, false);

    // Transfers
    t[0xAA] = OpInfo::new(Tax, Impl, 2, false);
    t[0xA8] = OpInfo::new(Tay, Impl, 2, false);
    t[0x8A] = OpInfo::new(Txa, Impl, 2, false);
    t[0x98] = OpInfo::new(Tya, Impl, 2, false);
    t[0xBA] = OpInfo::new(Tsx, Impl, 2, false);
    t[0x9A] = OpInfo::new(Txs, Impl, 2, false);

    // Stack
    t[0x48] = OpInfo::new(Pha, Impl, 3, false);
    t[0x68] = OpInfo::new(Pla, Impl, 4, false);
    t[0x08] = OpInfo::new(Php, Impl, 3, false);
    t[0x28] = OpInfo::new(Plp, Impl, 4, false);

    // Logical
    t[0x29] = OpInfo::new(And, Imm, 2, false);
    t[0x25] = OpInfo::new(And, Zpg, 3, false);
    t[0x35] = OpInfo::new(And, ZpgX, 4, false);
    t[0x2D] = OpInfo::new(And, Abs, 4, false);
    t[0x3D] = OpInfo::new(And, AbsX, 4, true);
    t[0x39] = OpInfo::new(And, AbsY, 4, true);
    t[0x21] = OpInfo::new(And, XInd, 6, false);
    t[0x31] = OpInfo::new(And, IndY, 5, true);
    t[0x09] = OpInfo::new(Ora, Imm, 2, false);
    t[0x05] = OpInfo::new(Ora, Zpg, 3, false);
    t[0x15] = OpInfo::new(Ora, ZpgX, 4, false);
    t[0x0D] = OpInfo::new(Ora, Abs, 4, false);
    t[0x1D] = OpInfo::new(Ora, AbsX, 4, true);
    t[0x19] = OpInfo::new(Ora, AbsY, 4, true);
    t[0x01] = OpInfo::new(Ora, XInd, 6, false);
    t[0x11] = OpInfo::new(Ora, IndY, 5, true);
    t[0x49] = OpInfo::new(Eor, Imm, 2, false);
    t[0x45] = OpInfo::new(Eor, Zpg, 3, false);
    t[0x55] = OpInfo::new(Eor, ZpgX, 4, false);
    t[0x4D] = OpInfo::new(Eor, Abs, 4, false);
    t[0x5D] = OpInfo::new(Eor, AbsX, 4, true);
    t[0x59] = OpInfo::new(Eor, AbsY, 4, true);
    t[0x41] = OpInfo::new(Eor, XInd, 6, false);
    t[0x51] = OpInfo::new(Eor, IndY, 5, true);
    t[0x24] = OpInfo::new(Bit, Zpg, 3, false);
    t[0x2C] = OpInfo::new(Bit, Abs, 4, false);

    // Arithmetic
    t[0x69] = OpInfo::new(Adc, Imm, 2, false);
    t[0x65] = OpInfo::new(Adc, Zpg, 3, false);
    t[0x75] = OpInfo::new(Adc, ZpgX, 4, false);
    t[0x6D] = OpInfo::new(Adc, Abs, 4, false);
    t[0x7D] = OpInfo::new(Adc, AbsX, 4, true);
    t[0x79] = OpInfo::new(Adc, AbsY, 4, true);
    t[0x61] = OpInfo::new(Adc, XInd, 6, false);
    t[0x71] = OpInfo::new(Adc, IndY, 5, true);
    t[0xE9] = OpInfo::new(Sbc, Imm, 2, false);
    t[0xE5] = OpInfo::new(Sbc, Zpg, 3, false);
    t[0xF5] = OpInfo::new(Sbc, ZpgX, 4, false);
    t[0xED] = OpInfo::new(Sbc, Abs, 4, false);
    t[0xFD] = OpInfo::new(Sbc, AbsX, 4, true);
    t[0xF9] = OpInfo::new(Sbc, AbsY, 4, true);
    t[0xE1] = OpInfo::new(Sbc, XInd, 6, false);
    t[0xF1] = OpInfo::new(Sbc, IndY, 5, true);

    // Compare
    t[0xC9] = OpInfo::new(Cmp, Imm, 2, false);
    t[0xC5] = OpInfo::new(Cmp, Zpg, 3, false);
    t[0xD5] = OpInfo::new(Cmp, ZpgX, 4, false);
    t[0xCD] = OpInfo::new(Cmp, Abs, 4, false);
    t[0xDD] = OpInfo::new(Cmp, AbsX, 4, true);
    t[0xD9] = OpInfo::new(Cmp, AbsY, 4, true);
    t[0xC1] = OpInfo::new(Cmp, XInd, 6, false);
    t[0xD1] = OpInfo::new(Cmp, IndY, 5, true);
    t[0xE0] = OpInfo::new(Cpx, Imm, 2, false);
    t[0xE4] = OpInfo::new(Cpx, Zpg, 3, false);
    t[0xEC] = OpInfo::new(Cpx, Abs, 4, false);
    t[0xC0] = OpInfo::new(Cpy, Imm, 2, false);
    t[0xC4] = OpInfo::new(Cpy, Zpg, 3, false);
    t[0xCC] = OpInfo::new(Cpy, Abs, 4, false);

    // Increment / decrement
    t[0xE6] = OpInfo::new(Inc, Zpg, 5, false);
    t[0xF6] = OpInfo::new(Inc, ZpgX, 6, false);
    t[0xEE] = OpInfo::new(Inc, Abs, 6, false);
    t[0xFE] = OpInfo::new(Inc, AbsX, 7, false);
    t[0xC6] = OpInfo::new(Dec, Zpg, 5, false);
    t[0xD6] = OpInfo::new(Dec, ZpgX, 6, false);
    t[0xCE] = OpInfo::new(Dec, Abs, 6, false);
    t[0xDE] = OpInfo::new(Dec, AbsX, 7, false);
    t[0xE8] = OpInfo::new(Inx, Impl, 2, false);
    t[0xC8] = OpInfo::new(Iny, Impl, 2, false);
    t[0xCA] = OpInfo::new(Dex, Impl, 2, false);
    t[0x88] = OpInfo::new(Dey, Impl, 2, false);

    // Shifts and rotates
    t[0x0A] = OpInfo::new(Asl, Acc, 2, false);
    t[0x06] = OpInfo::new(Asl, Zpg, 5, false);
    t[0x16] = OpInfo::new(Asl, ZpgX, 6, false);
    t[0x0E] = OpInfo::new(Asl, Abs, 6, false);
    t[0x1E] = OpInfo::new(Asl, AbsX, 7, false);
    t[0x4A] = OpInfo::new(Lsr, Acc, 2, false);
    t[0x46] = OpInfo::new(Lsr, Zpg, 5, false);
    t[0x56] = OpInfo::new(Lsr, ZpgX, 6, false);
    t[0x4E] = OpInfo::new(Lsr, Abs, 6, false);
    t[0x5E] = OpInfo::new(Lsr, AbsX, 7, false);
    t[0x2A] = OpInfo::new(Rol, Acc, 2, false);
    t[0x26] = OpInfo::new(Rol, Zpg, 5, false);
    t[0x36] = OpInfo::new(Rol, ZpgX, 6, false);
    t[0x2E] = OpInfo::new(Rol, Abs, 6, false);
    t[0x3E] = OpInfo::new(Rol, AbsX, 7, false);
    t[0x6A] = OpInfo::new(Ror, Acc, 2, false);
    t[0x66] = OpInfo::new(Ror, Zpg, 5, false);
    t[0x76] = OpInfo::new(Ror, ZpgX, 6, false);
    t[0x6E] = OpInfo::new(Ror, Abs, 6, false);
    t[0x7E] = OpInfo::new(Ror, AbsX, 7, false);

    // Jumps and subroutines
    t[0x4C] = OpInfo::new(Jmp, Abs, 3, false);
    t[0x6C] = OpInfo::new(Jmp, Ind, 5, false);
    t[0x20] = OpInfo::new(Jsr, Abs, 6, false);
    t[0x60] = OpInfo::new(Rts, Impl, 6, false);
    t[0x40] = OpInfo::new(Rti, Impl, 6, false);

    // Branches
    t[0x90] = OpInfo::new(Bcc, Rel, 2, false);
    t[0xB0] = OpInfo::new(Bcs, Rel, 2, false);
    t[0xF0] = OpInfo::new(Beq, Rel, 2, false);
    t[0xD0] = OpInfo::new(Bne, Rel, 2, false);
    t[0x10] = OpInfo::new(Bpl, Rel, 2, false);
    t[0x30] = OpInfo::new(Bmi, Rel, 2, false);
    t[0x50] = OpInfo::new(Bvc, Rel, 2, false);
    t[0x70] = OpInfo::new(Bvs, Rel, 2, false);

    // Flag operations
    t[0x18] = OpInfo::new(Clc, Impl, 2, false);
    t[0x38] = OpInfo::new(Sec, Impl, 2, false);
    t[0x58] = OpInfo::new(Cli, Impl, 2, false);
    t[0x78] = OpInfo::new(Sei, Impl, 2, false);
    t[0xB8] = OpInfo::new(Clv, Impl, 2, false);
    t[0xD8] = OpInfo::new(Cld, Impl, 2, false);
    t[0xF8] = OpInfo::new(Sed, Impl, 2, false);

    // System
    t[0x00] = OpInfo::new(Brk, Impl, 0, false);
    t[0xEA] = OpInfo::new(Nop, Impl, 2, false);

    t
};
