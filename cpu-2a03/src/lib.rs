//! Ricoh 2A03 CPU emulator.
//!
//! The 2A03 is the NES's CPU: an NMOS 6502 with decimal mode removed.
//! The D flag still toggles, but ADC/SBC always run in binary.
//!
//! Timing is whole-instruction: each step charges the decoded opcode's
//! base cycle count plus any branch or page-cross penalties, rather than
//! emulating per-access T-states. A step either services one pending
//! interrupt (7 cycles) or runs one instruction:
//!
//! ```text
//! service pending interrupt
//!   -> else fetch opcode at PC
//!   -> decode through the 256-entry table
//!   -> resolve the operand (advancing PC)
//!   -> execute
//!   -> charge base cycles
//! ```
//!
//! Undocumented opcodes are not implemented: decoding one halts the CPU,
//! and the halt is observable through `state()`.

use nes_core::{Bus, Cpu, CpuState, Interrupt, InterruptLines};

mod addressing;
pub mod flags;
mod registers;
pub mod table;
pub mod trace;

pub use addressing::Operand;
pub use flags::Status;
pub use registers::Registers;

use table::{Instr, OpInfo, OPCODES};

/// Interrupt vector locations.
const VECTOR_NMI: u16 = 0xFFFA;
const VECTOR_RESET: u16 = 0xFFFC;
const VECTOR_IRQ: u16 = 0xFFFE;

/// Headless nestest builds enter RESET at a fixed PC instead of
/// reading the vector.
#[cfg(feature = "nestest")]
const RESET_PC_OVERRIDE: Option<u16> = Some(0xC000);
#[cfg(not(feature = "nestest"))]
const RESET_PC_OVERRIDE: Option<u16> = None;

/// The Ricoh 2A03 CPU.
///
/// Borrows the memory bus and the interrupt latch for the duration of a
/// step; it owns neither. The surrounding machine drives it from a
/// single thread, typically advancing the PPU by three times the cycles
/// each step reports.
pub struct Ricoh2A03 {
    /// Register file.
    pub regs: Registers,
    /// Running or Halted. Halted is terminal until a power-cycle or
    /// reset.
    state: CpuState,
    /// Total cycles since power-up.
    pub(crate) cycles: u64,
}

impl Ricoh2A03 {
    /// Create a CPU in power-up state. The initial PC is established by
    /// the RESET service on the first step; queue RESET on the latch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::power_on(),
            state: CpuState::Running,
            cycles: 0,
        }
    }

    /// Total cycles since power-up.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Enter an interrupt service routine.
    ///
    /// Sets I, pushes PC and status (except for RESET), charges 7
    /// cycles, loads PC from the kind's vector and clears the line. For
    /// a BRK-initiated service the pushed status carries B=1; hardware
    /// IRQ/NMI push B=0.
    fn service_interrupt(
        &mut self,
        bus: &mut impl Bus,
        lines: &mut InterruptLines,
        kind: Interrupt,
        brk: bool,
    ) {
        self.regs.p.set(flags::I);

        if kind != Interrupt::Reset {
            self.push16(bus, self.regs.pc);
            let status = self.regs.p.to_pushed(brk);
            self.push(bus, status);
        }

        self.cycles += 7;

        self.regs.pc = match kind {
            Interrupt::Irq => bus.read16(VECTOR_IRQ),
            Interrupt::Reset => match RESET_PC_OVERRIDE {
                Some(pc) => pc,
                None => bus.read16(VECTOR_RESET),
            },
            Interrupt::Nmi => bus.read16(VECTOR_NMI),
        };

        lines.service(kind);
    }

    fn execute(
        &mut self,
        bus: &mut impl Bus,
        lines: &mut InterruptLines,
        op: &OpInfo,
        operand: Operand,
        opcode: u8,
        op_pc: u16,
    ) {
        match op.instr {
            // Load / store
            Instr::Lda => {
                self.regs.a = self.operand_value(bus, operand);
                self.regs.p.update_zn(self.regs.a);
            }
            Instr::Ldx => {
                self.regs.x = self.operand_value(bus, operand);
                self.regs.p.update_zn(self.regs.x);
            }
            Instr::Ldy => {
                self.regs.y = self.operand_value(bus, operand);
                self.regs.p.update_zn(self.regs.y);
            }
            Instr::Sta => self.store(bus, operand, self.regs.a),
            Instr::Stx => self.store(bus, operand, self.regs.x),
            Instr::Sty => self.store(bus, operand, self.regs.y),

            // Transfers
            Instr::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_zn(self.regs.x);
            }
            Instr::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_zn(self.regs.y);
            }
            Instr::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_zn(self.regs.a);
            }
            Instr::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_zn(self.regs.a);
            }
            Instr::Tsx => {
                self.regs.x = self.regs.s;
                self.regs.p.update_zn(self.regs.x);
            }
            Instr::Txs => self.regs.s = self.regs.x,

            // Stack
            Instr::Pha => self.push(bus, self.regs.a),
            Instr::Pla => {
                self.regs.a = self.pull(bus);
                self.regs.p.update_zn(self.regs.a);
            }
            Instr::Php => {
                let status = self.regs.p.to_pushed(true);
                self.push(bus, status);
            }
            Instr::Plp => {
                let status = self.pull(bus);
                self.regs.p = Status::from_pulled(status);
            }

            // Logical
            Instr::And => {
                self.regs.a &= self.operand_value(bus, operand);
                self.regs.p.update_zn(self.regs.a);
            }
            Instr::Ora => {
                self.regs.a |= self.operand_value(bus, operand);
                self.regs.p.update_zn(self.regs.a);
            }
            Instr::Eor => {
                self.regs.a ^= self.operand_value(bus, operand);
                self.regs.p.update_zn(self.regs.a);
            }
            Instr::Bit => {
                let value = self.operand_value(bus, operand);
                self.regs.p.set_if(flags::Z, self.regs.a & value == 0);
                self.regs.p.set_if(flags::V, value & 0x40 != 0);
                self.regs.p.set_if(flags::N, value & 0x80 != 0);
            }

            // Arithmetic
            Instr::Adc => {
                let value = self.operand_value(bus, operand);
                self.adc(value);
            }
            Instr::Sbc => {
                let value = self.operand_value(bus, operand);
                self.adc(!value);
            }

            // Compare
            Instr::Cmp => {
                let value = self.operand_value(bus, operand);
                self.compare(self.regs.a, value);
            }
            Instr::Cpx => {
                let value = self.operand_value(bus, operand);
                self.compare(self.regs.x, value);
            }
            Instr::Cpy => {
                let value = self.operand_value(bus, operand);
                self.compare(self.regs.y, value);
            }

            // Increment / decrement
            Instr::Inc => {
                let value = self.read_target(bus, operand).wrapping_add(1);
                self.regs.p.update_zn(value);
                self.write_target(bus, operand, value);
            }
            Instr::Dec => {
                let value = self.read_target(bus, operand).wrapping_sub(1);
                self.regs.p.update_zn(value);
                self.write_target(bus, operand, value);
            }
            Instr::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_zn(self.regs.x);
            }
            Instr::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_zn(self.regs.y);
            }
            Instr::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_zn(self.regs.x);
            }
            Instr::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_zn(self.regs.y);
            }

            // Shifts and rotates, on A or on a memory byte
            Instr::Asl => {
                let input = self.read_target(bus, operand);
                self.regs.p.set_if(flags::C, input & 0x80 != 0);
                let output = input << 1;
                self.regs.p.update_zn(output);
                self.write_target(bus, operand, output);
            }
            Instr::Lsr => {
                let input = self.read_target(bus, operand);
                self.regs.p.set_if(flags::C, input & 0x01 != 0);
                let output = input >> 1;
                self.regs.p.update_zn(output);
                self.write_target(bus, operand, output);
            }
            Instr::Rol => {
                let input = self.read_target(bus, operand);
                let carry_in = u8::from(self.regs.p.is_set(flags::C));
                self.regs.p.set_if(flags::C, input & 0x80 != 0);
                let output = (input << 1) | carry_in;
                self.regs.p.update_zn(output);
                self.write_target(bus, operand, output);
            }
            Instr::Ror => {
                let input = self.read_target(bus, operand);
                let carry_in = u8::from(self.regs.p.is_set(flags::C));
                self.regs.p.set_if(flags::C, input & 0x01 != 0);
                let output = (input >> 1) | (carry_in << 7);
                self.regs.p.update_zn(output);
                self.write_target(bus, operand, output);
            }

            // Jumps and subroutines
            Instr::Jmp => {
                if let Operand::Address(addr) = operand {
                    self.regs.pc = addr;
                }
            }
            Instr::Jsr => {
                if let Operand::Address(addr) = operand {
                    // PC already points past the operand; the pushed
                    // return address is one short of the next opcode.
                    let ret = self.regs.pc.wrapping_sub(1);
                    self.push16(bus, ret);
                    self.regs.pc = addr;
                }
            }
            Instr::Rts => {
                self.regs.pc = self.pull16(bus).wrapping_add(1);
            }
            Instr::Rti => {
                let status = self.pull(bus);
                self.regs.p = Status::from_pulled(status);
                // Unlike RTS, the pulled PC is used as-is.
                self.regs.pc = self.pull16(bus);
            }

            // Branches
            Instr::Bcs => self.branch(bus, operand, self.regs.p.is_set(flags::C)),
            Instr::Bcc => self.branch(bus, operand, !self.regs.p.is_set(flags::C)),
            Instr::Beq => self.branch(bus, operand, self.regs.p.is_set(flags::Z)),
            Instr::Bne => self.branch(bus, operand, !self.regs.p.is_set(flags::Z)),
            Instr::Bmi => self.branch(bus, operand, self.regs.p.is_set(flags::N)),
            Instr::Bpl => self.branch(bus, operand, !self.regs.p.is_set(flags::N)),
            Instr::Bvs => self.branch(bus, operand, self.regs.p.is_set(flags::V)),
            Instr::Bvc => self.branch(bus, operand, !self.regs.p.is_set(flags::V)),

            // Flag operations
            Instr::Clc => self.regs.p.clear(flags::C),
            Instr::Sec => self.regs.p.set(flags::C),
            Instr::Cli => self.regs.p.clear(flags::I),
            Instr::Sei => self.regs.p.set(flags::I),
            Instr::Clv => self.regs.p.clear(flags::V),
            Instr::Cld => self.regs.p.clear(flags::D),
            Instr::Sed => self.regs.p.set(flags::D),

            // System
            Instr::Brk => {
                // The byte after BRK is padding; the pushed return
                // address skips it. Forces the service past the I gate.
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.service_interrupt(bus, lines, Interrupt::Irq, true);
            }
            Instr::Nop => {}

            Instr::Ill => {
                log::warn!(
                    "unimplemented opcode ${opcode:02X} at ${op_pc:04X}; CPU halted"
                );
                self.state = CpuState::Halted;
            }
        }
    }

    /// Read the instruction's input value: the accumulator or the byte
    /// at the effective address (which for immediate mode is the operand
    /// byte itself).
    fn operand_value(&mut self, bus: &mut impl Bus, operand: Operand) -> u8 {
        match operand {
            Operand::Address(addr) => bus.read(addr),
            Operand::Accumulator => self.regs.a,
            Operand::None => 0,
        }
    }

    fn store(&mut self, bus: &mut impl Bus, operand: Operand, value: u8) {
        if let Operand::Address(addr) = operand {
            bus.write(addr, value);
        }
    }

    /// Read the read-modify-write target (A or a memory byte).
    fn read_target(&mut self, bus: &mut impl Bus, operand: Operand) -> u8 {
        self.operand_value(bus, operand)
    }

    /// Write the read-modify-write target back.
    fn write_target(&mut self, bus: &mut impl Bus, operand: Operand, value: u8) {
        match operand {
            Operand::Address(addr) => bus.write(addr, value),
            Operand::Accumulator => self.regs.a = value,
            Operand::None => {}
        }
    }

    /// Add value + C into A, setting C, Z, V, N. SBC is this with the
    /// operand complemented.
    fn adc(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(flags::C));
        let sum = u16::from(a) + u16::from(value) + carry;
        let result = sum as u8;

        self.regs.p.set_if(flags::C, sum > 0xFF);
        self.regs.p.set_if(flags::V, !(a ^ value) & (a ^ result) & 0x80 != 0);
        self.regs.p.update_zn(result);
        self.regs.a = result;
    }

    /// CMP/CPX/CPY: C when the register is >= the operand, Z/N from the
    /// wrapped difference.
    fn compare(&mut self, register: u8, value: u8) {
        self.regs.p.set_if(flags::C, register >= value);
        self.regs.p.update_zn(register.wrapping_sub(value));
    }

    /// Take a branch if `condition` holds: +1 cycle, and +2 more when
    /// the target lies in a different page than the PC after the
    /// operand.
    fn branch(&mut self, bus: &mut impl Bus, operand: Operand, condition: bool) {
        let addr = match operand {
            Operand::Address(addr) => addr,
            _ => return,
        };
        if !condition {
            return;
        }

        let offset = bus.read(addr) as i8;
        self.cycles += 1;

        let target = self.regs.pc.wrapping_add(offset as u16);
        if (self.regs.pc ^ target) & 0xFF00 != 0 {
            self.cycles += 2;
        }
        self.regs.pc = target;
    }

    /// Push a byte onto the stack at $0100 + S, then decrement S.
    fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(0x0100 | u16::from(self.regs.s), value);
        self.regs.s = self.regs.s.wrapping_sub(1);
    }

    /// Increment S, then read the byte at $0100 + S.
    fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.regs.s = self.regs.s.wrapping_add(1);
        bus.read(0x0100 | u16::from(self.regs.s))
    }

    /// Push a 16-bit word, high byte first.
    fn push16(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    /// Pull a 16-bit word, low byte first.
    fn pull16(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.pull(bus);
        let high = self.pull(bus);
        u16::from_le_bytes([low, high])
    }
}

impl Default for Ricoh2A03 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu for Ricoh2A03 {
    fn step<B: Bus>(&mut self, bus: &mut B, lines: &mut InterruptLines) -> u32 {
        if self.state == CpuState::Halted {
            return 0;
        }

        let start = self.cycles;

        // Service pending interrupts first. A latched IRQ is ignored
        // (and stays latched) while I is set; NMI and RESET are not
        // maskable.
        if let Some(kind) = lines.get() {
            if kind != Interrupt::Irq || !self.regs.p.is_set(flags::I) {
                self.service_interrupt(bus, lines, kind, false);
                return (self.cycles - start) as u32;
            }
        }

        let op_pc = self.regs.pc;
        let opcode = self.fetch(bus);
        let op = &OPCODES[opcode as usize];

        let operand = self.resolve(bus, op);
        self.execute(bus, lines, op, operand, opcode, op_pc);
        self.cycles += u64::from(op.cycles);

        (self.cycles - start) as u32
    }

    fn power_cycle(&mut self) {
        self.regs = Registers::power_on();
        self.state = CpuState::Running;
        self.cycles = 0;
    }

    fn reset(&mut self) {
        // The stack pointer drops by 3 without any actual writes.
        self.regs.s = self.regs.s.wrapping_sub(3);
        self.regs.p.set(flags::I);
        self.state = CpuState::Running;
    }

    fn state(&self) -> CpuState {
        self.state
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }
}
