use crate::{Bus, InterruptLines};

/// Operational state of a CPU core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    /// Executing instructions normally.
    Running,
    /// Stopped after decoding an unimplemented opcode. Terminal until an
    /// external power-cycle or reset.
    Halted,
}

/// A CPU that can execute instructions.
///
/// The CPU borrows the bus and the interrupt latch only for the
/// duration of a step; it owns neither.
pub trait Cpu {
    /// Service a pending interrupt or execute one instruction.
    /// Returns cycles consumed.
    fn step<B: Bus>(&mut self, bus: &mut B, lines: &mut InterruptLines) -> u32;

    /// Power-cycle the CPU to its power-up state. The caller must request
    /// RESET on the latch so the next step loads the reset vector.
    fn power_cycle(&mut self);

    /// Apply reset semantics to the register file. As with `power_cycle`,
    /// the caller must also request RESET on the latch.
    fn reset(&mut self);

    /// Running or Halted.
    fn state(&self) -> CpuState;

    /// Current program counter.
    fn pc(&self) -> u16;
}
