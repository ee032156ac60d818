//! NES machine composition.
//!
//! Wires the 2A03 CPU to the CPU-side memory map and the interrupt
//! latch. A full console would extend the driver loop: after each CPU
//! step, advance the PPU by three times the reported cycles and the APU
//! by the same count, with those collaborators asserting NMI/IRQ
//! through the interrupt latch.

use cpu_2a03::{trace, Ricoh2A03};
use nes_core::{Cpu, CpuState, Interrupt, InterruptLines};

use crate::cartridge::Cartridge;
use crate::memory::NesMemory;

/// The Nintendo Entertainment System, reduced to its CPU-visible core.
pub struct Nes {
    cpu: Ricoh2A03,
    memory: NesMemory,
    interrupts: InterruptLines,
    total_cycles: u64,
}

impl Nes {
    /// Build a console around a cartridge, powered on with a RESET
    /// queued so the first step loads the reset vector.
    #[must_use]
    pub fn new(cartridge: Cartridge) -> Self {
        let mut memory = NesMemory::new();
        memory.load_cartridge(cartridge);

        let mut nes = Self {
            cpu: Ricoh2A03::new(),
            memory,
            interrupts: InterruptLines::new(),
            total_cycles: 0,
        };
        nes.power_cycle();
        nes
    }

    /// Power-cycle the CPU and queue a RESET service.
    pub fn power_cycle(&mut self) {
        self.cpu.power_cycle();
        self.interrupts.request(Interrupt::Reset);
        self.total_cycles = 0;
    }

    /// Reset without clearing power-up state, queueing the RESET
    /// service that reloads PC from the vector.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.interrupts.request(Interrupt::Reset);
    }

    /// Service one pending interrupt or run one instruction. Returns
    /// cycles consumed.
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.memory, &mut self.interrupts);
        self.total_cycles += u64::from(cycles);
        cycles
    }

    /// nestest-format trace of the instruction the next step would run.
    pub fn trace_line(&mut self) -> String {
        trace::trace_line(&self.cpu, &mut self.memory)
    }

    #[must_use]
    pub fn cpu(&self) -> &Ricoh2A03 {
        &self.cpu
    }

    /// Direct register access, for harnesses that override the entry
    /// point the way the headless nestest run does.
    pub fn cpu_mut(&mut self) -> &mut Ricoh2A03 {
        &mut self.cpu
    }

    #[must_use]
    pub fn memory(&self) -> &NesMemory {
        &self.memory
    }

    /// Interrupt latch; external collaborators (PPU VBlank, APU frame
    /// counter, mappers) assert their lines here.
    pub fn interrupts_mut(&mut self) -> &mut InterruptLines {
        &mut self.interrupts
    }

    #[must_use]
    pub fn state(&self) -> CpuState {
        self.cpu.state()
    }

    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }
}
