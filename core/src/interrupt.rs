//! Interrupt lines shared between the CPU and the rest of the console.
//!
//! The latch only tracks which lines are pending. Priority between lines
//! is fixed (NMI over RESET over IRQ), but the decision to honour or
//! ignore a line (the I-flag gate on IRQ) belongs to the CPU core.

/// The three interrupt lines of the 2A03.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Maskable interrupt, asserted by the APU frame counter or a mapper.
    /// Level-sensitive in intent: whoever asserted it withdraws it.
    Irq,
    /// Power-on / reset line.
    Reset,
    /// Non-maskable interrupt, asserted by the PPU at VBlank.
    Nmi,
}

/// Latched pending interrupts.
#[derive(Debug, Default, Clone)]
pub struct InterruptLines {
    nmi: bool,
    reset: bool,
    irq: bool,
}

impl InterruptLines {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch a line.
    pub fn request(&mut self, kind: Interrupt) {
        match kind {
            Interrupt::Irq => self.irq = true,
            Interrupt::Reset => self.reset = true,
            Interrupt::Nmi => self.nmi = true,
        }
    }

    /// Highest-priority pending line, if any. NMI > RESET > IRQ.
    #[must_use]
    pub fn get(&self) -> Option<Interrupt> {
        if self.nmi {
            Some(Interrupt::Nmi)
        } else if self.reset {
            Some(Interrupt::Reset)
        } else if self.irq {
            Some(Interrupt::Irq)
        } else {
            None
        }
    }

    /// Clear one specific line once the CPU has committed to handling it.
    pub fn service(&mut self, kind: Interrupt) {
        match kind {
            Interrupt::Irq => self.irq = false,
            Interrupt::Reset => self.reset = false,
            Interrupt::Nmi => self.nmi = false,
        }
    }
}
