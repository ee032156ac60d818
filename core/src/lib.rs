//! Core traits and plumbing for the NES emulator.
//!
//! The CPU core borrows everything it talks to: the memory bus for the
//! duration of a step, and the interrupt latch as a separate resource so
//! that devices hanging off the bus can assert lines without re-entering
//! the bus.

mod bus;
mod cpu;
mod interrupt;

pub use bus::{Bus, SimpleBus};
pub use cpu::{Cpu, CpuState};
pub use interrupt::{Interrupt, InterruptLines};
