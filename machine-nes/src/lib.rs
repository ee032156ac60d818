//! NES machine built around the 2A03 CPU core.
//!
//! The PPU, APU and non-trivial mappers are external collaborators;
//! this crate provides the CPU-visible console: the memory map, NROM
//! cartridge loading, and the CPU/bus/interrupt-latch wiring.

mod cartridge;
mod memory;
mod nes;

pub use cartridge::Cartridge;
pub use memory::NesMemory;
pub use nes::Nes;
