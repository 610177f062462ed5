/*!
  Describe a small CPU, hand it a memory, and step it one fetch-decode-execute cycle at a time.

  The parts, bottom up:

    bit_length   widths in bits and the bytes they occupy
    register     one storage cell of a declared width
    memory       byte addressable storage behind the `Memory` trait
    bytecode     the packed instruction word, its operations and a small assembler
    cpu          CPU descriptions and the engine that runs them
    very_simple  the VerySimpleCPU, a description with four registers and six operations
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bit_length;
pub mod bytecode;
pub mod cpu;
pub mod error;
pub mod memory;
pub mod register;
pub mod very_simple;

pub use bit_length::BitLength;
pub use bytecode::{InstructionWord, Operation};
pub use cpu::{Cpu, CpuDescription};
pub use error::{Error, Result};
pub use memory::Memory;
pub use register::Register;
