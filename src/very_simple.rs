/*!
  The VerySimpleCPU: four registers and six operations over 32 bit data words.

    iw  32 bits   instruction word
    pc  14 bits   program counter, starts at 0
    r1  32 bits
    r2  32 bits

  `mem[x]` below is the 32 bit data word at byte offset `x`, least significant byte first.

    Operation  r1 <-    r2 <-       memory           pc <-
    ADD        mem[a]   mem[b]      mem[a] <- r1+r2  pc+1
    ADDi       mem[a]   b           mem[a] <- r1+r2  pc+1
    CP         mem[b]   unchanged   mem[a] <- r2     pc+1
    CPi        b        unchanged   mem[a] <- r2     pc+1
    BZJ        mem[a]   mem[b]      none             r1 if r2 == 0, else pc+1
    BZJi       mem[a]   b           none             r1 if r2 == 0, else pc+1

  Sums are not masked to the register width. Writing a register to memory stores its low 32 bits.
*/

use crate::bit_length::BitLength;
use crate::bytecode::{InstructionWord, Operation, Word};
use crate::cpu::{Cpu, CpuDescription, RegisterFile, INSTRUCTION_REGISTER, PROGRAM_COUNTER};
use crate::error::Result;
use crate::memory::Memory;
use crate::register::RegisterValue;

pub const R1: &str = "r1";
pub const R2: &str = "r2";

// region Operand helpers

fn load_word(memory: &dyn Memory, offset: u16) -> Result<RegisterValue> {
  Ok(memory.read_word(offset as usize)? as RegisterValue)
}

/// Operand B: an immediate for the `i` variants, otherwise the word at offset B.
fn operand_b(word: &InstructionWord, memory: &dyn Memory) -> Result<RegisterValue> {
  match word.im() {
    1 => Ok(word.b() as RegisterValue),
    _ => load_word(memory, word.b())
  }
}

// endregion

// region Operation bodies

// Each body reads its operands and writes memory before it stores any register, so a body that
// fails leaves the registers as they were.

/// ADD and ADDi.
fn add(registers: &mut RegisterFile, memory: &mut dyn Memory) -> Result<()> {
  let word = registers.instruction_word()?;
  let pc   = registers.load(PROGRAM_COUNTER)?;

  let r1 = load_word(memory, word.a())?;
  let r2 = operand_b(&word, memory)?;
  memory.write_word(word.a() as usize, r1.wrapping_add(r2) as Word)?;

  registers.store(R1, r1)?;
  registers.store(R2, r2)?;
  registers.store(PROGRAM_COUNTER, pc.wrapping_add(1))?;
  Ok(())
}

/// CP and CPi.
fn copy(registers: &mut RegisterFile, memory: &mut dyn Memory) -> Result<()> {
  let word = registers.instruction_word()?;
  let pc   = registers.load(PROGRAM_COUNTER)?;
  let r2   = registers.load(R2)?;

  let r1 = operand_b(&word, memory)?;
  memory.write_word(word.a() as usize, r2 as Word)?;

  registers.store(R1, r1)?;
  registers.store(PROGRAM_COUNTER, pc.wrapping_add(1))?;
  Ok(())
}

/// BZJ and BZJi.
fn branch_zero_jump(registers: &mut RegisterFile, memory: &mut dyn Memory) -> Result<()> {
  let word = registers.instruction_word()?;
  let pc   = registers.load(PROGRAM_COUNTER)?;

  let target = load_word(memory, word.a())?;
  let r2     = operand_b(&word, memory)?;

  registers.store(R1, target)?;
  registers.store(R2, r2)?;

  match registers.get(R2)?.is_zero() {
    true  => {
      log::trace!("BZJ: jumping to 0x{:X}", target);
      registers.store(PROGRAM_COUNTER, target)?;
    }
    false => {
      registers.store(PROGRAM_COUNTER, pc.wrapping_add(1))?;
    }
  }
  Ok(())
}

// endregion

/// The VerySimpleCPU registers and all six operations.
pub fn description() -> Result<CpuDescription> {
  CpuDescription::builder()
    .register(INSTRUCTION_REGISTER, BitLength::of(32)?, None)
    .register(PROGRAM_COUNTER,      BitLength::of(14)?, Some(0))
    .register(R1,                   BitLength::of(32)?, None)
    .register(R2,                   BitLength::of(32)?, None)
    .operation(Operation::Add,  add)
    .operation(Operation::AddI, add)
    .operation(Operation::Cp,   copy)
    .operation(Operation::CpI,  copy)
    .operation(Operation::Bzj,  branch_zero_jump)
    .operation(Operation::BzjI, branch_zero_jump)
    .build()
}

/// A VerySimpleCPU with `memory` attached.
pub fn cpu<M>(memory: M) -> Result<Cpu>
  where M: Memory + 'static
{
  Cpu::with_memory(description()?, memory)
}
