/*!
  The fetch-decode-execute engine.

  A [`Cpu`] owns its registers, at most one attached [`Memory`] and the operation table of the
  [`CpuDescription`] it was built from. One cycle is:

    fetch    iw <- the 4 bytes of memory at byte offset pc (least significant byte first)
    decode   selector (iw bits 31..28) -> Operation, or nothing
    execute  run the operation's body against the registers and memory

  The engine never touches the program counter itself. Every operation body is responsible for
  moving it, whether by incrementing it or by jumping.

  Any error aborts the cycle and is returned unmodified; nothing is retried. When a body fails, the
  registers are put back as they were after fetch. Bodies that write memory do so after their last
  fallible read.
*/

mod description;
mod registers;

pub use description::{CpuDescription, CpuDescriptionBuilder, OperationBody, RegisterDeclaration};
pub use registers::RegisterFile;

use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::bytecode::{Operation, Word};
use crate::error::{Error, Result};
use crate::memory::{Memory, WORD_BYTES};
use crate::register::Register;

/// The register fetch loads instruction words into.
pub const INSTRUCTION_REGISTER: &str = "iw";
/// The register holding the byte offset of the next fetch.
pub const PROGRAM_COUNTER: &str = "pc";

pub struct Cpu {
  registers  : RegisterFile,
  memory     : Option<Box<dyn Memory>>,
  operations : HashMap<Operation, OperationBody>,
  cycles     : u64
}

impl Cpu {

  // region Construction and accessors

  pub fn new(description: CpuDescription) -> Result<Cpu> {
    let registers = description.register_file()?;
    Ok(Cpu {
      registers,
      memory     : None,
      operations : description.into_operations(),
      cycles     : 0
    })
  }

  pub fn with_memory<M>(description: CpuDescription, memory: M) -> Result<Cpu>
    where M: Memory + 'static
  {
    let mut cpu = Cpu::new(description)?;
    cpu.attach_memory(memory);
    Ok(cpu)
  }

  pub fn memory(&self) -> Option<&(dyn Memory + 'static)> {
    self.memory.as_deref()
  }

  pub fn memory_mut(&mut self) -> Option<&mut (dyn Memory + 'static)> {
    self.memory.as_deref_mut()
  }

  /// Replaces the memory slot, returning whatever was attached before.
  pub fn set_memory(&mut self, memory: Option<Box<dyn Memory>>) -> Option<Box<dyn Memory>> {
    std::mem::replace(&mut self.memory, memory)
  }

  pub fn attach_memory<M>(&mut self, memory: M) -> Option<Box<dyn Memory>>
    where M: Memory + 'static
  {
    self.set_memory(Some(Box::new(memory)))
  }

  pub fn take_memory(&mut self) -> Option<Box<dyn Memory>> {
    self.memory.take()
  }

  pub fn registers(&self) -> &RegisterFile {
    &self.registers
  }

  pub fn registers_mut(&mut self) -> &mut RegisterFile {
    &mut self.registers
  }

  pub fn register(&self, name: &str) -> Result<&Register> {
    self.registers.get(name)
  }

  /// Number of cycles completed without error.
  pub fn cycles(&self) -> u64 {
    self.cycles
  }

  // endregion

  // region Fetch, decode, execute

  /**
    Loads the instruction word at the program counter into the instruction register and returns
    it. The program counter is a byte offset and is left unchanged.
  */
  pub fn fetch(&mut self) -> Result<Word> {
    let memory = self.memory.as_deref().ok_or_else(Error::memory_not_set)?;
    let pc     = self.registers.load(PROGRAM_COUNTER)?;
    let word   = memory.read_word(pc as usize)?;

    log::debug!("fetch: pc = 0x{:X}, iw <- 0x{:08X}", pc, word);
    self.registers.store(INSTRUCTION_REGISTER, word as u64)?;
    Ok(word)
  }

  /// Maps the selector of the instruction register to its operation. Selectors that name no
  /// operation decode to `None`.
  pub fn decode(&self) -> Result<Option<Operation>> {
    let word      = self.registers.instruction_word()?;
    let operation = Operation::decode(word.selector());

    log::debug!("decode: {} -> {:?}", word, operation);
    Ok(operation)
  }

  /// Runs the body registered for `operation`.
  pub fn execute(&mut self, operation: Operation) -> Result<()> {
    let body = self.operations
                   .get(&operation)
                   .ok_or(Error::UnimplementedOperation(operation))?;
    let memory = self.memory.as_deref_mut().ok_or_else(Error::memory_not_set)?;

    log::debug!("execute: {}", operation);
    body(&mut self.registers, memory)
  }

  /**
    One fetch, decode and execute, in that order. A selector that names no operation is an
    `UndefinedOpcode` error; nothing is executed for it. A failed execute leaves the registers as
    fetch left them.
  */
  pub fn cycle(&mut self) -> Result<Operation> {
    self.fetch()?;

    let operation = match self.decode()? {
      Some(operation) => operation,
      None            => {
        let selector = self.registers.instruction_word()?.selector();
        log::debug!("cycle: selector 0x{:X} names no operation", selector);
        return Err(Error::UndefinedOpcode(selector));
      }
    };

    let fetched = self.registers.clone();
    if let Err(e) = self.execute(operation) {
      self.registers = fetched;
      return Err(e);
    }
    self.cycles += 1;

    #[cfg(feature = "trace_computation")]
    log::trace!("after cycle {}:\n{}", self.cycles, self);

    Ok(operation)
  }

  /// Cycles up to `max_cycles` times, stopping at the first error. Returns the number of cycles
  /// run.
  pub fn run(&mut self, max_cycles: usize) -> Result<usize> {
    for completed in 0..max_cycles {
      if let Err(e) = self.cycle() {
        log::debug!("run: stopped after {} cycles: {}", completed, e);
        return Err(e);
      }
    }
    Ok(max_cycles)
  }

  // endregion

  // region Display methods

  fn make_register_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Register", ubl->"Size", ubl->"Value"]);

    for (name, register) in self.registers.iter() {
      table.add_row(row![r->name, register.size().bits(), register]);
    }
    table
  }

  fn make_memory_table(memory: &dyn Memory, highlight: usize) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Offset", ubl->"Bytes"]);

    for (i, chunk) in memory.content().chunks(WORD_BYTES).enumerate() {
      let offset = i * WORD_BYTES;
      let bytes =
        chunk.iter()
             .map(|byte| format!("{:02X}", byte))
             .collect::<Vec<String>>()
             .join(" ");

      match (offset..offset + WORD_BYTES).contains(&highlight) {

        true  => {
          table.add_row(row![r->format!("pc --> 0x{:04X}", offset), bytes]);
        }

        false => {
          table.add_row(row![r->format!("0x{:04X}", offset), bytes]);
        }

      }
    }
    table
  }

  // endregion
}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Cpu {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let register_table = self.make_register_table();

    let mut combined_table = match self.memory() {

      Some(memory) => {
        let pc = self.registers.load(PROGRAM_COUNTER).unwrap_or_default() as usize;
        let memory_table = Cpu::make_memory_table(memory, pc);
        let mut table = table!([register_table, memory_table]);
        table.set_titles(row![ub->"Registers", ub->"Memory"]);
        table
      }

      None => {
        let mut table = table!([register_table, "memory not set"]);
        table.set_titles(row![ub->"Registers", ub->"Memory"]);
        table
      }

    };
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(f, "Cycles: {}\n{}", self.cycles, combined_table)
  }
}

impl Debug for Cpu {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Cpu")
     .field("registers", &self.registers)
     .field("memory", &self.memory)
     .field("operations", &self.operations.keys().collect::<Vec<_>>())
     .field("cycles", &self.cycles)
     .finish()
  }
}

#[cfg(test)]
mod tests;
