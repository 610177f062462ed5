//! The named registers of one CPU instance.

use bimap::BiMap;
use string_cache::DefaultAtom;

use crate::bytecode::{InstructionWord, Word};
use crate::cpu::INSTRUCTION_REGISTER;
use crate::error::{Error, Result};
use crate::register::{Register, RegisterValue};

/**
  Registers are allocated once, when the CPU is built, and live as long as it does. Names are
  interned and mapped to a slot in declaration order; iterating the file yields registers in the
  order they were declared.
*/
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
  names     : BiMap<DefaultAtom, usize>,
  registers : Vec<Register>
}

impl RegisterFile {

  /// Adds a register. Fails if the name is already taken.
  pub(crate) fn declare(&mut self, name: &str, register: Register) -> Result<()> {
    let slot = self.registers.len();
    self.names
        .insert_no_overwrite(DefaultAtom::from(name), slot)
        .map_err(|_| Error::DuplicateRegister(name.to_string()))?;
    self.registers.push(register);
    Ok(())
  }

  fn slot(&self, name: &str) -> Result<usize> {
    self.names
        .get_by_left(&DefaultAtom::from(name))
        .copied()
        .ok_or_else(|| Error::UnknownRegister(name.to_string()))
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.contains_left(&DefaultAtom::from(name))
  }

  pub fn get(&self, name: &str) -> Result<&Register> {
    let slot = self.slot(name)?;
    Ok(&self.registers[slot])
  }

  pub fn get_mut(&mut self, name: &str) -> Result<&mut Register> {
    let slot = self.slot(name)?;
    Ok(&mut self.registers[slot])
  }

  pub fn load(&self, name: &str) -> Result<RegisterValue> {
    Ok(self.get(name)?.load())
  }

  pub fn store(&mut self, name: &str, value: RegisterValue) -> Result<RegisterValue> {
    log::trace!("{} <- 0x{:X}", name, value);
    Ok(self.get_mut(name)?.store(value))
  }

  /// The content of the instruction register, read as an instruction word. Only the low 32 bits
  /// are decoded; anything above them is dropped.
  pub fn instruction_word(&self) -> Result<InstructionWord> {
    let value = self.load(INSTRUCTION_REGISTER)?;
    if value > Word::max_value() as RegisterValue {
      log::debug!("{} holds 0x{:X}, decoding only its low 32 bits", INSTRUCTION_REGISTER, value);
    }
    Ok(InstructionWord::from_integer(value as Word))
  }

  pub fn len(&self) -> usize {
    self.registers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.registers.is_empty()
  }

  /// Registers with their names, in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Register)> + '_ {
    self.registers
        .iter()
        .enumerate()
        .filter_map(move |(slot, register)| {
          self.names
              .get_by_right(&slot)
              .map(|name| (&**name, register))
        })
  }
}
