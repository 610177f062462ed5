/*!
  A CPU description says which registers a CPU has and what each operation does. It is put
  together once, with [`CpuDescriptionBuilder`], and then consumed by [`Cpu::new`](crate::cpu::Cpu::new).

  ```ignore
  let description =
    CpuDescription::builder()
      .register("iw", BitLength::of(32)?, None)
      .register("pc", BitLength::of(14)?, Some(0))
      .operation(Operation::Add, |registers, memory| { ... })
      .build()?;
  ```
*/

use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};

use string_cache::DefaultAtom;

use crate::bit_length::BitLength;
use crate::bytecode::Operation;
use crate::cpu::{RegisterFile, INSTRUCTION_REGISTER, PROGRAM_COUNTER};
use crate::error::{Error, Result};
use crate::memory::Memory;
use crate::register::{Register, RegisterValue};

/// The side effects of one operation. Bodies are wholly responsible for updating the program
/// counter.
pub type OperationBody = Box<dyn Fn(&mut RegisterFile, &mut dyn Memory) -> Result<()>>;

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct RegisterDeclaration {
  pub name       : DefaultAtom,
  pub size       : BitLength,
  pub init_value : Option<RegisterValue>
}

impl RegisterDeclaration {
  pub fn instantiate(&self) -> Register {
    let mut register = Register::new(self.size);
    if let Some(value) = self.init_value {
      register.store(value);
    }
    register
  }
}

pub struct CpuDescription {
  registers  : Vec<RegisterDeclaration>,
  operations : HashMap<Operation, OperationBody>
}

impl CpuDescription {

  pub fn builder() -> CpuDescriptionBuilder {
    CpuDescriptionBuilder::default()
  }

  pub fn registers(&self) -> &[RegisterDeclaration] {
    &self.registers
  }

  pub fn has_operation(&self, operation: Operation) -> bool {
    self.operations.contains_key(&operation)
  }

  /// Allocates a fresh register file from the declarations.
  pub(crate) fn register_file(&self) -> Result<RegisterFile> {
    let mut file = RegisterFile::default();
    for declaration in &self.registers {
      file.declare(&declaration.name, declaration.instantiate())?;
    }
    Ok(file)
  }

  pub(crate) fn into_operations(self) -> HashMap<Operation, OperationBody> {
    self.operations
  }
}

impl Debug for CpuDescription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CpuDescription")
     .field("registers", &self.registers)
     .field("operations", &self.operations.keys().collect::<Vec<_>>())
     .finish()
  }
}

#[derive(Default)]
pub struct CpuDescriptionBuilder {
  registers  : Vec<RegisterDeclaration>,
  operations : HashMap<Operation, OperationBody>
}

impl CpuDescriptionBuilder {

  pub fn register(mut self, name: &str, size: BitLength, init_value: Option<RegisterValue>) -> Self {
    self.registers.push(RegisterDeclaration {
      name: DefaultAtom::from(name),
      size,
      init_value
    });
    self
  }

  /// Sets the body run for `operation`. Declaring the same operation again replaces its body.
  pub fn operation<F>(mut self, operation: Operation, body: F) -> Self
    where F: Fn(&mut RegisterFile, &mut dyn Memory) -> Result<()> + 'static
  {
    self.operations.insert(operation, Box::new(body));
    self
  }

  /**
    Checks the declarations and freezes them. Register names must be unique, and the instruction
    register and program counter, which the engine itself uses, must be declared.
  */
  pub fn build(self) -> Result<CpuDescription> {
    let mut seen: HashSet<&DefaultAtom> = HashSet::new();
    for declaration in &self.registers {
      if !seen.insert(&declaration.name) {
        return Err(Error::DuplicateRegister(declaration.name.to_string()));
      }
    }

    for required in &[INSTRUCTION_REGISTER, PROGRAM_COUNTER] {
      if !seen.contains(&DefaultAtom::from(*required)) {
        return Err(Error::MissingRegister(*required));
      }
    }

    Ok(CpuDescription {
      registers  : self.registers,
      operations : self.operations
    })
  }
}
