//! The [`Error`] type shared by every part of the machine.

use std::result;

use thiserror::Error;

use crate::bytecode::Operation;

/// Anything that can abort a cycle, a description or an assembly run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// An argument was outside the domain of the operation, e.g. a negative bit length.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// An instruction word field does not fit in its bit width.
  #[error("invalid {field}: {value} does not fit in {width} bits")]
  InvalidField {
    field : &'static str,
    value : i64,
    width : u32
  },

  /// The machine is not in a state where the requested step can run.
  #[error("invalid state: {0}")]
  InvalidState(String),

  /// A memory access fell outside the backing store.
  #[error("memory access at offset {offset} is out of bounds (memory holds {len} bytes)")]
  OutOfBounds {
    offset : usize,
    len    : usize
  },

  #[error("no register named `{0}`")]
  UnknownRegister(String),

  #[error("register `{0}` is declared more than once")]
  DuplicateRegister(String),

  /// The description is missing one of the registers the engine itself relies on.
  #[error("the description does not declare the `{0}` register")]
  MissingRegister(&'static str),

  /// The selector of the instruction word does not map to any operation.
  #[error("undefined opcode selector 0x{0:X}")]
  UndefinedOpcode(u8),

  /// The operation was decoded but the description never registered a body for it.
  #[error("no body registered for operation {0}")]
  UnimplementedOperation(Operation),

  #[error("error on line {line}: {message}")]
  Assembly {
    line    : usize,
    message : String
  },
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
  /// The fault raised when a cycle needs memory and none is attached.
  pub fn memory_not_set() -> Error {
    Error::InvalidState("memory not set".to_string())
  }
}
