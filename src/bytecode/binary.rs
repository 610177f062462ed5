/*!
  This module is responsible for the encoding and decoding of binary instruction words.
*/

use std::fmt::{Display, Formatter};

use crate::bytecode::Operation;
use crate::error::{Error, Result};

// If you change these you must also change `to_integer` and `from_integer`.
pub type Word = u32;
pub const WORD_BITS    : u32 = 32;
pub const OPCODE_BITS  : u32 = 3;
pub const IM_BITS      : u32 = 1;
pub const OPERAND_BITS : u32 = 14;

const IM_SHIFT     : u32 = 2 * OPERAND_BITS;
const OPCODE_SHIFT : u32 = IM_SHIFT + IM_BITS;
const A_SHIFT      : u32 = OPERAND_BITS;
const OPERAND_MASK : Word = (1 << OPERAND_BITS) - 1;

/**
  The structured form of an instruction word. Every field is checked against its width when the
  word is built, so a value that exists always packs into 32 bits without truncation.
*/
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct InstructionWord {
  opcode : u8,
  im     : u8,
  a      : u16,
  b      : u16
}

/// Builds an [`InstructionWord`] from the fields given; omitted fields are 0.
#[derive(Copy, Clone, Debug, Default)]
pub struct InstructionWordBuilder {
  opcode : i64,
  im     : i64,
  a      : i64,
  b      : i64
}

impl InstructionWordBuilder {
  pub fn opcode(mut self, opcode: i64) -> Self {
    self.opcode = opcode;
    self
  }

  pub fn im(mut self, im: i64) -> Self {
    self.im = im;
    self
  }

  pub fn a(mut self, a: i64) -> Self {
    self.a = a;
    self
  }

  pub fn b(mut self, b: i64) -> Self {
    self.b = b;
    self
  }

  pub fn build(self) -> Result<InstructionWord> {
    InstructionWord::new(self.opcode, self.im, self.a, self.b)
  }
}

/// Returns `value` if it fits in `width` bits, otherwise an `InvalidField` naming `field`.
fn validate(field: &'static str, value: i64, width: u32) -> Result<i64> {
  match value >= 0 && value <= (1i64 << width) - 1 {
    true  => Ok(value),
    false => Err(Error::InvalidField { field, value, width })
  }
}

impl InstructionWord {

  /// Fields are checked in order: opcode, im, a, b. The first failing field is reported.
  pub fn new(opcode: i64, im: i64, a: i64, b: i64) -> Result<InstructionWord> {
    Ok(InstructionWord {
      opcode : validate("opcode", opcode, OPCODE_BITS)? as u8,
      im     : validate("im",     im,     IM_BITS)?     as u8,
      a      : validate("a",      a,      OPERAND_BITS)? as u16,
      b      : validate("b",      b,      OPERAND_BITS)? as u16,
    })
  }

  pub fn builder() -> InstructionWordBuilder {
    InstructionWordBuilder::default()
  }

  /// The word for `operation` with operands `a` and `b`.
  pub fn for_operation(operation: Operation, a: i64, b: i64) -> Result<InstructionWord> {
    InstructionWord::new(
      operation.opcode() as i64,
      operation.is_immediate() as i64,
      a,
      b
    )
  }

  pub fn opcode(&self) -> u8 {
    self.opcode
  }

  pub fn im(&self) -> u8 {
    self.im
  }

  pub fn a(&self) -> u16 {
    self.a
  }

  pub fn b(&self) -> u16 {
    self.b
  }

  /// The opcode and immediate flag read together as one 4 bit number.
  pub fn selector(&self) -> u8 {
    (self.opcode << IM_BITS) | self.im
  }

  pub fn operation(&self) -> Option<Operation> {
    Operation::decode(self.selector())
  }

  pub fn to_integer(&self) -> Word {
      ((self.opcode as Word) << OPCODE_SHIFT)
    | ((self.im     as Word) << IM_SHIFT)
    | ((self.a      as Word) << A_SHIFT)
    |  (self.b      as Word)
  }

  /// The packed word, least significant byte first. This is the layout fetched from memory.
  pub fn to_bytes(&self) -> [u8; 4] {
    self.to_integer().to_le_bytes()
  }

  pub fn from_integer(word: Word) -> InstructionWord {
    InstructionWord {
      opcode : (word >> OPCODE_SHIFT) as u8,
      im     : ((word >> IM_SHIFT) & 1) as u8,
      a      : ((word >> A_SHIFT) & OPERAND_MASK) as u16,
      b      : (word & OPERAND_MASK) as u16
    }
  }

  pub fn from_bytes(bytes: [u8; 4]) -> InstructionWord {
    InstructionWord::from_integer(Word::from_le_bytes(bytes))
  }
}

impl From<Word> for InstructionWord {
  fn from(word: Word) -> Self {
    InstructionWord::from_integer(word)
  }
}

impl From<InstructionWord> for Word {
  fn from(word: InstructionWord) -> Self {
    word.to_integer()
  }
}

impl Display for InstructionWord {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{{opcode: 0b{:b}, im: {}, a: 0x{:X}, b: 0x{:X}}}",
      self.opcode, self.im, self.a, self.b
    )
  }
}
