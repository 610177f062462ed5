/*!

  Instructions are a single 32 bit word. Packed, the word reads (most significant bit first):

    [Opcode:3][Im:1][A:14][B:14]

  In memory the packed word is stored least significant byte first, so the word `0xBAAA9555`
  occupies the bytes `55 95 AA BA`. The engine fetches exactly these 4 bytes at the offset held by
  the program counter.

  The opcode and the immediate flag together form a 4 bit *selector* (bits 31 to 28). The selector
  is what decoding dispatches on: an operation and its immediate variant differ only in the low
  bit of the selector. Not every selector names an operation.

    Selector  Operation
    0x0       ADD
    0x1       ADDi
    0x8       CP
    0x9       CPi
    0xC       BZJ
    0xD       BZJi

  Operand A is always a memory offset. Operand B is a memory offset for the plain variants and an
  immediate value for the `i` variants.

*/

mod binary;
mod assembly;

pub use binary::{InstructionWord, InstructionWordBuilder, Word, WORD_BITS, OPCODE_BITS, IM_BITS,
                 OPERAND_BITS};
pub use assembly::{assemble, parse_assembly, Statement};

use std::convert::TryFrom;

use strum_macros::{Display as StrumDisplay, IntoStaticStr, EnumString, EnumIter};
use num_enum::{TryFromPrimitive, IntoPrimitive};

/**
  The operations of the VerySimpleCPU, numbered by their selector. The textual form of each
  variant is its assembly mnemonic.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,    Hash
)]
#[repr(u8)]
pub enum Operation {
  #[strum(to_string = "ADD")]
  Add   = 0x0,  // mem[a] <- mem[a] + mem[b]
  #[strum(to_string = "ADDi")]
  AddI  = 0x1,  // mem[a] <- mem[a] + b
  #[strum(to_string = "CP")]
  Cp    = 0x8,  // mem[a] <- r2,  r1 <- mem[b]
  #[strum(to_string = "CPi")]
  CpI   = 0x9,  // mem[a] <- r2,  r1 <- b
  #[strum(to_string = "BZJ")]
  Bzj   = 0xC,  // pc <- mem[a] if mem[b] == 0
  #[strum(to_string = "BZJi")]
  BzjI  = 0xD,  // pc <- mem[a] if b == 0
}

impl Operation {

  /// Maps a 4 bit selector to its operation, if there is one.
  pub fn decode(selector: u8) -> Option<Operation> {
    Operation::try_from(selector).ok()
  }

  pub fn selector(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The 3 bit opcode field of the operation's instruction words.
  pub fn opcode(&self) -> u8 {
    self.selector() >> IM_BITS
  }

  /// Whether operand B is an immediate value rather than a memory offset.
  pub fn is_immediate(&self) -> bool {
    self.selector() & 1 == 1
  }

  pub fn mnemonic(&self) -> &'static str {
    self.into()
  }
}
