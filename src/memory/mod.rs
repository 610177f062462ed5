/*!
  Byte addressable memory for a CPU.

  [`Memory`] is the capability a CPU needs from its backing store: byte reads and writes, reads of
  a run of bits, and a view of the whole content. Offsets are byte offsets. Nothing here ever grows
  the store; touching a byte past its end is an [`Error::OutOfBounds`].

  Two byte orders are in play and they are not the same:

    `read_bits`              most significant byte first
    `read_word`/`write_word` least significant byte first, as instruction words are laid out

*/

mod array_based;

pub use array_based::ArrayBased;

use std::fmt::Debug;

use crate::bit_length::BitLength;
use crate::bytecode::Word;
use crate::error::{Error, Result};

/// Size in bytes of a data word.
pub const WORD_BYTES: usize = 4;

pub trait Memory: Debug {

  fn read(&self, offset: usize) -> Result<u8>;

  fn write(&mut self, offset: usize, byte: u8) -> Result<()>;

  /// The full content of the memory, in address order.
  fn content(&self) -> &[u8];

  fn len(&self) -> usize {
    self.content().len()
  }

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /**
    Reads `width.bytes()` bytes starting at `offset` and combines them into one integer, most
    significant byte first. Widths that do not fit in 64 bits are rejected.
  */
  fn read_bits(&self, width: BitLength, offset: usize) -> Result<u64> {
    if width.bits() > 64 {
      return Err(Error::InvalidArgument(
        format!("cannot read {} bits into a 64 bit value", width.bits())
      ));
    }
    self.check_range(offset, width.bytes() as usize)?;

    let mut value: u64 = 0;
    for i in 0..width.bytes() as usize {
      value = (value << 8) | self.read(offset + i)? as u64;
    }
    Ok(value)
  }

  /// Reads the 32 bit word at `offset`, least significant byte first.
  fn read_word(&self, offset: usize) -> Result<Word> {
    self.check_range(offset, WORD_BYTES)?;

    let mut bytes = [0u8; WORD_BYTES];
    for (i, byte) in bytes.iter_mut().enumerate() {
      *byte = self.read(offset + i)?;
    }
    Ok(Word::from_le_bytes(bytes))
  }

  /// Writes `value` at `offset`, least significant byte first. Nothing is written unless the
  /// whole word fits.
  fn write_word(&mut self, offset: usize, value: Word) -> Result<()> {
    self.check_range(offset, WORD_BYTES)?;

    for (i, byte) in value.to_le_bytes().iter().enumerate() {
      self.write(offset + i, *byte)?;
    }
    Ok(())
  }

  /// Fails with `OutOfBounds` unless `count` bytes starting at `offset` are all inside the store.
  fn check_range(&self, offset: usize, count: usize) -> Result<()> {
    let len = self.len();
    match offset.checked_add(count) {
      Some(end) if end <= len => Ok(()),
      // Report the first offset that is actually missing.
      _ => Err(Error::OutOfBounds { offset: offset.max(len), len })
    }
  }
}

/// Creates an array backed memory holding `bytes`.
pub fn from_array(bytes: Vec<u8>) -> ArrayBased {
  ArrayBased::new(bytes)
}
