use crate::error::{Error, Result};
use crate::memory::Memory;

/// Memory holding its content in a fixed size byte vector. Good for testing and debugging.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ArrayBased {
  bytes: Vec<u8>
}

impl ArrayBased {

  pub fn new(bytes: Vec<u8>) -> ArrayBased {
    ArrayBased { bytes }
  }

  /// A zero filled memory of `len` bytes.
  pub fn zeroed(len: usize) -> ArrayBased {
    ArrayBased { bytes: vec![0; len] }
  }

  pub fn into_inner(self) -> Vec<u8> {
    self.bytes
  }
}

impl Memory for ArrayBased {
  fn read(&self, offset: usize) -> Result<u8> {
    self.bytes
        .get(offset)
        .copied()
        .ok_or(Error::OutOfBounds { offset, len: self.bytes.len() })
  }

  fn write(&mut self, offset: usize, byte: u8) -> Result<()> {
    let len = self.bytes.len();
    match self.bytes.get_mut(offset) {
      Some(cell) => {
        *cell = byte;
        Ok(())
      }
      None => Err(Error::OutOfBounds { offset, len })
    }
  }

  fn content(&self) -> &[u8] {
    &self.bytes
  }
}

impl From<Vec<u8>> for ArrayBased {
  fn from(bytes: Vec<u8>) -> Self {
    ArrayBased::new(bytes)
  }
}
