//! Bit widths, and the whole number of bytes needed to hold them.

use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};

/**
  A length measured in bits. The byte count is derived once, at construction, as the smallest
  number of whole bytes able to hold `bits` bits. Two lengths are equal if and only if they have
  the same number of bits.
*/
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BitLength {
  bits  : u32,
  bytes : u32
}

impl BitLength {

  /// Fails with `InvalidArgument` when `bits` is negative.
  pub fn of(bits: i64) -> Result<BitLength> {
    if bits < 0 {
      return Err(Error::InvalidArgument("The amount of bits is negative".to_string()));
    }
    if bits > u32::max_value() as i64 {
      return Err(Error::InvalidArgument(format!("{} bits is too large a length", bits)));
    }

    let bits = bits as u32;
    Ok(BitLength {
      bits,
      bytes: bits / 8 + (bits % 8 != 0) as u32
    })
  }

  pub fn bits(&self) -> u32 {
    self.bits
  }

  pub fn bytes(&self) -> u32 {
    self.bytes
  }
}

impl Display for BitLength {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{{bits: {}, bytes: {}}}", self.bits, self.bytes)
  }
}
