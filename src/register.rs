//! A single storage cell of a CPU.

use std::fmt::{Display, Formatter};

use crate::bit_length::BitLength;

pub type RegisterValue = u64;

/**
  A register of a declared width holding an unsigned value.

  The width is descriptive only: `store` accepts any value and never masks it down to `size`.
  Programs rely on this, e.g. a 14-bit immediate field held in a 32-bit register, or the sum of two
  32-bit words held before being written back to memory.
*/
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Register {
  size  : BitLength,
  value : RegisterValue
}

impl Register {

  pub fn new(size: BitLength) -> Register {
    Register {
      size,
      value: 0
    }
  }

  pub fn size(&self) -> BitLength {
    self.size
  }

  pub fn load(&self) -> RegisterValue {
    self.value
  }

  /// Sets the value of the register and returns the value stored.
  pub fn store(&mut self, value: RegisterValue) -> RegisterValue {
    self.value = value;
    self.value
  }

  pub fn is_zero(&self) -> bool {
    self.value == 0
  }

  /**
    Extracts the bits `low..=high` of the value, shifted down to bit 0. This is what a CPU
    description uses to pick a field out of an instruction register, e.g. `bit_range(28, 31)` for
    the selector of an instruction word.
  */
  pub fn bit_range(&self, low: u32, high: u32) -> RegisterValue {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    if low >= RegisterValue::BITS {
      return 0;
    }

    let width = high.min(RegisterValue::BITS - 1) - low + 1;
    let mask = if width >= RegisterValue::BITS {
      RegisterValue::max_value()
    } else {
      (1 << width) - 1
    };
    (self.value >> low) & mask
  }
}

impl Display for Register {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    // Hex digits needed for the declared width, at least one.
    let digits = ((self.size.bits() + 3) / 4).max(1) as usize;
    write!(f, "0x{:0width$X}", self.value, width = digits)
  }
}

#[cfg(test)]
mod tests;
