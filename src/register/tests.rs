use crate::bit_length::BitLength;
use crate::register::Register;

fn register(bits: i64) -> Register {
  Register::new(BitLength::of(bits).unwrap())
}

#[test]
fn starts_at_zero() {
  let r = register(32);

  assert_eq!(r.load(), 0);
  assert!(r.is_zero());
  assert_eq!(r.size(), BitLength::of(32).unwrap());
}

#[test]
fn store_then_load() {
  let mut r = register(32);

  assert_eq!(r.store(253), 253);
  assert_eq!(r.load(), 253);
  assert!(!r.is_zero());

  r.store(0);
  assert!(r.is_zero());
}

#[test]
fn store_does_not_clamp_to_width() {
  let mut r = register(8);

  r.store(0x1_0000);
  assert_eq!(r.load(), 0x1_0000);
}

#[test]
fn bit_range_extracts_fields() {
  let mut iw = register(32);
  iw.store(0xBAAA_9555);

  assert_eq!(iw.bit_range(28, 31), 0xB);
  assert_eq!(iw.bit_range(14, 27), 0x2AAA);
  assert_eq!(iw.bit_range(13, 0), 0x1555);
  assert_eq!(iw.bit_range(0, 63), 0xBAAA_9555);
  assert_eq!(iw.bit_range(64, 70), 0);
}

#[test]
fn display_pads_to_width() {
  let mut pc = register(14);
  pc.store(1);

  assert_eq!(pc.to_string(), "0x0001");
}
