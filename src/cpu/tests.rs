use rstest::rstest;

use crate::bit_length::BitLength;
use crate::bytecode::{InstructionWord, Operation};
use crate::cpu::{Cpu, CpuDescription, INSTRUCTION_REGISTER, PROGRAM_COUNTER};
use crate::error::Error;
use crate::memory::{self, Memory};

fn bits(n: i64) -> BitLength {
  BitLength::of(n).unwrap()
}

/// A CPU whose only operation, ADD, counts itself in `n` and moves pc to the next word.
fn counting_cpu() -> Cpu {
  let description =
    CpuDescription::builder()
      .register(INSTRUCTION_REGISTER, bits(32), None)
      .register(PROGRAM_COUNTER, bits(14), Some(0))
      .register("n", bits(8), Some(0))
      .operation(Operation::Add, |registers, _memory| {
        let n = registers.load("n")?;
        registers.store("n", n + 1)?;
        let pc = registers.load(PROGRAM_COUNTER)?;
        registers.store(PROGRAM_COUNTER, pc + 4)?;
        Ok(())
      })
      .build()
      .unwrap();
  Cpu::new(description).unwrap()
}

fn program(words: &[InstructionWord]) -> memory::ArrayBased {
  memory::from_array(words.iter().flat_map(|w| w.to_bytes().to_vec()).collect())
}

fn add() -> InstructionWord {
  InstructionWord::for_operation(Operation::Add, 0, 0).unwrap()
}

#[test]
fn fetch_without_memory_fails() {
  let mut cpu = counting_cpu();

  match cpu.fetch() {
    Err(Error::InvalidState(message)) => assert!(message.contains("memory not set")),
    other => panic!("expected InvalidState, got {:?}", other)
  }
  assert_eq!(cpu.cycle(), Err(Error::memory_not_set()));
}

#[test]
fn fetch_loads_the_word_at_pc_and_leaves_pc_alone() {
  let mut cpu = counting_cpu();
  cpu.attach_memory(memory::from_array(vec![0x55, 0x95, 0xAA, 0xBA, 0x00]));

  assert_eq!(cpu.fetch(), Ok(0xBAAA9555));
  assert_eq!(cpu.registers().load(INSTRUCTION_REGISTER), Ok(0xBAAA9555));
  assert_eq!(cpu.registers().load(PROGRAM_COUNTER), Ok(0));
}

#[test]
fn fetch_past_the_end_is_out_of_bounds() {
  let mut cpu = counting_cpu();
  cpu.attach_memory(memory::from_array(vec![0; 6]));
  cpu.registers_mut().store(PROGRAM_COUNTER, 4).unwrap();

  assert_eq!(cpu.fetch(), Err(Error::OutOfBounds { offset: 6, len: 6 }));
}

#[rstest]
#[case(0x0000_0000, Some(Operation::Add))]
#[case(0x1000_0000, Some(Operation::AddI))]
#[case(0x8000_0000, Some(Operation::Cp))]
#[case(0x9000_0000, Some(Operation::CpI))]
#[case(0xC000_0000, Some(Operation::Bzj))]
#[case(0xDFFF_FFFF, Some(Operation::BzjI))]
#[case(0x2000_0000, None)]
#[case(0xF000_0000, None)]
fn decode_maps_the_selector(#[case] iw: u64, #[case] expected: Option<Operation>) {
  let mut cpu = counting_cpu();
  cpu.registers_mut().store(INSTRUCTION_REGISTER, iw).unwrap();

  assert_eq!(cpu.decode(), Ok(expected));
}

#[test]
fn decode_reads_only_the_low_32_bits_of_iw() {
  let mut cpu = counting_cpu();
  cpu.registers_mut().store(INSTRUCTION_REGISTER, 0x7_C000_0000).unwrap();

  assert_eq!(cpu.registers().instruction_word().unwrap().to_integer(), 0xC000_0000);
  assert_eq!(cpu.decode(), Ok(Some(Operation::Bzj)));
}

#[test]
fn cycle_runs_the_body_and_counts() {
  let mut cpu = counting_cpu();
  cpu.attach_memory(program(&[add(), add()]));

  assert_eq!(cpu.cycle(), Ok(Operation::Add));
  assert_eq!(cpu.registers().load("n"), Ok(1));
  assert_eq!(cpu.registers().load(PROGRAM_COUNTER), Ok(4));
  assert_eq!(cpu.cycles(), 1);
}

#[test]
fn undefined_selector_changes_nothing_but_iw() {
  let undefined = InstructionWord::new(0b011, 0, 1, 2).unwrap();
  let mut cpu = counting_cpu();
  cpu.attach_memory(program(&[undefined]));

  assert_eq!(cpu.cycle(), Err(Error::UndefinedOpcode(0b0110)));
  assert_eq!(cpu.registers().load(PROGRAM_COUNTER), Ok(0));
  assert_eq!(cpu.registers().load("n"), Ok(0));
  assert_eq!(cpu.memory().unwrap().content(), &undefined.to_bytes()[..]);
  assert_eq!(cpu.cycles(), 0);
}

#[test]
fn failed_body_leaves_registers_as_fetched() {
  let description =
    CpuDescription::builder()
      .register(INSTRUCTION_REGISTER, bits(32), None)
      .register(PROGRAM_COUNTER, bits(14), Some(0))
      .register("n", bits(8), Some(0))
      .operation(Operation::Add, |registers, memory| {
        registers.store("n", 7)?;
        registers.store(PROGRAM_COUNTER, 4)?;
        memory.read_word(0x1000)?;
        Ok(())
      })
      .build()
      .unwrap();
  let instruction = InstructionWord::for_operation(Operation::Add, 1, 2).unwrap();
  let mut cpu = Cpu::with_memory(description, program(&[instruction])).unwrap();

  assert_eq!(cpu.cycle(), Err(Error::OutOfBounds { offset: 0x1000, len: 4 }));
  assert_eq!(cpu.registers().load("n"), Ok(0));
  assert_eq!(cpu.registers().load(PROGRAM_COUNTER), Ok(0));
  assert_eq!(cpu.registers().load(INSTRUCTION_REGISTER), Ok(instruction.to_integer() as u64));
  assert_eq!(cpu.cycles(), 0);
}

#[test]
fn operation_without_body_is_unimplemented() {
  let mut cpu = counting_cpu();
  cpu.attach_memory(program(&[InstructionWord::for_operation(Operation::Cp, 0, 0).unwrap()]));

  assert_eq!(cpu.cycle(), Err(Error::UnimplementedOperation(Operation::Cp)));
  assert_eq!(cpu.cycles(), 0);
}

#[test]
fn run_stops_at_the_first_error() {
  let mut cpu = counting_cpu();
  cpu.attach_memory(program(&[add(), add()]));

  assert_eq!(cpu.run(2), Ok(2));
  assert_eq!(cpu.registers().load("n"), Ok(2));

  // pc is now past the end of memory.
  assert!(matches!(cpu.run(5), Err(Error::OutOfBounds { .. })));
  assert_eq!(cpu.cycles(), 2);
}

#[test]
fn memory_slot_can_be_swapped() {
  let mut cpu = counting_cpu();
  assert!(cpu.memory().is_none());

  assert!(cpu.attach_memory(memory::from_array(vec![1, 2, 3, 4])).is_none());
  let previous = cpu.set_memory(Some(Box::new(memory::from_array(vec![5; 8]))));
  assert_eq!(previous.unwrap().content(), &[1, 2, 3, 4]);
  assert_eq!(cpu.memory().unwrap().len(), 8);

  cpu.memory_mut().unwrap().write(0, 9).unwrap();
  assert_eq!(cpu.take_memory().unwrap().read(0), Ok(9));
  assert!(cpu.memory().is_none());
}

#[test]
fn registers_start_at_their_initial_values() {
  let description =
    CpuDescription::builder()
      .register(INSTRUCTION_REGISTER, bits(32), None)
      .register(PROGRAM_COUNTER, bits(14), Some(0x10))
      .register("acc", bits(64), Some(u64::max_value()))
      .build()
      .unwrap();
  let cpu = Cpu::new(description).unwrap();

  assert_eq!(cpu.registers().load(INSTRUCTION_REGISTER), Ok(0));
  assert_eq!(cpu.registers().load(PROGRAM_COUNTER), Ok(0x10));
  assert_eq!(cpu.register("acc").map(|r| r.load()), Ok(u64::max_value()));
  assert_eq!(cpu.register("r9"), Err(Error::UnknownRegister("r9".to_string())));

  let names: Vec<&str> = cpu.registers().iter().map(|(name, _)| name).collect();
  assert_eq!(names, vec!["iw", "pc", "acc"]);
}

#[test]
fn duplicate_register_is_rejected() {
  let result =
    CpuDescription::builder()
      .register(INSTRUCTION_REGISTER, bits(32), None)
      .register(PROGRAM_COUNTER, bits(14), None)
      .register(PROGRAM_COUNTER, bits(16), None)
      .build();

  assert_eq!(result.unwrap_err(), Error::DuplicateRegister("pc".to_string()));
}

#[rstest]
#[case(PROGRAM_COUNTER, INSTRUCTION_REGISTER)]
#[case(INSTRUCTION_REGISTER, PROGRAM_COUNTER)]
fn engine_registers_are_required(#[case] declared: &str, #[case] missing: &'static str) {
  let result =
    CpuDescription::builder()
      .register(declared, bits(32), None)
      .build();

  assert_eq!(result.unwrap_err(), Error::MissingRegister(missing));
}

#[test]
fn display_shows_registers_and_memory() {
  let mut cpu = counting_cpu();

  let text = cpu.to_string();
  assert!(text.contains("Cycles: 0"));
  assert!(text.contains("memory not set"));

  cpu.attach_memory(program(&[add()]));
  let text = cpu.to_string();
  assert!(text.contains("pc --> 0x0000"));
  assert!(text.contains("00 00 00 00"));
  assert!(text.contains("Register"));
}
