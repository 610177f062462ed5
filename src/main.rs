use std::error::Error;

use dumb_vm::{bytecode, memory, very_simple};

fn main() -> Result<(), Box<dyn Error>> {
  simple_logger::SimpleLogger::new().init()?;

  #[cfg(feature = "trace_computation")]
  log::info!("Computation Tracing ENABLED");

  let text = "
    # mem[4] <- mem[4] + mem[8], then loop on itself through the jump at offset 12
    ADD  0x4, 0x8
    .word 0x04030201
    .word 0x0D0C0B0A
    BZJi 0x10, 0
    .word 0xC
  ";
  println!("Program:{}", text);

  let mut cpu = very_simple::cpu(memory::from_array(bytecode::assemble(text)?))?;
  println!("Initial state:\n{}", cpu);

  let operation = cpu.cycle()?;
  println!("After {}:\n{}", operation, cpu);

  Ok(())
}
