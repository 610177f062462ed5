/*!
  The human readable textual form of bytecode is called assembly. This module leverages the
  `strum` derives of [`Operation`] to read mnemonics, and `nom` for everything else.

  One statement per line:

    ADD  0x4, 0x8       # an instruction: mnemonic, operand a, operand b
    BZJi 4, 0
    .word 0x04030201    # a raw 32 bit data word

  Numbers are decimal, `0x` hexadecimal or `0b` binary. `#` starts a comment. Every statement
  assembles to 4 bytes, least significant byte first, so the byte offset of a statement is four
  times its index.
*/

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nom::{
  IResult,
  branch::alt,
  bytes::complete::{is_a, tag, tag_no_case},
  character::complete::{
    alpha1,
    alphanumeric0,
    char as one_char,
    digit1,
    hex_digit1,
    space0,
    space1
  },
  combinator::{all_consuming, map, map_res, opt, recognize, rest},
  sequence::{delimited, pair, preceded, tuple},
};

use crate::bytecode::{InstructionWord, Operation, Word};
use crate::error::{Error, Result};

/// One assembled line of a program.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Statement {
  Instruction(InstructionWord),
  /// A `.word` directive.
  Word(Word)
}

impl Statement {
  pub fn to_bytes(&self) -> [u8; 4] {
    match self {
      Statement::Instruction(word) => word.to_bytes(),
      Statement::Word(value)       => value.to_le_bytes()
    }
  }
}

impl Display for Statement {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Statement::Instruction(word) => {
        match word.operation() {
          Some(operation) => write!(f, "{} 0x{:X}, 0x{:X}", operation, word.a(), word.b()),
          // Not every selector names an operation; fall back to the raw word.
          None            => write!(f, ".word 0x{:08X}", word.to_integer())
        }
      }

      Statement::Word(value) => {
        write!(f, ".word 0x{:08X}", value)
      }

    }
  }
}

/// What a single line says, before any meaning is checked.
enum Line<'a> {
  Empty,
  Instruction {
    mnemonic : &'a str,
    a        : i64,
    b        : i64
  },
  Word(i64)
}

// region Parsers

fn number(input: &str) -> IResult<&str, i64> {
  alt((
    map_res(
      preceded(tag_no_case("0x"), hex_digit1),
      |digits: &str| i64::from_str_radix(digits, 16)
    ),
    map_res(
      preceded(tag_no_case("0b"), is_a("01")),
      |digits: &str| i64::from_str_radix(digits, 2)
    ),
    map_res(
      recognize(pair(opt(one_char('-')), digit1)),
      |digits: &str| digits.parse::<i64>()
    ),
  ))(input)
}

fn mnemonic(input: &str) -> IResult<&str, &str> {
  recognize(pair(alpha1, alphanumeric0))(input)
}

fn instruction(input: &str) -> IResult<&str, Line> {
  map(
    tuple((
      mnemonic,
      space1,
      number,
      delimited(space0, one_char(','), space0),
      number
    )),
    |(mnemonic, _, a, _, b)| Line::Instruction { mnemonic, a, b }
  )(input)
}

fn word_directive(input: &str) -> IResult<&str, Line> {
  map(preceded(pair(tag(".word"), space1), number), Line::Word)(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
  preceded(one_char('#'), rest)(input)
}

fn line(input: &str) -> IResult<&str, Line> {
  all_consuming(
    delimited(
      space0,
      map(
        opt(alt((word_directive, instruction))),
        |statement| statement.unwrap_or(Line::Empty)
      ),
      pair(space0, opt(comment))
    )
  )(input)
}

// endregion

/// Parses a whole program. Errors carry the 1-based line number they were found on.
pub fn parse_assembly(text: &str) -> Result<Vec<Statement>> {
  let mut statements = Vec::new();

  for (index, text_line) in text.lines().enumerate() {
    let line_number = index + 1;
    let error = |message: String| Error::Assembly { line: line_number, message };

    let parsed = match line(text_line) {
      Ok((_rest, parsed)) => parsed,
      Err(_e)             => {
        return Err(error(format!("could not parse `{}`", text_line.trim())));
      }
    };

    match parsed {

      Line::Empty => {}

      Line::Instruction { mnemonic, a, b } => {
        let operation = Operation::from_str(mnemonic)
          .map_err(|_| error(format!("{} is not an operation.", mnemonic)))?;
        let word = InstructionWord::for_operation(operation, a, b)
          .map_err(|e| error(e.to_string()))?;
        statements.push(Statement::Instruction(word));
      }

      Line::Word(value) => {
        if value < 0 || value > Word::max_value() as i64 {
          return Err(error(format!("{} does not fit in a 32 bit word", value)));
        }
        statements.push(Statement::Word(value as Word));
      }

    }
  }

  log::debug!("parsed {} statements of assembly", statements.len());
  Ok(statements)
}

/// Parses a program and lays its statements out as a memory image.
pub fn assemble(text: &str) -> Result<Vec<u8>> {
  Ok(
    parse_assembly(text)?
      .iter()
      .flat_map(|statement| statement.to_bytes().to_vec())
      .collect()
  )
}
