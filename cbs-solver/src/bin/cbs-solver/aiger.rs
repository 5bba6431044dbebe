//! A parser for combinational circuits in the ASCII AIGER format (`aag`).
//!
//! The file starts with the header `aag M I L O A` followed by `I` input lines, `L` latch lines,
//! `O` output lines and `A` AND gate lines, each in terms of AIGER literals (`2 * variable +
//! complemented`). Anything after the gates (the symbol table and comments) is ignored.
//!
//! Only circuits without latches are accepted, and the AND gates have to be listed in
//! topological order, i.e. a gate may only use variables defined before it.
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use cbs_solver::aig::Aig;
use cbs_solver::aig::AigError;
use cbs_solver::Literal;
use fnv::FnvHashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AigerParseError {
    #[error("failed to read file")]
    Io(#[from] std::io::Error),

    #[error("missing aag header")]
    MissingHeader,

    #[error("'{0}' is an invalid aag header")]
    InvalidHeader(String),

    #[error("the circuit has {0} latches, only combinational circuits are supported")]
    Sequential(usize),

    #[error("line {line}: '{content}' is not a valid {expected} line")]
    InvalidLine {
        line: usize,
        content: String,
        expected: &'static str,
    },

    #[error("line {line}: literal {literal} refers to a variable which is not defined before it")]
    UndefinedLiteral { line: usize, literal: u32 },

    #[error("line {line}: variable {variable} is defined twice")]
    DuplicateDefinition { line: usize, variable: u32 },

    #[error("expected {expected} more lines, but the file ended")]
    UnexpectedEnd { expected: usize },

    #[error("the circuit could not be built: {0}")]
    Graph(#[from] AigError),
}

#[derive(Debug, Clone, Copy)]
struct Header {
    num_inputs: usize,
    num_latches: usize,
    num_outputs: usize,
    num_ands: usize,
}

impl Header {
    fn parse(line: &str) -> Result<Header, AigerParseError> {
        let invalid = || AigerParseError::InvalidHeader(line.to_owned());

        let mut fields = line.split_whitespace();
        if fields.next() != Some("aag") {
            return Err(invalid());
        }
        let numbers = fields
            .map(|field| field.parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        let [_, num_inputs, num_latches, num_outputs, num_ands] = numbers[..] else {
            return Err(invalid());
        };

        Ok(Header {
            num_inputs,
            num_latches,
            num_outputs,
            num_ands,
        })
    }
}

/// Translates AIGER variables to the literals of the graph being built.
#[derive(Debug)]
struct AigerBuilder {
    aig: Aig,
    variables: FnvHashMap<u32, Literal>,
}

impl AigerBuilder {
    fn new() -> Self {
        let mut variables = FnvHashMap::default();
        let _ = variables.insert(0, Literal::FALSE);
        AigerBuilder {
            aig: Aig::new(),
            variables,
        }
    }

    fn define(&mut self, line: usize, variable: u32, literal: Literal) -> Result<(), AigerParseError> {
        if self.variables.insert(variable, literal).is_some() {
            return Err(AigerParseError::DuplicateDefinition { line, variable });
        }
        Ok(())
    }

    fn translate(&self, line: usize, literal: u32) -> Result<Literal, AigerParseError> {
        let positive = self
            .variables
            .get(&(literal / 2))
            .copied()
            .ok_or(AigerParseError::UndefinedLiteral { line, literal })?;
        Ok(if literal % 2 == 1 { !positive } else { positive })
    }
}

fn parse_numbers<const N: usize>(
    line: usize,
    content: &str,
    expected: &'static str,
) -> Result<[u32; N], AigerParseError> {
    let invalid = || AigerParseError::InvalidLine {
        line,
        content: content.to_owned(),
        expected,
    };

    let numbers = content
        .split_whitespace()
        .map(|field| field.parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    numbers.try_into().map_err(|_| invalid())
}

/// Parses an ASCII AIGER circuit. The outputs of the file become the outputs of the returned
/// [`Aig`], in the same order.
pub(crate) fn parse_aag(source: impl Read) -> Result<Aig, AigerParseError> {
    let mut lines = BufReader::new(source).lines().enumerate();
    let mut next_line = |remaining: usize| -> Result<(usize, String), AigerParseError> {
        match lines.next() {
            Some((index, line)) => Ok((index + 1, line?)),
            None => Err(AigerParseError::UnexpectedEnd {
                expected: remaining,
            }),
        }
    };

    let (_, header_line) = next_line(1).map_err(|_| AigerParseError::MissingHeader)?;
    let header = Header::parse(&header_line)?;
    if header.num_latches > 0 {
        return Err(AigerParseError::Sequential(header.num_latches));
    }

    let mut builder = AigerBuilder::new();
    let mut remaining = header
        .num_inputs
        .checked_add(header.num_outputs)
        .and_then(|count| count.checked_add(header.num_ands))
        .ok_or_else(|| AigerParseError::InvalidHeader(header_line.clone()))?;

    for _ in 0..header.num_inputs {
        let (line, content) = next_line(remaining)?;
        remaining -= 1;
        let [literal] = parse_numbers(line, &content, "input")?;
        if literal < 2 || literal % 2 == 1 {
            return Err(AigerParseError::InvalidLine {
                line,
                content,
                expected: "input",
            });
        }
        let input = builder.aig.add_input();
        builder.define(line, literal / 2, input)?;
    }

    // outputs may refer to gates defined further down
    let mut outputs = Vec::new();
    for _ in 0..header.num_outputs {
        let (line, content) = next_line(remaining)?;
        remaining -= 1;
        let [literal] = parse_numbers(line, &content, "output")?;
        outputs.push((line, literal));
    }

    for _ in 0..header.num_ands {
        let (line, content) = next_line(remaining)?;
        remaining -= 1;
        let [output, first, second] = parse_numbers(line, &content, "and")?;
        if output < 2 || output % 2 == 1 {
            return Err(AigerParseError::InvalidLine {
                line,
                content,
                expected: "and",
            });
        }
        let first = builder.translate(line, first)?;
        let second = builder.translate(line, second)?;
        let gate = builder.aig.add_and(first, second)?;
        builder.define(line, output / 2, gate)?;
    }

    for (line, literal) in outputs {
        let output = builder.translate(line, literal)?;
        let _ = builder.aig.add_output(output)?;
    }

    Ok(builder.aig)
}
