use std::str::FromStr;

use libtx0::{Destination, MemoryUnit, Operate, Operation, Source, UnitKind};
use nom::{
    bytes::complete::take_while1,
    character::complete::{alpha1, char, digit1, one_of, space0, space1},
    combinator::{map, map_res, opt, recognize},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use strum_macros::{Display, EnumString};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoadError {
    #[error("[{line}] Couldn't parse line: {text}")]
    Syntax { line: usize, text: String },
    #[error("[{line}] Unknown mnemonic {mnemonic}")]
    UnknownMnemonic { line: usize, mnemonic: String },
    #[error("[{line}] Invalid operand for {mnemonic}: {operand}")]
    InvalidOperand {
        line: usize,
        mnemonic: Mnemonic,
        operand: String,
    },
}

#[derive(Debug, EnumString, Display, Eq, PartialEq, Clone, Copy)]
pub enum Mnemonic {
    WORD,
    STORE,
    ADD,
    TRANSFER,
    OPERATE,
}

fn is_token_char(c: char) -> bool {
    !c.is_whitespace()
}

pub fn label(i: &str) -> IResult<&str, &str> {
    terminated(take_while1(|c: char| is_token_char(c) && c != ':'), char(':'))(i)
}

fn token(i: &str) -> IResult<&str, &str> {
    take_while1(is_token_char)(i)
}

pub fn number(i: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), i64::from_str)(i)
}

fn field<T: FromStr>(i: &str) -> IResult<&str, T> {
    map_res(alpha1, T::from_str)(i)
}

fn comma(i: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(i)
}

pub fn operate(i: &str) -> IResult<&str, Operate> {
    map(
        tuple((
            field::<Source>,
            preceded(comma, field::<Operation>),
            preceded(comma, field::<Destination>),
        )),
        |(source, operation, destination)| Operate::new(source, operation, destination),
    )(i)
}

fn operand(mnemonic: Mnemonic, i: &str) -> IResult<&str, UnitKind> {
    let owned = |t: &str| t.to_owned();
    match mnemonic {
        Mnemonic::WORD => map(number, UnitKind::Data)(i),
        Mnemonic::STORE => map(map(token, owned), UnitKind::Store)(i),
        Mnemonic::ADD => map(map(token, owned), UnitKind::Add)(i),
        Mnemonic::TRANSFER => map(map(token, owned), UnitKind::Transfer)(i),
        Mnemonic::OPERATE => map(operate, UnitKind::Operate)(i),
    }
}

/// Splits a line into its optional label, its mnemonic token and the rest.
fn head(i: &str) -> IResult<&str, (Option<&str>, &str)> {
    pair(opt(terminated(label, space0)), terminated(alpha1, space1))(i)
}

pub fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(start) => &line[..start],
        None => line,
    }
}

/// Parse one line of program text. Blank and comment-only lines produce no
/// unit. `line` is the 1-based line number used in errors.
pub fn parse_line(text: &str, line: usize) -> Result<Option<MemoryUnit>, LoadError> {
    let code = strip_comment(text).trim();
    if code.is_empty() {
        return Ok(None);
    }

    let (rest, (label, mnemonic)) = head(code).map_err(|_| LoadError::Syntax {
        line,
        text: code.into(),
    })?;
    let mnemonic = Mnemonic::from_str(mnemonic).map_err(|_| LoadError::UnknownMnemonic {
        line,
        mnemonic: mnemonic.into(),
    })?;
    let kind = match operand(mnemonic, rest) {
        Ok(("", kind)) => kind,
        _ => {
            return Err(LoadError::InvalidOperand {
                line,
                mnemonic,
                operand: rest.into(),
            })
        }
    };

    Ok(Some(MemoryUnit {
        label: label.map(str::to_owned),
        kind,
    }))
}

#[derive(Debug)]
pub struct ParserLine {
    pub unit: Option<MemoryUnit>,
    pub text: String,
    pub line_no: usize,
}

pub fn parse_program(program: &str) -> Result<Vec<ParserLine>, LoadError> {
    program
        .lines()
        .enumerate()
        .map(|(num, text)| {
            Ok(ParserLine {
                unit: parse_line(text, num + 1)?,
                text: text.to_string(),
                line_no: num + 1,
            })
        })
        .collect()
}
