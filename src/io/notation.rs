//! Parser for the bracketed algebra-export notation
//!
//! Exports arrive as plain text holding named assignments whose right-hand
//! side is a signed sum of `SB(word)` terms, e.g.
//! `Esymb[2]:=4*SB(aabd)-SB(abcd)+SB(acbd)`. Long assignments continue
//! across lines with a trailing backslash and terminate with `:` or `;`.

use num_rational::Rational64;

use crate::symbol::{Symbol, Word};
use crate::{AmpRelsError, Result};

/// Extract a named assignment block from export text
///
/// Starts at the first line beginning with `prefix`, joins backslash
/// continuations, and stops at a blank line or a line terminated by `:` or
/// `;`. Returns `None` when no such block exists.
pub fn read_block(text: &str, prefix: &str) -> Option<String> {
    let mut reading = false;
    let mut block = String::new();
    for line in text.lines() {
        if !reading {
            if !line.starts_with(prefix) {
                continue;
            }
            reading = true;
        }
        if line.trim().is_empty() {
            break;
        }
        block.push_str(line.strip_suffix('\\').unwrap_or(line));
        if line.ends_with(':') || line.ends_with(';') {
            break;
        }
    }
    if reading {
        Some(block)
    } else {
        None
    }
}

/// Cursor parser for signed sums of `SB(word)` terms
struct TermParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> TermParser<'a> {
    fn new(input: &'a str) -> Self {
        TermParser {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || matches!(b, b',' | b'[' | b']' | b':' | b';') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn parse_term(&mut self) -> Result<(Word, Rational64)> {
        // sign, optional integer magnitude, optional '*'
        let mut sign = 1i64;
        while let Some(b) = self.peek() {
            match b {
                b'+' => {
                    self.bump();
                }
                b'-' => {
                    sign = -sign;
                    self.bump();
                }
                _ => break,
            }
            self.skip_separators();
        }

        let mut digits = String::new();
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                digits.push(b as char);
                self.bump();
            } else {
                break;
            }
        }
        let magnitude: i64 = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| AmpRelsError::Parse(format!("bad coefficient '{}'", digits)))?
        };

        self.skip_separators();
        if self.peek() == Some(b'*') {
            self.bump();
            self.skip_separators();
        }

        if !self.input[self.pos..].starts_with(b"SB(") {
            return Err(AmpRelsError::Parse(format!(
                "expected 'SB(' at offset {}",
                self.pos
            )));
        }
        self.pos += 3;

        let mut letters = String::new();
        loop {
            match self.bump() {
                Some(b')') => break,
                Some(b) if b.is_ascii_alphabetic() => letters.push(b as char),
                Some(b) => {
                    return Err(AmpRelsError::Parse(format!(
                        "unexpected byte '{}' inside SB(...)",
                        b as char
                    )))
                }
                None => return Err(AmpRelsError::Parse("unterminated SB(...)".into())),
            }
        }
        if letters.is_empty() {
            return Err(AmpRelsError::Parse("empty SB() term".into()));
        }

        Ok((Word::new(letters), Rational64::from(sign * magnitude)))
    }
}

/// Parse a signed sum of `SB(word)` terms into a symbol
///
/// Sign-only coefficients read as ±1; repeated words keep the last value.
pub fn parse_terms(input: &str) -> Result<Symbol> {
    let mut parser = TermParser::new(input);
    let mut symb = Symbol::new();
    loop {
        parser.skip_separators();
        if parser.peek().is_none() {
            break;
        }
        let (word, coeff) = parser.parse_term()?;
        symb.insert(word, coeff);
    }
    Ok(symb)
}

/// Read one symbol assignment out of export text
///
/// The block prefix is `name[loop]` when a loop order is given, bare `name`
/// otherwise; everything after the `:=` is parsed as terms.
pub fn read_symbol(text: &str, name: &str, loop_order: Option<usize>) -> Result<Symbol> {
    let prefix = match loop_order {
        Some(l) => format!("{}[{}]", name, l),
        None => name.to_string(),
    };
    let block = read_block(text, &prefix).ok_or_else(|| {
        AmpRelsError::Parse(format!("no assignment block starting with '{}'", prefix))
    })?;
    let rhs = match block.find(":=") {
        Some(at) => &block[at + 2..],
        None => {
            return Err(AmpRelsError::Parse(format!(
                "block '{}' has no ':=' assignment",
                prefix
            )))
        }
    };
    parse_terms(rhs)
}
