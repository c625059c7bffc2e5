//! Path-data tokenizer
//!
//! Scans the `d` attribute mini-language into command letters and numeric
//! literals. The grammar is forgiving about separators: whitespace and
//! commas split tokens, a sign or a second decimal point starts a new
//! number (`1-2` and `.5.5` are each two numbers), and exponents are
//! accepted (`1e-3`).

use crate::error::PathDataError;

/// A single path-data token
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    /// Command letter (`M`, `l`, `A`, ...); validity is the registry's job
    Command(char),
    /// Floating-point literal
    Number(f64),
}

/// Tokenize a path-data string
pub fn tokenize(data: &str) -> Result<Vec<Token>, PathDataError> {
    let bytes = data.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' | b',' => pos += 1,
            b'A'..=b'Z' | b'a'..=b'z' => {
                tokens.push(Token::Command(b as char));
                pos += 1;
            }
            _ => {
                let (value, next) = scan_number(bytes, pos)?;
                tokens.push(Token::Number(value));
                pos = next;
            }
        }
    }

    Ok(tokens)
}

/// Scan one numeric literal starting at `start`; returns the value and the
/// byte offset just past it
fn scan_number(bytes: &[u8], start: usize) -> Result<(f64, usize), PathDataError> {
    let mut pos = start;

    // Optional sign
    if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        pos += 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;

    while pos < bytes.len() {
        match bytes[pos] {
            b'0'..=b'9' => {
                seen_digit = true;
                pos += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                pos += 1;
            }
            b'e' | b'E' if seen_digit => {
                pos = scan_exponent(bytes, pos + 1, start)?;
                return finish_number(bytes, start, pos, true);
            }
            // A sign or a second dot terminates this number and starts the next
            _ => break,
        }
    }

    finish_number(bytes, start, pos, seen_digit)
}

/// Scan the digits of an exponent; `pos` is just past the `e`/`E`
fn scan_exponent(bytes: &[u8], mut pos: usize, start: usize) -> Result<usize, PathDataError> {
    if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        pos += 1;
    }

    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == digits_start {
        return Err(PathDataError::InvalidNumber { offset: start });
    }
    Ok(pos)
}

fn finish_number(
    bytes: &[u8],
    start: usize,
    end: usize,
    seen_digit: bool,
) -> Result<(f64, usize), PathDataError> {
    if !seen_digit {
        return Err(PathDataError::InvalidNumber { offset: start });
    }

    // The scanned range is ASCII by construction
    let text = std::str::from_utf8(&bytes[start..end])
        .map_err(|_| PathDataError::InvalidNumber { offset: start })?;
    let value = text
        .parse::<f64>()
        .map_err(|_| PathDataError::InvalidNumber { offset: start })?;
    Ok((value, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(data: &str) -> Vec<f64> {
        tokenize(data)
            .unwrap()
            .into_iter()
            .filter_map(|t| match t {
                Token::Number(n) => Some(n),
                Token::Command(_) => None,
            })
            .collect()
    }

    #[test]
    fn commands_and_numbers() {
        let tokens = tokenize("M 10,20 L30 40").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Command('M'),
                Token::Number(10.0),
                Token::Number(20.0),
                Token::Command('L'),
                Token::Number(30.0),
                Token::Number(40.0),
            ]
        );
    }

    #[test]
    fn sign_starts_a_new_number() {
        assert_eq!(numbers("M1-2"), vec![1.0, -2.0]);
        assert_eq!(numbers("M1.5+2.5"), vec![1.5, 2.5]);
    }

    #[test]
    fn second_dot_starts_a_new_number() {
        assert_eq!(numbers("M.5.5"), vec![0.5, 0.5]);
    }

    #[test]
    fn exponent_forms() {
        assert_eq!(numbers("M1e3 2E-2 -1.5e+1"), vec![1000.0, 0.02, -15.0]);
    }

    #[test]
    fn exponent_sign_is_not_a_separator() {
        // `1e-3` is one number, not `1e` and `-3`
        assert_eq!(numbers("L1e-3 0"), vec![0.001, 0.0]);
    }

    #[test]
    fn bare_sign_is_invalid() {
        assert_eq!(
            tokenize("M - 5"),
            Err(PathDataError::InvalidNumber { offset: 2 })
        );
    }

    #[test]
    fn empty_exponent_is_invalid() {
        assert!(matches!(
            tokenize("M 1e 2"),
            Err(PathDataError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" \t\n,").unwrap().is_empty());
    }
}
