//! Single pass tokenizer for SVG path data (and anything else that is just a
//! list of numbers, like `points` or `viewBox`).
use crate::diagnostics::{Diagnostic, Diagnostics};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Any letter that is not part of a number. Validity is the parser's problem.
    Command(char),
    Number(f64),
}

/// Accumulates the characters of the number currently being read.
struct Lexer<'d> {
    tokens: Vec<Token>,
    pending: String,
    has_point: bool,
    has_exponent: bool,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> Lexer<'d> {
    fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Lexer {
            tokens: vec![],
            pending: String::new(),
            has_point: false,
            has_exponent: false,
            diagnostics,
        }
    }

    fn finish_token(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        match self.pending.parse::<f64>() {
            Ok(num) if num.is_finite() => self.tokens.push(Token::Number(num)),
            _ => self
                .diagnostics
                .report(Diagnostic::MalformedNumber(self.pending.clone())),
        }
        self.pending.clear();
        self.has_point = false;
        self.has_exponent = false;
    }

    fn starts_exponent(&self, c: char) -> bool {
        (c == 'e' || c == 'E')
            && !self.has_exponent
            && self.pending.chars().any(|p| p.is_ascii_digit())
    }

    fn in_exponent_sign_position(&self) -> bool {
        self.pending.ends_with('e') || self.pending.ends_with('E')
    }

    fn push(&mut self, c: char) {
        if self.starts_exponent(c) {
            self.pending.push(c);
            self.has_exponent = true;
        } else if c.is_alphabetic() {
            self.finish_token();
            self.tokens.push(Token::Command(c));
        } else if c == ',' || c.is_whitespace() {
            self.finish_token();
        } else if c == '.' {
            // "1.5.5" is "1.5 .5"; exponents never carry a decimal point
            if self.has_point || self.has_exponent {
                self.finish_token();
            }
            self.pending.push(c);
            self.has_point = true;
        } else if c == '-' || c == '+' {
            if !self.in_exponent_sign_position() {
                self.finish_token();
            }
            self.pending.push(c);
        } else if c.is_ascii_digit() {
            self.pending.push(c);
        }
        // Anything else is noise and is ignored.
    }
}

/// Split `data` into command letters and numbers. Bad numbers are reported
/// and dropped.
pub fn tokenize(data: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let mut lexer = Lexer::new(diagnostics);
    for c in data.chars() {
        lexer.push(c);
    }
    lexer.finish_token();
    log::trace!("tokenize: {} tokens", lexer.tokens.len());
    lexer.tokens
}

/// Only the numbers of `data`, for number lists like `points="1,2 3,4"`.
pub fn numbers(data: &str, diagnostics: &mut Diagnostics) -> Vec<f64> {
    tokenize(data, diagnostics)
        .into_iter()
        .filter_map(|token| match token {
            Token::Number(num) => Some(num),
            Token::Command(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn nums(data: &str) -> Vec<f64> {
        numbers(data, &mut Diagnostics::new())
    }

    #[test]
    fn test_separators() {
        assert_eq!(nums("10,20 30\t40\n50"), vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_compact_numbers() {
        assert_eq!(nums("1.5.5"), vec![1.5, 0.5]);
        assert_eq!(nums("1-2"), vec![1.0, -2.0]);
        assert_eq!(nums("-.5-.5"), vec![-0.5, -0.5]);
        assert_eq!(nums("0.5.5.5"), vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_exponents() {
        assert_eq!(nums("1e2 -2.5E-1 3e+1"), vec![100.0, -0.25, 30.0]);
    }

    #[test]
    fn test_commands_split_numbers() {
        let tokens = tokenize("M10-5L3", &mut Diagnostics::new());
        assert_eq!(
            tokens,
            vec![
                Token::Command('M'),
                Token::Number(10.0),
                Token::Number(-5.0),
                Token::Command('L'),
                Token::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_malformed_numbers_are_reported() {
        let mut diags = Diagnostics::new();
        let values = numbers("- 5 . 6", &mut diags);
        assert_eq!(values, vec![5.0, 6.0]);
        assert_eq!(
            diags.into_vec(),
            vec![
                Diagnostic::MalformedNumber("-".into()),
                Diagnostic::MalformedNumber(".".into()),
            ]
        );
    }
}
