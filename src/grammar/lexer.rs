//! Tokenizer for the TChecker system-declaration text format.
//!
//! Kept deliberately simple: the grammar never places two alphanumeric
//! tokens back to back without an intervening symbol, so the lexer does
//! not need lookahead beyond the two-character comparator/logic tokens.

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
  Word(String),
  Number(String),
  Cmp(String),
  Sym(String),
}

#[derive(Debug, Clone)]
pub struct Token {
  pub lexeme: Lexeme,
  pub line: usize,
  pub column: usize,
}

const TWO_CHAR: &[&str] = &["==", "<=", ">=", "!=", "&&", "||"];

pub fn lex(text: &str) -> Result<Vec<Token>, ParseError> {
  let mut tokens = Vec::new();
  let chars: Vec<char> = text.chars().collect();
  let mut i = 0;
  let mut line = 1;
  let mut column = 1;

  while i < chars.len() {
    let c = chars[i];

    if c == '#' {
      while i < chars.len() && chars[i] != '\n' {
        i += 1;
      }
      continue;
    }
    if c == '\n' {
      line += 1;
      column = 1;
      i += 1;
      continue;
    }
    if c.is_whitespace() {
      column += 1;
      i += 1;
      continue;
    }

    let start_line = line;
    let start_column = column;

    if c.is_ascii_digit() {
      let mut s = String::new();
      while i < chars.len() && chars[i].is_ascii_digit() {
        s.push(chars[i]);
        i += 1;
        column += 1;
      }
      tokens.push(Token { lexeme: Lexeme::Number(s), line: start_line, column: start_column });
      continue;
    }

    if c.is_alphabetic() || c == '_' {
      let mut s = String::new();
      while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        s.push(chars[i]);
        i += 1;
        column += 1;
      }
      tokens.push(Token { lexeme: Lexeme::Word(s), line: start_line, column: start_column });
      continue;
    }

    if i + 1 < chars.len() {
      let two: String = chars[i..i + 2].iter().collect();
      if TWO_CHAR.contains(&two.as_str()) {
        i += 2;
        column += 2;
        let lexeme =
          if two == "&&" || two == "||" { Lexeme::Sym(two) } else { Lexeme::Cmp(two) };
        tokens.push(Token { lexeme, line: start_line, column: start_column });
        continue;
      }
    }

    match c {
      '<' | '>' => {
        i += 1;
        column += 1;
        tokens.push(Token {
          lexeme: Lexeme::Cmp(c.to_string()),
          line: start_line,
          column: start_column,
        });
      },
      ':' | '{' | '}' | '[' | ']' | '@' | '?' | '=' | '+' | '-' | ',' => {
        i += 1;
        column += 1;
        tokens.push(Token {
          lexeme: Lexeme::Sym(c.to_string()),
          line: start_line,
          column: start_column,
        });
      },
      _ => {
        return Err(ParseError {
          line: start_line,
          column: start_column,
          message: format!("unexpected character {c:?}"),
        });
      },
    }
  }

  Ok(tokens)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lexes_declaration_line() {
    let tokens = lex("clock:1:x").unwrap();
    let lexemes: Vec<_> = tokens.into_iter().map(|t| t.lexeme).collect();
    assert_eq!(lexemes, vec![
      Lexeme::Word("clock".into()),
      Lexeme::Sym(":".into()),
      Lexeme::Number("1".into()),
      Lexeme::Sym(":".into()),
      Lexeme::Word("x".into()),
    ]);
  }

  #[test]
  fn lexes_comparators_longest_match_first() {
    let tokens = lex("x<=5&&x<y").unwrap();
    let lexemes: Vec<_> = tokens.into_iter().map(|t| t.lexeme).collect();
    assert_eq!(lexemes, vec![
      Lexeme::Word("x".into()),
      Lexeme::Cmp("<=".into()),
      Lexeme::Number("5".into()),
      Lexeme::Sym("&&".into()),
      Lexeme::Word("x".into()),
      Lexeme::Cmp("<".into()),
      Lexeme::Word("y".into()),
    ]);
  }

  #[test]
  fn skips_comments_and_whitespace() {
    let tokens = lex("# a comment\n  process : P\n").unwrap();
    let lexemes: Vec<_> = tokens.into_iter().map(|t| t.lexeme).collect();
    assert_eq!(lexemes, vec![
      Lexeme::Word("process".into()),
      Lexeme::Sym(":".into()),
      Lexeme::Word("P".into()),
    ]);
  }

  #[test]
  fn rejects_unknown_character() {
    assert!(lex("clock:1:x$").is_err());
  }
}
