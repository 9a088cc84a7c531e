//! Recursive-descent parser: `parse(text) -> Result<Node, ParseError>`, the
//! concrete realization of the `parse` black box named in `spec.md` §6.
//!
//! The grammar implemented here is the one the positional contracts of
//! §3.1 assume: one declaration per keyword (`system`, `process`, `event`,
//! `clock`, `int`, `location`, `edge`, `sync`), attribute blocks
//! `{item(:item)*}`, and the `expr`/`atomic_expr`/`int_term` expression
//! grammar of §3.1/§4.2. Disambiguating clock vs. predicate expressions at
//! parse time is explicitly unreliable per §3.3, so every comparator
//! expression is parsed as `predicate_expr`; [`crate::ast::query::is_clock_expr`]
//! is the sole arbiter used downstream.

use super::lexer::{lex, Lexeme, Token};
use crate::ast::{Node, RuleKind};
use crate::error::ParseError;

pub fn parse(text: &str) -> Result<Node, ParseError> {
  let tokens = lex(text)?;
  let mut parser = Parser { tokens, pos: 0 };
  let node = parser.parse_system()?;
  parser.expect_eof()?;
  Ok(node)
}

struct Parser {
  tokens: Vec<Token>,
  pos: usize,
}

impl Parser {
  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn bump(&mut self) -> Option<Token> {
    let t = self.tokens.get(self.pos).cloned();
    if t.is_some() {
      self.pos += 1;
    }
    t
  }

  fn err(&self, message: impl Into<String>) -> ParseError {
    let (line, column) =
      self.peek().map(|t| (t.line, t.column)).unwrap_or_else(|| self.eof_pos());
    ParseError { line, column, message: message.into() }
  }

  fn eof_pos(&self) -> (usize, usize) {
    self.tokens.last().map(|t| (t.line, t.column + 1)).unwrap_or((1, 1))
  }

  fn expect_eof(&self) -> Result<(), ParseError> {
    if self.pos != self.tokens.len() {
      return Err(self.err(format!("trailing input at token {}", self.pos)));
    }
    Ok(())
  }

  fn peek_word(&self, word: &str) -> bool {
    matches!(self.peek().map(|t| &t.lexeme), Some(Lexeme::Word(w)) if w == word)
  }

  fn peek_sym(&self, sym: &str) -> bool {
    matches!(self.peek().map(|t| &t.lexeme), Some(Lexeme::Sym(s)) if s == sym)
  }

  fn peek_cmp(&self) -> bool {
    matches!(self.peek().map(|t| &t.lexeme), Some(Lexeme::Cmp(_)))
  }

  fn expect_word(&mut self, word: &'static str) -> Result<Node, ParseError> {
    match self.bump() {
      Some(Token { lexeme: Lexeme::Word(w), .. }) if w == word => Ok(Node::keyword(word)),
      other => Err(self.err_for(&other, format!("expected keyword {word:?}"))),
    }
  }

  fn expect_sym(&mut self, sym: &'static str) -> Result<Node, ParseError> {
    match self.bump() {
      Some(Token { lexeme: Lexeme::Sym(s), .. }) if s == sym => Ok(Node::sym(sym)),
      other => Err(self.err_for(&other, format!("expected {sym:?}"))),
    }
  }

  fn expect_number(&mut self) -> Result<i64, ParseError> {
    match self.bump() {
      Some(Token { lexeme: Lexeme::Number(n), .. }) =>
        n.parse().map_err(|_| self.err(format!("invalid integer literal {n:?}"))),
      other => Err(self.err_for(&other, "expected an integer literal".to_string())),
    }
  }

  fn expect_name(&mut self) -> Result<String, ParseError> {
    match self.bump() {
      Some(Token { lexeme: Lexeme::Word(w), .. }) => Ok(w),
      other => Err(self.err_for(&other, "expected an identifier".to_string())),
    }
  }

  fn err_for(&self, consumed: &Option<Token>, message: String) -> ParseError {
    match consumed {
      Some(t) => ParseError { line: t.line, column: t.column, message },
      None => {
        let (line, column) = self.eof_pos();
        ParseError { line, column, message: format!("{message} (found end of input)") }
      },
    }
  }

  fn parse_id(&mut self) -> Result<Node, ParseError> {
    let name = self.expect_name()?;
    Ok(Node::internal(RuleKind::Id, vec![Node::ident(name)]))
  }

  // --- declarations -----------------------------------------------------

  fn parse_system(&mut self) -> Result<Node, ParseError> {
    let mut children = vec![self.expect_word("system")?, self.expect_sym(":")?, self.parse_id()?];
    while let Some(t) = self.peek() {
      let Lexeme::Word(w) = &t.lexeme else {
        return Err(self.err("expected a declaration keyword".to_string()));
      };
      let decl = match w.as_str() {
        "process" => self.parse_process()?,
        "event" => self.parse_event()?,
        "clock" => self.parse_clock()?,
        "int" => self.parse_int()?,
        "location" => self.parse_location()?,
        "edge" => self.parse_edge()?,
        "sync" => self.parse_sync()?,
        other => return Err(self.err(format!("unknown declaration keyword {other:?}"))),
      };
      children.push(decl);
    }
    Ok(Node::internal(RuleKind::SystemDeclaration, children))
  }

  fn parse_process(&mut self) -> Result<Node, ParseError> {
    let children =
      vec![self.expect_word("process")?, self.expect_sym(":")?, self.parse_id()?];
    Ok(Node::internal(RuleKind::ProcessDeclaration, children))
  }

  fn parse_event(&mut self) -> Result<Node, ParseError> {
    let children = vec![self.expect_word("event")?, self.expect_sym(":")?, self.parse_id()?];
    Ok(Node::internal(RuleKind::EventDeclaration, children))
  }

  fn parse_clock(&mut self) -> Result<Node, ParseError> {
    let kw = self.expect_word("clock")?;
    let c1 = self.expect_sym(":")?;
    let size = self.expect_number()?;
    let c2 = self.expect_sym(":")?;
    let id = self.parse_id()?;
    Ok(Node::internal(RuleKind::ClockDeclaration, vec![
      kw,
      c1,
      Node::int_lit(size),
      c2,
      id,
    ]))
  }

  fn parse_int(&mut self) -> Result<Node, ParseError> {
    let mut children = vec![self.expect_word("int")?];
    for _ in 0..4 {
      children.push(self.expect_sym(":")?);
      children.push(Node::int_lit(self.expect_number()?));
    }
    children.push(self.expect_sym(":")?);
    children.push(self.parse_id()?);
    Ok(Node::internal(RuleKind::IntDeclaration, children))
  }

  fn parse_location(&mut self) -> Result<Node, ParseError> {
    let mut children = vec![
      self.expect_word("location")?,
      self.expect_sym(":")?,
      self.parse_id()?,
      self.expect_sym(":")?,
      self.parse_id()?,
    ];
    if self.peek_sym("{") {
      children.push(self.parse_attributes()?);
    }
    Ok(Node::internal(RuleKind::LocationDeclaration, children))
  }

  fn parse_edge(&mut self) -> Result<Node, ParseError> {
    let mut children = vec![
      self.expect_word("edge")?,
      self.expect_sym(":")?,
      self.parse_id()?,
      self.expect_sym(":")?,
      self.parse_id()?,
      self.expect_sym(":")?,
      self.parse_id()?,
      self.expect_sym(":")?,
      self.parse_id()?,
    ];
    if self.peek_sym("{") {
      children.push(self.parse_attributes()?);
    }
    Ok(Node::internal(RuleKind::EdgeDeclaration, children))
  }

  fn parse_sync(&mut self) -> Result<Node, ParseError> {
    let kw = self.expect_word("sync")?;
    let colon = self.expect_sym(":")?;
    let constraints = self.parse_sync_constraints()?;
    Ok(Node::internal(RuleKind::SyncDeclaration, vec![kw, colon, constraints]))
  }

  fn parse_sync_constraints(&mut self) -> Result<Node, ParseError> {
    let mut children = vec![self.parse_sync_constraint()?];
    while self.peek_sym(":") {
      children.push(self.expect_sym(":")?);
      children.push(self.parse_sync_constraint()?);
    }
    Ok(Node::internal(RuleKind::SyncConstraints, children))
  }

  fn parse_sync_constraint(&mut self) -> Result<Node, ParseError> {
    let process = self.parse_id()?;
    let at = self.expect_sym("@")?;
    let event = self.parse_id()?;
    let mut children = vec![process, at, event];
    if self.peek_sym("?") {
      children.push(self.expect_sym("?")?);
    }
    Ok(Node::internal(RuleKind::SyncConstraint, children))
  }

  // --- attributes ---------------------------------------------------------

  fn parse_attributes(&mut self) -> Result<Node, ParseError> {
    self.expect_sym("{")?;
    let mut items = vec![self.parse_attribute_item()?];
    while self.peek_sym(":") && !self.next_is_closing_after_colon() {
      self.expect_sym(":")?;
      items.push(self.parse_attribute_item()?);
    }
    self.expect_sym("}")?;
    Ok(crate::ast::attrs::rebuild(items))
  }

  /// `true` iff, past a `:` we are about to consume, the block simply
  /// ends (`}`). Attribute blocks never have a trailing empty item.
  fn next_is_closing_after_colon(&self) -> bool {
    matches!(self.tokens.get(self.pos + 1).map(|t| &t.lexeme), Some(Lexeme::Sym(s)) if s == "}")
  }

  fn parse_attribute_item(&mut self) -> Result<Node, ParseError> {
    if self.peek_word("initial") {
      return Ok(Node::internal(RuleKind::InitialAttribute, vec![self.expect_word("initial")?]));
    }
    if self.peek_word("urgent") {
      return Ok(Node::internal(RuleKind::UrgentAttribute, vec![self.expect_word("urgent")?]));
    }
    if self.peek_word("committed") {
      return Ok(Node::internal(RuleKind::CommittedAttribute, vec![
        self.expect_word("committed")?,
      ]));
    }
    if self.peek_word("labels") {
      let kw = self.expect_word("labels")?;
      let colon = self.expect_sym(":")?;
      let mut children = vec![kw, colon, self.parse_id()?];
      while self.peek_sym(",") {
        children.push(self.expect_sym(",")?);
        children.push(self.parse_id()?);
      }
      return Ok(Node::internal(RuleKind::LabelsAttribute, children));
    }
    if self.peek_word("provided") {
      let kw = self.expect_word("provided")?;
      let colon = self.expect_sym(":")?;
      let expr = self.parse_expr()?;
      return Ok(Node::internal(RuleKind::ProvidedAttribute, vec![kw, colon, expr]));
    }
    if self.peek_word("invariant") {
      let kw = self.expect_word("invariant")?;
      let colon = self.expect_sym(":")?;
      let expr = self.parse_expr()?;
      return Ok(Node::internal(RuleKind::InvariantAttribute, vec![kw, colon, expr]));
    }
    if self.peek_word("do") {
      let kw = self.expect_word("do")?;
      let colon = self.expect_sym(":")?;
      let mut children = vec![kw, colon, self.parse_assignment()?];
      while self.peek_sym(",") {
        children.push(self.expect_sym(",")?);
        children.push(self.parse_assignment()?);
      }
      return Ok(Node::internal(RuleKind::DoAttribute, children));
    }
    Err(self.err("expected an attribute (initial/urgent/committed/labels/provided/invariant/do)".to_string()))
  }

  fn parse_assignment(&mut self) -> Result<Node, ParseError> {
    if self.peek_word("nop") {
      let kw = self.expect_word("nop")?;
      return Ok(Node::internal(RuleKind::Nop, vec![kw]));
    }
    let target = self.parse_clock_ref()?;
    let eq = self.expect_sym("=")?;
    let value = self.parse_int_term()?;
    Ok(Node::internal(RuleKind::Assignment, vec![target, eq, value]))
  }

  // --- expressions ----------------------------------------------------

  fn parse_expr(&mut self) -> Result<Node, ParseError> {
    let mut children = vec![self.parse_atomic_expr()?];
    while self.peek_sym("&&") || self.peek_sym("||") {
      let op = if self.peek_sym("&&") { self.expect_sym("&&")? } else { self.expect_sym("||")? };
      children.push(op);
      children.push(self.parse_atomic_expr()?);
    }
    Ok(Node::internal(RuleKind::Expr, children))
  }

  fn parse_atomic_expr(&mut self) -> Result<Node, ParseError> {
    let lhs = self.parse_int_term()?;
    let cmp1 = self.parse_cmp()?;
    let mid = self.parse_int_term()?;
    let mut children = vec![lhs, cmp1, mid];
    if self.peek_cmp() {
      children.push(self.parse_cmp()?);
      children.push(self.parse_int_term()?);
    }
    let constraint = Node::internal(RuleKind::PredicateExpr, children);
    Ok(Node::internal(RuleKind::AtomicExpr, vec![constraint]))
  }

  fn parse_cmp(&mut self) -> Result<Node, ParseError> {
    match self.bump() {
      Some(Token { lexeme: Lexeme::Cmp(c), .. }) => crate::ast::Cmp::from_text(&c)
        .map(Node::cmp)
        .ok_or_else(|| self.err(format!("unknown comparator {c:?}"))),
      other => Err(self.err_for(&other, "expected a comparator".to_string())),
    }
  }

  fn parse_int_term(&mut self) -> Result<Node, ParseError> {
    if self.peek_sym("-") {
      self.expect_sym("-")?;
      let n = self.expect_number()?;
      return Ok(Node::internal(RuleKind::IntTerm, vec![Node::sym("-"), Node::int_lit(n)]));
    }
    if let Some(Lexeme::Number(_)) = self.peek().map(|t| &t.lexeme) {
      let n = self.expect_number()?;
      if self.peek_sym("+") || self.peek_sym("-") {
        let op_sym = if self.peek_sym("+") { "+" } else { "-" };
        let op = self.expect_sym(op_sym)?;
        let n2 = self.expect_number()?;
        return Ok(Node::internal(RuleKind::IntTerm, vec![
          Node::int_lit(n),
          Node::internal(RuleKind::Op, vec![op]),
          Node::int_lit(n2),
        ]));
      }
      return Ok(Node::internal(RuleKind::IntTerm, vec![Node::int_lit(n)]));
    }
    let r1 = self.parse_clock_ref()?;
    if self.peek_sym("-") {
      self.expect_sym("-")?;
      let r2 = self.parse_clock_ref()?;
      return Ok(Node::internal(RuleKind::IntTerm, vec![r1, Node::sym("-"), r2]));
    }
    Ok(Node::internal(RuleKind::IntTerm, vec![r1]))
  }

  /// A variable reference: `x` (bare `id`) or `x[i]` (`int_or_clock_id`).
  fn parse_clock_ref(&mut self) -> Result<Node, ParseError> {
    let name = self.expect_name()?;
    if self.peek_sym("[") {
      self.expect_sym("[")?;
      let idx = self.expect_number()?;
      self.expect_sym("]")?;
      return Ok(Node::internal(RuleKind::IntOrClockId, vec![
        Node::ident(name),
        Node::sym("["),
        Node::internal(RuleKind::IntTerm, vec![Node::int_lit(idx)]),
        Node::sym("]"),
      ]));
    }
    Ok(Node::internal(RuleKind::Id, vec![Node::ident(name)]))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_minimal_system() {
    let text = "system:sys\nevent:a\nevent:b\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a\n";
    let tree = parse(text).unwrap();
    assert!(tree.is_kind(RuleKind::SystemDeclaration));
    assert_eq!(tree.find_kind(RuleKind::EdgeDeclaration).len(), 1);
  }

  #[test]
  fn parses_clock_and_guard() {
    let text = "system:sys\nclock:1:x\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a{provided:x<=5}\n";
    let tree = parse(text).unwrap();
    let edges = tree.find_kind(RuleKind::EdgeDeclaration);
    let attrs = edges[0].edge_attributes().unwrap();
    let provided = crate::ast::query::find_attr(attrs, RuleKind::ProvidedAttribute).unwrap();
    assert!(provided.is_kind(RuleKind::ProvidedAttribute));
  }

  #[test]
  fn parses_indexed_clock_reference() {
    let text = "system:sys\nclock:2:x\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a{provided:x[0]<=5}\n";
    let tree = parse(text).unwrap();
    assert!(tree.find_kind(RuleKind::IntOrClockId).len() >= 1);
  }

  #[test]
  fn parses_sync_with_weak_constraint() {
    let text =
      "system:sys\nevent:a\nprocess:P1\nprocess:P2\nsync:P1@a?:P2@a\n";
    let tree = parse(text).unwrap();
    let syncs = tree.find_kind(RuleKind::SyncDeclaration);
    let constraints = syncs[0].sync_constraints().sync_constraint_list();
    assert!(constraints[0].sync_constraint_is_weak());
    assert!(!constraints[1].sync_constraint_is_weak());
  }

  #[test]
  fn rejects_malformed_input() {
    assert!(parse("system:sys\nbogus:oops\n").is_err());
  }
}
