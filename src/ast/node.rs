//! The AST node type and the positional-contract accessors of §3.1.

use std::rc::Rc;

use super::kind::{RuleKind, TokenKind};

/// A comparator appearing in an atomic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cmp {
  Eq,
  Leq,
  Lt,
  Geq,
  Gt,
  Neq,
}

impl Cmp {
  pub const ALL: [Cmp; 6] = [Cmp::Eq, Cmp::Leq, Cmp::Lt, Cmp::Geq, Cmp::Gt, Cmp::Neq];
  /// The five comparators legal inside a clock constraint (`!=` excluded,
  /// per §4.3 `change_constraint_cmp`: candidates are drawn from
  /// `{==, <=, <, >=, >}`).
  pub const CLOCK_LEGAL: [Cmp; 5] = [Cmp::Eq, Cmp::Leq, Cmp::Lt, Cmp::Geq, Cmp::Gt];

  pub fn text(self) -> &'static str {
    match self {
      Cmp::Eq => "==",
      Cmp::Leq => "<=",
      Cmp::Lt => "<",
      Cmp::Geq => ">=",
      Cmp::Gt => ">",
      Cmp::Neq => "!=",
    }
  }

  pub fn from_text(s: &str) -> Option<Cmp> {
    Cmp::ALL.into_iter().find(|c| c.text() == s)
  }

  /// The comparator obtained by negating this one (`<=`→`>`, `<`→`>=`,
  /// `>=`→`<`, `>`→`<=`). Only defined for the four clock-legal
  /// comparators; used by `negate_guard`.
  pub fn negate_clock_cmp(self) -> Option<Cmp> {
    match self {
      Cmp::Leq => Some(Cmp::Gt),
      Cmp::Lt => Some(Cmp::Geq),
      Cmp::Geq => Some(Cmp::Lt),
      Cmp::Gt => Some(Cmp::Leq),
      Cmp::Eq | Cmp::Neq => None,
    }
  }
}

/// A node of the AST: either an internal rule node with ordered children,
/// or a leaf token carrying its literal text.
///
/// Structural equality (the only identity used by the tree edit
/// primitives) is `#[derive(PartialEq)]`: same variant, same kind, and
/// (for internal nodes) recursively equal children in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Internal { kind: RuleKind, children: Vec<Node> },
  Leaf { kind: TokenKind, text: Rc<str> },
}

impl Node {
  pub fn internal(kind: RuleKind, children: Vec<Node>) -> Node {
    Node::Internal { kind, children }
  }

  pub fn leaf(kind: TokenKind, text: impl Into<Rc<str>>) -> Node {
    Node::Leaf { kind, text: text.into() }
  }

  pub fn ident(name: impl Into<Rc<str>>) -> Node {
    Node::leaf(TokenKind::Ident, name)
  }

  pub fn int_lit(value: i64) -> Node {
    Node::leaf(TokenKind::IntLit, value.to_string())
  }

  pub fn keyword(text: &'static str) -> Node {
    Node::leaf(TokenKind::Keyword, text)
  }

  pub fn sym(text: &'static str) -> Node {
    Node::leaf(TokenKind::Sym, text)
  }

  pub fn cmp(c: Cmp) -> Node {
    Node::leaf(TokenKind::Cmp, c.text())
  }

  pub fn kind(&self) -> Option<RuleKind> {
    match self {
      Node::Internal { kind, .. } => Some(*kind),
      Node::Leaf { .. } => None,
    }
  }

  pub fn is_kind(&self, kind: RuleKind) -> bool {
    self.kind() == Some(kind)
  }

  pub fn children(&self) -> &[Node] {
    match self {
      Node::Internal { children, .. } => children,
      Node::Leaf { .. } => &[],
    }
  }

  pub fn children_mut(&mut self) -> &mut Vec<Node> {
    match self {
      Node::Internal { children, .. } => children,
      Node::Leaf { .. } => panic!("leaf node has no children"),
    }
  }

  pub fn as_token_text(&self) -> Option<&str> {
    match self {
      Node::Leaf { text, .. } => Some(text),
      Node::Internal { .. } => None,
    }
  }

  pub fn as_cmp(&self) -> Option<Cmp> {
    match self {
      Node::Leaf { kind: TokenKind::Cmp, text } => Cmp::from_text(text),
      _ => None,
    }
  }

  pub fn as_int_lit(&self) -> Option<i64> {
    match self {
      Node::Leaf { kind: TokenKind::IntLit, text } => text.parse().ok(),
      _ => None,
    }
  }

  /// Depth-first pre-order iterator over this node and every descendant.
  pub fn walk(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
    Box::new(
      std::iter::once(self)
        .chain(self.children().iter().flat_map(|c| c.walk())),
    )
  }

  /// All descendants (including `self`) of the given rule kind, in
  /// document order. Matches the teacher's and original tool's
  /// `find_data`-style walk.
  pub fn find_kind(&self, kind: RuleKind) -> Vec<&Node> {
    self.walk().filter(|n| n.is_kind(kind)).collect()
  }

  // --- positional contracts (§3.1) -------------------------------------

  /// `clock_declaration.children[2]`: the array-size integer literal.
  pub fn clock_decl_size(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::ClockDeclaration));
    &self.children()[2]
  }

  /// `clock_declaration.children[4]`: the clock identifier.
  pub fn clock_decl_id(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::ClockDeclaration));
    &self.children()[4]
  }

  pub fn edge_process(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::EdgeDeclaration));
    &self.children()[2]
  }

  pub fn edge_source(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::EdgeDeclaration));
    &self.children()[4]
  }

  pub fn edge_target(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::EdgeDeclaration));
    &self.children()[6]
  }

  pub fn edge_event(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::EdgeDeclaration));
    &self.children()[8]
  }

  pub fn edge_attributes(&self) -> Option<&Node> {
    debug_assert!(self.is_kind(RuleKind::EdgeDeclaration));
    self.children().get(9)
  }

  pub fn location_process(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::LocationDeclaration));
    &self.children()[2]
  }

  pub fn location_id(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::LocationDeclaration));
    &self.children()[4]
  }

  pub fn location_attributes(&self) -> Option<&Node> {
    debug_assert!(self.is_kind(RuleKind::LocationDeclaration));
    self.children().get(5)
  }

  /// `sync_declaration.children[2]`: the `sync_constraints` list.
  pub fn sync_constraints(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::SyncDeclaration));
    &self.children()[2]
  }

  /// The `sync_constraint` children of a `sync_constraints` node (skips
  /// the interleaved colon tokens at odd indices).
  pub fn sync_constraint_list(&self) -> Vec<&Node> {
    debug_assert!(self.is_kind(RuleKind::SyncConstraints));
    self.children().iter().filter(|c| c.is_kind(RuleKind::SyncConstraint)).collect()
  }

  pub fn sync_constraint_process(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::SyncConstraint));
    &self.children()[0]
  }

  pub fn sync_constraint_event(&self) -> &Node {
    debug_assert!(self.is_kind(RuleKind::SyncConstraint));
    &self.children()[2]
  }

  /// `true` iff this `sync_constraint` carries the trailing `?` (weak).
  pub fn sync_constraint_is_weak(&self) -> bool {
    debug_assert!(self.is_kind(RuleKind::SyncConstraint));
    self.children().get(3).is_some_and(|n| n.as_token_text() == Some("?"))
  }
}
