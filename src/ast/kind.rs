//! The node kinds drawn from the TChecker system-declaration grammar.
//!
//! This is the "tagged AST" re-architecture named in the design notes:
//! the source tool keys nodes by grammar rule name (a string); here every
//! rule and every leaf token category is a variant of a closed enum, so a
//! node's kind and a Rust pattern match are the same thing.

/// An internal (rule) node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
  SystemDeclaration,
  ProcessDeclaration,
  EventDeclaration,
  ClockDeclaration,
  IntDeclaration,
  LocationDeclaration,
  EdgeDeclaration,
  SyncDeclaration,
  SyncConstraint,
  SyncConstraints,
  Attributes,
  InitialAttribute,
  UrgentAttribute,
  CommittedAttribute,
  LabelsAttribute,
  ProvidedAttribute,
  InvariantAttribute,
  DoAttribute,
  Expr,
  AtomicExpr,
  PredicateExpr,
  ClockExpr,
  IntTerm,
  Op,
  IntOrClockId,
  Id,
  Nop,
  /// A single `do:` reset, `ref = int_term`. Not named in §3.1's
  /// enumeration ("among others"); needed so `invert_reset` can exchange
  /// one reset for a [`RuleKind::Nop`] as a single structural unit.
  Assignment,
}

impl RuleKind {
  /// `true` for the two kinds that may directly hold a comparator-bearing
  /// atomic expression (see `ast::query::is_clock_expr`).
  pub fn is_constraint_expr(self) -> bool {
    matches!(self, RuleKind::PredicateExpr | RuleKind::ClockExpr)
  }
}

/// A leaf token kind. Two leaves are structurally equal iff both their
/// kind and their literal text match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  /// A bare identifier: process, clock, event, location or label name.
  Ident,
  /// An integer literal, always non-negative in source text; negative
  /// constants only ever appear as `int_term` subtrees with a leading
  /// `-` operator, never as a single token.
  IntLit,
  /// One of `== <= < >= > !=`.
  Cmp,
  /// A keyword such as `system`, `process`, `clock`, `edge`, `sync`,
  /// `initial`, `urgent`, `committed`, `labels`, `provided`,
  /// `invariant`, `do`.
  Keyword,
  /// Punctuation/operators that are not comparators: `:` `{` `}` `[` `]`
  /// `@` `?` `&&` `||` `=` `+` `-` `,`.
  Sym,
}
