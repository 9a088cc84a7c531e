//! `tck-mutate`: a deterministic, fully-enumerating mutation generator for
//! TChecker timed-automata system declarations.
//!
//! The crate is organised around the six components of the design: a
//! grammar (C0, [`grammar`]), a tagged AST with positional accessors (C3,
//! [`ast`]), pure tree-edit primitives (C2, [`edit`]), normalizing
//! transformers (C4, [`transform`]), the 21 mutation operators (C5,
//! [`operators`]) and the driver that ties them together (C6, [`driver`]).
//! [`checkers`] wraps the three external decision procedures the driver
//! consults, and [`error`] collects every fallible outcome into one type.

pub mod ast;
pub mod checkers;
pub mod driver;
pub mod edit;
pub mod error;
pub mod grammar;
pub mod operators;
pub mod transform;
