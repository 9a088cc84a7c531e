//! Normalizing AST transformers (C4): `SimplifyExpressions`,
//! `BreakUpEquals` and `CombineGuards`, the prerequisites `negate_guard`
//! needs to never produce a `!=` inside a clock constraint.

mod break_up_equals;
mod combine_guards;
mod simplify;

pub use break_up_equals::break_up_equals;
pub use combine_guards::combine_guards;
pub use simplify::simplify;
