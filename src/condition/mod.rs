//! Condition compiler
//!
//! Turns loosely-typed filter expressions into a parameterized WHERE clause
//! plus a bound-parameter map. The parser is tolerant: malformed input is
//! dropped from the clause, not reported as an error.

mod compiler;
mod parser;

pub use compiler::{compile, compile_qualified, CompiledWhere};
pub use parser::{coerce_value, param_name, Condition, Conditions, Operator, RawCondition};
