//! Shell-like `$NAME` / `${NAME}` expansion.
//!
//! The engine is store-agnostic: it walks the input once and asks a
//! [`Resolver`] for the value of every reference it recognizes. Anything it
//! cannot read as a reference or an escape is copied through unchanged.

pub mod resolve;
pub mod scanner;

pub use resolve::{Environment, Resolver};
pub use scanner::{DEFAULT_ESCAPE, expand, expand_with};
