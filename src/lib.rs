//! Compiles dice notation such as `4d6dl1` or `2d3+4+3dF!>1/4^3` into a tree
//! of [`Rollable`] nodes, and evaluates the tree to a roll, a minimum and a
//! maximum.
//!
//! ```
//! let rollable = dice_cup::parse("4d6dl1+2").unwrap();
//!
//! assert_eq!(rollable.notation(), "4D6DL1+2");
//! assert_eq!((rollable.minimum(), rollable.maximum()), (5, 20));
//!
//! let toss = rollable.roll();
//! assert!((5..=20).contains(&toss.value()));
//! ```
#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]


#[cfg(test)]
mod rollable_test_strategies;

mod error;
mod random;
mod toss;
mod tracer;
mod roller;
mod rollable;
mod parser;

pub use error::{Error, ErrorKind};
pub use random::{RandomSource, RngSource};
pub use toss::{Context, Method, Toss};
pub use tracer::{LogTracer, NoopTracer, Recorder, Tracer};
pub use roller::{Roller, RollerBuilder};
pub use rollable::{
    Rollable, Die, Pool,
    Arithmetic, Operator,
    DropKeep, Algorithm,
    Explode, Comparator
};
pub use parser::{ParserError, Parser, parse, roll};
