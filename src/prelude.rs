//! Common imports throughout this project.

pub use std::{
    collections::{BTreeMap as Map, BTreeSet as Set},
    fmt,
    ops::{Deref, DerefMut},
};

pub use error_chain::bail;
pub use num::{BigInt as Int, BigRational as Rat, Integer, One, Signed, ToPrimitive, Zero};

pub use crate::{catalog, check, expr, formula, parse, sample};

/// Sequence index.
///
/// This is the sole free variable of a formula: the `n` in `n * (n + 1) / 2`.
/// Indices are natural numbers, negative indices are not representable.
pub type Idx = usize;

error_chain::error_chain! {
    types {
        Error, ErrorKind, ResExt, Res;
    }

    foreign_links {
        Io(std::io::Error)
        /// I/O error.
        ;
        Json(serde_json::Error)
        /// JSON (de)serialization error from the formula catalog.
        ;
    }

    errors {
        /// A formula failed to compile.
        Compile(e: parse::CompileError) {
            description("compile error")
            display("{}", e)
        }
        /// A formula failed to evaluate.
        Eval(e: expr::EvalError) {
            description("evaluation error")
            display("{}", e)
        }
    }
}

impl From<parse::CompileError> for Error {
    fn from(e: parse::CompileError) -> Self {
        ErrorKind::Compile(e).into()
    }
}
impl From<expr::EvalError> for Error {
    fn from(e: expr::EvalError) -> Self {
        ErrorKind::Eval(e).into()
    }
}
