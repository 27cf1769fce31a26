//! Formula values and the predefined formula set.
//!
//! A [`Formula`] packages the source text a user typed with the typed
//! expression it compiled to. Formulas are immutable; re-compiling the same
//! source yields an interchangeable value, and two formulas with the same
//! source text are equal.

crate::prelude!();

use expr::{Cst, EvalError, Expr};

/// A compiled formula over the sequence index.
///
/// Can only be built by [`Formula::compile`] (or [`parse::formula`]), so a
/// value of this type always wraps a fully validated expression. Evaluation
/// is pure: same index, same result.
#[derive(Debug, Clone)]
pub struct Formula {
    /// Source text the formula was compiled from.
    src: String,
    /// Compiled expression.
    expr: Expr,
}
impl Formula {
    /// Compiles the source text of a formula.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use indukt::formula::Formula;
    /// let naturals = Formula::compile("n * (n + 1) / 2").unwrap();
    /// assert_eq!(naturals.eval(4).unwrap(), 10.into());
    ///
    /// assert!(Formula::compile("n +* 2").unwrap_err().is_syntax());
    /// assert!(Formula::compile("foo(n)").unwrap_err().is_disallowed());
    /// ```
    pub fn compile(src: impl AsRef<str>) -> Result<Self, parse::CompileError> {
        parse::formula(src.as_ref())
    }

    /// Constructor, only for the parser.
    pub(crate) fn new(src: impl Into<String>, expr: Expr) -> Self {
        Self {
            src: src.into(),
            expr,
        }
    }

    /// Source text accessor.
    pub fn source(&self) -> &str {
        &self.src
    }

    /// Compiled expression accessor.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluates the formula at some index.
    ///
    /// Rationals appearing during evaluation are exact, so `n * (n + 1) / 2`
    /// is integer-valued at every index. A result that is *not* an integer,
    /// like `1 / (n - 3)` at `n = 1`, is a [`EvalError::Domain`] error.
    pub fn eval(&self, idx: Idx) -> Result<Int, EvalError> {
        match self.expr.eval(&Int::from(idx))? {
            Cst::I(i) => Ok(i),
            Cst::R(r) => Err(EvalError::domain(format!(
                "`{}` evaluates to the non-integer value {}/{} at index {}",
                self.src,
                r.numer(),
                r.denom(),
                idx,
            ))),
            Cst::B(b) => Err(EvalError::domain(format!(
                "`{}` evaluates to the boolean value `{}` at index {}",
                self.src, b, idx,
            ))),
        }
    }
}
impl PartialEq for Formula {
    /// A formula's identity is its source text.
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src
    }
}
impl Eq for Formula {}
impl fmt::Display for Formula {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        self.src.fmt(fmt)
    }
}

/// The predefined formula set, as `(name, source text)` pairs.
///
/// All of these compile; only the first satisfies the fixed induction
/// relation `step(k + 1) = hypothesis(k) + (k + 1)`, which accumulates by
/// `k + 1` at each step.
pub const PREDEFINED: &[(&str, &str)] = &[
    ("Sum of first n natural numbers", "n * (n + 1) / 2"),
    ("Sum of first n squares", "n * (n + 1) * (2 * n + 1) / 6"),
    ("Sum of first n cubes", "(n * (n + 1) / 2) ** 2"),
];

/// Syntax guide for formulas, displayed by interactive frontends.
pub const GUIDE: &str = r#"A formula describes an integer sequence over one index variable,
written `n` (or `k`, both name the same index).

    n * (n + 1) / 2

Supported syntax:

- integer literals of any size: `0`, `7`, `72054324`;
- arithmetic: `+`, `-`, `*`, exact division `/`, floor division `//`,
  modulo `%`, exponentiation `**` (also written `^`);
- comparisons `== != <= < >= >` combined with `and`/`or`/`not`, usable
  inside conditions;
- whitelisted functions: `abs(e)`, `floor(e)`, `ceil(e)`, `min(e, ...)`,
  `max(e, ...)`;
- conditionals, Rust-style: `if n == 0 { 0 } else { 1 // n }`.

Division `/` is exact: `n * (n + 1) / 2` always lands on an integer, but a
formula that stops on a true fraction is a domain error at that index.
Floor division `//` rounds toward negative infinity and `%` takes the sign
of its divisor, like the corresponding Python operators.

Anything else (unknown names, attribute access, calls outside the
whitelist) is rejected at compile time and never evaluated."#;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn predefined_compile() {
        for (name, src) in PREDEFINED {
            let formula =
                Formula::compile(src).unwrap_or_else(|e| panic!("`{}` ({}): {}", src, name, e));
            // Spot-check the value at n = 3: 6, 14 and 36.
            let expected = match *name {
                "Sum of first n natural numbers" => 6,
                "Sum of first n squares" => 14,
                _ => 36,
            };
            assert_eq!(formula.eval(3).unwrap(), Int::from(expected));
        }
    }

    #[test]
    fn identity_is_source() {
        let lft = Formula::compile("n * (n + 1) / 2").unwrap();
        let rgt = Formula::compile("n * (n + 1) / 2").unwrap();
        assert_eq!(lft, rgt);

        let other = Formula::compile("n*(n+1)/2").unwrap();
        assert_ne!(lft, other);
    }

    #[test]
    fn non_integer_is_domain_error() {
        let formula = Formula::compile("1 / (n - 3)").unwrap();
        match formula.eval(1) {
            Err(EvalError::Domain(msg)) => assert!(msg.contains("non-integer")),
            res => panic!("expected a domain error, got {:?}", res),
        }
        assert_eq!(formula.eval(4).unwrap(), Int::from(1));
        assert_eq!(formula.eval(3), Err(EvalError::DivisionByZero));
    }
}
