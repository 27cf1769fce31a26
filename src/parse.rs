//! Compiles formula source text into typed expressions.
//!
//! Compilation is the security boundary of the crate: input is parsed under a
//! closed grammar ([`rules`]) and converted to a typed [`expr::Expr`] with
//! every identifier and call checked against the whitelist. Nothing from the
//! input is ever executed; anything outside the grammar is a [`CompileError`]
//! and no formula is produced.

crate::prelude!();

use expr::{Cst, HasTyp, Op};
use formula::Formula;

pub mod ast;
pub mod kw;

#[cfg(test)]
mod test;

/// A span in the input text.
#[readonly::make]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Span's start (inclusive).
    pub start: usize,
    /// Span's end (exclusive).
    pub end: usize,
}
impl Span {
    /// Constructor.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Span { start, end }
    }

    /// Row, column and line of the span's start.
    ///
    /// The row and column start at `0`; the column counts characters, not
    /// bytes.
    pub fn locate(self, text: &str) -> (usize, usize, String) {
        let mut offset = self.start;
        for (row, line) in text.lines().enumerate() {
            if offset <= line.len() {
                let col = line
                    .char_indices()
                    .take_while(|(pos, _)| *pos < offset)
                    .count();
                return (row, col, line.to_string());
            }
            offset -= line.len() + 1;
        }
        // Start lies past the last line, *e.g.* a parse error at EOI.
        (text.lines().count(), 0, "<EOI>".into())
    }
}
impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// Wraps something with a span.
#[derive(Debug, Clone, Copy)]
pub struct Spn<T> {
    /// Value wrapped.
    pub inner: T,
    /// Span.
    pub span: Span,
}
impl<T: PartialEq> PartialEq for Spn<T> {
    fn eq(&self, that: &Self) -> bool {
        self.inner == that.inner
    }
}
impl<T: Eq> Eq for Spn<T> {}
impl<T> Spn<T> {
    /// Constructor.
    pub fn new(inner: T, span: impl Into<Span>) -> Self {
        let span = span.into();
        Self { inner, span }
    }

    /// Applies an operation to the inner value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spn<U> {
        Spn {
            inner: f(self.inner),
            span: self.span,
        }
    }

    /// Applies an operation yielding a result to the inner value.
    pub fn res_map<U>(
        self,
        mut f: impl FnMut(T) -> Result<U, &'static str>,
    ) -> Result<Spn<U>, &'static str> {
        let inner = f(self.inner)?;
        Ok(Spn::new(inner, self.span))
    }
}
impl<T> Deref for Spn<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.inner
    }
}

/// Yields `true` if `ident` is a keyword.
pub fn is_kw(ident: impl AsRef<str>) -> bool {
    kw::all.contains(ident.as_ref())
}

/// Errors produced when compiling a formula.
///
/// Compilation aborts on the first error: no partial formula is ever
/// produced, and nothing from the rejected input is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The input does not parse under the formula grammar.
    Syntax {
        /// Row where the error occurred (starts at `0`).
        row: usize,
        /// Column where the error occurred, in characters (starts at `0`).
        col: usize,
        /// Line of the error.
        line: String,
        /// Message.
        msg: String,
    },
    /// The input parses but steps outside the whitelisted grammar: an unknown
    /// identifier or function, or an ill-typed application.
    Disallowed {
        /// Row where the error occurred (starts at `0`).
        row: usize,
        /// Column where the error occurred, in characters (starts at `0`).
        col: usize,
        /// Line of the error.
        line: String,
        /// Message.
        msg: String,
    },
}
impl CompileError {
    /// Syntax error constructor.
    pub fn syntax(span: Span, txt: &str, msg: impl Into<String>) -> Self {
        let (row, col, line) = span.locate(txt);
        Self::Syntax {
            row,
            col,
            line,
            msg: msg.into(),
        }
    }

    /// Disallowed-input error constructor.
    pub fn disallowed(span: Span, txt: &str, msg: impl Into<String>) -> Self {
        let (row, col, line) = span.locate(txt);
        Self::Disallowed {
            row,
            col,
            line,
            msg: msg.into(),
        }
    }

    /// True if the error is a syntax error.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
    /// True if the error is a disallowed-input error.
    pub fn is_disallowed(&self) -> bool {
        matches!(self, Self::Disallowed { .. })
    }

    /// Message accessor.
    pub fn msg(&self) -> &str {
        match self {
            Self::Syntax { msg, .. } | Self::Disallowed { msg, .. } => msg,
        }
    }

    /// Pretty multi-line representation pointing inside the offending line.
    pub fn pretty(&self) -> String {
        let (what, row, col, line, msg) = match self {
            Self::Syntax { row, col, line, msg } => ("parse error", row, col, line, msg),
            Self::Disallowed { row, col, line, msg } => ("disallowed input", row, col, line, msg),
        };
        let row_str = (row + 1).to_string();
        format!(
            "{} at {}:{}\n{} | {}\n{} | {}^~~~ {}",
            what,
            row_str,
            col + 1,
            row_str,
            line,
            " ".repeat(row_str.len()),
            " ".repeat(*col),
            msg,
        )
    }
}
impl fmt::Display for CompileError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Syntax { row, col, msg, .. } => {
                write!(fmt, "parse error at {}:{}: {}", row + 1, col + 1, msg)
            }
            Self::Disallowed { row, col, msg, .. } => {
                write!(fmt, "disallowed input at {}:{}: {}", row + 1, col + 1, msg)
            }
        }
    }
}

peg::parser! {
    /// PEG parsing rules for the formula language.
    pub grammar rules() for str {
        /// Whitespace.
        rule whitespace() = quiet! {
            [ ' ' | '\t' | '\r' | '\n' ]
        }

        /// Whitespace skipper.
        rule _() = quiet! { whitespace()* }

        /// Ident parsing.
        ///
        /// # Examples
        ///
        /// ```rust
        /// # use indukt::parse::rules::ident;
        /// assert_eq!(*ident("n").unwrap(), "n");
        /// assert_eq!(*ident("my_var_7").unwrap(), "my_var_7");
        ///
        /// // Cannot start with a digit.
        /// assert_eq!(
        ///     ident("0_illegal").unwrap_err().to_string(),
        ///     "error at 1:1: expected identifier",
        /// );
        ///
        /// // Keywords are not identifiers.
        /// assert!(ident("if").is_err());
        /// ```
        pub rule ident() -> Spn<&'input str>
        = quiet! {
            s:position!()
            id:$(
                [ 'a'..='z' | 'A'..='Z' | '_' ]
                [ 'a'..='z' | 'A'..='Z' | '_' | '0'..='9' ]*
            )
            e:position!() {?
                if is_kw(id) {
                    Err("unexpected keyword")
                } else {
                    Ok(Spn::new(id, (s, e)))
                }
            }
        }
        / expected!("identifier")

        /// Parses boolean constants.
        pub rule bool() -> Spn<bool>
        = s:position!() "true" e:position!() { Spn::new(true, (s, e)) }
        / s:position!() "false" e:position!() { Spn::new(false, (s, e)) }

        /// Recognizes numbers: `0` and `[1-9][0-9]*`.
        ///
        /// # Examples
        ///
        /// ```rust
        /// # use indukt::parse::rules::number;
        /// let n = "0";
        /// assert_eq!(*number(n).unwrap(), n);
        /// let n = "72054324";
        /// assert_eq!(*number(n).unwrap(), n);
        /// ```
        pub rule number() -> Spn<&'input str>
        = s:position!() n:$("0" / ['1'..='9']['0'..='9']*) e:position!() {
            Spn::new(n, (s, e))
        }

        /// Same as [`number`] but generates an `Int`.
        pub rule int() -> Spn<Int>
        = quiet! {
            digits:number() {?
                digits.res_map(|digits|
                    Int::parse_bytes(digits.as_bytes(), 10)
                        .ok_or("illegal integer literal")
                )
            }
        }
        / expected!("integer")

        /// Parses constants.
        pub rule cst() -> Spn<Cst>
        = quiet! {
            i:int() { i.map(Cst::I) }
            / b:bool() { b.map(Cst::B) }
        }
        / expected!("int/bool constant")

        /// Parses a function call.
        ///
        /// Any identifier can appear in call position here; the whitelist
        /// check happens during AST conversion so that unknown calls are
        /// reported as disallowed, not as syntax errors.
        pub rule call() -> ast::Ast<'input>
        = quiet! {
            fun:ident() _ "(" _ args:(expr() ** (_ "," _)) _ ")" {
                ast::Ast::call(fun, args)
            }
        }
        / expected!("function call")

        /// Parses the index variable.
        pub rule var() -> ast::Ast<'input>
        = quiet! {
            id:ident() { ast::Ast::var(id) }
        }
        / expected!("index variable")

        /// Parses an if-then-else.
        ///
        /// Rust-style: `if <cnd> { <thn> } else { <els> }`, `else if` chains
        /// are supported.
        pub rule ite() -> ast::Ast<'input>
        = quiet! {
            s:position!() "if" e:position!()
            _ cnd:expr()
            _ "{"
            _ thn:expr()
            _ "}"
            elseif:(
                _ "else" _ s:position!() "if" e:position!()
                _ cnd:expr() _ "{" _ thn:expr() _ "}" {
                    (Span::new(s, e), cnd, thn)
                }
            )*
            _ "else" _ "{"
            _ els:expr()
            _ "}" {
                let els = elseif.into_iter().rev().fold(
                    els,
                    |els, (if_span, cnd, thn)| ast::Ast::app(
                        Spn::new(Op::Ite, if_span),
                        vec![cnd, thn, els],
                    ),
                );
                ast::Ast::app(Spn::new(Op::Ite, (s, e)), vec![cnd, thn, els])
            }
        }
        / expected!("if-then-else")

        /// Parses formula expressions.
        ///
        /// Precedence, loosest to tightest: `or`, `and`, comparisons,
        /// `+`/`-`, `*`/`/`/`//`/`%`, unary `-`/`not`, `**`. Exponentiation
        /// is right-associative and binds tighter than unary minus, so
        /// `-n ** 2` is `-(n ** 2)`.
        pub rule expr() -> ast::Ast<'input>
        = ast:precedence! {
            lft:(@) _ s:position!() ("||" / "or") e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Or, (s, e)), lft, rgt)
            }
            --
            lft:(@) _ s:position!() ("&&" / "and") e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::And, (s, e)), lft, rgt)
            }
            --
            lft:(@) _ s:position!() ("==" / "=") e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Eq, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() "!=" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Neq, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() "<=" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Le, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() ">=" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Ge, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() "<" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Lt, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() ">" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Gt, (s, e)), lft, rgt)
            }
            --
            lft:(@) _ s:position!() "+" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Add, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() "-" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Sub, (s, e)), lft, rgt)
            }
            --
            // `//` before `/` so floor division is not read as two divisions.
            lft:(@) _ s:position!() "//" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::IDiv, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() "/" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Div, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() "%" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Mod, (s, e)), lft, rgt)
            }
            lft:(@) _ s:position!() "*" !"*" e:position!() _ rgt:@ {
                ast::Ast::binapp(Spn::new(Op::Mul, (s, e)), lft, rgt)
            }
            --
            s:position!() ("!" !"=" / "not") e:position!() _ arg:@ {
                ast::Ast::unapp(Spn::new(Op::Not, (s, e)), arg)
            }
            s:position!() "-" e:position!() _ arg:@ {
                ast::Ast::unapp(Spn::new(Op::Sub, (s, e)), arg)
            }
            --
            // Python-style `2 ** -3`: the exponent may carry a sign.
            lft:@ _ s:position!() ("**" / "^") e:position!() _ "-" _ rgt:(@) {
                let rgt = ast::Ast::unapp(Spn::new(Op::Sub, (s, e)), rgt);
                ast::Ast::binapp(Spn::new(Op::Pow, (s, e)), lft, rgt)
            }
            lft:@ _ s:position!() ("**" / "^") e:position!() _ rgt:(@) {
                ast::Ast::binapp(Spn::new(Op::Pow, (s, e)), lft, rgt)
            }
            --
            ite:ite() { ite }
            call:call() { call }
            var:var() { var }
            cst:cst() { ast::Ast::cst(cst) }
            "(" _ e:expr() _ ")" {
                let mut e = e;
                e.close();
                e
            }
        }

        /// Parses a full formula: an expression covering the whole input.
        pub rule formula_ast() -> ast::Ast<'input>
        = _ e:expr() _ { e }
    }
}

/// Compiles the source text of a formula.
///
/// This is the only way to produce a [`Formula`], so no evaluation can happen
/// before the whitelist and type checks have passed.
///
/// # Examples
///
/// ```rust
/// # use indukt::parse;
/// let formula = parse::formula("n * (n + 1) / 2").unwrap();
/// assert_eq!(formula.eval(10).unwrap(), 55.into());
///
/// // Arbitrary identifiers and calls are rejected, never evaluated.
/// let err = parse::formula("__import__(n)").unwrap_err();
/// assert!(err.is_disallowed());
/// ```
pub fn formula(txt: &str) -> Result<Formula, CompileError> {
    let ast = match rules::formula_ast(txt) {
        Ok(ast) => ast,
        Err(e) => {
            let span = Span::new(e.location.offset, e.location.offset);
            return Err(CompileError::syntax(
                span,
                txt,
                format!("expected {}", e.expected),
            ));
        }
    };
    let expr = ast.to_expr().map_err(|e| e.into_compile(txt))?;
    if !expr.typ().is_arith() {
        return Err(CompileError::disallowed(
            Span::new(0, txt.len()),
            txt,
            format!(
                "a formula must be numeric, but this one produces `{}` values",
                expr.typ(),
            ),
        ));
    }
    Ok(Formula::new(txt, expr))
}
