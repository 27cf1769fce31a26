//! Formula AST, as produced by the parsing rules.
//!
//! The AST is spanned and untyped. [`Ast::to_expr`] turns it into a typed
//! [`Expr`], enforcing the identifier/call whitelist on the way: this is
//! where `__import__(...)`-style inputs die, before anything is evaluated.

crate::prelude!();

use expr::{Expr, Op, Var};

use super::{kw, CompileError, Span, Spn};

/// Parse-level error: a message anchored to a span of the input.
#[derive(Debug, Clone)]
pub struct PError {
    /// Span where the error happened.
    pub span: Span,
    /// Message.
    pub msg: String,
}
impl PError {
    /// Constructor.
    pub fn new(msg: impl Into<String>, span: impl Into<Span>) -> Self {
        Self {
            msg: msg.into(),
            span: span.into(),
        }
    }

    /// Turns itself into a [`CompileError::Disallowed`] over the input text.
    pub fn into_compile(self, txt: &str) -> CompileError {
        CompileError::disallowed(self.span, txt, self.msg)
    }
}
impl fmt::Display for PError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "[{}, {}] {}", self.span.start, self.span.end, self.msg)
    }
}

/// Parse result.
pub type PRes<T> = Result<T, PError>;

/// AST for the formula structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast<'txt> {
    /// Spanned constant.
    Cst(Spn<expr::Cst>),
    /// Spanned identifier, not yet checked against the variable whitelist.
    Var(Spn<&'txt str>),
    /// Function call, not yet checked against the call whitelist.
    Call {
        /// Spanned function name.
        fun: Spn<&'txt str>,
        /// Arguments.
        args: Vec<Ast<'txt>>,
    },
    /// Operator application.
    App {
        /// Spanned operator.
        op: Spn<Op>,
        /// Arguments.
        args: Vec<Ast<'txt>>,
        /// True if the application is parenthesized, which protects it from
        /// n-ary collapsing.
        closed: bool,
    },
}

impl<'txt> Ast<'txt> {
    /// Constant constructor.
    pub fn cst(cst: Spn<expr::Cst>) -> Self {
        Self::Cst(cst)
    }
    /// Variable constructor.
    pub fn var(ident: Spn<&'txt str>) -> Self {
        Self::Var(ident)
    }
    /// Call constructor.
    pub fn call(fun: Spn<&'txt str>, args: Vec<Self>) -> Self {
        Self::Call { fun, args }
    }

    /// Binary operator application.
    pub fn binapp(op: Spn<Op>, lft: Self, rgt: Self) -> Self {
        Self::App {
            op,
            args: vec![lft, rgt],
            closed: false,
        }
    }

    /// Unary operator application.
    pub fn unapp(op: Spn<Op>, arg: Self) -> Self {
        Self::App {
            op,
            args: vec![arg],
            closed: true,
        }
    }

    /// N-ary operator application.
    pub fn app(op: Spn<Op>, args: Vec<Self>) -> Self {
        Self::App {
            op,
            args,
            closed: true,
        }
    }

    /// Span accessor.
    pub fn span(&self) -> Span {
        match self {
            Self::Cst(c) => c.span,
            Self::Var(ident) => ident.span,
            Self::Call { fun, .. } => fun.span,
            Self::App { op, .. } => op.span,
        }
    }

    /// Closes the application, protecting it from n-ary collapsing.
    pub fn close(&mut self) {
        match self {
            Self::App { closed, .. } => *closed = true,
            Self::Cst(_) | Self::Var(_) | Self::Call { .. } => (),
        }
    }

    /// Turns itself into a typed expression.
    ///
    /// This enforces the whitelist:
    ///
    /// - identifiers must spell the index variable (`n` or `k`);
    /// - call targets must be whitelisted functions ([`Op::of_fun_str`]);
    /// - applications must type-check ([`Expr::new_op`]).
    pub fn to_expr(self) -> PRes<Expr> {
        let mut stack: Vec<(Spn<Op>, Vec<Expr>, std::vec::IntoIter<Self>, bool)> =
            Vec::with_capacity(7);
        let mut current = self;

        'go_down: loop {
            let mut res: Spn<Expr> = match current {
                Ast::Cst(cst) => cst.map(Expr::new_cst),

                Ast::Var(ident) => {
                    if ident.inner != kw::var::n && ident.inner != kw::var::k {
                        return Err(PError::new(
                            format!(
                                "unknown identifier `{}`, the index variable is written `{}` or `{}`",
                                ident.inner,
                                kw::var::n,
                                kw::var::k,
                            ),
                            ident.span,
                        ));
                    }
                    Spn::new(Expr::new_var(Var::new(ident.inner)), ident.span)
                }

                Ast::Call { fun, args } => {
                    let op = Op::of_fun_str(fun.inner).ok_or_else(|| {
                        PError::new(
                            format!(
                                "unknown function `{}`, the permitted functions are \
                                `abs`, `floor`, `ceil`, `min` and `max`",
                                fun.inner,
                            ),
                            fun.span,
                        )
                    })?;
                    let op = Spn::new(op, fun.span);
                    let mut args = args.into_iter();
                    if let Some(next) = args.next() {
                        current = next;
                        stack.push((op, Vec::with_capacity(args.len()), args, true));
                        continue 'go_down;
                    } else {
                        // Empty argument list, the arity check reports it.
                        let expr = Expr::new_op(op.inner, vec![])
                            .map_err(|e| PError::new(e.to_string(), op.span))?;
                        Spn::new(expr, op.span)
                    }
                }

                Ast::App { op, args, closed } => {
                    let mut args = args.into_iter();
                    if let Some(next) = args.next() {
                        current = next;
                    } else {
                        return Err(PError::new("illegal empty operator application", op.span));
                    }
                    stack.push((op, Vec::with_capacity(args.len()), args, closed));
                    continue 'go_down;
                }
            };

            'go_up: while let Some((op, mut args, mut todo, closed)) = stack.pop() {
                if let Some(next) = todo.next() {
                    args.push(res.inner);
                    current = next;
                    stack.push((op, args, todo, closed));
                    continue 'go_down;
                } else {
                    if !closed {
                        if let Some((up_op, up_args, _, _)) = stack.last_mut() {
                            if up_op.inner == op.inner && op.inner.is_left_associative() {
                                up_op.span = op.span;
                                up_args.extend(args);
                                continue 'go_up;
                            }
                        }
                    }
                    args.push(res.inner);
                    let expr = Expr::new_op(op.inner, args)
                        .map_err(|e| PError::new(e.to_string(), op.span))?;
                    res = Spn::new(expr, op.span);
                    continue 'go_up;
                }
            }

            return Ok(res.inner);
        }
    }
}
