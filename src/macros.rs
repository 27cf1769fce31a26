//! Indukt's macros.

/// Imports indukt's prelude.
#[macro_export]
macro_rules! prelude {
    {} => { use $crate::prelude::*; };
    { pub } => { pub use $crate::prelude::*; };
}

/// Convenience macro, provides a DSL for writing expressions.
///
/// - the index variable must be written `(var n)` (or `(var k)`), without any
///   quotes;
/// - applications are written prefix-style, `(+ (var n) 1)`;
/// - floor division is written `idiv`, exponentiation `pow`.
#[macro_export]
macro_rules! build_expr {
    (true) => ( $crate::expr::Expr::from(true) );
    (false) => ( $crate::expr::Expr::from(false) );

    ( (var $id:ident) ) => (
        $crate::expr::Expr::new_var($crate::expr::Var::new(stringify!($id)))
    );

    ( ($op:tt $($args:tt)*) ) => (
        $crate::expr::Expr::from((
            $crate::build_expr!(@op $op),
            vec![ $($crate::build_expr!($args)),* ],
        ))
    );

    ($cst:expr) => ( $crate::expr::Expr::from($cst) );

    (@op ite) => ( $crate::expr::Op::Ite );
    (@op +) => ( $crate::expr::Op::Add );
    (@op -) => ( $crate::expr::Op::Sub );
    (@op *) => ( $crate::expr::Op::Mul );
    (@op /) => ( $crate::expr::Op::Div );
    (@op idiv) => ( $crate::expr::Op::IDiv );
    (@op %) => ( $crate::expr::Op::Mod );
    (@op pow) => ( $crate::expr::Op::Pow );
    (@op >=) => ( $crate::expr::Op::Ge );
    (@op <=) => ( $crate::expr::Op::Le );
    (@op >) => ( $crate::expr::Op::Gt );
    (@op <) => ( $crate::expr::Op::Lt );
    (@op ==) => ( $crate::expr::Op::Eq );
    (@op !=) => ( $crate::expr::Op::Neq );
    (@op not) => ( $crate::expr::Op::Not );
    (@op and) => ( $crate::expr::Op::And );
    (@op or) => ( $crate::expr::Op::Or );
    (@op !) => ( $crate::expr::Op::Not );
    (@op &&) => ( $crate::expr::Op::And );
    (@op ||) => ( $crate::expr::Op::Or );
    (@op abs) => ( $crate::expr::Op::Abs );
    (@op floor) => ( $crate::expr::Op::Floor );
    (@op ceil) => ( $crate::expr::Op::Ceil );
    (@op min) => ( $crate::expr::Op::Min );
    (@op max) => ( $crate::expr::Op::Max );
}
