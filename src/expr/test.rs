//! Tests over expressions.

crate::prelude!();

use crate::build_expr;
use expr::{Cst, EvalError, Expr, HasTyp, Op, Typ};

/// Evaluates an expression at some index.
fn eval(expr: &Expr, idx: usize) -> Result<Cst, EvalError> {
    expr.eval(&Int::from(idx))
}

#[test]
fn typing_arith() {
    let add = build_expr!((+ (var n) 1));
    assert_eq!(add.typ(), Typ::Int);

    let div = build_expr!((/ (var n) 2));
    assert_eq!(div.typ(), Typ::Rat);

    // `//` and `%` are integer-valued even over rationals.
    let idiv = build_expr!((idiv (/ (var n) 2) 3));
    assert_eq!(idiv.typ(), Typ::Int);

    // Promotion: an `int` joined with a `rat` is a `rat`.
    let mixed = build_expr!((+ (var n) (/ 1 2)));
    assert_eq!(mixed.typ(), Typ::Rat);

    let cubes = build_expr!((pow (/ (* (var n) (+ (var n) 1)) 2) 2));
    assert_eq!(cubes.typ(), Typ::Rat);
}

#[test]
fn typing_cmp() {
    let cmp = build_expr!((> (var n) 7));
    assert_eq!(cmp.typ(), Typ::Bool);

    let eq = build_expr!((== (/ (var n) 2) 3));
    assert_eq!(eq.typ(), Typ::Bool);
}

#[test]
fn typing_ite() {
    let ite = build_expr!((ite (> (var n) 3) 1 0));
    assert_eq!(ite.typ(), Typ::Int);

    let ite = build_expr!((ite (> (var n) 3) (/ (var n) 2) 0));
    assert_eq!(ite.typ(), Typ::Rat);
}

#[test]
fn typing_fail() {
    let args = vec![build_expr!(true), build_expr!(1)];
    let err = Op::Add.type_check(&args).unwrap_err();
    assert_eq!(
        err.to_string(),
        "`+`'s arguments must have an arithmetic type, unexpected type `bool`",
    );

    let args = vec![build_expr!((var n)), build_expr!((var n))];
    let err = Op::And.type_check(&args).unwrap_err();
    assert_eq!(
        err.to_string(),
        "`and`'s arguments must all be boolean expressions",
    );

    let args = vec![build_expr!(2), build_expr!((/ (var n) 2))];
    let err = Op::Pow.type_check(&args).unwrap_err();
    assert_eq!(err.to_string(), "`**`'s exponent must be an integer, got `rat`");

    let args = vec![build_expr!(1)];
    let err = Op::Div.type_check(&args).unwrap_err();
    assert_eq!(err.to_string(), "`/` expects at least 2 argument(s)");

    let args = vec![build_expr!(1), build_expr!(2)];
    let err = Op::Not.type_check(&args).unwrap_err();
    assert_eq!(err.to_string(), "`not` expects at most 1 argument(s)");
}

#[test]
fn eval_div() {
    // Exact division, integral results normalize to integers.
    let expr = build_expr!((/ 6 3));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(2));

    let expr = build_expr!((/ 6 4));
    assert_eq!(
        eval(&expr, 0).unwrap(),
        Cst::rat(Rat::new(Int::from(3), Int::from(2))),
    );

    let expr = build_expr!((/ 1 (- (var n) 3)));
    assert_eq!(eval(&expr, 3), Err(EvalError::DivisionByZero));
}

#[test]
fn eval_idiv_mod() {
    // `//` rounds toward negative infinity.
    let expr = build_expr!((idiv 7 2));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(3));
    let expr = build_expr!((idiv (- 7) 2));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(-4));

    // `%` takes the sign of its divisor.
    let expr = build_expr!((% (- 7) 2));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(1));
    let expr = build_expr!((% 7 (- 2)));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(-1));

    let expr = build_expr!((idiv 1 (var n)));
    assert_eq!(eval(&expr, 0), Err(EvalError::DivisionByZero));
    let expr = build_expr!((% 1 (var n)));
    assert_eq!(eval(&expr, 0), Err(EvalError::DivisionByZero));

    // Floor division over rationals: (7/2) // 1 = 3.
    let expr = build_expr!((idiv (/ 7 2) 1));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(3));
}

#[test]
fn eval_pow() {
    let expr = build_expr!((pow 2 10));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(1024));

    // Negative exponents produce exact rationals.
    let expr = build_expr!((pow 2 (- 3)));
    assert_eq!(
        eval(&expr, 0).unwrap(),
        Cst::rat(Rat::new(Int::one(), Int::from(8))),
    );
    let expr = build_expr!((pow 1 (- 3)));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(1));

    let expr = build_expr!((pow 0 0));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(1));
    let expr = build_expr!((pow 0 (- 1)));
    assert_eq!(eval(&expr, 0), Err(EvalError::DivisionByZero));

    // Rational base.
    let expr = build_expr!((pow (/ (var n) 2) 2));
    assert_eq!(
        eval(&expr, 3).unwrap(),
        Cst::rat(Rat::new(Int::from(9), Int::from(4))),
    );
    assert_eq!(eval(&expr, 4).unwrap(), Cst::int(4));

    // Exponents that do not fit in 32 bits overflow instead of hanging.
    let expr = build_expr!((pow 2 (pow 2 40)));
    match eval(&expr, 0) {
        Err(EvalError::Overflow(_)) => (),
        res => panic!("expected an overflow error, got {:?}", res),
    }
}

#[test]
fn eval_funs() {
    let expr = build_expr!((abs (- (var n) 5)));
    assert_eq!(eval(&expr, 2).unwrap(), Cst::int(3));
    assert_eq!(eval(&expr, 8).unwrap(), Cst::int(3));

    let expr = build_expr!((floor (/ 7 2)));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(3));
    let expr = build_expr!((ceil (/ 7 2)));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(4));

    // Floor rounds toward negative infinity on negative rationals.
    let expr = build_expr!((floor (/ (- 7) 2)));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(-4));
    let expr = build_expr!((ceil (/ (- 7) 2)));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(-3));

    let expr = build_expr!((min (var n) 3 7));
    assert_eq!(eval(&expr, 5).unwrap(), Cst::int(3));
    let expr = build_expr!((max (var n) 3 (/ 9 2)));
    assert_eq!(
        eval(&expr, 1).unwrap(),
        Cst::rat(Rat::new(Int::from(9), Int::from(2))),
    );
}

#[test]
fn eval_lazy() {
    // The else branch divides by zero at `n = 0` but is never evaluated.
    let expr = build_expr!((ite (== (var n) 0) 0 (idiv 1 (var n))));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(0));
    assert_eq!(eval(&expr, 2).unwrap(), Cst::int(0));

    // Same for the right-hand side of `or` and `and`.
    let expr = build_expr!((or (== (var n) 0) (> (idiv 1 (var n)) 0)));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::bool(true));
    let expr = build_expr!((and (!= (var n) 0) (> (idiv 1 (var n)) 0)));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::bool(false));
}

#[test]
fn eval_collapse() {
    // N-ary applications fold left.
    let expr = build_expr!((- 10 3 2));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(5));
    let expr = build_expr!((+ 1 2 3 4));
    assert_eq!(eval(&expr, 0).unwrap(), Cst::int(10));
}

#[test]
fn structure() {
    let expr = build_expr!((+ (var n) 1));
    assert!(expr.is_app());
    assert!(!expr.is_cst());
    assert!(build_expr!((var n)).is_var());
    assert_eq!(expr.to_string(), "(+ n 1)");
}

#[test]
fn eval_pure() {
    let expr = build_expr!((/ (* (var n) (+ (var n) 1)) 2));
    for idx in 0..20 {
        assert_eq!(eval(&expr, idx), eval(&expr, idx));
    }
    assert_eq!(eval(&expr, 10).unwrap(), Cst::int(55));
}
