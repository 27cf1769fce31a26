//! Parser tests.

crate::prelude!();

use parse::{CompileError, Span};

/// Compiles and checks the s-expression rendering of the result.
fn parses_to(input: &str, expected: &str) {
    println!("input: `{}`", input);
    let formula = parse::formula(input).unwrap_or_else(|e| panic!("{}", e.pretty()));
    println!("    -> {}", formula.expr());
    assert_eq!(formula.expr().to_string(), expected);
}

/// Compiles and checks the failure message.
fn fails_with(input: &str, expected: &str) -> CompileError {
    println!("input: `{}`", input);
    let err = parse::formula(input).unwrap_err();
    println!("    -> {}", err);
    assert_eq!(err.to_string(), expected);
    err
}

#[test]
fn precedence() {
    parses_to("1 + 2 * n", "(+ 1 (* 2 n))");
    parses_to("n * (n + 1) / 2", "(/ (* n (+ n 1)) 2)");
    parses_to("n * (n + 1) * (2 * n + 1) / 6", "(/ (* n (+ n 1) (+ (* 2 n) 1)) 6)");
    parses_to("(n * (n + 1) / 2) ** 2", "(** (/ (* n (+ n 1)) 2) 2)");
    // `n` and `k` both spell the index variable.
    parses_to("if n < k + 1 { n } else { k }", "(ite (< n (+ k 1)) n k)");
    parses_to("1 + 4 // 2", "(+ 1 (// 4 2))");
}

#[test]
fn pow() {
    // Right-associative, binds tighter than unary minus.
    parses_to("2 ** 3 ** 2", "(** 2 (** 3 2))");
    parses_to("-n ** 2", "(- (** n 2))");
    parses_to("2 ** -3", "(** 2 -3)");
    parses_to("2 ^ 3", "(** 2 3)");
}

#[test]
fn collapse() {
    // Left-associative chains collapse to n-ary applications.
    parses_to("1 + n + 2", "(+ 1 n 2)");
    parses_to("n - 1 - 2", "(- n 1 2)");
    // Parentheses protect the inner application.
    parses_to("n - (1 - 2)", "(- n (- 1 2))");
}

#[test]
fn ite() {
    parses_to("if n > 3 { 1 } else { 0 }", "(ite (> n 3) 1 0)");
    parses_to(
        "if n == 0 { 0 } else if n == 1 { 1 } else { 2 }",
        "(ite (= n 0) 0 (ite (= n 1) 1 2))",
    );
    parses_to(
        "if n > 0 and n < 10 { n } else { 0 }",
        "(ite (and (> n 0) (< n 10)) n 0)",
    );
}

#[test]
fn calls() {
    parses_to("abs(n - 5)", "(abs (- n 5))");
    parses_to("min(n, 3, 7)", "(min n 3 7)");
    parses_to("floor(n / 2) + ceil(n / 2)", "(+ (floor (/ n 2)) (ceil (/ n 2)))");
}

#[test]
fn disallowed_identifiers() {
    let err = fails_with(
        "m + 1",
        "disallowed input at 1:1: unknown identifier `m`, \
        the index variable is written `n` or `k`",
    );
    assert!(err.is_disallowed());

    // The classic dynamic-evaluation escape hatches die at compile time.
    let err = fails_with(
        "__import__(n)",
        "disallowed input at 1:1: unknown function `__import__`, \
        the permitted functions are `abs`, `floor`, `ceil`, `min` and `max`",
    );
    assert!(err.is_disallowed());

    let err = parse::formula("system(n)").unwrap_err();
    assert!(err.is_disallowed());
}

#[test]
fn disallowed_types() {
    // A formula is a sequence of integers, not of booleans.
    let err = parse::formula("n > 2").unwrap_err();
    assert!(err.is_disallowed());
    assert_eq!(
        err.msg(),
        "a formula must be numeric, but this one produces `bool` values",
    );

    let err = parse::formula("true + 1").unwrap_err();
    assert!(err.is_disallowed());
    assert_eq!(
        err.msg(),
        "`+`'s arguments must have an arithmetic type, unexpected type `bool`",
    );

    let err = parse::formula("n ** (1 / 2)").unwrap_err();
    assert!(err.is_disallowed());
    assert_eq!(err.msg(), "`**`'s exponent must be an integer, got `rat`");
}

#[test]
fn syntax_errors() {
    let err = parse::formula("").unwrap_err();
    assert!(err.is_syntax());

    let err = parse::formula("n +* 2").unwrap_err();
    assert!(err.is_syntax());

    // Attribute access is not part of the grammar at all.
    let err = parse::formula("n.__class__").unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn error_pos() {
    let err = parse::formula("n +\nboo").unwrap_err();
    match &err {
        CompileError::Disallowed { row, col, line, .. } => {
            assert_eq!(*row, 1);
            assert_eq!(*col, 0);
            assert_eq!(line, "boo");
        }
        e => panic!("expected a disallowed-input error, got {:?}", e),
    }
    assert!(err.pretty().contains("^~~~"));
}

#[test]
fn idempotent() {
    let first = parse::formula("n * (n + 1) / 2").unwrap();
    let second = parse::formula("n * (n + 1) / 2").unwrap();
    assert_eq!(first, second);
    for idx in 0..=10 {
        assert_eq!(first.eval(idx), second.eval(idx));
    }
}

#[test]
fn span() {
    let input = "here is\nsome\ntext";
    macro_rules! run {
        { $pos:expr => @($row:expr, $col:expr) $line:expr } => {{
            let (row, col, line) = Span::new($pos, $pos).locate(input);
            println!("{} => {}:{} `{}`", $pos, row, col, line);
            assert_eq!(row, $row);
            assert_eq!(col, $col);
            assert_eq!(line, $line);
        }}
    }

    run!(0 => @(0, 0) "here is");
    run!(3 => @(0, 3) "here is");
    run!(7 => @(0, 7) "here is");
    run!(8 => @(1, 0) "some");
    run!(10 => @(1, 2) "some");
    run!(15 => @(2, 2) "text");
    run!(17 => @(2, 4) "text");
}
