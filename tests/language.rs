use pretty_assertions::assert_eq;
use basic_lang::compiler::error::ErrorKind;
use basic_lang::compiler::number::Number;
use basic_lang::{run, Session};

fn value(source: &str) -> Number {
    run("<test>", source).unwrap().unwrap_or_else(|| panic!("'{}' produced no value", source))
}

#[test]
fn test_arithmetic() {
    assert_eq!(Number::int(14), value("2 + 3 * 4"));
    assert_eq!(Number::int(512), value("2 ^ 3 ^ 2"));
    assert_eq!("3.5", value("7 / 2").to_string());
}

#[test]
fn test_each_run_starts_fresh() {
    run("<test>", "var a = 1").unwrap();
    assert_eq!(ErrorKind::UndefinedIdentifier, run("<test>", "a").unwrap_err().kind());
}

#[test]
fn test_session_keeps_variables() {
    let session = Session::new();

    session.run("<stdin>", "var total = 0").unwrap();
    session.run("<stdin>", "for i = 1 to 5 then var total = total + i").unwrap();

    assert_eq!(Some(Number::int(10)), session.run("<stdin>", "total").unwrap());
    assert_eq!(Some(Number::int(10)), session.context().get("total"));
}

#[test]
fn test_syntax_error_report() {
    let error = run("script.basic", "1 +\n2 *").unwrap_err();

    assert_eq!(ErrorKind::InvalidSyntax, error.kind());
    assert_eq!(None, error.traceback());
    assert_eq!(
        "File script.basic, line 2\n\n2 *\n   ^\n\nInvalid Syntax : Expected int, float, identifier, '+', '-', '(', 'if', 'for', 'while' or 'def'",
        error.to_string(),
    );
}

#[test]
fn test_runtime_error_report() {
    let error = run("script.basic", "var x = 10 / 0").unwrap_err();

    assert_eq!(
        "Traceback (most recent call last):\n  File script.basic, line 1, in <program>\n\nvar x = 10 / 0\n             ^\n\nRuntime Error : Division by zero",
        error.to_string(),
    );
}

#[test]
fn test_builtin_traceback() {
    let error = run("script.basic", "1 + sqrt(0 - 4)").unwrap_err();
    let rendered = error.to_string();

    assert!(rendered.contains("  File script.basic, line 1, in <program>\n  File script.basic, line 1, in sqrt\n"));
    assert!(rendered.ends_with("Runtime Error : Cannot take the square root of a negative number"));
}

#[test]
fn test_deterministic() {
    let source = "var n = 0\n";
    let program = "if max(1, 2) > 1 then for i = 0 to 4 step 2 then var n = n + i else 0";

    assert_eq!(run("<test>", source), run("<test>", source));
    assert_eq!(run("<test>", program), run("<test>", program));
    assert_eq!(run("<test>", "1 / 0"), run("<test>", "1 / 0"));
}
