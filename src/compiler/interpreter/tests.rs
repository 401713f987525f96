use pretty_assertions::assert_eq;
use crate::compiler::lexer::{Lexer, SourceFile};
use crate::compiler::number::NumberValue;
use crate::compiler::parser::Parser;
use super::*;

fn evaluate_with(interpreter: &Interpreter, context: &Rc<Context>, source: &str) -> Evaluation {
    let tokens = Lexer::new(SourceFile::new("<test>", source)).make_tokens()?;
    let node = Parser::new(tokens).parse()?;

    interpreter.visit(&node, context)
}

fn evaluate(source: &str) -> Evaluation {
    evaluate_with(&Interpreter::new(), &Context::new_program(), source)
}

fn value(source: &str) -> Number {
    evaluate(source).unwrap().unwrap_or_else(|| panic!("'{}' produced no value", source))
}

fn error(source: &str) -> Error {
    evaluate(source).unwrap_err()
}

/// Evaluates every line of `sources` in one context and returns the last result.
fn evaluate_all(sources: &[&str]) -> Evaluation {
    let interpreter = Interpreter::new();
    let context = Context::new_program();
    let mut result = Ok(None);

    for source in sources {
        result = evaluate_with(&interpreter, &context, source);
    }

    result
}

fn indices(span: &Span) -> (usize, usize) {
    (span.start.index, span.end.index)
}

mod arithmetic {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_precedence() {
        assert_eq!(Number::int(14), value("2 + 3 * 4"));
        assert_eq!(Number::int(20), value("(2 + 3) * 4"));
        assert_eq!(Number::int(5), value("10 - 2 - 3"));
    }

    #[test]
    fn test_power() {
        assert_eq!(Number::int(512), value("2 ^ 3 ^ 2"));
        assert_eq!(Number::int(-4), value("-2 ^ 2"));
        assert_eq!(Number::float(0.5), value("2 ^ -1"));
    }

    #[test]
    fn test_division_is_float() {
        assert_eq!(NumberValue::Float(3.5), value("7 / 2").value());
        assert_eq!(NumberValue::Float(2.0), value("4 / 2").value());
    }

    #[test]
    fn test_unary() {
        assert_eq!(NumberValue::Int(-5), value("-5").value());
        assert_eq!(Number::int(5), value("--5"));
        assert_eq!(Number::int(3), value("+3"));
    }

    #[test]
    fn test_mixed_types() {
        assert_eq!(NumberValue::Float(3.5), value("1 + 2.5").value());
    }

    #[test]
    fn test_division_by_zero_points_at_divisor() {
        let error = error("1 / 0");

        assert_eq!(ErrorKind::Runtime, error.kind());
        assert_eq!("Division by zero", error.details());
        assert_eq!((4, 5), indices(error.span()));
    }

    #[test]
    fn test_overflow() {
        let error = error("9223372036854775807 + 1");

        assert_eq!(ErrorKind::Runtime, error.kind());
        assert_eq!("Integer overflow", error.details());
    }
}

mod logic {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comparisons() {
        assert_eq!(Number::int(1), value("1 < 2 and 2 < 3"));
        assert_eq!(Number::int(1), value("not 1 == 2"));
        assert_eq!(Number::int(1), value("2 >= 2.0"));
        assert_eq!(Number::int(0), value("3 != 3"));
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(Number::int(1), value("2 and 3"));
        assert_eq!(Number::int(0), value("1 exclor 1"));
        assert_eq!(Number::int(1), value("0 or 0.5"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(Number::int(1), value("true"));
        assert_eq!(Number::int(0), value("false or null"));
    }
}

mod variables {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assignment_evaluates_to_value() {
        assert_eq!(Number::int(5), value("var a = 5"));
        assert_eq!(Number::int(3), value("var a = var b = 3"));
    }

    #[test]
    fn test_bindings_persist_in_context() {
        assert_eq!(Some(Number::int(10)), evaluate_all(&["var a = 5", "a * 2"]).unwrap());
    }

    #[test]
    fn test_values_are_copied() {
        assert_eq!(Some(Number::int(1)), evaluate_all(&["var a = 1", "var b = a", "var a = 2", "b"]).unwrap());
    }

    #[test]
    fn test_access_is_spanned_at_use() {
        let context = Context::new_program();
        let interpreter = Interpreter::new();

        evaluate_with(&interpreter, &context, "var a = 1").unwrap();
        let value = evaluate_with(&interpreter, &context, "  a").unwrap().unwrap();

        assert_eq!(Some((2, 3)), value.span().map(indices));
    }

    #[test]
    fn test_undefined_identifier() {
        let error = error("1 + foo");

        assert_eq!(ErrorKind::UndefinedIdentifier, error.kind());
        assert_eq!("'foo' is not defined", error.details());
        assert_eq!((4, 7), indices(error.span()));
    }

    #[test]
    fn test_reserved_names() {
        let error = error("var null = 1");

        assert_eq!(ErrorKind::ReservedName, error.kind());
        assert_eq!("'null' is a reserved name and cannot be assigned", error.details());
        assert_eq!((4, 8), indices(error.span()));

        assert_eq!(ErrorKind::ReservedName, self::error("var abs = 1").kind());
        assert_eq!(ErrorKind::ReservedName, self::error("var true = 0").kind());
    }
}

mod control_flow {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_if_takes_first_true_branch() {
        let interpreter = Interpreter::new();
        let result = evaluate_with(&interpreter, &Context::new_program(), "if 0 then 1 elif 1 then 2 else 3").unwrap();

        assert_eq!(Some(Number::int(2)), result);
        // The if node, both conditions and the chosen branch
        assert_eq!(4, interpreter.visited());
    }

    #[test]
    fn test_if_without_match_has_no_value() {
        assert_eq!(None, evaluate("if 0 then 1").unwrap());
    }

    #[test]
    fn test_if_skips_other_branches() {
        assert_eq!(Number::int(1), value("if 1 then 1 else 1 / 0"));

        let result = evaluate_all(&["if 1 then 1 else var x = 9", "x"]);
        assert_eq!(ErrorKind::UndefinedIdentifier, result.unwrap_err().kind());
    }

    #[test]
    fn test_for_descending() {
        let result = evaluate_all(&["var total = 0", "for i = 5 to 0 step -1 then var total = total + i", "total"]);
        assert_eq!(Some(Number::int(15)), result.unwrap());

        assert_eq!(Some(Number::int(1)), evaluate_all(&["for i = 5 to 0 step -1 then i", "i"]).unwrap());
    }

    #[test]
    fn test_for_ascending_excludes_end() {
        assert_eq!(Some(Number::int(2)), evaluate_all(&["for i = 0 to 3 then var last = i", "last"]).unwrap());
        assert_eq!(None, evaluate("for i = 0 to 3 then i").unwrap());
    }

    #[test]
    fn test_for_without_iterations() {
        let result = evaluate_all(&["for i = 3 to 3 then var hit = 1", "hit"]);
        assert_eq!(ErrorKind::UndefinedIdentifier, result.unwrap_err().kind());
    }

    #[test]
    fn test_for_float_step() {
        let result = evaluate_all(&["var n = 0", "for i = 0 to 1 step 0.25 then var n = n + 1", "n"]);
        assert_eq!(Some(Number::int(4)), result.unwrap());
    }

    #[test]
    fn test_for_zero_step() {
        let error = error("for i = 0 to 3 step 0 then i");

        assert_eq!(ErrorKind::Runtime, error.kind());
        assert_eq!("Loop step must not be zero", error.details());
        assert_eq!((20, 21), indices(error.span()));
    }

    #[test]
    fn test_while() {
        let result = evaluate_all(&["var n = 0", "while n < 5 then var n = n + 1", "n"]);
        assert_eq!(Some(Number::int(5)), result.unwrap());
    }

    #[test]
    fn test_while_false_condition() {
        assert_eq!(None, evaluate("while 0 then 1 / 0").unwrap());
    }

    #[test]
    fn test_no_value_operand() {
        let error = error("1 + (if 0 then 1)");

        assert_eq!(ErrorKind::Type, error.kind());
        assert_eq!("Expected a value, but this expression produced none", error.details());
        assert_eq!(5, error.span().start.index);
    }
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame_names(error: &Error) -> Vec<String> {
        error.traceback().unwrap().frames().iter().map(|frame| frame.name.clone()).collect()
    }

    #[test]
    fn test_builtin_call() {
        assert_eq!(Number::int(4), value("abs(-3) + 1"));
        assert_eq!(Number::int(5), value("max(1, 5, 3)"));
        assert_eq!(Number::float(1.5), value("min(2, 1.5)"));
        assert_eq!(Number::float(3.0), value("sqrt(9)"));
    }

    #[test]
    fn test_call_result_is_spanned_at_call() {
        assert_eq!(Some((0, 7)), value("abs(-3)").span().map(indices));
    }

    #[test]
    fn test_arity_error() {
        let error = error("abs(1, 2)");

        assert_eq!(ErrorKind::Arity, error.kind());
        assert_eq!("'abs' takes 1 argument but 2 were given", error.details());
        assert_eq!(vec!["<program>", "abs"], frame_names(&error));
    }

    #[test]
    fn test_argument_type_error_points_at_argument() {
        let error = error("round(1.5, 0.5)");

        assert_eq!(ErrorKind::Type, error.kind());
        assert_eq!("2nd argument of 'round' must be an integer", error.details());
        assert_eq!((11, 14), indices(error.span()));
    }

    #[test]
    fn test_domain_error() {
        let error = error("sqrt(-4)");

        assert_eq!(ErrorKind::Runtime, error.kind());
        assert_eq!(vec!["<program>", "sqrt"], frame_names(&error));
    }

    #[test]
    fn test_arguments_evaluated_before_call() {
        let error = error("abs(1 / 0)");

        assert_eq!("Division by zero", error.details());
        assert_eq!(vec!["<program>"], frame_names(&error));
    }

    #[test]
    fn test_not_callable() {
        let result = evaluate_all(&["var f = 1", "f(2)"]);
        let error = result.unwrap_err();

        assert_eq!(ErrorKind::Runtime, error.kind());
        assert_eq!("1 is not callable", error.details());
    }

    #[test]
    fn test_undefined_callee() {
        assert_eq!(ErrorKind::UndefinedIdentifier, error("g(1)").kind());
    }

    #[test]
    fn test_function_definition_unsupported() {
        assert_eq!(ErrorKind::Unsupported, error("def f(a) -> a").kind());
    }
}

mod tracebacks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_top_level_error_has_one_frame() {
        let error = error("\n1 / 0");
        let frames = error.traceback().unwrap().frames();

        assert_eq!(1, frames.len());
        assert_eq!("<program>", frames[0].name);
        assert_eq!("<test>", frames[0].file_name);
    }

    #[test]
    fn test_display() {
        let rendered = error("1 / 0").to_string();

        assert!(rendered.starts_with("Traceback (most recent call last):\n"));
        assert!(rendered.ends_with("Runtime Error : Division by zero"));
    }
}
