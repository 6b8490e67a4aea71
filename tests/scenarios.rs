mod common;

use common::{run, run_ok};
use loxrs::RunOutcome;

/// The six end-to-end scenarios spec.md §8 lists verbatim: literal input to
/// expected stdout.
#[test]
fn arithmetic_precedence() {
    assert_eq!(run_ok("print 1 + 2 * 3;"), "7\n");
}

#[test]
fn string_concatenation() {
    assert_eq!(run_ok(r#"var a = "hi"; var b = "!"; print a + b;"#), "hi!\n");
}

#[test]
fn for_loop_prints_range() {
    assert_eq!(run_ok("for (var i = 0; i < 3; i = i + 1) print i;"), "0\n1\n2\n");
}

#[test]
fn recursive_fibonacci() {
    let source = "fun fib(n){ if (n<2) return n; return fib(n-1)+fib(n-2);} print fib(8);";
    assert_eq!(run_ok(source), "21\n");
}

#[test]
fn method_call_on_class_instance() {
    let source = r#"class Greeter{ greet(name){ print "hi " + name; } } Greeter().greet("lox");"#;
    assert_eq!(run_ok(source), "hi lox\n");
}

#[test]
fn initializer_sets_field_and_returns_instance() {
    let source = "class C{ init(x){ this.x = x; } } print C(7).x;";
    assert_eq!(run_ok(source), "7\n");
}

/// The negative scenarios spec.md §8 lists: literal input to expected error
/// kind.
#[test]
fn adding_number_and_string_is_a_runtime_error() {
    match run(r#"1 + "a";"#) {
        RunOutcome::RuntimeError(error) => {
            assert!(error.message.contains("Operands must be two numbers or two strings."));
        }
        other => panic!("expected a RuntimeError, got {}", common::describe(&other)),
    }
}

#[test]
fn undefined_variable_reference_is_a_runtime_error() {
    assert!(matches!(run("print x;"), RunOutcome::RuntimeError(_)));
}

#[test]
fn self_referential_initializer_is_a_resolve_error() {
    assert!(matches!(run("{ var a = a; }"), RunOutcome::ResolveErrors(_)));
}

#[test]
fn top_level_return_is_a_resolve_error() {
    assert!(matches!(run("return 1;"), RunOutcome::ResolveErrors(_)));
}

#[test]
fn break_outside_loop_is_a_parse_error() {
    match run("break;") {
        RunOutcome::LexOrParseErrors { parse, .. } => assert_eq!(parse.len(), 1),
        other => panic!("expected a ParseError, got {}", common::describe(&other)),
    }
}
