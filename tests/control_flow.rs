mod common;

use common::run_ok;

#[test]
fn if_else_picks_the_right_branch() {
    assert_eq!(run_ok("if (1 < 2) print \"yes\"; else print \"no\";"), "yes\n");
    assert_eq!(run_ok("if (1 > 2) print \"yes\"; else print \"no\";"), "no\n");
}

#[test]
fn if_without_else_is_a_no_op_when_false() {
    assert_eq!(run_ok("if (false) print \"unreachable\";"), "");
}

#[test]
fn while_loop_break_stops_immediately() {
    let source = r#"
        var i = 0;
        while (true) {
            i = i + 1;
            if (i == 3) break;
        }
        print i;
    "#;
    assert_eq!(run_ok(source), "3\n");
}

#[test]
fn while_loop_continue_skips_the_rest_of_the_body() {
    let source = r#"
        var i = 0;
        var sum = 0;
        while (i < 5) {
            i = i + 1;
            if (i == 3) continue;
            sum = sum + i;
        }
        print sum;
    "#;
    // 1 + 2 + 4 + 5, skipping 3.
    assert_eq!(run_ok(source), "12\n");
}

#[test]
fn for_loop_increment_still_runs_after_continue() {
    let source = r#"
        for (var i = 0; i < 4; i = i + 1) {
            if (i == 1) continue;
            print i;
        }
    "#;
    // If the increment were skipped on `continue`, this would loop forever
    // or misreport i; spec §4.2 requires it run every iteration regardless.
    assert_eq!(run_ok(source), "0\n2\n3\n");
}

#[test]
fn for_loop_with_omitted_clauses_uses_true_condition() {
    let source = r#"
        var i = 0;
        for (;;) {
            i = i + 1;
            if (i >= 3) break;
        }
        print i;
    "#;
    assert_eq!(run_ok(source), "3\n");
}

#[test]
fn logical_or_short_circuits_and_returns_operand_value() {
    assert_eq!(run_ok("print nil or \"default\";"), "default\n");
    assert_eq!(run_ok("print \"first\" or \"second\";"), "first\n");
}

#[test]
fn logical_and_short_circuits_and_returns_operand_value() {
    assert_eq!(run_ok("print false and \"unreached\";"), "false\n");
    assert_eq!(run_ok("print 1 and 2;"), "2\n");
}

#[test]
fn ternary_evaluates_only_the_taken_branch_result() {
    assert_eq!(run_ok("print 10 > 5 ? \"big\" : \"small\";"), "big\n");
}

#[test]
fn chained_ternary_is_left_associative() {
    // `true ? 1 : 0 ? 2 : 3` reads as `(true ? 1 : 0) ? 2 : 3`, not
    // `true ? 1 : (0 ? 2 : 3)` — the inner `true ? 1 : 0` evaluates to `1`
    // (truthy), so the outer conditional picks `2`. A right-associative
    // parse would short-circuit on the outer `true` and print `1` instead.
    assert_eq!(run_ok("print true ? 1 : 0 ? 2 : 3;"), "2\n");
}

#[test]
fn block_scoping_shadows_without_mutating_outer() {
    let source = r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
    "#;
    assert_eq!(run_ok(source), "inner\nouter\n");
}

#[test]
fn nested_function_declared_inside_block_does_not_leak_out() {
    let outcome = common::run("{ fun f() {} } f();");
    assert!(matches!(outcome, loxrs::RunOutcome::RuntimeError(_)));
}
