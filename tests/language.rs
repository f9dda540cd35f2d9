use std::fs;

use pretty_assertions::assert_eq;
use rinse::{
    error::{Error, ErrorKind, ParseError, RuntimeError},
    get_output,
    interpreter::{
        evaluator::core::{Config, Context},
        lexer::Position,
        value::core::Value,
    },
    parse_program,
};
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, (code, expected)) in extract_examples(&content).into_iter().enumerate() {
            count += 1;
            let output = get_output(&code).unwrap_or_else(|e| {
                                              panic!("Example {} in {:?} failed:\n{}\nError: {}",
                                                     i + 1,
                                                     path,
                                                     code,
                                                     e)
                                          });
            assert_eq!(output, expected, "Example {} in {:?}", i + 1, path);
        }
    }

    assert!(count > 0, "No examples found in book/src");
}

/// Collects every ```rinse block together with the lines of the ```output
/// block that follows it.
fn extract_examples(content: &str) -> Vec<(String, Vec<String>)> {
    let mut examples = Vec::new();
    let mut current: Option<&str> = None;
    let mut code = String::new();
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        match current {
            None if trimmed.starts_with("```rinse") => {
                current = Some("rinse");
                buf.clear();
            },
            None if trimmed.starts_with("```output") => {
                current = Some("output");
                buf.clear();
            },
            Some(kind) if trimmed.starts_with("```") => {
                if kind == "rinse" {
                    code = buf.clone();
                } else {
                    examples.push((code.clone(), buf.lines().map(str::to_string).collect()));
                }
                current = None;
            },
            Some(_) => {
                buf.push_str(line);
                buf.push('\n');
            },
            None => {},
        }
    }

    examples
}

fn program(body: &str) -> String {
    format!("init test {{\n{body}\n}}")
}

fn assert_output(body: &str, expected: &[&str]) {
    let src = program(body);
    let output = get_output(&src).unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"));
    assert_eq!(output, expected);
}

fn run_error(body: &str) -> Error {
    match get_output(&program(body)) {
        Ok(output) => panic!("Script succeeded but was expected to fail, printed {output:?}"),
        Err(e) => e,
    }
}

fn assert_failure(body: &str, kind: ErrorKind) {
    assert_eq!(run_error(body).kind(), kind);
}

/// Runs a program to its first error and returns the error with everything
/// printed before it.
fn run_partial(body: &str) -> (RuntimeError, Vec<String>) {
    let program = parse_program(&program(body)).expect("program should parse");
    let mut context = Context::new();
    let err = context.run(&program)
                     .expect_err("program should fail at runtime");
    (err, context.output().to_vec())
}

#[test]
fn arithmetic_precedence() {
    assert_output("print(2 + 3 * 4)", &["14"]);
    assert_output("print((2 + 3) * 4)", &["20"]);
    assert_output("print(10 - 4 - 3)", &["3"]);
    assert_output("print(1 < 2 == true)", &["true"]);
    assert_output("print(-2 * -3)", &["6"]);
}

#[test]
fn integer_arithmetic_wraps_and_truncates() {
    assert_output("let max = 9223372036854775807 print(max + 1)",
                  &["-9223372036854775808"]);
    assert_output("let min = -9223372036854775807 - 1 print(-min) print(min / -1)",
                  &["-9223372036854775808", "-9223372036854775808"]);
    assert_output("print(-7 / 2) print(7 % -2)", &["-3", "1"]);
}

#[test]
fn division_by_zero_is_error() {
    assert_failure("print(1 / 0)", ErrorKind::Arithmetic);
    assert_failure("let z = 0 print(5 % z)", ErrorKind::Arithmetic);
}

#[test]
fn integer_literal_out_of_range_is_lexical_error() {
    let err = run_parse_error("init main { let x = 9223372036854775808 }");
    assert_eq!(err.kind(), ErrorKind::Lexical);
    assert_eq!(err,
               ParseError::IntegerTooLarge { literal:  "9223372036854775808".to_string(),
                                             position: Position { line: 1, column: 21 }, });
}

#[test]
fn strings_and_lists_concatenate() {
    assert_output(r#"print("ab" + "cd")"#, &["abcd"]);
    assert_output("let a = [1] let b = a + [2] b.push(3) print(a) print(b)",
                  &["[1]", "[1, 2, 3]"]);
    assert_failure(r#"print(1 + "a")"#, ErrorKind::Type);
}

#[test]
fn comparisons_and_logic() {
    assert_output(r#"print("apple" < "banana") print(3 >= 3) print(1 != 2)"#,
                  &["true", "true", "true"]);
    assert_output("print((1, [2]) == (1, [2]))", &["true"]);
    assert_output("print(false and 1 / 0 == 0) print(true or 1 / 0 == 0)",
                  &["false", "true"]);
    assert_failure(r#"print(1 < "a")"#, ErrorKind::Type);
    assert_failure("print(1 and true)", ErrorKind::Type);
    assert_failure("print(not 1)", ErrorKind::Type);
}

#[test]
fn display_forms() {
    assert_output(r#"print((1,)) print(()) print(["a", ("b", 2)])"#,
                  &["(1,)", "()", r#"["a", ("b", 2)]"#]);
    assert_output(r#"print("plain")"#, &["plain"]);
}

#[test]
fn tuple_destructuring() {
    assert_output("let (a, b) = (1, 2) print(a) print(b)", &["1", "2"]);

    let err = run_error("let (a, b) = (1, 2, 3)");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::DestructureMismatch { expected: 2,
                                                                        found: 3,
                                                                        .. })));
    assert_failure("let (a, b) = [1, 2]", ErrorKind::Type);
}

#[test]
fn variant_and_struct_destructuring() {
    assert_output("enum E { Pair(a, b) } let E::Pair(x, y) = E::Pair(3, 4) print(x * y)",
                  &["12"]);
    assert_failure("enum E { Pair(a, b), One(a) } let E::Pair(x, y) = E::One(1)",
                   ErrorKind::Type);
    assert_failure("struct P { x } let P { y } = P { x: 1 }", ErrorKind::Type);
}

#[test]
fn for_range_is_inclusive_and_scoped() {
    assert_output("for i in 1..3 { print(i) }", &["1", "2", "3"]);
    assert_output("for i in 3..1 { print(i) } print(\"done\")", &["done"]);

    let (err, output) = run_partial("for i in 1..3 { print(i) }\nprint(i)");
    assert!(matches!(err, RuntimeError::UnknownVariable { ref name, .. } if name == "i"));
    assert_eq!(output, vec!["1", "2", "3"]);
}

#[test]
fn collection_loops_iterate_a_snapshot() {
    assert_output("let xs = [1, 2] for x in xs { xs.push(x) } print(xs)",
                  &["[1, 2, 1, 2]"]);
    assert_failure("for x in 5 { print(x) }", ErrorKind::Type);
}

#[test]
fn break_and_continue() {
    assert_output("let i = 0
                   while i < 10 {
                       i = i + 1
                       if i % 2 == 0 { continue }
                       if i > 5 { break }
                       print(i)
                   }",
                  &["1", "3", "5"]);
    assert_output("for i in 1..3 { for j in 1..3 { if j == 2 { break } print(i * 10 + j) } }",
                  &["11", "21", "31"]);
}

#[test]
fn stray_control_flow_is_error() {
    assert_failure("break", ErrorKind::Type);
    let err = run_error("fn f() { continue } for i in 1..2 { f() }");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::StrayControlFlow { keyword: "continue",
                                                                     .. })));
}

#[test]
fn conditions_must_be_booleans() {
    assert_failure("if 1 { print(1) }", ErrorKind::Type);
    assert_failure("while 0 { print(1) }", ErrorKind::Type);
}

#[test]
fn block_scopes_shadow_and_assign() {
    assert_output("let x = 1 { let x = 2 print(x) } print(x)", &["2", "1"]);
    assert_output("let y = 1 if true { y = 5 } print(y)", &["5"]);
    assert_failure("z = 1", ErrorKind::Name);
}

#[test]
fn type_annotations() {
    assert_output("let x: int = 3 let y: T = true let s: list<int> = [1] print(x)",
                  &["3"]);
    assert_failure(r#"let x: int = "three""#, ErrorKind::Type);
    assert_failure("struct P { x } let p: P = 1", ErrorKind::Type);
}

#[test]
fn proof_failure_stops_before_body() {
    let (err, output) = run_partial("proof (1 == 2) { print(1) }");
    assert_eq!(err, RuntimeError::AssertionFailed { line: 2 });
    assert!(output.is_empty());

    assert_output("proof 1 < 2 { print(\"ok\") }", &["ok"]);
}

#[test]
fn recursive_factorial() {
    assert_output("fn fact(n) { if n <= 1 { return 1 } return n * fact(n - 1) }
                   print(fact(5))
                   print(fact(20))",
                  &["120", "2432902008176640000"]);
}

#[test]
fn runaway_recursion_is_resource_exhausted() {
    let err = run_error("fn forever(n) { return forever(n + 1) } forever(0)");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::ResourceExhausted { limit: 200, .. })));
}

#[test]
fn recursion_just_below_the_limit_completes() {
    assert_output("fn down(n) { if n == 0 { return 0 } return down(n - 1) + 1 }
                   print(down(150))
                   print(down(199))",
                  &["150", "199"]);
}

#[test]
fn deep_recursion_with_a_raised_limit() {
    let src = program("fn down(n) { if n == 0 { return 0 } return down(n - 1) + 1 }
                       print(down(5000))");
    let program = parse_program(&src).expect("program should parse");
    let mut context = Context::with_config(Config { echo:           false,
                                                    max_call_depth: 10_000, });

    context.run(&program).expect("recursion within the limit should succeed");
    assert_eq!(context.output(), ["5000"]);
}

#[test]
fn deeply_nested_expressions() {
    let negations = "- ".repeat(3000);
    assert_output(&format!("print({negations}1)"), &["1"]);

    let grouped = format!("{}7{}", "(".repeat(3000), ")".repeat(3000));
    assert_output(&format!("print({grouped})"), &["7"]);
}

#[test]
fn call_depth_limit_is_configurable() {
    let src = program("fn down(n) { if n == 0 { return 0 } return down(n - 1) }
                       print(down(9))
                       print(down(10))");
    let program = parse_program(&src).expect("program should parse");
    let mut context = Context::with_config(Config { echo:           false,
                                                    max_call_depth: 10, });

    let err = context.run(&program).expect_err("eleven nested calls exceed the limit");
    assert_eq!(err.kind(), ErrorKind::Resource);
    assert_eq!(context.output(), ["0"]);
}

#[test]
fn calls_do_not_see_caller_locals() {
    assert_failure("fn peek() { return hidden }
                    fn caller() { let hidden = 1 return peek() }
                    print(caller())",
                   ErrorKind::Name);
    assert_output("let g = 7 fn read() { return g } print(read())", &["7"]);
}

#[test]
fn function_errors() {
    assert_failure("fn f(a) { return a } f(1, 2)", ErrorKind::Type);
    assert_failure("missing(1)", ErrorKind::Name);
    assert_failure("fn f() { return 1 } fn f() { return 2 }", ErrorKind::Name);
    assert_failure("fn f() { } print(f())", ErrorKind::Type);
}

#[test]
fn functions_are_values() {
    assert_output("fn inc(x) { return x + 1 }
                   fn twice(f, x) { return f(f(x)) }
                   let g = inc
                   print(twice(g, 1))
                   print(g == inc)
                   print(inc)",
                  &["3", "true", "<fn inc>"]);
    assert_failure("let n = 1 n(2)", ErrorKind::Type);
}

#[test]
fn declarations_reached_again_are_not_redefinitions() {
    assert_output("for i in 1..3 { fn helper() { return 1 } struct S { x } }
                   print(helper())",
                  &["1"]);
}

#[test]
fn top_level_return_ends_the_run() {
    let program = parse_program("init main { print(1) return 5 print(2) }").expect("program should parse");
    let mut context = Context::new();
    assert_eq!(context.run(&program).expect("program should run"),
               Some(Value::Integer(5)));
    assert_eq!(context.output(), ["1"]);
}

#[test]
fn field_mutation_through_self_is_visible() {
    assert_output("struct Counter { n: int = 0 }
                   fn Counter.bump(self) { self.n = self.n + 1 }
                   let c = Counter { n: 0 }
                   c.bump()
                   c.bump()
                   print(c.n)",
                  &["2"]);
}

#[test]
fn lists_are_shared_between_aliases() {
    assert_output("fn fill(xs) { xs.push(1) xs[0] = 9 }
                   let xs = [0]
                   fill(xs)
                   print(xs)
                   print(xs.contains(1))
                   print(xs.pop())
                   print(xs.len())",
                  &["[9, 1]", "true", "1", "1"]);
}

#[test]
fn nested_assignment_paths() {
    assert_output("struct Inner { v } struct Outer { inner, items }
                   let o = Outer { inner: Inner { v: 1 }, items: [[0, 0]] }
                   o.inner.v = 5
                   o.items[0][1] = 7
                   print(o)",
                  &["Outer { inner: Inner { v: 5 }, items: [[0, 7]] }"]);
    assert_failure("let t = (1, 2) t.0 = 5", ErrorKind::Type);
    assert_failure("let xs = [1] xs[1] = 2", ErrorKind::Type);
}

#[test]
fn index_out_of_bounds() {
    let err = run_error("let xs = [1, 2] print(xs[2])");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::IndexOutOfBounds { index: 2, len: 2, .. })));
    assert_failure("print([1][-1])", ErrorKind::Type);
}

#[test]
fn builtin_method_errors() {
    assert_failure("let xs = [] xs.pop()", ErrorKind::Type);
    assert_failure("let xs = [] xs.shuffle()", ErrorKind::Name);
    assert_failure("print(\"abc\".len(1))", ErrorKind::Name);
}

#[test]
fn struct_literals() {
    assert_output("struct P { x, y = 10 } print(P { x: 1 }) print(P { y: 2, x: 1 })",
                  &["P { x: 1, y: 10 }", "P { x: 1, y: 2 }"]);
    assert_failure("struct P { x, y } print(P { y: 1 })", ErrorKind::Type);
    assert_failure("struct P { x } print(P { x: 1, z: 2 })", ErrorKind::Type);
    assert_failure("print(Q { x: 1 })", ErrorKind::Name);
}

#[test]
fn struct_defaults_are_evaluated_per_instance() {
    assert_output("struct Bag { name, items = [] }
                   let a = Bag { name: \"a\" }
                   let b = Bag { name: \"b\" }
                   a.items.push(1)
                   print(b.items)",
                  &["[]"]);
}

#[test]
fn methods_dispatch_on_arity() {
    assert_output("struct V { x }
                   fn V.get(self) { return self.x }
                   fn V.get(self, k) { return self.x * k }
                   let v = V { x: 3 }
                   print(v.get())
                   print(v.get(2))",
                  &["3", "6"]);
    assert_failure("struct V { x }
                    fn V.get(self) { return 1 }
                    fn V.get(self) { return 2 }",
                   ErrorKind::TraitConformance);
}

#[test]
fn associated_functions_and_variants() {
    assert_output("enum Op { Add(a, b), Neg(a), Zero }
                   impl Op { fn of(n) { return Op::Neg(n) } }
                   print(Op::of(3))
                   print(Op::Zero)",
                  &["Op::Neg(3)", "Op::Zero"]);
    assert_failure("enum Op { Neg(a) } print(Op::Neg(1, 2))", ErrorKind::Type);
    assert_failure("enum Op { Neg(a) } print(Op::Pos(1))", ErrorKind::Name);
    assert_failure("print(Nope::Thing)", ErrorKind::Name);
}

#[test]
fn switch_first_match_wins() {
    assert_output("for n in [3, 7, 12] {
                       switch n {
                           case 1..5 { print(\"low\") }
                           case 5..10 { print(\"mid\") }
                           case 7 { print(\"seven\") }
                           default { print(\"high\") }
                       }
                   }",
                  &["low", "mid", "high"]);
    assert_output("switch 99 { case 1 { print(1) } } print(\"after\")", &["after"]);
}

#[test]
fn switch_matches_structs_and_variants() {
    assert_output("struct P { x, y }
                   enum Shape { Circle(r), Square(s) }
                   switch P { x: 1, y: 2 } {
                       case P(1, y) { print(y) }
                   }
                   switch Shape::Square(4) {
                       case Shape::Circle(r) { print(r) }
                       case Shape::Square(_) { print(\"square\") }
                   }",
                  &["2", "square"]);
    assert_failure("enum Shape { Circle(r) } switch Shape::Circle(1) { case Shape::Circle(a, b) { } }",
                   ErrorKind::Type);
}

#[test]
fn failed_patterns_leave_no_bindings() {
    assert_output("let x = 1
                   switch (5, 6) {
                       case (x, 7) { print(\"no\") }
                       default { print(x) }
                   }",
                  &["1"]);
    assert_failure("switch (1, 2) { case (a, 3) { } default { } } print(a)",
                   ErrorKind::Name);
    assert_failure("switch 4 { case n { } } print(n)", ErrorKind::Name);
}

#[test]
fn trait_requirements_are_checked_at_declaration() {
    let (err, output) = run_partial("trait T { fn a(self) fn b(self) }
                                     struct S { }
                                     print(\"before\")
                                     impl T for S { fn a(self) { return 1 } }
                                     print(\"after\")");
    assert!(matches!(err,
                     RuntimeError::TraitConformance { ref missing, .. } if missing == &["b"]));
    assert_eq!(output, vec!["before"]);
}

#[test]
fn trait_inheritance() {
    let err = run_error("trait A { fn a(self) }
                         trait B extends A { fn b(self) }
                         struct S { }
                         impl B for S { fn b(self) { return 1 } }");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::TraitConformance { ref missing, .. }) if missing == &["a"]));

    assert_output("trait A { fn a(self) }
                   trait B extends A { fn a(self) { return \"default\" } fn b(self) { return self.a() + \"!\" } }
                   struct S { tag }
                   impl B for S { }
                   print(S { tag: 0 }.b())",
                  &["default!"]);
    assert_failure("trait B extends Missing { }", ErrorKind::Name);
    assert_failure("struct S { } impl Missing for S { }", ErrorKind::Name);
}

#[test]
fn supplied_methods_override_defaults() {
    assert_output("trait Show { fn show(self) { return \"?\" } }
                   struct A { tag } struct B { tag }
                   impl Show for A { }
                   impl Show for B { fn show(self) { return \"B\" } }
                   print(A { tag: 1 }.show())
                   print(B { tag: 2 }.show())",
                  &["?", "B"]);
}

#[test]
fn duplicate_impls_are_rejected() {
    assert_failure("trait T { } struct S { }
                    impl T for S { }
                    impl T for S { }",
                   ErrorKind::Name);
    assert_output("trait C<X> { } struct S { }
                   impl C<int> for S { }
                   impl C<str> for S { }
                   print(\"ok\")",
                  &["ok"]);
}

#[test]
fn generic_declarations_are_accepted() {
    assert_output("fn id<T>(x: T) { return x }
                   struct Box<T> { item: T }
                   enum Option<T> { Some(v), None }
                   trait Mapper<T> { fn map(self, f) }
                   impl<T> Mapper<T> for Box { fn map(self, f) { return Box { item: f(self.item) } } }
                   fn inc(x) { return x + 1 }
                   print(Box { item: id(1) }.map(inc))
                   print(Option::Some(id(\"s\")))",
                  &["Box { item: 2 }", "Option::Some(\"s\")"]);
}

const OPTION_MONAD: &str = "
    enum Option { Some(v), None }
    impl Option {
        fn bind(self, k) {
            switch self {
                case Option::Some(v) { return k(v) }
                default { return self }
            }
        }
    }
";

#[test]
fn option_monad_short_circuits() {
    let body = format!("{OPTION_MONAD}
                        let offset = 10
                        print(do {{ a <- Option::Some(1) b <- Option::Some(a + 1) yield Option::Some(a + b + offset) }})
                        print(do {{ a <- Option::Some(1) b <- Option::None yield Option::Some(a / 0) }})");
    assert_output(&body, &["Option::Some(13)", "Option::None"]);
}

#[test]
fn monadic_blocks_capture_locals() {
    let body = format!("{OPTION_MONAD}
                        fn add(x) {{
                            let base = x * 100
                            return do {{ a <- Option::Some(1) yield Option::Some(base + a) }}
                        }}
                        print(add(2))");
    assert_output(&body, &["Option::Some(201)"]);
}

#[test]
fn monadic_block_edge_cases() {
    assert_output("print(do { yield 5 })", &["5"]);
    assert_failure("print(do { a <- 1 yield a })", ErrorKind::Name);

    let body = format!("{OPTION_MONAD}
                        let r = do {{ a <- Option::Some(1) }}");
    assert_failure(&body, ErrorKind::Type);
}

#[test]
fn syntax_errors() {
    assert_eq!(run_parse_error("init main { let = 1 }"),
               ParseError::UnexpectedToken { expected: "identifier".to_string(),
                                             found:    "=".to_string(),
                                             position: Position { line: 1, column: 17 }, });
    assert!(matches!(run_parse_error("init main { print(1"),
                     ParseError::UnexpectedEndOfInput { .. }));
    assert!(matches!(run_parse_error("init main { fn f(a, a) { } }"),
                     ParseError::Invalid { .. }));
    assert!(matches!(run_parse_error("init main { f() = 1 }"),
                     ParseError::Invalid { .. }));
    assert_eq!(run_parse_error("init main { let x = 1 # }"),
               ParseError::UnrecognizedCharacter { character: '#',
                                                   position:  Position { line: 1, column: 23 }, });
    assert_eq!(run_parse_error("init main {\n  print(1)\n  let 2 = x\n}"),
               ParseError::UnexpectedToken { expected: "identifier".to_string(),
                                             found:    "integer 2".to_string(),
                                             position: Position { line: 3, column: 7 }, });
}

#[test]
fn cyclic_values_print_and_compare() {
    assert_output("struct Node { next }
                   let n = Node { next: 0 }
                   n.next = n
                   print(n)
                   print(n == n)",
                  &["Node { next: Node { ... } }", "true"]);

    assert_output("let l = [1]
                   l.push(l)
                   print(l)
                   print([l, l])",
                  &["[1, [...]]", "[[1, [...]], [1, [...]]]"]);

    assert_output("let a = [1]
                   a.push(a)
                   let b = [1]
                   b.push(b)
                   let c = [2]
                   c.push(c)
                   print(a == b)
                   print(a == c)",
                  &["true", "false"]);
}

#[test]
fn computed_callees() {
    assert_output("fn double(x) { return x * 2 }
                   fn add_one(x) { return x + 1 }
                   let fs = [double, add_one]
                   print(fs[0](5))
                   print(fs[1](5))",
                  &["10", "6"]);

    assert_output("fn add_one(x) { return x + 1 }
                   fn pick() { return add_one }
                   print(pick()(2))
                   print(pick()(pick()(2)))",
                  &["3", "4"]);

    assert_failure("let xs = [1] xs[0](2)", ErrorKind::Type);
}

#[test]
fn syntax_error_prevents_all_output() {
    let err = get_output("init main { print(1) print( }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

fn run_parse_error(src: &str) -> ParseError {
    parse_program(src).expect_err("program should not parse")
}

#[test]
fn runtime_errors_carry_lines() {
    let (err, _) = run_partial("let a = 1\nlet b = 0\nprint(a / b)");
    assert_eq!(err.line(), 4);
}
