#[macro_use]
mod macros;

test!(
    call_in_expression_position,
    "add(a, b)\n  return a + b\n.c\n  width: add(10px, 5px)\n",
    ".c {\n  width: 15px;\n}\n"
);

test!(
    single_line_function_body,
    "add(a, b) = a + b\n.c\n  width: add(1px, 2px)\n",
    ".c {\n  width: 3px;\n}\n"
);

test!(
    last_statement_is_implicit_return,
    "double(n)\n  n * 2\n.c\n  width: double(4px)\n",
    ".c {\n  width: 8px;\n}\n"
);

test!(
    default_parameter_used_when_missing,
    "pad(x, y = 1px)\n  padding: x y\n.c\n  pad(2px)\n",
    ".c {\n  padding: 2px 1px;\n}\n"
);

test!(
    default_parameter_overridden,
    "pad(x, y = 1px)\n  padding: x y\n.c\n  pad(2px, 3px)\n",
    ".c {\n  padding: 2px 3px;\n}\n"
);

test!(
    default_can_reference_earlier_param,
    "pad(x, y = x)\n  padding: x y\n.c\n  pad(2px)\n",
    ".c {\n  padding: 2px 2px;\n}\n"
);

test!(
    rest_parameter_collects_arguments,
    "m(args...)\n  margin: args\n.c\n  m(1px, 2px)\n",
    ".c {\n  margin: 1px, 2px;\n}\n"
);

test!(
    arguments_local_holds_all_arguments,
    "m(a)\n  margin: arguments\n.c\n  m(1px, 2px)\n",
    ".c {\n  margin: 1px, 2px;\n}\n"
);

test!(
    mixin_splices_declarations,
    "pad(n) = \n  padding: n * 2\nbody\n  pad(5px)\n",
    "body {\n  padding: 10px;\n}\n"
);

test!(
    property_form_mixin_call,
    "pad(n)\n  padding: n\nbody\n  pad: 5px\n",
    "body {\n  padding: 5px;\n}\n"
);

test!(
    mixin_local_reports_block_kind,
    "m()\n  foo: mixin\n.c\n  m()\n",
    ".c {\n  foo: group;\n}\n"
);

test!(
    mixin_local_is_false_in_expression_position,
    "m() = mixin\n.c\n  foo: m()\n",
    ".c {\n  foo: false;\n}\n"
);

test!(
    return_stops_mixin_splice,
    "m()\n  color: red\n  return\n  color: blue\n.c\n  m()\n",
    ".c {\n  color: #ff0000;\n}\n"
);

test!(
    functions_are_pure_across_calls,
    "bump(n)\n  n = n + 1\n  return n\n.c\n  width: bump(1px)\n  height: bump(1px)\n",
    ".c {\n  width: 2px;\n  height: 2px;\n}\n"
);

test!(
    unknown_call_is_emitted_verbatim,
    "a\n  width: clamp(1rem, 2vw, 3rem)\n",
    "a {\n  width: clamp(1rem, 2vw, 3rem);\n}\n"
);

test!(
    calc_contents_are_preserved,
    "a\n  width: calc(100% - 10px)\n",
    "a {\n  width: calc(100% - 10px);\n}\n"
);

test!(
    url_contents_are_preserved,
    "a\n  background: url(http://example.com/a.png)\n",
    "a {\n  background: url(http://example.com/a.png);\n}\n"
);

test!(
    host_function_is_callable,
    "a\n  width: twice(4px)\n",
    "a {\n  width: 8px;\n}\n",
    stylet::Options::default().function(
        "twice",
        Box::new(|args: &[stylet::Value]| match args.first() {
            Some(stylet::Value::Unit(v, suffix)) => {
                Ok(stylet::Value::Unit(v * 2.0, suffix.clone()))
            }
            _ => Err("expected a number".to_string()),
        })
    )
);

#[test]
fn raw_host_function_sees_lists() {
    let options = stylet::Options::default().raw_function(
        "count",
        Box::new(|args: &[stylet::Value]| match args.first() {
            Some(stylet::Value::List(items)) => Ok(stylet::Value::Unit(items.len() as f64, None)),
            Some(..) => Ok(stylet::Value::Unit(1.0, None)),
            None => Err("missing argument".to_string()),
        }),
    );
    let css = stylet::from_string(
        "list = 1 2 3\na\n  z-index: count(list)\n".to_string(),
        &options,
    )
    .expect("compile");
    assert_eq!(css, "a {\n  z-index: 3;\n}\n");
}

#[test]
fn host_function_error_is_wrapped() {
    let options = stylet::Options::default().function(
        "broken",
        Box::new(|_: &[stylet::Value]| Err("boom".to_string())),
    );
    let err = stylet::from_string("a\n  width: broken(1)\n".to_string(), &options)
        .expect_err("host error should fail the compile");
    assert_eq!(err.kind(), stylet::ErrorKind::HostFunction);
    assert!(err.to_string().contains("boom"));
}

error!(
    missing_argument_fails,
    "pad(x)\n  padding: x\nbody\n  pad()\n",
    "argument \"x\" required"
);

error!(
    recursion_guard_trips,
    "f()\n  return f()\na\n  width: f()\n",
    "maximum call depth"
);
