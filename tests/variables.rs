#[macro_use]
mod macros;

test!(
    variable_in_property,
    "$x = 10\n.c\n  width: $x + 2px\n",
    ".c {\n  width: 12px;\n}\n"
);

test!(
    plain_names_are_variables_too,
    "size = 14px\nbody\n  font-size: size\n",
    "body {\n  font-size: 14px;\n}\n"
);

test!(
    inner_scope_shadows_outer,
    "$x = 1\na\n  $x = 2\n  margin: $x\nb\n  margin: $x\n",
    "a {\n  margin: 2;\n}\nb {\n  margin: 1;\n}\n"
);

test!(
    conditional_assignment_when_undefined,
    "$x ?= 5px\na\n  width: $x\n",
    "a {\n  width: 5px;\n}\n"
);

test!(
    conditional_assignment_keeps_existing,
    "$x = 1px\n$x ?= 5px\na\n  width: $x\n",
    "a {\n  width: 1px;\n}\n"
);

test!(
    compound_assignment,
    "$x = 5px\n$x += 2\na\n  width: $x\n",
    "a {\n  width: 7px;\n}\n"
);

test!(
    assignment_with_postfix_conditional,
    "$x = 1\n$x = 2 if false\na\n  z-index: $x\n",
    "a {\n  z-index: 1;\n}\n"
);

test!(
    is_defined_on_bound_name,
    "$x = 1\na\n  foo: $x is defined\n",
    "a {\n  foo: true;\n}\n"
);

test!(
    is_defined_on_unbound_name,
    "a\n  foo: $nope is defined\n",
    "a {\n  foo: false;\n}\n"
);

test!(
    undefined_in_value_position_passes_through,
    "a\n  content: $missing\n",
    "a {\n  content: $missing;\n}\n"
);
