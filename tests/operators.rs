#[macro_use]
mod macros;

test!(
    unit_addition_keeps_suffix,
    "a\n  width: 10px + 5px\n",
    "a {\n  width: 15px;\n}\n"
);

test!(
    suffix_from_either_side,
    "a\n  width: 10 + 5px\n  height: 10px + 5\n",
    "a {\n  width: 15px;\n  height: 15px;\n}\n"
);

test!(
    multiplication_and_power,
    "a\n  width: 3px * 4\n  z-index: 2 ** 8\n",
    "a {\n  width: 12px;\n  z-index: 256;\n}\n"
);

test!(
    modulo,
    "a\n  z-index: 7 % 3\n",
    "a {\n  z-index: 1;\n}\n"
);

test!(
    unary_minus_on_variable,
    "$x = 5px\na\n  margin-top: -$x\n",
    "a {\n  margin-top: -5px;\n}\n"
);

test!(
    signed_number_in_value_list,
    "a\n  margin: 0 -2px\n",
    "a {\n  margin: 0 -2px;\n}\n"
);

test!(
    division_in_property_is_literal,
    "a\n  font: 16px/1.2\n",
    "a {\n  font: 16px/1.2;\n}\n"
);

test!(
    division_in_parens_is_arithmetic,
    "a\n  width: (16px/2)\n",
    "a {\n  width: 8px;\n}\n"
);

test!(
    division_in_call_arguments_is_arithmetic,
    "half(n)\n  return n\na\n  width: half(16px/2)\n",
    "a {\n  width: 8px;\n}\n"
);

test!(
    equality_across_types_is_false,
    "a\n  foo: 1 == 'one'\n  bar: 1 != 'one'\n",
    "a {\n  foo: false;\n  bar: true;\n}\n"
);

test!(
    string_concatenation,
    "a\n  content: 'foo' + 'bar'\n",
    "a {\n  content: 'foobar';\n}\n"
);

test!(
    relational_operators,
    "a\n  foo: 1 < 2\n  bar: 2 <= 1\n  baz: 3px >= 3\n",
    "a {\n  foo: true;\n  bar: false;\n  baz: true;\n}\n"
);

test!(
    membership,
    "list = 1 2 3\na\n  foo: 2 in list\n  bar: 5 in list\n",
    "a {\n  foo: true;\n  bar: false;\n}\n"
);

test!(
    type_check_operator,
    "a\n  foo: 5px is a 'unit'\n  bar: 'x' is a 'unit'\n",
    "a {\n  foo: true;\n  bar: false;\n}\n"
);

test!(
    subscript_indexes_lists,
    "list = 10px 20px 30px\na\n  width: list[1]\n",
    "a {\n  width: 20px;\n}\n"
);

test!(
    subscript_out_of_bounds_is_null,
    "list = 1 2\na\n  foo: list[9]\n",
    "a {\n  foo: null;\n}\n"
);

error!(
    coercion_failure_outside_equality,
    "a\n  width: 1px + true\n",
    "cannot coerce"
);

error!(null_arithmetic_fails, "a\n  width: null + 1\n", "cannot coerce");
