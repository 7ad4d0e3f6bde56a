#[macro_use]
mod macros;

test!(
    if_selects_true_branch,
    "if 1 > 0\n  a\n    color: blue\nelse\n  a\n    color: red\n",
    "a {\n  color: #0000ff;\n}\n"
);

test!(
    if_selects_else_branch,
    "if 0 > 1\n  a\n    color: blue\nelse\n  a\n    color: red\n",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    else_if_chain,
    "$x = 2\nif $x == 1\n  a\n    z-index: 1\nelse if $x == 2\n  a\n    z-index: 2\nelse\n  a\n    z-index: 3\n",
    "a {\n  z-index: 2;\n}\n"
);

test!(
    unless_negates,
    "unless false\n  a\n    color: red\n",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    conditional_inside_selector_mixes_in,
    "a\n  if true\n    color: red\n",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    if_body_shares_enclosing_scope,
    "if true\n  $x = 5px\na\n  width: $x\n",
    "a {\n  width: 5px;\n}\n"
);

test!(
    for_over_space_separated_values,
    "for v in 1 2 3\n  .x-{v}\n    margin: v\n",
    ".x-1 {\n  margin: 1;\n}\n.x-2 {\n  margin: 2;\n}\n.x-3 {\n  margin: 3;\n}\n"
);

test!(
    for_over_inclusive_range,
    "for i in 1..3\n  .r-{i}\n    z-index: i\n",
    ".r-1 {\n  z-index: 1;\n}\n.r-2 {\n  z-index: 2;\n}\n.r-3 {\n  z-index: 3;\n}\n"
);

test!(
    for_over_exclusive_range,
    "for i in 1...3\n  .r-{i}\n    z-index: i\n",
    ".r-1 {\n  z-index: 1;\n}\n.r-2 {\n  z-index: 2;\n}\n"
);

test!(
    for_with_key_binds_index,
    "for v, k in 10 20\n  .k-{k}\n    z-index: v\n",
    ".k-0 {\n  z-index: 10;\n}\n.k-1 {\n  z-index: 20;\n}\n"
);

test!(
    for_inside_selector,
    "a\n  for v in 1 2\n    margin-{v}: v\n",
    "a {\n  margin-1: 1;\n  margin-2: 2;\n}\n"
);

test!(
    postfix_if_on_call,
    "m()\n  color: red\n.a\n  m() if true\n.b\n  m() if false\n  z-index: 0\n",
    ".a {\n  color: #ff0000;\n}\n.b {\n  z-index: 0;\n}\n"
);

test!(
    postfix_unless,
    "m()\n  color: red\n.a\n  m() unless false\n",
    ".a {\n  color: #ff0000;\n}\n"
);

test!(
    ternary_expression,
    "a\n  width: true ? 1px : 2px\n  height: false ? 1px : 2px\n",
    "a {\n  width: 1px;\n  height: 2px;\n}\n"
);

test!(
    boolean_operators,
    "a\n  foo: true && false\n  bar: true || false\n  baz: not true\n",
    "a {\n  foo: false;\n  bar: true;\n  baz: false;\n}\n"
);
