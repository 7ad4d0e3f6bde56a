#[macro_use]
mod macros;

test!(
    math_rounding,
    "a\n  top: ceil(1.2px)\n  bottom: floor(1.8px)\n  left: round(1.5px)\n  right: abs(-3px)\n",
    "a {\n  top: 2px;\n  bottom: 1px;\n  left: 2px;\n  right: 3px;\n}\n"
);

test!(
    min_max,
    "a\n  width: min(3px, 5px)\n  height: max(3px, 5px)\n",
    "a {\n  width: 3px;\n  height: 5px;\n}\n"
);

test!(
    even_odd,
    "a\n  foo: even(4)\n  bar: odd(4)\n",
    "a {\n  foo: true;\n  bar: false;\n}\n"
);

test!(
    unit_reads_suffix,
    "a\n  content: unit(10px)\n",
    "a {\n  content: 'px';\n}\n"
);

test!(
    unit_replaces_suffix,
    "a\n  width: unit(10px, 'em')\n",
    "a {\n  width: 10em;\n}\n"
);

test!(
    type_of_reports_kind,
    "a\n  foo: type-of(5px)\n  bar: type-of('x')\n  baz: type-of(#fff)\n",
    "a {\n  foo: 'unit';\n  bar: 'string';\n  baz: 'color';\n}\n"
);

test!(
    length_counts_list_items,
    "list = 1 2 3\na\n  foo: length(list)\n  bar: length(5)\n",
    "a {\n  foo: 3;\n  bar: 1;\n}\n"
);

test!(
    last_returns_final_item,
    "list = 1px 2px 3px\na\n  width: last(list)\n",
    "a {\n  width: 3px;\n}\n"
);

error!(user_error_builtin_aborts, "a\n  width: error('nope')\n", "nope");

error!(
    builtin_arity_is_checked,
    "a\n  color: rgb(1, 2, 3, 4)\n",
    "takes at most 3 arguments"
);
