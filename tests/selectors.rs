#[macro_use]
mod macros;

test!(
    interpolated_selector,
    "$side = left\n.pad-{$side}\n  float: {$side}\n",
    ".pad-left {\n  float: left;\n}\n"
);

test!(
    interpolated_property_name,
    "$side = left\na\n  margin-{$side}: 5px\n",
    "a {\n  margin-left: 5px;\n}\n"
);

test!(
    pseudo_class_selector,
    "a:hover\n  color: red\n",
    "a:hover {\n  color: #ff0000;\n}\n"
);

test!(
    pseudo_element_selector,
    "a::before\n  content: 'x'\n",
    "a::before {\n  content: 'x';\n}\n"
);

test!(
    attribute_selector,
    "input[type=text]\n  color: red\n",
    "input[type=text] {\n  color: #ff0000;\n}\n"
);

test!(
    child_combinator,
    "ul > li\n  color: red\n",
    "ul > li {\n  color: #ff0000;\n}\n"
);

test!(
    id_selector,
    "#header\n  color: red\n",
    "#header {\n  color: #ff0000;\n}\n"
);

test!(
    deeply_nested_parent_references,
    ".btn\n  &.primary\n    color: blue\n  & + &\n    margin-left: 4px\n",
    ".btn.primary {\n  color: #0000ff;\n}\n.btn + .btn {\n  margin-left: 4px;\n}\n"
);

test!(
    comment_hack_preserved_in_selector,
    "a /**/\n  color: red\n",
    "a /**/ {\n  color: #ff0000;\n}\n"
);

test!(
    line_comments_are_discarded,
    "// heading\na\n  color: red // trailing\n",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    block_comments_are_discarded_elsewhere,
    "/* banner */\na\n  /* note */\n  color: red\n",
    "a {\n  color: #ff0000;\n}\n"
);
