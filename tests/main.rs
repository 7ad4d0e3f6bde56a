#[macro_use]
mod macros;

test!(empty_source, "", "");

test!(
    single_rule,
    "a\n  color: red\n",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    css_braces_accepted,
    "a {\n  color: red;\n}\n",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    compact_css_one_liner,
    "a{color:red}",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    mixed_syntax_in_one_file,
    "a\n  color: red\nb {\n  color: blue;\n}\n",
    "a {\n  color: #ff0000;\n}\nb {\n  color: #0000ff;\n}\n"
);

test!(
    multiple_properties,
    "a\n  color: red\n  margin: 0\n",
    "a {\n  color: #ff0000;\n  margin: 0;\n}\n"
);

test!(
    selector_group_shares_block,
    "a, b\n  color: red\n",
    "a,\nb {\n  color: #ff0000;\n}\n"
);

test!(
    multiline_selector_group,
    "a,\nb\n  color: red\n",
    "a,\nb {\n  color: #ff0000;\n}\n"
);

test!(
    nested_selectors_join,
    "a\n  b\n    color: red\n",
    "a b {\n  color: #ff0000;\n}\n"
);

test!(
    parent_reference_replaces_amp,
    "a\n  &:hover\n    color: red\n",
    "a:hover {\n  color: #ff0000;\n}\n"
);

test!(
    property_without_colon,
    "a\n  color red\n",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    unknown_ident_passes_through,
    "a\n  font-weight: bold\n",
    "a {\n  font-weight: bold;\n}\n"
);

test!(
    charset_emitted,
    "@charset \"utf-8\"\na\n  color: red\n",
    "@charset \"utf-8\";\na {\n  color: #ff0000;\n}\n"
);

test!(
    compressed_output,
    "a\n  color: red\n  margin: 0\n",
    "a{color:#ff0000;margin:0}",
    stylet::Options::default().style(stylet::OutputStyle::Compressed)
);

error!(unknown_at_rule_fails, "@wat\n  color: red\n", "unsupported at-rule");

error!(
    unclosed_brace_fails,
    "a {\n  color: red;\n",
    "expected \"}\""
);
