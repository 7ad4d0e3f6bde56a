#[macro_use]
mod macros;

test!(
    media_wraps_rules,
    "@media screen and (max-width: 100px)\n  a\n    color: red\n",
    "@media screen and (max-width: 100px) {\n  a {\n    color: #ff0000;\n  }\n}\n"
);

test!(
    media_css_style,
    "@media print {\n  a {\n    color: red;\n  }\n}\n",
    "@media print {\n  a {\n    color: #ff0000;\n  }\n}\n"
);

test!(
    variables_work_inside_media,
    "$w = 50px\n@media screen\n  a\n    width: $w\n",
    "@media screen {\n  a {\n    width: 50px;\n  }\n}\n"
);

test!(
    keyframes_with_from_to,
    "@keyframes fade\n  from\n    opacity: 0\n  to\n    opacity: 1\n",
    "@keyframes fade {\n  from {\n    opacity: 0;\n  }\n  to {\n    opacity: 1;\n  }\n}\n"
);

test!(
    keyframes_with_percentages,
    "@keyframes slide\n  0%\n    margin-left: 0\n  50%, 100%\n    margin-left: 10px\n",
    "@keyframes slide {\n  0% {\n    margin-left: 0;\n  }\n  50%,\n  100% {\n    margin-left: 10px;\n  }\n}\n"
);

test!(
    keyframes_interpolated_name,
    "$n = 'pulse'\n@keyframes {$n}\n  from\n    opacity: 0\n",
    "@keyframes pulse {\n  from {\n    opacity: 0;\n  }\n}\n"
);

test!(
    page_rule,
    "@page :first\n  margin: 1cm\n",
    "@page :first {\n  margin: 1cm;\n}\n"
);

test!(
    page_rule_without_selector,
    "@page\n  margin: 2cm\n",
    "@page {\n  margin: 2cm;\n}\n"
);
