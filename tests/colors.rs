#[macro_use]
mod macros;

test!(
    named_color_resolves,
    "a\n  color: red\n",
    "a {\n  color: #ff0000;\n}\n"
);

test!(
    short_hex_addition,
    "a\n  color: #fff + #000\n",
    "a {\n  color: #ffffff;\n}\n"
);

test!(
    hex_color_passes_through,
    "a\n  color: #336699\n",
    "a {\n  color: #336699;\n}\n"
);

test!(
    color_addition_clamps,
    "a\n  color: #cccccc + #666666\n",
    "a {\n  color: #ffffff;\n}\n"
);

test!(
    color_plus_number_brightens,
    "a\n  color: #111111 + 1\n",
    "a {\n  color: #121212;\n}\n"
);

test!(
    named_color_can_be_shadowed,
    "red = #00ff00\na\n  color: red\n",
    "a {\n  color: #00ff00;\n}\n"
);

test!(
    rgb_builtin,
    "a\n  color: rgb(255, 102, 0)\n",
    "a {\n  color: #ff6600;\n}\n"
);

test!(
    rgba_builtin_prints_alpha,
    "a\n  color: rgba(255, 0, 0, 0.5)\n",
    "a {\n  color: rgba(255,0,0,0.5);\n}\n"
);

test!(
    channel_accessors,
    "a\n  foo: red(#336699)\n  bar: green(#336699)\n  baz: blue(#336699)\n",
    "a {\n  foo: 51;\n  bar: 102;\n  baz: 153;\n}\n"
);

test!(
    darken_darkens,
    "a\n  color: darken(#ff0000, 10%)\n",
    "a {\n  color: #cc0000;\n}\n"
);

test!(
    lighten_lightens,
    "a\n  color: lighten(#000000, 50%)\n",
    "a {\n  color: #808080;\n}\n"
);

test!(
    invert_builtin,
    "a\n  color: invert(#ffffff)\n",
    "a {\n  color: #000000;\n}\n"
);

test!(
    grayscale_builtin,
    "a\n  color: grayscale(#ff0000)\n",
    "a {\n  color: #808080;\n}\n"
);
