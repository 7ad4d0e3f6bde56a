use std::fs;

use tempfile::tempdir;

#[test]
fn import_resolves_styl_suffix() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("vars.styl"), "$w = 10px\n").expect("write import");

    let options = stylet::Options::default().load_path(dir.path());
    let css = stylet::from_string(
        "@import \"vars\"\n.a\n  width: $w\n".to_string(),
        &options,
    )
    .expect("compile");
    assert_eq!(css, ".a {\n  width: 10px;\n}\n");
}

#[test]
fn import_preserves_statement_order() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("mid.styl"), ".mid\n  z-index: 2\n").expect("write import");

    let options = stylet::Options::default().load_path(dir.path());
    let css = stylet::from_string(
        ".before\n  z-index: 1\n@import \"mid\"\n.after\n  z-index: 3\n".to_string(),
        &options,
    )
    .expect("compile");
    assert_eq!(
        css,
        ".before {\n  z-index: 1;\n}\n.mid {\n  z-index: 2;\n}\n.after {\n  z-index: 3;\n}\n"
    );
}

#[test]
fn import_expands_nested_imports_depth_first() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("outer.styl"),
        "@import \"inner\"\n.outer\n  z-index: 2\n",
    )
    .expect("write outer");
    fs::write(dir.path().join("inner.styl"), ".inner\n  z-index: 1\n").expect("write inner");

    let options = stylet::Options::default().load_path(dir.path());
    let css = stylet::from_string("@import \"outer\"\n".to_string(), &options).expect("compile");
    assert_eq!(css, ".inner {\n  z-index: 1;\n}\n.outer {\n  z-index: 2;\n}\n");
}

#[test]
fn implicit_imports_come_first() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("theme.styl"), "$accent = #336699\n").expect("write theme");

    let options = stylet::Options::default()
        .load_path(dir.path())
        .import("theme");
    let css = stylet::from_string("a\n  color: $accent\n".to_string(), &options).expect("compile");
    assert_eq!(css, "a {\n  color: #336699;\n}\n");
}

#[test]
fn css_import_passes_through() {
    let css = stylet::from_string(
        "@import \"reset.css\"\na\n  color: red\n".to_string(),
        &stylet::Options::default(),
    )
    .expect("compile");
    assert_eq!(css, "@import \"reset.css\";\na {\n  color: #ff0000;\n}\n");
}

#[test]
fn missing_import_fails() {
    let err = stylet::from_string(
        "@import \"nowhere\"\n".to_string(),
        &stylet::Options::default().fs(&stylet::NullFs),
    )
    .expect_err("import should fail");
    assert_eq!(err.kind(), stylet::ErrorKind::Import);
}
