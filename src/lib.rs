/*! # stylet
An indentation-sensitive CSS preprocessor in pure rust.

The source language is whitespace-significant but brace-compatible:
plain CSS is valid input, and both syntaxes may mix in one file.
Variables, functions, mixins, conditionals and iteration reduce to
plain CSS.

## Use as library
```
fn main() -> Result<(), Box<stylet::Error>> {
    let css = stylet::from_string(
        "a\n  color: red\n".to_string(),
        &stylet::Options::default(),
    )?;
    assert_eq!(css, "a {\n  color: #ff0000;\n}\n");
    Ok(())
}
```

## Use as binary
```bash
cargo install stylet
stylet input.styl
```
*/

#![warn(clippy::all, clippy::pedantic, clippy::cargo)]
#![deny(missing_debug_implementations)]
#![allow(
    clippy::use_self,
    clippy::missing_docs_in_private_items,
    clippy::module_name_repetitions,
    clippy::multiple_inherent_impl,
    clippy::else_if_without_else,
    clippy::new_ret_no_self,
    clippy::single_match,
    clippy::float_arithmetic,
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::items_after_statements,
    clippy::wildcard_enum_match_arm
)]

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use codemap::CodeMap;

pub use crate::error::{Error, ErrorKind, StyleResult};
pub use crate::fs::{Fs, NullFs, StdFs};
pub use crate::value::{HostFunction, Value};

use crate::{evaluate::Visitor, lexer::Lexer, output::Serializer, parse::Parser};

mod ast;
mod builtin;
mod color;
mod common;
mod error;
mod evaluate;
mod fs;
mod interner;
mod lexer;
mod output;
mod parse;
mod token;
mod value;

#[non_exhaustive]
#[derive(Clone, Copy, Debug)]
pub enum OutputStyle {
    /// Each selector and declaration on its own line.
    Expanded,
    /// As few characters as possible, the whole stylesheet on one line.
    Compressed,
}

/// Configuration for a compile.
///
/// The simplest usage is `stylet::Options::default()`; a builder is
/// exposed for everything else.
pub struct Options<'a> {
    fs: &'a dyn Fs,
    style: OutputStyle,
    load_paths: Vec<PathBuf>,
    imports: Vec<String>,
    functions: BTreeMap<String, (HostFunction, bool)>,
    warn: bool,
}

impl Default for Options<'_> {
    #[inline]
    fn default() -> Self {
        Self {
            fs: &StdFs,
            style: OutputStyle::Expanded,
            load_paths: Vec::new(),
            imports: Vec::new(),
            functions: BTreeMap::new(),
            warn: false,
        }
    }
}

impl fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("fs", &self.fs)
            .field("style", &self.style)
            .field("load_paths", &self.load_paths)
            .field("imports", &self.imports)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("warn", &self.warn)
            .finish()
    }
}

impl<'a> Options<'a> {
    /// Control the file system `@import` reads through.
    ///
    /// Defaults to [`StdFs`], direct access to the local file system.
    #[must_use]
    #[inline]
    pub fn fs(mut self, fs: &'a dyn Fs) -> Self {
        self.fs = fs;
        self
    }

    /// Choose between expanded (default) and compressed output.
    #[must_use]
    #[inline]
    pub const fn style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    /// Append one directory to the `@import` lookup list. Imports always
    /// resolve relative to the importing file first.
    #[must_use]
    #[inline]
    pub fn load_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.load_paths.push(path.into());
        self
    }

    /// Append several directories to the `@import` lookup list.
    #[must_use]
    #[inline]
    pub fn load_paths<P: Into<PathBuf> + Clone>(mut self, paths: &[P]) -> Self {
        for p in paths {
            self.load_paths.push(p.clone().into());
        }
        self
    }

    /// Implicitly import a file before the user source.
    #[must_use]
    #[inline]
    pub fn import<S: Into<String>>(mut self, path: S) -> Self {
        self.imports.push(path.into());
        self
    }

    /// Expose a native function to the stylesheet under `name`. Arguments
    /// arrive reduced to their first primaries.
    #[must_use]
    #[inline]
    pub fn function<S: Into<String>>(mut self, name: S, func: HostFunction) -> Self {
        self.functions.insert(name.into(), (func, false));
        self
    }

    /// Like [`Options::function`], but the callable receives full
    /// expression arguments (lists arrive as lists).
    #[must_use]
    #[inline]
    pub fn raw_function<S: Into<String>>(mut self, name: S, func: HostFunction) -> Self {
        self.functions.insert(name.into(), (func, true));
        self
    }

    /// Emit non-fatal warnings (duplicate definitions, built-in
    /// shadowing) to stderr. Off by default.
    #[must_use]
    #[inline]
    pub const fn warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    pub(crate) fn filesystem(&self) -> &dyn Fs {
        self.fs
    }

    pub(crate) fn paths(&self) -> &[PathBuf] {
        &self.load_paths
    }

    pub(crate) fn implicit_imports(&self) -> Vec<String> {
        self.imports.clone()
    }

    pub(crate) fn function_raw(&self, name: &str) -> Option<bool> {
        self.functions.get(name).map(|(_, raw)| *raw)
    }

    pub(crate) fn get_function(&self, name: &str) -> Option<&HostFunction> {
        self.functions.get(name).map(|(f, _)| f)
    }

    pub(crate) fn warnings_enabled(&self) -> bool {
        self.warn
    }
}

fn raw_to_located(map: &CodeMap, err: Box<Error>) -> Box<Error> {
    match (*err).clone().take_raw() {
        Some((kind, message, span, trace)) => Box::new(Error::from_loc(
            kind,
            message,
            map.look_up_span(span),
            trace,
        )),
        None => err,
    }
}

fn from_string_with_file_name(
    input: String,
    file_name: &str,
    options: &Options,
) -> StyleResult<String> {
    let mut map = CodeMap::new();
    let file = map.add_file(file_name.to_owned(), input);
    let root_span = file.span.subspan(0, 0);

    let root = Parser::new(Lexer::new(&file))
        .parse()
        .map_err(|e| raw_to_located(&map, e))?;

    let reduced = {
        let mut visitor = Visitor::new(options, &mut map, file_name, root_span);
        visitor.visit_root(root)
    };
    let reduced = reduced.map_err(|e| raw_to_located(&map, e))?;

    Ok(Serializer::new(options.style).render(&reduced))
}

/// Compile CSS from a string.
///
/// ```
/// fn main() -> Result<(), Box<stylet::Error>> {
///     let css = stylet::from_string(
///         ".btn\n  padding: 4px 8px\n".to_string(),
///         &stylet::Options::default(),
///     )?;
///     assert_eq!(css, ".btn {\n  padding: 4px 8px;\n}\n");
///     Ok(())
/// }
/// ```
#[inline]
pub fn from_string(input: String, options: &Options) -> StyleResult<String> {
    from_string_with_file_name(input, "stdin", options)
}

/// Compile CSS from a path.
///
/// n.b. files that are not valid UTF-8 are rejected
#[inline]
pub fn from_path(p: &str, options: &Options) -> StyleResult<String> {
    from_string_with_file_name(
        String::from_utf8(options.fs.read(Path::new(p))?)?,
        p,
        options,
    )
}
