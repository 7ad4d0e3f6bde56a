use std::cell::RefCell;
use std::fmt::{self, Display};

use lasso::{Rodeo, Spur};

thread_local!(static INTERNER: RefCell<Rodeo> = RefCell::new(Rodeo::default()));

/// An interned identifier. Copyable and cheap to compare, so names can
/// be passed around freely during lexing and evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct InternedString(Spur);

impl InternedString {
    pub fn get_or_intern<T: AsRef<str>>(s: T) -> Self {
        INTERNER.with(|interner| Self(interner.borrow_mut().get_or_intern(s)))
    }

    pub fn resolve(self) -> String {
        INTERNER.with(|interner| interner.borrow().resolve(&self.0).to_string())
    }
}

impl Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

/// The names the evaluator binds implicitly on every call.
pub(crate) mod keywords {
    use super::InternedString;

    pub fn arguments() -> InternedString {
        InternedString::get_or_intern("arguments")
    }

    pub fn mixin() -> InternedString {
        InternedString::get_or_intern("mixin")
    }

    pub fn index() -> InternedString {
        InternedString::get_or_intern("__index__")
    }
}
