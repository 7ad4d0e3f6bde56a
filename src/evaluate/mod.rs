mod bin_op;
mod stack;
mod visitor;

pub(crate) use stack::{Frame, Scope, Stack};
pub(crate) use visitor::Visitor;
