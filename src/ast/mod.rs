mod interpolation;
mod node;

pub(crate) use interpolation::{Interpolation, Segment};
pub(crate) use node::*;
