use std::fmt::{self, Display};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum QuoteKind {
    Single,
    Double,
}

impl Display for QuoteKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "'"),
            Self::Double => write!(f, "\""),
        }
    }
}

/// Operators surviving into the AST as `BinOp` nodes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum BinaryOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Plus,
    Minus,
    Mul,
    Div,
    Rem,
    Pow,
    And,
    Or,
    In,
    IsA,
    /// `..`, both endpoints included
    Range,
    /// `...`, right endpoint excluded
    RangeExclusive,
    /// `list[index]`
    Subscript,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThanEqual => write!(f, ">="),
            Self::LessThanEqual => write!(f, "<="),
            Self::GreaterThan => write!(f, ">"),
            Self::LessThan => write!(f, "<"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Rem => write!(f, "%"),
            Self::Pow => write!(f, "**"),
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
            Self::In => write!(f, "in"),
            Self::IsA => write!(f, "is a"),
            Self::Range => write!(f, ".."),
            Self::RangeExclusive => write!(f, "..."),
            Self::Subscript => write!(f, "[]"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum UnaryOp {
    Plus,
    Minus,
    Not,
    Tilde,
    /// `is defined` checks scope membership without evaluating its operand
    IsDefined,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Not => write!(f, "!"),
            Self::Tilde => write!(f, "~"),
            Self::IsDefined => write!(f, "is defined"),
        }
    }
}
