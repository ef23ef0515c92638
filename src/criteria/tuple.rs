//! Tuple node wire vocabulary
//!
//! A tuple node is a JSON array whose first element is a string
//! discriminator. This module maps discriminators to node constructors and
//! back, and holds the named-parameter keys.

use crate::criteria::ast::{BooleanNode, NumericNode, NumericOperand, OperandPair};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde_json::Value;

pub const ALL: &str = "all";
pub const NONE: &str = "none";
pub const NOT: &str = "not";
pub const AND: &str = "and";
pub const OR: &str = "or";
pub const IF: &str = "if";

/// Named-parameter keys
pub const MIN_KEY: &str = "Min";
pub const MAX_KEY: &str = "Max";
pub const AT_KEY: &str = "At";
pub const AS_KEY: &str = "As";
pub const IGNORE_CASE_KEY: &str = "IgnoreCase";

/// Largest parameter count a matching tuple node can have
pub const MAX_MATCHING_PARAMS: usize = 4;

/// Largest magnitude at which every integer is exactly representable as f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl ComparisonOp {
    pub const fn tag(self) -> &'static str {
        match self {
            ComparisonOp::Equals => "eq",
            ComparisonOp::GreaterThan => "gt",
            ComparisonOp::GreaterThanOrEqual => "gte",
            ComparisonOp::LessThan => "lt",
            ComparisonOp::LessThanOrEqual => "lte",
        }
    }

    pub fn build(self, operands: OperandPair) -> BooleanNode {
        match self {
            ComparisonOp::Equals => BooleanNode::Equals(operands),
            ComparisonOp::GreaterThan => BooleanNode::GreaterThan(operands),
            ComparisonOp::GreaterThanOrEqual => BooleanNode::GreaterThanOrEqual(operands),
            ComparisonOp::LessThan => BooleanNode::LessThan(operands),
            ComparisonOp::LessThanOrEqual => BooleanNode::LessThanOrEqual(operands),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Abs,
}

impl UnaryOp {
    pub const fn tag(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
            UnaryOp::Abs => "abs",
        }
    }

    pub fn build(self, operand: NumericOperand) -> NumericNode {
        match self {
            UnaryOp::Neg => NumericNode::Neg(operand),
            UnaryOp::Pos => NumericNode::Pos(operand),
            UnaryOp::Abs => NumericNode::Abs(operand),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub const fn tag(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
        }
    }

    pub fn build(self, operands: OperandPair) -> NumericNode {
        match self {
            BinaryOp::Add => NumericNode::Add(operands),
            BinaryOp::Sub => NumericNode::Sub(operands),
            BinaryOp::Mul => NumericNode::Mul(operands),
            BinaryOp::Div => NumericNode::Div(operands),
            BinaryOp::Mod => NumericNode::Mod(operands),
        }
    }
}

/// What a boolean-position discriminator resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanTag {
    All,
    None,
    Not,
    And,
    Or,
    Comparison(ComparisonOp),
}

/// What a numeric-position discriminator resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericTag {
    Unary(UnaryOp),
    Binary(BinaryOp),
    /// Symbol whose meaning depends on operand count
    UnaryOrBinary { unary: UnaryOp, binary: BinaryOp },
    If,
}

static BOOLEAN_TAGS: Lazy<AHashMap<&'static str, BooleanTag>> = Lazy::new(|| {
    let mut tags = AHashMap::with_capacity(16);
    tags.insert(ALL, BooleanTag::All);
    tags.insert(NONE, BooleanTag::None);
    tags.insert(NOT, BooleanTag::Not);
    tags.insert(AND, BooleanTag::And);
    tags.insert(OR, BooleanTag::Or);
    for (symbol, op) in [
        ("=", ComparisonOp::Equals),
        (">", ComparisonOp::GreaterThan),
        (">=", ComparisonOp::GreaterThanOrEqual),
        ("<", ComparisonOp::LessThan),
        ("<=", ComparisonOp::LessThanOrEqual),
    ] {
        tags.insert(op.tag(), BooleanTag::Comparison(op));
        tags.insert(symbol, BooleanTag::Comparison(op));
    }
    tags
});

static NUMERIC_TAGS: Lazy<AHashMap<&'static str, NumericTag>> = Lazy::new(|| {
    let mut tags = AHashMap::with_capacity(16);
    for op in [UnaryOp::Neg, UnaryOp::Pos, UnaryOp::Abs] {
        tags.insert(op.tag(), NumericTag::Unary(op));
    }
    for op in [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
    ] {
        tags.insert(op.tag(), NumericTag::Binary(op));
    }
    tags.insert("*", NumericTag::Binary(BinaryOp::Mul));
    tags.insert("/", NumericTag::Binary(BinaryOp::Div));
    tags.insert("%", NumericTag::Binary(BinaryOp::Mod));
    tags.insert(
        "+",
        NumericTag::UnaryOrBinary {
            unary: UnaryOp::Pos,
            binary: BinaryOp::Add,
        },
    );
    tags.insert(
        "-",
        NumericTag::UnaryOrBinary {
            unary: UnaryOp::Neg,
            binary: BinaryOp::Sub,
        },
    );
    tags.insert(IF, NumericTag::If);
    tags
});

#[inline]
pub fn boolean_tag(discriminator: &str) -> Option<BooleanTag> {
    BOOLEAN_TAGS.get(discriminator).copied()
}

#[inline]
pub fn numeric_tag(discriminator: &str) -> Option<NumericTag> {
    NUMERIC_TAGS.get(discriminator).copied()
}

/// Wire form of a literal number.
///
/// Integral values within the exact range are written as JSON integers so a
/// decoded `50` re-encodes as `50` rather than `50.0`.
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_aliases() {
        assert_eq!(
            boolean_tag("gt"),
            Some(BooleanTag::Comparison(ComparisonOp::GreaterThan))
        );
        assert_eq!(boolean_tag(">"), boolean_tag("gt"));
        assert_eq!(boolean_tag("<="), boolean_tag("lte"));
        assert_eq!(boolean_tag("add"), None);
    }

    #[test]
    fn test_symbol_disambiguation_table() {
        assert_eq!(
            numeric_tag("-"),
            Some(NumericTag::UnaryOrBinary {
                unary: UnaryOp::Neg,
                binary: BinaryOp::Sub
            })
        );
        assert_eq!(numeric_tag("*"), Some(NumericTag::Binary(BinaryOp::Mul)));
        assert_eq!(numeric_tag("if"), Some(NumericTag::If));
        assert_eq!(numeric_tag("and"), None);
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(50.0), serde_json::json!(50));
        assert_eq!(number_value(-3.0), serde_json::json!(-3));
        assert_eq!(number_value(1.5), serde_json::json!(1.5));
        assert_eq!(number_value(1e300), serde_json::json!(1e300));
        assert_eq!(number_value(f64::NAN), Value::Null);
    }
}
