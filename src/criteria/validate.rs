//! Constructed-tree validation
//!
//! The AST types are plain data and can hold shapes the wire form cannot
//! carry (an empty `And`, a text field in a numeric predicate, a NaN
//! literal). A tree that passes [`BooleanNode::validate`] encodes to a tuple
//! that decodes back to the same tree.

use crate::criteria::ast::{BooleanNode, NumericIf, NumericNode, NumericOperand, Range};
use crate::criteria::parser::ParseOptions;
use crate::error::NodeError;
use crate::field::{FieldDataType, FieldId};
use chrono::{Datelike, NaiveDate};

type ValidateResult = std::result::Result<(), NodeError>;

impl BooleanNode {
    /// Check that this tree round trips under default decode options
    pub fn validate(&self) -> ValidateResult {
        self.validate_with(&ParseOptions::default())
    }

    /// Check that this tree round trips when decoded with `options`
    pub fn validate_with(&self, options: &ParseOptions) -> ValidateResult {
        Validator::new(options).boolean(self, 1)
    }
}

impl NumericOperand {
    /// Check that this operand round trips under default decode options
    pub fn validate(&self) -> ValidateResult {
        Validator::new(&ParseOptions::default()).numeric(self, 1)
    }
}

struct Validator {
    max_depth: usize,
}

impl Validator {
    fn new(options: &ParseOptions) -> Self {
        Self {
            max_depth: options.max_depth,
        }
    }

    /// `depth` is the tuple depth this node is encoded at
    fn boolean(&self, node: &BooleanNode, depth: usize) -> ValidateResult {
        if depth > self.max_depth {
            return Err(NodeError::DepthLimitExceeded(self.max_depth));
        }

        match node {
            BooleanNode::All | BooleanNode::None => Ok(()),
            BooleanNode::Not(operand) => self.boolean(operand, depth + 1),
            BooleanNode::And(operands) | BooleanNode::Or(operands) => {
                if operands.is_empty() {
                    return Err(NodeError::EmptyLogical(node.node_type()));
                }
                operands
                    .iter()
                    .try_for_each(|operand| self.boolean(operand, depth + 1))
            }
            BooleanNode::Equals(pair)
            | BooleanNode::GreaterThan(pair)
            | BooleanNode::GreaterThanOrEqual(pair)
            | BooleanNode::LessThan(pair)
            | BooleanNode::LessThanOrEqual(pair) => {
                self.numeric(&pair.left, depth + 1)?;
                self.numeric(&pair.right, depth + 1)
            }

            BooleanNode::FieldHasValue(field) => {
                if field.data_type() == FieldDataType::Boolean {
                    return Err(NodeError::BooleanFieldHasValue(*field));
                }
                Ok(())
            }
            BooleanNode::BooleanFieldEquals { field, .. } => {
                plain_field(node, *field, FieldDataType::Boolean)
            }
            BooleanNode::NumericFieldEquals { field, target } => {
                plain_field(node, *field, FieldDataType::Numeric)?;
                finite(*target)
            }
            BooleanNode::NumericFieldInRange { field, range } => {
                plain_field(node, *field, FieldDataType::Numeric)?;
                finite_range(range)
            }
            BooleanNode::DateFieldEquals { field, target } => {
                plain_field(node, *field, FieldDataType::Date)?;
                four_digit_year(target)
            }
            BooleanNode::DateFieldInRange { field, range } => {
                plain_field(node, *field, FieldDataType::Date)?;
                date_range(range)
            }
            BooleanNode::TextFieldContains { field, .. } => {
                plain_field(node, *field, FieldDataType::Text)
            }

            BooleanNode::SubFieldHasValue(_)
            | BooleanNode::AltCodeSubFieldContains { .. }
            | BooleanNode::AttributeSubFieldContains { .. } => Ok(()),
            BooleanNode::PriceSubFieldEquals { target, .. } => finite(*target),
            BooleanNode::PriceSubFieldInRange { range, .. } => finite_range(range),
            BooleanNode::DateSubFieldEquals { target, .. } => four_digit_year(target),
            BooleanNode::DateSubFieldInRange { range, .. } => date_range(range),
        }
    }

    /// Literals and field references are not tuples, so they add no depth
    fn numeric(&self, operand: &NumericOperand, depth: usize) -> ValidateResult {
        let node = match operand {
            NumericOperand::Literal(value) => return finite(*value),
            NumericOperand::Node(node) => node.as_ref(),
        };

        match node {
            NumericNode::FieldValueGet(field) => {
                if !field.is_comparable() {
                    return Err(NodeError::FieldNotComparable(*field));
                }
                Ok(())
            }
            _ if depth > self.max_depth => Err(NodeError::DepthLimitExceeded(self.max_depth)),
            NumericNode::Neg(operand) | NumericNode::Pos(operand) | NumericNode::Abs(operand) => {
                self.numeric(operand, depth + 1)
            }
            NumericNode::Add(pair)
            | NumericNode::Sub(pair)
            | NumericNode::Mul(pair)
            | NumericNode::Div(pair)
            | NumericNode::Mod(pair) => {
                self.numeric(&pair.left, depth + 1)?;
                self.numeric(&pair.right, depth + 1)
            }
            NumericNode::If(numeric_if) => self.numeric_if(numeric_if, depth),
        }
    }

    fn numeric_if(&self, numeric_if: &NumericIf, depth: usize) -> ValidateResult {
        if numeric_if.true_arms.is_empty() {
            return Err(NodeError::IfWithoutTrueArm);
        }
        numeric_if
            .true_arms
            .iter()
            .chain(std::iter::once(&numeric_if.false_arm))
            .try_for_each(|arm| {
                self.boolean(&arm.condition, depth + 1)?;
                self.numeric(&arm.value, depth + 1)
            })
    }
}

/// A non-sub-fielded field of the given data type
fn plain_field(node: &BooleanNode, field: FieldId, data_type: FieldDataType) -> ValidateResult {
    if field.data_type() != data_type || field.is_subbed() {
        return Err(NodeError::FieldTypeMismatch {
            node: node.node_type(),
            field,
        });
    }
    Ok(())
}

fn finite(value: f64) -> ValidateResult {
    if !value.is_finite() {
        return Err(NodeError::NonFiniteNumber(value.to_string()));
    }
    Ok(())
}

fn finite_range(range: &Range<f64>) -> ValidateResult {
    range.min().map_or(Ok(()), finite)?;
    range.max().map_or(Ok(()), finite)
}

/// Dates are written as `YYYY-MM-DD`, which has no room for a sign
fn four_digit_year(date: &NaiveDate) -> ValidateResult {
    if !(0..=9999).contains(&date.year()) {
        return Err(NodeError::DateOutOfRange(date.to_string()));
    }
    Ok(())
}

fn date_range(range: &Range<NaiveDate>) -> ValidateResult {
    range.min().map_or(Ok(()), |min| four_digit_year(&min))?;
    range.max().map_or(Ok(()), |max| four_digit_year(&max))
}
