//! Abstract Syntax Tree for scan criteria
//!
//! Two node families: [`BooleanNode`] (a match predicate) and
//! [`NumericNode`] (a number). Each node owns its children; trees are built
//! once and treated as immutable values.

use crate::criteria::node_type::NodeTypeId;
use crate::field::{
    AltCodeSubFieldId, AttributeSubFieldId, DateSubFieldId, FieldId, PriceSubFieldId, SubField,
};
use chrono::NaiveDate;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Boolean-valued criteria node
///
/// Variants are plain data, so some combinations have no tuple form. The
/// preconditions noted below are checked by [`BooleanNode::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanNode {
    /// Matches every instrument
    All,
    /// Matches no instrument
    None,
    Not(Box<BooleanNode>),
    /// Must hold at least one operand
    And(Vec<BooleanNode>),
    /// Must hold at least one operand
    Or(Vec<BooleanNode>),

    Equals(OperandPair),
    GreaterThan(OperandPair),
    GreaterThanOrEqual(OperandPair),
    LessThan(OperandPair),
    LessThanOrEqual(OperandPair),

    /// Any field except a boolean one, which decodes to `BooleanFieldEquals`
    FieldHasValue(FieldId),
    /// The field predicates below take a field of their own data type that
    /// is not sub-fielded. Numbers must be finite and dates must fall in
    /// years 0000 to 9999.
    BooleanFieldEquals {
        field: FieldId,
        target: bool,
    },
    NumericFieldEquals {
        field: FieldId,
        target: f64,
    },
    NumericFieldInRange {
        field: FieldId,
        range: Range<f64>,
    },
    DateFieldEquals {
        field: FieldId,
        target: NaiveDate,
    },
    DateFieldInRange {
        field: FieldId,
        range: Range<NaiveDate>,
    },
    TextFieldContains {
        field: FieldId,
        contains: TextContains,
    },

    SubFieldHasValue(SubField),
    PriceSubFieldEquals {
        sub_field: PriceSubFieldId,
        target: f64,
    },
    PriceSubFieldInRange {
        sub_field: PriceSubFieldId,
        range: Range<f64>,
    },
    DateSubFieldEquals {
        sub_field: DateSubFieldId,
        target: NaiveDate,
    },
    DateSubFieldInRange {
        sub_field: DateSubFieldId,
        range: Range<NaiveDate>,
    },
    AltCodeSubFieldContains {
        sub_field: AltCodeSubFieldId,
        contains: TextContains,
    },
    AttributeSubFieldContains {
        sub_field: AttributeSubFieldId,
        contains: TextContains,
    },
}

/// Number-valued criteria node
#[derive(Debug, Clone, PartialEq)]
pub enum NumericNode {
    Neg(NumericOperand),
    Pos(NumericOperand),
    Abs(NumericOperand),

    Add(OperandPair),
    Sub(OperandPair),
    Mul(OperandPair),
    Div(OperandPair),
    Mod(OperandPair),

    /// Only comparable fields
    FieldValueGet(FieldId),
    If(NumericIf),
}

/// A numeric position: either a literal or a nested numeric node
#[derive(Debug, Clone, PartialEq)]
pub enum NumericOperand {
    /// Must be finite; JSON has no NaN or infinity
    Literal(f64),
    Node(Box<NumericNode>),
}

/// Left and right operands of a comparison or binary arithmetic node
#[derive(Debug, Clone, PartialEq)]
pub struct OperandPair {
    pub left: NumericOperand,
    pub right: NumericOperand,
}

/// One (condition, value) arm of a [`NumericIf`]
#[derive(Debug, Clone, PartialEq)]
pub struct NumericIfArm {
    pub condition: BooleanNode,
    pub value: NumericOperand,
}

/// Multi-arm conditional.
///
/// `true_arms` are tried in order and the first matching condition wins;
/// `false_arm` terminates the chain. At least one true arm is required.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericIf {
    pub true_arms: Vec<NumericIfArm>,
    pub false_arm: NumericIfArm,
}

/// Inclusive bounds where at least one side is present
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T: Copy> Range<T> {
    /// Returns `None` when both bounds are absent
    pub fn new(min: Option<T>, max: Option<T>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn min(&self) -> Option<T> {
        self.min
    }

    pub fn max(&self) -> Option<T> {
        self.max
    }
}

/// How a text value is located within the field text
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Display,
)]
pub enum TextContainsAs {
    /// Anywhere in the text
    #[default]
    None,
    FromStart,
    FromEnd,
    Exact,
}

impl TextContainsAs {
    pub fn try_parse(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Target and options of a text contains match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextContains {
    pub value: String,
    pub as_id: TextContainsAs,
    pub ignore_case: bool,
}

impl TextContains {
    /// Contains anywhere, case sensitive
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            as_id: TextContainsAs::None,
            ignore_case: false,
        }
    }

    pub fn with_options(
        value: impl Into<String>,
        as_id: TextContainsAs,
        ignore_case: bool,
    ) -> Self {
        Self {
            value: value.into(),
            as_id,
            ignore_case,
        }
    }
}

impl BooleanNode {
    pub fn node_type(&self) -> NodeTypeId {
        match self {
            BooleanNode::All => NodeTypeId::All,
            BooleanNode::None => NodeTypeId::None,
            BooleanNode::Not(_) => NodeTypeId::Not,
            BooleanNode::And(_) => NodeTypeId::And,
            BooleanNode::Or(_) => NodeTypeId::Or,
            BooleanNode::Equals(_) => NodeTypeId::NumericEquals,
            BooleanNode::GreaterThan(_) => NodeTypeId::NumericGreaterThan,
            BooleanNode::GreaterThanOrEqual(_) => NodeTypeId::NumericGreaterThanOrEqual,
            BooleanNode::LessThan(_) => NodeTypeId::NumericLessThan,
            BooleanNode::LessThanOrEqual(_) => NodeTypeId::NumericLessThanOrEqual,
            BooleanNode::FieldHasValue(_) => NodeTypeId::FieldHasValue,
            BooleanNode::BooleanFieldEquals { .. } => NodeTypeId::BooleanFieldEquals,
            BooleanNode::NumericFieldEquals { .. } => NodeTypeId::NumericFieldEquals,
            BooleanNode::NumericFieldInRange { .. } => NodeTypeId::NumericFieldInRange,
            BooleanNode::DateFieldEquals { .. } => NodeTypeId::DateFieldEquals,
            BooleanNode::DateFieldInRange { .. } => NodeTypeId::DateFieldInRange,
            BooleanNode::TextFieldContains { .. } => NodeTypeId::TextFieldContains,
            BooleanNode::SubFieldHasValue(_) => NodeTypeId::SubFieldHasValue,
            BooleanNode::PriceSubFieldEquals { .. } => NodeTypeId::PriceSubFieldEquals,
            BooleanNode::PriceSubFieldInRange { .. } => NodeTypeId::PriceSubFieldInRange,
            BooleanNode::DateSubFieldEquals { .. } => NodeTypeId::DateSubFieldEquals,
            BooleanNode::DateSubFieldInRange { .. } => NodeTypeId::DateSubFieldInRange,
            BooleanNode::AltCodeSubFieldContains { .. } => NodeTypeId::AltCodeSubFieldContains,
            BooleanNode::AttributeSubFieldContains { .. } => NodeTypeId::AttributeSubFieldContains,
        }
    }

    pub fn and(operands: impl IntoIterator<Item = BooleanNode>) -> Self {
        BooleanNode::And(operands.into_iter().collect())
    }

    pub fn or(operands: impl IntoIterator<Item = BooleanNode>) -> Self {
        BooleanNode::Or(operands.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: BooleanNode) -> Self {
        BooleanNode::Not(Box::new(operand))
    }

    /// Field the predicate matches against, if it is a field predicate
    pub fn field_id(&self) -> Option<FieldId> {
        match self {
            BooleanNode::FieldHasValue(field)
            | BooleanNode::BooleanFieldEquals { field, .. }
            | BooleanNode::NumericFieldEquals { field, .. }
            | BooleanNode::NumericFieldInRange { field, .. }
            | BooleanNode::DateFieldEquals { field, .. }
            | BooleanNode::DateFieldInRange { field, .. }
            | BooleanNode::TextFieldContains { field, .. } => Some(*field),
            BooleanNode::SubFieldHasValue(sub_field) => Some(sub_field.field_id()),
            BooleanNode::PriceSubFieldEquals { .. } | BooleanNode::PriceSubFieldInRange { .. } => {
                Some(FieldId::Price)
            }
            BooleanNode::DateSubFieldEquals { .. } | BooleanNode::DateSubFieldInRange { .. } => {
                Some(FieldId::Date)
            }
            BooleanNode::AltCodeSubFieldContains { .. } => Some(FieldId::AltCode),
            BooleanNode::AttributeSubFieldContains { .. } => Some(FieldId::Attribute),
            _ => Option::None,
        }
    }
}

impl NumericNode {
    pub fn node_type(&self) -> NodeTypeId {
        match self {
            NumericNode::Neg(_) => NodeTypeId::NumericNeg,
            NumericNode::Pos(_) => NodeTypeId::NumericPos,
            NumericNode::Abs(_) => NodeTypeId::NumericAbs,
            NumericNode::Add(_) => NodeTypeId::NumericAdd,
            NumericNode::Sub(_) => NodeTypeId::NumericSub,
            NumericNode::Mul(_) => NodeTypeId::NumericMul,
            NumericNode::Div(_) => NodeTypeId::NumericDiv,
            NumericNode::Mod(_) => NodeTypeId::NumericMod,
            NumericNode::FieldValueGet(_) => NodeTypeId::NumericFieldValueGet,
            NumericNode::If(_) => NodeTypeId::NumericIf,
        }
    }
}

impl NumericOperand {
    pub fn literal(value: f64) -> Self {
        NumericOperand::Literal(value)
    }

    /// Reference to the current value of a numeric field
    pub fn field(field: FieldId) -> Self {
        NumericOperand::Node(Box::new(NumericNode::FieldValueGet(field)))
    }

    pub fn node(node: NumericNode) -> Self {
        NumericOperand::Node(Box::new(node))
    }
}

impl From<f64> for NumericOperand {
    fn from(value: f64) -> Self {
        NumericOperand::Literal(value)
    }
}

impl From<NumericNode> for NumericOperand {
    fn from(node: NumericNode) -> Self {
        NumericOperand::node(node)
    }
}

impl OperandPair {
    pub fn new(left: impl Into<NumericOperand>, right: impl Into<NumericOperand>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}
