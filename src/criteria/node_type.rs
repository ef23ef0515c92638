//! Node kind discriminants

use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Discriminant of every AST node kind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr, EnumIter, EnumCount,
)]
pub enum NodeTypeId {
    // Boolean
    All,
    None,
    Not,
    And,
    Or,
    NumericEquals,
    NumericGreaterThan,
    NumericGreaterThanOrEqual,
    NumericLessThan,
    NumericLessThanOrEqual,
    FieldHasValue,
    BooleanFieldEquals,
    NumericFieldEquals,
    NumericFieldInRange,
    DateFieldEquals,
    DateFieldInRange,
    TextFieldContains,
    SubFieldHasValue,
    PriceSubFieldEquals,
    PriceSubFieldInRange,
    DateSubFieldEquals,
    DateSubFieldInRange,
    AltCodeSubFieldContains,
    AttributeSubFieldContains,

    // Numeric
    NumericNeg,
    NumericPos,
    NumericAbs,
    NumericAdd,
    NumericSub,
    NumericMul,
    NumericDiv,
    NumericMod,
    NumericFieldValueGet,
    NumericIf,
}

impl NodeTypeId {
    /// True for kinds that evaluate to a match result rather than a number
    pub const fn is_boolean(self) -> bool {
        (self as usize) < (NodeTypeId::NumericNeg as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_family_split() {
        let boolean = NodeTypeId::iter().filter(|id| id.is_boolean()).count();
        assert_eq!(boolean, 24);
        assert_eq!(NodeTypeId::COUNT - boolean, 10);
        assert!(NodeTypeId::AttributeSubFieldContains.is_boolean());
        assert!(!NodeTypeId::NumericIf.is_boolean());
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeTypeId::NumericGreaterThan.to_string(), "NumericGreaterThan");
    }
}
