//! Error types for the scan criteria engine

use crate::criteria::{NodeTypeId, ParseProgress};
use crate::field::FieldId;
use strum::IntoStaticStr;
use thiserror::Error;

/// Reason a tuple node could not be decoded
///
/// Every variant carries the textual form of the offending value (or enough
/// context to locate it). [`ParseError::code`] gives a stable identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum ParseError {
    // Structural
    #[error("Tuple node is not an array: {0}")]
    NotAnArray(String),

    #[error("Tuple node is empty")]
    EmptyTuple,

    #[error("Tuple node discriminator is not a string: {0}")]
    DiscriminatorNotString(String),

    #[error("Unknown boolean tuple node type: {0}")]
    UnknownBooleanDiscriminator(String),

    #[error("Unknown numeric tuple node type: {0}")]
    UnknownNumericDiscriminator(String),

    #[error("Unknown field: {0}")]
    UnknownFieldReference(String),

    #[error("Boolean parameter must be a tuple node or field name: {0}")]
    BooleanParamInvalid(String),

    #[error("Numeric parameter must be a number, field name or tuple node: {0}")]
    NumericParamInvalid(String),

    // Arity
    #[error("Tuple node expects no parameters: {0}")]
    NoParamsExpected(String),

    #[error("Logical tuple node needs at least one operand: {0}")]
    LogicalOperandsMissing(String),

    #[error("Not tuple node needs exactly one operand: {0}")]
    NotParamCount(String),

    #[error("Comparison tuple node needs exactly two operands: {0}")]
    ComparisonParamCount(String),

    #[error("Unary tuple node needs exactly one operand: {0}")]
    UnaryParamCount(String),

    #[error("Binary tuple node needs exactly two operands: {0}")]
    BinaryParamCount(String),

    #[error("Unary or binary tuple node needs one or two operands: {0}")]
    UnaryOrBinaryParamCount(String),

    #[error("Field value tuple node expects no parameters: {0}")]
    FieldValueGetParamCount(String),

    #[error("If tuple node needs an even number of at least four parameters: {0}")]
    IfArmCount(String),

    #[error("Boolean field accepts at most one parameter: {0}")]
    BooleanFieldParamCount(String),

    #[error("Numeric or date field accepts at most two parameters: {0}")]
    RangeFieldParamCount(String),

    #[error("Text field accepts at most three parameters: {0}")]
    TextFieldParamCount(String),

    #[error("Price or date sub-field accepts at most three parameters: {0}")]
    SubFieldRangeParamCount(String),

    #[error("Matching tuple node has too many parameters: {0}")]
    MatchingParamCountExceeded(String),

    // Type mismatch
    #[error("Expected a number: {0}")]
    NumberExpected(String),

    #[error("Expected a boolean: {0}")]
    BooleanExpected(String),

    #[error("Expected text: {0}")]
    TextExpected(String),

    #[error("Expected ISO 8601 date text: {0}")]
    DateTextExpected(String),

    #[error("Sub-field must be a string: {0}")]
    SubFieldNotString(String),

    #[error("Contains 'As' must be a string: {0}")]
    ContainsAsNotString(String),

    #[error("Named parameters must be an object: {0}")]
    NamedParamsNotObject(String),

    #[error("Named parameters cannot be null")]
    NamedParamsNull,

    #[error("Field cannot be used as a numeric value: {0}")]
    NumericFieldExpected(String),

    // Value mismatch
    #[error("Unknown sub-field: {0}")]
    UnknownSubField(String),

    #[error("Unknown contains 'As' value: {0}")]
    UnknownContainsAs(String),

    #[error("Invalid ISO 8601 date: {0}")]
    InvalidDate(String),

    #[error("'At' cannot be combined with 'Min' or 'Max': {0}")]
    NamedParamsConflict(String),

    // Invariants
    #[error("Range needs at least one of Min or Max: {0}")]
    RangeBoundsMissing(String),

    #[error("Tuple nesting exceeds maximum depth of {0}")]
    DepthLimitExceeded(usize),
}

impl ParseError {
    /// Stable error code (the variant name)
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

/// Reason a constructed tree has no faithful tuple form
///
/// Returned by `BooleanNode::validate`; a tree that validates decodes back
/// to itself after encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum NodeError {
    #[error("{0} needs at least one operand")]
    EmptyLogical(NodeTypeId),

    #[error("If needs at least one true arm")]
    IfWithoutTrueArm,

    #[error("Number is not finite: {0}")]
    NonFiniteNumber(String),

    #[error("{node} cannot match field {field}")]
    FieldTypeMismatch { node: NodeTypeId, field: FieldId },

    #[error("Field cannot be used as a numeric value: {0}")]
    FieldNotComparable(FieldId),

    #[error("Boolean field {0} is matched with BooleanFieldEquals, not FieldHasValue")]
    BooleanFieldHasValue(FieldId),

    #[error("Date outside years 0000-9999: {0}")]
    DateOutOfRange(String),

    #[error("Tuple nesting exceeds maximum depth of {0}")]
    DepthLimitExceeded(usize),
}

impl NodeError {
    /// Stable error code (the variant name)
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

/// A failed decode together with the trace collected up to the failure
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{error} ({} tuple node(s) visited, failed at depth {})", .progress.len(), .progress.depth())]
pub struct DecodeFailure {
    pub error: ParseError,
    pub progress: ParseProgress,
}

/// Main error type for the scan criteria engine
#[derive(Error, Debug)]
pub enum CriteriaError {
    #[error("Invalid criteria: {0}")]
    Decode(#[from] DecodeFailure),

    #[error("Invalid criteria JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for the scan criteria engine
pub type Result<T> = std::result::Result<T, CriteriaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_variant_name() {
        assert_eq!(ParseError::EmptyTuple.code(), "EmptyTuple");
        assert_eq!(
            ParseError::UnknownSubField("price: Dividend".to_string()).code(),
            "UnknownSubField"
        );
        assert_eq!(ParseError::DepthLimitExceeded(8).code(), "DepthLimitExceeded");
    }

    #[test]
    fn test_message_carries_value() {
        let err = ParseError::NumberExpected("\"abc\"".to_string());
        assert_eq!(err.to_string(), "Expected a number: \"abc\"");
    }

    #[test]
    fn test_decode_failure_wraps_into_criteria_error() {
        let failure = DecodeFailure {
            error: ParseError::EmptyTuple,
            progress: ParseProgress::new(),
        };
        let err: CriteriaError = failure.into();
        assert!(matches!(err, CriteriaError::Decode(_)));
        assert!(err.to_string().starts_with("Invalid criteria: Tuple node is empty"));
    }
}
