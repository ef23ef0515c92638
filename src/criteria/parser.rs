//! Tuple node decoder
//!
//! Recursive descent over a `serde_json::Value` tuple tree. Every malformed
//! shape yields a distinct [`ParseError`]; the [`ParseProgress`] trace built
//! along the way is returned with the node or with the error.

use crate::criteria::ast::{
    BooleanNode, NumericIf, NumericIfArm, NumericNode, NumericOperand, OperandPair, Range,
    TextContains, TextContainsAs,
};
use crate::criteria::progress::ParseProgress;
use crate::criteria::tuple::{
    self, BooleanTag, NumericTag, AS_KEY, AT_KEY, IGNORE_CASE_KEY, MAX_KEY, MAX_MATCHING_PARAMS,
    MIN_KEY,
};
use crate::error::{DecodeFailure, ParseError, Result};
use crate::field::{try_parse_matching_field, FieldDataType, FieldId, SubField};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Default maximum tuple nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default equals-target of a bare boolean field reference
pub const DEFAULT_BOOLEAN_FIELD_TARGET: bool = true;

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Outcome of a decode call: the node and trace, or the failure and trace
pub type DecodeResult<T> = std::result::Result<Parsed<T>, DecodeFailure>;

/// Decode-time options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tuple nodes nested deeper than this are rejected
    pub max_depth: usize,
    /// Target used when a boolean field appears without parameters
    pub boolean_field_default: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            boolean_field_default: DEFAULT_BOOLEAN_FIELD_TARGET,
        }
    }
}

/// Successfully decoded node with its trace
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub node: T,
    pub progress: ParseProgress,
}

/// Decode a boolean tuple node with default options
pub fn parse_boolean(value: &Value) -> DecodeResult<BooleanNode> {
    parse_boolean_with(value, &ParseOptions::default())
}

/// Decode a boolean tuple node
pub fn parse_boolean_with(value: &Value, options: &ParseOptions) -> DecodeResult<BooleanNode> {
    let mut parser = Parser::new(options);
    let result = parser.boolean_tuple(value);
    parser.finish(result)
}

/// Decode criteria held as JSON text
pub fn parse_criteria_text(text: &str) -> Result<BooleanNode> {
    parse_criteria_text_with(text, &ParseOptions::default())
}

pub fn parse_criteria_text_with(text: &str, options: &ParseOptions) -> Result<BooleanNode> {
    let value: Value = serde_json::from_str(text)?;
    Ok(parse_boolean_with(&value, options)?.node)
}

/// Decode a standalone numeric parameter (number, field name or tuple node)
pub fn parse_numeric_with(value: &Value, options: &ParseOptions) -> DecodeResult<NumericOperand> {
    let mut parser = Parser::new(options);
    let result = parser.numeric_param(value);
    parser.finish(result)
}

struct Parser<'o> {
    options: &'o ParseOptions,
    progress: ParseProgress,
}

/// Parameters of a matching tuple node once the field is resolved
enum BoundMatch<T> {
    Equals(T),
    InRange(Range<T>),
}

impl<'o> Parser<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            progress: ParseProgress::new(),
        }
    }

    fn finish<T>(self, result: ParseResult<T>) -> DecodeResult<T> {
        match result {
            Ok(node) => Ok(Parsed {
                node,
                progress: self.progress,
            }),
            Err(error) => {
                tracing::debug!(
                    code = error.code(),
                    depth = self.progress.depth(),
                    visited = self.progress.len(),
                    "criteria decode failed: {}",
                    error
                );
                Err(DecodeFailure {
                    error,
                    progress: self.progress,
                })
            }
        }
    }

    /// Split a tuple node into discriminator and parameters and record entry
    fn enter<'v>(&mut self, value: &'v Value) -> ParseResult<(&'v str, &'v [Value], usize)> {
        let Value::Array(items) = value else {
            return Err(ParseError::NotAnArray(value.to_string()));
        };
        let Some((first, params)) = items.split_first() else {
            return Err(ParseError::EmptyTuple);
        };
        let Value::String(discriminator) = first else {
            return Err(ParseError::DiscriminatorNotString(first.to_string()));
        };

        let index = self.progress.enter(discriminator);
        if self.progress.depth() > self.options.max_depth {
            return Err(ParseError::DepthLimitExceeded(self.options.max_depth));
        }
        Ok((discriminator.as_str(), params, index))
    }

    // ------------------------------------------------------------------
    // Boolean
    // ------------------------------------------------------------------

    fn boolean_tuple(&mut self, value: &Value) -> ParseResult<BooleanNode> {
        let (discriminator, params, index) = self.enter(value)?;

        let node = match tuple::boolean_tag(discriminator) {
            Some(tag) => self.boolean_node(tag, discriminator, params)?,
            None => match try_parse_matching_field(discriminator) {
                Some(field) => self.matching(field, params)?,
                None => {
                    return Err(ParseError::UnknownBooleanDiscriminator(
                        discriminator.to_owned(),
                    ))
                }
            },
        };

        self.progress.exit(index, node.node_type());
        Ok(node)
    }

    /// A boolean position: a tuple node or a bare field name
    fn boolean_param(&mut self, value: &Value) -> ParseResult<BooleanNode> {
        match value {
            Value::Array(_) => self.boolean_tuple(value),
            Value::String(name) => match try_parse_matching_field(name) {
                Some(field) => Ok(self.field_has_value(field)),
                None => Err(ParseError::UnknownFieldReference(name.clone())),
            },
            other => Err(ParseError::BooleanParamInvalid(other.to_string())),
        }
    }

    fn boolean_node(
        &mut self,
        tag: BooleanTag,
        discriminator: &str,
        params: &[Value],
    ) -> ParseResult<BooleanNode> {
        match tag {
            BooleanTag::All | BooleanTag::None => {
                if !params.is_empty() {
                    return Err(ParseError::NoParamsExpected(count_text(
                        discriminator,
                        params,
                    )));
                }
                Ok(if tag == BooleanTag::All {
                    BooleanNode::All
                } else {
                    BooleanNode::None
                })
            }
            BooleanTag::Not => match params {
                [operand] => Ok(BooleanNode::Not(Box::new(self.boolean_param(operand)?))),
                _ => Err(ParseError::NotParamCount(count_text(discriminator, params))),
            },
            BooleanTag::And | BooleanTag::Or => {
                if params.is_empty() {
                    return Err(ParseError::LogicalOperandsMissing(
                        discriminator.to_owned(),
                    ));
                }
                let operands = params
                    .iter()
                    .map(|param| self.boolean_param(param))
                    .collect::<ParseResult<Vec<_>>>()?;
                Ok(if tag == BooleanTag::And {
                    BooleanNode::And(operands)
                } else {
                    BooleanNode::Or(operands)
                })
            }
            BooleanTag::Comparison(op) => match params {
                [left, right] => {
                    let left = self.numeric_param(left)?;
                    let right = self.numeric_param(right)?;
                    Ok(op.build(OperandPair { left, right }))
                }
                _ => Err(ParseError::ComparisonParamCount(count_text(
                    discriminator,
                    params,
                ))),
            },
        }
    }

    // ------------------------------------------------------------------
    // Numeric
    // ------------------------------------------------------------------

    /// A numeric position: a literal, a bare field name or a tuple node
    fn numeric_param(&mut self, value: &Value) -> ParseResult<NumericOperand> {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(NumericOperand::Literal)
                .ok_or_else(|| ParseError::NumberExpected(number.to_string())),
            Value::String(name) => {
                let field = numeric_field(name)?;
                Ok(NumericOperand::field(field))
            }
            Value::Array(_) => Ok(NumericOperand::node(self.numeric_tuple(value)?)),
            other => Err(ParseError::NumericParamInvalid(other.to_string())),
        }
    }

    fn numeric_tuple(&mut self, value: &Value) -> ParseResult<NumericNode> {
        let (discriminator, params, index) = self.enter(value)?;

        let node = match tuple::numeric_tag(discriminator) {
            Some(NumericTag::Unary(op)) => match params {
                [operand] => op.build(self.numeric_param(operand)?),
                _ => {
                    return Err(ParseError::UnaryParamCount(count_text(
                        discriminator,
                        params,
                    )))
                }
            },
            Some(NumericTag::Binary(op)) => match params {
                [left, right] => op.build(self.operand_pair(left, right)?),
                _ => {
                    return Err(ParseError::BinaryParamCount(count_text(
                        discriminator,
                        params,
                    )))
                }
            },
            Some(NumericTag::UnaryOrBinary { unary, binary }) => match params {
                [operand] => unary.build(self.numeric_param(operand)?),
                [left, right] => binary.build(self.operand_pair(left, right)?),
                _ => {
                    return Err(ParseError::UnaryOrBinaryParamCount(count_text(
                        discriminator,
                        params,
                    )))
                }
            },
            Some(NumericTag::If) => NumericNode::If(self.numeric_if(params)?),
            None => {
                if try_parse_matching_field(discriminator).is_none() {
                    return Err(ParseError::UnknownNumericDiscriminator(
                        discriminator.to_owned(),
                    ));
                }
                let field = numeric_field(discriminator)?;
                if !params.is_empty() {
                    return Err(ParseError::FieldValueGetParamCount(count_text(
                        discriminator,
                        params,
                    )));
                }
                NumericNode::FieldValueGet(field)
            }
        };

        self.progress.exit(index, node.node_type());
        Ok(node)
    }

    fn operand_pair(&mut self, left: &Value, right: &Value) -> ParseResult<OperandPair> {
        let left = self.numeric_param(left)?;
        let right = self.numeric_param(right)?;
        Ok(OperandPair { left, right })
    }

    /// `params` alternate condition and value; the last pair is the false arm
    fn numeric_if(&mut self, params: &[Value]) -> ParseResult<NumericIf> {
        if params.len() < 4 || params.len() % 2 != 0 {
            return Err(ParseError::IfArmCount(format!(
                "{}: {} parameters",
                tuple::IF,
                params.len()
            )));
        }

        let (true_params, false_params) = params.split_at(params.len() - 2);
        let true_arms = true_params
            .chunks_exact(2)
            .map(|pair| self.numeric_if_arm(&pair[0], &pair[1]))
            .collect::<ParseResult<Vec<_>>>()?;
        let false_arm = self.numeric_if_arm(&false_params[0], &false_params[1])?;
        Ok(NumericIf {
            true_arms,
            false_arm,
        })
    }

    fn numeric_if_arm(&mut self, condition: &Value, value: &Value) -> ParseResult<NumericIfArm> {
        let condition = self.boolean_param(condition)?;
        let value = self.numeric_param(value)?;
        Ok(NumericIfArm { condition, value })
    }

    // ------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------

    fn field_has_value(&self, field: FieldId) -> BooleanNode {
        if field.data_type() == FieldDataType::Boolean {
            BooleanNode::BooleanFieldEquals {
                field,
                target: self.options.boolean_field_default,
            }
        } else {
            BooleanNode::FieldHasValue(field)
        }
    }

    /// Dispatch a field predicate by field shape and parameter count
    fn matching(&self, field: FieldId, params: &[Value]) -> ParseResult<BooleanNode> {
        if params.len() > MAX_MATCHING_PARAMS {
            return Err(ParseError::MatchingParamCountExceeded(count_text(
                field.matching_field_name(),
                params,
            )));
        }
        let Some((first, rest)) = params.split_first() else {
            return Ok(self.field_has_value(field));
        };
        if field.is_subbed() {
            return sub_field_matching(field, first, rest);
        }

        let name = field.matching_field_name();
        match field.data_type() {
            FieldDataType::Boolean => match params {
                [target] => Ok(BooleanNode::BooleanFieldEquals {
                    field,
                    target: boolean_value(target)?,
                }),
                _ => Err(ParseError::BooleanFieldParamCount(count_text(name, params))),
            },
            FieldDataType::Numeric => {
                match bound_match::<f64>(name, params, ParseError::RangeFieldParamCount)? {
                    BoundMatch::Equals(target) => {
                        Ok(BooleanNode::NumericFieldEquals { field, target })
                    }
                    BoundMatch::InRange(range) => {
                        Ok(BooleanNode::NumericFieldInRange { field, range })
                    }
                }
            }
            FieldDataType::Date => {
                match bound_match::<NaiveDate>(name, params, ParseError::RangeFieldParamCount)? {
                    BoundMatch::Equals(target) => {
                        Ok(BooleanNode::DateFieldEquals { field, target })
                    }
                    BoundMatch::InRange(range) => {
                        Ok(BooleanNode::DateFieldInRange { field, range })
                    }
                }
            }
            FieldDataType::Text => Ok(BooleanNode::TextFieldContains {
                field,
                contains: text_contains(name, params, ParseError::TextFieldParamCount)?,
            }),
        }
    }
}

/// Matching on a sub-fielded field; the first parameter names the sub-field
fn sub_field_matching(
    field: FieldId,
    sub_field_param: &Value,
    rest: &[Value],
) -> ParseResult<BooleanNode> {
    let Value::String(sub_field_name) = sub_field_param else {
        return Err(ParseError::SubFieldNotString(format!(
            "{field}: {sub_field_param}"
        )));
    };
    let sub_field = SubField::parse(field, sub_field_name)
        .ok_or_else(|| ParseError::UnknownSubField(format!("{field}: {sub_field_name}")))?;

    if rest.is_empty() {
        return Ok(BooleanNode::SubFieldHasValue(sub_field));
    }

    let context = format!("{field} {sub_field_name}");
    match sub_field {
        SubField::Price(sub_field) => {
            match bound_match::<f64>(&context, rest, ParseError::SubFieldRangeParamCount)? {
                BoundMatch::Equals(target) => {
                    Ok(BooleanNode::PriceSubFieldEquals { sub_field, target })
                }
                BoundMatch::InRange(range) => {
                    Ok(BooleanNode::PriceSubFieldInRange { sub_field, range })
                }
            }
        }
        SubField::Date(sub_field) => {
            match bound_match::<NaiveDate>(&context, rest, ParseError::SubFieldRangeParamCount)? {
                BoundMatch::Equals(target) => {
                    Ok(BooleanNode::DateSubFieldEquals { sub_field, target })
                }
                BoundMatch::InRange(range) => {
                    Ok(BooleanNode::DateSubFieldInRange { sub_field, range })
                }
            }
        }
        SubField::AltCode(sub_field) => Ok(BooleanNode::AltCodeSubFieldContains {
            sub_field,
            contains: text_contains(&context, rest, ParseError::TextFieldParamCount)?,
        }),
        SubField::Attribute(sub_field) => Ok(BooleanNode::AttributeSubFieldContains {
            sub_field,
            contains: text_contains(&context, rest, ParseError::TextFieldParamCount)?,
        }),
    }
}

/// A scalar bound type usable in equals and range matches
trait WireScalar: Copy + Sized {
    fn from_wire(value: &Value) -> ParseResult<Self>;
}

impl WireScalar for f64 {
    fn from_wire(value: &Value) -> ParseResult<Self> {
        value
            .as_f64()
            .ok_or_else(|| ParseError::NumberExpected(value.to_string()))
    }
}

impl WireScalar for NaiveDate {
    fn from_wire(value: &Value) -> ParseResult<Self> {
        let Value::String(text) = value else {
            return Err(ParseError::DateTextExpected(value.to_string()));
        };
        parse_date(text)
    }
}

/// Calendar date from `YYYY-MM-DD` or an RFC 3339 date-time
fn parse_date(text: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|date_time| date_time.date_naive()))
        .map_err(|_| ParseError::InvalidDate(text.to_owned()))
}

/// One param: a scalar target or named `At`/`Min`/`Max`.
/// Two params: positional min and max, `null` meaning absent.
fn bound_match<T: WireScalar>(
    context: &str,
    params: &[Value],
    arity_error: fn(String) -> ParseError,
) -> ParseResult<BoundMatch<T>> {
    match params {
        [Value::Object(named)] => named_bounds(context, named),
        [Value::Null] => Err(ParseError::NamedParamsNull),
        [list @ Value::Array(_)] => Err(ParseError::NamedParamsNotObject(list.to_string())),
        [target] => Ok(BoundMatch::Equals(T::from_wire(target)?)),
        [min, max] => {
            let range = Range::new(optional_scalar(min)?, optional_scalar(max)?)
                .ok_or_else(|| ParseError::RangeBoundsMissing(context.to_owned()))?;
            Ok(BoundMatch::InRange(range))
        }
        _ => Err(arity_error(count_text(context, params))),
    }
}

fn named_bounds<T: WireScalar>(
    context: &str,
    named: &Map<String, Value>,
) -> ParseResult<BoundMatch<T>> {
    let at = named_scalar::<T>(named, AT_KEY)?;
    let min = named_scalar::<T>(named, MIN_KEY)?;
    let max = named_scalar::<T>(named, MAX_KEY)?;

    match at {
        Some(at) => {
            if min.is_some() || max.is_some() {
                return Err(ParseError::NamedParamsConflict(context.to_owned()));
            }
            Ok(BoundMatch::Equals(at))
        }
        None => Range::new(min, max)
            .map(BoundMatch::InRange)
            .ok_or_else(|| ParseError::RangeBoundsMissing(context.to_owned())),
    }
}

fn named_scalar<T: WireScalar>(named: &Map<String, Value>, key: &str) -> ParseResult<Option<T>> {
    named.get(key).map_or(Ok(None), optional_scalar)
}

fn optional_scalar<T: WireScalar>(value: &Value) -> ParseResult<Option<T>> {
    match value {
        Value::Null => Ok(None),
        other => T::from_wire(other).map(Some),
    }
}

/// `[value]`, `[value, {As, IgnoreCase}]` or `[value, as, ignoreCase]`
fn text_contains(
    context: &str,
    params: &[Value],
    arity_error: fn(String) -> ParseError,
) -> ParseResult<TextContains> {
    match params {
        [value] => Ok(TextContains::new(text_value(value)?)),
        [value, options] => {
            let value = text_value(value)?;
            let named = match options {
                Value::Object(named) => named,
                Value::Null => return Err(ParseError::NamedParamsNull),
                other => return Err(ParseError::NamedParamsNotObject(other.to_string())),
            };
            let as_id = match named.get(AS_KEY) {
                None | Some(Value::Null) => TextContainsAs::None,
                Some(as_value) => contains_as(as_value)?,
            };
            let ignore_case = match named.get(IGNORE_CASE_KEY) {
                None | Some(Value::Null) => false,
                Some(ignore_case) => boolean_value(ignore_case)?,
            };
            Ok(TextContains::with_options(value, as_id, ignore_case))
        }
        [value, as_value, ignore_case] => Ok(TextContains::with_options(
            text_value(value)?,
            contains_as(as_value)?,
            boolean_value(ignore_case)?,
        )),
        _ => Err(arity_error(count_text(context, params))),
    }
}

fn text_value(value: &Value) -> ParseResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => Err(ParseError::TextExpected(other.to_string())),
    }
}

fn contains_as(value: &Value) -> ParseResult<TextContainsAs> {
    let Value::String(name) = value else {
        return Err(ParseError::ContainsAsNotString(value.to_string()));
    };
    TextContainsAs::try_parse(name).ok_or_else(|| ParseError::UnknownContainsAs(name.clone()))
}

fn boolean_value(value: &Value) -> ParseResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| ParseError::BooleanExpected(value.to_string()))
}

/// Resolve a bare field name used as a numeric value
fn numeric_field(name: &str) -> ParseResult<FieldId> {
    let field = try_parse_matching_field(name)
        .ok_or_else(|| ParseError::UnknownFieldReference(name.to_owned()))?;
    if field.data_type() != FieldDataType::Numeric || !field.is_comparable() {
        return Err(ParseError::NumericFieldExpected(name.to_owned()));
    }
    Ok(field)
}

fn count_text(context: &str, params: &[Value]) -> String {
    format!("{context}: {} parameters", params.len())
}
