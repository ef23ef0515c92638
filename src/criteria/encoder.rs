//! AST to tuple node encoder
//!
//! Encoding never fails and every tree has exactly one canonical tuple form.
//! Only trees that pass [`BooleanNode::validate`] decode back unchanged;
//! an empty `And` or a NaN literal, say, is written but rejected on decode.

use crate::criteria::ast::{
    BooleanNode, NumericIf, NumericNode, NumericOperand, OperandPair, Range, TextContains,
};
use crate::criteria::tuple::{
    self, BinaryOp, ComparisonOp, UnaryOp, AS_KEY, IGNORE_CASE_KEY, MAX_KEY, MIN_KEY,
};
use crate::field::{FieldId, SubField};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Encode a boolean node as a tuple node
pub fn encode_boolean(node: &BooleanNode) -> Value {
    match node {
        BooleanNode::All => tuple_of(tuple::ALL, Vec::new()),
        BooleanNode::None => tuple_of(tuple::NONE, Vec::new()),
        BooleanNode::Not(operand) => tuple_of(tuple::NOT, vec![encode_boolean(operand)]),
        BooleanNode::And(operands) => {
            tuple_of(tuple::AND, operands.iter().map(encode_boolean).collect())
        }
        BooleanNode::Or(operands) => {
            tuple_of(tuple::OR, operands.iter().map(encode_boolean).collect())
        }

        BooleanNode::Equals(pair) => encode_comparison(ComparisonOp::Equals, pair),
        BooleanNode::GreaterThan(pair) => encode_comparison(ComparisonOp::GreaterThan, pair),
        BooleanNode::GreaterThanOrEqual(pair) => {
            encode_comparison(ComparisonOp::GreaterThanOrEqual, pair)
        }
        BooleanNode::LessThan(pair) => encode_comparison(ComparisonOp::LessThan, pair),
        BooleanNode::LessThanOrEqual(pair) => {
            encode_comparison(ComparisonOp::LessThanOrEqual, pair)
        }

        BooleanNode::FieldHasValue(field) => field_tuple(*field, Vec::new()),
        BooleanNode::BooleanFieldEquals { field, target } => {
            field_tuple(*field, vec![Value::Bool(*target)])
        }
        BooleanNode::NumericFieldEquals { field, target } => {
            field_tuple(*field, vec![tuple::number_value(*target)])
        }
        BooleanNode::NumericFieldInRange { field, range } => {
            field_tuple(*field, vec![range_params(range, |n| tuple::number_value(*n))])
        }
        BooleanNode::DateFieldEquals { field, target } => {
            field_tuple(*field, vec![date_value(target)])
        }
        BooleanNode::DateFieldInRange { field, range } => {
            field_tuple(*field, vec![range_params(range, date_value)])
        }
        BooleanNode::TextFieldContains { field, contains } => {
            field_tuple(*field, contains_params(contains))
        }

        BooleanNode::SubFieldHasValue(sub_field) => sub_field_tuple(*sub_field, Vec::new()),
        BooleanNode::PriceSubFieldEquals { sub_field, target } => sub_field_tuple(
            SubField::Price(*sub_field),
            vec![tuple::number_value(*target)],
        ),
        BooleanNode::PriceSubFieldInRange { sub_field, range } => sub_field_tuple(
            SubField::Price(*sub_field),
            vec![range_params(range, |n| tuple::number_value(*n))],
        ),
        BooleanNode::DateSubFieldEquals { sub_field, target } => {
            sub_field_tuple(SubField::Date(*sub_field), vec![date_value(target)])
        }
        BooleanNode::DateSubFieldInRange { sub_field, range } => sub_field_tuple(
            SubField::Date(*sub_field),
            vec![range_params(range, date_value)],
        ),
        BooleanNode::AltCodeSubFieldContains {
            sub_field,
            contains,
        } => sub_field_tuple(SubField::AltCode(*sub_field), contains_params(contains)),
        BooleanNode::AttributeSubFieldContains {
            sub_field,
            contains,
        } => sub_field_tuple(SubField::Attribute(*sub_field), contains_params(contains)),
    }
}

/// Encode a numeric parameter.
///
/// Literals become JSON numbers and field value references become bare
/// field names; every other node becomes a tuple node.
pub fn encode_numeric(operand: &NumericOperand) -> Value {
    match operand {
        NumericOperand::Literal(value) => tuple::number_value(*value),
        NumericOperand::Node(node) => encode_numeric_node(node),
    }
}

fn encode_numeric_node(node: &NumericNode) -> Value {
    match node {
        NumericNode::Neg(operand) => encode_unary(UnaryOp::Neg, operand),
        NumericNode::Pos(operand) => encode_unary(UnaryOp::Pos, operand),
        NumericNode::Abs(operand) => encode_unary(UnaryOp::Abs, operand),
        NumericNode::Add(pair) => encode_binary(BinaryOp::Add, pair),
        NumericNode::Sub(pair) => encode_binary(BinaryOp::Sub, pair),
        NumericNode::Mul(pair) => encode_binary(BinaryOp::Mul, pair),
        NumericNode::Div(pair) => encode_binary(BinaryOp::Div, pair),
        NumericNode::Mod(pair) => encode_binary(BinaryOp::Mod, pair),
        NumericNode::FieldValueGet(field) => Value::String(field.matching_field_name().to_owned()),
        NumericNode::If(numeric_if) => encode_if(numeric_if),
    }
}

/// Encode criteria to compact JSON text
pub fn encode_criteria_text(node: &BooleanNode) -> String {
    encode_boolean(node).to_string()
}

fn tuple_of(discriminator: &str, params: Vec<Value>) -> Value {
    let mut items = Vec::with_capacity(params.len() + 1);
    items.push(Value::String(discriminator.to_owned()));
    items.extend(params);
    Value::Array(items)
}

fn encode_comparison(op: ComparisonOp, pair: &OperandPair) -> Value {
    tuple_of(
        op.tag(),
        vec![encode_numeric(&pair.left), encode_numeric(&pair.right)],
    )
}

fn encode_unary(op: UnaryOp, operand: &NumericOperand) -> Value {
    tuple_of(op.tag(), vec![encode_numeric(operand)])
}

fn encode_binary(op: BinaryOp, pair: &OperandPair) -> Value {
    tuple_of(
        op.tag(),
        vec![encode_numeric(&pair.left), encode_numeric(&pair.right)],
    )
}

fn encode_if(numeric_if: &NumericIf) -> Value {
    let mut params = Vec::with_capacity((numeric_if.true_arms.len() + 1) * 2);
    for arm in numeric_if.true_arms.iter().chain(std::iter::once(&numeric_if.false_arm)) {
        params.push(encode_boolean(&arm.condition));
        params.push(encode_numeric(&arm.value));
    }
    tuple_of(tuple::IF, params)
}

fn field_tuple(field: FieldId, params: Vec<Value>) -> Value {
    tuple_of(field.matching_field_name(), params)
}

fn sub_field_tuple(sub_field: SubField, params: Vec<Value>) -> Value {
    let mut all_params = Vec::with_capacity(params.len() + 1);
    all_params.push(Value::String(sub_field.name().to_owned()));
    all_params.extend(params);
    field_tuple(sub_field.field_id(), all_params)
}

fn date_value(date: &NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

fn range_params<T: Copy>(range: &Range<T>, to_value: impl Fn(&T) -> Value) -> Value {
    let mut params = Map::new();
    if let Some(min) = range.min() {
        params.insert(MIN_KEY.to_owned(), to_value(&min));
    }
    if let Some(max) = range.max() {
        params.insert(MAX_KEY.to_owned(), to_value(&max));
    }
    Value::Object(params)
}

fn contains_params(contains: &TextContains) -> Vec<Value> {
    let mut options = Map::new();
    options.insert(
        AS_KEY.to_owned(),
        Value::String(contains.as_id.name().to_owned()),
    );
    options.insert(IGNORE_CASE_KEY.to_owned(), Value::Bool(contains.ignore_case));
    vec![Value::String(contains.value.clone()), Value::Object(options)]
}
