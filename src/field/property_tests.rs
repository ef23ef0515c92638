//! Property tests for the field taxonomy
//!
//! Property: wire names and field identifiers form a bijection, and every
//! lookup agrees with the field's metadata.

use proptest::prelude::*;
use proptest::sample::select;
use strum::IntoEnumIterator;

use crate::field::{
    try_parse_boolean_field, try_parse_date_field, try_parse_matching_field,
    try_parse_numeric_field, try_parse_text_field, AltCodeSubFieldId, AttributeSubFieldId,
    DateSubFieldId, FieldDataType, FieldId, PriceSubFieldId, SubField,
};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators
// ═══════════════════════════════════════════════════════════════════════════

fn field_strategy() -> impl Strategy<Value = FieldId> {
    select(FieldId::all().collect::<Vec<_>>())
}

fn sub_field_strategy() -> impl Strategy<Value = SubField> {
    let mut all: Vec<SubField> = PriceSubFieldId::iter().map(SubField::Price).collect();
    all.extend(DateSubFieldId::iter().map(SubField::Date));
    all.extend(AltCodeSubFieldId::iter().map(SubField::AltCode));
    all.extend(AttributeSubFieldId::iter().map(SubField::Attribute));
    select(all)
}

// ═══════════════════════════════════════════════════════════════════════════
// Property tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Name then lookup returns the same field
    #[test]
    fn prop_name_lookup_round_trip(field in field_strategy()) {
        let name = field.matching_field_name();
        prop_assert_eq!(try_parse_matching_field(name), Some(field));
    }

    /// Exactly one family lookup resolves a name, and it matches the data type
    #[test]
    fn prop_single_family_per_name(field in field_strategy()) {
        let name = field.matching_field_name();
        let hits = [
            (FieldDataType::Numeric, try_parse_numeric_field(name)),
            (FieldDataType::Date, try_parse_date_field(name)),
            (FieldDataType::Text, try_parse_text_field(name)),
            (FieldDataType::Boolean, try_parse_boolean_field(name)),
        ];
        let resolved: Vec<_> = hits.iter().filter(|(_, hit)| hit.is_some()).collect();
        prop_assert_eq!(resolved.len(), 1);
        prop_assert_eq!(resolved[0].0, field.data_type());
    }

    /// Comparable fields are never sub-fielded
    #[test]
    fn prop_comparable_excludes_subbed(field in field_strategy()) {
        prop_assert!(!(field.is_comparable() && field.is_subbed()));
    }

    /// A sub-field resolves only under its own field
    #[test]
    fn prop_sub_field_scoped(sub_field in sub_field_strategy(), field in field_strategy()) {
        let parsed = SubField::parse(field, sub_field.name());
        if field == sub_field.field_id() {
            prop_assert_eq!(parsed, Some(sub_field));
        } else if let Some(other) = parsed {
            // Sub-field names may repeat across fields ("Short")
            prop_assert_eq!(other.field_id(), field);
        }
    }

    /// Names outside the catalog never resolve
    #[test]
    fn prop_unknown_names_rejected(name in "[A-Z][a-zA-Z]{0,12}") {
        prop_assert_eq!(try_parse_matching_field(&name), None);
    }
}
