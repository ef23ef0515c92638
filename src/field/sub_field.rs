//! Sub-field enumerations scoped to the sub-fielded fields

use crate::field::FieldId;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Named components of [`FieldId::Price`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Display)]
pub enum PriceSubFieldId {
    Last,
}

/// Named components of [`FieldId::Date`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Display)]
pub enum DateSubFieldId {
    Dividend,
}

/// Named components of [`FieldId::AltCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Display)]
pub enum AltCodeSubFieldId {
    Ticker,
    Isin,
    Base,
    Gics,
    Ric,
    Short,
    Long,
    Uid,
}

/// Named components of [`FieldId::Attribute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Display)]
pub enum AttributeSubFieldId {
    Category,
    Class,
    Delivery,
    MaxRss,
    Sector,
    Short,
    ShortSuspended,
    SubSector,
}

/// A sub-field together with its owning field.
///
/// Cross-field combinations (a date sub-field under `price`, say) cannot be
/// represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubField {
    Price(PriceSubFieldId),
    Date(DateSubFieldId),
    AltCode(AltCodeSubFieldId),
    Attribute(AttributeSubFieldId),
}

impl SubField {
    /// The sub-fielded field owning this sub-field
    pub const fn field_id(self) -> FieldId {
        match self {
            SubField::Price(_) => FieldId::Price,
            SubField::Date(_) => FieldId::Date,
            SubField::AltCode(_) => FieldId::AltCode,
            SubField::Attribute(_) => FieldId::Attribute,
        }
    }

    /// Wire name of the sub-field (without its field)
    pub fn name(self) -> &'static str {
        match self {
            SubField::Price(id) => id.into(),
            SubField::Date(id) => id.into(),
            SubField::AltCode(id) => id.into(),
            SubField::Attribute(id) => id.into(),
        }
    }

    /// Resolve `name` within the sub-field namespace of `field`.
    ///
    /// Returns `None` when `field` is not sub-fielded or `name` is not one of
    /// its sub-fields.
    pub fn parse(field: FieldId, name: &str) -> Option<SubField> {
        match field {
            FieldId::Price => PriceSubFieldId::from_str(name).ok().map(SubField::Price),
            FieldId::Date => DateSubFieldId::from_str(name).ok().map(SubField::Date),
            FieldId::AltCode => AltCodeSubFieldId::from_str(name).ok().map(SubField::AltCode),
            FieldId::Attribute => AttributeSubFieldId::from_str(name)
                .ok()
                .map(SubField::Attribute),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_scoped_to_field() {
        assert_eq!(
            SubField::parse(FieldId::Price, "Last"),
            Some(SubField::Price(PriceSubFieldId::Last))
        );
        assert_eq!(SubField::parse(FieldId::Price, "Dividend"), None);
        assert_eq!(SubField::parse(FieldId::Date, "Last"), None);
        assert_eq!(SubField::parse(FieldId::LastPrice, "Last"), None);
    }

    #[test]
    fn test_short_exists_in_both_namespaces() {
        assert_eq!(
            SubField::parse(FieldId::AltCode, "Short"),
            Some(SubField::AltCode(AltCodeSubFieldId::Short))
        );
        assert_eq!(
            SubField::parse(FieldId::Attribute, "Short"),
            Some(SubField::Attribute(AttributeSubFieldId::Short))
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(SubField::parse(FieldId::AltCode, "ticker"), None);
        assert_eq!(SubField::parse(FieldId::Attribute, "MaxRss").map(SubField::name), Some("MaxRss"));
    }

    #[test]
    fn test_name_round_trip() {
        for id in AltCodeSubFieldId::iter() {
            let sub = SubField::AltCode(id);
            assert_eq!(SubField::parse(sub.field_id(), sub.name()), Some(sub));
        }
        for id in AttributeSubFieldId::iter() {
            let sub = SubField::Attribute(id);
            assert_eq!(SubField::parse(sub.field_id(), sub.name()), Some(sub));
        }
    }

    #[test]
    fn test_owning_fields_are_subbed() {
        let subs = [
            SubField::Price(PriceSubFieldId::Last),
            SubField::Date(DateSubFieldId::Dividend),
            SubField::AltCode(AltCodeSubFieldId::Isin),
            SubField::Attribute(AttributeSubFieldId::Sector),
        ];
        for sub in subs {
            assert!(sub.field_id().is_subbed());
        }
    }
}
