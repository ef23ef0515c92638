//! Field identifiers and their metadata table

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;
use strum::{EnumCount, EnumIter};

/// Data type family of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldDataType {
    Numeric,
    Date,
    Text,
    Boolean,
}

/// Filterable instrument attribute
///
/// Declaration order must match `FIELD_TABLE`; this is checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Serialize)]
pub enum FieldId {
    AltCode,
    Attribute,
    Auction,
    AuctionLast,
    AuctionQuantity,
    BestAskCount,
    BestAskPrice,
    BestAskQuantity,
    BestBidCount,
    BestBidPrice,
    BestBidQuantity,
    Board,
    CallOrPut,
    Category,
    Cfi,
    Class,
    ClosePrice,
    Code,
    ContractSize,
    Currency,
    Data,
    Date,
    Exchange,
    ExerciseType,
    ExpiryDate,
    HighPrice,
    IsIndex,
    LastPrice,
    Leg,
    LotSize,
    LowPrice,
    Market,
    Name,
    OpenInterest,
    OpenPrice,
    PreviousClose,
    Price,
    QuotationBasis,
    Remainder,
    ShareIssue,
    State,
    StateAllows,
    StatusNote,
    StrikePrice,
    Trades,
    TradingMarket,
    ValueTraded,
    Volume,
    Vwap,
}

/// Immutable metadata for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub id: FieldId,
    /// Wire discriminator used in matching tuples and bare references
    pub name: &'static str,
    pub data_type: FieldDataType,
    /// Matching is expressed against a named sub-field
    pub subbed: bool,
    /// May appear as an operand in relational or arithmetic expressions
    pub comparable: bool,
}

const fn numeric(id: FieldId, name: &'static str) -> FieldInfo {
    FieldInfo {
        id,
        name,
        data_type: FieldDataType::Numeric,
        subbed: false,
        comparable: true,
    }
}

const fn date(id: FieldId, name: &'static str) -> FieldInfo {
    FieldInfo {
        id,
        name,
        data_type: FieldDataType::Date,
        subbed: false,
        comparable: false,
    }
}

const fn text(id: FieldId, name: &'static str) -> FieldInfo {
    FieldInfo {
        id,
        name,
        data_type: FieldDataType::Text,
        subbed: false,
        comparable: false,
    }
}

const fn subbed(info: FieldInfo) -> FieldInfo {
    FieldInfo {
        subbed: true,
        comparable: false,
        ..info
    }
}

const FIELD_TABLE: [FieldInfo; FieldId::COUNT] = [
    subbed(text(FieldId::AltCode, "altCode")),
    subbed(text(FieldId::Attribute, "attribute")),
    numeric(FieldId::Auction, "auction"),
    numeric(FieldId::AuctionLast, "auctionLast"),
    numeric(FieldId::AuctionQuantity, "auctionQuantity"),
    numeric(FieldId::BestAskCount, "bestAskCount"),
    numeric(FieldId::BestAskPrice, "bestAskPrice"),
    numeric(FieldId::BestAskQuantity, "bestAskQuantity"),
    numeric(FieldId::BestBidCount, "bestBidCount"),
    numeric(FieldId::BestBidPrice, "bestBidPrice"),
    numeric(FieldId::BestBidQuantity, "bestBidQuantity"),
    text(FieldId::Board, "board"),
    text(FieldId::CallOrPut, "callOrPut"),
    text(FieldId::Category, "category"),
    text(FieldId::Cfi, "cfi"),
    text(FieldId::Class, "class"),
    numeric(FieldId::ClosePrice, "closePrice"),
    text(FieldId::Code, "code"),
    numeric(FieldId::ContractSize, "contractSize"),
    text(FieldId::Currency, "currency"),
    text(FieldId::Data, "data"),
    subbed(date(FieldId::Date, "date")),
    text(FieldId::Exchange, "exchange"),
    text(FieldId::ExerciseType, "exerciseType"),
    date(FieldId::ExpiryDate, "expiryDate"),
    numeric(FieldId::HighPrice, "highPrice"),
    FieldInfo {
        id: FieldId::IsIndex,
        name: "isIndex",
        data_type: FieldDataType::Boolean,
        subbed: false,
        comparable: false,
    },
    numeric(FieldId::LastPrice, "lastPrice"),
    text(FieldId::Leg, "leg"),
    numeric(FieldId::LotSize, "lotSize"),
    numeric(FieldId::LowPrice, "lowPrice"),
    text(FieldId::Market, "market"),
    text(FieldId::Name, "name"),
    numeric(FieldId::OpenInterest, "openInterest"),
    numeric(FieldId::OpenPrice, "openPrice"),
    numeric(FieldId::PreviousClose, "previousClose"),
    subbed(numeric(FieldId::Price, "price")),
    text(FieldId::QuotationBasis, "quotationBasis"),
    numeric(FieldId::Remainder, "remainder"),
    numeric(FieldId::ShareIssue, "shareIssue"),
    text(FieldId::State, "state"),
    text(FieldId::StateAllows, "stateAllows"),
    text(FieldId::StatusNote, "statusNote"),
    numeric(FieldId::StrikePrice, "strikePrice"),
    numeric(FieldId::Trades, "trades"),
    text(FieldId::TradingMarket, "tradingMarket"),
    numeric(FieldId::ValueTraded, "valueTraded"),
    numeric(FieldId::Volume, "volume"),
    numeric(FieldId::Vwap, "vwap"),
];

// Table rows must be declared in enum order so lookups can index by discriminant.
const _: () = {
    let mut i = 0;
    while i < FIELD_TABLE.len() {
        assert!(
            FIELD_TABLE[i].id as usize == i,
            "FIELD_TABLE is out of order with FieldId"
        );
        i += 1;
    }
};

static FIELD_INFOS: [FieldInfo; FieldId::COUNT] = FIELD_TABLE;

fn family_map(data_type: FieldDataType) -> AHashMap<&'static str, FieldId> {
    FIELD_INFOS
        .iter()
        .filter(|info| info.data_type == data_type)
        .map(|info| (info.name, info.id))
        .collect()
}

static NUMERIC_FIELDS: Lazy<AHashMap<&'static str, FieldId>> =
    Lazy::new(|| family_map(FieldDataType::Numeric));
static DATE_FIELDS: Lazy<AHashMap<&'static str, FieldId>> =
    Lazy::new(|| family_map(FieldDataType::Date));
static TEXT_FIELDS: Lazy<AHashMap<&'static str, FieldId>> =
    Lazy::new(|| family_map(FieldDataType::Text));
static BOOLEAN_FIELDS: Lazy<AHashMap<&'static str, FieldId>> =
    Lazy::new(|| family_map(FieldDataType::Boolean));

impl FieldId {
    /// Metadata row for this field
    #[inline]
    pub fn info(self) -> &'static FieldInfo {
        &FIELD_INFOS[self as usize]
    }

    #[inline]
    pub fn data_type(self) -> FieldDataType {
        self.info().data_type
    }

    #[inline]
    pub fn is_subbed(self) -> bool {
        self.info().subbed
    }

    #[inline]
    pub fn is_comparable(self) -> bool {
        self.info().comparable
    }

    /// Wire discriminator for this field
    #[inline]
    pub fn matching_field_name(self) -> &'static str {
        self.info().name
    }

    /// All fields, in declaration order
    pub fn all() -> impl Iterator<Item = FieldId> {
        FIELD_INFOS.iter().map(|info| info.id)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.matching_field_name())
    }
}

pub fn try_parse_numeric_field(name: &str) -> Option<FieldId> {
    NUMERIC_FIELDS.get(name).copied()
}

pub fn try_parse_date_field(name: &str) -> Option<FieldId> {
    DATE_FIELDS.get(name).copied()
}

pub fn try_parse_text_field(name: &str) -> Option<FieldId> {
    TEXT_FIELDS.get(name).copied()
}

pub fn try_parse_boolean_field(name: &str) -> Option<FieldId> {
    BOOLEAN_FIELDS.get(name).copied()
}

/// Resolve a wire discriminator to a field, trying numeric, text, date and
/// boolean names in that order
pub fn try_parse_matching_field(name: &str) -> Option<FieldId> {
    try_parse_numeric_field(name)
        .or_else(|| try_parse_text_field(name))
        .or_else(|| try_parse_date_field(name))
        .or_else(|| try_parse_boolean_field(name))
}
