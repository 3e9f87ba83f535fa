//! XSD built-in types
//!
//! The closed set of built-in simple types a resolved node may end up with,
//! grouped into the coarse categories code generators map onto target types.

use std::fmt;

/// Broad value category of a built-in type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Character data
    String,
    /// Whole numbers
    Integer,
    /// Arbitrary precision decimals
    Decimal,
    /// Binary floating point
    Float,
    /// true/false
    Boolean,
    /// Dates, times and durations
    Temporal,
    /// Unconstrained
    Any,
}

/// An XSD built-in simple type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BuiltinType {
    String,
    NormalizedString,
    Token,
    Language,
    Name,
    NcName,
    QName,
    Id,
    IdRef,
    IdRefs,
    Entity,
    Entities,
    NmToken,
    NmTokens,
    Notation,
    AnyUri,
    Base64Binary,
    HexBinary,
    Boolean,
    Decimal,
    Integer,
    Long,
    Int,
    Short,
    Byte,
    NonNegativeInteger,
    PositiveInteger,
    NonPositiveInteger,
    NegativeInteger,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    Float,
    Double,
    Duration,
    DateTime,
    Time,
    Date,
    GYearMonth,
    GYear,
    GMonthDay,
    GDay,
    GMonth,
    AnySimpleType,
    AnyType,
}

impl BuiltinType {
    /// Every built-in type, in declaration order
    pub const ALL: [BuiltinType; 46] = [
        BuiltinType::String,
        BuiltinType::NormalizedString,
        BuiltinType::Token,
        BuiltinType::Language,
        BuiltinType::Name,
        BuiltinType::NcName,
        BuiltinType::QName,
        BuiltinType::Id,
        BuiltinType::IdRef,
        BuiltinType::IdRefs,
        BuiltinType::Entity,
        BuiltinType::Entities,
        BuiltinType::NmToken,
        BuiltinType::NmTokens,
        BuiltinType::Notation,
        BuiltinType::AnyUri,
        BuiltinType::Base64Binary,
        BuiltinType::HexBinary,
        BuiltinType::Boolean,
        BuiltinType::Decimal,
        BuiltinType::Integer,
        BuiltinType::Long,
        BuiltinType::Int,
        BuiltinType::Short,
        BuiltinType::Byte,
        BuiltinType::NonNegativeInteger,
        BuiltinType::PositiveInteger,
        BuiltinType::NonPositiveInteger,
        BuiltinType::NegativeInteger,
        BuiltinType::UnsignedLong,
        BuiltinType::UnsignedInt,
        BuiltinType::UnsignedShort,
        BuiltinType::UnsignedByte,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::Duration,
        BuiltinType::DateTime,
        BuiltinType::Time,
        BuiltinType::Date,
        BuiltinType::GYearMonth,
        BuiltinType::GYear,
        BuiltinType::GMonthDay,
        BuiltinType::GDay,
        BuiltinType::GMonth,
        BuiltinType::AnySimpleType,
        BuiltinType::AnyType,
    ];

    /// Map an unprefixed XSD type name to the built-in type
    pub fn from_local_name(local_name: &str) -> Option<Self> {
        let t = match local_name {
            "string" => BuiltinType::String,
            "normalizedString" => BuiltinType::NormalizedString,
            "token" => BuiltinType::Token,
            "language" => BuiltinType::Language,
            "Name" => BuiltinType::Name,
            "NCName" => BuiltinType::NcName,
            "QName" => BuiltinType::QName,
            "ID" => BuiltinType::Id,
            "IDREF" => BuiltinType::IdRef,
            "IDREFS" => BuiltinType::IdRefs,
            "ENTITY" => BuiltinType::Entity,
            "ENTITIES" => BuiltinType::Entities,
            "NMTOKEN" => BuiltinType::NmToken,
            "NMTOKENS" => BuiltinType::NmTokens,
            "NOTATION" => BuiltinType::Notation,
            "anyURI" => BuiltinType::AnyUri,
            "base64Binary" => BuiltinType::Base64Binary,
            "hexBinary" => BuiltinType::HexBinary,
            "boolean" => BuiltinType::Boolean,
            "decimal" => BuiltinType::Decimal,
            "integer" => BuiltinType::Integer,
            "long" => BuiltinType::Long,
            "int" => BuiltinType::Int,
            "short" => BuiltinType::Short,
            "byte" => BuiltinType::Byte,
            "nonNegativeInteger" => BuiltinType::NonNegativeInteger,
            "positiveInteger" => BuiltinType::PositiveInteger,
            "nonPositiveInteger" => BuiltinType::NonPositiveInteger,
            "negativeInteger" => BuiltinType::NegativeInteger,
            "unsignedLong" => BuiltinType::UnsignedLong,
            "unsignedInt" => BuiltinType::UnsignedInt,
            "unsignedShort" => BuiltinType::UnsignedShort,
            "unsignedByte" => BuiltinType::UnsignedByte,
            "float" => BuiltinType::Float,
            "double" => BuiltinType::Double,
            "duration" => BuiltinType::Duration,
            "dateTime" => BuiltinType::DateTime,
            "time" => BuiltinType::Time,
            "date" => BuiltinType::Date,
            "gYearMonth" => BuiltinType::GYearMonth,
            "gYear" => BuiltinType::GYear,
            "gMonthDay" => BuiltinType::GMonthDay,
            "gDay" => BuiltinType::GDay,
            "gMonth" => BuiltinType::GMonth,
            "anySimpleType" => BuiltinType::AnySimpleType,
            "anyType" => BuiltinType::AnyType,
            _ => return None,
        };
        Some(t)
    }

    /// The unprefixed XSD name
    pub fn local_name(self) -> &'static str {
        match self {
            BuiltinType::String => "string",
            BuiltinType::NormalizedString => "normalizedString",
            BuiltinType::Token => "token",
            BuiltinType::Language => "language",
            BuiltinType::Name => "Name",
            BuiltinType::NcName => "NCName",
            BuiltinType::QName => "QName",
            BuiltinType::Id => "ID",
            BuiltinType::IdRef => "IDREF",
            BuiltinType::IdRefs => "IDREFS",
            BuiltinType::Entity => "ENTITY",
            BuiltinType::Entities => "ENTITIES",
            BuiltinType::NmToken => "NMTOKEN",
            BuiltinType::NmTokens => "NMTOKENS",
            BuiltinType::Notation => "NOTATION",
            BuiltinType::AnyUri => "anyURI",
            BuiltinType::Base64Binary => "base64Binary",
            BuiltinType::HexBinary => "hexBinary",
            BuiltinType::Boolean => "boolean",
            BuiltinType::Decimal => "decimal",
            BuiltinType::Integer => "integer",
            BuiltinType::Long => "long",
            BuiltinType::Int => "int",
            BuiltinType::Short => "short",
            BuiltinType::Byte => "byte",
            BuiltinType::NonNegativeInteger => "nonNegativeInteger",
            BuiltinType::PositiveInteger => "positiveInteger",
            BuiltinType::NonPositiveInteger => "nonPositiveInteger",
            BuiltinType::NegativeInteger => "negativeInteger",
            BuiltinType::UnsignedLong => "unsignedLong",
            BuiltinType::UnsignedInt => "unsignedInt",
            BuiltinType::UnsignedShort => "unsignedShort",
            BuiltinType::UnsignedByte => "unsignedByte",
            BuiltinType::Float => "float",
            BuiltinType::Double => "double",
            BuiltinType::Duration => "duration",
            BuiltinType::DateTime => "dateTime",
            BuiltinType::Time => "time",
            BuiltinType::Date => "date",
            BuiltinType::GYearMonth => "gYearMonth",
            BuiltinType::GYear => "gYear",
            BuiltinType::GMonthDay => "gMonthDay",
            BuiltinType::GDay => "gDay",
            BuiltinType::GMonth => "gMonth",
            BuiltinType::AnySimpleType => "anySimpleType",
            BuiltinType::AnyType => "anyType",
        }
    }

    /// Value category used by generators
    pub fn category(self) -> TypeCategory {
        use BuiltinType::*;
        match self {
            Boolean => TypeCategory::Boolean,
            Decimal => TypeCategory::Decimal,
            Float | Double => TypeCategory::Float,
            Integer | Long | Int | Short | Byte | NonNegativeInteger | PositiveInteger
            | NonPositiveInteger | NegativeInteger | UnsignedLong | UnsignedInt
            | UnsignedShort | UnsignedByte => TypeCategory::Integer,
            Duration | DateTime | Time | Date | GYearMonth | GYear | GMonthDay | GDay
            | GMonth => TypeCategory::Temporal,
            AnySimpleType | AnyType => TypeCategory::Any,
            _ => TypeCategory::String,
        }
    }

    /// ID, IDREF and IDREFS
    pub fn is_identity(self) -> bool {
        matches!(self, BuiltinType::Id | BuiltinType::IdRef | BuiltinType::IdRefs)
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local_name())
    }
}
