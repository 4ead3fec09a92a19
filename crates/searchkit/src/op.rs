//! Operators for filter conditions.
//!
//! The [`Operator`] enum is the closed set of 24 operators a filter field can
//! declare. Every operator belongs to exactly one [`Family`], and the family
//! decides how the field's value is interpreted before it reaches the
//! [`ConditionBuilder`](crate::ConditionBuilder).

use std::fmt;
use std::str::FromStr;

use crate::error::{FilterError, Result};

/// Operator declared by a filter field.
///
/// Families:
/// - **Comparison**: `Eq`, `Neq`, `Gt`, `Gte`, `Lt`, `Lte`
/// - **Range**: `Between`, `NotBetween`
/// - **Set**: `In`, `NotIn`
/// - **Null**: `IsNull`, `IsNotNull`
/// - **Pattern**: contains / starts-with / ends-with, each optionally negated
///   (`Not…`) and optionally case-insensitive (`I…`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Comparison
    /// Equal.
    Eq,
    /// Not equal.
    Neq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,

    // Range
    /// Inside an inclusive interval.
    Between,
    /// Outside an inclusive interval.
    NotBetween,

    // Set membership
    /// Member of a list.
    In,
    /// Not a member of a list.
    NotIn,

    // Null checks (boolean gate)
    /// Column is null, when the field is `true`.
    IsNull,
    /// Column is not null, when the field is `true`.
    IsNotNull,

    // Pattern matching
    /// Contains the text.
    Contains,
    /// Does not contain the text.
    NotContains,
    /// Contains the text, ignoring case.
    IContains,
    /// Does not contain the text, ignoring case.
    NotIContains,
    /// Starts with the text.
    StartsWith,
    /// Does not start with the text.
    NotStartsWith,
    /// Starts with the text, ignoring case.
    IStartsWith,
    /// Does not start with the text, ignoring case.
    NotIStartsWith,
    /// Ends with the text.
    EndsWith,
    /// Does not end with the text.
    NotEndsWith,
    /// Ends with the text, ignoring case.
    IEndsWith,
    /// Does not end with the text, ignoring case.
    NotIEndsWith,
}

/// The five operator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Compares the column with one value.
    Comparison,
    /// Bounds the column by two endpoints.
    Range,
    /// Tests membership in a list.
    Set,
    /// Null check behind a boolean gate.
    Null,
    /// Text match over one or more columns.
    Pattern,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 24] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Between,
        Operator::NotBetween,
        Operator::In,
        Operator::NotIn,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::Contains,
        Operator::NotContains,
        Operator::IContains,
        Operator::NotIContains,
        Operator::StartsWith,
        Operator::NotStartsWith,
        Operator::IStartsWith,
        Operator::NotIStartsWith,
        Operator::EndsWith,
        Operator::NotEndsWith,
        Operator::IEndsWith,
        Operator::NotIEndsWith,
    ];

    /// Returns the family this operator belongs to.
    pub fn family(self) -> Family {
        match self {
            Operator::Eq
            | Operator::Neq
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte => Family::Comparison,
            Operator::Between | Operator::NotBetween => Family::Range,
            Operator::In | Operator::NotIn => Family::Set,
            Operator::IsNull | Operator::IsNotNull => Family::Null,
            Operator::Contains
            | Operator::NotContains
            | Operator::IContains
            | Operator::NotIContains
            | Operator::StartsWith
            | Operator::NotStartsWith
            | Operator::IStartsWith
            | Operator::NotIStartsWith
            | Operator::EndsWith
            | Operator::NotEndsWith
            | Operator::IEndsWith
            | Operator::NotIEndsWith => Family::Pattern,
        }
    }

    /// Returns the match description for pattern operators.
    pub fn pattern(self) -> Option<Pattern> {
        match self {
            Operator::Eq
            | Operator::Neq
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte
            | Operator::Between
            | Operator::NotBetween
            | Operator::In
            | Operator::NotIn
            | Operator::IsNull
            | Operator::IsNotNull => None,
            Operator::Contains => Some(Pattern::CONTAINS),
            Operator::NotContains => Some(Pattern::NOT_CONTAINS),
            Operator::IContains => Some(Pattern::I_CONTAINS),
            Operator::NotIContains => Some(Pattern::NOT_I_CONTAINS),
            Operator::StartsWith => Some(Pattern::STARTS_WITH),
            Operator::NotStartsWith => Some(Pattern::NOT_STARTS_WITH),
            Operator::IStartsWith => Some(Pattern::I_STARTS_WITH),
            Operator::NotIStartsWith => Some(Pattern::NOT_I_STARTS_WITH),
            Operator::EndsWith => Some(Pattern::ENDS_WITH),
            Operator::NotEndsWith => Some(Pattern::NOT_ENDS_WITH),
            Operator::IEndsWith => Some(Pattern::I_ENDS_WITH),
            Operator::NotIEndsWith => Some(Pattern::NOT_I_ENDS_WITH),
        }
    }

    /// Returns `true` if this operator may target several columns at once.
    ///
    /// Only pattern operators can; the columns are OR-grouped.
    pub fn accepts_multiple_columns(self) -> bool {
        self.family() == Family::Pattern
    }

    /// Returns the annotation name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Between => "between",
            Operator::NotBetween => "notBetween",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::IsNull => "isNull",
            Operator::IsNotNull => "isNotNull",
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::IContains => "iContains",
            Operator::NotIContains => "notIContains",
            Operator::StartsWith => "startsWith",
            Operator::NotStartsWith => "notStartsWith",
            Operator::IStartsWith => "iStartsWith",
            Operator::NotIStartsWith => "notIStartsWith",
            Operator::EndsWith => "endsWith",
            Operator::NotEndsWith => "notEndsWith",
            Operator::IEndsWith => "iEndsWith",
            Operator::NotIEndsWith => "notIEndsWith",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    /// Parses an operator name.
    ///
    /// Matching ignores case, `_` and `-`, so `notBetween`, `not_between` and
    /// `NOT-BETWEEN` are the same operator. The symbolic comparison forms
    /// (`=`, `!=`, `<>`, `>`, `>=`, `<`, `<=`) are accepted too.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let op = match key.as_str() {
            "eq" | "=" | "==" => Operator::Eq,
            "neq" | "ne" | "!=" | "<>" => Operator::Neq,
            "gt" | ">" => Operator::Gt,
            "gte" | "ge" | ">=" => Operator::Gte,
            "lt" | "<" => Operator::Lt,
            "lte" | "le" | "<=" => Operator::Lte,
            "between" => Operator::Between,
            "notbetween" => Operator::NotBetween,
            "in" => Operator::In,
            "notin" => Operator::NotIn,
            "isnull" => Operator::IsNull,
            "isnotnull" => Operator::IsNotNull,
            "contains" => Operator::Contains,
            "notcontains" => Operator::NotContains,
            "icontains" => Operator::IContains,
            "noticontains" => Operator::NotIContains,
            "startswith" => Operator::StartsWith,
            "notstartswith" => Operator::NotStartsWith,
            "istartswith" => Operator::IStartsWith,
            "notistartswith" => Operator::NotIStartsWith,
            "endswith" => Operator::EndsWith,
            "notendswith" => Operator::NotEndsWith,
            "iendswith" => Operator::IEndsWith,
            "notiendswith" => Operator::NotIEndsWith,
            _ => return Err(FilterError::UnknownOperator(s.trim().to_string())),
        };
        Ok(op)
    }
}

/// Where a pattern must occur in the column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Contains,
    StartsWith,
    EndsWith,
}

/// Full description of a pattern-match operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern {
    pub kind: MatchKind,
    /// The column must *not* match.
    pub negated: bool,
    /// Letter case is ignored.
    pub case_insensitive: bool,
}

impl Pattern {
    pub const CONTAINS: Pattern = Pattern::new(MatchKind::Contains, false, false);
    pub const NOT_CONTAINS: Pattern = Pattern::new(MatchKind::Contains, true, false);
    pub const I_CONTAINS: Pattern = Pattern::new(MatchKind::Contains, false, true);
    pub const NOT_I_CONTAINS: Pattern = Pattern::new(MatchKind::Contains, true, true);
    pub const STARTS_WITH: Pattern = Pattern::new(MatchKind::StartsWith, false, false);
    pub const NOT_STARTS_WITH: Pattern = Pattern::new(MatchKind::StartsWith, true, false);
    pub const I_STARTS_WITH: Pattern = Pattern::new(MatchKind::StartsWith, false, true);
    pub const NOT_I_STARTS_WITH: Pattern = Pattern::new(MatchKind::StartsWith, true, true);
    pub const ENDS_WITH: Pattern = Pattern::new(MatchKind::EndsWith, false, false);
    pub const NOT_ENDS_WITH: Pattern = Pattern::new(MatchKind::EndsWith, true, false);
    pub const I_ENDS_WITH: Pattern = Pattern::new(MatchKind::EndsWith, false, true);
    pub const NOT_I_ENDS_WITH: Pattern = Pattern::new(MatchKind::EndsWith, true, true);

    pub const fn new(kind: MatchKind, negated: bool, case_insensitive: bool) -> Self {
        Pattern {
            kind,
            negated,
            case_insensitive,
        }
    }

    /// Builds a SQL `LIKE` pattern for `text`.
    ///
    /// `%`, `_` and `\` in `text` are escaped with a backslash, so builders
    /// must emit `ESCAPE '\'`.
    pub fn like_pattern(self, text: &str) -> String {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        match self.kind {
            MatchKind::Contains => format!("%{}%", escaped),
            MatchKind::StartsWith => format!("{}%", escaped),
            MatchKind::EndsWith => format!("%{}", escaped),
        }
    }
}
