//! Range-keyed bonus structures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::format::{format_amount, format_number, format_percent};
use crate::names::{humanize, parse_wire, wire_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BonusType {
    QuarterlyCommercial,
    AnnualCommercial,
    QuarterlyResidential,
    AnnualResidential,
    PartnerReferral,
}

impl BonusType {
    pub const ALL: [BonusType; 5] = [
        Self::QuarterlyCommercial,
        Self::AnnualCommercial,
        Self::QuarterlyResidential,
        Self::AnnualResidential,
        Self::PartnerReferral,
    ];

    pub fn label(self) -> String {
        humanize(&wire_name(&self))
    }
}

impl fmt::Display for BonusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire_name(self))
    }
}

impl FromStr for BonusType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire("bonus type", s)
    }
}

/// A bonus paid for volumes in `[minValue, maxValue)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusStructure {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub bonus_type: BonusType,
    pub min_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BonusStructure {
    /// Whether `value` falls in this range. A missing maximum is open-ended.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value && self.max_value.is_none_or(|max| value < max)
    }

    pub fn range_label(&self) -> String {
        match self.max_value {
            Some(max) => format!("{} - {}", format_number(self.min_value), format_number(max)),
            None => format!("{}+", format_number(self.min_value)),
        }
    }

    pub fn value_label(&self) -> String {
        match (self.percent, self.flat_amount) {
            (Some(p), Some(flat)) => format!("{} + {}", format_percent(p), format_amount(flat)),
            (Some(p), None) => format_percent(p),
            (None, Some(flat)) => format_amount(flat),
            (None, None) => "-".to_string(),
        }
    }
}

/// All bonus ranges of one type, sorted by lower bound.
#[derive(Debug, Clone)]
pub struct BonusGroup<'a> {
    pub bonus_type: BonusType,
    pub rows: Vec<&'a BonusStructure>,
}

/// Group bonuses by type. Every type gets a group, in declaration order, even
/// when it has no ranges yet.
pub fn group_bonuses(bonuses: &[BonusStructure]) -> Vec<BonusGroup<'_>> {
    BonusType::ALL
        .iter()
        .map(|&bonus_type| {
            let mut rows: Vec<&BonusStructure> = bonuses
                .iter()
                .filter(|b| b.bonus_type == bonus_type)
                .collect();
            rows.sort_by(|a, b| a.min_value.total_cmp(&b.min_value));
            BonusGroup { bonus_type, rows }
        })
        .collect()
}

/// The bonus range of `bonus_type` containing `value`.
///
/// Ranges are not expected to overlap; if they do, the lowest lower bound wins.
pub fn lookup_bonus(
    bonuses: &[BonusStructure],
    bonus_type: BonusType,
    value: f64,
) -> Option<&BonusStructure> {
    bonuses
        .iter()
        .filter(|b| b.bonus_type == bonus_type && b.contains(value))
        .min_by(|a, b| a.min_value.total_cmp(&b.min_value))
}
