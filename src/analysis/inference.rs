//! Column type/role inference.
//!
//! Each column is profiled independently by an ordered chain of rules. A rule inspects the column
//! and either passes, annotates the profile with a flag and passes, or resolves the column's
//! [`InferredType`]. The first resolving rule wins; later rules never see the column. The chain is
//! the [`RULES`] table followed by the total [`categorical`] fallback.
//!
//! | order | rule | outcome |
//! |---|---|---|
//! | 0 | [`all_missing`] | `unknown` |
//! | 1 | [`constant`] | `constant` |
//! | 2 | [`near_constant`] | flag only |
//! | 3 | [`id_like`] | `id_like` |
//! | 4 | [`datetime`] | `datetime` |
//! | 5 | [`numerical`] | `numerical` (`discrete`/`continuous`) |
//! | 6 | [`categorical`] | `categorical` (`low`/`high`) |

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::Thresholds;
use crate::datetime::parse_datetime;
use crate::types::{DataSet, DataType, Value};

use super::stats::ColumnStats;

/// Semantic type/role assigned to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    Unknown,
    Constant,
    IdLike,
    Datetime,
    Numerical,
    Categorical,
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Constant => "constant",
            Self::IdLike => "id_like",
            Self::Datetime => "datetime",
            Self::Numerical => "numerical",
            Self::Categorical => "categorical",
        };
        f.write_str(s)
    }
}

/// Annotation for numerical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericalKind {
    Discrete,
    Continuous,
}

/// Annotation for categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalityLevel {
    Low,
    High,
}

/// Inferred description of one dataset column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    /// Column name (the key of the serialized profile map).
    #[serde(skip)]
    pub name: String,
    /// Declared scalar type from the schema.
    pub original_type: DataType,
    /// Missing share in percent, rounded to 2 decimals.
    pub missing_percentage: f64,
    /// Count of distinct non-missing values.
    pub unique_values: usize,
    pub is_constant: bool,
    pub is_near_constant: bool,
    pub is_id_like: bool,
    pub inferred_type: InferredType,
    /// Set only when `inferred_type` is [`InferredType::Numerical`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numerical_kind: Option<NumericalKind>,
    /// Set only when `inferred_type` is [`InferredType::Categorical`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardinality_level: Option<CardinalityLevel>,
}

impl ColumnProfile {
    fn base(name: &str, original_type: DataType, stats: &ColumnStats<'_>) -> Self {
        Self {
            name: name.to_string(),
            original_type,
            missing_percentage: stats.missing_percentage(),
            unique_values: stats.unique_values(),
            is_constant: false,
            is_near_constant: false,
            is_id_like: false,
            inferred_type: InferredType::Unknown,
            numerical_kind: None,
            cardinality_level: None,
        }
    }

    fn apply_flag(&mut self, flag: ColumnFlag) {
        match flag {
            ColumnFlag::NearConstant => self.is_near_constant = true,
        }
    }

    fn resolve(&mut self, resolution: Resolution) {
        self.inferred_type = resolution.inferred_type();
        match resolution {
            Resolution::Constant => self.is_constant = true,
            Resolution::IdLike => self.is_id_like = true,
            Resolution::Numerical(kind) => self.numerical_kind = Some(kind),
            Resolution::Categorical(level) => self.cardinality_level = Some(level),
            Resolution::Unknown | Resolution::Datetime => {}
        }
    }
}

/// Ordered column profiles keyed by column name, in dataset column order.
///
/// Serializes as a JSON object mapping column name to profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnProfiles {
    profiles: Vec<ColumnProfile>,
}

impl ColumnProfiles {
    pub fn new(profiles: Vec<ColumnProfile>) -> Self {
        Self { profiles }
    }

    /// Look up a profile by column name.
    pub fn get(&self, name: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ColumnProfiles {
    type Item = &'a ColumnProfile;
    type IntoIter = std::slice::Iter<'a, ColumnProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

impl Serialize for ColumnProfiles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.profiles.len()))?;
        for p in &self.profiles {
            map.serialize_entry(&p.name, p)?;
        }
        map.end()
    }
}

/// Everything a rule may look at for one column.
#[derive(Debug)]
pub struct ColumnFacts<'a> {
    pub name: &'a str,
    pub data_type: DataType,
    /// Raw values in row order, missing values included.
    pub values: Vec<&'a Value>,
    pub(crate) stats: ColumnStats<'a>,
}

impl<'a> ColumnFacts<'a> {
    /// Gather facts for column `idx` of `dataset`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds for the dataset schema.
    pub fn from_dataset(dataset: &'a DataSet, idx: usize) -> Self {
        let field = &dataset.schema.fields[idx];
        Self::new(&field.name, field.data_type, dataset.column(idx).collect())
    }

    pub fn new(name: &'a str, data_type: DataType, values: Vec<&'a Value>) -> Self {
        let stats = ColumnStats::collect(values.iter().copied());
        Self {
            name,
            data_type,
            values,
            stats,
        }
    }

    pub fn non_missing(&self) -> usize {
        self.stats.non_missing
    }

    pub fn unique_values(&self) -> usize {
        self.stats.unique_values()
    }
}

/// Non-terminal annotation a rule can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFlag {
    NearConstant,
}

/// Terminal outcome of the rule chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Unknown,
    Constant,
    IdLike,
    Datetime,
    Numerical(NumericalKind),
    Categorical(CardinalityLevel),
}

impl Resolution {
    pub fn inferred_type(self) -> InferredType {
        match self {
            Self::Unknown => InferredType::Unknown,
            Self::Constant => InferredType::Constant,
            Self::IdLike => InferredType::IdLike,
            Self::Datetime => InferredType::Datetime,
            Self::Numerical(_) => InferredType::Numerical,
            Self::Categorical(_) => InferredType::Categorical,
        }
    }
}

/// What a single rule decided about a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Rule does not apply; continue with the next one.
    Pass,
    /// Annotate the profile and continue.
    Flag(ColumnFlag),
    /// Finalize the profile.
    Resolve(Resolution),
}

/// A rule in the inference chain.
pub type Rule = fn(&ColumnFacts<'_>, &Thresholds) -> Decision;

/// The inference chain in priority order (the [`categorical`] fallback runs after it).
pub const RULES: &[(&str, Rule)] = &[
    ("all_missing", all_missing),
    ("constant", constant),
    ("near_constant", near_constant),
    ("id_like", id_like),
    ("datetime", datetime),
    ("numerical", numerical),
];

/// Rule 0: a column without observed values has unknown type.
pub fn all_missing(facts: &ColumnFacts<'_>, _: &Thresholds) -> Decision {
    if facts.non_missing() == 0 {
        Decision::Resolve(Resolution::Unknown)
    } else {
        Decision::Pass
    }
}

/// Rule 1: exactly one distinct observed value.
pub fn constant(facts: &ColumnFacts<'_>, _: &Thresholds) -> Decision {
    if facts.unique_values() == 1 {
        Decision::Resolve(Resolution::Constant)
    } else {
        Decision::Pass
    }
}

/// Rule 2: the dominant value covers at least `near_constant_threshold` percent of observed rows.
pub fn near_constant(facts: &ColumnFacts<'_>, t: &Thresholds) -> Decision {
    let non_missing = facts.non_missing();
    if non_missing == 0 {
        return Decision::Pass;
    }
    let dominant_pct = facts.stats.dominant_count() as f64 / non_missing as f64 * 100.0;
    if dominant_pct >= t.near_constant_threshold {
        Decision::Flag(ColumnFlag::NearConstant)
    } else {
        Decision::Pass
    }
}

/// Rule 3: a highly unique, monotonic integer column behaves like a row identifier.
pub fn id_like(facts: &ColumnFacts<'_>, t: &Thresholds) -> Decision {
    let non_missing = facts.non_missing();
    if non_missing == 0 || !facts.data_type.is_integer() {
        return Decision::Pass;
    }
    let unique = facts.unique_values();
    let uniqueness_ratio = unique as f64 / non_missing as f64;
    if uniqueness_ratio >= t.id_uniqueness_ratio
        && unique > t.id_min_unique
        && is_monotonic(&facts.values)
    {
        Decision::Resolve(Resolution::IdLike)
    } else {
        Decision::Pass
    }
}

/// Rule 4: temporal columns, or text columns whose values mostly parse as dates.
pub fn datetime(facts: &ColumnFacts<'_>, t: &Thresholds) -> Decision {
    if facts.data_type.is_temporal() {
        return Decision::Resolve(Resolution::Datetime);
    }
    if facts.data_type != DataType::Utf8 {
        return Decision::Pass;
    }
    match parsed_ratio(facts) {
        Some(ratio) if ratio >= t.datetime_parse_ratio => Decision::Resolve(Resolution::Datetime),
        _ => Decision::Pass,
    }
}

/// Rule 5: numeric columns, split into discrete and continuous.
pub fn numerical(facts: &ColumnFacts<'_>, t: &Thresholds) -> Decision {
    if !facts.data_type.is_numeric() {
        return Decision::Pass;
    }
    let kind = if facts.data_type.is_integer() && facts.unique_values() <= t.discrete_max_unique {
        NumericalKind::Discrete
    } else {
        NumericalKind::Continuous
    };
    Decision::Resolve(Resolution::Numerical(kind))
}

/// Rule 6 (fallback): everything else is categorical.
pub fn categorical(facts: &ColumnFacts<'_>, t: &Thresholds) -> Resolution {
    let level = if facts.unique_values() <= t.high_cardinality_limit {
        CardinalityLevel::Low
    } else {
        CardinalityLevel::High
    };
    Resolution::Categorical(level)
}

/// Monotonically non-decreasing or non-increasing over raw row order.
///
/// Missing values are not ordered: any missing value makes the column non-monotonic.
fn is_monotonic(values: &[&Value]) -> bool {
    let mut ints = Vec::with_capacity(values.len());
    for v in values {
        match v {
            Value::Int64(i) => ints.push(*i),
            _ => return false,
        }
    }
    ints.windows(2).all(|w| w[0] <= w[1]) || ints.windows(2).all(|w| w[0] >= w[1])
}

/// Share of observed values that parse as a date/time, or `None` when nothing was observed.
fn parsed_ratio(facts: &ColumnFacts<'_>) -> Option<f64> {
    let non_missing = facts.non_missing();
    if non_missing == 0 {
        return None;
    }
    let parsed = facts
        .values
        .iter()
        .filter(|v| match v {
            Value::Utf8(s) => parse_datetime(s).is_some(),
            _ => false,
        })
        .count();
    Some(parsed as f64 / non_missing as f64)
}

/// Run the rule chain over one column.
pub fn profile_column(facts: &ColumnFacts<'_>, thresholds: &Thresholds) -> ColumnProfile {
    let mut profile = ColumnProfile::base(facts.name, facts.data_type, &facts.stats);

    let resolution = RULES
        .iter()
        .find_map(|(rule_name, rule)| match rule(facts, thresholds) {
            Decision::Pass => None,
            Decision::Flag(flag) => {
                tracing::trace!(column = facts.name, rule = *rule_name, ?flag, "column flagged");
                profile.apply_flag(flag);
                None
            }
            Decision::Resolve(resolution) => {
                tracing::trace!(column = facts.name, rule = *rule_name, "column resolved");
                Some(resolution)
            }
        })
        .unwrap_or_else(|| categorical(facts, thresholds));

    profile.resolve(resolution);
    tracing::debug!(
        column = facts.name,
        inferred_type = %profile.inferred_type,
        unique_values = profile.unique_values,
        missing_percentage = profile.missing_percentage,
        "column profiled"
    );
    profile
}

/// Infer the profile of every column, in dataset column order.
pub fn infer_column_properties(dataset: &DataSet, thresholds: &Thresholds) -> ColumnProfiles {
    let profiles = (0..dataset.column_count())
        .map(|idx| profile_column(&ColumnFacts::from_dataset(dataset, idx), thresholds))
        .collect();
    ColumnProfiles::new(profiles)
}
