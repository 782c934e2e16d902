//! Input aggregation for nested revenue/cost category maps.
//!
//! Revenue and cost models arrive as arbitrarily nested JSON category
//! maps plus an open list of ad-hoc custom fields. Aggregation flattens
//! them into a grand total, per-category totals, and per-category
//! percentage shares. Non-numeric or missing leaves count as zero and
//! never raise; percentage computation guards the zero-total case so
//! the output is NaN-free by construction.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Synthetic category name under which custom fields are aggregated.
pub const CUSTOM_CATEGORY: &str = "custom";

/// An ad-hoc user-defined line item.
///
/// `formula` is display-only metadata carried through untouched; the
/// engine never evaluates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    /// Stable identifier assigned by the data-entry collaborator.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Monthly amount.
    pub value: f64,
    /// Display unit, e.g. a currency symbol.
    #[serde(default)]
    pub unit: String,
    /// Inert formula text, shown but never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

/// A revenue or cost model: named categories of arbitrarily nested
/// numeric maps, plus custom fields.
///
/// Amounts are monthly; annual figures are derived by the caller as
/// `total × 12`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Category name → nested line items. Leaves may be any JSON value;
    /// only numbers contribute to totals.
    #[serde(default)]
    pub categories: BTreeMap<String, Value>,
    /// Open list of ad-hoc fields, aggregated under [`CUSTOM_CATEGORY`].
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// A revenue model is a category input; the alias keeps call sites readable.
pub type RevenueModel = CategoryInput;
/// A cost model is a category input; the alias keeps call sites readable.
pub type CostModel = CategoryInput;

/// Aggregated view of one category input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    /// Grand total across all categories and custom fields (monthly).
    pub total: f64,
    /// Per-category totals (monthly).
    pub per_category: BTreeMap<String, f64>,
    /// Per-category share of the grand total, as a fraction in `[0, 1]`.
    /// All zeros when the grand total is zero.
    pub percentages: BTreeMap<String, f64>,
}

impl CategoryTotals {
    /// Annualised grand total (monthly × 12).
    pub fn annual(&self) -> f64 {
        self.total * 12.0
    }
}

/// Recursively sum the numeric leaves of a JSON value.
///
/// Numbers contribute their value; objects and arrays recurse; strings,
/// booleans and nulls contribute zero.
fn sum_leaves(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Object(map) => map.values().map(sum_leaves).sum(),
        Value::Array(items) => items.iter().map(sum_leaves).sum(),
        _ => 0.0,
    }
}

/// Flatten a category input into totals and percentage breakdowns.
///
/// # Examples
///
/// ```
/// use viability_model::aggregate::{aggregate, CategoryInput};
/// use serde_json::json;
///
/// let mut input = CategoryInput::default();
/// input
///     .categories
///     .insert("fieldRental".into(), json!({ "regular": 30000, "tournaments": 10000 }));
/// input.categories.insert("membership".into(), json!(10000));
///
/// let totals = aggregate(&input);
/// assert_eq!(totals.total, 50000.0);
/// assert_eq!(totals.percentages["fieldRental"], 0.8);
/// ```
pub fn aggregate(input: &CategoryInput) -> CategoryTotals {
    let mut per_category: BTreeMap<String, f64> = input
        .categories
        .iter()
        .map(|(name, value)| (name.clone(), sum_leaves(value)))
        .collect();

    if !input.custom_fields.is_empty() {
        let custom_total: f64 = input.custom_fields.iter().map(|f| f.value).sum();
        *per_category.entry(CUSTOM_CATEGORY.to_string()).or_insert(0.0) += custom_total;
    }

    let total: f64 = per_category.values().sum();

    let percentages = per_category
        .iter()
        .map(|(name, &value)| {
            let share = if total > 0.0 { value / total } else { 0.0 };
            (name.clone(), share)
        })
        .collect();

    CategoryTotals {
        total,
        per_category,
        percentages,
    }
}
