//! Category → quantity inventory model.
//!
//! Quantities are whole, non-negative counts. Anything coming from the backend
//! or from a form field is coerced through [`coerce_quantity`] so the invariant
//! holds no matter what the other side sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type Quantity = u32;

/// Fixed display order of the review list.
pub const CATEGORIES: [&str; 19] = [
    "Beverages",
    "Juices",
    "Cereal",
    "Breakfast",
    "Meat",
    "Fish",
    "Poultry",
    "Frozen",
    "Vegetables",
    "Fruits",
    "Nuts",
    "Soup",
    "Grains",
    "Pasta",
    "Snacks",
    "Spices",
    "Sauces",
    "Condiments",
    "Misc Products",
];

pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

/// Coerce a numeric value into a quantity.
///
/// Negative values clamp to zero, fractions truncate, values beyond
/// `Quantity::MAX` saturate. NaN and infinities are rejected.
pub fn coerce_quantity(value: f64) -> Option<Quantity> {
    if !value.is_finite() {
        return None;
    }
    // `as` saturates for out-of-range floats
    Some(value.max(0.0).trunc() as Quantity)
}

/// Parse the raw text of a quantity input.
///
/// Blank input counts as zero, matching how a cleared number field reads.
/// Returns `None` for non-numeric text.
pub fn parse_quantity_input(raw: &str) -> Option<Quantity> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    let value: f64 = trimmed.parse().ok()?;
    coerce_quantity(value)
}

/// Coerce one JSON value from a backend inventory mapping.
///
/// Numbers and numeric strings are coerced; everything else reads as zero.
pub fn coerce_json_quantity(value: &Value) -> Quantity {
    match value {
        Value::Number(n) => n.as_f64().and_then(coerce_quantity).unwrap_or(0),
        Value::String(s) => parse_quantity_input(s).unwrap_or(0),
        _ => 0,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, Quantity>);

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an untrusted backend mapping.
    pub fn from_json_map(raw: &BTreeMap<String, Value>) -> Self {
        Self(
            raw.iter()
                .map(|(category, value)| (category.clone(), coerce_json_quantity(value)))
                .collect(),
        )
    }

    pub fn quantity(&self, category: &str) -> Quantity {
        self.0.get(category).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: &str, quantity: Quantity) {
        self.0.insert(category.to_string(), quantity);
    }

    /// One row per known category, in display order, missing ones as zero.
    pub fn rows(&self) -> Vec<(&'static str, Quantity)> {
        CATEGORIES
            .iter()
            .map(|category| (*category, self.quantity(category)))
            .collect()
    }

    /// Non-zero entries: known categories in display order, then any extra
    /// categories the backend reported, alphabetically.
    pub fn detected(&self) -> Vec<(&str, Quantity)> {
        let known = CATEGORIES
            .iter()
            .filter_map(|category| self.0.get_key_value(*category))
            .map(|(k, v)| (k.as_str(), *v));
        let extra = self
            .0
            .iter()
            .filter(|(k, _)| !is_known_category(k))
            .map(|(k, v)| (k.as_str(), *v));
        known.chain(extra).filter(|(_, q)| *q > 0).collect()
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.values().all(|q| *q == 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Quantity> {
        &self.0
    }
}

impl FromIterator<(String, Quantity)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (String, Quantity)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_quantity_clamps_and_truncates() {
        assert_eq!(coerce_quantity(-5.0), Some(0));
        assert_eq!(coerce_quantity(2.9), Some(2));
        assert_eq!(coerce_quantity(1e12), Some(Quantity::MAX));
        assert_eq!(coerce_quantity(f64::NAN), None);
        assert_eq!(coerce_quantity(f64::INFINITY), None);
    }

    #[test]
    fn test_parse_quantity_input() {
        assert_eq!(parse_quantity_input("7"), Some(7));
        assert_eq!(parse_quantity_input(" 12 "), Some(12));
        assert_eq!(parse_quantity_input("-5"), Some(0));
        assert_eq!(parse_quantity_input("1e2"), Some(100));
        assert_eq!(parse_quantity_input(""), Some(0));
        assert_eq!(parse_quantity_input("abc"), None);
        assert_eq!(parse_quantity_input("3 cans"), None);
        assert_eq!(parse_quantity_input("inf"), None);
    }

    #[test]
    fn test_rows_follow_fixed_order_with_defaults() {
        let raw: BTreeMap<String, Value> =
            serde_json::from_value(json!({"Beverages": 3, "Cereal": 0})).unwrap();
        let inventory = Inventory::from_json_map(&raw);
        let rows = inventory.rows();

        assert_eq!(rows.len(), CATEGORIES.len());
        assert_eq!(rows[0], ("Beverages", 3));
        assert_eq!(rows[2], ("Cereal", 0));
        assert!(rows
            .iter()
            .filter(|(c, _)| *c != "Beverages")
            .all(|(_, q)| *q == 0));
        assert_eq!(rows[18].0, "Misc Products");
    }

    #[test]
    fn test_from_json_map_coerces_untrusted_values() {
        let raw: BTreeMap<String, Value> = serde_json::from_value(json!({
            "Beverages": -4,
            "Juices": 2.7,
            "Cereal": "5",
            "Meat": null,
            "Fish": "lots",
            "Nuts": true
        }))
        .unwrap();
        let inventory = Inventory::from_json_map(&raw);
        assert_eq!(inventory.quantity("Beverages"), 0);
        assert_eq!(inventory.quantity("Juices"), 2);
        assert_eq!(inventory.quantity("Cereal"), 5);
        assert_eq!(inventory.quantity("Meat"), 0);
        assert_eq!(inventory.quantity("Fish"), 0);
        assert_eq!(inventory.quantity("Nuts"), 0);
        assert_eq!(inventory.quantity("Pasta"), 0);
    }

    #[test]
    fn test_detected_hides_zero_and_orders_known_first() {
        let inventory: Inventory = [
            ("Zucchini Boxes".to_string(), 2),
            ("Soup".to_string(), 4),
            ("Beverages".to_string(), 1),
            ("Meat".to_string(), 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            inventory.detected(),
            vec![("Beverages", 1), ("Soup", 4), ("Zucchini Boxes", 2)]
        );
        assert!(!inventory.is_all_zero());
    }

    #[test]
    fn test_all_zero() {
        let inventory: Inventory = [("Soup".to_string(), 0), ("Fish".to_string(), 0)]
            .into_iter()
            .collect();
        assert!(inventory.is_all_zero());
        assert!(inventory.detected().is_empty());
        assert!(!inventory.is_empty());
    }
}
