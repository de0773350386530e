//! @ai:module:intent Static per-model price table and cost computation
//! @ai:module:layer domain
//! @ai:module:public_api PricingTable, ModelPrice
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// @ai:intent Price in USD per one million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrice {
    pub input: f64,
    pub output: f64,
}

impl ModelPrice {
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

const BUILTIN_PRICES: &[(&str, ModelPrice)] = &[
    // OpenAI
    ("gpt-4o", ModelPrice::new(2.50, 10.00)),
    ("gpt-4o-mini", ModelPrice::new(0.15, 0.60)),
    ("gpt-4-turbo", ModelPrice::new(10.00, 30.00)),
    ("gpt-4", ModelPrice::new(30.00, 60.00)),
    ("gpt-4.1", ModelPrice::new(2.00, 8.00)),
    ("gpt-4.1-mini", ModelPrice::new(0.40, 1.60)),
    ("gpt-3.5-turbo", ModelPrice::new(0.50, 1.50)),
    ("o1", ModelPrice::new(15.00, 60.00)),
    ("o1-mini", ModelPrice::new(3.00, 12.00)),
    ("o3-mini", ModelPrice::new(1.10, 4.40)),
    // Anthropic
    ("claude-3-5-sonnet", ModelPrice::new(3.00, 15.00)),
    ("claude-3-5-haiku", ModelPrice::new(0.80, 4.00)),
    ("claude-3-opus", ModelPrice::new(15.00, 75.00)),
    ("claude-3-sonnet", ModelPrice::new(3.00, 15.00)),
    ("claude-3-haiku", ModelPrice::new(0.25, 1.25)),
    ("claude-sonnet-4", ModelPrice::new(3.00, 15.00)),
    ("claude-opus-4", ModelPrice::new(15.00, 75.00)),
];

/// @ai:intent Immutable model id -> price lookup, built once and shared by reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    prices: BTreeMap<String, ModelPrice>,
}

impl PricingTable {
    /// @ai:intent Table with the built-in vendor prices
    /// @ai:effects pure
    pub fn builtin() -> Self {
        Self {
            prices: BUILTIN_PRICES
                .iter()
                .map(|(model, price)| (model.to_string(), *price))
                .collect(),
        }
    }

    /// @ai:intent Add or replace entries before the table is shared
    /// @ai:effects pure
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (String, ModelPrice)>) -> Self {
        self.prices.extend(overrides);
        self
    }

    /// @ai:intent Find the price for a model id
    /// @ai:post exact match first, then the longest key that is a literal prefix of the id
    /// @ai:effects pure
    pub fn lookup(&self, model: &str) -> Option<ModelPrice> {
        if let Some(price) = self.prices.get(model) {
            return Some(*price);
        }

        self.prices
            .iter()
            .filter(|(key, _)| model.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, price)| *price)
    }

    /// @ai:intent Monetary cost of a call; zero when the model has no price
    /// @ai:effects pure
    pub fn cost(&self, model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
        match self.lookup(model) {
            Some(price) => {
                input_tokens as f64 * price.input / 1_000_000.0
                    + output_tokens as f64 * price.output / 1_000_000.0
            }
            None => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_exact_match_cost() {
        let table = PricingTable::builtin();
        // 1000 * 2.5/1e6 + 500 * 10/1e6
        assert!(close(table.cost("gpt-4o", 1000, 500), 0.0075));
    }

    #[test]
    fn test_dated_id_falls_back_to_prefix() {
        let table = PricingTable::builtin();
        assert_eq!(
            table.lookup("claude-3-5-sonnet-20241022"),
            Some(ModelPrice::new(3.00, 15.00))
        );
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = PricingTable::builtin();
        assert_eq!(
            table.lookup("gpt-4o-mini-2024-07-18"),
            Some(ModelPrice::new(0.15, 0.60))
        );
    }

    #[test]
    fn test_unknown_model_costs_zero() {
        let table = PricingTable::builtin();
        assert!(table.lookup("llama-3-70b").is_none());
        assert_eq!(table.cost("llama-3-70b", 10_000, 10_000), 0.0);
    }

    #[test]
    fn test_overrides_replace_builtin() {
        let table = PricingTable::builtin()
            .with_overrides(vec![("gpt-4o".to_string(), ModelPrice::new(1.0, 1.0))]);
        assert!(close(table.cost("gpt-4o", 1_000_000, 0), 1.0));
    }
}
