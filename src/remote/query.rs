//! Query serializer: filter criteria to remote query parameters.
//!
//! Maps [`FilterCriteria`] to the flat string-keyed parameter set the listings
//! endpoint understands (`search`, `minPrice`, `maxPrice`, `category`,
//! `condition`). Keys whose value equals the unconstrained default are omitted
//! to keep requests minimal — an empty criteria set serializes to no
//! parameters at all.
//!
//! Known limitation, reproduced deliberately: the remote contract accepts a
//! single value per facet, so when multiple categories or conditions are
//! selected only the FIRST selected value of each facet is serialized. The
//! local predicate still honors every selected value, which is also why the
//! defensive re-filter exists. Multi-value facet support would require a
//! remote-contract change; do not widen this silently.

use crate::app::criteria::FilterCriteria;

/// Serializes criteria into query parameters for `GET /listings`.
#[must_use]
pub fn serialize(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if !criteria.search_text.is_empty() {
        params.push(("search", criteria.search_text.clone()));
    }
    if criteria.price_min > 0.0 {
        params.push(("minPrice", format_price(criteria.price_min)));
    }
    if criteria.price_max < criteria.ceiling() {
        params.push(("maxPrice", format_price(criteria.price_max)));
    }
    // Single value per facet: first selected wins.
    if let Some(category) = criteria.categories.first() {
        params.push(("category", category.id().to_string()));
    }
    if let Some(condition) = criteria.conditions.first() {
        params.push(("condition", condition.id().to_string()));
    }

    params
}

/// Formats a price bound, dropping the fractional part when it is whole.
fn format_price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{Category, Condition};

    #[test]
    fn test_unconstrained_criteria_serialize_to_nothing() {
        let criteria = FilterCriteria::new(500.0);
        assert!(serialize(&criteria).is_empty());
    }

    #[test]
    fn test_all_groups_serialize() {
        let mut criteria = FilterCriteria::new(500.0);
        criteria.set_search_text("lamp");
        criteria.set_price_range(10.0, 250.0);
        criteria.toggle_category(Category::Furniture);
        criteria.toggle_condition(Condition::Good);

        assert_eq!(
            serialize(&criteria),
            vec![
                ("search", "lamp".to_string()),
                ("minPrice", "10".to_string()),
                ("maxPrice", "250".to_string()),
                ("category", "furniture".to_string()),
                ("condition", "good".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_bounds_are_omitted_individually() {
        let mut criteria = FilterCriteria::new(500.0);
        criteria.set_price_range(0.0, 100.0);
        assert_eq!(serialize(&criteria), vec![("maxPrice", "100".to_string())]);

        criteria.set_price_range(25.0, 500.0);
        assert_eq!(serialize(&criteria), vec![("minPrice", "25".to_string())]);
    }

    #[test]
    fn test_only_first_selected_facet_value_is_serialized() {
        let mut criteria = FilterCriteria::new(500.0);
        criteria.toggle_category(Category::Kitchen);
        criteria.toggle_category(Category::Electronics);
        criteria.toggle_condition(Condition::Fair);
        criteria.toggle_condition(Condition::New);

        let params = serialize(&criteria);
        assert_eq!(
            params,
            vec![
                ("category", "kitchen".to_string()),
                ("condition", "fair".to_string()),
            ]
        );
    }

    #[test]
    fn test_fractional_price_keeps_decimals() {
        let mut criteria = FilterCriteria::new(500.0);
        criteria.set_price_range(0.5, 19.99);
        assert_eq!(
            serialize(&criteria),
            vec![
                ("minPrice", "0.5".to_string()),
                ("maxPrice", "19.99".to_string()),
            ]
        );
    }
}
