//! Selection of the vendor mapping that applies to a market occurrence

use super::descriptions::{MarketMapping, ValidFor};
use crate::domain::Specifiers;

/// Pick the mapping for `producer_id` and the occurrence's concrete specifiers
///
/// Among mappings listing the producer, the first whose `valid_for`
/// constraints all hold wins; failing that, the first unconstrained one.
/// A mapping with an unparsable `valid_for` never matches.
pub fn select_mapping<'a>(
    mappings: &'a [MarketMapping],
    producer_id: i32,
    specifiers: &Specifiers,
) -> Option<&'a MarketMapping> {
    let scoped: Vec<&MarketMapping> = mappings
        .iter()
        .filter(|m| m.producer_ids.contains(&producer_id))
        .collect();

    let constrained = scoped.iter().find(|m| match m.constraints() {
        ValidFor::Constraints(constraints) => constraints
            .iter()
            .all(|(name, value)| specifiers.get(name) == Some(value)),
        ValidFor::Unconstrained | ValidFor::Unparsable => false,
    });

    constrained
        .or_else(|| scoped.iter().find(|m| m.constraints() == ValidFor::Unconstrained))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::descriptions::SportScope;
    use crate::domain::parse_specifiers;
    use proptest::prelude::*;

    fn mapping(producers: &[i32], market_id: &str, valid_for: Option<&str>) -> MarketMapping {
        MarketMapping {
            producer_id: producers[0],
            producer_ids: producers.to_vec(),
            sport: SportScope::All,
            market_id: market_id.to_string(),
            market_type_id: market_id.split(':').next().and_then(|s| s.parse().ok()),
            market_sub_type_id: None,
            sov_template: None,
            valid_for: valid_for.map(str::to_string),
            outcomes: Vec::new(),
        }
    }

    #[test]
    fn test_constrained_mapping_wins_when_matching() {
        let mappings = vec![
            mapping(&[1], "100", None),
            mapping(&[1], "200", Some("winners=3")),
        ];
        let three = parse_specifiers("winners=3").unwrap();
        let two = parse_specifiers("winners=2").unwrap();

        assert_eq!(select_mapping(&mappings, 1, &three).unwrap().market_id, "200");
        assert_eq!(select_mapping(&mappings, 1, &two).unwrap().market_id, "100");
    }

    #[test]
    fn test_all_constraints_must_hold() {
        let mappings = vec![mapping(&[3], "7", Some("setnr=1|gamenr=2"))];
        let partial = parse_specifiers("setnr=1|gamenr=3").unwrap();
        assert!(select_mapping(&mappings, 3, &partial).is_none());
        let full = parse_specifiers("setnr=1|gamenr=2").unwrap();
        assert!(select_mapping(&mappings, 3, &full).is_some());
    }

    #[test]
    fn test_other_producer_mappings_are_ignored() {
        let mappings = vec![mapping(&[3], "1", None)];
        assert!(select_mapping(&mappings, 1, &Specifiers::new()).is_none());
        assert!(select_mapping(&[], 1, &Specifiers::new()).is_none());
    }

    proptest! {
        #[test]
        fn prop_selected_mapping_lists_the_producer(
            producer in 1i32..6,
            lists in proptest::collection::vec(proptest::collection::vec(1i32..6, 1..3), 0..6),
        ) {
            let mappings: Vec<_> = lists
                .iter()
                .enumerate()
                .map(|(i, producers)| mapping(producers, &i.to_string(), None))
                .collect();
            let selected = select_mapping(&mappings, producer, &Specifiers::new());
            match selected {
                Some(m) => prop_assert!(m.producer_ids.contains(&producer)),
                None => prop_assert!(mappings.iter().all(|m| !m.producer_ids.contains(&producer))),
            }
        }
    }
}
