//! Designator allocation.
//!
//! Designators are allocated by searching the set of designators already in use
//! for the smallest free number under a prefix. There is no persisted counter, so
//! a number freed by a removal is handed out again.

use std::collections::BTreeSet;

use crate::enums::{ConnectorCategory, PartKind};
use crate::error::{CoreError, CoreResult};
use crate::ids::Designator;

/// Designator prefix for a component of the given kind and category.
pub fn prefix_for(kind: PartKind, category: Option<ConnectorCategory>) -> &'static str {
    if let Some(category) = category {
        return category_prefix(category);
    }
    match kind {
        PartKind::Connector => "X",
        PartKind::Wire => "W",
        PartKind::Cable => "C",
        PartKind::Terminal => "T",
        PartKind::Assembly => "A",
    }
}

fn category_prefix(category: ConnectorCategory) -> &'static str {
    match category {
        ConnectorCategory::PowerSupply => "PS",
        ConnectorCategory::CircuitBreaker => "CB",
        ConnectorCategory::Fuse => "F",
        ConnectorCategory::Fan => "FAN",
        ConnectorCategory::PushButton => "BTN",
        ConnectorCategory::Switch => "S",
        ConnectorCategory::Relay | ConnectorCategory::Contactor => "K",
        ConnectorCategory::Timer => "T",
        ConnectorCategory::Pcb => "PCB",
        ConnectorCategory::Motor => "M",
        ConnectorCategory::Other => "X",
    }
}

/// Smallest `prefix<n>` (n >= 1) not present in `existing`.
pub fn allocate<'a, I>(prefix: &str, existing: I) -> Designator
where
    I: IntoIterator<Item = &'a Designator>,
{
    let used: BTreeSet<u32> = existing
        .into_iter()
        .filter_map(Designator::split)
        .filter(|(p, _)| *p == prefix)
        .map(|(_, n)| n)
        .collect();

    let mut next = 1;
    for n in used {
        if n != next {
            break;
        }
        next += 1;
    }
    Designator::from_parts(prefix, next)
}

/// Accept a caller-chosen designator if nothing holds it yet.
pub fn claim<'a, I>(explicit: &str, existing: I) -> CoreResult<Designator>
where
    I: IntoIterator<Item = &'a Designator>,
{
    let designator = Designator::new(explicit)?;
    if existing.into_iter().any(|d| *d == designator) {
        return Err(CoreError::DuplicateDesignator(designator.to_string()));
    }
    Ok(designator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> Vec<Designator> {
        items.iter().map(|s| Designator::new(*s).unwrap()).collect()
    }

    #[test]
    fn prefix_table() {
        assert_eq!(prefix_for(PartKind::Connector, None), "X");
        assert_eq!(prefix_for(PartKind::Wire, None), "W");
        assert_eq!(prefix_for(PartKind::Cable, None), "C");
        assert_eq!(prefix_for(PartKind::Terminal, None), "T");
        let cases = [
            (ConnectorCategory::PowerSupply, "PS"),
            (ConnectorCategory::CircuitBreaker, "CB"),
            (ConnectorCategory::Fuse, "F"),
            (ConnectorCategory::Fan, "FAN"),
            (ConnectorCategory::PushButton, "BTN"),
            (ConnectorCategory::Switch, "S"),
            (ConnectorCategory::Relay, "K"),
            (ConnectorCategory::Contactor, "K"),
            (ConnectorCategory::Timer, "T"),
            (ConnectorCategory::Pcb, "PCB"),
            (ConnectorCategory::Motor, "M"),
            (ConnectorCategory::Other, "X"),
        ];
        for (category, prefix) in cases {
            assert_eq!(prefix_for(PartKind::Connector, Some(category)), prefix);
        }
    }

    #[test]
    fn allocate_starts_at_one() {
        assert_eq!(allocate("X", &Vec::new()).as_str(), "X1");
    }

    #[test]
    fn allocate_fills_gaps() {
        let existing = set(&["X1", "X3", "W2"]);
        assert_eq!(allocate("X", &existing).as_str(), "X2");
        assert_eq!(allocate("W", &existing).as_str(), "W1");
    }

    #[test]
    fn allocate_ignores_other_prefixes_sharing_letters() {
        // FAN1 must not occupy F1, and X10 must not look like X1.
        let existing = set(&["FAN1", "X10", "F2"]);
        assert_eq!(allocate("F", &existing).as_str(), "F1");
        assert_eq!(allocate("X", &existing).as_str(), "X1");
    }

    #[test]
    fn allocate_skips_non_canonical_names() {
        let existing = set(&["X1", "X02", "MAIN"]);
        assert_eq!(allocate("X", &existing).as_str(), "X2");
    }

    #[test]
    fn claim_rejects_duplicates() {
        let existing = set(&["X1"]);
        assert_eq!(
            claim("X1", &existing),
            Err(CoreError::DuplicateDesignator("X1".to_string()))
        );
        assert_eq!(claim("J7", &existing).unwrap().as_str(), "J7");
        assert!(claim("C1.1", &existing).is_err());
    }
}
