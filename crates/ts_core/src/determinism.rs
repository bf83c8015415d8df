//! Determinism utilities: pool grouping in a stable order.
//!
//! This module is **I/O-free**. Pools sort by label through `BTreeMap`;
//! teams keep their roster order inside each pool.

use std::collections::BTreeMap;

use crate::entities::Team;
use crate::ids::PoolLabel;

/* -------------------------------------------------------------------------- */
/*                               Pool grouping                                */
/* -------------------------------------------------------------------------- */

/// Group teams by pool. Pools come out in label order; teams keep the order
/// they had in the input.
pub fn group_by_pool(teams: &[Team]) -> BTreeMap<PoolLabel, Vec<Team>> {
    let mut out: BTreeMap<PoolLabel, Vec<Team>> = BTreeMap::new();
    for t in teams {
        out.entry(t.pool.clone()).or_default().push(t.clone());
    }
    out
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn t(name: &str, pool: &str) -> Team {
        Team::new("U10".parse().unwrap(), name.parse().unwrap(), pool.parse().unwrap())
    }

    #[test]
    fn pools_sorted_teams_stable() {
        let teams = vec![t("Zebras", "B"), t("Ants", "A"), t("Yaks", "B"), t("Bees", "A")];
        let g = group_by_pool(&teams);
        let keys: Vec<&str> = g.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        let b: Vec<&str> = g[&"B".parse::<PoolLabel>().unwrap()].iter().map(|t| t.name.as_str()).collect();
        assert_eq!(b, vec!["Zebras", "Yaks"]);
    }
}
