//! Round-robin pairings by the circle method.
//!
//! Slots are pool positions (0-based, standings order). Odd pools get a
//! phantom slot; pairings against it are byes and are dropped, so every
//! round has exactly `slots / 2` games.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pairing {
    pub home: u32,
    pub away: u32,
}

/// `rounds[r][g]` is game `g` of round `r`.
pub fn round_robin(slots: u32) -> Vec<Vec<Pairing>> {
    if slots < 2 {
        return Vec::new();
    }
    let phantom = if slots % 2 == 1 { Some(slots) } else { None };
    let m = slots + u32::from(phantom.is_some());
    let mut ring: Vec<u32> = (0..m).collect();
    let mut rounds = Vec::with_capacity((m - 1) as usize);

    for r in 0..m - 1 {
        let mut games = Vec::with_capacity((m / 2) as usize);
        for i in 0..(m / 2) as usize {
            let a = ring[i];
            let b = ring[m as usize - 1 - i];
            if Some(a) == phantom || Some(b) == phantom {
                continue;
            }
            // the pinned slot alternates home and away
            let (home, away) = if i == 0 && r % 2 == 1 { (b, a) } else { (a, b) };
            games.push(Pairing { home, away });
        }
        rounds.push(games);
        // rotate everything but the pinned slot
        if let Some(last) = ring.pop() {
            ring.insert(1, last);
        }
    }
    rounds
}
