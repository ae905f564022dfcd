//! The payoff matrix.

use serde::Serialize;

use crate::game::config::Economics;
use crate::game::decision::Decision;

/// Which cell of the matrix a game landed in.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    BothSplit,
    ASteals,
    BSteals,
    BothSteal,
}

impl Outcome {
    /// One-line verdict for the results screen.
    pub fn headline(self, name_a: &str, name_b: &str) -> String {
        match self {
            Outcome::BothSplit => "Both agents cooperated! The pot was split evenly.".to_string(),
            Outcome::BothSteal => "Both agents got greedy. Nobody wins.".to_string(),
            Outcome::ASteals => format!("{name_a} betrayed {name_b} and took the whole pot!"),
            Outcome::BSteals => format!("{name_b} betrayed {name_a} and took the whole pot!"),
        }
    }
}

/// Payouts for both players plus the outcome that produced them.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub payout_a: u64,
    pub payout_b: u64,
}

/// Apply the payoff matrix.
///
/// | A | B | A gets | B gets |
/// |---|---|---|---|
/// | SPLIT | SPLIT | pot/2 | pot/2 |
/// | STEAL | SPLIT | pot | 0 |
/// | SPLIT | STEAL | 0 | pot |
/// | STEAL | STEAL | 0 | 0 |
pub fn resolve(a: Decision, b: Decision, economics: &Economics) -> Resolution {
    let pot = economics.pot();
    let (outcome, payout_a, payout_b) = match (a, b) {
        (Decision::Split, Decision::Split) => {
            let share = economics.split_amount();
            (Outcome::BothSplit, share, share)
        }
        (Decision::Steal, Decision::Split) => (Outcome::ASteals, pot, 0),
        (Decision::Split, Decision::Steal) => (Outcome::BSteals, 0, pot),
        (Decision::Steal, Decision::Steal) => (Outcome::BothSteal, 0, 0),
    };
    Resolution {
        outcome,
        payout_a,
        payout_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn million_pot() -> Economics {
        Economics::new(500_000).unwrap()
    }

    #[test]
    fn full_matrix() {
        let e = million_pot();
        let cases = [
            (Decision::Split, Decision::Split, Outcome::BothSplit, 500_000, 500_000),
            (Decision::Steal, Decision::Split, Outcome::ASteals, 1_000_000, 0),
            (Decision::Split, Decision::Steal, Outcome::BSteals, 0, 1_000_000),
            (Decision::Steal, Decision::Steal, Outcome::BothSteal, 0, 0),
        ];
        for (a, b, outcome, payout_a, payout_b) in cases {
            assert_eq!(
                resolve(a, b, &e),
                Resolution {
                    outcome,
                    payout_a,
                    payout_b
                },
                "{a} vs {b}"
            );
        }
    }

    #[test]
    fn swapping_players_swaps_payouts() {
        let e = million_pot();
        for a in [Decision::Split, Decision::Steal] {
            for b in [Decision::Split, Decision::Steal] {
                let forward = resolve(a, b, &e);
                let reverse = resolve(b, a, &e);
                assert_eq!(forward.payout_a, reverse.payout_b);
                assert_eq!(forward.payout_b, reverse.payout_a);
            }
        }
    }

    #[test]
    fn payouts_never_exceed_pot() {
        let e = Economics::new(7).unwrap();
        for a in [Decision::Split, Decision::Steal] {
            for b in [Decision::Split, Decision::Steal] {
                let r = resolve(a, b, &e);
                assert!(r.payout_a + r.payout_b <= e.pot());
            }
        }
    }

    #[test]
    fn headlines_name_the_stealer() {
        assert!(Outcome::ASteals.headline("Sonnet", "Haiku").starts_with("Sonnet betrayed Haiku"));
        assert!(Outcome::BSteals.headline("Sonnet", "Haiku").starts_with("Haiku betrayed Sonnet"));
        assert!(Outcome::BothSplit.headline("a", "b").contains("cooperated"));
    }

    #[test]
    fn outcome_serializes_snake_case() {
        assert_eq!(serde_json::to_value(Outcome::ASteals).unwrap(), "a_steals");
        assert_eq!(serde_json::to_value(Outcome::BothSplit).unwrap(), "both_split");
    }
}
