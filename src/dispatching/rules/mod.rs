//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Queue-based**: FIFO, LIFO (job ready time)
//! - **Work-based**: MWKR, LWKR (normalized remaining work)
//! - **Random**: uniform choice among candidates
//!
//! Each rule is a key function plus an ordering direction. Keys are taken
//! from the shop state at the start of a round, before anything is
//! committed in that round.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RuleScore;
use crate::models::{Job, ShopState};

/// Direction in which rule keys are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest key first.
    Ascending,
    /// Largest key first.
    Descending,
}

/// A priority dispatching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// First In First Out: the job that became ready earliest.
    Fifo,
    /// Last In First Out: the job that became ready latest.
    Lifo,
    /// Most Work Remaining, relative to the job's total work.
    Mwkr,
    /// Least Work Remaining, relative to the job's total work.
    Lwkr,
    /// Uniform random choice.
    Random,
}

impl Rule {
    /// Every rule, in reporting order.
    pub const ALL: [Rule; 5] = [Rule::Fifo, Rule::Lifo, Rule::Mwkr, Rule::Lwkr, Rule::Random];

    /// Rule name (e.g., "FIFO").
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Fifo => "FIFO",
            Rule::Lifo => "LIFO",
            Rule::Mwkr => "MWKR",
            Rule::Lwkr => "LWKR",
            Rule::Random => "RANDOM",
        }
    }

    /// Rule description.
    pub fn description(&self) -> &'static str {
        match self {
            Rule::Fifo => "First In First Out",
            Rule::Lifo => "Last In First Out",
            Rule::Mwkr => "Most Work Remaining",
            Rule::Lwkr => "Least Work Remaining",
            Rule::Random => "Random Selection",
        }
    }

    /// Preferred key direction; `None` for the random rule.
    pub fn order(&self) -> Option<SortOrder> {
        match self {
            Rule::Fifo | Rule::Lwkr => Some(SortOrder::Ascending),
            Rule::Lifo | Rule::Mwkr => Some(SortOrder::Descending),
            Rule::Random => None,
        }
    }

    /// Key of a job under this rule; `None` for the random rule.
    ///
    /// - FIFO/LIFO: the job's ledger time (end of its last scheduled operation).
    /// - MWKR/LWKR: remaining work / total work, 0 for a job without work.
    pub fn evaluate(&self, job: &Job, shop: &ShopState) -> Option<RuleScore> {
        match self {
            Rule::Fifo | Rule::Lifo => Some(shop.current_time(job.id) as f64),
            Rule::Mwkr | Rule::Lwkr => Some(job.normalized_remaining_processing_time()),
            Rule::Random => None,
        }
    }

    /// Whether `candidate` is strictly preferred over `incumbent`.
    ///
    /// Equal keys are never preferred, so the earlier candidate keeps a tie.
    pub fn prefers(&self, candidate: RuleScore, incumbent: RuleScore) -> bool {
        match self.order() {
            Some(SortOrder::Ascending) => candidate < incumbent,
            Some(SortOrder::Descending) => candidate > incumbent,
            None => false,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown rule name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dispatching rule '{0}' (expected fifo, lifo, mwkr, lwkr or random)")]
pub struct UnknownRule(pub String);

impl FromStr for Rule {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(Rule::Fifo),
            "lifo" => Ok(Rule::Lifo),
            "mwkr" => Ok(Rule::Mwkr),
            "lwkr" => Ok(Rule::Lwkr),
            "random" => Ok(Rule::Random),
            _ => Err(UnknownRule(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;

    fn shop() -> ShopState {
        ShopState::new(&Instance::new(
            "rules",
            2,
            2,
            vec![vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]],
        ))
        .unwrap()
    }

    #[test]
    fn test_fifo_lifo_use_ledger() {
        let mut shop = shop();
        shop.commit(0);
        let j0 = shop.job(0).unwrap();
        let j1 = shop.job(1).unwrap();

        assert_eq!(Rule::Fifo.evaluate(j0, &shop), Some(3.0));
        assert_eq!(Rule::Fifo.evaluate(j1, &shop), Some(0.0));
        assert_eq!(Rule::Lifo.evaluate(j0, &shop), Some(3.0));
        assert!(Rule::Fifo.prefers(0.0, 3.0));
        assert!(Rule::Lifo.prefers(3.0, 0.0));
    }

    #[test]
    fn test_work_rules_use_normalized_remaining() {
        let mut shop = shop();
        shop.commit(0);
        let j0 = shop.job(0).unwrap();
        let j1 = shop.job(1).unwrap();

        let k0 = Rule::Mwkr.evaluate(j0, &shop).unwrap();
        let k1 = Rule::Mwkr.evaluate(j1, &shop).unwrap();
        assert!((k0 - 0.4).abs() < 1e-12);
        assert!((k1 - 1.0).abs() < 1e-12);
        assert!(Rule::Mwkr.prefers(k1, k0));
        assert!(Rule::Lwkr.prefers(k0, k1));
    }

    #[test]
    fn test_work_rules_zero_total() {
        let shop = shop();
        let empty = Job::new(0, Vec::new());
        assert_eq!(Rule::Mwkr.evaluate(&empty, &shop), Some(0.0));
        assert_eq!(Rule::Lwkr.evaluate(&empty, &shop), Some(0.0));
    }

    #[test]
    fn test_ties_are_not_preferred() {
        for rule in Rule::ALL {
            assert!(!rule.prefers(1.0, 1.0));
        }
    }

    #[test]
    fn test_random_has_no_key() {
        let shop = shop();
        assert_eq!(Rule::Random.order(), None);
        assert_eq!(Rule::Random.evaluate(shop.job(0).unwrap(), &shop), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("FIFO".parse::<Rule>(), Ok(Rule::Fifo));
        assert_eq!("mwkr".parse::<Rule>(), Ok(Rule::Mwkr));
        assert_eq!("Random".parse::<Rule>(), Ok(Rule::Random));
        assert!("spt".parse::<Rule>().is_err());
        for rule in Rule::ALL {
            assert_eq!(rule.to_string().parse::<Rule>(), Ok(rule));
        }
        assert_eq!(Rule::Lwkr.description(), "Least Work Remaining");
    }
}
