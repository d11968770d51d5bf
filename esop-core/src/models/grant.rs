use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Whether the shares trade on a recognized stock exchange. Listed and
/// unlisted shares follow different capital-gains regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareListing {
    Listed,
    Unlisted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantTranche {
    pub id: u32,
    pub share_count: Decimal,
    pub exercise_price: Decimal,
}

impl GrantTranche {
    /// Share count with negative values treated as zero.
    pub fn effective_share_count(&self) -> Decimal {
        self.share_count.max(Decimal::ZERO)
    }

    /// Exercise price with negative values treated as zero.
    pub fn effective_exercise_price(&self) -> Decimal {
        self.exercise_price.max(Decimal::ZERO)
    }
}

/// The full set of grant tranches a calculation runs over, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantPortfolio {
    pub tranches: Vec<GrantTranche>,
}

/// Aggregates over a portfolio, computed in a single pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_shares: Decimal,
    /// Sum of `exercise_price * share_count` over all tranches, unrounded.
    pub exercise_cost: Decimal,
    /// Share-weighted average exercise price; zero when there are no shares.
    pub weighted_avg_exercise_price: Decimal,
}

impl GrantPortfolio {
    pub fn new(tranches: Vec<GrantTranche>) -> Self {
        Self { tranches }
    }

    pub fn is_empty(&self) -> bool {
        self.tranches.is_empty()
    }

    /// Totals the portfolio. Tranches with negative quantities contribute zero
    /// and are logged.
    pub fn summarize(&self) -> PortfolioSummary {
        let mut total_shares = Decimal::ZERO;
        let mut exercise_cost = Decimal::ZERO;

        for tranche in &self.tranches {
            if tranche.share_count < Decimal::ZERO || tranche.exercise_price < Decimal::ZERO {
                warn!(
                    tranche_id = tranche.id,
                    share_count = %tranche.share_count,
                    exercise_price = %tranche.exercise_price,
                    "negative tranche quantities treated as zero"
                );
            }
            total_shares += tranche.effective_share_count();
            exercise_cost += tranche.effective_exercise_price() * tranche.effective_share_count();
        }

        let weighted_avg_exercise_price = exercise_cost
            .checked_div(total_shares)
            .unwrap_or(Decimal::ZERO);

        PortfolioSummary {
            total_shares,
            exercise_cost,
            weighted_avg_exercise_price,
        }
    }
}
