use ethers::types::{U256, U512};
use serde::{Deserialize, Serialize};

/// The fraction of total voting power a checkpoint signature must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumThreshold {
    pub numerator: u64,
    pub denominator: u64,
}

impl Default for QuorumThreshold {
    fn default() -> Self {
        Self {
            numerator: 2,
            denominator: 3,
        }
    }
}

impl QuorumThreshold {
    /// The minimum voting power that reaches quorum: `ceil(total * numerator / denominator)`.
    pub fn quorum_size(&self, total_voting_power: U256) -> U256 {
        if self.denominator == 0 {
            return total_voting_power;
        }
        let product = total_voting_power.full_mul(U256::from(self.numerator));
        let denominator = U512::from(self.denominator);
        let quotient = (product + denominator - 1) / denominator;
        U256::try_from(quotient).unwrap_or(U256::MAX)
    }

    /// Returns true if `power` meets or exceeds the quorum of `total_voting_power`.
    pub fn is_reached(&self, power: U256, total_voting_power: U256) -> bool {
        power >= self.quorum_size(total_voting_power)
    }
}
