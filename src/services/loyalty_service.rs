use thiserror::Error;

use crate::models::loyalty::{LoyaltyAccount, LoyaltyView, Tier};

/// Lower bound of each tier band, ascending.
const TIER_THRESHOLDS: [(u64, Tier); 4] = [
    (0, Tier::Bronze),
    (1_000, Tier::Silver),
    (5_000, Tier::Gold),
    (10_000, Tier::Platinum),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoyaltyError {
    #[error("points delta must be positive, got {0}")]
    InvalidPointsDelta(i64),
}

pub struct LoyaltyService;

impl LoyaltyService {
    pub fn tier_for(total_points: u64) -> (Tier, &'static str) {
        let tier = TIER_THRESHOLDS
            .iter()
            .rev()
            .find(|(threshold, _)| total_points >= *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Bronze);

        (tier, Self::benefits(tier))
    }

    pub fn benefits(tier: Tier) -> &'static str {
        match tier {
            Tier::Bronze => "Earn points on every completed ride",
            Tier::Silver => "5% off rides and priority support",
            Tier::Gold => "10% off rides and free vehicle upgrades",
            Tier::Platinum => "15% off rides, free luxury upgrades and a dedicated concierge",
        }
    }

    /// Returns the account with `delta` added and the tier recomputed.
    pub fn award_points(account: &LoyaltyAccount, delta: i64) -> Result<LoyaltyAccount, LoyaltyError> {
        if delta <= 0 {
            return Err(LoyaltyError::InvalidPointsDelta(delta));
        }

        let total_points = account.total_points.saturating_add(delta as u64);
        let (tier, _) = Self::tier_for(total_points);

        Ok(LoyaltyAccount { total_points, tier })
    }

    pub fn view(account: &LoyaltyAccount) -> LoyaltyView {
        let (tier, benefits) = Self::tier_for(account.total_points);
        LoyaltyView {
            total_points: account.total_points,
            tier,
            benefits: benefits.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bands() {
        assert_eq!(LoyaltyService::tier_for(0).0, Tier::Bronze);
        assert_eq!(LoyaltyService::tier_for(999).0, Tier::Bronze);
        assert_eq!(LoyaltyService::tier_for(1_000).0, Tier::Silver);
        assert_eq!(LoyaltyService::tier_for(4_999).0, Tier::Silver);
        assert_eq!(LoyaltyService::tier_for(5_000).0, Tier::Gold);
        assert_eq!(LoyaltyService::tier_for(9_999).0, Tier::Gold);
        assert_eq!(LoyaltyService::tier_for(10_000).0, Tier::Platinum);
        assert_eq!(LoyaltyService::tier_for(u64::MAX).0, Tier::Platinum);
    }

    #[test]
    fn test_tiers_are_ordered_by_points() {
        let mut previous = Tier::Bronze;
        for points in (0..12_000).step_by(250) {
            let (tier, _) = LoyaltyService::tier_for(points);
            assert!(tier >= previous);
            previous = tier;
        }
    }

    #[test]
    fn test_award_points_adds_delta_and_recomputes_tier() {
        let account = LoyaltyAccount::default();

        let account = LoyaltyService::award_points(&account, 950).unwrap();
        assert_eq!(account.total_points, 950);
        assert_eq!(account.tier, Tier::Bronze);

        let account = LoyaltyService::award_points(&account, 50).unwrap();
        assert_eq!(account.total_points, 1_000);
        assert_eq!(account.tier, Tier::Silver);

        let account = LoyaltyService::award_points(&account, 9_000).unwrap();
        assert_eq!(account.tier, Tier::Platinum);
    }

    #[test]
    fn test_award_points_rejects_non_positive_delta() {
        let account = LoyaltyAccount {
            total_points: 300,
            tier: Tier::Bronze,
        };
        assert_eq!(
            LoyaltyService::award_points(&account, 0),
            Err(LoyaltyError::InvalidPointsDelta(0))
        );
        assert_eq!(
            LoyaltyService::award_points(&account, -5),
            Err(LoyaltyError::InvalidPointsDelta(-5))
        );
    }

    #[test]
    fn test_view_includes_benefits() {
        let view = LoyaltyService::view(&LoyaltyAccount {
            total_points: 5_200,
            tier: Tier::Gold,
        });
        assert_eq!(view.tier, Tier::Gold);
        assert_eq!(view.benefits, LoyaltyService::benefits(Tier::Gold));
    }
}
