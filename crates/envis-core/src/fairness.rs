//! Fairness calculator
//!
//! Values each partner's weekly unpaid labour at an hourly rate, annualises
//! it as "virtual income", and compares contribution ratios with and without
//! it. All functions are pure.

use serde::{Deserialize, Serialize};

/// Weeks used to annualise weekly unpaid hours
pub const DEFAULT_WEEKS_PER_YEAR: f64 = 52.0;

/// Hourly value suggested for new partners
pub const DEFAULT_HOURLY_VALUE: f64 = 15.0;

/// Inputs for one partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerData {
    pub name: String,
    /// Annual gross income
    pub gross_income: f64,
    /// Unpaid hours per week
    pub unpaid_hours: f64,
    /// Value of one unpaid hour
    pub hourly_value: f64,
}

impl PartnerData {
    pub fn new(name: impl Into<String>, gross_income: f64, unpaid_hours: f64, hourly_value: f64) -> Self {
        Self {
            name: name.into(),
            gross_income,
            unpaid_hours,
            hourly_value,
        }
    }

    /// Annualised value of unpaid labour
    pub fn virtual_income(&self, weeks_per_year: f64) -> f64 {
        self.unpaid_hours * self.hourly_value * weeks_per_year
    }

    /// Gross income plus virtual income
    pub fn total_contribution(&self, weeks_per_year: f64) -> f64 {
        self.gross_income + self.virtual_income(weeks_per_year)
    }
}

/// Result of a fairness calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessData {
    pub partner1: PartnerData,
    pub partner2: PartnerData,
    /// Percentages based on gross income only
    pub before_ratio: [u8; 2],
    /// Percentages including virtual income
    pub after_ratio: [u8; 2],
    /// Absolute change in partner 1's share
    pub ratio_shift: u8,
}

/// Split `part` of `total` into a whole-percent pair summing to 100
///
/// Non-positive totals give 50/50.
fn percent_pair(part: f64, total: f64) -> [u8; 2] {
    if total <= 0.0 || !total.is_finite() {
        return [50, 50];
    }
    let first = (part / total * 100.0).round().clamp(0.0, 100.0) as u8;
    [first, 100 - first]
}

/// Calculate before/after contribution ratios for two partners
pub fn calculate(partner1: PartnerData, partner2: PartnerData, weeks_per_year: f64) -> FairnessData {
    let income_total = partner1.gross_income + partner2.gross_income;
    let before_ratio = percent_pair(partner1.gross_income, income_total);

    let p1_total = partner1.total_contribution(weeks_per_year);
    let p2_total = partner2.total_contribution(weeks_per_year);
    let after_ratio = percent_pair(p1_total, p1_total + p2_total);

    let ratio_shift = after_ratio[0].abs_diff(before_ratio[0]);

    tracing::debug!(
        before = ?before_ratio,
        after = ?after_ratio,
        shift = ratio_shift,
        "Calculated fairness ratios"
    );

    FairnessData {
        partner1,
        partner2,
        before_ratio,
        after_ratio,
        ratio_shift,
    }
}

impl FairnessData {
    /// Partner with more unpaid hours (partner 1 on ties)
    pub fn higher_unpaid_partner(&self) -> &PartnerData {
        if self.partner1.unpaid_hours >= self.partner2.unpaid_hours {
            &self.partner1
        } else {
            &self.partner2
        }
    }

    /// One-line explanation of the shift, or None when nothing changed
    pub fn summary(&self) -> Option<String> {
        if self.ratio_shift == 0 {
            return None;
        }
        let partner = self.higher_unpaid_partner();
        Some(format!(
            "By recognizing {}'s {} hours of unpaid labor per week, the fair contribution shifts by {}%.",
            partner.name, partner.unpaid_hours, self.ratio_shift
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> FairnessData {
        calculate(
            PartnerData::new("Alex", 45000.0, 10.0, 15.0),
            PartnerData::new("Sam", 35000.0, 30.0, 15.0),
            DEFAULT_WEEKS_PER_YEAR,
        )
    }

    #[test]
    fn test_virtual_income() {
        let alex = PartnerData::new("Alex", 45000.0, 10.0, 15.0);
        assert_eq!(alex.virtual_income(52.0), 7800.0);
        assert_eq!(alex.total_contribution(52.0), 52800.0);

        let sam = PartnerData::new("Sam", 35000.0, 30.0, 15.0);
        assert_eq!(sam.virtual_income(52.0), 23400.0);
        assert_eq!(sam.total_contribution(52.0), 58400.0);
    }

    #[test]
    fn test_worked_example() {
        let data = example();
        assert_eq!(data.before_ratio, [56, 44]);
        assert_eq!(data.after_ratio, [47, 53]);
        assert_eq!(data.ratio_shift, 9);
    }

    #[test]
    fn test_summary_names_higher_unpaid_partner() {
        let data = example();
        assert_eq!(data.higher_unpaid_partner().name, "Sam");
        let summary = data.summary().unwrap();
        assert!(summary.contains("Sam's 30 hours"));
        assert!(summary.contains("shifts by 9%"));
    }

    #[test]
    fn test_tie_prefers_partner1() {
        let data = calculate(
            PartnerData::new("A", 30000.0, 5.0, 15.0),
            PartnerData::new("B", 30000.0, 5.0, 15.0),
            52.0,
        );
        assert_eq!(data.higher_unpaid_partner().name, "A");
        assert_eq!(data.ratio_shift, 0);
        assert!(data.summary().is_none());
    }

    #[test]
    fn test_degenerate_totals() {
        let data = calculate(
            PartnerData::new("A", 0.0, 0.0, 15.0),
            PartnerData::new("B", 0.0, 0.0, 15.0),
            52.0,
        );
        assert_eq!(data.before_ratio, [50, 50]);
        assert_eq!(data.after_ratio, [50, 50]);

        // Income-only total is zero but unpaid work is not
        let data = calculate(
            PartnerData::new("A", 0.0, 10.0, 15.0),
            PartnerData::new("B", 0.0, 30.0, 15.0),
            52.0,
        );
        assert_eq!(data.before_ratio, [50, 50]);
        assert_eq!(data.after_ratio, [25, 75]);
        assert_eq!(data.ratio_shift, 25);
    }

    #[test]
    fn test_pairs_sum_to_100() {
        for (a, b) in [(1.0, 2.0), (12345.0, 99.0), (1.0, 1.0), (7.0, 3.0)] {
            let data = calculate(
                PartnerData::new("A", a, a / 100.0, 12.5),
                PartnerData::new("B", b, b / 50.0, 12.5),
                52.0,
            );
            assert_eq!(data.before_ratio[0] as u32 + data.before_ratio[1] as u32, 100);
            assert_eq!(data.after_ratio[0] as u32 + data.after_ratio[1] as u32, 100);
        }
    }
}
