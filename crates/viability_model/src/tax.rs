//! Jurisdiction-aware tax burden estimation.
//!
//! The schema is table-driven per [`Jurisdiction`]: revenue-based levies
//! always apply, profit-based levies apply only to positive profit.
//! Rates not overridden on the market assumptions take the documented
//! jurisdiction defaults below.

use serde::{Deserialize, Serialize};
use viability_core::market::{Jurisdiction, MarketAssumptions};

/// Default ISS service-tax rate on revenue (Brazil).
pub const DEFAULT_ISS_RATE: f64 = 0.05;
/// Default PIS/COFINS rate on revenue (Brazil).
pub const DEFAULT_PIS_COFINS: f64 = 0.0365;
/// Default social-contribution (CSLL) rate on profit (Brazil).
pub const DEFAULT_SOCIAL_CONTRIBUTION: f64 = 0.09;
/// Simplified national regime approximation on revenue (Brazil).
pub const SIMPLES_NACIONAL_RATE: f64 = 0.08;
/// Default VAT rate on revenue (Europe).
pub const DEFAULT_VAT_EUROPE: f64 = 0.20;
/// Default social-security levy on revenue (Europe).
pub const DEFAULT_SOCIAL_SECURITY: f64 = 0.15;
/// Default VAT rate on revenue (Gulf).
pub const DEFAULT_VAT_GULF: f64 = 0.05;

/// One named component of the tax burden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxComponent {
    /// Component name, e.g. `"iss"` or `"corporateTax"`.
    pub name: String,
    /// Amount owed for this component.
    pub amount: f64,
}

/// Tax burden breakdown for one (revenue, profit) pair.
///
/// `total` is always the sum of the components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBurden {
    /// Ordered component breakdown.
    pub components: Vec<TaxComponent>,
    /// Sum of all components.
    pub total: f64,
}

impl TaxBurden {
    fn from_components(components: Vec<TaxComponent>) -> Self {
        let total = components.iter().map(|c| c.amount).sum();
        Self { components, total }
    }

    /// Look up a component amount by name. Returns 0.0 when absent.
    pub fn component(&self, name: &str) -> f64 {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.amount)
            .unwrap_or(0.0)
    }
}

/// Compute the tax burden for annual `revenue` and `profit` under the
/// given market's jurisdiction.
///
/// Profit-based components are zero (but still listed) when profit is
/// not positive. Unknown market names resolve to the Brazil schema, a
/// documented non-fatal fallback.
///
/// # Examples
///
/// ```
/// use viability_core::market::MarketAssumptions;
/// use viability_model::tax::compute_tax_burden;
///
/// let burden = compute_tax_burden(100_000.0, 20_000.0, &MarketAssumptions::europe());
/// assert_eq!(burden.component("vat"), 20_000.0);
/// assert_eq!(burden.component("socialSecurity"), 15_000.0);
/// assert_eq!(burden.component("corporateTax"), 5_000.0);
/// assert_eq!(burden.total, 40_000.0);
/// ```
pub fn compute_tax_burden(revenue: f64, profit: f64, market: &MarketAssumptions) -> TaxBurden {
    let on_profit = |rate: f64| if profit > 0.0 { profit * rate } else { 0.0 };
    let component = |name: &str, amount: f64| TaxComponent {
        name: name.to_string(),
        amount,
    };

    let components = match market.jurisdiction() {
        Jurisdiction::Brazil => vec![
            component("simplesNacional", revenue * SIMPLES_NACIONAL_RATE),
            component("iss", revenue * market.iss_rate.unwrap_or(DEFAULT_ISS_RATE)),
            component(
                "pisCofins",
                revenue * market.pis_cofins.unwrap_or(DEFAULT_PIS_COFINS),
            ),
            component("irpj", on_profit(market.corporate_tax)),
            component(
                "csll",
                on_profit(
                    market
                        .social_contribution
                        .unwrap_or(DEFAULT_SOCIAL_CONTRIBUTION),
                ),
            ),
        ],
        Jurisdiction::Europe => vec![
            component("vat", revenue * market.vat_rate.unwrap_or(DEFAULT_VAT_EUROPE)),
            component("corporateTax", on_profit(market.corporate_tax)),
            component(
                "socialSecurity",
                revenue * market.social_security.unwrap_or(DEFAULT_SOCIAL_SECURITY),
            ),
        ],
        Jurisdiction::Gulf => vec![
            component("vat", revenue * market.vat_rate.unwrap_or(DEFAULT_VAT_GULF)),
            component("corporateTax", on_profit(market.corporate_tax)),
        ],
    };

    TaxBurden::from_components(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_europe_reference_scenario() {
        // computeTaxBurden(100000, 20000, 'Europa'):
        // VAT 20000, social security 15000, corporate 20000 × 0.25.
        let burden = compute_tax_burden(100_000.0, 20_000.0, &MarketAssumptions::europe());
        assert_relative_eq!(burden.component("vat"), 20_000.0);
        assert_relative_eq!(burden.component("socialSecurity"), 15_000.0);
        assert_relative_eq!(burden.component("corporateTax"), 5_000.0);
        assert_relative_eq!(burden.total, 40_000.0);
    }

    #[test]
    fn test_brazil_schema() {
        let burden = compute_tax_burden(100_000.0, 10_000.0, &MarketAssumptions::brazil());
        assert_relative_eq!(burden.component("simplesNacional"), 8_000.0);
        assert_relative_eq!(burden.component("iss"), 5_000.0);
        assert_relative_eq!(burden.component("pisCofins"), 3_650.0);
        assert_relative_eq!(burden.component("irpj"), 2_500.0);
        assert_relative_eq!(burden.component("csll"), 900.0);
        assert_relative_eq!(burden.total, 20_050.0);
    }

    #[test]
    fn test_profit_taxes_skip_losses() {
        let burden = compute_tax_burden(100_000.0, -5_000.0, &MarketAssumptions::brazil());
        assert_eq!(burden.component("irpj"), 0.0);
        assert_eq!(burden.component("csll"), 0.0);
        // Revenue-based levies still apply.
        assert_relative_eq!(burden.component("simplesNacional"), 8_000.0);
    }

    #[test]
    fn test_gulf_schema() {
        let burden = compute_tax_burden(200_000.0, 50_000.0, &MarketAssumptions::gulf());
        assert_relative_eq!(burden.component("vat"), 10_000.0);
        assert_relative_eq!(burden.component("corporateTax"), 4_500.0);
        assert_relative_eq!(burden.total, 14_500.0);
        assert_eq!(burden.components.len(), 2);
    }

    #[test]
    fn test_unknown_market_uses_brazil_schema() {
        let mut market = MarketAssumptions::brazil();
        market.name = "Oceania".to_string();
        let fallback = compute_tax_burden(100_000.0, 10_000.0, &market);
        let brazil = compute_tax_burden(100_000.0, 10_000.0, &MarketAssumptions::brazil());
        assert_eq!(fallback, brazil);
    }

    #[test]
    fn test_rate_overrides_take_precedence() {
        let mut market = MarketAssumptions::europe();
        market.vat_rate = Some(0.10);
        market.social_security = Some(0.05);
        let burden = compute_tax_burden(100_000.0, 0.0, &market);
        assert_relative_eq!(burden.component("vat"), 10_000.0);
        assert_relative_eq!(burden.component("socialSecurity"), 5_000.0);
    }

    #[test]
    fn test_total_is_component_sum() {
        let burden = compute_tax_burden(123_456.0, 7_890.0, &MarketAssumptions::gulf());
        let sum: f64 = burden.components.iter().map(|c| c.amount).sum();
        assert_relative_eq!(burden.total, sum);
    }
}
