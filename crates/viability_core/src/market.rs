//! Jurisdiction registry and market assumptions.
//!
//! A [`MarketAssumptions`] value is an immutable snapshot of the rates
//! and operational factors for one computation run. Jurisdiction-specific
//! behaviour (tax schema, investment unit costs) is selected through the
//! [`Jurisdiction`] enum rather than ad hoc string comparison; unknown
//! market names resolve to the Brazil profile as a documented, logged
//! fallback.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tax and cost-table jurisdiction.
///
/// Selected from the market name through [`Jurisdiction::resolve`].
/// The set is closed: every downstream table (tax schema, unit costs)
/// is total over these variants, so the engine never fails on an
/// unknown market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    /// Simplified national regime plus ISS and PIS/COFINS on revenue.
    Brazil,
    /// VAT plus social-security levy on revenue, corporate tax on profit.
    Europe,
    /// VAT on revenue plus corporate tax on profit.
    Gulf,
}

impl Jurisdiction {
    /// Resolve a market name to a jurisdiction.
    ///
    /// Unknown names fall back to [`Jurisdiction::Brazil`]; the fallback
    /// is non-fatal and emitted as a `tracing` warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use viability_core::market::Jurisdiction;
    ///
    /// assert_eq!(Jurisdiction::resolve("Europa"), Jurisdiction::Europe);
    /// assert_eq!(Jurisdiction::resolve("Atlantis"), Jurisdiction::Brazil);
    /// ```
    pub fn resolve(name: &str) -> Self {
        match name {
            "Brasil" | "Brazil" => Jurisdiction::Brazil,
            "Europa" | "Europe" => Jurisdiction::Europe,
            "Emirados Árabes" | "Emirates" | "UAE" | "Gulf" => Jurisdiction::Gulf,
            other => {
                warn!(market = other, "unknown market name, using Brazil profile");
                Jurisdiction::Brazil
            }
        }
    }
}

/// Market assumptions for one computation run.
///
/// Required fields carry the core rates every jurisdiction needs;
/// the optional fields are jurisdiction-specific levies whose defaults
/// live in the tax module's schema tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAssumptions {
    /// Market name, e.g. `"Brasil"`. Resolved through [`Jurisdiction::resolve`].
    pub name: String,
    /// Currency symbol for display, e.g. `"R$"`.
    pub currency: String,
    /// Corporate tax rate applied to positive profit.
    pub corporate_tax: f64,
    /// Annual cost inflation rate.
    pub inflation_rate: f64,
    /// Annual revenue growth potential.
    pub growth_potential: f64,
    /// Discount rate for present-value computations.
    pub discount_rate: f64,
    /// Expected field occupancy fraction.
    #[serde(default = "defaults::occupancy")]
    pub expected_occupancy: f64,
    /// Payroll burden on top of gross salaries.
    #[serde(default = "defaults::salary_burden")]
    pub salary_burden: f64,
    /// Maintenance spend as a fraction of revenue.
    #[serde(default = "defaults::maintenance_factor")]
    pub maintenance_factor: f64,
    /// ISS service-tax rate on revenue (Brazil).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss_rate: Option<f64>,
    /// PIS/COFINS rate on revenue (Brazil).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pis_cofins: Option<f64>,
    /// Social contribution rate on profit (Brazil).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_contribution: Option<f64>,
    /// VAT rate on revenue (Europe/Gulf).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<f64>,
    /// Social-security levy on revenue (Europe).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_security: Option<f64>,
}

mod defaults {
    pub fn occupancy() -> f64 {
        0.65
    }
    pub fn salary_burden() -> f64 {
        0.70
    }
    pub fn maintenance_factor() -> f64 {
        0.05
    }
}

impl MarketAssumptions {
    /// Jurisdiction for this market's name.
    pub fn jurisdiction(&self) -> Jurisdiction {
        Jurisdiction::resolve(&self.name)
    }

    /// Built-in Brazilian market profile.
    pub fn brazil() -> Self {
        Self {
            name: "Brasil".to_string(),
            currency: "R$".to_string(),
            corporate_tax: 0.25,
            inflation_rate: 0.065,
            growth_potential: 0.15,
            discount_rate: 0.12,
            expected_occupancy: 0.65,
            salary_burden: 0.70,
            maintenance_factor: 0.05,
            iss_rate: Some(0.05),
            pis_cofins: Some(0.0365),
            social_contribution: Some(0.09),
            vat_rate: None,
            social_security: None,
        }
    }

    /// Built-in European market profile.
    pub fn europe() -> Self {
        Self {
            name: "Europa".to_string(),
            currency: "€".to_string(),
            corporate_tax: 0.25,
            inflation_rate: 0.03,
            growth_potential: 0.08,
            discount_rate: 0.08,
            expected_occupancy: 0.75,
            salary_burden: 0.45,
            maintenance_factor: 0.06,
            iss_rate: None,
            pis_cofins: None,
            social_contribution: None,
            vat_rate: Some(0.20),
            social_security: Some(0.15),
        }
    }

    /// Built-in Gulf (UAE) market profile.
    pub fn gulf() -> Self {
        Self {
            name: "Emirados Árabes".to_string(),
            currency: "AED".to_string(),
            corporate_tax: 0.09,
            inflation_rate: 0.02,
            growth_potential: 0.12,
            discount_rate: 0.06,
            expected_occupancy: 0.80,
            salary_burden: 0.15,
            maintenance_factor: 0.08,
            iss_rate: None,
            pis_cofins: None,
            social_contribution: None,
            vat_rate: Some(0.05),
            social_security: None,
        }
    }

    /// Look up a built-in profile by market name, without fallback.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "Brasil" | "Brazil" => Some(Self::brazil()),
            "Europa" | "Europe" => Some(Self::europe()),
            "Emirados Árabes" | "Emirates" | "UAE" | "Gulf" => Some(Self::gulf()),
            _ => None,
        }
    }

    /// Names of the built-in profiles.
    pub fn builtin_names() -> [&'static str; 3] {
        ["Brasil", "Europa", "Emirados Árabes"]
    }
}
