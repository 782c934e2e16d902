//! # viability_model: Deterministic Modelling Layer
//!
//! Pure functions over immutable inputs, in strict dependency order:
//!
//! - `aggregate` — flattens nested revenue/cost category maps into totals
//!   and percentage breakdowns
//! - `tax` — jurisdiction-aware tax burden
//! - `investment` — initial capital requirement from market unit costs
//! - `projection` — multi-year compounding revenue/cost projections
//! - `valuation` — NPV, IRR, payback, ROI, DCF enterprise value
//! - `kpi` — strategic KPI synthesis
//!
//! Nothing here performs I/O or holds state; every entity is created
//! fresh from its inputs and never mutated afterwards.

pub mod aggregate;
pub mod investment;
pub mod kpi;
pub mod projection;
pub mod tax;
pub mod valuation;

pub use aggregate::{aggregate, CategoryInput, CategoryTotals, CustomField};
pub use investment::{compute_investment, InvestmentBreakdown};
pub use kpi::{synthesize_kpis, KpiRecord, KpiTargets, StrategicKpiSet, Trend};
pub use projection::{project, CashFlowRecord, Projection, YearMetrics, DEFAULT_HORIZON_YEARS};
pub use tax::{compute_tax_burden, TaxBurden, TaxComponent};
pub use valuation::{viability_metrics, DcfValuation, ViabilityMetrics};
