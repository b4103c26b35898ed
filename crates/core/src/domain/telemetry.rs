use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Snapshot of process-mining metrics for one analysis request.
///
/// Produced fresh per request by a `TelemetrySource`, immutable once
/// returned, never persisted. Every collection field defaults to empty so a
/// partial upstream payload deserializes cleanly instead of failing the run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub kpis: BTreeMap<String, f64>,
    #[serde(default)]
    pub bottleneck_examples: Vec<Bottleneck>,
    #[serde(default)]
    pub top_variants: Vec<VariantShare>,
}

/// One slow step observed in the event log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub step: String,
    pub median_wait_hours: f64,
    pub owner: String,
    pub cases_affected: u64,
}

/// One process variant and its share of observed cases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantShare {
    /// Path description, e.g. `Start→Create PO→Approve PO→Pay`.
    pub variant: String,
    /// Fraction of cases following this path, expected in `[0, 1]`.
    pub share: f64,
}

/// KPI keys this deployment knows labels for, in presentation order.
/// Records may carry additional keys; those are surfaced with their raw name.
pub const KNOWN_KPIS: [(&str, &str); 4] = [
    ("avg_cycle_time_days", "Avg cycle time (days)"),
    ("rework_rate", "Rework rate"),
    ("stuck_in_approval_pct", "Stuck in approval %"),
    ("late_payment_pct", "Late payment %"),
];
