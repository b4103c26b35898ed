//! Deterministic demo dataset: one week of Procure-to-Pay telemetry.
//!
//! Seed values live in consts so tests and demos agree on exactly one
//! snapshot; `FixtureSource` assembles a fresh record from them per fetch.

use std::collections::BTreeMap;

use async_trait::async_trait;
use procsight_core::{Bottleneck, PipelineError, TelemetryRecord, VariantShare};

use crate::source::TelemetrySource;

const FIXTURE_PERIOD: &str = "Last 7 days";
const FIXTURE_PROCESS: &str = "Procure-to-Pay";

const FIXTURE_KPIS: &[(&str, f64)] = &[
    ("avg_cycle_time_days", 12.4),
    ("rework_rate", 0.18),
    ("stuck_in_approval_pct", 0.27),
    ("late_payment_pct", 0.11),
];

struct BottleneckSeed {
    step: &'static str,
    median_wait_hours: f64,
    owner: &'static str,
    cases_affected: u64,
}

const FIXTURE_BOTTLENECKS: &[BottleneckSeed] = &[
    BottleneckSeed {
        step: "Approve PO",
        median_wait_hours: 54.0,
        owner: "Procurement",
        cases_affected: 143,
    },
    BottleneckSeed {
        step: "3-way Match",
        median_wait_hours: 37.0,
        owner: "Shared Services",
        cases_affected: 88,
    },
    BottleneckSeed {
        step: "Vendor Onboarding",
        median_wait_hours: 29.0,
        owner: "Vendor Mgmt",
        cases_affected: 22,
    },
];

const FIXTURE_VARIANTS: &[(&str, f64)] = &[
    ("Start→Create PO→Approve PO→3-way Match→Post Invoice→Pay", 0.41),
    ("Start→Create PO→Approve PO→Rework→Approve PO→3-way Match→Pay", 0.17),
];

/// In-process source backed by the canned dataset. Total for any query.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixtureSource;

impl FixtureSource {
    pub fn new() -> Self {
        Self
    }

    /// The canonical demo snapshot.
    pub fn dataset() -> TelemetryRecord {
        TelemetryRecord {
            period: FIXTURE_PERIOD.to_string(),
            process: FIXTURE_PROCESS.to_string(),
            kpis: FIXTURE_KPIS
                .iter()
                .map(|(key, value)| (key.to_string(), *value))
                .collect::<BTreeMap<_, _>>(),
            bottleneck_examples: FIXTURE_BOTTLENECKS
                .iter()
                .map(|seed| Bottleneck {
                    step: seed.step.to_string(),
                    median_wait_hours: seed.median_wait_hours,
                    owner: seed.owner.to_string(),
                    cases_affected: seed.cases_affected,
                })
                .collect(),
            top_variants: FIXTURE_VARIANTS
                .iter()
                .map(|(variant, share)| VariantShare {
                    variant: variant.to_string(),
                    share: *share,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl TelemetrySource for FixtureSource {
    async fn fetch(&self, _query: &str) -> Result<TelemetryRecord, PipelineError> {
        Ok(Self::dataset())
    }
}
