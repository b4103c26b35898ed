//! Renders a telemetry record into the bounded text block handed to the
//! language model. Deterministic: same record, same output, byte for byte.

use crate::domain::telemetry::{TelemetryRecord, KNOWN_KPIS};

/// Build the prompt context for one telemetry record.
///
/// Section order is fixed: Process/Period header, `KPIs:`, `Bottlenecks:`,
/// `Top Variants:`. Known KPI keys render with their deployment label in
/// canonical order; unknown keys follow lexicographically under their raw
/// name; absent keys produce no line. Total for any well-formed record.
pub fn build_context(record: &TelemetryRecord) -> String {
    let mut lines = vec![
        format!("Process: {}", record.process),
        format!("Period: {}", record.period),
        "KPIs:".to_string(),
    ];

    for (key, label) in KNOWN_KPIS {
        if let Some(value) = record.kpis.get(key) {
            lines.push(format!(" - {label}: {value}"));
        }
    }
    for (key, value) in &record.kpis {
        if !KNOWN_KPIS.iter().any(|(known, _)| *known == key.as_str()) {
            lines.push(format!(" - {key}: {value}"));
        }
    }

    lines.push(String::new());
    lines.push("Bottlenecks:".to_string());
    for bottleneck in &record.bottleneck_examples {
        lines.push(format!(
            " - Step: {} | Median wait (hrs): {} | Owner: {} | Cases: {}",
            bottleneck.step,
            bottleneck.median_wait_hours,
            bottleneck.owner,
            bottleneck.cases_affected
        ));
    }

    lines.push(String::new());
    lines.push("Top Variants:".to_string());
    for variant in &record.top_variants {
        lines.push(format!(" - {} (share: {})", variant.variant, variant.share));
    }

    lines.join("\n")
}
