use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parsed model output for one analysis request.
///
/// Only ever constructed by `contract::parse_analysis`, which guarantees the
/// source text was a well-formed JSON object. Missing keys default to their
/// natural empty value; they are never absent on the Rust side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    /// Narrator script for speech synthesis. Target length is 60-120 words,
    /// requested in the prompt but never enforced here.
    #[serde(default)]
    pub narration: String,
}

/// Aggregated outcome of one full agent run: the telemetry KPIs, the four
/// analysis fields, and the artifact paths for whichever optional rendering
/// steps ran. Assembled once per run and returned whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AgentRunResult {
    pub kpis: BTreeMap<String, f64>,
    pub summary: String,
    pub bullets: Vec<String>,
    pub actions: Vec<String>,
    pub narration: String,
    pub ppt_path: Option<String>,
    pub audio_path: Option<String>,
}
