//! Slide-deck rendering from analysis output.
//!
//! The deck is a four-section HTML document rendered through tera: a title
//! slide with the executive summary, a key-metrics slide, a bottlenecks &
//! actions slide, and a fixed next-steps slide. Empty inputs substitute
//! placeholder lines so no section ever renders blank.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use procsight_core::PipelineError;
use tera::{Context, Tera};
use tracing::info;

use crate::paths::checked_filename;

const DECK_TEMPLATE: &str = "deck.html.tera";

const EMPTY_KPIS_PLACEHOLDER: &str = "No KPIs available.";
const EMPTY_LINES_PLACEHOLDER: &str = "No bottlenecks found.";

const NEXT_STEPS: [&str; 3] = [
    "1) Validate data assumptions with process owners",
    "2) Pilot quick wins (SLA alerts, approval auto-routing)",
    "3) Re-measure cycle time & rework after 2 weeks",
];

/// Everything a deck needs: title, summary, the bullet/action lines in
/// display order, the KPI mapping, and the bare output filename.
#[derive(Clone, Debug, PartialEq)]
pub struct DeckSpec {
    pub title: String,
    pub summary: String,
    pub lines: Vec<String>,
    pub kpis: BTreeMap<String, f64>,
    pub filename: String,
}

#[async_trait]
pub trait DeckRenderer: Send + Sync {
    /// Render the deck into the output directory and return its path.
    async fn render_deck(&self, deck: &DeckSpec) -> Result<PathBuf, PipelineError>;
}

/// Tera-backed renderer writing HTML decks into `output_dir`.
pub struct TeraDeckRenderer {
    tera: Tera,
    output_dir: PathBuf,
}

impl TeraDeckRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let mut tera = Tera::default();
        tera.add_raw_template(DECK_TEMPLATE, include_str!("../templates/deck.html.tera"))
            .map_err(|err| {
                PipelineError::Render(format!("deck template failed to load: {err}"))
            })?;

        Ok(Self { tera, output_dir: output_dir.into() })
    }
}

#[async_trait]
impl DeckRenderer for TeraDeckRenderer {
    async fn render_deck(&self, deck: &DeckSpec) -> Result<PathBuf, PipelineError> {
        let filename = checked_filename(&deck.filename)?;

        let kpi_lines: Vec<String> = if deck.kpis.is_empty() {
            vec![EMPTY_KPIS_PLACEHOLDER.to_string()]
        } else {
            deck.kpis.iter().map(|(key, value)| format!("{key}: {value}")).collect()
        };

        let bullet_lines: Vec<String> = if deck.lines.is_empty() {
            vec![EMPTY_LINES_PLACEHOLDER.to_string()]
        } else {
            deck.lines.clone()
        };

        let mut context = Context::new();
        context.insert("title", &deck.title);
        context.insert("summary", &deck.summary);
        context.insert("kpi_lines", &kpi_lines);
        context.insert("bullet_lines", &bullet_lines);
        context.insert("next_steps", &NEXT_STEPS);

        let html = self
            .tera
            .render(DECK_TEMPLATE, &context)
            .map_err(|err| PipelineError::Render(format!("deck template failed: {err}")))?;

        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|err| {
            PipelineError::Render(format!(
                "could not create output directory {}: {err}",
                self.output_dir.display()
            ))
        })?;

        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, html).await.map_err(|err| {
            PipelineError::Render(format!("could not write deck {}: {err}", path.display()))
        })?;

        info!(
            event_name = "render.deck.written",
            path = %path.display(),
            line_count = deck.lines.len(),
            kpi_count = deck.kpis.len(),
            "slide deck written"
        );

        Ok(path)
    }
}
