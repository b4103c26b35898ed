//! Rendering backends for analysis artifacts.
//!
//! Both collaborators write into the configured output directory and hand
//! back the path of what they produced:
//!
//! - [`deck`] - the slide-deck renderer: a tera-templated four-section HTML
//!   deck (title/summary, key metrics, bottlenecks & actions, next steps).
//! - [`speech`] - the narration synthesizer: an ElevenLabs-compatible
//!   text-to-speech client producing an MP3.

pub mod deck;
pub mod paths;
pub mod speech;

pub use deck::{DeckRenderer, DeckSpec, TeraDeckRenderer};
pub use speech::{ElevenLabsSynthesizer, SpeechSynthesizer};
