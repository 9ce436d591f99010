//! Step response synthesis
//!
//! Turns a formatted prompt and an optional tool observation into the step's
//! response. The default heuristic stands in for a model call; anything that
//! implements `Synthesizer` can replace it.

use anyhow::Result;
use async_trait::async_trait;

/// Emitted when the heuristic has nothing left to say
pub const FALLBACK_RESPONSE: &str = "No actionable insight produced.";

#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, prompt: &str, observation: Option<&str>) -> Result<String>;
}

/// Last prompt line joined with the observation, whitespace collapsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSynthesizer;

impl HeuristicSynthesizer {
    pub fn respond(prompt: &str, observation: Option<&str>) -> String {
        let last_line = prompt.rsplit('\n').next().unwrap_or_default();

        let joined = [Some(last_line), observation]
            .into_iter()
            .flatten()
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");

        let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            FALLBACK_RESPONSE.to_string()
        } else {
            collapsed
        }
    }
}

#[async_trait]
impl Synthesizer for HeuristicSynthesizer {
    async fn synthesize(&self, prompt: &str, observation: Option<&str>) -> Result<String> {
        Ok(Self::respond(prompt, observation))
    }
}
