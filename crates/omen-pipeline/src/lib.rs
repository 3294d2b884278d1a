//! The run orchestrator: extract a graph, synthesize threats, render
//! and persist the diagram, assemble the bundle. Each run is a pure
//! function of its description (modulo the delegated model calls); no
//! state survives between runs.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use omen_core::{extract, stride, AiSettings, Graph, Threat};
use omen_llm::engine::Completion;
use omen_llm::LlmCompletion;

/// Which implementation backs the extraction and synthesis stages.
#[derive(Clone)]
pub enum Strategy {
    /// Deterministic keyword rules and templated STRIDE expansion.
    RuleBased,
    /// Delegated to a language model, degrading to rule-based output on
    /// malformed responses.
    Delegated(Arc<dyn Completion>),
}

/// Everything one run produces, handed to the presentation layer.
/// Field names are part of the bundle contract (`diagram_path` stays
/// snake_case).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunBundle {
    pub actors: Vec<String>,
    pub components: Vec<String>,
    pub flows: Vec<String>,
    pub threats: Vec<Threat>,
    pub diagram_path: String,
}

pub struct Pipeline {
    strategy: Strategy,
    out_dir: PathBuf,
}

impl Pipeline {
    pub fn new(strategy: Strategy, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            strategy,
            out_dir: out_dir.into(),
        }
    }

    /// Pick the delegated strategy when the AI settings are usable, the
    /// rule-based one otherwise.
    pub fn from_settings(settings: &AiSettings, out_dir: impl Into<PathBuf>) -> Self {
        let strategy = if omen_core::ai_configured(settings) {
            Strategy::Delegated(Arc::new(LlmCompletion::new(settings.clone())))
        } else {
            Strategy::RuleBased
        };
        Self::new(strategy, out_dir)
    }

    /// Run the full pipeline with a fresh run id.
    pub async fn run(&self, description: &str) -> Result<RunBundle, String> {
        self.run_with_id(description, &Uuid::new_v4().to_string()).await
    }

    /// Run the full pipeline. The diagram lands at
    /// `<out_dir>/diagram-<run_id>.drawio`, fully replacing any earlier
    /// file there; distinct run ids keep concurrent runs from racing on
    /// one path.
    pub async fn run_with_id(&self, description: &str, run_id: &str) -> Result<RunBundle, String> {
        let mut graph = self.extract_graph(description).await;

        // Downstream stages must never see an empty component list.
        if graph.components.is_empty() {
            graph.components.push(extract::DEFAULT_COMPONENT.to_string());
            graph.flows = extract::infer_flows(&graph.actors, &graph.components);
        }

        let threats = self.synthesize_threats(description, &graph.components).await;

        let doc = omen_diagram::render(&graph.actors, &graph.components, &graph.flows);
        let path = self.out_dir.join(format!("diagram-{run_id}.drawio"));
        let written = omen_diagram::write_diagram(&doc, &path)?;

        tracing::info!(
            actors = graph.actors.len(),
            components = graph.components.len(),
            threats = threats.len(),
            diagram = %written.display(),
            "threat model generated"
        );

        Ok(RunBundle {
            flows: graph.flows.iter().map(|f| f.to_string()).collect(),
            actors: graph.actors,
            components: graph.components,
            threats,
            diagram_path: written.display().to_string(),
        })
    }

    async fn extract_graph(&self, description: &str) -> Graph {
        match &self.strategy {
            Strategy::RuleBased => extract::extract(description),
            Strategy::Delegated(completion) => {
                omen_llm::extract(completion.as_ref(), description).await
            }
        }
    }

    async fn synthesize_threats(&self, description: &str, components: &[String]) -> Vec<Threat> {
        match &self.strategy {
            Strategy::RuleBased => stride::synthesize(components),
            Strategy::Delegated(completion) => {
                omen_llm::synthesize(completion.as_ref(), description, components).await
            }
        }
    }
}
