pub mod engine;
mod parse;
mod prompt;

pub use engine::{Completion, LlmCompletion};

use omen_core::{stride, Graph, Threat};

/// Delegated graph extraction. A transport failure or malformed
/// response degrades to the documented default graph; the caller never
/// sees an error. No retry against the capability.
pub async fn extract(completion: &dyn Completion, description: &str) -> Graph {
    let user = prompt::extraction_user(description);
    match completion.complete(prompt::extraction_system(), &user).await {
        Ok(raw) => {
            tracing::debug!(raw = %raw, "extraction response");
            parse::parse_graph(&raw)
        }
        Err(e) => {
            tracing::warn!(error = %e, "extraction call failed, using default graph");
            parse::parse_graph("")
        }
    }
}

/// Delegated threat synthesis. Falls back to the deterministic STRIDE
/// expansion when the response cannot be parsed or is empty, so a
/// non-empty component list never yields an empty threat list.
pub async fn synthesize(
    completion: &dyn Completion,
    description: &str,
    components: &[String],
) -> Vec<Threat> {
    let user = prompt::synthesis_user(description, components);
    match completion.complete(prompt::synthesis_system(), &user).await {
        Ok(raw) => {
            tracing::debug!(raw = %raw, "synthesis response");
            match parse::parse_threats(&raw) {
                Some(threats) => threats,
                None => {
                    tracing::warn!("unparseable or empty threat list, using deterministic synthesis");
                    stride::synthesize(components)
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "synthesis call failed, using deterministic synthesis");
            stride::synthesize(components)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Canned(&'static str);

    #[async_trait]
    impl Completion for Canned {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl Completion for Failing {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, String> {
            Err("transport down".to_string())
        }
    }

    #[tokio::test]
    async fn extraction_uses_model_output() {
        let canned = Canned(r#"{"actors":["Clerk"],"components":["Ledger"],"flows":[]}"#);
        let graph = extract(&canned, "a bookkeeping tool").await;
        assert_eq!(graph.actors, vec!["Clerk".to_string()]);
        assert_eq!(graph.components, vec!["Ledger".to_string()]);
        // flows were not supplied, so inference kicks in
        assert_eq!(graph.flows.len(), 1);
    }

    #[tokio::test]
    async fn extraction_degrades_on_transport_failure() {
        let graph = extract(&Failing, "anything").await;
        assert_eq!(graph.actors, vec!["User".to_string()]);
        assert_eq!(graph.components, vec!["Core Application".to_string()]);
    }

    #[tokio::test]
    async fn extraction_degrades_on_prose_response() {
        let graph = extract(&Canned("I'd be happy to help! First,"), "anything").await;
        assert_eq!(graph.components, vec!["Core Application".to_string()]);
    }

    #[tokio::test]
    async fn synthesis_uses_model_output() {
        let canned = Canned(
            r#"[{"title":"Forged entries","category":"Repudiation","component":"Ledger","description":"No audit trail."}]"#,
        );
        let threats = synthesize(&canned, "a bookkeeping tool", &["Ledger".to_string()]).await;
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].category, "Repudiation");
    }

    #[tokio::test]
    async fn synthesis_falls_back_to_deterministic_set() {
        let components = vec!["Ledger".to_string(), "Gateway".to_string()];

        let empty = Canned("[]");
        let threats = synthesize(&empty, "desc", &components).await;
        assert_eq!(threats.len(), 8);

        let threats = synthesize(&Failing, "desc", &components).await;
        assert_eq!(threats.len(), 8);

        let truncated = Canned("[{\"title\": \"cut off");
        let threats = synthesize(&truncated, "desc", &components).await;
        assert_eq!(threats.len(), 8);
    }
}
