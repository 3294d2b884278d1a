//! Prompt builders for the delegated strategies. Both demand strict
//! JSON output; parse.rs handles the cases where the model ignores that.

/// System prompt for graph extraction.
pub fn extraction_system() -> &'static str {
    "You are a threat-modeling assistant. Read the system description and \
identify the external actors, the internal components, and the data flows \
between them.\n\
Actors are people or external services that originate requests. Components \
are internal parts of the system (services, stores, frontends). List \
components in request-processing order: the first component is the one \
actors talk to. Flow endpoints must reuse actor and component names \
exactly.\n\
Output ONLY a JSON object, nothing else: \
{\"actors\":[\"<name>\"],\"components\":[\"<name>\"],\
\"flows\":[\"<source> -> <target>: <description>\"]}. \
If the description names nothing recognizable, return empty arrays."
}

pub fn extraction_user(description: &str) -> String {
    format!("SYSTEM DESCRIPTION:\n{description}")
}

/// System prompt for threat synthesis.
pub fn synthesis_system() -> &'static str {
    "You are a security analyst producing a STRIDE threat model.\n\
For each component, list the threats that actually apply. Categories: \
Spoofing, Tampering, Repudiation, Information Disclosure, Denial of \
Service, Elevation of Privilege — use any subset per component.\n\
Reference components by the exact names given.\n\
Output ONLY a JSON array, nothing else. Each item: \
{\"title\":\"<short title>\",\"category\":\"<STRIDE category>\",\
\"component\":\"<component name>\",\"description\":\"<one or two sentences>\"}. \
If there is nothing to report, output []."
}

pub fn synthesis_user(description: &str, components: &[String]) -> String {
    format!(
        "SYSTEM DESCRIPTION:\n{}\n\nCOMPONENTS:\n{}",
        description,
        components.join("\n")
    )
}
