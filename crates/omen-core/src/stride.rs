//! Deterministic STRIDE synthesis: templated findings per component.

use crate::Threat;

/// STRIDE threat categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrideCategory {
    Spoofing,
    Tampering,
    Repudiation,
    InformationDisclosure,
    DenialOfService,
    ElevationOfPrivilege,
}

impl StrideCategory {
    /// Fixed display label, used as the `category` field on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            StrideCategory::Spoofing => "Spoofing",
            StrideCategory::Tampering => "Tampering",
            StrideCategory::Repudiation => "Repudiation",
            StrideCategory::InformationDisclosure => "Information Disclosure",
            StrideCategory::DenialOfService => "Denial of Service",
            StrideCategory::ElevationOfPrivilege => "Elevation of Privilege",
        }
    }

    pub fn all() -> [StrideCategory; 6] {
        [
            StrideCategory::Spoofing,
            StrideCategory::Tampering,
            StrideCategory::Repudiation,
            StrideCategory::InformationDisclosure,
            StrideCategory::DenialOfService,
            StrideCategory::ElevationOfPrivilege,
        ]
    }
}

impl std::fmt::Display for StrideCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Categories the deterministic synthesizer expands per component, in
/// emission order. Repudiation and Elevation of Privilege are
/// deliberately absent: the templated findings below have no
/// per-component story for them, so only the delegated strategy emits
/// those two. Callers wanting full coverage need the delegated path.
pub const DEFAULT_CATEGORIES: [StrideCategory; 4] = [
    StrideCategory::Spoofing,
    StrideCategory::Tampering,
    StrideCategory::InformationDisclosure,
    StrideCategory::DenialOfService,
];

/// Expand every component, in order, into the four templated findings.
pub fn synthesize(components: &[String]) -> Vec<Threat> {
    let mut threats = Vec::with_capacity(components.len() * DEFAULT_CATEGORIES.len());

    for component in components {
        threats.push(Threat {
            title: "Spoofed identity".into(),
            category: StrideCategory::Spoofing.label().into(),
            component: component.clone(),
            description: format!(
                "An attacker may impersonate a legitimate user or service when interacting with {component}."
            ),
        });

        threats.push(Threat {
            title: "Data tampering".into(),
            category: StrideCategory::Tampering.label().into(),
            component: component.clone(),
            description: format!(
                "Unvalidated or unprotected inputs to {component} could allow modification of critical data."
            ),
        });

        threats.push(Threat {
            title: "Sensitive data exposure".into(),
            category: StrideCategory::InformationDisclosure.label().into(),
            component: component.clone(),
            description: format!(
                "{component} might expose sensitive data if encryption, access control, or logging is misconfigured."
            ),
        });

        threats.push(Threat {
            title: "Denial of Service".into(),
            category: StrideCategory::DenialOfService.label().into(),
            component: component.clone(),
            description: format!(
                "{component} could be overwhelmed by high traffic or expensive operations, making the system unavailable."
            ),
        });
    }

    threats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_threats_per_component_in_fixed_order() {
        let components = vec!["API Server".to_string(), "Database".to_string()];
        let threats = synthesize(&components);
        assert_eq!(threats.len(), 8);

        for (i, component) in components.iter().enumerate() {
            let chunk = &threats[i * 4..i * 4 + 4];
            assert!(chunk.iter().all(|t| &t.component == component));
            let categories: Vec<&str> = chunk.iter().map(|t| t.category.as_str()).collect();
            assert_eq!(
                categories,
                vec![
                    "Spoofing",
                    "Tampering",
                    "Information Disclosure",
                    "Denial of Service",
                ]
            );
        }
    }

    #[test]
    fn descriptions_name_the_component() {
        let threats = synthesize(&["Payment Service".to_string()]);
        assert!(threats.iter().all(|t| t.description.contains("Payment Service")));
    }

    #[test]
    fn empty_component_list_yields_no_threats() {
        assert!(synthesize(&[]).is_empty());
    }

    #[test]
    fn deterministic_set_skips_repudiation_and_elevation() {
        let threats = synthesize(&["Core Application".to_string()]);
        assert!(threats.iter().all(|t| {
            t.category != StrideCategory::Repudiation.label()
                && t.category != StrideCategory::ElevationOfPrivilege.label()
        }));
        assert_eq!(StrideCategory::all().len(), 6);
    }
}
