//! Rule registry and node-kind dispatch.
//!
//! The registry owns the active rules and a table from [`SyntaxKind`] to the
//! rules that asked for that kind, built once so analysis never scans the
//! whole rule list per node.

use std::collections::HashMap;

use tracing::{debug, warn};
use trivialint_ast::SyntaxKind;

use crate::config::LinterConfig;
use crate::rules::{Rule, builtin_rules};
use crate::violation::Severity;

struct RegisteredRule {
    rule: Box<dyn Rule>,
    severity: Severity,
}

/// The active rule set of one linter.
pub struct RuleRegistry {
    rules: Vec<RegisteredRule>,
    dispatch: HashMap<SyntaxKind, Vec<usize>>,
    document_rules: Vec<usize>,
}

impl RuleRegistry {
    /// Registers `rules`, all reporting with the default severity.
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::build(
            rules
                .into_iter()
                .map(|rule| RegisteredRule {
                    rule,
                    severity: Severity::default(),
                })
                .collect(),
        )
    }

    /// Every built-in rule.
    pub fn builtin() -> Self {
        Self::new(builtin_rules())
    }

    /// The built-in rules enabled by `config`, with configured severities.
    pub fn from_config(config: &LinterConfig) -> Self {
        let rules = builtin_rules();
        for id in config.options.keys() {
            if !rules.iter().any(|rule| rule.id() == id) {
                warn!("Unknown rule in config: {}", id);
            }
        }

        let registered = rules
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_rule_enabled(rule.id());
                if !enabled {
                    debug!("Rule disabled by config: {}", rule.id());
                }
                enabled
            })
            .map(|rule| {
                let severity = config.rule_severity(rule.id());
                RegisteredRule { rule, severity }
            })
            .collect();
        Self::build(registered)
    }

    fn build(rules: Vec<RegisteredRule>) -> Self {
        let mut dispatch: HashMap<SyntaxKind, Vec<usize>> = HashMap::new();
        let mut document_rules = Vec::new();
        for (index, registered) in rules.iter().enumerate() {
            let kinds = registered.rule.node_kinds();
            if kinds.is_empty() {
                document_rules.push(index);
            }
            for kind in kinds {
                dispatch.entry(*kind).or_default().push(index);
            }
        }
        Self {
            rules,
            dispatch,
            document_rules,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Active rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(|r| r.rule.as_ref())
    }

    pub fn get(&self, rule_id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.rule.id() == rule_id)
            .map(|r| r.rule.as_ref())
    }

    /// Severity attached to violations of `rule_id`.
    pub fn severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules
            .iter()
            .find(|r| r.rule.id() == rule_id)
            .map(|r| r.severity)
    }

    /// Rules receiving nodes of `kind`, with their severities.
    pub(crate) fn node_rules(
        &self,
        kind: SyntaxKind,
    ) -> impl Iterator<Item = (&dyn Rule, Severity)> + '_ {
        self.dispatch
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&i| (self.rules[i].rule.as_ref(), self.rules[i].severity))
    }

    /// Rules that scan the whole document, with their severities.
    pub(crate) fn document_rules(&self) -> impl Iterator<Item = (&dyn Rule, Severity)> + '_ {
        self.document_rules
            .iter()
            .map(|&i| (self.rules[i].rule.as_ref(), self.rules[i].severity))
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_dispatch_table() {
        let registry = RuleRegistry::builtin();
        assert_eq!(registry.len(), 12);

        let invocation: Vec<&str> = registry
            .node_rules(SyntaxKind::Invocation)
            .map(|(rule, _)| rule.id())
            .collect();
        assert_eq!(invocation, vec!["no-space-before-argument-list"]);

        let documents: Vec<&str> = registry.document_rules().map(|(r, _)| r.id()).collect();
        assert_eq!(
            documents,
            vec!["no-trailing-whitespace", "final-newline", "max-line-length"]
        );
        assert_eq!(registry.node_rules(SyntaxKind::MemberInvocation).count(), 0);
    }

    #[test]
    fn test_from_config_filters_and_sets_severity() {
        let config = LinterConfig::from_json(
            r#"{
                "options": {
                    "max-line-length": false,
                    "final-newline": "off",
                    "no-trailing-whitespace": "warning",
                    "operator-at-line-start": { "severity": "info" }
                }
            }"#,
        )
        .unwrap();
        let registry = RuleRegistry::from_config(&config);

        assert_eq!(registry.len(), 10);
        assert!(registry.get("max-line-length").is_none());
        assert!(registry.get("final-newline").is_none());
        assert_eq!(
            registry.severity("no-trailing-whitespace"),
            Some(Severity::Warning)
        );
        assert_eq!(
            registry.severity("operator-at-line-start"),
            Some(Severity::Info)
        );
        assert_eq!(registry.severity("no-space-in-cast"), Some(Severity::Error));
    }

    #[test]
    fn test_unknown_rule_in_config_is_ignored() {
        let config = LinterConfig::from_json(r#"{ "options": { "no-such-rule": true } }"#).unwrap();
        assert_eq!(RuleRegistry::from_config(&config).len(), 12);
    }

    #[test]
    fn test_empty_registry() {
        let registry = RuleRegistry::new(Vec::new());
        assert!(registry.is_empty());
        assert_eq!(registry.document_rules().count(), 0);
    }
}
