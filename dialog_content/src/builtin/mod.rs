//! The game's own narrative content, compiled into the binary.

use crate::error::ContentError;
use crate::module::ContentModule;

/// Module name and TOML source for every built-in narrative unit.
pub const SOURCES: &[(&str, &str)] = &[
    ("intro", include_str!("content/intro.toml")),
    ("movement", include_str!("content/movement.toml")),
    ("fuel", include_str!("content/fuel.toml")),
    ("gate_and_terminal", include_str!("content/gate_and_terminal.toml")),
];

/// Parse all built-in content modules.
pub fn modules() -> Result<Vec<ContentModule>, ContentError> {
    SOURCES
        .iter()
        .map(|(name, text)| ContentModule::from_toml_str(*name, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ChoiceId;

    #[test]
    fn test_builtin_modules_parse() {
        let modules = modules().unwrap();
        assert_eq!(modules.len(), SOURCES.len());
        assert!(modules.iter().all(|m| !m.is_empty()));
    }

    #[test]
    fn test_fuel_module_shape() {
        let modules = modules().unwrap();
        let fuel = modules.iter().find(|m| m.name == "fuel").unwrap();

        let tree = &fuel.trees["level_fuel_part_one"];
        assert_eq!(tree.start_id, "explain_fuel_1");

        let first = &fuel.nodes["explain_fuel_1"];
        assert!(first.choice_ids.is_empty());
        assert_eq!(first.next_id.as_ref().map(|id| id.0.as_str()), Some("explain_fuel_2"));

        let second = &fuel.nodes["explain_fuel_2"];
        assert_eq!(second.choice_ids, vec![ChoiceId::from("ack_fuel")]);
        assert!(fuel.choices["ack_fuel"].next_id.is_none());
    }

    #[test]
    fn test_long_text_is_joined() {
        let modules = modules().unwrap();
        let fuel = modules.iter().find(|m| m.name == "fuel").unwrap();

        let text = &fuel.nodes["explain_fuel_1"].text;
        assert!(text.starts_with("Every move"));
        assert!(!text.contains('\n'));
        assert!(!text.contains("  "));
    }

    #[test]
    fn test_module_ids_do_not_collide() {
        let modules = modules().unwrap();
        let mut seen = std::collections::HashSet::new();

        for module in &modules {
            for id in module.nodes.keys() {
                assert!(seen.insert(format!("node:{}", id)), "duplicate node {}", id);
            }
            for id in module.choices.keys() {
                assert!(seen.insert(format!("choice:{}", id)), "duplicate choice {}", id);
            }
            for id in module.trees.keys() {
                assert!(seen.insert(format!("tree:{}", id)), "duplicate tree {}", id);
            }
        }
    }
}
