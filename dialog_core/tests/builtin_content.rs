//! Playthroughs and validation of the game's built-in dialog content.

use dialog_content::{builtin, ContentModule, DialogNode, DialogTree, EntryKind, TreeId};
use dialog_core::{
    DialogEngine, DialogError, DialogLibrary, DialogSession, Finding, Referrer, Validator,
};
use std::collections::{HashSet, VecDeque};

fn engine() -> DialogEngine {
    DialogEngine::new(DialogLibrary::builtin().unwrap())
}

fn offered_ids(engine: &DialogEngine, session: &DialogSession) -> Vec<String> {
    engine
        .available_choices(session)
        .unwrap()
        .iter()
        .map(|offer| offer.id.to_string())
        .collect()
}

/// Number of nodes reachable from a tree's start node.
fn reachable_nodes(library: &DialogLibrary, tree_id: &str) -> usize {
    let start = &library.tree(tree_id).unwrap().start_id;
    let mut seen = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(id) = queue.pop_front() {
        let node = library.nodes().get(id.0.as_str()).unwrap();
        let mut targets: Vec<_> = node.next_id.iter().cloned().collect();
        for choice_id in &node.choice_ids {
            let choice = library.choices().get(choice_id.0.as_str()).unwrap();
            targets.extend(choice.next_id.iter().cloned());
        }
        for target in targets {
            if seen.insert(target.clone()) {
                queue.push_back(target);
            }
        }
    }
    seen.len()
}

#[test]
fn test_fuel_tutorial() {
    let engine = engine();

    let session = engine.start("level_fuel_part_one").unwrap();
    assert_eq!(session.current_node_id(), "explain_fuel_1");
    assert!(offered_ids(&engine, &session).is_empty());

    let session = engine.advance(&session).unwrap();
    assert_eq!(session.current_node_id(), "explain_fuel_2");
    assert_eq!(offered_ids(&engine, &session), vec!["ack_fuel"]);

    let session = engine.choose(&session, "ack_fuel").unwrap();
    assert!(engine.is_ended(&session));
}

#[test]
fn test_multi_terminal_tutorial() {
    let engine = engine();

    let session = engine.start("level_gate_and_terminal_part_three").unwrap();
    assert_eq!(session.current_node_id(), "explain_multi_terminals");
    assert_eq!(offered_ids(&engine, &session), vec!["ack_multi_terminals"]);

    let session = engine.choose(&session, "ack_multi_terminals").unwrap();
    assert!(engine.is_ended(&session));
}

#[test]
fn test_builtin_content_is_clean() {
    let library = DialogLibrary::builtin().unwrap();
    let report = Validator::with_defaults().validate(&library);

    assert!(report.is_clean(), "built-in content has findings:\n{}", report);
}

#[test]
fn test_every_tree_ends_within_bound() {
    let engine = engine();
    let trees: Vec<TreeId> = engine.list_trees().map(|(id, _)| id.clone()).collect();
    assert!(!trees.is_empty());

    for tree_id in trees {
        let bound = reachable_nodes(engine.library(), tree_id.0.as_str()) + 1;
        let mut session = engine.start(tree_id.0.as_str()).unwrap();
        let mut visited = HashSet::from([session.current_node_id().clone()]);
        let mut transitions = 0;

        while !engine.is_ended(&session) {
            assert!(
                transitions < bound,
                "tree '{}' did not end within {} transitions",
                tree_id,
                bound
            );

            let offered = engine.available_choices(&session).unwrap();
            session = if offered.is_empty() {
                engine.advance(&session).unwrap()
            } else {
                let pick = offered
                    .iter()
                    .find(|offer| offer.choice.next_id.is_none())
                    .or_else(|| {
                        offered.iter().find(|offer| {
                            offer
                                .choice
                                .next_id
                                .as_ref()
                                .is_some_and(|next| !visited.contains(next))
                        })
                    })
                    .unwrap_or(&offered[0]);
                engine.choose(&session, pick.id.0.as_str()).unwrap()
            };

            visited.insert(session.current_node_id().clone());
            transitions += 1;
        }
    }
}

#[test]
fn test_branching_nodes_never_auto_advance() {
    let engine = engine();
    let trees: Vec<TreeId> = engine.list_trees().map(|(id, _)| id.clone()).collect();

    for tree_id in trees {
        let mut session = engine.start(tree_id.0.as_str()).unwrap();

        while !engine.is_ended(&session) {
            let offered = engine.available_choices(&session).unwrap();
            if offered.is_empty() {
                session = engine.advance(&session).unwrap();
                continue;
            }

            assert!(matches!(
                engine.advance(&session),
                Err(DialogError::ChoiceRequired { .. })
            ));
            assert!(matches!(
                engine.choose(&session, "not_a_real_choice"),
                Err(DialogError::InvalidChoice { .. })
            ));

            let terminal = offered
                .iter()
                .find(|offer| offer.choice.next_id.is_none())
                .unwrap_or(&offered[0]);
            session = engine.choose(&session, terminal.id.0.as_str()).unwrap();
        }
    }
}

#[test]
fn test_merging_builtin_twice_is_rejected() {
    let mut builder = DialogLibrary::builder();
    for module in builtin::modules().unwrap() {
        builder.merge(module).unwrap();
    }

    let again = builtin::modules().unwrap().remove(0);
    assert!(matches!(
        builder.merge(again),
        Err(DialogError::DuplicateId { .. })
    ));
}

#[test]
fn test_validator_is_idempotent_on_builtin() {
    let library = DialogLibrary::builtin().unwrap();
    let validator = Validator::with_defaults();

    assert_eq!(validator.validate(&library), validator.validate(&library));
}

#[test]
fn test_synthetic_dangling_start_link() {
    let synthetic = ContentModule::new("synthetic")
        .with_tree("synthetic_tree", DialogTree::new("Synthetic", "synthetic_start"))
        .with_node(
            "synthetic_start",
            DialogNode::new("This goes nowhere.").with_next("does_not_exist"),
        );

    let mut modules = builtin::modules().unwrap();
    modules.push(synthetic);
    let library = DialogLibrary::assemble(modules).unwrap();

    let report = Validator::with_defaults().validate(&library);
    let dangling: Vec<_> = report
        .errors()
        .filter(|finding| matches!(finding, Finding::DanglingReference { .. }))
        .collect();
    assert_eq!(dangling.len(), 1);
    match dangling[0] {
        Finding::DanglingReference {
            tree,
            referrer,
            missing_kind,
            missing,
        } => {
            assert_eq!(tree, "synthetic_tree");
            assert_eq!(referrer, &Referrer::Node("synthetic_start".into()));
            assert_eq!(*missing_kind, EntryKind::Node);
            assert_eq!(missing, "does_not_exist");
        }
        other => panic!("unexpected finding {:?}", other),
    }

    // Played live, the same link surfaces as a corrupt tree instead of a panic.
    let engine = DialogEngine::new(library);
    let session = engine.start("synthetic_tree").unwrap();
    assert!(matches!(
        engine.advance(&session),
        Err(DialogError::CorruptTree { ref missing, .. }) if missing == "does_not_exist"
    ));
}

#[test]
fn test_journal_listing() {
    let engine = engine();
    let names: Vec<(String, String)> = engine
        .list_trees()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect();

    assert!(names.contains(&("level_fuel_part_one".to_string(), "Fuel".to_string())));
    assert!(names.contains(&(
        "level_gate_and_terminal_part_three".to_string(),
        "Multiple Terminals".to_string()
    )));
    assert_eq!(names.len(), engine.library().trees().len());
}
