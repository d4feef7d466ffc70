use proptest::prelude::*;
use windup_rulesets_yaml::source::{Dependency, Marker, SourceCondition};
use windup_rulesets_yaml::{
    convert, translate, Destination, SourceRule, SourceRuleset, TargetPredicate,
};

const LOCATIONS: &[&str] = &["IMPORT", "ANNOTATION", "METHOD_CALL", "INHERITANCE", "TYPE"];

fn arb_dependency() -> impl Strategy<Value = SourceCondition> {
    let version = proptest::option::of("[0-9]\\.[0-9]");
    let coordinates = ("[a-z]{1,6}", "[a-z]{1,6}", version);
    coordinates.prop_map(|(group_id, artifact_id, from_version)| {
        SourceCondition::Dependency(Dependency {
            group_id,
            artifact_id,
            from_version,
            to_version: None,
        })
    })
}

fn java_class((references, locations): (String, Vec<&'static str>)) -> SourceCondition {
    SourceCondition::java_class(&references, &locations)
}

fn arb_java_class() -> impl Strategy<Value = SourceCondition> {
    let locations = prop::collection::vec(prop::sample::select(LOCATIONS), 0..4);
    ("[A-Za-z.]{1,10}", locations).prop_map(java_class)
}

fn arb_leaf() -> impl Strategy<Value = SourceCondition> {
    prop_oneof![
        arb_dependency(),
        arb_java_class(),
        "[a-z]{1,8}".prop_map(|p| SourceCondition::file_content(&p)),
        prop::sample::select(Marker::ALL.to_vec()).prop_map(SourceCondition::Marker),
        // elements the loader has no mapping for
        "[a-z-]{1,12}".prop_map(SourceCondition::Unsupported),
    ]
}

/// Condition trees of bounded depth, empty combinators included.
fn arb_condition() -> impl Strategy<Value = SourceCondition> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(SourceCondition::And),
            prop::collection::vec(inner.clone(), 0..4).prop_map(SourceCondition::Or),
            prop::collection::vec(inner, 0..3).prop_map(SourceCondition::Not),
        ]
    })
}

fn arb_children() -> impl Strategy<Value = Vec<SourceCondition>> {
    prop::collection::vec(arb_condition(), 1..5)
}

/// Rule conditions for one ruleset, absent conditions included.
fn arb_rules(min: usize) -> impl Strategy<Value = Vec<Option<SourceCondition>>> {
    prop::collection::vec(proptest::option::of(arb_condition()), min..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn and_wraps_sum_of_child_translations(children in arb_children()) {
        let expected: Vec<_> = children.iter().flat_map(translate).collect();
        let produced = translate(&SourceCondition::And(children));

        if expected.is_empty() {
            prop_assert!(produced.is_empty());
        } else {
            prop_assert_eq!(produced.len(), 1);
            prop_assert_eq!(&produced[0].predicate, &TargetPredicate::And(expected));
        }
    }

    #[test]
    fn or_wraps_sum_of_child_translations(children in arb_children()) {
        let expected: Vec<_> = children.iter().flat_map(translate).collect();
        let produced = translate(&SourceCondition::Or(children));

        if expected.is_empty() {
            prop_assert!(produced.is_empty());
        } else {
            prop_assert_eq!(produced.len(), 1);
            prop_assert_eq!(&produced[0].predicate, &TargetPredicate::Or(expected));
        }
    }

    #[test]
    fn not_flags_every_child_condition(children in arb_children()) {
        let plain: Vec<_> = children.iter().flat_map(translate).collect();
        let negated = translate(&SourceCondition::Not(children));

        prop_assert_eq!(negated.len(), plain.len());
        for (n, p) in negated.iter().zip(&plain) {
            prop_assert!(n.not);
            prop_assert_eq!(&n.predicate, &p.predicate);
            prop_assert_eq!(&n.bind_as, &p.bind_as);
            prop_assert_eq!(&n.from, &p.from);
        }
    }

    #[test]
    fn conversion_output_is_deterministic(conditions in arb_rules(0)) {
        let ruleset = SourceRuleset {
            source_file: "rules/generated.windup.xml".to_string(),
            rules: conditions
                .into_iter()
                .map(|when| SourceRule { id: None, when })
                .collect(),
        };
        let rulesets = vec![ruleset];
        let destination = Destination::default();

        let first = convert(&rulesets, &destination);
        let second = convert(&rulesets, &destination);
        prop_assert_eq!(
            serde_yaml::to_string(&first.outputs).unwrap(),
            serde_yaml::to_string(&second.outputs).unwrap()
        );
        prop_assert_eq!(first.converted + first.skipped, rulesets[0].rules.len());
    }

    #[test]
    fn surviving_rule_ids_are_positional(conditions in arb_rules(1)) {
        let ruleset = SourceRuleset {
            source_file: "rules/generated.windup.xml".to_string(),
            rules: conditions
                .iter()
                .cloned()
                .map(|when| SourceRule { id: None, when })
                .collect(),
        };
        let conversion = convert(&[ruleset], &Destination::default());

        let expected: Vec<String> = conditions
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_ref().is_some_and(|c| !translate(c).is_empty()))
            .map(|(i, _)| format!("rules/generated.windup.xml-{}", i))
            .collect();
        let ids: Vec<String> = conversion
            .outputs
            .values()
            .flatten()
            .flat_map(|ruleset| ruleset.rules.iter().map(|r| r.id.clone()))
            .collect();
        prop_assert_eq!(ids, expected);
    }
}
