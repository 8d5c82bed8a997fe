use super::*;
use crate::model::{AiDefinition, NO_DEFINITION, NO_MODEL};

fn scores(values: &[u8]) -> Vec<Score> {
    values
        .iter()
        .enumerate()
        .map(|(i, &score)| Score {
            model: format!("judge{i}"),
            score,
        })
        .collect()
}

fn scored(model: &str, text: &str, values: &[u8]) -> AiDefinition {
    let mut definition = AiDefinition::new(model, text);
    definition.scores = scores(values);
    definition
}

fn sense(usem: &str, definitions: Vec<AiDefinition>) -> UsemEntry {
    let mut sense = UsemEntry::new(usem, "d", None, None);
    sense.ai_definitions = definitions;
    sense
}

fn entries(senses: Vec<UsemEntry>) -> Vec<LexicalEntry> {
    vec![LexicalEntry {
        lemma: "cane".to_string(),
        lemma_id: "LE1".to_string(),
        senses,
    }]
}

#[test]
fn a_single_low_score_vetoes_the_definition() {
    assert_eq!(mean_score_with_veto(&scores(&[9, 5, 8])), NO_SCORE);
    assert_eq!(mean_score_with_veto(&scores(&[8, 9, 7])), 8.0);
    assert_eq!(mean_score_with_veto(&scores(&[6])), 6.0);
    assert_eq!(mean_score_with_veto(&[]), NO_SCORE);
}

#[test]
fn highest_mean_wins_and_every_mean_is_refreshed() {
    let mut tree = entries(vec![sense(
        "U1",
        vec![
            scored("a", "prima", &[9, 5]),
            scored("b", "seconda", &[7, 7]),
            scored("c", "terza", &[8, 9]),
        ],
    )]);

    let summary = select_best_definitions(&mut tree);

    let sense = &tree[0].senses[0];
    assert_eq!(summary.chosen, 1);
    assert_eq!(sense.chosen_definition.as_deref(), Some("terza"));
    assert_eq!(sense.chosen_model.as_deref(), Some("c"));
    assert_eq!(sense.chosen_score, 8.5);
    let means: Vec<f64> = sense.ai_definitions.iter().map(|d| d.mean_score).collect();
    assert_eq!(means, vec![NO_SCORE, 7.0, 8.5]);
}

#[test]
fn ties_keep_the_first_definition() {
    let mut tree = entries(vec![sense(
        "U1",
        vec![scored("a", "prima", &[8, 8]), scored("b", "seconda", &[9, 7])],
    )]);

    select_best_definitions(&mut tree);

    assert_eq!(tree[0].senses[0].chosen_model.as_deref(), Some("a"));
}

#[test]
fn vetoed_sense_never_gets_a_choice() {
    let mut tree = entries(vec![sense(VETOED_USEMS[0], vec![scored("a", "ottima", &[10, 10])])]);

    let summary = select_best_definitions(&mut tree);

    let sense = &tree[0].senses[0];
    assert_eq!(summary.vetoed, 1);
    assert_eq!(sense.chosen_definition.as_deref(), Some(NO_DEFINITION));
    assert_eq!(sense.chosen_model.as_deref(), Some(NO_MODEL));
    assert_eq!(sense.chosen_score, NO_SCORE);
    assert!(!sense.has_choice());
}

#[test]
fn senses_without_qualifying_definitions_resolve_to_no_choice() {
    let mut tree = entries(vec![
        sense("U1", Vec::new()),
        sense("U2", vec![scored("a", "x", &[3]), scored("b", "y", &[])]),
    ]);

    let summary = select_best_definitions(&mut tree);

    assert_eq!(summary.unresolved, 2);
    for sense in &tree[0].senses {
        assert_eq!(sense.chosen_definition.as_deref(), Some(NO_DEFINITION));
        assert_eq!(sense.chosen_score, NO_SCORE);
    }
}

#[test]
fn statistics_cover_chosen_judges_and_generators() {
    let mut first = scored("a", "x", &[]);
    first.scores = vec![
        Score {
            model: "j1".to_string(),
            score: 8,
        },
        Score {
            model: "j2".to_string(),
            score: 6,
        },
    ];
    let mut second = scored("b", "y", &[]);
    second.scores = vec![Score {
        model: "j1".to_string(),
        score: 4,
    }];
    let unscored = scored("c", "z", &[]);
    let mut third = scored("a", "w", &[]);
    third.scores = vec![Score {
        model: "j1".to_string(),
        score: 10,
    }];

    let mut tree = entries(vec![
        sense("U1", vec![first, second, unscored]),
        sense("U2", vec![third]),
        sense(VETOED_USEMS[1], Vec::new()),
    ]);
    select_best_definitions(&mut tree);

    let report = compute_statistics(&tree);

    assert_eq!(report.chosen_total, 2);
    assert_eq!(
        report.chosen_by_generator,
        vec![ChosenStat {
            model: "a".to_string(),
            chosen: 2,
            of: 2,
            mean_score: 8.5,
        }]
    );

    let judges: Vec<(&str, u64, f64)> = report
        .judges
        .iter()
        .map(|row| (row.model.as_str(), row.total_score, row.mean_score))
        .collect();
    assert_eq!(judges, vec![("j1", 22, 5.5), ("j2", 6, 1.5)]);

    let generators: Vec<(&str, usize, f64)> = report
        .generators
        .iter()
        .map(|row| (row.model.as_str(), row.scores, row.mean_score))
        .collect();
    assert_eq!(generators, vec![("a", 3, 8.0), ("b", 1, 4.0)]);
}

#[test]
fn statistics_of_an_empty_tree_have_no_rows() {
    let report = compute_statistics(&[]);
    assert_eq!(report.chosen_total, 0);
    assert!(report.chosen_by_generator.is_empty());
    assert!(report.judges.is_empty());
    assert!(report.generators.is_empty());
}
