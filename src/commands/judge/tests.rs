use std::fs;

use tempfile::TempDir;

use super::*;
use crate::llm::testing::ScriptedModel;

struct Logs {
    _dir: TempDir,
    prompts: Transcript,
    errors: ErrorJournal,
}

impl Logs {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let prompts =
            Transcript::open(&dir.path().join("judge_prompts-j.txt")).expect("prompt log");
        let errors = ErrorJournal::open(&dir.path().join("errors").join("judge_errors_t.json"))
            .expect("journal");
        Self {
            _dir: dir,
            prompts,
            errors,
        }
    }

    fn channels(&mut self) -> JudgeLogs<'_> {
        JudgeLogs {
            prompts: &mut self.prompts,
            errors: &mut self.errors,
        }
    }
}

fn sense_with(usem: &str, generators: &[(&str, &str)]) -> UsemEntry {
    let mut sense = UsemEntry::new(usem, "definizione", None, Some("esempio".to_string()));
    for (model, text) in generators {
        sense.upsert_ai_definition(model, *text);
    }
    sense
}

fn options(judge: &str, overwrite: bool) -> JudgeOptions<'_> {
    JudgeOptions {
        judge,
        exclude: None,
        overwrite,
    }
}

fn parser() -> OutputParser {
    OutputParser::new().expect("parser")
}

fn scores_of(sense: &UsemEntry, judge: &str) -> Vec<Option<u8>> {
    sense
        .ai_definitions
        .iter()
        .map(|definition| definition.score_from(judge))
        .collect()
}

#[test]
fn scores_map_to_candidates_by_position() {
    let mut sense = sense_with("U1", &[("x", "prima"), ("y", "seconda")]);
    let model = ScriptedModel::new("j").reply(r#"{"scores": [7, 9]}"#);
    let mut logs = Logs::new();
    let mut counter = 0;

    let verdict = judge_sense(
        "cane",
        &mut sense,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &mut counter,
    )
    .expect("judged");

    assert_eq!(
        verdict,
        SenseVerdict::Scored {
            appended: 2,
            replaced: 0
        }
    );
    assert_eq!(scores_of(&sense, "j"), vec![Some(7), Some(9)]);
    assert_eq!(counter, 1);

    let prompt = &model.prompts.borrow()[0];
    assert!(prompt.contains("SENSE_DEFINITION 1 - \"prima\""));
    assert!(prompt.contains("SENSE_DEFINITION 2 - \"seconda\""));
    assert!(prompt.contains("WORD: cane;"));
}

#[test]
fn only_unscored_candidates_are_requested_and_mapped_back() {
    let mut sense = sense_with("U1", &[("x", "a"), ("y", "b"), ("z", "c")]);
    sense.ai_definitions[1].upsert_score("j", 4);
    let model = ScriptedModel::new("j").reply(r#"{"scores": [8, 6]}"#);
    let mut logs = Logs::new();
    let mut counter = 0;

    judge_sense(
        "cane",
        &mut sense,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &mut counter,
    )
    .expect("judged");

    assert_eq!(scores_of(&sense, "j"), vec![Some(8), Some(4), Some(6)]);
    let prompt = &model.prompts.borrow()[0];
    assert!(prompt.contains("SENSE_DEFINITION 2 - \"c\""));
    assert!(!prompt.contains("\"b\""));
}

#[test]
fn fully_scored_sense_short_circuits_without_a_call() {
    let mut sense = sense_with("U1", &[("x", "a")]);
    sense.ai_definitions[0].upsert_score("j", 8);
    let before = sense.clone();
    let model = ScriptedModel::new("j");
    let mut logs = Logs::new();
    let mut counter = 0;

    let verdict = judge_sense(
        "cane",
        &mut sense,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &mut counter,
    )
    .expect("nothing to do");

    assert_eq!(verdict, SenseVerdict::NothingToScore);
    assert_eq!(model.calls(), 0);
    assert_eq!(counter, 0);
    assert_eq!(sense, before);

    let mut empty = sense_with("U2", &[]);
    let verdict = judge_sense(
        "cane",
        &mut empty,
        &model,
        &parser(),
        &options("j", true),
        &mut logs.channels(),
        &mut counter,
    )
    .expect("no candidates");
    assert_eq!(verdict, SenseVerdict::NothingToScore);
}

#[test]
fn overwrite_replaces_scores_in_place() {
    let mut sense = sense_with("U1", &[("x", "a"), ("y", "b")]);
    sense.ai_definitions[0].upsert_score("other", 5);
    sense.ai_definitions[0].upsert_score("j", 3);
    sense.ai_definitions[1].upsert_score("j", 4);
    let model = ScriptedModel::new("j").reply(r#"{"scores": [10, 9]}"#);
    let mut logs = Logs::new();
    let mut counter = 0;

    let verdict = judge_sense(
        "cane",
        &mut sense,
        &model,
        &parser(),
        &options("j", true),
        &mut logs.channels(),
        &mut counter,
    )
    .expect("judged");

    assert_eq!(
        verdict,
        SenseVerdict::Scored {
            appended: 0,
            replaced: 2
        }
    );
    assert_eq!(sense.ai_definitions[0].scores.len(), 2);
    assert_eq!(sense.ai_definitions[0].scores[0].model, "other");
    assert_eq!(sense.ai_definitions[0].scores[1].score, 10);
    assert_eq!(sense.ai_definitions[1].scores.len(), 1);
    assert_eq!(sense.ai_definitions[1].scores[0].score, 9);
}

#[test]
fn judging_twice_without_overwrite_is_idempotent() {
    let mut entries = vec![LexicalEntry {
        lemma: "cane".to_string(),
        lemma_id: "LE1".to_string(),
        senses: vec![sense_with("U1", &[("x", "a"), ("y", "b")])],
    }];
    let model = ScriptedModel::new("j")
        .reply(r#"{"scores": [7, 8]}"#)
        .reply(r#"{"scores": [1, 1]}"#);
    let mut logs = Logs::new();
    let interrupt = AtomicBool::new(false);

    judge_entries(
        &mut entries,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &interrupt,
    )
    .expect("first run");
    let after_first = entries.clone();
    let second = judge_entries(
        &mut entries,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &interrupt,
    )
    .expect("second run");

    assert_eq!(entries, after_first);
    assert_eq!(second.senses_skipped, 1);
    assert_eq!(model.calls(), 1);
}

#[test]
fn transport_failure_aborts_the_remaining_senses() {
    let mut entries = vec![
        LexicalEntry {
            lemma: "cane".to_string(),
            lemma_id: "LE1".to_string(),
            senses: vec![
                sense_with("U1", &[("x", "a")]),
                sense_with("U2", &[("x", "b")]),
            ],
        },
        LexicalEntry {
            lemma: "gatto".to_string(),
            lemma_id: "LE2".to_string(),
            senses: vec![sense_with("U3", &[("x", "c")])],
        },
    ];
    let model = ScriptedModel::new("j")
        .reply(r#"{"scores": [8]}"#)
        .down("connection refused")
        .reply(r#"{"scores": [9]}"#);
    let mut logs = Logs::new();

    let summary = judge_entries(
        &mut entries,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &AtomicBool::new(false),
    )
    .expect("abort is reported in the summary");

    assert!(summary.aborted);
    assert_eq!(summary.senses_scored, 1);
    assert_eq!(model.calls(), 2);
    assert_eq!(entries[0].senses[0].ai_definitions[0].score_from("j"), Some(8));
    assert_eq!(entries[0].senses[1].ai_definitions[0].score_from("j"), None);
    assert_eq!(entries[1].senses[0].ai_definitions[0].score_from("j"), None);
    assert_eq!(logs.errors.recorded(), 1);
}

#[test]
fn wrong_score_count_is_a_parse_failure() {
    let mut sense = sense_with("U1", &[("x", "a"), ("y", "b")]);
    let model = ScriptedModel::new("j").reply(r#"{"scores": [7]}"#);
    let mut logs = Logs::new();
    let mut counter = 0;

    let verdict = judge_sense(
        "cane",
        &mut sense,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &mut counter,
    )
    .expect("failure is a verdict");

    assert_eq!(verdict, SenseVerdict::Failed);
    assert_eq!(scores_of(&sense, "j"), vec![None, None]);

    let journal = fs::read_to_string(logs.errors.path()).expect("journal readable");
    assert!(journal.contains("\"kind\":\"parse\""));
    assert!(journal.contains("expected 2 scores, got 1"));
}

#[test]
fn prompts_are_numbered_across_entries() {
    let mut entries = vec![
        LexicalEntry {
            lemma: "cane".to_string(),
            lemma_id: "LE1".to_string(),
            senses: vec![sense_with("U1", &[("x", "a")])],
        },
        LexicalEntry {
            lemma: "gatto".to_string(),
            lemma_id: "LE2".to_string(),
            senses: vec![sense_with("U2", &[("x", "b")])],
        },
    ];
    let model = ScriptedModel::new("j")
        .reply(r#"{"scores": [6]}"#)
        .reply(r#"{"scores": [7]}"#);
    let mut logs = Logs::new();

    let summary = judge_entries(
        &mut entries,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &AtomicBool::new(false),
    )
    .expect("judged");

    assert_eq!(summary.prompts, 2);
    let log = fs::read_to_string(logs.prompts.path()).expect("prompt log readable");
    assert!(log.contains("JUDGE PROMPT 1 | cane | U1"));
    assert!(log.contains("JUDGE PROMPT 2 | gatto | U2"));
}

#[test]
fn raised_interrupt_stops_before_any_call() {
    let mut entries = vec![LexicalEntry {
        lemma: "cane".to_string(),
        lemma_id: "LE1".to_string(),
        senses: vec![sense_with("U1", &[("x", "a")])],
    }];
    let model = ScriptedModel::new("j").reply(r#"{"scores": [6]}"#);
    let mut logs = Logs::new();

    let summary = judge_entries(
        &mut entries,
        &model,
        &parser(),
        &options("j", false),
        &mut logs.channels(),
        &AtomicBool::new(true),
    )
    .expect("interrupt is not an error");

    assert!(summary.interrupted);
    assert_eq!(model.calls(), 0);
}
