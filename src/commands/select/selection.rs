use super::*;

pub(super) const VETOED_USEMS: [&str; 13] = [
    "http://lexica/mylexicon#USemTH6501abbacchiatura",
    "http://lexica/mylexicon#USemTH2014abbozzamento",
    "http://lexica/mylexicon#USemTH6506abbozzatura",
    "http://lexica/mylexicon#USemTH2045accestimento",
    "http://lexica/mylexicon#USemTH4534accettore",
    "http://lexica/mylexicon#USemTH13167colatura",
    "http://lexica/mylexicon#USemTH2460declinamento",
    "http://lexica/mylexicon#USemTH2612favoleggiamento",
    "http://lexica/mylexicon#USemTH6854geminatura",
    "http://lexica/mylexicon#USemTH2731incarceramento",
    "http://lexica/mylexicon#USemTH3065periodizzamento",
    "http://lexica/mylexicon#USemTH40839risciacquatura",
    "http://lexica/mylexicon#USemTH25004sputo",
];

pub(super) const VETO_THRESHOLD: u8 = 6;

pub(super) fn mean_score_with_veto(scores: &[Score]) -> f64 {
    if scores.is_empty() || scores.iter().any(|score| score.score < VETO_THRESHOLD) {
        return NO_SCORE;
    }
    let total: u32 = scores.iter().map(|score| u32::from(score.score)).sum();
    f64::from(total) / scores.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Selection {
    Vetoed,
    Chosen { index: usize, score: f64 },
    NoneQualified,
}

/// Refreshes every `mean_score` of the sense and records the winner. Ties go to the earlier
/// definition.
pub(super) fn select_for_sense(sense: &mut UsemEntry, vetoed: &HashSet<&str>) -> Selection {
    if vetoed.contains(sense.usem.as_str()) {
        sense.clear_choice();
        return Selection::Vetoed;
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, definition) in sense.ai_definitions.iter_mut().enumerate() {
        definition.mean_score = mean_score_with_veto(&definition.scores);
        let current = best.map_or(NO_SCORE, |(_, score)| score);
        if definition.mean_score > current {
            best = Some((index, definition.mean_score));
        }
    }

    match best {
        Some((index, score)) => {
            let winner = &sense.ai_definitions[index];
            let (definition, model) = (winner.definition.clone(), winner.model.clone());
            sense.set_choice(&definition, &model, score);
            Selection::Chosen { index, score }
        }
        None => {
            sense.clear_choice();
            Selection::NoneQualified
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct SelectionSummary {
    pub chosen: usize,
    pub vetoed: usize,
    pub unresolved: usize,
}

pub(super) fn select_best_definitions(entries: &mut [LexicalEntry]) -> SelectionSummary {
    let vetoed: HashSet<&str> = VETOED_USEMS.into_iter().collect();
    let mut summary = SelectionSummary::default();

    for entry in entries.iter_mut() {
        for sense in entry.senses.iter_mut() {
            match select_for_sense(sense, &vetoed) {
                Selection::Chosen { index, score } => {
                    debug!(usem = %sense.usem, index, score, "definition chosen");
                    summary.chosen += 1;
                }
                Selection::Vetoed => {
                    info!(usem = %sense.usem, "no chosen definition (vetoed sense)");
                    summary.vetoed += 1;
                }
                Selection::NoneQualified => {
                    info!(usem = %sense.usem, "no chosen definition");
                    summary.unresolved += 1;
                }
            }
        }
    }

    summary
}
