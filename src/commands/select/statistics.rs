use super::*;

struct Ledger<T> {
    rows: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T: Default> Ledger<T> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn entry(&mut self, model: &str) -> &mut T {
        let slot = match self.index.get(model) {
            Some(&slot) => slot,
            None => {
                self.rows.push((model.to_string(), T::default()));
                self.index.insert(model.to_string(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[slot].1
    }

    fn into_rows(self) -> Vec<(String, T)> {
        self.rows
    }
}

#[derive(Debug, Default)]
struct Tally {
    count: usize,
    sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(super) struct ChosenStat {
    pub model: String,
    pub chosen: usize,
    pub of: usize,
    pub mean_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(super) struct JudgeStat {
    pub model: String,
    pub total_score: u64,
    pub definitions: usize,
    pub mean_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(super) struct GeneratorStat {
    pub model: String,
    pub scores: usize,
    pub mean_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(super) struct StatisticsReport {
    pub chosen_total: usize,
    pub chosen_by_generator: Vec<ChosenStat>,
    pub judges: Vec<JudgeStat>,
    pub generators: Vec<GeneratorStat>,
}

fn senses(entries: &[LexicalEntry]) -> impl Iterator<Item = &UsemEntry> {
    entries.iter().flat_map(|entry| entry.senses.iter())
}

fn chosen_stats(entries: &[LexicalEntry]) -> (usize, Vec<ChosenStat>) {
    let mut ledger: Ledger<Tally> = Ledger::new();
    let mut total = 0usize;

    for sense in senses(entries) {
        if !sense.has_choice() {
            debug!(
                usem = %sense.usem,
                definition = sense.chosen_definition.as_deref().unwrap_or_default(),
                model = sense.chosen_model.as_deref().unwrap_or_default(),
                "discarded definition"
            );
            continue;
        }
        total += 1;
        let tally = ledger.entry(sense.chosen_model.as_deref().unwrap_or_default());
        tally.count += 1;
        tally.sum += sense.chosen_score;
    }

    let rows = ledger
        .into_rows()
        .into_iter()
        .filter(|(_, tally)| tally.count > 0)
        .map(|(model, tally)| ChosenStat {
            model,
            chosen: tally.count,
            of: total,
            mean_score: tally.sum / tally.count as f64,
        })
        .collect();
    (total, rows)
}

/// Sum of every score a judge issued, divided by the number of generated definitions in the
/// whole tree.
fn judge_stats(entries: &[LexicalEntry]) -> Vec<JudgeStat> {
    let mut ledger: Ledger<u64> = Ledger::new();
    let mut definitions = 0usize;

    for sense in senses(entries) {
        for definition in &sense.ai_definitions {
            definitions += 1;
            for score in &definition.scores {
                *ledger.entry(&score.model) += u64::from(score.score);
            }
        }
    }

    if definitions == 0 {
        return Vec::new();
    }
    ledger
        .into_rows()
        .into_iter()
        .map(|(model, total_score)| JudgeStat {
            model,
            total_score,
            definitions,
            mean_score: total_score as f64 / definitions as f64,
        })
        .collect()
}

fn generator_stats(entries: &[LexicalEntry]) -> Vec<GeneratorStat> {
    let mut ledger: Ledger<Tally> = Ledger::new();

    for sense in senses(entries) {
        for definition in &sense.ai_definitions {
            let tally = ledger.entry(&definition.model);
            for score in &definition.scores {
                tally.count += 1;
                tally.sum += f64::from(score.score);
            }
        }
    }

    ledger
        .into_rows()
        .into_iter()
        .filter(|(_, tally)| tally.count > 0)
        .map(|(model, tally)| GeneratorStat {
            model,
            scores: tally.count,
            mean_score: tally.sum / tally.count as f64,
        })
        .collect()
}

pub(super) fn compute_statistics(entries: &[LexicalEntry]) -> StatisticsReport {
    let (chosen_total, chosen_by_generator) = chosen_stats(entries);
    StatisticsReport {
        chosen_total,
        chosen_by_generator,
        judges: judge_stats(entries),
        generators: generator_stats(entries),
    }
}

pub(super) fn log_statistics(report: &StatisticsReport) {
    for row in &report.chosen_by_generator {
        info!(
            model = %row.model,
            chosen = row.chosen,
            of = row.of,
            mean_score = %format!("{:.2}", row.mean_score),
            "definitions chosen by generator"
        );
    }
    for row in &report.judges {
        info!(
            model = %row.model,
            mean_score = %format!("{:.2}", row.mean_score),
            "judge statistics"
        );
    }
    for row in &report.generators {
        info!(
            model = %row.model,
            mean_score = %format!("{:.2}", row.mean_score),
            "generator statistics"
        );
    }
    if report.chosen_total == 0 {
        warn!("no definition was chosen");
    }
}
