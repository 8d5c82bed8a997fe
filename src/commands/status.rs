use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::{LexicalEntry, count_senses};
use crate::snapshot;
use crate::util::sha256_file;

#[derive(Debug, Default, PartialEq, Eq)]
struct ModelCounts {
    generated: Vec<(String, usize)>,
    judged: Vec<(String, usize)>,
    chosen: usize,
}

fn bump(rows: &mut Vec<(String, usize)>, model: &str) {
    match rows.iter_mut().find(|(name, _)| name == model) {
        Some((_, count)) => *count += 1,
        None => rows.push((model.to_string(), 1)),
    }
}

fn count_by_model(entries: &[LexicalEntry]) -> ModelCounts {
    let mut counts = ModelCounts::default();
    for sense in entries.iter().flat_map(|entry| entry.senses.iter()) {
        if sense.has_choice() {
            counts.chosen += 1;
        }
        for definition in &sense.ai_definitions {
            bump(&mut counts.generated, &definition.model);
            for score in &definition.scores {
                bump(&mut counts.judged, &score.model);
            }
        }
    }
    counts
}

pub fn run(args: StatusArgs) -> Result<()> {
    if !args.snapshot.exists() {
        warn!(path = %args.snapshot.display(), "snapshot missing");
        return Ok(());
    }

    let digest = sha256_file(&args.snapshot)?;
    let entries = snapshot::load(&args.snapshot)?;
    let counts = count_by_model(&entries);

    info!(
        path = %args.snapshot.display(),
        sha256 = %digest,
        entries = entries.len(),
        senses = count_senses(&entries),
        chosen = counts.chosen,
        "loaded snapshot"
    );
    for (model, definitions) in &counts.generated {
        info!(model = %model, definitions, "generated definitions");
    }
    for (model, scores) in &counts.judged {
        info!(model = %model, scores, "issued scores");
    }

    Ok(())
}
