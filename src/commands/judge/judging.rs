use super::*;

#[derive(Debug, Clone)]
pub(super) struct JudgeOptions<'a> {
    pub judge: &'a str,
    pub exclude: Option<ExcludeContext>,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SenseVerdict {
    NothingToScore,
    Scored { appended: usize, replaced: usize },
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct JudgementSummary {
    pub prompts: usize,
    pub senses_scored: usize,
    pub senses_skipped: usize,
    pub scores_appended: usize,
    pub scores_replaced: usize,
    pub aborted: bool,
    pub interrupted: bool,
}

pub(super) struct JudgeLogs<'a> {
    pub prompts: &'a mut Transcript,
    pub errors: &'a mut ErrorJournal,
}

pub(super) fn pending_candidates(sense: &UsemEntry, judge: &str, overwrite: bool) -> Vec<usize> {
    sense
        .ai_definitions
        .iter()
        .enumerate()
        .filter(|(_, definition)| overwrite || definition.score_from(judge).is_none())
        .map(|(index, _)| index)
        .collect()
}

/// Scores the pending definitions of one sense in a single batched call. The i-th returned
/// score belongs to the i-th requested candidate.
pub(super) fn judge_sense(
    lemma: &str,
    sense: &mut UsemEntry,
    invoker: &dyn ModelInvoker,
    parser: &OutputParser,
    options: &JudgeOptions<'_>,
    logs: &mut JudgeLogs<'_>,
    prompt_counter: &mut usize,
) -> Result<SenseVerdict> {
    let requested = pending_candidates(sense, options.judge, options.overwrite);
    if requested.is_empty() {
        debug!(usem = %sense.usem, judge = %options.judge, "nothing to score");
        return Ok(SenseVerdict::NothingToScore);
    }

    let candidates: Vec<&str> = requested
        .iter()
        .map(|&index| sense.ai_definitions[index].definition.as_str())
        .collect();
    let prompt = judgement_prompt(lemma, sense, &candidates, options.exclude);
    if prompt.context.relations_unused() {
        warn!(usem = %sense.usem, "no useful relation for sense");
    }

    *prompt_counter += 1;
    let result = parser
        .invoke::<ScoresOutput>(invoker, SYSTEM_ROLE, &prompt.text)
        .and_then(|completion| {
            if completion.value.scores.len() == requested.len() {
                Ok(completion)
            } else {
                Err(InvokeError::Parse {
                    schema: OutputSchema::Scores.name(),
                    reason: format!(
                        "expected {} scores, got {}",
                        requested.len(),
                        completion.value.scores.len()
                    ),
                    raw: completion.raw,
                })
            }
        });

    let raw = match &result {
        Ok(completion) => Some(completion.raw.as_str()),
        Err(err) => err.raw_output(),
    };
    logs.prompts.record_exchange(
        &format!("JUDGE PROMPT {} | {lemma} | {}", *prompt_counter, sense.usem),
        SYSTEM_ROLE,
        &prompt.text,
        raw,
    )?;

    let completion = match result {
        Ok(completion) => completion,
        Err(err) => {
            warn!(
                lemma = %lemma,
                usem = %sense.usem,
                judge = %options.judge,
                error = %err,
                "judgement failed"
            );
            logs.errors.record(&ErrorRecord {
                recorded_at: now_utc_string(),
                model: options.judge,
                lemma,
                usem: &sense.usem,
                kind: err.kind(),
                message: err.to_string(),
                prompt: &prompt.text,
                raw_output: err.raw_output(),
                sense,
            })?;
            return Ok(SenseVerdict::Failed);
        }
    };

    let (mut appended, mut replaced) = (0usize, 0usize);
    for (&index, &score) in requested.iter().zip(completion.value.scores.iter()) {
        let definition = &mut sense.ai_definitions[index];
        match definition.upsert_score(options.judge, score) {
            Upsert::Replaced(_) => {
                debug!(
                    usem = %sense.usem,
                    generator = %definition.model,
                    score,
                    "score overwritten"
                );
                replaced += 1;
            }
            Upsert::Appended(_) => appended += 1,
        }
    }

    Ok(SenseVerdict::Scored { appended, replaced })
}

pub(super) fn judge_entries(
    entries: &mut [LexicalEntry],
    invoker: &dyn ModelInvoker,
    parser: &OutputParser,
    options: &JudgeOptions<'_>,
    logs: &mut JudgeLogs<'_>,
    interrupt: &AtomicBool,
) -> Result<JudgementSummary> {
    let mut summary = JudgementSummary::default();
    let mut prompt_counter = 0usize;
    let total = entries.len();

    for (entry_index, entry) in entries.iter_mut().enumerate() {
        for sense in entry.senses.iter_mut() {
            if interrupt.load(Ordering::Relaxed) {
                warn!(lemma = %entry.lemma, usem = %sense.usem, "interrupted; stopping judgement");
                summary.interrupted = true;
                summary.prompts = prompt_counter;
                return Ok(summary);
            }

            match judge_sense(
                &entry.lemma,
                sense,
                invoker,
                parser,
                options,
                logs,
                &mut prompt_counter,
            )? {
                SenseVerdict::NothingToScore => summary.senses_skipped += 1,
                SenseVerdict::Scored { appended, replaced } => {
                    summary.senses_scored += 1;
                    summary.scores_appended += appended;
                    summary.scores_replaced += replaced;
                }
                SenseVerdict::Failed => {
                    warn!(lemma = %entry.lemma, usem = %sense.usem, "aborting remaining senses");
                    summary.aborted = true;
                    summary.prompts = prompt_counter;
                    return Ok(summary);
                }
            }
        }

        info!(
            entry = entry_index + 1,
            of = total,
            lemma = %entry.lemma,
            "lexical entry judged"
        );
    }

    summary.prompts = prompt_counter;
    Ok(summary)
}
