use super::*;

#[derive(Debug, Clone)]
pub(super) struct GenerationOptions<'a> {
    pub model: &'a str,
    pub exclude: Option<ExcludeContext>,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct GenerationSummary {
    pub appended: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub interrupted: bool,
}

pub(super) fn generate_definitions(
    entries: &mut [LexicalEntry],
    invoker: &dyn ModelInvoker,
    parser: &OutputParser,
    options: &GenerationOptions<'_>,
    transcript: &mut Transcript,
    errors: &mut ErrorJournal,
    interrupt: &AtomicBool,
) -> Result<GenerationSummary> {
    let mut summary = GenerationSummary::default();
    let mut prompt_number = 0usize;
    let total = entries.len();

    for (entry_index, entry) in entries.iter_mut().enumerate() {
        transcript.write_section(&format!("\n*** LEMMA: {} ***", entry.lemma))?;

        for sense in entry.senses.iter_mut() {
            if interrupt.load(Ordering::Relaxed) {
                warn!(lemma = %entry.lemma, usem = %sense.usem, "interrupted; stopping generation");
                summary.interrupted = true;
                return Ok(summary);
            }

            if sense.ai_definition_index(options.model).is_some() && !options.overwrite {
                debug!(
                    usem = %sense.usem,
                    model = %options.model,
                    "definition already present; skipped"
                );
                summary.skipped += 1;
                continue;
            }

            let prompt = generation_prompt(&entry.lemma, sense, options.exclude);
            if prompt.context.relations_unused() {
                warn!(usem = %sense.usem, "no useful relation for sense");
            }

            prompt_number += 1;
            let result = parser.invoke::<DefinitionOutput>(invoker, SYSTEM_ROLE, &prompt.text);
            let raw = match &result {
                Ok(completion) => Some(completion.raw.as_str()),
                Err(err) => err.raw_output(),
            };
            transcript.record_exchange(
                &format!("Prompt {prompt_number} | {} | {}", entry.lemma, sense.usem),
                SYSTEM_ROLE,
                &prompt.text,
                raw,
            )?;

            match result {
                Ok(completion) => {
                    match sense.upsert_ai_definition(options.model, completion.value.definition) {
                        Upsert::Replaced(index) => {
                            info!(
                                usem = %sense.usem,
                                model = %options.model,
                                index,
                                "definition overwritten"
                            );
                            summary.replaced += 1;
                        }
                        Upsert::Appended(_) => summary.appended += 1,
                    }
                }
                Err(err) => {
                    warn!(
                        lemma = %entry.lemma,
                        usem = %sense.usem,
                        model = %options.model,
                        error = %err,
                        "definition generation failed; sense skipped"
                    );
                    errors.record(&ErrorRecord {
                        recorded_at: now_utc_string(),
                        model: options.model,
                        lemma: &entry.lemma,
                        usem: &sense.usem,
                        kind: err.kind(),
                        message: err.to_string(),
                        prompt: &prompt.text,
                        raw_output: err.raw_output(),
                        sense,
                    })?;
                    summary.failed += 1;
                }
            }
        }

        info!(
            entry = entry_index + 1,
            of = total,
            lemma = %entry.lemma,
            "lexical entry processed"
        );
    }

    Ok(summary)
}
