use super::*;

pub fn run(args: JudgeArgs, interrupt: &AtomicBool) -> Result<()> {
    let judge = args.model.model.clone();
    let chat = ChatModel::configure(args.model.remote, &judge, &args.model.ollama_host)?;
    let parser = OutputParser::new()?;

    let mut entries = snapshot::load(&args.snapshot)?;
    info!(
        entries = entries.len(),
        senses = count_senses(&entries),
        "lexical entries loaded"
    );

    let short = model_short_name(&judge);
    let mut prompts =
        Transcript::open(&args.model.log_dir.join(format!("judge_prompts-{short}.txt")))?;
    let mut errors = ErrorJournal::open(&args.model.log_dir.join("errors").join(format!(
        "judge_errors_{}.json",
        utc_compact_string(Utc::now())
    )))?;

    let options = JudgeOptions {
        judge: &judge,
        exclude: args.model.exclude,
        overwrite: args.model.overwrite,
    };
    info!(
        judge = %judge,
        remote = ?args.model.remote,
        overwrite = options.overwrite,
        exclude = ?options.exclude,
        prompts = %prompts.path().display(),
        "starting judgement"
    );

    let outcome = {
        let mut logs = JudgeLogs {
            prompts: &mut prompts,
            errors: &mut errors,
        };
        judge_entries(&mut entries, &chat, &parser, &options, &mut logs, interrupt)
    };
    let journaled = errors.recorded();
    let error_path = errors.path().to_path_buf();
    drop(errors);
    drop(prompts);

    // Whatever was scored so far is kept, also after an abort.
    snapshot::save(&args.snapshot, &entries)?;
    write_export(&args.output, &entries)?;

    let summary = outcome?;
    if journaled > 0 {
        warn!(path = %error_path.display(), failures = journaled, "judgement failures journaled");
    }
    info!(
        prompts = summary.prompts,
        senses_scored = summary.senses_scored,
        senses_skipped = summary.senses_skipped,
        scores_appended = summary.scores_appended,
        scores_replaced = summary.scores_replaced,
        aborted = summary.aborted,
        interrupted = summary.interrupted,
        "judgement finished"
    );
    Ok(())
}
