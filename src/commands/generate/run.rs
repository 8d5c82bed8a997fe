use super::*;

use crate::export::write_export;

pub fn run(args: GenerateArgs, interrupt: &AtomicBool) -> Result<()> {
    let model_name = args.model.model.clone();

    // Credentials are checked before any retrieval work.
    let chat = if args.remove {
        None
    } else {
        Some(ChatModel::configure(
            args.model.remote,
            &model_name,
            &args.model.ollama_host,
        )?)
    };

    let mut entries = if args.load {
        snapshot::load(&args.snapshot)?
    } else if let Some(path) = args.senses_json.as_deref() {
        load_flat_senses(path)?
    } else {
        let entries = retrieve(&args, interrupt)?;
        snapshot::save(&args.snapshot, &entries)?;
        entries
    };

    info!(
        entries = entries.len(),
        senses = count_senses(&entries),
        "lexical entries ready"
    );

    let Some(chat) = chat else {
        let removed = remove_definitions_by_model(&mut entries, &model_name);
        info!(model = %model_name, removed, "removed definitions generated by model");
        snapshot::save(&args.snapshot, &entries)?;
        write_export(&args.output, &entries)?;
        return Ok(());
    };

    let parser = OutputParser::new()?;
    let short = model_short_name(&model_name);
    let mut transcript =
        Transcript::open(&args.model.log_dir.join(format!("llm_defs-{short}.txt")))?;
    let mut errors = ErrorJournal::open(
        &args
            .model
            .log_dir
            .join("errors")
            .join(format!("error-{short}.json")),
    )?;

    let options = GenerationOptions {
        model: &model_name,
        exclude: args.model.exclude,
        overwrite: args.model.overwrite,
    };
    info!(
        model = %model_name,
        remote = ?args.model.remote,
        overwrite = options.overwrite,
        exclude = ?options.exclude,
        transcript = %transcript.path().display(),
        "starting definition generation"
    );

    let outcome = generate_definitions(
        &mut entries,
        &chat,
        &parser,
        &options,
        &mut transcript,
        &mut errors,
        interrupt,
    );
    let journaled = errors.recorded();
    let error_path = errors.path().to_path_buf();
    drop(errors);
    drop(transcript);

    snapshot::save(&args.snapshot, &entries)?;
    write_export(&args.output, &entries)?;

    let summary = outcome?;
    if journaled > 0 {
        warn!(path = %error_path.display(), failures = journaled, "generation failures journaled");
    }
    info!(
        appended = summary.appended,
        replaced = summary.replaced,
        skipped = summary.skipped,
        failed = summary.failed,
        interrupted = summary.interrupted,
        "definition generation finished"
    );
    Ok(())
}
