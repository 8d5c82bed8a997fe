use super::*;

pub fn run(args: SelectArgs) -> Result<()> {
    let mut entries = snapshot::load(&args.snapshot)?;
    info!(
        entries = entries.len(),
        senses = count_senses(&entries),
        "lexical entries loaded"
    );

    let summary = select_best_definitions(&mut entries);
    info!(
        chosen = summary.chosen,
        vetoed = summary.vetoed,
        unresolved = summary.unresolved,
        "selection finished"
    );

    let report = compute_statistics(&entries);
    log_statistics(&report);

    write_export(&args.output, &entries)?;
    if let Some(path) = args.stats_output.as_deref() {
        write_json_pretty(path, &report)?;
        info!(path = %path.display(), "statistics report written");
    }
    Ok(())
}
