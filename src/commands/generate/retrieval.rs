use super::*;

#[derive(Debug, Clone, Deserialize)]
pub(super) struct FlatSense {
    pub lemma_id: String,
    pub lemma: String,
    pub usem: String,
    pub definition: Option<String>,
    pub template: Option<String>,
    pub example: Option<String>,
    #[serde(default)]
    pub relations: Option<Vec<Relation>>,
    #[serde(default)]
    pub ai_definitions: Option<Vec<AiDefinition>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct PruneCounts {
    pub relations_dropped: usize,
    pub senses_pruned: usize,
    pub entries_pruned: usize,
    pub interrupted: bool,
}

/// Groups `(entry id, lemma, sense)` triples into entries. Entries keep the order their id was
/// first seen, senses keep row order inside each entry; a repeated sense id is ignored.
pub(super) fn group_into_entries<I>(rows: I) -> Vec<LexicalEntry>
where
    I: IntoIterator<Item = (String, String, UsemEntry)>,
{
    let mut entries: Vec<LexicalEntry> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for (entry_id, lemma, sense) in rows {
        let slot = *by_id.entry(entry_id.clone()).or_insert_with(|| {
            entries.push(LexicalEntry {
                lemma,
                lemma_id: entry_id,
                senses: Vec::new(),
            });
            entries.len() - 1
        });

        let entry = &mut entries[slot];
        if entry.senses.iter().any(|existing| existing.usem == sense.usem) {
            debug!(usem = %sense.usem, lemma_id = %entry.lemma_id, "repeated sense row ignored");
            continue;
        }
        entry.senses.push(sense);
    }

    entries
}

pub(super) fn sense_from_row(row: SenseRow) -> (String, String, UsemEntry) {
    let definition = row.definition.unwrap_or_else(|| {
        warn!(usem = %row.sense_id, "sense has no definition");
        String::new()
    });
    let sense = UsemEntry::new(row.sense_id, definition, row.template, row.example);
    (row.entry_id, row.lemma, sense)
}

pub(super) fn sense_from_flat(flat: FlatSense) -> (String, String, UsemEntry) {
    let definition = flat.definition.unwrap_or_else(|| {
        warn!(usem = %flat.usem, "sense has no definition");
        String::new()
    });
    let mut sense = UsemEntry::new(flat.usem, definition, flat.template, flat.example);
    sense.relations = flat.relations.unwrap_or_default();
    sense.ai_definitions = flat.ai_definitions.unwrap_or_default();
    (flat.lemma_id, flat.lemma, sense)
}

pub(super) fn retrieve_entries(runner: &dyn QueryRunner, query: &str) -> Vec<LexicalEntry> {
    let bindings = match runner.select(query) {
        Ok(bindings) => bindings,
        Err(err) => {
            warn!(error = %err, "sense query failed");
            Vec::new()
        }
    };

    if bindings.is_empty() {
        let preview: String = query.chars().take(100).collect();
        warn!(query = %preview, "no lexical entries found");
        return Vec::new();
    }

    group_into_entries(
        bindings
            .iter()
            .filter_map(SenseRow::from_binding)
            .map(sense_from_row),
    )
}

pub(super) fn retrieve_relations(
    runner: &dyn QueryRunner,
    template: &str,
    usem: &str,
    policy: &RelationPolicy,
    counts: &mut PruneCounts,
) -> Vec<Relation> {
    let bindings = match runner.select(&relations_query(template, usem)) {
        Ok(bindings) => bindings,
        Err(err) => {
            warn!(usem = %usem, error = %err, "relation query failed");
            return Vec::new();
        }
    };

    let mut kept = Vec::new();
    for relation in bindings
        .iter()
        .filter_map(RelationRow::from_binding)
        .map(RelationRow::into_relation)
    {
        match policy.verdict(&relation) {
            Verdict::Keep => kept.push(relation),
            verdict => {
                counts.relations_dropped += 1;
                debug!(
                    usem = %usem,
                    target = %relation.usem,
                    kind = %relation.kind,
                    ?verdict,
                    "relation dropped"
                );
            }
        }
    }
    kept
}

pub(super) fn attach_relations(
    runner: &dyn QueryRunner,
    template: &str,
    entries: Vec<LexicalEntry>,
    policy: &RelationPolicy,
    interrupt: &AtomicBool,
) -> (Vec<LexicalEntry>, PruneCounts) {
    let mut counts = PruneCounts::default();
    let mut retained_entries = Vec::with_capacity(entries.len());

    for mut entry in entries {
        let senses = std::mem::take(&mut entry.senses);
        let mut retained_senses = Vec::with_capacity(senses.len());

        for mut sense in senses {
            if interrupt.load(Ordering::Relaxed) {
                warn!(usem = %sense.usem, "interrupted; stopping relation retrieval");
                counts.interrupted = true;
                break;
            }
            sense.relations =
                retrieve_relations(runner, template, &sense.usem, policy, &mut counts);
            if sense.relations.is_empty() {
                info!(usem = %sense.usem, "removing sense without useful relations");
                counts.senses_pruned += 1;
            } else {
                retained_senses.push(sense);
            }
        }

        if retained_senses.is_empty() {
            if !counts.interrupted {
                info!(
                    lemma = %entry.lemma,
                    lemma_id = %entry.lemma_id,
                    "removing lexical entry without senses"
                );
                counts.entries_pruned += 1;
            }
        } else {
            entry.senses = retained_senses;
            retained_entries.push(entry);
        }

        if counts.interrupted {
            break;
        }
    }

    (retained_entries, counts)
}

pub(super) fn load_flat_senses(path: &Path) -> Result<Vec<LexicalEntry>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let flat: Vec<FlatSense> = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse sense list {}", path.display()))?;
    let entries = group_into_entries(flat.into_iter().map(sense_from_flat));

    info!(
        path = %path.display(),
        entries = entries.len(),
        senses = count_senses(&entries),
        "loaded flat sense list"
    );
    Ok(entries)
}

fn read_query(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read query {}", path.display()))
}

pub(super) fn retrieve(
    args: &GenerateArgs,
    interrupt: &AtomicBool,
) -> Result<Vec<LexicalEntry>> {
    let Some(senses_query_path) = args.senses_query.as_deref() else {
        bail!("--senses-query is required unless --load or --senses-json is given");
    };
    let Some(endpoint) = args.sparql_endpoint.as_deref() else {
        bail!("--sparql-endpoint (or SPARQL_REPO) is required to query the lexicon");
    };

    let senses_query = read_query(senses_query_path)?;
    let relations_template = args
        .relations_query
        .as_deref()
        .map(read_query)
        .transpose()?;

    let runner = SparqlEndpoint::new(endpoint)?;
    let entries = retrieve_entries(&runner, &senses_query);
    info!(
        entries = entries.len(),
        senses = count_senses(&entries),
        "retrieved lexical entries"
    );

    let Some(template) = relations_template else {
        return Ok(entries);
    };

    let policy = RelationPolicy::new(
        args.excluded_relation_usems.iter().cloned(),
        args.excluded_relation_types.iter().cloned(),
    );
    let (entries, counts) =
        attach_relations(&runner, &template, entries, &policy, interrupt);
    info!(
        entries = entries.len(),
        senses = count_senses(&entries),
        relations_dropped = counts.relations_dropped,
        senses_pruned = counts.senses_pruned,
        entries_pruned = counts.entries_pruned,
        interrupted = counts.interrupted,
        "relation pass complete"
    );
    Ok(entries)
}
