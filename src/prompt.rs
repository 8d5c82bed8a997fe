use crate::cli::ExcludeContext;
use crate::model::UsemEntry;
use crate::relations::format_relation;

pub const SYSTEM_ROLE: &str = "Sei un esperto lessicografo.";

const GENERATION_TASK: &str =
    "Genera la definizione del senso della WORD data utilizzando le seguenti informazioni, dove:\n";
const GENERATION_LIMITS: &str = "Rispondi esclusivamente con JSON valido conforme allo schema fornito.
Non aggiungere testo, spiegazioni o formattazione extra.
La definizione non deve superare le 30 parole.
Non riscrivere WORD nella definizione.
Integra queste informazioni con la tua conoscenza interna per generare la definizione.\n";

const JUDGEMENT_TASK: &str = "Rispondi esclusivamente con JSON valido conforme allo schema fornito.
Non aggiungere testo, spiegazioni o formattazione extra.
Devi valutare la bontà delle definizioni (SENSE_DEFINITION) di una parola (WORD) assegnando un voto da 1 a 10, dove 1 è pessimo e 10 perfetto, ad ogni SENSE_DEFINITION.
Restituisci un voto per ogni SENSE_DEFINITION, nello stesso ordine in cui sono elencate.\n";
const JUDGEMENT_LEGEND: &str = "Per ogni SENSE_DEFINITION ti saranno fornite le seguenti informazioni:
- WORD: la parola cui appartiene il senso;\n";
const JUDGEMENT_CANDIDATES: &str = "I SENSE_DEFINITION da valutare sono:\n";

const EXAMPLE_LEGEND: &str = "- EXAMPLE: è l'esempio di uso della parola con quel senso;\n";
const CONCEPT_LEGEND: &str = "- CONCEPT: è il concetto cui fa riferimento il senso della parola;\n";
const RELATIONS_LEGEND: &str =
    "- RELATIONS: è una lista di relazioni con altre parole di cui è data la definizione;\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenseContext {
    pub legend: String,
    pub values: String,
    pub relations_offered: bool,
    pub useful_relations: usize,
}

impl SenseContext {
    pub fn relations_unused(&self) -> bool {
        self.relations_offered && self.useful_relations == 0
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

pub fn sense_context(
    lemma: &str,
    sense: &UsemEntry,
    exclude: Option<ExcludeContext>,
) -> SenseContext {
    let mut context = SenseContext::default();

    if exclude != Some(ExcludeContext::Examples) {
        if let Some(example) = present(sense.example.as_deref()) {
            context.legend.push_str(EXAMPLE_LEGEND);
            context.values.push_str(&format!("EXAMPLE: {example};\n"));
        }
    }

    if exclude != Some(ExcludeContext::Templates) {
        if let Some(template) = present(sense.template.as_deref()) {
            context.legend.push_str(CONCEPT_LEGEND);
            context.values.push_str(&format!("CONCEPT: {template};\n"));
        }
    }

    if exclude != Some(ExcludeContext::Relations) && !sense.relations.is_empty() {
        context.relations_offered = true;
        let rendered: Vec<String> = sense
            .relations
            .iter()
            .filter_map(|relation| format_relation(lemma, relation))
            .filter(|sentence| !sentence.is_empty())
            .map(|sentence| format!("- {sentence}"))
            .collect();
        context.useful_relations = rendered.len();
        if !rendered.is_empty() {
            context.legend.push_str(RELATIONS_LEGEND);
            context
                .values
                .push_str(&format!("RELATIONS:\n{};\n", rendered.join(";\n")));
        }
    }

    context
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub context: SenseContext,
}

pub fn generation_prompt(
    lemma: &str,
    sense: &UsemEntry,
    exclude: Option<ExcludeContext>,
) -> Prompt {
    let context = sense_context(lemma, sense, exclude);
    let text = format!(
        "{GENERATION_TASK}{}{GENERATION_LIMITS}La WORD è \"{lemma}\":\n{}",
        context.legend, context.values
    );
    Prompt { text, context }
}

pub fn judgement_prompt(
    lemma: &str,
    sense: &UsemEntry,
    candidates: &[&str],
    exclude: Option<ExcludeContext>,
) -> Prompt {
    let context = sense_context(lemma, sense, exclude);
    let mut text = format!(
        "{JUDGEMENT_TASK}{JUDGEMENT_LEGEND}{}WORD: {lemma};\n{}{JUDGEMENT_CANDIDATES}",
        context.legend, context.values
    );
    for (position, candidate) in candidates.iter().enumerate() {
        text.push_str(&format!(
            "SENSE_DEFINITION {} - \"{candidate}\";\n",
            position + 1
        ));
    }
    Prompt { text, context }
}
