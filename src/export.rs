use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::model::{AiDefinition, LexicalEntry, Relation, Score, UsemEntry};
use crate::util::write_json_pretty;

#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
    pub lemma: &'a str,
    pub id: &'a str,
    pub senses: Vec<SenseView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SenseView<'a> {
    pub id: &'a str,
    pub definition: &'a str,
    pub template: Option<&'a str>,
    pub example: Option<&'a str>,
    pub relations: Vec<RelationView<'a>>,
    pub ai_definitions: Vec<AiDefinitionView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen: Option<ChosenView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RelationView<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub target: TargetView<'a>,
}

#[derive(Debug, Serialize)]
pub struct TargetView<'a> {
    pub usem: &'a str,
    pub lemma: &'a str,
    pub definition: &'a str,
    pub example: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct AiDefinitionView<'a> {
    pub model: &'a str,
    pub definition: &'a str,
    pub mean_score: f64,
    pub scores: &'a [Score],
}

#[derive(Debug, Serialize)]
pub struct ChosenView<'a> {
    pub definition: &'a str,
    pub model: &'a str,
    pub score: f64,
}

impl<'a> From<&'a LexicalEntry> for EntryView<'a> {
    fn from(entry: &'a LexicalEntry) -> Self {
        Self {
            lemma: &entry.lemma,
            id: &entry.lemma_id,
            senses: entry.senses.iter().map(SenseView::from).collect(),
        }
    }
}

impl<'a> From<&'a UsemEntry> for SenseView<'a> {
    fn from(sense: &'a UsemEntry) -> Self {
        let chosen = match (&sense.chosen_definition, &sense.chosen_model) {
            (Some(definition), Some(model)) => Some(ChosenView {
                definition,
                model,
                score: sense.chosen_score,
            }),
            _ => None,
        };
        Self {
            id: &sense.usem,
            definition: &sense.definition,
            template: sense.template.as_deref(),
            example: sense.example.as_deref(),
            relations: sense.relations.iter().map(RelationView::from).collect(),
            ai_definitions: sense.ai_definitions.iter().map(AiDefinitionView::from).collect(),
            chosen,
        }
    }
}

impl<'a> From<&'a Relation> for RelationView<'a> {
    fn from(relation: &'a Relation) -> Self {
        Self {
            kind: &relation.kind,
            target: TargetView {
                usem: &relation.usem,
                lemma: &relation.lemma,
                definition: &relation.definition,
                example: relation.example.as_deref(),
            },
        }
    }
}

impl<'a> From<&'a AiDefinition> for AiDefinitionView<'a> {
    fn from(definition: &'a AiDefinition) -> Self {
        Self {
            model: &definition.model,
            definition: &definition.definition,
            mean_score: definition.mean_score,
            scores: &definition.scores,
        }
    }
}

pub fn export_view(entries: &[LexicalEntry]) -> Vec<EntryView<'_>> {
    entries.iter().map(EntryView::from).collect()
}

pub fn write_export(path: &Path, entries: &[LexicalEntry]) -> Result<()> {
    write_json_pretty(path, &export_view(entries))?;
    info!(path = %path.display(), entries = entries.len(), "wrote json export");
    Ok(())
}
