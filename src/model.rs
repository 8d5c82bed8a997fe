use serde::{Deserialize, Serialize};

pub const NO_SCORE: f64 = -1.0;
pub const NO_DEFINITION: &str = "no definition";
pub const NO_MODEL: &str = "no model";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalEntry {
    pub lemma: String,
    pub lemma_id: String,
    pub senses: Vec<UsemEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsemEntry {
    pub usem: String,
    pub definition: String,
    pub template: Option<String>,
    pub example: Option<String>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub ai_definitions: Vec<AiDefinition>,
    #[serde(default)]
    pub chosen_definition: Option<String>,
    #[serde(default)]
    pub chosen_model: Option<String>,
    #[serde(default = "no_score")]
    pub chosen_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub usem: String,
    pub lemma: String,
    pub definition: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDefinition {
    pub model: String,
    pub definition: String,
    #[serde(default)]
    pub scores: Vec<Score>,
    #[serde(default)]
    pub mean_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub model: String,
    pub score: u8,
}

fn no_score() -> f64 {
    NO_SCORE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Appended(usize),
    Replaced(usize),
}

impl UsemEntry {
    pub fn new(
        usem: impl Into<String>,
        definition: impl Into<String>,
        template: Option<String>,
        example: Option<String>,
    ) -> Self {
        Self {
            usem: usem.into(),
            definition: definition.into(),
            template,
            example,
            relations: Vec::new(),
            ai_definitions: Vec::new(),
            chosen_definition: None,
            chosen_model: None,
            chosen_score: NO_SCORE,
        }
    }

    pub fn ai_definition_index(&self, model: &str) -> Option<usize> {
        self.ai_definitions
            .iter()
            .position(|definition| definition.model == model)
    }

    pub fn upsert_ai_definition(&mut self, model: &str, text: impl Into<String>) -> Upsert {
        let fresh = AiDefinition::new(model, text);
        match self.ai_definition_index(model) {
            Some(index) => {
                self.ai_definitions[index] = fresh;
                Upsert::Replaced(index)
            }
            None => {
                self.ai_definitions.push(fresh);
                Upsert::Appended(self.ai_definitions.len() - 1)
            }
        }
    }

    pub fn remove_ai_definitions_by(&mut self, model: &str) -> usize {
        let before = self.ai_definitions.len();
        self.ai_definitions.retain(|definition| definition.model != model);
        before - self.ai_definitions.len()
    }

    pub fn has_choice(&self) -> bool {
        self.chosen_score != NO_SCORE
    }

    pub fn set_choice(&mut self, definition: &str, model: &str, score: f64) {
        self.chosen_definition = Some(definition.to_string());
        self.chosen_model = Some(model.to_string());
        self.chosen_score = score;
    }

    pub fn clear_choice(&mut self) {
        self.set_choice(NO_DEFINITION, NO_MODEL, NO_SCORE);
    }
}

impl AiDefinition {
    pub fn new(model: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            definition: definition.into(),
            scores: Vec::new(),
            mean_score: 0.0,
        }
    }

    pub fn score_index(&self, judge: &str) -> Option<usize> {
        self.scores.iter().position(|score| score.model == judge)
    }

    pub fn score_from(&self, judge: &str) -> Option<u8> {
        self.score_index(judge).map(|index| self.scores[index].score)
    }

    pub fn upsert_score(&mut self, judge: &str, value: u8) -> Upsert {
        let score = Score {
            model: judge.to_string(),
            score: value,
        };
        match self.score_index(judge) {
            Some(index) => {
                self.scores[index] = score;
                Upsert::Replaced(index)
            }
            None => {
                self.scores.push(score);
                Upsert::Appended(self.scores.len() - 1)
            }
        }
    }
}

pub fn count_senses(entries: &[LexicalEntry]) -> usize {
    entries.iter().map(|entry| entry.senses.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_ai_definition_replaces_same_model_in_place() {
        let mut sense = UsemEntry::new("usem-1", "old", None, None);
        assert_eq!(sense.upsert_ai_definition("m1", "first"), Upsert::Appended(0));
        assert_eq!(sense.upsert_ai_definition("m2", "second"), Upsert::Appended(1));
        sense.ai_definitions[0].upsert_score("judge", 9);

        assert_eq!(sense.upsert_ai_definition("m1", "rewritten"), Upsert::Replaced(0));
        assert_eq!(sense.ai_definitions.len(), 2);
        assert_eq!(sense.ai_definitions[0].definition, "rewritten");
        assert!(sense.ai_definitions[0].scores.is_empty());
        assert_eq!(sense.ai_definitions[0].mean_score, 0.0);
        assert_eq!(sense.ai_definitions[1].model, "m2");
    }

    #[test]
    fn upsert_score_keeps_one_score_per_judge() {
        let mut definition = AiDefinition::new("gen", "text");
        definition.upsert_score("j1", 4);
        definition.upsert_score("j2", 8);
        assert_eq!(definition.upsert_score("j1", 7), Upsert::Replaced(0));

        assert_eq!(definition.scores.len(), 2);
        assert_eq!(definition.score_from("j1"), Some(7));
        assert_eq!(definition.score_from("j2"), Some(8));
        assert_eq!(definition.score_from("j3"), None);
    }

    #[test]
    fn remove_ai_definitions_by_model_drops_scores_with_definition() {
        let mut sense = UsemEntry::new("usem-1", "old", None, None);
        sense.upsert_ai_definition("m1", "a");
        sense.upsert_ai_definition("m2", "b");
        sense.ai_definitions[0].upsert_score("judge", 6);

        assert_eq!(sense.remove_ai_definitions_by("m1"), 1);
        assert_eq!(sense.remove_ai_definitions_by("m1"), 0);
        assert_eq!(sense.ai_definitions.len(), 1);
        assert_eq!(sense.ai_definitions[0].model, "m2");
        assert!(sense.ai_definitions.iter().all(|d| d.scores.is_empty()));
    }

    #[test]
    fn clear_choice_records_sentinels() {
        let mut sense = UsemEntry::new("usem-1", "old", None, None);
        assert!(!sense.has_choice());
        sense.set_choice("def", "m1", 8.5);
        assert!(sense.has_choice());

        sense.clear_choice();
        assert_eq!(sense.chosen_definition.as_deref(), Some(NO_DEFINITION));
        assert_eq!(sense.chosen_model.as_deref(), Some(NO_MODEL));
        assert_eq!(sense.chosen_score, NO_SCORE);
    }

    #[test]
    fn usem_entry_deserializes_without_optional_collections() {
        let raw = r#"{"usem":"u","definition":"d","template":null,"example":"e"}"#;
        let sense: UsemEntry = serde_json::from_str(raw).expect("minimal sense should parse");
        assert!(sense.relations.is_empty());
        assert!(sense.ai_definitions.is_empty());
        assert_eq!(sense.chosen_score, NO_SCORE);
        assert_eq!(sense.example.as_deref(), Some("e"));
    }
}
