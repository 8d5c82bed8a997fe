use std::collections::HashSet;

use tracing::warn;

use crate::model::Relation;

pub const LEXINFO_HYPONYM: &str = "http://www.lexinfo.net/ontology/3.0/lexinfo#hyponym";
pub const LEXINFO_HYPERNYM: &str = "http://www.lexinfo.net/ontology/3.0/lexinfo#hypernym";
pub const LEXINFO_APPROXIMATE_SYNONYM: &str =
    "http://www.lexinfo.net/ontology/3.0/lexinfo#approximateSynonym";
pub const COMPLIT_SYNONYM: &str = "http://klab/lexicon/vocabulary/compl-it#synonym";
pub const COMPLIT_DERIVATIONAL: &str = "http://klab/lexicon/vocabulary/compl-it#derivational";
pub const COMPLIT_PROCESS_VERB: &str = "http://klab/lexicon/vocabulary/compl-it#processVerb";
pub const COMPLIT_IS_A: &str = "http://klab/lexicon/vocabulary/compl-it#isA";
pub const COMPLIT_FORMAL: &str = "http://klab/lexicon/vocabulary/compl-it#formal";
pub const COMPLIT_HAS_SEMANTIC_TYPE: &str =
    "http://klab/lexicon/vocabulary/compl-it#hasSemanticType";

pub const ROOT_CONCEPT_LEMMA: &str = "entità";

pub const DEFAULT_EXCLUDED_RELATION_USEMS: [&str; 1] = ["http://lexica/mylexicon#USem796entita1"];
pub const DEFAULT_EXCLUDED_RELATION_TYPES: [&str; 3] =
    [COMPLIT_FORMAL, COMPLIT_IS_A, COMPLIT_SYNONYM];

pub fn format_relation(lemma: &str, relation: &Relation) -> Option<String> {
    if relation.lemma == ROOT_CONCEPT_LEMMA {
        return None;
    }

    let verb = match relation.kind.as_str() {
        LEXINFO_HYPONYM => "è iponimo di",
        LEXINFO_HYPERNYM => "è iperonimo di",
        LEXINFO_APPROXIMATE_SYNONYM => "è un quasi sinonimo di",
        COMPLIT_SYNONYM => "è un sinonimo di",
        COMPLIT_DERIVATIONAL => "è derivato da",
        COMPLIT_PROCESS_VERB => "deriva dal verbo",
        COMPLIT_IS_A | COMPLIT_FORMAL => return None,
        other => {
            warn!(relation_type = %other, target = %relation.usem, "unrecognized relation type");
            return None;
        }
    };

    Some(format!(
        "\"{lemma}\" {verb} \"{}\" nel senso di \"{}\"",
        relation.lemma, relation.definition
    ))
}

#[derive(Debug, Clone)]
pub struct RelationPolicy {
    excluded_usems: HashSet<String>,
    excluded_types: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    ExcludedTarget,
    ExcludedType,
    SemanticType,
}

impl Default for RelationPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXCLUDED_RELATION_USEMS.iter().map(|s| s.to_string()),
            DEFAULT_EXCLUDED_RELATION_TYPES.iter().map(|s| s.to_string()),
        )
    }
}

impl RelationPolicy {
    pub fn new(
        excluded_usems: impl IntoIterator<Item = String>,
        excluded_types: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            excluded_usems: excluded_usems.into_iter().collect(),
            excluded_types: excluded_types.into_iter().collect(),
        }
    }

    pub fn verdict(&self, relation: &Relation) -> Verdict {
        if self.excluded_usems.contains(&relation.usem) {
            Verdict::ExcludedTarget
        } else if self.excluded_types.contains(&relation.kind) {
            Verdict::ExcludedType
        } else if relation.kind == COMPLIT_HAS_SEMANTIC_TYPE {
            Verdict::SemanticType
        } else {
            Verdict::Keep
        }
    }
}
