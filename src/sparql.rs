use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::warn;

use crate::model::Relation;

pub const SENSE_PLACEHOLDER: &str = "#USEM#";

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding(HashMap<String, String>);

impl Binding {
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    fn owned(&self, variable: &str) -> Option<String> {
        self.get(variable).map(ToOwned::to_owned)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Binding {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

pub trait QueryRunner {
    fn select(&self, query: &str) -> Result<Vec<Binding>>;
}

pub struct SparqlEndpoint {
    url: String,
    client: reqwest::blocking::Client,
}

impl SparqlEndpoint {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;
        Ok(Self {
            url: url.trim().to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
struct SparqlTerm {
    value: String,
}

impl QueryRunner for SparqlEndpoint {
    fn select(&self, query: &str) -> Result<Vec<Binding>> {
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .map_err(|e| anyhow!("failed to reach sparql endpoint at {}: {e}", self.url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(anyhow!("sparql http error {status}: {text}"));
        }

        let body = resp
            .text()
            .context("failed to read sparql response body")?;
        parse_results(&body)
    }
}

pub fn parse_results(body: &str) -> Result<Vec<Binding>> {
    let parsed: SparqlResults =
        serde_json::from_str(body).context("sparql endpoint returned invalid results JSON")?;
    Ok(parsed
        .results
        .bindings
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(variable, term)| (variable, term.value))
                .collect::<Binding>()
        })
        .collect())
}

pub fn relations_query(template: &str, sense_id: &str) -> String {
    template.replace(SENSE_PLACEHOLDER, sense_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseRow {
    pub entry_id: String,
    pub lemma: String,
    pub sense_id: String,
    pub definition: Option<String>,
    pub template: Option<String>,
    pub example: Option<String>,
}

impl SenseRow {
    pub fn from_binding(binding: &Binding) -> Option<Self> {
        let (Some(entry_id), Some(lemma), Some(sense_id)) = (
            binding.owned("le"),
            binding.owned("lemma"),
            binding.owned("sense"),
        ) else {
            warn!(?binding, "sense row without entry, lemma or sense; skipped");
            return None;
        };

        Some(Self {
            entry_id,
            lemma,
            sense_id,
            definition: binding.owned("definition"),
            template: binding.owned("template"),
            example: binding.owned("example"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRow {
    pub target: String,
    pub lemma: Option<String>,
    pub definition: Option<String>,
    pub kind: String,
    pub example: Option<String>,
}

impl RelationRow {
    pub fn from_binding(binding: &Binding) -> Option<Self> {
        let (Some(target), Some(kind)) = (binding.owned("target"), binding.owned("relation"))
        else {
            warn!(?binding, "relation row without target or relation type; skipped");
            return None;
        };

        Some(Self {
            target,
            lemma: binding.owned("lemma"),
            definition: binding.owned("def"),
            kind,
            example: binding.owned("example"),
        })
    }

    pub fn into_relation(self) -> Relation {
        let lemma = self.lemma.unwrap_or_else(|| {
            warn!(target = %self.target, "relation target has no lemma");
            String::new()
        });
        let definition = self.definition.unwrap_or_else(|| {
            warn!(target = %self.target, "relation target has no definition");
            String::new()
        });
        Relation {
            usem: self.target,
            lemma,
            definition,
            kind: self.kind,
            example: self.example,
        }
    }
}
