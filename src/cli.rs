use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::relations::{DEFAULT_EXCLUDED_RELATION_TYPES, DEFAULT_EXCLUDED_RELATION_USEMS};

#[derive(Parser, Debug)]
#[command(
    name = "complit-defs",
    version,
    about = "Generate, judge and select LLM sense definitions for a CompL-it lexicon"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve (or load) lexical entries and generate definitions with one model.
    Generate(GenerateArgs),
    /// Score generated definitions with one judge model.
    Judge(JudgeArgs),
    /// Pick the best definition per sense and print statistics.
    Select(SelectArgs),
    Status(StatusArgs),
}

/// Context block left out of the prompts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExcludeContext {
    Relations,
    Examples,
    Templates,
}

/// Hosted chat providers. Without `--remote` the model runs on a local Ollama.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Provider {
    Groq,
    OpenRouter,
    Together,
    Venice,
    Nebius,
    DeepInfra,
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Model name as understood by the provider; also the key stored on definitions and scores.
    /// With `generate --remove` it names the generator whose definitions are dropped.
    #[arg(short = 'm', long = "model")]
    pub model: String,

    #[arg(short = 'r', long = "remote", value_enum)]
    pub remote: Option<Provider>,

    #[arg(long, env = "OLLAMA_HOST", default_value = "http://127.0.0.1:11434")]
    pub ollama_host: String,

    #[arg(short = 'w', long, default_value_t = false)]
    pub overwrite: bool,

    #[arg(short = 'x', long, value_enum)]
    pub exclude: Option<ExcludeContext>,

    /// Directory for transcripts, prompt logs and error journals.
    #[arg(long, default_value = "output")]
    pub log_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(short = 'p', long)]
    pub snapshot: PathBuf,

    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Resume from the snapshot instead of querying the triple store.
    #[arg(short = 'l', long, default_value_t = false)]
    pub load: bool,

    /// Build the tree from a flat JSON sense list instead of the triple store.
    #[arg(long, conflicts_with = "load")]
    pub senses_json: Option<PathBuf>,

    /// Remove every definition generated by `--model` and stop.
    #[arg(short = 'k', long, default_value_t = false)]
    pub remove: bool,

    /// SPARQL query enumerating entries and senses.
    #[arg(long = "senses-query")]
    pub senses_query: Option<PathBuf>,

    /// SPARQL query enumerating relations of one sense (`#USEM#` placeholder).
    #[arg(long = "relations-query")]
    pub relations_query: Option<PathBuf>,

    #[arg(long, env = "SPARQL_REPO")]
    pub sparql_endpoint: Option<String>,

    #[arg(
        long = "exclude-relation-usem",
        default_values_t = DEFAULT_EXCLUDED_RELATION_USEMS.map(String::from)
    )]
    pub excluded_relation_usems: Vec<String>,

    #[arg(
        long = "exclude-relation-type",
        default_values_t = DEFAULT_EXCLUDED_RELATION_TYPES.map(String::from)
    )]
    pub excluded_relation_types: Vec<String>,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args, Debug, Clone)]
pub struct JudgeArgs {
    #[arg(short = 'p', long)]
    pub snapshot: PathBuf,

    #[arg(short = 'o', long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    #[arg(short = 'p', long)]
    pub snapshot: PathBuf,

    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Also write the statistics report as JSON.
    #[arg(long)]
    pub stats_output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(short = 'p', long)]
    pub snapshot: PathBuf,
}
