use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::cli::{ExcludeContext, GenerateArgs};
use crate::journal::{ErrorJournal, ErrorRecord, Transcript};
use crate::llm::{ChatModel, DefinitionOutput, ModelInvoker, OutputParser};
use crate::model::{AiDefinition, LexicalEntry, Relation, Upsert, UsemEntry, count_senses};
use crate::prompt::{SYSTEM_ROLE, generation_prompt};
use crate::relations::{RelationPolicy, Verdict};
use crate::snapshot;
use crate::sparql::{QueryRunner, RelationRow, SenseRow, SparqlEndpoint, relations_query};
use crate::util::{model_short_name, now_utc_string};

mod generation;
mod maintenance;
mod retrieval;
mod run;

pub use run::run;

use generation::*;
use maintenance::*;
use retrieval::*;
