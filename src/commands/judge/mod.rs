use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cli::{ExcludeContext, JudgeArgs};
use crate::export::write_export;
use crate::journal::{ErrorJournal, ErrorRecord, Transcript};
use crate::llm::{ChatModel, InvokeError, ModelInvoker, OutputParser, OutputSchema, ScoresOutput};
use crate::model::{LexicalEntry, Upsert, UsemEntry, count_senses};
use crate::prompt::{SYSTEM_ROLE, judgement_prompt};
use crate::snapshot;
use crate::util::{model_short_name, now_utc_string, utc_compact_string};

mod judging;
mod run;
#[cfg(test)]
mod tests;

pub use run::run;

use judging::*;
