use std::collections::{HashMap, HashSet};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::SelectArgs;
use crate::export::write_export;
use crate::model::{LexicalEntry, NO_SCORE, Score, UsemEntry, count_senses};
use crate::snapshot;
use crate::util::write_json_pretty;

mod run;
mod selection;
mod statistics;
#[cfg(test)]
mod tests;

pub use run::run;

use selection::*;
use statistics::*;
