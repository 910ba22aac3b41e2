//! Input files a report run needs, loaded once up front.
//!
//! Only the inputs the requested reports use are read. An input that fails
//! to load is logged and left empty; reports that need it then fail on
//! their own while the others still run.

use anyhow::{anyhow, Context, Result};
use ideograph_dsl::ids::{parse_ids_file, IdsTable};
use ideograph_store::{DecompStore, LoadReport};
use ideograph_unihan::{Frequencies, IrgSources, SyllableTable, VariantGraph};
use std::collections::BTreeSet;
use std::fs;

use crate::config::ReportConfig;
use crate::reports::{self, ReportKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Input {
    Decomp,
    Ids,
    Irg,
    Frequency,
    Readings,
    Variants,
}

/// Inputs `kind` reads.
pub fn required(kind: ReportKind) -> &'static [Input] {
    match kind {
        ReportKind::Samples => &[],
        ReportKind::Longs | ReportKind::Shorts | ReportKind::IdsMerges => &[Input::Decomp, Input::Ids],
        ReportKind::Variants => &[Input::Variants],
        ReportKind::Iicore => &[Input::Irg],
        ReportKind::Syllables => &[Input::Irg, Input::Frequency, Input::Readings],
        _ => &[Input::Decomp],
    }
}

#[derive(Default)]
pub struct Inputs {
    store: Option<DecompStore>,
    pub load_report: Option<LoadReport>,
    ids: Option<IdsTable>,
    irg: Option<IrgSources>,
    frequencies: Option<Frequencies>,
    syllables: Option<SyllableTable>,
    variants: Option<VariantGraph>,
}

fn keep<T>(input: Input, loaded: Result<T>) -> Option<T> {
    match loaded {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(input = ?input, error = ?err, "input not loaded");
            None
        }
    }
}

fn load_ids(config: &ReportConfig) -> Result<IdsTable> {
    let path = config.ids_path();
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read IDS data {}", path.display()))?;
    let table = parse_ids_file(&text)
        .with_context(|| format!("failed to parse IDS data {}", path.display()))?;
    for (line, err) in &table.rejected {
        tracing::warn!(line = line + 1, error = %err, "skipping IDS description");
    }
    tracing::info!(
        entries = table.len(),
        rejected = table.rejected.len(),
        malformed = table.malformed.len(),
        "IDS data loaded"
    );
    Ok(table)
}

impl Inputs {
    /// Read every input the given reports need.
    pub fn load(config: &ReportConfig, kinds: &[ReportKind]) -> Self {
        let needed: BTreeSet<Input> = kinds
            .iter()
            .flat_map(|kind| required(*kind).iter().copied())
            .collect();
        let mut inputs = Inputs::default();

        if needed.contains(&Input::Decomp) {
            let replacements = config.replacements_path();
            if let Some((store, report)) = keep(
                Input::Decomp,
                DecompStore::build(&config.char_data_path(), Some(replacements.as_path())),
            ) {
                inputs.store = Some(store);
                inputs.load_report = Some(report);
            }
        }
        if needed.contains(&Input::Ids) {
            inputs.ids = keep(Input::Ids, load_ids(config));
        }
        if needed.contains(&Input::Irg) {
            inputs.irg = keep(Input::Irg, IrgSources::load(&config.irg_path()));
        }
        if needed.contains(&Input::Frequency) {
            if let Some(irg) = &inputs.irg {
                inputs.frequencies =
                    keep(Input::Frequency, Frequencies::load(&config.dictionary_path(), irg));
            }
        }
        if needed.contains(&Input::Readings) {
            inputs.syllables = keep(Input::Readings, SyllableTable::load(&config.readings_path()));
        }
        if needed.contains(&Input::Variants) {
            inputs.variants = keep(Input::Variants, VariantGraph::load(&config.variants_path()));
        }
        inputs
    }

    pub fn with_store(store: DecompStore) -> Self {
        Self {
            store: Some(store),
            ..Default::default()
        }
    }

    fn store(&self) -> Result<&DecompStore> {
        self.store
            .as_ref()
            .ok_or_else(|| anyhow!("decomposition data not loaded"))
    }

    fn ids(&self) -> Result<&IdsTable> {
        self.ids.as_ref().ok_or_else(|| anyhow!("IDS data not loaded"))
    }

    fn irg(&self) -> Result<&IrgSources> {
        self.irg.as_ref().ok_or_else(|| anyhow!("IRG sources not loaded"))
    }

    fn frequencies(&self) -> Result<&Frequencies> {
        self.frequencies
            .as_ref()
            .ok_or_else(|| anyhow!("frequency data not loaded"))
    }

    fn syllables(&self) -> Result<&SyllableTable> {
        self.syllables
            .as_ref()
            .ok_or_else(|| anyhow!("Mandarin readings not loaded"))
    }

    fn variants(&self) -> Result<&VariantGraph> {
        self.variants
            .as_ref()
            .ok_or_else(|| anyhow!("variant data not loaded"))
    }

    /// Render one report.
    pub fn render(&self, kind: ReportKind) -> Result<String> {
        let text = match kind {
            ReportKind::NewCharData => reports::new_char_data(self.store()?),
            ReportKind::ModelData => reports::model_data(self.store()?),
            ReportKind::CharsWithOwners => reports::chars_with_owners(self.store()?),
            ReportKind::IntermCharsWithOwners => reports::interm_chars_with_owners(self.store()?),
            ReportKind::Expanded => reports::expanded(self.store()?),
            ReportKind::DecompTags => reports::decomp_tags(self.store()?),
            ReportKind::DecompTagSummary => reports::decomp_tag_summary(self.store()?),
            ReportKind::ShapeData => reports::shape_data(self.store()?),
            ReportKind::ShapeSummary => reports::shape_summary(self.store()?),
            ReportKind::LeaderData => reports::leader_data(self.store()?),
            ReportKind::LeaderSummary => reports::leader_summary(self.store()?),
            ReportKind::FlattenSummary => reports::flatten_summary(self.store()?),
            ReportKind::FormData => reports::form_data(self.store()?),
            ReportKind::BottomUp => reports::bottom_up(self.store()?),
            ReportKind::Radicals => reports::radicals(self.store()?),
            ReportKind::Sequence => reports::sequence(self.store()?),
            ReportKind::PossibleBases => reports::possible_bases(self.store()?),
            ReportKind::Samples => reports::samples(),
            ReportKind::Longs => reports::comparisons(&self.store()?.ids_longs(self.ids()?)),
            ReportKind::Shorts => reports::comparisons(&self.store()?.ids_shorts(self.ids()?)),
            ReportKind::IdsMerges => reports::ids_merges(&self.store()?.ids_merges(self.ids()?)),
            ReportKind::Variants => reports::variants(self.variants()?),
            ReportKind::Iicore => reports::iicore(self.irg()?),
            ReportKind::Syllables => reports::syllables(self.syllables()?, self.frequencies()?),
        };
        Ok(text)
    }
}
