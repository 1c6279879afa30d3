use crate::utils::error::{Result, UpsetError};
use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set exactly as the user typed it, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInput {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl SetInput {
    pub fn new(name: impl Into<String>, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Validated mapping from set name to its items, in entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetCollection {
    sets: IndexMap<String, BTreeSet<String>>,
}

impl SetCollection {
    /// Validates raw input. Names and items are trimmed, blank items dropped
    /// and duplicate items collapsed.
    pub fn from_inputs(inputs: &[SetInput]) -> Result<Self> {
        if inputs.is_empty() {
            return Err(UpsetError::NoSets);
        }

        let mut sets = IndexMap::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            let name = input.name.trim();
            if name.is_empty() {
                return Err(UpsetError::BlankSetName { index: index + 1 });
            }

            let items: BTreeSet<String> = input
                .items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();

            if items.is_empty() {
                return Err(UpsetError::EmptySet {
                    name: name.to_string(),
                });
            }

            if sets.insert(name.to_string(), items).is_some() {
                return Err(UpsetError::DuplicateSetName {
                    name: name.to_string(),
                });
            }
        }

        Ok(Self { sets })
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.sets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.sets.iter().map(|(name, items)| (name.as_str(), items))
    }

    /// Sorted union of every set's items.
    pub fn union(&self) -> BTreeSet<&str> {
        self.sets
            .values()
            .flat_map(|items| items.iter().map(String::as_str))
            .collect()
    }
}

/// Boolean item-by-set membership table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidenceMatrix {
    pub(crate) set_names: Vec<String>,
    pub(crate) items: Vec<String>,
    pub(crate) cells: Vec<Vec<bool>>,
}

impl IncidenceMatrix {
    pub fn set_names(&self) -> &[String] {
        &self.set_names
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn row_count(&self) -> usize {
        self.items.len()
    }

    pub fn column_count(&self) -> usize {
        self.set_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() || self.set_names.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[bool]> {
        self.cells.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[bool])> {
        self.items
            .iter()
            .zip(self.cells.iter())
            .map(|(item, row)| (item.as_str(), row.as_slice()))
    }

    /// `None` when either the item or the set is unknown.
    pub fn contains(&self, item: &str, set: &str) -> Option<bool> {
        let row = self.items.iter().position(|probe| probe == item)?;
        let column = self.set_names.iter().position(|name| name == set)?;
        Some(self.cells[row][column])
    }
}

/// One column of the UpSet dot matrix: the items that belong to exactly
/// these sets and no others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intersection {
    pub members: Vec<bool>,
    pub size: usize,
}

impl Intersection {
    pub fn degree(&self) -> usize {
        self.members.iter().filter(|member| **member).count()
    }

    pub fn label(&self, set_names: &[String]) -> String {
        self.members
            .iter()
            .zip(set_names)
            .filter(|(member, _)| **member)
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(" & ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsetSummary {
    pub set_names: Vec<String>,
    pub set_sizes: Vec<usize>,
    /// Plot row order as indices into `set_names`: largest set first,
    /// ties in entry order.
    pub set_order: Vec<usize>,
    pub item_count: usize,
    pub intersections: Vec<Intersection>,
}

#[derive(Debug, Clone)]
pub struct UpsetResult {
    pub matrix: IncidenceMatrix,
    pub summary: UpsetSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
            OutputFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Cardinality,
    #[default]
    Degree,
}

/// Output file names, one per format, plus the archive used when bundling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub csv: String,
    pub tsv: String,
    pub json: String,
    pub png: String,
    pub zip: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            csv: "upset_matrix.csv".to_string(),
            tsv: "upset_matrix.tsv".to_string(),
            json: "upset_summary.json".to_string(),
            png: "upset_plot.png".to_string(),
            zip: "upset_output.zip".to_string(),
        }
    }
}

impl OutputFiles {
    pub fn for_format(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Csv => &self.csv,
            OutputFormat::Tsv => &self.tsv,
            OutputFormat::Json => &self.json,
            OutputFormat::Png => &self.png,
        }
    }
}
