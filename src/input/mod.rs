//! Input collection: turns what the user typed into [`SetInput`]s.
//!
//! Nothing here enforces the set invariants; that happens when the inputs
//! are turned into a [`SetCollection`](crate::domain::model::SetCollection).

pub mod form;

use crate::domain::model::SetInput;
use crate::utils::error::{Result, UpsetError};
use std::path::Path;

pub use form::FormPrompt;

/// Parses the "number of sets" field. Anything that is not a positive
/// integer is rejected.
pub fn parse_set_count(text: &str) -> Result<usize> {
    let trimmed = text.trim();
    match trimmed.parse::<i64>() {
        Ok(count) if count > 0 => usize::try_from(count).map_err(|_| UpsetError::InvalidSetCount {
            input: trimmed.to_string(),
        }),
        _ => Err(UpsetError::InvalidSetCount {
            input: trimmed.to_string(),
        }),
    }
}

/// One item per line; surrounding whitespace and blank lines are ignored.
pub fn parse_items(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads an items file, one item per line.
pub fn read_items_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_items(&content))
}

/// Parses `NAME=a,b,c` or `NAME=@items.txt`.
pub fn parse_set_arg(arg: &str) -> Result<SetInput> {
    let (name, rest) = arg.split_once('=').ok_or_else(|| UpsetError::InvalidConfigValueError {
        field: "set".to_string(),
        value: arg.to_string(),
        reason: "Expected NAME=ITEMS".to_string(),
    })?;

    let items = match rest.strip_prefix('@') {
        Some(path) => read_items_file(path)?,
        None => rest
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    };

    Ok(SetInput {
        name: name.trim().to_string(),
        items,
    })
}

pub fn set_arg_value_parser(arg: &str) -> std::result::Result<SetInput, String> {
    parse_set_arg(arg).map_err(|e| e.to_string())
}
