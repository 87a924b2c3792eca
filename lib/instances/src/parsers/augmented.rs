use std::convert::TryFrom;
use std::path::Path;
use tracing::{debug, trace};

use crate::{Error, Result};
use crate::raw::drone::*;
use super::{
  ParseInstance,
  common::*,
};

#[derive(Debug, Copy, Clone)]
pub struct AugmentedFmt<P>(pub P);

impl<P: AsRef<Path>> ParseInstance<AugmentedFmt<P>> for AugmentedInstance {
  fn parse(input: AugmentedFmt<P>) -> Result<Self> {
    let path = input.0.as_ref();
    if !path.exists() {
      return Err(Error::MissingFile(path.to_path_buf()).into());
    }
    let data = std::fs::read_to_string(path)?;
    parse_augmented(&data)
  }
}

fn metadata_value(tokens: &[&str], line: usize) -> Result<usize> {
  let token = tokens.get(1)
    .ok_or(Error::StructuralParse { line, reason: "metadata line without a value" })?;
  uint_token(token).ok_or_else(|| Error::NumericConversion {
    node: None,
    column: tokens[0].to_string(),
    token: token.to_string(),
  }.into())
}

/// Parse the text of an augmented instance file.
///
/// Lines are split on runs of whitespace, so files mixing tabs and spaces are fine. Data rows
/// are mapped positionally onto the most recent `#Node` header; lines that are neither
/// metadata, header nor data row (e.g. source tags) are skipped.
pub fn parse_augmented(input: &str) -> Result<AugmentedInstance> {
  let mut instance = AugmentedInstance::default();

  for (k, text) in input.lines().enumerate() {
    let line = k + 1;
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let first = match tokens.first() {
      Some(&t) => t,
      None => continue,
    };

    match first {
      columns::CUST_NUM => instance.meta.cust_num = Some(metadata_value(&tokens, line)?),
      columns::DRONE_NUM => instance.meta.drone_num = Some(metadata_value(&tokens, line)?),
      columns::NODE => {
        instance.columns = tokens.iter().map(|s| s.to_string()).collect();
        trace!(line, columns=?instance.columns, "header");
      }
      _ if is_uint(first) => {
        let record = data_row(&instance.columns, &tokens, line)?;
        instance.nodes.push(record);
      }
      _ => trace!(line, "skip"),
    }
  }

  debug!(nodes = instance.nodes.len(), meta=?instance.meta, "parsed instance");
  Ok(instance)
}

fn data_row(header: &[String], tokens: &[&str], line: usize) -> Result<NodeRecord> {
  if header.is_empty() {
    return Err(Error::StructuralParse { line, reason: "data row before #Node header" }.into());
  }
  if tokens.len() > header.len() {
    return Err(Error::ColumnOutOfRange { line, columns: header.len(), tokens: tokens.len() }.into());
  }
  if tokens.len() < header.len() {
    return Err(Error::StructuralParse { line, reason: "data row has fewer tokens than header columns" }.into());
  }

  let id = uint_token(tokens[0])
    .and_then(|n| Loc::try_from(n).ok())
    .ok_or_else(|| Error::NumericConversion {
      node: None,
      column: columns::NODE.to_string(),
      token: tokens[0].to_string(),
    })?;

  let mut record = NodeRecord::new(id);
  for (column, token) in header.iter().zip(tokens).skip(1) {
    record.set(column, value(token));
  }
  Ok(record)
}
