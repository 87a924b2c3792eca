//! Appends the drone physics and wind columns to a raw benchmark instance.
use std::fs;
use std::path::Path;
use anyhow::{anyhow, bail, Context};
use tracing::*;

use crate::{Error, Result};
use crate::parsers::common::is_uint;
use crate::raw::drone::columns;
use crate::wind::WindSample;

pub const MIN_CRUISE_SPEED_MS: f64 = 10.0;
pub const MAX_CRUISE_SPEED_MS: f64 = 25.0;
pub const VERTICAL_SPEED_MS: f64 = 0.5;

/// Values of the five appended columns, identical on every data row of one instance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AugmentColumns {
  pub v_min: f64,
  pub v_max: f64,
  pub v_vert: f64,
  pub wind_uniform: f64,
  pub wind_rayleigh: f64,
}

impl AugmentColumns {
  /// Fixed speed bounds plus the wind draws seeded from the instance's file name.
  pub fn for_instance(name: &str) -> Self {
    let wind = WindSample::for_instance(name);
    AugmentColumns {
      v_min: MIN_CRUISE_SPEED_MS,
      v_max: MAX_CRUISE_SPEED_MS,
      v_vert: VERTICAL_SPEED_MS,
      wind_uniform: wind.uniform,
      wind_rayleigh: wind.rayleigh,
    }
  }

  pub fn header_suffix() -> String {
    columns::PHYSICS.iter().map(|c| format!("\t{}", c)).collect()
  }

  pub fn row_suffix(&self) -> String {
    format!("\t{:?}\t{:?}\t{:?}\t{:.4}\t{:.4}",
            self.v_min, self.v_max, self.v_vert, self.wind_uniform, self.wind_rayleigh)
  }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AugmentSummary {
  pub header_found: bool,
  pub data_rows: usize,
}

fn split_line_ending(line: &str) -> (&str, &str) {
  if let Some(body) = line.strip_suffix("\r\n") {
    (body, "\r\n")
  } else if let Some(body) = line.strip_suffix('\n') {
    (body, "\n")
  } else {
    (line, "")
  }
}

/// Append the physics columns to the first `#Node` header and to every data row after it.
/// All other lines, blank ones included, are copied unchanged.
pub fn augment_str(input: &str, values: &AugmentColumns) -> (String, AugmentSummary) {
  let header_suffix = AugmentColumns::header_suffix();
  let row_suffix = values.row_suffix();
  let mut summary = AugmentSummary::default();
  let mut output = String::with_capacity(input.len() + input.lines().count() * row_suffix.len());

  for line in input.split_inclusive('\n') {
    let (body, ending) = split_line_ending(line);
    let suffix = match body.split_whitespace().next() {
      Some(columns::NODE) if !summary.header_found => {
        summary.header_found = true;
        Some(&header_suffix)
      }
      Some(t) if summary.header_found && is_uint(t) => {
        summary.data_rows += 1;
        Some(&row_suffix)
      }
      _ => None,
    };
    output.push_str(body);
    if let Some(s) = suffix {
      output.push_str(s);
    }
    output.push_str(ending);
  }

  (output, summary)
}

/// Augment the instance at `src` and write the result to `dst`. The wind values are seeded
/// from the file name of `src`, so the same file always receives the same columns.
#[instrument(level = "debug", skip(src, dst), fields(src = ?src.as_ref()))]
pub fn augment_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<AugmentSummary> {
  let (src, dst) = (src.as_ref(), dst.as_ref());
  if !src.exists() {
    return Err(Error::MissingFile(src.to_path_buf()).into());
  }
  if dst.exists() && dst.canonicalize()? == src.canonicalize()? {
    bail!("refusing to augment {:?} in place", src);
  }

  let name = src.file_name()
    .ok_or_else(|| anyhow!("missing file name: {:?}", src))?
    .to_string_lossy();
  let values = AugmentColumns::for_instance(&name);

  let data = fs::read_to_string(src).with_context(|| format!("failed to read {:?}", src))?;
  let (output, summary) = augment_str(&data, &values);
  if !summary.header_found {
    warn!("no #Node header, copying unchanged");
  }
  fs::write(dst, output).with_context(|| format!("failed to write {:?}", dst))?;

  info!(rows = summary.data_rows, wind_uniform = values.wind_uniform,
        wind_rayleigh = values.wind_rayleigh, "augmented {}", name);
  Ok(summary)
}
