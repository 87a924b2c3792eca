pub use anyhow::Result;

use std::fmt;
use std::path::PathBuf;

pub type Map<K, V> = fnv::FnvHashMap<K, V>;
pub type Set<T> = fnv::FnvHashSet<T>;

use raw::drone::Loc;

/// Failure conditions raised while augmenting, parsing or building an instance.
///
/// Functions return these wrapped in [`anyhow::Error`]; use `err.downcast_ref::<Error>()` to
/// tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
  MissingFile(PathBuf),
  StructuralParse { line: usize, reason: &'static str },
  ColumnOutOfRange { line: usize, columns: usize, tokens: usize },
  NumericConversion { node: Option<Loc>, column: String, token: String },
  MissingField { node: Loc, column: &'static str },
  EmptyInstance,
  DuplicateNode(Loc),
  NoDrones,
  /// More drones than node rows.
  TooManyDrones { drone_num: usize, nodes: usize },
  InvalidTimeWindow { node: Loc, ready: f64, due: f64 },
  InvalidPhysics { v_min: f64, v_max: f64 },
}


impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

impl std::error::Error for Error {}


pub mod augment;
pub mod dataset;
pub mod parsers;
pub mod raw;
pub mod wind;
