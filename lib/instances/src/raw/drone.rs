use std::fmt;
use crate::{Error, Result};

pub type Loc = u32;

/// Column names of the augmented instance format.
pub mod columns {
  pub const NODE: &str = "#Node";
  pub const X_COOR: &str = "X_coor";
  pub const Y_COOR: &str = "Y_coor";
  pub const DEMAND: &str = "Demand";
  pub const READY_TIME: &str = "ReadyTime";
  pub const DUE_TIME: &str = "DueTime";
  pub const MIN_CRUISE_SPEED: &str = "MIN_CRUISE_SPEED_MS";
  pub const MAX_CRUISE_SPEED: &str = "MAX_CRUISE_SPEED_MS";
  pub const VERTICAL_SPEED: &str = "VERTICAL_SPEED_MS";
  pub const WIND_SPEED_UNIFORM: &str = "WIND_SPEED_UNIFORM_MS";
  pub const WIND_SPEED_RAYLEIGH: &str = "WIND_SPEED_RAYLEIGH_MS";

  /// The columns appended by the augmenter, in file order.
  pub const PHYSICS: [&str; 5] = [
    MIN_CRUISE_SPEED,
    MAX_CRUISE_SPEED,
    VERTICAL_SPEED,
    WIND_SPEED_UNIFORM,
    WIND_SPEED_RAYLEIGH,
  ];

  pub const CUST_NUM: &str = "CustNum";
  pub const DRONE_NUM: &str = "DroneNum";
}

/// A single cell of a data row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Int(i64),
  Real(f64),
  /// Token which is not a number, kept verbatim.
  Text(String),
}

impl Value {
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Int(i) => Some(*i as f64),
      Value::Real(x) => Some(*x),
      Value::Text(_) => None,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Int(i) => write!(f, "{}", i),
      Value::Real(x) => write!(f, "{}", x),
      Value::Text(s) => f.write_str(s),
    }
  }
}

/// The columns a node record knows by name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
  X,
  Y,
  Demand,
  ReadyTime,
  DueTime,
  MinCruiseSpeed,
  MaxCruiseSpeed,
  VerticalSpeed,
  WindUniform,
  WindRayleigh,
}

impl Field {
  pub fn column(self) -> &'static str {
    use columns::*;
    match self {
      Field::X => X_COOR,
      Field::Y => Y_COOR,
      Field::Demand => DEMAND,
      Field::ReadyTime => READY_TIME,
      Field::DueTime => DUE_TIME,
      Field::MinCruiseSpeed => MIN_CRUISE_SPEED,
      Field::MaxCruiseSpeed => MAX_CRUISE_SPEED,
      Field::VerticalSpeed => VERTICAL_SPEED,
      Field::WindUniform => WIND_SPEED_UNIFORM,
      Field::WindRayleigh => WIND_SPEED_RAYLEIGH,
    }
  }

  pub fn from_column(name: &str) -> Option<Field> {
    use columns::*;
    let f = match name {
      X_COOR => Field::X,
      Y_COOR => Field::Y,
      DEMAND => Field::Demand,
      READY_TIME => Field::ReadyTime,
      DUE_TIME => Field::DueTime,
      MIN_CRUISE_SPEED => Field::MinCruiseSpeed,
      MAX_CRUISE_SPEED => Field::MaxCruiseSpeed,
      VERTICAL_SPEED => Field::VerticalSpeed,
      WIND_SPEED_UNIFORM => Field::WindUniform,
      WIND_SPEED_RAYLEIGH => Field::WindRayleigh,
      _ => return None,
    };
    Some(f)
  }
}

/// One data row of an augmented instance file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeRecord {
  pub id: Loc,
  pub x_coor: Option<Value>,
  pub y_coor: Option<Value>,
  pub demand: Option<Value>,
  pub ready_time: Option<Value>,
  pub due_time: Option<Value>,
  pub min_cruise_speed: Option<Value>,
  pub max_cruise_speed: Option<Value>,
  pub vertical_speed: Option<Value>,
  pub wind_uniform: Option<Value>,
  pub wind_rayleigh: Option<Value>,
  /// Columns without a named field (e.g. service time), in header order.
  pub extra: Vec<(String, Value)>,
}

// One match shared by the shared and mutable accessors.
macro_rules! field_slot {
  ($rec:expr, $field:expr, $($borrow:tt)+) => {
    match $field {
      Field::X => $($borrow)+ $rec.x_coor,
      Field::Y => $($borrow)+ $rec.y_coor,
      Field::Demand => $($borrow)+ $rec.demand,
      Field::ReadyTime => $($borrow)+ $rec.ready_time,
      Field::DueTime => $($borrow)+ $rec.due_time,
      Field::MinCruiseSpeed => $($borrow)+ $rec.min_cruise_speed,
      Field::MaxCruiseSpeed => $($borrow)+ $rec.max_cruise_speed,
      Field::VerticalSpeed => $($borrow)+ $rec.vertical_speed,
      Field::WindUniform => $($borrow)+ $rec.wind_uniform,
      Field::WindRayleigh => $($borrow)+ $rec.wind_rayleigh,
    }
  };
}

impl NodeRecord {
  pub fn new(id: Loc) -> Self {
    NodeRecord { id, ..Default::default() }
  }

  fn slot(&self, field: Field) -> &Option<Value> {
    field_slot!(self, field, &)
  }

  fn slot_mut(&mut self, field: Field) -> &mut Option<Value> {
    field_slot!(self, field, &mut)
  }

  #[inline]
  pub fn get(&self, field: Field) -> Option<&Value> {
    self.slot(field).as_ref()
  }

  /// Store `value` under `column`; unknown columns go to `extra`.
  pub fn set(&mut self, column: &str, value: Value) {
    match Field::from_column(column) {
      Some(f) => *self.slot_mut(f) = Some(value),
      None => self.extra.push((column.to_string(), value)),
    }
  }

  pub fn extra(&self, column: &str) -> Option<&Value> {
    self.extra.iter().find(|(c, _)| c == column).map(|(_, v)| v)
  }

  /// Numeric value of a required field.
  pub fn number(&self, field: Field) -> Result<f64> {
    let value = self.get(field)
      .ok_or(Error::MissingField { node: self.id, column: field.column() })?;
    value.as_f64().ok_or_else(|| Error::NumericConversion {
      node: Some(self.id),
      column: field.column().to_string(),
      token: value.to_string(),
    }.into())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceMetadata {
  pub cust_num: Option<usize>,
  pub drone_num: Option<usize>,
}

/// Contents of an augmented instance file. `nodes` are in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentedInstance {
  pub meta: InstanceMetadata,
  pub columns: Vec<String>,
  pub nodes: Vec<NodeRecord>,
}
