//! Optimization-model view of an instance: the sets `N`, `C`, `K`, `A` and the parameters
//! built from a parsed file.
pub mod drone;

pub use drone::{
  Arc,
  Drone,
  DroneInstance,
  Loc,
  Params,
  Physics,
  Sets,
  WindScenario,
};
