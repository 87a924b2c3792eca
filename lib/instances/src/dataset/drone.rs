use std::borrow::Cow;
use std::convert::{Infallible, TryFrom};
use std::path::Path;
use std::str::FromStr;
use anyhow::Context;
use itertools::Itertools;
use tracing::*;

use crate::{Error, Result, Map, Set};
use crate::parsers::{ParseInstance, AugmentedFmt};
use crate::raw::{
  FromRaw,
  drone::{AugmentedInstance, Field, NodeRecord},
  metrics::{Euclidean, Metric},
};

pub use crate::raw::drone::Loc;
pub type Drone = u32;
pub type Arc = (Loc, Loc);

/// Which of the two augmented wind columns feeds the physics bundle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WindScenario {
  Uniform,
  Rayleigh,
}

impl WindScenario {
  /// Case-insensitive; anything other than `uniform` selects [`WindScenario::Rayleigh`].
  pub fn from_name(name: &str) -> Self {
    if name.eq_ignore_ascii_case("uniform") {
      WindScenario::Uniform
    } else {
      if !name.eq_ignore_ascii_case("rayleigh") {
        warn!(scenario = name, "unknown wind scenario, using Rayleigh");
      }
      WindScenario::Rayleigh
    }
  }

  fn field(self) -> Field {
    match self {
      WindScenario::Uniform => Field::WindUniform,
      WindScenario::Rayleigh => Field::WindRayleigh,
    }
  }
}

impl Default for WindScenario {
  fn default() -> Self { WindScenario::Rayleigh }
}

impl FromStr for WindScenario {
  type Err = Infallible;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    Ok(WindScenario::from_name(s))
  }
}

/// Speed bounds (m/s) and the scenario wind speed of one instance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Physics {
  pub v_min: f64,
  pub v_max: f64,
  pub v_vert: f64,
  pub v_wind: f64,
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sets {
  /// All nodes in file order: start depot first, end depot last.
  pub N: Vec<Loc>,
  pub C: Vec<Loc>,
  pub K: Vec<Drone>,
  pub A: Vec<Arc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Params {
  pub dist: Map<Arc, f64>,
  pub demand: Map<Loc, f64>,
  pub tw: Map<Loc, (f64, f64)>,
  pub physics: Physics,
}

/// Sets and parameters of the routing model for one instance file.
///
/// The first row of the file is the start depot (`o_depot`) and the last row the end depot
/// (`d_depot`); every row in between is a customer. Arcs never enter `o_depot` nor leave
/// `d_depot`.
#[derive(Debug, Clone, PartialEq)]
pub struct DroneInstance {
  pub id: String,
  pub scenario: WindScenario,
  pub sets: Sets,
  pub params: Params,
  pub o_depot: Loc,
  pub d_depot: Loc,
}

fn read_physics(node: &NodeRecord, scenario: WindScenario) -> Result<Physics> {
  let physics = Physics {
    v_min: node.number(Field::MinCruiseSpeed)?,
    v_max: node.number(Field::MaxCruiseSpeed)?,
    v_vert: node.number(Field::VerticalSpeed)?,
    v_wind: node.number(scenario.field())?,
  };
  if physics.v_min > physics.v_max {
    return Err(Error::InvalidPhysics { v_min: physics.v_min, v_max: physics.v_max }.into());
  }
  Ok(physics)
}

impl FromRaw<AugmentedInstance> for DroneInstance {
  type Options = WindScenario;

  #[allow(non_snake_case)]
  fn from_raw(raw: AugmentedInstance, id: Cow<str>, scenario: WindScenario) -> Result<DroneInstance> {
    let AugmentedInstance { meta, nodes, .. } = raw;

    let (o_depot, d_depot) = match (nodes.first(), nodes.last()) {
      (Some(first), Some(last)) => (first.id, last.id),
      _ => return Err(Error::EmptyInstance.into()),
    };

    let N: Vec<Loc> = nodes.iter().map(|n| n.id).collect();
    let mut seen = Set::default();
    if let Some(&dup) = N.iter().find(|&&i| !seen.insert(i)) {
      return Err(Error::DuplicateNode(dup).into());
    }
    let C: Vec<Loc> = N.get(1..N.len() - 1).unwrap_or(&[]).to_vec();

    if let Some(n) = meta.cust_num {
      if n != C.len() {
        warn!(cust_num = n, customers = C.len(), "CustNum disagrees with the node rows");
      }
    }

    let num_drones = match meta.drone_num {
      Some(0) => return Err(Error::NoDrones.into()),
      Some(k) if k > N.len() => {
        return Err(Error::TooManyDrones { drone_num: k, nodes: N.len() }.into())
      },
      Some(k) => Drone::try_from(k).map_err(|_| Error::NumericConversion {
        node: None,
        column: "DroneNum".to_string(),
        token: k.to_string(),
      })?,
      None => 1,
    };
    let K: Vec<Drone> = (1..=num_drones).collect();

    let A: Vec<Arc> = N.iter()
      .cartesian_product(N.iter())
      .filter(|&(&i, &j)| i != j && i != d_depot && j != o_depot)
      .map(|(&i, &j)| (i, j))
      .collect();

    let mut coords = Map::with_capacity_and_hasher(nodes.len(), Default::default());
    let mut demand = Map::with_capacity_and_hasher(nodes.len(), Default::default());
    let mut tw = Map::with_capacity_and_hasher(nodes.len(), Default::default());
    for node in &nodes {
      coords.insert(node.id, (node.number(Field::X)?, node.number(Field::Y)?));
      demand.insert(node.id, node.number(Field::Demand)?);
      let (ready, due) = (node.number(Field::ReadyTime)?, node.number(Field::DueTime)?);
      if ready > due {
        return Err(Error::InvalidTimeWindow { node: node.id, ready, due }.into());
      }
      tw.insert(node.id, (ready, due));
    }

    let mut dist: Map<Arc, f64> = Map::with_capacity_and_hasher(A.len(), Default::default());
    for &(i, j) in &A {
      let d = match dist.get(&(j, i)) {
        Some(&d) if Euclidean::SYM => d,
        _ => Euclidean::compute(coords[&i], coords[&j]),
      };
      dist.insert((i, j), d);
    }

    let physics = read_physics(&nodes[0], scenario)?;

    debug!(nodes = N.len(), customers = C.len(), drones = K.len(), arcs = A.len(), ?physics, "built instance");

    Ok(DroneInstance {
      id: id.into_owned(),
      scenario,
      sets: Sets { N, C, K, A },
      params: Params { dist, demand, tw, physics },
      o_depot,
      d_depot,
    })
  }
}

impl DroneInstance {
  /// Parse the augmented instance at `path` and build its sets and parameters. The file stem
  /// becomes the instance id.
  #[instrument(level = "debug", skip(path), fields(path = ?path.as_ref()))]
  pub fn load(path: impl AsRef<Path>, scenario: WindScenario) -> Result<DroneInstance> {
    let path = path.as_ref();
    if !path.exists() {
      return Err(Error::MissingFile(path.to_path_buf()).into());
    }
    let id = path.file_stem()
      .map(|s| s.to_string_lossy())
      .unwrap_or_default();
    let raw = AugmentedInstance::parse(AugmentedFmt(path))
      .context(format!("failed to load {:?}", path))?;
    DroneInstance::from_raw(raw, id, scenario)
      .context(format!("failed to build {:?}", path))
  }

  #[inline]
  pub fn is_customer(&self, i: Loc) -> bool {
    i != self.o_depot && i != self.d_depot && self.params.demand.contains_key(&i)
  }

  #[inline]
  pub fn num_arcs(&self) -> usize { self.sets.A.len() }

  pub fn out_arcs(&self, i: Loc) -> impl Iterator<Item=Arc> + '_ {
    self.sets.A.iter().copied().filter(move |&(a, _)| a == i)
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::augment::augment_file;
  use crate::parsers::parse_augmented;
  use crate::raw::drone::InstanceMetadata;
  use proptest::prelude::*;

  const FIXTURE: &str = "../../data/Set_A1_Cust_10_1.txt";

  fn build(text: &str, scenario: WindScenario) -> Result<DroneInstance> {
    DroneInstance::from_raw(parse_augmented(text)?, Cow::Borrowed("test"), scenario)
  }

  fn err_of(r: Result<DroneInstance>) -> Error {
    r.unwrap_err().downcast::<Error>().unwrap()
  }

  const SMALL: &str = "CustNum 1
DroneNum 2
#Node X_coor Y_coor Demand ReadyTime DueTime MIN_CRUISE_SPEED_MS MAX_CRUISE_SPEED_MS VERTICAL_SPEED_MS WIND_SPEED_UNIFORM_MS WIND_SPEED_RAYLEIGH_MS
0 0 0 0 0 100 10.0 25.0 0.5 4.5 2.25
1 3 4 2 10 20 10.0 25.0 0.5 4.5 2.25
2 0 0 0 0 100 10.0 25.0 0.5 4.5 2.25
";

  #[test]
  fn small_instance() -> Result<()> {
    let data = build(SMALL, WindScenario::Rayleigh)?;
    assert_eq!(data.sets.N, vec![0, 1, 2]);
    assert_eq!(data.sets.C, vec![1]);
    assert_eq!(data.sets.K, vec![1, 2]);
    assert_eq!(data.sets.A, vec![(0, 1), (0, 2), (1, 2)]);
    assert_eq!(data.params.dist[&(0, 1)], 5.0);
    assert_eq!(data.params.dist[&(1, 2)], 5.0);
    assert_eq!(data.params.dist[&(0, 2)], 0.0);
    assert_eq!(data.params.demand[&1], 2.0);
    assert_eq!(data.params.tw[&1], (10.0, 20.0));
    assert_eq!(data.params.physics, Physics { v_min: 10.0, v_max: 25.0, v_vert: 0.5, v_wind: 2.25 });
    assert!(data.is_customer(1));
    assert!(!data.is_customer(0) && !data.is_customer(2));
    assert_eq!(data.out_arcs(0).collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
    assert_eq!(data.out_arcs(2).count(), 0);
    Ok(())
  }

  #[test]
  fn wind_scenario_selection() -> Result<()> {
    assert_eq!(build(SMALL, WindScenario::Uniform)?.params.physics.v_wind, 4.5);
    assert_eq!(build(SMALL, "UnIfOrM".parse().unwrap())?.params.physics.v_wind, 4.5);
    assert_eq!(build(SMALL, "RAYLEIGH".parse().unwrap())?.params.physics.v_wind, 2.25);
    assert_eq!(build(SMALL, WindScenario::from_name("gusty"))?.params.physics.v_wind, 2.25);
    assert_eq!(WindScenario::default(), WindScenario::Rayleigh);
    Ok(())
  }

  #[test]
  fn drone_count_defaults_to_one() -> Result<()> {
    let text = SMALL.replace("DroneNum 2\n", "");
    assert_eq!(build(&text, WindScenario::Rayleigh)?.sets.K, vec![1]);
    let text = SMALL.replace("DroneNum 2", "DroneNum 0");
    assert_eq!(err_of(build(&text, WindScenario::Rayleigh)), Error::NoDrones);
    Ok(())
  }

  #[test]
  fn drone_count_bounded_by_nodes() -> Result<()> {
    let text = SMALL.replace("DroneNum 2", "DroneNum 3");
    assert_eq!(build(&text, WindScenario::Rayleigh)?.sets.K, vec![1, 2, 3]);

    for &k in &[4usize, 4_000_000_000, 4_294_967_296] {
      let text = SMALL.replace("DroneNum 2", &format!("DroneNum {}", k));
      assert_eq!(err_of(build(&text, WindScenario::Rayleigh)), Error::TooManyDrones { drone_num: k, nodes: 3 });
    }
    Ok(())
  }

  #[test]
  fn empty_instance() {
    let raw = AugmentedInstance { meta: InstanceMetadata::default(), columns: vec![], nodes: vec![] };
    let e = err_of(DroneInstance::from_raw(raw, Cow::Borrowed("empty"), WindScenario::Rayleigh));
    assert_eq!(e, Error::EmptyInstance);
  }

  #[test]
  fn duplicate_node() {
    let text = SMALL.replace("\n2 0 0", "\n1 0 0");
    assert_eq!(err_of(build(&text, WindScenario::Rayleigh)), Error::DuplicateNode(1));
  }

  #[test]
  fn missing_and_text_fields() {
    let text = "#Node X_coor Demand ReadyTime DueTime\n0 0 0 0 1\n1 0 0 0 1\n";
    assert_eq!(err_of(build(text, WindScenario::Rayleigh)), Error::MissingField { node: 0, column: "Y_coor" });

    let text = SMALL.replace("1 3 4 2 10 20", "1 3 four 2 10 20");
    assert_eq!(err_of(build(&text, WindScenario::Rayleigh)), Error::NumericConversion {
      node: Some(1),
      column: "Y_coor".into(),
      token: "four".into(),
    });

    let text = "#Node X_coor Y_coor Demand ReadyTime DueTime\n0 0 0 0 0 1\n1 0 0 0 0 1\n";
    assert_eq!(
      err_of(build(text, WindScenario::Rayleigh)),
      Error::MissingField { node: 0, column: "MIN_CRUISE_SPEED_MS" }
    );
  }

  #[test]
  fn invalid_bounds() {
    let text = SMALL.replace("1 3 4 2 10 20", "1 3 4 2 30 20");
    assert_eq!(
      err_of(build(&text, WindScenario::Rayleigh)),
      Error::InvalidTimeWindow { node: 1, ready: 30.0, due: 20.0 }
    );
    let text = SMALL.replacen("0 0 0 0 100 10.0 25.0", "0 0 0 0 100 30.0 25.0", 1);
    assert_eq!(
      err_of(build(&text, WindScenario::Rayleigh)),
      Error::InvalidPhysics { v_min: 30.0, v_max: 25.0 }
    );
  }

  #[test]
  fn load_missing_file() {
    let e = DroneInstance::load("../../data/no_such_instance.txt", WindScenario::Rayleigh).unwrap_err();
    assert!(matches!(e.downcast_ref::<Error>(), Some(Error::MissingFile(_))));
  }

  #[test]
  fn load_augmented_fixture() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Set_A1_Cust_10_1.txt");
    augment_file(FIXTURE, &path)?;
    let data = DroneInstance::load(&path, WindScenario::Uniform)?;

    assert_eq!(data.id, "Set_A1_Cust_10_1");
    let nodes: Vec<Loc> = (0..=11).collect();
    assert_eq!(data.sets.N, nodes);
    assert_eq!(data.sets.C, (1..=10).collect::<Vec<_>>());
    assert_eq!(data.sets.K, vec![1, 2, 3]);
    assert_eq!((data.o_depot, data.d_depot), (0, 11));

    assert!(data.sets.A.iter().all(|&(i, j)| i != j && j != 0 && i != 11));
    let expected = nodes.iter()
      .flat_map(|&i| nodes.iter().map(move |&j| (i, j)))
      .filter(|&(i, j)| i != j && j != 0 && i != 11)
      .count();
    assert_eq!(data.num_arcs(), expected);
    assert_eq!(data.num_arcs(), 111);

    assert_eq!(data.params.dist.len(), data.num_arcs());
    assert!((data.params.dist[&(0, 2)] - 2137.7558).abs() < 1e-3);
    assert_eq!(data.params.dist[&(0, 2)], data.params.dist[&(2, 11)]);
    assert_eq!(data.params.tw[&7], (900.0, 2700.0));
    assert_eq!(data.params.demand[&3], 2.0);

    let p = data.params.physics;
    assert_eq!((p.v_min, p.v_max, p.v_vert), (10.0, 25.0, 0.5));
    assert!(p.v_wind >= 3.0 && p.v_wind <= 8.0);
    Ok(())
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn arc_rules(n in 1usize..20, drones in 1usize..5) {
      let mut text = format!("DroneNum {}\n#Node X_coor Y_coor Demand ReadyTime DueTime \
        MIN_CRUISE_SPEED_MS MAX_CRUISE_SPEED_MS VERTICAL_SPEED_MS WIND_SPEED_UNIFORM_MS WIND_SPEED_RAYLEIGH_MS\n", drones);
      for i in 0..n {
        text.push_str(&format!("{} {} {} 1 0 10 10.0 25.0 0.5 5.0 3.0\n", i, i * 3, i * 4));
      }
      let data = build(&text, WindScenario::Rayleigh).unwrap();
      let last = (n - 1) as Loc;
      prop_assert!(data.sets.A.iter().all(|&(i, j)| i != j && j != 0 && i != last));
      let expected = if n < 2 { 0 } else { n * (n - 1) - 2 * (n - 1) + 1 };
      prop_assert_eq!(data.num_arcs(), expected);
      prop_assert_eq!(data.sets.C.len(), n.saturating_sub(2));
      prop_assert_eq!(data.sets.K.len(), drones);
      for (&(i, j), &d) in &data.params.dist {
        prop_assert!(d >= 0.0);
        prop_assert!((d - 5.0 * (i as f64 - j as f64).abs()).abs() < 1e-9);
      }
    }
  }
}
