use itertools::Itertools;
use tracing::*;

use crate::*;

/// Energy of every arc of an instance for one ground speed and payload, using the instance's
/// scenario wind.
#[derive(Debug, Clone)]
pub struct ArcEnergy {
    pub ground_speed: f64,
    pub payload: f64,
    pub energy: Map<Arc, f64>,
}

impl ArcEnergy {
    /// `ground_speed` must lie within the cruise speed bounds of `data`.
    #[instrument(level = "debug", skip(model, data), fields(id = %data.id))]
    pub fn compute(model: &EnergyModel, data: &DroneInstance, ground_speed: f64, payload: f64) -> Result<ArcEnergy> {
        let physics = &data.params.physics;
        if !(physics.v_min..=physics.v_max).contains(&ground_speed) {
            return Err(Error::SpeedOutOfBounds {
                ground_speed,
                v_min: physics.v_min,
                v_max: physics.v_max,
            }.into());
        }

        let mut energy = Map::with_capacity_and_hasher(data.num_arcs(), Default::default());
        for arc in &data.sets.A {
            let e = model.arc_energy(data.params.dist[arc], ground_speed, physics.v_wind, payload)?;
            trace!(?arc, e);
            energy.insert(*arc, e);
        }
        debug!(arcs = energy.len(), wind = physics.v_wind, "arc energy computed");

        Ok(ArcEnergy { ground_speed, payload, energy })
    }

    #[inline]
    pub fn get(&self, arc: Arc) -> Option<f64> {
        self.energy.get(&arc).copied()
    }

    /// Arcs which alone need more than a full battery, sorted.
    pub fn infeasible_arcs(&self, model: &EnergyModel) -> Vec<Arc> {
        self.energy.iter()
            .filter(|&(_, &e)| e > model.battery_capacity)
            .map(|(&arc, _)| arc)
            .sorted()
            .collect()
    }

    /// The most expensive arc.
    pub fn max(&self) -> Option<(Arc, f64)> {
        self.energy.iter()
            .map(|(&arc, &e)| (arc, e))
            .fold(None, |best: Option<(Arc, f64)>, (arc, e)| match best {
                Some((_, b)) if b >= e => best,
                _ => Some((arc, e)),
            })
    }
}
