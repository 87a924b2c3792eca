//! Rotorcraft power curve and per-arc energy.
use crate::{Error, Result};

/// Physical constants of a quadcopter and its environment (SI units).
///
/// The defaults describe a small delivery drone at sea level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EnergyModel {
    /// Empty mass (kg).
    pub drone_mass: f64,
    /// Usable battery energy (J).
    pub battery_capacity: f64,
    pub g: f64,
    /// Air density (kg/m^3).
    pub rho: f64,
    /// Frontal area (m^2).
    pub area: f64,
    /// Induced-power coefficient.
    pub k1: f64,
    /// Parasitic-drag coefficient.
    pub k2: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        EnergyModel {
            drone_mass: 2.0,
            battery_capacity: 500_000.0,
            g: 9.81,
            rho: 1.225,
            area: 0.5,
            k1: 0.85,
            k2: 0.30,
        }
    }
}

impl EnergyModel {
    pub fn new(drone_mass: f64, battery_capacity: f64) -> Self {
        EnergyModel { drone_mass, battery_capacity, ..Default::default() }
    }

    /// Lift-dominated term, independent of airspeed.
    #[inline]
    pub fn induced_power(&self, total_mass: f64) -> f64 {
        let thrust = total_mass * self.g;
        self.k1 * thrust.powf(1.5) / (2.0 * self.rho * self.area).sqrt()
    }

    /// Drag-dominated term, cubic in airspeed.
    #[inline]
    pub fn parasitic_power(&self, airspeed: f64) -> f64 {
        self.k2 * 0.5 * self.rho * airspeed.powi(3) * self.area
    }

    /// Power (W) to hold `total_mass` (kg) aloft at `airspeed` (m/s).
    #[inline]
    pub fn power(&self, total_mass: f64, airspeed: f64) -> f64 {
        self.induced_power(total_mass) + self.parasitic_power(airspeed)
    }

    /// Energy (J) to fly `distance` (m) at `ground_speed` (m/s) carrying `payload` (kg).
    ///
    /// The wind always counts as a headwind: the airspeed is `ground_speed + |wind_speed|`,
    /// which makes the result an upper bound whatever the wind direction.
    pub fn arc_energy(&self, distance: f64, ground_speed: f64, wind_speed: f64, payload: f64) -> Result<f64> {
        if !(ground_speed.is_finite() && ground_speed > 0.0) {
            return Err(Error::DegenerateArc { ground_speed }.into());
        }
        let airspeed = ground_speed + wind_speed.abs();
        let total_mass = self.drone_mass + payload;
        let time = distance / ground_speed;
        Ok(self.power(total_mass, airspeed) * time)
    }

    /// Share of a full battery used by `energy` joules.
    #[inline]
    pub fn battery_fraction(&self, energy: f64) -> f64 {
        energy / self.battery_capacity
    }
}
