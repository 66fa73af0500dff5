use geo::HaversineDestination;
use rand::{Rng, SeedableRng};

// flavors of synthetic flight used to exercise the live analyzer
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    #[default]
    Nominal,
    EarlyBurst,
    WindShear,
    SlowAscent,
    FastDescent,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Nominal => "nominal",
            Scenario::EarlyBurst => "early burst",
            Scenario::WindShear => "wind shear",
            Scenario::SlowAscent => "slow ascent",
            Scenario::FastDescent => "fast descent",
        }
    }
}

pub const POSITION_JITTER: f64 = 30.0;
pub const ALTITUDE_JITTER: f64 = 15.0;
pub const SHEAR_DRIFT_RATE: f64 = 0.5;
pub const EARLY_BURST_FACTOR: f64 = 0.85;
pub const SLOW_ASCENT_FACTOR: f64 = 0.9;
pub const FAST_DESCENT_FACTOR: f64 = 1.3;

// maps nominal flight points to perturbed ones; all randomness comes
// from the seeded generator, so a given (scenario, seed) pair always
// produces the same flight
pub struct Perturbation {
    scenario: Scenario,
    rng: rand::rngs::StdRng,
    drift_bearing: f64,
    peak_altitude: f64,
}

impl Perturbation {
    pub fn new(scenario: Scenario, seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let drift_bearing = rng.random_range(0.0..360.0);
        Self {
            scenario,
            rng,
            drift_bearing,
            peak_altitude: 0.0,
        }
    }

    pub fn apply(
        &mut self,
        nominal: &crate::prediction::simulate::FlightPoint,
    ) -> crate::prediction::simulate::FlightPoint {
        let mut altitude = match self.scenario {
            Scenario::Nominal | Scenario::WindShear => nominal.altitude,
            Scenario::EarlyBurst => nominal.altitude * EARLY_BURST_FACTOR,
            Scenario::SlowAscent => nominal.altitude * SLOW_ASCENT_FACTOR,
            Scenario::FastDescent => {
                if nominal.altitude >= self.peak_altitude {
                    nominal.altitude
                } else {
                    self.peak_altitude
                        - (self.peak_altitude - nominal.altitude) * FAST_DESCENT_FACTOR
                }
            }
        };
        if nominal.altitude > self.peak_altitude {
            self.peak_altitude = nominal.altitude;
        }

        let mut location = nominal.location;
        if self.scenario == Scenario::WindShear {
            let drift = SHEAR_DRIFT_RATE * nominal.elapsed.num_seconds() as f64;
            if drift > 0.0 {
                location = location.haversine_destination(self.drift_bearing, drift);
            }
        }

        let jitter_bearing = self.rng.random_range(0.0..360.0);
        let jitter_distance = self.rng.random_range(0.0..POSITION_JITTER);
        if jitter_distance > 0.0 {
            location = location.haversine_destination(jitter_bearing, jitter_distance);
        }
        altitude += self.rng.random_range(-ALTITUDE_JITTER..ALTITUDE_JITTER);
        if altitude < 0.0 {
            altitude = 0.0;
        }

        crate::prediction::simulate::FlightPoint {
            elapsed: nominal.elapsed,
            location,
            altitude,
        }
    }
}
