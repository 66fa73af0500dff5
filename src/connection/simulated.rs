use rand::{Rng, SeedableRng};

// replays a prediction as beacon reports through the perturbation layer,
// with seeded dropout standing in for lost packets
pub struct SimulatedBeacons {
    pub prediction: crate::prediction::simulate::PredictionResult,
    pub scenario: crate::prediction::perturb::Scenario,
    pub seed: u64,
    pub beacon_interval: chrono::Duration,
    pub dropout: f64,
}

impl SimulatedBeacons {
    pub fn new(
        prediction: crate::prediction::simulate::PredictionResult,
        scenario: crate::prediction::perturb::Scenario,
        seed: u64,
        beacon_interval: chrono::Duration,
        dropout: f64,
    ) -> Self {
        Self {
            prediction,
            scenario,
            seed,
            beacon_interval,
            dropout,
        }
    }

    pub fn generate(&self) -> Vec<crate::location::ObservedPosition> {
        let mut perturbation =
            crate::prediction::perturb::Perturbation::new(self.scenario, self.seed);
        let mut dropout_rng = rand::rngs::StdRng::seed_from_u64(self.seed.wrapping_add(1));

        let mut positions = vec![];
        let mut next_beacon = chrono::Duration::zero();
        for point in &self.prediction.path {
            if point.elapsed < next_beacon {
                continue;
            }
            next_beacon = point.elapsed + self.beacon_interval;

            // the perturbation advances even when the beacon is lost
            let perturbed = perturbation.apply(point);
            if dropout_rng.random::<f64>() < self.dropout {
                continue;
            }

            positions.push(crate::location::ObservedPosition::new(
                self.prediction.launch_time + perturbed.elapsed,
                perturbed.location,
                Some(perturbed.altitude),
            ));
        }

        positions
    }
}
