pub mod perturb;
pub mod simulate;

#[derive(Clone, Copy, PartialEq, Debug, serde::Deserialize)]
pub struct FlightProfile {
    pub ascent_rate: f64,
    pub burst_altitude: f64,
    pub sea_level_descent_rate: f64,
}

impl FlightProfile {
    pub fn new(ascent_rate: f64, burst_altitude: f64, sea_level_descent_rate: f64) -> Self {
        Self {
            ascent_rate,
            burst_altitude,
            sea_level_descent_rate,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LaunchParameters {
    pub launch_site: geo::Point,
    pub launch_altitude: f64,
    pub launch_time: chrono::DateTime<chrono::Utc>,
    pub profile: FlightProfile,
}

impl LaunchParameters {
    pub fn new(
        launch_site: geo::Point,
        launch_altitude: f64,
        launch_time: chrono::DateTime<chrono::Utc>,
        profile: FlightProfile,
    ) -> Self {
        Self {
            launch_site,
            launch_altitude,
            launch_time,
            profile,
        }
    }

    // the integrator's behavior is undefined for parameters that fail
    // this check; callers must validate before running a simulation
    pub fn is_valid(&self) -> bool {
        self.profile.ascent_rate > 0.0
            && self.profile.sea_level_descent_rate > 0.0
            && self.profile.burst_altitude > self.launch_altitude
            && self.launch_altitude >= 0.0
    }
}
