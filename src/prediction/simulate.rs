use geo::{HaversineDestination, HaversineDistance};

pub const TIMESTEP_SECONDS: f64 = 10.0;

// bounds the integration loop against misconfigured near-zero rates;
// ~11 days of simulated flight at the fixed timestep
pub const MAX_SIMULATION_STEPS: usize = 100_000;

lazy_static::lazy_static! {
    pub static ref TIMESTEP: chrono::Duration = chrono::Duration::seconds(TIMESTEP_SECONDS as i64);
}

#[derive(Clone, Copy, Debug)]
pub struct FlightPoint {
    pub elapsed: chrono::Duration,
    pub location: geo::Point,
    pub altitude: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct SimulationState {
    pub elapsed: chrono::Duration,
    pub location: geo::Point,
    pub altitude: f64,
}

#[derive(Clone, Debug)]
pub struct PredictionResult {
    pub launch_time: chrono::DateTime<chrono::Utc>,
    pub path: Vec<FlightPoint>,
    pub burst_index: usize,
    pub total_duration: chrono::Duration,
    pub max_altitude: f64,
    pub distance_traveled: f64,
}

impl PredictionResult {
    pub fn launch_point(&self) -> &FlightPoint {
        self.path.first().unwrap()
    }

    pub fn burst_point(&self) -> &FlightPoint {
        &self.path[self.burst_index]
    }

    pub fn landing_point(&self) -> &FlightPoint {
        self.path.last().unwrap()
    }

    pub fn time_of(&self, point: &FlightPoint) -> chrono::DateTime<chrono::Utc> {
        self.launch_time + point.elapsed
    }

    // predicted point with elapsed time closest to the given elapsed time
    pub fn point_nearest_elapsed(&self, elapsed: chrono::Duration) -> &FlightPoint {
        let mut nearest = self.path.first().unwrap();
        for point in &self.path {
            if (point.elapsed - elapsed).num_seconds().abs()
                < (nearest.elapsed - elapsed).num_seconds().abs()
            {
                nearest = point;
            }
        }
        nearest
    }
}

pub fn run_simulation(
    parameters: &crate::prediction::LaunchParameters,
    forecast: &crate::forecast::WindForecast,
) -> PredictionResult {
    resume_simulation(
        SimulationState {
            elapsed: chrono::Duration::zero(),
            location: parameters.launch_site,
            altitude: parameters.launch_altitude,
        },
        parameters,
        forecast,
        false,
    )
}

// forward integration from an arbitrary in-flight state; `descent_only`
// skips the remaining climb, mirroring a balloon observed after burst
pub fn resume_simulation(
    state: SimulationState,
    parameters: &crate::prediction::LaunchParameters,
    forecast: &crate::forecast::WindForecast,
    descent_only: bool,
) -> PredictionResult {
    let profile = &parameters.profile;
    let launch_time = parameters.launch_time;

    let mut elapsed = state.elapsed;
    let mut location = state.location;
    let mut altitude = state.altitude;
    let mut steps: usize = 0;

    let mut path = vec![FlightPoint {
        elapsed,
        location,
        altitude,
    }];

    let mut ascending = !descent_only && altitude < profile.burst_altitude;
    while ascending && steps < MAX_SIMULATION_STEPS {
        altitude += profile.ascent_rate * TIMESTEP_SECONDS;
        if altitude >= profile.burst_altitude {
            altitude = profile.burst_altitude;
            ascending = false;
        }
        elapsed = elapsed + *TIMESTEP;
        location = displace(location, altitude, elapsed, launch_time, forecast);
        path.push(FlightPoint {
            elapsed,
            location,
            altitude,
        });
        steps += 1;
    }

    let burst_index = path.len() - 1;

    while altitude > 0.0 && steps < MAX_SIMULATION_STEPS {
        altitude -= profile.sea_level_descent_rate * TIMESTEP_SECONDS;
        if altitude < 0.0 {
            altitude = 0.0;
        }
        elapsed = elapsed + *TIMESTEP;
        location = displace(location, altitude, elapsed, launch_time, forecast);
        path.push(FlightPoint {
            elapsed,
            location,
            altitude,
        });
        steps += 1;
    }

    let mut max_altitude = f64::MIN;
    for point in &path {
        if point.altitude > max_altitude {
            max_altitude = point.altitude;
        }
    }

    let mut distance_traveled = 0.0;
    for index in 0..path.len() - 1 {
        distance_traveled = distance_traveled
            + path[index].location.haversine_distance(&path[index + 1].location);
    }

    PredictionResult {
        launch_time,
        path,
        burst_index,
        total_duration: elapsed - state.elapsed,
        max_altitude,
        distance_traveled,
    }
}

// great-circle offset of one timestep of drift; a slice with no wind
// data leaves the position unchanged rather than inventing a zero wind
fn displace(
    location: geo::Point,
    altitude: f64,
    elapsed: chrono::Duration,
    launch_time: chrono::DateTime<chrono::Utc>,
    forecast: &crate::forecast::WindForecast,
) -> geo::Point {
    match forecast.sample(altitude, elapsed, launch_time) {
        Some(wind) if wind.speed > 0.0 => {
            location.haversine_destination(wind.direction, wind.speed * TIMESTEP_SECONDS)
        }
        _ => location,
    }
}
