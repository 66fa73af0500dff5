// winds-aloft pressure levels, surface to ~16 km, in hPa
pub const PRESSURE_LEVELS: [f64; 11] = [
    1000.0, 925.0, 850.0, 700.0, 500.0, 400.0, 300.0, 250.0, 200.0, 150.0, 100.0,
];

#[derive(Clone, Copy, PartialEq, Debug, serde::Deserialize, serde::Serialize)]
pub struct Wind {
    pub speed: f64,
    pub direction: f64,
}

#[derive(Clone, Copy, PartialEq, Debug, serde::Deserialize, serde::Serialize)]
pub struct LevelWind {
    pub pressure: f64,
    pub speed: Option<f64>,
    pub direction: Option<f64>,
}

impl LevelWind {
    pub fn new(pressure: f64, speed: f64, direction: f64) -> Self {
        Self {
            pressure,
            speed: Some(speed),
            direction: Some(direction),
        }
    }

    pub fn absent(pressure: f64) -> Self {
        Self {
            pressure,
            speed: None,
            direction: None,
        }
    }

    // absent values are skipped during interpolation, never read as zero
    pub fn wind(&self) -> Option<Wind> {
        match (self.speed, self.direction) {
            (Some(speed), Some(direction)) => Some(Wind { speed, direction }),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Debug, serde::Deserialize, serde::Serialize)]
pub struct ForecastInstant {
    pub time: chrono::DateTime<chrono::Utc>,
    pub levels: Vec<LevelWind>,
}

#[derive(Clone, PartialEq, Debug, serde::Deserialize, serde::Serialize)]
pub struct WindForecast {
    pub instants: Vec<ForecastInstant>,
}

impl WindForecast {
    pub fn new(instants: Vec<ForecastInstant>) -> Self {
        Self { instants }
    }

    // latest instant not after the given time, clamped to the first and
    // last available instants; no extrapolation across time
    pub fn instant_at(&self, time: chrono::DateTime<chrono::Utc>) -> Option<&ForecastInstant> {
        let mut selected: Option<&ForecastInstant> = None;
        for instant in &self.instants {
            if instant.time <= time {
                selected = Some(instant);
            } else {
                break;
            }
        }
        selected.or_else(|| self.instants.first())
    }

    pub fn sample(
        &self,
        altitude: f64,
        elapsed: chrono::Duration,
        launch_time: chrono::DateTime<chrono::Utc>,
    ) -> Option<Wind> {
        let pressure = crate::atmosphere::altitude_to_pressure(altitude);
        let instant = self.instant_at(launch_time + elapsed)?;

        // bracket the target pressure with the nearest levels that have
        // data, below (pressure >= target) and above (pressure <= target)
        let mut below: Option<(f64, Wind)> = None;
        let mut above: Option<(f64, Wind)> = None;
        for level in &instant.levels {
            let wind = match level.wind() {
                Some(wind) => wind,
                None => continue,
            };
            if level.pressure >= pressure
                && below.map_or(true, |(existing, _)| level.pressure < existing)
            {
                below = Some((level.pressure, wind));
            }
            if level.pressure <= pressure
                && above.map_or(true, |(existing, _)| level.pressure > existing)
            {
                above = Some((level.pressure, wind));
            }
        }

        match (below, above) {
            (Some((below_pressure, below_wind)), Some((above_pressure, above_wind))) => {
                if (below_pressure - above_pressure).abs() < f64::EPSILON {
                    return Some(below_wind);
                }
                let fraction = (below_pressure - pressure) / (below_pressure - above_pressure);
                Some(Wind {
                    speed: below_wind.speed + fraction * (above_wind.speed - below_wind.speed),
                    direction: blend_directions(
                        below_wind.direction,
                        above_wind.direction,
                        fraction,
                    ),
                })
            }
            (Some((_, wind)), None) | (None, Some((_, wind))) => Some(wind),
            (None, None) => None,
        }
    }
}

// shortest angular path; the difference is normalized into [-180, 180]
// before blending and the result wrapped into [0, 360)
fn blend_directions(from: f64, to: f64, fraction: f64) -> f64 {
    let difference = (to - from + 180.0).rem_euclid(360.0) - 180.0;
    (from + fraction * difference).rem_euclid(360.0)
}
