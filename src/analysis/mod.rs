use geo::HaversineDistance;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FlightPhase {
    Ascent,
    Burst,
    Descent,
    Landed,
}

impl FlightPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FlightPhase::Ascent => "ascent",
            FlightPhase::Burst => "burst",
            FlightPhase::Descent => "descent",
            FlightPhase::Landed => "landed",
        }
    }
}

fn default_burst_band() -> f64 {
    500.0
}

fn default_landed_altitude() -> f64 {
    1000.0
}

fn default_rate_threshold() -> f64 {
    0.2
}

fn default_rate_window() -> usize {
    5
}

fn default_beacon_interval() -> chrono::Duration {
    chrono::Duration::seconds(60)
}

fn default_missed_beacon_limit() -> i32 {
    3
}

fn default_trajectory_tolerance() -> f64 {
    10000.0
}

fn default_altitude_tolerance() -> f64 {
    1000.0
}

fn default_timing_tolerance() -> f64 {
    600.0
}

// every threshold in the phase/beacon-loss heuristics is a tuning
// parameter, so all of them are configurable
#[serde_with::serde_as]
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AnalyzerSettings {
    #[serde(default = "default_burst_band")]
    pub burst_band: f64,
    #[serde(default = "default_landed_altitude")]
    pub landed_altitude: f64,
    #[serde(default = "default_rate_threshold")]
    pub rate_threshold: f64,
    #[serde(default = "default_rate_window")]
    pub rate_window: usize,
    #[serde(default = "default_beacon_interval")]
    #[serde_as(as = "serde_with::DurationSeconds<i64>")]
    pub beacon_interval: chrono::Duration,
    #[serde(default = "default_missed_beacon_limit")]
    pub missed_beacon_limit: i32,
    #[serde(default = "default_trajectory_tolerance")]
    pub trajectory_tolerance: f64,
    #[serde(default = "default_altitude_tolerance")]
    pub altitude_tolerance: f64,
    #[serde(default = "default_timing_tolerance")]
    pub timing_tolerance: f64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            burst_band: default_burst_band(),
            landed_altitude: default_landed_altitude(),
            rate_threshold: default_rate_threshold(),
            rate_window: default_rate_window(),
            beacon_interval: default_beacon_interval(),
            missed_beacon_limit: default_missed_beacon_limit(),
            trajectory_tolerance: default_trajectory_tolerance(),
            altitude_tolerance: default_altitude_tolerance(),
            timing_tolerance: default_timing_tolerance(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AccuracyReport {
    pub trajectory: f64,
    pub altitude: f64,
    pub timing: f64,
    pub overall: f64,
}

#[derive(Clone, Debug)]
pub struct LiveComparison {
    pub phase: FlightPhase,
    pub confidence: f64,
    pub assumed_landed: bool,
    pub ascent_rate: Option<f64>,
    pub descent_rate: Option<f64>,
    pub deviation: f64,
    pub updated_prediction: crate::prediction::simulate::PredictionResult,
    pub accuracy: AccuracyReport,
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// derives everything fresh from the inputs; calling twice with the same
// observation sequence yields the same comparison
pub fn analyze_live_flight(
    positions: &[crate::location::ObservedPosition],
    original: &crate::prediction::simulate::PredictionResult,
    parameters: &crate::prediction::LaunchParameters,
    forecast: &crate::forecast::WindForecast,
    settings: &AnalyzerSettings,
    now: chrono::DateTime<chrono::Utc>,
) -> Option<LiveComparison> {
    let latest_report = positions.last()?;

    let mut latest_sample = None;
    for position in positions {
        if let Some(altitude) = position.altitude {
            latest_sample = Some((position.time, altitude, position.location));
        }
    }
    let (latest_time, latest_altitude, latest_location) = latest_sample?;

    let mut track = crate::location::track::FlightTrack::new(String::new());
    for position in positions {
        track.push(position.to_owned());
    }
    let rates = track.climb_rates();
    let recent = &rates[rates.len().saturating_sub(settings.rate_window)..];

    let silence = now - latest_report.time;
    let assumed_landed = silence
        >= settings.beacon_interval * settings.missed_beacon_limit
        && latest_altitude <= settings.landed_altitude;

    let burst_altitude = parameters.profile.burst_altitude;
    let elapsed = latest_time - original.launch_time;

    let phase = classify_phase(
        recent,
        latest_altitude,
        burst_altitude,
        elapsed,
        original,
        settings,
        assumed_landed,
    );
    let confidence = phase_confidence(phase, recent, latest_altitude, burst_altitude, settings);

    let mut climb_rates = vec![];
    let mut sink_rates = vec![];
    for rate in recent {
        if *rate > 0.0 {
            climb_rates.push(*rate);
        } else if *rate < 0.0 {
            sink_rates.push(*rate);
        }
    }
    let ascent_rate = if climb_rates.is_empty() {
        None
    } else {
        Some(mean(&climb_rates))
    };
    let descent_rate = if sink_rates.is_empty() {
        None
    } else {
        Some(-mean(&sink_rates))
    };

    let nearest = original.point_nearest_elapsed(elapsed);
    let deviation = latest_location.haversine_distance(&nearest.location);

    // re-run the integrator from the last observed state, substituting
    // measured rates for the configured ones where they exist
    let updated_parameters = crate::prediction::LaunchParameters {
        launch_site: parameters.launch_site,
        launch_altitude: parameters.launch_altitude,
        launch_time: parameters.launch_time,
        profile: crate::prediction::FlightProfile {
            ascent_rate: ascent_rate.unwrap_or(parameters.profile.ascent_rate),
            burst_altitude,
            sea_level_descent_rate: descent_rate
                .unwrap_or(parameters.profile.sea_level_descent_rate),
        },
    };
    let descent_only = matches!(
        phase,
        FlightPhase::Burst | FlightPhase::Descent | FlightPhase::Landed
    );
    let updated_prediction = crate::prediction::simulate::resume_simulation(
        crate::prediction::simulate::SimulationState {
            elapsed,
            location: latest_location,
            altitude: latest_altitude,
        },
        &updated_parameters,
        forecast,
        descent_only,
    );

    let trajectory_score = clamp_score(1.0 - deviation / settings.trajectory_tolerance);
    let altitude_score =
        clamp_score(1.0 - (latest_altitude - nearest.altitude).abs() / settings.altitude_tolerance);
    let timing_error = timing_error_seconds(latest_altitude, elapsed, phase, original);
    let timing_score = clamp_score(1.0 - timing_error / settings.timing_tolerance);
    let accuracy = AccuracyReport {
        trajectory: trajectory_score,
        altitude: altitude_score,
        timing: timing_score,
        overall: (trajectory_score + altitude_score + timing_score) / 3.0,
    };

    Some(LiveComparison {
        phase,
        confidence,
        assumed_landed,
        ascent_rate,
        descent_rate,
        deviation,
        updated_prediction,
        accuracy,
    })
}

fn classify_phase(
    recent: &[f64],
    latest_altitude: f64,
    burst_altitude: f64,
    elapsed: chrono::Duration,
    original: &crate::prediction::simulate::PredictionResult,
    settings: &AnalyzerSettings,
    assumed_landed: bool,
) -> FlightPhase {
    if assumed_landed {
        return FlightPhase::Landed;
    }

    let near_burst = (latest_altitude - burst_altitude).abs() <= settings.burst_band
        || latest_altitude >= burst_altitude;

    if recent.is_empty() {
        // a single report carries no trend; fall back on where the
        // original prediction says the flight should be
        return if latest_altitude <= settings.landed_altitude
            && elapsed >= original.landing_point().elapsed
        {
            FlightPhase::Landed
        } else if near_burst {
            FlightPhase::Burst
        } else if elapsed < original.burst_point().elapsed {
            FlightPhase::Ascent
        } else {
            FlightPhase::Descent
        };
    }

    let stable = recent
        .iter()
        .all(|rate| rate.abs() < settings.rate_threshold);
    if stable && latest_altitude <= settings.landed_altitude {
        return FlightPhase::Landed;
    }

    let rose = recent.iter().any(|rate| *rate > settings.rate_threshold);
    let last_rate = *recent.last().unwrap();
    if near_burst && (stable || (rose && last_rate < -settings.rate_threshold)) {
        return FlightPhase::Burst;
    }

    let trend = mean(recent);
    if trend > settings.rate_threshold && latest_altitude < burst_altitude {
        FlightPhase::Ascent
    } else if trend < -settings.rate_threshold {
        FlightPhase::Descent
    } else if near_burst {
        FlightPhase::Burst
    } else if trend >= 0.0 {
        FlightPhase::Ascent
    } else {
        FlightPhase::Descent
    }
}

// agreement of recent samples with the inferred phase, blended with the
// distance from the phase-defining thresholds
fn phase_confidence(
    phase: FlightPhase,
    recent: &[f64],
    latest_altitude: f64,
    burst_altitude: f64,
    settings: &AnalyzerSettings,
) -> f64 {
    let agreement = if recent.is_empty() {
        0.5
    } else {
        let consistent = recent
            .iter()
            .filter(|rate| match phase {
                FlightPhase::Ascent => **rate > settings.rate_threshold,
                FlightPhase::Descent => **rate < -settings.rate_threshold,
                FlightPhase::Landed => rate.abs() < settings.rate_threshold,
                FlightPhase::Burst => true,
            })
            .count();
        consistent as f64 / recent.len() as f64
    };

    let proximity = match phase {
        FlightPhase::Ascent => {
            clamp_score((burst_altitude - latest_altitude) / settings.burst_band)
        }
        FlightPhase::Descent => clamp_score(
            ((latest_altitude - burst_altitude).abs() / settings.burst_band)
                .min(latest_altitude / settings.landed_altitude),
        ),
        FlightPhase::Burst => {
            clamp_score(1.0 - (latest_altitude - burst_altitude).abs() / settings.burst_band)
        }
        FlightPhase::Landed => {
            clamp_score(1.0 - latest_altitude / settings.landed_altitude)
        }
    };

    clamp_score(0.5 * agreement + 0.5 * proximity)
}

// elapsed-time offset between the observation and the predicted point
// at the same altitude within the same phase
fn timing_error_seconds(
    latest_altitude: f64,
    elapsed: chrono::Duration,
    phase: FlightPhase,
    original: &crate::prediction::simulate::PredictionResult,
) -> f64 {
    let segment = match phase {
        FlightPhase::Ascent | FlightPhase::Burst => &original.path[..=original.burst_index],
        FlightPhase::Descent | FlightPhase::Landed => &original.path[original.burst_index..],
    };

    let mut nearest = &segment[0];
    for point in segment {
        if (point.altitude - latest_altitude).abs() < (nearest.altitude - latest_altitude).abs() {
            nearest = point;
        }
    }

    (nearest.elapsed - elapsed).num_seconds().abs() as f64
}

// session state for one flight: the standing settings, the last report
// seen, and the verdict; recomputation stays a pure derivation
pub struct FlightSession {
    pub settings: AnalyzerSettings,
    pub comparison: Option<LiveComparison>,
    last_observation_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl FlightSession {
    pub fn new(settings: AnalyzerSettings) -> Self {
        Self {
            settings,
            comparison: None,
            last_observation_time: None,
        }
    }

    pub fn has_new_observation(
        &self,
        positions: &[crate::location::ObservedPosition],
    ) -> bool {
        match (positions.last(), self.last_observation_time) {
            (Some(position), Some(time)) => position.time > time,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn update(
        &mut self,
        positions: &[crate::location::ObservedPosition],
        original: &crate::prediction::simulate::PredictionResult,
        parameters: &crate::prediction::LaunchParameters,
        forecast: &crate::forecast::WindForecast,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<&LiveComparison> {
        let comparison =
            analyze_live_flight(positions, original, parameters, forecast, &self.settings, now)?;
        self.last_observation_time = positions.last().map(|position| position.time);
        self.comparison = Some(comparison);
        self.comparison.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn launch_time() -> chrono::DateTime<chrono::Utc> {
        chrono::Utc.with_ymd_and_hms(2026, 4, 18, 12, 0, 0).unwrap()
    }

    fn parameters() -> crate::prediction::LaunchParameters {
        crate::prediction::LaunchParameters::new(
            geo::point!(x: -105.0, y: 40.0),
            1600.0,
            launch_time(),
            crate::prediction::FlightProfile::new(5.0, 30000.0, 6.0),
        )
    }

    fn forecast() -> crate::forecast::WindForecast {
        crate::forecast::WindForecast::new(vec![crate::forecast::ForecastInstant {
            time: launch_time(),
            levels: crate::forecast::PRESSURE_LEVELS
                .iter()
                .map(|pressure| crate::forecast::LevelWind::new(*pressure, 4.0, 240.0))
                .collect(),
        }])
    }

    // the predicted path replayed as telemetry, up to the given index
    fn observations_from_path(
        prediction: &crate::prediction::simulate::PredictionResult,
        until_index: usize,
        stride: usize,
    ) -> Vec<crate::location::ObservedPosition> {
        let mut positions = vec![];
        for (index, point) in prediction.path.iter().enumerate() {
            if index > until_index {
                break;
            }
            if index % stride == 0 || index == until_index {
                positions.push(crate::location::ObservedPosition::new(
                    prediction.time_of(point),
                    point.location,
                    Some(point.altitude),
                ));
            }
        }
        positions
    }

    #[test]
    fn test_perfect_track_scores_near_one() {
        let parameters = parameters();
        let forecast = forecast();
        let prediction = crate::prediction::simulate::run_simulation(&parameters, &forecast);

        // mid-ascent
        let mid_ascent = prediction.burst_index / 2;
        let positions = observations_from_path(&prediction, mid_ascent, 6);
        let comparison = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &AnalyzerSettings::default(),
            positions.last().unwrap().time,
        )
        .unwrap();

        assert_eq!(comparison.phase, FlightPhase::Ascent);
        assert!(comparison.confidence > 0.9);
        assert!(comparison.deviation < 1.0);
        assert!(comparison.accuracy.overall > 0.99);

        // mid-descent
        let mid_descent = prediction.burst_index + (prediction.path.len() - prediction.burst_index) / 2;
        let positions = observations_from_path(&prediction, mid_descent, 6);
        let comparison = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &AnalyzerSettings::default(),
            positions.last().unwrap().time,
        )
        .unwrap();

        assert_eq!(comparison.phase, FlightPhase::Descent);
        assert!(comparison.accuracy.overall > 0.99);
    }

    #[test]
    fn test_measured_rates_match_profile() {
        let parameters = parameters();
        let forecast = forecast();
        let prediction = crate::prediction::simulate::run_simulation(&parameters, &forecast);

        let positions = observations_from_path(&prediction, prediction.burst_index / 2, 6);
        let comparison = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &AnalyzerSettings::default(),
            positions.last().unwrap().time,
        )
        .unwrap();

        let ascent_rate = comparison.ascent_rate.unwrap();
        assert!((ascent_rate - 5.0).abs() < 0.1);
        assert!(comparison.descent_rate.is_none());
    }

    #[test]
    fn test_rates_none_until_two_samples() {
        let parameters = parameters();
        let forecast = forecast();
        let prediction = crate::prediction::simulate::run_simulation(&parameters, &forecast);

        let positions = observations_from_path(&prediction, 0, 1);
        let comparison = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &AnalyzerSettings::default(),
            positions.last().unwrap().time,
        )
        .unwrap();

        assert!(comparison.ascent_rate.is_none());
        assert!(comparison.descent_rate.is_none());
    }

    #[test]
    fn test_burst_detected_near_apex() {
        let parameters = parameters();
        let forecast = forecast();
        let prediction = crate::prediction::simulate::run_simulation(&parameters, &forecast);

        // a few points either side of the burst
        let positions = observations_from_path(&prediction, prediction.burst_index + 3, 1)
            [prediction.burst_index.saturating_sub(3)..]
            .to_vec();
        let comparison = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &AnalyzerSettings::default(),
            positions.last().unwrap().time,
        )
        .unwrap();

        assert_eq!(comparison.phase, FlightPhase::Burst);
    }

    #[test]
    fn test_beacon_silence_assumes_landed() {
        let parameters = parameters();
        let forecast = forecast();
        let prediction = crate::prediction::simulate::run_simulation(&parameters, &forecast);

        let positions = observations_from_path(&prediction, prediction.path.len() - 1, 6);
        let settings = AnalyzerSettings::default();
        let now = positions.last().unwrap().time
            + settings.beacon_interval * (settings.missed_beacon_limit + 1);
        let comparison = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &settings,
            now,
        )
        .unwrap();

        assert_eq!(comparison.phase, FlightPhase::Landed);
        assert!(comparison.assumed_landed);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let parameters = parameters();
        let forecast = forecast();
        let prediction = crate::prediction::simulate::run_simulation(&parameters, &forecast);

        let positions = observations_from_path(&prediction, prediction.burst_index / 3, 6);
        let now = positions.last().unwrap().time;
        let first = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &AnalyzerSettings::default(),
            now,
        )
        .unwrap();
        let second = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &AnalyzerSettings::default(),
            now,
        )
        .unwrap();

        assert_eq!(first.phase, second.phase);
        assert_eq!(first.deviation, second.deviation);
        assert_eq!(first.accuracy.overall, second.accuracy.overall);
        assert_eq!(
            first.updated_prediction.landing_point().location,
            second.updated_prediction.landing_point().location
        );
    }

    #[test]
    fn test_updated_prediction_continues_from_observation() {
        let parameters = parameters();
        let forecast = forecast();
        let prediction = crate::prediction::simulate::run_simulation(&parameters, &forecast);

        let until = prediction.burst_index / 2;
        let positions = observations_from_path(&prediction, until, 6);
        let comparison = analyze_live_flight(
            &positions,
            &prediction,
            &parameters,
            &forecast,
            &AnalyzerSettings::default(),
            positions.last().unwrap().time,
        )
        .unwrap();

        let updated = &comparison.updated_prediction;
        assert_eq!(
            updated.launch_point().elapsed,
            prediction.path[until].elapsed
        );
        assert!((updated.burst_point().altitude - 30000.0).abs() < 1e-9);
        assert!(updated.landing_point().altitude.abs() < 1e-9);
    }

    #[test]
    fn test_session_tracks_new_observations() {
        let parameters = parameters();
        let forecast = forecast();
        let prediction = crate::prediction::simulate::run_simulation(&parameters, &forecast);

        let mut session = FlightSession::new(AnalyzerSettings::default());
        let positions = observations_from_path(&prediction, prediction.burst_index / 4, 6);
        assert!(session.has_new_observation(&positions));

        let now = positions.last().unwrap().time;
        assert!(session
            .update(&positions, &prediction, &parameters, &forecast, now)
            .is_some());
        assert!(!session.has_new_observation(&positions));

        let more = observations_from_path(&prediction, prediction.burst_index / 2, 6);
        assert!(session.has_new_observation(&more));
    }
}
