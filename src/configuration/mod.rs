fn default_name() -> String {
    String::from("unnamed_flight")
}

#[derive(serde::Deserialize, Clone)]
pub struct RunConfiguration {
    #[serde(default = "default_name")]
    pub name: String,
    pub launch: LaunchConfiguration,
    pub profile: Option<ProfileConfiguration>,
    pub calculator: Option<crate::model::CalculatorParams>,
    pub forecast: PathConfiguration,
    pub output: Option<PathConfiguration>,
    pub track: Option<TrackConfiguration>,
    #[serde(default)]
    pub analyzer: crate::analysis::AnalyzerSettings,
}

#[derive(serde::Deserialize, PartialEq, Debug, Clone)]
pub struct PathConfiguration {
    pub filename: std::path::PathBuf,
}

#[derive(serde::Deserialize, PartialEq, Debug, Clone)]
pub struct LaunchConfiguration {
    // lon, lat, and optionally altitude in meters
    pub location: Vec<f64>,
    #[serde(with = "crate::utilities::utc_datetime_string")]
    pub time: chrono::DateTime<chrono::Utc>,
}

impl LaunchConfiguration {
    pub fn to_launch_parameters(
        &self,
        profile: crate::prediction::FlightProfile,
    ) -> crate::prediction::LaunchParameters {
        crate::prediction::LaunchParameters::new(
            geo::point!(x: self.location[0], y: self.location[1]),
            if self.location.len() > 2 {
                self.location[2]
            } else {
                0.0
            },
            self.time,
            profile,
        )
    }
}

fn default_sea_level_descent_rate() -> f64 {
    6.0
}

#[derive(serde::Deserialize, PartialEq, Debug, Clone)]
pub struct ProfileConfiguration {
    pub ascent_rate: f64,
    pub burst_altitude: f64,
    #[serde(default = "default_sea_level_descent_rate")]
    pub sea_level_descent_rate: f64,
}

impl ProfileConfiguration {
    pub fn to_flight_profile(&self) -> crate::prediction::FlightProfile {
        crate::prediction::FlightProfile::new(
            self.ascent_rate,
            self.burst_altitude,
            self.sea_level_descent_rate,
        )
    }
}

#[derive(serde::Deserialize, Clone)]
#[serde(untagged)]
pub enum TrackConfiguration {
    File { filename: std::path::PathBuf },
    Simulated(SimulationConfiguration),
}

fn default_seed() -> u64 {
    0
}

fn default_beacon_interval() -> chrono::Duration {
    chrono::Duration::seconds(60)
}

fn default_dropout() -> f64 {
    0.0
}

#[serde_with::serde_as]
#[derive(serde::Deserialize, Clone)]
pub struct SimulationConfiguration {
    #[serde(default)]
    pub scenario: crate::prediction::perturb::Scenario,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_beacon_interval")]
    #[serde_as(as = "serde_with::DurationSeconds<i64>")]
    pub beacon_interval: chrono::Duration,
    #[serde(default = "default_dropout")]
    pub dropout: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_flight_configuration() {
        let path = format!("{:}/{:}", env!("CARGO_MANIFEST_DIR"), "demos/flight.yaml");

        let file = std::fs::File::open(path).unwrap();
        let configuration: RunConfiguration = serde_yaml::from_reader(file).unwrap();

        assert_eq!(configuration.name, String::from("front_range_flight"));
        assert_eq!(
            configuration.launch,
            LaunchConfiguration {
                location: vec![-105.0, 40.0, 1600.0],
                time: chrono::Utc.with_ymd_and_hms(2026, 4, 18, 12, 0, 0).unwrap(),
            }
        );
        assert_eq!(
            configuration.profile.unwrap(),
            ProfileConfiguration {
                ascent_rate: 5.0,
                burst_altitude: 30000.0,
                sea_level_descent_rate: 6.0,
            }
        );
        assert!(configuration.calculator.is_none());
        assert_eq!(
            configuration.forecast,
            PathConfiguration {
                filename: std::path::PathBuf::from("demos/forecast.json")
            }
        );
        assert_eq!(
            configuration.output.unwrap(),
            PathConfiguration {
                filename: std::path::PathBuf::from("front_range_flight.geojson")
            }
        );
        assert!(configuration.track.is_none());
    }

    #[test]
    fn test_simulated_configuration() {
        let path = format!("{:}/{:}", env!("CARGO_MANIFEST_DIR"), "demos/simulated.yaml");

        let file = std::fs::File::open(path).unwrap();
        let configuration: RunConfiguration = serde_yaml::from_reader(file).unwrap();

        let calculator = configuration.calculator.unwrap();
        assert_eq!(calculator.gas, crate::model::Gas::Helium);
        assert!((calculator.balloon_mass - 1200.0).abs() < 1e-9);

        match configuration.track.unwrap() {
            TrackConfiguration::Simulated(simulation) => {
                assert_eq!(
                    simulation.scenario,
                    crate::prediction::perturb::Scenario::EarlyBurst
                );
                assert_eq!(simulation.seed, 42);
                assert_eq!(simulation.beacon_interval, chrono::Duration::seconds(60));
                assert!((simulation.dropout - 0.05).abs() < 1e-9);
            }
            TrackConfiguration::File { .. } => panic!("expected a simulated track"),
        }

        // analyzer section omitted entirely; defaults apply
        assert_eq!(
            configuration.analyzer.beacon_interval,
            chrono::Duration::seconds(60)
        );
        assert_eq!(configuration.analyzer.missed_beacon_limit, 3);
    }
}
