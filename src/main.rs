use clap::Parser;

lazy_static::lazy_static! {
    pub static ref LOG_LEVEL: log::Level = log::Level::Info;
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    // configuration file to read
    configuration_filename: std::path::PathBuf,

    // also print per-step derivation and integration messages
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let arguments = Cli::parse();

    let configuration_file = std::fs::File::open(arguments.configuration_filename)?;
    let configuration: driftcast::configuration::RunConfiguration =
        serde_yaml::from_reader(configuration_file).expect("error reading configuration");

    let log_level = if arguments.verbose {
        log::Level::Debug
    } else {
        *LOG_LEVEL
    };

    run(&configuration, log_level)
}

fn run(
    configuration: &driftcast::configuration::RunConfiguration,
    log_level: log::Level,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut messages = Vec::<(chrono::DateTime<chrono::Utc>, String, log::Level)>::new();

    let forecast_file = std::fs::File::open(&configuration.forecast.filename)?;
    let forecast: driftcast::forecast::WindForecast = serde_json::from_reader(forecast_file)?;
    messages.push((
        chrono::Utc::now(),
        format!(
            "read {:} forecast instants from {:}",
            forecast.instants.len(),
            configuration.forecast.filename.to_string_lossy()
        ),
        log::Level::Debug,
    ));

    let launch_altitude = if configuration.launch.location.len() > 2 {
        configuration.launch.location[2]
    } else {
        0.0
    };

    let profile = match &configuration.calculator {
        Some(calculator) => {
            match driftcast::calculate_balloon_performance(calculator, launch_altitude) {
                Some(breakdown) => {
                    for step in &breakdown.steps {
                        messages.push((
                            chrono::Utc::now(),
                            format!(
                                "{:}: {:} = {:} = {:.3} {:}",
                                step.name, step.formula, step.substitution, step.value, step.unit
                            ),
                            log::Level::Debug,
                        ));
                    }
                    messages.push((
                        chrono::Utc::now(),
                        format!(
                            "{:.0} g balloon filled with {:}: ascent rate {:.2} m/s, burst altitude {:.0} m",
                            calculator.balloon_mass,
                            calculator.gas.name(),
                            breakdown.ascent_rate,
                            breakdown.burst_altitude,
                        ),
                        log::Level::Info,
                    ));

                    let sea_level_descent_rate = match &configuration.profile {
                        Some(profile) => profile.sea_level_descent_rate,
                        None => 6.0,
                    };
                    driftcast::prediction::FlightProfile::new(
                        breakdown.ascent_rate,
                        breakdown.burst_altitude,
                        sea_level_descent_rate,
                    )
                }
                None => {
                    return Err("balloon performance calculation failed; check masses and neck lift"
                        .into());
                }
            }
        }
        None => match &configuration.profile {
            Some(profile) => profile.to_flight_profile(),
            None => {
                return Err(
                    "configuration needs either a flight profile or calculator parameters".into(),
                );
            }
        },
    };

    let parameters = configuration.launch.to_launch_parameters(profile);
    if !parameters.is_valid() {
        return Err(
            "invalid launch parameters; rates must be positive and burst altitude above the launch site"
                .into(),
        );
    }

    let prediction = driftcast::run_simulation(&parameters, &forecast);

    let burst = prediction.burst_point();
    messages.push((
        chrono::Utc::now(),
        format!(
            "{:} - predicted burst: ({:.2}, {:.2}) at {:.0} m after {:}",
            configuration.name,
            burst.location.x(),
            burst.location.y(),
            burst.altitude,
            driftcast::utilities::duration_string(burst.elapsed),
        ),
        log::Level::Info,
    ));
    let landing = prediction.landing_point();
    messages.push((
        chrono::Utc::now(),
        format!(
            "{:} - predicted landing location: ({:.2}, {:.2}) at {:} ({:} after launch); {:.2} km traveled",
            configuration.name,
            landing.location.x(),
            landing.location.y(),
            prediction
                .time_of(landing)
                .format(&driftcast::DATETIME_FORMAT),
            driftcast::utilities::duration_string(landing.elapsed),
            prediction.distance_traveled / 1000.0,
        ),
        log::Level::Info,
    ));

    if let Some(output) = &configuration.output {
        let feature_collection = driftcast::connection::file::path_feature_collection(&prediction);
        match std::fs::write(&output.filename, feature_collection.to_string()) {
            Ok(_) => messages.push((
                chrono::Utc::now(),
                format!(
                    "wrote prediction to {:}",
                    output.filename.to_string_lossy()
                ),
                log::Level::Debug,
            )),
            Err(error) => messages.push((
                chrono::Utc::now(),
                error.to_string(),
                log::Level::Error,
            )),
        };
    }

    if let Some(track) = &configuration.track {
        let mut connection = match track {
            driftcast::configuration::TrackConfiguration::File { filename } => {
                driftcast::connection::Connection::TrackFile(
                    driftcast::connection::file::TrackFile::new(filename.to_owned())?,
                )
            }
            driftcast::configuration::TrackConfiguration::Simulated(simulation) => {
                messages.push((
                    chrono::Utc::now(),
                    format!(
                        "simulating a {:} flight with seed {:}",
                        simulation.scenario.name(),
                        simulation.seed
                    ),
                    log::Level::Debug,
                ));
                driftcast::connection::Connection::Simulated(
                    driftcast::connection::simulated::SimulatedBeacons::new(
                        prediction.to_owned(),
                        simulation.scenario,
                        simulation.seed,
                        simulation.beacon_interval,
                        simulation.dropout,
                    ),
                )
            }
        };

        let positions = connection.retrieve_positions()?;

        let mut track =
            driftcast::location::track::FlightTrack::new(configuration.name.to_owned());
        let mut duplicates: usize = 0;
        for position in &positions {
            if track.contains(position)
                || track
                    .positions
                    .iter()
                    .any(|existing| position.time_lag_of(existing))
            {
                duplicates += 1;
                continue;
            }
            track.push(position.to_owned());
        }
        messages.push((
            chrono::Utc::now(),
            format!(
                "received {:} position reports ({:} duplicates skipped)",
                track.positions.len(),
                duplicates
            ),
            log::Level::Debug,
        ));
        if track.positions.len() > 1 {
            messages.push((chrono::Utc::now(), track_update(&track), log::Level::Info));
        }

        let mut session =
            driftcast::analysis::FlightSession::new(configuration.analyzer.to_owned());
        let now = match track.positions.last() {
            Some(position) => position.time,
            None => parameters.launch_time,
        };
        if let Some(comparison) =
            session.update(&track.positions, &prediction, &parameters, &forecast, now)
        {
            messages.push((
                chrono::Utc::now(),
                format!(
                    "{:} - {:} ({:.0}% confidence) - {:.2} km from the predicted path",
                    configuration.name,
                    comparison.phase.name(),
                    comparison.confidence * 100.0,
                    comparison.deviation / 1000.0,
                ),
                log::Level::Info,
            ));
            if let Some(ascent_rate) = comparison.ascent_rate {
                messages.push((
                    chrono::Utc::now(),
                    format!("measured ascent rate: {:.2} m/s", ascent_rate),
                    log::Level::Info,
                ));
            }
            if let Some(descent_rate) = comparison.descent_rate {
                messages.push((
                    chrono::Utc::now(),
                    format!("measured descent rate: {:.2} m/s", descent_rate),
                    log::Level::Info,
                ));
            }
            if comparison.assumed_landed {
                messages.push((
                    chrono::Utc::now(),
                    format!(
                        "no beacons for {:}; assuming landed",
                        driftcast::utilities::duration_string(
                            now - track.positions.last().unwrap().time
                                + configuration.analyzer.beacon_interval
                                    * configuration.analyzer.missed_beacon_limit
                        ),
                    ),
                    log::Level::Info,
                ));
            }

            let updated_landing = comparison.updated_prediction.landing_point();
            messages.push((
                chrono::Utc::now(),
                format!(
                    "updated landing location: ({:.2}, {:.2}) at {:}",
                    updated_landing.location.x(),
                    updated_landing.location.y(),
                    comparison
                        .updated_prediction
                        .time_of(updated_landing)
                        .format(&driftcast::DATETIME_FORMAT),
                ),
                log::Level::Info,
            ));
            messages.push((
                chrono::Utc::now(),
                format!(
                    "accuracy - trajectory {:.2}, altitude {:.2}, timing {:.2}, overall {:.2}",
                    comparison.accuracy.trajectory,
                    comparison.accuracy.altitude,
                    comparison.accuracy.timing,
                    comparison.accuracy.overall,
                ),
                log::Level::Info,
            ));
        }
    }

    for (time, message, level) in &messages {
        if *level <= log_level {
            println!(
                "{:} [{:>5}] {:}",
                time.format(&driftcast::DATETIME_FORMAT),
                level,
                message
            );
        }
    }

    Ok(())
}

fn track_update(track: &driftcast::location::track::FlightTrack) -> String {
    let last_position = track.positions.last().unwrap();

    let mut message = format!(
        "{: <8} - {:} reports - current location: ({:.2}, {:.2})",
        track.name,
        track.positions.len(),
        last_position.location.x(),
        last_position.location.y(),
    );
    if let Some(altitude) = last_position.altitude {
        message += &format!(" at {:.2} m", altitude);
    }

    let intervals = track.intervals();
    let climbs = track.climbs();
    let climb_rates = track.climb_rates();
    let ground_speeds = track.ground_speeds();

    let mut positive_climb_rates = vec![];
    let mut negative_climb_rates = vec![];
    for climb_rate in climb_rates {
        if climb_rate > 0.0 {
            positive_climb_rates.push(climb_rate);
        } else {
            negative_climb_rates.push(climb_rate);
        }
    }
    if !positive_climb_rates.is_empty() {
        message += &format!(
            " - avg. ascent rate: {:.2} m/s",
            positive_climb_rates.iter().sum::<f64>() / positive_climb_rates.len() as f64,
        );
    }
    if !negative_climb_rates.is_empty() {
        message += &format!(
            " - avg. descent rate: {:.2} m/s",
            -negative_climb_rates.iter().sum::<f64>() / negative_climb_rates.len() as f64,
        );
    }
    if !ground_speeds.is_empty() {
        message += &format!(
            " - avg. ground speed: {:.2} m/s",
            ground_speeds.iter().sum::<f64>() / ground_speeds.len() as f64,
        );
    }
    if let Some(climb) = climbs.last() {
        message += &format!(" - {:.2} m vertically since the previous report", climb);
    }
    if !intervals.is_empty() {
        let mut total_interval = chrono::Duration::zero();
        for interval in &intervals {
            total_interval = total_interval + interval.to_owned();
        }
        message += &format!(
            " - avg. report interval: {:.2} s",
            total_interval.num_seconds() as f64 / intervals.len() as f64,
        );
    }

    message
}
