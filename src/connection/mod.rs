pub mod file;
pub mod simulated;

// sources of telemetry the binary can replay a flight from; live radio
// and network connections are out of scope, reports arrive normalized
pub enum Connection {
    TrackFile(crate::connection::file::TrackFile),
    Simulated(crate::connection::simulated::SimulatedBeacons),
}

impl Connection {
    pub fn retrieve_positions(
        &mut self,
    ) -> Result<Vec<crate::location::ObservedPosition>, ConnectionError> {
        match self {
            Self::TrackFile(connection) => connection.read_positions_from_geojson(),
            Self::Simulated(connection) => Ok(connection.generate()),
        }
    }
}

custom_error::custom_error! {pub ConnectionError
    FailedToEstablish {connection: String, message: String} = "failed to establish connection to {connection}; {message}",
    ParsingError {message: String} = "{message}",
}
