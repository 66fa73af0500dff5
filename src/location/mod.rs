pub mod track;

#[derive(Clone, Debug)]
pub struct ObservedPosition {
    pub time: chrono::DateTime<chrono::Utc>,
    pub location: geo::Point,
    pub altitude: Option<f64>,
    pub ground_speed: Option<f64>,
    pub course: Option<f64>,
}

impl ObservedPosition {
    pub fn new(
        time: chrono::DateTime<chrono::Utc>,
        location: geo::Point,
        altitude: Option<f64>,
    ) -> Self {
        Self {
            time,
            location,
            altitude,
            ground_speed: None,
            course: None,
        }
    }
}

impl PartialEq for ObservedPosition {
    fn eq(&self, other: &Self) -> bool {
        self.time.eq(&other.time)
            && crate::utilities::approx_equal(self.location.x(), other.location.x(), 4)
            && crate::utilities::approx_equal(self.location.y(), other.location.y(), 4)
            && match self.altitude {
                Some(altitude) => match other.altitude {
                    Some(other_altitude) => {
                        crate::utilities::approx_equal(altitude, other_altitude, 4)
                    }
                    None => false,
                },
                None => other.altitude.is_none(),
            }
    }
}

impl Eq for ObservedPosition {}

impl ObservedPosition {
    // the same report seen again under a different timestamp
    pub fn time_lag_of(&self, other: &Self) -> bool {
        self.time.ne(&other.time)
            && crate::utilities::approx_equal(self.location.x(), other.location.x(), 4)
            && crate::utilities::approx_equal(self.location.y(), other.location.y(), 4)
            && match self.altitude {
                Some(altitude) => match other.altitude {
                    Some(other_altitude) => {
                        crate::utilities::approx_equal(altitude, other_altitude, 4)
                    }
                    None => false,
                },
                None => false,
            }
    }
}
