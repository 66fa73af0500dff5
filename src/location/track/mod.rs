use geo::HaversineDistance;

pub struct FlightTrack {
    pub positions: Vec<crate::location::ObservedPosition>,
    pub name: String,
}

impl FlightTrack {
    pub fn new(name: String) -> Self {
        Self {
            positions: vec![],
            name,
        }
    }

    pub fn push(&mut self, position: crate::location::ObservedPosition) {
        let needs_sorting = match self.positions.last() {
            Some(current) => current.time > position.time,
            None => false,
        };
        self.positions.push(position);
        if needs_sorting {
            self.positions.sort_by_key(|position| position.time);
        }
    }

    pub fn contains(&self, position: &crate::location::ObservedPosition) -> bool {
        for existing_position in &self.positions {
            if position.eq(existing_position) {
                return true;
            }
        }
        false
    }

    pub fn intervals(&self) -> Vec<chrono::Duration> {
        let mut values = vec![];

        for index in 0..self.positions.len().saturating_sub(1) {
            let current = &self.positions[index];
            let next = &self.positions[index + 1];
            values.push(next.time - current.time);
        }

        values
    }

    // consecutive (time, altitude) pairs; reports without an altitude are
    // skipped rather than read as zero
    fn altitude_series(&self) -> Vec<(chrono::DateTime<chrono::Utc>, f64)> {
        let mut values = vec![];
        for position in &self.positions {
            if let Some(altitude) = position.altitude {
                values.push((position.time, altitude));
            }
        }
        values
    }

    pub fn climbs(&self) -> Vec<f64> {
        let series = self.altitude_series();
        let mut values = vec![];

        for index in 0..series.len().saturating_sub(1) {
            values.push(series[index + 1].1 - series[index].1);
        }

        values
    }

    pub fn climb_rates(&self) -> Vec<f64> {
        let series = self.altitude_series();
        let mut values = vec![];

        for index in 0..series.len().saturating_sub(1) {
            let seconds = (series[index + 1].0 - series[index].0).num_seconds() as f64;
            if seconds > 0.0 {
                values.push((series[index + 1].1 - series[index].1) / seconds);
            }
        }

        values
    }

    pub fn overground_distances(&self) -> Vec<f64> {
        let mut values = vec![];

        for index in 0..self.positions.len().saturating_sub(1) {
            let current = &self.positions[index];
            let next = &self.positions[index + 1];
            values.push(current.location.haversine_distance(&next.location));
        }

        values
    }

    pub fn ground_speeds(&self) -> Vec<f64> {
        let mut values = vec![];
        let intervals = self.intervals();

        for (index, distance) in self.overground_distances().iter().enumerate() {
            let seconds = intervals[index].num_seconds() as f64;
            if seconds > 0.0 {
                values.push(distance / seconds);
            }
        }

        values
    }

    pub fn ascending(&self) -> bool {
        let climb_rates = self.climb_rates();
        !climb_rates.is_empty() && climb_rates.iter().rev().take(2).all(|rate| rate > &0.2)
    }

    pub fn descending(&self) -> bool {
        let climb_rates = self.climb_rates();
        !climb_rates.is_empty() && climb_rates.iter().rev().take(2).all(|rate| rate < &-0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn position(
        seconds: i64,
        longitude: f64,
        latitude: f64,
        altitude: Option<f64>,
    ) -> crate::location::ObservedPosition {
        crate::location::ObservedPosition::new(
            chrono::Utc.with_ymd_and_hms(2026, 4, 18, 12, 0, 0).unwrap()
                + chrono::Duration::seconds(seconds),
            geo::point!(x: longitude, y: latitude),
            altitude,
        )
    }

    #[test]
    fn test_push_sorts_out_of_order_reports() {
        let mut track = FlightTrack::new(String::from("test"));
        track.push(position(120, -105.0, 40.0, Some(2200.0)));
        track.push(position(0, -105.0, 40.0, Some(1600.0)));
        track.push(position(60, -105.0, 40.0, Some(1900.0)));

        let times: Vec<_> = track.positions.iter().map(|p| p.time).collect();
        let mut sorted = times.to_owned();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn test_climb_rates_skip_missing_altitudes() {
        let mut track = FlightTrack::new(String::from("test"));
        track.push(position(0, -105.0, 40.0, Some(1600.0)));
        track.push(position(60, -105.0, 40.0, None));
        track.push(position(120, -105.0, 40.0, Some(2200.0)));

        let rates = track.climb_rates();
        assert_eq!(rates.len(), 1);
        assert!((rates[0] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_ascending_and_descending() {
        let mut track = FlightTrack::new(String::from("test"));
        track.push(position(0, -105.0, 40.0, Some(1600.0)));
        track.push(position(60, -105.0, 40.0, Some(1900.0)));
        track.push(position(120, -105.0, 40.0, Some(2200.0)));
        assert!(track.ascending());
        assert!(!track.descending());

        let mut track = FlightTrack::new(String::from("test"));
        track.push(position(0, -105.0, 40.0, Some(30000.0)));
        track.push(position(60, -105.0, 40.0, Some(29500.0)));
        track.push(position(120, -105.0, 40.0, Some(29000.0)));
        assert!(track.descending());
        assert!(!track.ascending());
    }

    #[test]
    fn test_ground_speeds() {
        let mut track = FlightTrack::new(String::from("test"));
        track.push(position(0, -105.0, 40.0, Some(1600.0)));
        track.push(position(100, -105.0, 40.01, Some(2100.0)));

        let speeds = track.ground_speeds();
        assert_eq!(speeds.len(), 1);
        // ~1.11 km of latitude over 100 s
        assert!(speeds[0] > 10.0 && speeds[0] < 12.5);
    }
}
