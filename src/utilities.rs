pub fn approx_equal(a: f64, b: f64, decimal_precision: u8) -> bool {
    let p = 10f64.powi(-(decimal_precision as i32));
    (a - b).abs() < p
}

pub mod utc_datetime_string {
    use serde::Deserialize;

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(
        date: &chrono::DateTime<chrono::Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let date = format!("{:}", date.format(FORMAT));
        serializer.serialize_str(&date)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<chrono::DateTime<chrono::Utc>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: String = String::deserialize(deserializer)?;
        Ok(match chrono::NaiveDateTime::parse_from_str(&value, FORMAT) {
            Ok(datetime) => datetime.and_utc(),
            Err(_) => chrono::NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .map_err(serde::de::Error::custom)?
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc(),
        })
    }
}

pub fn duration_string(duration: chrono::Duration) -> String {
    let mut parts = vec![];

    let weeks = duration.num_weeks().abs();
    let days = duration.num_days().abs() % 7;
    let hours = duration.num_hours().abs() % 24;
    let minutes = duration.num_minutes().abs() % 60;
    let seconds = duration.num_seconds().abs() % 60;

    if weeks > 0 {
        parts.push(format!("{:}w", weeks));
    }

    if days > 0 {
        parts.push(format!("{:}d", days));
    }

    if hours > 0 {
        parts.push(format!("{:}h", hours));
    }

    if minutes > 0 {
        parts.push(format!("{:}m", minutes));
    }

    if seconds > 0 {
        parts.push(format!("{:}s", seconds));
    }

    if duration < chrono::Duration::zero() {
        parts.push("ago".to_string());
    }

    parts.join(" ")
}
