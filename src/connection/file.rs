use chrono::TimeZone;

#[derive(serde::Deserialize, Debug)]
pub struct TrackFile {
    pub path: std::path::PathBuf,
}

impl TrackFile {
    pub fn new(path: std::path::PathBuf) -> Result<Self, crate::connection::ConnectionError> {
        if path.exists() {
            Ok(Self { path })
        } else {
            Err(crate::connection::ConnectionError::FailedToEstablish {
                connection: path.to_string_lossy().to_string(),
                message: "path does not exist".to_string(),
            })
        }
    }

    pub fn read_positions_from_geojson(
        &self,
    ) -> Result<Vec<crate::location::ObservedPosition>, crate::connection::ConnectionError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|error| {
            crate::connection::ConnectionError::FailedToEstablish {
                connection: self.path.to_string_lossy().to_string(),
                message: error.to_string(),
            }
        })?;
        let parsed = contents.parse::<geojson::GeoJson>().map_err(|error| {
            crate::connection::ConnectionError::ParsingError {
                message: error.to_string(),
            }
        })?;

        let mut positions: Vec<crate::location::ObservedPosition> = vec![];
        if let geojson::GeoJson::FeatureCollection(ref collection) = parsed {
            for feature in &collection.features {
                if let Some(ref geometry) = feature.geometry {
                    if let geojson::Value::Point(point) = &geometry.value {
                        let properties = match feature.properties.as_ref() {
                            Some(properties) => properties,
                            None => continue,
                        };

                        let time = match properties.get("time") {
                            Some(serde_json::Value::String(time)) => {
                                match chrono::DateTime::parse_from_rfc3339(time.as_ref()) {
                                    Ok(time) => time.with_timezone(&chrono::Utc),
                                    Err(_) => continue,
                                }
                            }
                            Some(serde_json::Value::Number(time)) => {
                                match time
                                    .as_i64()
                                    .and_then(|seconds| chrono::Utc.timestamp_opt(seconds, 0).single())
                                {
                                    Some(time) => time,
                                    None => continue,
                                }
                            }
                            _ => continue,
                        };

                        let altitude = if point.len() > 2 {
                            Some(point[2])
                        } else {
                            None
                        };

                        let mut position = crate::location::ObservedPosition::new(
                            time,
                            geo::point!(x: point[0], y: point[1]),
                            altitude,
                        );
                        if let Some(serde_json::Value::Number(value)) =
                            properties.get("ground_speed")
                        {
                            position.ground_speed = value.as_f64();
                        }
                        if let Some(serde_json::Value::Number(value)) = properties.get("course") {
                            position.course = value.as_f64();
                        }

                        positions.push(position);
                    }
                }
            }
        }

        Ok(positions)
    }
}

pub fn path_feature_collection(
    prediction: &crate::prediction::simulate::PredictionResult,
) -> geojson::FeatureCollection {
    let mut features = vec![];
    for point in &prediction.path {
        let mut properties = geojson::JsonObject::new();
        properties.insert(
            "time".to_string(),
            serde_json::Value::String(prediction.time_of(point).to_rfc3339()),
        );
        properties.insert(
            "elapsed".to_string(),
            serde_json::json!(point.elapsed.num_seconds()),
        );

        features.push(geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                point.location.x(),
                point.location.y(),
                point.altitude,
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
