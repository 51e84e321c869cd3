use serde::Serialize;

/// One row of the `station` table.
///
/// Column mapping: `id`, `station`, `name`, `latitude`, `longitude`,
/// `elevation`. Serialized with the keys the public API has always used.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Station {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Elevation")]
    pub elevation: f64,
}

/// One daily row of the `measurement` table.
///
/// Column mapping: `station` (references `station.station`), `date` as
/// `YYYY-MM-DD` text, `prcp` and `tobs` both nullable.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Measurement {
    pub station: String,
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: Option<f64>,
}

#[cfg(test)]
impl Measurement {
    pub fn new(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> Self {
        Self {
            station: station.to_string(),
            date: date.to_string(),
            prcp,
            tobs: Some(tobs),
        }
    }
}

/// A temperature observation of a single station on a single day. A missing
/// reading stays `None` and is served as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Observation {
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature")]
    #[sqlx(rename = "tobs")]
    pub temperature: Option<f64>,
}

/// Min, max and mean observed temperature over a date range. All three are
/// `None` when no measurement falls inside the range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TemperatureSummary {
    #[serde(rename = "Temperature MIN")]
    pub min: Option<f64>,
    #[serde(rename = "Temperature MAX")]
    pub max: Option<f64>,
    #[serde(rename = "Temperature AVG")]
    pub avg: Option<f64>,
}

#[cfg(test)]
impl TemperatureSummary {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.avg.is_none()
    }
}
