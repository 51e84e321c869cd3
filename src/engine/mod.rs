mod aggregate;

pub use aggregate::summarize;

use arrow::array::Float64Array;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::error::{QueryError, Result};
use crate::models::{Observation, Station, TemperatureSummary};
use crate::parser::{format_date, parse_date, year_before};
use crate::storage::{ClimateStore, Session};

/// Answers the aggregate queries over the climate dataset. Each public call
/// runs in its own storage session, released before the call returns.
#[derive(Clone)]
pub struct QueryEngine {
    store: ClimateStore,
}

impl QueryEngine {
    pub fn new(store: ClimateStore) -> Self {
        Self { store }
    }

    /// Latest observation date across all measurements.
    pub async fn most_recent_date(&self) -> Result<NaiveDate> {
        let mut session = self.store.session().await?;
        most_recent_date(&mut session).await
    }

    /// Start of the trailing window: 365 days before `reference`, or before
    /// the latest observation when no reference is given.
    pub async fn trailing_window_start(&self, reference: Option<NaiveDate>) -> Result<NaiveDate> {
        match reference {
            Some(date) => year_before(date),
            None => {
                let mut session = self.store.session().await?;
                trailing_window_start(&mut session).await
            }
        }
    }

    /// Min, max and mean temperature with `start <= date <= end`, both ends
    /// inclusive. `end` defaults to the latest observation date.
    #[instrument(skip(self))]
    pub async fn temperature_summary(&self, start: &str, end: Option<&str>) -> Result<TemperatureSummary> {
        let start = parse_date(start)?;
        let end = end.map(parse_date).transpose()?;

        let mut session = self.store.session().await?;
        let end = match end {
            Some(end) => end,
            None => most_recent_date(&mut session).await?,
        };

        let temperatures = session
            .temperatures_between(&format_date(start), &format_date(end))
            .await?;
        let summary = summarize(&Float64Array::from(temperatures));
        debug!(?summary, "Computed temperature summary");
        Ok(summary)
    }

    /// Station code with the most measurement rows. Ties go to the first
    /// station in the order storage groups them.
    pub async fn most_active_station(&self) -> Result<String> {
        let mut session = self.store.session().await?;
        most_active_station(&mut session).await
    }

    /// Observations of `station` strictly after `after`, newest first.
    ///
    /// The lower bound is exclusive here while `temperature_summary` treats
    /// its bounds as inclusive; both behaviours are part of the public API.
    pub async fn station_observations(&self, station: &str, after: NaiveDate) -> Result<Vec<Observation>> {
        let mut session = self.store.session().await?;
        session.observations_after(station, &format_date(after)).await
    }

    /// Date to precipitation for all stations strictly after `after`, with no
    /// upper bound. Null amounts are skipped; when several stations report on
    /// the same date the last row visited wins.
    pub async fn precipitation_since(&self, after: NaiveDate) -> Result<BTreeMap<String, f64>> {
        let mut session = self.store.session().await?;
        precipitation_since(&mut session, after).await
    }

    pub async fn stations(&self) -> Result<Vec<Station>> {
        let mut session = self.store.session().await?;
        session.stations().await
    }

    /// Precipitation over the trailing window ending at the latest observation.
    #[instrument(skip(self))]
    pub async fn trailing_precipitation(&self) -> Result<BTreeMap<String, f64>> {
        let mut session = self.store.session().await?;
        let after = trailing_window_start(&mut session).await?;
        precipitation_since(&mut session, after).await
    }

    /// Observations of the most active station over the trailing window.
    #[instrument(skip(self))]
    pub async fn trailing_observations(&self) -> Result<Vec<Observation>> {
        let mut session = self.store.session().await?;
        let after = trailing_window_start(&mut session).await?;
        let station = most_active_station(&mut session).await?;
        debug!(%station, %after, "Resolved most active station");
        session.observations_after(&station, &format_date(after)).await
    }
}

async fn most_recent_date(session: &mut Session) -> Result<NaiveDate> {
    let latest = session
        .latest_date()
        .await?
        .ok_or(QueryError::NoData("the measurement table is empty"))?;

    parse_date(&latest).map_err(|_| QueryError::CorruptDate(latest))
}

async fn trailing_window_start(session: &mut Session) -> Result<NaiveDate> {
    year_before(most_recent_date(session).await?)
}

async fn most_active_station(session: &mut Session) -> Result<String> {
    let activity = session.station_activity().await?;
    pick_most_active(activity).ok_or(QueryError::NoData("no station has any measurements"))
}

async fn precipitation_since(session: &mut Session, after: NaiveDate) -> Result<BTreeMap<String, f64>> {
    let mut series = BTreeMap::new();
    session
        .for_each_precipitation_after(&format_date(after), |date, prcp| {
            if let Some(prcp) = prcp {
                series.insert(date, prcp);
            }
        })
        .await?;
    Ok(series)
}

/// Highest count wins; the first of several equal counts is kept.
fn pick_most_active(activity: Vec<(String, i64)>) -> Option<String> {
    activity
        .into_iter()
        .fold(None, |best: Option<(String, i64)>, (station, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((station, count)),
        })
        .map(|(station, _)| station)
}
