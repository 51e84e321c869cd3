use futures::TryStreamExt;
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite,
};
use std::path::Path;
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::error::Result;
use crate::models::{Observation, Station};

/// Read-only handle to the climate database. Cheap to clone; every clone
/// shares the same connection pool.
#[derive(Clone)]
pub struct ClimateStore {
    pool: SqlitePool,
}

impl ClimateStore {
    /// Opens an existing database file read-only. The file is never created.
    pub async fn open(settings: &DatabaseSettings) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&settings.path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await?;

        info!(path = %settings.path.display(), "Opened climate database");
        Ok(Self { pool })
    }

    pub async fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(&DatabaseSettings {
            path: path.as_ref().to_path_buf(),
            ..DatabaseSettings::default()
        })
        .await
    }

    /// Acquires a connection for the duration of one request. The connection
    /// goes back to the pool when the session is dropped, on every exit path.
    pub async fn session(&self) -> Result<Session> {
        let conn = self.pool.acquire().await?;
        Ok(Session { conn })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// A scoped read-only connection with the raw queries the engine runs.
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl Session {
    /// Largest `measurement.date`, or `None` when the table is empty.
    pub async fn latest_date(&mut self) -> Result<Option<String>> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(latest)
    }

    /// Row counts per station, in the order the store groups them.
    pub async fn station_activity(&mut self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT station, COUNT(*) FROM measurement GROUP BY station",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        debug!(stations = rows.len(), "Fetched station activity");
        Ok(rows)
    }

    /// Temperatures with `start <= date <= end`, compared as text.
    pub async fn temperatures_between(&mut self, start: &str, end: &str) -> Result<Vec<Option<f64>>> {
        let rows: Vec<Option<f64>> = sqlx::query_scalar(
            "SELECT tobs FROM measurement WHERE date >= ?1 AND date <= ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self.conn)
        .await?;
        debug!(start, end, rows = rows.len(), "Fetched temperatures");
        Ok(rows)
    }

    /// Observations of one station with `date > after`, newest first.
    pub async fn observations_after(&mut self, station: &str, after: &str) -> Result<Vec<Observation>> {
        let rows: Vec<Observation> = sqlx::query_as(
            "SELECT station, date, tobs FROM measurement \
             WHERE date > ?1 AND station = ?2 \
             ORDER BY date DESC",
        )
        .bind(after)
        .bind(station)
        .fetch_all(&mut *self.conn)
        .await?;
        debug!(station, after, rows = rows.len(), "Fetched observations");
        Ok(rows)
    }

    /// Streams `(date, prcp)` for every station with `date > after`, newest
    /// first, handing each row to `visit` in storage order.
    pub async fn for_each_precipitation_after<F>(&mut self, after: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(String, Option<f64>),
    {
        let mut rows = sqlx::query_as::<_, (String, Option<f64>)>(
            "SELECT date, prcp FROM measurement WHERE date > ?1 ORDER BY date DESC",
        )
        .bind(after)
        .fetch(&mut *self.conn);

        while let Some((date, prcp)) = rows.try_next().await? {
            visit(date, prcp);
        }
        Ok(())
    }

    pub async fn stations(&mut self) -> Result<Vec<Station>> {
        let stations: Vec<Station> = sqlx::query_as(
            "SELECT id, station, name, latitude, longitude, elevation FROM station",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(stations)
    }
}
