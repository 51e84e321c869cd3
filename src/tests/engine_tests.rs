use chrono::NaiveDate;

use super::fixtures::{empty_engine, engine_with, measurements, sample_engine, stations, WAIHEE, WAIKIKI};
use crate::error::QueryError;
use crate::models::Measurement;
use crate::parser::parse_date;

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

#[tokio::test]
async fn test_most_recent_date_bounds_every_measurement() {
    let (_fixture, engine) = sample_engine().await;

    let latest = engine.most_recent_date().await.unwrap();
    assert_eq!(latest, date("2017-08-23"));
    for m in measurements() {
        assert!(latest >= date(&m.date));
    }
}

#[tokio::test]
async fn test_most_recent_date_without_data() {
    let (_fixture, engine) = empty_engine().await;

    let result = engine.most_recent_date().await;
    assert!(matches!(result, Err(QueryError::NoData(_))));
}

#[tokio::test]
async fn test_corrupt_stored_date() {
    let rows = vec![Measurement::new(WAIHEE, "23/08/2017", Some(0.1), 70.0)];
    let (_fixture, engine) = engine_with(&stations(), &rows).await;

    let result = engine.most_recent_date().await;
    assert!(matches!(result, Err(QueryError::CorruptDate(ref s)) if s == "23/08/2017"));
}

#[tokio::test]
async fn test_trailing_window_start() {
    let (_fixture, engine) = sample_engine().await;

    let start = engine.trailing_window_start(None).await.unwrap();
    assert_eq!(start, date("2016-08-23"));

    let explicit = engine.trailing_window_start(Some(date("2016-03-01"))).await.unwrap();
    assert_eq!(explicit, date("2015-03-02"));
}

#[tokio::test]
async fn test_trailing_window_start_without_data() {
    let (_fixture, engine) = empty_engine().await;

    assert!(matches!(
        engine.trailing_window_start(None).await,
        Err(QueryError::NoData(_))
    ));
    // An explicit reference never touches storage.
    assert!(engine.trailing_window_start(Some(date("2017-08-23"))).await.is_ok());
}

#[tokio::test]
async fn test_temperature_summary_inclusive_range() {
    let (_fixture, engine) = sample_engine().await;

    let summary = engine
        .temperature_summary("2017-01-01", Some("2017-01-02"))
        .await
        .unwrap();

    assert_eq!(summary.min, Some(60.0));
    assert_eq!(summary.max, Some(70.0));
    assert_eq!(summary.avg, Some(65.0));
}

#[tokio::test]
async fn test_temperature_summary_defaults_end_to_latest() {
    let (_fixture, engine) = sample_engine().await;

    let summary = engine.temperature_summary("2017-08-22", None).await.unwrap();

    assert_eq!(summary.min, Some(78.0));
    assert_eq!(summary.max, Some(81.0));
    let avg = summary.avg.unwrap();
    assert!((avg - 238.0 / 3.0).abs() < 1e-9);
    assert!(summary.min.unwrap() <= avg && avg <= summary.max.unwrap());
}

#[tokio::test]
async fn test_temperature_summary_no_matching_rows() {
    let (_fixture, engine) = sample_engine().await;

    let summary = engine
        .temperature_summary("2010-01-01", Some("2010-12-31"))
        .await
        .unwrap();
    assert!(summary.is_empty());

    // A reversed range is not an error either.
    let reversed = engine
        .temperature_summary("2017-08-23", Some("2017-01-01"))
        .await
        .unwrap();
    assert!(reversed.is_empty());
}

#[tokio::test]
async fn test_temperature_summary_rejects_malformed_dates() {
    let (_fixture, engine) = sample_engine().await;

    let result = engine.temperature_summary("2017-1-1", None).await;
    assert!(matches!(result, Err(QueryError::InvalidDate(ref s)) if s == "2017-1-1"));

    let result = engine.temperature_summary("2017-01-01", Some("tomorrow")).await;
    assert!(matches!(result, Err(QueryError::InvalidDate(ref s)) if s == "tomorrow"));
}

#[tokio::test]
async fn test_temperature_summary_without_data() {
    let (_fixture, engine) = empty_engine().await;

    let open_ended = engine.temperature_summary("2017-01-01", None).await;
    assert!(matches!(open_ended, Err(QueryError::NoData(_))));

    let bounded = engine
        .temperature_summary("2017-01-01", Some("2017-12-31"))
        .await
        .unwrap();
    assert!(bounded.is_empty());
}

#[tokio::test]
async fn test_most_active_station() {
    let (_fixture, engine) = sample_engine().await;

    assert_eq!(engine.most_active_station().await.unwrap(), WAIHEE);
}

#[tokio::test]
async fn test_most_active_station_without_data() {
    let (_fixture, engine) = empty_engine().await;

    assert!(matches!(
        engine.most_active_station().await,
        Err(QueryError::NoData(_))
    ));
}

#[tokio::test]
async fn test_station_observations_exclusive_bound_newest_first() {
    let (_fixture, engine) = sample_engine().await;

    let observations = engine
        .station_observations(WAIHEE, date("2016-08-23"))
        .await
        .unwrap();

    let dates: Vec<&str> = observations.iter().map(|o| o.date.as_str()).collect();
    assert_eq!(
        dates,
        vec!["2017-08-23", "2017-08-22", "2017-01-02", "2017-01-01", "2016-08-24"]
    );
    assert!(observations.iter().all(|o| o.station == WAIHEE));
    assert_eq!(observations[0].temperature, Some(79.0));
}

#[tokio::test]
async fn test_precipitation_drops_nulls() {
    let rows = vec![
        Measurement::new("S1", "2017-08-22", Some(1.0), 70.0),
        Measurement::new("S1", "2017-08-23", None, 71.0),
        Measurement::new("S2", "2017-08-23", Some(0.5), 72.0),
    ];
    let (_fixture, engine) = engine_with(&[], &rows).await;

    let series = engine.precipitation_since(date("2017-08-21")).await.unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.get("2017-08-22"), Some(&1.0));
    assert_eq!(series.get("2017-08-23"), Some(&0.5));
}

#[tokio::test]
async fn test_precipitation_same_date_keeps_one_reported_value() {
    let rows = vec![
        Measurement::new("S1", "2017-08-23", Some(0.25), 70.0),
        Measurement::new("S2", "2017-08-23", Some(0.75), 72.0),
    ];
    let (_fixture, engine) = engine_with(&[], &rows).await;

    let series = engine.precipitation_since(date("2017-08-01")).await.unwrap();

    assert_eq!(series.len(), 1);
    let value = series["2017-08-23"];
    assert!(value == 0.25 || value == 0.75);
}

#[tokio::test]
async fn test_trailing_precipitation() {
    let (_fixture, engine) = sample_engine().await;

    let series = engine.trailing_precipitation().await.unwrap();

    let dates: Vec<&str> = series.keys().map(String::as_str).collect();
    assert_eq!(
        dates,
        vec!["2016-08-24", "2017-01-01", "2017-01-02", "2017-01-03", "2017-08-22", "2017-08-23"]
    );
    assert_eq!(series["2017-01-01"], 0.4);
    assert_eq!(series["2017-01-02"], 0.0);
    assert_eq!(series["2017-08-23"], 0.5);
}

#[tokio::test]
async fn test_trailing_observations_use_most_active_station() {
    let (_fixture, engine) = sample_engine().await;

    let observations = engine.trailing_observations().await.unwrap();

    assert_eq!(observations.len(), 5);
    assert!(observations.iter().all(|o| o.station == WAIHEE));
    assert!(observations.iter().all(|o| o.date.as_str() > "2016-08-23"));
    assert!(observations.windows(2).all(|w| w[0].date >= w[1].date));
}

#[tokio::test]
async fn test_stations_listing() {
    let (_fixture, engine) = sample_engine().await;

    let listed = engine.stations().await.unwrap();
    assert_eq!(listed, stations());
    assert!(listed.iter().any(|s| s.station == WAIKIKI));
}

#[tokio::test]
async fn test_closed_store_surfaces_storage_error() {
    let (fixture, engine) = sample_engine().await;
    let store = crate::ClimateStore::open_path(&fixture.path).await.unwrap();
    store.close().await;

    let closed = crate::QueryEngine::new(store);
    assert!(matches!(closed.stations().await, Err(QueryError::Storage(_))));

    // Other handles keep working.
    assert!(engine.stations().await.is_ok());
}

#[tokio::test]
async fn test_missing_database_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = crate::ClimateStore::open_path(dir.path().join("missing.sqlite")).await;

    assert!(matches!(result, Err(QueryError::Storage(_))));
    assert!(!dir.path().join("missing.sqlite").exists());
}

#[tokio::test]
async fn test_missing_temperature_stays_null() {
    let mut rows = measurements();
    rows.push(Measurement {
        station: WAIHEE.to_string(),
        date: "2017-08-20".to_string(),
        prcp: Some(0.1),
        tobs: None,
    });
    let (_fixture, engine) = engine_with(&stations(), &rows).await;

    let summary = engine.temperature_summary("2017-08-01", None).await.unwrap();
    assert_eq!(summary.min, Some(78.0));
    assert_eq!(summary.max, Some(81.0));
    assert!((summary.avg.unwrap() - 238.0 / 3.0).abs() < 1e-9);

    let observations = engine.trailing_observations().await.unwrap();
    let missing = observations
        .iter()
        .find(|o| o.date == "2017-08-20")
        .expect("row without a temperature is still listed");
    assert_eq!(missing.station, WAIHEE);
    assert_eq!(missing.temperature, None);
    assert!(observations
        .iter()
        .filter(|o| o.date != "2017-08-20")
        .all(|o| o.temperature.is_some()));
}
