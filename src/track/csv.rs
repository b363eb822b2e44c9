use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;

use crate::track::{RidePoint, RideTrack};

/// Structured errors from track parsing
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("could not find column with names: {0:?}")]
    MissingColumn(&'static [&'static str]),

    #[error("row {row}: invalid {field} value: {value:?}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Load a recorded ride from a CSV file
///
/// Supports flexible column naming:
/// - time,lat,lon,elevation,speed
/// - timestamp,latitude,longitude,altitude,velocity
///
/// Timestamps are relative seconds from the start of the ride. Elevation
/// and speed columns are optional and default to 0.
pub fn load_track(path: &str) -> Result<RideTrack> {
    let file_path = Path::new(path);
    let mut rdr = csv::Reader::from_path(file_path)
        .with_context(|| format!("Failed to open track file: {}", path))?;

    let headers = rdr.headers()?;
    let columns = detect_columns(headers)?;

    let mut points = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result.context("Failed to read CSV row")?;
        // 1-based data row, after the header line
        let row = i + 2;

        points.push(RidePoint {
            time: parse_field(&record, columns.time, "time", row)?,
            lat: parse_field(&record, columns.lat, "lat", row)?,
            lon: parse_field(&record, columns.lon, "lon", row)?,
            elevation: match columns.elevation {
                Some(idx) => parse_field(&record, idx, "elevation", row)?,
                None => 0.0,
            },
            speed: match columns.speed {
                Some(idx) => parse_field(&record, idx, "speed", row)?,
                None => 0.0,
            },
        });
    }

    Ok(RideTrack::new(points))
}

struct Columns {
    time: usize,
    lat: usize,
    lon: usize,
    elevation: Option<usize>,
    speed: Option<usize>,
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> Result<Columns> {
    Ok(Columns {
        time: find_column(headers, &["time", "timestamp", "t", "ts"])?,
        lat: find_column(headers, &["lat", "latitude"])?,
        lon: find_column(headers, &["lon", "lng", "longitude"])?,
        elevation: find_column(headers, &["elevation", "ele", "alt", "altitude"]).ok(),
        speed: find_column(headers, &["speed", "velocity", "v"]).ok(),
    })
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &'static [&'static str]) -> Result<usize> {
    for (idx, header) in headers.iter().enumerate() {
        let header_lower = header.to_lowercase();
        if names.iter().any(|&name| header_lower == name) {
            return Ok(idx);
        }
    }

    Err(TrackError::MissingColumn(names).into())
}

fn parse_field(
    record: &csv::StringRecord,
    idx: usize,
    field: &'static str,
    row: usize,
) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("");
    raw.trim().parse::<f64>().map_err(|_| {
        TrackError::InvalidField {
            row,
            field,
            value: raw.to_string(),
        }
        .into()
    })
}
