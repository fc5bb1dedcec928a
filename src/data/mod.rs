use crate::map::StateShape;
use crate::stats::{DailyRecord, PopulationRecord};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use geojson::{GeoJson, Value};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

/// CDC daily surveillance export date format
const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Deserialize)]
struct DailyRow {
    submission_date: String,
    state: String,
    new_case: String,
    new_death: String,
}

#[derive(Deserialize)]
struct PopulationRow {
    state: String,
    #[serde(rename = "2020")]
    population: String,
}

/// Load the daily case/death records CSV.
///
/// Expected columns: `submission_date` (MM/DD/YYYY), `state` (postal code),
/// `new_case`, `new_death`. Rows that fail to parse are skipped with a
/// warning rather than aborting the load.
pub fn load_daily_records(path: &Path) -> Result<Vec<DailyRecord>> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening daily records {}", path.display()))?;
    read_daily_records(file)
}

fn read_daily_records<R: Read>(reader: R) -> Result<Vec<DailyRecord>> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (idx, row) in csv.deserialize::<DailyRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                eprintln!("Warning: skipping daily record row {}: {}", idx + 1, e);
                continue;
            }
        };

        let submission_date = match NaiveDate::parse_from_str(&row.submission_date, DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                eprintln!(
                    "Warning: skipping row {} with bad date {:?}: {}",
                    idx + 1,
                    row.submission_date,
                    e
                );
                continue;
            }
        };

        records.push(DailyRecord {
            state: row.state,
            submission_date,
            new_cases: parse_count(&row.new_case),
            new_deaths: parse_count(&row.new_death),
        });
    }

    Ok(records)
}

/// Parse a count cell. The CDC export writes some counts as floats
/// ("1234.0"), and leaves some cells empty.
fn parse_count(s: &str) -> i64 {
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().map(|v| v as i64))
        .unwrap_or(0)
}

/// Load the census population CSV.
///
/// Expected columns: `state` (full name), `2020` (digit string, possibly
/// thousands-separated).
pub fn load_population(path: &Path) -> Result<Vec<PopulationRecord>> {
    let file =
        fs::File::open(path).with_context(|| format!("opening census data {}", path.display()))?;
    read_population(file)
}

fn read_population<R: Read>(reader: R) -> Result<Vec<PopulationRecord>> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (idx, row) in csv.deserialize::<PopulationRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                eprintln!("Warning: skipping census row {}: {}", idx + 1, e);
                continue;
            }
        };

        let digits: String = row.population.chars().filter(|c| *c != ',').collect();
        let population = match digits.trim().parse::<u64>() {
            Ok(p) => p,
            Err(_) => {
                eprintln!(
                    "Warning: skipping census row {} with bad population {:?}",
                    idx + 1,
                    row.population
                );
                continue;
            }
        };

        records.push(PopulationRecord {
            state: row.state,
            population,
        });
    }

    Ok(records)
}

/// Load state outline polygons from a GeoJSON FeatureCollection.
///
/// Each feature needs a `name` (or `NAME`) property and a Polygon or
/// MultiPolygon geometry; only exterior rings are kept.
pub fn load_state_shapes(path: &Path) -> Result<Vec<StateShape>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading state outlines {}", path.display()))?;
    let geojson: GeoJson = content.parse()?;

    let mut shapes = Vec::new();

    if let GeoJson::FeatureCollection(fc) = geojson {
        for feature in fc.features {
            let props = feature.properties.as_ref();
            let name = props
                .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let Some(name) = name else {
                eprintln!("Warning: skipping state feature without a name property");
                continue;
            };

            let Some(geometry) = feature.geometry else {
                continue;
            };

            let mut rings = Vec::new();
            match geometry.value {
                Value::Polygon(polygon) => {
                    if let Some(exterior) = polygon.first() {
                        rings.push(ring_coords(exterior));
                    }
                }
                Value::MultiPolygon(polygons) => {
                    for polygon in &polygons {
                        if let Some(exterior) = polygon.first() {
                            rings.push(ring_coords(exterior));
                        }
                    }
                }
                _ => {
                    eprintln!("Warning: skipping non-polygon geometry for {}", name);
                    continue;
                }
            }

            if !rings.is_empty() {
                shapes.push(StateShape { name, rings });
            }
        }
    }

    Ok(shapes)
}

fn ring_coords(ring: &[Vec<f64>]) -> Vec<(f64, f64)> {
    ring.iter()
        .filter_map(|c| match (c.first(), c.get(1)) {
            (Some(&lon), Some(&lat)) => Some((lon, lat)),
            _ => {
                eprintln!("Warning: skipping position with fewer than 2 coordinates");
                None
            }
        })
        .collect()
}
