use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;
use crate::types::{LatLon, PropertyId};

/// Construction class of an insured property.
///
/// Unrecognised or absent classes become `Other(1.0)` — the "portfolio
/// average" fallback — at the ingestion boundary, so the multiplier in use
/// is always visible in the type rather than hidden in a lookup default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Construction {
    Wood,
    Brick,
    Concrete,
    /// Fallback class carrying its multiplier explicitly.
    Other(f64),
}

impl Construction {
    /// Map a free-text label to a class, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "wood" => Construction::Wood,
            "brick" => Construction::Brick,
            "concrete" => Construction::Concrete,
            _ => Construction::Other(1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    /// Insured value in currency units. Zero is allowed; negative is not.
    pub insured_value: f64,
    pub construction: Construction,
    pub location: LatLon,
}

/// An immutable, ordered collection of properties.
///
/// Validated once at construction; the simulation only ever reads it, so a
/// single instance can be shared across all worker threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    properties: Vec<Property>,
}

impl Portfolio {
    /// Validate and seal a property list. Rejects the whole collection on
    /// the first bad record — the engine never partially runs on bad data.
    pub fn new(properties: Vec<Property>) -> Result<Self, PortfolioError> {
        if properties.is_empty() {
            return Err(PortfolioError::Empty);
        }
        for (row, p) in properties.iter().enumerate() {
            if !p.insured_value.is_finite() || p.insured_value < 0.0 {
                return Err(PortfolioError::Row {
                    row,
                    reason: format!("insured_value {} must be a non-negative number", p.insured_value),
                });
            }
            if !p.location.in_range() {
                return Err(PortfolioError::Row {
                    row,
                    reason: format!(
                        "coordinates ({}, {}) outside valid lat/lon range",
                        p.location.lat, p.location.lon
                    ),
                });
            }
        }
        Ok(Portfolio { properties })
    }

    /// Load from CSV. Required columns: `insured_value`, `lat`, `lon`.
    /// Optional: `name` (alias `city`), `construction_type`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, PortfolioError> {
        let mut rdr = csv::Reader::from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in ["insured_value", "lat", "lon"] {
            if !headers.iter().any(|h| h == required) {
                return Err(PortfolioError::MissingColumn(required));
            }
        }

        let mut properties = Vec::new();
        for (row, record) in rdr.deserialize::<CsvRow>().enumerate() {
            let raw = record.map_err(|e| PortfolioError::Row { row, reason: e.to_string() })?;
            let construction = raw
                .construction_type
                .as_deref()
                .map(Construction::from_label)
                .unwrap_or(Construction::Other(1.0));
            properties.push(Property {
                id: PropertyId(row as u64),
                name: raw.name.unwrap_or_else(|| format!("property-{row}")),
                insured_value: raw.insured_value,
                construction,
                location: LatLon::new(raw.lat, raw.lon),
            });
        }

        Portfolio::new(properties)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, PortfolioError> {
        let file = std::fs::File::open(path)?;
        Portfolio::from_csv_reader(file)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn total_insured_value(&self) -> f64 {
        self.properties.iter().map(|p| p.insured_value).sum()
    }
}

/// Raw CSV row, loosely typed on purpose: the conversion to [Property] is
/// where the boundary validation happens.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "city")]
    name: Option<String>,
    insured_value: f64,
    construction_type: Option<String>,
    lat: f64,
    lon: f64,
}
