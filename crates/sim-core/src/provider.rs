//! Boundary Providers
//!
//! Sources of named boundary polygons. The engine only needs one
//! [`SimBoundary`] per run; where it comes from is behind the
//! [`BoundaryProvider`] trait. Two implementations ship: a registry of
//! hard-coded demo districts and a JSON file loader. A real geospatial
//! dataset reader would be a third implementation living outside this
//! crate.

use geo::{LineString, Polygon};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::boundary::{BoundaryGeometry, InvalidBoundary, SimBoundary};

/// How the caller identifies a boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundarySelection {
    Name(String),
    Index(usize),
}

impl BoundarySelection {
    /// Parses a CLI-style selector: a bare integer selects by index,
    /// anything else by name.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Name(raw.to_string()),
        }
    }
}

/// Failure while resolving a boundary selection.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown boundary '{0}'")]
    UnknownBoundary(String),
    #[error("boundary file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("boundary file parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] InvalidBoundary),
}

/// Supplies one validated boundary given a selection.
pub trait BoundaryProvider {
    /// Names of the available boundaries, in index order.
    fn names(&self) -> Vec<String>;

    /// Resolves a selection to a validated boundary.
    fn load(&self, selection: &BoundarySelection) -> Result<SimBoundary, ProviderError>;
}

/// Hard-coded demo districts.
///
/// `square_district` is convex, `riverbend` is concave, and
/// `ring_district` carries a hole around its centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinBoundaries;

const BUILTIN_NAMES: &[&str] = &["square_district", "riverbend", "ring_district"];

impl BuiltinBoundaries {
    fn polygon(name: &str) -> Option<Polygon<f64>> {
        match name {
            "square_district" => Some(Polygon::new(
                LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
                vec![],
            )),
            "riverbend" => Some(Polygon::new(
                LineString::from(vec![
                    (0.0, 0.0),
                    (2.0, 0.0),
                    (2.0, 1.0),
                    (1.0, 1.0),
                    (1.0, 2.0),
                    (0.0, 2.0),
                ]),
                vec![],
            )),
            "ring_district" => Some(Polygon::new(
                LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
                vec![LineString::from(vec![
                    (1.5, 1.5),
                    (2.5, 1.5),
                    (2.5, 2.5),
                    (1.5, 2.5),
                ])],
            )),
            _ => None,
        }
    }
}

impl BoundaryProvider for BuiltinBoundaries {
    fn names(&self) -> Vec<String> {
        BUILTIN_NAMES.iter().map(|n| n.to_string()).collect()
    }

    fn load(&self, selection: &BoundarySelection) -> Result<SimBoundary, ProviderError> {
        let name = match selection {
            BoundarySelection::Name(name) => name.clone(),
            BoundarySelection::Index(index) => BUILTIN_NAMES
                .get(*index)
                .map(|n| n.to_string())
                .ok_or_else(|| ProviderError::UnknownBoundary(index.to_string()))?,
        };
        let polygon = Self::polygon(&name)
            .ok_or_else(|| ProviderError::UnknownBoundary(name.clone()))?;
        Ok(SimBoundary {
            name,
            geometry: BoundaryGeometry::new(polygon)?,
        })
    }
}

/// On-disk boundary entry: an exterior ring and optional holes, each a
/// list of `[x, y]` pairs.
#[derive(Debug, Clone, Deserialize)]
struct BoundaryEntry {
    name: String,
    exterior: Vec<[f64; 2]>,
    #[serde(default)]
    holes: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Deserialize)]
struct BoundaryFileDoc {
    boundaries: Vec<BoundaryEntry>,
}

/// A named-polygon JSON file.
#[derive(Debug, Clone)]
pub struct BoundaryFile {
    entries: Vec<BoundaryEntry>,
}

impl BoundaryFile {
    /// Loads and parses a boundary file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parses boundary file content.
    pub fn from_json(content: &str) -> Result<Self, ProviderError> {
        let doc: BoundaryFileDoc = serde_json::from_str(content)?;
        Ok(Self {
            entries: doc.boundaries,
        })
    }

    fn entry_to_boundary(entry: &BoundaryEntry) -> Result<SimBoundary, ProviderError> {
        let ring = |points: &Vec<[f64; 2]>| {
            LineString::from(
                points
                    .iter()
                    .map(|p| (p[0], p[1]))
                    .collect::<Vec<(f64, f64)>>(),
            )
        };
        let polygon = Polygon::new(
            ring(&entry.exterior),
            entry.holes.iter().map(ring).collect(),
        );
        Ok(SimBoundary {
            name: entry.name.clone(),
            geometry: BoundaryGeometry::new(polygon)?,
        })
    }
}

impl BoundaryProvider for BoundaryFile {
    fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    fn load(&self, selection: &BoundarySelection) -> Result<SimBoundary, ProviderError> {
        let entry = match selection {
            BoundarySelection::Name(name) => self
                .entries
                .iter()
                .find(|e| &e.name == name)
                .ok_or_else(|| ProviderError::UnknownBoundary(name.clone()))?,
            BoundarySelection::Index(index) => self
                .entries
                .get(*index)
                .ok_or_else(|| ProviderError::UnknownBoundary(index.to_string()))?,
        };
        Self::entry_to_boundary(entry)
    }
}
