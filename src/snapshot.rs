//! Plain-text persistence of locations and paths.
//!
//! The file is a pair of comma-separated sections:
//!
//! ```text
//! # Locations
//! id,name,importance,cleaning_frequency,visit_priority,cleanliness,last_cleaned,visit_count
//! # Paths
//! from,to,distance,travel_time,difficulty
//! ```
//!
//! Malformed records are skipped with a warning; the rest of the file still
//! loads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::defaults;
use crate::error::{RegistryError, SnapshotError};
use crate::graph::{Edge, PathGraph};
use crate::registry::{Location, LocationRegistry};
use crate::traits::SnapshotStore;

const LOCATIONS_HEADER: &str = "# Locations";
const PATHS_HEADER: &str = "# Paths";
const LOCATION_FIELDS: usize = 8;
const PATH_FIELDS: usize = 5;

/// Every location and edge of a site at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub locations: Vec<Location>,
    pub edges: Vec<Edge>,
}

impl Snapshot {
    pub fn new(locations: Vec<Location>, edges: Vec<Edge>) -> Self {
        Self { locations, edges }
    }

    /// Copies the current state of a registry and graph.
    pub fn capture(registry: &LocationRegistry, graph: &PathGraph) -> Self {
        Self {
            locations: registry.iter().cloned().collect(),
            edges: graph.edges().cloned().collect(),
        }
    }

    /// Builds the working registry and graph.
    ///
    /// The graph covers at least one node per registered id. Paths touching
    /// an unregistered location are dropped with a warning.
    pub fn into_parts(self) -> Result<(LocationRegistry, PathGraph), RegistryError> {
        let node_count = self
            .locations
            .iter()
            .map(|loc| loc.id() + 1)
            .max()
            .unwrap_or(0);
        let registry = LocationRegistry::from_locations(self.locations)?;

        let mut graph = PathGraph::new(node_count);
        for edge in self.edges {
            let (from, to) = (edge.from, edge.to);
            if registry.get(from).is_none() || registry.get(to).is_none() {
                warn!(from, to, "skipping path to an unregistered location");
                continue;
            }
            if let Err(err) = graph.add_edge(edge) {
                warn!(from, to, %err, "skipping path");
            }
        }

        Ok((registry, graph))
    }

    /// Renders the text format.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        let mut out = String::new();

        out.push_str(LOCATIONS_HEADER);
        out.push('\n');
        for loc in &self.locations {
            if loc.name().contains([',', '\n', '\r']) {
                return Err(SnapshotError::UnencodableName {
                    id: loc.id(),
                    name: loc.name().to_string(),
                });
            }
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                loc.id(),
                loc.name(),
                loc.importance(),
                loc.cleaning_frequency(),
                loc.visit_priority(),
                loc.cleanliness(),
                loc.last_cleaned(),
                loc.visit_count(),
            ));
        }

        out.push_str(PATHS_HEADER);
        out.push('\n');
        for edge in &self.edges {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                edge.from, edge.to, edge.distance, edge.travel_time, edge.difficulty
            ));
        }

        Ok(out)
    }

    /// Parses the text format, skipping records that do not parse.
    pub fn decode(text: &str) -> Self {
        let mut snapshot = Snapshot::default();
        let mut section: Option<&str> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            if line == LOCATIONS_HEADER || line == PATHS_HEADER {
                section = Some(line);
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            let parsed = match section {
                Some(LOCATIONS_HEADER) => parse_location(&fields).and_then(|loc| {
                    if snapshot.locations.iter().any(|known| known.id() == loc.id()) {
                        return Err(format!("duplicate location id {}", loc.id()));
                    }
                    snapshot.locations.push(loc);
                    Ok(())
                }),
                Some(_) => parse_edge(&fields).map(|edge| snapshot.edges.push(edge)),
                None => Err("record outside of a section".to_string()),
            };

            if let Err(reason) = parsed {
                warn!(line = line_no, record = line, %reason, "skipping snapshot record");
            }
        }

        snapshot
    }
}

fn field<T: FromStr>(fields: &[&str], index: usize, name: &str) -> Result<T, String> {
    fields[index]
        .trim()
        .parse()
        .map_err(|_| format!("invalid {}: {:?}", name, fields[index]))
}

fn parse_location(fields: &[&str]) -> Result<Location, String> {
    if fields.len() != LOCATION_FIELDS {
        return Err(format!(
            "expected {} fields, found {}",
            LOCATION_FIELDS,
            fields.len()
        ));
    }

    let id = field(fields, 0, "id")?;
    let importance = field(fields, 2, "importance")?;
    let cleaning_frequency = field(fields, 3, "cleaning_frequency")?;
    let visit_priority = field(fields, 4, "visit_priority")?;
    let cleanliness: f64 = field(fields, 5, "cleanliness")?;
    let last_cleaned = field(fields, 6, "last_cleaned")?;
    let visit_count = field(fields, 7, "visit_count")?;
    if !cleanliness.is_finite() {
        return Err(format!("invalid cleanliness: {:?}", fields[5]));
    }

    Location::new(
        id,
        fields[1],
        importance,
        cleaning_frequency,
        visit_priority,
        cleanliness,
    )
    .map(|loc| loc.with_history(last_cleaned, visit_count))
    .map_err(|err| err.to_string())
}

fn parse_edge(fields: &[&str]) -> Result<Edge, String> {
    if fields.len() != PATH_FIELDS {
        return Err(format!(
            "expected {} fields, found {}",
            PATH_FIELDS,
            fields.len()
        ));
    }

    let edge = Edge::new(
        field(fields, 0, "from")?,
        field(fields, 1, "to")?,
        field(fields, 2, "distance")?,
    )
    .with_travel_time(field(fields, 3, "travel_time")?)
    .with_difficulty(field(fields, 4, "difficulty")?);

    edge.validate().map_err(|err| err.to_string())?;
    Ok(edge)
}

/// Snapshot kept in a single text file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, SnapshotError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(Snapshot::decode(&text))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let text = snapshot.encode()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, text).map_err(|err| self.io_error(err))?;
        fs::rename(&tmp_path, &self.path).map_err(|err| self.io_error(err))
    }
}

/// Loads the working snapshot, then the canonical dataset, then the
/// built-in campus, whichever exists first.
pub fn load_or_default<W, C>(working: &W, canonical: &C) -> Result<Snapshot, SnapshotError>
where
    W: SnapshotStore + ?Sized,
    C: SnapshotStore + ?Sized,
{
    if let Some(snapshot) = working.load()? {
        return Ok(snapshot);
    }
    if let Some(snapshot) = canonical.load()? {
        info!("no working snapshot found, starting from the canonical dataset");
        return Ok(snapshot);
    }
    info!("no snapshot or canonical dataset found, starting from the default campus");
    Ok(defaults::campus())
}
