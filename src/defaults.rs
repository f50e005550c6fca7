//! Built-in campus used when no snapshot exists yet.
//!
//! Node 0 (the library) is the usual depot.

use tracing::warn;

use crate::graph::Edge;
use crate::registry::Location;
use crate::snapshot::Snapshot;
use crate::traits::NodeId;

/// Static description of a campus location.
#[derive(Debug, Clone, Copy)]
pub struct Site {
    pub id: NodeId,
    pub name: &'static str,
    pub importance: u8,
    pub cleaning_frequency: u32,
    pub visit_priority: u8,
    pub cleanliness: f64,
}

impl Site {
    pub const fn new(
        id: NodeId,
        name: &'static str,
        importance: u8,
        cleaning_frequency: u32,
        visit_priority: u8,
        cleanliness: f64,
    ) -> Self {
        Self {
            id,
            name,
            importance,
            cleaning_frequency,
            visit_priority,
            cleanliness,
        }
    }
}

pub const DEPOT: NodeId = 0;

pub const SITES: &[Site] = &[
    Site::new(0, "Central Library", 9, 2, 8, 90.0),
    Site::new(1, "Main Cafeteria", 10, 1, 10, 70.0),
    Site::new(2, "Science Block", 8, 3, 7, 85.0),
    Site::new(3, "Engineering Workshop", 6, 4, 5, 60.0),
    Site::new(4, "Student Hostel", 7, 2, 9, 75.0),
    Site::new(5, "Sports Complex", 5, 5, 4, 80.0),
    Site::new(6, "Admin Building", 8, 3, 6, 95.0),
    Site::new(7, "Auditorium", 6, 7, 5, 100.0),
    Site::new(8, "Medical Center", 10, 1, 10, 88.0),
];

/// Two-way walkways: (a, b, distance, travel time, difficulty).
pub const WALKWAYS: &[(NodeId, NodeId, f64, f64, f64)] = &[
    (0, 1, 2.0, 3.0, 1.0),
    (0, 2, 4.0, 5.0, 1.2),
    (0, 6, 3.0, 4.0, 1.0),
    (1, 4, 3.0, 4.0, 1.1),
    (1, 2, 1.5, 2.0, 1.0),
    (2, 3, 2.5, 3.0, 1.4),
    (3, 5, 5.0, 7.0, 1.8),
    (4, 5, 4.0, 6.0, 1.3),
    (4, 8, 2.0, 2.5, 1.0),
    (5, 7, 3.5, 5.0, 1.5),
    (6, 7, 2.0, 3.0, 1.0),
    (6, 8, 4.5, 6.0, 1.2),
];

/// The default campus as a snapshot, with every walkway in both directions.
pub fn campus() -> Snapshot {
    let locations = SITES
        .iter()
        .filter_map(|site| {
            Location::new(
                site.id,
                site.name,
                site.importance,
                site.cleaning_frequency,
                site.visit_priority,
                site.cleanliness,
            )
            .map_err(|err| warn!(site = site.name, %err, "invalid built-in site"))
            .ok()
        })
        .collect();

    let edges = WALKWAYS
        .iter()
        .flat_map(|&(a, b, distance, travel_time, difficulty)| {
            let edge = Edge::new(a, b, distance)
                .with_travel_time(travel_time)
                .with_difficulty(difficulty);
            let reverse = edge.reversed();
            [edge, reverse]
        })
        .collect();

    Snapshot::new(locations, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_site_is_valid() {
        assert_eq!(campus().locations.len(), SITES.len());
    }

    #[test]
    fn test_walkways_are_two_way() {
        let (_, graph) = campus().into_parts().unwrap();
        assert_eq!(graph.edge_count(), WALKWAYS.len() * 2);
        for &(a, b, ..) in WALKWAYS {
            assert!(graph.edges_from(a).iter().any(|e| e.to == b));
            assert!(graph.edges_from(b).iter().any(|e| e.to == a));
        }
    }

    #[test]
    fn test_depot_reaches_every_site() {
        use crate::pathfinder::shortest_path;

        let (_, graph) = campus().into_parts().unwrap();
        for site in SITES {
            let path = shortest_path(&graph, DEPOT, site.id, &|e: &Edge| e.distance);
            assert!(path.is_reachable(), "{} unreachable", site.name);
        }
    }
}
