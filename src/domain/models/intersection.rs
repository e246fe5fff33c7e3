//! Road geometry of a controlled intersection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::phase::Approach;

/// Incoming road of an intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub location: Approach,
    /// Road length in meters.
    pub length: f64,
}

/// Intersection descriptor handed to the state provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub name: String,

    /// Incoming roads keyed by the simulator's road id.
    #[serde(default)]
    pub roads: BTreeMap<String, Road>,
}

impl Intersection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roads: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_road(mut self, road_id: impl Into<String>, location: Approach, length: f64) -> Self {
        self.roads.insert(road_id.into(), Road { location, length });
        self
    }

    /// Length of the road arriving from `approach`; 0 when the geometry
    /// does not describe that arm.
    pub fn approach_length(&self, approach: Approach) -> f64 {
        self.roads
            .values()
            .find(|road| road.location == approach)
            .map_or(0.0, |road| road.length)
    }
}
