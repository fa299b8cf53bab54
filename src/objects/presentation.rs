//! presentation.rs
//!
//! Render-derived geometry, kept out of the core body records. Every frame
//! the draw pass writes each body's projected disk in here; canvas clicks
//! read it back for hit-testing. Entries only exist for bodies that have
//! actually been drawn.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::objects::planets::{PlanetId, PlanetRegistry};

/// A body's disk as it was last drawn: center in world units (which equal
/// logical pixels under the default 2D camera) and the drawn radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenDisk {
    pub center: Vec2,
    pub radius: f32,
}

impl ScreenDisk {
    /// Tolerance ring around the visual disk that still counts as a hit.
    pub const HIT_MARGIN: f32 = 4.0;

    pub fn contains(&self, point: Vec2) -> bool {
        let reach = self.radius + ScreenDisk::HIT_MARGIN;
        (point - self.center).length_squared() <= reach * reach
    }
}

/// Last-known screen geometry per body id.
#[derive(Resource, Debug, Default)]
pub struct ScreenPositions {
    map: HashMap<PlanetId, ScreenDisk>,
}

impl ScreenPositions {
    pub fn new() -> Self {
        ScreenPositions::default()
    }

    pub fn record(&mut self, id: PlanetId, disk: ScreenDisk) {
        self.map.insert(id, disk);
    }

    pub fn get(&self, id: PlanetId) -> Option<ScreenDisk> {
        self.map.get(&id).copied()
    }

    /// Drops entries whose body no longer exists.
    pub fn prune(&mut self, live: impl Fn(PlanetId) -> bool) {
        self.map.retain(|id, _| live(*id));
    }
}

/// Finds the topmost body under `point`: bodies are scanned in reverse
/// registry order (later additions draw on top), the first cached disk
/// containing the point wins, and bodies that have never been drawn are
/// skipped. Returns at most one id.
pub fn hit_test(
    registry: &PlanetRegistry,
    screen: &ScreenPositions,
    point: Vec2,
) -> Option<PlanetId> {
    for planet in registry.list().iter().rev() {
        let Some(disk) = screen.get(planet.id()) else {
            continue;
        };
        if disk.contains(point) {
            return Some(planet.id());
        }
    }
    None
}
