use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU32, Ordering::SeqCst};

static PLANETCOUNT: AtomicU32 = AtomicU32::new(0);

/// Opaque identifier for an orbiting body. Unique across every body ever
/// created in the process, never reused.
#[derive(Component, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PlanetId(u32);

/// One orbiting body. `angle` is the current orbital phase in radians and is
/// left unbounded; only its sine and cosine are ever consumed.
#[derive(Debug, Clone)]
pub struct Planet {
    id: PlanetId,
    pub name: String,
    pub diameter: f32,
    pub orbit_radius: f32,
    pub angular_speed: f32, //degrees of arc per second, signed
    pub color: Color,
    pub angle: f32,
}

/// Raw form input for a new body. Fields hold whatever the user typed;
/// coercion and defaulting happen in [`PlanetRegistry::add`].
#[derive(Debug, Clone, Default)]
pub struct PlanetSpec {
    pub name: String,
    pub diameter: String,
    pub orbit_radius: String,
    pub angular_speed: String,
    pub color: String,
}

impl Planet {
    pub const DEFAULT_NAME: &'static str = "Planet";
    pub const DEFAULT_DIAMETER: f32 = 12.0;
    pub const DEFAULT_ORBIT_RADIUS: f32 = 100.0;
    pub const DEFAULT_ANGULAR_SPEED: f32 = 20.0;

    pub fn id(&self) -> PlanetId {
        self.id
    }

    /// Drawn disk radius, floored at one pixel so tiny bodies stay visible.
    pub fn radius(&self) -> f32 {
        (self.diameter / 2.0).max(1.0)
    }
}

/// The ordered collection of live bodies. Append order is draw order, list
/// order, and z-order. Lives as a Bevy resource for the life of the app.
#[derive(Resource, Debug, Default)]
pub struct PlanetRegistry {
    planets: Vec<Planet>,
    generation: u32,
}

impl PlanetRegistry {
    pub fn new() -> Self {
        PlanetRegistry::default()
    }

    /// Coerces the raw input, assigns a fresh id and a random starting
    /// phase, and appends. Malformed numeric input silently falls back to
    /// the field's default.
    pub fn add(&mut self, spec: &PlanetSpec) -> PlanetId {
        let id = PlanetId(PLANETCOUNT.fetch_add(1, SeqCst));

        let planet = Planet {
            id,
            name: coerce_name(&spec.name),
            diameter: coerce_number(&spec.diameter, Planet::DEFAULT_DIAMETER),
            orbit_radius: coerce_number(&spec.orbit_radius, Planet::DEFAULT_ORBIT_RADIUS),
            angular_speed: coerce_number(&spec.angular_speed, Planet::DEFAULT_ANGULAR_SPEED),
            color: coerce_color(&spec.color),
            angle: rand::rng().random_range(0.0..TAU),
        };

        info!(
            "added {} (orbit {}px, {} deg/s)",
            planet.name, planet.orbit_radius, planet.angular_speed
        );

        self.planets.push(planet);
        self.generation = self.generation.wrapping_add(1);
        id
    }

    /// Removes the matching body. Unknown ids are a silent no-op.
    pub fn remove(&mut self, id: PlanetId) -> bool {
        let before = self.planets.len();
        self.planets.retain(|planet| planet.id != id);

        let removed = self.planets.len() != before;
        if removed {
            info!("removed {:?}", id);
            self.generation = self.generation.wrapping_add(1);
        }
        removed
    }

    pub fn clear(&mut self) {
        info!("cleared {} planet(s)", self.planets.len());
        self.planets.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn list(&self) -> &[Planet] {
        &self.planets
    }

    pub fn get(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.iter().find(|planet| planet.id == id)
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Bumped on every membership change (add/remove/clear), never by
    /// [`advance`](Self::advance). The list view compares this against the
    /// last generation it rendered.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Advances every body's phase by `angular_speed` over `dt` seconds.
    /// A non-finite `dt` sample counts as zero so a bad clock read cannot
    /// teleport the whole system.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt } else { 0.0 };

        for planet in &mut self.planets {
            planet.angle += planet.angular_speed.to_radians() * dt;
        }
    }
}

//parse failures, non-finite values, and zero all fall back;
//signed values that parse survive
fn coerce_number(raw: &str, fallback: f32) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(value) if value != 0.0 && value.is_finite() => value,
        _ => fallback,
    }
}

fn coerce_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Planet::DEFAULT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

//accepts #fff / #2a6fdd style hex, with or without the leading '#'
fn coerce_color(raw: &str) -> Color {
    Srgba::hex(raw.trim())
        .map(Color::Srgba)
        .unwrap_or(Color::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, diameter: &str, orbit: &str, speed: &str, color: &str) -> PlanetSpec {
        PlanetSpec {
            name: name.to_string(),
            diameter: diameter.to_string(),
            orbit_radius: orbit.to_string(),
            angular_speed: speed.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn add_appends_coerced_fields() {
        let mut registry = PlanetRegistry::new();
        registry.add(&spec("Earth", "18", "120", "29.8", "#2a6fdd"));

        assert_eq!(registry.len(), 1);
        let planet = &registry.list()[0];
        assert_eq!(planet.name, "Earth");
        assert_eq!(planet.diameter, 18.0);
        assert_eq!(planet.orbit_radius, 120.0);
        assert_eq!(planet.angular_speed, 29.8);
        assert_eq!(planet.color, Color::Srgba(Srgba::hex("2a6fdd").unwrap()));
        assert!(planet.angle >= 0.0 && planet.angle < TAU);
    }

    #[test]
    fn add_falls_back_on_malformed_numbers() {
        let mut registry = PlanetRegistry::new();
        registry.add(&spec("", "banana", "", "0", "nope"));

        let planet = &registry.list()[0];
        assert_eq!(planet.name, Planet::DEFAULT_NAME);
        assert_eq!(planet.diameter, Planet::DEFAULT_DIAMETER);
        assert_eq!(planet.orbit_radius, Planet::DEFAULT_ORBIT_RADIUS);
        assert_eq!(planet.angular_speed, Planet::DEFAULT_ANGULAR_SPEED);
        assert_eq!(planet.color, Color::WHITE);
    }

    #[test]
    fn signed_speed_survives_coercion() {
        let mut registry = PlanetRegistry::new();
        registry.add(&spec("Retro", "10", "80", "-45", "#fff"));
        assert_eq!(registry.list()[0].angular_speed, -45.0);
    }

    #[test]
    fn ids_are_unique() {
        let mut registry = PlanetRegistry::new();
        let a = registry.add(&PlanetSpec::default());
        let b = registry.add(&PlanetSpec::default());
        let c = registry.add(&PlanetSpec::default());
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn remove_drops_only_the_matching_body() {
        let mut registry = PlanetRegistry::new();
        let a = registry.add(&PlanetSpec::default());
        let b = registry.add(&PlanetSpec::default());

        assert!(registry.remove(a));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(a).is_none());
        assert!(registry.get(b).is_some());
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let mut registry = PlanetRegistry::new();
        let id = registry.add(&PlanetSpec::default());
        assert!(registry.remove(id));

        let generation = registry.generation();
        assert!(!registry.remove(id));
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.generation(), generation);
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut registry = PlanetRegistry::new();
        registry.add(&PlanetSpec::default());
        registry.add(&PlanetSpec::default());

        registry.clear();
        assert!(registry.is_empty());

        registry.clear(); //idempotent on an already-empty registry
        assert!(registry.is_empty());
    }

    #[test]
    fn zero_speed_holds_the_angle() {
        let mut registry = PlanetRegistry::new();
        registry.add(&spec("Static", "10", "80", "5", "#fff"));
        //zero cannot come from coercion, pin it directly
        registry.planets[0].angular_speed = 0.0;

        let start = registry.planets[0].angle;
        registry.advance(2.5);
        registry.advance(100.0);
        assert_eq!(registry.list()[0].angle, start);
    }

    #[test]
    fn full_turn_per_second_advances_tau() {
        let mut registry = PlanetRegistry::new();
        registry.add(&spec("Spinner", "10", "80", "360", "#fff"));

        let start = registry.list()[0].angle;
        registry.advance(1.0);
        let advanced = registry.list()[0].angle - start;
        assert!((advanced - TAU).abs() < 1e-3, "advanced by {advanced}");
    }

    #[test]
    fn non_finite_dt_counts_as_zero() {
        let mut registry = PlanetRegistry::new();
        registry.add(&spec("Stable", "10", "80", "90", "#fff"));

        let start = registry.list()[0].angle;
        registry.advance(f32::NAN);
        registry.advance(f32::INFINITY);
        assert_eq!(registry.list()[0].angle, start);
    }

    #[test]
    fn generation_tracks_membership_not_motion() {
        let mut registry = PlanetRegistry::new();
        let g0 = registry.generation();

        let id = registry.add(&PlanetSpec::default());
        let g1 = registry.generation();
        assert_ne!(g0, g1);

        registry.advance(1.0);
        assert_eq!(registry.generation(), g1);

        registry.remove(id);
        let g2 = registry.generation();
        assert_ne!(g1, g2);

        registry.clear();
        assert_ne!(registry.generation(), g2);
    }
}
