pub mod button;
pub mod fields;
pub mod planets;
pub mod plugins;
pub mod presentation;

pub use self::plugins::SolarSandbox;
