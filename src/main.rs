use bevy::prelude::*;

mod objects;

/// Main Entry Point
///
/// Starts the event loop and chains plugins. Everything the sandbox
/// does lives in the `objects::SolarSandbox` plugin; see plugins.rs
/// in the objects subdirectory
fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(objects::SolarSandbox)
        .run();
}
