use bevy::input::keyboard::KeyboardInput;
use bevy::input_focus::InputFocus;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::objects::button::{
    AddButton, BtnState, RemoveButton, ResetButton, gen_button, update_btn,
};
use crate::objects::fields::{
    FIELD_BORDER, FOCUS_BORDER, FieldKind, FieldText, FieldValue, generate_field,
};
use crate::objects::planets::{Planet, PlanetId, PlanetRegistry, PlanetSpec};
use crate::objects::presentation::{ScreenDisk, ScreenPositions, hit_test};

const SUN_RADIUS: f32 = 22.0;
const PANEL_WIDTH: f32 = 220.0;

//painter's order, back to front: clear color, guides, sun, planets
const Z_GUIDES: f32 = 0.1;
const Z_SUN: f32 = 0.5;
const Z_PLANETS: f32 = 1.0;
const Z_STEP: f32 = 0.01;

const GUIDE_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.06);
const SHADOW_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 0.18);
const LABEL_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.85);
const PANEL_BKG: Color = Color::srgba(0.05, 0.05, 0.08, 0.92);
const ROW_BKG: Color = Color::srgba(1.0, 1.0, 1.0, 0.05);
const READOUT_COLOR: Color = Color::srgb(0.55, 0.55, 0.6);

/// The faint full-circle orbit guide behind one body
#[derive(Component)]
struct OrbitGuide;

/// The filled disk of one body; shadow and name label are its children
#[derive(Component)]
struct PlanetDisk;

/// Container the body rows are rebuilt under
#[derive(Component)]
struct PlanetList;

/// One row of the side list
#[derive(Component)]
struct PlanetRow;

pub struct SolarSandbox;

impl Plugin for SolarSandbox {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK));
        app.insert_resource(PlanetRegistry::new());
        app.insert_resource(ScreenPositions::new());
        app.init_resource::<InputFocus>();
        app.add_systems(Startup, (setup_canvas, setup_panel, seed_registry));
        app.add_systems(
            Update,
            (
                advance_orbits,
                remove_on_canvas_click,
                handle_panel_actions,
                sync_planet_visuals,
                refresh_planet_list,
            )
                .chain(),
        );
        app.add_systems(
            Update,
            (
                style_buttons,
                style_fields,
                focus_fields,
                edit_focused_field,
                release_focus,
                sync_field_text,
            ),
        );
    }
}

fn setup_canvas(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2d);

    //the sun: concentric discs standing in for a radial gradient,
    //white-hot core fading to the orange rim
    let layers = [
        (SUN_RADIUS, Color::srgb_u8(255, 179, 71)),
        (15.0, Color::srgb_u8(255, 227, 138)),
        (8.0, Color::srgb_u8(255, 247, 204)),
    ];
    for (index, (radius, color)) in layers.into_iter().enumerate() {
        commands.spawn((
            Mesh2d(meshes.add(Circle::new(radius))),
            MeshMaterial2d(materials.add(color)),
            Transform::from_xyz(0.0, 0.0, Z_SUN + index as f32 * 0.001),
        ));
    }
}

fn seed_registry(mut registry: ResMut<PlanetRegistry>) {
    registry.add(&PlanetSpec {
        name: "Mercury".into(),
        diameter: "8".into(),
        orbit_radius: "60".into(),
        angular_speed: "47".into(),
        color: "#bdbdbd".into(),
    });
    registry.add(&PlanetSpec {
        name: "Earth".into(),
        diameter: "18".into(),
        orbit_radius: "120".into(),
        angular_speed: "29.8".into(),
        color: "#2a6fdd".into(),
    });
    registry.add(&PlanetSpec {
        name: "Mars".into(),
        diameter: "12".into(),
        orbit_radius: "170".into(),
        angular_speed: "24.1".into(),
        color: "#c1440e".into(),
    });
}

fn advance_orbits(time: Res<Time>, mut registry: ResMut<PlanetRegistry>) {
    registry.advance(time.delta_secs());
}

fn sync_planet_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    registry: Res<PlanetRegistry>,
    mut screen: ResMut<ScreenPositions>,
    mut disks: Query<(Entity, &PlanetId, &mut Transform), (With<PlanetDisk>, Without<OrbitGuide>)>,
    guides: Query<(Entity, &PlanetId), (With<OrbitGuide>, Without<PlanetDisk>)>,
) {
    for (entity, id, _) in &disks {
        if registry.get(*id).is_none() {
            commands.entity(entity).despawn();
        }
    }
    for (entity, id) in &guides {
        if registry.get(*id).is_none() {
            commands.entity(entity).despawn();
        }
    }
    screen.prune(|id| registry.get(id).is_some());

    for (index, planet) in registry.list().iter().enumerate() {
        let position = Vec2::new(
            planet.angle.cos() * planet.orbit_radius,
            planet.angle.sin() * planet.orbit_radius,
        );
        //registry order doubles as z-order, later bodies on top
        let z = Z_PLANETS + index as f32 * Z_STEP;

        match disks.iter_mut().find(|(_, id, _)| **id == planet.id()) {
            Some((_, _, mut transform)) => {
                transform.translation = position.extend(z);
            }
            None => {
                spawn_planet_visuals(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    planet,
                    position,
                    z,
                );
            }
        }

        screen.record(
            planet.id(),
            ScreenDisk {
                center: position,
                radius: planet.radius(),
            },
        );
    }
}

fn spawn_planet_visuals(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<ColorMaterial>>,
    planet: &Planet,
    position: Vec2,
    z: f32,
) {
    let ring = planet.orbit_radius.abs();
    commands.spawn((
        OrbitGuide,
        planet.id(),
        Mesh2d(meshes.add(Annulus::new((ring - 0.5).max(0.0), ring + 0.5))),
        MeshMaterial2d(materials.add(GUIDE_COLOR)),
        Transform::from_xyz(0.0, 0.0, Z_GUIDES),
    ));

    commands.spawn((
        PlanetDisk,
        planet.id(),
        Mesh2d(meshes.add(Circle::new(planet.radius()))),
        MeshMaterial2d(materials.add(planet.color)),
        Transform::from_translation(position.extend(z)),
        children![
            (
                Mesh2d(meshes.add(Ellipse::new(planet.diameter * 0.55, planet.diameter * 0.33))),
                MeshMaterial2d(materials.add(SHADOW_COLOR)),
                Transform::from_xyz(2.0, -2.0, -0.004),
            ),
            (
                Text2d::new(planet.name.clone()),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(LABEL_COLOR),
                Transform::from_xyz(0.0, planet.radius() + 12.0, 0.004),
            ),
        ],
    ));
}

fn remove_on_canvas_click(
    buttons: Res<ButtonInput<MouseButton>>,
    hovered: Query<&Interaction>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut input_focus: ResMut<InputFocus>,
    mut registry: ResMut<PlanetRegistry>,
    screen: Res<ScreenPositions>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    //presses over the panel belong to the panel
    if hovered
        .iter()
        .any(|interaction| *interaction != Interaction::None)
    {
        return;
    }

    input_focus.clear();

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(point) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };

    if let Some(id) = hit_test(&registry, &screen, point) {
        registry.remove(id);
    }
}

fn setup_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: px(10),
                right: px(10),
                width: px(PANEL_WIDTH),
                flex_direction: FlexDirection::Column,
                row_gap: px(8),
                padding: UiRect::all(px(12)),
                ..default()
            },
            BackgroundColor(PANEL_BKG),
            BorderRadius::all(px(8)),
            //panel body swallows canvas clicks
            Interaction::default(),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Add planet"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            panel.spawn(generate_field(FieldKind::Name, "Name", ""));
            panel.spawn(generate_field(FieldKind::Diameter, "Diameter (px)", "12"));
            panel.spawn(generate_field(
                FieldKind::OrbitRadius,
                "Orbit radius (px)",
                "100",
            ));
            panel.spawn(generate_field(FieldKind::Speed, "Speed (deg/s)", "20"));
            panel.spawn(generate_field(FieldKind::ColorHex, "Color (hex)", "#fff"));
            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: px(8),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((gen_button("Add", 74.0, 28.0, 14.0), AddButton));
                    row.spawn((gen_button("Reset", 74.0, 28.0, 14.0), ResetButton));
                });
            panel.spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    row_gap: px(4),
                    margin: UiRect::top(px(6)),
                    ..default()
                },
                PlanetList,
            ));
        });
}

fn handle_panel_actions(
    mut registry: ResMut<PlanetRegistry>,
    fields: Query<(&FieldKind, &FieldValue)>,
    interactions: Query<
        (
            &Interaction,
            Option<&AddButton>,
            Option<&ResetButton>,
            Option<&RemoveButton>,
        ),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, add, reset, remove) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }

        if add.is_some() {
            let mut spec = PlanetSpec::default();
            for (kind, value) in &fields {
                match kind {
                    FieldKind::Name => spec.name = value.text.clone(),
                    FieldKind::Diameter => spec.diameter = value.text.clone(),
                    FieldKind::OrbitRadius => spec.orbit_radius = value.text.clone(),
                    FieldKind::Speed => spec.angular_speed = value.text.clone(),
                    FieldKind::ColorHex => spec.color = value.text.clone(),
                }
            }
            registry.add(&spec);
        } else if reset.is_some() {
            registry.clear();
        } else if let Some(RemoveButton(id)) = remove {
            registry.remove(*id);
        }
    }
}

fn refresh_planet_list(
    mut commands: Commands,
    registry: Res<PlanetRegistry>,
    mut seen: Local<Option<u32>>,
    rows: Query<Entity, With<PlanetRow>>,
    list: Query<Entity, With<PlanetList>>,
) {
    if *seen == Some(registry.generation()) {
        return;
    }
    *seen = Some(registry.generation());

    for row in &rows {
        commands.entity(row).despawn();
    }
    let Ok(list) = list.single() else {
        return;
    };

    commands.entity(list).with_children(|parent| {
        for planet in registry.list() {
            parent
                .spawn((
                    PlanetRow,
                    Node {
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(px(6), px(4)),
                        ..default()
                    },
                    BackgroundColor(ROW_BKG),
                    BorderRadius::all(px(4)),
                ))
                .with_children(|row| {
                    row.spawn(Node {
                        flex_direction: FlexDirection::Row,
                        align_items: AlignItems::Center,
                        column_gap: px(8),
                        ..default()
                    })
                    .with_children(|cell| {
                        cell.spawn((
                            Node {
                                width: px(12),
                                height: px(12),
                                ..default()
                            },
                            BackgroundColor(planet.color),
                            BorderRadius::MAX,
                        ));
                        cell.spawn((
                            Text::new(planet.name.clone()),
                            TextFont {
                                font_size: 13.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                        cell.spawn((
                            Text::new(format!("{}px", planet.orbit_radius.round())),
                            TextFont {
                                font_size: 11.0,
                                ..default()
                            },
                            TextColor(READOUT_COLOR),
                        ));
                    });
                    row.spawn((gen_button("Remove", 64.0, 22.0, 11.0), RemoveButton(planet.id())));
                });
        }
    });
}

fn style_buttons(
    mut interactions: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, Without<FieldKind>),
    >,
) {
    for (interaction, mut background) in &mut interactions {
        let state = match interaction {
            Interaction::Pressed => BtnState::Pressed,
            Interaction::Hovered => BtnState::Hovered,
            Interaction::None => BtnState::None,
        };
        update_btn(&mut background, state);
    }
}

fn focus_fields(
    mut input_focus: ResMut<InputFocus>,
    fields: Query<(Entity, &Interaction), (Changed<Interaction>, With<FieldKind>)>,
) {
    for (entity, interaction) in &fields {
        if *interaction == Interaction::Pressed {
            input_focus.set(entity);
        }
    }
}

fn style_fields(
    input_focus: Res<InputFocus>,
    mut fields: Query<(Entity, &mut Outline), With<FieldKind>>,
) {
    for (entity, mut outline) in &mut fields {
        outline.color = if input_focus.get() == Some(entity) {
            FOCUS_BORDER
        } else {
            FIELD_BORDER
        };
    }
}

fn edit_focused_field(
    input_focus: Res<InputFocus>,
    mut keys: MessageReader<KeyboardInput>,
    mut fields: Query<&mut FieldValue>,
) {
    let Some(focused) = input_focus.get() else {
        keys.clear();
        return;
    };
    let Ok(mut value) = fields.get_mut(focused) else {
        keys.clear();
        return;
    };

    for key in keys.read() {
        if !key.state.is_pressed() {
            continue;
        }
        value.apply_key(&key.logical_key);
    }
}

fn release_focus(mut input_focus: ResMut<InputFocus>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::Escape) {
        input_focus.clear();
    }
}

fn sync_field_text(
    input_focus: Res<InputFocus>,
    fields: Query<&FieldValue, With<FieldKind>>,
    mut texts: Query<(&mut Text, &ChildOf), With<FieldText>>,
) {
    for (mut text, child_of) in &mut texts {
        let parent = child_of.parent();
        let Ok(value) = fields.get(parent) else {
            continue;
        };

        let focused = input_focus.get() == Some(parent);
        let shown = if focused {
            format!("{}_", value.text)
        } else {
            value.text.clone()
        };
        if **text != shown {
            **text = shown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use std::time::Duration;

    //a bare App stepping Update by hand is the bounded, deterministic
    //stand-in for the live frame loop
    fn bounded_app() -> App {
        let mut app = App::new();
        app.insert_resource(PlanetRegistry::new());
        app.insert_resource(Time::<()>::default());
        app.add_systems(Update, advance_orbits);
        app
    }

    #[test]
    fn sixty_ticks_advance_a_quarter_turn() {
        let mut app = bounded_app();

        let start = {
            let mut registry = app.world_mut().resource_mut::<PlanetRegistry>();
            registry.add(&PlanetSpec {
                angular_speed: "90".into(),
                ..default()
            });
            registry.list()[0].angle
        };

        for _ in 0..60 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs_f32(1.0 / 60.0));
            app.update();
        }

        let end = app.world().resource::<PlanetRegistry>().list()[0].angle;
        assert!(
            (end - start - FRAC_PI_2).abs() < 1e-2,
            "advanced {}",
            end - start
        );
    }

    #[test]
    fn startup_seeds_three_defaults() {
        let mut app = App::new();
        app.insert_resource(PlanetRegistry::new());
        app.add_systems(Startup, seed_registry);
        app.update();

        let registry = app.world().resource::<PlanetRegistry>();
        let names: Vec<&str> = registry.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Mercury", "Earth", "Mars"]);
        assert_eq!(registry.list()[1].orbit_radius, 120.0);
    }

    #[test]
    fn the_first_tick_sees_zero_delta() {
        let mut app = bounded_app();

        let start = {
            let mut registry = app.world_mut().resource_mut::<PlanetRegistry>();
            registry.add(&PlanetSpec {
                angular_speed: "360".into(),
                ..default()
            });
            registry.list()[0].angle
        };

        app.update();

        let end = app.world().resource::<PlanetRegistry>().list()[0].angle;
        assert_eq!(start, end);
    }
}
