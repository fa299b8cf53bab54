//! Fields.rs
//!
//! These functions build the meat of the text-input UIs used in Plugins.rs.
//! They act as helper functions to reduce repetitive code and also contain
//! the constants and components that identify each rendered field and carry
//! its current contents.

use bevy::input::keyboard::Key;
use bevy::prelude::*;

pub const FIELDHEIGHT: f32 = 42.0; //physical height of a field, in pixels
pub const FIELD_BKG: Color = Color::srgb(0.09, 0.09, 0.12);
pub const FIELD_BORDER: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
pub const FOCUS_BORDER: Color = Color::srgb(0.35, 0.55, 0.95);
pub const FIELD_LABEL: Color = Color::srgba(1.0, 1.0, 1.0, 0.45);

/// FieldKind Enum: Component
///
/// Tracks which body attribute the field attached to it edits.
/// Used mostly for collecting field contents within a Bevy Query
#[derive(Component, Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldKind {
    Name,
    Diameter,
    OrbitRadius,
    Speed,
    ColorHex,
}

/// FieldValue struct: Component
///
/// Stores the raw text the user has typed into a field. The registry's
/// coercion decides later what the text means; the widget never validates.
#[derive(Component, Debug, Default)]
pub struct FieldValue {
    pub text: String,
}

impl FieldValue {
    /// Applies one logical key press to the buffer. Printable characters
    /// append, backspace pops, everything else is ignored.
    pub fn apply_key(&mut self, key: &Key) {
        match key {
            Key::Backspace => {
                self.text.pop();
            }
            Key::Space => self.text.push(' '),
            Key::Character(input) => {
                for ch in input.chars().filter(|ch| !ch.is_control()) {
                    self.text.push(ch);
                }
            }
            _ => {}
        }
    }
}

/// FieldText struct: Component
///
/// Marks the Text child that mirrors a field's current contents (plus the
/// caret while focused), for targeting within a Bevy Query.
#[derive(Component)]
pub struct FieldText;

/// fn generate_field returns a field widget Bundle
///
/// Convenience function preparing the geometry, label, and value text for
/// one input field. Called during `fn setup_panel` in plugins.rs. The
/// `Button` component is only there so the engine tracks `Interaction`;
/// focus handling gives it field semantics.
pub fn generate_field(kind: FieldKind, label: &str, initial: &str) -> impl Bundle {
    (
        kind,
        FieldValue {
            text: initial.to_string(),
        },
        Button,
        Node {
            width: Val::Percent(100.0),
            height: px(FIELDHEIGHT),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            padding: UiRect::axes(px(8), px(4)),
            row_gap: px(2),
            ..default()
        },
        BackgroundColor(FIELD_BKG),
        BorderRadius::all(px(4)),
        Outline::new(px(1), Val::ZERO, FIELD_BORDER),
        children![
            (
                Text::new(label),
                TextFont {
                    font_size: 10.0,
                    ..default()
                },
                TextColor(FIELD_LABEL),
            ),
            (
                Text::new(initial),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                FieldText,
            ),
        ],
    )
}
