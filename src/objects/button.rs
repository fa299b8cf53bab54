//! button.rs
//!
//! https://bevy.org/examples/ui-user-interface/button/

use bevy::prelude::*;

use crate::objects::planets::PlanetId;

const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.55, 0.35);

#[derive(Component)]
pub enum BtnState {
    Hovered,
    Pressed,
    None,
}

/// Appends the form's current contents to the registry
#[derive(Component)]
pub struct AddButton;

/// Clears every body from the registry
#[derive(Component)]
pub struct ResetButton;

/// Removes one body; lives on its list row
#[derive(Component)]
pub struct RemoveButton(pub PlanetId);

pub fn update_btn(background_color: &mut BackgroundColor, state: BtnState) {
    match state {
        BtnState::None => {
            *background_color = NORMAL_BUTTON.into();
        }
        BtnState::Hovered => {
            *background_color = HOVERED_BUTTON.into();
        }
        BtnState::Pressed => {
            *background_color = PRESSED_BUTTON.into();
        }
    };
}

/// https://bevy.org/examples/ui-user-interface/button/
pub fn gen_button(text: &str, width: f32, height: f32, font_size: f32) -> impl Bundle {
    (
        Button,
        Node {
            width: px(width),
            height: px(height),
            border: UiRect::all(px(2)),
            // horizontally center child text
            justify_content: JustifyContent::Center,
            // vertically center child text
            align_items: AlignItems::Center,
            ..default()
        },
        BorderColor::all(Color::WHITE),
        BorderRadius::MAX,
        BackgroundColor(NORMAL_BUTTON),
        children![(
            Text::new(text),
            TextFont {
                font_size,
                ..default()
            },
            TextColor(Color::srgb(0.9, 0.9, 0.9)),
            TextShadow::default(),
        )],
    )
}
