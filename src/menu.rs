/// Fixed button layout for the home and game-over screens, in playfield
/// units. The renderer draws these rectangles and mouse clicks are mapped
/// back into the same space before hit-testing.
use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    ResetHighScore,
    SelectPower,
    SelectDefence,
    Home,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    pub action: MenuAction,
    pub rect: Rect,
    pub label: &'static str,
}

pub const HOME_BUTTONS: [Button; 4] = [
    Button {
        action: MenuAction::Play,
        rect: Rect::new(320.0, 200.0, 160.0, 50.0),
        label: "Play",
    },
    Button {
        action: MenuAction::ResetHighScore,
        rect: Rect::new(320.0, 270.0, 160.0, 50.0),
        label: "Reset",
    },
    Button {
        action: MenuAction::SelectPower,
        rect: Rect::new(100.0, 350.0, 150.0, 150.0),
        label: "Power",
    },
    Button {
        action: MenuAction::SelectDefence,
        rect: Rect::new(550.0, 350.0, 150.0, 150.0),
        label: "Defence",
    },
];

pub const GAME_OVER_BUTTONS: [Button; 1] = [Button {
    action: MenuAction::Home,
    rect: Rect::new(320.0, 370.0, 160.0, 50.0),
    label: "Home",
}];

/// First button whose rectangle contains the point.
pub fn hit_test(buttons: &[Button], x: f32, y: f32) -> Option<MenuAction> {
    buttons
        .iter()
        .find(|b| b.rect.contains_point(x, y))
        .map(|b| b.action)
}
