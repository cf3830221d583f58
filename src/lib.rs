//! Two small terminal applications sharing one library:
//!
//! * `tank_game`: top-down tank shooter (menu → play → game over).
//! * `image_editor`: crop / undo / resize / save for a single image.

pub mod behaviour;
pub mod compute;
pub mod config;
pub mod editor;
pub mod entities;
pub mod geometry;
pub mod high_score;
pub mod menu;
pub mod viewport;
