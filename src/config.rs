/// Tuning constants for the tank game.
///
/// All positions and sizes are in playfield units (the logical 800×600
/// field); the renderer scales them to whatever terminal it lands in.
use std::ops::RangeInclusive;
use std::time::Duration;

// ── Playfield ─────────────────────────────────────────────────────────────────

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

/// Target frame time (60 FPS).
pub const FRAME: Duration = Duration::from_micros(16_667);

// ── Sprite sizes ──────────────────────────────────────────────────────────────

pub const TANK_SIZE: (f32, f32) = (64.0, 64.0);
pub const BOSS_SIZE: (f32, f32) = (64.0, 64.0);
pub const BULLET_SIZE: (f32, f32) = (10.0, 20.0);
pub const BOMB_SIZE: (f32, f32) = (16.0, 24.0);
pub const MINE_SIZE: (f32, f32) = (32.0, 32.0);

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_START: (f32, f32) = (380.0, 500.0);
pub const PLAYER_SPEED: f32 = 3.0;
/// Player clamp box: (min_x, min_y, max_x, max_y).
pub const PLAYER_MARGINS: (f32, f32, f32, f32) = (5.0, 5.0, 730.0, 530.0);
pub const PLAYER_BULLET_SPEED: f32 = 10.0;

pub const DEFENCE_HP: i32 = 200;
pub const DEFENCE_POWER: i32 = 20;
pub const POWER_HP: i32 = 100;
pub const POWER_POWER: i32 = 40;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_SPAWN_X: RangeInclusive<i32> = 0..=736;
pub const ENEMY_SPAWN_Y: RangeInclusive<i32> = -200..=-50;
pub const ENEMY_VELOCITY: (f32, f32) = (1.0, 0.5);
pub const ENEMY_HEALTH: i32 = 100;
pub const ENEMY_DAMAGE: i32 = 5;
pub const ENEMY_FIRE_COOLDOWN: RangeInclusive<u32> = 60..=120;
pub const ENEMY_BULLET_SPEED: f32 = 7.0;
/// Side walls the patrol bounces between.
pub const PATROL_MIN_X: f32 = 0.0;
pub const PATROL_MAX_X: f32 = 736.0;
/// An enemy at or below this y has left the playfield.
pub const ENEMY_EXIT_Y: f32 = 650.0;

/// Frames an enemy spends in its death animation.
pub const DEATH_FRAMES: u32 = 60;
/// Frames the small hit explosion stays on screen.
pub const HIT_FLASH_FRAMES: u32 = 30;

/// Active-enemy count kept topped up while the boss is away.
pub const ENEMY_FLOOR: usize = 5;
pub const ENEMY_CAP: usize = 12;
/// Replacements spawned for every enemy that leaves play.
pub const REPLACEMENTS_PER_REMOVAL: usize = 2;

// ── Boss ──────────────────────────────────────────────────────────────────────

pub const BOSS_START: (f32, f32) = (300.0, 50.0);
pub const BOSS_SPEED: f32 = 1.5;
pub const BOSS_HEALTH: i32 = 1000;
pub const BOSS_DAMAGE: i32 = 20;
pub const BOSS_FIRE_COOLDOWN: RangeInclusive<u32> = 20..=40;
pub const BOSS_BULLET_SPEED: f32 = 10.0;
/// Enemy kills needed before the boss shows up.
pub const BOSS_COUNTDOWN: u32 = 40;

// ── Landmines ─────────────────────────────────────────────────────────────────

pub const MINE_COUNT: usize = 5;
pub const MINE_SPEED: f32 = 1.0;
pub const MINE_DAMAGE: i32 = 10;
pub const MINE_EXPLOSION_FRAMES: u32 = 30;
/// One in this many cleared mines brings an extra mine with it.
pub const MINE_BONUS_ODDS: u32 = 20;

// ── Scoring ───────────────────────────────────────────────────────────────────

pub const SCORE_REMOVAL: u32 = 1;
pub const SCORE_KILL: u32 = 10;
pub const SCORE_MINE: u32 = 1;
pub const SCORE_BOSS: u32 = 1000;

// ── Persistence ───────────────────────────────────────────────────────────────

pub const HIGH_SCORE_ENV: &str = "TANK_GAME_SCORE_FILE";
pub const HIGH_SCORE_FILE_NAME: &str = ".tank_game_score";
