/// All game entity types, pure data. Behaviour lives in `behaviour`,
/// per-frame orchestration in `compute`.
use crate::geometry::Rect;

// ── Shared entity record ──────────────────────────────────────────────────────

/// What the renderer should draw for a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sprite {
    PlayerTank(TankClass),
    EnemyTank,
    BossJet,
    PlayerShell,
    EnemyShell,
    Bomb,
    Mine,
}

/// Position plus extent. The bounding rectangle is derived, so its origin
/// is always the current `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub sprite: Sprite,
}

impl Body {
    pub fn new(x: f32, y: f32, (w, h): (f32, f32), sprite: Sprite) -> Self {
        Self { x, y, w, h, sprite }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn clamp_to(&mut self, (min_x, min_y, max_x, max_y): (f32, f32, f32, f32)) {
        self.x = self.x.clamp(min_x, max_x);
        self.y = self.y.clamp(min_y, max_y);
    }

    /// Horizontal centre, used as the muzzle position when firing.
    pub fn centre_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Heading {
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub body: Body,
    pub speed: f32,
    pub heading: Heading,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Selectable tank from the home screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TankClass {
    /// Sturdy green tank: more HP, weaker shells.
    Defence,
    /// Blue tank: half the HP, double the shell power.
    Power,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub class: TankClass,
    pub vx: f32,
    pub vy: f32,
    pub hp: i32,
    pub power: i32,
    pub score: u32,
    pub bullets: Vec<Bullet>,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    /// Drifts down while bouncing between the side walls.
    Tank,
    /// Sweeps side to side at a fixed height and fires more often.
    Boss,
}

/// Alive → Dying (fixed-length animation) → Removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dying { frames_left: u32 },
    Removed { killed: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub vx: f32,
    pub vy: f32,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub life: LifeState,
    pub fire_cooldown: u32,
    /// Frames left on the small hit explosion.
    pub hit_flash: u32,
    pub bullets: Vec<Bullet>,
}

// ── Landmines ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MineState {
    Armed,
    Exploding { frames_left: u32 },
    Spent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Landmine {
    pub body: Body,
    pub speed: f32,
    pub state: MineState,
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    GameOver,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Defeated,
    BossDefeated,
}

/// Player intent for one frame, already reduced from raw key events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

/// One menu → play → game-over iteration. Cloneable so `tick` can hand
/// back a new copy without touching the caller's.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub phase: Phase,
    pub outcome: Option<Outcome>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Enemy,
    /// Kills left before the boss arrives; the boss is active at zero.
    pub boss_countdown: u32,
    pub landmines: Vec<Landmine>,
    /// Active (alive or dying) enemy count kept topped up while the boss is away.
    pub enemy_floor: usize,
    pub high_score: u32,
    pub frame: u64,
}

impl Session {
    pub fn boss_active(&self) -> bool {
        self.boss_countdown == 0
    }
}
