/// Capability traits shared by the entity types, and their per-entity
/// behaviour: movement, bouncing, firing, damage and death animation.
///
/// Randomness arrives through `&mut dyn RngCore`, so callers decide the
/// source (thread RNG in the game, seeded `StdRng` in tests).
use rand::{Rng, RngCore};

use crate::config::{
    BOMB_SIZE, BOSS_BULLET_SPEED, BOSS_DAMAGE, BOSS_FIRE_COOLDOWN, BOSS_HEALTH, BOSS_SIZE,
    BOSS_SPEED, BOSS_START, BULLET_SIZE, DEATH_FRAMES, DEFENCE_HP, DEFENCE_POWER, ENEMY_BULLET_SPEED,
    ENEMY_DAMAGE, ENEMY_EXIT_Y, ENEMY_FIRE_COOLDOWN, ENEMY_HEALTH, ENEMY_VELOCITY, FIELD_HEIGHT,
    HIT_FLASH_FRAMES, MINE_EXPLOSION_FRAMES, MINE_SIZE, MINE_SPEED, PATROL_MAX_X, PATROL_MIN_X,
    PLAYER_BULLET_SPEED, PLAYER_MARGINS, PLAYER_START, POWER_HP, POWER_POWER, TANK_SIZE,
};
use crate::entities::{
    Body, Bullet, Enemy, EnemyKind, Heading, Landmine, LifeState, MineState, Player, Sprite,
    TankClass,
};
use crate::geometry::Rect;

// ── Capabilities ──────────────────────────────────────────────────────────────

pub trait Collidable {
    fn bounds(&self) -> Rect;

    fn collides_with(&self, other: &dyn Collidable) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

pub trait Damageable {
    /// Apply a hit. Returns `true` when this hit is the one that kills.
    fn take_damage(&mut self, amount: i32) -> bool;
    fn is_alive(&self) -> bool;
}

pub trait Updatable {
    /// Advance one frame.
    fn update(&mut self, rng: &mut dyn RngCore);
}

impl Collidable for Body {
    fn bounds(&self) -> Rect {
        self.rect()
    }
}

impl Collidable for Player {
    fn bounds(&self) -> Rect {
        self.body.rect()
    }
}

impl Collidable for Bullet {
    fn bounds(&self) -> Rect {
        self.body.rect()
    }
}

impl Collidable for Enemy {
    fn bounds(&self) -> Rect {
        self.body.rect()
    }
}

impl Collidable for Landmine {
    fn bounds(&self) -> Rect {
        self.body.rect()
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

impl Bullet {
    pub fn new(x: f32, y: f32, speed: f32, heading: Heading, sprite: Sprite) -> Self {
        let size = match sprite {
            Sprite::Bomb => BOMB_SIZE,
            _ => BULLET_SIZE,
        };
        Bullet {
            body: Body::new(x, y, size, sprite),
            speed,
            heading,
        }
    }

    pub fn is_off_screen(&self) -> bool {
        self.body.y < 0.0 || self.body.y > FIELD_HEIGHT
    }
}

impl Updatable for Bullet {
    fn update(&mut self, _rng: &mut dyn RngCore) {
        match self.heading {
            Heading::Up => self.body.translate(0.0, -self.speed),
            Heading::Down => self.body.translate(0.0, self.speed),
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

impl TankClass {
    /// Starting (hp, power).
    pub fn stats(self) -> (i32, i32) {
        match self {
            TankClass::Defence => (DEFENCE_HP, DEFENCE_POWER),
            TankClass::Power => (POWER_HP, POWER_POWER),
        }
    }
}

impl Player {
    pub fn new(class: TankClass) -> Self {
        let (hp, power) = class.stats();
        Player {
            body: Body::new(
                PLAYER_START.0,
                PLAYER_START.1,
                TANK_SIZE,
                Sprite::PlayerTank(class),
            ),
            class,
            vx: 0.0,
            vy: 0.0,
            hp,
            power,
            score: 0,
            bullets: Vec::new(),
        }
    }

    /// Spawn a shell from the middle of the turret.
    pub fn fire(&mut self) {
        let x = self.body.centre_x() - BULLET_SIZE.0 / 2.0;
        self.bullets.push(Bullet::new(
            x,
            self.body.y,
            PLAYER_BULLET_SPEED,
            Heading::Up,
            Sprite::PlayerShell,
        ));
    }
}

impl Updatable for Player {
    fn update(&mut self, _rng: &mut dyn RngCore) {
        self.body.translate(self.vx, self.vy);
        self.body.clamp_to(PLAYER_MARGINS);
    }
}

impl Damageable for Player {
    fn take_damage(&mut self, amount: i32) -> bool {
        if self.hp <= 0 {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        self.hp == 0
    }

    fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

// ── Enemy & boss ──────────────────────────────────────────────────────────────

impl EnemyKind {
    fn fire_cooldown(self, rng: &mut dyn RngCore) -> u32 {
        match self {
            EnemyKind::Tank => rng.gen_range(ENEMY_FIRE_COOLDOWN),
            EnemyKind::Boss => rng.gen_range(BOSS_FIRE_COOLDOWN),
        }
    }
}

impl Enemy {
    pub fn tank(x: f32, y: f32, rng: &mut dyn RngCore) -> Self {
        Enemy {
            body: Body::new(x, y, TANK_SIZE, Sprite::EnemyTank),
            kind: EnemyKind::Tank,
            vx: ENEMY_VELOCITY.0,
            vy: ENEMY_VELOCITY.1,
            health: ENEMY_HEALTH,
            max_health: ENEMY_HEALTH,
            damage: ENEMY_DAMAGE,
            life: LifeState::Alive,
            fire_cooldown: EnemyKind::Tank.fire_cooldown(rng),
            hit_flash: 0,
            bullets: Vec::new(),
        }
    }

    pub fn boss(rng: &mut dyn RngCore) -> Self {
        Enemy {
            body: Body::new(BOSS_START.0, BOSS_START.1, BOSS_SIZE, Sprite::BossJet),
            kind: EnemyKind::Boss,
            vx: BOSS_SPEED,
            vy: 0.0,
            health: BOSS_HEALTH,
            max_health: BOSS_HEALTH,
            damage: BOSS_DAMAGE,
            life: LifeState::Alive,
            fire_cooldown: EnemyKind::Boss.fire_cooldown(rng),
            hit_flash: 0,
            bullets: Vec::new(),
        }
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.life, LifeState::Dying { .. })
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.life, LifeState::Removed { .. })
    }

    /// Fraction of health left, for the health bar.
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    pub fn fire(&mut self) {
        let (speed, sprite, w) = match self.kind {
            EnemyKind::Tank => (ENEMY_BULLET_SPEED, Sprite::EnemyShell, BULLET_SIZE.0),
            EnemyKind::Boss => (BOSS_BULLET_SPEED, Sprite::Bomb, BOMB_SIZE.0),
        };
        let x = self.body.centre_x() - w / 2.0;
        let y = self.body.y + self.body.h;
        self.bullets
            .push(Bullet::new(x, y, speed, Heading::Down, sprite));
    }

    /// Reverse only when heading into a wall, so a body resting on the
    /// wall never flips back and forth.
    fn bounce(&mut self) {
        if self.body.x <= PATROL_MIN_X && self.vx < 0.0 {
            self.vx = -self.vx;
        } else if self.body.x >= PATROL_MAX_X && self.vx > 0.0 {
            self.vx = -self.vx;
        }
    }

    fn patrol(&mut self) {
        match self.kind {
            EnemyKind::Tank => {
                self.body.translate(self.vx, self.vy);
                self.bounce();
                if self.body.y >= ENEMY_EXIT_Y {
                    self.life = LifeState::Removed { killed: false };
                }
            }
            EnemyKind::Boss => {
                self.body.translate(self.vx, 0.0);
                self.bounce();
            }
        }
    }
}

impl Updatable for Enemy {
    fn update(&mut self, rng: &mut dyn RngCore) {
        self.hit_flash = self.hit_flash.saturating_sub(1);
        match self.life {
            LifeState::Alive => {
                self.patrol();
                if self.is_removed() {
                    return;
                }
                if self.fire_cooldown == 0 {
                    self.fire();
                    self.fire_cooldown = self.kind.fire_cooldown(rng);
                } else {
                    self.fire_cooldown -= 1;
                }
            }
            LifeState::Dying { frames_left } => {
                let frames_left = frames_left.saturating_sub(1);
                self.life = if frames_left == 0 {
                    LifeState::Removed { killed: true }
                } else {
                    LifeState::Dying { frames_left }
                };
            }
            LifeState::Removed { .. } => {}
        }
    }
}

impl Damageable for Enemy {
    fn take_damage(&mut self, amount: i32) -> bool {
        if self.life != LifeState::Alive {
            return false;
        }
        self.health -= amount;
        self.hit_flash = HIT_FLASH_FRAMES;
        if self.health > 0 {
            return false;
        }
        // Dying enemies stop moving and their shells in flight are gone.
        self.health = 0;
        self.vx = 0.0;
        self.vy = 0.0;
        self.bullets.clear();
        self.life = LifeState::Dying {
            frames_left: DEATH_FRAMES,
        };
        true
    }

    fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }
}

// ── Landmine ──────────────────────────────────────────────────────────────────

impl Landmine {
    pub fn new(x: f32, y: f32) -> Self {
        Landmine {
            body: Body::new(x, y, MINE_SIZE, Sprite::Mine),
            speed: MINE_SPEED,
            state: MineState::Armed,
        }
    }

    /// Arm → exploding. Returns `false` if the mine already went off.
    pub fn trigger(&mut self) -> bool {
        if self.state != MineState::Armed {
            return false;
        }
        self.state = MineState::Exploding {
            frames_left: MINE_EXPLOSION_FRAMES,
        };
        true
    }

    pub fn is_armed(&self) -> bool {
        self.state == MineState::Armed
    }

    /// Spent or drifted past the bottom edge.
    pub fn is_cleared(&self) -> bool {
        self.state == MineState::Spent || self.body.y > ENEMY_EXIT_Y
    }
}

impl Updatable for Landmine {
    fn update(&mut self, _rng: &mut dyn RngCore) {
        match self.state {
            MineState::Armed => self.body.translate(0.0, self.speed),
            MineState::Exploding { frames_left } => {
                let frames_left = frames_left.saturating_sub(1);
                self.state = if frames_left == 0 {
                    MineState::Spent
                } else {
                    MineState::Exploding { frames_left }
                };
            }
            MineState::Spent => {}
        }
    }
}
