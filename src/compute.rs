/// Session state machine and the per-frame simulation.
///
/// Every public function takes an immutable reference to the current
/// `Session` (and, where needed, an RNG handle) and returns a brand-new
/// `Session`.  Side effects are limited to the injected RNG and logging.
use log::{debug, info};
use rand::{Rng, RngCore};

use crate::behaviour::{Collidable, Damageable, Updatable};
use crate::config::{
    BOSS_COUNTDOWN, ENEMY_CAP, ENEMY_FLOOR, ENEMY_SPAWN_X, ENEMY_SPAWN_Y, MINE_BONUS_ODDS,
    MINE_COUNT, MINE_DAMAGE, PLAYER_SPEED, REPLACEMENTS_PER_REMOVAL, SCORE_BOSS, SCORE_KILL,
    SCORE_MINE, SCORE_REMOVAL,
};
use crate::entities::{
    Enemy, Input, Landmine, LifeState, Outcome, Phase, Player, Session, TankClass,
};
use crate::menu::MenuAction;

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh tank just above the playfield.
pub fn spawn_enemy(rng: &mut dyn RngCore) -> Enemy {
    let x = rng.gen_range(ENEMY_SPAWN_X) as f32;
    let y = rng.gen_range(ENEMY_SPAWN_Y) as f32;
    Enemy::tank(x, y, rng)
}

/// A fresh landmine just above the playfield.
pub fn spawn_landmine(rng: &mut dyn RngCore) -> Landmine {
    let x = rng.gen_range(ENEMY_SPAWN_X) as f32;
    let y = rng.gen_range(ENEMY_SPAWN_Y) as f32;
    Landmine::new(x, y)
}

/// Build a session sitting on the home screen, entities ready for play.
pub fn new_session(class: TankClass, high_score: u32, rng: &mut impl Rng) -> Session {
    let rng: &mut dyn RngCore = rng;
    let enemies = (0..ENEMY_FLOOR).map(|_| spawn_enemy(rng)).collect();
    let landmines = (0..MINE_COUNT).map(|_| spawn_landmine(rng)).collect();
    Session {
        phase: Phase::Menu,
        outcome: None,
        player: Player::new(class),
        enemies,
        boss: Enemy::boss(rng),
        boss_countdown: BOSS_COUNTDOWN,
        landmines,
        enemy_floor: ENEMY_FLOOR,
        high_score,
        frame: 0,
    }
}

// ── Phase transitions ────────────────────────────────────────────────────────

/// Swap the player's tank. Only meaningful on the home screen.
pub fn select_class(state: &Session, class: TankClass) -> Session {
    if state.phase != Phase::Menu {
        return state.clone();
    }
    Session {
        player: Player::new(class),
        ..state.clone()
    }
}

pub fn start(state: &Session) -> Session {
    if state.phase != Phase::Menu {
        return state.clone();
    }
    info!("session start: class={:?}", state.player.class);
    Session {
        phase: Phase::Playing,
        ..state.clone()
    }
}

/// Leave the game-over screen for a brand-new session on the home screen.
/// The tank choice and the best score carry over.
pub fn return_home(state: &Session, rng: &mut impl Rng) -> Session {
    if state.phase != Phase::GameOver {
        return state.clone();
    }
    let high_score = state.high_score.max(state.player.score);
    new_session(state.player.class, high_score, rng)
}

/// True when the finished run matched or beat the stored best.
pub fn is_new_high_score(state: &Session) -> bool {
    state.player.score > 0 && state.player.score >= state.high_score
}

pub fn apply_menu_action(state: &Session, action: MenuAction, rng: &mut impl Rng) -> Session {
    match (state.phase, action) {
        (Phase::Menu, MenuAction::Play) => start(state),
        (Phase::Menu, MenuAction::ResetHighScore) => Session {
            high_score: 0,
            ..state.clone()
        },
        (Phase::Menu, MenuAction::SelectPower) => select_class(state, TankClass::Power),
        (Phase::Menu, MenuAction::SelectDefence) => select_class(state, TankClass::Defence),
        (Phase::GameOver, MenuAction::Home) => return_home(state, rng),
        _ => state.clone(),
    }
}

// ── Input-driven transitions (pure) ──────────────────────────────────────────

/// Turn held directions into a velocity and fire if asked.
pub fn apply_input(state: &Session, input: &Input) -> Session {
    let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32 * PLAYER_SPEED;
    let mut player = Player {
        vx: axis(input.left, input.right),
        vy: axis(input.up, input.down),
        ..state.player.clone()
    };
    if input.fire {
        player.fire();
    }
    Session {
        player,
        ..state.clone()
    }
}

pub fn player_shoot(state: &Session) -> Session {
    let mut player = state.player.clone();
    player.fire();
    Session {
        player,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Advance the simulation by one frame. Outside `Playing` the session is
/// returned unchanged, so the game-over transition happens exactly once.
pub fn tick(state: &Session, input: &Input, rng: &mut impl Rng) -> Session {
    if state.phase != Phase::Playing {
        return state.clone();
    }
    let rng: &mut dyn RngCore = rng;

    // ── 1. Input → velocity ──────────────────────────────────────────────────
    let mut next = apply_input(state, input);
    next.frame += 1;
    let boss_active = next.boss_active();

    // ── 2. Player movement (clamped) ─────────────────────────────────────────
    next.player.update(rng);

    // ── 3. Enemies, boss, landmines ──────────────────────────────────────────
    for enemy in next.enemies.iter_mut() {
        enemy.update(rng);
    }
    if boss_active {
        next.boss.update(rng);
    }
    for mine in next.landmines.iter_mut() {
        mine.update(rng);
    }

    // ── 4. Bullets ───────────────────────────────────────────────────────────
    for bullet in next.player.bullets.iter_mut() {
        bullet.update(rng);
    }
    for enemy in hostiles_mut(&mut next.enemies, &mut next.boss, boss_active) {
        for bullet in enemy.bullets.iter_mut() {
            bullet.update(rng);
        }
    }

    // ── 5. Collisions ────────────────────────────────────────────────────────
    resolve_hostile_fire(&mut next, boss_active);
    resolve_player_fire(&mut next, boss_active);
    resolve_landmines(&mut next);

    // ── 6. Compaction & respawn ──────────────────────────────────────────────
    compact_enemies(&mut next, rng);
    compact_landmines(&mut next, rng);

    // ── 7. Terminal conditions ───────────────────────────────────────────────
    if !next.player.is_alive() {
        finish(&mut next, Outcome::Defeated);
    } else if boss_active && next.boss.is_removed() {
        next.player.score += SCORE_BOSS;
        finish(&mut next, Outcome::BossDefeated);
    }

    next
}

fn hostiles_mut<'a>(
    enemies: &'a mut [Enemy],
    boss: &'a mut Enemy,
    boss_active: bool,
) -> impl Iterator<Item = &'a mut Enemy> {
    let boss = boss_active.then_some(boss);
    enemies.iter_mut().chain(boss)
}

fn finish(state: &mut Session, outcome: Outcome) {
    info!(
        "session over: {:?}, score={} (best {})",
        outcome, state.player.score, state.high_score
    );
    state.phase = Phase::GameOver;
    state.outcome = Some(outcome);
}

/// Enemy and boss shells against the player. Every shell that lands is
/// marked, then the owner's collection is compacted in one pass.
fn resolve_hostile_fire(state: &mut Session, boss_active: bool) {
    let player = &mut state.player;
    for enemy in hostiles_mut(&mut state.enemies, &mut state.boss, boss_active) {
        let hits: Vec<usize> = enemy
            .bullets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.collides_with(&*player))
            .map(|(i, _)| i)
            .collect();
        for _ in &hits {
            player.take_damage(enemy.damage);
        }
        enemy.bullets = enemy
            .bullets
            .iter()
            .enumerate()
            .filter(|(i, b)| !hits.contains(i) && !b.is_off_screen())
            .map(|(_, b)| b.clone())
            .collect();
    }
}

/// Player shells against the wave, in collection order, then the boss.
/// The first live target a shell touches absorbs it.
fn resolve_player_fire(state: &mut Session, boss_active: bool) {
    let power = state.player.power;
    let mut used_bullets: Vec<usize> = Vec::new();

    for (bi, bullet) in state.player.bullets.iter().enumerate() {
        let target = state
            .enemies
            .iter_mut()
            .find(|e| e.is_alive() && bullet.collides_with(&**e));
        let target = match target {
            Some(enemy) => Some(enemy),
            None if boss_active && state.boss.is_alive() && bullet.collides_with(&state.boss) => {
                Some(&mut state.boss)
            }
            None => None,
        };
        if let Some(enemy) = target {
            if enemy.take_damage(power) {
                debug!("{:?} destroyed on frame {}", enemy.kind, state.frame);
            }
            used_bullets.push(bi);
        }
    }

    state.player.bullets = state
        .player
        .bullets
        .iter()
        .enumerate()
        .filter(|(i, b)| !used_bullets.contains(i) && !b.is_off_screen())
        .map(|(_, b)| b.clone())
        .collect();
}

fn resolve_landmines(state: &mut Session) {
    for mine in state.landmines.iter_mut() {
        if mine.is_armed() && mine.collides_with(&state.player) && mine.trigger() {
            state.player.take_damage(MINE_DAMAGE);
        }
    }
}

/// Drop removed enemies, do the scoring and countdown bookkeeping, and
/// spawn replacements (or bring in the boss once the countdown runs out).
fn compact_enemies(state: &mut Session, rng: &mut dyn RngCore) {
    let was_waiting = !state.boss_active();
    let mut replacements = 0;

    for enemy in state.enemies.iter().filter(|e| e.is_removed()) {
        state.player.score += SCORE_REMOVAL;
        if enemy.life == (LifeState::Removed { killed: true }) {
            state.player.score += SCORE_KILL;
            state.boss_countdown = state.boss_countdown.saturating_sub(1);
        }
        replacements += REPLACEMENTS_PER_REMOVAL;
    }
    state.enemies.retain(|e| !e.is_removed());

    if was_waiting && state.boss_active() {
        debug!("boss arrives on frame {}", state.frame);
        state.enemies.clear();
        return;
    }
    if state.boss_active() {
        return;
    }

    for _ in 0..replacements {
        if state.enemies.len() >= ENEMY_CAP {
            break;
        }
        state.enemies.push(spawn_enemy(rng));
    }
    while state.enemies.len() < state.enemy_floor.min(ENEMY_CAP) {
        state.enemies.push(spawn_enemy(rng));
    }
}

fn compact_landmines(state: &mut Session, rng: &mut dyn RngCore) {
    let cleared = state.landmines.iter().filter(|m| m.is_cleared()).count();
    if cleared == 0 {
        return;
    }
    state.landmines.retain(|m| !m.is_cleared());
    for _ in 0..cleared {
        state.player.score += SCORE_MINE;
        state.landmines.push(spawn_landmine(rng));
        if rng.gen_ratio(1, MINE_BONUS_ODDS) {
            state.landmines.push(spawn_landmine(rng));
        }
    }
}
