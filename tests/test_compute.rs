use tank_arcade::compute::*;
use tank_arcade::config::*;
use tank_arcade::entities::*;
use tank_arcade::menu::MenuAction;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A playing session with no enemies, no mines and no floor top-up, so each
/// test controls exactly what is on the field.
fn make_session() -> Session {
    let mut rng = seeded_rng();
    Session {
        phase: Phase::Playing,
        outcome: None,
        player: Player::new(TankClass::Defence),
        enemies: Vec::new(),
        boss: Enemy::boss(&mut rng),
        boss_countdown: BOSS_COUNTDOWN,
        landmines: Vec::new(),
        enemy_floor: 0,
        high_score: 0,
        frame: 0,
    }
}

/// Enemy parked in the top-left corner that will not fire during a test.
fn quiet_enemy(x: f32, y: f32) -> Enemy {
    let mut enemy = Enemy::tank(x, y, &mut seeded_rng());
    enemy.fire_cooldown = 10_000;
    enemy
}

fn enemy_shell_at(x: f32, y: f32) -> Bullet {
    Bullet::new(x, y, ENEMY_BULLET_SPEED, Heading::Down, Sprite::EnemyShell)
}

fn player_shell_at(x: f32, y: f32) -> Bullet {
    Bullet::new(x, y, PLAYER_BULLET_SPEED, Heading::Up, Sprite::PlayerShell)
}

fn run(state: &Session, frames: usize, rng: &mut StdRng) -> Session {
    let mut s = state.clone();
    for _ in 0..frames {
        s = tick(&s, &Input::default(), rng);
    }
    s
}

// ── new_session & menu transitions ────────────────────────────────────────────

#[test]
fn new_session_starts_on_menu_with_full_field() {
    let s = new_session(TankClass::Defence, 77, &mut seeded_rng());
    assert_eq!(s.phase, Phase::Menu);
    assert_eq!(s.enemies.len(), ENEMY_FLOOR);
    assert_eq!(s.landmines.len(), MINE_COUNT);
    assert_eq!(s.boss_countdown, BOSS_COUNTDOWN);
    assert_eq!(s.high_score, 77);
    assert_eq!(s.player.hp, DEFENCE_HP);
    assert_eq!((s.player.body.x, s.player.body.y), PLAYER_START);
    for enemy in &s.enemies {
        assert!(enemy.body.y <= -50.0 && enemy.body.y >= -200.0);
        assert!((0.0..=736.0).contains(&enemy.body.x));
    }
}

#[test]
fn select_class_swaps_stats() {
    let s = new_session(TankClass::Defence, 0, &mut seeded_rng());
    let s2 = select_class(&s, TankClass::Power);
    assert_eq!(s2.player.class, TankClass::Power);
    assert_eq!(s2.player.hp, POWER_HP);
    assert_eq!(s2.player.power, POWER_POWER);
    assert_eq!(s.player.class, TankClass::Defence);
}

#[test]
fn menu_actions_drive_the_phase_machine() {
    let mut rng = seeded_rng();
    let s = new_session(TankClass::Defence, 500, &mut rng);

    let s = apply_menu_action(&s, MenuAction::ResetHighScore, &mut rng);
    assert_eq!(s.high_score, 0);

    let s = apply_menu_action(&s, MenuAction::SelectPower, &mut rng);
    assert_eq!(s.player.class, TankClass::Power);

    // Home means nothing on the home screen
    let same = apply_menu_action(&s, MenuAction::Home, &mut rng);
    assert_eq!(same, s);

    let s = apply_menu_action(&s, MenuAction::Play, &mut rng);
    assert_eq!(s.phase, Phase::Playing);

    // Class cannot change mid-game
    let s2 = apply_menu_action(&s, MenuAction::SelectDefence, &mut rng);
    assert_eq!(s2.player.class, TankClass::Power);
}

#[test]
fn return_home_keeps_class_and_best_score() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    s.player = Player::new(TankClass::Power);
    s.phase = Phase::GameOver;
    s.high_score = 30;
    s.player.score = 120;

    let home = apply_menu_action(&s, MenuAction::Home, &mut rng);
    assert_eq!(home.phase, Phase::Menu);
    assert_eq!(home.high_score, 120);
    assert_eq!(home.player.class, TankClass::Power);
    assert_eq!(home.player.score, 0);
    assert_eq!(home.player.hp, POWER_HP);
}

#[test]
fn new_high_score_detection() {
    let mut s = make_session();
    s.high_score = 50;
    s.player.score = 50;
    assert!(is_new_high_score(&s));
    s.player.score = 49;
    assert!(!is_new_high_score(&s));
    s.high_score = 0;
    s.player.score = 0;
    assert!(!is_new_high_score(&s));
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn apply_input_sets_velocity() {
    let s = make_session();
    let s2 = apply_input(
        &s,
        &Input {
            left: true,
            down: true,
            ..Input::default()
        },
    );
    assert_eq!(s2.player.vx, -PLAYER_SPEED);
    assert_eq!(s2.player.vy, PLAYER_SPEED);

    // Opposite keys cancel out
    let s3 = apply_input(
        &s,
        &Input {
            left: true,
            right: true,
            ..Input::default()
        },
    );
    assert_eq!(s3.player.vx, 0.0);
}

#[test]
fn fire_spawns_shell_from_turret_centre() {
    let s = make_session();
    let s2 = player_shoot(&s);
    assert_eq!(s2.player.bullets.len(), 1);
    let b = &s2.player.bullets[0];
    assert_eq!(b.body.x, PLAYER_START.0 + TANK_SIZE.0 / 2.0 - BULLET_SIZE.0 / 2.0);
    assert_eq!(b.body.y, PLAYER_START.1);
    assert_eq!(b.heading, Heading::Up);
    assert!(s.player.bullets.is_empty());
}

#[test]
fn player_is_clamped_to_margins() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    let hold = Input {
        left: true,
        up: true,
        ..Input::default()
    };
    for _ in 0..300 {
        s = tick(&s, &hold, &mut rng);
        let r = s.player.body.rect();
        assert_eq!((r.x, r.y), (s.player.body.x, s.player.body.y));
        assert!(s.player.body.x >= PLAYER_MARGINS.0);
        assert!(s.player.body.y >= PLAYER_MARGINS.1);
    }
    assert_eq!(s.player.body.x, PLAYER_MARGINS.0);
    assert_eq!(s.player.body.y, PLAYER_MARGINS.1);

    let hold = Input {
        right: true,
        down: true,
        ..Input::default()
    };
    for _ in 0..300 {
        s = tick(&s, &hold, &mut rng);
    }
    assert_eq!(s.player.body.x, PLAYER_MARGINS.2);
    assert_eq!(s.player.body.y, PLAYER_MARGINS.3);
}

// ── tick: bookkeeping ─────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame_and_leaves_input_alone() {
    let s = make_session();
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.frame, 1);
    assert_eq!(s.frame, 0);
}

#[test]
fn tick_outside_playing_is_identity() {
    let mut s = make_session();
    s.phase = Phase::Menu;
    assert_eq!(tick(&s, &Input::default(), &mut seeded_rng()), s);
    s.phase = Phase::GameOver;
    assert_eq!(tick(&s, &Input::default(), &mut seeded_rng()), s);
}

#[test]
fn player_shell_moves_up_and_leaves_screen() {
    let mut s = make_session();
    s.player.bullets.push(player_shell_at(100.0, 50.0));
    s.player.bullets.push(player_shell_at(200.0, 5.0));
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    // 5 → -5 is off-screen; 50 → 40 is kept
    assert_eq!(s2.player.bullets.len(), 1);
    assert_eq!(s2.player.bullets[0].body.y, 40.0);
}

#[test]
fn floor_tops_up_the_wave() {
    let mut s = make_session();
    s.enemy_floor = ENEMY_FLOOR;
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.enemies.len(), ENEMY_FLOOR);
}

// ── tick: enemy fire vs player ────────────────────────────────────────────────

#[test]
fn enemy_shell_hit_costs_exactly_enemy_damage() {
    let mut s = make_session();
    let mut enemy = quiet_enemy(0.0, 0.0);
    enemy.bullets.push(enemy_shell_at(400.0, 480.0)); // moves to 487, into the tank
    s.enemies.push(enemy);

    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.player.hp, DEFENCE_HP - ENEMY_DAMAGE);
    assert!(s2.enemies[0].bullets.is_empty());
    assert_eq!(s2.phase, Phase::Playing);
}

#[test]
fn every_landing_shell_counts() {
    let mut s = make_session();
    let mut enemy = quiet_enemy(0.0, 0.0);
    enemy.bullets.push(enemy_shell_at(390.0, 480.0));
    enemy.bullets.push(enemy_shell_at(420.0, 490.0));
    enemy.bullets.push(enemy_shell_at(100.0, 100.0)); // miss
    s.enemies.push(enemy);

    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.player.hp, DEFENCE_HP - 2 * ENEMY_DAMAGE);
    assert_eq!(s2.enemies[0].bullets.len(), 1);
}

#[test]
fn enemy_shell_leaving_screen_is_dropped() {
    let mut s = make_session();
    let mut enemy = quiet_enemy(0.0, 0.0);
    enemy.bullets.push(enemy_shell_at(50.0, 598.0));
    s.enemies.push(enemy);
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert!(s2.enemies[0].bullets.is_empty());
    assert_eq!(s2.player.hp, DEFENCE_HP);
}

#[test]
fn defeat_fires_exactly_once_at_first_zero_hp_frame() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    s.player.hp = 12;
    s.enemies.push(quiet_enemy(0.0, 0.0));

    let mut transitions = Vec::new();
    for frame in 1..=10 {
        if s.phase == Phase::Playing {
            s.enemies[0].bullets.push(enemy_shell_at(400.0, 490.0));
        }
        let next = tick(&s, &Input::default(), &mut rng);
        if s.phase == Phase::Playing && next.phase == Phase::GameOver {
            transitions.push(frame);
        }
        s = next;
    }
    // 12 → 7 → 2 → 0
    assert_eq!(transitions, vec![3]);
    assert_eq!(s.player.hp, 0);
    assert_eq!(s.outcome, Some(Outcome::Defeated));
}

// ── tick: player fire vs enemies ──────────────────────────────────────────────

#[test]
fn lethal_shot_kills_then_removes_after_animation() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    let mut enemy = quiet_enemy(380.0, 300.0);
    enemy.health = s.player.power;
    s.enemies.push(enemy);
    s.player.bullets.push(player_shell_at(400.0, 370.0));

    let s = tick(&s, &Input::default(), &mut rng);
    assert_eq!(
        s.enemies[0].life,
        LifeState::Dying {
            frames_left: DEATH_FRAMES
        }
    );
    assert_eq!(s.enemies[0].health, 0);
    assert!(s.enemies[0].bullets.is_empty());
    assert!(s.player.bullets.is_empty());

    // A dying enemy neither moves nor fires
    let (x, y) = (s.enemies[0].body.x, s.enemies[0].body.y);
    let s = run(&s, DEATH_FRAMES as usize - 1, &mut rng);
    assert_eq!(s.enemies.len(), 1);
    assert!(s.enemies[0].is_dying());
    assert_eq!((s.enemies[0].body.x, s.enemies[0].body.y), (x, y));
    assert!(s.enemies[0].bullets.is_empty());
    assert_eq!(s.player.hp, DEFENCE_HP);

    // Final animation frame: removed, scored, two replacements
    let s = run(&s, 1, &mut rng);
    assert_eq!(s.enemies.len(), REPLACEMENTS_PER_REMOVAL);
    assert!(s.enemies.iter().all(|e| e.life == LifeState::Alive));
    assert_eq!(s.player.score, SCORE_REMOVAL + SCORE_KILL);
    assert_eq!(s.boss_countdown, BOSS_COUNTDOWN - 1);
}

#[test]
fn non_lethal_shot_only_wounds() {
    let mut s = make_session();
    s.enemies.push(quiet_enemy(380.0, 300.0));
    s.player.bullets.push(player_shell_at(400.0, 370.0));

    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.enemies[0].health, ENEMY_HEALTH - DEFENCE_POWER);
    assert_eq!(s2.enemies[0].life, LifeState::Alive);
    assert_eq!(s2.enemies[0].hit_flash, HIT_FLASH_FRAMES);
    assert!(s2.player.bullets.is_empty());
}

#[test]
fn shell_is_absorbed_by_first_enemy_in_order() {
    let mut s = make_session();
    // Two overlapping enemies; the one listed first takes the hit
    s.enemies.push(quiet_enemy(380.0, 300.0));
    s.enemies.push(quiet_enemy(385.0, 300.0));
    s.player.bullets.push(player_shell_at(400.0, 370.0));

    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.enemies[0].health, ENEMY_HEALTH - DEFENCE_POWER);
    assert_eq!(s2.enemies[1].health, ENEMY_HEALTH);
}

#[test]
fn simultaneous_kills_all_count() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    for x in [0.0, 200.0, 400.0] {
        let mut enemy = quiet_enemy(x, 300.0);
        enemy.health = 1;
        s.enemies.push(enemy);
        s.player.bullets.push(player_shell_at(x + 20.0, 370.0));
    }
    let s = tick(&s, &Input::default(), &mut rng);
    assert!(s.enemies.iter().all(|e| e.is_dying()));

    let s = run(&s, DEATH_FRAMES as usize, &mut rng);
    assert_eq!(s.boss_countdown, BOSS_COUNTDOWN - 3);
    assert_eq!(s.player.score, 3 * (SCORE_REMOVAL + SCORE_KILL));
    assert_eq!(s.enemies.len(), 3 * REPLACEMENTS_PER_REMOVAL);
}

#[test]
fn enemy_leaving_the_bottom_scores_removal_only() {
    let mut s = make_session();
    s.enemies.push(quiet_enemy(100.0, ENEMY_EXIT_Y - 0.25));
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.player.score, SCORE_REMOVAL);
    assert_eq!(s2.boss_countdown, BOSS_COUNTDOWN);
    assert_eq!(s2.enemies.len(), REPLACEMENTS_PER_REMOVAL);
}

#[test]
fn replacements_respect_the_cap() {
    let mut s = make_session();
    for i in 0..ENEMY_CAP {
        s.enemies.push(quiet_enemy(i as f32 * 10.0, -100.0));
    }
    s.enemies[0].body.y = ENEMY_EXIT_Y - 0.25;
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.enemies.len(), ENEMY_CAP);
}

// ── tick: boss ────────────────────────────────────────────────────────────────

#[test]
fn boss_arrives_when_countdown_runs_out() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    s.enemy_floor = ENEMY_FLOOR;
    s.boss_countdown = 1;
    let mut enemy = quiet_enemy(380.0, 300.0);
    enemy.health = 1;
    s.enemies.push(enemy);
    s.enemies.push(quiet_enemy(0.0, -150.0));
    s.player.bullets.push(player_shell_at(400.0, 370.0));

    let s = run(&s, 1 + DEATH_FRAMES as usize, &mut rng);
    assert!(s.boss_active());
    assert!(s.enemies.is_empty());

    // No more wave top-ups once the boss is here
    let s = run(&s, 5, &mut rng);
    assert!(s.enemies.is_empty());
}

#[test]
fn boss_patrols_at_fixed_height() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    s.boss_countdown = 0;
    s.boss.fire_cooldown = 10_000;
    let y = s.boss.body.y;
    let s = run(&s, 400, &mut rng);
    assert_eq!(s.boss.body.y, y);
    assert!(s.boss.body.x >= PATROL_MIN_X - BOSS_SPEED);
    assert!(s.boss.body.x <= PATROL_MAX_X + BOSS_SPEED);
}

#[test]
fn boss_shell_costs_boss_damage() {
    let mut s = make_session();
    s.boss_countdown = 0;
    s.boss.fire_cooldown = 10_000;
    s.boss
        .bullets
        .push(Bullet::new(400.0, 480.0, BOSS_BULLET_SPEED, Heading::Down, Sprite::Bomb));
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.player.hp, DEFENCE_HP - BOSS_DAMAGE);
    assert!(s2.boss.bullets.is_empty());
}

#[test]
fn defeating_the_boss_ends_the_run() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    s.boss_countdown = 0;
    s.boss.fire_cooldown = 10_000;
    s.boss.health = 1;
    s.player.bullets.push(player_shell_at(320.0, 110.0));

    let s = tick(&s, &Input::default(), &mut rng);
    assert!(s.boss.is_dying());
    assert_eq!(s.phase, Phase::Playing);

    let s = run(&s, DEATH_FRAMES as usize - 1, &mut rng);
    assert_eq!(s.phase, Phase::Playing);

    let s = run(&s, 1, &mut rng);
    assert_eq!(s.phase, Phase::GameOver);
    assert_eq!(s.outcome, Some(Outcome::BossDefeated));
    assert_eq!(s.player.score, SCORE_BOSS);
}

#[test]
fn inactive_boss_ignores_shells() {
    let mut s = make_session();
    s.player.bullets.push(player_shell_at(320.0, 110.0));
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.boss.health, BOSS_HEALTH);
    assert_eq!(s2.player.bullets.len(), 1);
}

// ── tick: landmines ───────────────────────────────────────────────────────────

#[test]
fn landmine_contact_damages_once_then_respawns() {
    let mut rng = seeded_rng();
    let mut s = make_session();
    s.landmines.push(Landmine::new(390.0, 510.0));

    let s = tick(&s, &Input::default(), &mut rng);
    assert_eq!(s.player.hp, DEFENCE_HP - MINE_DAMAGE);
    assert!(matches!(s.landmines[0].state, MineState::Exploding { .. }));
    let y = s.landmines[0].body.y;

    let s = run(&s, MINE_EXPLOSION_FRAMES as usize - 1, &mut rng);
    assert_eq!(s.player.hp, DEFENCE_HP - MINE_DAMAGE);
    assert_eq!(s.landmines[0].body.y, y);

    let s = run(&s, 1, &mut rng);
    assert_eq!(s.player.score, SCORE_MINE);
    assert!(!s.landmines.is_empty());
    assert!(s.landmines.iter().all(|m| m.is_armed()));
}

#[test]
fn landmine_drifting_off_is_replaced() {
    let mut s = make_session();
    s.landmines.push(Landmine::new(0.0, ENEMY_EXIT_Y));
    let s2 = tick(&s, &Input::default(), &mut seeded_rng());
    assert_eq!(s2.player.score, SCORE_MINE);
    assert!(s2.landmines.iter().all(|m| m.body.y < 0.0));
}
