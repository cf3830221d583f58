/// Rendering layer: all terminal I/O for the game lives here.
///
/// Each function receives a mutable writer, the playfield viewport and an
/// immutable view of the session.  No game logic is performed; this module
/// only translates state into terminal commands.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use tank_arcade::compute::is_new_high_score;
use tank_arcade::config::{FIELD_HEIGHT, FIELD_WIDTH};
use tank_arcade::entities::{
    Body, Enemy, EnemyKind, Landmine, LifeState, MineState, Outcome, Phase, Session, Sprite,
    TankClass,
};
use tank_arcade::geometry::Rect;
use tank_arcade::menu::{Button, MenuAction, GAME_OVER_BUTTONS, HOME_BUTTONS};
use tank_arcade::viewport::Viewport;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HP: Color = Color::Red;
const C_HUD_SCORE: Color = Color::Blue;
const C_HUD_BEST: Color = Color::Yellow;
const C_DEFENCE: Color = Color::Green;
const C_POWER: Color = Color::Blue;
const C_ENEMY: Color = Color::Red;
const C_BOSS: Color = Color::Magenta;
const C_SHELL_PLAYER: Color = Color::Cyan;
const C_SHELL_ENEMY: Color = Color::Magenta;
const C_BOMB: Color = Color::Yellow;
const C_MINE: Color = Color::DarkYellow;
const C_EXPLOSION: Color = Color::Yellow;
const C_BAR_FILL: Color = Color::Red;
const C_BAR_EMPTY: Color = Color::DarkGrey;
const C_BUTTON: Color = Color::DarkGreen;
const C_SELECTED: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Playfield area inside the border: row 0 is the HUD, row 1 the top
/// border, the last two rows the bottom border and the controls hint.
pub fn playfield_viewport(width: u16, height: u16) -> Viewport {
    Viewport::new(
        1,
        2,
        width.saturating_sub(2),
        height.saturating_sub(4),
        FIELD_WIDTH,
        FIELD_HEIGHT,
    )
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &Session, vp: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, vp)?;
    match state.phase {
        Phase::Menu => draw_menu(out, state, vp)?,
        Phase::Playing => {
            draw_hud(out, state, vp)?;
            draw_field(out, state, vp)?;
        }
        Phase::GameOver => draw_game_over(out, state, vp)?,
    }
    draw_controls_hint(out, state, vp)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.row + vp.rows + 1))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let inner = vp.cols as usize;
    let top = vp.row - 1;
    let bottom = vp.row + vp.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(vp.col - 1, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    out.queue(cursor::MoveTo(vp.col - 1, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for row in vp.row..bottom {
        out.queue(cursor::MoveTo(vp.col - 1, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.col + vp.cols, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &Session, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.player.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_BEST))?;
    out.queue(Print(format!("  Best:{:>6}", state.high_score)))?;

    let boss_tag = if state.boss_active() {
        "[ BOSS ]".to_string()
    } else {
        format!("[ boss in {} ]", state.boss_countdown)
    };
    let bx = (vp.cols / 2).saturating_sub(boss_tag.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(C_BOSS))?;
    out.queue(Print(&boss_tag))?;

    let hp = format!("HP: {}", state.player.hp.max(0));
    let hx = (vp.cols + 1).saturating_sub(hp.chars().count() as u16);
    out.queue(cursor::MoveTo(hx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(&hp))?;
    Ok(())
}

// ── Playfield ─────────────────────────────────────────────────────────────────

fn draw_field<W: Write>(out: &mut W, state: &Session, vp: &Viewport) -> std::io::Result<()> {
    for mine in &state.landmines {
        draw_landmine(out, mine, vp)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, enemy, vp)?;
    }
    if state.boss_active() {
        draw_enemy(out, &state.boss, vp)?;
    }
    for bullet in &state.player.bullets {
        draw_body(out, &bullet.body, vp)?;
    }
    draw_body(out, &state.player.body, vp)?;
    Ok(())
}

fn sprite_look(sprite: Sprite) -> (&'static str, Color) {
    match sprite {
        Sprite::PlayerTank(TankClass::Defence) => ("█", C_DEFENCE),
        Sprite::PlayerTank(TankClass::Power) => ("█", C_POWER),
        Sprite::EnemyTank => ("▓", C_ENEMY),
        Sprite::BossJet => ("▼", C_BOSS),
        Sprite::PlayerShell => ("║", C_SHELL_PLAYER),
        Sprite::EnemyShell => ("↓", C_SHELL_ENEMY),
        Sprite::Bomb => ("●", C_BOMB),
        Sprite::Mine => ("◆", C_MINE),
    }
}

fn on_field(rect: &Rect) -> bool {
    rect.right() > 0.0 && rect.bottom() > 0.0 && rect.x < FIELD_WIDTH && rect.y < FIELD_HEIGHT
}

/// Fill every cell a rectangle covers with `glyph`.
fn fill_rect<W: Write>(
    out: &mut W,
    rect: &Rect,
    glyph: &str,
    color: Color,
    vp: &Viewport,
) -> std::io::Result<()> {
    if !on_field(rect) {
        return Ok(());
    }
    let (c0, r0) = vp.to_cell(rect.x.max(0.0), rect.y.max(0.0));
    let (c1, r1) = vp.to_cell(
        rect.right().min(FIELD_WIDTH) - 0.01,
        rect.bottom().min(FIELD_HEIGHT) - 0.01,
    );
    let line = glyph.repeat((c1 - c0 + 1) as usize);
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_body<W: Write>(out: &mut W, body: &Body, vp: &Viewport) -> std::io::Result<()> {
    let (glyph, color) = sprite_look(body.sprite);
    fill_rect(out, &body.rect(), glyph, color, vp)
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, vp: &Viewport) -> std::io::Result<()> {
    match enemy.life {
        LifeState::Alive => {
            draw_body(out, &enemy.body, vp)?;
            draw_health_bar(out, enemy, vp)?;
        }
        // Big explosion in place of the wreck
        LifeState::Dying { .. } => {
            fill_rect(out, &enemy.body.rect(), "✹", C_EXPLOSION, vp)?;
        }
        LifeState::Removed { .. } => return Ok(()),
    }

    // Small explosion where the last shell landed
    if enemy.hit_flash > 0 && on_field(&enemy.body.rect()) {
        let (c, r) = vp.to_cell(enemy.body.centre_x(), enemy.body.y.max(0.0));
        out.queue(cursor::MoveTo(c, r))?;
        out.queue(style::SetForegroundColor(C_EXPLOSION))?;
        out.queue(Print("*"))?;
    }

    for bullet in &enemy.bullets {
        draw_body(out, &bullet.body, vp)?;
    }
    Ok(())
}

fn draw_health_bar<W: Write>(out: &mut W, enemy: &Enemy, vp: &Viewport) -> std::io::Result<()> {
    let rect = enemy.body.rect();
    // The bar sits on the row above the sprite; skip it at the top edge.
    if !on_field(&rect) || rect.y <= 0.0 {
        return Ok(());
    }
    let (c, r) = vp.to_cell(rect.x.max(0.0), rect.y);
    if r <= vp.row {
        return Ok(());
    }
    let width = match enemy.kind {
        EnemyKind::Tank => vp.span_cols(rect.w),
        EnemyKind::Boss => vp.span_cols(rect.w) * 2,
    };
    let filled = (width as f32 * enemy.health_ratio()).round() as usize;
    out.queue(cursor::MoveTo(c, r - 1))?;
    out.queue(style::SetForegroundColor(C_BAR_FILL))?;
    out.queue(Print("▬".repeat(filled)))?;
    out.queue(style::SetForegroundColor(C_BAR_EMPTY))?;
    out.queue(Print("▬".repeat(width as usize - filled)))?;
    Ok(())
}

fn draw_landmine<W: Write>(out: &mut W, mine: &Landmine, vp: &Viewport) -> std::io::Result<()> {
    match mine.state {
        MineState::Armed => draw_body(out, &mine.body, vp),
        MineState::Exploding { .. } => fill_rect(out, &mine.body.rect(), "✺", C_EXPLOSION, vp),
        MineState::Spent => Ok(()),
    }
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn draw_text_centered<W: Write>(
    out: &mut W,
    text: &str,
    y: f32,
    color: Color,
    vp: &Viewport,
) -> std::io::Result<()> {
    let (cx, row) = vp.to_cell(FIELD_WIDTH / 2.0, y);
    let col = cx.saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_button<W: Write>(
    out: &mut W,
    button: &Button,
    color: Color,
    vp: &Viewport,
) -> std::io::Result<()> {
    let rect = button.rect;
    let (c0, r0) = vp.to_cell(rect.x, rect.y);
    let (c1, r1) = vp.to_cell(rect.right() - 0.01, rect.bottom() - 0.01);
    let inner = c1.saturating_sub(c0).saturating_sub(1) as usize;

    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(c0, r0))?;
    out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
    for row in r0 + 1..r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(format!("║{}║", " ".repeat(inner))))?;
    }
    if r1 > r0 {
        out.queue(cursor::MoveTo(c0, r1))?;
        out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;
    }

    let label_col = (c0 + c1) / 2 - (button.label.chars().count() as u16 / 2).min((c1 - c0) / 2);
    let label_row = if r1 > r0 + 1 { r0 + 1 } else { r0 };
    out.queue(cursor::MoveTo(label_col, label_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(button.label))?;
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, state: &Session, vp: &Viewport) -> std::io::Result<()> {
    draw_text_centered(out, "★  TANK  GAME  ★", 50.0, Color::Cyan, vp)?;
    let best = format!("High Score: {}", state.high_score);
    draw_text_centered(out, &best, 120.0, Color::Red, vp)?;

    for button in &HOME_BUTTONS {
        let color = match button.action {
            MenuAction::SelectPower if state.player.class == TankClass::Power => C_SELECTED,
            MenuAction::SelectDefence if state.player.class == TankClass::Defence => C_SELECTED,
            MenuAction::SelectPower => C_POWER,
            MenuAction::SelectDefence => C_DEFENCE,
            _ => C_BUTTON,
        };
        draw_button(out, button, color, vp)?;

        // Tank preview in the middle of each class box
        let preview = match button.action {
            MenuAction::SelectPower => Some(TankClass::Power),
            MenuAction::SelectDefence => Some(TankClass::Defence),
            _ => None,
        };
        if let Some(class) = preview {
            let (hp, power) = class.stats();
            let r = button.rect;
            let tank = Rect::new(r.x + r.w / 2.0 - 24.0, r.y + r.h / 2.0 - 24.0, 48.0, 48.0);
            let (glyph, color) = sprite_look(Sprite::PlayerTank(class));
            fill_rect(out, &tank, glyph, color, vp)?;
            let stats = format!("HP {} / ATK {}", hp, power);
            let (c, row) = vp.to_cell(r.x + r.w / 2.0, r.bottom() - 20.0);
            out.queue(cursor::MoveTo(c.saturating_sub(stats.len() as u16 / 2), row))?;
            out.queue(style::SetForegroundColor(Color::White))?;
            out.queue(Print(stats))?;
        }
    }
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, state: &Session, vp: &Viewport) -> std::io::Result<()> {
    draw_text_centered(out, "╔════════════════════╗", 100.0, Color::Red, vp)?;
    draw_text_centered(out, "║    GAME  OVER      ║", 120.0, Color::Red, vp)?;
    draw_text_centered(out, "╚════════════════════╝", 140.0, Color::Red, vp)?;

    if state.outcome == Some(Outcome::BossDefeated) {
        draw_text_centered(out, "Boss defeated!", 200.0, Color::Green, vp)?;
    }
    if is_new_high_score(state) {
        draw_text_centered(out, "Wow you scored highest", 250.0, Color::Yellow, vp)?;
    }
    let score = format!("Your Score: {}", state.player.score);
    draw_text_centered(out, &score, 300.0, Color::Red, vp)?;

    for button in &GAME_OVER_BUTTONS {
        draw_button(out, button, C_ENEMY, vp)?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &Session, vp: &Viewport) -> std::io::Result<()> {
    let hint = match state.phase {
        Phase::Menu => "ENTER : Play   R : Reset best   1 : Power   2 : Defence   Q : Quit",
        Phase::Playing => "← ↑ → ↓ / WASD : Move   SPACE : Fire   Q : Quit",
        Phase::GameOver => "H / ENTER : Home   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, vp.row + vp.rows + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
