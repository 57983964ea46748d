//! Canvas 2D scene drawing
//!
//! wasm32 only. Reads simulation state and paints one frame; nothing here
//! mutates the sim. Layering follows the frame order: backdrop, stars,
//! player, enemies, projectiles, power-ups, explosions, particles.

use std::borrow::Cow;
use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::*;
use crate::sim::{
    Enemy, EnemyKind, Explosion, GameState, Particle, Player, PowerUp, PowerUpKind, Projectile,
    ProjectileKind, Star, Tint, POWERUP_SIZE,
};

/// CSS color for a palette entry
fn css(tint: Tint) -> Cow<'static, str> {
    match tint {
        Tint::Cyan => "#00ffff".into(),
        Tint::Magenta => "#ff00ff".into(),
        Tint::Red => "#ff5555".into(),
        Tint::Green => "#55ff55".into(),
        Tint::Blue => "#5555ff".into(),
        Tint::Lime => "#00ff00".into(),
        Tint::Yellow => "#ffff00".into(),
        Tint::White => "#ffffff".into(),
        Tint::Hue(h) => format!("hsl({h}, 100%, 50%)").into(),
    }
}

/// Paint one full frame of the scene
pub fn draw_scene(ctx: &CanvasRenderingContext2d, state: &GameState) -> Result<(), JsValue> {
    ctx.set_fill_style_str("#000");
    ctx.fill_rect(0.0, 0.0, f64::from(GAME_WIDTH), f64::from(GAME_HEIGHT));

    for star in &state.stars {
        draw_star(ctx, star)?;
    }
    draw_player(ctx, &state.player)?;
    for enemy in &state.enemies {
        draw_enemy(ctx, enemy)?;
    }
    for shot in &state.projectiles {
        draw_projectile(ctx, shot)?;
    }
    for pickup in &state.power_ups {
        draw_power_up(ctx, pickup)?;
    }
    for blast in &state.explosions {
        draw_explosion(ctx, blast)?;
    }
    for fleck in &state.particles {
        draw_particle(ctx, fleck)?;
    }

    Ok(())
}

fn draw_star(ctx: &CanvasRenderingContext2d, star: &Star) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", star.opacity));
    ctx.begin_path();
    ctx.arc(
        f64::from(star.pos.x),
        f64::from(star.pos.y),
        f64::from(star.size),
        0.0,
        TAU,
    )?;
    ctx.fill();
    ctx.restore();
    Ok(())
}

fn draw_player(ctx: &CanvasRenderingContext2d, player: &Player) -> Result<(), JsValue> {
    let (x, y) = (f64::from(player.pos.x), f64::from(player.pos.y));
    let half = f64::from(PLAYER_SIZE) / 2.0;

    ctx.save();

    // Hull
    ctx.set_fill_style_str("#00ffff");
    ctx.begin_path();
    ctx.move_to(x, y - half);
    ctx.line_to(x + half, y + half);
    ctx.line_to(x - half, y + half);
    ctx.close_path();
    ctx.fill();

    // Cockpit
    ctx.set_fill_style_str("#ffffff");
    ctx.fill_rect(x - 5.0, y - 10.0, 10.0, 10.0);

    // Engine wash
    let glow = ctx.create_radial_gradient(x, y + half + 10.0, 0.0, x, y + half + 10.0, 20.0)?;
    glow.add_color_stop(0.0, "rgba(255, 100, 0, 0.8)")?;
    glow.add_color_stop(1.0, "rgba(255, 100, 0, 0)")?;
    ctx.set_fill_style_canvas_gradient(&glow);
    ctx.fill_rect(x - 20.0, y + half, 40.0, 20.0);

    if player.shield {
        let r = f64::from(SHIELD_RADIUS);
        ctx.set_stroke_style_str("rgba(0, 200, 255, 0.5)");
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.arc(x, y, r, 0.0, TAU)?;
        ctx.stroke();

        let halo = ctx.create_radial_gradient(x, y, r - 10.0, x, y, r)?;
        halo.add_color_stop(0.0, "rgba(0, 200, 255, 0.3)")?;
        halo.add_color_stop(1.0, "rgba(0, 200, 255, 0)")?;
        ctx.set_fill_style_canvas_gradient(&halo);
        ctx.begin_path();
        ctx.arc(x, y, r, 0.0, TAU)?;
        ctx.fill();
    }

    ctx.restore();
    Ok(())
}

fn draw_enemy(ctx: &CanvasRenderingContext2d, enemy: &Enemy) -> Result<(), JsValue> {
    let (x, y) = (f64::from(enemy.pos.x), f64::from(enemy.pos.y));
    let size = f64::from(enemy.kind.size());
    let half = size / 2.0;
    let hull = css(enemy.kind.tint());

    ctx.save();

    match enemy.kind {
        EnemyKind::Basic => {
            ctx.set_fill_style_str(&hull);
            ctx.begin_path();
            ctx.move_to(x, y + half);
            ctx.line_to(x + half, y - half);
            ctx.line_to(x - half, y - half);
            ctx.close_path();
            ctx.fill();

            ctx.set_fill_style_str("#000000");
            ctx.fill_rect(x - 5.0, y - 5.0, 10.0, 10.0);
        }
        EnemyKind::Fast => {
            ctx.set_fill_style_str(&hull);
            ctx.begin_path();
            ctx.ellipse(x, y, half, half, 0.0, 0.0, TAU)?;
            ctx.fill();

            ctx.set_fill_style_str("#000000");
            ctx.fill_rect(x - 4.0, y - 4.0, 8.0, 8.0);
        }
        EnemyKind::Tank => {
            ctx.set_fill_style_str(&hull);
            ctx.begin_path();
            ctx.round_rect_with_f64(x - half, y - half, size, size, 10.0)?;
            ctx.fill();

            ctx.set_fill_style_str("#000000");
            ctx.fill_rect(x - 8.0, y - 8.0, 16.0, 16.0);
        }
    }

    // Health bar appears once the hull has taken a hit
    if enemy.hits < enemy.kind.hits() {
        let percent = f64::from(enemy.hits) / f64::from(enemy.kind.hits());
        ctx.set_fill_style_str("red");
        ctx.fill_rect(x - half, y - half - 10.0, size, 3.0);
        ctx.set_fill_style_str("lime");
        ctx.fill_rect(x - half, y - half - 10.0, size * percent, 3.0);
    }

    // Engine wash
    let glow = ctx.create_radial_gradient(x, y + half + 5.0, 0.0, x, y + half + 5.0, 15.0)?;
    glow.add_color_stop(0.0, "rgba(255, 100, 0, 0.8)")?;
    glow.add_color_stop(1.0, "rgba(255, 100, 0, 0)")?;
    ctx.set_fill_style_canvas_gradient(&glow);
    ctx.fill_rect(x - 15.0, y + half, 30.0, 15.0);

    ctx.restore();
    Ok(())
}

fn draw_projectile(ctx: &CanvasRenderingContext2d, shot: &Projectile) -> Result<(), JsValue> {
    let (x, y) = (f64::from(shot.pos.x), f64::from(shot.pos.y));
    let r = f64::from(shot.radius);

    ctx.save();

    match shot.kind {
        ProjectileKind::Bolt => {
            let color = css(shot.tint);
            ctx.set_fill_style_str(&color);
            ctx.begin_path();
            ctx.arc(x, y, r, 0.0, TAU)?;
            ctx.fill();

            let glow = ctx.create_radial_gradient(x, y, 0.0, x, y, r * 2.0)?;
            glow.add_color_stop(0.0, &color)?;
            glow.add_color_stop(1.0, "rgba(0,0,0,0)")?;
            ctx.set_fill_style_canvas_gradient(&glow);
            ctx.begin_path();
            ctx.arc(x, y, r * 2.0, 0.0, TAU)?;
            ctx.fill();
        }
        ProjectileKind::Beam => {
            let gradient = ctx.create_linear_gradient(x, y - 10.0, x, y + 10.0);
            gradient.add_color_stop(0.0, "#ff00ff")?;
            gradient.add_color_stop(0.5, "#ffffff")?;
            gradient.add_color_stop(1.0, "#00ffff")?;
            ctx.set_stroke_style_canvas_gradient(&gradient);
            ctx.set_line_width(r);
            ctx.begin_path();
            ctx.move_to(x, y);
            ctx.line_to(x, y - 30.0);
            ctx.stroke();

            let glow = ctx.create_radial_gradient(x, y, 0.0, x, y, r * 3.0)?;
            glow.add_color_stop(0.0, "rgba(255, 0, 255, 0.8)")?;
            glow.add_color_stop(1.0, "rgba(255, 0, 255, 0)")?;
            ctx.set_fill_style_canvas_gradient(&glow);
            ctx.begin_path();
            ctx.arc(x, y, r * 3.0, 0.0, TAU)?;
            ctx.fill();
        }
    }

    ctx.restore();
    Ok(())
}

fn draw_power_up(ctx: &CanvasRenderingContext2d, pickup: &PowerUp) -> Result<(), JsValue> {
    let size = f64::from(POWERUP_SIZE);
    let half = size / 2.0;
    let color = css(pickup.kind.tint());

    ctx.save();
    ctx.translate(f64::from(pickup.pos.x), f64::from(pickup.pos.y))?;
    ctx.rotate(f64::from(pickup.rotation))?;

    match pickup.kind {
        PowerUpKind::Health => {
            ctx.set_fill_style_str(&color);
            ctx.begin_path();
            ctx.move_to(0.0, -half);
            ctx.line_to(half, half);
            ctx.line_to(-half, half);
            ctx.close_path();
            ctx.fill();
        }
        PowerUpKind::Double => {
            ctx.set_fill_style_str(&color);
            ctx.fill_rect(-size / 4.0, -half, half, size);
            ctx.fill_rect(-half, -size / 4.0, size, half);
        }
        PowerUpKind::Laser => {
            ctx.set_fill_style_str(&color);
            ctx.begin_path();
            ctx.move_to(0.0, -half);
            ctx.line_to(half, 0.0);
            ctx.line_to(0.0, half);
            ctx.line_to(-half, 0.0);
            ctx.close_path();
            ctx.fill();
        }
        PowerUpKind::Shield => {
            ctx.set_stroke_style_str(&color);
            ctx.set_line_width(3.0);
            ctx.begin_path();
            ctx.arc(0.0, 0.0, half, 0.0, TAU)?;
            ctx.stroke();
        }
    }

    let glow = ctx.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, size)?;
    glow.add_color_stop(0.0, &format!("{color}cc"))?;
    glow.add_color_stop(1.0, &format!("{color}00"))?;
    ctx.set_fill_style_canvas_gradient(&glow);
    ctx.begin_path();
    ctx.arc(0.0, 0.0, size, 0.0, TAU)?;
    ctx.fill();

    ctx.restore();
    Ok(())
}

fn draw_explosion(ctx: &CanvasRenderingContext2d, blast: &Explosion) -> Result<(), JsValue> {
    let (x, y) = (f64::from(blast.pos.x), f64::from(blast.pos.y));
    let radius = f64::from(blast.radius());

    ctx.save();
    let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, radius)?;
    gradient.add_color_stop(0.0, &css(blast.tint))?;
    gradient.add_color_stop(1.0, "rgba(0,0,0,0)")?;
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.set_global_alpha(f64::from(1.0 - blast.progress()));
    ctx.begin_path();
    ctx.arc(x, y, radius, 0.0, TAU)?;
    ctx.fill();
    ctx.restore();
    Ok(())
}

fn draw_particle(ctx: &CanvasRenderingContext2d, fleck: &Particle) -> Result<(), JsValue> {
    let fade = f64::from(fleck.fade());

    ctx.save();
    ctx.set_fill_style_str(&css(fleck.tint));
    ctx.set_global_alpha(fade);
    ctx.begin_path();
    ctx.arc(
        f64::from(fleck.pos.x),
        f64::from(fleck.pos.y),
        f64::from(fleck.size) * fade,
        0.0,
        TAU,
    )?;
    ctx.fill();
    ctx.restore();
    Ok(())
}
