use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::appearance::{BirdAppearance, Sprite};
use crate::bird::Bird;
use crate::game::{GameLoop, Mode};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const NOTICE: Rgb = Rgb(200, 50, 40);
const LETTERBOX: Rgb = Rgb(12, 12, 16);

// ── Draw surface ────────────────────────────────────────────────────────────

/// A fixed-size grid of pixels that accepts draw commands.
pub trait DrawSurface {
    fn size(&self) -> (usize, usize);
    fn set(&mut self, x: i32, y: i32, c: Rgb);
    fn get(&self, x: usize, y: usize) -> Rgb;

    fn clear(&mut self, c: Rgb) {
        let (w, h) = self.size();
        self.fill_rect(0, 0, w as i32, h as i32, c);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }
}

/// Pixel buffer shown two pixels per terminal cell with half-block characters.
pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

impl DrawSurface for PixelBuf {
    fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── World → surface mapping ─────────────────────────────────────────────────

/// Uniform scale of the world canvas into the surface, centered with letterboxing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub ox: f64,
    pub oy: f64,
    world_w: f64,
    world_h: f64,
}

impl Viewport {
    pub fn fit(world_w: f64, world_h: f64, surface_w: usize, surface_h: usize) -> Self {
        let scale = (surface_w as f64 / world_w).min(surface_h as f64 / world_h);
        Self {
            scale,
            ox: ((surface_w as f64 - world_w * scale) / 2.0).floor(),
            oy: ((surface_h as f64 - world_h * scale) / 2.0).floor(),
            world_w,
            world_h,
        }
    }

    pub fn x(&self, wx: f64) -> i32 {
        (self.ox + wx * self.scale).round() as i32
    }

    pub fn y(&self, wy: f64) -> i32 {
        (self.oy + wy * self.scale).round() as i32
    }

    /// Surface rectangle `(x, y, w, h)` covering a world rectangle. Edges are mapped
    /// separately so adjacent world rectangles stay adjacent on the surface.
    pub fn rect(&self, x: f64, y: f64, w: f64, h: f64) -> (i32, i32, i32, i32) {
        let (x0, y0) = (self.x(x), self.y(y));
        let (x1, y1) = (self.x(x + w), self.y(y + h));
        (x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }

    /// Size of one glyph pixel for text meant to look `world_px` tall per glyph pixel.
    fn glyph_px(&self, world_px: f64) -> i32 {
        ((world_px * self.scale).round() as i32).max(1)
    }

    fn letterbox(&self, buf: &mut impl DrawSurface) {
        let (sw, sh) = buf.size();
        let (x, y, w, h) = self.rect(0.0, 0.0, self.world_w, self.world_h);
        buf.fill_rect(0, 0, x, sh as i32, LETTERBOX);
        buf.fill_rect(x + w, 0, sw as i32 - (x + w), sh as i32, LETTERBOX);
        buf.fill_rect(0, 0, sw as i32, y, LETTERBOX);
        buf.fill_rect(0, y + h, sw as i32, sh as i32 - (y + h), LETTERBOX);
    }
}

// ── 3x5 bitmap glyphs ───────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // M
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 1,1,0, 0,1,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,1,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGITS[ch as usize - '0' as usize]),
        'A'..='Z' => Some(&LETTERS[ch as usize - 'A' as usize]),
        'a'..='z' => Some(&LETTERS[ch as usize - 'a' as usize]),
        _ => None,
    }
}

fn draw_glyph(buf: &mut impl DrawSurface, x: i32, y: i32, g: &[u8; 15], px: i32, c: Rgb) {
    for row in 0..5 {
        for col in 0..3 {
            if g[row * 3 + col] == 1 {
                buf.fill_rect(x + col as i32 * px, y + row as i32 * px, px, px, c);
            }
        }
    }
}

/// Draws `text` horizontally centered on `cx`. Unknown characters leave a blank cell.
pub fn draw_text(buf: &mut impl DrawSurface, cx: i32, y: i32, text: &str, px: i32, fg: Rgb) {
    let advance = 4 * px; // 3 glyph pixels + 1 spacing
    let total_w = text.chars().count() as i32 * advance - px;
    let start_x = cx - total_w / 2;
    // Shadow pass, then the glyphs on top
    for (dx, c) in [(1, SHADOW), (0, fg)] {
        for (i, ch) in text.chars().enumerate() {
            if let Some(g) = glyph(ch) {
                draw_glyph(buf, start_x + i as i32 * advance + dx, y + dx, g, px, c);
            }
        }
    }
}

pub fn draw_number(buf: &mut impl DrawSurface, cx: i32, y: i32, n: u32, px: i32, fg: Rgb) {
    draw_text(buf, cx, y, &n.to_string(), px, fg);
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Paints one frame: background, pipes, ground, bird and the overlay for the
/// current mode. `notice` is a short message shown along the bottom edge.
pub fn draw_scene<R: rand::Rng>(
    game: &GameLoop<R>,
    buf: &mut impl DrawSurface,
    appearance: &dyn BirdAppearance,
    notice: Option<&str>,
) {
    let (sw, sh) = buf.size();
    if sw == 0 || sh == 0 {
        return;
    }
    let config = game.config();
    let vp = Viewport::fit(config.canvas_width, config.canvas_height, sw, sh);

    buf.clear(LETTERBOX);
    draw_sky(game, buf, &vp);
    draw_pipes(game, buf, &vp);
    draw_ground(game, buf, &vp);

    let bird = game.bird();
    match appearance.face() {
        Some(face) => draw_face(buf, &vp, bird, game.idle_bob(), face),
        None => draw_default_bird(buf, &vp, bird, game.idle_bob(), game.frame()),
    }

    vp.letterbox(buf);

    match game.mode() {
        Mode::Start => draw_title(game, buf, &vp),
        Mode::Playing => {
            let px = vp.glyph_px(6.0);
            draw_number(buf, vp.x(config.canvas_width / 2.0), vp.y(30.0), game.score(), px, WHITE);
        }
        Mode::GameOver => draw_game_over(game, buf, &vp),
    }

    if let Some(msg) = notice {
        let px = vp.glyph_px(3.0);
        let bar_h = 7 * px;
        let (x, y, w, h) = vp.rect(0.0, 0.0, config.canvas_width, config.canvas_height);
        buf.fill_rect(x, y + h - bar_h, w, bar_h, NOTICE);
        draw_text(buf, x + w / 2, y + h - bar_h + px, msg, px, WHITE);
    }
}

fn draw_sky<R: rand::Rng>(game: &GameLoop<R>, buf: &mut impl DrawSurface, vp: &Viewport) {
    let config = game.config();
    let (x, y0, w, h) = vp.rect(0.0, 0.0, config.canvas_width, config.ground_y());
    for dy in 0..h {
        let t = (dy as u32 * 256 / h.max(1) as u32) as u16;
        buf.fill_rect(x, y0 + dy, w, 1, Rgb::lerp(SKY_TOP, SKY_BOT, t));
    }
}

fn draw_ground<R: rand::Rng>(game: &GameLoop<R>, buf: &mut impl DrawSurface, vp: &Viewport) {
    let config = game.config();
    let ground_y = config.ground_y();
    let (x0, gy, w, _) = vp.rect(0.0, ground_y, config.canvas_width, 0.0);
    let (_, _, _, grass_h) = vp.rect(0.0, ground_y, 0.0, 10.0);
    let grass_h = grass_h.max(1);
    let bottom = vp.y(config.canvas_height);
    let scroll = game.ground_offset() * vp.scale;

    for x in x0..x0 + w {
        let alt = ((x as f64 + scroll) as i32 / 3) % 2 == 0;
        buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
        for y in gy + 1..gy + grass_h {
            buf.set(x, y, GRASS);
        }
    }
    for y in gy + grass_h..bottom {
        for x in x0..x0 + w {
            let stripe = ((x as f64 + scroll * 0.8) as i32 + (y - gy) * 2).rem_euclid(12) < 6;
            buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
}

fn draw_pipes<R: rand::Rng>(game: &GameLoop<R>, buf: &mut impl DrawSurface, vp: &Viewport) {
    const CAP_H: f64 = 30.0;
    const CAP_EXTRA: f64 = 5.0;
    let ground_y = game.config().ground_y();

    for pipe in game.pipes() {
        let gap_top = pipe.gap_top();
        let gap_bot = pipe.gap_bottom();

        // Bodies
        let (px, top_y, pw, top_h) = vp.rect(pipe.x, 0.0, pipe.width, gap_top - CAP_H);
        let (_, bot_y, _, bot_h) = vp.rect(pipe.x, gap_bot + CAP_H, pipe.width, ground_y - gap_bot - CAP_H);
        for x in 0..pw {
            let c = pipe_shade(x, pw);
            buf.fill_rect(px + x, top_y, 1, top_h, c);
            buf.fill_rect(px + x, bot_y, 1, bot_h, c);
        }

        // Caps
        let cap_x = pipe.x - CAP_EXTRA;
        let cap_w = pipe.width + CAP_EXTRA * 2.0;
        for cap_y in [gap_top - CAP_H, gap_bot] {
            let (cx, cy, cw, ch) = vp.rect(cap_x, cap_y, cap_w, CAP_H);
            for x in 0..cw {
                buf.fill_rect(cx + x, cy, 1, ch, pipe_shade(x, cw));
            }
            // Cap edge darkening
            buf.fill_rect(cx, cy, cw, 1, CAP_DARK);
            buf.fill_rect(cx, cy + ch - 1, cw, 1, CAP_DARK);
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

fn draw_default_bird(buf: &mut impl DrawSurface, vp: &Viewport, bird: &Bird, bob: f64, frame: u64) {
    let cx = vp.x(bird.x + bird.width / 2.0);
    let cy = vp.y(bird.y + bird.height / 2.0 + bob);
    // one unit of `s` is a sixth of the bird's on-screen width
    let s = bird.width * vp.scale / 6.0;

    // Nose up/down shifts the beak, wing and tail by a pixel
    let tilt = (bird.rotation / 30.0).clamp(-1.0, 1.0) as i32;

    // Body core
    let bw = (3.0 * s).max(2.0) as i32;
    let bh = (2.0 * s).max(2.0) as i32;
    buf.fill_rect(cx - bw, cy - bh, bw * 2 + 1, bh * 2, BIRD_Y);

    // Highlight (top of body)
    buf.fill_rect(cx - bw + 1, cy - bh, bw * 2 - 2, ((s * 0.8) as i32).max(1), BIRD_HI);

    // Wing
    let wing_y_off = if frame % 8 < 4 { -1 } else { 1 };
    let wing_h = (1.5 * s).max(1.0) as i32;
    let wing_w = (2.0 * s).max(1.0) as i32;
    buf.fill_rect(cx - bw + 1, cy + wing_y_off + tilt, wing_w, wing_h, BIRD_WING);

    // Eye
    let ex = cx + bw - (1.5 * s) as i32;
    let ey = cy - bh + (1.0 * s).max(1.0) as i32;
    let eye_r = (0.8 * s).max(1.0) as i32;
    buf.fill_rect(ex, ey, eye_r + 1, eye_r + 1, BIRD_EYE);
    buf.set(ex + eye_r, ey + eye_r, BIRD_PUPIL);
    if s >= 1.5 {
        buf.set(ex + eye_r - 1, ey + eye_r, BIRD_PUPIL);
    }

    // Beak
    let beak_x = cx + bw;
    let beak_y = cy - (0.5 * s) as i32 + tilt;
    let beak_w = (2.5 * s).max(2.0) as i32;
    let beak_h = (1.5 * s).max(1.0) as i32;
    buf.fill_rect(beak_x, beak_y, beak_w, beak_h / 2 + 1, BIRD_BEAK_HI);
    buf.fill_rect(beak_x, beak_y + beak_h / 2 + 1, beak_w, beak_h / 2, BIRD_BEAK);

    // Tail
    let tail_w = (1.5 * s).max(1.0) as i32;
    buf.fill_rect(cx - bw - tail_w, cy - 1 - tilt, tail_w, 2, BIRD_WING);
}

/// Degrees.
const MAX_FACE_SHEAR: f64 = 45.0;

/// Blits the face scaled into the bird's box, sheared by its rotation.
fn draw_face(buf: &mut impl DrawSurface, vp: &Viewport, bird: &Bird, bob: f64, face: &Sprite) {
    let (x0, y0, w, h) = vp.rect(bird.x, bird.y + bob, bird.width, bird.height);
    if w == 0 || h == 0 || face.width == 0 || face.height == 0 {
        return;
    }
    // steeper shears smear the face off its box
    let slope = bird.rotation.clamp(-MAX_FACE_SHEAR, MAX_FACE_SHEAR).to_radians().tan();
    let half_w = w as f64 / 2.0;
    for dx in 0..w {
        let shift = ((dx as f64 - half_w) * slope).round() as i32;
        let sx = dx as usize * face.width / w as usize;
        for dy in 0..h {
            let sy = dy as usize * face.height / h as usize;
            if let Some(c) = face.pixel(sx, sy) {
                buf.set(x0.saturating_add(dx), y0.saturating_add(dy).saturating_add(shift), c);
            }
        }
    }
}

fn draw_title<R: rand::Rng>(game: &GameLoop<R>, buf: &mut impl DrawSurface, vp: &Viewport) {
    let config = game.config();
    let cx = vp.x(config.canvas_width / 2.0);
    let big = vp.glyph_px(8.0);
    let small = vp.glyph_px(3.0);

    let title_y = vp.y(config.canvas_height / 5.0);
    draw_text(buf, cx, title_y, "FLAPPY", big, BIRD_Y);
    draw_text(buf, cx, title_y + 7 * big, "SPACE TO FLAP", small, WHITE);

    if game.best_score() > 0 {
        let y = vp.y(config.canvas_height * 0.7);
        draw_text(buf, cx, y, "BEST", small, WHITE);
        draw_number(buf, cx, y + 7 * small, game.best_score(), small, BIRD_Y);
    }
}

fn draw_game_over<R: rand::Rng>(game: &GameLoop<R>, buf: &mut impl DrawSurface, vp: &Viewport) {
    let config = game.config();

    // Dark overlay
    let (sw, sh) = buf.size();
    for y in 0..sh {
        for x in 0..sw {
            let c = buf.get(x, y);
            buf.set(x as i32, y as i32, c.dim());
        }
    }

    let px = vp.glyph_px(4.0);
    let (x, y, w, h) = vp.rect(
        config.canvas_width * 0.15,
        config.canvas_height * 0.3,
        config.canvas_width * 0.7,
        config.canvas_height * 0.35,
    );
    buf.fill_rect(x - 1, y - 1, w + 2, h + 2, SHADOW);
    buf.fill_rect(x, y, w, h, DIRT);
    buf.fill_rect(x + 1, y + 1, w - 2, h - 2, Rgb(220, 195, 120));

    let cx = x + w / 2;
    let line = 7 * px;
    let mut ty = y + px * 2;
    draw_text(buf, cx, ty, "GAME OVER", px, NOTICE);
    ty += line + px;
    draw_number(buf, cx, ty, game.score(), px, WHITE);
    ty += line;
    draw_text(buf, cx, ty, "BEST", px, WHITE);
    ty += line;
    draw_number(buf, cx, ty, game.best_score(), px, BIRD_Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::DefaultBird;
    use crate::config::GameConfig;
    use crate::game::Input;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn game() -> GameLoop<ChaCha8Rng> {
        GameLoop::with_rng(GameConfig::classic(), ChaCha8Rng::seed_from_u64(1))
    }

    #[test]
    fn hex_colors() {
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb(255, 128, 0)));
        assert_eq!(Rgb::from_hex("0a0B0c"), Some(Rgb(10, 11, 12)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn viewport_letterboxes_wide_surfaces() {
        // 320x480 into 200x120: height bound, scale 0.25 -> 80 wide, centered
        let vp = Viewport::fit(320.0, 480.0, 200, 120);
        assert_eq!(vp.scale, 0.25);
        assert_eq!(vp.ox, 60.0);
        assert_eq!(vp.oy, 0.0);
        assert_eq!(vp.rect(0.0, 0.0, 320.0, 480.0), (60, 0, 80, 120));
    }

    #[test]
    fn adjacent_world_rects_stay_adjacent() {
        let vp = Viewport::fit(320.0, 480.0, 97, 133);
        let (_, y, _, h) = vp.rect(0.0, 0.0, 10.0, 123.4);
        let (_, y2, _, _) = vp.rect(0.0, 123.4, 10.0, 50.0);
        assert_eq!(y + h, y2);
    }

    #[test]
    fn letterbox_covers_outside_playfield() {
        let g = game();
        let mut buf = PixelBuf::new(200, 120);
        draw_scene(&g, &mut buf, &DefaultBird, None);
        assert_eq!(buf.get(0, 60), LETTERBOX);
        assert_eq!(buf.get(199, 60), LETTERBOX);
        assert_ne!(buf.get(100, 5), LETTERBOX);
    }

    #[test]
    fn bird_is_drawn_at_its_position() {
        let mut g = game();
        g.handle_input(Input::Primary);
        let mut buf = PixelBuf::new(320, 480);
        draw_scene(&g, &mut buf, &DefaultBird, None);
        // body center of a bird at (80, 240) sized 30x30
        assert_eq!(buf.get(92, 250), BIRD_Y);
    }

    #[test]
    fn face_replaces_default_bird() {
        use crate::appearance::Sprite;
        use std::path::Path;

        struct Red(Sprite);
        impl BirdAppearance for Red {
            fn face(&self) -> Option<&Sprite> {
                Some(&self.0)
            }
        }
        let sprite =
            Sprite::parse(Path::new("red"), r##"{ "palette": { "r": "#ff0000" }, "rows": ["rr", "rr"] }"##)
                .unwrap();

        let mut g = game();
        g.handle_input(Input::Primary);
        let mut buf = PixelBuf::new(320, 480);
        draw_scene(&g, &mut buf, &Red(sprite), None);
        assert_eq!(buf.get(92, 250), Rgb(255, 0, 0));
        assert_eq!(buf.get(81, 241), Rgb(255, 0, 0));
    }

    #[test]
    fn nose_diving_face_is_sheared_within_bounds() {
        use crate::appearance::Sprite;
        use std::path::Path;

        struct Red(Sprite);
        impl BirdAppearance for Red {
            fn face(&self) -> Option<&Sprite> {
                Some(&self.0)
            }
        }
        let sprite =
            Sprite::parse(Path::new("red"), r##"{ "palette": { "r": "#ff0000" }, "rows": ["rr", "rr"] }"##)
                .unwrap();

        let config = GameConfig {
            gravity: 5.0,
            max_fall_speed: 30.0,
            ..GameConfig::classic()
        };
        config.validate().unwrap();
        let mut g = GameLoop::with_rng(config, ChaCha8Rng::seed_from_u64(1));
        g.handle_input(Input::Primary);
        for _ in 0..6 {
            g.update();
        }
        assert_eq!(g.mode(), Mode::Playing);
        assert_eq!(g.bird().rotation, g.config().rotation_max);

        // bird box is (80, 345) 30x30; columns shift by at most half the width
        let mut buf = PixelBuf::new(320, 480);
        draw_scene(&g, &mut buf, &Red(sprite), None);
        assert_eq!(buf.get(95, 360), Rgb(255, 0, 0));
        assert_eq!(buf.get(80, 331), Rgb(255, 0, 0));
        assert_eq!(buf.get(109, 380), Rgb(255, 0, 0));
        assert_ne!(buf.get(80, 370), Rgb(255, 0, 0));
    }

    #[test]
    fn score_is_drawn_while_playing() {
        let mut g = game();
        g.handle_input(Input::Primary);
        let mut buf = PixelBuf::new(320, 480);
        draw_scene(&g, &mut buf, &DefaultBird, None);
        // top-left pixel of the "0" glyph, 6px per glyph pixel centered on x=160
        assert_eq!(buf.get(151, 30), WHITE);
    }

    #[test]
    fn game_over_dims_the_scene() {
        let mut g = game();
        g.handle_input(Input::Primary);
        while g.mode() == Mode::Playing {
            g.update();
        }
        let mut buf = PixelBuf::new(320, 480);
        draw_scene(&g, &mut buf, &DefaultBird, None);
        assert_eq!(buf.get(1, 1), SKY_TOP.dim());
    }

    #[test]
    fn notice_bar_along_bottom() {
        let g = game();
        let mut buf = PixelBuf::new(320, 480);
        draw_scene(&g, &mut buf, &DefaultBird, Some("NO CAMERA"));
        assert_eq!(buf.get(0, 479), NOTICE);
    }

    #[test]
    fn zero_sized_surface_is_ignored() {
        let g = game();
        let mut buf = PixelBuf::new(0, 0);
        draw_scene(&g, &mut buf, &DefaultBird, None);
    }

    #[test]
    fn render_writes_half_blocks() {
        let mut buf = PixelBuf::new(2, 2);
        buf.set(0, 0, WHITE);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{2580}'));
    }
}
