use crate::config::GameConfig;
use crate::game::Mode;

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub velocity: f64,
    /// Display-only tilt in degrees; positive is nose down.
    pub rotation: f64,
}

impl Bird {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.bird_x,
            y: config.bird_y,
            width: config.bird_width,
            height: config.bird_height,
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    pub fn update(&mut self, mode: Mode, config: &GameConfig) {
        if mode != Mode::Playing {
            return;
        }
        self.velocity = (self.velocity + config.gravity).min(config.max_fall_speed);
        self.y += self.velocity;
        self.rotation = (self.velocity * config.rotation_scale)
            .clamp(config.rotation_min, config.rotation_max);
    }

    /// Replaces the current velocity with the jump impulse. Not additive.
    pub fn jump(&mut self, mode: Mode, config: &GameConfig) {
        if mode == Mode::Playing {
            self.velocity = config.jump_velocity;
        }
    }

    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    /// The forgiving collision box: the sprite bounds shrunk by `inset` on each side.
    pub fn hitbox(&self, inset: f64) -> Rect {
        Rect {
            left: self.x + inset,
            top: self.y + inset,
            right: self.x + self.width - inset,
            bottom: self.y + self.height - inset,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_never_exceeds_max_fall_speed() {
        let config = GameConfig::classic();
        let mut bird = Bird::new(&config);
        for _ in 0..100 {
            bird.update(Mode::Playing, &config);
            assert!(bird.velocity <= config.max_fall_speed);
        }
        assert_eq!(bird.velocity, config.max_fall_speed);
    }

    #[test]
    fn update_applies_gravity_then_moves() {
        let config = GameConfig::classic();
        let mut bird = Bird::new(&config);
        bird.update(Mode::Playing, &config);
        assert_eq!(bird.velocity, 0.5);
        assert_eq!(bird.y, 240.5);
        assert_eq!(bird.rotation, 1.5);
    }

    #[test]
    fn update_is_inert_outside_playing() {
        let config = GameConfig::classic();
        let mut bird = Bird::new(&config);
        bird.update(Mode::Start, &config);
        bird.update(Mode::GameOver, &config);
        assert_eq!(bird, Bird::new(&config));
    }

    #[test]
    fn jump_overwrites_velocity() {
        let config = GameConfig::classic();
        let mut bird = Bird::new(&config);
        bird.velocity = 4.0;
        bird.jump(Mode::Playing, &config);
        assert_eq!(bird.velocity, config.jump_velocity);

        bird.velocity = -3.0;
        bird.jump(Mode::Playing, &config);
        assert_eq!(bird.velocity, config.jump_velocity);
    }

    #[test]
    fn jump_ignored_outside_playing() {
        let config = GameConfig::classic();
        let mut bird = Bird::new(&config);
        bird.velocity = 2.0;
        bird.jump(Mode::Start, &config);
        bird.jump(Mode::GameOver, &config);
        assert_eq!(bird.velocity, 2.0);
    }

    #[test]
    fn rotation_is_clamped() {
        let config = GameConfig::classic();
        let mut bird = Bird::new(&config);
        bird.jump(Mode::Playing, &config);
        bird.update(Mode::Playing, &config);
        // -7.5 * 3 = -22.5, clamped
        assert_eq!(bird.rotation, config.rotation_min);

        for _ in 0..40 {
            bird.update(Mode::Playing, &config);
        }
        // 5 * 3 = 15, within bounds
        assert_eq!(bird.rotation, 15.0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let config = GameConfig::classic();
        let mut bird = Bird::new(&config);
        bird.jump(Mode::Playing, &config);
        bird.update(Mode::Playing, &config);
        bird.reset(&config);
        assert_eq!(bird.x, 80.0);
        assert_eq!(bird.y, 240.0);
        assert_eq!(bird.velocity, 0.0);
        assert_eq!(bird.rotation, 0.0);
    }

    #[test]
    fn hitbox_is_shrunk() {
        let config = GameConfig::classic();
        let bird = Bird::new(&config);
        let hb = bird.hitbox(config.hitbox_inset);
        assert_eq!(hb, Rect { left: 85.0, top: 245.0, right: 105.0, bottom: 265.0 });
    }
}
