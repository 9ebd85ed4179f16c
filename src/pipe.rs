use rand::Rng;

use crate::bird::Bird;
use crate::config::GameConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub width: f64,
    /// Vertical center of the gap.
    pub gap_y: f64,
    pub gap: f64,
    passed: bool,
}

impl Pipe {
    pub fn new(x: f64, gap_y: f64, gap: f64, width: f64) -> Self {
        Self {
            x,
            width,
            gap_y,
            gap,
            passed: false,
        }
    }

    /// A pipe at `x` whose gap center is drawn uniformly from the configured range.
    pub fn spawn(x: f64, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let gap_y = rng.gen_range(config.gap_min_y..config.gap_max_y);
        Self::new(x, gap_y, config.pipe_gap, config.pipe_width)
    }

    pub fn update(&mut self, speed: f64) {
        self.x -= speed;
    }

    pub fn gap_top(&self) -> f64 {
        self.gap_y - self.gap / 2.0
    }

    pub fn gap_bottom(&self) -> f64 {
        self.gap_y + self.gap / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn check_collision(&self, bird: &Bird, hitbox_inset: f64) -> bool {
        let hb = bird.hitbox(hitbox_inset);
        if hb.right > self.x && hb.left < self.right() {
            return hb.top < self.gap_top() || hb.bottom > self.gap_bottom();
        }
        false
    }

    /// True on the first call where the bird is clear of the pipe's trailing edge.
    /// False forever after.
    pub fn check_passed(&mut self, bird: &Bird) -> bool {
        if !self.passed && bird.x > self.right() {
            self.passed = true;
            return true;
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn passed(&self) -> bool {
        self.passed
    }

    pub fn is_offscreen(&self) -> bool {
        self.x <= -self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bird_at(x: f64, y: f64) -> Bird {
        let mut bird = Bird::new(&GameConfig::classic());
        bird.x = x;
        bird.y = y;
        bird
    }

    // gap spans y in [140, 260]
    fn test_pipe() -> Pipe {
        Pipe::new(100.0, 200.0, 120.0, 60.0)
    }

    #[test]
    fn gap_bounds() {
        let pipe = test_pipe();
        assert_eq!(pipe.gap_top(), 140.0);
        assert_eq!(pipe.gap_bottom(), 260.0);
    }

    #[test]
    fn collides_above_gap() {
        // hitbox y in [105, 125]
        assert!(test_pipe().check_collision(&bird_at(90.0, 100.0), 5.0));
    }

    #[test]
    fn collides_below_gap() {
        // hitbox y in [275, 295]
        assert!(test_pipe().check_collision(&bird_at(90.0, 270.0), 5.0));
    }

    #[test]
    fn clear_inside_gap() {
        // hitbox y in [185, 205]
        assert!(!test_pipe().check_collision(&bird_at(110.0, 180.0), 5.0));
    }

    #[test]
    fn hitbox_inset_forgives_grazing() {
        // sprite top at 136 is above the gap, the hitbox top at 141 is not
        let bird = bird_at(110.0, 136.0);
        assert!(!test_pipe().check_collision(&bird, 5.0));
        assert!(test_pipe().check_collision(&bird, 0.0));
    }

    #[test]
    fn no_collision_without_horizontal_overlap() {
        let pipe = test_pipe();
        // hitbox right edge at 100 touches but does not cross the pipe's left edge
        assert!(!pipe.check_collision(&bird_at(75.0, 0.0), 5.0));
        // hitbox left edge at 160 sits on the right edge
        assert!(!pipe.check_collision(&bird_at(155.0, 0.0), 5.0));
        assert!(pipe.check_collision(&bird_at(154.0, 0.0), 5.0));
    }

    #[test]
    fn passed_fires_once() {
        let mut pipe = test_pipe();
        let bird = bird_at(160.0, 200.0);
        assert!(!pipe.check_passed(&bird), "bird.x == right edge is not past it");

        let bird = bird_at(160.5, 200.0);
        assert!(pipe.check_passed(&bird));
        assert!(pipe.passed());
        for _ in 0..10 {
            assert!(!pipe.check_passed(&bird));
        }
    }

    #[test]
    fn update_scrolls_left() {
        let mut pipe = test_pipe();
        pipe.update(2.0);
        pipe.update(2.0);
        assert_eq!(pipe.x, 96.0);
    }

    #[test]
    fn offscreen_once_right_edge_reaches_zero() {
        let mut pipe = Pipe::new(-59.0, 200.0, 120.0, 60.0);
        assert!(!pipe.is_offscreen());
        pipe.update(1.0);
        assert!(pipe.is_offscreen());
    }

    #[test]
    fn spawn_draws_gap_within_range() {
        let config = GameConfig::classic();
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        for _ in 0..500 {
            let pipe = Pipe::spawn(400.0, &config, &mut rng);
            assert!(pipe.gap_y >= config.gap_min_y && pipe.gap_y < config.gap_max_y);
            assert_eq!(pipe.gap, config.pipe_gap);
            assert_eq!(pipe.width, config.pipe_width);
            assert!(!pipe.passed());
        }
    }
}
