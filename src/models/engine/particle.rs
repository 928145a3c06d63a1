//! Cosmetic hit-feedback particles.

use rand::Rng;

/// One spark of a hit burst. `x` is in lane units (lane centre = lane + 0.5),
/// `y` in track units.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub alpha: f64,
    pub life: u32,
    max_life: u32,
}

impl Particle {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64, radius: f64, life: u32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            radius,
            alpha: 1.0,
            life,
            max_life: life.max(1),
        }
    }

    /// Scatters `count` particles around a lane's judgement point.
    pub fn burst<R: Rng>(rng: &mut R, lane: usize, y: f64, count: usize, life: u32) -> Vec<Self> {
        let x = lane as f64 + 0.5;
        (0..count)
            .map(|_| {
                let vx = rng.random_range(-0.05..0.05);
                let vy = rng.random_range(-6.0..2.0);
                let radius = rng.random_range(1.0..4.0);
                Particle::new(x, y, vx, vy, radius, life)
            })
            .collect()
    }

    /// Steps one frame. Returns `false` once the particle has burnt out.
    pub fn update(&mut self) -> bool {
        if self.life == 0 {
            return false;
        }
        self.x += self.vx;
        self.y += self.vy;
        self.life -= 1;
        self.alpha = self.life as f64 / self.max_life as f64;
        self.life > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_particle_fades_out() {
        let mut p = Particle::new(0.5, 500.0, 0.0, -1.0, 2.0, 4);
        assert!(p.update());
        assert_eq!(p.alpha, 0.75);
        assert_eq!(p.y, 499.0);
        assert!(p.update());
        assert!(p.update());
        assert!(!p.update());
        assert_eq!(p.life, 0);
        assert_eq!(p.alpha, 0.0);
        assert!(!p.update());
    }

    #[test]
    fn test_burst_centres_on_lane() {
        let mut rng = StdRng::seed_from_u64(7);
        let sparks = Particle::burst(&mut rng, 2, 500.0, 5, 30);
        assert_eq!(sparks.len(), 5);
        for p in &sparks {
            assert_eq!(p.x, 2.5);
            assert_eq!(p.y, 500.0);
            assert_eq!(p.life, 30);
            assert!(p.radius >= 1.0 && p.radius < 4.0);
        }
    }
}
