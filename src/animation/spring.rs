// ABOUTME: Damped spring physics used to settle the drag offset back to rest
// Closed-form damped harmonic oscillator, so sampling is exact at any frame rate

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance from the target under which the spring counts as settled.
    pub rest_displacement: f64,
    /// Speed (units per second) under which the spring counts as settled.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    // Critically damped: no overshoot past the target.
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 20.0,
            mass: 1.0,
            rest_displacement: 0.5,
            rest_speed: 0.5,
        }
    }
}

impl SpringConfig {
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.stiffness > 0.0 && self.mass > 0.0) {
            return Err(format!(
                "spring stiffness and mass must be positive, got {} and {}",
                self.stiffness, self.mass
            ));
        }
        // Undamped springs never come to rest.
        if self.damping <= 0.0 {
            return Err(format!("spring damping must be positive, got {}", self.damping));
        }
        if self.rest_displacement <= 0.0 || self.rest_speed <= 0.0 {
            return Err("spring rest thresholds must be positive".to_string());
        }
        Ok(())
    }
}

/// A spring released at displacement `x0` (relative to its target) with velocity `v0`.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    config: SpringConfig,
    x0: f64,
    v0: f64,
}

impl Spring {
    pub const fn new(config: SpringConfig, x0: f64, v0: f64) -> Self {
        Self { config, x0, v0 }
    }

    /// Displacement from the target `t` seconds after release.
    pub fn displacement(&self, t: f64) -> f64 {
        let omega = (self.config.stiffness / self.config.mass).sqrt();
        let zeta = self.config.damping_ratio();
        let (x0, v0) = (self.x0, self.v0);

        if (zeta - 1.0).abs() < 1e-6 {
            (-omega * t).exp() * (x0 + (v0 + omega * x0) * t)
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega * t).exp();
            let sine_amplitude = (v0 + zeta * omega * x0) / omega_d;
            envelope * x0.mul_add((omega_d * t).cos(), sine_amplitude * (omega_d * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
        }
    }

    pub fn velocity(&self, t: f64) -> f64 {
        const H: f64 = 1e-4;
        (self.displacement(t + H) - self.displacement(t)) / H
    }

    pub fn is_at_rest(&self, t: f64) -> bool {
        self.displacement(t).abs() < self.config.rest_displacement
            && self.velocity(t).abs() < self.config.rest_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(spring: &Spring) -> Vec<f64> {
        (0..200).map(|i| spring.displacement(f64::from(i) * 0.01)).collect()
    }

    #[test]
    fn default_spring_is_critically_damped() {
        assert!((SpringConfig::default().damping_ratio() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn critically_damped_release_approaches_zero_monotonically() {
        let spring = Spring::new(SpringConfig::default(), 150.0, 0.0);
        let xs = samples(&spring);
        assert!((xs[0] - 150.0).abs() < 1e-9);
        for pair in xs.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-9, "spring moved away from rest: {pair:?}");
            assert!(pair[1] >= 0.0, "spring overshot the target");
        }
        assert!(spring.is_at_rest(2.0));
    }

    #[test]
    fn negative_release_mirrors_positive() {
        let pos = Spring::new(SpringConfig::default(), 80.0, 0.0);
        let neg = Spring::new(SpringConfig::default(), -80.0, 0.0);
        for i in 0..50 {
            let t = f64::from(i) * 0.02;
            assert!((pos.displacement(t) + neg.displacement(t)).abs() < 1e-9);
        }
    }

    #[test]
    fn underdamped_overshoot_stays_below_release_offset() {
        let config = SpringConfig {
            stiffness: 40.0,
            damping: 7.0,
            ..SpringConfig::default()
        };
        let spring = Spring::new(config, 100.0, 0.0);
        let overshoot = samples(&spring).into_iter().fold(0.0_f64, |acc, x| acc.max(-x));
        assert!(overshoot > 0.0);
        assert!(overshoot < 100.0);
    }

    #[test]
    fn overdamped_spring_never_crosses_target() {
        let config = SpringConfig {
            damping: 40.0,
            ..SpringConfig::default()
        };
        let spring = Spring::new(config, 60.0, 0.0);
        assert!(samples(&spring).iter().all(|x| *x >= 0.0));
    }

    #[test]
    fn zero_damping_is_invalid() {
        let config = SpringConfig {
            damping: 0.0,
            ..SpringConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
