//! Shooting-star streaks.
//!
//! A small fixed pool of instances, each cycling `Idle -> Active -> Idle`:
//!
//! - **Idle**: every frame a Bernoulli trial decides whether to launch.
//!   On launch the streak picks an origin on a distant shell, aims at a
//!   nearby point of the same shell and draws speed and lifetime. Nothing is
//!   drawn on the launch frame.
//! - **Active**: the timer advances by the frame delta, then the streak
//!   retires once `elapsed >= lifetime`. Otherwise the head sits at
//!   `origin + velocity * elapsed` with the tail a fixed `trail_lag` seconds
//!   of travel behind it.
//!
//! Instances share nothing: each owns its RNG stream and its timer.

use crate::buffers::LineBuffer;
use crate::config::StreakConfig;
use crate::spawn::{spherical, Sampler};
use glam::Vec3;

/// One pooled streak.
#[derive(Debug, Clone)]
pub struct Streak {
    active: bool,
    origin: Vec3,
    velocity: Vec3,
    elapsed: f32,
    lifetime: f32,
    sampler: Sampler,
}

impl Streak {
    pub fn new(sampler: Sampler) -> Self {
        Self {
            active: false,
            origin: Vec3::ZERO,
            velocity: Vec3::ZERO,
            elapsed: 0.0,
            lifetime: 0.0,
            sampler,
        }
    }

    /// Advance one frame. Returns `true` if the streak launched this frame.
    pub fn update(&mut self, dt: f32, config: &StreakConfig) -> bool {
        if !self.active {
            if self.sampler.chance(config.spawn_chance) {
                self.launch(config);
                return true;
            }
            return false;
        }

        self.elapsed += dt;
        if self.elapsed >= self.lifetime {
            self.active = false;
        }
        false
    }

    /// Start a new flight.
    pub fn launch(&mut self, config: &StreakConfig) {
        let s = &mut self.sampler;
        let radius = s.span(config.min_radius, config.radius_span);
        let (phi, theta) = s.sphere_angles();
        let origin = spherical(radius, phi, theta);
        let aim = spherical(
            radius,
            phi + s.centered(config.angle_jitter),
            theta + s.centered(config.angle_jitter),
        );
        // Coincident endpoints give a zero direction and a streak that idles in place
        let direction = (aim - origin).normalize_or_zero();

        self.origin = origin;
        self.velocity = direction * config.speed.sample(s);
        self.lifetime = config.lifetime.sample(s);
        self.elapsed = 0.0;
        self.active = true;
        log::trace!(
            "streak launched at {:?}, speed {:.1}, lifetime {:.2}s",
            origin,
            self.velocity.length(),
            self.lifetime
        );
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Current head position.
    #[inline]
    pub fn head(&self) -> Vec3 {
        self.origin + self.velocity * self.elapsed
    }

    /// Head and tail of the visible streak, or `None` while idle.
    pub fn segment(&self, trail_lag: f32) -> Option<(Vec3, Vec3)> {
        if !self.active {
            return None;
        }
        let head = self.head();
        Some((head, head - self.velocity * trail_lag))
    }
}

/// Fixed pool of streaks and the line buffer they draw into.
#[derive(Debug, Clone)]
pub struct StreakPool {
    streaks: Vec<Streak>,
    lines: LineBuffer,
    config: StreakConfig,
}

impl StreakPool {
    /// Pool of `config.pool_size` idle streaks, each on its own RNG stream.
    pub fn new(sampler: &mut Sampler, config: &StreakConfig) -> Self {
        let streaks = (0..config.pool_size)
            .map(|_| Streak::new(sampler.fork()))
            .collect();
        Self {
            streaks,
            lines: LineBuffer::with_capacity(config.pool_size),
            config: config.clone(),
        }
    }

    /// Advance every instance and rebuild the line buffer.
    ///
    /// Returns the number of streaks launched this frame.
    pub fn update(&mut self, dt: f32) -> usize {
        self.lines.clear();
        let mut launched = 0;
        for streak in &mut self.streaks {
            if streak.update(dt, &self.config) {
                launched += 1;
                continue;
            }
            if let Some((head, tail)) = streak.segment(self.config.trail_lag) {
                self.lines.push(head, tail);
            }
        }
        launched
    }

    #[inline]
    pub fn streaks(&self) -> &[Streak] {
        &self.streaks
    }

    /// Visible segments, one per active streak (excluding this frame's launches).
    #[inline]
    pub fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    pub fn active_count(&self) -> usize {
        self.streaks.iter().filter(|s| s.is_active()).count()
    }

    #[inline]
    pub fn config(&self) -> &StreakConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn always() -> StreakConfig {
        StreakConfig {
            spawn_chance: 1.0,
            ..StreakConfig::default()
        }
    }

    #[test]
    fn test_idle_without_chance() {
        let config = StreakConfig {
            spawn_chance: 0.0,
            ..StreakConfig::default()
        };
        let mut pool = StreakPool::new(&mut Sampler::seeded(1), &config);
        for _ in 0..1000 {
            assert_eq!(pool.update(DT), 0);
        }
        assert_eq!(pool.active_count(), 0);
        assert!(pool.lines().is_empty());
    }

    #[test]
    fn test_launch_parameters() {
        let config = StreakConfig::default();
        let mut streak = Streak::new(Sampler::seeded(2));
        for _ in 0..200 {
            streak.launch(&config);
            let r = streak.origin().length();
            assert!((60.0 - 1e-3..80.0 + 1e-3).contains(&r));
            let speed = streak.velocity().length();
            assert!(speed == 0.0 || (30.0 - 1e-3..=60.0 + 1e-3).contains(&speed));
            assert!((0.8..=1.3).contains(&streak.lifetime()));
            assert_eq!(streak.elapsed(), 0.0);
        }
    }

    #[test]
    fn test_launch_frame_draws_nothing() {
        let mut pool = StreakPool::new(&mut Sampler::seeded(3), &always());
        assert_eq!(pool.update(DT), 2);
        assert_eq!(pool.active_count(), 2);
        assert!(pool.lines().is_empty());

        assert_eq!(pool.update(DT), 0);
        assert_eq!(pool.lines().segment_count(), 2);
    }

    #[test]
    fn test_retires_at_lifetime() {
        let config = always();
        let mut streak = Streak::new(Sampler::seeded(4));
        assert!(streak.update(DT, &config));
        let lifetime = streak.lifetime();

        let mut frames = 0;
        while streak.is_active() {
            streak.update(DT, &config);
            frames += 1;
            assert!(frames < 1000);
        }
        // Retires on the first frame whose timer reaches the lifetime
        assert!(streak.elapsed() >= lifetime);
        assert!(streak.elapsed() < lifetime + DT + 1e-5);
        assert_eq!(frames, (streak.elapsed() / DT).round() as usize);
    }

    #[test]
    fn test_trail_length_is_constant() {
        let config = always();
        let mut streak = Streak::new(Sampler::seeded(5));
        streak.update(DT, &config);
        let expected = streak.velocity().length() * config.trail_lag;
        for _ in 0..20 {
            streak.update(DT, &config);
            if let Some((head, tail)) = streak.segment(config.trail_lag) {
                assert!((head.distance(tail) - expected).abs() < 1e-3);
                let travelled = streak.origin() + streak.velocity() * streak.elapsed();
                assert!(head.distance(travelled) < 1e-3);
            }
        }
    }

    #[test]
    fn test_instances_are_independent() {
        let mut pool = StreakPool::new(&mut Sampler::seeded(6), &always());
        pool.update(DT);
        let [a, b] = [&pool.streaks()[0], &pool.streaks()[1]];
        assert_ne!(a.origin(), b.origin());
    }
}
