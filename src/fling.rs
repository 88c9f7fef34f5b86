/// Fling velocities below this (units per second) stop the fling.
pub const MIN_FLING_VELOCITY: f32 = 1.0;
const FLING_DECAY_PER_FRICTION: f32 = 4.2;

/// Exponential velocity decay: `v(t) = v0 * e^(-k t)` with `k = 4.2 * friction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingDecay {
    velocity: f32,
    decay: f32,
}

impl FlingDecay {
    /// Returns `None` when the fling would not move: zero friction, or a velocity below
    /// [`MIN_FLING_VELOCITY`].
    pub fn new(velocity: f32, friction: f32) -> Option<Self> {
        if friction.is_nan() || friction <= 0.0 {
            ldebug!(friction, "FlingDecay: no friction, fling skipped");
            return None;
        }
        if !velocity.is_finite() || velocity.abs() < MIN_FLING_VELOCITY {
            return None;
        }
        Some(Self {
            velocity,
            decay: FLING_DECAY_PER_FRICTION * friction,
        })
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advances by `dt_secs` and returns the distance travelled, which is the exact integral
    /// of the velocity over the step.
    pub fn step(&mut self, dt_secs: f32) -> f32 {
        if dt_secs.is_nan() || dt_secs <= 0.0 {
            return 0.0;
        }
        let factor = (-self.decay * dt_secs).exp();
        let distance = self.velocity / self.decay * (1.0 - factor);
        self.velocity *= factor;
        distance
    }

    pub fn is_finished(&self) -> bool {
        self.velocity.abs() < MIN_FLING_VELOCITY
    }
}
