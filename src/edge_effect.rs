use crate::ScrollContext;

/// Spring edge friction on regular devices.
pub const DEFAULT_FRICTION: f32 = 0.6;
/// Spring edge friction on wearables, where content is dragged over shorter distances.
pub const WEARABLE_FRICTION: f32 = 0.9;

/// Physical parameters of the spring that pulls an overscrolled offset back.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringMotion {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl SpringMotion {
    pub const DEFAULT: Self = Self {
        mass: 1.0,
        stiffness: 228.0,
        damping: 30.0,
    };

    pub fn new(mass: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            mass,
            stiffness,
            damping,
        }
    }

    /// A descriptor that cannot be simulated; the spring snaps instead.
    pub fn is_valid(&self) -> bool {
        self.mass > 0.0
            && self.stiffness > 0.0
            && self.mass.is_finite()
            && self.stiffness.is_finite()
    }

    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }
}

impl Default for SpringMotion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What happens when the offset reaches a boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeEffect {
    /// The offset is hard-clamped.
    #[default]
    None,
    /// The offset is clamped; the excess is reported as a fade extent for decoration.
    Fade,
    /// The offset may leave the boundary and is pulled back by a spring.
    Spring {
        friction: f32,
        motion: SpringMotion,
    },
}

impl EdgeEffect {
    /// A spring edge using the context's friction and spring defaults.
    pub fn spring(context: &ScrollContext) -> Self {
        Self::Spring {
            friction: context.friction(),
            motion: context.spring,
        }
    }

    pub fn is_spring(&self) -> bool {
        matches!(self, Self::Spring { .. })
    }

    pub fn is_fade(&self) -> bool {
        matches!(self, Self::Fade)
    }

    pub fn friction(&self) -> Option<f32> {
        match self {
            Self::Spring { friction, .. } => Some(*friction),
            _ => None,
        }
    }
}

/// Scales a drag delta that pushes further into overscroll.
///
/// The resistance grows with the overscroll ratio `γ = |overscroll| / viewport` (clamped to
/// `[0, 1]`, and `1` for an empty viewport): the applied delta is
/// `delta * friction * (1 - γ)²`.
pub fn drag_resistance(delta: f32, overscroll: f32, viewport: f32, friction: f32) -> f32 {
    let gamma = if viewport > 0.0 {
        (overscroll.abs() / viewport).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let factor = (1.0 - gamma) * (1.0 - gamma);
    let out = delta * friction.max(0.0) * factor;
    if out.is_finite() { out } else { 0.0 }
}

const MAX_SUBSTEP_SECS: f32 = 1.0 / 120.0;
const SETTLE_DISTANCE: f32 = 0.5;
const SETTLE_VELOCITY: f32 = 0.5;
const MAX_DURATION_SECS: f32 = 5.0;
const MIN_DAMPING_RATIO: f32 = 0.05;

/// A damped spring pulling a displacement towards zero.
///
/// Integrated with semi-implicit Euler in sub-steps of at most 1/120 s, so large frame gaps
/// stay stable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringSimulation {
    motion: SpringMotion,
    displacement: f32,
    velocity: f32,
    elapsed_secs: f32,
    snapped: bool,
}

impl SpringSimulation {
    pub fn new(motion: SpringMotion, displacement: f32, velocity: f32) -> Self {
        let mut motion = motion;
        let snapped = !motion.is_valid() || !displacement.is_finite() || !velocity.is_finite();
        if snapped {
            lwarn!(?motion, "SpringSimulation: invalid spring, snapping to target");
        } else {
            motion.damping = motion
                .damping
                .max(motion.critical_damping() * MIN_DAMPING_RATIO);
        }
        Self {
            motion,
            displacement: if snapped { 0.0 } else { displacement },
            velocity: if snapped { 0.0 } else { velocity },
            elapsed_secs: 0.0,
            snapped,
        }
    }

    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advances by `dt_secs` and returns the new displacement.
    pub fn step(&mut self, dt_secs: f32) -> f32 {
        if self.snapped || dt_secs.is_nan() || dt_secs <= 0.0 {
            return self.displacement;
        }
        self.elapsed_secs += dt_secs;
        let steps = (dt_secs / MAX_SUBSTEP_SECS).ceil().max(1.0) as u32;
        let h = dt_secs / steps as f32;
        let SpringMotion {
            mass,
            stiffness,
            damping,
        } = self.motion;
        for _ in 0..steps {
            let force = -stiffness * self.displacement - damping * self.velocity;
            self.velocity += force / mass * h;
            self.displacement += self.velocity * h;
        }
        if self.is_settled() {
            self.displacement = 0.0;
            self.velocity = 0.0;
        }
        self.displacement
    }

    pub fn is_settled(&self) -> bool {
        self.snapped
            || (self.displacement.abs() < SETTLE_DISTANCE && self.velocity.abs() < SETTLE_VELOCITY)
            || self.elapsed_secs >= MAX_DURATION_SECS
    }
}
