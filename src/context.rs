use crate::SpringMotion;
use crate::edge_effect::{DEFAULT_FRICTION, WEARABLE_FRICTION};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormFactor {
    #[default]
    Default,
    Wearable,
}

/// Per-instance environment handed to scrollables at construction.
///
/// Carries the device constants a scrollable would otherwise look up globally.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollContext {
    pub container_id: u32,
    pub form_factor: FormFactor,
    pub spring: SpringMotion,
    /// Lower bound for the thumb of a scrollable's own bar.
    pub min_thumb_length: f32,
}

impl ScrollContext {
    pub fn new(container_id: u32) -> Self {
        Self {
            container_id,
            form_factor: FormFactor::Default,
            spring: SpringMotion::DEFAULT,
            min_thumb_length: 16.0,
        }
    }

    pub fn with_form_factor(mut self, form_factor: FormFactor) -> Self {
        self.form_factor = form_factor;
        self
    }

    pub fn with_spring(mut self, spring: SpringMotion) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_min_thumb_length(mut self, length: f32) -> Self {
        self.min_thumb_length = length.max(0.0);
        self
    }

    /// Edge friction for this form factor.
    pub fn friction(&self) -> f32 {
        match self.form_factor {
            FormFactor::Default => DEFAULT_FRICTION,
            FormFactor::Wearable => WEARABLE_FRICTION,
        }
    }
}

impl Default for ScrollContext {
    fn default() -> Self {
        Self::new(0)
    }
}
