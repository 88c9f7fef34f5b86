/// The scrolling axis of a component.
///
/// The main axis is the scrolling direction; the cross axis is perpendicular to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn cross(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Builds a size from main/cross extents for the given axis.
    pub fn from_main_cross(axis: Axis, main: f32, cross: f32) -> Self {
        match axis {
            Axis::Vertical => Self::new(cross, main),
            Axis::Horizontal => Self::new(main, cross),
        }
    }

    pub fn main(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    pub fn cross(&self, axis: Axis) -> f32 {
        self.main(axis.cross())
    }

    pub fn set_main(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Vertical => self.height = value,
            Axis::Horizontal => self.width = value,
        }
    }

    pub fn set_cross(&mut self, axis: Axis, value: f32) {
        self.set_main(axis.cross(), value);
    }

    /// Clamps each dimension into `[min, max]`. `min` wins when the bounds cross.
    pub fn constrain(&self, min: SizeF, max: SizeF) -> Self {
        Self {
            width: self.width.min(max.width).max(min.width),
            height: self.height.min(max.height).max(min.height),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetF {
    pub x: f32,
    pub y: f32,
}

impl OffsetF {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_main_cross(axis: Axis, main: f32, cross: f32) -> Self {
        match axis {
            Axis::Vertical => Self::new(cross, main),
            Axis::Horizontal => Self::new(main, cross),
        }
    }

    pub fn main(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    pub fn cross(&self, axis: Axis) -> f32 {
        self.main(axis.cross())
    }
}

/// A size where each dimension may be unresolved.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionalSizeF {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl OptionalSizeF {
    pub fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self { width, height }
    }

    pub fn main(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    pub fn cross(&self, axis: Axis) -> Option<f32> {
        self.main(axis.cross())
    }

    pub fn set_main(&mut self, axis: Axis, value: Option<f32>) {
        match axis {
            Axis::Vertical => self.height = value,
            Axis::Horizontal => self.width = value,
        }
    }

    pub fn set_cross(&mut self, axis: Axis, value: Option<f32>) {
        self.set_main(axis.cross(), value);
    }
}

/// The measure input handed from a parent to a child.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConstraint {
    pub min_size: SizeF,
    pub max_size: SizeF,
    /// Reference size used to resolve percentage lengths.
    pub percent_reference: SizeF,
    /// A size the parent would like the child to take, when it has one.
    pub parent_ideal_size: OptionalSizeF,
}

impl LayoutConstraint {
    /// A constraint that forces exactly `size`.
    pub fn tight(size: SizeF) -> Self {
        Self {
            min_size: size,
            max_size: size,
            percent_reference: size,
            parent_ideal_size: OptionalSizeF::new(Some(size.width), Some(size.height)),
        }
    }

    /// A constraint that allows anything between zero and `max`.
    pub fn loose(max: SizeF) -> Self {
        Self {
            min_size: SizeF::ZERO,
            max_size: max,
            percent_reference: max,
            parent_ideal_size: OptionalSizeF::default(),
        }
    }

    /// Returns a copy with the main axis unbounded, as scroll containers measure content.
    pub fn relaxed_main(&self, axis: Axis) -> Self {
        let mut out = *self;
        out.max_size.set_main(axis, f32::INFINITY);
        out
    }
}

impl Default for LayoutConstraint {
    fn default() -> Self {
        Self::loose(SizeF::new(f32::INFINITY, f32::INFINITY))
    }
}

pub(crate) const EPSILON: f32 = 0.001;

pub(crate) fn near_zero(v: f32) -> bool {
    v.abs() <= EPSILON
}
