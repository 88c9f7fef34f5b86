/// Resolved lane configuration of one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneConfig {
    /// Number of parallel lanes, always `>= 1`.
    pub lanes: usize,
    /// Normalized lower bound of a lane's cross size.
    pub min_lane_length: f32,
    /// Normalized upper bound of a lane's cross size.
    pub max_lane_length: f32,
    /// Cross size of each lane: `cross_size / lanes`.
    pub lane_length: f32,
}

impl LaneConfig {
    pub fn single(cross_size: f32) -> Self {
        let cross_size = cross_size.max(0.0);
        Self {
            lanes: 1,
            min_lane_length: cross_size,
            max_lane_length: cross_size,
            lane_length: cross_size,
        }
    }

    /// Cross size handed to a regular item: a lane, but no wider than `max_lane_length`.
    pub fn item_cross_size(&self) -> f32 {
        if self.max_lane_length > 0.0 {
            self.lane_length.min(self.max_lane_length)
        } else {
            self.lane_length
        }
    }
}

/// Decides how many lanes fit in `cross_size`.
///
/// `min_lane_length` takes priority over `max_lane_length`: with lanes of 40..60 in a cross
/// size of 120 the result is 3 lanes, not 2. Once the count is known each lane grows as wide
/// as it can (`cross_size / lanes`). Lane counts are always floored so no lane ends up
/// narrower than `min_lane_length`.
///
/// When either bound is missing, the user requested `user_lanes` (at least 1) are used
/// with both bounds set to `cross_size / lanes`.
pub fn calculate_lanes(
    cross_size: f32,
    min_lane_length: Option<f32>,
    max_lane_length: Option<f32>,
    user_lanes: usize,
) -> LaneConfig {
    let user_lanes = user_lanes.max(1);
    if !cross_size.is_finite() || cross_size <= 0.0 {
        let mut config = LaneConfig::single(0.0);
        config.lanes = user_lanes;
        return config;
    }

    let (Some(min_len), Some(max_len)) = (min_lane_length, max_lane_length) else {
        let lane = cross_size / user_lanes as f32;
        return LaneConfig {
            lanes: user_lanes,
            min_lane_length: lane,
            max_lane_length: lane,
            lane_length: lane,
        };
    };

    let (min_len, mut max_len) = normalize_lane_lengths(cross_size, min_len, max_len);

    // min_len <= max_len, so max_lanes >= min_lanes > 0.
    let max_lanes = cross_size / min_len;
    let min_lanes = cross_size / max_len;

    // The cross size cannot hold even one minimum lane.
    if max_lanes < 1.0 && max_lanes >= min_lanes {
        return LaneConfig::single(cross_size);
    }

    let lanes = if max_lanes >= 1.0 && min_lanes <= 1.0 {
        max_len = cross_size;
        floor_lanes(max_lanes)
    } else if max_lanes >= min_lanes && min_lanes > 1.0 {
        floor_lanes(max_lanes)
    } else {
        lwarn!(
            max_lanes,
            min_lanes,
            min_len,
            max_len,
            "calculate_lanes: unexpected lane bounds, falling back to 1 lane"
        );
        1
    };

    LaneConfig {
        lanes,
        min_lane_length: min_len,
        max_lane_length: max_len,
        lane_length: cross_size / lanes as f32,
    }
}

/// Fills in non-positive bounds and collapses `max` onto `min` when they cross.
pub fn normalize_lane_lengths(cross_size: f32, min_len: f32, max_len: f32) -> (f32, f32) {
    let mut max_len = if max_len > 0.0 { max_len } else { cross_size };
    let min_len = if min_len > 0.0 {
        min_len
    } else {
        cross_size.min(max_len)
    };
    if min_len > max_len {
        ldebug!(
            min_len,
            max_len,
            "min lane length exceeds max lane length, using min for both"
        );
        max_len = min_len;
    }
    (min_len, max_len)
}

fn floor_lanes(lanes: f32) -> usize {
    // `as` truncates toward zero, which floors the positive ratio.
    (lanes as usize).max(1)
}
