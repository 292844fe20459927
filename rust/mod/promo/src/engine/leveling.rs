use promo_core::ServiceError;

/// Geometric level curve.
///
/// Advancing from level `L` to `L + 1` costs
/// `minimal_points_level * growth_rate^(L - 1)` points, truncated to an
/// integer. With `10` and `1.30` the costs are 10, 13, 16, 21, ...
///
/// Levels are always derived from the lifetime total, never stepped from a
/// stored level, so any user's level can be reproduced from the ledger alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelCurve {
    minimal_points_level: i64,
    growth_rate: f64,
}

impl LevelCurve {
    pub fn new(minimal_points_level: i64, growth_rate: f64) -> Result<Self, ServiceError> {
        if minimal_points_level <= 0 {
            return Err(ServiceError::Configuration(format!(
                "minimal_points_level must be > 0, got {minimal_points_level}"
            )));
        }
        if growth_rate.is_nan() || growth_rate <= 1.0 || !growth_rate.is_finite() {
            return Err(ServiceError::Configuration(format!(
                "growth_rate must be a finite number > 1, got {growth_rate}"
            )));
        }
        Ok(Self {
            minimal_points_level,
            growth_rate,
        })
    }

    /// Points needed to go from `level` to `level + 1`.
    pub fn points_required(&self, level: u32) -> i64 {
        let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        let required = self.minimal_points_level as f64 * self.growth_rate.powi(exponent);
        if !required.is_finite() || required >= i64::MAX as f64 {
            return i64::MAX;
        }
        required as i64
    }

    /// Level reached with `total` lifetime points.
    ///
    /// Walks the curve from level 1, so the result depends only on the total:
    /// it is monotonic in `total`, never below 1, and reversing a delta
    /// restores the previous level. Terminates because every step costs at
    /// least `minimal_points_level >= 1`.
    pub fn level_for_total(&self, total: i64) -> u32 {
        let mut level: u32 = 1;
        let mut remaining = total;
        loop {
            let required = self.points_required(level);
            if remaining < required || level == u32::MAX {
                return level;
            }
            remaining -= required;
            level += 1;
        }
    }
}
