use super::config::TierRange;

/// Round to two decimals, the precision of every reported score.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classic normalization used by the 90-point model: `tier / 5`.
pub fn fifths(tier: f64) -> f64 {
    tier / 5.0
}

/// Linear tier-range mapping onto 0-100. `reverse` flips the tier first so that the
/// lowest tier scores highest.
pub fn tier_percent(tier: u8, range: TierRange, reverse: bool) -> f64 {
    if range.max <= range.min {
        return 100.0;
    }
    let (min, max) = (u16::from(range.min), u16::from(range.max));
    let tier = u16::from(tier).clamp(min, max);
    let effective = if reverse { max + min - tier } else { tier };
    f64::from(effective - min) / f64::from(max - min) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_percent_maps_edges() {
        let range = TierRange::new(1, 6);
        assert_eq!(tier_percent(1, range, false), 0.0);
        assert_eq!(tier_percent(6, range, false), 100.0);
        assert_eq!(tier_percent(1, TierRange::new(1, 5), true), 100.0);
        assert_eq!(tier_percent(3, TierRange::new(1, 5), false), 50.0);
        assert_eq!(tier_percent(250, TierRange::new(200, 250), true), 0.0);
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round2(74.999), 75.0);
        assert_eq!(round2(12.3449), 12.34);
        assert_eq!(round1(33.36), 33.4);
    }
}
