pub struct Math {}

impl Math {
    /// # whole centiseconds
    /// convert a duration in seconds to the nearest whole number of centiseconds.
    /// durations are stored as floats so `83.45` may really be `83.4499999`;
    /// comparing centiseconds keeps equal lap times equal.
    ///
    /// ## Arguments
    /// * `seconds` - the duration to convert
    ///
    /// ## Returns
    /// * `i64` - the duration in centiseconds
    pub fn to_centiseconds(seconds: f64) -> i64 {
        (seconds * 100.0).round() as i64
    }

    pub fn from_centiseconds(centiseconds: i64) -> f64 {
        centiseconds as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::Math;

    #[test]
    fn centiseconds_absorb_float_noise() {
        assert_eq!(Math::to_centiseconds(83.45), 8345);
        assert_eq!(Math::to_centiseconds(83.449_999_999), 8345);
        assert_eq!(Math::to_centiseconds(0.0), 0);
        assert_eq!(Math::from_centiseconds(8345), 83.45);
    }
}
