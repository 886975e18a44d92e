//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Left-pad `values` with `None` so the last value lines up with the last
/// input point.
fn align<T>(values: Vec<T>, len: usize) -> Vec<Option<T>> {
    let lead = len.saturating_sub(values.len());
    std::iter::repeat_with(|| None)
        .take(lead)
        .chain(values.into_iter().map(Some))
        .collect()
}

/// Trait for technical indicators.
///
/// Indicators process price data and produce derived values. `calculate`
/// returns only the defined values; `calculate_aligned` returns one entry
/// per input point.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closing prices)
    ///
    /// # Returns
    /// The defined values, oldest first. The last value belongs to the last
    /// input point.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Calculate values index-aligned to `data`, `None` where undefined.
    fn calculate_aligned(&self, data: &[f64]) -> Vec<Option<Self::Output>> {
        align(self.calculate(data), data.len())
    }

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

/// Multi-output indicator (e.g., MACD with its signal line).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Calculate values index-aligned to `data`, `None` where undefined.
    fn calculate_aligned(&self, data: &[f64]) -> Vec<Option<Self::Outputs>> {
        align(self.calculate(data), data.len())
    }

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIndicator {
        period: usize,
    }

    impl Indicator for TestIndicator {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            if data.len() < self.period {
                return vec![];
            }
            // Simple sum indicator for testing
            data.windows(self.period).map(|w| w.iter().sum()).collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_validation() {
        let indicator = TestIndicator { period: 5 };

        assert!(indicator.validate_data(&[1.0, 2.0, 3.0]).is_err());
        assert!(indicator.validate_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
    }

    #[test]
    fn test_indicator_calculate_aligned() {
        let indicator = TestIndicator { period: 3 };
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = indicator.calculate_aligned(&data);

        assert_eq!(result.len(), data.len());
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(6.0)); // 1+2+3
        assert_eq!(result[4], Some(12.0)); // 3+4+5
    }

    #[test]
    fn test_aligned_with_insufficient_data() {
        let indicator = TestIndicator { period: 10 };
        let result = indicator.calculate_aligned(&[1.0, 2.0]);
        assert_eq!(result, vec![None, None]);
    }
}
