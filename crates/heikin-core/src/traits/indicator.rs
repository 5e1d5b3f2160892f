//! Indicator trait definition.

/// Trait for technical indicators.
///
/// Output is aligned with the input: one entry per data point, `None` where
/// the indicator is not yet defined (fewer observations than its warmup).
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Output>>;

    /// Number of data points needed before the first defined value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Value at the last data point, if defined.
    fn last(&self, data: &[f64]) -> Option<Self::Output> {
        self.calculate(data).pop().flatten()
    }
}
