//! Tuning parameters for the perceptual mapper.

/// Configuration for [`Perceptual`](super::Perceptual) color mapping.
///
/// The refinement cost of a shortlisted candidate is
///
/// ```text
/// cost = ΔE00
///      + lightness_weight * max(0, |ΔL| - lightness_tolerance)
///      + chroma_weight    * max(0, |ΔC| - chroma_tolerance)
///      + hue_weight * stability * (1 - cos Δh)   if pixel chroma >= neutral_gate
///      + neutral_bias * candidate chroma         if pixel chroma <  neutral_bias_threshold
/// ```
///
/// # Example
///
/// ```
/// use tile_quant::PerceptualParams;
///
/// let params = PerceptualParams::new().shortlist_len(4).hue_weight(0.0);
/// assert_eq!(params.shortlist_len, 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PerceptualParams {
    /// Number of raw-nearest candidates carried into refinement.
    ///
    /// Default: `8`
    pub shortlist_len: usize,

    /// Lightness difference tolerated before the penalty applies.
    ///
    /// Default: `3.0`
    pub lightness_tolerance: f64,

    /// Default: `0.7`
    pub lightness_weight: f64,

    /// Chroma difference tolerated before the penalty applies.
    ///
    /// Default: `3.0`
    pub chroma_tolerance: f64,

    /// Default: `0.7`
    pub chroma_weight: f64,

    /// Scale of the hue penalty, further scaled by local hue stability.
    ///
    /// Default: `0.3`
    pub hue_weight: f64,

    /// Pixels with chroma below this carry no meaningful hue and skip the
    /// hue penalty.
    ///
    /// Default: `3.0`
    pub neutral_gate: f64,

    /// Pixels with chroma below this get `neutral_bias` added per unit of
    /// candidate chroma, steering greys toward greys.
    ///
    /// Default: `6.0`
    pub neutral_bias_threshold: f64,

    /// Default: `0.15`
    pub neutral_bias: f64,

    /// Neighborhood a/b spread at which hue stability reaches zero.
    ///
    /// Default: `5.0`
    pub stability_scale: f64,
}

impl Default for PerceptualParams {
    fn default() -> Self {
        Self {
            shortlist_len: 8,
            lightness_tolerance: 3.0,
            lightness_weight: 0.7,
            chroma_tolerance: 3.0,
            chroma_weight: 0.7,
            hue_weight: 0.3,
            neutral_gate: 3.0,
            neutral_bias_threshold: 6.0,
            neutral_bias: 0.15,
            stability_scale: 5.0,
        }
    }
}

impl PerceptualParams {
    /// Create parameters with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shortlist length. Values below 1 are treated as 1.
    #[inline]
    pub fn shortlist_len(mut self, len: usize) -> Self {
        self.shortlist_len = len.max(1);
        self
    }

    /// Set the lightness tolerance and weight.
    #[inline]
    pub fn lightness(mut self, tolerance: f64, weight: f64) -> Self {
        self.lightness_tolerance = tolerance;
        self.lightness_weight = weight;
        self
    }

    /// Set the chroma tolerance and weight.
    #[inline]
    pub fn chroma(mut self, tolerance: f64, weight: f64) -> Self {
        self.chroma_tolerance = tolerance;
        self.chroma_weight = weight;
        self
    }

    #[inline]
    pub fn hue_weight(mut self, weight: f64) -> Self {
        self.hue_weight = weight;
        self
    }

    /// Set the neutral bias and the pixel chroma below which it applies.
    #[inline]
    pub fn neutral_bias(mut self, bias: f64, threshold: f64) -> Self {
        self.neutral_bias = bias;
        self.neutral_bias_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let params = PerceptualParams::default();
        assert_eq!(params.shortlist_len, 8);
        assert_eq!(params.lightness_tolerance, 3.0);
        assert_eq!(params.lightness_weight, 0.7);
        assert_eq!(params.chroma_tolerance, 3.0);
        assert_eq!(params.chroma_weight, 0.7);
        assert_eq!(params.hue_weight, 0.3);
        assert_eq!(params.neutral_gate, 3.0);
        assert_eq!(params.neutral_bias_threshold, 6.0);
        assert_eq!(params.neutral_bias, 0.15);
        assert_eq!(params.stability_scale, 5.0);
    }

    #[test]
    fn test_builder_chain() {
        let params = PerceptualParams::new()
            .shortlist_len(0)
            .lightness(1.0, 2.0)
            .chroma(4.0, 5.0)
            .neutral_bias(0.5, 10.0);
        assert_eq!(params.shortlist_len, 1);
        assert_eq!(params.lightness_tolerance, 1.0);
        assert_eq!(params.lightness_weight, 2.0);
        assert_eq!(params.chroma_tolerance, 4.0);
        assert_eq!(params.chroma_weight, 5.0);
        assert_eq!(params.neutral_bias, 0.5);
        assert_eq!(params.neutral_bias_threshold, 10.0);
    }
}
