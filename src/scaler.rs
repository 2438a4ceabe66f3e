//! Per-feature Z-score standardization.
//!
//! Raw readings are put on the scale the network was trained with:
//! `z = (x - mean[i]) / scale[i]`. The table is compiled in and never changes,
//! so a bad table is a build/configuration fault caught once by [`Scaler::new`],
//! not something checked per sample.

use crate::config::{NUM_FEATURES, SCALER_MEAN, SCALER_SCALE};
use crate::features::{Feature, FeatureVector};

/// Scaler table rejected at startup.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum ScalerError {
    /// `scale[feature]` is zero, so standardizing would divide by zero.
    ZeroScale(Feature),
    /// `mean` or `scale` for `feature` is NaN or infinite.
    NonFinite(Feature),
}

/// Validated standardization parameters.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Scaler {
    mean: [f32; NUM_FEATURES],
    scale: [f32; NUM_FEATURES],
}

impl Scaler {
    /// Build a scaler from parallel mean/scale tables, rejecting unusable entries.
    pub fn new(
        mean: [f32; NUM_FEATURES],
        scale: [f32; NUM_FEATURES],
    ) -> Result<Self, ScalerError> {
        for feature in Feature::ALL {
            let i = feature.index();
            if !mean[i].is_finite() || !scale[i].is_finite() {
                return Err(ScalerError::NonFinite(feature));
            }
            if scale[i] == 0.0 {
                return Err(ScalerError::ZeroScale(feature));
            }
        }
        Ok(Self { mean, scale })
    }

    /// The table exported with the trained model.
    pub fn trained() -> Result<Self, ScalerError> { Self::new(SCALER_MEAN, SCALER_SCALE) }

    /// Standardize one value of `feature`.
    #[inline]
    pub fn standardize(
        &self,
        value: f32,
        feature: Feature,
    ) -> f32 {
        let i = feature.index();
        (value - self.mean[i]) / self.scale[i]
    }

    /// Map a standardized value of `feature` back to physical units.
    #[inline]
    pub fn destandardize(
        &self,
        z: f32,
        feature: Feature,
    ) -> f32 {
        let i = feature.index();
        z * self.scale[i] + self.mean[i]
    }

    /// Standardize a whole vector in place. Raw values are not kept.
    pub fn standardize_in_place(
        &self,
        vector: &mut FeatureVector,
    ) {
        for feature in Feature::ALL {
            let value = &mut vector[feature.index()];
            *value = self.standardize(*value, feature);
        }
    }

    /// Per-feature mean.
    pub const fn mean(&self) -> &[f32; NUM_FEATURES] { &self.mean }

    /// Per-feature scale.
    pub const fn scale(&self) -> &[f32; NUM_FEATURES] { &self.scale }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trained_table_is_valid() {
        assert!(Scaler::trained().is_ok());
    }

    #[test]
    fn test_mean_maps_to_zero() {
        let scaler = Scaler::trained().unwrap();
        for feature in Feature::ALL {
            let mean = scaler.mean()[feature.index()];
            assert_eq!(scaler.standardize(mean, feature), 0.0);
        }
    }

    #[test]
    fn test_one_scale_above_mean_is_one() {
        let scaler = Scaler::trained().unwrap();
        let value = SCALER_MEAN[1] + SCALER_SCALE[1];
        assert!((scaler.standardize(value, Feature::HumidityAht20) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_identity_table() {
        let scaler = Scaler::new([0.0; 4], [1.0; 4]).unwrap();
        assert_eq!(scaler.standardize(12.5, Feature::TempBmp280), 12.5);
    }

    #[test]
    fn test_zero_scale_rejected() {
        let err = Scaler::new([0.0; 4], [1.0, 1.0, 0.0, 1.0]).unwrap_err();
        assert_eq!(err, ScalerError::ZeroScale(Feature::TempBmp280));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = Scaler::new([0.0, f32::NAN, 0.0, 0.0], [1.0; 4]).unwrap_err();
        assert_eq!(err, ScalerError::NonFinite(Feature::HumidityAht20));

        let err = Scaler::new([0.0; 4], [1.0, 1.0, 1.0, f32::INFINITY]).unwrap_err();
        assert_eq!(err, ScalerError::NonFinite(Feature::PressureBmp280));
    }

    #[test]
    fn test_standardize_in_place() {
        let scaler = Scaler::new([10.0, 50.0, 20.0, 1000.0], [2.0, 10.0, 4.0, 5.0]).unwrap();
        let mut v = [12.0, 40.0, 20.0, 1010.0];
        scaler.standardize_in_place(&mut v);
        assert_eq!(v, [1.0, -1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_destandardize_inverts() {
        let scaler = Scaler::trained().unwrap();
        let raw = 23.4;
        let z = scaler.standardize(raw, Feature::TempAht20);
        assert!((scaler.destandardize(z, Feature::TempAht20) - raw).abs() < 1e-4);
    }
}
