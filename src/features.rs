//! Feature vector layout.
//!
//! Every time step of the model input is one [`FeatureVector`]: four readings in the fixed
//! order the network was trained with. Index order is part of the model contract.

use crate::config::NUM_FEATURES;

/// One time step of model input, indexed by [`Feature::index`].
pub type FeatureVector = [f32; NUM_FEATURES];

/// A single model input feature.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
#[repr(u8)]
pub enum Feature {
    /// AHT20 temperature, degrees Celsius.
    TempAht20 = 0,
    /// AHT20 relative humidity, percent.
    HumidityAht20 = 1,
    /// BMP280 temperature, degrees Celsius.
    TempBmp280 = 2,
    /// BMP280 pressure, hectopascals.
    PressureBmp280 = 3,
}

impl Feature {
    /// All features in tensor order.
    pub const ALL: [Self; NUM_FEATURES] = [Self::TempAht20, Self::HumidityAht20, Self::TempBmp280, Self::PressureBmp280];

    /// Position of this feature inside a [`FeatureVector`].
    #[inline]
    pub const fn index(self) -> usize { self as usize }

    /// Column name used when the training data was logged.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TempAht20 => "Temp_AHT20_C",
            Self::HumidityAht20 => "Umid_AHT20_pct",
            Self::TempBmp280 => "Temp_BMP280_C",
            Self::PressureBmp280 => "Press_BMP280_hPa",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_match_tensor_order() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_names_distinct() {
        let names = Feature::ALL.map(Feature::name);
        for i in 0..names.len() {
            for j in i + 1..names.len() {
                assert_ne!(names[i], names[j]);
            }
        }
    }
}
