//! Engine configuration.

use dataset::ScanDensity;
use resample::{ExpandMethod, ReduceMethod};
use serde::{Deserialize, Serialize};

/// Configuration for the view engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Frame-sampling density of the range estimator.
    pub scan_density: ScanDensity,

    /// Method used when enlarging a slice.
    pub expand_method: ExpandMethod,

    /// Method used when shrinking a slice.
    pub reduce_method: ReduceMethod,

    /// Damping applied to the bilinear border extrapolation gradient.
    /// Empirical constant; there is no documented derivation of the 0.2
    /// default.
    pub edge_damping: f32,

    /// Recompute only newly exposed geolocator window cells per step
    /// (true) or the full 3x3 window (false).
    pub geolocator_incremental: bool,

    /// Number of rendered frames kept per view configuration.
    pub frame_cache_size: usize,

    /// Capacity of the remembered companion-plot position ring.
    pub history_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scan_density: ScanDensity::Fast,
            expand_method: ExpandMethod::Replicate,
            reduce_method: ReduceMethod::Mean,
            edge_damping: 0.2,
            geolocator_incremental: true,
            frame_cache_size: 64,
            history_size: 8,
        }
    }
}

impl ViewConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("VIEW_SCAN_DENSITY") {
            config.scan_density = ScanDensity::from_str(&val);
        }

        if let Ok(val) = std::env::var("VIEW_EXPAND_METHOD") {
            config.expand_method = ExpandMethod::from_str(&val);
        }

        if let Ok(val) = std::env::var("VIEW_REDUCE_METHOD") {
            config.reduce_method = ReduceMethod::from_str(&val);
        }

        if let Ok(val) = std::env::var("VIEW_EDGE_DAMPING") {
            if let Ok(damping) = val.parse() {
                config.edge_damping = damping;
            }
        }

        if let Ok(val) = std::env::var("VIEW_GEOLOCATOR_INCREMENTAL") {
            config.geolocator_incremental = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("VIEW_FRAME_CACHE_SIZE") {
            if let Ok(size) = val.parse() {
                config.frame_cache_size = size;
            }
        }

        if let Ok(val) = std::env::var("VIEW_PLOT_HISTORY_SIZE") {
            if let Ok(size) = val.parse() {
                config.history_size = size;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.edge_damping) {
            return Err("edge_damping must be within 0.0..=1.0".to_string());
        }

        if self.frame_cache_size == 0 {
            return Err("frame_cache_size must be > 0".to_string());
        }

        if self.history_size == 0 {
            return Err("history_size must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewConfig::default();
        assert_eq!(config.scan_density, ScanDensity::Fast);
        assert_eq!(config.expand_method, ExpandMethod::Replicate);
        assert_eq!(config.reduce_method, ReduceMethod::Mean);
        assert!((config.edge_damping - 0.2).abs() < 1e-6);
        assert!(config.geolocator_incremental);
        assert_eq!(config.frame_cache_size, 64);
        assert_eq!(config.history_size, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ViewConfig::default();
        config.edge_damping = 1.5;
        assert!(config.validate().is_err());

        config = ViewConfig::default();
        config.frame_cache_size = 0;
        assert!(config.validate().is_err());

        config = ViewConfig::default();
        config.history_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ViewConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ViewConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scan_density, config.scan_density);
        assert_eq!(back.frame_cache_size, config.frame_cache_size);
    }
}
