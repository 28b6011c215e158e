//! Detector geometry constant lookup.

use std::collections::HashMap;

use log::warn;

use crate::error::{Error, Result};

/// Source of named detector constants (lengths in mm).
pub trait GeometryService: Send + Sync {
    /// Resolves a named constant.
    fn constant(&self, name: &str) -> Result<f64>;
}

/// Map-backed geometry service.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    constants: HashMap<String, f64>,
}

impl StaticGeometry {
    /// Creates an empty geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constant.
    #[must_use]
    pub fn with_constant(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constants.insert(name.into(), value);
        self
    }
}

impl GeometryService for StaticGeometry {
    fn constant(&self, name: &str) -> Result<f64> {
        self.constants
            .get(name)
            .copied()
            .ok_or_else(|| Error::MissingConstant(name.to_string()))
    }
}

/// Resolves `name`, falling back to `fallback` with a warning on failure.
pub fn resolve_constant(geometry: &dyn GeometryService, name: &str, fallback: f64) -> f64 {
    match geometry.constant(name) {
        Ok(value) => value,
        Err(err) => {
            warn!("{err}; using fallback value {fallback}");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_constant() {
        let geometry = StaticGeometry::new().with_constant("zdc_z", 35_500.0);
        assert!((resolve_constant(&geometry, "zdc_z", 1.0) - 35_500.0).abs() < f64::EPSILON);
        assert!((resolve_constant(&geometry, "missing", 1.0) - 1.0).abs() < f64::EPSILON);
        assert!(matches!(
            geometry.constant("missing"),
            Err(Error::MissingConstant(_))
        ));
    }
}
