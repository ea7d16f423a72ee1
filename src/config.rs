use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Mesh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub n: usize,
    pub min: f64,
    pub max: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            n: 21,
            min: -1.0,
            max: 1.0,
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<()> {
        if self.n < 2 {
            return Err(anyhow!(
                "Grid needs at least 2 points per axis, got {}",
                self.n
            ));
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(anyhow!(
                "Grid interval must satisfy min < max (min={}, max={})",
                self.min,
                self.max
            ));
        }
        Ok(())
    }
}

/// Biaxial loading: diagonal strain components
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub e11: f64,
    pub e22: f64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            e11: 0.1,
            e22: -0.1,
        }
    }
}

impl LoadingConfig {
    fn validate(&self) -> Result<()> {
        if !self.e11.is_finite() || !self.e22.is_finite() {
            return Err(anyhow!(
                "Strain components must be finite (e11={}, e22={})",
                self.e11,
                self.e22
            ));
        }
        Ok(())
    }
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub output: String,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            output: "1.png".to_string(),
            image_width: 1800,
            image_height: 550,
        }
    }
}

impl VisualizationConfig {
    fn validate(&self) -> Result<()> {
        if self.output.is_empty() {
            return Err(anyhow!("Output path must not be empty"));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(anyhow!(
                "Image dimensions must be positive (width={}, height={})",
                self.image_width,
                self.image_height
            ));
        }
        Ok(())
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub loading: LoadingConfig,
    pub visualization: VisualizationConfig,
}

impl Config {
    /// Load configuration from a TOML file if it exists, otherwise fall back
    /// to the built-in defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        let config = if Path::new(path).exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read config file '{}': {}", path, e))?;
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?
        } else {
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.loading.validate()?;
        self.visualization.validate()?;
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("=== Biaxial Loading Configuration ===");
        println!(
            "Grid: {}x{} points over [{}, {}]^2",
            self.grid.n, self.grid.n, self.grid.min, self.grid.max
        );
        println!(
            "Loading: e11={}, e22={}",
            self.loading.e11, self.loading.e22
        );
        println!(
            "Visualization: {}x{} px -> {}",
            self.visualization.image_width, self.visualization.image_height,
            self.visualization.output
        );
        println!("=====================================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_validate() {
        let config = Config::default();
        assert_eq!(config.grid.n, 21);
        assert_eq!(config.grid.min, -1.0);
        assert_eq!(config.grid.max, 1.0);
        assert_eq!(config.loading.e11, 0.1);
        assert_eq!(config.loading.e22, -0.1);
        assert_eq!(config.visualization.output, "1.png");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let mut config = Config::default();
        config.grid.n = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.grid.min = config.grid.max;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.loading.e11 = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.visualization.image_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config: Config = toml::from_str(
            "[grid]\n\
             n = 11\n\
             \n\
             [loading]\n\
             e11 = 0.2\n",
        )
        .unwrap();

        assert_eq!(config.grid.n, 11);
        assert_eq!(config.grid.min, -1.0);
        assert_eq!(config.loading.e11, 0.2);
        assert_eq!(config.loading.e22, -0.1);
        assert_eq!(config.visualization.output, "1.png");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default("definitely/not/a/config.toml").unwrap();
        assert_eq!(config.grid.n, 21);
    }
}
