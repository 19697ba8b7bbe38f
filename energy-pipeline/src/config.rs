use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Column names the loader looks for in each CSV source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub timestamp: String,
    pub kwh: String,
    pub building: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            kwh: "kwh".to_string(),
            building: "building".to_string(),
        }
    }
}

/// Output file layout, all relative to `dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub cleaned_csv: String,
    pub summary_csv: String,
    pub daily_csv: String,
    pub weekly_csv: String,
    pub summary_txt: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("outputs"),
            cleaned_csv: "cleaned_energy_data.csv".to_string(),
            summary_csv: "building_summary.csv".to_string(),
            daily_csv: "daily_totals.csv".to_string(),
            weekly_csv: "weekly_totals.csv".to_string(),
            summary_txt: "summary.txt".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn cleaned_path(&self) -> PathBuf {
        self.dir.join(&self.cleaned_csv)
    }

    pub fn summary_csv_path(&self) -> PathBuf {
        self.dir.join(&self.summary_csv)
    }

    pub fn daily_path(&self) -> PathBuf {
        self.dir.join(&self.daily_csv)
    }

    pub fn weekly_path(&self) -> PathBuf {
        self.dir.join(&self.weekly_csv)
    }

    pub fn summary_txt_path(&self) -> PathBuf {
        self.dir.join(&self.summary_txt)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub columns: ColumnConfig,
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            columns: ColumnConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the TOML file named by `ENERGY_CONFIG` (default
    /// `energy-config.toml`). A missing file is not an error: the pipeline
    /// runs on defaults so the binary needs no arguments and no setup.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("ENERGY_CONFIG").unwrap_or_else(|_| "energy-config.toml".to_string());
        if !Path::new(&path).exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }
}
