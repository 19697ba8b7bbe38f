//! Accumulator-style access path to the same per-building numbers the
//! aggregate module derives. Rebuilt from the merged dataset on demand, so
//! there is no shared mutable state to keep in sync.

use std::collections::BTreeMap;

use energy_domain::{MeterReading, ReadingRow};

/// Per-building report from the accumulator path.
///
/// Carries no minimum, unlike [`energy_domain::BuildingSummary`]; the two
/// paths are deliberately kept distinct (see DESIGN.md).
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingReport {
    pub building: String,
    pub total_kwh: f64,
    pub mean_kwh: f64,
    pub max_kwh: f64,
}

/// One building and its readings, in insertion order.
#[derive(Debug, Clone)]
pub struct Building {
    name: String,
    readings: Vec<MeterReading>,
}

impl Building {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            readings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    pub fn add_reading(&mut self, reading: MeterReading) {
        self.readings.push(reading);
    }

    pub fn total_consumption(&self) -> f64 {
        self.readings.iter().map(|r| r.kwh).sum()
    }

    /// Total, mean, and max over the accumulated readings. A building with
    /// no readings reports all zeros; the empty-set mean and max are never
    /// evaluated.
    pub fn generate_report(&self) -> BuildingReport {
        if self.readings.is_empty() {
            return BuildingReport {
                building: self.name.clone(),
                total_kwh: 0.0,
                mean_kwh: 0.0,
                max_kwh: 0.0,
            };
        }

        let total = self.total_consumption();
        let max = self
            .readings
            .iter()
            .map(|r| r.kwh)
            .fold(f64::NEG_INFINITY, f64::max);

        BuildingReport {
            building: self.name.clone(),
            total_kwh: total,
            mean_kwh: total / self.readings.len() as f64,
            max_kwh: max,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildingRegistry {
    buildings: BTreeMap<String, Building>,
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the merged dataset. Buildings appear exactly
    /// when they have at least one row there.
    pub fn from_rows(rows: &[ReadingRow]) -> Self {
        let mut registry = Self::new();
        for row in rows {
            registry
                .get_or_create(&row.building)
                .add_reading(row.reading.clone());
        }
        registry
    }

    /// Idempotent: repeated calls with the same name return the same
    /// accumulator entry.
    pub fn get_or_create(&mut self, name: &str) -> &mut Building {
        self.buildings
            .entry(name.to_string())
            .or_insert_with(|| Building::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&Building> {
        self.buildings.get(name)
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// One report per building, sorted by name.
    pub fn report_table(&self) -> Vec<BuildingReport> {
        self.buildings.values().map(Building::generate_report).collect()
    }
}
