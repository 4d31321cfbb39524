/// Volume density in kg/m³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Density(pub f64);

/// 1 g/cm³ expressed in kg/m³
const GRAMS_PER_CM3_TO_KG_PER_M3: f64 = 1_000.0;

impl Density {
    pub fn from_kg_per_m3(value: f64) -> Self {
        Self(value)
    }

    pub fn from_grams_per_cm3(value: f64) -> Self {
        Self(value * GRAMS_PER_CM3_TO_KG_PER_M3)
    }

    pub fn to_kg_per_m3(&self) -> f64 {
        self.0
    }

    pub fn to_grams_per_cm3(&self) -> f64 {
        self.0 / GRAMS_PER_CM3_TO_KG_PER_M3
    }
}
