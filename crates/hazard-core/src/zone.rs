//! Area code lookups: region buckets and human-readable labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse region bucket an area code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Norte,
    Centro,
    Sul,
    Ilhas,
    Desconhecida,
}

impl Zone {
    /// All zones, in display order.
    pub const ALL: [Zone; 5] = [
        Zone::Norte,
        Zone::Centro,
        Zone::Sul,
        Zone::Ilhas,
        Zone::Desconhecida,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Norte => "norte",
            Zone::Centro => "centro",
            Zone::Sul => "sul",
            Zone::Ilhas => "ilhas",
            Zone::Desconhecida => "desconhecida",
        }
    }

    /// Badge text shown next to an alert, e.g. `Zona: CENTRO`.
    pub fn badge(&self) -> String {
        match self {
            Zone::Desconhecida => "Zona: —".to_string(),
            other => format!("Zona: {}", other.as_str().to_uppercase()),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "norte" => Ok(Zone::Norte),
            "centro" => Ok(Zone::Centro),
            "sul" => Ok(Zone::Sul),
            "ilhas" => Ok(Zone::Ilhas),
            "desconhecida" => Ok(Zone::Desconhecida),
            other => Err(format!("unknown zone: {}", other)),
        }
    }
}

const ISLAND_PREFIX: &str = "AO";
const ISLAND_CODES: &[&str] = &["MAD"];
const NORTE: &[&str] = &["VCT", "BRG", "PRT", "VLR", "BGC"];
const CENTRO: &[&str] = &["AVE", "CBR", "VSE", "GDA", "LRA", "CAS", "CBA"];
const SUL: &[&str] = &["LIS", "SAN", "SET", "STB", "EVR", "BEJ", "FAR"];

/// Hand-curated area names. Some feeds publish the same district under more
/// than one code, and a code may appear twice; lookups honour the last entry.
const AREA_NAMES: &[(&str, &str)] = &[
    ("AVE", "Aveiro"),
    ("BEJ", "Beja"),
    ("BGC", "Bragança"),
    ("BRG", "Braga"),
    ("CBR", "Coimbra"),
    ("CAS", "Castelo Branco"),
    ("CBA", "Castelo Branco"),
    ("EVR", "Évora"),
    ("FAR", "Faro"),
    ("GDA", "Guarda"),
    ("LRA", "Leiria"),
    ("LIS", "Lisboa"),
    ("PRT", "Porto"),
    ("SAN", "Santarém"),
    ("SET", "Setúbal"),
    ("STB", "Setúbal"),
    ("VCT", "Viana do Castelo"),
    ("VLR", "Vila Real"),
    ("VSE", "Viseu"),
    ("MAD", "Madeira"),
    ("AOC", "Açores (Grupo Central)"),
    ("AOR", "Açores (Grupo Oriental)"),
    ("AOW", "Açores (Grupo Ocidental)"),
];

fn canonical_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Classify an area code into a [`Zone`].
///
/// Total: unrecognized or empty codes yield [`Zone::Desconhecida`]. The
/// island check runs first, so an `AO*` code never lands in a mainland set.
pub fn classify_zone(area_code: &str) -> Zone {
    let code = canonical_code(area_code);
    let code = code.as_str();

    if ISLAND_CODES.contains(&code) || code.starts_with(ISLAND_PREFIX) {
        return Zone::Ilhas;
    }
    if NORTE.contains(&code) {
        return Zone::Norte;
    }
    if CENTRO.contains(&code) {
        return Zone::Centro;
    }
    if SUL.contains(&code) {
        return Zone::Sul;
    }
    Zone::Desconhecida
}

/// Human name for an area code, if the table knows it.
pub fn area_name(area_code: &str) -> Option<&'static str> {
    let code = canonical_code(area_code);
    AREA_NAMES
        .iter()
        .rev()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Display label: `"Leiria (LRA)"`, the bare code when unknown, `—` when empty.
pub fn area_display(area_code: &str) -> String {
    let code = canonical_code(area_code);
    match area_name(&code) {
        Some(name) => format!("{} ({})", name, code),
        None if code.is_empty() => "—".to_string(),
        None => code,
    }
}
