//! SQLite schema definition.

/// Complete database schema.
///
/// Entity tables share one layout: key columns for lookup and ordering, and
/// the full record as JSON in `payload`.
pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Entity Tables
-- ============================================================================

CREATE TABLE IF NOT EXISTS treatments (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    payload TEXT NOT NULL,                       -- JSON Treatment
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_treatments_pet ON treatments(pet_id);

CREATE TABLE IF NOT EXISTS vaccinations (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    payload TEXT NOT NULL,                       -- JSON Vaccination
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_vaccinations_pet ON vaccinations(pet_id);

CREATE TABLE IF NOT EXISTS vet_visits (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    payload TEXT NOT NULL,                       -- JSON VetVisit
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_vet_visits_pet ON vet_visits(pet_id);

CREATE TABLE IF NOT EXISTS weight_entries (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    payload TEXT NOT NULL,                       -- JSON WeightEntry
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_weight_entries_pet ON weight_entries(pet_id);

CREATE TABLE IF NOT EXISTS medications (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    payload TEXT NOT NULL,                       -- JSON Medication
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_medications_pet ON medications(pet_id);

CREATE TABLE IF NOT EXISTS conditions (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    payload TEXT NOT NULL,                       -- JSON Condition
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_conditions_pet ON conditions(pet_id);

CREATE TABLE IF NOT EXISTS allergies (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    payload TEXT NOT NULL,                       -- JSON Allergy
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_allergies_pet ON allergies(pet_id);

-- ============================================================================
-- Health Scores (append-only, newest row wins)
-- ============================================================================

CREATE TABLE IF NOT EXISTS health_scores (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL,
    overall_score REAL NOT NULL CHECK (overall_score >= 0 AND overall_score <= 100),
    vaccination_score REAL NOT NULL,
    preventive_care_score REAL NOT NULL,
    weight_score REAL NOT NULL,
    condition_score REAL NOT NULL,
    recommendations TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    calculated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_health_scores_pet ON health_scores(pet_id, calculated_at);
"#;
