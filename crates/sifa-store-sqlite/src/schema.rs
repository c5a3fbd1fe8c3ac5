//! SQL schema for the sifa SQLite store.
//!
//! Executed on every open; idempotent thanks to `CREATE TABLE IF NOT
//! EXISTS`. Future migrations will be gated on `PRAGMA user_version`.

/// Username seeded when the `users` table is empty, so a fresh install can
/// always log in.
pub const BOOTSTRAP_USERNAME: &str = "admin";
/// Matching bootstrap password, stored as-is — see the compatibility note
/// on the `hashed_password` column.
pub const BOOTSTRAP_PASSWORD: &str = "admin123";

/// Full schema DDL. Foreign keys are switched on here because cascade
/// deletion of a patient's children is engine-enforced, not done in
/// application code.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT UNIQUE NOT NULL,
    hashed_password TEXT NOT NULL    -- plaintext; column name kept for compatibility
);

CREATE TABLE IF NOT EXISTS patients (
    id                           INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name                    TEXT NOT NULL,
    phone_number                 TEXT NOT NULL,
    age                          INTEGER,
    place                        TEXT,
    father_name                  TEXT,
    school_class_studied         TEXT,
    madrasa_class_studied        TEXT,
    is_married                   INTEGER DEFAULT 0,
    husband_name                 TEXT,
    husband_job                  TEXT,
    kids_count                   INTEGER DEFAULT 0,
    is_working                   INTEGER DEFAULT 0,
    has_siblings                 INTEGER DEFAULT 0,
    siblings_have_issues         INTEGER DEFAULT 0,
    core_reason                  TEXT,
    when_it_started              TEXT,
    previously_sought_help       TEXT DEFAULT '[]',  -- JSON list of provider categories
    previously_sought_help_other TEXT,
    medicine_status              TEXT,
    other_medications            TEXT,
    other_diseases               TEXT,
    is_genetic                   INTEGER DEFAULT 0,
    genetic_relative_name        TEXT,
    job_field                    TEXT,
    psychologist_name            TEXT,               -- JSON list of names; singular column names are historical
    psychiatrist_name            TEXT,
    spiritual_name               TEXT,
    homeopathy_name              TEXT,
    ayurveda_name                TEXT,
    unani_name                   TEXT,
    years_on_medicine            INTEGER,
    created_at                   TEXT DEFAULT (datetime('now'))
);

-- Kid rows are replaced wholesale on every patient write.
CREATE TABLE IF NOT EXISTS kids (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    sex        TEXT,
    age        INTEGER,
    patient_id INTEGER NOT NULL,
    FOREIGN KEY (patient_id) REFERENCES patients(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS core_issues (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id           INTEGER UNIQUE NOT NULL,
    is_about_belief      INTEGER DEFAULT 0,
    belief_types         TEXT DEFAULT '[]',  -- JSON list of {title, description}
    niyyath_related      TEXT DEFAULT '[]',
    wudu_niyyath_time    TEXT,
    namaz_niyyath_time   TEXT,
    ghusl_niyyath_time   TEXT,
    fasting_niyyath_time TEXT,
    najas_related        TEXT DEFAULT '[]',
    urination_time       TEXT,
    motion_time          TEXT,
    ghusl_najas_time     TEXT,
    normal_bath_time     TEXT,
    hand_washing_time    TEXT,
    dress_washing_time   TEXT,
    dog_related          INTEGER DEFAULT 0,
    pig_related          INTEGER DEFAULT 0,
    over_soaping         INTEGER DEFAULT 0,
    insects_related      INTEGER DEFAULT 0,
    gas_locking_related  INTEGER DEFAULT 0,
    fear_of_death        INTEGER DEFAULT 0,
    fear_of_disease      INTEGER DEFAULT 0,
    door_locking_related INTEGER DEFAULT 0,
    wudu_time            TEXT,
    namaz_time           TEXT,
    other_issues         TEXT,
    FOREIGN KEY (patient_id) REFERENCES patients(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sessions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT NOT NULL,
    date          TEXT NOT NULL,
    log           TEXT,
    progress_note TEXT,
    patient_id    INTEGER NOT NULL,
    FOREIGN KEY (patient_id) REFERENCES patients(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS tracked_issues (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT NOT NULL,
    percentage_cured INTEGER DEFAULT 0,
    patient_id       INTEGER NOT NULL,
    FOREIGN KEY (patient_id) REFERENCES patients(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS schedule_events (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    title  TEXT NOT NULL,
    time   TEXT NOT NULL,
    status TEXT DEFAULT 'Scheduled'
);

CREATE INDEX IF NOT EXISTS kids_patient_idx           ON kids(patient_id);
CREATE INDEX IF NOT EXISTS sessions_patient_idx       ON sessions(patient_id);
CREATE INDEX IF NOT EXISTS tracked_issues_patient_idx ON tracked_issues(patient_id);

PRAGMA user_version = 1;
";
