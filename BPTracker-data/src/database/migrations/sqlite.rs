// Statements of the `initial_schema` migration.
// Timestamps default to RFC 3339 UTC with milliseconds so text comparison orders them.

const CREATE_BP_RECORDS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS bp_records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        systolic INTEGER NOT NULL,
        diastolic INTEGER NOT NULL,
        pulse INTEGER NOT NULL,
        measured_at TEXT NOT NULL,
        note TEXT,
        image_path TEXT,
        created_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );";

const CREATE_MEDICATION_REMINDERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS medication_reminders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        medication_name TEXT NOT NULL,
        dosage TEXT,
        time TEXT NOT NULL,
        days_of_week TEXT NOT NULL DEFAULT '0,1,2,3,4,5,6',
        is_enabled INTEGER DEFAULT 1,
        notification_id TEXT,
        created_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );";

const CREATE_MEASUREMENT_REMINDERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS measurement_reminders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        time TEXT NOT NULL,
        days_of_week TEXT NOT NULL DEFAULT '0,1,2,3,4,5,6',
        is_enabled INTEGER DEFAULT 1,
        notification_id TEXT,
        created_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );";

const CREATE_USER_PROFILE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS user_profile (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        name TEXT NOT NULL DEFAULT '',
        age INTEGER,
        gender TEXT,
        medical_conditions TEXT,
        created_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );";

const CREATE_APP_SETTINGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS app_settings (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        pressure_unit TEXT DEFAULT 'mmHg',
        notifications_enabled INTEGER DEFAULT 1,
        abnormal_alert_enabled INTEGER DEFAULT 1,
        bp_threshold_high_systolic INTEGER DEFAULT 140,
        bp_threshold_high_diastolic INTEGER DEFAULT 90,
        bp_threshold_low_systolic INTEGER DEFAULT 90,
        bp_threshold_low_diastolic INTEGER DEFAULT 60,
        dark_mode TEXT DEFAULT 'system',
        cloud_sync_enabled INTEGER DEFAULT 0,
        created_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );";

const CREATE_MIGRATIONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS migrations (
        version INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        executed_at TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );";

const CREATE_INDEXES: &str = "
    CREATE INDEX IF NOT EXISTS idx_bp_records_measured_at ON bp_records (measured_at);
    CREATE INDEX IF NOT EXISTS idx_medication_reminders_time ON medication_reminders (time);
    CREATE INDEX IF NOT EXISTS idx_measurement_reminders_time ON measurement_reminders (time);";

const INSERT_DEFAULT_PROFILE: &str = "INSERT OR IGNORE INTO user_profile (id, name) VALUES (1, '');";

const INSERT_DEFAULT_SETTINGS: &str = "INSERT OR IGNORE INTO app_settings (id) VALUES (1);";

pub(super) const INITIAL_STATEMENTS: &[&str] = &[
    CREATE_BP_RECORDS_TABLE,
    CREATE_MEDICATION_REMINDERS_TABLE,
    CREATE_MEASUREMENT_REMINDERS_TABLE,
    CREATE_USER_PROFILE_TABLE,
    CREATE_APP_SETTINGS_TABLE,
    CREATE_MIGRATIONS_TABLE,
    CREATE_INDEXES,
    INSERT_DEFAULT_PROFILE,
    INSERT_DEFAULT_SETTINGS,
];
