// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::StoreError;

/// Initializes the database schema.
///
/// # Arguments
///
/// * `conn` - The database connection to initialize
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute_batch(
        "
        -- Shared uploaded images, one row per content-derived
        -- identifier. Rows are never updated; orphan cleanup happens
        -- outside this system.
        CREATE TABLE IF NOT EXISTS images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            role TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS venues (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            address TEXT
        );

        CREATE TABLE IF NOT EXISTS rooms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            venue_id INTEGER NOT NULL,
            FOREIGN KEY(venue_id) REFERENCES venues(id)
        );

        CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            start_time TEXT,
            end_time TEXT,
            category_id INTEGER NOT NULL,
            day_id INTEGER NOT NULL,
            venue_id INTEGER NOT NULL,
            room_id INTEGER,
            image_id INTEGER,
            FOREIGN KEY(category_id) REFERENCES categories(id),
            FOREIGN KEY(day_id) REFERENCES days(id),
            FOREIGN KEY(venue_id) REFERENCES venues(id),
            FOREIGN KEY(room_id) REFERENCES rooms(id),
            FOREIGN KEY(image_id) REFERENCES images(id)
        );

        CREATE INDEX IF NOT EXISTS idx_events_day
            ON events(day_id);

        CREATE INDEX IF NOT EXISTS idx_events_venue
            ON events(venue_id);

        CREATE TABLE IF NOT EXISTS pro_shows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            day_id INTEGER NOT NULL,
            venue_id INTEGER NOT NULL,
            image_id INTEGER,
            FOREIGN KEY(day_id) REFERENCES days(id),
            FOREIGN KEY(venue_id) REFERENCES venues(id),
            FOREIGN KEY(image_id) REFERENCES images(id)
        );

        CREATE TABLE IF NOT EXISTS merchandise (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            image_id INTEGER,
            FOREIGN KEY(image_id) REFERENCES images(id)
        );

        CREATE TABLE IF NOT EXISTS sponsors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            website TEXT,
            image_id INTEGER,
            FOREIGN KEY(image_id) REFERENCES images(id)
        );

        CREATE TABLE IF NOT EXISTS team (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            phone TEXT,
            image_id INTEGER,
            FOREIGN KEY(image_id) REFERENCES images(id)
        );

        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            value TEXT NOT NULL
        );

        -- Append-only audit log. The actor reference survives user
        -- deletion as NULL so historical entries stay intact.
        CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            actor_id INTEGER,
            action TEXT NOT NULL,
            old_value TEXT,
            new_value TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY(actor_id) REFERENCES users(id) ON DELETE SET NULL
        );
        ",
    )?;

    Ok(())
}

/// Verifies that foreign key enforcement is enabled.
///
/// This is a startup-time check required to ensure referential
/// integrity constraints are enforced.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &Connection) -> Result<(), StoreError> {
    let enabled: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
    if enabled == 1 {
        Ok(())
    } else {
        Err(StoreError::Unknown(String::from(
            "foreign key enforcement is not enabled",
        )))
    }
}

/// Enables WAL mode for better read concurrency on file-backed stores.
///
/// # Errors
///
/// Returns an error if the journal mode cannot be changed.
pub fn enable_wal_mode(conn: &Connection) -> Result<(), StoreError> {
    let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    info!(journal_mode = %mode, "Set journal mode");
    Ok(())
}
