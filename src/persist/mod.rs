//! Optional SQLite-backed session persistence
//!
//! The store records camera profiles, per-second frame telemetry, and error
//! lines. It is strictly best-effort: if the database cannot be opened or a
//! write fails, the renderer keeps going and the call reports `false`. A store
//! that failed to open degrades every call to a silent no-op.

use std::path::Path;

use rusqlite::{params, Connection};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS profiles (
    name TEXT PRIMARY KEY,
    camera_pos_x REAL, camera_pos_y REAL, camera_pos_z REAL,
    fov REAL, projection TEXT
);
CREATE TABLE IF NOT EXISTS telemetry (
    ts DATETIME DEFAULT CURRENT_TIMESTAMP,
    fps REAL, frame_ms REAL
);
CREATE TABLE IF NOT EXISTS errors (
    ts DATETIME DEFAULT CURRENT_TIMESTAMP,
    source TEXT, message TEXT
);
";

/// Embedded relational store for profiles, telemetry, and error lines.
pub struct SceneStore {
    connection: Option<Connection>,
}

impl SceneStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    ///
    /// Any failure logs a warning and returns a degraded store whose writes
    /// are no-ops; persistence must never take the viewer down.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let connection = match Connection::open(path) {
            Ok(connection) => match connection.execute_batch(SCHEMA) {
                Ok(()) => Some(connection),
                Err(err) => {
                    log::warn!("session store schema setup failed: {err}; persistence disabled");
                    None
                }
            },
            Err(err) => {
                log::warn!("session store {path:?} unavailable: {err}; persistence disabled");
                None
            }
        };
        Self { connection }
    }

    /// In-memory store, used by tests and available for ephemeral sessions.
    pub fn in_memory() -> Self {
        let connection = match Connection::open_in_memory() {
            Ok(connection) => connection
                .execute_batch(SCHEMA)
                .map(|()| connection)
                .map_err(|err| log::warn!("in-memory store setup failed: {err}"))
                .ok(),
            Err(err) => {
                log::warn!("in-memory store unavailable: {err}");
                None
            }
        };
        Self { connection }
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Upserts a named camera profile. `projection` is `"PERSPECTIVE"` or
    /// `"ORTHO"`.
    pub fn save_camera_profile(
        &self,
        name: &str,
        x: f32,
        y: f32,
        z: f32,
        fov: f32,
        projection: &str,
    ) -> bool {
        let Some(connection) = &self.connection else {
            return false;
        };

        let result = connection.execute(
            "INSERT INTO profiles(name, camera_pos_x, camera_pos_y, camera_pos_z, fov, projection) \
             VALUES(?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(name) DO UPDATE SET \
              camera_pos_x=excluded.camera_pos_x, \
              camera_pos_y=excluded.camera_pos_y, \
              camera_pos_z=excluded.camera_pos_z, \
              fov=excluded.fov, \
              projection=excluded.projection",
            params![name, f64::from(x), f64::from(y), f64::from(z), f64::from(fov), projection],
        );

        match result {
            Ok(_) => true,
            Err(err) => {
                log::warn!("saving camera profile '{name}' failed: {err}");
                false
            }
        }
    }

    /// Appends one telemetry sample.
    pub fn log_telemetry(&self, fps: f64, frame_ms: f64) -> bool {
        let Some(connection) = &self.connection else {
            return false;
        };

        match connection.execute(
            "INSERT INTO telemetry(fps, frame_ms) VALUES(?1, ?2)",
            params![fps, frame_ms],
        ) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("telemetry write failed: {err}");
                false
            }
        }
    }

    /// Appends one error line.
    pub fn log_error(&self, source: &str, message: &str) -> bool {
        let Some(connection) = &self.connection else {
            return false;
        };

        match connection.execute(
            "INSERT INTO errors(source, message) VALUES(?1, ?2)",
            params![source, message],
        ) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("error-log write failed: {err}");
                false
            }
        }
    }
}

/// Limits telemetry writes to at most one per accumulated second.
///
/// Blocking database writes happen on the render thread, so their cadence is
/// bounded instead of their cost being paid every frame.
#[derive(Debug, Default)]
pub struct TelemetryThrottle {
    accumulated: f64,
}

impl TelemetryThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a frame's delta time; returns `true` once a full second has
    /// accumulated, then starts over.
    pub fn tick(&mut self, delta_time: f64) -> bool {
        self.accumulated += delta_time;
        if self.accumulated >= 1.0 {
            self.accumulated = 0.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_count(store: &SceneStore, table: &str) -> i64 {
        store
            .connection
            .as_ref()
            .unwrap()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn profiles_upsert_by_name() {
        let store = SceneStore::in_memory();
        assert!(store.is_open());

        assert!(store.save_camera_profile("desk", 0.0, 5.0, 12.0, 80.0, "PERSPECTIVE"));
        assert!(store.save_camera_profile("desk", 1.0, 2.0, 3.0, 45.0, "ORTHO"));
        assert_eq!(row_count(&store, "profiles"), 1);

        let (fov, projection): (f64, String) = store
            .connection
            .as_ref()
            .unwrap()
            .query_row(
                "SELECT fov, projection FROM profiles WHERE name = 'desk'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(fov, 45.0);
        assert_eq!(projection, "ORTHO");
    }

    #[test]
    fn telemetry_and_errors_append() {
        let store = SceneStore::in_memory();
        assert!(store.log_telemetry(60.0, 16.6));
        assert!(store.log_telemetry(58.0, 17.2));
        assert!(store.log_error("texture", "decode failed"));

        assert_eq!(row_count(&store, "telemetry"), 2);
        assert_eq!(row_count(&store, "errors"), 1);
    }

    #[test]
    fn unavailable_store_degrades_to_noops() {
        let store = SceneStore::open("/nonexistent-dir/deskview.db");
        assert!(!store.is_open());
        assert!(!store.save_camera_profile("desk", 0.0, 0.0, 0.0, 80.0, "PERSPECTIVE"));
        assert!(!store.log_telemetry(60.0, 16.6));
        assert!(!store.log_error("render", "lost surface"));
    }

    #[test]
    fn throttle_fires_once_per_accumulated_second() {
        let mut throttle = TelemetryThrottle::new();

        // 0.016 * 63 = 1.008 is the first frame past one accumulated second
        let mut first_fire = None;
        for frame in 1..=63 {
            if throttle.tick(0.016) {
                first_fire = Some(frame);
            }
        }
        assert_eq!(first_fire, Some(63));

        // the accumulator reset, so the next fire needs another full second
        let mut fired = 0;
        for _ in 0..63 {
            if throttle.tick(0.016) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
    }
}
