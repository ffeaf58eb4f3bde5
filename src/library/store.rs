use crate::audio::Track;
use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct TrackStore {
    conn: Connection,
}

impl TrackStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!("Created store directory: {}", parent.display());
            }
        }

        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.initialize_tables()?;
        debug!("Opened track store at {}", db_path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize_tables()?;
        Ok(store)
    }

    fn initialize_tables(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS music (
                path TEXT NOT NULL UNIQUE
            )",
            [],
        )?;
        Ok(())
    }

    /// Append `path`. The store is left untouched when it is already present.
    pub fn add(&self, path: &Path) -> Result<Track, StoreError> {
        let text = path
            .to_str()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| StoreError::InvalidPath(path.to_path_buf()))?;

        let inserted = self
            .conn
            .execute("INSERT OR IGNORE INTO music (path) VALUES (?1)", params![text])?;

        if inserted == 0 {
            return Err(StoreError::DuplicateTrack(path.to_path_buf()));
        }

        info!("Added track {}", path.display());
        Ok(Track::new(path.to_path_buf()))
    }

    /// Every track in the order it was first added.
    pub fn list(&self) -> Result<Vec<Track>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT path FROM music ORDER BY rowid")?;

        let tracks = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|path| path.map(|p| Track::new(PathBuf::from(p))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tracks)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM music", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, path: &Path) -> Result<bool, StoreError> {
        let Some(text) = path.to_str() else {
            return Ok(false);
        };
        let found = self
            .conn
            .query_row("SELECT 1 FROM music WHERE path = ?1", params![text], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(store: &TrackStore) -> Vec<PathBuf> {
        store.list().unwrap().into_iter().map(|t| t.file_path).collect()
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = TrackStore::open_in_memory().unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn duplicate_add_is_rejected_and_changes_nothing() {
        let store = TrackStore::open_in_memory().unwrap();
        store.add(Path::new("/music/a.mp3")).unwrap();

        let err = store.add(Path::new("/music/a.mp3")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTrack(p) if p == Path::new("/music/a.mp3")));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn order_is_first_successful_insertion() {
        let store = TrackStore::open_in_memory().unwrap();
        for p in ["/m/c.mp3", "/m/a.mp3", "/m/c.mp3", "/m/b.wav", "/m/a.mp3"] {
            let _ = store.add(Path::new(p));
        }
        assert_eq!(
            paths(&store),
            vec![
                PathBuf::from("/m/c.mp3"),
                PathBuf::from("/m/a.mp3"),
                PathBuf::from("/m/b.wav"),
            ]
        );
    }

    #[test]
    fn blank_path_is_invalid_not_duplicate() {
        let store = TrackStore::open_in_memory().unwrap();
        assert!(matches!(store.add(Path::new("")), Err(StoreError::InvalidPath(_))));
        assert!(matches!(store.add(Path::new("   ")), Err(StoreError::InvalidPath(_))));
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn quotes_in_paths_are_stored_verbatim() {
        let store = TrackStore::open_in_memory().unwrap();
        let odd = Path::new("/music/\"quoted\" it's.mp3");
        store.add(odd).unwrap();
        assert!(store.contains(odd).unwrap());
        assert!(!store.contains(Path::new("/music/other.mp3")).unwrap());
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("music.db");
        {
            let store = TrackStore::open(&db).unwrap();
            store.add(Path::new("/music/a.mp3")).unwrap();
            store.add(Path::new("/music/b.mp3")).unwrap();
        }
        let store = TrackStore::open(&db).unwrap();
        assert_eq!(
            paths(&store),
            vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b.mp3")]
        );
        assert!(matches!(
            store.add(Path::new("/music/b.mp3")),
            Err(StoreError::DuplicateTrack(_))
        ));
    }
}
