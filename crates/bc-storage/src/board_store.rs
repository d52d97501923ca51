//! File system storage for board snapshots and event logs

use bc_core::comment::StoreEvent;
use bc_core::error::{BoardCacheError, Result};
use bc_core::snapshot::{BoardSnapshot, BoardStorage, SnapshotFile, SnapshotInfo};
use bc_core::types::BlockId;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File system based board storage.
///
/// Layout under the base directory:
/// `boards/<board-id>.json` holds the snapshot, `events/<board-id>.jsonl`
/// holds one event per line.
pub struct FileSystemStorage {
    /// Base directory for storage
    base_dir: PathBuf,
    /// Snapshots subdirectory
    boards_dir: PathBuf,
    /// Event logs subdirectory
    events_dir: PathBuf,
}

impl FileSystemStorage {
    /// Create a new file system storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let boards_dir = base_dir.join("boards");
        let events_dir = base_dir.join("events");

        let storage = Self {
            base_dir,
            boards_dir,
            events_dir,
        };

        storage.ensure_dirs()?;
        Ok(storage)
    }

    /// Create storage in the platform data directory (~/.boardcache as fallback)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// The platform data directory used by [`FileSystemStorage::default_location`]
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "boardcache", "boardcache")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".boardcache")
            })
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.boards_dir, &self.events_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    BoardCacheError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create directory {:?}: {}", dir, e),
                    ))
                })?;
                debug!("Created directory: {:?}", dir);
            }
        }
        Ok(())
    }

    /// Board ids become file names, so they must not escape the directory
    fn file_stem(board_id: &BlockId) -> Result<&str> {
        let id = board_id.as_str();
        if id.is_empty() || id.starts_with('.') || id.contains(|c: char| c == '/' || c == '\\') {
            return Err(BoardCacheError::Validation(format!(
                "Invalid board id for storage: {:?}",
                id
            )));
        }
        Ok(id)
    }

    /// Get the path for a snapshot file
    fn snapshot_path(&self, board_id: &BlockId) -> Result<PathBuf> {
        Ok(self.boards_dir.join(format!("{}.json", Self::file_stem(board_id)?)))
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self, board_id: &BlockId) -> Result<PathBuf> {
        Ok(self.boards_dir.join(format!(".{}.json.tmp", Self::file_stem(board_id)?)))
    }

    /// Get the path for an event log
    fn events_path(&self, board_id: &BlockId) -> Result<PathBuf> {
        Ok(self.events_dir.join(format!("{}.jsonl", Self::file_stem(board_id)?)))
    }

    /// Write snapshot atomically (write to temp, then rename)
    fn atomic_write(&self, snapshot: &BoardSnapshot) -> Result<()> {
        let temp_path = self.temp_path(&snapshot.board_id)?;
        let final_path = self.snapshot_path(&snapshot.board_id)?;

        let file = SnapshotFile::new(snapshot.clone());

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            BoardCacheError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            BoardCacheError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved board {} to {:?}", snapshot.board_id, final_path);
        Ok(())
    }

    /// Read and parse a snapshot file
    fn read_snapshot(&self, path: &Path) -> Result<BoardSnapshot> {
        let file = fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                let id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown");
                BoardCacheError::BoardNotFound(id.to_string())
            } else {
                BoardCacheError::Io(e)
            }
        })?;

        let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
        Ok(SnapshotFile::from_value(value)?.into_snapshot())
    }

    /// Get base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get snapshots directory
    pub fn boards_dir(&self) -> &PathBuf {
        &self.boards_dir
    }

    /// Get event logs directory
    pub fn events_dir(&self) -> &PathBuf {
        &self.events_dir
    }
}

impl BoardStorage for FileSystemStorage {
    fn save_snapshot(&self, snapshot: &BoardSnapshot) -> Result<()> {
        self.atomic_write(snapshot)
    }

    fn load_snapshot(&self, board_id: &BlockId) -> Result<BoardSnapshot> {
        let path = self.snapshot_path(board_id)?;
        self.read_snapshot(&path)
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let mut boards = Vec::new();

        let entries = fs::read_dir(&self.boards_dir).map_err(|e| {
            BoardCacheError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read boards directory: {}", e),
            ))
        })?;

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();

            // Skip non-json files and temp files
            if !path.extension().map(|e| e == "json").unwrap_or(false) {
                continue;
            }
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false)
            {
                continue;
            }

            match self.read_snapshot(&path) {
                Ok(snapshot) => boards.push(snapshot.info()),
                Err(e) => {
                    warn!("Failed to read board file {:?}: {}", path, e);
                }
            }
        }

        boards.sort_by(|a, b| a.board_id.cmp(&b.board_id));
        Ok(boards)
    }

    fn delete(&self, board_id: &BlockId) -> Result<()> {
        let path = self.snapshot_path(board_id)?;

        if !path.exists() {
            return Err(BoardCacheError::BoardNotFound(board_id.to_string()));
        }

        fs::remove_file(&path).map_err(|e| {
            BoardCacheError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to delete board file: {}", e),
            ))
        })?;
        self.clear_events(board_id)?;

        debug!("Deleted board {} from {:?}", board_id, path);
        Ok(())
    }

    fn exists(&self, board_id: &BlockId) -> bool {
        self.snapshot_path(board_id)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    fn append_event(&self, board_id: &BlockId, event: &StoreEvent) -> Result<()> {
        let path = self.events_path(board_id)?;

        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(line.as_bytes())?;

        debug!("Appended {} to {:?}", event.name(), path);
        Ok(())
    }

    fn read_events(&self, board_id: &BlockId) -> Result<Vec<StoreEvent>> {
        let path = self.events_path(board_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event = serde_json::from_str(&line).map_err(|e| {
                BoardCacheError::from(e)
                    .with_context(format!("Bad event at {:?} line {}", path, index + 1))
            })?;
            events.push(event);
        }
        Ok(events)
    }

    fn clear_events(&self, board_id: &BlockId) -> Result<()> {
        let path = self.events_path(board_id)?;
        if path.exists() {
            fs::remove_file(&path)?;
            debug!("Cleared event log {:?}", path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::block::{Block, BlockType, Board};
    use bc_core::comment::{CommentBlock, CommentBuilder};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileSystemStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(temp_dir.path()).unwrap();
        (storage, temp_dir)
    }

    fn comment(id: &str, card: &str) -> CommentBlock {
        CommentBuilder::new(card.into())
            .id(id.into())
            .text(id)
            .created_at(1)
            .build()
            .unwrap()
    }

    fn create_test_snapshot(board_id: &str) -> BoardSnapshot {
        let mut snapshot = BoardSnapshot::new(
            board_id.into(),
            vec![
                Block::new("card1".into(), BlockType::Card),
                Block::from(comment("c1", "card1")),
            ],
        );
        snapshot.board = Some(Board::new(board_id.into(), "Test board"));
        snapshot
    }

    #[test]
    fn test_storage_creation() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.boards_dir().exists());
        assert!(storage.events_dir().exists());
    }

    #[test]
    fn test_snapshot_path() {
        let (storage, _temp) = create_test_storage();
        let path = storage.snapshot_path(&"b1".into()).unwrap();
        assert!(path.to_string_lossy().ends_with("b1.json"));
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let (storage, _temp) = create_test_storage();
        for id in ["", "../escape", "a/b", ".hidden"] {
            let snapshot = BoardSnapshot::new(id.into(), vec![]);
            assert!(storage.save_snapshot(&snapshot).is_err(), "{:?}", id);
            assert!(!storage.exists(&id.into()));
        }
    }

    #[test]
    fn test_save_and_load() {
        let (storage, _temp) = create_test_storage();
        let snapshot = create_test_snapshot("b1");

        storage.save_snapshot(&snapshot).unwrap();
        assert!(storage.exists(&"b1".into()));

        let loaded = storage.load_snapshot(&"b1".into()).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_nonexistent() {
        let (storage, _temp) = create_test_storage();
        let err = storage.load_snapshot(&"missing".into()).unwrap_err();
        assert!(matches!(err, BoardCacheError::BoardNotFound(id) if id == "missing"));
    }

    #[test]
    fn test_list_boards() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.list().unwrap().is_empty());

        storage.save_snapshot(&create_test_snapshot("b2")).unwrap();
        storage.save_snapshot(&create_test_snapshot("b1")).unwrap();

        let list = storage.list().unwrap();
        let ids: Vec<_> = list.iter().map(|i| i.board_id.to_string()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
        assert_eq!(list[0].title, "Test board");
        assert_eq!(list[0].comment_count, 1);
    }

    #[test]
    fn test_event_log_round_trip() {
        let (storage, _temp) = create_test_storage();
        let board: BlockId = "b1".into();
        assert!(storage.read_events(&board).unwrap().is_empty());

        let first = StoreEvent::CommentsChanged {
            comments: vec![comment("c2", "card1")],
        };
        let second = StoreEvent::CommentsChanged {
            comments: vec![comment("c3", "card2")],
        };
        storage.append_event(&board, &first).unwrap();
        storage.append_event(&board, &second).unwrap();

        assert_eq!(storage.read_events(&board).unwrap(), vec![first, second]);

        storage.clear_events(&board).unwrap();
        assert!(storage.read_events(&board).unwrap().is_empty());
    }

    #[test]
    fn test_bad_event_line_is_reported() {
        let (storage, _temp) = create_test_storage();
        let board: BlockId = "b1".into();
        storage
            .append_event(&board, &StoreEvent::CommentsChanged { comments: vec![] })
            .unwrap();

        let path = storage.events_path(&board).unwrap();
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("{not json}\n");
        fs::write(&path, content).unwrap();

        let err = storage.read_events(&board).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_delete_board() {
        let (storage, _temp) = create_test_storage();
        let board: BlockId = "b1".into();
        storage.save_snapshot(&create_test_snapshot("b1")).unwrap();
        storage
            .append_event(&board, &StoreEvent::CommentsChanged { comments: vec![] })
            .unwrap();

        storage.delete(&board).unwrap();
        assert!(!storage.exists(&board));
        assert!(!storage.events_path(&board).unwrap().exists());
    }

    #[test]
    fn test_delete_nonexistent() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.delete(&"missing".into()).is_err());
    }

    #[test]
    fn test_atomic_write() {
        let (storage, _temp) = create_test_storage();
        let board: BlockId = "b1".into();
        storage.save_snapshot(&create_test_snapshot("b1")).unwrap();

        assert!(!storage.temp_path(&board).unwrap().exists());

        let content = fs::read_to_string(storage.snapshot_path(&board).unwrap()).unwrap();
        assert!(content.contains("schema_version"));
        assert!(content.contains("\"board_id\": \"b1\""));
    }

    #[test]
    fn test_ignores_temp_and_non_json_files() {
        let (storage, _temp) = create_test_storage();
        fs::write(storage.boards_dir().join(".temp.json.tmp"), "{}").unwrap();
        fs::write(storage.boards_dir().join(".hidden.json"), "{}").unwrap();
        fs::write(storage.boards_dir().join("readme.txt"), "test").unwrap();

        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_snapshot_skipped_in_list() {
        let (storage, _temp) = create_test_storage();
        storage.save_snapshot(&create_test_snapshot("b1")).unwrap();
        fs::write(
            storage.boards_dir().join("b2.json"),
            r#"{"schema_version": "9.0", "snapshot": {}}"#,
        )
        .unwrap();

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 1);
        assert!(matches!(
            storage.load_snapshot(&"b2".into()),
            Err(BoardCacheError::UnsupportedSchemaVersion(_))
        ));
    }
}
