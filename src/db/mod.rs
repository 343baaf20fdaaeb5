pub mod student;
pub mod event;
pub mod achievement;
pub mod admin;

use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::{errors::MyError, models::Database};

/// The JSON document that is the system of record.
///
/// Opened once at startup. Every mutation runs under one async lock and is
/// flushed to disk before the lock is released, so the scheduler and
/// concurrent dialogues never interleave a read-modify-write. The file is
/// replaced through a temp file and a rename.
pub struct JsonStore {
    path: PathBuf,
    data: Mutex<Database>,
}

impl JsonStore {
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = read_document(&path).await;
        info!(
            "json store opened at {:?}: {} students, {} activities, {} achievements, {} admins",
            path,
            data.students.len(),
            data.activities.len(),
            data.achievements.len(),
            data.admins.len()
        );
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of all four collections.
    pub async fn load(&self) -> Database {
        self.data.lock().await.clone()
    }

    pub async fn read<T>(&self, f: impl FnOnce(&Database) -> T) -> T {
        let data = self.data.lock().await;
        f(&data)
    }

    /// Runs `f` on a copy of the document and commits it only if `f`
    /// succeeds and the flush succeeds.
    pub async fn update<T>(
        &self,
        f: impl FnOnce(&mut Database) -> Result<T, MyError>,
    ) -> Result<T, MyError> {
        let mut data = self.data.lock().await;
        let mut draft = data.clone();
        let res = f(&mut draft)?;
        write_document(&self.path, &draft).await?;
        *data = draft;
        Ok(res)
    }

    pub async fn save(&self) -> Result<(), MyError> {
        let data = self.data.lock().await;
        write_document(&self.path, &data).await
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

async fn read_document(path: &Path) -> Database {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => match serde_json::from_str::<Database>(&content) {
            Ok(data) => data,
            Err(err) => {
                warn!("data file {:?} is unreadable ({}), starting empty", path, err);
                let backup = sibling(path, ".corrupt");
                if let Err(err) = tokio::fs::copy(path, &backup).await {
                    warn!("failed to back up {:?}: {}", path, err);
                } else {
                    warn!("previous contents kept at {:?}", backup);
                }
                Database::default()
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("data file {:?} does not exist yet", path);
            Database::default()
        }
        Err(err) => {
            warn!("failed to read data file {:?} ({}), starting empty", path, err);
            Database::default()
        }
    }
}

async fn write_document(path: &Path, data: &Database) -> Result<(), MyError> {
    let content = match serde_json::to_string_pretty(data) {
        Ok(content) => content,
        Err(err) => {
            error!("[{:} : {:}] SERIALIZATION ERROR: {:?}", file!(), line!(), err);
            return Err(MyError::StorageError);
        }
    };
    let tmp = sibling(path, ".tmp");
    if let Err(err) = tokio::fs::write(&tmp, content).await {
        error!("[{:} : {:}] WRITE ERROR {:?}: {:?}", file!(), line!(), tmp, err);
        return Err(MyError::StorageError);
    }
    match tokio::fs::rename(&tmp, path).await {
        Ok(_) => Ok(()),
        Err(err) => {
            error!("[{:} : {:}] RENAME ERROR {:?}: {:?}", file!(), line!(), path, err);
            Err(MyError::StorageError)
        }
    }
}
