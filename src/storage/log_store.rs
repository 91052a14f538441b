use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Result;
use csv::StringRecord;
use fs4::tokio::AsyncFileExt;
use serde::Serialize;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, info, warn};

use super::entities::TaskRecord;

pub const LOG_HEADER: [&str; 3] = ["Date", "Time", "Task"];

/// Interface for abstracting storage of task records.
pub trait LogStore {
    /// Appends a single record at the end of the log.
    fn append(&self, record: TaskRecord) -> impl Future<Output = Result<()>>;

    /// Reads every record after the header, in insertion order.
    fn read_all(&self) -> impl Future<Output = Result<Vec<TaskRecord>>> + Send;
}

impl<T: Deref> LogStore for T
where
    T::Target: LogStore,
{
    fn append(&self, record: TaskRecord) -> impl Future<Output = Result<()>> {
        self.deref().append(record)
    }

    fn read_all(&self) -> impl Future<Output = Result<Vec<TaskRecord>>> + Send {
        self.deref().read_all()
    }
}

/// The main realization of [LogStore]. Each operation opens the file, takes a lock, does its work
/// and closes the file again.
pub struct CsvLogStore {
    path: PathBuf,
}

impl CsvLogStore {
    /// Prepares the log file, writing the header if the file doesn't exist yet.
    pub async fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|v| !v.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        write_header_if_missing(&path).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogStore for CsvLogStore {
    async fn append(&self, record: TaskRecord) -> Result<()> {
        // The file might have been removed since open. The header has to be there before any row.
        write_header_if_missing(&self.path).await?;

        let buffer = encode_row(&record)?;
        let mut file = File::options().append(true).open(&self.path).await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = async {
            file.write_all(&buffer).await?;
            file.flush().await
        }
        .await;
        file.unlock_async().await?;
        result?;

        debug!("Appended {record:?} to {:?}", self.path);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<TaskRecord>> {
        async fn extract(path: &Path) -> std::result::Result<Vec<u8>, std::io::Error> {
            debug!("Extracting {path:?}");
            let mut file = File::open(path).await?;
            file.lock_shared()?;
            let mut contents = vec![];
            let result = file.read_to_end(&mut contents).await;
            file.unlock_async().await?;
            result?;
            Ok(contents)
        }

        match extract(&self.path).await {
            Ok(contents) => Ok(parse_records(&contents, &self.path)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(e)?,
        }
    }
}

async fn write_header_if_missing(path: &Path) -> Result<()> {
    let mut file = match File::options()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
        Err(e) => Err(e)?,
    };

    info!("Creating task log {path:?}");
    let buffer = encode_row(LOG_HEADER)?;
    file.write_all(&buffer).await?;
    file.flush().await?;
    Ok(())
}

fn encode_row(row: impl Serialize) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    writer.serialize(row)?;
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// Skips the first row, which is always the header, and reads the rest positionally. Rows that
/// don't fit a record are ignored.
fn parse_records(contents: &[u8], path: &Path) -> Vec<TaskRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents);

    let mut records = vec![];
    for (index, row) in reader.records().enumerate().skip(1) {
        let parsed = row.and_then(|row| {
            if row.len() < LOG_HEADER.len() {
                return Ok(None);
            }
            row.iter()
                .take(LOG_HEADER.len())
                .collect::<StringRecord>()
                .deserialize::<TaskRecord>(None)
                .map(Some)
        });
        match parsed {
            Ok(Some(record)) => records.push(record),
            Ok(None) => warn!("Row {index} in {path:?} has too few fields, skipping"),
            Err(e) => warn!("During parsing in path {path:?} found illegal row {index}: {e}"),
        }
    }
    records
}
