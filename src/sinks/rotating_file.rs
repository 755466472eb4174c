//! Size-based rotating log file
//!
//! The active file keeps its configured name. When a write would push it past
//! the size limit it is renamed to a timestamped backup next to it:
//!
//! ```text
//! ./logger/app.logger                              active
//! ./logger/app-2026-10-19T08-15-02.117.logger      rotated
//! ./logger/app-2026-10-18T23-59-40.002.logger.gz   rotated and compressed
//! ```
//!
//! After every rotation, backups beyond `max_backups` or older than
//! `max_age_days` are removed and the survivors are gzipped when compression is
//! enabled.

use crate::core::config::RotationConfig;
use crate::core::error::{LoggerError, Result};
use crate::core::sink::WriteSync;
use chrono::{Duration, Local, NaiveDateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

pub struct RotatingFile {
    filename: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    max_age_days: u64,
    compress: bool,
    local_time: bool,
    writer: Option<BufWriter<File>>,
    size: u64,
}

impl RotatingFile {
    /// Open (or create) the active file described by `config`.
    ///
    /// The parent directory is created when missing and an existing file is
    /// appended to. Zero limits and an empty path take the defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or the file cannot be created or opened
    pub fn new(config: &RotationConfig) -> Result<Self> {
        let config = config.clone().normalized();
        let mut file = Self {
            filename: config.filename.clone(),
            max_bytes: config.max_size_bytes(),
            max_backups: config.max_backups,
            max_age_days: config.max_age_days,
            compress: config.compress,
            local_time: config.local_time,
            writer: None,
            size: 0,
        };
        file.open_existing_or_new()?;
        Ok(file)
    }

    /// Override the size limit in bytes
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.filename
    }

    pub fn current_size(&self) -> u64 {
        self.size
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Close the active file, move it to a backup and start a new one
    pub fn rotate(&mut self) -> Result<()> {
        self.close_writer().map_err(|e| {
            LoggerError::file_rotation(
                self.filename.display().to_string(),
                format!("Failed to flush before rotation: {}", e),
            )
        })?;

        if self.filename.exists() {
            let backup = self.backup_path();
            fs::rename(&self.filename, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.filename.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        self.open_new()?;

        if let Err(e) = self.cleanup() {
            eprintln!("{} [WARN] Log cleanup failed: {}", Utc::now().to_rfc3339(), e);
        }
        Ok(())
    }

    /// Backups of this file, newest first
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .map(|(_, path)| path)
            .collect())
    }

    fn open_existing_or_new(&mut self) -> Result<()> {
        if let Some(parent) = self.filename.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.filename)
            .map_err(|e| {
                LoggerError::file_sink(
                    self.filename.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_sink(
                    self.filename.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        if size >= self.max_bytes {
            drop(file);
            return self.rotate();
        }

        self.writer = Some(BufWriter::new(file));
        self.size = size;
        Ok(())
    }

    fn open_new(&mut self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.filename)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.filename.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;
        self.writer = Some(BufWriter::new(file));
        self.size = 0;
        Ok(())
    }

    fn close_writer(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    fn now(&self) -> NaiveDateTime {
        if self.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }

    fn name_parts(&self) -> (String, String) {
        let stem = self
            .filename
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app")
            .to_string();
        let ext = self
            .filename
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (stem, ext)
    }

    /// Next unused backup name; the timestamp is bumped on collision
    fn backup_path(&self) -> PathBuf {
        let (stem, ext) = self.name_parts();
        let mut stamp = self.now();
        loop {
            let name = format!("{}-{}{}", stem, stamp.format(BACKUP_TIME_FORMAT), ext);
            let candidate = self.filename.with_file_name(&name);
            let compressed = self
                .filename
                .with_file_name(format!("{}{}", name, COMPRESS_SUFFIX));
            if !candidate.exists() && !compressed.exists() {
                return candidate;
            }
            stamp += Duration::milliseconds(1);
        }
    }

    fn backup_time(&self, file_name: &str) -> Option<NaiveDateTime> {
        let (stem, ext) = self.name_parts();
        let name = file_name.strip_suffix(COMPRESS_SUFFIX).unwrap_or(file_name);
        let stamp = name
            .strip_prefix(stem.as_str())?
            .strip_prefix('-')?
            .strip_suffix(ext.as_str())?;
        NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()
    }

    fn list_backups(&self) -> Result<Vec<(NaiveDateTime, PathBuf)>> {
        let dir = match self.filename.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation(
                "list log backups",
                format!("Failed to read directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut backups: Vec<(NaiveDateTime, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name();
                let stamp = self.backup_time(name.to_str()?)?;
                Some((stamp, entry.path()))
            })
            .collect();
        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups)
    }

    fn cleanup(&self) -> Result<()> {
        let mut backups = self.list_backups()?;
        let mut expired = Vec::new();

        if self.max_backups > 0 && backups.len() > self.max_backups {
            expired.extend(backups.split_off(self.max_backups));
        }
        let max_age = i64::try_from(self.max_age_days)
            .ok()
            .and_then(Duration::try_days)
            .filter(|_| self.max_age_days > 0);
        if let Some(cutoff) = max_age.and_then(|age| self.now().checked_sub_signed(age)) {
            let (keep, old): (Vec<_>, Vec<_>) =
                backups.into_iter().partition(|(stamp, _)| *stamp >= cutoff);
            backups = keep;
            expired.extend(old);
        }

        for (_, path) in &expired {
            if let Err(e) = fs::remove_file(path) {
                eprintln!(
                    "{} [WARN] Failed to remove old backup {}: {}",
                    Utc::now().to_rfc3339(),
                    path.display(),
                    e
                );
            }
        }

        if self.compress {
            for (_, path) in &backups {
                let is_compressed = path
                    .to_str()
                    .map(|p| p.ends_with(COMPRESS_SUFFIX))
                    .unwrap_or(true);
                if !is_compressed {
                    compress_file(path)?;
                }
            }
        }
        Ok(())
    }
}

/// Gzip `path` into `<path>.gz`, removing the original only once the
/// compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, Read};

    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(COMPRESS_SUFFIX);
    let gz_path = PathBuf::from(gz_name);
    let mut tmp_name = gz_path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(tmp_name);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let copied = (|| -> io::Result<()> {
        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            encoder.write_all(&buffer[..n])?;
        }
        encoder.finish()?.flush()
    })();
    if let Err(e) = copied {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "{} [WARN] Compressed {} but failed to remove the original: {}",
            Utc::now().to_rfc3339(),
            path.display(),
            e
        );
    }
    Ok(())
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if len > self.max_bytes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write length {} exceeds maximum file size {}",
                    len, self.max_bytes
                ),
            ));
        }

        if self.writer.is_none() {
            self.open_existing_or_new().map_err(io::Error::other)?;
        }
        if self.size + len > self.max_bytes {
            self.rotate().map_err(io::Error::other)?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "log file is closed"))?;
        writer.write_all(buf)?;
        self.size += len;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl WriteSync for RotatingFile {
    fn sync(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => {
                writer.flush()?;
                writer.get_ref().sync_all()
            }
            None => Ok(()),
        }
    }
}

impl Drop for RotatingFile {
    fn drop(&mut self) {
        let _ = self.close_writer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    fn config(path: &Path) -> RotationConfig {
        RotationConfig::new(path)
            .with_max_backups(3)
            .with_compression(false)
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested/deeper/app.logger");

        let file = RotatingFile::new(&config(&log_path)).unwrap();
        assert!(log_path.exists());
        assert_eq!(file.path(), log_path);
        assert_eq!(file.current_size(), 0);
        assert_eq!(file.max_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_zero_limits_take_defaults() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        let zeroed = RotationConfig::new(&log_path)
            .with_max_size_mb(0)
            .with_max_backups(0)
            .with_max_age_days(0);

        let mut file = RotatingFile::new(&zeroed).unwrap();
        assert_eq!(file.max_bytes(), 10 * 1024 * 1024);
        assert_eq!(file.max_backups, 10);
        assert_eq!(file.max_age_days, 20);

        file.write_all(b"hello\n").unwrap();
        file.flush().unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "hello\n");
        assert!(file.backups().unwrap().is_empty());
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        fs::write(&log_path, b"previous run\n").unwrap();

        let mut file = RotatingFile::new(&config(&log_path)).unwrap();
        assert_eq!(file.current_size(), 13);
        file.write_all(b"this run\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "previous run\nthis run\n");
    }

    #[test]
    fn test_rotates_when_write_would_exceed_limit() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        let mut file = RotatingFile::new(&config(&log_path))
            .unwrap()
            .with_max_bytes(20);

        file.write_all(b"0123456789\n").unwrap();
        file.write_all(b"abcdefghij\n").unwrap();
        file.flush().unwrap();

        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "0123456789\n");
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "abcdefghij\n");
        assert_eq!(file.current_size(), 11);
    }

    #[test]
    fn test_backup_name_format() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        let mut file = RotatingFile::new(&config(&log_path)).unwrap();
        file.rotate().unwrap();

        let backups = file.backups().unwrap();
        let name = backups[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("app-"));
        assert!(name.ends_with(".logger"));
        let stamp = &name["app-".len()..name.len() - ".logger".len()];
        assert!(NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).is_ok());
    }

    #[test]
    fn test_oversized_write_fails() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        let mut file = RotatingFile::new(&config(&log_path))
            .unwrap()
            .with_max_bytes(8);

        let err = file.write(b"far too long for the limit").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(file.backups().unwrap().is_empty());
    }

    #[test]
    fn test_max_backups_is_enforced() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        let mut file = RotatingFile::new(&config(&log_path))
            .unwrap()
            .with_max_bytes(10);

        for i in 0..8 {
            file.write_all(format!("entry {:03}\n", i).as_bytes()).unwrap();
        }
        file.flush().unwrap();

        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 3);
        // Newest first
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "entry 006\n");
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "entry 007\n");
    }

    #[test]
    fn test_rotated_backups_are_compressed() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        let mut file = RotatingFile::new(&config(&log_path).with_compression(true))
            .unwrap()
            .with_max_bytes(12);

        file.write_all(b"compress me\n").unwrap();
        file.write_all(b"keep plain\n").unwrap();
        file.flush().unwrap();

        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert!(backups[0].to_str().unwrap().ends_with(".logger.gz"));

        let mut decoded = String::new();
        GzDecoder::new(File::open(&backups[0]).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "compress me\n");
    }

    #[test]
    fn test_expired_backups_are_removed() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        let stale = dir.path().join("app-2000-01-01T00-00-00.000.logger");
        fs::write(&stale, b"old").unwrap();
        let unrelated = dir.path().join("other-2000-01-01T00-00-00.000.logger");
        fs::write(&unrelated, b"not ours").unwrap();

        let mut file = RotatingFile::new(&config(&log_path).with_max_age_days(1)).unwrap();
        file.rotate().unwrap();

        assert!(!stale.exists());
        assert!(unrelated.exists());
        assert_eq!(file.backups().unwrap().len(), 1);
    }

    #[test]
    fn test_sync_persists_buffered_bytes() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.logger");
        let mut file = RotatingFile::new(&config(&log_path)).unwrap();

        file.write_all(b"buffered\n").unwrap();
        file.sync().unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "buffered\n");
    }
}
