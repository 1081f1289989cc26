use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Trim the log file to its most recent `KEEP_SIZE` bytes once it grows past
/// `MAX_LOG_SIZE`.
fn rotate_log_if_needed(log_path: &Path) -> std::io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let file_size = fs::metadata(log_path)?.len();
    if file_size <= MAX_LOG_SIZE {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(file_size.saturating_sub(KEEP_SIZE)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Skip to the first newline to avoid partial lines
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- log rotated ---\n")?;
    file.write_all(&buffer[skip..])?;
    Ok(())
}

/// Writer factory sharing one appended log file across threads
#[derive(Clone)]
struct FileWriterFactory {
    file: Arc<Mutex<File>>,
}

struct FileWriter {
    file: Arc<Mutex<File>>,
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?;
        file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?;
        file.flush()
    }
}

impl<'a> MakeWriter<'a> for FileWriterFactory {
    type Writer = FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriter {
            file: Arc::clone(&self.file),
        }
    }
}

/// Filter directives used when `RUST_LOG` is unset.
#[must_use]
pub fn default_filter(level: &str) -> String {
    format!("portsim={level},portsim_core=warn")
}

/// Initialize logging.
///
/// Logs go to stderr, or are appended to `log_file` when one is given (with
/// size-based rotation). The level comes from `RUST_LOG` when set, otherwise
/// from `level`.
pub fn init_logging(log_file: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_file {
        Some(log_path) => {
            if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            if let Err(e) = rotate_log_if_needed(log_path) {
                eprintln!("Warning: failed to rotate log file: {e}");
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;
            let writer = FileWriterFactory {
                file: Arc::new(Mutex::new(file)),
            };
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()?;
            tracing::info!(log_path = %log_path.display(), "logging initialized");
        }
        None => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
