use std::{
    fs,
    io::{self, Write},
    path::Path,
    sync::mpsc,
    thread,
};

pub use data::log::Error;

const MAX_LOG_FILE_SIZE: u64 = 50 * 1024 * 1024; // 50 MB

enum LogMessage {
    Content(Vec<u8>),
    Flush,
    Shutdown,
}

/// Installs the global logger. Debug builds log to stdout, everything else to
/// a rotated file under the data directory.
pub fn setup(is_debug: bool) -> Result<(), Error> {
    let level_filter = std::env::var("RUST_LOG")
        .ok()
        .as_deref()
        .map(str::parse::<log::Level>)
        .transpose()?
        .unwrap_or(log::Level::Debug)
        .to_level_filter();

    let mut io_sink = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}:{} -- {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            message
        ));
    });

    if is_debug {
        io_sink = io_sink.chain(std::io::stdout());
    } else {
        let log_path = data::log::path()?;
        rotate(&log_path, &data::log::previous_path()?)?;

        let logger: Box<dyn Write + Send> = Box::new(BackgroundLogger::new(&log_path)?);

        io_sink = io_sink.chain(logger);
    }

    fern::Dispatch::new()
        .level(log::LevelFilter::Off)
        .level_for("panic", log::LevelFilter::Error)
        .level_for("data", level_filter)
        .level_for("chartsurface", level_filter)
        .chain(io_sink)
        .apply()?;

    Ok(())
}

/// Moves the last session's log aside, replacing the one before it.
fn rotate(current: &Path, previous: &Path) -> io::Result<()> {
    if previous.exists() {
        fs::remove_file(previous)?;
    }

    if current.exists() {
        fs::rename(current, previous)?;
    }

    Ok(())
}

struct BackgroundLogger {
    sender: mpsc::Sender<LogMessage>,
    _thread_handle: thread::JoinHandle<()>,
}

impl BackgroundLogger {
    fn new(path: &Path) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let path = path.to_path_buf();

        let thread_handle = thread::Builder::new()
            .name("chartsurface-logger".to_string())
            .spawn(move || {
                let mut logger = match CappedFile::open(&path) {
                    Ok(logger) => logger,
                    Err(e) => {
                        eprintln!("Failed to open log file {}: {e}", path.display());
                        return;
                    }
                };

                while let Ok(message) = receiver.recv() {
                    let result = match message {
                        LogMessage::Content(data) => logger.write_all(&data),
                        LogMessage::Flush => logger.flush(),
                        LogMessage::Shutdown => break,
                    };

                    if let Err(e) = result {
                        eprintln!("Logging error: {e}");
                    }
                }
            })?;

        Ok(BackgroundLogger {
            sender,
            _thread_handle: thread_handle,
        })
    }

    fn send(&self, message: LogMessage) -> io::Result<()> {
        self.sender
            .send(message)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "Logger thread disconnected"))
    }
}

impl Write for BackgroundLogger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(LogMessage::Content(buf.to_vec()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send(LogMessage::Flush)
    }
}

impl Drop for BackgroundLogger {
    fn drop(&mut self) {
        let _ = self.sender.send(LogMessage::Shutdown);
    }
}

/// Append-only log file that stops growing at [`MAX_LOG_FILE_SIZE`].
struct CappedFile {
    file: fs::File,
    current_size: u64,
    full: bool,
}

impl CappedFile {
    fn open(path: &Path) -> io::Result<Self> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let size = file.metadata()?.len();

        Ok(CappedFile {
            file,
            current_size: size,
            full: false,
        })
    }
}

impl Write for CappedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.full {
            return Ok(buf.len());
        }

        if self.current_size + buf.len() as u64 > MAX_LOG_FILE_SIZE {
            self.full = true;

            let notice = format!(
                "\n{}:WARN -- Log file reached {MAX_LOG_FILE_SIZE} bytes, further output dropped\n",
                chrono::Local::now().format("%H:%M:%S%.3f"),
            );
            eprintln!("{}", notice.trim());

            self.file.write_all(notice.as_bytes())?;
            self.file.flush()?;
            return Ok(buf.len());
        }

        let bytes = self.file.write(buf)?;
        self.current_size += bytes as u64;

        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_keeps_one_previous_log() {
        let dir = std::env::temp_dir().join(format!("chartsurface-log-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let current = dir.join("current.log");
        let previous = dir.join("previous.log");

        fs::write(&previous, "oldest").unwrap();
        fs::write(&current, "last run").unwrap();

        rotate(&current, &previous).unwrap();

        assert!(!current.exists());
        assert_eq!(fs::read_to_string(&previous).unwrap(), "last run");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn capped_file_stops_at_limit() {
        let dir = std::env::temp_dir().join(format!("chartsurface-log-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("capped.log");

        let mut file = CappedFile::open(&path).unwrap();
        file.current_size = MAX_LOG_FILE_SIZE - 4;

        file.write_all(b"ok\n").unwrap();
        file.write_all(b"too long\n").unwrap();
        file.write_all(b"dropped\n").unwrap();
        file.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("ok\n"));
        assert!(contents.contains("further output dropped"));
        assert_eq!(contents.matches("dropped").count(), 1);
        assert!(!contents.contains("too long"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
