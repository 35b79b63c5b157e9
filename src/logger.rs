use std::fs::{File, OpenOptions};
use std::io::{self, Write};

use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;

const LOG_FILE: &str = "rank_checker.log";

/// Writes every log line to the log file and mirrors it to stdout.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

pub fn init() {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info);

    match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(Tee { file })));
            builder.init();
            log::info!("Logger initialized.");
        }
        Err(e) => {
            builder.init();
            log::warn!("Could not open {}, logging to stdout only: {}", LOG_FILE, e);
        }
    }
}
