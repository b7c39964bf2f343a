/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DEFAULT_FILTER: &str = "info";

/// Formats every event as `<timestamp> :: <message>`.
///
/// Levels other than INFO prefix the message, and structured fields follow it. WARN and
/// ERROR records end with the `file:line` that emitted them.
#[derive(Debug, Default)]
pub(crate) struct BridgeFormat;

impl BridgeFormat {
    fn write_prefix(
        &self,
        writer: &mut Writer<'_>,
        now: DateTime<Local>,
        level: &Level,
    ) -> fmt::Result {
        write!(writer, "{} :: ", now.format(TIMESTAMP_FORMAT))?;
        if *level != Level::INFO {
            write!(writer, "{level} ")?;
        }
        Ok(())
    }

    fn write_location(
        &self,
        writer: &mut Writer<'_>,
        level: &Level,
        file: Option<&str>,
        line: Option<u32>,
    ) -> fmt::Result {
        if *level > Level::WARN {
            return Ok(());
        }
        match (file, line) {
            (Some(file), Some(line)) => write!(writer, " ({file}:{line})"),
            (Some(file), None) => write!(writer, " ({file})"),
            _ => Ok(()),
        }
    }
}

impl<S, N> FormatEvent<S, N> for BridgeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        self.write_prefix(&mut writer, Local::now(), metadata.level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        self.write_location(
            &mut writer,
            metadata.level(),
            metadata.file(),
            metadata.line(),
        )?;
        writeln!(writer)
    }
}

/// Name of the log file for a given day
pub(crate) fn log_file_name(day: NaiveDate) -> String {
    format!("objstore-bridge-{}.log", day.format("%Y-%m-%d"))
}

/// Install the global subscriber.
///
/// With a log directory, records are appended to that day's file; otherwise they go to
/// stderr. `RUST_LOG` overrides the default `info` filter.
pub(crate) fn init(log_dir: Option<&Path>) -> std::io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_dir {
        Some(dir) => {
            let path = open_log_path(dir)?;
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .event_format(BridgeFormat)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder
            .event_format(BridgeFormat)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

fn open_log_path(dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(log_file_name(Local::now().date_naive())))
}

#[cfg(test)]
mod test {
    use std::io;
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_log_file_name() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!("objstore-bridge-2024-03-05.log", log_file_name(day));
    }

    #[test]
    fn test_prefix() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();

        let mut out = String::new();
        BridgeFormat
            .write_prefix(&mut Writer::new(&mut out), now, &Level::INFO)
            .unwrap();
        assert_eq!("2024-03-05 14:07:09.000 :: ", out);

        let mut out = String::new();
        BridgeFormat
            .write_prefix(&mut Writer::new(&mut out), now, &Level::ERROR)
            .unwrap();
        assert_eq!("2024-03-05 14:07:09.000 :: ERROR ", out);
    }

    #[test]
    fn test_location() {
        let mut out = String::new();
        let mut writer = Writer::new(&mut out);
        BridgeFormat
            .write_location(&mut writer, &Level::ERROR, Some("src/main.rs"), Some(42))
            .unwrap();
        BridgeFormat
            .write_location(&mut writer, &Level::WARN, Some("src/lib.rs"), None)
            .unwrap();
        BridgeFormat
            .write_location(&mut writer, &Level::INFO, Some("src/main.rs"), Some(7))
            .unwrap();
        BridgeFormat
            .write_location(&mut writer, &Level::DEBUG, Some("src/main.rs"), Some(7))
            .unwrap();
        assert_eq!(" (src/main.rs:42) (src/lib.rs)", out);
    }

    #[test]
    fn test_failure_records_carry_source_location() {
        let buffer = Buffer::default();
        let make_writer = {
            let buffer = buffer.clone();
            move || buffer.clone()
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_ansi(false)
            .event_format(BridgeFormat)
            .finish();

        let line = tracing::subscriber::with_default(subscriber, || {
            tracing::info!("uploaded part 1");
            let line = line!() + 1;
            tracing::error!(part_number = 2, "upload failed");
            line
        });

        let contents = buffer.contents();
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(2, lines.len());
        assert!(lines[0].ends_with(" :: uploaded part 1"), "{}", lines[0]);
        assert!(
            lines[1].ends_with(&format!(
                " :: ERROR upload failed part_number=2 ({}:{line})",
                file!()
            )),
            "{}",
            lines[1]
        );
    }
}
