/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::SystemTime;

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

use crate::operation::directory_prefix;
use crate::store::RemoteEntry;

/// Owner and group shown for every row; the store has no notion of either.
pub const PLACEHOLDER_OWNER: &str = "objstore";

/// Size reported for emulated directories
pub const DIRECTORY_SIZE: u64 = 4096;

/// Whether a row is a stored object or an emulated directory
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum EntryKind {
    /// A key directly under the listing root
    File,
    /// The first path component shared by deeper keys
    Directory,
}

/// One line of a directory listing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ListingRow {
    kind: EntryKind,
    name: String,
    size: u64,
    modified: NaiveDateTime,
}

impl ListingRow {
    /// File or emulated directory
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Display name relative to the listing root
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes, [`DIRECTORY_SIZE`] for directories
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last modification time in the listing's time zone
    pub fn modified(&self) -> NaiveDateTime {
        self.modified
    }

    /// Permission string
    pub fn permissions(&self) -> &'static str {
        match self.kind {
            EntryKind::File => "-rwx------",
            EntryKind::Directory => "drwx------",
        }
    }

    /// Hard link count
    pub fn link_count(&self) -> u32 {
        match self.kind {
            EntryKind::File => 1,
            EntryKind::Directory => 2,
        }
    }
}

/// Build the immediate children of `root` from a flat key listing.
///
/// Keys with more than one path component below the root collapse into one directory row
/// named by their first component, which carries the timestamp of the last such key seen.
/// A file and a directory may share a name; both are listed, the file first.
/// Rows are ordered by name and timestamps are converted to `tz`.
pub fn format_listing<Tz: TimeZone>(
    root: &str,
    entries: &[RemoteEntry],
    tz: &Tz,
) -> Vec<ListingRow> {
    let prefix = directory_prefix(root);
    let mut rows: BTreeMap<(String, EntryKind), ListingRow> = BTreeMap::new();

    for entry in entries {
        let Some(relative) = entry.key().strip_prefix(prefix.as_str()) else {
            continue;
        };
        if relative.is_empty() {
            continue;
        }
        let modified = local_time(entry.last_modified(), tz);

        match relative.split_once('/') {
            Some((dir, _)) => {
                rows.entry((dir.to_owned(), EntryKind::Directory))
                    .and_modify(|row| row.modified = modified)
                    .or_insert_with(|| ListingRow {
                        kind: EntryKind::Directory,
                        name: dir.to_owned(),
                        size: DIRECTORY_SIZE,
                        modified,
                    });
            }
            None => {
                rows.insert(
                    (relative.to_owned(), EntryKind::File),
                    ListingRow {
                        kind: EntryKind::File,
                        name: relative.to_owned(),
                        size: entry.size(),
                        modified,
                    },
                );
            }
        }
    }

    rows.into_values().collect()
}

fn local_time<Tz: TimeZone>(time: SystemTime, tz: &Tz) -> NaiveDateTime {
    DateTime::<Utc>::from(time)
        .with_timezone(tz)
        .naive_local()
}

/// Render rows as `ls -l` style lines with aligned size, day and name columns.
pub fn render_listing(rows: &[ListingRow]) -> String {
    let size_width = rows
        .iter()
        .map(|row| row.size.to_string().len())
        .max()
        .unwrap_or(1);
    let day_width = if rows.iter().any(|row| row.modified.day() > 9) {
        2
    } else {
        1
    };
    // padding counts chars, not bytes
    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for row in rows {
        writeln!(
            out,
            "{} {} {owner} {owner} {:>size_width$} {} {:>day_width$} {} {:<name_width$}",
            row.permissions(),
            row.link_count(),
            row.size,
            row.modified.format("%b"),
            row.modified.day(),
            row.modified.format("%H:%M"),
            row.name,
            owner = PLACEHOLDER_OWNER,
        )
        .expect("writing to a String cannot fail");
    }
    out
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use chrono::Utc;

    use super::*;

    // 2024-03-05 14:07:00 UTC
    const MARCH_5: u64 = 1_709_647_620;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn entries() -> Vec<RemoteEntry> {
        vec![
            RemoteEntry::new("a/b.txt", 10, at(MARCH_5)),
            RemoteEntry::new("d.txt", 5, at(MARCH_5)),
            RemoteEntry::new("a/c.txt", 20, at(MARCH_5 + 60)),
        ]
    }

    #[test]
    fn test_nested_keys_collapse_into_directory() {
        let rows = format_listing("/", &entries(), &Utc);
        assert_eq!(2, rows.len());

        assert_eq!("a", rows[0].name());
        assert_eq!(EntryKind::Directory, rows[0].kind());
        assert_eq!(DIRECTORY_SIZE, rows[0].size());
        assert_eq!("drwx------", rows[0].permissions());
        assert_eq!(2, rows[0].link_count());
        // last seen key wins
        assert_eq!("14:08", rows[0].modified().format("%H:%M").to_string());

        assert_eq!("d.txt", rows[1].name());
        assert_eq!(5, rows[1].size());
        assert_eq!("-rwx------", rows[1].permissions());
        assert_eq!(1, rows[1].link_count());
    }

    #[test]
    fn test_root_is_normalised() {
        let entries = vec![
            RemoteEntry::new("backups/2024/db.tar", 7, at(MARCH_5)),
            RemoteEntry::new("backups/meta.json", 3, at(MARCH_5)),
            RemoteEntry::new("backups-old/x", 1, at(MARCH_5)),
            RemoteEntry::new("backups/", 0, at(MARCH_5)),
        ];
        for root in ["/backups", "backups", "/backups/"] {
            let rows = format_listing(root, &entries, &Utc);
            let names = rows.iter().map(|r| r.name()).collect::<Vec<_>>();
            assert_eq!(vec!["2024", "meta.json"], names, "root {root}");
        }
    }

    #[test]
    fn test_timezone_conversion() {
        let tz = chrono::FixedOffset::east_opt(10 * 3600).unwrap();
        let rows = format_listing("/", &entries(), &tz);
        assert_eq!(6, rows[1].modified().day());
        assert_eq!("00:07", rows[1].modified().format("%H:%M").to_string());
    }

    #[test]
    fn test_render_aligns_columns() {
        let rows = format_listing("/", &entries(), &Utc);
        let rendered = render_listing(&rows);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(
            vec![
                "drwx------ 2 objstore objstore 4096 Mar 5 14:08 a    ",
                "-rwx------ 1 objstore objstore    5 Mar 5 14:07 d.txt",
            ],
            lines
        );
    }

    #[test]
    fn test_render_two_digit_days() {
        let entries = vec![
            RemoteEntry::new("x", 1, at(MARCH_5)),
            // 2024-03-15
            RemoteEntry::new("y", 1, at(MARCH_5 + 10 * 86_400)),
        ];
        let rendered = render_listing(&format_listing("", &entries, &Utc));
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!("-rwx------ 1 objstore objstore 1 Mar  5 14:07 x", lines[0]);
        assert_eq!("-rwx------ 1 objstore objstore 1 Mar 15 14:07 y", lines[1]);
    }

    #[test]
    fn test_file_and_directory_with_same_name() {
        let entries = vec![
            RemoteEntry::new("a", 7, at(MARCH_5)),
            RemoteEntry::new("a/b.txt", 10, at(MARCH_5 + 3600)),
        ];
        let rows = format_listing("/", &entries, &Utc);
        assert_eq!(2, rows.len());

        assert_eq!("a", rows[0].name());
        assert_eq!(EntryKind::File, rows[0].kind());
        assert_eq!(7, rows[0].size());
        assert_eq!("14:07", rows[0].modified().format("%H:%M").to_string());

        assert_eq!("a", rows[1].name());
        assert_eq!(EntryKind::Directory, rows[1].kind());
        assert_eq!(DIRECTORY_SIZE, rows[1].size());
        assert_eq!("15:07", rows[1].modified().format("%H:%M").to_string());

        // reversed listing order yields the same rows
        let reversed = entries.into_iter().rev().collect::<Vec<_>>();
        assert_eq!(rows, format_listing("/", &reversed, &Utc));
    }

    #[test]
    fn test_render_pads_non_ascii_names_by_char() {
        let entries = vec![
            RemoteEntry::new("école", 1, at(MARCH_5)),
            RemoteEntry::new("x", 1, at(MARCH_5)),
        ];
        let rendered = render_listing(&format_listing("/", &entries, &Utc));
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!("-rwx------ 1 objstore objstore 1 Mar 5 14:07 x    ", lines[0]);
        assert_eq!("-rwx------ 1 objstore objstore 1 Mar 5 14:07 école", lines[1]);
    }

    #[test]
    fn test_empty_listing() {
        assert!(format_listing("/", &[], &Utc).is_empty());
        assert_eq!("", render_listing(&[]));
    }
}
