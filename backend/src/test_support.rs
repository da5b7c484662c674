//! Test utilities for the fleetify crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Clock frozen at `utc_now`.
    pub fn new(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }

    /// Clock frozen at the given UTC wall time.
    ///
    /// # Panics
    ///
    /// Panics when the components do not form a valid timestamp.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        let utc_now = match Utc
            .with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
        {
            Some(timestamp) => timestamp,
            None => panic!("invalid fixture timestamp"),
        };
        Self::new(utc_now)
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.

    use std::io;

    use camino::{Utf8Path, Utf8PathBuf};
    use cap_std::{ambient_authority, fs::Dir};
    use tempfile::TempDir;

    /// Temporary directory exposed as a UTF-8 path.
    ///
    /// The directory is removed when the value is dropped.
    #[derive(Debug)]
    pub struct TempWorkspace {
        dir: TempDir,
        root: Utf8PathBuf,
    }

    impl TempWorkspace {
        /// Create a fresh temporary directory.
        pub fn new() -> io::Result<Self> {
            let dir = tempfile::tempdir()?;
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).map_err(|path| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("temporary path is not UTF-8: {}", path.display()),
                )
            })?;
            Ok(Self { dir, root })
        }

        /// Root of the temporary directory.
        pub fn path(&self) -> &Utf8Path {
            &self.root
        }

        /// Path of `relative` under the root.
        pub fn join(&self, relative: &str) -> Utf8PathBuf {
            self.root.join(relative)
        }

        /// Underlying `tempfile` handle.
        pub fn temp_dir(&self) -> &TempDir {
            &self.dir
        }
    }

    /// Write `contents` to `relative` under `root`, creating parent
    /// directories.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fleetify::test_support::cap_fs::{TempWorkspace, read_file, write_file};
    ///
    /// let workspace = TempWorkspace::new()?;
    /// write_file(workspace.path(), "migrations/a.sql", "SELECT 1;\n")?;
    /// assert_eq!(read_file(workspace.path(), "migrations/a.sql")?, "SELECT 1;\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(root: &Utf8Path, relative: &str, contents: &str) -> io::Result<()> {
        let target = root.join(relative);
        if let Some(parent) = target.parent() {
            Dir::create_ambient_dir_all(parent, ambient_authority())?;
        }
        let directory = Dir::open_ambient_dir(root, ambient_authority())?;
        directory.write(relative, contents)
    }

    /// Read `relative` under `root` as UTF-8 text.
    pub fn read_file(root: &Utf8Path, relative: &str) -> io::Result<String> {
        let directory = Dir::open_ambient_dir(root, ambient_authority())?;
        directory.read_to_string(relative)
    }

    /// Names of the entries directly under `root/relative`, sorted.
    pub fn list_dir(root: &Utf8Path, relative: &str) -> io::Result<Vec<String>> {
        let directory = Dir::open_ambient_dir(root.join(relative), ambient_authority())?;
        let mut names = Vec::new();
        for entry in directory.entries()? {
            let name = entry?.file_name();
            names.push(name.to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}
