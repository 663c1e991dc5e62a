// Copyright 2023 Xayn AG
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Temporary directories for tests touching the file system.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use uuid::Uuid;

/// A uniquely named directory which is removed with all its contents on drop.
#[derive(Debug)]
pub struct TempDir(PathBuf);

impl TempDir {
    /// Creates a fresh directory in the temp dir of the system, the name starts with the prefix.
    pub fn new(prefix: &str) -> io::Result<Self> {
        let path = env::temp_dir().join(format!("{prefix}-{}", Uuid::new_v4().simple()));
        fs::create_dir_all(&path)?;
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.0).ok(/* leftovers are cleaned by the os */);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_removed_on_drop() {
        let dir = TempDir::new("xayn-test-utils").unwrap();
        let path = dir.path().to_path_buf();
        fs::write(path.join("file.json"), "[]").unwrap();
        assert!(path.is_dir());

        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_names_are_unique() {
        let first = TempDir::new("xayn-test-utils").unwrap();
        let second = TempDir::new("xayn-test-utils").unwrap();
        assert_ne!(first.path(), second.path());
    }
}
