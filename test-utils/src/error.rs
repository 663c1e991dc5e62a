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

use std::{error::Error, fmt::Write};

/// An error which panics on creation.
///
/// Lets tests use `?` on any error while still failing with the full error chain.
#[derive(Debug)]
pub enum Panic {}

impl<E> From<E> for Panic
where
    E: Error,
{
    fn from(error: E) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            write!(&mut message, "\nCaused By: {cause}").ok(/* writing to a string can't fail */);
            source = cause.source();
        }
        panic!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    #[should_panic(expected = "missing file")]
    fn test_panics_with_message() {
        fn fails() -> Result<(), Panic> {
            Err(io::Error::new(io::ErrorKind::NotFound, "missing file"))?;
            Ok(())
        }
        fails().ok();
    }
}
