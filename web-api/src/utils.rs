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

use derive_more::Deref;
use figment::value::magic::RelativePathBuf as FigmentRelativePathBuf;
use secrecy::Secret;
use serde::{ser::SerializeSeq, Deserialize, Serialize, Serializer};

/// A path which is resolved relative to the config file it was defined in.
///
/// Paths passed in through env or cli overrides are resolved relative to the
/// working directory.
#[derive(Clone, Debug, Deref, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RelativePathBuf {
    #[serde(serialize_with = "FigmentRelativePathBuf::serialize_relative")]
    inner: FigmentRelativePathBuf,
}

impl From<&str> for RelativePathBuf {
    fn from(path: &str) -> Self {
        Self {
            inner: FigmentRelativePathBuf::from(path),
        }
    }
}

/// Serialize a sequence of `Secret<String>` as a sequence of `"[REDACTED]"`.
pub(crate) fn serialize_redacted_list<S>(
    secrets: &[Secret<String>],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(secrets.len()))?;
    for _ in secrets {
        seq.serialize_element("[REDACTED]")?;
    }
    seq.end()
}
