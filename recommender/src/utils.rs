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

/// Serde of an optional duration as full seconds (rounds down).
pub(crate) mod serde_option_duration_as_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(crate) fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.map(|duration| duration.as_secs()).serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<u64>::deserialize(deserializer).map(|seconds| seconds.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use std::{error::Error, time::Duration};

    use serde::{Deserialize, Serialize};
    use serde_json::{from_str, to_string};

    use super::*;

    #[derive(Deserialize, Serialize)]
    struct Seconds(#[serde(with = "serde_option_duration_as_seconds")] Option<Duration>);

    #[test]
    fn test_none() -> Result<(), Box<dyn Error>> {
        let serialized = to_string(&Seconds(None))?;
        assert_eq!(serialized, "null");
        assert_eq!(from_str::<Seconds>(&serialized)?.0, None);
        Ok(())
    }

    #[test]
    fn test_rounds_down() -> Result<(), Box<dyn Error>> {
        let serialized = to_string(&Seconds(Some(Duration::from_millis(2500))))?;
        assert_eq!(serialized, "2");
        assert_eq!(
            from_str::<Seconds>(&serialized)?.0,
            Some(Duration::from_secs(2)),
        );
        Ok(())
    }
}
