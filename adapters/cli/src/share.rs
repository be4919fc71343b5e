#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "edgemaze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded maze payload.
pub(crate) const SNAPSHOT_HEADER: &str = "edgemaze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of a maze's cell codes and grid dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MazeSnapshot {
    /// Number of cell columns contained in the grid.
    pub columns: u32,
    /// Number of cell rows contained in the grid.
    pub rows: u32,
    /// Cell codes flattened in row-major order.
    pub codes: Vec<u32>,
}

impl MazeSnapshot {
    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSnapshot {
            codes: self.codes.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("maze snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.columns, self.rows)
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ShareError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ShareError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ShareError::MissingPrefix)?;
        let version = parts.next().ok_or(ShareError::MissingVersion)?;
        let dimensions = parts.next().ok_or(ShareError::MissingDimensions)?;
        let payload = parts.next().ok_or(ShareError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(ShareError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(ShareError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ShareError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(ShareError::InvalidPayload)?;

        let expected = u64::from(columns) * u64::from(rows);
        let found = decoded.codes.len() as u64;
        if expected != found {
            return Err(ShareError::WrongCellCount { expected, found });
        }

        Ok(Self {
            columns,
            rows,
            codes: decoded.codes,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SerializableSnapshot {
    codes: Vec<u32>,
}

/// Errors that can occur while decoding maze share strings.
#[derive(Debug)]
pub(crate) enum ShareError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The payload's cell count disagrees with the declared dimensions.
    WrongCellCount {
        /// Cell count implied by the dimension segment.
        expected: u64,
        /// Cell count actually carried by the payload.
        found: u64,
    },
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "share payload was empty"),
            Self::MissingPrefix => write!(f, "share string is missing the prefix"),
            Self::MissingVersion => write!(f, "share string is missing the version"),
            Self::MissingDimensions => write!(f, "share string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "share string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "share prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "share version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode share payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse share payload: {error}")
            }
            Self::WrongCellCount { expected, found } => {
                write!(f, "share payload holds {found} cells, expected {expected}")
            }
        }
    }
}

impl Error for ShareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), ShareError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| ShareError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| ShareError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| ShareError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(ShareError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_small_maze() {
        let snapshot = MazeSnapshot {
            columns: 3,
            rows: 2,
            codes: vec![1, 0, 2, 4, 0, 8],
        };

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:3x2:")));

        let decoded = MazeSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn decode_rejects_blank_input() {
        assert!(matches!(
            MazeSnapshot::decode("   "),
            Err(ShareError::EmptyPayload)
        ));
    }

    #[test]
    fn decode_rejects_foreign_prefixes() {
        assert!(matches!(
            MazeSnapshot::decode("labyrinth:v1:2x2:AAAA"),
            Err(ShareError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn decode_rejects_unknown_versions() {
        assert!(matches!(
            MazeSnapshot::decode("edgemaze:v9:2x2:AAAA"),
            Err(ShareError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn decode_rejects_zero_dimensions() {
        assert!(matches!(
            MazeSnapshot::decode("edgemaze:v1:0x4:AAAA"),
            Err(ShareError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn decode_rejects_mismatched_cell_counts() {
        let snapshot = MazeSnapshot {
            columns: 2,
            rows: 2,
            codes: vec![0, 0, 0, 0],
        };
        let encoded = snapshot.encode();
        let forged = encoded.replacen("2x2", "3x2", 1);

        assert!(matches!(
            MazeSnapshot::decode(&forged),
            Err(ShareError::WrongCellCount {
                expected: 6,
                found: 4
            })
        ));
    }
}
