#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use hillside_core::{TerrainLayout, TileCoord, TilePlacement};
use serde::{Deserialize, Serialize};

const TRANSFER_DOMAIN: &str = "hillside";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded terrain payload.
pub(crate) const TRANSFER_HEADER: &str = "hillside:v1";
/// Delimiter used to separate the prefix, column count and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a layout into a single-line string suitable for clipboard
/// transfer between sessions.
pub(crate) fn encode(layout: &TerrainLayout) -> String {
    let payload = SerializableLayout {
        tile_length: layout.tile_length(),
        tiles: layout.tiles().to_vec(),
    };
    let json = serde_json::to_vec(&payload).expect("terrain layout serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{TRANSFER_HEADER}:{}:{encoded}", layout.columns().get())
}

/// Decodes a layout from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<TerrainLayout, TerrainTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TerrainTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(TerrainTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(TerrainTransferError::MissingVersion)?;
    let columns = parts.next().ok_or(TerrainTransferError::MissingColumns)?;
    let payload = parts.next().ok_or(TerrainTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(TerrainTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(TerrainTransferError::UnsupportedVersion(version.to_owned()));
    }

    let columns = parse_columns(columns)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(TerrainTransferError::InvalidEncoding)?;
    let decoded: SerializableLayout =
        serde_json::from_slice(&bytes).map_err(TerrainTransferError::InvalidPayload)?;

    if !(decoded.tile_length > 0.0) {
        return Err(TerrainTransferError::InvalidTileLength(decoded.tile_length));
    }

    Ok(TerrainLayout::new(
        TileCoord::new(columns),
        decoded.tile_length,
        decoded.tiles,
    ))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLayout {
    tile_length: f32,
    tiles: Vec<TilePlacement>,
}

/// Errors that can occur while decoding terrain transfer strings.
#[derive(Debug)]
pub(crate) enum TerrainTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded terrain.
    MissingPrefix,
    /// The encoded terrain did not contain a version segment.
    MissingVersion,
    /// The encoded terrain did not include its column count.
    MissingColumns,
    /// The encoded terrain did not include the payload segment.
    MissingPayload,
    /// The encoded terrain used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded terrain used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The column count could not be parsed from the encoded terrain.
    InvalidColumns(String),
    /// The decoded tile length was not strictly positive.
    InvalidTileLength(f32),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for TerrainTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "terrain payload was empty"),
            Self::MissingPrefix => write!(f, "terrain string is missing the prefix"),
            Self::MissingVersion => write!(f, "terrain string is missing the version"),
            Self::MissingColumns => write!(f, "terrain string is missing the column count"),
            Self::MissingPayload => write!(f, "terrain string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "terrain prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "terrain version '{version}' is not supported")
            }
            Self::InvalidColumns(columns) => {
                write!(f, "could not parse column count '{columns}'")
            }
            Self::InvalidTileLength(tile_length) => {
                write!(f, "tile length {tile_length} must be positive")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode terrain payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse terrain payload: {error}")
            }
        }
    }
}

impl Error for TerrainTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_columns(columns: &str) -> Result<u32, TerrainTransferError> {
    let parsed = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| TerrainTransferError::InvalidColumns(columns.to_owned()))?;

    if parsed == 0 {
        return Err(TerrainTransferError::InvalidColumns(columns.to_owned()));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hillside_core::TileKind;

    #[test]
    fn round_trip_empty_layout() {
        let layout = TerrainLayout::new(TileCoord::new(12), 48.0, Vec::new());

        let encoded = encode(&layout);
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:12:")));

        let decoded = decode(&encoded).expect("layout decodes");
        assert_eq!(layout, decoded);
    }

    #[test]
    fn round_trip_populated_layout() {
        let layout = TerrainLayout::new(
            TileCoord::new(70),
            48.0,
            vec![
                TilePlacement::new(TileKind::Bedrock, 0.0, -48.0),
                TilePlacement::new(TileKind::Grass, 0.0, 576.0),
                TilePlacement::new(TileKind::Dirt, 0.0, 1.0),
                TilePlacement::new(TileKind::Pipe, 0.0, 624.0),
            ],
        );

        let encoded = encode(&layout);
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:70:")));

        let decoded = decode(&encoded).expect("layout decodes");
        assert_eq!(layout, decoded);
    }

    #[test]
    fn decode_rejects_foreign_prefixes() {
        assert!(matches!(
            decode("meadow:v1:12:abcd"),
            Err(TerrainTransferError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn decode_rejects_unsupported_versions() {
        assert!(matches!(
            decode("hillside:v9:12:abcd"),
            Err(TerrainTransferError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn decode_rejects_zero_columns() {
        let layout = TerrainLayout::new(TileCoord::new(12), 48.0, Vec::new());
        let encoded = encode(&layout).replacen(":12:", ":0:", 1);
        assert!(matches!(
            decode(&encoded),
            Err(TerrainTransferError::InvalidColumns(_))
        ));
    }

    #[test]
    fn decode_rejects_mangled_payloads() {
        assert!(matches!(
            decode("hillside:v1:12:@@@@"),
            Err(TerrainTransferError::InvalidEncoding(_))
        ));
        assert!(decode("").is_err());
        assert!(decode("hillside").is_err());
    }
}
