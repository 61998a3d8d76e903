//! GLB header sniffing
//!
//! Layout of the 12-byte header: magic `glTF`, container version (u32 LE),
//! total file length (u32 LE). The sniff is permissive: a bad magic only
//! produces a warning, and the declared length is diagnostic.

use crate::types::IngestWarning;
use serde::Serialize;

pub const GLB_MAGIC: [u8; 4] = *b"glTF";
pub const GLB_HEADER_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlbHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub declared_length: u32,
}

impl GlbHeader {
    /// Parse the leading header bytes, `None` if fewer than 12 are available
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..GLB_HEADER_LEN)?;
        let word = |i: usize| u32::from_le_bytes([header[i], header[i + 1], header[i + 2], header[i + 3]]);
        Some(Self {
            magic: [header[0], header[1], header[2], header[3]],
            version: word(4),
            declared_length: word(8),
        })
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == GLB_MAGIC
    }
}

/// Inspect the first bytes of a staged GLB file.
///
/// Returns the parsed header (if long enough) and any warnings.
pub fn sniff(leading: &[u8], actual_length: u64) -> (Option<GlbHeader>, Vec<IngestWarning>) {
    let Some(header) = GlbHeader::parse(leading) else {
        tracing::warn!(actual_length, "GLB header truncated");
        return (
            None,
            vec![IngestWarning::TruncatedHeader {
                byte_length: actual_length,
            }],
        );
    };

    let mut warnings = Vec::new();
    if header.has_valid_magic() {
        tracing::debug!(version = header.version, "GLB magic verified");
    } else {
        tracing::warn!(found = ?header.magic, "file may not be a valid GLB");
        warnings.push(IngestWarning::BadMagic {
            found: header.magic.to_vec(),
        });
    }

    if u64::from(header.declared_length) != actual_length {
        tracing::warn!(
            declared = header.declared_length,
            actual = actual_length,
            "GLB declared length differs from staged byte count"
        );
    }

    (Some(header), warnings)
}
