use serde::{Deserialize, Serialize};

use super::Platform;

/// Declared encoding of subprocess output.
///
/// Decoding never patches text after the fact: bytes that are invalid for
/// the declared encoding make the command fail with a decode error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OutputEncoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value
    #[serde(rename = "latin1", alias = "iso-8859-1")]
    Latin1,
    /// OEM console codepage of Western European Windows installs
    #[serde(rename = "cp850", alias = "ibm850")]
    Cp850,
    #[serde(rename = "cp1252", alias = "windows-1252")]
    Cp1252,
}

impl OutputEncoding {
    /// Encoding native tools write on `platform`.
    ///
    /// Windows consoles default to the OEM codepage, not the ANSI one.
    #[must_use]
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self::Cp850,
            Platform::Linux | Platform::MacOs => Self::Utf8,
        }
    }

    /// Decodes `bytes`, returning `None` when they are not valid for this encoding.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Cp850 => Some(oem_cp::decode_string_complete_table(
                bytes,
                &oem_cp::code_table::DECODING_TABLE_CP850,
            )),
            Self::Cp1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(std::borrow::Cow::into_owned),
        }
    }
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl std::fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf-8"),
            Self::Latin1 => write!(f, "latin1"),
            Self::Cp850 => write!(f, "cp850"),
            Self::Cp1252 => write!(f, "cp1252"),
        }
    }
}
