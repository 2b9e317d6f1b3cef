//! Errors from building names and record data.

use thiserror::Error;

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a name or record could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Names
    // =========================================================================
    /// A label over 63 octets.
    #[error("{length}-octet label is longer than 63")]
    LabelTooLong {
        /// Octets in the label.
        length: usize,
    },

    /// A name over 255 octets in wire form.
    #[error("{length}-octet name is longer than 255")]
    NameTooLong {
        /// Wire length reached.
        length: usize,
    },

    /// Two dots in a row, or a leading dot.
    #[error("label {position} is empty")]
    EmptyLabel {
        /// Zero-based label index.
        position: usize,
    },

    /// A byte that needs escaping appeared bare.
    #[error("{character:?} must be escaped (label offset {position})")]
    InvalidLabelChar {
        /// The offending character.
        character: char,
        /// Offset inside the label being built.
        position: usize,
    },

    /// A backslash escape that does not decode.
    #[error("bad escape at byte {offset}: {message}")]
    InvalidEscape {
        /// Offset of the backslash.
        offset: usize,
        /// What is wrong with it.
        message: String,
    },

    // =========================================================================
    // Record data
    // =========================================================================
    /// Record data that breaks its type's rules.
    #[error("{rtype}: {message}")]
    InvalidRData {
        /// Type mnemonic.
        rtype: String,
        /// What is wrong with it.
        message: String,
    },
}

impl Error {
    /// A [`Error::LabelTooLong`].
    pub fn label_too_long(length: usize) -> Self {
        Self::LabelTooLong { length }
    }

    /// A [`Error::NameTooLong`].
    pub fn name_too_long(length: usize) -> Self {
        Self::NameTooLong { length }
    }

    /// An [`Error::InvalidEscape`].
    pub fn invalid_escape(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidEscape {
            offset,
            message: message.into(),
        }
    }

    /// An [`Error::InvalidRData`].
    pub fn invalid_rdata(rtype: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRData {
            rtype: rtype.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error is about name syntax.
    pub fn is_name_error(&self) -> bool {
        !matches!(self, Self::InvalidRData { .. })
    }
}
