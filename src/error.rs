use core::fmt;

#[cfg(feature = "alloc")]
use crate::diagnostics::Path;

/// A structured error code identifying why a value was rejected.
///
/// Stable and string-free so the hot validation/decode path never formats
/// text; human-readable text lives only in [`CodecError`]'s `Display` impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Invalid configured decode limits (e.g. a field set to an impossible value).
    InvalidLimits,

    /// Unexpected end-of-input while decoding.
    UnexpectedEof,
    /// Arithmetic overflow while computing a length or offset.
    LengthOverflow,
    /// Input contains bytes after the single top-level item (`allow_concat = false`).
    TrailingBytes,
    /// Memory allocation failed while decoding or encoding into owned structures.
    AllocationFailed,
    /// An array builder emitted a different number of items than declared.
    ArrayLenMismatch,
    /// A map builder emitted a different number of entries than declared.
    MapLenMismatch,

    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Total decoded item count limit exceeded.
    TotalItemsLimitExceeded,
    /// Array length exceeds the configured limit.
    ArrayLenLimitExceeded,
    /// Map length exceeds the configured limit.
    MapLenLimitExceeded,
    /// Byte-string length exceeds the configured limit.
    BytesLenLimitExceeded,
    /// Text-string length exceeds the configured limit.
    TextLenLimitExceeded,
    /// Total input length exceeds the configured limit.
    MessageLenLimitExceeded,

    /// A reserved additional-info value (28, 29, or 30) was used in a head.
    ReservedAdditionalInfo,
    /// An indefinite-length encoding (additional info 31, or a break byte) was used.
    IndefiniteLengthForbidden,
    /// A non-shortest (non-canonical) integer/length argument encoding was used.
    NonCanonicalEncoding,

    /// A map key was not a CBOR text string.
    MapKeyMustBeText,
    /// Two map entries had equal keys.
    DuplicateMapKey,
    /// Map keys were not strictly increasing under canonical order.
    NonCanonicalMapOrder,

    /// A tag other than 42 was used, or tag 42's content did not have the right shape.
    UnexpectedTag,
    /// Tag 42's content was a byte string, but its first byte was not the multibase
    /// identity prefix `0x00`.
    InvalidCidPrefix,

    /// An unsupported CBOR simple value or floating-point width was used (anything other
    /// than `false`/`true`/`null`/float64).
    UnsupportedSimpleValue,
    /// An integer value's magnitude does not fit the codec's legal range.
    IntegerOutOfRange,

    /// Text content was not valid UTF-8.
    Utf8Invalid,

    /// A float64 payload was NaN or ±Infinity.
    DisallowedFloat,

    /// Recursion depth exceeded the configured maximum while encoding.
    NestingTooDeep,
    /// The value being encoded is not one of the nine permitted kinds.
    UnsupportedType,

    /// A [`crate::stream::ByteSink`] reported a write failure (short write past the point
    /// where it can make progress, or an underlying I/O error).
    SinkWriteFailed,
    /// A [`crate::stream::ByteSource`] reported a read failure.
    SourceReadFailed,
}

/// The two error families from spec §4.4/§7: values being encoded, and bytes being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The error was raised while walking an in-memory value to encode it.
    Encoding,
    /// The error was raised while parsing a byte sequence.
    Decoding,
}

/// A codec error with structured classification, a byte offset, and (with `alloc`) a
/// container path.
///
/// For encode errors, `offset` is always 0 and [`CodecError::path`] instead describes the
/// position within the in-memory value tree; for decode errors, `offset` is the byte
/// position where the error was detected and `path` the container stack leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    /// The error code.
    pub code: ErrorCode,
    /// Which family of operation raised this error.
    pub kind: ErrorKind,
    /// Byte offset into the input (decode) or 0 (encode).
    pub offset: usize,
    /// Logical container path, e.g. `root/list[3]/map["foo"]`.
    #[cfg(feature = "alloc")]
    pub path: Path,
}

impl CodecError {
    /// Construct a decoding error at a byte offset with an empty path.
    #[must_use]
    pub fn decode(code: ErrorCode, offset: usize) -> Self {
        Self {
            code,
            kind: ErrorKind::Decoding,
            offset,
            #[cfg(feature = "alloc")]
            path: Path::root(),
        }
    }

    /// Construct a decoding error at a byte offset with an explicit path.
    #[cfg(feature = "alloc")]
    #[must_use]
    pub fn decode_at(code: ErrorCode, offset: usize, path: Path) -> Self {
        Self {
            code,
            kind: ErrorKind::Decoding,
            offset,
            path,
        }
    }

    /// Construct an encoding error with an explicit path within the value tree.
    #[cfg(feature = "alloc")]
    #[must_use]
    pub fn encode_at(code: ErrorCode, path: Path) -> Self {
        Self {
            code,
            kind: ErrorKind::Encoding,
            offset: 0,
            path,
        }
    }

    /// Construct an encoding error with no path information (used by `no_std`/no-`alloc`
    /// callers and by internal helpers before a path is known).
    #[must_use]
    pub fn encode(code: ErrorCode) -> Self {
        Self {
            code,
            kind: ErrorKind::Encoding,
            offset: 0,
            #[cfg(feature = "alloc")]
            path: Path::root(),
        }
    }

    /// Render a fixed-width hex dump of `data` centered on this error's `offset`, with a
    /// caret under the offending byte. Returns `None` if `data` is empty.
    #[cfg(feature = "alloc")]
    #[must_use]
    pub fn hex_snippet(&self, data: &[u8], width: usize) -> Option<alloc::string::String> {
        crate::diagnostics::hex_snippet(data, self.offset, width)
    }

    /// Replace this error's diagnostic path, leaving its code/kind/offset untouched.
    ///
    /// Used to attach the live container path to an error raised by a lower layer (the
    /// head codec, UTF-8 validation, fallible allocation) that has no notion of `Path`.
    #[cfg(feature = "alloc")]
    #[must_use]
    pub fn with_path(mut self, path: Path) -> Self {
        self.path = path;
        self
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::InvalidLimits => "invalid decode limits",

            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::TrailingBytes => "trailing bytes after single top-level item",
            ErrorCode::AllocationFailed => "allocation failed",
            ErrorCode::ArrayLenMismatch => "array length mismatch",
            ErrorCode::MapLenMismatch => "map length mismatch",

            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::TotalItemsLimitExceeded => "total item count limit exceeded",
            ErrorCode::ArrayLenLimitExceeded => "array length exceeds decode limits",
            ErrorCode::MapLenLimitExceeded => "map length exceeds decode limits",
            ErrorCode::BytesLenLimitExceeded => "byte string length exceeds decode limits",
            ErrorCode::TextLenLimitExceeded => "text string length exceeds decode limits",
            ErrorCode::MessageLenLimitExceeded => "input length exceeds decode limits",

            ErrorCode::ReservedAdditionalInfo => "reserved additional info value",
            ErrorCode::IndefiniteLengthForbidden => "indefinite length forbidden",
            ErrorCode::NonCanonicalEncoding => "non-canonical argument encoding",

            ErrorCode::MapKeyMustBeText => "map keys must be text strings",
            ErrorCode::DuplicateMapKey => "duplicate map key",
            ErrorCode::NonCanonicalMapOrder => "map keys are not in canonical order",

            ErrorCode::UnexpectedTag => "unexpected tag",
            ErrorCode::InvalidCidPrefix => "CID content must begin with the 0x00 prefix",

            ErrorCode::UnsupportedSimpleValue => "unsupported CBOR simple value",
            ErrorCode::IntegerOutOfRange => "integer magnitude out of range",

            ErrorCode::Utf8Invalid => "text must be valid UTF-8",

            ErrorCode::DisallowedFloat => "float64 must not be NaN or infinite",

            ErrorCode::NestingTooDeep => "nesting too deep",
            ErrorCode::UnsupportedType => "unsupported value kind",

            ErrorCode::SinkWriteFailed => "byte sink failed to accept all written bytes",
            ErrorCode::SourceReadFailed => "byte source failed to supply requested bytes",
        };

        #[cfg(feature = "alloc")]
        {
            match self.kind {
                ErrorKind::Decoding => write!(f, "{} at offset {}: {msg}", self.path, self.offset),
                ErrorKind::Encoding => write!(f, "{}: {msg}", self.path),
            }
        }

        #[cfg(not(feature = "alloc"))]
        {
            match self.kind {
                ErrorKind::Decoding => write!(f, "decode error at offset {}: {msg}", self.offset),
                ErrorKind::Encoding => write!(f, "encode error: {msg}"),
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}
