use std::borrow::Cow;

/// Byte classes of the VCF grammar.
pub(crate) trait ByteExt {
    /// Printable, non-blank byte. Bytes above 0x7F are let through and
    /// checked as UTF-8 once the token is complete.
    fn is_token_byte(self) -> bool;

    /// Byte allowed in meta-information keys.
    fn is_key_byte(self) -> bool;

    /// Byte allowed anywhere in a line before its terminator.
    fn is_line_byte(self) -> bool;

    fn describe(self) -> Cow<'static, str>;
}

impl ByteExt for u8 {
    fn is_token_byte(self) -> bool {
        self > b' ' && self != 0x7F
    }

    fn is_key_byte(self) -> bool {
        self.is_ascii_alphanumeric() || self == b'_' || self == b'.' || self == b'-'
    }

    fn is_line_byte(self) -> bool {
        self == b'\t' || self == b' ' || self.is_token_byte()
    }

    fn describe(self) -> Cow<'static, str> {
        match self {
            b'\n' => Cow::Borrowed("end of line"),
            b'\t' => Cow::Borrowed("tab"),
            b' ' => Cow::Borrowed("space"),
            b'!'..=b'~' => Cow::Owned(format!("`{}'", self as char)),
            _ => Cow::Owned(format!("byte 0x{:02X}", self)),
        }
    }
}
