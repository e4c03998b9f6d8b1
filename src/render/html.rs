//! Append-only HTML sink with escaping helpers.

use std::fmt;
use std::io::{self, Write};

/// Response sink. Everything written is final; nothing is retracted.
pub struct Html<'a> {
    out: &'a mut dyn Write,
}

fn escape_text_byte(b: u8) -> Option<&'static [u8]> {
    match b {
        b'&' => Some(b"&amp;"),
        b'<' => Some(b"&lt;"),
        b'>' => Some(b"&gt;"),
        _ => None,
    }
}

fn escape_attr_byte(b: u8) -> Option<&'static [u8]> {
    match b {
        b'\'' => Some(b"&#x27;"),
        b'"' => Some(b"&quot;"),
        _ => escape_text_byte(b),
    }
}

impl<'a> Html<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Html { out }
    }

    /// Write markup verbatim.
    pub fn raw(&mut self, markup: &str) -> io::Result<()> {
        self.out.write_all(markup.as_bytes())
    }

    /// Write formatted markup verbatim.
    pub fn fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.out.write_fmt(args)
    }

    /// Write text content, escaping markup characters.
    pub fn txt(&mut self, text: &str) -> io::Result<()> {
        self.escaped(text.as_bytes(), escape_text_byte)
    }

    /// Write byte content as text, escaping markup characters. Non-UTF-8 bytes pass through.
    pub fn txt_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.escaped(bytes, escape_text_byte)
    }

    /// Write an attribute value, escaping quotes as well.
    pub fn attr(&mut self, value: &str) -> io::Result<()> {
        self.escaped(value.as_bytes(), escape_attr_byte)
    }

    fn escaped(&mut self, bytes: &[u8], escape: fn(u8) -> Option<&'static [u8]>) -> io::Result<()> {
        let mut start = 0;
        for (idx, b) in bytes.iter().enumerate() {
            if let Some(replacement) = escape(*b) {
                self.out.write_all(&bytes[start..idx])?;
                self.out.write_all(replacement)?;
                start = idx + 1;
            }
        }
        self.out.write_all(&bytes[start..])
    }

    /// Borrow the underlying writer, e.g. to stream a child process into it.
    pub fn writer(&mut self) -> &mut dyn Write {
        &mut *self.out
    }
}
