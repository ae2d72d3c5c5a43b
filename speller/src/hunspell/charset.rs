//! Dictionaries declare their character set with a `SET` line in the
//! affix file, and the word list uses the same one. Both files are
//! decoded to UTF-8 up front so the rest of the engine only sees `str`.
use anyhow::{anyhow, Result};
use encoding::label::encoding_from_whatwg_label;
use encoding::{DecoderTrap, Encoding, EncodingRef};

/// Find the value of the `SET` directive by looking at the raw bytes.
/// The directive itself is always plain ASCII.
fn declared_charset(aff: &[u8]) -> Option<String> {
    aff.split(|b| *b == b'\n').find_map(|line| {
        let line = line.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(line);
        let rest = line.strip_prefix(b"SET")?;
        if !rest.first().map_or(false, |b| b.is_ascii_whitespace()) {
            return None;
        }
        let value = String::from_utf8_lossy(rest);
        value.split_whitespace().next().map(str::to_string)
    })
}

/// Map the names hunspell dictionaries use onto WHATWG encoding labels.
fn lookup(name: &str) -> Option<EncodingRef> {
    let name = name.to_ascii_lowercase();
    let name = name.strip_prefix("microsoft-").unwrap_or(&name);
    encoding_from_whatwg_label(name)
}

pub fn detect(aff: &[u8]) -> Result<EncodingRef> {
    match declared_charset(aff) {
        None => Ok(encoding::all::UTF_8),
        Some(name) => {
            lookup(&name).ok_or_else(|| anyhow!("Unsupported encoding {}", name))
        }
    }
}

pub fn decode(enc: EncodingRef, bytes: &[u8]) -> Result<String> {
    let text = enc
        .decode(bytes, DecoderTrap::Strict)
        .map_err(|e| anyhow!("Could not decode as {}: {}", enc.name(), e))?;
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_utf8() {
        let enc = detect(b"TRY abc\n").unwrap();
        assert_eq!("utf-8", enc.name());
    }

    #[test]
    fn test_latin1_dictionary() {
        let enc = detect(b"SET ISO8859-1\nTRY abc\n").unwrap();
        assert_eq!("caf\u{e9}", decode(enc, b"caf\xE9").unwrap());
    }

    #[test]
    fn test_unknown_charset() {
        assert!(detect(b"SET EBCDIC-37\n").is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(decode(encoding::all::UTF_8, b"caf\xE9").is_err());
    }
}
