//! ZSCII to Unicode translation.
//!
//! ZSCII covers ASCII plus a block of Latin diacritics at codes 155-223.
//! Version 5+ stories may replace that block through a translation table
//! named in the header extension.

use crate::error::{Error, Result};
use crate::input::UserInput;
use crate::memory::MemoryRead;
use crate::text::{ZsciiChar, NEWLINE_CHAR, NULL_CHAR};
use crate::util::AbsAddr;
use indexmap::IndexMap;
use lazy_static::lazy_static;

/// The Latin diacritics occupying ZSCII 155-223 in the standard table.
const STD_EXTRA_CHARS: [char; 69] = [
    'ä', 'ö', 'ü', 'Ä', 'Ö', 'Ü', 'ß', '»', '«', 'ë', 'ï', 'ÿ', 'Ë', 'Ï', 'á', 'é', 'í',
    'ó', 'ú', 'ý', 'Á', 'É', 'Í', 'Ó', 'Ú', 'Ý', 'à', 'è', 'ì', 'ò', 'ù', 'À', 'È', 'Ì',
    'Ò', 'Ù', 'â', 'ê', 'î', 'ô', 'û', 'Â', 'Ê', 'Î', 'Ô', 'Û', 'å', 'Å', 'ø', 'Ø', 'ã',
    'ñ', 'õ', 'Ã', 'Ñ', 'Õ', 'æ', 'Æ', 'ç', 'Ç', 'þ', 'ð', 'Þ', 'Ð', '£', 'œ', 'Œ', '¡',
    '¿',
];

lazy_static! {
    /// The fixed ZSCII to Unicode table shared by every story version.
    static ref ZSCII_STD_LOOKUP: IndexMap<ZsciiChar, char> = {
        let mut m = IndexMap::new();
        m.insert(9u16, '\t');
        m.insert(11u16, '\u{2003}'); // sentence space, v6 only
        m.insert(NEWLINE_CHAR, '\n');
        for c in 32u16..=126 {
            m.insert(c, c as u8 as char);
        }
        // Typographic quotes stand in for the ASCII apostrophe and backtick.
        m.insert(39u16, '\u{2019}');
        m.insert(96u16, '\u{2018}');
        for (i, c) in STD_EXTRA_CHARS.iter().enumerate() {
            m.insert(155 + i as u16, *c);
        }
        m
    };
}

/// Converts between ZSCII and Unicode, optionally through a story-supplied
/// table for codes 155 and up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnicodeTranslation {
    extended: IndexMap<ZsciiChar, char>,
}

impl UnicodeTranslation {
    /// The fixed translation used by v1-v4 stories (and v5+ stories
    /// without a custom table).
    pub fn standard() -> UnicodeTranslation {
        UnicodeTranslation {
            extended: IndexMap::new(),
        }
    }

    /// A translation extended by the story's Unicode table entries, which
    /// populate ZSCII codes 155, 156, ... in order.
    pub fn with_lookup(entries: &[u16]) -> Result<UnicodeTranslation> {
        if entries.len() > 97 {
            return Err(Error::TooManyUnicodeEntries(entries.len()));
        }
        let mut extended = IndexMap::new();
        for (i, uni) in entries.iter().enumerate() {
            if let Some(c) = char::from_u32(*uni as u32) {
                extended.insert(155 + i as u16, c);
            }
        }
        Ok(UnicodeTranslation { extended })
    }

    /// Load the custom table at the given address: the first word counts
    /// the big-endian code-point entries that follow.
    pub fn from_memory(mem: &(impl MemoryRead + ?Sized), table_addr: AbsAddr) -> Result<UnicodeTranslation> {
        let count = mem.word_at(table_addr) as usize;
        let mut entries = Vec::with_capacity(count.min(97));
        if count > 97 {
            return Err(Error::TooManyUnicodeEntries(count));
        }
        for i in 0..count {
            entries.push(mem.word_at(table_addr + 2 + (i as u32) * 2));
        }
        UnicodeTranslation::with_lookup(&entries)
    }

    /// The Unicode rendering of a ZSCII output character. `None` for codes
    /// with no printable mapping; such codes are dropped from output.
    pub fn zscii_to_unicode(&self, out: ZsciiChar) -> Option<char> {
        if let Some(c) = self.extended.get(&out) {
            return Some(*c);
        }
        ZSCII_STD_LOOKUP.get(&out).copied()
    }

    /// The ZSCII code for an input rune. Unmapped runes become
    /// [`NULL_CHAR`], except the few keyboard characters that normalize.
    pub fn unicode_to_zscii(&self, input: char) -> ZsciiChar {
        for (z, c) in &self.extended {
            if *c == input {
                return *z;
            }
        }
        for (z, c) in ZSCII_STD_LOOKUP.iter() {
            if *c == input {
                return *z;
            }
        }
        // Other characters from the keyboard.
        match input {
            '\n' => NEWLINE_CHAR,
            '\'' => 39,
            '`' => 96,
            _ => NULL_CHAR,
        }
    }

    /// The ZSCII code for a single input action. Control codes pass
    /// straight through.
    pub fn input_to_zscii(&self, input: UserInput) -> ZsciiChar {
        match input.key {
            Some(key) => self.unicode_to_zscii(key),
            None => input.ctrl,
        }
    }
}

/// Render decoded ZSCII output as Unicode, dropping untranslatable codes.
pub fn zscii_to_unicode_string(out: &[ZsciiChar], txn: &UnicodeTranslation) -> Vec<char> {
    out.iter()
        .filter_map(|z| txn.zscii_to_unicode(*z))
        .collect()
}

/// Translate user input into ZSCII, lowercasing typed runes first.
/// Untranslatable inputs are dropped.
pub fn user_input_to_zscii(input: &[UserInput], txn: &UnicodeTranslation) -> Vec<ZsciiChar> {
    let mut ret = Vec::with_capacity(input.len());
    for i in input {
        match i.key {
            Some(key) => {
                for lowered in key.to_lowercase() {
                    let z = txn.unicode_to_zscii(lowered);
                    if z != NULL_CHAR {
                        ret.push(z);
                    }
                }
            }
            None => {
                if i.ctrl != NULL_CHAR {
                    ret.push(i.ctrl);
                }
            }
        }
    }
    ret
}
