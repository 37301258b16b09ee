//! The ZSCII codec.
//!
//! Z-text packs 5-bit Z-characters three to a 16-bit word; the top bit of
//! a word ends the string. Z-characters select entries from one of three
//! alphabets, escape into 10-bit ZSCII literals, or splice in pre-stored
//! abbreviation strings. The exact state machine depends on the story
//! version: v1 has no abbreviations and its own A2 row, v2 has a single
//! abbreviation bank and shift-locks, v3+ has three banks and no locks.

use crate::error::{Error, Result};
use crate::input::UserInput;
use crate::memory::MemoryRead;
use crate::unicode::{user_input_to_zscii, zscii_to_unicode_string, UnicodeTranslation};
use crate::util::{as_word_address, AbsAddr};
use bitreader::BitReader;
use lazy_static::lazy_static;
use log::trace;

/// A 10-bit ZSCII code point.
pub type ZsciiChar = u16;

pub const NULL_CHAR: ZsciiChar = 0; // Output
pub const DEL_CHAR: ZsciiChar = 8; // Input
pub const TAB_CHAR: ZsciiChar = 9; // Output
pub const SENTENCE_SPACE_CHAR: ZsciiChar = 11; // Output, V6 only
pub const NEWLINE_CHAR: ZsciiChar = 13; // Input & Output
pub const ESC_CHAR: ZsciiChar = 27; // Input
pub const UP_CHAR: ZsciiChar = 129; // Input
pub const DOWN_CHAR: ZsciiChar = 130; // Input
pub const LEFT_CHAR: ZsciiChar = 131; // Input
pub const RIGHT_CHAR: ZsciiChar = 132; // Input
pub const F1_CHAR: ZsciiChar = 133; // Input; F2..F12 follow through 144
pub const F12_CHAR: ZsciiChar = 144; // Input
pub const KEYPAD_0_CHAR: ZsciiChar = 145; // Input; keypad 1..9 follow through 154
pub const KEYPAD_9_CHAR: ZsciiChar = 154; // Input
pub const MENU_CLICK_CHAR: ZsciiChar = 252; // Input
pub const DOUBLE_CLICK_CHAR: ZsciiChar = 253; // Input
pub const SINGLE_CLICK_CHAR: ZsciiChar = 254; // Input

/// The three alphabet rows, indexed by Z-character (entries 6..=31 carry
/// characters; 0..=5 are control codes handled before lookup).
pub type Alphabet = [[ZsciiChar; 32]; 3];

fn build_alphabet(a2_tail: &[u8; 26]) -> Alphabet {
    let mut table = [[0u16; 32]; 3];
    for (i, c) in b"abcdefghijklmnopqrstuvwxyz".iter().enumerate() {
        table[0][i + 6] = *c as ZsciiChar;
    }
    for (i, c) in b"ABCDEFGHIJKLMNOPQRSTUVWXYZ".iter().enumerate() {
        table[1][i + 6] = *c as ZsciiChar;
    }
    for (i, c) in a2_tail.iter().enumerate() {
        table[2][i + 6] = *c as ZsciiChar;
    }
    table
}

lazy_static! {
    ///There are three alphabets: lower case, upper case, and number/symbol.
    ///
    ///| Alphabet |   Z-char offset            |
    ///|----------|----------------------------|
    ///|          | 6789abcdef0123456789abcdef |
    ///|  A0      | abcdefghijklmnopqrstuvwxyz |
    ///|  A1      | ABCDEFGHIJKLMNOPQRSTUVWXYZ |
    ///|  A2      | ^0123456789.,!?_#'"/\<-:() |
    ///
    ///A2 entry 6 (`^` above) escapes into a 10-bit literal. V1 has `<`
    ///where later versions put newline.
    static ref V1_ALPHABET: Alphabet =
        build_alphabet(b"\x000123456789.,!?_#'\"/\\<-:()");
    /// The v2+ built-in table: A2 entry 7 is newline.
    static ref V2_ALPHABET: Alphabet =
        build_alphabet(b"\x00\r0123456789.,!?_#'\"/\\-:()");
}

/// Three Z-characters unpacked from one text word.
#[derive(Debug, Clone, Copy)]
pub struct PackedChars {
    pub last: bool,
    pub chars: [u8; 3],
}

/// Unpack a text word: the top bit flags the final word of a string, the
/// remaining 15 bits are three 5-bit Z-characters.
pub fn read_zchars_from_word(word: &[u8; 2]) -> Result<PackedChars> {
    let mut br = BitReader::new(word);

    // lop off top bit as designator of 'last chars here'
    let last = map_bits(br.read_u8(1))? == 1;
    let mut pc = PackedChars {
        last,
        chars: [0, 0, 0],
    };
    for i in 0..3 {
        pc.chars[i] = map_bits(br.read_u8(5))?;
    }
    Ok(pc)
}

fn map_bits(r: std::result::Result<u8, bitreader::BitReaderError>) -> Result<u8> {
    r.map_err(|e| Error::BadStoryImage(format!("z-character word: {e}")))
}

/// Which decoding rules apply, by story version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlphabetRules {
    V1,
    V2,
    V3Plus,
}

/// Encoder/decoder for one story's Z-text.
///
/// Built once per loaded story by the version factory; holds the story's
/// abbreviations (already decoded to ZSCII), its alphabet table, and its
/// Unicode translation.
pub struct ZsciiCodec {
    rules: AlphabetRules,
    abbreviations: Vec<Vec<ZsciiChar>>,
    alphabet: Alphabet,
    encode_length: usize,
    txn: UnicodeTranslation,
}

impl ZsciiCodec {
    /// The stateless v1 codec: no abbreviations, v1 alphabet.
    pub fn new_v1() -> ZsciiCodec {
        ZsciiCodec {
            rules: AlphabetRules::V1,
            abbreviations: Vec::new(),
            alphabet: *V1_ALPHABET,
            encode_length: 6,
            txn: UnicodeTranslation::standard(),
        }
    }

    /// The v2 codec: a single bank of up to 32 abbreviations.
    pub fn new_v2(abbreviations: Vec<Vec<ZsciiChar>>) -> Result<ZsciiCodec> {
        if abbreviations.len() > 32 {
            return Err(Error::BadStoryImage(
                "maximum of 32 abbreviations available for v2 stories".to_string(),
            ));
        }
        Ok(ZsciiCodec {
            rules: AlphabetRules::V2,
            abbreviations,
            alphabet: *V2_ALPHABET,
            encode_length: 6,
            txn: UnicodeTranslation::standard(),
        })
    }

    /// The v3 codec: three abbreviation banks, 6-character encoding.
    pub fn new_v3(abbreviations: Vec<Vec<ZsciiChar>>) -> Result<ZsciiCodec> {
        Self::new_v3_plus(abbreviations, 6, *V2_ALPHABET, UnicodeTranslation::standard())
    }

    /// The v4 codec: as v3 but dictionary words encode to 9 characters.
    pub fn new_v4(abbreviations: Vec<Vec<ZsciiChar>>) -> Result<ZsciiCodec> {
        Self::new_v3_plus(abbreviations, 9, *V2_ALPHABET, UnicodeTranslation::standard())
    }

    /// The v5+ codec. `raw_alphabet`, when present, is the story's custom
    /// 78-byte alphabet table (header word 0x34); `txn` carries any custom
    /// Unicode translation.
    pub fn new_v5_plus(
        abbreviations: Vec<Vec<ZsciiChar>>,
        raw_alphabet: Option<&[u8]>,
        txn: UnicodeTranslation,
    ) -> Result<ZsciiCodec> {
        let alphabet = match raw_alphabet {
            Some(raw) => custom_alphabet(raw)?,
            None => *V2_ALPHABET,
        };
        Self::new_v3_plus(abbreviations, 9, alphabet, txn)
    }

    fn new_v3_plus(
        abbreviations: Vec<Vec<ZsciiChar>>,
        encode_length: usize,
        alphabet: Alphabet,
        txn: UnicodeTranslation,
    ) -> Result<ZsciiCodec> {
        if abbreviations.len() > 96 {
            // 3 * 32
            return Err(Error::BadStoryImage(
                "maximum of 96 abbreviations available for v3+ stories".to_string(),
            ));
        }
        Ok(ZsciiCodec {
            rules: AlphabetRules::V3Plus,
            abbreviations,
            alphabet,
            encode_length,
            txn,
        })
    }

    pub fn translation(&self) -> &UnicodeTranslation {
        &self.txn
    }

    /// Decode the Z-text starting at `pos` into Unicode.
    ///
    /// Returns the characters and the position after the last byte of the
    /// string. Reads at most `max_bytes`.
    pub fn decode_string(
        &self,
        mem: &(impl MemoryRead + ?Sized),
        pos: AbsAddr,
        max_bytes: usize,
    ) -> Result<(Vec<char>, AbsAddr)> {
        let (decoded, next) = self.decode_zscii(mem, pos, max_bytes)?;
        Ok((zscii_to_unicode_string(&decoded, &self.txn), next))
    }

    /// Decode the Z-text starting at `pos` into ZSCII characters.
    ///
    /// Returns the characters and the position after the last byte of the
    /// string. Reads at most `max_bytes`.
    pub fn decode_zscii(
        &self,
        mem: &(impl MemoryRead + ?Sized),
        pos: AbsAddr,
        max_bytes: usize,
    ) -> Result<(Vec<ZsciiChar>, AbsAddr)> {
        let mut top = pos.saturating_add(max_bytes as AbsAddr).min(mem.size());
        let mut ret: Vec<ZsciiChar> = Vec::new();

        // Decoding state carried across words.
        let mut shift = 0usize;
        let mut alpha = 0usize;
        let mut abbrev_bank = 0u8;
        let mut ten_bit_state = 0u8;
        let mut ten_bit_hi: ZsciiChar = 0;

        let mut idx = pos;
        while idx < top {
            let word = [mem.byte_at(idx), mem.byte_at(idx + 1)];
            let pc = read_zchars_from_word(&word)?;
            if pc.last {
                // Finish this word, then stop.
                top = idx;
            }
            for w in pc.chars {
                if abbrev_bank > 0 {
                    let a_idx = 32 * (abbrev_bank as usize - 1) + w as usize;
                    if a_idx >= self.abbreviations.len() {
                        return Err(Error::AbbreviationOutOfRange(a_idx));
                    }
                    trace!("splicing abbreviation {a_idx}");
                    ret.extend_from_slice(&self.abbreviations[a_idx]);
                    abbrev_bank = 0;
                    continue;
                }
                if ten_bit_state == 1 {
                    ten_bit_hi = (w as ZsciiChar) << 5;
                    ten_bit_state = 2;
                    continue;
                }
                if ten_bit_state == 2 {
                    ret.push(ten_bit_hi | w as ZsciiChar);
                    ten_bit_state = 0;
                    continue;
                }

                match (w, self.rules) {
                    (0, _) => {
                        // Always printed as a space.
                        ret.push(32);
                        shift = 0;
                    }
                    (1, AlphabetRules::V1) => {
                        ret.push(NEWLINE_CHAR);
                        shift = 0;
                    }
                    (1, AlphabetRules::V2) => abbrev_bank = 1,
                    (1..=3, AlphabetRules::V3Plus) => {
                        shift = 0;
                        abbrev_bank = w;
                    }
                    (2 | 3, _) => {
                        // Shift the next character only.
                        shift = w as usize - 1;
                    }
                    (4 | 5, AlphabetRules::V3Plus) => {
                        // No shift-lock in v3+; these shift once.
                        shift = w as usize - 3;
                    }
                    (4 | 5, _) => {
                        // Shift-lock.
                        shift = 0;
                        alpha = (alpha + w as usize - 3) % 3;
                    }
                    _ => {
                        let t_alpha = match self.rules {
                            AlphabetRules::V3Plus => alpha + shift,
                            _ => (alpha + shift) % 3,
                        };
                        shift = 0;
                        if t_alpha == 2 && w == 6 {
                            // The next two Z-characters form a 10-bit literal.
                            ten_bit_state = 1;
                            continue;
                        }
                        ret.push(self.alphabet[t_alpha][w as usize]);
                    }
                }
            }
            idx += 2;
        }
        Ok((ret, idx))
    }

    /// Encode ZSCII text for dictionary lookup: lower-cased, padded with
    /// Z-character 5 to the version's word length, packed 3 per word. The
    /// caller sets the final word's top bit if a terminator is wanted.
    ///
    /// Only characters present in the A0 row are encodable by this path.
    pub fn encode_zscii(&self, text: &[ZsciiChar]) -> Result<Vec<u8>> {
        let size = self.encode_length;
        // Characters must be '5' padded.
        let mut bare = vec![5u8; size];

        for i in 0..size.min(text.len()) {
            let mut c = text[i];

            // Dictionary text is lower case; standard ASCII rules.
            if (b'A' as ZsciiChar..=b'Z' as ZsciiChar).contains(&c) {
                c = c - b'A' as ZsciiChar + b'a' as ZsciiChar;
            }

            let found = self.alphabet[0]
                .iter()
                .position(|entry| *entry == c && c != 0)
                .ok_or(Error::UnencodableCharacter(c))?;
            bare[i] = found as u8;
        }

        let mut ret = Vec::with_capacity(size / 3 * 2);
        for group in bare.chunks(3) {
            let (z0, z1, z2) = (group[0], group[1], group[2]);
            ret.push(((z0 << 2) & 0x7c) | ((z1 >> 3) & 0x03));
            ret.push(((z1 << 5) & 0xe0) | (z2 & 0x1f));
        }
        Ok(ret)
    }

    /// Encode user input for the tokenizer: translate to ZSCII (lowering
    /// typed runes), then encode as a dictionary word.
    pub fn encode_input(&self, input: &[UserInput]) -> Result<Vec<u8>> {
        let zscii = user_input_to_zscii(input, &self.txn);
        self.encode_zscii(&zscii)
    }
}

/// Turn a story's raw 78-byte alphabet table into the three rows. Each row
/// holds 26 entries starting at Z-character 6; A2 entries 6 and 7 are
/// forced to the 10-bit escape and newline regardless of the source bytes.
fn custom_alphabet(raw: &[u8]) -> Result<Alphabet> {
    if raw.len() != 78 {
        return Err(Error::BadAlphabetTable(raw.len()));
    }
    let mut table = [[0u16; 32]; 3];
    let mut idx = 0;
    for row in table.iter_mut() {
        for entry in row.iter_mut().skip(6) {
            *entry = raw[idx] as ZsciiChar;
            idx += 1;
        }
    }
    table[2][6] = 0; // must be a 10-bit encoding
    table[2][7] = NEWLINE_CHAR; // must be a newline
    Ok(table)
}

/// Pre-decode the abbreviations table: a list of word addresses to
/// abbreviation strings.
///
/// The supplied codec must not itself have abbreviations, so that the
/// stored strings cannot expand recursively.
pub fn decode_abbreviations_table(
    mem: &(impl MemoryRead + ?Sized),
    table_pos: AbsAddr,
    max_entries: usize,
    codec: &ZsciiCodec,
) -> Result<Vec<Vec<ZsciiChar>>> {
    let max_size = mem.size();
    let mut ret = Vec::with_capacity(max_entries);
    let mut entry_pos = table_pos;
    for _ in 0..max_entries {
        let pos = as_word_address(mem.word_at(entry_pos));
        if pos >= max_size {
            return Err(Error::BadAbbreviationTable(pos));
        }
        if pos == 0 {
            // An unassigned slot; nothing can live at the header.
            ret.push(Vec::new());
            entry_pos += 2;
            continue;
        }
        let (z, _) = codec.decode_zscii(mem, pos, max_size as usize)?;
        ret.push(z);
        entry_pos += 2;
    }
    Ok(ret)
}
