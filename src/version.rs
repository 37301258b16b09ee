//! Version dispatch.
//!
//! Byte 0 of the story selects version 1-8, and nearly everything else
//! hangs off that: which header fields exist, which opcode tables are
//! live, how text decodes, and where execution starts.

use crate::error::{Error, Result};
use crate::header::Header;
use crate::instruction::OpDecoder;
use crate::memory::{Memory, MemoryRead};
use crate::text::{decode_abbreviations_table, ZsciiCodec};
use crate::unicode::UnicodeTranslation;
use crate::util::{as_joined_byte_address, as_packed_address, packed_multipliers, AbsAddr};
use crate::vm::RoutineCallState;
use log::debug;

const INITIAL_PC_ADDR: AbsAddr = 0x06;
const ABBREVIATIONS_ADDR: AbsAddr = 0x18;
const ROUTINE_OFFSET_ADDR: AbsAddr = 0x28;

/// Everything version-specific about a loaded story, assembled once.
pub struct Version {
    number: u8,
    header: Header,
    decoder: OpDecoder,
}

impl Version {
    /// Build the version-specific machinery for the story held in `mem`.
    pub fn new(mem: &Memory) -> Result<Version> {
        let number = mem.version_number();
        if !(1..=8).contains(&number) {
            return Err(Error::UnsupportedVersion(number));
        }
        debug!("assembling version {number} machinery");
        let codec = build_codec(number, mem)?;
        Ok(Version {
            number,
            header: Header::new(number),
            decoder: OpDecoder::new(number, codec),
        })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn opcodes(&self) -> &OpDecoder {
        &self.decoder
    }

    pub fn codec(&self) -> &ZsciiCodec {
        self.decoder.codec()
    }

    /// The routine state execution begins in.
    ///
    /// v6 stories name a real routine by packed address, with its own
    /// locals; every other version starts at a bare byte address with
    /// none.
    pub fn initial_routine_state(&self, mem: &Memory) -> RoutineCallState {
        if self.number == 6 {
            let packed = mem.word_at(INITIAL_PC_ADDR) as u32;
            let routine_offset = mem.word_at(ROUTINE_OFFSET_ADDR) as u32;
            let (ptr_mult, offset_mult) = packed_multipliers(self.number);
            let routine = as_packed_address(packed, routine_offset, ptr_mult, offset_mult);
            // The routine prelude is its local count; v5+ locals start
            // zeroed.
            let count = mem.byte_at(routine).min(15) as usize;
            return RoutineCallState::new(routine + 1, vec![0; count]);
        }
        let start = as_joined_byte_address(
            mem.byte_at(INITIAL_PC_ADDR),
            mem.byte_at(INITIAL_PC_ADDR + 1),
        );
        RoutineCallState::new(start, Vec::new())
    }
}

fn build_codec(number: u8, mem: &Memory) -> Result<ZsciiCodec> {
    match number {
        1 => Ok(ZsciiCodec::new_v1()),
        2 => {
            let bare = ZsciiCodec::new_v2(Vec::new())?;
            let abbrevs = story_abbreviations(mem, 32, &bare)?;
            ZsciiCodec::new_v2(abbrevs)
        }
        3 => {
            let bare = ZsciiCodec::new_v3(Vec::new())?;
            let abbrevs = story_abbreviations(mem, 96, &bare)?;
            ZsciiCodec::new_v3(abbrevs)
        }
        4 => {
            let bare = ZsciiCodec::new_v4(Vec::new())?;
            let abbrevs = story_abbreviations(mem, 96, &bare)?;
            ZsciiCodec::new_v4(abbrevs)
        }
        _ => {
            let header = Header::new(number);
            let txn = match header.unicode_translation_table_address(mem) {
                0 => UnicodeTranslation::standard(),
                addr => UnicodeTranslation::from_memory(mem, addr)?,
            };
            let raw_alphabet = match header.alphabet_table_address(mem) {
                0 => None,
                addr => {
                    let raw: Vec<u8> = (0..78).map(|i| mem.byte_at(addr + i)).collect();
                    Some(raw)
                }
            };
            let bare = ZsciiCodec::new_v5_plus(Vec::new(), raw_alphabet.as_deref(), txn.clone())?;
            let abbrevs = story_abbreviations(mem, 96, &bare)?;
            ZsciiCodec::new_v5_plus(abbrevs, raw_alphabet.as_deref(), txn)
        }
    }
}

/// Pre-decode the story's abbreviations with an abbreviation-free codec.
/// A story without the table simply has none.
fn story_abbreviations(
    mem: &Memory,
    max_entries: usize,
    bare: &ZsciiCodec,
) -> Result<Vec<Vec<u16>>> {
    let table = mem.word_at(ABBREVIATIONS_ADDR) as AbsAddr;
    if table == 0 {
        return Ok(Vec::new());
    }
    decode_abbreviations_table(mem, table, max_entries, bare)
}
