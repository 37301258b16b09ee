//! The story file header management.
//!
//! The header is a bitwise view over the first 64 bytes of memory, and
//! which fields exist (and who may write them) depends on the story
//! version. Interpreter-side setters are total: on a version without the
//! capability they succeed as no-ops. Game-side writes are gated through
//! [`Header::value_settable`].

use crate::memory::{is_bit_set, Memory, MemoryRead};
use crate::error::Result;
use crate::util::{AbsAddr, as_joined_byte_address};
use log::debug;
use std::fmt;

const FLAGS1_ADDR: AbsAddr = 0x01;
const RELEASE_ADDR: AbsAddr = 0x02;
const HIGH_MEMORY_ADDR: AbsAddr = 0x04;
const DICTIONARY_ADDR: AbsAddr = 0x08;
const OBJECT_TABLE_ADDR: AbsAddr = 0x0a;
const GLOBALS_ADDR: AbsAddr = 0x0c;
const STATIC_MEMORY_ADDR: AbsAddr = 0x0e;
const FLAGS2_ADDR: AbsAddr = 0x10;
const FLAGS2_EXTRA_ADDR: AbsAddr = 0x11;
const SERIAL_ADDR: AbsAddr = 0x12;
const ABBREVIATIONS_ADDR: AbsAddr = 0x18;
const FILE_LENGTH_ADDR: AbsAddr = 0x1a;
const CHECKSUM_ADDR: AbsAddr = 0x1c;
const INTERPRETER_NUMBER_ADDR: AbsAddr = 0x1e;
const INTERPRETER_VERSION_ADDR: AbsAddr = 0x1f;
const SCREEN_HEIGHT_LINES_ADDR: AbsAddr = 0x20;
const SCREEN_WIDTH_CHARS_ADDR: AbsAddr = 0x21;
const SCREEN_WIDTH_UNITS_ADDR: AbsAddr = 0x22;
const SCREEN_HEIGHT_UNITS_ADDR: AbsAddr = 0x24;
const FONT_WIDTH_ADDR: AbsAddr = 0x26;
const FONT_HEIGHT_ADDR: AbsAddr = 0x27;
const DEFAULT_BACKGROUND_ADDR: AbsAddr = 0x2c;
const DEFAULT_FOREGROUND_ADDR: AbsAddr = 0x2d;
const TERMINATING_CHARS_ADDR: AbsAddr = 0x2e;
const STREAM3_PIXEL_WIDTH_ADDR: AbsAddr = 0x30;
const REVISION_ADDR: AbsAddr = 0x32;
const ALPHABET_TABLE_ADDR: AbsAddr = 0x34;
const HEADER_EXTENSION_ADDR: AbsAddr = 0x36;

/// What the status line shows for this story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLineType {
    ScoreTurns,
    HoursMinutes,
}

/// Version-specific header view.
///
/// Reads and writes go through the memory passed to each call; the header
/// itself holds only the version tag and the marked snapshot captured by
/// [`Header::mark_interpreter_start`].
pub struct Header {
    version: u8,
    marked: Option<Memory>,
}

impl Header {
    pub fn new(version: u8) -> Header {
        Header {
            version,
            marked: None,
        }
    }

    // ---- Identity ----

    pub fn version_number(&self) -> u8 {
        self.version
    }

    pub fn release_number(&self, mem: &Memory) -> u16 {
        mem.word_at(RELEASE_ADDR)
    }

    /// The six-character serial, typically a YYMMDD compile date.
    pub fn serial_number(&self, mem: &Memory) -> String {
        (0..6)
            .map(|i| mem.byte_at(SERIAL_ADDR + i) as char)
            .collect()
    }

    pub fn revision_number(&self, mem: &Memory) -> u16 {
        mem.word_at(REVISION_ADDR)
    }

    pub fn file_checksum(&self, mem: &Memory) -> u16 {
        // The checksum field postdates v2 stories.
        if self.version < 3 {
            return 0;
        }
        mem.word_at(CHECKSUM_ADDR)
    }

    /// The story length in bytes as declared by the file. The stored word
    /// is scaled by a version-specific factor; early stories without the
    /// field report the image size.
    pub fn file_length(&self, mem: &Memory) -> usize {
        if self.version < 3 {
            return mem.size() as usize;
        }
        let stored = mem.word_at(FILE_LENGTH_ADDR) as usize;
        if stored == 0 {
            return mem.size() as usize;
        }
        let factor = match self.version {
            3 => 2,
            4 | 5 => 4,
            _ => 8,
        };
        stored * factor
    }

    // ---- Addresses ----

    pub fn high_memory_base_address(&self, mem: &Memory) -> AbsAddr {
        as_joined_byte_address(mem.byte_at(HIGH_MEMORY_ADDR), mem.byte_at(HIGH_MEMORY_ADDR + 1))
    }

    pub fn static_memory_base_address(&self, mem: &Memory) -> AbsAddr {
        as_joined_byte_address(mem.byte_at(STATIC_MEMORY_ADDR), mem.byte_at(STATIC_MEMORY_ADDR + 1))
    }

    pub fn dictionary_address(&self, mem: &Memory) -> AbsAddr {
        as_joined_byte_address(mem.byte_at(DICTIONARY_ADDR), mem.byte_at(DICTIONARY_ADDR + 1))
    }

    pub fn object_table_address(&self, mem: &Memory) -> AbsAddr {
        as_joined_byte_address(mem.byte_at(OBJECT_TABLE_ADDR), mem.byte_at(OBJECT_TABLE_ADDR + 1))
    }

    pub fn global_variable_table_address(&self, mem: &Memory) -> AbsAddr {
        as_joined_byte_address(mem.byte_at(GLOBALS_ADDR), mem.byte_at(GLOBALS_ADDR + 1))
    }

    pub fn abbreviations_table_address(&self, mem: &Memory) -> AbsAddr {
        if self.version < 2 {
            return 0;
        }
        mem.word_at(ABBREVIATIONS_ADDR) as AbsAddr
    }

    pub fn terminating_characters_table_address(&self, mem: &Memory) -> AbsAddr {
        if self.version < 5 {
            return 0;
        }
        mem.word_at(TERMINATING_CHARS_ADDR) as AbsAddr
    }

    /// Byte address of the story's custom alphabet table (0 when absent).
    pub fn alphabet_table_address(&self, mem: &Memory) -> AbsAddr {
        if self.version < 5 {
            return 0;
        }
        mem.word_at(ALPHABET_TABLE_ADDR) as AbsAddr
    }

    /// Byte address of the Unicode translation table, named by header
    /// extension word 3 (0 when absent).
    pub fn unicode_translation_table_address(&self, mem: &Memory) -> AbsAddr {
        if self.version < 5 {
            return 0;
        }
        self.header_extension_word(mem, 3).unwrap_or(0) as AbsAddr
    }

    /// The n-th word of the header extension table, when the table exists
    /// and declares at least n entries.
    fn header_extension_word(&self, mem: &Memory, n: u16) -> Option<u16> {
        let table = mem.word_at(HEADER_EXTENSION_ADDR) as AbsAddr;
        if table == 0 {
            return None;
        }
        let count = mem.word_at(table);
        if count < n {
            return None;
        }
        Some(mem.word_at(table + 2 * n as AbsAddr))
    }

    // ---- Interpreter-set attributes ----

    pub fn set_interpreter(&self, mem: &mut Memory, number: u8, version: u8) -> Result<()> {
        if self.version < 4 {
            return Ok(());
        }
        mem.write_byte_at(number, INTERPRETER_NUMBER_ADDR)?;
        mem.write_byte_at(version, INTERPRETER_VERSION_ADDR)
    }

    /// Screen height in lines; 255 means "infinite".
    pub fn set_screen_height(&self, mem: &mut Memory, lines: u8) -> Result<()> {
        if self.version < 4 {
            return Ok(());
        }
        mem.write_byte_at(lines, SCREEN_HEIGHT_LINES_ADDR)
    }

    pub fn set_screen_width(&self, mem: &mut Memory, chars: u8) -> Result<()> {
        if self.version < 4 {
            return Ok(());
        }
        mem.write_byte_at(chars, SCREEN_WIDTH_CHARS_ADDR)
    }

    pub fn set_screen_width_units(&self, mem: &mut Memory, units: u16) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        mem.write_word_at(units, SCREEN_WIDTH_UNITS_ADDR)
    }

    pub fn set_screen_height_units(&self, mem: &mut Memory, units: u16) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        mem.write_word_at(units, SCREEN_HEIGHT_UNITS_ADDR)
    }

    /// Font width as per the width of a '0'. The width and height bytes
    /// trade places in v6.
    pub fn set_font_width_units(&self, mem: &mut Memory, units: u8) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        let addr = if self.version >= 6 { FONT_HEIGHT_ADDR } else { FONT_WIDTH_ADDR };
        mem.write_byte_at(units, addr)
    }

    pub fn set_font_height_units(&self, mem: &mut Memory, units: u8) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        let addr = if self.version >= 6 { FONT_WIDTH_ADDR } else { FONT_HEIGHT_ADDR };
        mem.write_byte_at(units, addr)
    }

    /// Total width in pixels of text sent to output stream 3 (v6).
    pub fn set_output_stream3_text_sent_pixel_width(
        &self,
        mem: &mut Memory,
        pixels: u16,
    ) -> Result<()> {
        if self.version < 6 {
            return Ok(());
        }
        mem.write_word_at(pixels, STREAM3_PIXEL_WIDTH_ADDR)
    }

    pub fn default_colors(&self, mem: &Memory) -> (u8, u8) {
        if self.version < 5 {
            return (0, 0);
        }
        (
            mem.byte_at(DEFAULT_FOREGROUND_ADDR),
            mem.byte_at(DEFAULT_BACKGROUND_ADDR),
        )
    }

    pub fn set_default_colors(&self, mem: &mut Memory, foreground: u8, background: u8) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        mem.write_byte_at(foreground, DEFAULT_FOREGROUND_ADDR)?;
        mem.write_byte_at(background, DEFAULT_BACKGROUND_ADDR)
    }

    // ---- Flags 1: capability bits ----

    fn flags1_bit(&self, mem: &Memory, bit: u8) -> bool {
        is_bit_set(mem, FLAGS1_ADDR, bit)
    }

    fn set_flags1_bit(&self, mem: &mut Memory, bit: u8, val: bool) -> Result<()> {
        let mut f = mem.byte_at(FLAGS1_ADDR) & !(1 << bit);
        if val {
            f |= 1 << bit;
        }
        mem.write_byte_at(f, FLAGS1_ADDR)
    }

    pub fn status_line_type(&self, mem: &Memory) -> StatusLineType {
        if self.version <= 3 && self.flags1_bit(mem, 1) {
            StatusLineType::HoursMinutes
        } else {
            StatusLineType::ScoreTurns
        }
    }

    pub fn two_disc_story(&self, mem: &Memory) -> bool {
        self.version <= 3 && self.flags1_bit(mem, 2)
    }

    pub fn status_line_available(&self, mem: &Memory) -> bool {
        match self.version {
            // The bit is "status line NOT available".
            1..=3 => !self.flags1_bit(mem, 4),
            _ => true,
        }
    }

    pub fn set_status_line_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        match self.version {
            1..=3 => self.set_flags1_bit(mem, 4, !val),
            _ => Ok(()),
        }
    }

    pub fn screen_split_available(&self, mem: &Memory) -> bool {
        match self.version {
            1 | 2 => false,
            3 => self.flags1_bit(mem, 5),
            _ => true,
        }
    }

    pub fn set_screen_split_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        match self.version {
            3 => self.set_flags1_bit(mem, 5, val),
            _ => Ok(()),
        }
    }

    pub fn default_variable_pitch_font(&self, mem: &Memory) -> bool {
        self.version == 3 && self.flags1_bit(mem, 6)
    }

    pub fn set_default_variable_pitch_font(&self, mem: &mut Memory, val: bool) -> Result<()> {
        match self.version {
            3 => self.set_flags1_bit(mem, 6, val),
            _ => Ok(()),
        }
    }

    pub fn colors_available(&self, mem: &Memory) -> bool {
        self.version >= 5 && self.flags1_bit(mem, 0)
    }

    pub fn set_colors_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        self.set_flags1_bit(mem, 0, val)
    }

    pub fn picture_display_available(&self, mem: &Memory) -> bool {
        self.version >= 6 && self.flags1_bit(mem, 1)
    }

    pub fn set_picture_display_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        if self.version < 6 {
            return Ok(());
        }
        self.set_flags1_bit(mem, 1, val)
    }

    pub fn boldface_available(&self, mem: &Memory) -> bool {
        self.version >= 4 && self.flags1_bit(mem, 2)
    }

    pub fn set_boldface_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        if self.version < 4 {
            return Ok(());
        }
        self.set_flags1_bit(mem, 2, val)
    }

    pub fn italic_available(&self, mem: &Memory) -> bool {
        self.version >= 4 && self.flags1_bit(mem, 3)
    }

    pub fn set_italic_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        if self.version < 4 {
            return Ok(());
        }
        self.set_flags1_bit(mem, 3, val)
    }

    pub fn fixed_space_font_available(&self, mem: &Memory) -> bool {
        self.version >= 4 && self.flags1_bit(mem, 4)
    }

    pub fn set_fixed_space_font_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        if self.version < 4 {
            return Ok(());
        }
        self.set_flags1_bit(mem, 4, val)
    }

    pub fn sound_effects_available(&self, mem: &Memory) -> bool {
        self.version >= 6 && self.flags1_bit(mem, 5)
    }

    pub fn set_sound_effects_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        if self.version < 6 {
            return Ok(());
        }
        self.set_flags1_bit(mem, 5, val)
    }

    pub fn timed_keyboard_input_available(&self, mem: &Memory) -> bool {
        self.version >= 4 && self.flags1_bit(mem, 7)
    }

    pub fn set_timed_keyboard_input_available(&self, mem: &mut Memory, val: bool) -> Result<()> {
        if self.version < 4 {
            return Ok(());
        }
        self.set_flags1_bit(mem, 7, val)
    }

    // ---- Flags 2: game-set bits ----

    fn set_flags2_bit(&self, mem: &mut Memory, bit: u8, val: bool) -> Result<()> {
        let mut f = mem.byte_at(FLAGS2_ADDR) & !(1 << bit);
        if val {
            f |= 1 << bit;
        }
        mem.write_byte_at(f, FLAGS2_ADDR)
    }

    pub fn transcript_enabled(&self, mem: &Memory) -> bool {
        is_bit_set(mem, FLAGS2_ADDR, 0)
    }

    /// Also settable by the game through a header write.
    pub fn set_transcript_enabled(&self, mem: &mut Memory, val: bool) -> Result<()> {
        self.set_flags2_bit(mem, 0, val)
    }

    /// Game may change it, interpreter may not.
    pub fn forced_fixed_pitch_font_enabled(&self, mem: &Memory) -> bool {
        self.version >= 3 && is_bit_set(mem, FLAGS2_ADDR, 1)
    }

    pub fn requests_status_line_redraw(&self, mem: &Memory) -> bool {
        self.version >= 6 && is_bit_set(mem, FLAGS2_ADDR, 2)
    }

    /// Interpreter requests it, game clears it.
    pub fn set_request_status_line_redraw(&self, mem: &mut Memory) -> Result<()> {
        if self.version < 6 {
            return Ok(());
        }
        self.set_flags2_bit(mem, 2, true)
    }

    pub fn game_requests_pictures(&self, mem: &Memory) -> bool {
        self.version >= 5 && is_bit_set(mem, FLAGS2_ADDR, 3)
    }

    pub fn set_pictures_not_available(&self, mem: &mut Memory) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        self.set_flags2_bit(mem, 3, false)
    }

    pub fn game_requests_undo_opcodes(&self, mem: &Memory) -> bool {
        self.version >= 5 && is_bit_set(mem, FLAGS2_ADDR, 4)
    }

    pub fn set_undo_not_available(&self, mem: &mut Memory) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        self.set_flags2_bit(mem, 4, false)
    }

    pub fn game_requests_mouse_support(&self, mem: &Memory) -> bool {
        self.version >= 5 && is_bit_set(mem, FLAGS2_ADDR, 5)
    }

    pub fn set_mouse_not_available(&self, mem: &mut Memory) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        self.set_flags2_bit(mem, 5, false)
    }

    /// Hard-coded in the story file; read-only for everyone.
    pub fn requests_colors(&self, mem: &Memory) -> bool {
        self.version >= 5 && is_bit_set(mem, FLAGS2_ADDR, 6)
    }

    pub fn game_requests_sounds(&self, mem: &Memory) -> bool {
        self.version >= 5 && is_bit_set(mem, FLAGS2_ADDR, 7)
    }

    pub fn set_sounds_not_available(&self, mem: &mut Memory) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        self.set_flags2_bit(mem, 7, false)
    }

    pub fn game_requests_menus(&self, mem: &Memory) -> bool {
        self.version >= 6 && is_bit_set(mem, FLAGS2_EXTRA_ADDR, 0)
    }

    pub fn set_menus_not_available(&self, mem: &mut Memory) -> Result<()> {
        if self.version < 6 {
            return Ok(());
        }
        let f = mem.byte_at(FLAGS2_EXTRA_ADDR) & !1;
        mem.write_byte_at(f, FLAGS2_EXTRA_ADDR)
    }

    /// Record a mouse click position in header extension words 1 and 2.
    pub fn set_mouse_click_pos(&self, mem: &mut Memory, x: u16, y: u16) -> Result<()> {
        if self.version < 5 {
            return Ok(());
        }
        let table = mem.word_at(HEADER_EXTENSION_ADDR) as AbsAddr;
        if table == 0 || mem.word_at(table) < 2 {
            return Ok(());
        }
        mem.write_word_at(x, table + 2)?;
        mem.write_word_at(y, table + 4)
    }

    // ---- Game write gate ----

    /// Whether the game may write `val` to header position `pos`. Only the
    /// bits a game legitimately controls may change.
    pub fn value_settable(&self, mem: &Memory, pos: AbsAddr, val: u8) -> bool {
        let changeable: u8 = match (pos, self.version) {
            // Transcript bit only in the earliest versions.
            (FLAGS2_ADDR, 1 | 2) => 0b0000_0001,
            // Plus forced fixed-pitch from v3.
            (FLAGS2_ADDR, 3 | 4) => 0b0000_0011,
            // Plus the game-wants bits from v5: pictures, undo, mouse,
            // sounds.
            (FLAGS2_ADDR, _) => 0b1011_1011,
            (FLAGS2_EXTRA_ADDR, v) if v >= 6 => 0b0000_0001,
            _ => return false,
        };
        let diff = val ^ mem.byte_at(pos);
        let ok = diff & !changeable == 0;
        if !ok {
            debug!("rejected game header write of {val:#04x} at {pos:#04x}");
        }
        ok
    }

    // ---- Lifecycle ----

    /// Snapshot the header once the interpreter has filled in its fields;
    /// reset and restart restore from this snapshot.
    pub fn mark_interpreter_start(&mut self, mem: &Memory) {
        self.marked = Some(mem.clone());
    }

    fn marked_byte(&self, mem: &Memory, addr: AbsAddr) -> u8 {
        match &self.marked {
            Some(m) => m.byte_at(addr),
            // Without a mark, the pristine story supplies the values.
            None => mem.story_data().byte_at(addr),
        }
    }

    /// Restore the header after an undo: flag 1, flag 2 bits 1-7 (the
    /// live transcript bit survives), and the revision word.
    pub fn on_reset(&self, mem: &mut Memory) -> Result<()> {
        let flag1 = self.marked_byte(mem, FLAGS1_ADDR);
        mem.write_byte_at(flag1, FLAGS1_ADDR)?;

        let transcript = mem.byte_at(FLAGS2_ADDR) & 0b0000_0001;
        let flag2 = (self.marked_byte(mem, FLAGS2_ADDR) & 0b1111_1110) | transcript;
        mem.write_byte_at(flag2, FLAGS2_ADDR)?;

        mem.write_byte_at(self.marked_byte(mem, REVISION_ADDR), REVISION_ADDR)?;
        mem.write_byte_at(self.marked_byte(mem, REVISION_ADDR + 1), REVISION_ADDR + 1)
    }

    /// Restore the header after a game restart: flag 2 is preserved
    /// entirely, the other interpreter-set bytes return to their marks.
    pub fn on_restart(&self, mem: &mut Memory) -> Result<()> {
        let restored: &[AbsAddr] = &[
            FLAGS1_ADDR,
            INTERPRETER_NUMBER_ADDR,
            INTERPRETER_VERSION_ADDR,
            SCREEN_HEIGHT_LINES_ADDR,
            SCREEN_WIDTH_CHARS_ADDR,
            SCREEN_WIDTH_UNITS_ADDR,
            SCREEN_WIDTH_UNITS_ADDR + 1,
            SCREEN_HEIGHT_UNITS_ADDR,
            SCREEN_HEIGHT_UNITS_ADDR + 1,
            FONT_WIDTH_ADDR,
            FONT_HEIGHT_ADDR,
            DEFAULT_BACKGROUND_ADDR,
            DEFAULT_FOREGROUND_ADDR,
            REVISION_ADDR,
            REVISION_ADDR + 1,
        ];
        for addr in restored {
            mem.write_byte_at(self.marked_byte(mem, *addr), *addr)?;
        }
        Ok(())
    }
}

/// A txd-style header dump, handy in logs and tests.
pub struct HeaderDisplay<'a> {
    pub header: &'a Header,
    pub memory: &'a Memory,
}

impl fmt::Display for HeaderDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (h, m) = (self.header, self.memory);
        write!(
            f,
            "
Z-code version:           {}
Release number:           {}
Serial number:            {}
Start of high memory:     {:#06x}
Dictionary address:       {:#06x}
Object table address:     {:#06x}
Global variables address: {:#06x}
Start of static memory:   {:#06x}
Abbreviations address:    {:#06x}
File size:                {:#06x}
Checksum:                 {:#06x}
",
            h.version_number(),
            h.release_number(m),
            h.serial_number(m),
            h.high_memory_base_address(m),
            h.dictionary_address(m),
            h.object_table_address(m),
            h.global_variable_table_address(m),
            h.static_memory_base_address(m),
            h.abbreviations_table_address(m),
            h.file_length(m),
            h.file_checksum(m),
        )
    }
}
