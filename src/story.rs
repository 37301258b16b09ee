//! Typed view over the raw story image.
//!
//! Parses the fixed header offsets that establish the memory layout before
//! any other subsystem can be built.

use crate::error::{Error, Result};
use crate::memory::MemoryRead;
use crate::util::{as_long, as_word, AbsAddr, MemoryRange};

const HEADER_HIGH_MEMORY_START_ADDR: usize = 0x04;
const HEADER_DYNAMIC_MEMORY_END_ADDR: usize = 0x0e;
const HEADER_ROUTINE_OFFSET_ADDR: usize = 0x28;
const HEADER_STRING_OFFSET_ADDR: usize = 0x2a;

/// The raw story data with its layout fields parsed.
pub struct StoryData {
    data: Vec<u8>,
    dynamic_memory_end: AbsAddr,
    static_memory_end: AbsAddr,
    high_memory_start: AbsAddr,
    routine_offset: u16,
    string_offset: u16,
}

impl StoryData {
    pub fn new(data: Vec<u8>) -> Result<StoryData> {
        if data.len() < 16 {
            return Err(Error::BadStoryImage(
                "story data must have at least 16 bytes".to_string(),
            ));
        }
        // The header stores the first static byte; the range end is one
        // below it. The subtraction stays in u16 so a zeroed field wraps
        // to 0xffff instead of underflowing the wider type.
        let dynamic_memory_end = as_word(
            data[HEADER_DYNAMIC_MEMORY_END_ADDR],
            data[HEADER_DYNAMIC_MEMORY_END_ADDR + 1],
        )
        .wrapping_sub(1) as AbsAddr;
        // Static memory never extends past the first 64K of the file.
        let static_memory_end = (data.len() as AbsAddr).min(0xffff);
        let high_memory_start = as_word(
            data[HEADER_HIGH_MEMORY_START_ADDR],
            data[HEADER_HIGH_MEMORY_START_ADDR + 1],
        ) as AbsAddr;
        let routine_offset = if data.len() > HEADER_ROUTINE_OFFSET_ADDR + 1 {
            as_word(data[HEADER_ROUTINE_OFFSET_ADDR], data[HEADER_ROUTINE_OFFSET_ADDR + 1])
        } else {
            0
        };
        let string_offset = if data.len() > HEADER_STRING_OFFSET_ADDR + 1 {
            as_word(data[HEADER_STRING_OFFSET_ADDR], data[HEADER_STRING_OFFSET_ADDR + 1])
        } else {
            0
        };
        Ok(StoryData {
            data,
            dynamic_memory_end,
            static_memory_end,
            high_memory_start,
            routine_offset,
            string_offset,
        })
    }

    pub fn dynamic_memory_range(&self) -> MemoryRange {
        MemoryRange {
            start: 0,
            end: self.dynamic_memory_end,
        }
    }

    pub fn static_memory_range(&self) -> MemoryRange {
        MemoryRange {
            start: self.dynamic_memory_end + 1,
            end: self.static_memory_end,
        }
    }

    pub fn high_memory_range(&self) -> MemoryRange {
        MemoryRange {
            start: self.high_memory_start,
            end: self.data.len() as AbsAddr,
        }
    }

    /// Packed-address offset for routines (header word 0x28, v6/v7 only).
    pub fn routine_offset(&self) -> u16 {
        self.routine_offset
    }

    /// Packed-address offset for strings (header word 0x2a, v6/v7 only).
    pub fn string_offset(&self) -> u16 {
        self.string_offset
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// An 8-bit unsigned integer at the given absolute address.
    pub fn get_byte(&self, pos: AbsAddr) -> Result<u8> {
        self.data
            .get(pos as usize)
            .copied()
            .ok_or_else(|| Error::BadStoryImage(format!("story address out of range: {pos:#x}")))
    }

    /// A 16-bit unsigned integer at the given absolute address.
    pub fn get_word(&self, pos: AbsAddr) -> Result<u16> {
        let p = pos as usize;
        if p + 1 >= self.data.len() {
            return Err(Error::BadStoryImage(format!(
                "story address out of range: {pos:#x}"
            )));
        }
        Ok(as_word(self.data[p], self.data[p + 1]))
    }

    /// A 32-bit unsigned integer at the given absolute address.
    pub fn get_long(&self, pos: AbsAddr) -> Result<u32> {
        let p = pos as usize;
        if p + 3 >= self.data.len() {
            return Err(Error::BadStoryImage(format!(
                "story address out of range: {pos:#x}"
            )));
        }
        Ok(as_long(
            self.data[p],
            self.data[p + 1],
            self.data[p + 2],
            self.data[p + 3],
        ))
    }

    pub fn version_number(&self) -> u8 {
        self.data.byte_at(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parse() {
        let mut data = vec![0u8; 0x2000];
        data[0x00] = 3;
        data[0x04] = 0x10; // high memory at 0x1000
        data[0x0e] = 0x04; // dynamic memory ends before 0x0404
        data[0x0f] = 0x04;

        let story = StoryData::new(data).unwrap();
        assert_eq!(story.version_number(), 3);
        assert_eq!(
            story.dynamic_memory_range(),
            MemoryRange { start: 0, end: 0x0403 }
        );
        assert_eq!(
            story.static_memory_range(),
            MemoryRange {
                start: 0x0404,
                end: 0x2000
            }
        );
        assert_eq!(
            story.high_memory_range(),
            MemoryRange {
                start: 0x1000,
                end: 0x2000
            }
        );
    }

    #[test]
    fn test_static_end_clamped() {
        let mut data = vec![0u8; 0x2_0000];
        data[0x00] = 5;
        data[0x0e] = 0x10;
        let story = StoryData::new(data).unwrap();
        assert_eq!(story.static_memory_range().end, 0xffff);
    }

    #[test]
    fn test_zeroed_dynamic_end_wraps() {
        // A bare 16-byte image with a zero static-base field parses to
        // the degenerate bounded range rather than underflowing.
        let story = StoryData::new(vec![0u8; 16]).unwrap();
        assert_eq!(story.dynamic_memory_range().end, 0xffff);
        assert_eq!(story.static_memory_range().start, 0x1_0000);
    }

    #[test]
    fn test_short_image_rejected() {
        assert!(matches!(
            StoryData::new(vec![3u8; 15]),
            Err(Error::BadStoryImage(_))
        ));
    }

    #[test]
    fn test_field_reads() {
        let mut data = vec![0u8; 0x40];
        data[0x0e] = 0x00;
        data[0x0f] = 0x40;
        data[0x28] = 0x00;
        data[0x29] = 0x08;
        data[0x2a] = 0x00;
        data[0x2b] = 0x10;
        let story = StoryData::new(data).unwrap();
        assert_eq!(story.routine_offset(), 0x0008);
        assert_eq!(story.string_offset(), 0x0010);
        assert_eq!(story.get_word(0x0e).unwrap(), 0x0040);
        assert!(story.get_word(0x3f).is_err());
        assert!(story.get_byte(0x40).is_err());
    }
}
