//! Decoder scenarios running through the full factory path: a synthetic
//! story image is loaded, the version machinery assembled, and
//! instructions decoded at the initial program counter.

use crate::instruction::Operand;
use crate::memory::{Memory, MemoryRead};
use crate::story::StoryData;
use crate::util::MemoryRange;
use crate::version::Version;
use test_log::test;

const PC: usize = 0x1000;

/// A coherent story image with code planted at the initial PC.
fn story_with_code(version: u8, code: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 0x2000];
    data[0x00] = version;
    data[0x04] = 0x10; // high memory at 0x1000
    data[0x06] = 0x10;
    data[0x07] = 0x00; // initial pc 0x1000
    data[0x0e] = 0x04;
    data[0x0f] = 0x04; // dynamic memory ends at 0x0403
    data[PC..PC + code.len()].copy_from_slice(code);
    data
}

fn load(data: Vec<u8>) -> (Memory, Version) {
    let story = StoryData::new(data).unwrap();
    let mut memory = Memory::new(story.data().to_vec());
    memory
        .set_dynamic_boundary(story.static_memory_range().start)
        .unwrap();
    let version = Version::new(&memory).unwrap();
    (memory, version)
}

#[test]
fn scenario_header_parse() {
    let story = StoryData::new(story_with_code(3, &[])).unwrap();
    assert_eq!(story.version_number(), 3);
    assert_eq!(
        story.dynamic_memory_range(),
        MemoryRange { start: 0, end: 0x0403 }
    );
    assert_eq!(story.high_memory_range().start, 0x1000);
}

#[test]
fn scenario_long_form_no_tails() {
    // store #01 #02 consumes exactly three bytes.
    let (memory, version) = load(story_with_code(3, &[0x4d, 0x01, 0x02]));
    let pc = version.initial_routine_state(&memory).program_counter;
    let inst = version.opcodes().decode_at(&memory, pc).unwrap();
    assert_eq!(inst.opcode.name, "store");
    assert_eq!(
        inst.operands,
        vec![Operand::ConstantByte(1), Operand::ConstantByte(2)]
    );
    assert!(inst.store.is_none() && inst.branch.is_none() && inst.text.is_none());
    assert_eq!(inst.end_addr, pc + 2);
    assert_eq!(inst.to_string(), "store #01, #02");
}

#[test]
fn scenario_print_inline_text() {
    // 0xb2 is print; the tail runs until a word with the high bit set.
    // "ok": o=20, k=16, pad 5.
    let word = 0x8000u16 | (20 << 10) | (16 << 5) | 5;
    let code = [0xb2, (word >> 8) as u8, (word & 0xff) as u8, 0xbb];
    let (memory, version) = load(story_with_code(3, &code));
    let pc = version.initial_routine_state(&memory).program_counter;
    let inst = version.opcodes().decode_at(&memory, pc).unwrap();
    assert_eq!(inst.opcode.name, "print");
    assert_eq!(inst.text.as_ref().unwrap().iter().collect::<String>(), "ok");
    assert_eq!(inst.end_addr, pc + 2);

    // The next instruction decodes cleanly right after the text.
    let next = version.opcodes().decode_at(&memory, inst.end_addr + 1).unwrap();
    assert_eq!(next.opcode.name, "new_line");
}

#[test]
fn scenario_variable_form_call() {
    // call #1234, #56, local4 -> sp
    let code = [0xe0, 0x1b, 0x12, 0x34, 0x56, 0x05, 0x00];
    let (memory, version) = load(story_with_code(3, &code));
    let pc = version.initial_routine_state(&memory).program_counter;
    let inst = version.opcodes().decode_at(&memory, pc).unwrap();
    assert_eq!(inst.opcode.name, "call");
    assert_eq!(
        inst.operands,
        vec![
            Operand::ConstantWord(0x1234),
            Operand::ConstantByte(0x56),
            Operand::LocalVariable(4),
        ]
    );
    assert_eq!(inst.store, Some(Operand::TopOfStack));
    assert_eq!(inst.end_addr, pc + 6);
}

#[test]
fn scenario_branch_tails() {
    // je #01 #02 with a one-byte branch-on-true, offset 0x0a.
    let code = [0x41, 0x01, 0x02, 0xca];
    let (memory, version) = load(story_with_code(3, &code));
    let pc = version.initial_routine_state(&memory).program_counter;
    let inst = version.opcodes().decode_at(&memory, pc).unwrap();
    let b = inst.branch.unwrap();
    assert!(b.condition);
    // Address after the branch byte, plus offset, minus 2.
    assert_eq!(b.target, pc + 4 + 0x0a - 2);
}

#[test]
fn scenario_v2_abbreviation_splice() {
    // Abbreviation 0 holds "zork"; the code prints an escape to it.
    let mut data = story_with_code(2, &[]);
    data[0x18] = 0x00;
    data[0x19] = 0x40; // abbreviation table at 0x40
    data[0x40] = 0x00;
    data[0x41] = 0x28; // entry 0 at word address 0x28 -> byte 0x50
    // "zork": z=31, o=20, r=23, k=16
    let w0 = (31u16 << 10) | (20 << 5) | 23;
    let w1 = 0x8000u16 | (16 << 10) | (5 << 5) | 5;
    data[0x50] = (w0 >> 8) as u8;
    data[0x51] = (w0 & 0xff) as u8;
    data[0x52] = (w1 >> 8) as u8;
    data[0x53] = (w1 & 0xff) as u8;
    // print <abbrev 1:0>
    let esc = 0x8000u16 | (1 << 10) | (0 << 5) | 5;
    data[PC] = 0xb2;
    data[PC + 1] = (esc >> 8) as u8;
    data[PC + 2] = (esc & 0xff) as u8;

    let (memory, version) = load(data);
    let pc = version.initial_routine_state(&memory).program_counter;
    let inst = version.opcodes().decode_at(&memory, pc).unwrap();
    assert_eq!(inst.text.as_ref().unwrap().iter().collect::<String>(), "zork");
}

#[test]
fn scenario_ten_bit_escape() {
    // A2 escape: z-chars 5, 6 then hi=3, lo=31 produce ZSCII 0x7f.
    let w0 = (5u16 << 10) | (6 << 5) | 3;
    let w1 = 0x8000u16 | (31 << 10) | (5 << 5) | 5;
    let code = [
        0xb2,
        (w0 >> 8) as u8,
        (w0 & 0xff) as u8,
        (w1 >> 8) as u8,
        (w1 & 0xff) as u8,
    ];
    let (memory, version) = load(story_with_code(3, &code));
    let pc = version.initial_routine_state(&memory).program_counter;
    let (zscii, _) = version
        .codec()
        .decode_zscii(&memory, pc + 1, 4)
        .unwrap();
    assert_eq!(zscii, vec![0x7f]);
}

#[test]
fn scenario_game_write_gate() {
    // Header writes flow through value_settable before the memory write.
    let (mut memory, version) = load(story_with_code(3, &[]));
    let header = version.header();

    let val = memory.byte_at(0x10) | 0x01;
    assert!(header.value_settable(&memory, 0x10, val));
    memory.write_byte_at(val, 0x10).unwrap();
    assert!(header.transcript_enabled(&memory));

    // A write the gate rejects never reaches memory.
    assert!(!header.value_settable(&memory, 0x11, 0xff));
    // And a write past the dynamic boundary fails outright.
    assert!(memory.write_byte_at(0, 0x0404).is_err());
}
