//! The opcode catalog.
//!
//! A single flat list declares every opcode: its encoding form, its id
//! within that form, the versions it exists in, and which tails (store
//! byte, branch bytes, inline text) the decoder must read after the
//! operands. The per-version lookup tables are assembled from the catalog
//! once and shared process-wide.
//!
//! Short-form ids follow the 0OP convention: 1OP opcodes occupy 0x00-0x0f
//! and 0OP opcodes occupy 0x30-0x3f, matching the operand-type bits that
//! distinguish them in the opcode byte.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use std::fmt;

/// The encoding forms an opcode byte can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeForm {
    Long,
    Short,
    Variable,
    DoubleVariable,
    Extended,
}

impl fmt::Display for OpcodeForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OpcodeForm::Long => "long",
            OpcodeForm::Short => "short",
            OpcodeForm::Variable => "variable",
            OpcodeForm::DoubleVariable => "double-variable",
            OpcodeForm::Extended => "extended",
        };
        write!(f, "{name}")
    }
}

/// Static descriptor for one opcode: its name and which tails follow the
/// operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCode {
    pub name: &'static str,
    pub stores: bool,
    pub branches: bool,
    /// 'true' only for 'print' and 'print_ret'.
    pub text: bool,
}

struct CatalogEntry {
    form: OpcodeForm,
    op: u8,
    /// Inclusive version range this entry exists in.
    vers: (u8, u8),
    opcode: OpCode,
}

const fn entry(
    form: OpcodeForm,
    op: u8,
    min_version: u8,
    max_version: u8,
    name: &'static str,
    stores: bool,
    branches: bool,
    text: bool,
) -> CatalogEntry {
    CatalogEntry {
        form,
        op,
        vers: (min_version, max_version),
        opcode: OpCode {
            name,
            stores,
            branches,
            text,
        },
    }
}

use OpcodeForm::{Extended, Long, Short, Variable};

#[rustfmt::skip]
static CATALOG: &[CatalogEntry] = &[
    // ======================================================================
    // Long form (2OP)
    entry(Long, 0x01, 1, 8, "je",            false, true,  false),
    entry(Long, 0x02, 1, 8, "jl",            false, true,  false),
    entry(Long, 0x03, 1, 8, "jg",            false, true,  false),
    entry(Long, 0x04, 1, 8, "dec_chk",       false, true,  false),
    entry(Long, 0x05, 1, 8, "inc_chk",       false, true,  false),
    entry(Long, 0x06, 1, 8, "jin",           false, true,  false),
    entry(Long, 0x07, 1, 8, "test",          false, true,  false),
    entry(Long, 0x08, 1, 8, "or",            true,  false, false),
    entry(Long, 0x09, 1, 8, "and",           true,  false, false),
    entry(Long, 0x0a, 1, 8, "test_attr",     false, true,  false),
    entry(Long, 0x0b, 1, 8, "set_attr",      false, false, false),
    entry(Long, 0x0c, 1, 8, "clear_attr",    false, false, false),
    entry(Long, 0x0d, 1, 8, "store",         false, false, false),
    entry(Long, 0x0e, 1, 8, "insert_obj",    false, false, false),
    entry(Long, 0x0f, 1, 8, "loadw",         true,  false, false),
    entry(Long, 0x10, 1, 8, "loadb",         true,  false, false),
    entry(Long, 0x11, 1, 8, "get_prop",      true,  false, false),
    entry(Long, 0x12, 1, 8, "get_prop_addr", true,  false, false),
    entry(Long, 0x13, 1, 8, "get_next_prop", true,  false, false),
    entry(Long, 0x14, 1, 8, "add",           true,  false, false),
    entry(Long, 0x15, 1, 8, "sub",           true,  false, false),
    entry(Long, 0x16, 1, 8, "mul",           true,  false, false),
    entry(Long, 0x17, 1, 8, "div",           true,  false, false),
    entry(Long, 0x18, 1, 8, "mod",           true,  false, false),
    entry(Long, 0x19, 4, 8, "call_2s",       true,  false, false),
    entry(Long, 0x1a, 5, 8, "call_2n",       false, false, false),
    entry(Long, 0x1b, 5, 8, "set_colour",    false, false, false),
    entry(Long, 0x1c, 5, 8, "throw",         false, false, false),

    // ======================================================================
    // Short form, 1OP
    entry(Short, 0x00, 1, 8, "jz",           false, true,  false),
    entry(Short, 0x01, 1, 8, "get_sibling",  true,  true,  false),
    entry(Short, 0x02, 1, 8, "get_child",    true,  true,  false),
    entry(Short, 0x03, 1, 8, "get_parent",   true,  false, false),
    entry(Short, 0x04, 1, 8, "get_prop_len", true,  false, false),
    entry(Short, 0x05, 1, 8, "inc",          false, false, false),
    entry(Short, 0x06, 1, 8, "dec",          false, false, false),
    entry(Short, 0x07, 1, 8, "print_addr",   false, false, false),
    entry(Short, 0x08, 4, 8, "call_1s",      true,  false, false),
    entry(Short, 0x09, 1, 8, "remove_obj",   false, false, false),
    entry(Short, 0x0a, 1, 8, "print_obj",    false, false, false),
    entry(Short, 0x0b, 1, 8, "ret",          false, false, false),
    entry(Short, 0x0c, 1, 8, "jump",         false, false, false),
    entry(Short, 0x0d, 1, 8, "print_paddr",  false, false, false),
    entry(Short, 0x0e, 1, 8, "load",         true,  false, false),
    entry(Short, 0x0f, 1, 4, "not",          true,  false, false),
    entry(Short, 0x0f, 5, 8, "call_1n",      false, false, false),

    // ======================================================================
    // Short form, 0OP
    entry(Short, 0x30, 1, 8, "rtrue",        false, false, false),
    entry(Short, 0x31, 1, 8, "rfalse",       false, false, false),
    entry(Short, 0x32, 1, 8, "print",        false, false, true),
    entry(Short, 0x33, 1, 8, "print_ret",    false, false, true),
    entry(Short, 0x34, 1, 8, "nop",          false, false, false),
    entry(Short, 0x35, 1, 3, "save",         false, true,  false),
    entry(Short, 0x35, 4, 4, "save",         true,  false, false),
    // 0OP save/restore are illegal in v5+.
    entry(Short, 0x36, 1, 3, "restore",      false, true,  false),
    entry(Short, 0x36, 4, 4, "restore",      true,  false, false),
    entry(Short, 0x37, 1, 8, "restart",      false, false, false),
    entry(Short, 0x38, 1, 8, "ret_popped",   false, false, false),
    entry(Short, 0x39, 1, 4, "pop",          false, false, false),
    entry(Short, 0x39, 5, 8, "catch",        true,  false, false),
    entry(Short, 0x3a, 1, 8, "quit",         false, false, false),
    entry(Short, 0x3b, 1, 8, "new_line",     false, false, false),
    entry(Short, 0x3c, 3, 3, "show_status",  false, false, false),
    entry(Short, 0x3d, 3, 8, "verify",       false, true,  false),
    // 0x3e is the first byte of the extended opcode.
    entry(Short, 0x3f, 5, 8, "piracy",       false, true,  false),

    // ======================================================================
    // Variable form
    entry(Variable, 0x00, 1, 3, "call",            true,  false, false),
    entry(Variable, 0x00, 4, 8, "call_vs",         true,  false, false),
    entry(Variable, 0x01, 1, 8, "storew",          false, false, false),
    entry(Variable, 0x02, 1, 8, "storeb",          false, false, false),
    entry(Variable, 0x03, 1, 8, "put_prop",        false, false, false),
    entry(Variable, 0x04, 1, 4, "sread",           false, false, false),
    entry(Variable, 0x04, 5, 8, "aread",           true,  false, false),
    entry(Variable, 0x05, 1, 8, "print_char",      false, false, false),
    entry(Variable, 0x06, 1, 8, "print_num",       false, false, false),
    entry(Variable, 0x07, 1, 8, "random",          true,  false, false),
    entry(Variable, 0x08, 1, 8, "push",            false, false, false),
    // pull takes its target as an operand through v5, a store byte in v6+.
    entry(Variable, 0x09, 1, 5, "pull",            false, false, false),
    entry(Variable, 0x09, 6, 8, "pull",            true,  false, false),
    entry(Variable, 0x0a, 3, 8, "split_window",    false, false, false),
    entry(Variable, 0x0b, 3, 8, "set_window",      false, false, false),
    // Secretly a double-variable op-code.
    entry(Variable, 0x0c, 4, 8, "call_vs2",        true,  false, false),
    entry(Variable, 0x0d, 4, 8, "erase_window",    false, false, false),
    entry(Variable, 0x0e, 4, 8, "erase_line",      false, false, false),
    entry(Variable, 0x0f, 4, 8, "set_cursor",      false, false, false),
    entry(Variable, 0x10, 4, 8, "get_cursor",      false, false, false),
    entry(Variable, 0x11, 4, 8, "set_text_style",  false, false, false),
    entry(Variable, 0x12, 4, 8, "buffer_mode",     false, false, false),
    entry(Variable, 0x13, 3, 8, "output_stream",   false, false, false),
    entry(Variable, 0x14, 3, 8, "input_stream",    false, false, false),
    entry(Variable, 0x15, 3, 8, "sound_effect",    false, false, false),
    entry(Variable, 0x16, 4, 8, "read_char",       true,  false, false),
    entry(Variable, 0x17, 4, 8, "scan_table",      true,  true,  false),
    entry(Variable, 0x18, 5, 8, "not",             true,  false, false),
    entry(Variable, 0x19, 5, 8, "call_vn",         false, false, false),
    // Secretly a double-variable op-code.
    entry(Variable, 0x1a, 5, 8, "call_vn2",        false, false, false),
    entry(Variable, 0x1b, 5, 8, "tokenise",        false, false, false),
    entry(Variable, 0x1c, 5, 8, "encode_text",     false, false, false),
    entry(Variable, 0x1d, 5, 8, "copy_table",      false, false, false),
    entry(Variable, 0x1e, 5, 8, "print_table",     false, false, false),
    entry(Variable, 0x1f, 5, 8, "check_arg_count", false, true,  false),

    // ======================================================================
    // Extended form (v5+)
    entry(Extended, 0x00, 5, 8, "save",            true,  false, false),
    entry(Extended, 0x01, 5, 8, "restore",         true,  false, false),
    entry(Extended, 0x02, 5, 8, "log_shift",       true,  false, false),
    entry(Extended, 0x03, 5, 8, "art_shift",       true,  false, false),
    entry(Extended, 0x04, 5, 8, "set_font",        true,  false, false),
    entry(Extended, 0x05, 6, 8, "draw_picture",    false, false, false),
    entry(Extended, 0x06, 6, 8, "picture_data",    false, true,  false),
    entry(Extended, 0x07, 6, 8, "erase_picture",   false, false, false),
    entry(Extended, 0x08, 6, 8, "set_margins",     false, false, false),
    entry(Extended, 0x09, 5, 8, "save_undo",       true,  false, false),
    entry(Extended, 0x0a, 5, 8, "restore_undo",    true,  false, false),
    entry(Extended, 0x0b, 5, 8, "print_unicode",   false, false, false),
    entry(Extended, 0x0c, 5, 8, "check_unicode",   true,  false, false),
    entry(Extended, 0x0d, 5, 8, "set_true_colour", false, false, false),
    entry(Extended, 0x10, 6, 8, "move_window",     false, false, false),
    entry(Extended, 0x11, 6, 8, "window_size",     false, false, false),
    entry(Extended, 0x12, 6, 8, "window_style",    false, false, false),
    entry(Extended, 0x13, 6, 8, "get_wind_prop",   true,  false, false),
    entry(Extended, 0x14, 6, 8, "scroll_window",   false, false, false),
    entry(Extended, 0x15, 6, 8, "pop_stack",       false, false, false),
    entry(Extended, 0x16, 6, 8, "read_mouse",      false, false, false),
    entry(Extended, 0x17, 6, 8, "mouse_window",    false, false, false),
    entry(Extended, 0x18, 6, 8, "push_stack",      false, true,  false),
    entry(Extended, 0x1a, 6, 8, "print_form",      false, false, false),
    entry(Extended, 0x1b, 6, 8, "make_menu",       false, true,  false),
    entry(Extended, 0x1c, 6, 8, "picture_table",   false, false, false),
    entry(Extended, 0x1d, 6, 8, "buffer_screen",   true,  false, false),
];

/// The opcode bytes that take a second operand-type byte.
pub const DOUBLE_VAR_CALL_VS2: u8 = 0x0c;
pub const DOUBLE_VAR_CALL_VN2: u8 = 0x1a;

/// Per-version lookup tables, one slot per opcode id.
pub struct OpcodeTables {
    pub long: [Option<&'static OpCode>; 32],
    pub short: [Option<&'static OpCode>; 64],
    pub variable: [Option<&'static OpCode>; 32],
    pub double_var: [Option<&'static OpCode>; 32],
    pub extended: [Option<&'static OpCode>; 32],
}

impl OpcodeTables {
    pub fn lookup(&self, form: OpcodeForm, id: u8) -> Result<&'static OpCode> {
        let slot = match form {
            OpcodeForm::Long => self.long.get(id as usize),
            OpcodeForm::Short => self.short.get(id as usize),
            OpcodeForm::Variable => self.variable.get(id as usize),
            OpcodeForm::DoubleVariable => self.double_var.get(id as usize),
            OpcodeForm::Extended => self.extended.get(id as usize),
        };
        match slot {
            Some(Some(op)) => Ok(*op),
            _ => Err(Error::UnknownOpcode { form, id }),
        }
    }
}

fn assemble_opcodes(version: u8) -> OpcodeTables {
    let mut tables = OpcodeTables {
        long: [None; 32],
        short: [None; 64],
        variable: [None; 32],
        double_var: [None; 32],
        extended: [None; 32],
    };
    for e in CATALOG {
        if version < e.vers.0 || version > e.vers.1 {
            continue;
        }
        let slot = match e.form {
            OpcodeForm::Long => &mut tables.long[e.op as usize],
            OpcodeForm::Short => &mut tables.short[e.op as usize],
            OpcodeForm::Variable => &mut tables.variable[e.op as usize],
            OpcodeForm::DoubleVariable => &mut tables.double_var[e.op as usize],
            OpcodeForm::Extended => &mut tables.extended[e.op as usize],
        };
        // A duplicate (form, id) for one version is a programmer error in
        // the catalog itself.
        assert!(
            slot.is_none(),
            "duplicate {}-form opcode {:#04x} for version {}",
            e.form,
            e.op,
            version
        );
        *slot = Some(&e.opcode);
        if e.form == OpcodeForm::Variable
            && (e.op == DOUBLE_VAR_CALL_VS2 || e.op == DOUBLE_VAR_CALL_VN2)
        {
            tables.double_var[e.op as usize] = Some(&e.opcode);
        }
    }
    tables
}

lazy_static! {
    static ref TABLES: Vec<OpcodeTables> = (1u8..=8).map(assemble_opcodes).collect();
}

/// The lookup tables for a story version 1-8. Assembled once, shared
/// process-wide.
pub fn opcode_tables(version: u8) -> &'static OpcodeTables {
    &TABLES[(version - 1) as usize]
}
