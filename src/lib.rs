#![crate_name = "zmcore"]

//! Core engine for a Z-Machine interpreter.
//!
//! This crate covers what it takes to execute a story file byte-exactly:
//! the memory model (read-only image plus writable dynamic overlay), the
//! version dispatch parameterizing versions 1-8, the instruction decoder,
//! the ZSCII text codec, the version-specific header view, call-frame
//! state, signed 16-bit arithmetic, and the random source.
//!
//! The screen layer, object tree, dictionary parser, save-file format and
//! the execution loop itself are collaborators living outside this crate;
//! they drive the engine through [`memory::Memory`], [`version::Version`]
//! and [`instruction::OpDecoder`].
//!
//! A typical host wires things up as:
//!
//! ```no_run
//! use zmcore::memory::Memory;
//! use zmcore::story::StoryData;
//! use zmcore::version::Version;
//! use zmcore::vm::VMState;
//!
//! # fn run(bytes: Vec<u8>) -> zmcore::error::Result<()> {
//! let story = StoryData::new(bytes)?;
//! let mut memory = Memory::new(story.data().to_vec());
//! memory.set_dynamic_boundary(story.static_memory_range().start)?;
//! let version = Version::new(&memory)?;
//! let initial = version.initial_routine_state(&memory);
//! let mut state = VMState::new(memory, initial);
//! loop {
//!     let pc = state.current_routine().unwrap().program_counter;
//!     let inst = version.opcodes().decode_at(&state.memory, pc)?;
//!     // ... interpret the instruction against the state ...
//!     # let _ = inst; break;
//! }
//! # Ok(())
//! # }
//! ```

pub mod arithmetic;
pub mod error;
pub mod header;
pub mod input;
pub mod instruction;
pub mod memory;
pub mod opcode_tables;
pub mod story;
pub mod text;
pub mod unicode;
pub mod util;
pub mod version;
pub mod vm;
pub mod zrand;

#[cfg(test)]
mod instruction_tests;

/*
Memory map of the synthetic story image the tests in this tree build:

Dynamic 00000   header (version byte, layout fields)
        00040   abbreviation table, when a test plants one
        00100   global variables
Static  00200   (or 00404) start of write-protected memory
High    01000   Z-code, initial program counter
        02000   end of image
*/
