//! Arithmetic on story words.
//!
//! All game arithmetic is 16-bit signed two's complement. Operations widen
//! to 32 bits so the executor can decide how to handle overflow; storing a
//! result back into memory goes through [`overflow`].

use crate::error::{Error, Result};
use crate::util::{as_signed_word, normalize_signed_word};
use std::cmp::Ordering;

/// Signed comparison of two story words: -1 if `word0` is less, 0 if they
/// are equal, 1 if `word0` is greater.
pub fn compare(word0: u16, word1: u16) -> i32 {
    match as_signed_word(word0).cmp(&as_signed_word(word1)) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Renarrow a widened result into a memory word, wrapping modulo 2^16.
pub fn overflow(value: i32) -> u16 {
    normalize_signed_word(value as i16)
}

pub fn add(word0: u16, word1: u16) -> i32 {
    as_signed_word(word0) as i32 + as_signed_word(word1) as i32
}

pub fn subtract(word0: u16, word1: u16) -> i32 {
    as_signed_word(word0) as i32 - as_signed_word(word1) as i32
}

pub fn multiply(word0: u16, word1: u16) -> i32 {
    as_signed_word(word0) as i32 * as_signed_word(word1) as i32
}

/// Signed division, truncating toward zero.
pub fn divide(word0: u16, word1: u16) -> Result<i32> {
    let div = as_signed_word(word1) as i32;
    if div == 0 {
        return Err(Error::DivideByZero);
    }
    Ok(as_signed_word(word0) as i32 / div)
}

/// Signed remainder. The sign of the result follows the dividend.
pub fn remainder(word0: u16, word1: u16) -> Result<i32> {
    let div = as_signed_word(word1) as i32;
    if div == 0 {
        return Err(Error::DivideByZero);
    }
    Ok(as_signed_word(word0) as i32 % div)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_divide() {
        assert_eq!(divide(0xfff6, 2).unwrap(), -5); // -11 / 2
        assert_eq!(divide(0xfff6, 0xfffe).unwrap(), 5); // -11 / -2
        assert_eq!(divide(11, 0xfffe).unwrap(), -5); // 11 / -2
    }

    #[test]
    fn test_signed_remainder() {
        assert_eq!(remainder(0xfff3, 5).unwrap(), -3); // -13 rem 5
        assert_eq!(remainder(0xfff3, 0xfffb).unwrap(), -3); // -13 rem -5
        assert_eq!(remainder(13, 0xfffb).unwrap(), 3); // 13 rem -5
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(divide(10, 0), Err(Error::DivideByZero));
        assert_eq!(remainder(10, 0), Err(Error::DivideByZero));
    }

    #[test]
    fn test_widened_results() {
        // -32768 - 1 does not wrap until the caller asks for it.
        assert_eq!(subtract(0x8000, 1), -32769);
        assert_eq!(overflow(subtract(0x8000, 1)), 0x7fff);
        assert_eq!(add(0x7fff, 1), 32768);
        assert_eq!(overflow(add(0x7fff, 1)), 0x8000);
        assert_eq!(multiply(0x4000, 4), 65536);
        assert_eq!(overflow(multiply(0x4000, 4)), 0);
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(1, 2), -1);
        assert_eq!(compare(2, 2), 0);
        assert_eq!(compare(3, 2), 1);
        // 0xffff is -1, which is less than 1.
        assert_eq!(compare(0xffff, 1), -1);
        assert_eq!(compare(1, 0x8000), 1);
    }
}
