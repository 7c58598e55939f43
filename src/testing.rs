//! Minimal FITS writer for the tests

use std::path::{Path, PathBuf};

pub struct Card(String);
impl Card {
    fn new(key: &str, value: String) -> Self {
        Self(format!("{:<8}= {:>20}", key, value))
    }
    /// Card with the value written verbatim
    pub fn raw(key: &str, value: &str) -> Self {
        Self::new(key, value.to_string())
    }
    pub fn string(key: &str, value: &str) -> Self {
        Self(format!("{:<8}= '{:<8}'", key, value))
    }
    pub fn real(key: &str, value: f64) -> Self {
        Self::new(key, format!("{:?}", value))
    }
    pub fn integer(key: &str, value: i32) -> Self {
        Self::new(key, value.to_string())
    }
    fn logical(key: &str, value: bool) -> Self {
        Self::new(key, if value { "T" } else { "F" }.to_string())
    }
}

/// Writes a primary HDU with a 4 pixels float image and the given header `cards`
pub fn write_fits<P: AsRef<Path>>(path: P, cards: &[Card]) -> PathBuf {
    let mandatory = [
        Card::logical("SIMPLE", true),
        Card::integer("BITPIX", -32),
        Card::integer("NAXIS", 1),
        Card::integer("NAXIS1", 4),
    ];
    let mut header: Vec<u8> = mandatory
        .iter()
        .chain(cards)
        .flat_map(|Card(card)| format!("{:<80}", card).into_bytes())
        .collect();
    header.extend(format!("{:<80}", "END").into_bytes());
    header.resize(2880, b' ');
    header.resize(2 * 2880, 0u8);
    std::fs::write(&path, header).unwrap();
    path.as_ref().to_path_buf()
}
