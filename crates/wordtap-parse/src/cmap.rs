//! ToUnicode CMap parsing.
//!
//! CMaps share the content stream syntax, so the stream is run through the
//! [`tokenize`](crate::tokenizer::tokenize) and the operands collected by
//! `endbfchar` and `endbfrange` are read as mappings. Destination strings are
//! UTF-16BE.

use std::collections::HashMap;

use crate::error::BackendError;
use crate::tokenizer::{Operand, tokenize};

/// Ranges wider than this are skipped rather than expanded.
const MAX_RANGE_LEN: u32 = 0x1_0000;

/// Character code → text mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToUnicodeCMap {
    mappings: HashMap<u32, String>,
}

fn code_from_bytes(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [single] => u16::from(*single),
            _ => 0,
        })
        .collect()
}

fn decode_utf16(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

impl ToUnicodeCMap {
    /// Parse CMap stream bytes.
    ///
    /// # Errors
    ///
    /// Fails only when the stream is structurally broken (unterminated
    /// array or dictionary).
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let mut mappings = HashMap::new();
        for op in tokenize(data)? {
            match op.name.as_str() {
                "endbfchar" => {
                    for pair in op.operands.chunks(2) {
                        if let [Operand::String(src), Operand::String(dst)] = pair {
                            mappings.insert(code_from_bytes(src), decode_utf16(&utf16_units(dst)));
                        }
                    }
                }
                "endbfrange" => {
                    for triple in op.operands.chunks(3) {
                        if let [Operand::String(lo), Operand::String(hi), dst] = triple {
                            insert_range(&mut mappings, code_from_bytes(lo), code_from_bytes(hi), dst);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn insert_range(mappings: &mut HashMap<u32, String>, lo: u32, hi: u32, dst: &Operand) {
    if hi < lo || hi - lo >= MAX_RANGE_LEN {
        return;
    }
    match dst {
        // <lo> <hi> <start>: the last UTF-16 unit increments along the range
        Operand::String(start) => {
            let base = utf16_units(start);
            let Some((&last, prefix)) = base.split_last() else {
                return;
            };
            for (offset, code) in (lo..=hi).enumerate() {
                let mut units = prefix.to_vec();
                units.push(last.wrapping_add(offset as u16));
                mappings.insert(code, decode_utf16(&units));
            }
        }
        // <lo> <hi> [<d0> <d1> ...]: one destination per code
        Operand::Array(items) => {
            for (code, item) in (lo..=hi).zip(items) {
                if let Operand::String(d) = item {
                    mappings.insert(code, decode_utf16(&utf16_units(d)));
                }
            }
        }
        _ => {}
    }
}
