//! Newline-aligned splitting for chunked ingestion.

use std::{num::NonZeroUsize, ops::Range};

use centrum_core::EdgeChunk;
use rayon::prelude::*;

use crate::{errors::EdgeListError, layout::ResolvedLayout, parse::parse_block};

/// A byte range of the input holding whole lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Block {
    pub(crate) index: usize,
    /// One-based number of the block's first line.
    pub(crate) first_line: usize,
    pub(crate) range: Range<usize>,
}

/// Splits `text` into blocks of roughly `chunk_size` bytes. Each block
/// extends to the end of the line it would otherwise cut.
pub(crate) fn split_blocks(text: &str, chunk_size: NonZeroUsize) -> Vec<Block> {
    let bytes = text.as_bytes();
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut first_line = 1;
    while start < bytes.len() {
        let tentative = start.saturating_add(chunk_size.get()).min(bytes.len());
        let end = bytes[tentative - 1..]
            .iter()
            .position(|&byte| byte == b'\n')
            .map_or(bytes.len(), |offset| tentative + offset);
        blocks.push(Block {
            index: blocks.len(),
            first_line,
            range: start..end,
        });
        first_line += bytes[start..end].iter().filter(|&&byte| byte == b'\n').count();
        start = end;
    }
    blocks
}

/// Parses every block in parallel. The error of the earliest failing block
/// is returned.
pub(crate) fn parse_blocks(
    text: &str,
    blocks: &[Block],
    layout: &ResolvedLayout,
) -> Result<Vec<EdgeChunk>, EdgeListError> {
    let parsed: Vec<Result<EdgeChunk, EdgeListError>> = blocks
        .par_iter()
        .map(|block| {
            parse_block(&text[block.range.clone()], block.first_line, layout)
                .map(|edges| EdgeChunk::new(block.index, edges))
        })
        .collect();
    parsed.into_iter().collect()
}
