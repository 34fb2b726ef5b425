//! Word-swap chain-&-sum MAC families.
//!
//! Two pairwise-independent hash families whose iterations interleave
//! 32-bit multiplies with 16-bit half swaps. Both derive their `A`
//! multipliers from the input hash (`key1 = lo|1`, `key2 = hi|1`) and
//! alternate between the context's two constant banks on odd and even
//! word pairs. An odd word count is closed with a padding step that runs
//! the mix without consuming input.

use crate::context::Context;
use crate::utils::endian::{self, word_swap};

/// Size of a chain-&-sum input block in bytes (one 32-bit word).
const CS_BLOCK_SIZE: usize = 4;

/// Reversible-family `L` constants. Zero on the wire; the iteration
/// keeps the `+ u*l` term so a nonzero constant is a local change.
const REV_L1: u32 = 0;
const REV_L2: u32 = 0;

/// Pairwise-independent function and summing step.
#[allow(clippy::too_many_arguments)]
#[inline]
fn iteration(
    a: u32,
    b: u32,
    c: u32,
    d: u32,
    e: u32,
    data: &[u8],
    t: &mut u32,
    t2: &mut u32,
    index: &mut usize,
    sum: &mut u32,
) {
    let mut x = *t2;
    x = x.wrapping_add(endian::read_u32(data, *index << 2));
    *index += 1;
    x = x.wrapping_mul(a).wrapping_add(word_swap(x).wrapping_mul(b));
    let y = word_swap(x)
        .wrapping_mul(c)
        .wrapping_add(x.wrapping_mul(d))
        .wrapping_add(word_swap(x).wrapping_mul(e));
    *t = x;
    *t2 = y;
    *sum = sum.wrapping_add(y);
}

/// Padding step invoked when the number of blocks is odd.
#[allow(clippy::too_many_arguments)]
#[inline]
fn final_iteration(
    a: u32,
    b: u32,
    c: u32,
    d: u32,
    e: u32,
    t: &mut u32,
    t2: &mut u32,
    sum: &mut u32,
) {
    let mut x = *t2;
    x = x.wrapping_mul(a).wrapping_add(word_swap(x).wrapping_mul(b));
    let y = word_swap(x)
        .wrapping_mul(c)
        .wrapping_add(x.wrapping_mul(d))
        .wrapping_add(word_swap(x).wrapping_mul(e));
    *t = x;
    *t2 = y;
    *sum = sum.wrapping_add(y);
}

/// Pairwise-independent function and summing step, reversible variant.
#[allow(clippy::too_many_arguments)]
#[inline]
fn reversible_iteration(
    a: u32,
    b: u32,
    c: u32,
    d: u32,
    e: u32,
    l: u32,
    data: &[u8],
    t: &mut u32,
    u: &mut u32,
    index: &mut usize,
    sum: &mut u32,
) {
    let mut x = t.wrapping_add(endian::read_u32(data, *index << 2));
    *index += 1;
    x = x.wrapping_mul(a);
    let w = word_swap(x);
    x = w.wrapping_mul(b);
    x = word_swap(x).wrapping_mul(c);
    x = word_swap(x).wrapping_mul(d);
    x = word_swap(x).wrapping_mul(e);
    x = x.wrapping_add(w.wrapping_mul(l));
    *t = x;
    *u = w;
    *sum = sum.wrapping_add(x);
}

/// Padding step for the reversible variant.
#[allow(clippy::too_many_arguments)]
#[inline]
fn reversible_final_iteration(
    a: u32,
    b: u32,
    c: u32,
    d: u32,
    e: u32,
    l: u32,
    t: &mut u32,
    u: &mut u32,
    sum: &mut u32,
) {
    let mut x = t.wrapping_mul(a);
    let w = word_swap(x);
    x = w.wrapping_mul(b);
    x = word_swap(x).wrapping_mul(c);
    x = word_swap(x).wrapping_mul(d);
    x = word_swap(x).wrapping_mul(e);
    x = x.wrapping_add(w.wrapping_mul(l));
    *t = x;
    *u = w;
    *sum = sum.wrapping_add(x);
}

/// Chain-&-sum MAC based on arithmetic and word swaps.
///
/// Iterates over the 32-bit words of `data`, alternating the context's
/// first and second word-swap constant banks, with `key1 = lo(in_hash)|1`
/// and `key2 = hi(in_hash)|1` as the `A` multipliers.
///
/// # Parameters
/// - `context`: Supplies the `WS_*` constant banks.
/// - `data`: Input data buffer.
/// - `length`: Significant length in bytes.
/// - `in_hash`: 64-bit input hash for key derivation.
///
/// # Returns
/// The 64-bit hash packed as `(sum << 32) | t2`.
pub fn cs64_word_swap(context: &Context, data: &[u8], length: usize, in_hash: u64) -> u64 {
    let mut num_blocks = length / CS_BLOCK_SIZE;
    let key1 = endian::lo(in_hash) | 1;
    let key2 = endian::hi(in_hash) | 1;

    let mut sum = 0u32;
    let mut t = 0u32;
    let mut t2 = 0u32;
    let mut index = 0usize;

    while num_blocks > 1 {
        iteration(
            key1,
            context.ws_b1,
            context.ws_c1,
            context.ws_d1,
            context.ws_e1,
            data,
            &mut t,
            &mut t2,
            &mut index,
            &mut sum,
        );
        iteration(
            key2,
            context.ws_b2,
            context.ws_c2,
            context.ws_d2,
            context.ws_e2,
            data,
            &mut t,
            &mut t2,
            &mut index,
            &mut sum,
        );
        num_blocks -= 2;
    }

    if num_blocks == 1 {
        iteration(
            key1,
            context.ws_b1,
            context.ws_c1,
            context.ws_d1,
            context.ws_e1,
            data,
            &mut t,
            &mut t2,
            &mut index,
            &mut sum,
        );
        final_iteration(
            key2,
            context.ws_b2,
            context.ws_c2,
            context.ws_d2,
            context.ws_e2,
            &mut t,
            &mut t2,
            &mut sum,
        );
    }

    endian::make_u64(sum, t2)
}

/// Chain-&-sum MAC based on arithmetic and word swaps, reversible
/// variant.
///
/// Same driving loop as [`cs64_word_swap`] over the context's `REV_*`
/// constant banks, with the single-scalar reversible mix.
///
/// # Parameters
/// - `context`: Supplies the `REV_*` constant banks.
/// - `data`: Input data buffer.
/// - `length`: Significant length in bytes.
/// - `in_hash`: 64-bit input hash for key derivation.
///
/// # Returns
/// The 64-bit hash packed as `(sum << 32) | t`.
pub fn cs64_reversible(context: &Context, data: &[u8], length: usize, in_hash: u64) -> u64 {
    let mut num_blocks = length / CS_BLOCK_SIZE;
    let key1 = endian::lo(in_hash) | 1;
    let key2 = endian::hi(in_hash) | 1;

    let mut sum = 0u32;
    let mut t = 0u32;
    let mut u = 0u32;
    let mut index = 0usize;

    while num_blocks > 1 {
        reversible_iteration(
            key1,
            context.rev_b1,
            context.rev_c1,
            context.rev_d1,
            context.rev_e1,
            REV_L1,
            data,
            &mut t,
            &mut u,
            &mut index,
            &mut sum,
        );
        reversible_iteration(
            key2,
            context.rev_b2,
            context.rev_c2,
            context.rev_d2,
            context.rev_e2,
            REV_L2,
            data,
            &mut t,
            &mut u,
            &mut index,
            &mut sum,
        );
        num_blocks -= 2;
    }

    if num_blocks == 1 {
        reversible_iteration(
            key1,
            context.rev_b1,
            context.rev_c1,
            context.rev_d1,
            context.rev_e1,
            REV_L1,
            data,
            &mut t,
            &mut u,
            &mut index,
            &mut sum,
        );
        reversible_final_iteration(
            key2,
            context.rev_b2,
            context.rev_c2,
            context.rev_d2,
            context.rev_e2,
            REV_L2,
            &mut t,
            &mut u,
            &mut sum,
        );
    }

    endian::make_u64(sum, t)
}
