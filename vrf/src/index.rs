//! Mapping random output onto the small index space.

use crate::{VrfError, VrfProvider};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

const EXPAND_DOMAIN: &[u8] = b"surety-index-expand";

/// Upper bound on expansion blocks before falling back to a linear fill.
const MAX_EXPANSIONS: u64 = 64;

/// Draw one index in `0..space`.
pub fn draw_index(vrf: &dyn VrfProvider, context: &[u8], space: u8) -> Result<u8, VrfError> {
    if space == 0 {
        return Err(VrfError::EmptySpace);
    }
    let output = vrf.get_randomness(context)?;
    Ok(output.value[0] % space)
}

/// Draw `count` distinct indexes in `0..space`, in draw order.
///
/// The first index is taken from the random value exactly as [`draw_index`]
/// would. The rest come from expanding the value block by block
/// (`blake2b(seed ‖ counter)`), each byte reduced modulo `space` and
/// duplicates skipped. If the
/// expansion budget runs out the remaining slots take the lowest unused
/// indexes, so the call always terminates.
pub fn draw_indexes(
    vrf: &dyn VrfProvider,
    context: &[u8],
    space: u8,
    count: usize,
) -> Result<Vec<u8>, VrfError> {
    if space == 0 {
        return Err(VrfError::EmptySpace);
    }
    if usize::from(space) < count {
        return Err(VrfError::SpaceTooSmall { count, space });
    }
    let seed = vrf.get_randomness(context)?.value;
    let mut picked: Vec<u8> = Vec::with_capacity(count);
    if count > 0 {
        picked.push(seed[0] % space);
    }

    let mut counter = 0u64;
    while picked.len() < count && counter < MAX_EXPANSIONS {
        let mut hasher = Blake2b256::new();
        hasher.update(EXPAND_DOMAIN);
        hasher.update(seed);
        hasher.update(counter.to_be_bytes());
        for byte in hasher.finalize() {
            let idx = byte % space;
            if !picked.contains(&idx) {
                picked.push(idx);
                if picked.len() == count {
                    break;
                }
            }
        }
        counter += 1;
    }

    if picked.len() < count {
        tracing::warn!(count, space, "index expansion exhausted, filling linearly");
        for idx in 0..space {
            if picked.len() == count {
                break;
            }
            if !picked.contains(&idx) {
                picked.push(idx);
            }
        }
    }
    Ok(picked)
}
