//! Identifier generation for stickers and packs.
//!
//! Ids look like `1718000000000-k3j9x0a`: the unix time in milliseconds
//! followed by seven random base36 characters. The time prefix keeps ids
//! roughly sortable by creation; the suffix makes two ids minted in the same
//! millisecond collide only with negligible probability.

use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}", millis, suffix)
}
