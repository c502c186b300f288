use std::sync::Mutex;

use lazy_static::lazy_static;
use rand::Rng;

use crate::clock::Clock;

const SUFFIX_LEN: usize = 9;
const SUFFIX_SPACE: u64 = 36u64.pow(SUFFIX_LEN as u32);
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

lazy_static! {
    // (millis, suffix) of the last id handed out
    static ref LAST: Mutex<(i128, u64)> = Mutex::new((i128::MIN, 0));
}

/// Time-prefixed opaque id: `<unix millis, 13 digits>-<base36 suffix>`.
///
/// Ids from one process strictly increase in string order. Within the same
/// millisecond the suffix counts up from the previous one. If the clock
/// steps back, the last millisecond is reused until it catches up.
pub fn new_id(clock: &dyn Clock) -> String {
    let now = clock.now().unix_timestamp_nanos() / 1_000_000;
    let mut last = LAST.lock().unwrap_or_else(|p| p.into_inner());
    let (mut millis, mut suffix) = if now > last.0 {
        (now, fresh_suffix())
    } else {
        (last.0, last.1 + 1)
    };
    if suffix >= SUFFIX_SPACE {
        millis += 1;
        suffix = fresh_suffix();
    }
    *last = (millis, suffix);
    format!("{:013}-{}", millis, encode(suffix))
}

// Lower half only, so a millisecond has room to count up.
fn fresh_suffix() -> u64 {
    rand::thread_rng().gen_range(0..SUFFIX_SPACE / 2)
}

fn encode(mut n: u64) -> String {
    let mut out = [b'0'; SUFFIX_LEN];
    for slot in out.iter_mut().rev() {
        *slot = DIGITS[(n % 36) as usize];
        n /= 36;
    }
    out.iter().map(|&b| char::from(b)).collect()
}
