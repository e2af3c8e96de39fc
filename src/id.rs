//! Short external ids: a random v4 UUID rendered in base57.

/// Base57 alphabet: digits and letters minus the look-alikes `0 1 I O l`.
const ALPHABET: &[u8; 57] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length needed to encode 128 bits in base57.
pub const SHORT_ID_LEN: usize = 22;

pub fn short_id() -> String {
    encode(uuid::Uuid::new_v4().as_u128())
}

fn encode(mut n: u128) -> String {
    let base = ALPHABET.len() as u128;
    let mut out = Vec::with_capacity(SHORT_ID_LEN);
    while n > 0 {
        out.push(ALPHABET[(n % base) as usize]);
        n /= base;
    }
    out.resize(SHORT_ID_LEN, ALPHABET[0]);
    out.reverse();
    out.into_iter().map(char::from).collect()
}
