//! Key and id generation

use rand::Rng;

const KEY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 1-9 only: ids always render as exactly eight digits.
const ID_DIGITS: &[u8] = b"123456789";

/// Generates an opaque license key, optionally `PREFIX-` prefixed.
pub fn license_key(prefix: Option<&str>, length: usize) -> String {
  let mut rng = rand::rng();
  let key: String = (0..length)
    .map(|_| KEY_CHARSET[rng.random_range(0..KEY_CHARSET.len())] as char)
    .collect();

  match prefix {
    Some(prefix) => format!("{prefix}-{key}"),
    None => key,
  }
}

/// Generates a random 8-digit user id. Uniqueness is enforced by the
/// primary key; the caller retries on collision.
pub fn user_id() -> i64 {
  let mut rng = rand::rng();
  (0..8).fold(0i64, |acc, _| {
    acc * 10 + (ID_DIGITS[rng.random_range(0..ID_DIGITS.len())] - b'0') as i64
  })
}
