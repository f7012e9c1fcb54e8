//! Task ID generation.
//!
//! Produces short opaque IDs in the style of the original store files:
//! 8 base36 chars (0-9, a-z) derived from a SHA-256 hash of the task
//! content and creation time. Uniqueness is only required within one
//! issue's task mapping, and is enforced by checking the candidate
//! against existing keys and retrying with a nonce instead of trusting
//! entropy alone.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Length of generated task IDs.
pub const TASK_ID_LEN: usize = 8;

/// Generate a task ID unique within the parent issue.
///
/// The `exists` closure checks a candidate against the issue's current
/// task keys; colliding candidates are retried with an incremented nonce.
pub fn generate_task_id<F>(
    title: &str,
    description: &str,
    created_at: DateTime<Utc>,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let mut nonce = 0u32;
    loop {
        let seed = format!(
            "{}|{}|{}|{}",
            title,
            description,
            created_at.timestamp_nanos_opt().unwrap_or(0),
            nonce
        );
        let id = compute_id_hash(&seed, TASK_ID_LEN);
        if !exists(&id) {
            return id;
        }
        nonce += 1;
    }
}

/// Compute a base36 hash of the input string with a specific length.
///
/// Uses SHA-256, takes the first 8 bytes as a u64, encodes as base36,
/// and truncates to the requested length.
fn compute_id_hash(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let mut encoded = base36_encode(num);
    if encoded.len() < length {
        encoded = format!("{encoded:0>length$}");
    }
    encoded.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.iter().rev().collect()
}
