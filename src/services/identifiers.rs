use chrono::Utc;
use uuid::Uuid;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 6;

pub fn base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// Fixed-width lowercase base-36 token made of the low digits of a v4 UUID.
pub fn random_token() -> String {
    token_from(Uuid::new_v4().as_u128())
}

fn token_from(value: u128) -> String {
    let modulus = 36u128.pow(RANDOM_SUFFIX_LEN as u32);
    format!("{:0>width$}", base36(value % modulus), width = RANDOM_SUFFIX_LEN)
}

fn now_millis() -> u128 {
    Utc::now().timestamp_millis().max(0) as u128
}

/// Correlation id returned with a generated schedule, e.g. `sch_lr3k2f1a9xq2b`.
pub fn schedule_id() -> String {
    format!("sch_{}{}", base36(now_millis()), random_token())
}

/// Storage name for an uploaded file: `{millis}-{random}.{ext}`.
///
/// The extension is whatever follows the last `.` of the client's file name,
/// or the whole name when it has none.
pub fn unique_file_name(original_name: &str) -> String {
    let extension = original_name.rsplit('.').next().unwrap_or_default();
    format!("{}-{}.{}", now_millis(), random_token(), extension)
}
