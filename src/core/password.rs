//! Installer password derivation.
//!
//! The Envoy does not let one set the installer password: it is computed from the gateway serial
//! number and the user name. The scheme below reproduces the vendor's one character for character,
//! quirks included.

const REALM: &str = "enphaseenergy.com";

/// Derive the Digest password for `username` on the Envoy with the serial number `serial`.
#[must_use]
pub fn derive(serial: &str, username: &str) -> String {
    from_hash(&hash_for_serial(serial, username))
}

/// Lowercase hex MD5 of the salted serial and user name.
#[must_use]
pub fn hash_for_serial(serial: &str, username: &str) -> String {
    let digest = md5::compute(format!("[e]{username}@{REALM}#{serial} EnPhAsE eNeRgY "));
    format!("{digest:x}")
}

/// Turn a hex digest into the 8-character password.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn from_hash(hash: &str) -> String {
    let mut count_zero = hash.bytes().filter(|&c| c == b'0').count() as i32;
    let mut count_one = hash.bytes().filter(|&c| c == b'1').count() as i32;

    hash.bytes()
        .rev()
        .take(8)
        .map(|c| {
            if matches!(count_zero, 3 | 6 | 9) {
                count_zero -= 1;
            }
            count_zero = count_zero.clamp(0, 20);

            if matches!(count_one, 9 | 15) {
                count_one -= 1;
            }
            count_one = count_one.clamp(0, 26);

            match c {
                b'0' => {
                    let shifted = b'f' + count_zero as u8;
                    count_zero -= 1;
                    char::from(shifted)
                }
                b'1' => {
                    let shifted = b'@' + count_one as u8;
                    count_one -= 1;
                    char::from(shifted)
                }
                _ => char::from(c),
            }
        })
        .collect()
}
