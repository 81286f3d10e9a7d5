use lpvault_crypto::{decryption_key, derive_keys, hex_to_bytes, login_key, CryptoError};
use pbkdf2::pbkdf2_hmac_array;
use pretty_assertions::assert_eq;
use sha2::Sha256;

#[test]
fn decryption_key_matches_pbkdf2_sha256_vector() {
    // PBKDF2-HMAC-SHA256, P="password", S="salt", c=2, dkLen=32.
    let key = decryption_key("salt", "password", 2).unwrap();
    assert_eq!(
        key.to_vec(),
        hex_to_bytes("ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43").unwrap()
    );
}

#[test]
fn login_key_is_stage2_over_decryption_key() {
    // Stage one of the login key must be byte-identical to the
    // decryption key for the same inputs.
    let username = "user@example.com";
    let password = "hunter2!";
    let iterations = 5000;

    let stage1 = decryption_key(username, password, iterations).unwrap();
    let expected = hex::encode(pbkdf2_hmac_array::<Sha256, 32>(
        &stage1,
        password.as_bytes(),
        1,
    ));

    assert_eq!(login_key(username, password, iterations).unwrap(), expected);
}

#[test]
fn derive_keys_agrees_with_individual_derivations() {
    let (login, decryption) = derive_keys("u", "p", 100).unwrap();
    assert_eq!(login, login_key("u", "p", 100).unwrap());
    assert_eq!(decryption, decryption_key("u", "p", 100).unwrap());
}

#[test]
fn derivation_is_deterministic() {
    assert_eq!(
        decryption_key("user", "pass", 500).unwrap(),
        decryption_key("user", "pass", 500).unwrap()
    );
}

#[test]
fn username_is_used_byte_for_byte() {
    // No case normalization: differently-cased usernames derive
    // different keys.
    assert_ne!(
        decryption_key("User@Example.com", "pw", 100).unwrap(),
        decryption_key("user@example.com", "pw", 100).unwrap()
    );
}

#[test]
fn low_iteration_counts_are_rejected() {
    for iterations in [0, 1] {
        let err = decryption_key("u", "p", iterations).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidIterations(n) if n == iterations));
        assert!(login_key("u", "p", iterations).is_err());
    }
    assert!(decryption_key("u", "p", 2).is_ok());
}
