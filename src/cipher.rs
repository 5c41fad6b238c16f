//! Keyed, nonce-based duplex stream cipher over the Poseidon permutation.
//!
//! The cipher runs the width-5 permutation in duplex mode: slots 1..=3 are
//! the rate, slots 0 and 4 the capacity. The initial state binds the nonce,
//! the plaintext length and the two key words:
//!
//! ```text
//! [nonce + len * 2^128, key[0], key[1], 0, 0]
//! ```
//!
//! Each block of three message elements is added into the rate after a
//! permutation; the resulting rate *is* the ciphertext block and stays in
//! the state for the next permutation, so every block is bound to the full
//! transcript. A final permutation yields one extra element, the
//! authentication value.
//!
//! `decrypt` never fails on a forged ciphertext; authentication is a
//! separate equality check, [`verify`].

use once_cell::sync::Lazy;

use crate::fr::Fr;
use crate::poseidon;
use crate::types::CoreError;

/// Message elements absorbed per permutation call.
pub const BLOCK_SIZE: usize = 3;

/// Permutation width used by the cipher.
pub const CIPHER_WIDTH: usize = 5;

/// 2^128, the shift that packs the message length next to the nonce.
static LENGTH_SHIFT: Lazy<Fr> = Lazy::new(|| {
    Fr::new(num_bigint::BigUint::from(1u8) << 128)
});

fn initial_state(message_len: usize, key: &[Fr; 2], nonce: &Fr) -> Vec<Fr> {
    let binding = nonce.add(&Fr::from_u64(message_len as u64).mul(&LENGTH_SHIFT));
    vec![binding, key[0].clone(), key[1].clone(), Fr::zero(), Fr::zero()]
}

/// Ciphertext length for a plaintext of `message_len` elements: the padded
/// block payload plus one authentication element.
#[inline]
pub fn ciphertext_len(message_len: usize) -> usize {
    message_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE + 1
}

/// Encrypt a sequence of field elements.
///
/// The message is zero-padded to a multiple of [`BLOCK_SIZE`]; the output
/// carries the padded blocks followed by the authentication element, so its
/// length is [`ciphertext_len`]`(message.len())`.
pub fn encrypt(message: &[Fr], key: &[Fr; 2], nonce: &Fr) -> Result<Vec<Fr>, CoreError> {
    let mut padded = message.to_vec();
    padded.resize(message.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE, Fr::zero());

    let mut state = initial_state(message.len(), key, nonce);
    let mut out = Vec::with_capacity(padded.len() + 1);

    for block in padded.chunks(BLOCK_SIZE) {
        state = poseidon::permute(state)?;
        for (j, m) in block.iter().enumerate() {
            state[1 + j] += m;
            out.push(state[1 + j].clone());
        }
    }

    state = poseidon::permute(state)?;
    out.push(state[1].clone());
    Ok(out)
}

/// Decrypt a ciphertext produced by [`encrypt`], returning exactly
/// `message_len` elements (the zero padding is truncated).
///
/// The trailing authentication element is ignored here: a forged
/// ciphertext still decrypts to *something*. Callers that need integrity
/// run [`verify`]. Fails only when the ciphertext length does not frame
/// the claimed message length.
pub fn decrypt(
    ciphertext: &[Fr],
    key: &[Fr; 2],
    nonce: &Fr,
    message_len: usize,
) -> Result<Vec<Fr>, CoreError> {
    let expected = ciphertext_len(message_len);
    if ciphertext.len() != expected {
        return Err(CoreError::CiphertextLength { expected, actual: ciphertext.len() });
    }

    let mut state = initial_state(message_len, key, nonce);
    let mut message = Vec::with_capacity(expected - 1);

    for block in ciphertext[..expected - 1].chunks(BLOCK_SIZE) {
        state = poseidon::permute(state)?;
        for (j, c) in block.iter().enumerate() {
            message.push(c.sub(&state[1 + j]));
            // duplex feedback: the received ciphertext becomes the rate
            state[1 + j] = c.clone();
        }
    }

    message.truncate(message_len);
    Ok(message)
}

/// Integrity check: re-encrypt `message` and compare against `ciphertext`
/// element-wise, authentication element included. `true` only on an exact
/// match; tampering with any single element flips the result.
pub fn verify(
    ciphertext: &[Fr],
    message: &[Fr],
    key: &[Fr; 2],
    nonce: &Fr,
) -> Result<bool, CoreError> {
    if ciphertext.len() != ciphertext_len(message.len()) {
        return Ok(false);
    }
    let recomputed = encrypt(message, key, nonce)?;
    Ok(recomputed == ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fr(v: u64) -> Fr {
        Fr::from_u64(v)
    }

    fn key() -> [Fr; 2] {
        [fr(13), fr(37)]
    }

    #[test]
    fn test_round_trip_all_short_lengths() {
        for len in 1..=7 {
            let message: Vec<Fr> = (1..=len).map(fr).collect();
            let ct = encrypt(&message, &key(), &fr(42)).unwrap();
            assert_eq!(ct.len(), ciphertext_len(message.len()));
            let back = decrypt(&ct, &key(), &fr(42), message.len()).unwrap();
            assert_eq!(back, message, "length {}", len);
        }
    }

    #[test]
    fn test_reference_ciphertext() {
        // encrypt([1..7], [13, 37], 42) pinned against the reference schedule
        let expected = [
            "18514968644664068724252476103226101957138537352014807264273929338262044702427",
            "21842526279811037454320421342088958847430647629733602463417075294300334950989",
            "1956954400250991416994896513474856365406084999079542251311757528016337759369",
            "9654364315722567354313846416019749122617883914372416472600532096382345606474",
            "10310400081323739490602979644359016148213351221616401721738978378115221412437",
            "7997993572269226752343825692712065690228043728698504225949146190632116368534",
            "20810374744929836121807429389321495186856036661488668732455964929100310348538",
            "6558091975027986018760959396129910947780760408384454072594692378020536683849",
            "9274138627836423429031565918996107594652013448643744619420199354231388841768",
            "8401351172903540274913939724818003649066722643609056517669702989289914935819",
        ];
        let message: Vec<Fr> = (1..=7).map(fr).collect();
        let ct = encrypt(&message, &key(), &fr(42)).unwrap();
        let want: Vec<Fr> = expected.iter().map(|s| Fr::from_dec_str(s).unwrap()).collect();
        assert_eq!(ct, want);
    }

    #[test]
    fn test_integrity_check_accepts_honest_ciphertext() {
        let message: Vec<Fr> = (1..=7).map(fr).collect();
        let ct = encrypt(&message, &key(), &fr(42)).unwrap();
        assert!(verify(&ct, &message, &key(), &fr(42)).unwrap());
    }

    #[test]
    fn test_integrity_check_rejects_single_element_tamper() {
        let message: Vec<Fr> = (1..=7).map(fr).collect();
        let ct = encrypt(&message, &key(), &fr(42)).unwrap();

        let mut tampered = message.clone();
        tampered[6] = fr(8);
        assert!(!verify(&ct, &tampered, &key(), &fr(42)).unwrap());
    }

    #[test]
    fn test_integrity_check_rejects_tampered_tag() {
        let message: Vec<Fr> = (1..=3).map(fr).collect();
        let mut ct = encrypt(&message, &key(), &fr(42)).unwrap();
        let last = ct.len() - 1;
        ct[last] = ct[last].add(&Fr::one());
        assert!(!verify(&ct, &message, &key(), &fr(42)).unwrap());
    }

    #[test]
    fn test_wrong_key_scrambles() {
        let message: Vec<Fr> = (1..=3).map(fr).collect();
        let ct = encrypt(&message, &key(), &fr(42)).unwrap();
        let wrong = [fr(13), fr(38)];
        let back = decrypt(&ct, &wrong, &fr(42), message.len()).unwrap();
        assert_ne!(back, message);
    }

    #[test]
    fn test_nonce_and_length_binding() {
        let message: Vec<Fr> = (1..=3).map(fr).collect();
        let a = encrypt(&message, &key(), &fr(42)).unwrap();
        let b = encrypt(&message, &key(), &fr(43)).unwrap();
        assert_ne!(a, b);

        // same padded payload, different declared length
        let shorter: Vec<Fr> = vec![fr(1), fr(2)];
        let c = encrypt(&shorter, &key(), &fr(42)).unwrap();
        assert_ne!(a[..2], c[..2]);
    }

    #[test]
    fn test_length_framing_errors() {
        let message: Vec<Fr> = (1..=3).map(fr).collect();
        let ct = encrypt(&message, &key(), &fr(42)).unwrap();
        let err = decrypt(&ct[..3], &key(), &fr(42), 3).unwrap_err();
        assert_eq!(err, CoreError::CiphertextLength { expected: 4, actual: 3 });
    }

    #[test]
    fn test_ciphertext_len() {
        assert_eq!(ciphertext_len(0), 1);
        assert_eq!(ciphertext_len(1), 4);
        assert_eq!(ciphertext_len(3), 4);
        assert_eq!(ciphertext_len(4), 7);
        assert_eq!(ciphertext_len(7), 10);
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            words in proptest::collection::vec(any::<[u8; 32]>(), 1..8),
            k0 in any::<[u8; 32]>(),
            k1 in any::<[u8; 32]>(),
            nonce in any::<u64>(),
        ) {
            let message: Vec<Fr> = words.iter().map(|w| Fr::from_bytes_be(w)).collect();
            let key = [Fr::from_bytes_be(&k0), Fr::from_bytes_be(&k1)];
            let nonce = Fr::from_u64(nonce);
            let ct = encrypt(&message, &key, &nonce).unwrap();
            let back = decrypt(&ct, &key, &nonce, message.len()).unwrap();
            prop_assert_eq!(&back, &message);
            prop_assert!(verify(&ct, &message, &key, &nonce).unwrap());
        }
    }
}
