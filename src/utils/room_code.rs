//! Room code generation.
//!
//! Codes are 4 uppercase letters. Uniqueness against live rooms is the
//! registry's job; it resamples on collision.

use rand::Rng;

pub const ROOM_CODE_LEN: usize = 4;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn generate_room_code<R: Rng>(rng: &mut R) -> String {
    let mut code = String::with_capacity(ROOM_CODE_LEN);
    for _ in 0..ROOM_CODE_LEN {
        code.push(ALPHABET[rng.random_range(0..ALPHABET.len())] as char);
    }
    code
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn codes_are_four_uppercase_letters() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..64 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.len(), ROOM_CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn codes_vary_across_draws() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let a = generate_room_code(&mut rng);
        let b = generate_room_code(&mut rng);
        assert_ne!(a, b);
    }
}
