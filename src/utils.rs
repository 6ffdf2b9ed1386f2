use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use time::OffsetDateTime;

const LOCAL_ID_PREFIX: &str = "local";
const LOCAL_ID_SUFFIX_LEN: usize = 9;
const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn crypto_rng() -> ChaCha20Rng {
    ChaCha20Rng::from_entropy()
}

pub fn current_time_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Identifier for a record that only exists in the local pending queue. Time based with a random
/// base36 suffix so two records created within the same millisecond still differ.
pub fn local_record_id(rng: &mut impl Rng) -> String {
    let suffix: String = (0..LOCAL_ID_SUFFIX_LEN)
        .map(|_| BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())] as char)
        .collect();

    format!("{LOCAL_ID_PREFIX}_{}_{suffix}", current_time_ms())
}

pub fn is_local_record_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX) && id.as_bytes().get(LOCAL_ID_PREFIX.len()) == Some(&b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_record_id_shape() {
        let mut rng = crypto_rng();
        let id = local_record_id(&mut rng);

        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "local");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), LOCAL_ID_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36_ALPHABET.contains(&b)));
        assert!(is_local_record_id(&id));
    }

    #[test]
    fn test_local_record_ids_differ() {
        let mut rng = crypto_rng();
        let first = local_record_id(&mut rng);
        let second = local_record_id(&mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn test_remote_ids_are_not_local() {
        assert!(!is_local_record_id("42"));
        assert!(!is_local_record_id("localhost"));
        assert!(!is_local_record_id(""));
    }
}
