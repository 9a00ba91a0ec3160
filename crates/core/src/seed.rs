//! Seed-key selection: a caller-supplied key, or a short random one when none is given.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub const GENERATED_SEED_LEN: usize = 6;
const SEED_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Provided(String),
    Generated(String),
}

impl SeedChoice {
    pub fn value(&self) -> &str {
        match self {
            Self::Provided(seed) | Self::Generated(seed) => seed,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Self::Provided(seed) | Self::Generated(seed) => seed,
        }
    }
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Trimmed non-empty input is used verbatim; anything else gets a fresh random key.
pub fn resolve_seed(raw: Option<&str>) -> SeedChoice {
    match raw.map(str::trim).filter(|seed| !seed.is_empty()) {
        Some(seed) => SeedChoice::Provided(seed.to_string()),
        None => SeedChoice::Generated(generate_seed_key(runtime_entropy())),
    }
}

/// Six lowercase alphanumeric characters drawn from a ChaCha stream seeded with `entropy`.
pub fn generate_seed_key(entropy: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(entropy);
    (0..GENERATED_SEED_LEN)
        .map(|_| {
            let index = rng.next_u32() as usize % SEED_ALPHABET.len();
            char::from(SEED_ALPHABET[index])
        })
        .collect()
}

fn runtime_entropy() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
