//! Core type aliases, traits, and constants for draftforge.
//!
//! This crate provides the foundational types and configuration parameters
//! used throughout the draftforge workspace.

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Index into a session's ordered roster. Pass direction is defined over seats.
pub type Seat = usize;
/// Round counter within a draft (pack number, grid number, exchange round...).
pub type Round = u32;
/// Bot advisory score for a single card in a pack.
pub type Score = f32;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    /// Useful for converting between marker types.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// SESSION CODES
// ============================================================================
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 8;

/// Generates a short human-joinable session code.
/// Sessions are created on first join to an unknown code, so codes only
/// need to be unlikely to collide, not globally unique.
pub fn session_code() -> String {
    use rand::seq::IndexedRandom;
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| *CODE_ALPHABET.choose(&mut rng).unwrap() as char)
        .collect()
}

// ============================================================================
// PACK GENERATION PARAMETERS
// ============================================================================
/// Default number of cards per generated pack.
pub const DEFAULT_PACK_SIZE: usize = 15;
/// Default number of packs per participant in a booster draft.
pub const DEFAULT_PACKS_PER_PLAYER: usize = 3;
/// Probability that a rare slot is promoted to mythic.
pub const MYTHIC_RATE: f64 = 1.0 / 8.0;
/// Probability that a pack carries a foil slot.
pub const FOIL_RATE: f64 = 15.0 / 67.0;

// ============================================================================
// SESSION TIMING
// ============================================================================
/// Default pick timer in seconds. Decays linearly with pick number.
pub const DEFAULT_PICK_TIMER: u32 = 75;
/// How long a probed stale channel gets to answer a liveness ping (seconds).
pub const LIVENESS_TIMEOUT: u64 = 3;
/// Window over which pending bot scoring calls are coalesced (milliseconds).
pub const ADVISOR_FLUSH_WINDOW: u64 = 50;
/// Upstream ceiling on coalesced bot scoring requests per round-trip.
pub const ADVISOR_BATCH_LIMIT: usize = 16;
/// Hard bound on one bot scoring round-trip (seconds). A batch still
/// unanswered at the bound resolves to nothing rather than blocking picks.
pub const ADVISOR_CALL_TIMEOUT: u64 = 10;

// ============================================================================
// PROCESS SETUP
// ============================================================================
/// Initialize terminal + file logging for server binaries.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("install signal handler");
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}
