//! Seeded randomness, split into one stream per concern.
//!
//! Every stream is keyed by HMAC-SHA256 over the user seed and the stream's
//! tag, so drawing more from one concern (a big toxic cloud burst, say) never
//! shifts what another concern sees for the same seed.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// What a stream is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Board shuffles, known-hazard briefings, rewards.
    Contracts,
    /// Layer kinds, hardness and strata.
    Layers,
    /// Cloud placement and slot scattering.
    Malus,
}

impl Stream {
    pub const ALL: [Self; 3] = [Self::Contracts, Self::Layers, Self::Malus];

    const fn tag(self) -> &'static [u8] {
        match self {
            Self::Contracts => b"drillrush/contracts",
            Self::Layers => b"drillrush/layers",
            Self::Malus => b"drillrush/malus",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Contracts => 0,
            Self::Layers => 1,
            Self::Malus => 2,
        }
    }

    /// Seed for this stream under `user_seed`.
    #[must_use]
    pub fn seed_for(self, user_seed: u64) -> u64 {
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(self.tag())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(&user_seed.to_le_bytes());
        let digest = mac.finalize().into_bytes();
        digest[..8]
            .iter()
            .rev()
            .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte))
    }
}

/// A `SmallRng` that remembers which stream it is and how often it was drawn from.
#[derive(Debug, Clone)]
pub struct StreamRng {
    stream: Stream,
    inner: SmallRng,
    draws: u64,
}

impl StreamRng {
    fn seeded(stream: Stream, user_seed: u64) -> Self {
        Self {
            stream,
            inner: SmallRng::seed_from_u64(stream.seed_for(user_seed)),
            draws: 0,
        }
    }

    #[must_use]
    pub const fn stream(&self) -> Stream {
        self.stream
    }

    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    const fn count(&mut self) {
        self.draws = self.draws.saturating_add(1);
    }
}

impl RngCore for StreamRng {
    fn next_u32(&mut self) -> u32 {
        self.count();
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.count();
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.count();
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.count();
        self.inner.try_fill_bytes(dest)
    }
}

/// All streams for one seed.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    streams: [RefCell<StreamRng>; 3],
}

impl RngBundle {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            streams: Stream::ALL.map(|stream| RefCell::new(StreamRng::seeded(stream, seed))),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Borrow one stream. Each stream may only be borrowed once at a time.
    #[must_use]
    pub fn stream(&self, stream: Stream) -> RefMut<'_, StreamRng> {
        self.streams[stream.slot()].borrow_mut()
    }

    #[must_use]
    pub fn contracts(&self) -> RefMut<'_, StreamRng> {
        self.stream(Stream::Contracts)
    }

    #[must_use]
    pub fn layers(&self) -> RefMut<'_, StreamRng> {
        self.stream(Stream::Layers)
    }

    #[must_use]
    pub fn malus(&self) -> RefMut<'_, StreamRng> {
        self.stream(Stream::Malus)
    }

    /// Draws taken from `stream` so far.
    #[must_use]
    pub fn draws(&self, stream: Stream) -> u64 {
        self.streams[stream.slot()].borrow().draws()
    }
}
