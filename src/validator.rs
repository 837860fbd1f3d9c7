//! Time-window TOTP validation with a caller-owned replay floor.

use core::fmt;
use core::marker::PhantomData;

use chrono::{DateTime, Duration, Utc};
use ring::hmac::Key as HmacKey;
use tracing::{debug, trace};

use crate::digest::{self, Digest, HashAlgorithm, Sha1};
use crate::digits::Digits;
use crate::error::{Error, Result};
use crate::step::{time_step, StepSize};

/// Outcome of [`TotpValidator::validate`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Validation {
    /// The code matched at `counter`. Persist it as the new replay floor.
    Accepted { counter: i64 },
    /// No counter in the window matched. `current` is the counter for the supplied instant and
    /// must not be stored as a replay floor.
    Rejected { current: i64 },
}

impl Validation {
    pub fn matched(&self) -> bool {
        matches!(self, Validation::Accepted { .. })
    }

    /// The resolved counter: the matching one when accepted, the current one otherwise.
    pub fn counter(&self) -> i64 {
        match *self {
            Validation::Accepted { counter } => counter,
            Validation::Rejected { current } => current,
        }
    }

    /// The counter to persist as the new replay floor, if any.
    pub fn accepted_counter(&self) -> Option<i64> {
        match *self {
            Validation::Accepted { counter } => Some(counter),
            Validation::Rejected { .. } => None,
        }
    }
}

/// Validates TOTP codes against a tolerance window around a supplied instant.
///
/// The validator is immutable once built. Replay prevention relies on the last accepted counter,
/// which the caller stores (per account, per secret) and passes to every call; only counters
/// strictly greater than it are ever accepted. Callers sharing one floor across threads must
/// serialize the read-validate-write sequence themselves.
pub struct TotpValidator<H: HashAlgorithm = Sha1> {
    key: HmacKey,
    digits: Digits,
    step: StepSize,
    past_tolerance: Duration,
    future_tolerance: Duration,
    algorithm: PhantomData<H>,
}

impl TotpValidator {
    /// Start configuring a validator for `secret` with the default parameters: HMAC-SHA1, six
    /// digits, 30 second steps and no tolerance in either direction.
    pub fn builder(secret: &[u8]) -> Builder<'_> {
        Builder {
            secret,
            digits: Digits::default(),
            step: StepSize::default(),
            past_tolerance: Duration::zero(),
            future_tolerance: Duration::zero(),
            algorithm: PhantomData,
        }
    }
}

impl<H: HashAlgorithm> TotpValidator<H> {
    /// Check `code` against every counter in the window around `now`.
    ///
    /// The window spans the counters for `now - past_tolerance` through
    /// `now + future_tolerance`, inclusive. Counters at or below `last_accepted` are skipped, and
    /// the earliest remaining counter whose code equals `code` wins.
    pub fn validate(&self, now: DateTime<Utc>, code: u32, last_accepted: i64) -> Validation {
        let (t_min, t_max) = self.window(now);
        trace!(t_min, t_max, last_accepted, "searching validation window");

        let found = (t_min..=t_max)
            .filter(|&t| {
                let fresh = t > last_accepted;
                if !fresh {
                    trace!(counter = t, "skipping counter at or below replay floor");
                }
                fresh
            })
            .find(|&t| self.code_for(t) == code);

        match found {
            Some(counter) => {
                debug!(counter, "code accepted");
                Validation::Accepted { counter }
            }
            None => {
                let current = time_step(self.step, now);
                debug!(current, "code rejected");
                Validation::Rejected { current }
            }
        }
    }

    /// [`validate`](Self::validate) against the system clock.
    pub fn validate_now(&self, code: u32, last_accepted: i64) -> Validation {
        self.validate(Utc::now(), code, last_accepted)
    }

    /// The code for the time step containing `instant`.
    pub fn code_at(&self, instant: DateTime<Utc>) -> u32 {
        self.code_for(time_step(self.step, instant))
    }

    pub fn digits(&self) -> Digits {
        self.digits
    }

    pub fn step(&self) -> StepSize {
        self.step
    }

    pub fn past_tolerance(&self) -> Duration {
        self.past_tolerance
    }

    pub fn future_tolerance(&self) -> Duration {
        self.future_tolerance
    }

    fn code_for(&self, counter: i64) -> u32 {
        digest::sign(&self.key, counter).code(self.digits)
    }

    fn window(&self, now: DateTime<Utc>) -> (i64, i64) {
        let earliest = now
            .checked_sub_signed(self.past_tolerance)
            .map(|t| t.timestamp())
            .unwrap_or_else(|| {
                now.timestamp()
                    .saturating_sub(self.past_tolerance.num_seconds())
            });
        let latest = now
            .checked_add_signed(self.future_tolerance)
            .map(|t| t.timestamp())
            .unwrap_or_else(|| {
                now.timestamp()
                    .saturating_add(self.future_tolerance.num_seconds())
            });
        (self.step.counter_at(earliest), self.step.counter_at(latest))
    }
}

impl<H: HashAlgorithm> fmt::Debug for TotpValidator<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TotpValidator")
            .field("algorithm", &core::any::type_name::<H>())
            .field("digits", &self.digits)
            .field("step", &self.step)
            .field("past_tolerance", &self.past_tolerance)
            .field("future_tolerance", &self.future_tolerance)
            .finish_non_exhaustive()
    }
}

/// Configuration for a [`TotpValidator`].
///
/// Tolerances are signed. A negative past tolerance moves the start of the window forward rather
/// than widening it, and likewise for a negative future tolerance; neither is rejected.
#[derive(Clone, Debug)]
pub struct Builder<'a, H: HashAlgorithm = Sha1> {
    secret: &'a [u8],
    digits: Digits,
    step: StepSize,
    past_tolerance: Duration,
    future_tolerance: Duration,
    algorithm: PhantomData<H>,
}

impl<'a, H: HashAlgorithm> Builder<'a, H> {
    /// Switch the HMAC algorithm.
    pub fn algorithm<A: HashAlgorithm>(self, _algorithm: A) -> Builder<'a, A> {
        Builder {
            secret: self.secret,
            digits: self.digits,
            step: self.step,
            past_tolerance: self.past_tolerance,
            future_tolerance: self.future_tolerance,
            algorithm: PhantomData,
        }
    }

    pub fn digits(mut self, digits: Digits) -> Self {
        self.digits = digits;
        self
    }

    pub fn step(mut self, step: StepSize) -> Self {
        self.step = step;
        self
    }

    /// How far before the supplied instant codes are still accepted.
    pub fn past_tolerance(mut self, tolerance: Duration) -> Self {
        self.past_tolerance = tolerance;
        self
    }

    /// How far after the supplied instant codes are already accepted.
    pub fn future_tolerance(mut self, tolerance: Duration) -> Self {
        self.future_tolerance = tolerance;
        self
    }

    /// Derive the HMAC key and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySecret`] if the secret has no bytes.
    pub fn build(self) -> Result<TotpValidator<H>> {
        if self.secret.is_empty() {
            return Err(Error::EmptySecret);
        }
        Ok(TotpValidator {
            key: H::new_keyed_hash(self.secret),
            digits: self.digits,
            step: self.step,
            past_tolerance: self.past_tolerance,
            future_tolerance: self.future_tolerance,
            algorithm: PhantomData,
        })
    }
}
