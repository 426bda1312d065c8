// src/validate.rs

use crate::decoder::decode_bytes;
use crate::error::Result;
use crate::normalize::NormalizedAudio;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range of accepted clip lengths, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self { min: 0.0, max: 60_000.0 }
    }
}

impl DurationBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn check(&self, duration: f64) -> Option<Rejection> {
        if duration > self.max {
            return Some(Rejection::TooLong { max: self.max, measured: duration });
        }
        if duration < self.min {
            return Some(Rejection::TooShort { min: self.min, measured: duration });
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    TooShort { min: f64, measured: f64 },
    TooLong { max: f64, measured: f64 },
}

impl Rejection {
    pub fn measured(&self) -> f64 {
        match *self {
            Rejection::TooShort { measured, .. } | Rejection::TooLong { measured, .. } => measured,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Rejection::TooLong { max, measured } => write!(
                f,
                "Oops! Length of the audio recording must be less than {max} seconds, \
                 but the length is {measured:.2} seconds. Please try again."
            ),
            Rejection::TooShort { min, measured } => write!(
                f,
                "Oops! Length of the audio recording must be at least {min} seconds, \
                 but the length is {measured:.2} seconds. Please try again."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accepted { duration: f64 },
    Rejected(Rejection),
}

/// First decode pass: measures the clip at its native rate.
#[derive(Debug, Clone, Copy)]
pub struct DurationValidator {
    bounds: DurationBounds,
}

impl DurationValidator {
    pub fn new(bounds: DurationBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> DurationBounds {
        self.bounds
    }

    pub fn measure(&self, audio: &NormalizedAudio) -> Result<f64> {
        let decoded = decode_bytes(&audio.bytes, audio.extension.as_deref())?;
        Ok(decoded.duration_secs())
    }

    pub fn validate(&self, audio: &NormalizedAudio) -> Result<Verdict> {
        let duration = self.measure(audio)?;
        match self.bounds.check(duration) {
            None => {
                info!("accepted clip of {duration:.2}s");
                Ok(Verdict::Accepted { duration })
            }
            Some(rejection) => {
                warn!("rejected clip of {duration:.2}s (bounds {:?})", self.bounds);
                Ok(Verdict::Rejected(rejection))
            }
        }
    }
}
