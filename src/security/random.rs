//! Injectable randomness for task ids and envelope frame nonces.

use rand::Rng;
use rand::distr::Alphanumeric;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Mutex;

/// Source of alphanumeric tokens.
pub trait TokenSource: Send + Sync {
    /// Return `len` ASCII alphanumeric characters.
    fn next_token(&self, len: usize) -> String;
}

/// Thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngTokenSource;

impl TokenSource for ThreadRngTokenSource {
    fn next_token(&self, len: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

/// Replays a fixed list of tokens, then falls back to a counter.
///
/// Pins ids in tests, including forced collisions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedTokenSource {
    queue: Mutex<VecDeque<String>>,
    fallback: Mutex<u64>,
}

#[cfg(test)]
impl ScriptedTokenSource {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(tokens.into_iter().map(Into::into).collect()),
            fallback: Mutex::new(0),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
impl TokenSource for ScriptedTokenSource {
    fn next_token(&self, len: usize) -> String {
        let scripted = self
            .queue
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();
        if let Some(token) = scripted {
            return token;
        }
        let mut counter = self
            .fallback
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *counter += 1;
        format!("{:0>len$}", *counter, len = len)
    }
}
