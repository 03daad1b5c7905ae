pub mod access;
pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod matching;
pub mod payments;
pub mod serde_utils;

#[cfg(test)]
mod access_test;
#[cfg(test)]
mod matching_test;
#[cfg(test)]
mod test_support;

/// Install the process-wide rustls crypto provider used by every HTTP client.
///
/// Safe to call more than once; later calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
