//! I define the resettable [`Hasher`] shared by a canonicalization run.

use std::fmt::Write;

use sha2::Digest;

/// The hash functions supported by RDFC-1.0.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HashAlgorithm {
    /// [SHA-256](https://en.wikipedia.org/wiki/SHA-2), the default.
    Sha256,
    /// [SHA-384](https://en.wikipedia.org/wiki/SHA-2).
    Sha384,
}

/// A resettable cryptographic digest over UTF-8 byte sequences.
///
/// One instance is shared by a whole canonicalization run
/// and [reset](Hasher::reset) between logical hash computations;
/// callers must not interleave unrelated updates
/// between a reset and a digest read.
#[derive(Clone)]
pub struct Hasher(Inner);

#[derive(Clone)]
enum Inner {
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
}

impl Hasher {
    /// Build a hasher for the given algorithm.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Hasher(match algorithm {
            HashAlgorithm::Sha256 => Inner::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Sha384 => Inner::Sha384(sha2::Sha384::new()),
        })
    }

    /// Clear the internal state to start a fresh digest.
    pub fn reset(&mut self) {
        match &mut self.0 {
            Inner::Sha256(h) => Digest::reset(h),
            Inner::Sha384(h) => Digest::reset(h),
        }
    }

    /// Update the internal state by hashing `data`.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        match &mut self.0 {
            Inner::Sha256(h) => h.update(data.as_ref()),
            Inner::Sha384(h) => h.update(data.as_ref()),
        }
    }

    /// The lowercase hex digest over all bytes fed since the last reset.
    ///
    /// Does not consume the internal state: calling it twice in a row
    /// returns the same digest.
    pub fn hex_digest(&self) -> String {
        match &self.0 {
            Inner::Sha256(h) => hex(h.clone().finalize()),
            Inner::Sha384(h) => hex(h.clone().finalize()),
        }
    }
}

fn hex(hash: impl AsRef<[u8]>) -> String {
    let mut digest = String::with_capacity(2 * hash.as_ref().len());
    for b in hash.as_ref() {
        write!(&mut digest, "{b:02x}").expect("writing to a String cannot fail");
    }
    digest
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sha256_empty() {
        let hasher = Hasher::new(HashAlgorithm::Sha256);
        assert_eq!(
            hasher.hex_digest(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_abc() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha256);
        hasher.update("abc");
        assert_eq!(
            hasher.hex_digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha384_abc() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha384);
        hasher.update("ab");
        hasher.update("c");
        assert_eq!(
            hasher.hex_digest(),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
    }

    #[test]
    fn digest_is_repeatable() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha256);
        hasher.update("abc");
        assert_eq!(hasher.hex_digest(), hasher.hex_digest());
    }

    #[test]
    fn reset_starts_over() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha256);
        hasher.update("garbage");
        hasher.reset();
        hasher.update("abc");
        assert_eq!(
            hasher.hex_digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
