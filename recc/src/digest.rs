use data_encoding::HEXLOWER;
use recc_reapi::remote_execution as re;
use sha2::{Digest as _, Sha256};

/// A content digest: the lowercase-hex SHA-256 of a blob plus its exact byte
/// length. This is the key type for every CAS interaction; two digests are
/// equal iff both fields are.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest {
    hash: String,
    size_bytes: i64,
}

impl Digest {
    pub fn of_bytes(data: &[u8]) -> Self {
        Self {
            hash: HEXLOWER.encode(&Sha256::digest(data)),
            size_bytes: data.len() as i64,
        }
    }

    /// Digest of a proto message in canonical serialized form.
    pub fn of_message<M: prost::Message>(message: &M) -> Self {
        Self::of_bytes(&message.encode_to_vec())
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn size_bytes(&self) -> i64 {
        self.size_bytes
    }
}

impl From<&Digest> for re::Digest {
    fn from(d: &Digest) -> Self {
        re::Digest {
            hash: d.hash.clone(),
            size_bytes: d.size_bytes,
        }
    }
}

impl From<Digest> for re::Digest {
    fn from(d: Digest) -> Self {
        re::Digest {
            hash: d.hash,
            size_bytes: d.size_bytes,
        }
    }
}

impl From<re::Digest> for Digest {
    fn from(d: re::Digest) -> Self {
        Self {
            hash: d.hash,
            size_bytes: d.size_bytes,
        }
    }
}

impl From<&re::Digest> for Digest {
    fn from(d: &re::Digest) -> Self {
        Self {
            hash: d.hash.clone(),
            size_bytes: d.size_bytes,
        }
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.hash, self.size_bytes)
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.hash, self.size_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn empty_blob() {
        let d = Digest::of_bytes(b"");
        assert_eq!(d.hash(), EMPTY_SHA256);
        assert_eq!(d.size_bytes(), 0);
    }

    #[test]
    fn known_value() {
        // SHA-256("abc"), from FIPS 180-2 appendix B.1.
        let d = Digest::of_bytes(b"abc");
        assert_eq!(
            d.hash(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(d.size_bytes(), 3);
    }

    #[test]
    fn stable_across_runs() {
        let a = Digest::of_bytes(b"some contents");
        let b = Digest::of_bytes(b"some contents");
        assert_eq!(a, b);
        assert_ne!(a, Digest::of_bytes(b"other contents"));
    }

    #[test]
    fn empty_message_equals_empty_blob() {
        // An all-default proto message serializes to zero bytes.
        let d = Digest::of_message(&re::Directory::default());
        assert_eq!(d.hash(), EMPTY_SHA256);
        assert_eq!(d.size_bytes(), 0);
    }

    #[test]
    fn proto_round_trip() {
        let d = Digest::of_bytes(b"xyz");
        let proto: re::Digest = (&d).into();
        assert_eq!(Digest::from(proto), d);
    }
}
