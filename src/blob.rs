use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bincode::{config, decode_from_slice, encode_to_vec};
use sha2::{Digest, Sha256};

use crate::compression::CompressedSeries;
use crate::error::{RampError, Result};

const DIGEST_LEN: usize = 32;

/// Archive blobs: bincode payload followed by its SHA-256 digest.
impl CompressedSeries {
    fn payload(&self) -> Result<Vec<u8>> {
        Ok(encode_to_vec(self, config::standard())?)
    }

    pub fn to_blob(&self) -> Result<Vec<u8>> {
        let mut blob = self.payload()?;
        let digest = Sha256::digest(&blob);
        blob.extend_from_slice(&digest);
        Ok(blob)
    }

    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        if blob.len() < DIGEST_LEN {
            return Err(RampError::invalid("archive blob too short"));
        }
        let (payload, digest) = blob.split_at(blob.len() - DIGEST_LEN);
        if Sha256::digest(payload).as_slice() != digest {
            return Err(RampError::ChecksumMismatch);
        }
        let (series, _) = decode_from_slice(payload, config::standard())?;
        Ok(series)
    }

    /// Hex SHA-256 of the encoded archive.
    pub fn fingerprint(&self) -> Result<String> {
        Ok(format!("{:x}", Sha256::digest(self.payload()?)))
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize> {
        let blob = self.to_blob()?;
        w.write_all(&blob)?;
        Ok(blob.len())
    }

    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;
        Self::from_blob(&buf)
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        self.write_to(&mut file)?;
        file.sync_all()?;
        Ok(())
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_from(&mut File::open(path)?)
    }
}
