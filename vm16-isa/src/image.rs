//! Whole-memory binary images
//!
//! An image is exactly [`IMAGE_BYTES`] bytes: every word of the address space,
//! in address order, little-endian.

use crate::encoding::{word_from_le, word_to_le};
use crate::error::IsaError;
use crate::{Address, Word, IMAGE_BYTES, MEMORY_WORDS, WORD_BYTES};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Contents of the full 64 Ki-word memory
#[derive(Clone, PartialEq, Eq)]
pub struct MemoryImage {
    words: Box<[Word]>,
}

impl MemoryImage {
    /// All-zero image
    pub fn zeroed() -> Self {
        Self { words: vec![0; MEMORY_WORDS].into_boxed_slice() }
    }

    /// Parse a raw image. The length must match exactly.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IsaError> {
        if bytes.len() != IMAGE_BYTES {
            return Err(IsaError::InvalidImageSize { expected: IMAGE_BYTES, found: bytes.len() });
        }
        let words = bytes
            .chunks_exact(WORD_BYTES)
            .map(|pair| word_from_le([pair[0], pair[1]]))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self { words })
    }

    /// Place `program` at address 0, zero-filling the rest
    pub fn from_words(program: &[Word]) -> Result<Self, IsaError> {
        let mut image = Self::zeroed();
        image.write_at(0, program)?;
        Ok(image)
    }

    /// Read and parse an image file
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, IsaError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize to the on-disk format
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(IMAGE_BYTES);
        for &word in self.words.iter() {
            bytes.extend_from_slice(&word_to_le(word));
        }
        bytes
    }

    /// Write the on-disk format to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), IsaError> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// Copy `words` into the image starting at `origin`
    pub fn write_at(&mut self, origin: Address, words: &[Word]) -> Result<(), IsaError> {
        let start = origin as usize;
        let end = start + words.len();
        if end > MEMORY_WORDS {
            return Err(IsaError::ImageOverflow { origin, words: words.len() });
        }
        self.words[start..end].copy_from_slice(words);
        Ok(())
    }

    #[inline]
    pub fn word(&self, addr: Address) -> Word {
        self.words[addr as usize]
    }

    #[inline]
    pub fn set_word(&mut self, addr: Address, value: Word) {
        self.words[addr as usize] = value;
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Hex-encoded SHA-256 of the serialized image
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl std::fmt::Debug for MemoryImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
        f.debug_struct("MemoryImage").field("used_words", &used).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_rejects_wrong_size() {
        let err = MemoryImage::from_bytes(&[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            IsaError::InvalidImageSize { expected: IMAGE_BYTES, found: 10 }
        ));
        assert!(MemoryImage::from_bytes(&vec![0u8; IMAGE_BYTES + 2]).is_err());
    }

    #[test]
    fn test_little_endian_layout() {
        let image = MemoryImage::from_words(&[0x1234, 0xFF00]).unwrap();
        let bytes = image.to_bytes();
        assert_eq!(bytes.len(), IMAGE_BYTES);
        assert_eq!(&bytes[..4], &[0x34, 0x12, 0x00, 0xFF]);
        assert!(bytes[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_at_bounds() {
        let mut image = MemoryImage::zeroed();
        image.write_at(0xFFFE, &[1, 2]).unwrap();
        assert_eq!(image.word(0xFFFF), 2);
        assert!(matches!(
            image.write_at(0xFFFF, &[1, 2]),
            Err(IsaError::ImageOverflow { origin: 0xFFFF, words: 2 })
        ));
    }

    #[test]
    fn test_digest_tracks_contents() {
        let a = MemoryImage::zeroed();
        let mut b = MemoryImage::zeroed();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
        b.set_word(0x100, 1);
        assert_ne!(a.digest(), b.digest());
    }
}
