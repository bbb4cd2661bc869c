//! Memory subsystem
//!
//! 64 Ki words, zeroed at construction, held as a full [`MemoryImage`].
//! Every `Address` is in range, so reads and writes cannot fail.

use crate::error::{Result, RuntimeError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use vm16_isa::{Address, MemoryImage, Word, IMAGE_BYTES};

#[derive(Clone)]
pub struct Memory {
    image: MemoryImage,
}

impl Memory {
    pub fn new() -> Self {
        Memory { image: MemoryImage::zeroed() }
    }

    #[inline]
    pub fn read(&self, addr: Address) -> Word {
        self.image.word(addr)
    }

    #[inline]
    pub fn write(&mut self, addr: Address, value: Word) {
        self.image.set_word(addr, value);
    }

    /// Replace the whole contents with `image`
    pub fn load_image(&mut self, image: &MemoryImage) {
        self.image.clone_from(image);
    }

    /// Bulk-load a binary image file.
    ///
    /// The file must be exactly [`IMAGE_BYTES`] long. On any failure memory
    /// is left as it was.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let load_error = |reason: String| RuntimeError::MemoryLoad { path: path.to_path_buf(), reason };

        let bytes = {
            let mut file = File::open(path).map_err(|e| load_error(e.to_string()))?;
            let len = file.metadata().map_err(|e| load_error(e.to_string()))?.len();
            if len != IMAGE_BYTES as u64 {
                return Err(load_error(format!("expected {} bytes, found {}", IMAGE_BYTES, len)));
            }
            let mut bytes = vec![0u8; IMAGE_BYTES];
            file.read_exact(&mut bytes).map_err(|e| load_error(e.to_string()))?;
            bytes
        };

        let image = MemoryImage::from_bytes(&bytes).map_err(|e| load_error(e.to_string()))?;
        debug!(path = %path.display(), digest = %image.digest(), "loaded memory image");
        self.image = image;
        Ok(())
    }

    /// Snapshot of the current contents
    pub fn to_image(&self) -> MemoryImage {
        self.image.clone()
    }

    pub fn as_slice(&self) -> &[Word] {
        self.image.words()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nonzero = self.as_slice().iter().filter(|&&w| w != 0).count();
        f.debug_struct("Memory").field("nonzero_words", &nonzero).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_memory_read_write() {
        let mut mem = Memory::new();
        assert_eq!(mem.read(0xFFFF), 0);
        mem.write(0xFFFF, 0xBEEF);
        assert_eq!(mem.read(0xFFFF), 0xBEEF);
        assert_eq!(mem.read(0), 0);
    }

    #[test]
    fn test_snapshot_covers_whole_address_space() {
        let mut mem = Memory::new();
        mem.write(0x0000, 0x1111);
        mem.write(0x8000, 0x2222);
        mem.write(0xFFFF, 0x3333);

        let image = mem.to_image();
        assert_eq!(image.words(), mem.as_slice());
        assert_eq!(image.word(0xFFFF), 0x3333);
        assert_eq!(image.word(0x8000), 0x2222);

        // The snapshot is a copy
        mem.write(0xFFFF, 0);
        assert_eq!(image.word(0xFFFF), 0x3333);
    }

    #[test]
    fn test_load_image_replaces_everything() {
        let mut mem = Memory::new();
        mem.write(0xFFFE, 9);
        let image = MemoryImage::from_words(&[5, 6]).unwrap();
        mem.load_image(&image);

        assert_eq!(mem.read(0), 5);
        assert_eq!(mem.read(1), 6);
        assert_eq!(mem.read(0xFFFE), 0);
    }

    #[test]
    fn test_load_from_path_roundtrip() {
        let image = MemoryImage::from_words(&[1, 2, 3, 0x8000]).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&image.to_bytes()).unwrap();

        let mut mem = Memory::new();
        mem.load_from_path(file.path()).unwrap();
        assert_eq!(&mem.as_slice()[..4], &[1, 2, 3, 0x8000]);
        assert_eq!(mem.to_image(), image);
    }

    #[test]
    fn test_load_wrong_size_leaves_memory_untouched() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xFF; 100]).unwrap();

        let mut mem = Memory::new();
        mem.write(7, 7);
        let err = mem.load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, RuntimeError::MemoryLoad { .. }));
        assert!(err.to_string().contains("found 100"));
        assert_eq!(mem.read(7), 7);
        assert_eq!(mem.read(0), 0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut mem = Memory::new();
        let err = mem.load_from_path(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, RuntimeError::MemoryLoad { .. }));
    }
}
