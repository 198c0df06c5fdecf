//! Shared-memory kernel object.
//!
//! A [`SharedMemory`] is a fixed-size, zero-initialized byte region shared between an
//! emulated service (the owner) and a guest process (the remote mapper). The owner writes
//! whole records with [`SharedMemory::write`]; the guest side reads through
//! [`SharedMemory::read`] or [`SharedMemory::with_bytes`].
//!
//! Every write is a single copy performed under the region's write lock, so a reader never
//! observes a record half-written.

use bitflags::bitflags;
use parking_lot::RwLock;

bitflags! {
    /// Memory permissions for shared-memory mappings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct Permissions: u32 {
        /// No permissions
        const NONE = 0;
        /// Read permission
        const R = 1 << 0;
        /// Write permission
        const W = 1 << 1;
        /// Read/write permissions
        const RW = Self::R.bits() | Self::W.bits();
        /// Let the remote side pick its own permissions
        const DONT_CARE = 1 << 28;
    }
}

/// Shared memory kernel object.
pub struct SharedMemory {
    name: &'static str,
    local_perm: Permissions,
    remote_perm: Permissions,
    data: RwLock<Box<[u8]>>,
}

impl SharedMemory {
    /// Create a new zero-filled shared-memory object.
    pub fn create(
        size: usize,
        local_perm: Permissions,
        remote_perm: Permissions,
        name: &'static str,
    ) -> Self {
        Self {
            name,
            local_perm,
            remote_perm,
            data: RwLock::new(vec![0u8; size].into_boxed_slice()),
        }
    }

    /// Returns the object's debug name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the size of the region in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.read().len()
    }

    /// Returns the permissions of the owner's mapping.
    #[inline]
    pub fn local_perm(&self) -> Permissions {
        self.local_perm
    }

    /// Returns the permissions granted to the remote mapper.
    #[inline]
    pub fn remote_perm(&self) -> Permissions {
        self.remote_perm
    }

    /// Copy `bytes` into the region at `offset` in one step.
    ///
    /// Nothing is written if the range does not fit inside the region.
    pub fn write(&self, offset: usize, bytes: &[u8]) -> Result<(), WriteError> {
        let mut data = self.data.write();
        let size = data.len();
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= size)
            .ok_or(WriteError {
                offset,
                len: bytes.len(),
                size,
            })?;

        data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Read `len` bytes starting at `offset`.
    pub fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>, ReadError> {
        let data = self.data.read();
        let size = data.len();
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= size)
            .ok_or(ReadError { offset, len, size })?;

        Ok(data[offset..end].to_vec())
    }

    /// Run `f` over a consistent view of the whole region.
    ///
    /// Writers are blocked while `f` runs.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.data.read()[..])
    }
}

impl core::fmt::Debug for SharedMemory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedMemory")
            .field("name", &self.name)
            .field("size", &format_args!("{:#x}", self.size()))
            .field("local_perm", &self.local_perm)
            .field("remote_perm", &self.remote_perm)
            .finish()
    }
}

/// Error returned by [`SharedMemory::write`].
#[derive(Debug, thiserror::Error)]
#[error("write of {len:#x} bytes at {offset:#x} exceeds shared memory size {size:#x}")]
pub struct WriteError {
    pub offset: usize,
    pub len: usize,
    pub size: usize,
}

/// Error returned by [`SharedMemory::read`].
#[derive(Debug, thiserror::Error)]
#[error("read of {len:#x} bytes at {offset:#x} exceeds shared memory size {size:#x}")]
pub struct ReadError {
    pub offset: usize,
    pub len: usize,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_is_zero_filled() {
        let shmem = SharedMemory::create(0x1000, Permissions::RW, Permissions::R, "test");
        assert_eq!(shmem.size(), 0x1000);
        assert!(shmem.with_bytes(|bytes| bytes.iter().all(|&b| b == 0)));
    }

    #[test]
    fn test_write_then_read() {
        let shmem = SharedMemory::create(0x100, Permissions::RW, Permissions::R, "test");
        shmem.write(0x10, &[1, 2, 3, 4]).unwrap();
        assert_eq!(shmem.read(0x0F, 6).unwrap(), vec![0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_write_out_of_bounds_writes_nothing() {
        let shmem = SharedMemory::create(0x100, Permissions::RW, Permissions::R, "test");
        let err = shmem.write(0xFE, &[0xAA; 4]).unwrap_err();
        assert_eq!((err.offset, err.len, err.size), (0xFE, 4, 0x100));
        assert_eq!(shmem.read(0xFE, 2).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_offset_overflow_is_rejected() {
        let shmem = SharedMemory::create(0x100, Permissions::RW, Permissions::R, "test");
        assert!(shmem.write(usize::MAX, &[1]).is_err());
        assert!(shmem.read(usize::MAX, 2).is_err());
    }
}
