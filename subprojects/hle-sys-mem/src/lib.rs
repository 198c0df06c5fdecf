//! Emulated kernel memory objects.
//!
//! Horizon OS services hand memory to guest processes through kernel objects that the
//! guest maps into its own address space. This crate provides the host-side backing for
//! those objects; mapping into guest address space is done by the memory manager, which
//! only needs a byte view of the object.

pub mod shmem;

pub use self::shmem::{Permissions, ReadError, SharedMemory, WriteError};
