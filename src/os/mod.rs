//! Operating system abstraction layer
//!
//! Provides the one OS service the hashing code needs: cryptographically
//! secure random bytes for salt generation. Platform-specific
//! implementations are selected at compile time and each exposes the same
//! `sys_random` function.
//!
//! Nothing inside the memory-hard core touches this module. Hashing is a
//! deterministic function of its inputs; only `hash_password` reaches for
//! OS entropy to draw a fresh salt.

#[cfg(target_os = "macos")]
pub(crate) mod macos;

#[cfg(target_os = "macos")]
pub(crate) use macos::*;

#[cfg(target_os = "linux")]
pub(crate) mod linux;

#[cfg(target_os = "linux")]
pub(crate) use linux::*;

#[cfg(target_os = "windows")]
pub(crate) mod windows;

#[cfg(target_os = "windows")]
pub(crate) use windows::*;
