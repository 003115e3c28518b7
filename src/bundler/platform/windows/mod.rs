//! Windows (MSYS2) packaging support.
//!
//! # Pipeline
//!
//! 1. `ldd` lists the executable's DLLs; those under the Windows directory
//!    (default `/c/Windows`, any case) are dropped
//! 2. [`dlls`] copies the rest into the output directory and writes an
//!    `<id>.exe` copy of the executable
//!
//! # Build Requirements
//!
//! | Step | Required Tools | Notes |
//! |------|----------------|-------|
//! | Discovery | `ldd` | Ships with MSYS2 |

pub mod dlls;
