//! Infrastructure shared by the library and the replay binary.

pub mod logging;
