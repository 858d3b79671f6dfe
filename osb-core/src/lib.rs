//! osb-core: records and storage encoding for OSB benchmark results.

pub mod codec;
pub mod elapsed;
pub mod error;
pub mod model;

pub use codec::{decode_scores, decode_sys_info, encode_scores, encode_sys_info};
pub use elapsed::{Elapsed, ElapsedError};
pub use error::CodecError;
pub use model::{BenchmarkResult, Score, Scores, Specs, SysInfo, User};
