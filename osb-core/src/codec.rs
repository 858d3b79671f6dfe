//! JSON blobs stored in the `Results` and `Specs` tables.

use crate::error::CodecError;
use crate::model::{Scores, SysInfo};

pub const SCORES_COLUMN: &str = "scores_json";
pub const SYS_INFO_COLUMN: &str = "sys_info_json";

pub fn encode_scores(scores: &Scores) -> Result<String, CodecError> {
    serde_json::to_string(scores).map_err(|source| CodecError::Encode {
        column: SCORES_COLUMN,
        source,
    })
}

pub fn decode_scores(blob: &str) -> Result<Scores, CodecError> {
    serde_json::from_str(blob).map_err(|source| CodecError::Decode {
        column: SCORES_COLUMN,
        source,
    })
}

pub fn encode_sys_info(info: &SysInfo) -> Result<String, CodecError> {
    serde_json::to_string(info).map_err(|source| CodecError::Encode {
        column: SYS_INFO_COLUMN,
        source,
    })
}

pub fn decode_sys_info(blob: &str) -> Result<SysInfo, CodecError> {
    serde_json::from_str(blob).map_err(|source| CodecError::Decode {
        column: SYS_INFO_COLUMN,
        source,
    })
}
