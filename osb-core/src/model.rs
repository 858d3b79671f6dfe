//! Domain records stored by the OSB backend.
//!
//! Ids are assigned by the store; a record that has not been inserted yet
//! carries id `0`.

use serde::{Deserialize, Serialize};

use crate::elapsed::Elapsed;

/// A registered account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Already hashed by the caller; compared verbatim by the store.
    pub password_hash: String,
}

/// One named benchmark metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Algorithm name
    pub name: String,
    /// Total elapsed time
    pub time: Elapsed,
    /// Total score
    pub score: f64,
}

pub type Scores = Vec<Score>;

/// A benchmark run submitted by a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub id: i64,
    pub user_id: i64,
    pub scores: Scores,
}

/// Hardware descriptor of the machine a result was produced on.
///
/// Everything is free text as reported by the client, except the
/// overclock flag. Absent fields decode to empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysInfo {
    pub vendor: String,
    pub model: String,
    #[serde(rename = "speed")]
    pub clock_speed: String,
    #[serde(rename = "threads")]
    pub thread_count: String,
    pub overclocked: bool,
    pub byte_order: String,
    #[serde(rename = "physical")]
    pub physical_mem: String,
    #[serde(rename = "virtual")]
    pub virtual_mem: String,
    #[serde(rename = "swap")]
    pub swap_mem: String,
}

/// Machine specs attached to one result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specs {
    pub id: i64,
    pub result_id: i64,
    #[serde(rename = "specs")]
    pub sys_info: SysInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sys_info_object_decodes_to_default() {
        let info: SysInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(info, SysInfo::default());
    }

    #[test]
    fn sys_info_uses_client_field_names() {
        let info: SysInfo = serde_json::from_str(
            r#"{"vendor":"GenuineIntel","speed":"3.6GHz","threads":"8","overclocked":true,"physical":"16GB"}"#,
        )
        .unwrap();

        assert_eq!(info.vendor, "GenuineIntel");
        assert_eq!(info.clock_speed, "3.6GHz");
        assert_eq!(info.thread_count, "8");
        assert!(info.overclocked);
        assert_eq!(info.physical_mem, "16GB");
        assert!(info.swap_mem.is_empty());
    }

    #[test]
    fn specs_nest_sys_info_under_specs_key() {
        let specs = Specs {
            id: 3,
            result_id: 6,
            sys_info: SysInfo {
                vendor: "AuthenticAMD".into(),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&specs).unwrap();
        assert_eq!(value["result_id"], 6);
        assert_eq!(value["specs"]["vendor"], "AuthenticAMD");
    }
}
