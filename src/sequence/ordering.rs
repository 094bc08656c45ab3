//! Step ordering keys derived from export folder names
//!
//! Export folders are named `EXPORT_STEP<n>` or `EXPORT_STEP<n>_Subsetup<m>`, with a
//! bare `EXPORT` folder holding the final setup. Names are matched case-insensitively
//! and may carry a prefix (`Patient12_EXPORT_STEP3`) or trailing text.

use log::warn;
use std::cmp::Ordering;

const EXPORT: &str = "EXPORT";
const STEP: &str = "_STEP";
const SUBSETUP: &str = "_SUBSETUP";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderingKey {
    Step { step: u64, subsetup: Option<u64> },
    /// Bare `EXPORT`, sorts after every step.
    Final,
}

impl OrderingKey {
    /// Key for a folder name. Names matching no pattern are ordered as step 0.
    pub fn for_folder(folder: &str) -> Self {
        match Self::parse(folder) {
            Some(key) => key,
            None => {
                warn!("sequencing_anomaly: folder {:?} has no step pattern, using step 0", folder);
                OrderingKey::Step {
                    step: 0,
                    subsetup: None,
                }
            }
        }
    }

    pub fn parse(folder: &str) -> Option<Self> {
        let upper = folder.to_ascii_uppercase();
        let start = upper.rfind(EXPORT)?;
        let rest = &upper[start + EXPORT.len()..];
        if rest.is_empty() {
            return Some(OrderingKey::Final);
        }

        let (step, rest) = leading_number(rest.strip_prefix(STEP)?)?;
        let subsetup = rest
            .strip_prefix(SUBSETUP)
            .and_then(leading_number)
            .map(|(m, _)| m);

        Some(OrderingKey::Step { step, subsetup })
    }

    // (final?, n, plain-after-subsetup, m)
    fn rank(&self) -> (u8, u64, u8, u64) {
        match *self {
            OrderingKey::Step {
                step,
                subsetup: Some(m),
            } => (0, step, 0, m),
            OrderingKey::Step {
                step,
                subsetup: None,
            } => (0, step, 1, 0),
            OrderingKey::Final => (1, 0, 0, 0),
        }
    }
}

impl Ord for OrderingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for OrderingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stable sort of folder names by their ordering key.
pub fn sort_folder_names<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by_cached_key(|name| OrderingKey::for_folder(name.as_ref()));
}

fn leading_number(input: &str) -> Option<(u64, &str)> {
    let digits = input.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = input[..digits].parse().ok()?;
    Some((value, &input[digits..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_step_and_subsetup() {
        assert_eq!(
            OrderingKey::parse("EXPORT_STEP3_Subsetup2"),
            Some(OrderingKey::Step {
                step: 3,
                subsetup: Some(2)
            })
        );
        assert_eq!(
            OrderingKey::parse("export_step12"),
            Some(OrderingKey::Step {
                step: 12,
                subsetup: None
            })
        );
        assert_eq!(OrderingKey::parse("EXPORT"), Some(OrderingKey::Final));
    }

    #[test]
    fn tolerates_prefix_and_trailing_text() {
        assert_eq!(
            OrderingKey::parse("Case 7 - EXPORT_STEP4 (copy)"),
            Some(OrderingKey::Step {
                step: 4,
                subsetup: None
            })
        );
        assert_eq!(
            OrderingKey::parse("EXPORT_STEP5_Subsetup"),
            Some(OrderingKey::Step {
                step: 5,
                subsetup: None
            })
        );
    }

    #[test]
    fn unmatched_names_fall_back_to_step_zero() {
        assert_eq!(OrderingKey::parse("scans"), None);
        assert_eq!(OrderingKey::parse("EXPORT_final"), None);
        assert_eq!(
            OrderingKey::for_folder("scans"),
            OrderingKey::Step {
                step: 0,
                subsetup: None
            }
        );
    }

    #[test]
    fn sorts_subsetups_before_plain_step_and_bare_export_last() {
        let mut names = vec!["EXPORT_STEP2", "EXPORT_STEP1_Subsetup2", "EXPORT_STEP1", "EXPORT"];
        sort_folder_names(&mut names);
        assert_eq!(
            names,
            vec!["EXPORT_STEP1_Subsetup2", "EXPORT_STEP1", "EXPORT_STEP2", "EXPORT"]
        );
    }

    #[test]
    fn step_numbers_compare_numerically() {
        let mut names = vec![
            "EXPORT_STEP10",
            "EXPORT_STEP9",
            "EXPORT_STEP9_Subsetup10",
            "EXPORT_STEP9_Subsetup2",
        ];
        sort_folder_names(&mut names);
        assert_eq!(
            names,
            vec![
                "EXPORT_STEP9_Subsetup2",
                "EXPORT_STEP9_Subsetup10",
                "EXPORT_STEP9",
                "EXPORT_STEP10"
            ]
        );
    }

    #[test]
    fn equal_keys_keep_discovery_order() {
        let mut names = vec!["misc", "EXPORT_STEP1", "other", "export_step1"];
        sort_folder_names(&mut names);
        assert_eq!(names, vec!["misc", "other", "EXPORT_STEP1", "export_step1"]);
    }
}
