//! Integration tests for the filter predicates.
//!
//! A record passes if and only if it satisfies every active filter, so each
//! filter is toggled on its own against the same fixed record set.

use procpair::{filter_records, FilterCriteria, ProcessRecord};

fn record(pid: u32, command: &str, memory_kb: u64, cpu_ticks: u64, uid: u32, user: &str) -> ProcessRecord {
    ProcessRecord {
        pid,
        command: command.to_string(),
        memory_kb,
        cpu_ticks,
        state: "S".to_string(),
        nice: 0,
        start_epoch: 0,
        start_formatted: String::new(),
        uid,
        user: user.to_string(),
    }
}

fn fixture() -> Vec<ProcessRecord> {
    vec![
        record(1, "systemd", 12_000, 5_000, 0, "root"),
        record(2, "nginx: worker", 40_000, 800, 33, "www-data"),
        record(3, "nginx: master", 8_000, 20, 0, "root"),
        record(4, "python3 app.py", 150_000, 90_000, 1000, "alice"),
        record(5, "bash", 4_000, 10, 1000, "Alice"),
        record(6, "(sd-pam)", 0, 0, 0, "toor"),
    ]
}

fn pids(criteria: &FilterCriteria) -> Vec<u32> {
    filter_records(fixture(), criteria)
        .records()
        .iter()
        .map(|r| r.pid)
        .collect()
}

#[test]
fn test_no_filters_match_everything() {
    assert_eq!(pids(&FilterCriteria::default()), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_min_memory_only() {
    let criteria = FilterCriteria {
        min_memory_kb: 10_000,
        ..Default::default()
    };
    assert_eq!(pids(&criteria), vec![1, 2, 4]);
}

#[test]
fn test_max_memory_only_is_inclusive() {
    let criteria = FilterCriteria {
        max_memory_kb: Some(8_000),
        ..Default::default()
    };
    assert_eq!(pids(&criteria), vec![3, 5, 6]);
}

#[test]
fn test_min_cpu_only() {
    let criteria = FilterCriteria {
        min_cpu_ticks: 800,
        ..Default::default()
    };
    assert_eq!(pids(&criteria), vec![1, 2, 4]);
}

#[test]
fn test_command_substring_is_case_sensitive() {
    let criteria = FilterCriteria {
        command: Some("nginx".to_string()),
        ..Default::default()
    };
    assert_eq!(pids(&criteria), vec![2, 3]);

    let criteria = FilterCriteria {
        command: Some("NGINX".to_string()),
        ..Default::default()
    };
    assert!(pids(&criteria).is_empty());
}

#[test]
fn test_numeric_owner_matches_uid_regardless_of_name() {
    let criteria = FilterCriteria {
        owner: Some("0".to_string()),
        ..Default::default()
    };
    // pid 6 is uid 0 with a non-root name
    assert_eq!(pids(&criteria), vec![1, 3, 6]);
}

#[test]
fn test_owner_name_is_case_insensitive() {
    let criteria = FilterCriteria {
        owner: Some("Root".to_string()),
        ..Default::default()
    };
    assert_eq!(pids(&criteria), vec![1, 3]);

    let criteria = FilterCriteria {
        owner: Some("ALICE".to_string()),
        ..Default::default()
    };
    assert_eq!(pids(&criteria), vec![4, 5]);
}

#[test]
fn test_owner_name_requires_equality_not_substring() {
    let criteria = FilterCriteria {
        owner: Some("www".to_string()),
        ..Default::default()
    };
    assert!(pids(&criteria).is_empty());
}

#[test]
fn test_filters_combine_as_conjunction() {
    let all = FilterCriteria {
        min_memory_kb: 5_000,
        max_memory_kb: Some(50_000),
        min_cpu_ticks: 10,
        command: Some("nginx".to_string()),
        owner: Some("root".to_string()),
    };
    assert_eq!(pids(&all), vec![3]);

    // The conjunction equals the intersection of each filter applied alone.
    let singles = [
        FilterCriteria {
            min_memory_kb: 5_000,
            ..Default::default()
        },
        FilterCriteria {
            max_memory_kb: Some(50_000),
            ..Default::default()
        },
        FilterCriteria {
            min_cpu_ticks: 10,
            ..Default::default()
        },
        FilterCriteria {
            command: Some("nginx".to_string()),
            ..Default::default()
        },
        FilterCriteria {
            owner: Some("root".to_string()),
            ..Default::default()
        },
    ];
    let intersection: Vec<u32> = fixture()
        .iter()
        .filter(|r| singles.iter().all(|c| c.matches(r)))
        .map(|r| r.pid)
        .collect();
    assert_eq!(intersection, pids(&all));
}
