//! Fuzz target for detection, scoring and fixing.
//!
//! Input is read as comma-separated text (lossily decoded) and padded into a
//! table. The fuzzer checks that:
//! 1. Detection never panics and is deterministic
//! 2. The score stays within 0..=100
//! 3. Every auto-fixable issue fixes cleanly and outliers never do
//! 4. A second application of a fix changes nothing

#![no_main]

use csvdoctor::{Table, apply_fix, detect, score};
use libfuzzer_sys::fuzz_target;

fn table_from(text: &str) -> Option<Table> {
    let mut lines = text.lines();
    let headers: Vec<String> = lines.next()?.split(',').map(str::to_string).collect();
    let width = headers.len();

    let rows = lines
        .take(200)
        .map(|line| {
            let mut row: Vec<String> = line.split(',').map(str::to_string).collect();
            row.resize(width, String::new());
            row
        })
        .collect();

    Table::new(headers, rows).ok()
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 20_000 {
        return;
    }

    let text = String::from_utf8_lossy(data);
    let Some(table) = table_from(&text) else {
        return;
    };

    let issues = detect(&table);
    assert_eq!(issues, detect(&table));
    assert!(score(&table, &issues) <= 100);

    for issue in &issues {
        match apply_fix(&table, issue) {
            Ok(fixed) => {
                assert!(issue.auto_fixable);
                let again = apply_fix(&fixed.table, issue).expect("second fix");
                assert_eq!(again.resolved_count, 0);
            }
            Err(_) => assert!(!issue.auto_fixable),
        }
    }
});
