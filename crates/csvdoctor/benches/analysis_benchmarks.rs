//! Analysis and fix pipeline benchmarks.
//!
//! Measures detection, scoring and fixing on generated customer tables with
//! every kind of issue mixed in.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use csvdoctor::detect::DetectionEngine;
use csvdoctor::{Doctor, DoctorConfig, Parser, Session, Table, score};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate customer CSV with duplicates, blanks, mixed dates and outliers.
fn generate_customer_data(rows: usize) -> String {
    let mut data = String::new();

    data.push_str("id,name,age,email,signup_date,notes\n");

    let names = ["Alice Johnson", "Bob Smith", "Charlie Brown", "Dana Scully"];
    let notes = ["", "VIP", "it\u{2019}s late", "caf\u{00C3}\u{00A9} owner", "call back"];

    for row in 0..rows {
        // Every 20th row repeats the one before it.
        let id = if row % 20 == 19 { row - 1 } else { row };

        data.push_str(&format!("{},", id + 1));
        data.push_str(names[id % names.len()]);
        data.push(',');
        // age (blanks and one outlier every 500 rows)
        if id % 17 == 0 {
            data.push(',');
        } else if id % 500 == 1 {
            data.push_str("950,");
        } else {
            data.push_str(&format!("{},", 20 + id % 45));
        }
        data.push_str(&format!("user{}@email.com,", id));
        // signup_date (mixed formats)
        match id % 4 {
            0 | 1 => data.push_str(&format!("2023-{:02}-{:02}", id % 12 + 1, id % 28 + 1)),
            2 => data.push_str(&format!("{:02}/{:02}/2023", id % 12 + 1, id % 28 + 1)),
            _ => data.push_str(&format!("2023/{:02}/{:02}", id % 12 + 1, id % 28 + 1)),
        }
        data.push(',');
        data.push_str(notes[id % notes.len()]);
        data.push('\n');
    }

    data
}

fn load(data: &str) -> Table {
    Parser::new().parse_str(data).unwrap()
}

/// Benchmark detection with all rules.
fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_customer_data(*rows);
        let table = load(&data);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("parallel", rows), &table, |b, table| {
            let engine = DetectionEngine::new();
            b.iter(|| black_box(engine.detect(table)))
        });
        group.bench_with_input(BenchmarkId::new("sequential", rows), &table, |b, table| {
            let engine = DetectionEngine::new().with_parallel(false);
            b.iter(|| black_box(engine.detect(table)))
        });
    }

    group.finish();
}

/// Benchmark loading and analyzing a file end to end.
fn bench_analyze_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_file");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_customer_data(*rows);
        let bytes = data.len();

        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(BenchmarkId::new("customer_rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| black_box(Doctor::new().analyze_file(temp.path()).unwrap()),
            )
        });
    }

    group.finish();
}

/// Benchmark scoring an already-detected issue list.
fn bench_score(c: &mut Criterion) {
    let table = load(&generate_customer_data(1_000));
    let issues = DetectionEngine::new().detect(&table);

    c.bench_function("score_1k_rows", |b| {
        b.iter(|| black_box(score(&table, &issues)))
    });
}

/// Benchmark applying every auto-fix in a session.
fn bench_fix_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("fix_all");

    for rows in [100, 1_000].iter() {
        let table = load(&generate_customer_data(*rows));

        group.bench_with_input(BenchmarkId::new("customer_rows", rows), &table, |b, table| {
            b.iter_with_setup(
                || Session::new(table.clone(), DoctorConfig::default()),
                |mut session| black_box(session.fix_all().unwrap()),
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_detect,
    bench_analyze_file,
    bench_score,
    bench_fix_all,
);

criterion_main!(benches);
