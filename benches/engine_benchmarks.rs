//! Performance benchmarks for the overtime ledger engine.
//!
//! - Segmenting one day per classification
//! - Recording a month of attendance for 100 employees
//! - Allocating leave against a long credit history
//! - A full batch run
//! - One `POST /segment` round trip through the router
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use overtime_ledger::api::{AppState, create_router};
use overtime_ledger::batch::{Engine, InMemoryAttendanceSource, LeaveSubmission, run_batch};
use overtime_ledger::calculation::segment;
use overtime_ledger::config::{AllocationMode, ConfigLoader};
use overtime_ledger::ledger::{Ledger, SequenceCounter, allocate};
use overtime_ledger::models::{DailyWorkRecord, DayClassification, LeaveId};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn clock_in() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2025-08-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

/// One month of daily records: weekdays at 10h, weekends at 9h.
fn month_of_records(employee_id: &str) -> Vec<DailyWorkRecord> {
    let start = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    (0..31)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let day_classification = DayClassification::resolve(date, false, false);
            let hours = match day_classification {
                DayClassification::Weekday => Decimal::from(10),
                _ => Decimal::from(9),
            };
            DailyWorkRecord {
                employee_id: employee_id.to_string(),
                date,
                day_classification,
                clock_in: date.and_hms_opt(8, 0, 0).unwrap(),
                total_worked_hours: hours,
                source_reference: None,
            }
        })
        .collect()
}

fn ledger_with(records: &[DailyWorkRecord]) -> Ledger {
    let mut ledger = Ledger::new();
    for record in records {
        let segments = segment(
            record.day_classification,
            record.clock_in,
            record.total_worked_hours,
        );
        ledger.create(record, &segments).unwrap();
    }
    ledger
}

/// Benchmark: segmenting one 11.5h day per classification.
fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    let hours = Decimal::new(115, 1);

    for classification in [
        DayClassification::Weekday,
        DayClassification::Restday,
        DayClassification::StatutoryHoliday,
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(classification),
            &classification,
            |b, &classification| {
                b.iter(|| segment(black_box(classification), black_box(clock_in()), black_box(hours)))
            },
        );
    }

    group.finish();
}

/// Benchmark: recording a month of attendance for 100 employees.
fn bench_ledger_create(c: &mut Criterion) {
    let records: Vec<DailyWorkRecord> = (0..100)
        .flat_map(|i| month_of_records(&format!("E{:03}", i)))
        .collect();

    let mut group = c.benchmark_group("ledger_create");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("100_employees_month", |b| {
        b.iter(|| black_box(ledger_with(&records)))
    });
    group.finish();
}

/// Benchmark: one leave request spread over a month of credits.
fn bench_allocate(c: &mut Criterion) {
    let ledger = ledger_with(&month_of_records("E001"));
    let leave_id = LeaveId::new(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(), "E001", 1);

    let mut group = c.benchmark_group("allocate");
    for mode in [AllocationMode::Atomic, AllocationMode::PartialCommit] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", mode)),
            &mode,
            |b, &mode| {
                b.iter_batched(
                    || ledger.clone(),
                    |mut ledger| {
                        allocate(&mut ledger, "E001", Decimal::from(40), &leave_id, mode).unwrap()
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

/// Benchmark: a batch run over 100 employees with one leave request each.
fn bench_batch_run(c: &mut Criterion) {
    let employees: Vec<String> = (0..100).map(|i| format!("E{:03}", i)).collect();
    let source = InMemoryAttendanceSource::with_records(
        employees.iter().flat_map(|e| month_of_records(e)),
    );
    let submissions: Vec<LeaveSubmission> = employees
        .iter()
        .map(|e| LeaveSubmission {
            employee_id: e.clone(),
            requested_hours: Decimal::from(16),
            application_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            leave_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
            note: String::new(),
        })
        .collect();

    c.bench_function("batch_100_employees", |b| {
        b.iter_batched(
            || (Engine::new(ConfigLoader::default()), source.clone()),
            |(mut engine, mut source)| {
                run_batch(
                    &mut engine,
                    &mut source,
                    &employees,
                    &submissions,
                    None,
                    SequenceCounter::default(),
                )
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

/// Benchmark: one POST /segment round trip.
fn bench_http_segment(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(ConfigLoader::default()));
    let body = serde_json::json!({
        "day_classification": "WEEKDAY",
        "clock_in": "2025-08-01T08:00:00",
        "total_worked_hours": "11.5",
    })
    .to_string();

    c.bench_function("http_segment", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/segment")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_segment,
    bench_ledger_create,
    bench_allocate,
    bench_batch_run,
    bench_http_segment,
);
criterion_main!(benches);
