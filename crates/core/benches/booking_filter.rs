use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use shareit_core::booking::filter_bookings;
use shareit_core::{Booking, BookingId, BookingState, BookingStatus, ItemId, PageRequest, UserId};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Bookings spread around `now` with a mix of statuses.
fn bookings(n: usize) -> Vec<Booking> {
    let statuses = [
        BookingStatus::Waiting,
        BookingStatus::Approved,
        BookingStatus::Rejected,
        BookingStatus::Canceled,
    ];
    (0..n)
        .map(|i| {
            let offset = (i as i64 * 37) % 2_000 - 1_000;
            Booking {
                id: BookingId::from_raw(i as i64 + 1),
                start: now() + Duration::minutes(offset),
                end: now() + Duration::minutes(offset + 90),
                item_id: ItemId::from_raw(1),
                booker_id: UserId::from_raw(2),
                status: statuses[i % statuses.len()],
            }
        })
        .collect()
}

fn bench_filter_by_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("booking_filter");
    let page = PageRequest::new(0, 10).unwrap();

    for size in [100usize, 1_000, 10_000] {
        let input = bookings(size);
        group.throughput(Throughput::Elements(size as u64));

        for state in [BookingState::All, BookingState::Current, BookingState::Waiting] {
            group.bench_with_input(
                BenchmarkId::new(state.as_str(), size),
                &input,
                |b, input| {
                    b.iter(|| {
                        filter_bookings(black_box(input.clone()), state, page, now(), |b| b)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_deep_page(c: &mut Criterion) {
    let input = bookings(10_000);
    let page = PageRequest::new(9_000, 50).unwrap();

    c.bench_function("booking_filter/deep_page", |b| {
        b.iter(|| filter_bookings(black_box(input.clone()), BookingState::All, page, now(), |b| b));
    });
}

criterion_group!(benches, bench_filter_by_state, bench_deep_page);
criterion_main!(benches);
