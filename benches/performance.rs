// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for the song store
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Note insertion with the slot uniqueness scan
//! - Slot lookups on a populated song
//! - Export and import of a large collection

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use midi_editor::{MemoryStorage, NoteDraft, SongDraft, SongId, SongStore};

/// Slot for the i-th note: tracks fill first, then time advances in quarter seconds
fn slot(i: usize) -> (u8, f64) {
    ((i % 8) as u8 + 1, (i / 8) as f64 * 0.25)
}

fn populated_store(songs: usize, notes_per_song: usize) -> (SongStore<MemoryStorage>, SongId) {
    let mut store = SongStore::open(MemoryStorage::new()).unwrap();
    let mut first = None;
    for s in 0..songs {
        let song = store
            .create_song(SongDraft::new(format!("Song {}", s)).with_duration(600.0))
            .unwrap();
        if first.is_none() {
            first = Some(song.id());
        }
        for i in 0..notes_per_song {
            let (track, time) = slot(i);
            store
                .add_note(song.id(), NoteDraft::new(track, time, format!("Note {}", i)))
                .unwrap();
        }
    }
    (store, first.unwrap())
}

/// Benchmark adding one note to songs of growing size
fn bench_add_note(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_note");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("into_song", size), size, |b, &size| {
            b.iter_batched(
                || populated_store(1, size),
                |(mut store, song_id)| {
                    let (track, time) = slot(size);
                    black_box(store.add_note(song_id, NoteDraft::new(track, time, "new")))
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

/// Benchmark the slot conflict scan on its own
fn bench_conflict_lookup(c: &mut Criterion) {
    let (store, song_id) = populated_store(1, 1000);
    let song = store.song(song_id).unwrap();
    let (track, time) = slot(999);

    c.bench_function("conflicting_note_hit", |b| {
        b.iter(|| black_box(song.conflicting_note(black_box(track), black_box(time), None)))
    });

    c.bench_function("conflicting_note_miss", |b| {
        b.iter(|| black_box(song.conflicting_note(black_box(8), black_box(599.0), None)))
    });
}

/// Benchmark export and import of 20 songs with 200 notes each
fn bench_export_import(c: &mut Criterion) {
    let (mut store, _) = populated_store(20, 200);
    let exported = store.export_data().unwrap();

    c.bench_function("export_data", |b| b.iter(|| black_box(store.export_data().unwrap())));

    let mut group = c.benchmark_group("import_data");
    for strict in [true, false] {
        group.bench_with_input(BenchmarkId::new("strict", strict), &strict, |b, &strict| {
            b.iter_batched(
                || SongStore::open(MemoryStorage::new()).unwrap().with_strict_import(strict),
                |mut target| black_box(target.import_data(&exported).unwrap()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_add_note,
    bench_conflict_lookup,
    bench_export_import,
);

criterion_main!(benches);
