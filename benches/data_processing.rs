//! Benchmarks for staged actions and filter execution
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use filterpipe_rs::data::Payload;
use filterpipe_rs::filter::{CancelToken, MessageHandler};
use filterpipe_rs::filters::FillArrayFilter;
use filterpipe_rs::{
    ActionMode, Arguments, DataAction, DataArray, DataPath, DataStructure, DataType, Filter,
    OutputActions,
};

fn group_actions(count: usize) -> OutputActions {
    (0..count)
        .map(|i| {
            let path = if i % 4 == 0 {
                DataPath::new([format!("G{}", i)])
            } else {
                DataPath::new([format!("G{}", i - i % 4), format!("C{}", i)])
            };
            DataAction::CreateGroup { path }
        })
        .collect()
}

fn bench_apply_actions(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_actions");

    for size in [100, 1_000, 10_000].iter() {
        let actions = group_actions(*size);
        group.throughput(Throughput::Elements(*size as u64));

        for mode in [ActionMode::Preview, ActionMode::Commit] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), size),
                &actions,
                |b, actions| {
                    b.iter(|| {
                        let mut data = DataStructure::new();
                        actions.apply_all(&mut data, mode).unwrap();
                        black_box(data.len())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_preview_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview_copy");

    for tuples in [1_000, 100_000, 1_000_000].iter() {
        let mut data = DataStructure::new();
        for i in 0..8 {
            let array =
                DataArray::filled(DataType::Float32, vec![*tuples], vec![3], "1.5").unwrap();
            data.insert_at(&DataPath::new([format!("A{}", i)]), Payload::Array(array))
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(tuples), &data, |b, data| {
            b.iter(|| black_box(data.preview_copy().len()));
        });
    }

    group.finish();
}

fn bench_fill_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_array");

    for tuples in [10_000, 1_000_000].iter() {
        group.throughput(Throughput::Elements(*tuples as u64));
        let mut data = DataStructure::new();
        let array = DataArray::filled(DataType::Float64, vec![*tuples], vec![1], "0").unwrap();
        data.insert_at(&DataPath::new(["Values"]), Payload::Array(array))
            .unwrap();
        let args = Arguments::new()
            .with(FillArrayFilter::ARRAY_PATH, DataPath::new(["Values"]))
            .with(FillArrayFilter::VALUE, "2.25");
        let messages = MessageHandler::noop();
        let cancel = CancelToken::new();

        group.bench_function(BenchmarkId::from_parameter(tuples), |b| {
            b.iter(|| {
                let result = FillArrayFilter.execute(&mut data, &args, None, &messages, &cancel);
                black_box(result.is_ok())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_actions, bench_preview_copy, bench_fill_array);
criterion_main!(benches);
