use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wallkit_core::Wall;
use wallkit_planner::{plan_coverage, TrajectoryAnalyzer};

fn bench_plan_coverage(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_coverage");
    for robot_width in [0.5, 0.2, 0.05] {
        let wall = Wall::new(12.0, 6.0).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(robot_width),
            &robot_width,
            |b, &robot_width| {
                b.iter(|| plan_coverage(black_box(&wall), &[], robot_width, 0.1).unwrap())
            },
        );
    }
    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let wall = Wall::new(12.0, 6.0).unwrap();
    let trajectory = plan_coverage(&wall, &[], 0.05, 0.1).unwrap();
    c.bench_function("trajectory_stats", |b| {
        b.iter(|| TrajectoryAnalyzer::new(black_box(&trajectory)).stats())
    });
}

criterion_group!(benches, bench_plan_coverage, bench_analysis);
criterion_main!(benches);
