use blast_radius::core::{CodebaseAnalyzer, ImpactAnalyzer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::Path;

fn write_codebase(root: &Path, modules: usize) {
    std::fs::create_dir_all(root).unwrap();
    for i in 0..modules {
        let previous = i.saturating_sub(1);
        let content = format!(
            r#"
from service_{previous} import Service{previous}


class Service{i}:
    def __init__(self):
        self.value = {i}
        self.upstream = Service{previous}()

    def process(self):
        return self.calculate() * 2

    def calculate(self):
        return self.upstream.process() + self.value


def main():
    instance = Service{i}()
    return instance.process()
"#
        );
        std::fs::write(root.join(format!("service_{}.py", i)), content).unwrap();
    }
}

fn benchmark_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("blast_radius");

    let small_dir = std::env::temp_dir().join("blast_radius_bench");
    write_codebase(&small_dir, 10);

    group.bench_function("small_codebase", |b| {
        b.iter(|| {
            let analyzer = CodebaseAnalyzer::new();
            let result = analyzer.analyze(black_box(&small_dir), black_box("Change Service0"));
            black_box(result)
        });
    });

    let large_dir = std::env::temp_dir().join("blast_radius_bench_large");
    write_codebase(&large_dir, 200);

    group.bench_function("large_codebase", |b| {
        b.iter(|| {
            let analyzer = CodebaseAnalyzer::new();
            let result = analyzer.analyze(black_box(&large_dir), black_box("Change Service0"));
            black_box(result)
        });
    });

    group.finish();
}

fn benchmark_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation");

    let dir = std::env::temp_dir().join("blast_radius_bench_graph");
    write_codebase(&dir, 200);
    let (graph, _) = CodebaseAnalyzer::new().build_graph(&dir).unwrap();

    group.bench_function("impact_from_root_service", |b| {
        b.iter(|| {
            let result = ImpactAnalyzer::new(&graph).analyze(black_box("Change Service0"));
            black_box(result)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_analysis, benchmark_propagation);
criterion_main!(benches);
