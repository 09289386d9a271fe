use criterion::{criterion_group, criterion_main, Criterion};
use mazes::grid::Grid;
use mazes::units::SideLength;

fn bench_grid_11(c: &mut Criterion) {
    c.bench_function("grid_11", |b| b.iter(|| Grid::build(SideLength(11)).unwrap()));
}

fn bench_grid_128(c: &mut Criterion) {
    c.bench_function("grid_128", |b| b.iter(|| Grid::build(SideLength(128)).unwrap()));
}

fn bench_grid_500(c: &mut Criterion) {
    c.bench_function("grid_500", |b| b.iter(|| Grid::build(SideLength(500)).unwrap()));
}

fn bench_index_to_gridcoordinate(c: &mut Criterion) {
    let g = Grid::build(SideLength(11)).unwrap();
    c.bench_function("index_to_gridcoordinate", move |b| b.iter(|| g.coordinate_of(93)));
}

fn bench_neighbours_corner_of_grid(c: &mut Criterion) {
    let g = Grid::build(SideLength(11)).unwrap();
    c.bench_function("neighbours_corner_of_grid", move |b| b.iter(|| g.neighbours_of(0)));
}

fn bench_neighbours_middle_of_grid(c: &mut Criterion) {
    let g = Grid::build(SideLength(11)).unwrap();
    let mid = g.grid_coordinate_to_index((5, 5).into()).unwrap();
    c.bench_function("neighbours_middle_of_grid", move |b| b.iter(|| g.neighbours_of(mid)));
}

criterion_group!(
    benches,
    bench_grid_11,
    bench_grid_128,
    bench_grid_500,
    bench_index_to_gridcoordinate,
    bench_neighbours_corner_of_grid,
    bench_neighbours_middle_of_grid
);
criterion_main!(benches);
