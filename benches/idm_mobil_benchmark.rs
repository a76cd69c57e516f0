use dense_traffic_core::agents::{DriverDefaults, DriverParams, DriverPersonality, VehicleKind};
use dense_traffic_core::control::idm;
use dense_traffic_core::path::{Path, PathCatalog, ZoneTag};
use dense_traffic_core::scheduler::{SimConfig, SimulationCore};

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

pub fn benchmark_idm_acceleration(c: &mut Criterion) {
    let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());

    c.bench_function("idm_acceleration_car_following", |b| {
        b.iter(|| idm::acceleration(black_box(25.0), black_box(Some(30.0)), black_box(2.0), black_box(&params)))
    });
}

fn dense_highway_core(vehicle_count: u64) -> SimulationCore {
    let mut catalog = PathCatalog::new();
    catalog.add_path(
        Path::new(1).with_length(20_000.0).with_lane_count(3).with_zone(ZoneTag::Highway).build(),
    );
    let mut core = SimulationCore::new(catalog, SimConfig::builder().build().unwrap());

    for i in 0..vehicle_count {
        let lane = (i % 3) as u32;
        let s = i as f64 * 25.0;
        let personality = if i % 5 == 0 { DriverPersonality::Aggressive } else { DriverPersonality::Normal };
        core.spawn_ai_vehicle(1, lane, s, VehicleKind::Car, personality).unwrap();
    }
    core
}

pub fn benchmark_tick_dense_traffic(c: &mut Criterion) {
    c.bench_function("tick_200_vehicles_three_lanes", |b| {
        b.iter_batched(
            || dense_highway_core(200),
            |mut core| {
                core.tick();
                black_box(core.snapshot());
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

pub fn benchmark_snapshot(c: &mut Criterion) {
    let mut core = dense_highway_core(200);
    for _ in 0..50 {
        core.tick();
    }

    c.bench_function("snapshot_200_vehicles", |b| {
        b.iter(|| black_box(core.snapshot()))
    });
}

criterion_group!(benches, benchmark_idm_acceleration, benchmark_tick_dense_traffic, benchmark_snapshot);
criterion_main!(benches);
