use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rl::{compute_reward_into, RewardInputs, RewardWeights};

fn bench_reward_4096(c: &mut Criterion) {
    let n = 4096;
    let cart_pos: Vec<f32> = (0..n).map(|i| (i as f32 / n as f32) * 6.0 - 3.0).collect();
    let pole_angle: Vec<f32> = cart_pos.iter().map(|x| x * 0.5).collect();
    let cart_vel = vec![0.3; n];
    let pole_vel = vec![-0.2; n];
    let command = vec![0.5; n];
    let progress: Vec<u32> = (0..n as u32).map(|i| i % 300).collect();
    let weights = RewardWeights::default();
    let mut rewards = vec![0.0; n];
    let mut terminate = vec![false; n];

    c.bench_function("compute_reward_4096", |b| {
        b.iter(|| {
            let inputs = RewardInputs {
                command: &command,
                pole_angle: &pole_angle,
                pole_vel: &pole_vel,
                cart_vel: &cart_vel,
                cart_pos: &cart_pos,
            };
            compute_reward_into(
                black_box(&inputs),
                &progress,
                300,
                3.0,
                &weights,
                &mut rewards,
                &mut terminate,
            );
        });
    });
}

criterion_group!(benches, bench_reward_4096);
criterion_main!(benches);
