use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use rust_2048::agent::Agent;
use rust_2048::core::{Grid, Move, Snapshot};
use rust_2048::heuristic::{evaluate, EvalWeights};
use rust_2048::mcts::{MctsConfig, MctsSearch};
use rust_2048::{ExpectimaxAgent, ExpectimaxConfig};

/// A small corpus of boards reached by deterministic play from a seed.
fn corpus() -> Vec<Grid> {
    let mut boards = Vec::new();
    let mut game = rust_2048::core::Game::new(1337);
    let mut agent = rust_2048::agent::GreedyAgent::default();
    boards.push(game.grid());
    for _ in 0..24 {
        if game.is_over() {
            break;
        }
        let _ = game.step_with_agent(&mut agent);
        boards.push(game.grid());
    }
    boards
}

fn bench_transition(c: &mut Criterion) {
    let boards = corpus();
    c.bench_function("engine/apply", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for grid in &boards {
                for mv in Move::ALL {
                    let t = grid.apply(mv);
                    acc = acc.wrapping_add(u64::from(t.score_delta));
                }
            }
            black_box(acc)
        })
    });
}

fn bench_heuristic(c: &mut Criterion) {
    let boards = corpus();
    let weights = EvalWeights::default();
    c.bench_function("heuristic/evaluate", |b| {
        b.iter(|| {
            let mut acc = 0f64;
            for grid in &boards {
                acc += evaluate(grid, &weights);
            }
            black_box(acc)
        })
    });
}

fn bench_expectimax(c: &mut Criterion) {
    let boards = corpus();
    let snapshot = Snapshot {
        grid: boards[boards.len() / 2],
        score: 0,
    };
    let mut agent = ExpectimaxAgent::new(
        ExpectimaxConfig::default()
            .with_depth(2)
            .with_alpha_beta(true),
    )
    .unwrap();
    c.bench_function("expectimax/depth2", |b| {
        b.iter(|| black_box(agent.get_move(&snapshot).unwrap()))
    });
}

fn bench_mcts(c: &mut Criterion) {
    let boards = corpus();
    let grid = boards[boards.len() / 2];
    c.bench_function("mcts/100iters", |b| {
        b.iter(|| {
            let mut search = MctsSearch::new(
                MctsConfig::default()
                    .with_iterations(100)
                    .with_rollout_depth(10),
            )
            .unwrap();
            black_box(search.search(grid).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_transition,
    bench_heuristic,
    bench_expectimax,
    bench_mcts
);
criterion_main!(benches);
