//! Argument pool and runtime sharing across threads

mod common;

use std::sync::Arc;
use std::thread;

use common::{calc, runtime, Calls};
use navex_engine::{ArgumentPool, ExprTree, Expression, Value};

const THREADS: usize = 8;
const ITERATIONS: usize = 200;

#[test]
fn test_concurrent_checkout_and_release() {
    let pool = Arc::new(ArgumentPool::new(4));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for i in 0..ITERATIONS {
                    let len = 1 + (t + i) % 3;
                    let mut lease = pool.checkout(len);
                    assert_eq!(lease.len(), len);
                    assert!(lease.iter().all(Value::is_null));
                    lease[0] = Value::Int(i as i32);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(pool.outstanding(), 0);
    let total: usize = (1..=3).map(|len| pool.stats(len).released).sum();
    assert_eq!(total, THREADS * ITERATIONS);
}

#[test]
fn test_shared_runtime_evaluation() {
    let calls = Calls::default();
    let runtime = runtime(&calls);
    let mut tree = ExprTree::new();
    let a = tree.constant(20);
    let b = tree.constant(22);
    let call = tree.method("compute", [a, b]);
    let expr = Expression::new(tree, call);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let root = calc();
                for _ in 0..ITERATIONS {
                    assert_eq!(expr.evaluate(&runtime, &root).unwrap(), Value::Int(42));
                }
            });
        }
    });

    assert_eq!(calls.get(), THREADS * ITERATIONS);
    let stats = runtime.pool().stats(2);
    assert_eq!(stats.checked_out, THREADS * ITERATIONS);
    assert_eq!(stats.released, THREADS * ITERATIONS);
}

#[test]
fn test_detached_array_released_by_hand() {
    let pool = ArgumentPool::new(4);

    let values = pool.checkout(2).detach();
    assert_eq!(pool.stats(2).outstanding(), 1);

    pool.release(values).unwrap();
    assert_eq!(pool.stats(2).outstanding(), 0);

    let err = pool.release(vec![Value::Null, Value::Null]).unwrap_err();
    assert!(err.to_string().contains("integrity"));
}
