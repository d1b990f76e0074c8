use eviction_cache::{CacheBuilder, CachePolicy};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const THREAD_COUNT: usize = 4;
const OPERATIONS_PER_THREAD: usize = 1_000_000;
const CACHE_CAPACITY: usize = 10_000;
const KEY_SPACE_SIZE: i64 = 20_000;

fn run(policy: CachePolicy) {
    println!("\n{:?} cache:", policy);

    let cache = Arc::new(
        CacheBuilder::new(CACHE_CAPACITY)
            .build_shared(policy)
            .unwrap(),
    );

    // Create counters for operations
    let get_hits = Arc::new(AtomicUsize::new(0));
    let get_misses = Arc::new(AtomicUsize::new(0));
    let sets = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::with_capacity(THREAD_COUNT);
    let start_time = Instant::now();

    for _ in 0..THREAD_COUNT {
        let cache = Arc::clone(&cache);
        let get_hits = Arc::clone(&get_hits);
        let get_misses = Arc::clone(&get_misses);
        let sets = Arc::clone(&sets);

        handles.push(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for i in 0..OPERATIONS_PER_THREAD {
                // Skewed keys: a hot tenth of the key space gets half the traffic
                let key = if rng.gen_bool(0.5) {
                    rng.gen_range(0..KEY_SPACE_SIZE / 10)
                } else {
                    rng.gen_range(0..KEY_SPACE_SIZE)
                };

                // Mix of operations: 80% gets, 20% sets
                if i % 5 != 0 {
                    if cache.get(key).is_ok() {
                        get_hits.fetch_add(1, Ordering::Relaxed);
                    } else {
                        get_misses.fetch_add(1, Ordering::Relaxed);
                    }
                } else {
                    cache.set(key, key);
                    sets.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let duration = start_time.elapsed();
    let hits = get_hits.load(Ordering::Relaxed);
    let misses = get_misses.load(Ordering::Relaxed);
    let total_operations = hits + misses + sets.load(Ordering::Relaxed);

    println!("- Completed in {:.2?}", duration);
    println!(
        "- Operations per second: {:.0}",
        total_operations as f64 / duration.as_secs_f64()
    );
    println!("- GET hits: {}", hits);
    println!("- GET misses: {}", misses);
    println!(
        "- Hit rate: {:.2}%",
        hits as f64 * 100.0 / (hits + misses) as f64
    );
    println!("- Final cache size: {}", cache.len());
}

fn main() {
    println!("Starting high pressure test with:");
    println!("- {} threads", THREAD_COUNT);
    println!("- {} operations per thread", OPERATIONS_PER_THREAD);
    println!("- Cache capacity: {}", CACHE_CAPACITY);
    println!("- Key space size: {}", KEY_SPACE_SIZE);

    run(CachePolicy::Lru);
    run(CachePolicy::Lfu);
}
