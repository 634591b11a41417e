use super::*;

use std::sync::Mutex;

use crate::sequence::Sequence;

#[derive(Default)]
struct Recorder {
    log: Mutex<Vec<String>>,
    swaps: Mutex<Vec<SwapProgress>>,
    finished: Mutex<Option<SortOutcome>>,
}

impl Recorder {
    fn swap_pairs(&self) -> Vec<(usize, usize)> {
        self.swaps
            .lock()
            .expect("swaps")
            .iter()
            .map(|p| (p.left, p.right))
            .collect()
    }

    fn finished(&self) -> Option<SortOutcome> {
        *self.finished.lock().expect("finished")
    }
}

impl SortObserver for Recorder {
    fn on_started(&self, total_comparisons: u64) {
        self.log
            .lock()
            .expect("log")
            .push(format!("started {total_comparisons}"));
    }

    fn on_swap(&self, progress: &SwapProgress) {
        self.log.lock().expect("log").push("swap".to_string());
        self.swaps.lock().expect("swaps").push(*progress);
    }

    fn on_finished(&self, outcome: &SortOutcome) {
        self.log
            .lock()
            .expect("log")
            .push(format!("finished {}", outcome.label()));
        *self.finished.lock().expect("finished") = Some(*outcome);
    }
}

fn shared(values: Vec<u32>) -> SharedSequence {
    SharedSequence::new(Sequence::from_values(values, 100))
}

const PACING: Duration = Duration::from_millis(50);

#[tokio::test(start_paused = true)]
async fn sorts_small_sequence_with_deterministic_swap_trace() {
    let data = shared(vec![5, 3, 8, 1]);
    let recorder = Arc::new(Recorder::default());
    let driver = SortDriver::new();

    let task = driver
        .start(data.clone(), PACING, recorder.clone())
        .expect("start");
    let outcome = task.join().await.expect("join");

    assert_eq!(data.snapshot().values(), &[1, 3, 5, 8]);
    assert_eq!(recorder.swap_pairs(), vec![(0, 1), (2, 3), (1, 2), (0, 1)]);
    assert_eq!(
        outcome,
        SortOutcome::Completed(SortStats {
            comparisons: 6,
            swaps: 4,
            passes: 3,
        })
    );
    assert_eq!(recorder.finished(), Some(outcome));
}

#[tokio::test(start_paused = true)]
async fn pauses_once_per_swap() {
    let data = shared(vec![5, 3, 8, 1]);
    let driver = SortDriver::new();
    let started = Instant::now();

    driver
        .start(data, PACING, Arc::new(Recorder::default()))
        .expect("start")
        .join()
        .await
        .expect("join");

    let elapsed = started.elapsed();
    assert!(elapsed >= PACING * 4, "elapsed {elapsed:?}");
    assert!(elapsed < PACING * 5, "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn reverse_sorted_input_swaps_on_every_comparison() {
    let data = shared((1..=50).rev().collect());
    let recorder = Arc::new(Recorder::default());

    let outcome = SortDriver::new()
        .start(data.clone(), PACING, recorder.clone())
        .expect("start")
        .join()
        .await
        .expect("join");

    let stats = outcome.stats();
    assert_eq!(stats.comparisons, 1225);
    assert_eq!(stats.swaps, 1225);
    assert_eq!(stats.passes, 49);
    assert_eq!(recorder.swap_pairs().len(), 1225);
    assert!(data.snapshot().is_sorted());
}

#[tokio::test(start_paused = true)]
async fn sorted_input_completes_without_swaps() {
    let data = shared((1..=50).collect());
    let recorder = Arc::new(Recorder::default());
    let started = Instant::now();

    let outcome = SortDriver::new()
        .start(data.clone(), PACING, recorder.clone())
        .expect("start")
        .join()
        .await
        .expect("join");

    assert!(matches!(outcome, SortOutcome::Completed(_)));
    assert_eq!(outcome.stats().swaps, 0);
    assert_eq!(outcome.stats().comparisons, 1225);
    assert!(recorder.swap_pairs().is_empty());
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(data.snapshot().values(), (1..=50).collect::<Vec<_>>().as_slice());
}

#[tokio::test(start_paused = true)]
async fn rejects_second_start_while_in_flight() {
    let data = shared(vec![4, 3, 2, 1]);
    let driver = SortDriver::new();

    let task = driver
        .start(data.clone(), PACING, Arc::new(Recorder::default()))
        .expect("start");
    assert!(driver.is_running());

    let second = driver.start(data.clone(), PACING, Arc::new(Recorder::default()));
    assert!(matches!(second, Err(SortError::AlreadyRunning)));

    task.join().await.expect("join");
    assert!(!driver.is_running());

    let again = driver
        .start(data, PACING, Arc::new(Recorder::default()))
        .expect("restart after completion");
    again.join().await.expect("join");
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_at_next_pause() {
    let data = shared((1..=50).rev().collect());
    let driver = SortDriver::new();
    let recorder = Arc::new(Recorder::default());

    let task = driver
        .start(data.clone(), PACING, recorder.clone())
        .expect("start");
    tokio::time::sleep(PACING * 3 + Duration::from_millis(10)).await;
    task.cancel();
    let outcome = task.join().await.expect("join");

    assert!(matches!(outcome, SortOutcome::Cancelled(_)));
    assert_eq!(outcome.stats().swaps, 4);
    assert!(!driver.is_running());
    assert!(!data.snapshot().is_sorted());
    assert_eq!(data.len(), 50);
}

#[tokio::test(start_paused = true)]
async fn reset_mid_sort_supersedes_the_task() {
    let data = shared((1..=50).rev().collect());
    let driver = SortDriver::new();

    let task = driver
        .start(data.clone(), PACING, Arc::new(Recorder::default()))
        .expect("start");
    tokio::time::sleep(PACING * 2 + Duration::from_millis(10)).await;

    let fresh: Vec<u32> = (1..=50).rev().collect();
    data.replace(Sequence::from_values(fresh.clone(), 100));
    let outcome = task.join().await.expect("join");

    assert!(matches!(outcome, SortOutcome::Superseded(_)));
    assert_eq!(data.snapshot().values(), fresh.as_slice());
    assert!(!driver.is_running());
}

#[tokio::test(start_paused = true)]
async fn dropped_handle_lets_the_sort_run_to_completion() {
    let data = shared(vec![9, 7, 5, 3, 1]);
    let recorder = Arc::new(Recorder::default());
    let driver = SortDriver::new();

    let task = driver
        .start(data.clone(), PACING, recorder.clone())
        .expect("start");
    tokio::time::sleep(Duration::from_millis(10)).await;
    drop(task);

    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(matches!(recorder.finished(), Some(SortOutcome::Completed(_))));
    assert_eq!(data.snapshot().values(), &[1, 3, 5, 7, 9]);
    assert!(!driver.is_running());
}

#[tokio::test(start_paused = true)]
async fn start_is_reported_from_the_task_before_any_swap() {
    let data = shared(vec![2, 1, 3]);
    let recorder = Arc::new(Recorder::default());

    SortDriver::new()
        .start(data, PACING, recorder.clone())
        .expect("start")
        .join()
        .await
        .expect("join");

    let log = recorder.log.lock().expect("log").clone();
    assert_eq!(log, vec!["started 3", "swap", "finished completed"]);
    let swaps = recorder.swaps.lock().expect("swaps").clone();
    assert_eq!(swaps[0].values, (1, 2));
}

#[tokio::test(start_paused = true)]
async fn sorted_input_still_reports_start_then_finish() {
    let data = shared((1..=50).collect());
    let recorder = Arc::new(Recorder::default());

    SortDriver::new()
        .start(data, PACING, recorder.clone())
        .expect("start")
        .join()
        .await
        .expect("join");

    let log = recorder.log.lock().expect("log").clone();
    assert_eq!(log, vec!["started 1225", "finished completed"]);
}
