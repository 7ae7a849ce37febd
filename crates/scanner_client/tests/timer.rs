use std::sync::{Arc, Mutex};
use std::time::Duration;

use scanner_client::{EngineEvent, EventSink, PollTimer};
use tokio::runtime::Handle;

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn ticks(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::PollTick { generation } => Some(*generation),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

const PERIOD: Duration = Duration::from_millis(2000);

#[tokio::test(start_paused = true)]
async fn first_tick_fires_one_period_after_start() {
    let sink = Arc::new(TestSink::default());
    let _timer = PollTimer::spawn(&Handle::current(), 7, PERIOD, sink.clone());

    tokio::time::sleep(Duration::from_millis(1900)).await;
    assert!(sink.ticks().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(sink.ticks(), vec![7]);

    tokio::time::sleep(PERIOD).await;
    assert_eq!(sink.ticks(), vec![7, 7]);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_ticks() {
    let sink = Arc::new(TestSink::default());
    let timer = PollTimer::spawn(&Handle::current(), 1, PERIOD, sink.clone());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    timer.cancel();
    tokio::time::sleep(PERIOD * 5).await;

    assert_eq!(sink.ticks(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_timer_stops_ticks() {
    let sink = Arc::new(TestSink::default());
    let timer = PollTimer::spawn(&Handle::current(), 3, PERIOD, sink.clone());
    assert_eq!(timer.generation(), 3);
    drop(timer);

    tokio::time::sleep(PERIOD * 3).await;
    assert!(sink.ticks().is_empty());
}
