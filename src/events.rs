use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Arrival { customer: usize },
    ServiceStart { customer: usize, station: usize },
    ServiceEnd { customer: usize, station: usize },
}

#[derive(Clone, Copy, Debug)]
pub struct ScheduledEvent {
    pub time: f64,
    pub seq: u64,
    pub event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Strictly time-ordered event queue driving simulated time forward.
///
/// Ties are broken by insertion order, so a run is fully deterministic
/// under a fixed random seed.
#[derive(Default)]
pub struct EventScheduler {
    heap: BinaryHeap<Reverse<ScheduledEvent>>,
    next_seq: u64,
    now: f64,
}

impl EventScheduler {
    pub fn schedule(&mut self, time: f64, event: Event) {
        debug_assert!(time >= self.now, "scheduled into the past");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(ScheduledEvent { time, seq, event }));
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Pops the earliest event and advances the clock to it, unless its
    /// time exceeds `horizon`; events past the horizon stay queued so
    /// in-flight customers are left in their partial state.
    pub fn next_within(&mut self, horizon: f64) -> Option<ScheduledEvent> {
        let Reverse(head) = self.heap.peek()?;
        if head.time > horizon {
            return None;
        }
        let Reverse(scheduled) = self.heap.pop()?;
        self.now = scheduled.time;
        Some(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_dispatch_in_time_order() {
        let mut scheduler = EventScheduler::default();
        scheduler.schedule(3.0, Event::Arrival { customer: 0 });
        scheduler.schedule(1.0, Event::Arrival { customer: 1 });
        scheduler.schedule(2.0, Event::Arrival { customer: 2 });

        let order: Vec<f64> = std::iter::from_fn(|| scheduler.next_within(f64::INFINITY))
            .map(|scheduled| scheduled.time)
            .collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
        assert_eq!(scheduler.now(), 3.0);
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut scheduler = EventScheduler::default();
        scheduler.schedule(5.0, Event::Arrival { customer: 10 });
        scheduler.schedule(5.0, Event::Arrival { customer: 11 });
        scheduler.schedule(5.0, Event::Arrival { customer: 12 });

        let order: Vec<usize> = std::iter::from_fn(|| scheduler.next_within(f64::INFINITY))
            .map(|scheduled| match scheduled.event {
                Event::Arrival { customer } => customer,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec![10, 11, 12]);
    }

    #[test]
    fn horizon_leaves_later_events_queued() {
        let mut scheduler = EventScheduler::default();
        scheduler.schedule(1.0, Event::Arrival { customer: 0 });
        scheduler.schedule(10.0, Event::Arrival { customer: 1 });

        assert!(scheduler.next_within(5.0).is_some());
        assert!(scheduler.next_within(5.0).is_none());
        // The late event is still there once the horizon allows it.
        assert!(scheduler.next_within(10.0).is_some());
    }

    #[test]
    fn empty_scheduler_returns_none() {
        let mut scheduler = EventScheduler::default();
        assert!(scheduler.next_within(100.0).is_none());
        assert_eq!(scheduler.now(), 0.0);
    }
}
