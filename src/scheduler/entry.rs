/*!
 * Ready Queue Entries
 * Dispatch keys and the ready queue used by the scheduling engine
 */

use super::types::Algorithm;
use crate::core::types::Ticks;
use crate::process::Process;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// Ready-queue entry for key-ordered disciplines
///
/// `index` is the process position in the input set, which doubles as the
/// final tie-break so dispatch order is reproducible.
#[derive(Debug, Clone, Copy)]
pub(super) struct Entry {
    pub index: usize,
    pub key: Ticks,
    pub arrival: Ticks,
}

impl Entry {
    /// Build the entry for `process` under `algorithm`
    ///
    /// Keys are captured at push time. Under SRTF the running process is
    /// pushed back every tick, so its key always reflects the current
    /// remaining time.
    pub fn new(algorithm: Algorithm, process: &Process, index: usize) -> Self {
        let key = match algorithm {
            Algorithm::Fcfs | Algorithm::RoundRobin => 0,
            Algorithm::Sjf => process.burst_time,
            Algorithm::Srtf => process.remaining_time,
            Algorithm::Priority | Algorithm::Mlfq => Ticks::from(process.effective_priority()),
        };

        Self {
            index,
            key,
            arrival: process.arrival_time,
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so the smallest key must compare greatest
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.arrival.cmp(&self.arrival))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Processes admitted and waiting for the CPU
#[derive(Debug)]
pub(super) enum ReadyQueue {
    /// Round Robin: strict FIFO
    Fifo(VecDeque<usize>),
    /// Everything else: minimum key first
    Keyed(BinaryHeap<Entry>),
}

impl ReadyQueue {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::RoundRobin => Self::Fifo(VecDeque::new()),
            _ => Self::Keyed(BinaryHeap::new()),
        }
    }

    pub fn push(&mut self, entry: Entry) {
        match self {
            Self::Fifo(queue) => queue.push_back(entry.index),
            Self::Keyed(heap) => heap.push(entry),
        }
    }

    pub fn pop(&mut self) -> Option<usize> {
        match self {
            Self::Fifo(queue) => queue.pop_front(),
            Self::Keyed(heap) => heap.pop().map(|entry| entry.index),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo(queue) => queue.len(),
            Self::Keyed(heap) => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut ReadyQueue) -> Vec<usize> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn test_sjf_orders_by_burst_then_arrival_then_index() {
        let processes = [
            Process::new(1, "A", 2, 5),
            Process::new(2, "B", 1, 5),
            Process::new(3, "C", 0, 9),
            Process::new(4, "D", 1, 5),
        ];

        let mut queue = ReadyQueue::for_algorithm(Algorithm::Sjf);
        for (i, p) in processes.iter().enumerate() {
            queue.push(Entry::new(Algorithm::Sjf, p, i));
        }

        assert_eq!(drain(&mut queue), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_priority_lower_value_first() {
        let processes = [
            Process::new(1, "A", 0, 1).with_priority(3),
            Process::new(2, "B", 0, 1).with_priority(1),
            Process::new(3, "C", 0, 1),
        ];

        let mut queue = ReadyQueue::for_algorithm(Algorithm::Priority);
        for (i, p) in processes.iter().enumerate() {
            queue.push(Entry::new(Algorithm::Priority, p, i));
        }

        // Unset priority ranks as level 0
        assert_eq!(drain(&mut queue), vec![2, 1, 0]);
    }

    #[test]
    fn test_fifo_preserves_push_order() {
        let p = Process::new(1, "A", 0, 1);
        let mut queue = ReadyQueue::for_algorithm(Algorithm::RoundRobin);
        for i in [2, 0, 1] {
            queue.push(Entry::new(Algorithm::RoundRobin, &p, i));
        }

        assert_eq!(queue.len(), 3);
        assert_eq!(drain(&mut queue), vec![2, 0, 1]);
        assert!(queue.is_empty());
    }
}
