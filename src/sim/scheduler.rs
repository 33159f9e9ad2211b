//! Deferred tasks run between frames
//!
//! Anything that should happen "N seconds from now" (enemy spawns, the ammo
//! reload, reverting a damage flash) is queued here against the session
//! clock. The orchestrator drains due tasks at the top of each tick, so a task
//! always runs between two frame steps and never in the middle of one.

use serde::{Deserialize, Serialize};

/// A timed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredTask {
    /// One of the opening spawns (ignores the concurrent-enemy cap)
    InitialSpawn,
    /// The regular spawner; reschedules itself
    Spawn,
    /// Refill ammo to max
    Reload,
    /// Clear an enemy's damage flash
    RevertFlash { enemy_id: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled {
    due: f64,
    seq: u64,
    task: DeferredTask,
}

/// Queue of tasks keyed by due time (FIFO among equal due times)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    queue: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run `delay` seconds after `now`
    pub fn schedule(&mut self, now: f64, delay: f32, task: DeferredTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due: now + delay.max(0.0) as f64,
            seq,
            task,
        });
    }

    /// Remove and return the earliest task due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Option<DeferredTask> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        Some(self.queue.remove(index).task)
    }

    /// Seconds until the next task, if any
    pub fn next_due_in(&self, now: f64) -> Option<f64> {
        self.queue
            .iter()
            .map(|s| s.due)
            .min_by(f64::total_cmp)
            .map(|due| (due - now).max(0.0))
    }

    pub fn contains(&self, task: DeferredTask) -> bool {
        self.queue.iter().any(|s| s.task == task)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
