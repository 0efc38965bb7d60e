use crate::action::MoveRecord;

/// Outbound notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Dealt { seed: u64 },
    Moved(MoveRecord),
    Undone(MoveRecord),
    Won { moves: u32 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
