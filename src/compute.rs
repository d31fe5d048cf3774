//! Bookkeeping for the two particle buffers that successive compute
//! dispatches alternately read and write.
//!
//! The descriptor heap holds the unordered access views first, then the
//! shader resource views, one per buffer:
//!
//! | slot | view             |
//! |------|------------------|
//! | 0    | UAV of buffer 0  |
//! | 1    | UAV of buffer 1  |
//! | 2    | SRV of buffer 0  |
//! | 3    | SRV of buffer 1  |

use crate::resource_state::ResourceStates;

pub const BUFFER_COUNT: usize = 2;
pub const UAV_BASE: u32 = 0;
pub const SRV_BASE: u32 = BUFFER_COUNT as u32;
pub const DESCRIPTOR_COUNT: usize = 2 * BUFFER_COUNT;

/// Number of particles, also the x dimension of every dispatch.
pub const PARTICLE_COUNT: u32 = 3;

/// State both buffers rest in between dispatches.
pub const RESTING_STATE: ResourceStates = ResourceStates::NonPixelShaderResource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchSlots {
    /// Heap slot bound as the shader's input.
    pub srv: u32,
    /// Heap slot bound as the shader's output.
    pub uav: u32,
    /// Buffer the dispatch writes into.
    pub write: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PingPong {
    read: usize,
}

impl PingPong {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer holding the latest particle positions.
    pub fn read_index(&self) -> usize {
        self.read
    }

    pub fn write_index(&self) -> usize {
        1 - self.read
    }

    pub fn slots(&self) -> DispatchSlots {
        let write = self.write_index();

        DispatchSlots {
            srv: SRV_BASE + self.read as u32,
            uav: UAV_BASE + write as u32,
            write,
        }
    }

    pub fn swap(&mut self) {
        self.read = self.write_index();
    }

    /// Runs `steps` dispatches through `dispatch` and leaves the last written
    /// buffer as the read buffer.
    pub fn run<E>(
        &mut self,
        steps: u32,
        mut dispatch: impl FnMut(DispatchSlots) -> Result<(), E>,
    ) -> Result<(), E> {
        for _ in 0..steps {
            dispatch(self.slots())?;
            self.swap();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::resource_state::{ResourceStates, TrackedState, Transition};

    use super::{DispatchSlots, PingPong, DESCRIPTOR_COUNT, RESTING_STATE};

    #[test]
    fn first_dispatch_reads_buffer_zero() {
        let pp = PingPong::new();

        assert_eq!(
            pp.slots(),
            DispatchSlots {
                srv: 2,
                uav: 1,
                write: 1
            }
        );
    }

    #[test]
    fn second_dispatch_reads_buffer_one() {
        let mut pp = PingPong::new();
        pp.swap();

        assert_eq!(pp.read_index(), 1);
        assert_eq!(
            pp.slots(),
            DispatchSlots {
                srv: 3,
                uav: 0,
                write: 0
            }
        );
    }

    #[test]
    fn slots_stay_inside_the_heap() {
        let mut pp = PingPong::new();

        for _ in 0..5 {
            let slots = pp.slots();
            assert!((slots.srv as usize) < DESCRIPTOR_COUNT);
            assert!((slots.uav as usize) < DESCRIPTOR_COUNT);
            assert_ne!(slots.srv - 2, slots.uav);
            pp.swap();
        }
    }

    #[test]
    fn even_step_count_returns_to_the_start() {
        let mut pp = PingPong::new();
        let mut writes = Vec::new();

        pp.run(10, |slots| {
            writes.push(slots.write);
            Ok::<_, ()>(())
        })
        .unwrap();

        assert_eq!(pp.read_index(), 0);
        assert_eq!(writes, vec![1, 0, 1, 0, 1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn failed_dispatch_stops_the_run() {
        let mut pp = PingPong::new();
        let mut calls = 0;

        let result = pp.run(10, |_| {
            calls += 1;
            if calls == 3 {
                Err("device lost")
            } else {
                Ok(())
            }
        });

        assert_eq!(result, Err("device lost"));
        assert_eq!(calls, 3);
        assert_eq!(pp.read_index(), 0);
    }

    #[test]
    fn written_buffer_round_trips_through_unordered_access() {
        let buffers = [
            TrackedState::new(RESTING_STATE),
            TrackedState::new(RESTING_STATE),
        ];
        let mut pp = PingPong::new();
        let mut barriers = Vec::new();

        pp.run(2, |slots| {
            let target = &buffers[slots.write];
            barriers.extend(target.transition(ResourceStates::UnorderedAccess));
            barriers.extend(target.transition(RESTING_STATE));
            Ok::<_, ()>(())
        })
        .unwrap();

        let expected = Transition {
            before: RESTING_STATE,
            after: ResourceStates::UnorderedAccess,
        };
        assert_eq!(barriers.len(), 4);
        assert_eq!(barriers[0], expected);
        assert_eq!(barriers[2], expected);
        assert!(buffers.iter().all(|b| b.current() == RESTING_STATE));
    }
}
