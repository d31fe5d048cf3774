use crate::error::{Error, Result};

use super::Timeline;

/// Number of frames the CPU may record ahead of the GPU. Equal to the number
/// of swap chain buffers.
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Double-buffered CPU/GPU frame synchronization.
///
/// Every in-flight frame remembers the fence value that was signalled when its
/// command allocator was last submitted. Before a frame's allocator is reused
/// the CPU waits for that value.
#[derive(Clone, Debug)]
pub struct FramePacer<const N: usize = MAX_FRAMES_IN_FLIGHT> {
    fence_values: [u64; N],
    frame_index: usize,
}

impl<const N: usize> Default for FramePacer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FramePacer<N> {
    pub fn new() -> Self {
        assert!(N > 0, "FramePacer needs at least one frame");

        Self {
            fence_values: [0; N],
            frame_index: 0,
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn fence_value(&self, frame: usize) -> u64 {
        self.fence_values[frame]
    }

    pub fn current_fence_value(&self) -> u64 {
        self.fence_values[self.frame_index]
    }

    /// Returns the value the fence object must be created with and advances
    /// the current frame past it.
    pub fn arm(&mut self) -> u64 {
        let initial = self.fence_values[self.frame_index];
        self.fence_values[self.frame_index] += 1;

        initial
    }

    pub fn set_frame_index(&mut self, index: usize) {
        assert!(index < N, "FramePacer<{N}>: frame index {index} is out of bounds");

        self.frame_index = index;
    }

    /// Drains the queue: signals the current frame's value, blocks until the
    /// GPU reaches it, then bumps the value.
    ///
    /// Failures are logged and leave the value untouched; this runs on
    /// teardown and resize paths where the device may already be gone.
    pub fn wait_for_gpu<T: Timeline>(&mut self, timeline: &T) {
        let value = self.fence_values[self.frame_index];

        match timeline.signal(value).and_then(|_| timeline.wait(value)) {
            Ok(()) => self.fence_values[self.frame_index] += 1,
            Err(err) => tracing::warn!(%err, value, "failed to drain the GPU queue"),
        }
    }

    /// Gives every frame the current frame's value. Called after
    /// [`FramePacer::wait_for_gpu`] when back buffers are recreated.
    pub fn sync_all_frames(&mut self) {
        let value = self.fence_values[self.frame_index];
        self.fence_values.fill(value);
    }

    /// Ends the current frame and makes `next_index` current, waiting until
    /// the GPU has finished with the frame that last used it.
    pub fn move_to_next_frame<T: Timeline>(
        &mut self,
        timeline: &T,
        next_index: usize,
    ) -> Result<()> {
        let current = self.fence_values[self.frame_index];
        timeline.signal(current)?;

        self.set_frame_index(next_index);

        if timeline.is_lost() {
            return Err(Error::DeviceLost);
        }

        let pending = self.fence_values[self.frame_index];
        if !timeline.is_complete(pending) {
            tracing::trace!(frame = self.frame_index, pending, "waiting for frame");
            timeline.wait(pending)?;
        }

        self.fence_values[self.frame_index] = current + 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use crate::error::{Error, Result};
    use crate::frame::{Timeline, LOST_VALUE};

    use super::{FramePacer, MAX_FRAMES_IN_FLIGHT};

    /// A fence the test completes by hand. `wait` completes everything up to
    /// the requested value, like a GPU that eventually catches up.
    #[derive(Default)]
    struct ManualTimeline {
        completed: Cell<u64>,
        signals: RefCell<Vec<u64>>,
        waits: RefCell<Vec<u64>>,
        fail_signal: Cell<bool>,
        instant: Cell<bool>,
    }

    impl ManualTimeline {
        fn complete_up_to(&self, value: u64) {
            self.completed.set(self.completed.get().max(value));
        }

        fn complete_all(&self) {
            if let Some(last) = self.signals.borrow().last() {
                self.complete_up_to(*last);
            }
        }
    }

    impl Timeline for ManualTimeline {
        fn signal(&self, value: u64) -> Result<()> {
            if self.fail_signal.get() {
                return Err(Error::DeviceLost);
            }

            self.signals.borrow_mut().push(value);
            if self.instant.get() {
                self.complete_up_to(value);
            }
            Ok(())
        }

        fn completed_value(&self) -> u64 {
            self.completed.get()
        }

        fn wait(&self, value: u64) -> Result<()> {
            self.waits.borrow_mut().push(value);
            self.complete_up_to(value);
            Ok(())
        }
    }

    fn started_pacer(timeline: &ManualTimeline) -> FramePacer {
        let mut pacer = FramePacer::new();
        assert_eq!(pacer.arm(), 0);
        pacer.wait_for_gpu(timeline);
        pacer.sync_all_frames();
        pacer.set_frame_index(0);
        pacer
    }

    #[test]
    fn arm_returns_initial_value_and_advances_current_frame() {
        let mut pacer = FramePacer::<MAX_FRAMES_IN_FLIGHT>::new();

        assert_eq!(pacer.arm(), 0);
        assert_eq!(pacer.fence_value(0), 1);
        assert_eq!(pacer.fence_value(1), 0);
    }

    #[test]
    fn wait_for_gpu_signals_waits_and_increments() {
        let timeline = ManualTimeline::default();
        let mut pacer = FramePacer::<2>::new();
        pacer.arm();

        pacer.wait_for_gpu(&timeline);

        assert_eq!(*timeline.signals.borrow(), vec![1]);
        assert_eq!(*timeline.waits.borrow(), vec![1]);
        assert_eq!(timeline.completed_value(), 1);
        assert_eq!(pacer.current_fence_value(), 2);
    }

    #[test]
    fn wait_for_gpu_failure_keeps_value() {
        let timeline = ManualTimeline::default();
        timeline.fail_signal.set(true);
        let mut pacer = FramePacer::<2>::new();
        pacer.arm();

        pacer.wait_for_gpu(&timeline);

        assert_eq!(pacer.current_fence_value(), 1);
        assert!(timeline.waits.borrow().is_empty());
    }

    #[test]
    fn sync_all_frames_copies_current_value() {
        let timeline = ManualTimeline::default();
        let mut pacer = FramePacer::<3>::new();
        pacer.arm();
        pacer.wait_for_gpu(&timeline);

        pacer.sync_all_frames();

        assert_eq!(
            (0..3).map(|i| pacer.fence_value(i)).collect::<Vec<_>>(),
            vec![2, 2, 2]
        );
    }

    #[test]
    fn next_frame_does_not_wait_when_gpu_is_ahead() {
        let timeline = ManualTimeline::default();
        timeline.instant.set(true);
        let mut pacer = started_pacer(&timeline);

        pacer.move_to_next_frame(&timeline, 1).unwrap();

        assert_eq!(*timeline.signals.borrow(), vec![1, 2]);
        assert_eq!(*timeline.waits.borrow(), vec![1]);
        assert_eq!(pacer.frame_index(), 1);
        assert_eq!(pacer.fence_value(1), 3);
    }

    #[test]
    fn next_frame_waits_for_previous_use_of_the_buffer() {
        let timeline = ManualTimeline::default();
        let mut pacer = started_pacer(&timeline);

        pacer.move_to_next_frame(&timeline, 1).unwrap();
        pacer.move_to_next_frame(&timeline, 0).unwrap();
        let waits_before = timeline.waits.borrow().len();

        // Frame 1 last signalled 3 and the GPU is stuck at 2.
        pacer.move_to_next_frame(&timeline, 1).unwrap();

        assert_eq!(timeline.waits.borrow().len(), waits_before + 1);
        assert_eq!(*timeline.waits.borrow().last().unwrap(), 3);
        assert_eq!(pacer.fence_value(1), 5);
    }

    #[test]
    fn signalled_values_strictly_increase() {
        let timeline = ManualTimeline::default();
        let mut pacer = started_pacer(&timeline);

        for frame in 0..64 {
            if frame % 3 == 0 {
                timeline.complete_all();
            }
            pacer.move_to_next_frame(&timeline, (frame + 1) % 2).unwrap();
        }

        let signals = timeline.signals.borrow();
        assert!(signals.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn allocator_is_never_reused_before_completion() {
        let timeline = ManualTimeline::default();
        let mut pacer = started_pacer(&timeline);
        let mut last_submit = [0u64; 2];

        for frame in 0..32 {
            let index = pacer.frame_index();
            assert!(timeline.completed_value() >= last_submit[index]);

            last_submit[index] = pacer.current_fence_value();
            pacer.move_to_next_frame(&timeline, (frame + 1) % 2).unwrap();
        }
    }

    #[test]
    fn resize_after_frames_realigns_all_values() {
        let timeline = ManualTimeline::default();
        let mut pacer = started_pacer(&timeline);
        pacer.move_to_next_frame(&timeline, 1).unwrap();
        pacer.move_to_next_frame(&timeline, 0).unwrap();

        pacer.wait_for_gpu(&timeline);
        pacer.sync_all_frames();
        pacer.set_frame_index(1);

        assert_eq!(timeline.completed_value(), 4);
        assert_eq!(pacer.fence_value(0), 5);
        assert_eq!(pacer.fence_value(1), 5);
        assert_eq!(pacer.frame_index(), 1);
    }

    #[test]
    fn signal_failure_propagates_from_next_frame() {
        let timeline = ManualTimeline::default();
        let mut pacer = started_pacer(&timeline);
        timeline.fail_signal.set(true);

        let result = pacer.move_to_next_frame(&timeline, 1);

        assert!(matches!(result, Err(Error::DeviceLost)));
        assert_eq!(pacer.frame_index(), 0);
    }

    #[test]
    fn lost_timeline_fails_next_frame_without_waiting() {
        let timeline = ManualTimeline::default();
        let mut pacer = started_pacer(&timeline);
        let waits_before = timeline.waits.borrow().len();
        timeline.completed.set(LOST_VALUE);

        let result = pacer.move_to_next_frame(&timeline, 1);

        assert!(matches!(result, Err(Error::DeviceLost)));
        assert_eq!(timeline.waits.borrow().len(), waits_before);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn frame_index_must_be_in_range() {
        FramePacer::<2>::new().set_frame_index(2);
    }
}
