use std::sync::atomic::Ordering;

use atomig::{Atom, Atomic};

bitflags::bitflags! {
    /// Direct3D 12 resource states, bit-compatible with `D3D12_RESOURCE_STATES`.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct ResourceStates: i32 {
        const Common = 0;
        const VertexAndConstantBuffer = 0x1;
        const IndexBuffer = 0x2;
        const RenderTarget = 0x4;
        const UnorderedAccess = 0x8;
        const DepthWrite = 0x10;
        const DepthRead = 0x20;
        const NonPixelShaderResource = 0x40;
        const PixelShaderResource = 0x80;
        const CopyDst = 0x400;
        const CopySrc = 0x800;
        const GenericRead = 0xac3;
        const Present = 0;
    }
}

impl Atom for ResourceStates {
    type Repr = i32;

    fn pack(self) -> Self::Repr {
        self.bits()
    }

    fn unpack(src: Self::Repr) -> Self {
        ResourceStates::from_bits_retain(src)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub before: ResourceStates,
    pub after: ResourceStates,
}

/// The state a resource was last transitioned to on the GPU timeline.
#[derive(Debug)]
pub struct TrackedState(Atomic<ResourceStates>);

impl TrackedState {
    pub fn new(state: ResourceStates) -> Self {
        Self(Atomic::new(state))
    }

    pub fn current(&self) -> ResourceStates {
        self.0.load(Ordering::Relaxed)
    }

    /// Records `state` as current and returns the barrier needed to get there,
    /// or `None` when the resource is already in `state`.
    pub fn transition(&self, state: ResourceStates) -> Option<Transition> {
        let before = self.0.swap(state, Ordering::Relaxed);

        (before != state).then_some(Transition {
            before,
            after: state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ResourceStates, TrackedState, Transition};

    const fn is_send_sync<T: Send + Sync>() {}

    const _: () = is_send_sync::<TrackedState>();

    #[test]
    fn bits_match_d3d12() {
        assert_eq!(ResourceStates::Present.bits(), 0);
        assert_eq!(ResourceStates::RenderTarget.bits(), 0x4);
        assert_eq!(ResourceStates::CopyDst.bits(), 0x400);
        assert!(ResourceStates::GenericRead.contains(
            ResourceStates::VertexAndConstantBuffer
                | ResourceStates::IndexBuffer
                | ResourceStates::NonPixelShaderResource
                | ResourceStates::PixelShaderResource
                | ResourceStates::CopySrc
        ));
    }

    #[test]
    fn transition_reports_previous_state() {
        let state = TrackedState::new(ResourceStates::CopyDst);

        assert_eq!(
            state.transition(ResourceStates::NonPixelShaderResource),
            Some(Transition {
                before: ResourceStates::CopyDst,
                after: ResourceStates::NonPixelShaderResource,
            })
        );
        assert_eq!(state.current(), ResourceStates::NonPixelShaderResource);
    }

    #[test]
    fn returning_to_present_keeps_the_next_frame_barrier() {
        let back_buffer = TrackedState::new(ResourceStates::Present);
        back_buffer.transition(ResourceStates::RenderTarget);

        // A frame that fails mid-recording puts the buffer back without
        // submitting anything.
        back_buffer.transition(ResourceStates::Present);

        assert_eq!(
            back_buffer.transition(ResourceStates::RenderTarget),
            Some(Transition {
                before: ResourceStates::Present,
                after: ResourceStates::RenderTarget,
            })
        );
    }

    #[test]
    fn transition_to_same_state_is_skipped() {
        let state = TrackedState::new(ResourceStates::UnorderedAccess);

        assert_eq!(state.transition(ResourceStates::UnorderedAccess), None);
    }
}
