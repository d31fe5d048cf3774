use oxidx::dx::{self, IDevice};
use smallvec::SmallVec;

use crate::{
    error::Result,
    graphics::{
        device::Device,
        types::{BindingType, StaticSampler},
    },
};

/// A root signature built from descriptor tables and static samplers.
#[derive(Clone, Debug)]
pub struct PipelineLayout {
    pub(crate) raw: dx::RootSignature,
}

impl PipelineLayout {
    pub fn graphics(
        device: &Device,
        layout: &[BindingType<'_>],
        static_samplers: &[StaticSampler],
    ) -> Result<Self> {
        Self::inner_new(
            device,
            layout,
            static_samplers,
            dx::RootSignatureFlags::AllowInputAssemblerInputLayout,
        )
    }

    pub fn compute(device: &Device, layout: &[BindingType<'_>]) -> Result<Self> {
        Self::inner_new(device, layout, &[], dx::RootSignatureFlags::empty())
    }

    fn inner_new(
        device: &Device,
        layout: &[BindingType<'_>],
        static_samplers: &[StaticSampler],
        flags: dx::RootSignatureFlags,
    ) -> Result<Self> {
        let ranges = layout
            .iter()
            .map(|i| i.get_ranges())
            .collect::<SmallVec<[_; 4]>>();

        let params = layout
            .iter()
            .zip(ranges.iter())
            .map(|(i, ranges)| i.as_raw(ranges))
            .collect::<SmallVec<[_; 4]>>();
        let samplers = static_samplers
            .iter()
            .map(|i| i.as_raw())
            .collect::<SmallVec<[_; 4]>>();

        let desc = dx::RootSignatureDesc::default()
            .with_parameters(&params)
            .with_sampler(&samplers)
            .with_flags(flags);

        let raw = device
            .raw
            .serialize_and_create_root_signature(&desc, dx::RootSignatureVersion::V1_0, 0)?;

        Ok(Self { raw })
    }
}
