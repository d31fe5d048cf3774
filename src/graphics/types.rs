use oxidx::dx;
use smallvec::SmallVec;

use crate::{
    geometry::{AttributeFormat, Semantic, Vertex},
    resource_state::ResourceStates,
};

pub const BACK_BUFFER_FORMAT: dx::Format = dx::Format::Bgra8Unorm;
pub const DEPTH_FORMAT: dx::Format = dx::Format::D32Float;

impl ResourceStates {
    pub(crate) fn as_raw(&self) -> dx::ResourceStates {
        dx::ResourceStates::from_bits_retain(self.bits())
    }
}

impl AttributeFormat {
    pub(crate) fn as_raw(self) -> dx::Format {
        match self {
            AttributeFormat::Rg32Float => dx::Format::Rg32Float,
            AttributeFormat::Rgba32Float => dx::Format::Rgba32Float,
        }
    }
}

impl Semantic {
    pub(crate) fn as_raw(self, index: u8) -> dx::SemanticName {
        match self {
            Semantic::Position => dx::SemanticName::Position(index),
            Semantic::TexCoord => dx::SemanticName::TexCoord(index),
            Semantic::Color => dx::SemanticName::Color(index),
        }
    }
}

pub(crate) fn input_layout<V: Vertex>() -> SmallVec<[dx::InputElementDesc; 4]> {
    V::ATTRIBUTES
        .iter()
        .map(|a| {
            dx::InputElementDesc::per_vertex(
                a.semantic.as_raw(a.semantic_index as u8),
                a.format.as_raw(),
                0,
            )
            .with_offset(a.offset as u32)
        })
        .collect()
}

#[derive(Clone, Debug)]
pub enum BindingType<'a> {
    Table {
        entries: &'a [BindingTable],
        visibility: dx::ShaderVisibility,
    },
}

impl<'a> BindingType<'a> {
    pub(crate) fn as_raw<'b>(&self, ranges: &'b [dx::DescriptorRange]) -> dx::RootParameter<'b> {
        match self {
            BindingType::Table { visibility, .. } => {
                dx::RootParameter::descriptor_table(ranges).with_visibility(*visibility)
            }
        }
    }

    pub(crate) fn get_ranges(&self) -> SmallVec<[dx::DescriptorRange; 4]> {
        match self {
            BindingType::Table { entries, .. } => entries.iter().map(|e| e.as_raw()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub enum BindingTable {
    Srv { slot: u32, space: u32, count: u32 },
    Uav { slot: u32, space: u32, count: u32 },
}

impl BindingTable {
    pub(crate) fn as_raw(&self) -> dx::DescriptorRange {
        match self {
            BindingTable::Srv { slot, space, count } => dx::DescriptorRange::srv(*count)
                .with_base_shader_register(*slot)
                .with_register_space(*space),
            BindingTable::Uav { slot, space, count } => dx::DescriptorRange::uav(*count)
                .with_base_shader_register(*slot)
                .with_register_space(*space),
        }
    }
}

/// Point-filtered sampler baked into the root signature.
#[derive(Clone, Debug)]
pub struct StaticSampler {
    pub slot: u32,
    pub space: u32,
    pub address_mode: dx::AddressMode,
    pub border_color: dx::BorderColor,
    pub visibility: dx::ShaderVisibility,
}

impl StaticSampler {
    pub fn point_border(slot: u32) -> Self {
        Self {
            slot,
            space: 0,
            address_mode: dx::AddressMode::Border,
            border_color: dx::BorderColor::TransparentBlack,
            visibility: dx::ShaderVisibility::Pixel,
        }
    }

    pub(crate) fn as_raw(&self) -> dx::StaticSamplerDesc {
        dx::StaticSamplerDesc::point()
            .with_address_u(self.address_mode)
            .with_address_v(self.address_mode)
            .with_address_w(self.address_mode)
            .with_comparison_func(dx::ComparisonFunc::Never)
            .with_border_color(self.border_color)
            .with_shader_register(self.slot)
            .with_register_space(self.space)
            .with_visibility(self.visibility)
    }
}
