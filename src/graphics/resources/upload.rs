use bytemuck::Pod;
use oxidx::dx::{self, IDevice, IGraphicsCommandListExt};

use crate::{
    error::{Error, Result},
    graphics::{commands::CommandList, device::Device},
    resource_state::ResourceStates,
    texture_data::TextureData,
};

use super::{
    buffer::{Buffer, BufferUsage},
    texture::{Texture, TEXTURE_FORMAT},
};

/// Records one-off copies from upload-heap staging buffers into default-heap
/// resources. Staging buffers live until the submission has completed.
#[derive(Debug)]
pub struct Uploader<'a> {
    device: &'a Device,
    list: &'a CommandList,
    staging: Vec<dx::Resource>,
}

impl<'a> Uploader<'a> {
    pub(crate) fn new(device: &'a Device, list: &'a CommandList) -> Self {
        Self {
            device,
            list,
            staging: vec![],
        }
    }

    pub(crate) fn into_staging(self) -> Vec<dx::Resource> {
        self.staging
    }

    pub fn list(&self) -> &CommandList {
        self.list
    }

    pub fn device(&self) -> &Device {
        self.device
    }

    pub fn buffer<T: Pod>(&mut self, data: &[T], usage: BufferUsage) -> Result<Buffer<T>> {
        if data.is_empty() {
            return Err(Error::Graphics("cannot create an empty buffer".to_string()));
        }

        let size = std::mem::size_of_val(data);

        let raw: dx::Resource = self.device.raw.create_committed_resource(
            &dx::HeapProperties::default(),
            dx::HeapFlags::empty(),
            &dx::ResourceDesc::buffer(size).with_flags(usage.flags()),
            dx::ResourceStates::CopyDest,
            None,
        )?;
        let staging = self.staging_buffer(size)?;

        self.list.raw.update_subresources_fixed::<1, _, _>(
            &raw,
            &staging,
            0,
            0..1,
            &[dx::SubresourceData::new(data)],
        );
        self.staging.push(staging);

        let buffer = Buffer::inner_new(raw, data.len(), usage);
        self.list
            .transition(&buffer.raw, &buffer.state, usage.resting_state());

        Ok(buffer)
    }

    pub fn texture(&mut self, data: &TextureData) -> Result<Texture> {
        let desc = dx::ResourceDesc::texture_2d(data.width, data.height)
            .with_format(TEXTURE_FORMAT)
            .with_mip_levels(1);

        let raw: dx::Resource = self.device.raw.create_committed_resource(
            &dx::HeapProperties::default(),
            dx::HeapFlags::empty(),
            &desc,
            dx::ResourceStates::CopyDest,
            None,
        )?;

        let mut layouts = [Default::default(); 1];
        let mut num_rows = [Default::default(); 1];
        let mut row_sizes = [Default::default(); 1];

        let total_size = self.device.raw.get_copyable_footprints(
            &desc,
            0..1,
            0,
            &mut layouts,
            &mut num_rows,
            &mut row_sizes,
        );
        let staging = self.staging_buffer(total_size as usize)?;

        let src = [dx::SubresourceData::new(data.pixels.as_slice())
            .with_row_pitch(data.row_pitch())
            .with_slice_pitch(data.slice_pitch())];

        self.list
            .raw
            .update_subresources_fixed::<1, _, _>(&raw, &staging, 0, 0..1, &src);
        self.staging.push(staging);

        let texture = Texture::inner_new(raw, data.width, data.height);
        self.list.transition(
            &texture.raw,
            &texture.state,
            ResourceStates::PixelShaderResource,
        );

        Ok(texture)
    }

    fn staging_buffer(&self, size: usize) -> Result<dx::Resource> {
        let staging: dx::Resource = self.device.raw.create_committed_resource(
            &dx::HeapProperties::upload(),
            dx::HeapFlags::empty(),
            &dx::ResourceDesc::buffer(size),
            dx::ResourceStates::GenericRead,
            None,
        )?;

        Ok(staging)
    }
}
