// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

/// Uniform buffer holding many copies of the same content type, addressed with
/// dynamic offsets.
///
/// Each slot is padded out to the device's uniform offset alignment so a single
/// bind group can serve every draw in a frame by varying the offset.
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    stride: u32,
    capacity: usize,
    content_type: PhantomData<Content>,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        let pos = type_name.rfind(':').unwrap_or(0);
        if pos > 0 {
            &type_name[(pos + 1)..]
        } else {
            type_name
        }
    }

    /// Creates a buffer with room for `capacity` content slots.
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let alignment = device
            .limits()
            .min_uniform_buffer_offset_alignment
            .max(1);
        let size = std::mem::size_of::<Content>() as u32;
        let stride = size.div_ceil(alignment) * alignment;

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformBuffer: {}", Self::name())),
            size: u64::from(stride) * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        DynamicUniformBuffer {
            buffer,
            stride,
            capacity,
            content_type: PhantomData,
        }
    }

    /// Byte distance between consecutive slots.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Offset to pass when binding slot `index`.
    pub fn offset_of(&self, index: usize) -> u32 {
        index as u32 * self.stride
    }

    /// Writes one slot's content.
    ///
    /// # Panics
    /// Panics if `index` is out of capacity.
    pub fn write(&self, queue: &wgpu::Queue, index: usize, content: &Content) {
        assert!(index < self.capacity, "uniform slot out of capacity");
        queue.write_buffer(
            &self.buffer,
            u64::from(self.offset_of(index)),
            bytemuck::bytes_of(content),
        );
    }

    /// Binding resource sized to a single slot; bind with a dynamic offset.
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: std::num::NonZeroU64::new(std::mem::size_of::<Content>() as u64),
        })
    }
}
