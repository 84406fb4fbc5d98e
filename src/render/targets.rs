use crate::constants::DEPTH_FORMAT;

fn create_depth_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    usage: wgpu::TextureUsages,
) -> (wgpu::Texture, wgpu::TextureView) {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage,
        view_formats: &[],
    });
    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    (tex, view)
}

/// Depth attachments: the screen-sized depth buffer and the spotlight's
/// square shadow map with its comparison sampler.
pub(crate) struct RenderTargets {
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) shadow_tex: wgpu::Texture,
    pub(crate) shadow_view: wgpu::TextureView,
    pub(crate) shadow_sampler: wgpu::Sampler,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32, shadow_size: u32) -> Self {
        let (depth_tex, depth_view) = create_depth_texture(
            device,
            "depth_tex",
            width,
            height,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let (shadow_tex, shadow_view) = create_depth_texture(
            device,
            "shadow_map",
            shadow_size,
            shadow_size,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        Self {
            depth_tex,
            depth_view,
            shadow_tex,
            shadow_view,
            shadow_sampler,
        }
    }

    pub(crate) fn recreate_depth(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_tex.destroy();
        (self.depth_tex, self.depth_view) = create_depth_texture(
            device,
            "depth_tex",
            width,
            height,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
    }

    pub(crate) fn destroy(&self) {
        self.depth_tex.destroy();
        self.shadow_tex.destroy();
    }
}
