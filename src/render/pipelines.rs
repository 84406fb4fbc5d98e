use super::uniforms::VERTEX_STRIDE;
use crate::constants::DEPTH_FORMAT;

const SCENE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const SHADOW_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

pub(crate) struct Pipelines {
    pub(crate) globals_bgl: wgpu::BindGroupLayout,
    pub(crate) object_bgl: wgpu::BindGroupLayout,
    pub(crate) material_bgl: wgpu::BindGroupLayout,
    pub(crate) light_bgl: wgpu::BindGroupLayout,
    opaque: Sided,
    transparent: Sided,
    pub(crate) shadow: wgpu::RenderPipeline,
}

/// One blend mode, with and without back-face culling.
struct Sided {
    culled: wgpu::RenderPipeline,
    double: wgpu::RenderPipeline,
}

impl Pipelines {
    pub(crate) fn scene(&self, transparent: bool, double_sided: bool) -> &wgpu::RenderPipeline {
        let sided = if transparent { &self.transparent } else { &self.opaque };
        if double_sided {
            &sided.double
        } else {
            &sided.culled
        }
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[uniform_entry(0, visibility)],
    })
}

fn scene_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    blended: bool,
    cull_mode: Option<wgpu::Face>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: VERTEX_STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &SCENE_ATTRS,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(if blended {
                    wgpu::BlendState::ALPHA_BLENDING
                } else {
                    wgpu::BlendState::REPLACE
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        // with culling off, back faces flip their normal in the fragment shader
        primitive: wgpu::PrimitiveState {
            cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: !blended,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

pub(crate) fn create_pipelines(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Pipelines {
    let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_wgsl"),
        source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(hero_core::SCENE_WGSL)),
    });
    let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("shadow_wgsl"),
        source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(hero_core::SHADOW_WGSL)),
    });

    let vf = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
    let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("globals_bgl"),
        entries: &[
            uniform_entry(0, vf),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Depth,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
    });
    let object_bgl = uniform_layout(device, "object_bgl", vf);
    let material_bgl = uniform_layout(device, "material_bgl", wgpu::ShaderStages::FRAGMENT);
    let light_bgl = uniform_layout(device, "light_bgl", wgpu::ShaderStages::VERTEX);

    let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pl"),
        bind_group_layouts: &[&globals_bgl, &object_bgl, &material_bgl],
        push_constant_ranges: &[],
    });
    let sided = |label: &str, blended: bool| Sided {
        culled: scene_pipeline(
            device,
            label,
            &scene_layout,
            &scene_shader,
            color_format,
            blended,
            Some(wgpu::Face::Back),
        ),
        double: scene_pipeline(
            device,
            &format!("{}_double", label),
            &scene_layout,
            &scene_shader,
            color_format,
            blended,
            None,
        ),
    };
    let opaque = sided("opaque_pipeline", false);
    let transparent = sided("transparent_pipeline", true);

    let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("shadow_pl"),
        bind_group_layouts: &[&light_bgl, &object_bgl],
        push_constant_ranges: &[],
    });
    let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("shadow_pipeline"),
        layout: Some(&shadow_layout),
        vertex: wgpu::VertexState {
            module: &shadow_shader,
            entry_point: Some("vs_shadow"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: VERTEX_STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &SHADOW_ATTRS,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: None,
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    Pipelines {
        globals_bgl,
        object_bgl,
        material_bgl,
        light_bgl,
        opaque,
        transparent,
        shadow,
    }
}
