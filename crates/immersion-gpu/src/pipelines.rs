use wgpu::Device;

use crate::context::{LineVertex, Vertex, COLOR_FORMAT, DEPTH_FORMAT};

/// The three pipelines that draw into color+depth targets: textured
/// geometry (scene meshes and healthy screen quads), the blank substitute
/// for a faulted quad, and the wireframe line overlay.
pub struct Pipelines {
    pub textured: wgpu::RenderPipeline,
    pub blank: wgpu::RenderPipeline,
    pub line: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &Device,
        uniform_bgl: &wgpu::BindGroupLayout,
        texture_bgl: &wgpu::BindGroupLayout,
    ) -> Self {
        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("textured_pl"),
            bind_group_layouts: &[uniform_bgl, texture_bgl],
            push_constant_ranges: &[],
        });
        let untextured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("untextured_pl"),
            bind_group_layouts: &[uniform_bgl],
            push_constant_ranges: &[],
        });

        let textured = build_pipeline(
            device,
            "textured_pipeline",
            &textured_layout,
            include_str!("../shaders/textured.wgsl"),
            Vertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
        );
        let blank = build_pipeline(
            device,
            "blank_pipeline",
            &untextured_layout,
            include_str!("../shaders/blank.wgsl"),
            Vertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line = build_pipeline(
            device,
            "line_pipeline",
            &untextured_layout,
            include_str!("../shaders/line.wgsl"),
            LineVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
        );

        Self {
            textured,
            blank,
            line,
        }
    }
}

fn build_pipeline(
    device: &Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    wgsl: &str,
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(wgsl.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: COLOR_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    // Parse every shader with naga so a WGSL typo fails in `cargo test`
    // rather than at first launch.

    fn parses(src: &str) {
        naga::front::wgsl::parse_str(src).expect("WGSL failed to parse");
    }

    #[test]
    fn textured_shader_parses() {
        parses(include_str!("../shaders/textured.wgsl"));
    }

    #[test]
    fn blank_shader_parses() {
        parses(include_str!("../shaders/blank.wgsl"));
    }

    #[test]
    fn line_shader_parses() {
        parses(include_str!("../shaders/line.wgsl"));
    }

    #[test]
    fn mirror_shader_parses() {
        parses(include_str!("../shaders/mirror.wgsl"));
    }
}
