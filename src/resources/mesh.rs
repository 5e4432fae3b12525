use wgpu::util::DeviceExt;

/// Vertex layout shared by every group: position, normal, texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// CPU-side triangle list, built procedurally or read from an OBJ file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// A square grid of `cells` x `cells` quads, `size` units wide, centred on `(cx, cz)`.
    ///
    /// `height` receives coordinates relative to the centre, so a height field defined around
    /// the world origin lines up once the world matrix moves the centre there. Texture
    /// coordinates repeat once per `tile` units.
    pub fn grid(
        size: f32,
        cells: u32,
        center: (f32, f32),
        tile: f32,
        height: impl Fn(f32, f32) -> f32,
    ) -> Self {
        let cells = cells.max(1);
        let step = size / cells as f32;
        let half = size / 2.0;
        let (cx, cz) = center;
        let row = cells + 1;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        for j in 0..row {
            for i in 0..row {
                let lx = i as f32 * step - half;
                let lz = j as f32 * step - half;
                let y = height(lx, lz);
                // central differences for the normal
                let dx = height(lx + step, lz) - height(lx - step, lz);
                let dz = height(lx, lz + step) - height(lx, lz - step);
                let normal = cgmath::Vector3::new(-dx, 2.0 * step, -dz);
                let normal = cgmath::InnerSpace::normalize(normal);
                vertices.push(MeshVertex {
                    position: [cx + lx, y, cz + lz],
                    normal: normal.into(),
                    tex_coords: [(lx + half) / tile, (lz + half) / tile],
                });
            }
        }

        let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
        for j in 0..cells {
            for i in 0..cells {
                let a = j * row + i;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        Self { vertices, indices }
    }

    /// An axis-aligned cube of half extent `half`, faces pointing inwards.
    pub fn cube(half: f32) -> Self {
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            // normal, u axis, v axis
            ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, 0.0, 1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (n, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = [
                    half * (n[0] + su * u[0] + sv * v[0]),
                    half * (n[1] + su * u[1] + sv * v[1]),
                    half * (n[2] + su * u[2] + sv * v[2]),
                ];
                vertices.push(MeshVertex {
                    position,
                    normal: [-n[0], -n[1], -n[2]],
                    tex_coords: [(su + 1.0) / 2.0, (sv + 1.0) / 2.0],
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self { vertices, indices }
    }

    /// Merge the meshes of an OBJ file into one triangle list.
    pub fn from_obj_models(models: &[tobj::Model]) -> Self {
        let mut geometry = Geometry::default();
        for m in models {
            let base = geometry.vertices.len() as u32;
            geometry
                .vertices
                .extend((0..m.mesh.positions.len() / 3).map(|i| MeshVertex {
                    position: [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    normal: [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(1.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                    tex_coords: [
                        m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                }));
            geometry
                .indices
                .extend(m.mesh.indices.iter().map(|idx| base + idx));
        }
        geometry
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Geometry uploaded to the GPU.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, name: &str, geometry: &Geometry) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: geometry.indices.len() as u32,
        }
    }

    pub fn draw<'pass>(&self, render_pass: &mut wgpu::RenderPass<'pass>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.num_elements, 0, 0..1);
    }
}
