use std::sync::atomic::{AtomicUsize, Ordering};

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::error::ViewerError;

static LIVE_SCENES: AtomicUsize = AtomicUsize::new(0);

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// One drawable chunk of geometry with node transforms already baked in.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePrimitive {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// In-memory representation of a decoded 3D asset, ready for GPU upload.
///
/// Each live `SceneGraph` is counted process-wide; dropping it (on URL
/// change or viewport teardown) decrements the count, which is what the
/// resource-release tests assert on.
#[derive(Debug)]
pub struct SceneGraph {
    pub primitives: Vec<ScenePrimitive>,
    _live: LiveToken,
}

#[derive(Debug)]
struct LiveToken;

impl LiveToken {
    fn new() -> Self {
        LIVE_SCENES.fetch_add(1, Ordering::SeqCst);
        Self
    }
}

impl Drop for LiveToken {
    fn drop(&mut self) {
        LIVE_SCENES.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SceneGraph {
    pub fn from_primitives(primitives: Vec<ScenePrimitive>) -> Self {
        Self {
            primitives,
            _live: LiveToken::new(),
        }
    }

    /// Number of scene graphs currently alive in this process.
    pub fn live_count() -> usize {
        LIVE_SCENES.load(Ordering::SeqCst)
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.vertices.len()).sum()
    }

    /// Axis-aligned bounds over all primitives.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for prim in &self.primitives {
            for v in &prim.vertices {
                let p = Vec3::from(v.position);
                min = min.min(p);
                max = max.max(p);
            }
        }
        if min.x > max.x {
            (Vec3::ZERO, Vec3::ZERO)
        } else {
            (min, max)
        }
    }
}

/// Decode a binary glTF asset into a flat scene graph.
///
/// Pure and GPU-free. Node transforms are baked into vertex positions,
/// missing normals are synthesized from the triangle faces, and the
/// material base color is folded into per-vertex colors.
pub fn decode_glb(bytes: &[u8]) -> Result<SceneGraph, ViewerError> {
    let (doc, buffers, _images) =
        gltf::import_slice(bytes).map_err(|e| ViewerError::Decode(e.to_string()))?;

    let mut primitives = Vec::new();
    for scene in doc.scenes() {
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, &buffers, &mut primitives);
        }
    }

    if primitives.is_empty() {
        return Err(ViewerError::Decode(
            "asset contains no renderable geometry".into(),
        ));
    }

    log::info!(
        "Decoded GLB: {} primitives, {} vertices",
        primitives.len(),
        primitives.iter().map(|p| p.vertices.len()).sum::<usize>()
    );

    Ok(SceneGraph::from_primitives(primitives))
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<ScenePrimitive>,
) {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for prim in mesh.primitives() {
            if let Some(p) = read_primitive(&prim, transform, buffers) {
                out.push(p);
            }
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, out);
    }
}

fn read_primitive(
    prim: &gltf::Primitive,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
) -> Option<ScenePrimitive> {
    let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|it| it.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|it| it.collect());
    let vertex_colors: Option<Vec<[f32; 4]>> =
        reader.read_colors(0).map(|c| c.into_rgba_f32().collect());
    let base_color = prim
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    let normal_matrix = Mat3::from_mat4(transform.inverse().transpose());

    let mut vertices: Vec<MeshVertex> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let position = transform.transform_point3(Vec3::from(*p));
            let normal = normals
                .as_ref()
                .map(|ns| (normal_matrix * Vec3::from(ns[i])).normalize_or_zero())
                .unwrap_or(Vec3::ZERO);
            let color = match &vertex_colors {
                Some(cs) => [
                    cs[i][0] * base_color[0],
                    cs[i][1] * base_color[1],
                    cs[i][2] * base_color[2],
                ],
                None => [base_color[0], base_color[1], base_color[2]],
            };
            MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                color,
            }
        })
        .collect();

    if normals.is_none() {
        accumulate_face_normals(&mut vertices, &indices);
    }

    Some(ScenePrimitive { vertices, indices })
}

/// Area-weighted vertex normals for primitives that ship without them.
fn accumulate_face_normals(vertices: &mut [MeshVertex], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from(vertices[a].position);
        let pb = Vec3::from(vertices[b].position);
        let pc = Vec3::from(vertices[c].position);
        let face = (pb - pa).cross(pc - pa);
        for &i in &[a, b, c] {
            let n = Vec3::from(vertices[i].normal) + face;
            vertices[i].normal = n.to_array();
        }
    }
    for v in vertices {
        v.normal = Vec3::from(v.normal).normalize_or_zero().to_array();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Live-count assertions share a process-wide counter; serialize the
    /// tests that touch it.
    pub static LIVE_LOCK: Mutex<()> = Mutex::new(());

    pub fn triangle_scene() -> SceneGraph {
        SceneGraph::from_primitives(vec![ScenePrimitive {
            vertices: vec![
                MeshVertex {
                    position: [0.0, 0.0, 0.0],
                    normal: [0.0, 0.0, 1.0],
                    color: [1.0, 1.0, 1.0],
                },
                MeshVertex {
                    position: [1.0, 0.0, 0.0],
                    normal: [0.0, 0.0, 1.0],
                    color: [1.0, 1.0, 1.0],
                },
                MeshVertex {
                    position: [0.0, 1.0, 0.0],
                    normal: [0.0, 0.0, 1.0],
                    color: [1.0, 1.0, 1.0],
                },
            ],
            indices: vec![0, 1, 2],
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{LIVE_LOCK, triangle_scene};
    use super::*;

    /// Minimal GLB container: header + JSON chunk + BIN chunk.
    fn build_glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json_bytes = json.as_bytes().to_vec();
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(b' ');
        }
        let mut bin_bytes = bin.to_vec();
        while bin_bytes.len() % 4 != 0 {
            bin_bytes.push(0);
        }

        let total = 12 + 8 + json_bytes.len() + 8 + bin_bytes.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json_bytes);
        out.extend_from_slice(&(bin_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin_bytes);
        out
    }

    fn triangle_glb() -> Vec<u8> {
        let json = r#"{
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [{"mesh": 0}],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "accessors": [{
                "bufferView": 0, "componentType": 5126, "count": 3,
                "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            }],
            "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
            "buffers": [{"byteLength": 36}]
        }"#;

        let mut bin = Vec::new();
        for v in [
            [0.0f32, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ] {
            for c in v {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        build_glb(json, &bin)
    }

    #[test]
    fn test_decode_triangle() {
        let _guard = LIVE_LOCK.lock().unwrap();

        let scene = decode_glb(&triangle_glb()).unwrap();
        assert_eq!(scene.primitives.len(), 1);
        let prim = &scene.primitives[0];
        assert_eq!(prim.vertices.len(), 3);
        assert_eq!(prim.indices, vec![0, 1, 2]);

        // no normals in the asset -> synthesized face normal (+Z for CCW)
        for v in &prim.vertices {
            assert!((v.normal[2] - 1.0).abs() < 1e-5);
        }

        let (min, max) = scene.bounds();
        assert_eq!(min, glam::Vec3::ZERO);
        assert_eq!(max, glam::Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_glb(b"not a gltf asset").unwrap_err();
        assert!(matches!(err, ViewerError::Decode(_)));
    }

    #[test]
    fn test_live_count_tracks_drops() {
        let _guard = LIVE_LOCK.lock().unwrap();

        let before = SceneGraph::live_count();
        let a = triangle_scene();
        let b = triangle_scene();
        assert_eq!(SceneGraph::live_count(), before + 2);
        drop(a);
        assert_eq!(SceneGraph::live_count(), before + 1);
        drop(b);
        assert_eq!(SceneGraph::live_count(), before);
    }

    #[test]
    fn test_empty_bounds() {
        let _guard = LIVE_LOCK.lock().unwrap();
        let scene = SceneGraph::from_primitives(vec![]);
        assert_eq!(scene.bounds(), (glam::Vec3::ZERO, glam::Vec3::ZERO));
    }
}
