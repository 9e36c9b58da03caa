/// glmath Web - WASM bindings for the transform kernel
///
/// Every matrix crosses the boundary as 16 column-major floats (a JS
/// `Float32Array`), the layout `uniformMatrix4fv` takes with
/// `transpose = false`. Kernel errors surface as rejected calls carrying
/// the error message.

use glmath_core::{
    ClickRecorder, DragRotation, Mat4, NodeId, RotationState, SceneGraph, Transform, Vec3,
};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, WebGlUniformLocation};

fn to_js(err: glmath_core::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn mat4(coeffs: &[f32]) -> Result<Mat4, String> {
    let m: [f32; 16] = coeffs
        .try_into()
        .map_err(|_| format!("expected 16 matrix coefficients, got {}", coeffs.len()))?;
    Ok(Mat4::from_cols_array(m))
}

fn vec3(name: &str, v: &[f32]) -> Result<Vec3, String> {
    match *v {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("{name}: expected 3 components, got {}", v.len())),
    }
}

fn coeffs(m: Mat4) -> Vec<f32> {
    m.to_cols_array().to_vec()
}

#[wasm_bindgen]
pub fn translation(x: f32, y: f32, z: f32) -> Vec<f32> {
    coeffs(Mat4::translation(x, y, z))
}

/// Rotation by `radians` about `(ax, ay, az)`; identity for a zero axis.
#[wasm_bindgen]
pub fn rotation(radians: f32, ax: f32, ay: f32, az: f32) -> Vec<f32> {
    coeffs(Mat4::rotation(radians, Vec3::new(ax, ay, az)))
}

#[wasm_bindgen]
pub fn scale(sx: f32, sy: f32, sz: f32) -> Vec<f32> {
    coeffs(Mat4::scale(sx, sy, sz))
}

#[wasm_bindgen(js_name = lookAt)]
#[allow(clippy::too_many_arguments)]
pub fn look_at(
    eye_x: f32,
    eye_y: f32,
    eye_z: f32,
    center_x: f32,
    center_y: f32,
    center_z: f32,
    up_x: f32,
    up_y: f32,
    up_z: f32,
) -> Result<Vec<f32>, JsValue> {
    Mat4::look_at(
        Vec3::new(eye_x, eye_y, eye_z),
        Vec3::new(center_x, center_y, center_z),
        Vec3::new(up_x, up_y, up_z),
    )
    .map(coeffs)
    .map_err(to_js)
}

#[wasm_bindgen]
pub fn orthographic(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Result<Vec<f32>, JsValue> {
    Mat4::orthographic(left, right, bottom, top, near, far)
        .map(coeffs)
        .map_err(to_js)
}

/// `fov_y` in degrees.
#[wasm_bindgen]
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<Vec<f32>, JsValue> {
    Mat4::perspective(fov_y, aspect, near, far)
        .map(coeffs)
        .map_err(to_js)
}

/// `a * b`
#[wasm_bindgen]
pub fn multiply(a: &[f32], b: &[f32]) -> Result<Vec<f32>, JsValue> {
    Ok(coeffs(mat4(a)? * mat4(b)?))
}

#[wasm_bindgen]
pub fn invert(m: &[f32]) -> Result<Vec<f32>, JsValue> {
    mat4(m)?.try_inverse().map(coeffs).map_err(to_js)
}

#[wasm_bindgen]
pub fn transpose(m: &[f32]) -> Result<Vec<f32>, JsValue> {
    Ok(coeffs(mat4(m)?.transpose()))
}

/// Inverse-transpose of `m`, for transforming normals.
#[wasm_bindgen(js_name = normalMatrix)]
pub fn normal_matrix(m: &[f32]) -> Result<Vec<f32>, JsValue> {
    mat4(m)?.normal_matrix().map(coeffs).map_err(to_js)
}

/// Applies `m` to the point `(x, y, z, 1)` and returns all four clip
/// coordinates.
#[wasm_bindgen(js_name = transformPoint)]
pub fn transform_point(m: &[f32], x: f32, y: f32, z: f32) -> Result<Vec<f32>, JsValue> {
    let clip = mat4(m)?.transform(Vec3::new(x, y, z).extend(1.0));
    Ok(clip.to_array().to_vec())
}

/// Uploads a column-major matrix to a `mat4` uniform.
#[wasm_bindgen(js_name = uploadMatrix)]
pub fn upload_matrix(
    gl: &WebGl2RenderingContext,
    location: &WebGlUniformLocation,
    coeffs: &[f32],
) -> Result<(), JsValue> {
    let m = mat4(coeffs)?;
    gl.uniform_matrix4fv_with_f32_array(Some(location), false, m.as_slice());
    Ok(())
}

/// Transform hierarchy addressed by integer handles.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct WebScene {
    graph: SceneGraph,
    nodes: Vec<NodeId>,
}

impl WebScene {
    fn node(&self, handle: usize) -> Result<NodeId, String> {
        self.nodes
            .get(handle)
            .copied()
            .ok_or_else(|| format!("unknown node handle {handle}"))
    }

    fn register(&mut self, id: NodeId) -> usize {
        self.nodes.push(id);
        self.nodes.len() - 1
    }
}

#[wasm_bindgen]
impl WebScene {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(js_name = addRoot)]
    pub fn add_root(&mut self) -> usize {
        let id = self.graph.add_root(Transform::IDENTITY);
        self.register(id)
    }

    #[wasm_bindgen(js_name = addChild)]
    pub fn add_child(&mut self, parent: usize) -> Result<usize, JsValue> {
        let parent = self.node(parent)?;
        let id = self
            .graph
            .add_child(parent, Transform::IDENTITY)
            .map_err(to_js)?;
        Ok(self.register(id))
    }

    /// Sets the local translation, Euler rotation (radians) and scale.
    #[wasm_bindgen(js_name = setLocal)]
    pub fn set_local(
        &mut self,
        node: usize,
        translation: &[f32],
        rotation: &[f32],
        scale: &[f32],
    ) -> Result<(), JsValue> {
        let id = self.node(node)?;
        let r = vec3("rotation", rotation)?;
        let local = Transform::from_translation(vec3("translation", translation)?)
            .with_rotation(RotationState::new(r.x, r.y, r.z))
            .with_scale(vec3("scale", scale)?);
        self.graph.set_local(id, local).map_err(to_js)
    }

    pub fn update(&mut self) {
        self.graph.update();
    }

    pub fn world(&self, node: usize) -> Result<Vec<f32>, JsValue> {
        let id = self.node(node)?;
        self.graph.world(id).map(coeffs).map_err(to_js)
    }

    #[wasm_bindgen(js_name = normalMatrix)]
    pub fn normal_matrix(&self, node: usize) -> Result<Vec<f32>, JsValue> {
        let id = self.node(node)?;
        self.graph.normal_matrix(id).map(coeffs).map_err(to_js)
    }
}

/// Canvas click and drag state.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct WebInput {
    clicks: ClickRecorder,
    drag: DragRotation,
}

#[wasm_bindgen]
impl WebInput {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a click and returns `[x, y, r, g, b, a]` in NDC.
    pub fn click(&mut self, x: f32, y: f32, width: f32, height: f32) -> Vec<f32> {
        let p = self.clicks.click(x, y, width, height);
        let [r, g, b, a] = p.color;
        vec![p.x, p.y, r, g, b, a]
    }

    /// Recorded positions as flat `x, y` pairs.
    pub fn points(&self) -> Vec<f32> {
        self.clicks.points().iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Recorded colours as flat RGBA quadruples.
    pub fn colors(&self) -> Vec<f32> {
        self.clicks.points().iter().flat_map(|p| p.color).collect()
    }

    pub fn clear(&mut self) {
        self.clicks.clear();
    }

    pub fn press(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.drag.press(x, y, width, height);
    }

    pub fn release(&mut self) {
        self.drag.release();
    }

    pub fn moved(&mut self, x: f32, y: f32) {
        self.drag.moved(x, y);
    }

    #[wasm_bindgen(js_name = dragMatrix)]
    pub fn drag_matrix(&self) -> Vec<f32> {
        coeffs(self.drag.matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_layout() {
        let t = translation(1.0, 2.0, 3.0);
        assert_eq!(t.len(), 16);
        assert_eq!(&t[12..], &[1.0, 2.0, 3.0, 1.0]);

        let p = transform_point(&t, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(p, vec![1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_matrix_length_checked() {
        assert!(mat4(&[0.0; 15]).is_err());
        assert!(vec3("scale", &[1.0, 1.0]).is_err());
        assert_eq!(mat4(&scale(2.0, 2.0, 2.0)).unwrap(), Mat4::scale(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_multiply_inverse() {
        let s = scale(2.0, 4.0, 8.0);
        let inv = invert(&s).unwrap();
        let id = multiply(&s, &inv).unwrap();
        for (a, b) in id.iter().zip(Mat4::IDENTITY.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_scene_handles() {
        let mut scene = WebScene::new();
        let root = scene.add_root();
        let child = scene.add_child(root).unwrap();
        scene
            .set_local(root, &[0.0, 1.0, 0.0], &[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0])
            .unwrap();
        scene
            .set_local(child, &[2.0, 0.0, 0.0], &[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0])
            .unwrap();
        scene.update();
        let world = scene.world(child).unwrap();
        assert_eq!(&world[12..], &[2.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_input_click() {
        let mut input = WebInput::new();
        let first = input.click(600.0, 100.0, 800.0, 600.0);
        assert_eq!(&first[..2], &[0.5, 2.0 / 3.0]);
        assert_eq!(input.points().len(), 2);
        assert_eq!(input.colors().len(), 4);
        input.clear();
        assert!(input.points().is_empty());
    }
}
