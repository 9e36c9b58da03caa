/// Camera and projection utilities
use crate::error::{Error, Result};
use crate::matrix::Mat4;
use crate::vector::{Vec3, Vec4};

impl Mat4 {
    /// View matrix looking from `eye` towards `center`.
    ///
    /// Builds the camera basis `f = normalize(center - eye)`,
    /// `s = normalize(f x up)`, `u = s x f`, places `{s, u, -f}` in the rows
    /// of a rotation and composes it as `R * translation(-eye)`.
    ///
    /// `up` must not be parallel to the viewing direction and `eye` must
    /// differ from `center`; either violation leaves no usable basis and is
    /// reported as [`Error::DegenerateAxis`].
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Result<Self> {
        if !(eye.is_finite() && center.is_finite() && up.is_finite()) {
            return Err(Error::DegenerateAxis {
                context: "look-at input is not finite",
            });
        }
        let f = (center - eye).normalize();
        if f == Vec3::ZERO {
            return Err(Error::DegenerateAxis {
                context: "look-at eye coincides with center",
            });
        }
        let s = f.cross(up).normalize();
        if s == Vec3::ZERO {
            return Err(Error::DegenerateAxis {
                context: "look-at up vector is parallel to the view direction",
            });
        }
        let u = s.cross(f);

        let rotation = Self::from_rows([
            [s.x, s.y, s.z, 0.0],
            [u.x, u.y, u.z, 0.0],
            [-f.x, -f.y, -f.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let view = rotation * Self::translation(-eye.x, -eye.y, -eye.z);
        if !view.is_finite() {
            return Err(Error::DegenerateAxis {
                context: "look-at eye is too far from the origin",
            });
        }
        Ok(view)
    }

    /// Maps the box `[left, right] x [bottom, top] x [-near, -far]` onto the
    /// NDC cube.
    ///
    /// ```text
    /// | 2/(r-l)  0        0        -(r+l)/(r-l) |
    /// | 0        2/(t-b)  0        -(t+b)/(t-b) |
    /// | 0        0        -2/(f-n) -(f+n)/(f-n) |
    /// | 0        0        0         1           |
    /// ```
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        let (sx, tx) = axis_mapping("horizontal", left, right)?;
        let (sy, ty) = axis_mapping("vertical", bottom, top)?;
        let (sz, tz) = axis_mapping("depth", near, far)?;

        Ok(Self::from_rows([
            [sx, 0.0, 0.0, tx],
            [0.0, sy, 0.0, ty],
            [0.0, 0.0, -sz, tz],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// Symmetric perspective frustum.
    ///
    /// `fov_y_degrees` is the full vertical angle. The bottom row is
    /// `(0, 0, -1, 0)`, so clip-space `w` equals `-z` in view space.
    ///
    /// ```text
    /// | cot/aspect  0    0             0            |
    /// | 0           cot  0             0            |
    /// | 0           0    -(f+n)/(f-n)  -2fn/(f-n)   |
    /// | 0           0    -1            0            |
    /// ```
    ///
    /// An infinite far plane is rejected like any other non-finite bound.
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
            return Err(Error::InvalidFieldOfView {
                degrees: fov_y_degrees,
            });
        }
        if aspect == 0.0 || !aspect.is_finite() {
            return Err(Error::InvalidAspectRatio { aspect });
        }
        let depth = extent("depth", near, far)?;

        let half = fov_y_degrees.to_radians() * 0.5;
        let cot = half.cos() / half.sin();
        let sx = cot / aspect;
        if !sx.is_finite() {
            return Err(Error::InvalidAspectRatio { aspect });
        }

        // far / depth first so a huge far plane does not overflow `2 * far`
        let c = -(far + near) / depth;
        let d = -2.0 * near * (far / depth);

        let m = Self::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, cot, 0.0, 0.0],
            [0.0, 0.0, c, d],
            [0.0, 0.0, -1.0, 0.0],
        ]);
        if !m.is_finite() {
            return Err(Error::InvalidProjectionBounds {
                axis: "depth",
                min: near,
                max: far,
            });
        }
        Ok(m)
    }
}

/// `max - min`, provided both bounds and the difference are finite and
/// nonzero.
fn extent(axis: &'static str, min: f32, max: f32) -> Result<f32> {
    let size = max - min;
    if size == 0.0 || !size.is_finite() || !min.is_finite() || !max.is_finite() {
        return Err(Error::InvalidProjectionBounds { axis, min, max });
    }
    Ok(size)
}

/// Scale and offset sending `[min, max]` onto `[-1, 1]`.
fn axis_mapping(axis: &'static str, min: f32, max: f32) -> Result<(f32, f32)> {
    let size = extent(axis, min, max)?;
    let scale = 2.0 / size;
    let offset = -(max + min) / size;
    if !scale.is_finite() || !offset.is_finite() {
        return Err(Error::InvalidProjectionBounds { axis, min, max });
    }
    Ok((scale, offset))
}

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 30.0,
            aspect: width as f32 / height.max(1) as f32,
            near: 1.0,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Result<Mat4> {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Result<Mat4> {
        match self.mode {
            ProjectionMode::Perspective => {
                Mat4::perspective(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).length();
                let width = height * self.aspect;
                Mat4::orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// `projection * view`, ready to be multiplied by a model matrix.
    pub fn view_projection(&self) -> Result<Mat4> {
        Ok(self.projection_matrix()? * self.view_matrix()?)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Project a 3D point to 2D screen space
///
/// Runs `mvp` on the point, performs the perspective divide and maps NDC to
/// pixels with `y` pointing down. Returns `(x, y, ndc_depth)`, or `None`
/// when the point is behind the eye or outside the clip volume.
pub fn project_to_screen(
    mvp: &Mat4,
    point: Vec3,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp.transform(Vec4::from_point(point));

    // Prevent division by near-zero or negative w (behind the camera)
    if clip.w < 1e-6 {
        return None;
    }
    let ndc = clip.to_cartesian()?;

    // Clip test
    if !(-1.0..=1.0).contains(&ndc.x)
        || !(-1.0..=1.0).contains(&ndc.y)
        || !(-1.0..=1.0).contains(&ndc.z)
    {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

    Some((screen_x, screen_y, ndc.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix().unwrap();
        // eye sits at the view-space origin
        assert_abs_diff_eq!(view.transform_point(camera.position), Vec3::ZERO, epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_eye_maps_to_origin() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y).unwrap();
        let p = view * Vec4::new(0.0, 0.0, 5.0, 1.0);
        assert_abs_diff_eq!(p, Vec4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-6);
        // the target ends up straight ahead on -Z
        assert_abs_diff_eq!(view.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_matches_nalgebra() {
        let eye = Vec3::new(3.0, 3.0, 7.0);
        let expected = nalgebra::Matrix4::look_at_rh(
            &nalgebra::Point3::new(3.0, 3.0, 7.0),
            &nalgebra::Point3::origin(),
            &nalgebra::Vector3::y(),
        );
        let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::Y).unwrap();
        assert_abs_diff_eq!(view, Mat4::from(expected), epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_degenerate() {
        assert!(matches!(
            Mat4::look_at(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::Y),
            Err(Error::DegenerateAxis { .. })
        ));
        assert!(Mat4::look_at(Vec3::ONE, Vec3::ONE, Vec3::Y).is_err());
    }

    #[test]
    fn test_orthographic_boundary() {
        let proj = Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 0.0, 1.0).unwrap();
        let p = proj * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert_abs_diff_eq!(p, Vec4::new(1.0, 1.0, -1.0, 1.0), epsilon = 1e-6);
        let far = proj * Vec4::new(-1.0, -1.0, -1.0, 1.0);
        assert_abs_diff_eq!(far, Vec4::new(-1.0, -1.0, 1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_non_square() {
        // the vertical scale must come from top - bottom
        let proj = Mat4::orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, 10.0).unwrap();
        let p = proj.transform_point(Vec3::new(2.0, 1.0, -1.0));
        assert_abs_diff_eq!(p, Vec3::new(1.0, 1.0, -1.0), epsilon = 1e-6);

        let expected = nalgebra::Matrix4::new_orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, 10.0);
        assert_abs_diff_eq!(proj, Mat4::from(expected), epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_invalid_bounds() {
        for (l, r, b, t, n, f, axis) in [
            (1.0, 1.0, -1.0, 1.0, 0.0, 1.0, "horizontal"),
            (-1.0, 1.0, 2.0, 2.0, 0.0, 1.0, "vertical"),
            (-1.0, 1.0, -1.0, 1.0, 3.0, 3.0, "depth"),
        ] {
            match Mat4::orthographic(l, r, b, t, n, f) {
                Err(Error::InvalidProjectionBounds { axis: got, .. }) => assert_eq!(got, axis),
                other => panic!("expected bounds error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let proj = Mat4::perspective(30.0, 16.0 / 9.0, 1.0, 100.0).unwrap();
        let expected = nalgebra::Matrix4::new_perspective(16.0 / 9.0, 30f32.to_radians(), 1.0, 100.0);
        assert_relative_eq!(proj, Mat4::from(expected), epsilon = 1e-5, max_relative = 1e-5);
    }

    #[test]
    fn test_perspective_w_is_negative_view_z() {
        let proj = Mat4::perspective(60.0, 1.0, 0.5, 50.0).unwrap();
        let clip = proj * Vec4::new(0.3, -0.2, -7.0, 1.0);
        assert_relative_eq!(clip.w, 7.0, epsilon = 1e-6);
        // near and far planes land on -1 and +1
        let near = (proj * Vec4::new(0.0, 0.0, -0.5, 1.0)).to_cartesian().unwrap();
        let far = (proj * Vec4::new(0.0, 0.0, -50.0, 1.0)).to_cartesian().unwrap();
        assert_relative_eq!(near.z, -1.0, epsilon = 1e-5);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_invalid() {
        assert!(matches!(
            Mat4::perspective(0.0, 1.0, 1.0, 10.0),
            Err(Error::InvalidFieldOfView { .. })
        ));
        assert!(matches!(
            Mat4::perspective(180.0, 1.0, 1.0, 10.0),
            Err(Error::InvalidFieldOfView { .. })
        ));
        assert!(matches!(
            Mat4::perspective(f32::NAN, 1.0, 1.0, 10.0),
            Err(Error::InvalidFieldOfView { .. })
        ));
        assert!(matches!(
            Mat4::perspective(45.0, 0.0, 1.0, 10.0),
            Err(Error::InvalidAspectRatio { .. })
        ));
        assert!(matches!(
            Mat4::perspective(45.0, 1.0, 2.0, 2.0),
            Err(Error::InvalidProjectionBounds { axis: "depth", .. })
        ));
    }

    #[test]
    fn test_perspective_infinite_far_rejected() {
        assert!(matches!(
            Mat4::perspective(45.0, 1.0, 0.1, f32::INFINITY),
            Err(Error::InvalidProjectionBounds { axis: "depth", .. })
        ));
        assert!(matches!(
            Mat4::perspective(45.0, 1.0, f32::NAN, 10.0),
            Err(Error::InvalidProjectionBounds { axis: "depth", .. })
        ));
        assert!(matches!(
            Mat4::perspective(45.0, 1e-40, 1.0, 10.0),
            Err(Error::InvalidAspectRatio { .. })
        ));
    }

    #[test]
    fn test_perspective_huge_far_stays_finite() {
        let proj = Mat4::perspective(45.0, 1.0, 1.0, f32::MAX).unwrap();
        assert!(proj.is_finite());
        assert_relative_eq!(proj.get(2, 2), -1.0, epsilon = 1e-6);
        assert_relative_eq!(proj.get(2, 3), -2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_overflow_rejected() {
        // 2 / 1e-39 does not fit in an f32
        assert!(matches!(
            Mat4::orthographic(0.0, 1e-39, -1.0, 1.0, 0.0, 1.0),
            Err(Error::InvalidProjectionBounds { axis: "horizontal", .. })
        ));
        assert!(matches!(
            Mat4::orthographic(f32::NAN, 1.0, -1.0, 1.0, 0.0, 1.0),
            Err(Error::InvalidProjectionBounds { axis: "horizontal", .. })
        ));
        assert!(matches!(
            Mat4::orthographic(-1.0, 1.0, -f32::MAX, f32::MAX, 0.0, 1.0),
            Err(Error::InvalidProjectionBounds { axis: "vertical", .. })
        ));
        assert!(matches!(
            Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 0.0, f32::INFINITY),
            Err(Error::InvalidProjectionBounds { axis: "depth", .. })
        ));
    }

    #[test]
    fn test_look_at_non_finite_rejected() {
        assert!(Mat4::look_at(Vec3::new(f32::NAN, 0.0, 5.0), Vec3::ZERO, Vec3::Y).is_err());
        assert!(Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::splat(f32::INFINITY)).is_err());
    }

    #[test]
    fn test_orthographic_camera_mode() {
        let mut camera = Camera::new(100, 100);
        camera.mode = ProjectionMode::Orthographic;
        let proj = camera.projection_matrix().unwrap();
        // the box is as tall as the eye-target distance (5)
        assert_relative_eq!(proj.get(1, 1), 2.0 / 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_project_to_screen() {
        let camera = Camera::new(200, 100);
        let vp = camera.view_projection().unwrap();

        let (x, y, depth) = project_to_screen(&vp, Vec3::ZERO, 200, 100).unwrap();
        assert_relative_eq!(x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(y, 50.0, epsilon = 1e-3);
        assert!(depth > -1.0 && depth < 1.0);

        // above the target lands higher on screen
        let (_, y_up, _) = project_to_screen(&vp, Vec3::new(0.0, 0.5, 0.0), 200, 100).unwrap();
        assert!(y_up < y);

        // behind the camera
        assert!(project_to_screen(&vp, Vec3::new(0.0, 0.0, 10.0), 200, 100).is_none());
    }
}
