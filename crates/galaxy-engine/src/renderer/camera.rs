use glam::{Mat3, Mat4, Quat, Vec3};
use super::instance::CameraUniform;
use super::ray::Ray;

/// Perspective camera with a free orientation.
/// Looks down its local -Z axis with +Y up, like a right-handed GL camera.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub orientation: Quat,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov,
            aspect,
            near,
            far,
        }
    }

    /// Rotate to face `target`. A target straight above or below swaps the
    /// up reference to +Z so the basis never degenerates.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() < 1e-12 {
            return;
        }
        let forward = forward.normalize();
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 { Vec3::Z } else { Vec3::Y };
        let right = forward.cross(up).normalize();
        let true_up = right.cross(forward);
        let basis = Mat3::from_cols(right, true_up, -forward);
        self.orientation = Quat::from_mat3(&basis).normalize();
    }

    /// Unit vector the camera is looking along.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to normalized device coordinates.
    /// `z < 1` means the point is in front of the far plane and not behind the eye.
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    /// Ray from the eye through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(self.position, far - near)
    }

    /// Update the aspect ratio. Non-finite or non-positive ratios are ignored.
    pub fn set_aspect(&mut self, aspect: f32) -> bool {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            true
        } else {
            false
        }
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            eye: self.position.extend(1.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3, target: Vec3) -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0);
        cam.position = position;
        cam.look_at(target);
        cam
    }

    #[test]
    fn look_at_faces_target() {
        let cam = camera_at(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO);
        let expected = (Vec3::ZERO - Vec3::new(3.0, 3.0, 3.0)).normalize();
        assert!((cam.forward() - expected).length() < 1e-5);
    }

    #[test]
    fn look_at_matches_glam_view_matrix() {
        let eye = Vec3::new(1.0, 2.0, 5.0);
        let cam = camera_at(eye, Vec3::new(1.6, 0.0, 1.6));
        let reference = Mat4::look_at_rh(eye, Vec3::new(1.6, 0.0, 1.6), Vec3::Y);
        let p = Vec3::new(0.3, -0.2, 0.7);
        let a = cam.view_matrix().transform_point3(p);
        let b = reference.transform_point3(p);
        assert!((a - b).length() < 1e-4, "{:?} vs {:?}", a, b);
    }

    #[test]
    fn look_straight_down_does_not_degenerate() {
        let cam = camera_at(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        assert!((cam.forward() - Vec3::NEG_Y).length() < 1e-5);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn target_projects_to_center_and_in_front() {
        let cam = camera_at(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO);
        let ndc = cam.project(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z < 1.0);
    }

    #[test]
    fn point_behind_camera_is_not_visible() {
        let cam = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let ndc = cam.project(Vec3::new(0.0, 0.0, 10.0));
        assert!(ndc.z >= 1.0 || ndc.z < -1.0);
    }

    #[test]
    fn center_ray_points_forward() {
        let cam = camera_at(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO);
        let ray = cam.ray_from_ndc(0.0, 0.0);
        assert!((ray.direction - cam.forward()).length() < 1e-4);
        assert_eq!(ray.origin, cam.position);
    }

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut cam = PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0);
        assert!(!cam.set_aspect(0.0));
        assert!(!cam.set_aspect(f32::INFINITY));
        assert_eq!(cam.aspect, 1.5);
        assert!(cam.set_aspect(2.0));
    }
}
