use glam::{Mat4, Vec3};

/// Projection parameters kept so the matrix can be rebuilt on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective { fov_y: f32, near: f32, far: f32 },
    /// Pixel-space: x in `0..width`, y in `0..height`.
    Orthographic { near: f32, far: f32 },
}

impl Projection {
    /// OpenGL clip-space matrix (depth in -1..1) for a viewport.
    pub fn matrix(&self, width: u32, height: u32) -> Mat4 {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        match *self {
            Self::Perspective { fov_y, near, far } => {
                Mat4::perspective_rh_gl(fov_y, w / h, near, far)
            }
            Self::Orthographic { near, far } => Mat4::orthographic_rh_gl(0.0, w, 0.0, h, near, far),
        }
    }
}

/// Fly camera: position plus a facing direction, and a cached projection.
///
/// `front` is derived from `direction` and cannot be set on its own. The
/// view matrix is rebuilt on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    direction: Vec3,
    up: Vec3,
    front: Vec3,
    projection: Mat4,
    params: Projection,
}

impl Camera {
    pub fn perspective(
        position: Vec3,
        viewport_width: u32,
        viewport_height: u32,
        near: f32,
        far: f32,
        fov_radians: f32,
    ) -> Self {
        Self::with_projection(
            position,
            viewport_width,
            viewport_height,
            Projection::Perspective {
                fov_y: fov_radians,
                near,
                far,
            },
        )
    }

    pub fn orthographic(position: Vec3, viewport_width: u32, viewport_height: u32) -> Self {
        Self::with_projection(
            position,
            viewport_width,
            viewport_height,
            Projection::Orthographic {
                near: -1.0,
                far: 1.0,
            },
        )
    }

    fn with_projection(position: Vec3, width: u32, height: u32, params: Projection) -> Self {
        let mut camera = Self {
            position,
            direction: Vec3::ZERO,
            up: Vec3::Y,
            front: Vec3::NEG_Z,
            projection: params.matrix(width, height),
            params,
        };
        camera.set_direction(Vec3::ZERO);
        camera
    }

    /// Set the facing direction (not a point to look at).
    ///
    /// A zero vector keeps the camera looking down -Z.
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
        self.front = direction.try_normalize().unwrap_or(Vec3::NEG_Z);
    }

    /// Rebuild the projection for a new viewport size.
    pub fn update_window_size(&mut self, width: u32, height: u32) {
        self.projection = self.params.matrix(width, height);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize_or_zero()
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn projection_params(&self) -> Projection {
        self.params
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}
