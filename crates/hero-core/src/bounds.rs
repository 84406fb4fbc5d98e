use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box holding every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::new(first, first);
        for p in iter {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }

    /// Box enclosing this box after `m` is applied to all eight corners.
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];
        // eight corners always yield a box
        let mut out = Aabb::new(m.transform_point3(corners[0]), m.transform_point3(corners[0]));
        for c in &corners[1..] {
            let p = m.transform_point3(*c);
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        out
    }
}

/// Uniform scale plus re-centering offset that fits a model into a cube of
/// `desired_size`, centred on the local origin.
///
/// `translation` is expressed after scaling: a point `p` of the source model
/// lands at `p * scale + translation`. Zero-size boxes are not guarded against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
    pub center: Vec3,
    pub size: Vec3,
    pub scale: f32,
    pub translation: Vec3,
}

impl Normalization {
    pub fn fit(bounds: &Aabb, desired_size: f32) -> Self {
        let center = bounds.center();
        let scale = desired_size / bounds.max_dimension();
        Self {
            center,
            size: bounds.size(),
            scale,
            translation: -center * scale,
        }
    }

    #[inline]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        p * self.scale + self.translation
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            glam::Quat::IDENTITY,
            self.translation,
        )
    }
}
