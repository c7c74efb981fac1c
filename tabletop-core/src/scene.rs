//! The fixed desk scene: which mesh is drawn where, with which texture

use std::collections::BTreeMap;

use nalgebra::Vector3;

use crate::cylinder::{cylinder_disk, cylinder_side, CylinderParams};
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::primitives;
use crate::transform::Transform3D;

pub const BOTTLE: CylinderParams = CylinderParams::new(0.3, 1.5, 20);
pub const CAP: CylinderParams = CylinderParams::new(0.075, 0.075, 20);

/// Textures the scene samples from, by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureSlot {
    House,
    Floor,
    Tissue,
    Watch,
    Bottle,
    Cap,
    WatchFace,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 7] = [
        TextureSlot::House,
        TextureSlot::Floor,
        TextureSlot::Tissue,
        TextureSlot::Watch,
        TextureSlot::Bottle,
        TextureSlot::Cap,
        TextureSlot::WatchFace,
    ];

    /// Path relative to the asset directory
    pub fn file_name(self) -> &'static str {
        match self {
            TextureSlot::House => "textures/housetexture.jpg",
            TextureSlot::Floor => "textures/blankback.jpg",
            TextureSlot::Tissue => "textures/tissuetexture.jpg",
            TextureSlot::Watch => "textures/watchtexture.jpg",
            TextureSlot::Bottle => "textures/bottletexture.jpg",
            TextureSlot::Cap => "textures/captexture.jpg",
            TextureSlot::WatchFace => "textures/watchfacetexture.jpg",
        }
    }
}

/// Meshes the scene instantiates; several objects can share one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeshSlot {
    Pyramid,
    Cube,
    Plane,
    TissueBox,
    BottleSide,
    BottleDisk,
    CapSide,
    CapDisk,
    WatchHand,
}

/// One draw call
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub label: &'static str,
    pub mesh: MeshSlot,
    pub texture: TextureSlot,
    pub transform: Transform3D,
}

/// Static meshes plus the ordered list of objects drawn each frame
#[derive(Debug, Clone)]
pub struct Scene {
    pub meshes: BTreeMap<MeshSlot, Mesh>,
    pub objects: Vec<SceneObject>,
}

fn trs(translation: [f32; 3], rotation: Option<([f32; 3], f32)>, scale: [f32; 3]) -> Transform3D {
    let rotation = rotation
        .map(|(axis, degrees)| Transform3D::rotation_degrees(Vector3::from(axis), degrees))
        .unwrap_or_default();
    Transform3D::from_trs(
        Transform3D::translation(Vector3::from(translation)),
        rotation,
        Transform3D::scaling(Vector3::from(scale)),
    )
}

const X_AXIS: [f32; 3] = [1.0, 0.0, 0.0];
const Y_AXIS: [f32; 3] = [0.0, 1.0, 0.0];
const Z_AXIS: [f32; 3] = [0.0, 0.0, 1.0];
const UNIT: [f32; 3] = [1.0, 1.0, 1.0];

impl Scene {
    /// Build every mesh the desk scene uses
    pub fn desk_meshes() -> Result<BTreeMap<MeshSlot, Mesh>> {
        Ok(BTreeMap::from([
            (MeshSlot::Pyramid, primitives::pyramid()?),
            (MeshSlot::Cube, primitives::cube()?),
            (MeshSlot::Plane, primitives::plane()?),
            (MeshSlot::TissueBox, primitives::tissue_box()?),
            (MeshSlot::BottleSide, cylinder_side("bottle_side", BOTTLE)?),
            (MeshSlot::BottleDisk, cylinder_disk("bottle_disk", BOTTLE)?),
            (MeshSlot::CapSide, cylinder_side("cap_side", CAP)?),
            (MeshSlot::CapDisk, cylinder_disk("cap_disk", CAP)?),
            (MeshSlot::WatchHand, primitives::watch_hand()?),
        ]))
    }

    /// The desk: house-textured pyramid and cube, tissue box, bottle with cap and a wristwatch
    pub fn desk() -> Result<Self> {
        use MeshSlot as M;
        use TextureSlot as T;

        let object = |label: &'static str, mesh: MeshSlot, texture: TextureSlot, transform: Transform3D| {
            SceneObject { label, mesh, texture, transform }
        };

        let objects = vec![
            object("pyramid", M::Pyramid, T::House, trs([0.25, -0.5, -0.25], None, [0.5; 3])),
            object("cube", M::Cube, T::House, trs([0.25, -0.75, 0.0], None, [0.5; 3])),
            object("floor", M::Plane, T::Floor, trs([0.0, 4.0, 0.0], None, [10.0; 3])),
            object("tissue box", M::TissueBox, T::Tissue, trs([1.5, -0.5, 0.5], None, UNIT)),
            object("bottle body", M::BottleSide, T::Bottle, trs([1.3, 0.3, -0.4], Some((X_AXIS, -90.0)), UNIT)),
            object("bottle top", M::BottleDisk, T::Bottle, trs([1.3, 0.3, -1.15], Some((Z_AXIS, -90.0)), UNIT)),
            object("bottle bottom", M::BottleDisk, T::Bottle, trs([1.3, 0.3, 0.35], Some((Z_AXIS, -90.0)), UNIT)),
            object("cap body", M::CapSide, T::Cap, trs([1.3, 0.3, 0.388], Some((X_AXIS, -90.0)), UNIT)),
            object("cap top", M::CapDisk, T::Cap, trs([1.3, 0.3, 0.4255], Some((Z_AXIS, -90.0)), UNIT)),
            object("watch hand", M::WatchHand, T::Watch, trs([-0.3, -0.97, -0.32], None, [1.0, 1.0, 0.75])),
            object("watch hand", M::WatchHand, T::Watch, trs([-0.3, -0.97, 0.68], None, [1.0, 1.0, 0.5])),
            object("watch face body", M::CapSide, T::Watch, trs([-0.3, -0.955, -0.22], Some((Y_AXIS, -90.0)), [2.0, 1.0, 2.0])),
            object("watch face", M::CapDisk, T::WatchFace, trs([-0.3, -0.919, -0.22], Some((X_AXIS, -90.0)), [2.0; 3])),
        ];

        let scene = Self {
            meshes: Self::desk_meshes()?,
            objects,
        };
        scene.validate()?;
        log::debug!(
            "desk scene: {} meshes, {} objects, {} triangles",
            scene.meshes.len(),
            scene.objects.len(),
            scene.triangle_count()
        );
        Ok(scene)
    }

    /// Check that every object refers to a built mesh
    pub fn validate(&self) -> Result<()> {
        for object in &self.objects {
            if !self.meshes.contains_key(&object.mesh) {
                return Err(Error::InvalidData(format!(
                    "object '{}' uses mesh {:?} which was not built",
                    object.label, object.mesh
                )));
            }
        }
        Ok(())
    }

    pub fn mesh(&self, slot: MeshSlot) -> Option<&Mesh> {
        self.meshes.get(&slot)
    }

    /// Triangles submitted per frame
    pub fn triangle_count(&self) -> usize {
        self.objects
            .iter()
            .filter_map(|o| self.mesh(o.mesh))
            .map(Mesh::triangle_count)
            .sum()
    }

    /// Textures referenced by at least one object
    pub fn texture_slots(&self) -> Vec<TextureSlot> {
        let mut slots: Vec<_> = self.objects.iter().map(|o| o.texture).collect();
        slots.sort();
        slots.dedup();
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_desk_has_thirteen_draws() {
        let scene = Scene::desk().unwrap();
        assert_eq!(scene.objects.len(), 13);
        assert_eq!(scene.meshes.len(), 9);
    }

    #[test]
    fn test_every_texture_is_used() {
        let scene = Scene::desk().unwrap();
        assert_eq!(scene.texture_slots(), TextureSlot::ALL.to_vec());
    }

    #[test]
    fn test_missing_mesh_is_reported() {
        let mut scene = Scene::desk().unwrap();
        scene.meshes.remove(&MeshSlot::CapDisk);
        assert!(matches!(scene.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_bottle_lies_along_z() {
        let scene = Scene::desk().unwrap();
        let body = scene.objects.iter().find(|o| o.label == "bottle body").unwrap();
        let top = body.transform.transform_point(&Point3::new(0.0, BOTTLE.height / 2.0, 0.0));
        let bottom = body.transform.transform_point(&Point3::new(0.0, -BOTTLE.height / 2.0, 0.0));
        assert_relative_eq!(top, Point3::new(1.3, 0.3, -1.15), epsilon = 1e-5);
        assert_relative_eq!(bottom, Point3::new(1.3, 0.3, 0.35), epsilon = 1e-5);
    }

    #[test]
    fn test_floor_sits_below_objects() {
        let scene = Scene::desk().unwrap();
        let floor = scene.objects.iter().find(|o| o.label == "floor").unwrap();
        let p = floor.transform.transform_point(&Point3::new(0.0, -0.5, 0.0));
        assert_relative_eq!(p.y, -1.0, epsilon = 1e-6);
    }
}
