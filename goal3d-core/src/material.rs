//! Surface materials shared by mesh nodes

/// RGB color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const NET_GREY: Rgb = Rgb(0x88, 0x88, 0x88);
    pub const FLAG_RED: Rgb = Rgb(0xd0, 0x20, 0x20);
    pub const FOREST_GREEN: Rgb = Rgb(0x22, 0x8b, 0x22);
}

/// Index of a material inside a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Rgb,
    pub wireframe: bool,
    /// Draw both faces (nets and pennants are flat)
    pub double_sided: bool,
}

impl Material {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
            wireframe: false,
            double_sided: false,
        }
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_material_is_solid_and_single_sided() {
        let material = Material::new("goal", Rgb::WHITE);
        assert_eq!(material.name, "goal");
        assert!(!material.wireframe);
        assert!(!material.double_sided);
    }

    #[test]
    fn test_double_sided_builder() {
        let net = Material::new("net", Rgb::NET_GREY).double_sided();
        assert!(net.double_sided);
        assert_eq!(net.color, Rgb(0x88, 0x88, 0x88));
    }
}
