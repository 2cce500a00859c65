//! RGB color triple carried by seed points and particles.

/// An 8-bit RGB color. Alpha is consulted during sampling and then dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA bytes for this color.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Rgb::new(value[0], value[1], value[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(value: Rgb) -> Self {
        [value.r, value.g, value.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_rgba_is_opaque() {
        assert_eq!(Rgb::new(1, 2, 3).to_rgba(), [1, 2, 3, 255]);
    }

    #[test]
    fn array_conversions_preserve_channels() {
        let c: Rgb = [10, 20, 30].into();
        assert_eq!(c, Rgb::new(10, 20, 30));
        let back: [u8; 3] = c.into();
        assert_eq!(back, [10, 20, 30]);
    }
}
