// THEORY:
// The `Pixel` module is the most fundamental unit of the tracker. It is a "dumb"
// data container for a single RGB sample plus the one heuristic the rest of the
// system needs from it: perceived brightness.
//
// Key principles:
// 1) Single-pixel scope: luminance is computed from this pixel alone, with no
//    knowledge of neighbors in space or history in time. Anything comparative
//    (frame-to-frame differences) lives in the mask layer above.
// 2) Alpha is ignored. Captured video has no meaningful transparency, so RGBA
//    input is reduced to its colour channels on the way in.
// 3) BT.709 weights. Luminance uses the Rec. 709 coefficients, which weight green
//    heavily; a saturated green light crosses a brightness threshold long before a
//    saturated blue one does.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type Luminance = f64;

    const RED_WEIGHT: f64 = 0.2126;
    const GREEN_WEIGHT: f64 = 0.7152;
    const BLUE_WEIGHT: f64 = 0.0722;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        /// Luminance estimate (Rec. 709 / sRGB primaries), in the 0..255 range.
        pub fn luminance(&self) -> Luminance {
            RED_WEIGHT * self.red as f64 + GREEN_WEIGHT * self.green as f64 + BLUE_WEIGHT * self.blue as f64
        }

        /// Strictly greater than: a pixel sitting exactly on the threshold is not bright.
        pub fn is_brighter_than(&self, threshold: Luminance) -> bool {
            self.luminance() > threshold
        }
    }

    impl From<[Byte; 3]> for Pixel {
        fn from(bytes: [Byte; 3]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2])
        }
    }

    impl From<image::Rgb<Byte>> for Pixel {
        fn from(rgb: image::Rgb<Byte>) -> Self {
            Pixel::from(rgb.0)
        }
    }

    impl From<image::Rgba<Byte>> for Pixel {
        fn from(rgba: image::Rgba<Byte>) -> Self {
            let [red, green, blue, _alpha] = rgba.0;
            Pixel::new(red, green, blue)
        }
    }
}
