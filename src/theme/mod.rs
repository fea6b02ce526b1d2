// Light/dark theme - only picks colours, never changes behaviour

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colours for the seek slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderPalette {
    pub track: Rgb,  // elapsed part
    pub rail: Rgb,   // remaining part
    pub handle: Rgb,
}

const GREEN: Rgb = Rgb(0x04, 0xd3, 0x61);
const PURPLE: Rgb = Rgb(0x9f, 0x75, 0xff);

const LIGHT_SLIDER: SliderPalette = SliderPalette {
    track: GREEN,
    rail: PURPLE,
    handle: GREEN,
};

const DARK_SLIDER: SliderPalette = SliderPalette {
    track: Rgb(4, 211, 97),
    rail: Rgb(159, 117, 255),
    handle: Rgb(4, 211, 97),
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeStore {
    is_dark: bool,
}

impl ThemeStore {
    pub fn new(is_dark: bool) -> Self {
        Self { is_dark }
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn toggle(&mut self) {
        self.is_dark = !self.is_dark;
    }

    pub fn slider_palette(&self) -> SliderPalette {
        if self.is_dark {
            DARK_SLIDER
        } else {
            LIGHT_SLIDER
        }
    }
}
