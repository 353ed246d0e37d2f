use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::Orientation;

/// Screen class of a device profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Mobile,
    Tablet,
    Custom,
}

impl DeviceCategory {
    /// Categories the catalog offers presets for, in toolbar order.
    pub const SELECTABLE: &[Self] = &[Self::Mobile, Self::Tablet];
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mobile => write!(f, "mobile"),
            Self::Tablet => write!(f, "tablet"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Pixel size of a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.width, self.height)
    }
}

/// A named device with fixed portrait and landscape sizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub category: DeviceCategory,
    pub portrait: Dimensions,
    pub landscape: Dimensions,
}

impl DeviceProfile {
    /// Profile whose landscape size is the portrait size rotated.
    pub const fn new(
        id: &'static str,
        name: &'static str,
        category: DeviceCategory,
        portrait: Dimensions,
    ) -> Self {
        Self {
            id,
            name,
            category,
            portrait,
            landscape: portrait.swapped(),
        }
    }

    pub fn dimensions(&self, orientation: Orientation) -> Dimensions {
        match orientation {
            Orientation::Portrait => self.portrait,
            Orientation::Landscape => self.landscape,
        }
    }
}

const PRESETS: &[DeviceProfile] = &[
    DeviceProfile::new(
        "iphonese3",
        "iPhone SE (3rd gen)",
        DeviceCategory::Mobile,
        Dimensions::new(375, 667),
    ),
    DeviceProfile::new(
        "galaxys25",
        "Samsung Galaxy S25",
        DeviceCategory::Mobile,
        Dimensions::new(360, 800),
    ),
    DeviceProfile::new(
        "iphone16pro",
        "iPhone 16 Pro",
        DeviceCategory::Mobile,
        Dimensions::new(390, 844),
    ),
    DeviceProfile::new(
        "pixel9",
        "Google Pixel 9",
        DeviceCategory::Mobile,
        Dimensions::new(412, 915),
    ),
    DeviceProfile::new(
        "galaxys25ultra",
        "Samsung Galaxy S25 Ultra",
        DeviceCategory::Mobile,
        Dimensions::new(412, 892),
    ),
    DeviceProfile::new(
        "iphone16promax",
        "iPhone 16 Pro Max",
        DeviceCategory::Mobile,
        Dimensions::new(430, 932),
    ),
    DeviceProfile::new(
        "ipadmini6",
        "iPad Mini (6th gen)",
        DeviceCategory::Tablet,
        Dimensions::new(744, 1133),
    ),
    DeviceProfile::new(
        "galaxytabs10_11",
        "Samsung Galaxy Tab S10 (11\")",
        DeviceCategory::Tablet,
        Dimensions::new(800, 1280),
    ),
    DeviceProfile::new(
        "ipadair11m2",
        "iPad Air 11\" (M2)",
        DeviceCategory::Tablet,
        Dimensions::new(834, 1194),
    ),
    DeviceProfile::new(
        "galaxytabs10ultra",
        "Samsung Galaxy Tab S10 Ultra",
        DeviceCategory::Tablet,
        Dimensions::new(962, 1539),
    ),
    DeviceProfile::new(
        "ipadpro13m4",
        "iPad Pro 13\" (M4)",
        DeviceCategory::Tablet,
        Dimensions::new(1024, 1366),
    ),
];

static BUILTIN: Catalog = Catalog {
    profiles: Cow::Borrowed(PRESETS),
};

/// Read-only table of device profiles, kept in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    profiles: Cow<'static, [DeviceProfile]>,
}

impl Catalog {
    pub fn new(profiles: Vec<DeviceProfile>) -> Self {
        Self {
            profiles: Cow::Owned(profiles),
        }
    }

    /// The process-wide preset table.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn lookup(&self, id: &str) -> Option<&DeviceProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn list_by_category(
        &self,
        category: DeviceCategory,
    ) -> impl Iterator<Item = &DeviceProfile> + '_ {
        self.profiles.iter().filter(move |p| p.category == category)
    }

    /// First entry of `category`.
    pub fn default_for(&self, category: DeviceCategory) -> Option<&DeviceProfile> {
        self.list_by_category(category).next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceProfile> + '_ {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        BUILTIN.clone()
    }
}
